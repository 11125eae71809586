//! School Seeder CLI
//!
//! Writes a synthetic dataset JSON file for the analytics API.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use school_seeder::{generate, SeedConfig};

#[derive(Parser, Debug)]
#[command(name = "school-seeder")]
#[command(about = "Generate a synthetic school analytics dataset")]
struct Args {
    /// Number of students
    #[arg(short, long, default_value = "120")]
    students: usize,

    /// Number of classes
    #[arg(short, long, default_value = "6")]
    classes: usize,

    /// Assignments per class
    #[arg(short, long, default_value = "12")]
    assignments: usize,

    /// Spread due dates over this many past days
    #[arg(long, default_value = "120")]
    history_days: i64,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Output file
    #[arg(short, long, default_value = "data/dataset.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("school_seeder=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().r#gen());

    let config = SeedConfig {
        students: args.students,
        classes: args.classes,
        assignments_per_class: args.assignments,
        history_days: args.history_days,
        seed,
    };
    info!(?config, "Generating dataset");

    let dataset = generate(&config, Utc::now())?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    dataset.save(&args.output).await?;

    info!(
        path = %args.output.display(),
        students = dataset.students.len(),
        classes = dataset.classes.len(),
        assignments = dataset.assignments.len(),
        submissions = dataset.submissions.len(),
        seed,
        "Dataset written"
    );

    Ok(())
}
