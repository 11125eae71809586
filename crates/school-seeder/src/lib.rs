//! # School Seeder
//!
//! Synthetic dataset generator for exercising the analytics service locally.
//!
//! ## Features
//!
//! - Subjects, teachers, classes across grades 7–12, students with guardians
//! - Normally distributed scores around a per-student ability
//! - Missing, draft, late and ungraded submissions at realistic rates
//! - Deterministic output for a fixed seed

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod coursework;
pub mod roster;

use chrono::{DateTime, Datelike, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::NormalError;

use school_persistence::Dataset;

pub use coursework::{generate_coursework, Coursework, CourseworkPlan};
pub use roster::{generate_roster, Roster};

/// Generation parameters.
#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub students: usize,
    pub classes: usize,
    pub assignments_per_class: usize,
    pub history_days: i64,
    pub seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            students: 120,
            classes: 6,
            assignments_per_class: 12,
            history_days: 120,
            seed: 42,
        }
    }
}

/// Generate a complete dataset with due dates relative to `now`.
pub fn generate(config: &SeedConfig, now: DateTime<Utc>) -> Result<Dataset, NormalError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let academic_year_id = i64::from(now.year());

    let roster = generate_roster(&mut rng, config.students, config.classes, academic_year_id);
    let coursework = generate_coursework(
        &mut rng,
        &roster,
        CourseworkPlan {
            assignments_per_class: config.assignments_per_class,
            history_days: config.history_days,
        },
        now,
    )?;

    Ok(Dataset {
        students: roster.students,
        teachers: roster.teachers,
        subjects: roster.subjects,
        classes: roster.classes,
        assignments: coursework.assignments,
        submissions: coursework.submissions,
        enrollments: roster.enrollments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generated_dataset_validates() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let dataset = generate(&SeedConfig::default(), now).unwrap();

        dataset.validate().unwrap();
        assert_eq!(dataset.students.len(), 120);
        assert_eq!(dataset.classes.len(), 6);
        assert_eq!(dataset.assignments.len(), 72);
        assert!(!dataset.submissions.is_empty());
        assert!(dataset.classes.iter().all(|c| c.academic_year_id == 2026));
    }

    #[tokio::test]
    async fn test_saved_dataset_loads_back() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let config = SeedConfig {
            students: 10,
            classes: 2,
            assignments_per_class: 3,
            ..SeedConfig::default()
        };
        let dataset = generate(&config, now).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        dataset.save(&path).await.unwrap();

        let loaded = Dataset::load(&path).await.unwrap();
        assert_eq!(loaded.submissions, dataset.submissions);
        assert_eq!(loaded.students.len(), 10);
    }
}
