//! # School Persistence Library
//!
//! Read-side persistence layer for the school performance analytics service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Analytics / API Layer                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Repository Traits                         │
//! │ (Assignment, Submission, Enrollment, Directory → RecordStore)│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            InMemoryStore (immutable Dataset snapshot)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never writes; every method here is a query.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use school_persistence::{Dataset, InMemoryStore, AssignmentRepository};
//!
//! let dataset = Dataset::load("data/dataset.json").await?;
//! let store = InMemoryStore::new(dataset);
//! let assignments = store.find_assignments(&AssignmentQuery::default()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod dataset;
pub mod error;
pub mod repository;

// Re-export commonly used types
pub use dataset::Dataset;
pub use error::{PersistenceError, Result};
pub use repository::{
    AssignmentRepository, DirectoryRepository, EnrollmentRepository, InMemoryStore, RecordStore,
    SharedRecordStore, SubmissionRepository,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
