//! # Repository Module
//!
//! Read-only repository interfaces and their in-memory implementation.

pub mod memory;
pub mod traits;

pub use memory::InMemoryStore;
pub use traits::{
    AssignmentRepository, DirectoryRepository, EnrollmentRepository, RecordStore,
    SharedRecordStore, SubmissionRepository,
};
