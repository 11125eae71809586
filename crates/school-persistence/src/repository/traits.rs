//! # Repository Traits
//!
//! Abstract read interfaces over the external record store.
//! Implementations can be swapped for different backends (in-memory, SQL, mock).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use school_domain::{
    AssignmentId, AssignmentQuery, AssignmentRecord, ClassId, Directory, EnrollmentRecord,
    SubmissionRecord,
};

// =============================================================================
// ASSIGNMENT REPOSITORY
// =============================================================================

/// Repository for assignment reads
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Assignments matching the query, in store order
    async fn find_assignments(&self, query: &AssignmentQuery) -> Result<Vec<AssignmentRecord>>;
}

// =============================================================================
// SUBMISSION REPOSITORY
// =============================================================================

/// Repository for submission reads
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Every submission against any of the given assignments
    async fn submissions_for(&self, assignment_ids: &[AssignmentId])
    -> Result<Vec<SubmissionRecord>>;
}

// =============================================================================
// ENROLLMENT REPOSITORY
// =============================================================================

/// Repository for enrollment reads
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Enrollments (active or not) in any of the given classes
    async fn enrollments_for(&self, class_ids: &[ClassId]) -> Result<Vec<EnrollmentRecord>>;
}

// =============================================================================
// DIRECTORY REPOSITORY
// =============================================================================

/// Repository for people, subjects and classes
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Full id-indexed directory
    async fn directory(&self) -> Result<Arc<Directory>>;
}

// =============================================================================
// COMBINED STORE
// =============================================================================

/// Everything a report request reads.
pub trait RecordStore:
    AssignmentRepository + SubmissionRepository + EnrollmentRepository + DirectoryRepository
{
}

impl<T> RecordStore for T where
    T: AssignmentRepository + SubmissionRepository + EnrollmentRepository + DirectoryRepository
{
}

/// Thread-safe handle shared across request handlers
pub type SharedRecordStore = Arc<dyn RecordStore>;
