//! In-memory repository implementation backed by a [`Dataset`] snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::repository::traits::{
    AssignmentRepository, DirectoryRepository, EnrollmentRepository, SubmissionRepository,
};
use school_domain::{
    AssignmentId, AssignmentQuery, AssignmentRecord, ClassId, Directory, EnrollmentRecord,
    SubmissionRecord,
};

/// Read-only store over a dataset snapshot.
///
/// The snapshot is immutable once loaded, so the store is freely shared
/// between concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    dataset: Arc<Dataset>,
    directory: Arc<Directory>,
}

impl InMemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        let directory = Arc::new(dataset.directory());
        Self {
            dataset: Arc::new(dataset),
            directory,
        }
    }

    /// Store with no records at all.
    pub fn empty() -> Self {
        Self::new(Dataset::default())
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn find_assignments(&self, query: &AssignmentQuery) -> Result<Vec<AssignmentRecord>> {
        let assignments: Vec<_> = self
            .dataset
            .assignments
            .iter()
            .filter(|a| query.matches(a, self.directory.class(a.class_id)))
            .cloned()
            .collect();

        tracing::debug!(count = assignments.len(), "Assignments matched");
        Ok(assignments)
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryStore {
    async fn submissions_for(
        &self,
        assignment_ids: &[AssignmentId],
    ) -> Result<Vec<SubmissionRecord>> {
        let wanted: HashSet<_> = assignment_ids.iter().copied().collect();
        Ok(self
            .dataset
            .submissions
            .iter()
            .filter(|s| wanted.contains(&s.assignment_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn enrollments_for(&self, class_ids: &[ClassId]) -> Result<Vec<EnrollmentRecord>> {
        let wanted: HashSet<_> = class_ids.iter().copied().collect();
        Ok(self
            .dataset
            .enrollments
            .iter()
            .filter(|e| wanted.contains(&e.class_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryStore {
    async fn directory(&self) -> Result<Arc<Directory>> {
        Ok(Arc::clone(&self.directory))
    }
}
