//! # API Context
//!
//! Shared application state: the record store and the report engine.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use school_analytics::{AnalyticsEngine, RecordSet};
use school_domain::AssignmentQuery;
use school_persistence::{
    AssignmentRepository, Dataset, EnrollmentRepository, InMemoryStore, Result, SharedRecordStore,
    SubmissionRepository,
};

/// Application context shared across all handlers
#[derive(Clone)]
pub struct ApiContext {
    /// Read-only record store
    pub store: SharedRecordStore,

    /// Stateless report engine
    pub engine: AnalyticsEngine,
}

impl ApiContext {
    pub fn new(store: SharedRecordStore, engine: AnalyticsEngine) -> Self {
        Self { store, engine }
    }

    /// Context over an in-memory dataset.
    pub fn in_memory(dataset: Dataset, engine: AnalyticsEngine) -> Self {
        Self::new(Arc::new(InMemoryStore::new(dataset)), engine)
    }

    /// Fetch everything one report window needs: matching assignments,
    /// their submissions, and enrollments of the classes involved.
    pub async fn fetch_records(&self, query: &AssignmentQuery) -> Result<RecordSet> {
        let assignments = self.store.find_assignments(query).await?;

        let assignment_ids: Vec<_> = assignments.iter().map(|a| a.id).collect();
        let class_ids: Vec<_> = assignments
            .iter()
            .map(|a| a.class_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let submissions = self.store.submissions_for(&assignment_ids).await?;
        let enrollments = self.store.enrollments_for(&class_ids).await?;

        tracing::debug!(
            assignments = assignments.len(),
            submissions = submissions.len(),
            enrollments = enrollments.len(),
            "Records fetched"
        );

        Ok(RecordSet {
            assignments,
            submissions,
            enrollments,
        })
    }
}

/// Load the dataset at `path`; a missing file yields an empty dataset.
pub async fn load_dataset(path: &Path) -> Result<Dataset> {
    if tokio::fs::try_exists(path).await? {
        Dataset::load(path).await
    } else {
        tracing::warn!(path = %path.display(), "Dataset file not found, starting with no records");
        Ok(Dataset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use school_domain::{AssignmentRecord, EnrollmentRecord, SubmissionRecord, SubmissionStatus};

    fn dataset() -> Dataset {
        let assignment = |id, class_id, is_published| AssignmentRecord {
            id,
            title: format!("Homework {id}"),
            subject_id: 1,
            grade_id: 1,
            class_id,
            teacher_id: 1,
            total_points: 10.0,
            due_date: Utc::now(),
            is_published,
        };
        Dataset {
            assignments: vec![assignment(1, 10, true), assignment(2, 20, true), assignment(3, 30, false)],
            submissions: vec![
                SubmissionRecord {
                    id: 1,
                    assignment_id: 1,
                    student_id: 5,
                    score: Some(8.0),
                    status: SubmissionStatus::Submitted,
                    is_late: false,
                    submitted_at: None,
                },
                SubmissionRecord {
                    id: 2,
                    assignment_id: 3,
                    student_id: 5,
                    score: Some(8.0),
                    status: SubmissionStatus::Submitted,
                    is_late: false,
                    submitted_at: None,
                },
            ],
            enrollments: vec![
                EnrollmentRecord {
                    student_id: 5,
                    class_id: 10,
                    academic_year_id: 1,
                    is_active: true,
                },
                EnrollmentRecord {
                    student_id: 5,
                    class_id: 30,
                    academic_year_id: 1,
                    is_active: true,
                },
            ],
            ..Dataset::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_records_follows_published_assignments() {
        let ctx = ApiContext::in_memory(dataset(), AnalyticsEngine::default());
        let query = AssignmentQuery {
            published_only: true,
            ..AssignmentQuery::default()
        };
        let records = ctx.fetch_records(&query).await.unwrap();

        let ids: Vec<_> = records.assignments.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(records.submissions.len(), 1);
        assert_eq!(records.enrollments.len(), 1);
        assert_eq!(records.enrollments[0].class_id, 10);
    }

    #[tokio::test]
    async fn test_missing_dataset_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = load_dataset(&dir.path().join("absent.json")).await.unwrap();
        assert!(dataset.assignments.is_empty());
        assert!(dataset.students.is_empty());
    }

    #[tokio::test]
    async fn test_existing_dataset_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        dataset().save(&path).await.unwrap();

        let loaded = load_dataset(&path).await.unwrap();
        assert_eq!(loaded.assignments.len(), 3);
    }
}
