//! # Dataset Snapshots
//!
//! A complete, serializable snapshot of the records the analytics engine
//! reads. The API server loads one at startup; the seeder writes one.

use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result};
use school_domain::{
    AssignmentRecord, Directory, EnrollmentRecord, SchoolClass, Student, Subject,
    SubmissionRecord, Teacher,
};

/// Every record set the store serves, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub classes: Vec<SchoolClass>,
    #[serde(default)]
    pub assignments: Vec<AssignmentRecord>,
    #[serde(default)]
    pub submissions: Vec<SubmissionRecord>,
    #[serde(default)]
    pub enrollments: Vec<EnrollmentRecord>,
}

impl Dataset {
    /// Parse and validate a JSON snapshot.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Load a snapshot from disk.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let dataset = Self::from_json_str(&raw)?;

        tracing::info!(
            path = %path.display(),
            assignments = dataset.assignments.len(),
            submissions = dataset.submissions.len(),
            students = dataset.students.len(),
            "Dataset loaded"
        );

        Ok(dataset)
    }

    /// Write the snapshot to disk as pretty JSON.
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Reject duplicate ids and non-finite point values.
    ///
    /// Dangling references (a submission for an unknown assignment, say) are
    /// tolerated: joins simply never match them.
    pub fn validate(&self) -> Result<()> {
        ensure_unique("student", self.students.iter().map(|s| s.id))?;
        ensure_unique("teacher", self.teachers.iter().map(|t| t.id))?;
        ensure_unique("subject", self.subjects.iter().map(|s| s.id))?;
        ensure_unique("class", self.classes.iter().map(|c| c.id))?;
        ensure_unique("assignment", self.assignments.iter().map(|a| a.id))?;
        ensure_unique("submission", self.submissions.iter().map(|s| s.id))?;

        if let Some(bad) = self.assignments.iter().find(|a| !a.total_points.is_finite()) {
            return Err(PersistenceError::InvalidDataset(format!(
                "assignment {} has non-finite total_points",
                bad.id
            )));
        }
        if let Some(bad) = self
            .submissions
            .iter()
            .find(|s| s.score.is_some_and(|score| !score.is_finite()))
        {
            return Err(PersistenceError::InvalidDataset(format!(
                "submission {} has a non-finite score",
                bad.id
            )));
        }
        Ok(())
    }

    /// Build the name/relationship lookup for this snapshot.
    pub fn directory(&self) -> Directory {
        Directory::new(
            self.students.iter().cloned(),
            self.teachers.iter().cloned(),
            self.subjects.iter().cloned(),
            self.classes.iter().cloned(),
        )
    }
}

fn ensure_unique<T>(entity: &str, ids: impl Iterator<Item = T>) -> Result<()>
where
    T: Eq + Hash + Copy + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PersistenceError::InvalidDataset(format!(
                "duplicate {entity} id {id}"
            )));
        }
    }
    Ok(())
}
