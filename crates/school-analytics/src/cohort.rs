//! The scoped, normalized record set every report section reads.

use std::collections::{HashMap, HashSet};

use school_domain::{
    AssignmentId, AssignmentRecord, ClassId, Directory, EnrollmentRecord, StudentId,
    SubmissionRecord,
};

use crate::normalize::{normalize, NormalizedSubmission};
use crate::scope::AccessScope;
use crate::stats::ScoreAccumulator;

/// Records fetched for one window, before scoping.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub assignments: Vec<AssignmentRecord>,
    pub submissions: Vec<SubmissionRecord>,
    pub enrollments: Vec<EnrollmentRecord>,
}

/// Assignments and normalized submissions visible to one caller in one window.
#[derive(Debug, Clone, Default)]
pub struct Cohort {
    assignments: Vec<AssignmentRecord>,
    index: HashMap<AssignmentId, usize>,
    submissions: Vec<NormalizedSubmission>,
    enrollments: Vec<EnrollmentRecord>,
}

impl Cohort {
    /// Apply the access scope and optional student filter, then normalize.
    ///
    /// Submissions whose assignment is not in scope are dropped here; that is
    /// the join every later stage relies on.
    #[must_use]
    pub fn assemble(
        records: RecordSet,
        scope: &AccessScope,
        student_filter: Option<StudentId>,
        directory: &Directory,
    ) -> Self {
        let assignments = scope.narrow_assignments(records.assignments, directory);
        let index: HashMap<_, _> = assignments
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id, i))
            .collect();

        let submissions = scope
            .narrow_submissions(records.submissions)
            .iter()
            .filter(|s| student_filter.is_none_or(|id| s.student_id == id))
            .filter_map(|s| index.get(&s.assignment_id).map(|&i| normalize(s, &assignments[i])))
            .collect::<Vec<_>>();

        tracing::debug!(
            scope = ?scope,
            assignments = assignments.len(),
            submissions = submissions.len(),
            "Cohort assembled"
        );

        Self {
            assignments,
            index,
            submissions,
            enrollments: records.enrollments,
        }
    }

    pub fn assignments(&self) -> &[AssignmentRecord] {
        &self.assignments
    }

    pub fn assignment(&self, id: AssignmentId) -> Option<&AssignmentRecord> {
        self.index.get(&id).map(|&i| &self.assignments[i])
    }

    pub fn submissions(&self) -> &[NormalizedSubmission] {
        &self.submissions
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// Distinct (assignment, student) pairs handed in with a counted status.
    pub fn submitted_count(&self) -> usize {
        self.submissions
            .iter()
            .filter(|s| s.is_counted())
            .map(|s| (s.assignment_id, s.student_id))
            .collect::<HashSet<_>>()
            .len()
    }

    /// All present score percentages.
    pub fn scores(&self) -> ScoreAccumulator {
        self.submissions.iter().map(|s| s.score_pct).collect()
    }

    /// Distinct students actively enrolled in a class.
    pub fn enrolled_count(&self, class_id: ClassId) -> usize {
        self.enrollments
            .iter()
            .filter(|e| e.is_active && e.class_id == class_id)
            .map(|e| e.student_id)
            .collect::<HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use school_domain::SubmissionStatus;

    fn assignment(id: i64, teacher_id: i64) -> AssignmentRecord {
        AssignmentRecord {
            id,
            title: format!("Quiz {id}"),
            subject_id: 1,
            grade_id: 1,
            class_id: 1,
            teacher_id,
            total_points: 20.0,
            due_date: Utc::now(),
            is_published: true,
        }
    }

    fn submission(id: i64, assignment_id: i64, student_id: i64, status: SubmissionStatus) -> SubmissionRecord {
        SubmissionRecord {
            id,
            assignment_id,
            student_id,
            score: Some(10.0),
            status,
            is_late: false,
            submitted_at: None,
        }
    }

    fn records() -> RecordSet {
        RecordSet {
            assignments: vec![assignment(1, 5), assignment(2, 6)],
            submissions: vec![
                submission(1, 1, 100, SubmissionStatus::Submitted),
                submission(2, 1, 100, SubmissionStatus::Late),
                submission(3, 1, 101, SubmissionStatus::Draft),
                submission(4, 2, 101, SubmissionStatus::AutoGraded),
                submission(5, 99, 101, SubmissionStatus::Submitted),
            ],
            enrollments: vec![
                EnrollmentRecord {
                    student_id: 100,
                    class_id: 1,
                    academic_year_id: 2026,
                    is_active: true,
                },
                EnrollmentRecord {
                    student_id: 101,
                    class_id: 1,
                    academic_year_id: 2026,
                    is_active: false,
                },
            ],
        }
    }

    #[test]
    fn test_orphan_submissions_dropped() {
        let cohort = Cohort::assemble(records(), &AccessScope::Unrestricted, None, &Directory::default());
        assert_eq!(cohort.assigned_count(), 2);
        assert_eq!(cohort.submissions().len(), 4);
        assert!(cohort.assignment(99).is_none());
    }

    #[test]
    fn test_submitted_count_is_distinct_counted_pairs() {
        let cohort = Cohort::assemble(records(), &AccessScope::Unrestricted, None, &Directory::default());
        // (1,100) twice, draft excluded, (2,101)
        assert_eq!(cohort.submitted_count(), 2);
    }

    #[test]
    fn test_teacher_scope_drops_submissions_of_hidden_assignments() {
        let cohort = Cohort::assemble(records(), &AccessScope::Teacher(6), None, &Directory::default());
        assert_eq!(cohort.assigned_count(), 1);
        assert_eq!(cohort.submissions().len(), 1);
        assert_eq!(cohort.submissions()[0].assignment_id, 2);
    }

    #[test]
    fn test_student_filter() {
        let cohort = Cohort::assemble(records(), &AccessScope::Unrestricted, Some(100), &Directory::default());
        assert!(cohort.submissions().iter().all(|s| s.student_id == 100));
        assert_eq!(cohort.submissions().len(), 2);
    }

    #[test]
    fn test_enrolled_count_only_active() {
        let cohort = Cohort::assemble(records(), &AccessScope::Unrestricted, None, &Directory::default());
        assert_eq!(cohort.enrolled_count(1), 1);
        assert_eq!(cohort.enrolled_count(2), 0);
    }
}
