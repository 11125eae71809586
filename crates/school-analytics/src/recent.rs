//! Digest of the most recently due assessments.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use school_domain::{AssignmentId, Directory, StudentId};

use crate::cohort::Cohort;
use crate::stats::{percentage, round2, ScoreAccumulator};

pub const DEFAULT_RECENT_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDigest {
    pub homework_id: AssignmentId,
    pub title: String,
    pub subject: String,
    pub class_name: String,
    pub average_score: f64,
    /// Against the class's active enrolment, not the assigned count
    pub completion_rate: f64,
    pub std_dev: f64,
    pub due_date: DateTime<Utc>,
}

#[derive(Default)]
struct AssessmentTally {
    scores: ScoreAccumulator,
    handed_in: HashSet<StudentId>,
}

/// The `limit` latest-due assignments in scope, newest first.
///
/// Equal due dates fall back to descending id.
#[must_use]
pub fn recent_assessments(cohort: &Cohort, directory: &Directory, limit: usize) -> Vec<AssessmentDigest> {
    let mut latest: Vec<_> = cohort.assignments().iter().collect();
    latest.sort_by(|a, b| b.due_date.cmp(&a.due_date).then(b.id.cmp(&a.id)));
    latest.truncate(limit);

    let mut tallies: BTreeMap<AssignmentId, AssessmentTally> = BTreeMap::new();
    for submission in cohort.submissions() {
        if !latest.iter().any(|a| a.id == submission.assignment_id) {
            continue;
        }
        let tally = tallies.entry(submission.assignment_id).or_default();
        tally.scores.push(submission.score_pct);
        if submission.is_counted() {
            tally.handed_in.insert(submission.student_id);
        }
    }

    latest
        .into_iter()
        .map(|assignment| {
            let tally = tallies.remove(&assignment.id).unwrap_or_default();
            let enrolled = cohort.enrolled_count(assignment.class_id);
            AssessmentDigest {
                homework_id: assignment.id,
                title: assignment.title.clone(),
                subject: directory.subject_name(assignment.subject_id),
                class_name: directory.class_name(assignment.class_id),
                average_score: tally.scores.average(),
                completion_rate: round2(percentage(tally.handed_in.len(), enrolled)),
                std_dev: tally.scores.std_dev(),
                due_date: assignment.due_date,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::RecordSet;
    use crate::scope::AccessScope;
    use chrono::TimeZone;
    use school_domain::{AssignmentRecord, EnrollmentRecord, SubmissionRecord, SubmissionStatus};

    fn due(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, 23, 59, 0).unwrap()
    }

    fn assignment(id: i64, day: u32) -> AssignmentRecord {
        AssignmentRecord {
            id,
            title: format!("Worksheet {id}"),
            subject_id: 1,
            grade_id: 7,
            class_id: 70,
            teacher_id: 1,
            total_points: 20.0,
            due_date: due(day),
            is_published: true,
        }
    }

    fn submission(id: i64, assignment_id: i64, student_id: i64, score: Option<f64>) -> SubmissionRecord {
        SubmissionRecord {
            id,
            assignment_id,
            student_id,
            score,
            status: SubmissionStatus::ManuallyGraded,
            is_late: false,
            submitted_at: None,
        }
    }

    fn enrolled(student_id: i64) -> EnrollmentRecord {
        EnrollmentRecord {
            student_id,
            class_id: 70,
            academic_year_id: 2026,
            is_active: true,
        }
    }

    fn cohort(assignments: Vec<AssignmentRecord>, submissions: Vec<SubmissionRecord>) -> Cohort {
        Cohort::assemble(
            RecordSet {
                assignments,
                submissions,
                enrollments: (1..=4).map(enrolled).collect(),
            },
            &AccessScope::Unrestricted,
            None,
            &Directory::default(),
        )
    }

    #[test]
    fn test_latest_first_and_limited() {
        let assignments = (1..=8).map(|id| assignment(id, id as u32)).collect();
        let digests = recent_assessments(&cohort(assignments, vec![]), &Directory::default(), DEFAULT_RECENT_LIMIT);
        let ids: Vec<_> = digests.iter().map(|d| d.homework_id).collect();
        assert_eq!(ids, vec![8, 7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_equal_due_dates_order_by_id_descending() {
        let digests = recent_assessments(
            &cohort(vec![assignment(1, 5), assignment(2, 5)], vec![]),
            &Directory::default(),
            6,
        );
        assert_eq!(digests[0].homework_id, 2);
        assert_eq!(digests[1].homework_id, 1);
    }

    #[test]
    fn test_digest_metrics() {
        let digests = recent_assessments(
            &cohort(
                vec![assignment(1, 3)],
                vec![
                    submission(1, 1, 1, Some(20.0)),
                    submission(2, 1, 2, Some(15.0)),
                    submission(3, 1, 3, Some(5.0)),
                ],
            ),
            &Directory::default(),
            6,
        );
        let digest = &digests[0];
        assert_eq!(digest.title, "Worksheet 1");
        assert_eq!(digest.subject, "Subject #1");
        assert_eq!(digest.average_score, 66.67);
        assert_eq!(digest.completion_rate, 75.0);
        assert_eq!(digest.std_dev, 31.18);
        assert_eq!(digest.due_date, due(3));
    }

    #[test]
    fn test_unsubmitted_assessment_gives_zeros() {
        let digests = recent_assessments(&cohort(vec![assignment(1, 3)], vec![]), &Directory::default(), 6);
        assert_eq!(digests[0].average_score, 0.0);
        assert_eq!(digests[0].completion_rate, 0.0);
        assert_eq!(digests[0].std_dev, 0.0);
    }
}
