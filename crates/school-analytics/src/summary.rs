//! Top-line summary metrics.

use serde::{Deserialize, Serialize};

use crate::cohort::Cohort;
use crate::stats::{percentage, round2};

/// Cohort-level summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub average_score: f64,
    pub pass_rate: f64,
    pub completion_rate: f64,
    pub missing_submissions: usize,
    /// Reserved for question-level correctness; always zero
    pub accuracy: f64,
    /// Change in average against the comparison window
    pub trend_delta: Option<f64>,
}

/// Summarize the current window, comparing against `previous` when given.
#[must_use]
pub fn summarize(current: &Cohort, previous: Option<&Cohort>) -> Summary {
    let scores = current.scores();
    let assigned = current.assigned_count();
    let submitted = current.submitted_count();

    let trend_delta = previous
        .and_then(|p| p.scores().mean())
        .map(|prev_mean| round2(scores.mean().unwrap_or(0.0) - prev_mean));

    Summary {
        average_score: scores.average(),
        pass_rate: scores.pass_rate(),
        completion_rate: round2(percentage(submitted, assigned)),
        missing_submissions: assigned.saturating_sub(submitted),
        accuracy: 0.0,
        trend_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::RecordSet;
    use crate::scope::AccessScope;
    use chrono::Utc;
    use school_domain::{AssignmentRecord, Directory, SubmissionRecord, SubmissionStatus};

    fn assignment(id: i64) -> AssignmentRecord {
        AssignmentRecord {
            id,
            title: format!("Worksheet {id}"),
            subject_id: 1,
            grade_id: 1,
            class_id: 1,
            teacher_id: 1,
            total_points: 20.0,
            due_date: Utc::now(),
            is_published: true,
        }
    }

    fn submission(id: i64, assignment_id: i64, student_id: i64, score: Option<f64>) -> SubmissionRecord {
        SubmissionRecord {
            id,
            assignment_id,
            student_id,
            score,
            status: SubmissionStatus::Submitted,
            is_late: false,
            submitted_at: None,
        }
    }

    fn cohort(assignments: Vec<AssignmentRecord>, submissions: Vec<SubmissionRecord>) -> Cohort {
        Cohort::assemble(
            RecordSet {
                assignments,
                submissions,
                enrollments: vec![],
            },
            &AccessScope::Unrestricted,
            None,
            &Directory::default(),
        )
    }

    #[test]
    fn test_scenario_a_scores() {
        let current = cohort(
            vec![assignment(1)],
            vec![
                submission(1, 1, 1, Some(20.0)),
                submission(2, 1, 2, Some(15.0)),
                submission(3, 1, 3, Some(5.0)),
                submission(4, 1, 4, None),
            ],
        );
        let summary = summarize(&current, None);
        assert_eq!(summary.average_score, 66.67);
        assert_eq!(summary.pass_rate, 66.67);
        assert_eq!(summary.trend_delta, None);
        assert_eq!(summary.accuracy, 0.0);
    }

    #[test]
    fn test_scenario_b_missing_and_completion() {
        let current = cohort(
            (1..=5).map(assignment).collect(),
            vec![
                submission(1, 1, 10, Some(12.0)),
                submission(2, 1, 11, Some(14.0)),
                submission(3, 1, 12, Some(16.0)),
            ],
        );
        let summary = summarize(&current, None);
        assert_eq!(summary.missing_submissions, 2);
        assert_eq!(summary.completion_rate, 60.0);
    }

    #[test]
    fn test_empty_cohort_is_zeroed() {
        let summary = summarize(&Cohort::default(), Some(&Cohort::default()));
        assert_eq!(
            summary,
            Summary {
                average_score: 0.0,
                pass_rate: 0.0,
                completion_rate: 0.0,
                missing_submissions: 0,
                accuracy: 0.0,
                trend_delta: None,
            }
        );
    }

    #[test]
    fn test_trend_delta_against_comparison_window() {
        let current = cohort(vec![assignment(1)], vec![submission(1, 1, 1, Some(18.0))]);
        let previous = cohort(vec![assignment(2)], vec![submission(2, 2, 1, Some(12.0))]);
        let summary = summarize(&current, Some(&previous));
        assert_eq!(summary.trend_delta, Some(30.0));
    }

    #[test]
    fn test_trend_delta_none_when_comparison_unscored() {
        let current = cohort(vec![assignment(1)], vec![submission(1, 1, 1, Some(18.0))]);
        let previous = cohort(vec![assignment(2)], vec![submission(2, 2, 1, None)]);
        assert_eq!(summarize(&current, Some(&previous)).trend_delta, None);
    }
}
