//! Per-subject and per-class rollups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use school_domain::{ClassId, Directory, SubjectId};

use crate::cohort::Cohort;
use crate::normalize::NormalizedSubmission;
use crate::stats::{percentage, round2, ScoreAccumulator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRow {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub average_score: f64,
    pub pass_rate: f64,
    pub on_time_rate: f64,
    pub submission_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRow {
    pub class_id: ClassId,
    pub class_name: String,
    pub average_score: f64,
    pub pass_rate: f64,
    pub submission_count: usize,
}

/// Scores plus counted/on-time tallies for one group.
#[derive(Default)]
struct GroupTally {
    scores: ScoreAccumulator,
    counted: usize,
    on_time: usize,
}

impl GroupTally {
    fn add(&mut self, submission: &NormalizedSubmission) {
        self.scores.push(submission.score_pct);
        if submission.is_counted() {
            self.counted += 1;
            if !submission.is_late {
                self.on_time += 1;
            }
        }
    }

    fn on_time_rate(&self) -> f64 {
        round2(percentage(self.on_time, self.counted))
    }
}

fn group_by<K: Ord>(cohort: &Cohort, key: impl Fn(&NormalizedSubmission) -> Option<K>) -> BTreeMap<K, GroupTally> {
    let mut groups: BTreeMap<K, GroupTally> = BTreeMap::new();
    for submission in cohort.submissions() {
        if let Some(k) = key(submission) {
            groups.entry(k).or_default().add(submission);
        }
    }
    groups
}

/// Subjects by descending average; equal averages keep ascending id order.
#[must_use]
pub fn subject_breakdown(cohort: &Cohort, directory: &Directory) -> Vec<SubjectRow> {
    let groups = group_by(cohort, |s| cohort.assignment(s.assignment_id).map(|a| a.subject_id));

    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(subject_id, tally)| SubjectRow {
            subject_id,
            subject_name: directory.subject_name(subject_id),
            average_score: tally.scores.average(),
            pass_rate: tally.scores.pass_rate(),
            on_time_rate: tally.on_time_rate(),
            submission_count: tally.counted,
        })
        .collect();
    rows.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    rows
}

/// Classes by name, ascending.
#[must_use]
pub fn class_breakdown(cohort: &Cohort, directory: &Directory) -> Vec<ClassRow> {
    let groups = group_by(cohort, |s| cohort.assignment(s.assignment_id).map(|a| a.class_id));

    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(class_id, tally)| ClassRow {
            class_id,
            class_name: directory.class_name(class_id),
            average_score: tally.scores.average(),
            pass_rate: tally.scores.pass_rate(),
            submission_count: tally.counted,
        })
        .collect();
    rows.sort_by(|a, b| a.class_name.cmp(&b.class_name));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::RecordSet;
    use crate::scope::AccessScope;
    use chrono::Utc;
    use school_domain::{AssignmentRecord, SchoolClass, Subject, SubmissionRecord, SubmissionStatus};

    fn assignment(id: i64, subject_id: i64, class_id: i64) -> AssignmentRecord {
        AssignmentRecord {
            id,
            title: format!("Essay {id}"),
            subject_id,
            grade_id: 10,
            class_id,
            teacher_id: 1,
            total_points: 100.0,
            due_date: Utc::now(),
            is_published: true,
        }
    }

    fn submission(id: i64, assignment_id: i64, score: Option<f64>, status: SubmissionStatus, late: bool) -> SubmissionRecord {
        SubmissionRecord {
            id,
            assignment_id,
            student_id: id,
            score,
            status,
            is_late: late,
            submitted_at: None,
        }
    }

    fn directory() -> Directory {
        let class = |id, name: &str| SchoolClass {
            id,
            name: name.to_string(),
            grade_id: 10,
            academic_year_id: 2026,
            teacher_ids: vec![],
        };
        Directory::new(
            vec![],
            vec![],
            vec![
                Subject {
                    id: 1,
                    name: "History".to_string(),
                },
                Subject {
                    id: 2,
                    name: "Physics".to_string(),
                },
            ],
            vec![class(20, "10A"), class(10, "10B")],
        )
    }

    fn cohort() -> Cohort {
        Cohort::assemble(
            RecordSet {
                assignments: vec![assignment(1, 1, 10), assignment(2, 2, 20)],
                submissions: vec![
                    submission(1, 1, Some(40.0), SubmissionStatus::Submitted, false),
                    submission(2, 1, Some(60.0), SubmissionStatus::Late, false),
                    submission(3, 1, None, SubmissionStatus::Draft, false),
                    submission(4, 2, Some(95.0), SubmissionStatus::AutoGraded, false),
                    submission(5, 2, None, SubmissionStatus::Submitted, true),
                ],
                enrollments: vec![],
            },
            &AccessScope::Unrestricted,
            None,
            &Directory::default(),
        )
    }

    #[test]
    fn test_subjects_sorted_by_average_descending() {
        let rows = subject_breakdown(&cohort(), &directory());
        let names: Vec<_> = rows.iter().map(|r| r.subject_name.as_str()).collect();
        assert_eq!(names, vec!["Physics", "History"]);

        let physics = &rows[0];
        assert_eq!(physics.average_score, 95.0);
        assert_eq!(physics.submission_count, 2);
        assert_eq!(physics.on_time_rate, 50.0);

        let history = &rows[1];
        assert_eq!(history.average_score, 50.0);
        assert_eq!(history.pass_rate, 50.0);
        // draft not counted; the Late status row is late after normalization
        assert_eq!(history.submission_count, 2);
        assert_eq!(history.on_time_rate, 50.0);
    }

    #[test]
    fn test_classes_sorted_by_name() {
        let rows = class_breakdown(&cohort(), &directory());
        let names: Vec<_> = rows.iter().map(|r| r.class_name.as_str()).collect();
        assert_eq!(names, vec!["10A", "10B"]);
        assert_eq!(rows[0].class_id, 20);
    }

    #[test]
    fn test_rates_stay_in_bounds_when_empty() {
        let empty = Cohort::default();
        assert!(subject_breakdown(&empty, &directory()).is_empty());
        assert!(class_breakdown(&empty, &directory()).is_empty());

        let tally = GroupTally::default();
        assert_eq!(tally.on_time_rate(), 0.0);
    }
}
