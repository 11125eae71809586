//! Assignment and submission generation.
//!
//! Each student gets a latent ability; graded scores are drawn from a normal
//! distribution around it so that leaderboards and grade bands look like a
//! real class rather than uniform noise.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

use school_domain::{AssignmentRecord, StudentId, SubmissionRecord, SubmissionStatus};

use crate::roster::Roster;

const POINT_SCALES: [f64; 4] = [10.0, 20.0, 50.0, 100.0];

/// Mean and spread of student ability, in percent.
const ABILITY_MEAN: f64 = 72.0;
const ABILITY_SD: f64 = 14.0;
/// Spread of a single attempt around the student's ability.
const ATTEMPT_SD: f64 = 9.0;

const UNPUBLISHED_RATE: f64 = 0.05;
const MISSING_RATE: f64 = 0.08;
const DRAFT_RATE: f64 = 0.04;
const LATE_RATE: f64 = 0.1;
const UNGRADED_RATE: f64 = 0.06;

/// Shape of the generated coursework.
#[derive(Debug, Clone, Copy)]
pub struct CourseworkPlan {
    /// Assignments per class
    pub assignments_per_class: usize,
    /// Due dates fall within this many days before `now`
    pub history_days: i64,
}

/// Generated assignments and submissions.
#[derive(Debug, Clone, Default)]
pub struct Coursework {
    pub assignments: Vec<AssignmentRecord>,
    pub submissions: Vec<SubmissionRecord>,
}

fn abilities<R: Rng>(
    rng: &mut R,
    roster: &Roster,
) -> Result<HashMap<StudentId, Normal<f64>>, NormalError> {
    let ability = Normal::new(ABILITY_MEAN, ABILITY_SD)?;
    roster
        .students
        .iter()
        .map(|s| {
            let mean = ability.sample(rng).clamp(5.0, 100.0);
            Ok((s.id, Normal::new(mean, ATTEMPT_SD)?))
        })
        .collect()
}

/// Round to the nearest half point.
fn half_points(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

pub fn generate_coursework<R: Rng>(
    rng: &mut R,
    roster: &Roster,
    plan: CourseworkPlan,
    now: DateTime<Utc>,
) -> Result<Coursework, NormalError> {
    let abilities = abilities(rng, roster)?;
    let mut coursework = Coursework::default();
    let mut next_assignment = 1;
    let mut next_submission = 1;

    for class in &roster.classes {
        let members: Vec<_> = roster.class_members(class.id).collect();

        for n in 0..plan.assignments_per_class {
            let Some(subject) = roster.subjects.choose(rng) else {
                return Ok(coursework);
            };
            let teacher_id = class.teacher_ids.choose(rng).copied().unwrap_or_default();
            let total_points = POINT_SCALES.choose(rng).copied().unwrap_or(100.0);
            let due_date = now - Duration::days(rng.gen_range(0..plan.history_days.max(1)))
                - Duration::hours(rng.gen_range(0..12));

            let assignment = AssignmentRecord {
                id: next_assignment,
                title: format!("{} {} #{}", subject.name, class.name, n + 1),
                subject_id: subject.id,
                grade_id: class.grade_id,
                class_id: class.id,
                teacher_id,
                total_points,
                due_date,
                is_published: !rng.gen_bool(UNPUBLISHED_RATE),
            };
            next_assignment += 1;

            for &student_id in &members {
                if rng.gen_bool(MISSING_RATE) {
                    continue;
                }

                let late = rng.gen_bool(LATE_RATE);
                let (status, score) = if rng.gen_bool(DRAFT_RATE) {
                    (SubmissionStatus::Draft, None)
                } else if rng.gen_bool(UNGRADED_RATE) {
                    (SubmissionStatus::Submitted, None)
                } else {
                    let pct = abilities
                        .get(&student_id)
                        .map_or(ABILITY_MEAN, |dist| dist.sample(rng))
                        .clamp(0.0, 100.0);
                    let status = if late {
                        SubmissionStatus::Late
                    } else if rng.gen_bool(0.5) {
                        SubmissionStatus::AutoGraded
                    } else {
                        SubmissionStatus::ManuallyGraded
                    };
                    (status, Some(half_points(pct * total_points / 100.0)))
                };

                let submitted_at = (status != SubmissionStatus::Draft).then(|| {
                    let offset = Duration::hours(rng.gen_range(1..72));
                    if late { due_date + offset } else { due_date - offset }
                });

                coursework.submissions.push(SubmissionRecord {
                    id: next_submission,
                    assignment_id: assignment.id,
                    student_id,
                    score,
                    status,
                    is_late: late,
                    submitted_at,
                });
                next_submission += 1;
            }

            coursework.assignments.push(assignment);
        }
    }

    Ok(coursework)
}
