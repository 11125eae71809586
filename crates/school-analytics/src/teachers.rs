//! Per-teacher rollup for the teacher-performance report.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use school_domain::{AssignmentId, ClassId, Directory, StudentId, TeacherId};

use crate::cohort::Cohort;
use crate::stats::{percentage, round2, ScoreAccumulator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherRow {
    pub teacher_id: TeacherId,
    pub name: String,
    pub average_score: f64,
    pub pass_rate: f64,
    pub completion_rate: f64,
    pub on_time_rate: f64,
    /// Distinct in-scope assignments owned by the teacher
    pub assignments: usize,
    pub classes: usize,
    pub students: usize,
}

#[derive(Default)]
struct TeacherTally {
    scores: ScoreAccumulator,
    counted: usize,
    on_time: usize,
    handed_in: HashSet<(AssignmentId, StudentId)>,
    students: HashSet<StudentId>,
}

/// One row per teacher whose assignments received submissions, by
/// descending average (ties by ascending `teacher_id`).
#[must_use]
pub fn teacher_rows(cohort: &Cohort, directory: &Directory) -> Vec<TeacherRow> {
    let mut owned: BTreeMap<TeacherId, (HashSet<AssignmentId>, HashSet<ClassId>)> = BTreeMap::new();
    for assignment in cohort.assignments() {
        let (assignments, classes) = owned.entry(assignment.teacher_id).or_default();
        assignments.insert(assignment.id);
        classes.insert(assignment.class_id);
    }

    let mut tallies: BTreeMap<TeacherId, TeacherTally> = BTreeMap::new();
    for submission in cohort.submissions() {
        let Some(assignment) = cohort.assignment(submission.assignment_id) else {
            continue;
        };
        let tally = tallies.entry(assignment.teacher_id).or_default();
        tally.scores.push(submission.score_pct);
        tally.students.insert(submission.student_id);
        if submission.is_counted() {
            tally.counted += 1;
            if !submission.is_late {
                tally.on_time += 1;
            }
            tally
                .handed_in
                .insert((submission.assignment_id, submission.student_id));
        }
    }

    let mut rows: Vec<_> = tallies
        .into_iter()
        .map(|(teacher_id, tally)| {
            let (assignments, classes) = owned
                .get(&teacher_id)
                .map_or((0, 0), |(a, c)| (a.len(), c.len()));
            TeacherRow {
                teacher_id,
                name: directory.teacher_name(teacher_id),
                average_score: tally.scores.average(),
                pass_rate: tally.scores.pass_rate(),
                completion_rate: round2(percentage(tally.handed_in.len(), assignments)),
                on_time_rate: round2(percentage(tally.on_time, tally.counted)),
                assignments,
                classes,
                students: tally.students.len(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    rows
}
