//! Score normalization.
//!
//! Raw scores are mapped onto a 0–100 scale relative to the assignment's
//! total points. An ungraded submission, or one whose assignment has no
//! positive point total, has no percentage at all; that absence is kept
//! distinct from a genuine zero.

use school_domain::{
    AssignmentId, AssignmentRecord, StudentId, SubmissionId, SubmissionRecord, SubmissionStatus,
};

/// Submission joined with its assignment's point scale.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSubmission {
    pub submission_id: SubmissionId,
    pub student_id: StudentId,
    pub assignment_id: AssignmentId,
    /// Percentage in `[0, 100]`, `None` when not computable
    pub score_pct: Option<f64>,
    pub status: SubmissionStatus,
    /// Flagged late, or in the late status
    pub is_late: bool,
}

impl NormalizedSubmission {
    /// Whether the submission counts toward completion.
    #[must_use]
    pub const fn is_counted(&self) -> bool {
        self.status.is_counted()
    }
}

/// Convert a raw score into a percentage of `total_points`.
///
/// Results are clamped to `[0, 100]` so over-awarded bonus points cannot push
/// a score outside the grade scale.
#[must_use]
pub fn score_pct(raw_score: Option<f64>, total_points: f64) -> Option<f64> {
    if total_points <= 0.0 || !total_points.is_finite() {
        return None;
    }
    raw_score
        .filter(|score| score.is_finite())
        .map(|score| (score * 100.0 / total_points).clamp(0.0, 100.0))
}

/// Normalize one submission against its parent assignment.
#[must_use]
pub fn normalize(submission: &SubmissionRecord, assignment: &AssignmentRecord) -> NormalizedSubmission {
    NormalizedSubmission {
        submission_id: submission.id,
        student_id: submission.student_id,
        assignment_id: submission.assignment_id,
        score_pct: score_pct(submission.score, assignment.total_points),
        status: submission.status,
        is_late: submission.is_late || submission.status == SubmissionStatus::Late,
    }
}
