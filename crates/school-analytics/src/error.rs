//! Analytics error types.
//!
//! Only access-control outcomes are errors. Malformed filters, empty scopes
//! and zero denominators are absorbed where they occur.

use school_domain::{Role, StudentId};
use thiserror::Error;

/// Analytics errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Parent caller did not name a student
    #[error("student_id is required for parent accounts")]
    MissingStudentId,

    /// Referenced student does not exist
    #[error("Student {0} not found")]
    StudentNotFound(StudentId),

    /// Parent caller is not the student's guardian
    #[error("Student {0} is not linked to this guardian")]
    NotGuardian(StudentId),

    /// Role may not request this report
    #[error("Role '{0}' is not permitted to view this report")]
    RoleNotPermitted(Role),
}

impl AnalyticsError {
    /// Machine-readable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingStudentId => "student_id_required",
            Self::StudentNotFound(_) => "student_not_found",
            Self::NotGuardian(_) => "not_guardian",
            Self::RoleNotPermitted(_) => "role_not_permitted",
        }
    }
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
