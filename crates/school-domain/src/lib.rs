//! # School Performance Analytics - Domain Model
//!
//! Read-only record types consumed by the analytics engine: assignments,
//! submissions, enrollments, and the directory entities that give them names.
//! These types are the single source of truth across all layers:
//! persistence, analytics, API, and the dataset seeder.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTIFIERS
// =============================================================================

pub type AssignmentId = i64;
pub type SubmissionId = i64;
pub type StudentId = i64;
pub type TeacherId = i64;
pub type SubjectId = i64;
pub type ClassId = i64;
pub type GradeId = i64;
pub type AcademicYearId = i64;
pub type UserId = i64;

// =============================================================================
// ENUMS
// =============================================================================

/// Submission lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    Late,
    AutoGraded,
    ManuallyGraded,
}

impl SubmissionStatus {
    /// Whether a submission in this status counts as handed in.
    #[must_use]
    pub const fn is_counted(self) -> bool {
        !matches!(self, Self::Draft)
    }
}

/// Caller role as asserted by the upstream gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Parent => "parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            "parent" => Ok(Self::Parent),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// Authenticated caller identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

// =============================================================================
// RECORD TYPES
// =============================================================================

/// One graded unit of homework or assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    pub title: String,
    pub subject_id: SubjectId,
    pub grade_id: GradeId,
    pub class_id: ClassId,
    pub teacher_id: TeacherId,
    /// Maximum achievable points
    pub total_points: f64,
    pub due_date: DateTime<Utc>,
    pub is_published: bool,
}

/// A student's attempt at an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: StudentId,
    /// Raw score, `None` until graded
    pub score: Option<f64>,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Class membership for one academic year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub academic_year_id: AcademicYearId,
    pub is_active: bool,
}

// =============================================================================
// DIRECTORY ENTITIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// User id of the verified guardian, if any
    pub guardian_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub name: String,
    pub grade_id: GradeId,
    pub academic_year_id: AcademicYearId,
    /// Teachers assigned to the class besides assignment owners
    #[serde(default)]
    pub teacher_ids: Vec<TeacherId>,
}

impl SchoolClass {
    #[must_use]
    pub fn is_taught_by(&self, teacher_id: TeacherId) -> bool {
        self.teacher_ids.contains(&teacher_id)
    }
}

/// Id-indexed lookup over the directory entities.
///
/// Name lookups never fail: an id without a directory entry renders as
/// `"<Kind> #<id>"` so reports stay well-formed against partial data.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    students: HashMap<StudentId, Student>,
    teachers: HashMap<TeacherId, Teacher>,
    subjects: HashMap<SubjectId, Subject>,
    classes: HashMap<ClassId, SchoolClass>,
}

impl Directory {
    pub fn new(
        students: impl IntoIterator<Item = Student>,
        teachers: impl IntoIterator<Item = Teacher>,
        subjects: impl IntoIterator<Item = Subject>,
        classes: impl IntoIterator<Item = SchoolClass>,
    ) -> Self {
        Self {
            students: students.into_iter().map(|s| (s.id, s)).collect(),
            teachers: teachers.into_iter().map(|t| (t.id, t)).collect(),
            subjects: subjects.into_iter().map(|s| (s.id, s)).collect(),
            classes: classes.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    pub fn class(&self, id: ClassId) -> Option<&SchoolClass> {
        self.classes.get(&id)
    }

    pub fn student_name(&self, id: StudentId) -> String {
        self.students
            .get(&id)
            .map_or_else(|| format!("Student #{id}"), |s| s.name.clone())
    }

    pub fn teacher_name(&self, id: TeacherId) -> String {
        self.teachers
            .get(&id)
            .map_or_else(|| format!("Teacher #{id}"), |t| t.name.clone())
    }

    pub fn subject_name(&self, id: SubjectId) -> String {
        self.subjects
            .get(&id)
            .map_or_else(|| format!("Subject #{id}"), |s| s.name.clone())
    }

    pub fn class_name(&self, id: ClassId) -> String {
        self.classes
            .get(&id)
            .map_or_else(|| format!("Class #{id}"), |c| c.name.clone())
    }
}

// =============================================================================
// QUERY/FILTER TYPES
// =============================================================================

/// Half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts < self.end
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Window of identical length ending where this one starts; `None` when
    /// its start falls outside the representable range.
    #[must_use]
    pub fn preceding(&self) -> Option<Self> {
        let start = self.start.checked_sub_signed(self.duration())?;
        Some(Self {
            start,
            end: self.start,
        })
    }
}

/// Predicate over assignments, evaluated by record stores
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentQuery {
    pub academic_year_id: Option<AcademicYearId>,
    pub grade_id: Option<GradeId>,
    pub class_id: Option<ClassId>,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherId>,
    /// Due-date window; `None` means unbounded
    pub due_within: Option<TimeRange>,
    pub published_only: bool,
}

impl AssignmentQuery {
    /// Same predicate with a different due-date window.
    #[must_use]
    pub fn with_window(&self, window: Option<TimeRange>) -> Self {
        Self {
            due_within: window,
            ..self.clone()
        }
    }

    /// Evaluate the predicate. The academic year lives on the class, so it is
    /// passed alongside; an unknown class never matches a year filter.
    #[must_use]
    pub fn matches(&self, assignment: &AssignmentRecord, class: Option<&SchoolClass>) -> bool {
        if self.published_only && !assignment.is_published {
            return false;
        }
        if self.grade_id.is_some_and(|id| id != assignment.grade_id)
            || self.class_id.is_some_and(|id| id != assignment.class_id)
            || self.subject_id.is_some_and(|id| id != assignment.subject_id)
            || self.teacher_id.is_some_and(|id| id != assignment.teacher_id)
        {
            return false;
        }
        if let Some(year) = self.academic_year_id {
            if class.is_none_or(|c| c.academic_year_id != year) {
                return false;
            }
        }
        self.due_within
            .is_none_or(|window| window.contains(&assignment.due_date))
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid role: {0}")]
    InvalidRole(String),
}
