//! Role-based access scoping.
//!
//! Each caller role maps to one [`AccessScope`] variant; narrowing is a pure
//! function of the scope and the candidate records.

use std::collections::HashSet;

use school_domain::{
    AssignmentRecord, Caller, Directory, Role, StudentId, SubmissionRecord, TeacherId,
};

use crate::error::{AnalyticsError, Result};

/// Which slice of the record set a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Admins and staff
    Unrestricted,
    /// Assignments the teacher owns or whose class they teach
    Teacher(TeacherId),
    /// Submissions of one student (the caller, or a parent's ward)
    Student(StudentId),
}

impl AccessScope {
    /// Scope for the student-performance report.
    ///
    /// Parents must name a student (`target`) who exists and lists them as
    /// guardian; every other role ignores `target` here.
    pub fn for_student_report(
        caller: &Caller,
        target: Option<StudentId>,
        directory: &Directory,
    ) -> Result<Self> {
        match caller.role {
            Role::Admin | Role::Staff => Ok(Self::Unrestricted),
            Role::Teacher => Ok(Self::Teacher(caller.user_id)),
            Role::Student => Ok(Self::Student(caller.user_id)),
            Role::Parent => {
                let student_id = target.ok_or(AnalyticsError::MissingStudentId)?;
                let student = directory
                    .student(student_id)
                    .ok_or(AnalyticsError::StudentNotFound(student_id))?;
                if student.guardian_id != Some(caller.user_id) {
                    return Err(AnalyticsError::NotGuardian(student_id));
                }
                Ok(Self::Student(student_id))
            }
        }
    }

    /// Scope for the teacher-performance report.
    pub const fn for_teacher_report(caller: &Caller) -> Result<Self> {
        match caller.role {
            Role::Admin | Role::Staff => Ok(Self::Unrestricted),
            Role::Teacher => Ok(Self::Teacher(caller.user_id)),
            role @ (Role::Student | Role::Parent) => Err(AnalyticsError::RoleNotPermitted(role)),
        }
    }

    /// Drop assignments outside the scope, keeping first occurrences only.
    #[must_use]
    pub fn narrow_assignments(
        &self,
        assignments: Vec<AssignmentRecord>,
        directory: &Directory,
    ) -> Vec<AssignmentRecord> {
        let mut seen = HashSet::new();
        assignments
            .into_iter()
            .filter(|a| match self {
                Self::Unrestricted | Self::Student(_) => true,
                Self::Teacher(teacher_id) => {
                    a.teacher_id == *teacher_id
                        || directory
                            .class(a.class_id)
                            .is_some_and(|c| c.is_taught_by(*teacher_id))
                }
            })
            .filter(|a| seen.insert(a.id))
            .collect()
    }

    /// Drop submissions outside the scope.
    #[must_use]
    pub fn narrow_submissions(&self, submissions: Vec<SubmissionRecord>) -> Vec<SubmissionRecord> {
        match self {
            Self::Unrestricted | Self::Teacher(_) => submissions,
            Self::Student(student_id) => submissions
                .into_iter()
                .filter(|s| s.student_id == *student_id)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use school_domain::{SchoolClass, Student, SubmissionStatus};

    fn directory() -> Directory {
        Directory::new(
            vec![
                Student {
                    id: 1,
                    name: "Mia".to_string(),
                    guardian_id: Some(900),
                },
                Student {
                    id: 2,
                    name: "Leo".to_string(),
                    guardian_id: None,
                },
            ],
            vec![],
            vec![],
            vec![SchoolClass {
                id: 10,
                name: "8C".to_string(),
                grade_id: 8,
                academic_year_id: 2026,
                teacher_ids: vec![31],
            }],
        )
    }

    fn assignment(id: i64, class_id: i64, teacher_id: i64) -> AssignmentRecord {
        AssignmentRecord {
            id,
            title: format!("Task {id}"),
            subject_id: 1,
            grade_id: 8,
            class_id,
            teacher_id,
            total_points: 10.0,
            due_date: Utc::now(),
            is_published: true,
        }
    }

    fn submission(id: i64, student_id: i64) -> SubmissionRecord {
        SubmissionRecord {
            id,
            assignment_id: 1,
            student_id,
            score: Some(5.0),
            status: SubmissionStatus::Submitted,
            is_late: false,
            submitted_at: None,
        }
    }

    #[test]
    fn test_admin_and_staff_unrestricted() {
        let dir = directory();
        for role in [Role::Admin, Role::Staff] {
            let scope = AccessScope::for_student_report(&Caller::new(5, role), None, &dir).unwrap();
            assert_eq!(scope, AccessScope::Unrestricted);
            assert_eq!(scope.narrow_submissions(vec![submission(1, 1), submission(2, 2)]).len(), 2);
        }
    }

    #[test]
    fn test_teacher_keeps_owned_and_taught_assignments() {
        let dir = directory();
        let scope = AccessScope::for_student_report(&Caller::new(31, Role::Teacher), None, &dir)
            .unwrap();

        let kept: Vec<_> = scope
            .narrow_assignments(
                vec![
                    assignment(1, 10, 99), // class taught by 31
                    assignment(2, 11, 31), // owned by 31
                    assignment(3, 11, 99), // neither
                    assignment(2, 11, 31), // duplicate
                ],
                &dir,
            )
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(kept, vec![1, 2]);
    }

    #[test]
    fn test_student_sees_only_own_submissions() {
        let dir = directory();
        let scope = AccessScope::for_student_report(&Caller::new(2, Role::Student), Some(1), &dir)
            .unwrap();
        assert_eq!(scope, AccessScope::Student(2));

        let kept = scope.narrow_submissions(vec![submission(1, 1), submission(2, 2)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].student_id, 2);

        // assignments are not narrowed for students
        assert_eq!(scope.narrow_assignments(vec![assignment(1, 10, 99)], &dir).len(), 1);
    }

    #[test]
    fn test_parent_requires_student_id() {
        let err = AccessScope::for_student_report(&Caller::new(900, Role::Parent), None, &directory())
            .unwrap_err();
        assert_eq!(err, AnalyticsError::MissingStudentId);
        assert_eq!(err.reason(), "student_id_required");
    }

    #[test]
    fn test_parent_of_ward_scoped_to_ward() {
        let scope =
            AccessScope::for_student_report(&Caller::new(900, Role::Parent), Some(1), &directory())
                .unwrap();
        assert_eq!(scope, AccessScope::Student(1));
    }

    #[test]
    fn test_parent_rejected_for_other_or_unknown_students() {
        let dir = directory();
        let parent = Caller::new(900, Role::Parent);

        assert_eq!(
            AccessScope::for_student_report(&parent, Some(2), &dir).unwrap_err(),
            AnalyticsError::NotGuardian(2)
        );
        assert_eq!(
            AccessScope::for_student_report(&parent, Some(404), &dir).unwrap_err(),
            AnalyticsError::StudentNotFound(404)
        );
    }

    #[test]
    fn test_teacher_report_roles() {
        assert_eq!(
            AccessScope::for_teacher_report(&Caller::new(1, Role::Admin)).unwrap(),
            AccessScope::Unrestricted
        );
        assert_eq!(
            AccessScope::for_teacher_report(&Caller::new(31, Role::Teacher)).unwrap(),
            AccessScope::Teacher(31)
        );
        assert_eq!(
            AccessScope::for_teacher_report(&Caller::new(2, Role::Student)).unwrap_err(),
            AnalyticsError::RoleNotPermitted(Role::Student)
        );
        assert_eq!(
            AccessScope::for_teacher_report(&Caller::new(900, Role::Parent)).unwrap_err(),
            AnalyticsError::RoleNotPermitted(Role::Parent)
        );
    }
}
