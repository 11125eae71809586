//! People, subjects, classes and enrollments.

use rand::seq::SliceRandom;
use rand::Rng;

use school_domain::{
    AcademicYearId, EnrollmentRecord, SchoolClass, Student, StudentId, Subject, Teacher,
};

pub const SUBJECT_NAMES: [&str; 6] = [
    "Mathematics",
    "English",
    "Biology",
    "History",
    "Chemistry",
    "Geography",
];

const FIRST_NAMES: [&str; 16] = [
    "Amara", "Bo", "Caio", "Dana", "Elif", "Femi", "Greta", "Hiro", "Ines", "Jonas", "Kavya",
    "Luca", "Maya", "Nikolai", "Oona", "Pedro",
];

const LAST_NAMES: [&str; 12] = [
    "Abebe", "Brennan", "Chen", "Dubois", "Eriksen", "Fofana", "Garcia", "Haddad", "Ito",
    "Jansen", "Kowalski", "Lindqvist",
];

const TEACHER_ID_BASE: i64 = 100;
const CLASS_ID_BASE: i64 = 200;
const STUDENT_ID_BASE: i64 = 1000;
const GUARDIAN_ID_BASE: i64 = 5000;

/// Share of students with a linked guardian account.
const GUARDIAN_RATE: f64 = 0.8;

/// Share of enrollments that are no longer active.
const INACTIVE_RATE: f64 = 0.03;

/// Generated school roster.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub subjects: Vec<Subject>,
    pub teachers: Vec<Teacher>,
    pub classes: Vec<SchoolClass>,
    pub students: Vec<Student>,
    pub enrollments: Vec<EnrollmentRecord>,
}

impl Roster {
    /// Students actively enrolled in a class.
    pub fn class_members(&self, class_id: i64) -> impl Iterator<Item = StudentId> + '_ {
        self.enrollments
            .iter()
            .filter(move |e| e.class_id == class_id && e.is_active)
            .map(|e| e.student_id)
    }
}

fn person_name<R: Rng>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
    format!("{first} {last}")
}

/// Build a roster: one teacher per subject, classes spread over grades, and
/// students assigned round-robin to classes.
pub fn generate_roster<R: Rng>(
    rng: &mut R,
    students: usize,
    classes: usize,
    academic_year_id: AcademicYearId,
) -> Roster {
    let subjects: Vec<_> = (1..)
        .zip(SUBJECT_NAMES)
        .map(|(id, name)| Subject {
            id,
            name: name.to_string(),
        })
        .collect();

    let teachers: Vec<_> = (TEACHER_ID_BASE..)
        .take(subjects.len())
        .map(|id| Teacher {
            id,
            name: format!("Mx. {}", person_name(rng)),
        })
        .collect();

    let classes: Vec<_> = (0..classes)
        .map(|i| {
            let grade_id = 7 + (i % 6) as i64;
            let section = char::from(b'A' + (i / 6 % 26) as u8);
            // homeroom teacher plus one co-teacher
            let mut teacher_ids: Vec<_> = teachers.choose_multiple(rng, 2).map(|t| t.id).collect();
            teacher_ids.sort_unstable();
            SchoolClass {
                id: CLASS_ID_BASE + i as i64,
                name: format!("{grade_id}{section}"),
                grade_id,
                academic_year_id,
                teacher_ids,
            }
        })
        .collect();

    let students: Vec<_> = (0..students)
        .map(|i| Student {
            id: STUDENT_ID_BASE + i as i64,
            name: person_name(rng),
            guardian_id: rng
                .gen_bool(GUARDIAN_RATE)
                .then_some(GUARDIAN_ID_BASE + i as i64),
        })
        .collect();

    let enrollments = if classes.is_empty() {
        Vec::new()
    } else {
        students
            .iter()
            .enumerate()
            .map(|(i, student)| EnrollmentRecord {
                student_id: student.id,
                class_id: classes[i % classes.len()].id,
                academic_year_id,
                is_active: !rng.gen_bool(INACTIVE_RATE),
            })
            .collect()
    };

    Roster {
        subjects,
        teachers,
        classes,
        students,
        enrollments,
    }
}
