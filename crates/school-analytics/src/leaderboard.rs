//! Per-student leaderboard, pagination and at-risk detection.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use school_domain::{Directory, StudentId};

use crate::cohort::Cohort;
use crate::stats::{round2, ScoreAccumulator};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

/// Below this average a student is at risk.
pub const AT_RISK_AVERAGE: f64 = 60.0;
/// Below this pass rate a student is at risk.
pub const AT_RISK_PASS_RATE: f64 = 50.0;
/// Above this many missing assignments a student is at risk.
pub const AT_RISK_MISSING: usize = 2;

// =============================================================================
// ROWS
// =============================================================================

/// One student's rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRow {
    pub student_id: StudentId,
    pub name: String,
    pub average_score: f64,
    pub pass_rate: f64,
    pub missing_submissions: usize,
    pub late_count: usize,
    pub subject: String,
    pub class_name: String,
    /// Change in average against the comparison window
    pub improvement: Option<f64>,
    /// Reserved; always zero
    pub accuracy: f64,
}

impl StudentRow {
    #[must_use]
    pub fn is_at_risk(&self) -> bool {
        self.average_score < AT_RISK_AVERAGE
            || self.missing_submissions > AT_RISK_MISSING
            || self.pass_rate < AT_RISK_PASS_RATE
    }
}

#[derive(Default)]
struct StudentAccumulator {
    scores: ScoreAccumulator,
    handed_in: HashSet<i64>,
    late_count: usize,
    /// Assignment of the first submission seen, used for labels
    label_from: Option<i64>,
}

/// Build unsorted rows, one per student with any in-scope submission.
///
/// Rows come out in ascending `student_id`, which is the tie-break order the
/// stable sort preserves.
#[must_use]
pub fn student_rows(current: &Cohort, previous: Option<&Cohort>, directory: &Directory) -> Vec<StudentRow> {
    let mut per_student: BTreeMap<StudentId, StudentAccumulator> = BTreeMap::new();
    for submission in current.submissions() {
        let acc = per_student.entry(submission.student_id).or_default();
        acc.scores.push(submission.score_pct);
        if submission.is_counted() {
            acc.handed_in.insert(submission.assignment_id);
        }
        if submission.is_late {
            acc.late_count += 1;
        }
        acc.label_from.get_or_insert(submission.assignment_id);
    }

    let previous_means: HashMap<StudentId, f64> = previous
        .map(|cohort| {
            let mut per_student: BTreeMap<StudentId, ScoreAccumulator> = BTreeMap::new();
            for submission in cohort.submissions() {
                per_student
                    .entry(submission.student_id)
                    .or_default()
                    .push(submission.score_pct);
            }
            per_student
                .into_iter()
                .filter_map(|(id, scores)| scores.mean().map(|mean| (id, mean)))
                .collect()
        })
        .unwrap_or_default();

    let assigned = current.assigned_count();
    per_student
        .into_iter()
        .map(|(student_id, acc)| {
            let label = acc.label_from.and_then(|id| current.assignment(id));
            StudentRow {
                student_id,
                name: directory.student_name(student_id),
                average_score: acc.scores.average(),
                pass_rate: acc.scores.pass_rate(),
                missing_submissions: assigned.saturating_sub(acc.handed_in.len()),
                late_count: acc.late_count,
                subject: label.map(|a| directory.subject_name(a.subject_id)).unwrap_or_default(),
                class_name: label.map(|a| directory.class_name(a.class_id)).unwrap_or_default(),
                improvement: previous_means
                    .get(&student_id)
                    .map(|prev| round2(acc.scores.mean().unwrap_or(0.0) - prev)),
                accuracy: 0.0,
            }
        })
        .collect()
}

// =============================================================================
// ORDERING
// =============================================================================

/// Sortable leaderboard columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    AverageScore,
    PassRate,
    MissingSubmissions,
    Improvement,
}

impl SortField {
    fn value(self, row: &StudentRow) -> Option<f64> {
        match self {
            Self::AverageScore => Some(row.average_score),
            Self::PassRate => Some(row.pass_rate),
            Self::MissingSubmissions => Some(row.missing_submissions as f64),
            Self::Improvement => row.improvement,
        }
    }
}

/// Column plus direction; `-average_score` by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            field: SortField::AverageScore,
            descending: true,
        }
    }
}

impl SortOrder {
    /// Parse `field` or `-field`; anything unrecognized is the default.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        let (descending, name) = raw
            .strip_prefix('-')
            .map_or((false, raw), |rest| (true, rest));
        let field = match name {
            "average_score" => SortField::AverageScore,
            "pass_rate" => SortField::PassRate,
            "missing_submissions" => SortField::MissingSubmissions,
            "improvement" => SortField::Improvement,
            _ => return Self::default(),
        };
        Self { field, descending }
    }

    /// Stable in-place sort; `None` values always trail.
    pub fn sort(self, rows: &mut [StudentRow]) {
        rows.sort_by(|a, b| {
            match (self.field.value(a), self.field.value(b)) {
                (Some(x), Some(y)) => {
                    let ord = x.total_cmp(&y);
                    if self.descending { ord.reverse() } else { ord }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }

    pub fn as_param(self) -> String {
        let name = match self.field {
            SortField::AverageScore => "average_score",
            SortField::PassRate => "pass_rate",
            SortField::MissingSubmissions => "missing_submissions",
            SortField::Improvement => "improvement",
        };
        if self.descending { format!("-{name}") } else { name.to_string() }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Leaderboard controls, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardParams {
    pub page: usize,
    pub page_size: usize,
    pub ordering: SortOrder,
}

impl Default for LeaderboardParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            ordering: SortOrder::default(),
        }
    }
}

impl LeaderboardParams {
    /// Parse raw query values. Unparseable or non-positive values fall back
    /// to the defaults; an oversized `page_size` is capped.
    #[must_use]
    pub fn parse(page: Option<&str>, page_size: Option<&str>, ordering: Option<&str>) -> Self {
        let positive = |raw: Option<&str>| {
            raw.and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|n| *n >= 1)
        };
        Self {
            page: positive(page).unwrap_or(1),
            page_size: positive(page_size).map_or(DEFAULT_PAGE_SIZE, |n| n.min(MAX_PAGE_SIZE)),
            ordering: SortOrder::parse(ordering),
        }
    }

    fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Pagination echo in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_students: usize,
}

/// Sorted page plus the at-risk subset.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub page: Vec<StudentRow>,
    pub at_risk: Vec<StudentRow>,
    pub pagination: PaginationInfo,
}

/// Sort every row, then cut the requested page and the at-risk list.
///
/// The at-risk list is drawn from the full sorted set and truncated to
/// `page_size`, independent of the page cursor.
#[must_use]
pub fn build_leaderboard(mut rows: Vec<StudentRow>, params: &LeaderboardParams) -> Leaderboard {
    params.ordering.sort(&mut rows);

    let total = rows.len();
    let at_risk = rows
        .iter()
        .filter(|r| r.is_at_risk())
        .take(params.page_size)
        .cloned()
        .collect();
    let page = rows
        .into_iter()
        .skip(params.offset())
        .take(params.page_size)
        .collect();

    Leaderboard {
        page,
        at_risk,
        pagination: PaginationInfo {
            page: params.page,
            page_size: params.page_size,
            total_students: total,
        },
    }
}
