//! Request filter resolution.
//!
//! Turns loosely-typed query parameters into a [`FilterSet`]: typed ids and a
//! concrete `[start, end)` due-date window plus the equally long window that
//! precedes it. Nothing in here fails; anything malformed is dropped.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use school_domain::{
    AcademicYearId, AssignmentQuery, ClassId, GradeId, StudentId, SubjectId, TeacherId, TimeRange,
};

/// Fixed lookback for the `this_term` token.
pub const TERM_LENGTH_DAYS: i64 = 90;

/// Raw, unvalidated filter parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFilterParams {
    pub date_range: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub academic_year_id: Option<String>,
    pub grade_id: Option<String>,
    pub class_id: Option<String>,
    pub subject_id: Option<String>,
    pub teacher_id: Option<String>,
    pub student_id: Option<String>,
}

/// Named date-range tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangeToken {
    Today,
    ThisWeek,
    ThisMonth,
    ThisTerm,
    ThisYear,
    Custom,
}

impl DateRangeToken {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
            Self::ThisTerm => "this_term",
            Self::ThisYear => "this_year",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for DateRangeToken {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "today" => Ok(Self::Today),
            "this_week" => Ok(Self::ThisWeek),
            "this_month" => Ok(Self::ThisMonth),
            "this_term" => Ok(Self::ThisTerm),
            "this_year" => Ok(Self::ThisYear),
            "custom" => Ok(Self::Custom),
            _ => Err(()),
        }
    }
}

/// Validated filters for one report request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub date_range: Option<DateRangeToken>,
    /// Requested due-date window
    pub window: Option<TimeRange>,
    /// Same-length window ending at `window.start`
    pub comparison: Option<TimeRange>,
    pub academic_year_id: Option<AcademicYearId>,
    pub grade_id: Option<GradeId>,
    pub class_id: Option<ClassId>,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherId>,
    pub student_id: Option<StudentId>,
}

impl FilterSet {
    /// Assignment predicate for the requested window.
    #[must_use]
    pub fn assignment_query(&self) -> AssignmentQuery {
        AssignmentQuery {
            academic_year_id: self.academic_year_id,
            grade_id: self.grade_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            due_within: self.window,
            published_only: true,
        }
    }

    /// Assignment predicate for the comparison window, if there is one.
    #[must_use]
    pub fn comparison_query(&self) -> Option<AssignmentQuery> {
        self.comparison
            .map(|window| self.assignment_query().with_window(Some(window)))
    }

    /// Echo of the filters that actually took effect, keyed by name.
    #[must_use]
    pub fn applied(&self) -> BTreeMap<String, Value> {
        let mut applied = BTreeMap::new();

        if let (Some(token), Some(window)) = (self.date_range, self.window) {
            applied.insert("date_range".to_string(), Value::from(token.as_str()));
            applied.insert("date_start".to_string(), Value::from(window.start.to_rfc3339()));
            applied.insert("date_end".to_string(), Value::from(window.end.to_rfc3339()));
        }

        let ids = [
            ("academic_year_id", self.academic_year_id),
            ("grade_id", self.grade_id),
            ("class_id", self.class_id),
            ("subject_id", self.subject_id),
            ("teacher_id", self.teacher_id),
            ("student_id", self.student_id),
        ];
        for (name, id) in ids {
            if let Some(id) = id {
                applied.insert(name.to_string(), Value::from(id));
            }
        }

        applied
    }
}

/// Resolve raw parameters against an explicit `now`.
#[must_use]
pub fn parse_filters(raw: &RawFilterParams, now: DateTime<Utc>) -> FilterSet {
    let date_range = raw
        .date_range
        .as_deref()
        .and_then(|token| token.parse::<DateRangeToken>().ok());

    // A window without a representable comparison window is dropped whole.
    let (window, comparison) = date_range
        .and_then(|token| {
            resolve_window(
                token,
                raw.start_date.as_deref(),
                raw.end_date.as_deref(),
                now,
            )
        })
        .and_then(|window| Some((window, window.preceding()?)))
        .unzip();

    FilterSet {
        date_range,
        window,
        comparison,
        academic_year_id: parse_id(raw.academic_year_id.as_deref()),
        grade_id: parse_id(raw.grade_id.as_deref()),
        class_id: parse_id(raw.class_id.as_deref()),
        subject_id: parse_id(raw.subject_id.as_deref()),
        teacher_id: parse_id(raw.teacher_id.as_deref()),
        student_id: parse_id(raw.student_id.as_deref()),
    }
}

/// Parse an opaque integer id; blanks and garbage mean "no filter".
#[must_use]
pub fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn resolve_window(
    token: DateRangeToken,
    start_date: Option<&str>,
    end_date: Option<&str>,
    now: DateTime<Utc>,
) -> Option<TimeRange> {
    let today = now.date_naive();
    let start = match token {
        DateRangeToken::Today => today,
        DateRangeToken::ThisWeek => {
            today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
        }
        DateRangeToken::ThisMonth => NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?,
        DateRangeToken::ThisTerm => {
            return Some(TimeRange::new(now - Duration::days(TERM_LENGTH_DAYS), now));
        }
        DateRangeToken::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
        DateRangeToken::Custom => {
            let start = parse_date(start_date?)?;
            let end = parse_date(end_date?)?;
            if start > end {
                return None;
            }
            // end_date is inclusive: the window runs to the following midnight
            return Some(TimeRange::new(midnight(start), midnight(end.succ_opt()?)));
        }
    };

    Some(TimeRange::new(midnight(start), now))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
