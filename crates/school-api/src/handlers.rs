//! Report endpoints.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use school_analytics::{parse_filters, AccessScope, LeaderboardParams, RawFilterParams};
use school_persistence::DirectoryRepository;

use crate::context::ApiContext;
use crate::error::ApiResult;
use crate::extract::CallerIdentity;

const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Query string taken as raw pairs. A repeated key keeps its first value,
/// so duplicates never reject the request.
#[derive(Debug, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = HashMap::new();
        for (key, value) in pairs {
            params.entry(key).or_insert(value);
        }
        Self(params)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    /// Filter parameters
    #[must_use]
    pub fn filters(&self) -> RawFilterParams {
        RawFilterParams {
            date_range: self.get("date_range"),
            start_date: self.get("start_date"),
            end_date: self.get("end_date"),
            academic_year_id: self.get("academic_year_id"),
            grade_id: self.get("grade_id"),
            class_id: self.get("class_id"),
            subject_id: self.get("subject_id"),
            teacher_id: self.get("teacher_id"),
            student_id: self.get("student_id"),
        }
    }

    /// Leaderboard controls
    #[must_use]
    pub fn leaderboard(&self) -> LeaderboardParams {
        LeaderboardParams::parse(
            self.0.get("page").map(String::as_str),
            self.0.get("page_size").map(String::as_str),
            self.0.get("ordering").map(String::as_str),
        )
    }
}

fn wants_markdown(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/markdown"))
}

/// `GET /api/v1/analytics/student-performance`
pub async fn student_performance(
    State(ctx): State<ApiContext>,
    CallerIdentity(caller): CallerIdentity,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let params = QueryParams::new(pairs);
    let filters = parse_filters(&params.filters(), Utc::now());
    let directory = ctx.store.directory().await?;
    let scope = AccessScope::for_student_report(&caller, filters.student_id, &directory)?;

    tracing::debug!(role = ?caller.role, scope = ?scope, "Student report requested");

    let current = ctx.fetch_records(&filters.assignment_query()).await?;
    let previous = match filters.comparison_query() {
        Some(query) => Some(ctx.fetch_records(&query).await?),
        None => None,
    };

    let report = ctx.engine.student_performance(
        &scope,
        &filters,
        &params.leaderboard(),
        current,
        previous,
        &directory,
    );

    if wants_markdown(&headers) {
        Ok(([(header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)], report.to_markdown()).into_response())
    } else {
        Ok(Json(report).into_response())
    }
}

/// `GET /api/v1/analytics/teacher-performance`
pub async fn teacher_performance(
    State(ctx): State<ApiContext>,
    CallerIdentity(caller): CallerIdentity,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let scope = AccessScope::for_teacher_report(&caller)?;
    let filters = parse_filters(&QueryParams::new(pairs).filters(), Utc::now());

    tracing::debug!(role = ?caller.role, scope = ?scope, "Teacher report requested");

    let directory = ctx.store.directory().await?;
    let current = ctx.fetch_records(&filters.assignment_query()).await?;
    let report = ctx
        .engine
        .teacher_performance(&scope, &filters, current, &directory);

    Ok(Json(report).into_response())
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}
