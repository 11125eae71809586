//! Report assembly.
//!
//! The engine is stateless apart from its configuration: every call takes
//! the records already fetched for the request and returns a finished report.

use tracing::{debug, info};

use school_domain::Directory;

use crate::breakdowns::{class_breakdown, subject_breakdown};
use crate::cohort::{Cohort, RecordSet};
use crate::distribution::grade_distribution;
use crate::filters::FilterSet;
use crate::leaderboard::{build_leaderboard, student_rows, LeaderboardParams};
use crate::recent::{recent_assessments, DEFAULT_RECENT_LIMIT};
use crate::reports::{StudentPerformanceReport, TeacherPerformanceReport};
use crate::scope::AccessScope;
use crate::summary::summarize;
use crate::teachers::teacher_rows;

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// How many recently due assessments to digest
    pub recent_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Builds student- and teacher-performance reports.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: EngineConfig,
}

impl AnalyticsEngine {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the student-performance report.
    ///
    /// `previous` holds the records of the comparison window; pass `None`
    /// when no date window was requested.
    #[must_use]
    pub fn student_performance(
        &self,
        scope: &AccessScope,
        filters: &FilterSet,
        params: &LeaderboardParams,
        current: RecordSet,
        previous: Option<RecordSet>,
        directory: &Directory,
    ) -> StudentPerformanceReport {
        let current = Cohort::assemble(current, scope, filters.student_id, directory);
        let previous =
            previous.map(|records| Cohort::assemble(records, scope, filters.student_id, directory));

        let summary = summarize(&current, previous.as_ref());
        debug!(
            average = summary.average_score,
            completion = summary.completion_rate,
            "Summary computed"
        );

        let grade_distribution = grade_distribution(&current);

        let rows = student_rows(&current, previous.as_ref(), directory);
        let leaderboard = build_leaderboard(rows, params);
        debug!(
            students = leaderboard.pagination.total_students,
            at_risk = leaderboard.at_risk.len(),
            ordering = %params.ordering.as_param(),
            "Leaderboard built"
        );

        let subjects = subject_breakdown(&current, directory);
        let classes = class_breakdown(&current, directory);
        let recent_assessments = recent_assessments(&current, directory, self.config.recent_limit);

        info!(
            scope = ?scope,
            assignments = current.assigned_count(),
            submissions = current.submissions().len(),
            students = leaderboard.pagination.total_students,
            "Student performance report generated"
        );

        StudentPerformanceReport {
            summary,
            grade_distribution,
            top_students: leaderboard.page,
            at_risk_students: leaderboard.at_risk,
            subjects,
            classes,
            recent_assessments,
            filters_applied: filters.applied(),
            pagination: leaderboard.pagination,
        }
    }

    /// Build the teacher-performance report.
    #[must_use]
    pub fn teacher_performance(
        &self,
        scope: &AccessScope,
        filters: &FilterSet,
        current: RecordSet,
        directory: &Directory,
    ) -> TeacherPerformanceReport {
        let cohort = Cohort::assemble(current, scope, filters.student_id, directory);
        let teachers = teacher_rows(&cohort, directory);

        info!(
            scope = ?scope,
            teachers = teachers.len(),
            "Teacher performance report generated"
        );

        TeacherPerformanceReport {
            teachers,
            filters_applied: filters.applied(),
        }
    }
}
