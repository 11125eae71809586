//! Report payloads and their Markdown rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::breakdowns::{ClassRow, SubjectRow};
use crate::distribution::GradeBucket;
use crate::leaderboard::{PaginationInfo, StudentRow};
use crate::recent::AssessmentDigest;
use crate::summary::Summary;
use crate::teachers::TeacherRow;

/// Student-performance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPerformanceReport {
    pub summary: Summary,
    pub grade_distribution: Vec<GradeBucket>,
    pub top_students: Vec<StudentRow>,
    pub at_risk_students: Vec<StudentRow>,
    pub subjects: Vec<SubjectRow>,
    pub classes: Vec<ClassRow>,
    pub recent_assessments: Vec<AssessmentDigest>,
    pub filters_applied: BTreeMap<String, Value>,
    pub pagination: PaginationInfo,
}

/// Teacher-performance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherPerformanceReport {
    pub teachers: Vec<TeacherRow>,
    pub filters_applied: BTreeMap<String, Value>,
}

fn fmt_delta(delta: Option<f64>) -> String {
    delta.map_or_else(|| "n/a".to_string(), |d| format!("{d:+.2}"))
}

impl StudentPerformanceReport {
    /// Render as a Markdown document.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# Student Performance Report\n\n");

        if !self.filters_applied.is_empty() {
            let filters: Vec<_> = self
                .filters_applied
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => format!("{k}={s}"),
                    other => format!("{k}={other}"),
                })
                .collect();
            md.push_str(&format!("**Filters:** {}\n\n", filters.join(", ")));
        }

        let s = &self.summary;
        md.push_str("## Summary\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Average Score | {:.2}% |\n", s.average_score));
        md.push_str(&format!("| Pass Rate | {:.2}% |\n", s.pass_rate));
        md.push_str(&format!("| Completion Rate | {:.2}% |\n", s.completion_rate));
        md.push_str(&format!("| Missing Submissions | {} |\n", s.missing_submissions));
        md.push_str(&format!("| Trend | {} |\n\n", fmt_delta(s.trend_delta)));

        md.push_str("## Grade Distribution\n\n");
        md.push_str("| Band | Count | Share |\n");
        md.push_str("|------|-------|-------|\n");
        for bucket in &self.grade_distribution {
            md.push_str(&format!(
                "| {} | {} | {:.2}% |\n",
                bucket.label, bucket.count, bucket.percentage
            ));
        }
        md.push('\n');

        if !self.top_students.is_empty() {
            let p = &self.pagination;
            md.push_str(&format!(
                "## Students (page {}, {} of {})\n\n",
                p.page,
                self.top_students.len(),
                p.total_students
            ));
            md.push_str("| Student | Class | Average | Pass Rate | Missing | Late | Improvement |\n");
            md.push_str("|---------|-------|---------|-----------|---------|------|-------------|\n");
            for row in &self.top_students {
                md.push_str(&format!(
                    "| {} | {} | {:.2}% | {:.2}% | {} | {} | {} |\n",
                    row.name,
                    row.class_name,
                    row.average_score,
                    row.pass_rate,
                    row.missing_submissions,
                    row.late_count,
                    fmt_delta(row.improvement)
                ));
            }
            md.push('\n');
        }

        if !self.at_risk_students.is_empty() {
            md.push_str("## At Risk\n\n");
            for row in &self.at_risk_students {
                md.push_str(&format!(
                    "- **{}**: average {:.2}%, pass rate {:.2}%, {} missing\n",
                    row.name, row.average_score, row.pass_rate, row.missing_submissions
                ));
            }
            md.push('\n');
        }

        if !self.subjects.is_empty() {
            md.push_str("## Subjects\n\n");
            md.push_str("| Subject | Average | Pass Rate | On Time | Submissions |\n");
            md.push_str("|---------|---------|-----------|---------|-------------|\n");
            for row in &self.subjects {
                md.push_str(&format!(
                    "| {} | {:.2}% | {:.2}% | {:.2}% | {} |\n",
                    row.subject_name,
                    row.average_score,
                    row.pass_rate,
                    row.on_time_rate,
                    row.submission_count
                ));
            }
            md.push('\n');
        }

        if !self.classes.is_empty() {
            md.push_str("## Classes\n\n");
            md.push_str("| Class | Average | Pass Rate | Submissions |\n");
            md.push_str("|-------|---------|-----------|-------------|\n");
            for row in &self.classes {
                md.push_str(&format!(
                    "| {} | {:.2}% | {:.2}% | {} |\n",
                    row.class_name, row.average_score, row.pass_rate, row.submission_count
                ));
            }
            md.push('\n');
        }

        if !self.recent_assessments.is_empty() {
            md.push_str("## Recent Assessments\n\n");
            md.push_str("| Due | Title | Subject | Class | Average | Completion | Std Dev |\n");
            md.push_str("|-----|-------|---------|-------|---------|------------|---------|\n");
            for row in &self.recent_assessments {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {:.2}% | {:.2}% | {:.2} |\n",
                    row.due_date.format("%Y-%m-%d"),
                    row.title,
                    row.subject,
                    row.class_name,
                    row.average_score,
                    row.completion_rate,
                    row.std_dev
                ));
            }
            md.push('\n');
        }

        md
    }
}
