//! # School Analytics
//!
//! Pure reporting engine for academic performance.
//! Takes assignment, submission and enrollment records already fetched for a
//! request and turns them into report payloads. No I/O happens here.
//!
//! ## Pipeline
//!
//! ```text
//! RawFilterParams ──parse_filters──▶ FilterSet ──▶ AssignmentQuery (store)
//!                                                        │
//! Caller ──AccessScope──┐                                ▼
//!                       └──────────▶ Cohort::assemble(RecordSet)
//!                                            │
//!        ┌─────────┬──────────────┬──────────┼──────────┬──────────┐
//!        ▼         ▼              ▼          ▼          ▼          ▼
//!     summary  distribution  leaderboard  subjects   classes    recent
//! ```
//!
//! ## Features
//!
//! - Date-range tokens with an automatic comparison window
//! - Role-based access scoping (admin/staff, teacher, student, parent)
//! - Grade bands, leaderboards with at-risk detection, breakdowns
//! - Teacher performance rollup
//! - Markdown rendering

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

pub mod breakdowns;
pub mod cohort;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod filters;
pub mod leaderboard;
pub mod normalize;
pub mod recent;
pub mod reports;
pub mod scope;
pub mod stats;
pub mod summary;
pub mod teachers;

pub use cohort::{Cohort, RecordSet};
pub use engine::{AnalyticsEngine, EngineConfig};
pub use error::{AnalyticsError, Result};
pub use filters::{parse_filters, FilterSet, RawFilterParams};
pub use leaderboard::LeaderboardParams;
pub use reports::{StudentPerformanceReport, TeacherPerformanceReport};
pub use scope::AccessScope;
