//! # GED Analytics Engine
//!
//! This crate turns raw GED submissions into the statistics shown by the
//! reports: document histories, per-type summaries, monthly trends,
//! correlations, document flow, calendars and breakdowns.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O. Inputs are `core-types` records, outputs are
//!   serializable report structs.
//! - **Enrich once:** `AnalyticsEngine::enrich` computes the derived columns a
//!   single time; every other report reads the enriched rows.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: enrichment and descriptive statistics.
//! - `trends`, `correlation`, `flow`, `calendar`, `breakdown`: the other reports.
//! - `AnalyticsError`: the errors that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod breakdown;
pub mod calendar;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod flow;
pub mod report;
pub mod stats;
pub mod trends;

#[cfg(test)]
mod test_support;

// Re-export the key components to create a clean, public-facing API.
pub use breakdown::{Breakdown, BreakdownRow, breakdown};
pub use calendar::{CalendarEntry, calendar};
pub use correlation::{CorrelationMatrix, correlation_matrix};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use flow::{DocumentFlow, FlowLink, FlowNode, FlowStage, document_flow};
pub use report::{DescriptiveReport, SeriesSummary, TypeStatistics};
pub use trends::{Month, MonthlyCount, monthly_counts};
