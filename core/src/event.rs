//! The planner's event log.
//!
//! Every mutating operation on a PlannerSession records what it did.
//! Callers drain the log to drive UI refreshes, audit trails or replay.

use crate::types::{DateKey, SegmentId};
use serde::{Deserialize, Serialize};

/// Variants are appended over time — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanEvent {
    DayGenerated {
        date: DateKey,
        segments: usize,
        historical: bool,
    },
    ConfigApplied {
        structural: bool,
    },
    SegmentEdited {
        date: DateKey,
        segment_id: SegmentId,
        field: String,
    },
    ScheduleAutoFilled {
        date: DateKey,
        segments: usize,
    },
    ForecastRescaled {
        date: DateKey,
        ratio: f64,
    },
    RecommendationsRefreshed {
        date: DateKey,
        changed: usize,
    },
}

impl PlanEvent {
    /// Stable name for logs and the runner's output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DayGenerated { .. }             => "day_generated",
            Self::ConfigApplied { .. }            => "config_applied",
            Self::SegmentEdited { .. }            => "segment_edited",
            Self::ScheduleAutoFilled { .. }       => "schedule_auto_filled",
            Self::ForecastRescaled { .. }         => "forecast_rescaled",
            Self::RecommendationsRefreshed { .. } => "recommendations_refreshed",
        }
    }
}
