use crate::{
    config::PlannerConfig,
    types::{DateKey, Headcount, SegmentId},
};
use serde::{Deserialize, Serialize};

/// All caller-issued planner commands.
/// Variants are appended over time — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlannerCommand {
    SelectDate { date: DateKey },
    SetConfig { config: PlannerConfig },
    EditSegment { segment_id: SegmentId, edit: SegmentEdit },
    AutoFill,
    ApplyTotalSales { total: f64 },
    /// 1.10 raises the day's forecast by 10%.
    ApplySalesMultiplier { multiplier: f64 },
}

/// A single-field edit to one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SegmentEdit {
    SalesForecast(f64),
    ScheduledA(Headcount),
    ScheduledB(Headcount),
    Notes(String),
    Locked(bool),
}

impl SegmentEdit {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::SalesForecast(_) => "sales_forecast",
            Self::ScheduledA(_)    => "scheduled_a",
            Self::ScheduledB(_)    => "scheduled_b",
            Self::Notes(_)         => "notes",
            Self::Locked(_)        => "locked",
        }
    }
}
