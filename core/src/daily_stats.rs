//! Daily aggregation — folds a day's segments into summary statistics.
//!
//! Derived on every read and never stored: the segment list is the
//! single source of truth. Every ratio guards its denominator and
//! reports 0 instead of dividing by zero.

use crate::{
    config::PlannerConfig,
    segment::{Performance, Segment, StaffingStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub total_sales: f64,
    pub total_labor_hours: f64,
    pub total_labor_cost: f64,
    pub labor_percentage: f64,
    pub sales_per_labor_hour: f64,
    /// Share of segments on target, 0–100.
    pub efficiency_score: f64,
    pub break_impact_hours: f64,
    pub break_impact_cost: f64,
    /// Present only when every segment of the day has been observed.
    pub actuals: Option<ActualTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualTotals {
    pub actual_total_sales: f64,
    pub actual_total_labor_hours: f64,
}

impl ActualTotals {
    pub fn sales_per_labor_hour(&self) -> f64 {
        ratio(self.actual_total_sales, self.actual_total_labor_hours)
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn compute_daily_stats(segments: &[Segment], config: &PlannerConfig) -> DailyStats {
    let hour_fraction = config.interval.hour_fraction();

    let total_sales: f64 = segments.iter().map(|s| s.sales_forecast).sum();
    let scheduled_heads: u64 = segments.iter().map(|s| s.scheduled_total() as u64).sum();
    let total_labor_hours = scheduled_heads as f64 * hour_fraction;

    let break_impact_hours = total_labor_hours * config.capacity_loss_ratio();
    let break_impact_cost = break_impact_hours * config.average_hourly_wage;

    let total_labor_cost = total_labor_hours * config.average_hourly_wage;
    let labor_percentage = ratio(total_labor_cost, total_sales) * 100.0;
    let sales_per_labor_hour = ratio(total_sales, total_labor_hours);

    let on_target = segments
        .iter()
        .filter(|s| s.status == StaffingStatus::OnTarget)
        .count();
    let efficiency_score = ratio(on_target as f64, segments.len() as f64) * 100.0;

    DailyStats {
        total_sales,
        total_labor_hours,
        total_labor_cost,
        labor_percentage,
        sales_per_labor_hour,
        efficiency_score,
        break_impact_hours,
        break_impact_cost,
        actuals: actual_totals(segments, hour_fraction),
    }
}

fn actual_totals(segments: &[Segment], hour_fraction: f64) -> Option<ActualTotals> {
    if segments.is_empty() {
        return None;
    }
    let mut sales = 0.0;
    let mut heads: u64 = 0;
    for segment in segments {
        match segment.performance {
            Performance::Observed { actual_sales, actual_a, actual_b } => {
                sales += actual_sales;
                heads += actual_a as u64 + actual_b as u64;
            }
            Performance::Forecasted => return None,
        }
    }
    Some(ActualTotals {
        actual_total_sales: sales,
        actual_total_labor_hours: heads as f64 * hour_fraction,
    })
}
