//! Recommendation engine — converts a segment's sales forecast into a
//! recommended headcount per role group.
//!
//! ALGORITHM (per unlocked segment):
//!   1. Normalize the forecast to the 15-minute productivity basis.
//!   2. Raw need = normalized sales / target sales per person.
//!   3. Derate by the break capacity factor and round up.
//!   4. Enforce the minimum floor.
//!   5. Split by the group A percentage (half rounds up), B takes the rest.
//!   6. With two or more people, never leave a group with a non-zero
//!      share at zero.
//!
//! RULES:
//!   - The recommendation depends only on the forecast and the config,
//!     never on what is scheduled.
//!   - recompute() compares before writing, so re-running it with
//!     unchanged inputs writes nothing and reports zero changes.
//!   - Locked segments are never touched.

use crate::{
    config::PlannerConfig,
    error::{PlanError, PlanResult},
    segment::{Segment, StaffingStatus},
    types::Headcount,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub group_a: Headcount,
    pub group_b: Headcount,
}

impl Recommendation {
    pub fn total(&self) -> Headcount {
        self.group_a.saturating_add(self.group_b)
    }
}

/// Unrounded headcount needed on the floor for `sales_forecast`.
pub fn raw_headcount(sales_forecast: f64, config: &PlannerConfig) -> f64 {
    let normalized = sales_forecast / config.interval.basis_multiplier();
    normalized / config.target_sales_per_person_per_15_min
}

/// Total people to schedule, after break derating and the minimum floor.
pub fn total_to_schedule(sales_forecast: f64, config: &PlannerConfig) -> Headcount {
    let needed = (raw_headcount(sales_forecast, config) / config.capacity_factor()).ceil();
    let needed = if needed.is_finite() && needed > 0.0 { needed as Headcount } else { 0 };
    needed.max(config.min_staff)
}

/// Split `total` between the two groups.
pub fn split_headcount(total: Headcount, config: &PlannerConfig) -> Recommendation {
    let share = config.group_a_percentage as f64 / 100.0;
    // Non-negative input, so round() is round-half-up here.
    let mut group_a = ((total as f64 * share).round() as Headcount).min(total);
    let mut group_b = total - group_a;

    if total >= 2 {
        if group_a < 1 && config.group_a_percentage > 0 {
            group_a = 1;
            group_b = total - 1;
        }
        if group_b < 1 && config.group_b_percentage > 0 {
            group_b = 1;
            group_a = total - 1;
        }
    }

    Recommendation { group_a, group_b }
}

pub fn recommend(sales_forecast: f64, config: &PlannerConfig) -> Recommendation {
    split_headcount(total_to_schedule(sales_forecast, config), config)
}

/// Refresh recommendations and status on every unlocked segment.
/// Returns the number of segments that actually changed.
pub fn recompute(segments: &mut [Segment], config: &PlannerConfig) -> usize {
    let mut changed = 0;
    for segment in segments.iter_mut().filter(|s| !s.locked) {
        let rec = recommend(segment.sales_forecast, config);
        let status = StaffingStatus::classify(segment.scheduled_total(), rec.total());

        if segment.recommended_a == rec.group_a
            && segment.recommended_b == rec.group_b
            && segment.status == status
        {
            continue;
        }
        segment.recommended_a = rec.group_a;
        segment.recommended_b = rec.group_b;
        segment.status = status;
        changed += 1;
    }
    log::debug!("recompute: {changed}/{} segments changed", segments.len());
    changed
}

/// Copy recommendations into the schedule of every unlocked segment.
/// Returns the number of segments filled. Status is refreshed by the
/// next recompute().
pub fn auto_fill(segments: &mut [Segment]) -> usize {
    let mut filled = 0;
    for segment in segments.iter_mut().filter(|s| !s.locked) {
        segment.scheduled_a = segment.recommended_a;
        segment.scheduled_b = segment.recommended_b;
        filled += 1;
    }
    filled
}

pub fn total_sales(segments: &[Segment]) -> f64 {
    segments.iter().map(|s| s.sales_forecast).sum()
}

/// Scale every forecast so the day sums to roughly `new_total`, keeping
/// the intraday shape. Each forecast is rounded to a whole amount.
///
/// Returns the applied ratio, or `None` when the day has no sales to
/// scale (a no-op). Applies to locked segments too: locking freezes
/// staffing, not the forecast.
pub fn redistribute_total_sales(
    segments: &mut [Segment],
    new_total: f64,
) -> PlanResult<Option<f64>> {
    if !(new_total >= 0.0) || !new_total.is_finite() {
        return Err(PlanError::InvalidSales { value: new_total });
    }
    let current_total = total_sales(segments);
    if current_total == 0.0 {
        return Ok(None);
    }
    let ratio = new_total / current_total;
    for segment in segments.iter_mut() {
        segment.sales_forecast = (segment.sales_forecast * ratio).round();
    }
    log::debug!("redistributed {current_total:.0} -> {new_total:.0} (ratio {ratio:.4})");
    Ok(Some(ratio))
}

/// Percentage adjustment: `multiplier` of 1.10 raises the day by 10%.
pub fn scale_sales(segments: &mut [Segment], multiplier: f64) -> PlanResult<Option<f64>> {
    let target = total_sales(segments) * multiplier;
    redistribute_total_sales(segments, target)
}
