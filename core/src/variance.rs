//! Variance and adherence review for days that have already happened.
//!
//! Compares what was forecast and recommended with what was observed.
//! Only observed segments are scored; a forecast-only segment has no
//! variance rather than a variance of zero.

use crate::{
    config::PlannerConfig,
    daily_stats::{ratio, DailyStats},
    segment::{Segment, StaffingStatus},
    types::{Headcount, SegmentId},
};
use serde::{Deserialize, Serialize};

/// Points lost per person of difference between actual and recommended.
pub const ADHERENCE_PENALTY_PER_HEAD: u32 = 15;

/// Variance percentages smaller than this (in magnitude) read as flat.
pub const MATERIAL_VARIANCE_PCT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdherenceBand {
    Good,
    Fair,
    Poor,
}

impl AdherenceBand {
    /// > 85 good, 60–85 fair, < 60 poor.
    pub fn from_score(score: u32) -> Self {
        if score > 85 {
            Self::Good
        } else if score >= 60 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// `max(0, 100 - 15 * |actual - recommended|)`.
pub fn adherence_score(actual_total: Headcount, recommended_total: Headcount) -> u32 {
    let diff = actual_total.abs_diff(recommended_total);
    100u32.saturating_sub(diff.saturating_mul(ADHERENCE_PENALTY_PER_HEAD))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentVariance {
    pub segment_id: SegmentId,
    pub time_label: String,
    pub sales_forecast: f64,
    pub actual_sales: f64,
    pub sales_variance: f64,
    pub recommended_total: Headcount,
    pub actual_total: Headcount,
    /// Actual staffing measured against the recommendation.
    pub staffing: StaffingStatus,
    pub adherence_score: u32,
    pub band: AdherenceBand,
}

/// Score one segment. `None` when the segment has not been observed.
pub fn review_segment(segment: &Segment) -> Option<SegmentVariance> {
    let actual_sales = segment.actual_sales()?;
    let actual_total = segment.actual_total()?;
    let recommended_total = segment.recommended_total();
    let score = adherence_score(actual_total, recommended_total);

    Some(SegmentVariance {
        segment_id: segment.id.clone(),
        time_label: segment.time_label.clone(),
        sales_forecast: segment.sales_forecast,
        actual_sales,
        sales_variance: actual_sales - segment.sales_forecast,
        recommended_total,
        actual_total,
        staffing: StaffingStatus::classify(actual_total, recommended_total),
        adherence_score: score,
        band: AdherenceBand::from_score(score),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceTrend {
    Flat,
    Up,
    Down,
}

impl VarianceTrend {
    pub fn of(variance_pct: f64) -> Self {
        if variance_pct.abs() < MATERIAL_VARIANCE_PCT {
            Self::Flat
        } else if variance_pct > 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// How the forecast compared with what actually sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastBias {
    /// Actual sales beat the forecast.
    Conservative,
    /// Actual sales fell short of (or matched) the forecast.
    Aggressive,
}

/// Whether more or fewer labor hours were worked than planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingDirection {
    Higher,
    /// Fewer hours than planned, or exactly the plan.
    Lower,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVariance {
    pub sales_variance_pct: f64,
    pub labor_variance_pct: f64,
    pub actual_sales_per_labor_hour: f64,
    pub target_sales_per_labor_hour: f64,
    pub sales_trend: VarianceTrend,
    pub labor_trend: VarianceTrend,
    pub forecast_bias: ForecastBias,
    pub staffing_direction: StaffingDirection,
    pub average_adherence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReview {
    pub daily: DailyVariance,
    pub segments: Vec<SegmentVariance>,
}

/// Review a fully observed day. `None` when the day carries no actuals.
pub fn review_day(
    segments: &[Segment],
    stats: &DailyStats,
    config: &PlannerConfig,
) -> Option<DayReview> {
    let actuals = stats.actuals.as_ref()?;

    let sales_variance_pct =
        ratio(actuals.actual_total_sales - stats.total_sales, stats.total_sales) * 100.0;
    let labor_variance_pct = ratio(
        actuals.actual_total_labor_hours - stats.total_labor_hours,
        stats.total_labor_hours,
    ) * 100.0;

    let rows: Vec<SegmentVariance> = segments.iter().filter_map(review_segment).collect();
    let score_sum: u64 = rows.iter().map(|r| r.adherence_score as u64).sum();
    let average_adherence = ratio(score_sum as f64, rows.len() as f64);

    Some(DayReview {
        daily: DailyVariance {
            sales_variance_pct,
            labor_variance_pct,
            actual_sales_per_labor_hour: actuals.sales_per_labor_hour(),
            target_sales_per_labor_hour: config.target_sales_per_labor_hour(),
            sales_trend: VarianceTrend::of(sales_variance_pct),
            labor_trend: VarianceTrend::of(labor_variance_pct),
            forecast_bias: if sales_variance_pct > 0.0 {
                ForecastBias::Conservative
            } else {
                ForecastBias::Aggressive
            },
            staffing_direction: if labor_variance_pct > 0.0 {
                StaffingDirection::Higher
            } else {
                StaffingDirection::Lower
            },
            average_adherence,
        },
        segments: rows,
    })
}
