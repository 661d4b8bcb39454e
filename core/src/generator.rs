//! Segment generation — lays out a day and seeds its sales forecast.
//!
//! The forecast shape is deterministic (baseline plus a lunch and a
//! dinner peak); only the noise is random, and it comes from a seeded
//! stream so the same seed and date always produce the same day.
//!
//! Callers must validate the configuration first: generation assumes
//! `start_hour < end_hour`.

use crate::{
    config::Interval,
    rng::PlanRng,
    segment::{Performance, Segment, StaffingStatus},
    types::Headcount,
};

/// Headcount every freshly generated segment starts with, per group.
pub const INITIAL_SCHEDULED: Headcount = 2;

const BASELINE_SALES: f64 = 40.0;
const LUNCH_PEAK: f64 = 450.0;
const LUNCH_CENTER: f64 = 12.5;
const LUNCH_SPREAD: f64 = 2.0;
const DINNER_PEAK: f64 = 650.0;
const DINNER_CENTER: f64 = 19.0;
const DINNER_SPREAD: f64 = 3.5;
const FORECAST_NOISE: f64 = 0.15;
const FORECAST_ROUNDING: f64 = 5.0;

const ACTUAL_SALES_NOISE: f64 = 0.10;
const GROUP_A_DEVIATION_CHANCE: f64 = 0.2;
const GROUP_B_SURPLUS_CHANCE: f64 = 0.1;

/// Build the segments spanning `[start_hour, end_hour)`.
pub fn generate_day(
    start_hour: u32,
    end_hour: u32,
    interval: Interval,
    rng: &mut PlanRng,
) -> Vec<Segment> {
    let step = interval.minutes() as usize;
    let mut segments = Vec::new();

    for hour in start_hour..end_hour {
        for minute in (0..60).step_by(step) {
            let time_of_day = hour as f64 + minute as f64 / 60.0;
            let noise = rng.uniform(-FORECAST_NOISE, FORECAST_NOISE);
            let expected = expected_sales(time_of_day, interval);
            let sales = (expected * (1.0 + noise)).max(0.0);

            segments.push(Segment {
                id: format!("block-{hour}-{minute}-{}", interval.minutes()),
                time_label: time_label(hour, minute),
                hour_label: hour_label(hour),
                sales_forecast: round_to_multiple(sales, FORECAST_ROUNDING),
                scheduled_a: INITIAL_SCHEDULED,
                scheduled_b: INITIAL_SCHEDULED,
                recommended_a: 0,
                recommended_b: 0,
                performance: Performance::Forecasted,
                status: StaffingStatus::OnTarget,
                notes: String::new(),
                locked: false,
            });
        }
    }

    log::debug!(
        "generated {} segments {start_hour}:00-{end_hour}:00 every {} min",
        segments.len(),
        interval.minutes()
    );
    segments
}

/// Noise-free forecast for a segment starting at `time_of_day` (fractional hours).
pub fn expected_sales(time_of_day: f64, interval: Interval) -> f64 {
    let scale = interval.basis_multiplier();
    let lunch = LUNCH_PEAK * (-(time_of_day - LUNCH_CENTER).powi(2) / LUNCH_SPREAD).exp();
    let dinner = DINNER_PEAK * (-(time_of_day - DINNER_CENTER).powi(2) / DINNER_SPREAD).exp();
    (BASELINE_SALES + lunch + dinner) * scale
}

/// Fill in plausible observed outcomes for a day that has already happened.
///
/// Demo scaffolding: actual sales land within ±10% of the forecast,
/// group A occasionally runs one over or under, group B occasionally
/// runs one over. Headcounts never go negative.
pub fn synthesize_actuals(segments: &mut [Segment], rng: &mut PlanRng) {
    for segment in segments.iter_mut() {
        let sales_factor = 1.0 + rng.uniform(-ACTUAL_SALES_NOISE, ACTUAL_SALES_NOISE);
        let a_delta: i64 = if rng.chance(GROUP_A_DEVIATION_CHANCE) {
            if rng.chance(0.5) { 1 } else { -1 }
        } else {
            0
        };
        let b_delta: i64 = if rng.chance(GROUP_B_SURPLUS_CHANCE) { 1 } else { 0 };

        segment.performance = Performance::Observed {
            actual_sales: (segment.sales_forecast * sales_factor).round(),
            actual_a: offset_headcount(segment.scheduled_a, a_delta),
            actual_b: offset_headcount(segment.scheduled_b, b_delta),
        };
    }
}

fn offset_headcount(base: Headcount, delta: i64) -> Headcount {
    (base as i64 + delta).clamp(0, Headcount::MAX as i64) as Headcount
}

fn round_to_multiple(value: f64, step: f64) -> f64 {
    ((value / step).round() * step).max(0.0)
}

fn clock_hour(hour: u32) -> u32 {
    match hour {
        0 | 24 => 12,
        h if h > 12 => h - 12,
        h => h,
    }
}

fn meridiem(hour: u32) -> &'static str {
    if (12..24).contains(&hour) { "PM" } else { "AM" }
}

/// 12-hour clock label, e.g. `8:00 AM`, `1:45 PM`.
pub fn time_label(hour: u32, minute: u32) -> String {
    format!("{}:{minute:02} {}", clock_hour(hour), meridiem(hour))
}

/// Hour grouping label, e.g. `8 AM`, `12 PM`.
pub fn hour_label(hour: u32) -> String {
    format!("{} {}", clock_hour(hour), meridiem(hour))
}
