//! Variance and adherence tests for observed days.

use staffing_core::{
    config::PlannerConfig,
    daily_stats::compute_daily_stats,
    segment::{Performance, Segment, StaffingStatus},
    variance::{
        adherence_score, review_day, review_segment, AdherenceBand, ForecastBias, StaffingDirection,
        VarianceTrend,
    },
};

fn segment(id: &str, forecast: f64, scheduled: (u32, u32), recommended: (u32, u32)) -> Segment {
    Segment {
        id: id.into(),
        time_label: "12:00 PM".into(),
        hour_label: "12 PM".into(),
        sales_forecast: forecast,
        scheduled_a: scheduled.0,
        scheduled_b: scheduled.1,
        recommended_a: recommended.0,
        recommended_b: recommended.1,
        performance: Performance::Forecasted,
        status: StaffingStatus::OnTarget,
        notes: String::new(),
        locked: false,
    }
}

fn observe(mut s: Segment, actual_sales: f64, actual_a: u32, actual_b: u32) -> Segment {
    s.performance = Performance::Observed { actual_sales, actual_a, actual_b };
    s
}

/// Scheduled 3/1 against a 2/2 recommendation: the totals match, so
/// a matching actual total scores 100.
#[test]
fn matching_totals_score_perfectly() {
    let s = observe(segment("a", 180.0, (3, 1), (2, 2)), 180.0, 3, 1);
    let row = review_segment(&s).expect("observed segment");
    assert_eq!(row.adherence_score, 100);
    assert_eq!(row.band, AdherenceBand::Good);
    assert_eq!(row.staffing, StaffingStatus::OnTarget);
}

#[test]
fn adherence_penalizes_fifteen_per_person() {
    assert_eq!(adherence_score(4, 4), 100);
    assert_eq!(adherence_score(5, 4), 85);
    assert_eq!(adherence_score(3, 4), 85);
    assert_eq!(adherence_score(6, 4), 70);
    assert_eq!(adherence_score(7, 4), 55);
}

#[test]
fn adherence_never_goes_negative() {
    assert_eq!(adherence_score(11, 4), 0);
    assert_eq!(adherence_score(0, 40), 0);
    assert_eq!(adherence_score(u32::MAX, 0), 0);
}

#[test]
fn band_thresholds() {
    assert_eq!(AdherenceBand::from_score(100), AdherenceBand::Good);
    assert_eq!(AdherenceBand::from_score(86), AdherenceBand::Good);
    assert_eq!(AdherenceBand::from_score(85), AdherenceBand::Fair);
    assert_eq!(AdherenceBand::from_score(60), AdherenceBand::Fair);
    assert_eq!(AdherenceBand::from_score(59), AdherenceBand::Poor);
    assert_eq!(AdherenceBand::from_score(0), AdherenceBand::Poor);
}

#[test]
fn segment_sales_variance_and_direction() {
    let over = observe(segment("o", 100.0, (2, 2), (2, 2)), 112.0, 3, 3);
    let row = review_segment(&over).unwrap();
    assert_eq!(row.sales_variance, 12.0);
    assert_eq!(row.staffing, StaffingStatus::Over);
    assert_eq!(row.adherence_score, 70);
    assert_eq!(row.band, AdherenceBand::Fair);

    let under = observe(segment("u", 100.0, (2, 2), (2, 2)), 90.0, 1, 1);
    let row = review_segment(&under).unwrap();
    assert_eq!(row.sales_variance, -10.0);
    assert_eq!(row.staffing, StaffingStatus::Under);
}

#[test]
fn forecast_only_segment_has_no_review() {
    assert!(review_segment(&segment("f", 100.0, (2, 2), (2, 2))).is_none());
}

#[test]
fn daily_review_of_observed_day() {
    let config = PlannerConfig::default();
    let segments = vec![
        observe(segment("s1", 100.0, (2, 2), (2, 2)), 110.0, 2, 3),
        observe(segment("s2", 100.0, (2, 2), (2, 2)), 100.0, 2, 2),
    ];
    let stats = compute_daily_stats(&segments, &config);
    let review = review_day(&segments, &stats, &config).expect("observed day");
    let daily = &review.daily;

    // 210 actual vs 200 forecast.
    assert!((daily.sales_variance_pct - 5.0).abs() < 1e-9);
    // 2.25 actual hours vs 2.0 planned.
    assert!((daily.labor_variance_pct - 12.5).abs() < 1e-9);
    assert!((daily.actual_sales_per_labor_hour - 210.0 / 2.25).abs() < 1e-9);
    assert_eq!(daily.target_sales_per_labor_hour, 180.0);
    assert_eq!(daily.forecast_bias, ForecastBias::Conservative);
    assert_eq!(daily.sales_trend, VarianceTrend::Up);
    assert_eq!(daily.labor_trend, VarianceTrend::Up);
    assert_eq!(daily.staffing_direction, StaffingDirection::Higher);
    assert!((daily.average_adherence - 92.5).abs() < 1e-9);

    assert_eq!(review.segments.len(), 2);
    assert_eq!(review.segments[0].adherence_score, 85);
    assert_eq!(review.segments[1].adherence_score, 100);
}

#[test]
fn short_sales_read_as_aggressive_forecast() {
    let config = PlannerConfig::default();
    let segments = vec![observe(segment("s", 200.0, (2, 2), (2, 2)), 150.0, 2, 2)];
    let stats = compute_daily_stats(&segments, &config);
    let review = review_day(&segments, &stats, &config).unwrap();
    assert_eq!(review.daily.forecast_bias, ForecastBias::Aggressive);
    assert_eq!(review.daily.sales_trend, VarianceTrend::Down);
    assert_eq!(review.daily.labor_trend, VarianceTrend::Flat);
    assert_eq!(review.daily.staffing_direction, StaffingDirection::Lower);
}

/// Zero planned hours yields a zero variance, not a division fault.
#[test]
fn zero_planned_hours_yields_zero_labor_variance() {
    let config = PlannerConfig::default();
    let segments = vec![observe(segment("z", 0.0, (0, 0), (0, 0)), 50.0, 1, 1)];
    let stats = compute_daily_stats(&segments, &config);
    let review = review_day(&segments, &stats, &config).unwrap();
    assert_eq!(review.daily.labor_variance_pct, 0.0);
    assert_eq!(review.daily.sales_variance_pct, 0.0);
}

#[test]
fn variance_trend_threshold() {
    assert_eq!(VarianceTrend::of(1.99), VarianceTrend::Flat);
    assert_eq!(VarianceTrend::of(-1.99), VarianceTrend::Flat);
    assert_eq!(VarianceTrend::of(2.0), VarianceTrend::Up);
    assert_eq!(VarianceTrend::of(-2.0), VarianceTrend::Down);
}

#[test]
fn unobserved_day_has_no_review() {
    let config = PlannerConfig::default();
    let segments = vec![segment("f", 100.0, (2, 2), (2, 2))];
    let stats = compute_daily_stats(&segments, &config);
    assert!(review_day(&segments, &stats, &config).is_none());
}
