//! Planner session tests — day lifecycle, config application, edits,
//! auto-fill, forecast adjustments and the event log.

use chrono::NaiveDate;
use staffing_core::{
    command::{PlannerCommand, SegmentEdit},
    config::{Interval, PlannerConfig},
    error::{ConfigError, PlanError},
    event::PlanEvent,
    planner::PlannerSession,
    recommendation::recompute,
    segment::StaffingStatus,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 10, 14)
}

fn session() -> PlannerSession {
    init_logging();
    PlannerSession::new("test-session".into(), 42, today(), PlannerConfig::default())
        .expect("default config is valid")
}

#[test]
fn opens_on_today_with_recommendations() {
    let s = session();
    assert_eq!(s.current_date(), today());
    assert_eq!(s.current_segments().len(), 56);
    assert!(s.current_segments().iter().all(|seg| seg.recommended_total() >= 3));
    assert!(s.review().is_none(), "today has not been observed");

    let kinds: Vec<&str> = s.events().iter().map(|e| e.type_name()).collect();
    assert_eq!(kinds, ["day_generated", "recommendations_refreshed"]);
}

#[test]
fn rejects_invalid_initial_config() {
    let config = PlannerConfig { group_a_percentage: 70, ..Default::default() };
    let result = PlannerSession::new("bad".into(), 1, today(), config);
    assert!(matches!(
        result,
        Err(PlanError::Config(ConfigError::SplitMismatch { group_a: 70, group_b: 50 }))
    ));
}

#[test]
fn past_dates_are_observed() {
    let mut s = session();
    s.select_date(date(2026, 10, 13));

    assert!(s.is_historical(s.current_date()));
    assert!(s.current_segments().iter().all(|seg| seg.performance.is_observed()));
    assert!(s.stats().actuals.is_some());

    let review = s.review().expect("past day has a review");
    assert_eq!(review.segments.len(), 56);
}

#[test]
fn future_dates_are_forecast_only() {
    let mut s = session();
    s.select_date(date(2026, 10, 20));
    assert!(s.current_segments().iter().all(|seg| !seg.performance.is_observed()));
    assert!(s.stats().actuals.is_none());
}

/// Actuals come from their own stream, so a past day's forecast has the
/// same shape it would have had as a planned day.
#[test]
fn actuals_do_not_shift_the_forecast() {
    let past = date(2026, 10, 10);
    let mut history = session();
    history.select_date(past);

    let mut planned = PlannerSession::new("other".into(), 42, past, PlannerConfig::default()).unwrap();
    planned.select_date(past);

    let a: Vec<f64> = history.current_segments().iter().map(|s| s.sales_forecast).collect();
    let b: Vec<f64> = planned.current_segments().iter().map(|s| s.sales_forecast).collect();
    assert_eq!(a, b);
}

#[test]
fn selecting_a_loaded_date_keeps_edits() {
    let mut s = session();
    s.edit_segment("block-8-0-15", SegmentEdit::ScheduledA(6)).unwrap();
    s.select_date(date(2026, 10, 15));
    s.select_date(today());
    assert_eq!(s.current_segments()[0].scheduled_a, 6);
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected_and_not_applied() {
    let mut s = session();
    let before = s.config().clone();
    let bad = PlannerConfig { start_hour: 10, end_hour: 9, ..before.clone() };

    let err = s.apply_config(bad).unwrap_err();
    assert!(matches!(err, PlanError::Config(ConfigError::InvalidHourRange { start: 10, end: 9 })));
    assert_eq!(s.config(), &before);
}

#[test]
fn structural_change_regenerates_and_evicts() {
    let mut s = session();
    let yesterday = date(2026, 10, 13);
    s.select_date(yesterday);
    s.select_date(today());
    s.edit_segment("block-8-0-15", SegmentEdit::Notes("training".into())).unwrap();
    s.drain_events();

    let config = PlannerConfig { interval: Interval::Half, ..s.config().clone() };
    s.apply_config(config).unwrap();

    assert_eq!(s.current_segments().len(), 28);
    assert!(s.current_segments().iter().all(|seg| seg.id.ends_with("-30")));
    assert!(s.current_segments().iter().all(|seg| seg.notes.is_empty()));
    assert!(s.segments(yesterday).is_none(), "stale layout kept for another date");

    let events = s.drain_events();
    assert_eq!(events[0], PlanEvent::ConfigApplied { structural: true });
    assert!(matches!(events[1], PlanEvent::DayGenerated { segments: 28, historical: false, .. }));
}

#[test]
fn non_structural_change_recomputes_loaded_days() {
    let mut s = session();
    let yesterday = date(2026, 10, 13);
    s.select_date(yesterday);
    s.select_date(today());

    let config = PlannerConfig { min_staff: 10, ..s.config().clone() };
    s.apply_config(config).unwrap();

    for day in [today(), yesterday] {
        let segments = s.segments(day).expect("day still loaded");
        assert!(segments.iter().all(|seg| seg.recommended_total() >= 10));
        assert!(segments.iter().all(|seg| seg.status == StaffingStatus::Under));
    }
}

#[test]
fn reapplying_the_same_config_is_a_noop() {
    let mut s = session();
    s.drain_events();
    s.apply_config(s.config().clone()).unwrap();
    assert!(s.events().is_empty());
}

#[test]
fn locked_segment_survives_config_change() {
    let mut s = session();
    s.edit_segment("block-12-30-15", SegmentEdit::Locked(true)).unwrap();
    let locked = s.current_segments().iter().find(|seg| seg.locked).unwrap().clone();

    let config = PlannerConfig { target_sales_per_person_per_15_min: 20.0, ..s.config().clone() };
    s.apply_config(config).unwrap();

    let after = s.current_segments().iter().find(|seg| seg.id == locked.id).unwrap();
    assert_eq!(after.recommended_a, locked.recommended_a);
    assert_eq!(after.recommended_b, locked.recommended_b);
}

// ── Edits ─────────────────────────────────────────────────────

#[test]
fn editing_forecast_refreshes_recommendation() {
    let mut s = session();
    s.edit_segment("block-9-0-15", SegmentEdit::SalesForecast(900.0)).unwrap();
    let seg = s.current_segments().iter().find(|seg| seg.id == "block-9-0-15").unwrap();
    // 900 / 45 = 20 people.
    assert_eq!(seg.recommended_total(), 20);
    assert_eq!(seg.status, StaffingStatus::Under);
}

#[test]
fn editing_schedule_updates_status_only() {
    let mut s = session();
    let before = s.current_segments()[0].clone();
    s.edit_segment(&before.id, SegmentEdit::ScheduledA(before.recommended_a)).unwrap();
    s.edit_segment(&before.id, SegmentEdit::ScheduledB(before.recommended_b)).unwrap();

    let after = &s.current_segments()[0];
    assert_eq!(after.recommended_a, before.recommended_a);
    assert_eq!(after.recommended_b, before.recommended_b);
    assert_eq!(after.status, StaffingStatus::OnTarget);
}

#[test]
fn unknown_segment_is_an_error() {
    let mut s = session();
    let err = s.edit_segment("block-3-0-15", SegmentEdit::ScheduledA(1)).unwrap_err();
    assert!(matches!(err, PlanError::SegmentNotFound { .. }));
}

#[test]
fn negative_forecast_edit_is_rejected() {
    let mut s = session();
    let err = s.edit_segment("block-8-0-15", SegmentEdit::SalesForecast(-5.0)).unwrap_err();
    assert!(matches!(err, PlanError::InvalidSales { .. }));
}

/// Headcount is caller input: an absurd value is accepted and reported
/// as overstaffed, never wrapped around.
#[test]
fn extreme_headcount_edit_saturates() {
    let mut s = session();
    s.edit_segment("block-8-0-15", SegmentEdit::ScheduledA(u32::MAX)).unwrap();
    s.edit_segment("block-8-0-15", SegmentEdit::ScheduledB(u32::MAX)).unwrap();

    let seg = &s.current_segments()[0];
    assert_eq!(seg.scheduled_total(), u32::MAX);
    assert_eq!(seg.status, StaffingStatus::Over);

    let hours = s.hourly_summary();
    assert_eq!(hours[0].scheduled_a, u32::MAX);
    assert_eq!(hours[0].status(), StaffingStatus::Over);

    let stats = s.stats();
    assert!(stats.total_labor_hours.is_finite());
    assert!(stats.total_labor_hours > 1e9);
}

// ── Auto-fill and forecast tools ──────────────────────────────

#[test]
fn auto_fill_puts_every_unlocked_segment_on_target() {
    let mut s = session();
    s.edit_segment("block-8-0-15", SegmentEdit::ScheduledA(9)).unwrap();
    s.edit_segment("block-8-0-15", SegmentEdit::Locked(true)).unwrap();
    s.drain_events();

    let filled = s.auto_fill();
    assert_eq!(filled, 55);
    for seg in s.current_segments().iter().filter(|seg| !seg.locked) {
        assert_eq!(seg.status, StaffingStatus::OnTarget);
    }
    assert_eq!(s.current_segments()[0].scheduled_a, 9);

    let kinds: Vec<&str> = s.drain_events().iter().map(|e| e.type_name()).collect();
    assert_eq!(kinds, ["schedule_auto_filled", "recommendations_refreshed"]);
}

#[test]
fn full_auto_fill_scores_full_efficiency() {
    let mut s = session();
    s.auto_fill();
    assert_eq!(s.stats().efficiency_score, 100.0);
}

/// After any operation the stored day is already a fixed point of
/// recompute: nothing is left for a second pass.
#[test]
fn session_leaves_no_pending_recompute() {
    let mut s = session();
    s.auto_fill();
    s.apply_total_sales(12_000.0).unwrap();
    let mut copy = s.current_segments().to_vec();
    assert_eq!(recompute(&mut copy, s.config()), 0);
}

#[test]
fn total_sales_target_is_distributed() {
    let mut s = session();
    let ratio = s.apply_total_sales(10_000.0).unwrap();
    assert!(ratio.is_some());
    let total = s.stats().total_sales;
    // Each of the 56 segments rounds by at most half a unit.
    assert!((total - 10_000.0).abs() <= 28.0, "total {total}");
}

#[test]
fn zeroed_day_cannot_be_rescaled() {
    let mut s = session();
    s.apply_total_sales(0.0).unwrap();
    assert_eq!(s.stats().total_sales, 0.0);
    s.drain_events();

    assert_eq!(s.apply_total_sales(5_000.0).unwrap(), None);
    assert_eq!(s.stats().total_sales, 0.0);
    assert!(s.events().is_empty());
}

#[test]
fn multiplier_raises_the_day() {
    let mut s = session();
    let before = s.stats().total_sales;
    s.apply_sales_multiplier(1.2).unwrap();
    let after = s.stats().total_sales;
    assert!((after - before * 1.2).abs() <= 28.0);
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn commands_deserialize_and_apply() {
    let mut s = session();
    let script = [
        r#"{"cmd":"edit_segment","segment_id":"block-8-0-15","edit":{"field":"scheduled_a","value":5}}"#,
        r#"{"cmd":"set_config","config":{"min_staff":4}}"#,
        r#"{"cmd":"select_date","date":"2026-10-12"}"#,
        r#"{"cmd":"auto_fill"}"#,
        r#"{"cmd":"apply_sales_multiplier","multiplier":0.9}"#,
    ];
    for line in script {
        let command: PlannerCommand = serde_json::from_str(line).expect(line);
        s.handle(command).expect(line);
    }

    assert_eq!(s.config().min_staff, 4);
    assert_eq!(s.current_date(), date(2026, 10, 12));
    assert!(s.review().is_some());
    assert_eq!(s.segments(today()).unwrap()[0].scheduled_a, 5);
}

#[test]
fn rejected_command_leaves_state_untouched() {
    let mut s = session();
    let before = s.current_segments().to_vec();
    let result = s.handle(PlannerCommand::ApplyTotalSales { total: -100.0 });
    assert!(result.is_err());
    assert_eq!(s.current_segments(), before.as_slice());
}
