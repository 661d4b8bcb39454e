//! The planning session — the controller that owns a set of schedules.
//!
//! RULES:
//!   - The session owns the date → segments map exclusively.
//!     Callers serialize writes; there is one writer per session.
//!   - Every mutating operation finishes with exactly one recompute of
//!     the affected day(s). Reads never recompute.
//!   - Configuration is validated before it replaces the current one.
//!   - A change to the day's structure (hours or interval) regenerates
//!     the selected day and drops every other cached day, since their
//!     segments no longer match the layout. Per-segment edits are lost.
//!   - All randomness flows through the RngBank.
//!   - All state changes are recorded in the event log.

use crate::{
    command::{PlannerCommand, SegmentEdit},
    config::PlannerConfig,
    daily_stats::{compute_daily_stats, DailyStats},
    error::{PlanError, PlanResult},
    event::PlanEvent,
    generator::{generate_day, synthesize_actuals},
    narrative::{analyze_schedule, hourly_summary, AnalysisResult, HourSummary, NarrativeBackend},
    recommendation::{self, recompute},
    rng::{RngBank, StreamSlot},
    segment::Segment,
    types::{DateKey, SessionId},
    variance::{review_day, DayReview},
};
use std::collections::HashMap;

pub struct PlannerSession {
    pub session_id: SessionId,
    config:         PlannerConfig,
    today:          DateKey,
    current_date:   DateKey,
    rng_bank:       RngBank,
    days:           HashMap<DateKey, Vec<Segment>>,
    events:         Vec<PlanEvent>,
}

impl PlannerSession {
    /// Open a session on `today`. Dates before `today` are treated as
    /// history and carry observed outcomes.
    pub fn new(
        session_id: SessionId,
        seed: u64,
        today: DateKey,
        config: PlannerConfig,
    ) -> PlanResult<Self> {
        config.validate()?;
        let mut session = Self {
            session_id,
            config,
            today,
            current_date: today,
            rng_bank: RngBank::new(seed),
            days: HashMap::new(),
            events: Vec::new(),
        };
        session.ensure_day(today);
        Ok(session)
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn today(&self) -> DateKey {
        self.today
    }

    pub fn current_date(&self) -> DateKey {
        self.current_date
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn is_historical(&self, date: DateKey) -> bool {
        date < self.today
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn segments(&self, date: DateKey) -> Option<&[Segment]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn current_segments(&self) -> &[Segment] {
        self.segments(self.current_date).unwrap_or(&[])
    }

    pub fn stats(&self) -> DailyStats {
        compute_daily_stats(self.current_segments(), &self.config)
    }

    /// Variance review of the selected day, if it has been observed.
    pub fn review(&self) -> Option<DayReview> {
        let segments = self.current_segments();
        review_day(segments, &compute_daily_stats(segments, &self.config), &self.config)
    }

    pub fn hourly_summary(&self) -> Vec<HourSummary> {
        hourly_summary(self.current_segments())
    }

    /// Ask `backend` for a narrative of the selected day.
    /// Never fails; see narrative::analyze_schedule.
    pub fn analyze(&self, backend: &dyn NarrativeBackend) -> AnalysisResult {
        analyze_schedule(backend, self.current_segments(), &self.config)
    }

    pub fn events(&self) -> &[PlanEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<PlanEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Mutations ──────────────────────────────────────────────

    pub fn select_date(&mut self, date: DateKey) {
        self.current_date = date;
        self.ensure_day(date);
        log::info!("session {}: selected {date}", self.session_id);
    }

    pub fn apply_config(&mut self, config: PlannerConfig) -> PlanResult<()> {
        config.validate()?;
        if config == self.config {
            return Ok(());
        }
        let structural = self.config.structure_differs(&config);
        self.config = config;
        self.events.push(PlanEvent::ConfigApplied { structural });
        log::info!(
            "session {}: config applied (structural={structural})",
            self.session_id
        );

        if structural {
            self.days.clear();
            self.ensure_day(self.current_date);
        } else {
            let mut dates: Vec<DateKey> = self.days.keys().copied().collect();
            dates.sort();
            for date in dates {
                self.refresh(date);
            }
        }
        Ok(())
    }

    pub fn edit_segment(&mut self, segment_id: &str, edit: SegmentEdit) -> PlanResult<()> {
        if let SegmentEdit::SalesForecast(value) = edit {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(PlanError::InvalidSales { value });
            }
        }
        let date = self.current_date;
        let segment = self
            .days
            .get_mut(&date)
            .and_then(|segments| segments.iter_mut().find(|s| s.id == segment_id))
            .ok_or_else(|| PlanError::SegmentNotFound {
                date,
                id: segment_id.to_string(),
            })?;

        let field = edit.field_name().to_string();
        match edit {
            SegmentEdit::SalesForecast(value) => segment.sales_forecast = value,
            SegmentEdit::ScheduledA(value)    => segment.scheduled_a = value,
            SegmentEdit::ScheduledB(value)    => segment.scheduled_b = value,
            SegmentEdit::Notes(notes)         => segment.notes = notes,
            SegmentEdit::Locked(locked)       => segment.locked = locked,
        }

        self.events.push(PlanEvent::SegmentEdited {
            date,
            segment_id: segment_id.to_string(),
            field,
        });
        self.refresh(date);
        Ok(())
    }

    /// Schedule the recommendation on every unlocked segment of the
    /// selected day. Returns how many segments were filled.
    pub fn auto_fill(&mut self) -> usize {
        let date = self.current_date;
        let filled = self
            .days
            .get_mut(&date)
            .map(|segments| recommendation::auto_fill(segments))
            .unwrap_or(0);
        self.events.push(PlanEvent::ScheduleAutoFilled { date, segments: filled });
        self.refresh(date);
        filled
    }

    /// Rescale the selected day's forecast to sum to `total`.
    /// Returns the ratio applied, or `None` if the day had no sales.
    pub fn apply_total_sales(&mut self, total: f64) -> PlanResult<Option<f64>> {
        let date = self.current_date;
        let Some(segments) = self.days.get_mut(&date) else {
            return Ok(None);
        };
        let applied = recommendation::redistribute_total_sales(segments, total)?;
        self.after_rescale(date, applied);
        Ok(applied)
    }

    pub fn apply_sales_multiplier(&mut self, multiplier: f64) -> PlanResult<Option<f64>> {
        let date = self.current_date;
        let Some(segments) = self.days.get_mut(&date) else {
            return Ok(None);
        };
        let applied = recommendation::scale_sales(segments, multiplier)?;
        self.after_rescale(date, applied);
        Ok(applied)
    }

    pub fn handle(&mut self, command: PlannerCommand) -> PlanResult<()> {
        match command {
            PlannerCommand::SelectDate { date } => self.select_date(date),
            PlannerCommand::SetConfig { config } => self.apply_config(config)?,
            PlannerCommand::EditSegment { segment_id, edit } => {
                self.edit_segment(&segment_id, edit)?
            }
            PlannerCommand::AutoFill => {
                self.auto_fill();
            }
            PlannerCommand::ApplyTotalSales { total } => {
                self.apply_total_sales(total)?;
            }
            PlannerCommand::ApplySalesMultiplier { multiplier } => {
                self.apply_sales_multiplier(multiplier)?;
            }
        }
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────

    fn after_rescale(&mut self, date: DateKey, applied: Option<f64>) {
        if let Some(ratio) = applied {
            self.events.push(PlanEvent::ForecastRescaled { date, ratio });
            self.refresh(date);
        }
    }

    fn ensure_day(&mut self, date: DateKey) {
        if self.days.contains_key(&date) {
            return;
        }
        let historical = self.is_historical(date);
        let segments = self.generate(date, historical);
        self.events.push(PlanEvent::DayGenerated {
            date,
            segments: segments.len(),
            historical,
        });
        self.days.insert(date, segments);
        self.refresh(date);
    }

    fn generate(&self, date: DateKey, historical: bool) -> Vec<Segment> {
        let mut forecast_rng = self.rng_bank.for_date(date, StreamSlot::Forecast);
        let mut segments = generate_day(
            self.config.start_hour,
            self.config.end_hour,
            self.config.interval,
            &mut forecast_rng,
        );
        if historical {
            let mut actuals_rng = self.rng_bank.for_date(date, StreamSlot::Actuals);
            synthesize_actuals(&mut segments, &mut actuals_rng);
        }
        segments
    }

    /// The single recompute step after a logical change to `date`.
    fn refresh(&mut self, date: DateKey) -> usize {
        let Some(segments) = self.days.get_mut(&date) else {
            return 0;
        };
        let changed = recompute(segments, &self.config);
        if changed > 0 {
            self.events.push(PlanEvent::RecommendationsRefreshed { date, changed });
        }
        changed
    }
}
