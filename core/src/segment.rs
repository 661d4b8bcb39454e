//! The segment — the atomic, schedulable unit of a day.

use crate::types::{Headcount, SegmentId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Aggregate staffing status of a segment: total scheduled vs total recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingStatus {
    OnTarget,
    Under,
    Over,
}

impl StaffingStatus {
    /// Classify `staffed` people against a `required` headcount.
    pub fn classify(staffed: Headcount, required: Headcount) -> Self {
        match staffed.cmp(&required) {
            Ordering::Equal => Self::OnTarget,
            Ordering::Less => Self::Under,
            Ordering::Greater => Self::Over,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTarget => "On Target",
            Self::Under => "Understaffed",
            Self::Over => "Overstaffed",
        }
    }
}

/// What is known about how a segment actually went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Performance {
    /// Not yet observed.
    Forecasted,
    Observed {
        actual_sales: f64,
        actual_a: Headcount,
        actual_b: Headcount,
    },
}

impl Performance {
    pub fn is_observed(&self) -> bool {
        matches!(self, Self::Observed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    /// e.g. "10:15 AM"
    pub time_label: String,
    /// e.g. "10 AM"; display grouping only.
    pub hour_label: String,
    pub sales_forecast: f64,

    pub scheduled_a: Headcount,
    pub scheduled_b: Headcount,

    // Derived by the recommendation engine, never set by a user.
    pub recommended_a: Headcount,
    pub recommended_b: Headcount,

    pub performance: Performance,
    pub status: StaffingStatus,
    pub notes: String,
    pub locked: bool,
}

impl Segment {
    // Headcounts are caller input; sums saturate rather than overflow.
    pub fn scheduled_total(&self) -> Headcount {
        self.scheduled_a.saturating_add(self.scheduled_b)
    }

    pub fn recommended_total(&self) -> Headcount {
        self.recommended_a.saturating_add(self.recommended_b)
    }

    /// Observed headcount, if the segment has been observed.
    pub fn actual_total(&self) -> Option<Headcount> {
        match self.performance {
            Performance::Observed { actual_a, actual_b, .. } => {
                Some(actual_a.saturating_add(actual_b))
            }
            Performance::Forecasted => None,
        }
    }

    pub fn actual_sales(&self) -> Option<f64> {
        match self.performance {
            Performance::Observed { actual_sales, .. } => Some(actual_sales),
            Performance::Forecasted => None,
        }
    }
}
