//! Planner configuration.
//!
//! RULE: Configuration is passed explicitly into every core function.
//! Nothing in the core holds it as ambient state.
//! A configuration is validated before it is applied; invalid values
//! are rejected, never clamped into a different meaning.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Productivity is always expressed per person per this many minutes.
pub const PRODUCTIVITY_BASIS_MINUTES: u32 = 15;

/// Segment length. Only the values the planner can lay out evenly
/// within an hour are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Interval {
    Quarter,
    Half,
    Hour,
}

impl Interval {
    pub fn minutes(self) -> u32 {
        match self {
            Self::Quarter => 15,
            Self::Half => 30,
            Self::Hour => 60,
        }
    }

    /// Multiplier from the 15-minute productivity basis to this interval.
    pub fn basis_multiplier(self) -> f64 {
        self.minutes() as f64 / PRODUCTIVITY_BASIS_MINUTES as f64
    }

    /// Fraction of an hour one segment covers.
    pub fn hour_fraction(self) -> f64 {
        self.minutes() as f64 / 60.0
    }
}

impl TryFrom<u32> for Interval {
    type Error = ConfigError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            15 => Ok(Self::Quarter),
            30 => Ok(Self::Half),
            60 => Ok(Self::Hour),
            _ => Err(ConfigError::UnsupportedInterval { minutes }),
        }
    }
}

impl From<Interval> for u32 {
    fn from(interval: Interval) -> Self {
        interval.minutes()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Sales one person can handle in 15 minutes.
    pub target_sales_per_person_per_15_min: f64,
    pub interval: Interval,
    /// Minimum total headcount on the floor at any time.
    pub min_staff: u32,
    pub group_a_percentage: u32,
    pub group_b_percentage: u32,
    pub average_hourly_wage: f64,
    pub start_hour: u32,
    pub end_hour: u32,
    pub enable_breaks: bool,
    pub break_duration_minutes: u32,
    pub average_shift_length_hours: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            target_sales_per_person_per_15_min: 45.0,
            interval: Interval::Quarter,
            min_staff: 3,
            group_a_percentage: 50,
            group_b_percentage: 50,
            average_hourly_wage: 16.50,
            start_hour: 8,
            end_hour: 22,
            enable_breaks: false,
            break_duration_minutes: 30,
            average_shift_length_hours: 6.0,
        }
    }
}

impl PlannerConfig {
    /// Load a configuration from a JSON file. Missing fields take
    /// their default values; the result is validated.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: PlannerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(ConfigError::InvalidHourRange {
                start: self.start_hour,
                end: self.end_hour,
            });
        }
        if self.group_a_percentage.checked_add(self.group_b_percentage) != Some(100) {
            return Err(ConfigError::SplitMismatch {
                group_a: self.group_a_percentage,
                group_b: self.group_b_percentage,
            });
        }
        if !(self.target_sales_per_person_per_15_min > 0.0) {
            return Err(ConfigError::NonPositiveProductivity {
                value: self.target_sales_per_person_per_15_min,
            });
        }
        if !(self.average_hourly_wage >= 0.0) {
            return Err(ConfigError::NegativeWage {
                value: self.average_hourly_wage,
            });
        }
        if self.enable_breaks {
            if !(self.average_shift_length_hours > 0.0) {
                return Err(ConfigError::NonPositiveShift {
                    hours: self.average_shift_length_hours,
                });
            }
            if self.capacity_loss_ratio() >= 1.0 {
                return Err(ConfigError::BreakConsumesShift {
                    break_minutes: self.break_duration_minutes,
                    shift_hours: self.average_shift_length_hours,
                });
            }
        }
        Ok(())
    }

    /// Share of scheduled time lost to breaks. Zero when breaks are off.
    pub fn capacity_loss_ratio(&self) -> f64 {
        if self.enable_breaks {
            self.break_duration_minutes as f64 / (self.average_shift_length_hours * 60.0)
        } else {
            0.0
        }
    }

    /// Share of scheduled headcount actually available to serve.
    /// Strictly positive for any validated configuration.
    pub fn capacity_factor(&self) -> f64 {
        1.0 - self.capacity_loss_ratio()
    }

    /// Sales-per-labor-hour target implied by the 15-minute productivity.
    pub fn target_sales_per_labor_hour(&self) -> f64 {
        self.target_sales_per_person_per_15_min * (60 / PRODUCTIVITY_BASIS_MINUTES) as f64
    }

    /// True when `other` lays the day out differently (hours or interval),
    /// which invalidates existing segments.
    pub fn structure_differs(&self, other: &PlannerConfig) -> bool {
        self.start_hour != other.start_hour
            || self.end_hour != other.end_hour
            || self.interval != other.interval
    }
}
