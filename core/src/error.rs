use crate::types::DateKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Segment '{id}' not found on {date}")]
    SegmentNotFound { date: DateKey, id: String },

    #[error("Sales figure must be a finite, non-negative amount, got {value}")]
    InvalidSales { value: f64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration rejected before it is applied. Never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("start hour {start} must be before end hour {end} (max 24)")]
    InvalidHourRange { start: u32, end: u32 },

    #[error("interval of {minutes} minutes is not supported (15, 30 or 60)")]
    UnsupportedInterval { minutes: u32 },

    #[error("role split {group_a}% / {group_b}% does not sum to 100")]
    SplitMismatch { group_a: u32, group_b: u32 },

    #[error("productivity target must be positive, got {value}")]
    NonPositiveProductivity { value: f64 },

    #[error("average shift length must be positive when breaks are enabled, got {hours}")]
    NonPositiveShift { hours: f64 },

    #[error("a {break_minutes} minute break leaves no capacity in a {shift_hours} hour shift")]
    BreakConsumesShift { break_minutes: u32, shift_hours: f64 },

    #[error("average hourly wage must be non-negative, got {value}")]
    NegativeWage { value: f64 },
}

pub type PlanResult<T> = Result<T, PlanError>;
