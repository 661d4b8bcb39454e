//! Shared primitive types used across the planner.

use chrono::NaiveDate;

/// Headcount for a single role group in a single segment.
pub type Headcount = u32;

/// A stable segment identifier, e.g. `block-8-15-15`.
pub type SegmentId = String;

/// The key a day's schedule is stored under.
pub type DateKey = NaiveDate;

/// The canonical planning-session identifier.
pub type SessionId = String;
