//! Deterministic random number generation.
//!
//! RULE: Nothing in the planner may call any platform RNG.
//! All randomness flows through PlanRng instances derived
//! from the session's master seed.
//!
//! Each (date, stream) pair gets its own RNG, seeded from
//! master_seed XOR mixed(day index) XOR mixed(stream slot). This means:
//!   - Regenerating one date never shifts another date's numbers.
//!   - Synthesizing actuals never shifts the forecast stream, so a
//!     historical day and a planned day share the same forecast shape.

use crate::types::DateKey;
use chrono::Datelike;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single stream.
pub struct PlanRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl PlanRng {
    pub fn new(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a float in [low, high).
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Source of every per-date RNG stream for one session.
#[derive(Debug, Clone)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_date(&self, date: DateKey, slot: StreamSlot) -> PlanRng {
        let day = date.num_days_from_ce() as i64 as u64;
        let derived_seed = self.master_seed
            ^ day.wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ (slot as u64 + 1).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        PlanRng::new(derived_seed).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries — only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Forecast = 0,
    Actuals = 1,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Forecast => "forecast",
            Self::Actuals => "actuals",
        }
    }
}
