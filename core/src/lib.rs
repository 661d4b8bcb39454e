//! Staffing planner core.
//!
//! Turns a per-interval sales forecast into recommended headcounts for
//! two role groups, aggregates a day into labor statistics, and
//! reconciles planned against observed staffing after the fact.
//!
//! Leaf-first:
//!   generator       → lays out a day's segments and seeds the forecast
//!   recommendation  → forecast + config → headcount per group, status
//!   daily_stats     → sales, labor hours, cost, SPLH, efficiency
//!   variance        → adherence scores and variance for observed days
//!   narrative       → hourly summary and prose via an external backend
//!   planner         → session controller owning the date → segments map

pub mod command;
pub mod config;
pub mod daily_stats;
pub mod error;
pub mod event;
pub mod generator;
pub mod narrative;
pub mod planner;
pub mod recommendation;
pub mod rng;
pub mod segment;
pub mod types;
pub mod variance;
