//! Lunch-rush position rotation.
//!
//! Builds a day's station schedule from today's roster, staff preferences and
//! the last week of schedules, then hands the result back for storage.

pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod logging;
pub mod roster;
pub mod schedule;
pub mod web;

pub use error::{Result, RotationError};
