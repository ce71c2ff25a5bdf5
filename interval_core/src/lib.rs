#![forbid(unsafe_code)]

//! Core domain model and timer engine for the interval workout timer.
//!
//! This crate provides:
//! - Domain types (presets, sets, steps)
//! - Schedule builder
//! - Timer engine with injected clock and frame scheduling
//! - Derived display state
//! - Preset persistence and the application session

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod schedule;
pub mod clock;
pub mod frames;
pub mod display;
pub mod listener;
pub mod engine;
pub mod presets;
pub mod store;
pub mod session;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use schedule::{build_schedule, Schedule};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use frames::{FrameHandle, FrameQueue, FrameScheduler, PacedFrames};
pub use display::{format_clock, DisplayState};
pub use listener::{TimerEvent, TimerListener};
pub use engine::IntervalTimer;
pub use presets::default_presets;
pub use store::{JsonPresetStore, PresetStore};
pub use session::Session;
