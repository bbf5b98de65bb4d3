//! # VoiceTrack Core
//!
//! Voice-session time tracking and faction attribution.
//!
//! The [`tracker::VoiceTracker`] turns join/leave/switch voice events into
//! per-user and per-faction durations. Everything outside duration
//! accounting (faction lookup, feature flags, notifications, rewards) is
//! reached through the traits in [`collaborators`].

pub mod achievements;
pub mod clock;
pub mod collaborators;
pub mod errors;
pub mod format;
pub mod mock;
pub mod models;
pub mod points;
pub mod rollup;
pub mod settings;
pub mod stats;
pub mod tracker;

pub use errors::{TrackerError, TrackerResult};
pub use tracker::{Transition, TrackerConfig, VoiceTracker};
