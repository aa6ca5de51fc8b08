//! Minigame controller
//!
//! A pure decision function from indicator/target positions to timed input
//! pulses, parameterized by a named [`ControllerConfig`] profile.

pub mod config;
pub mod controller;
pub mod types;


pub use config::{ControllerConfig, ControllerProfile, REFERENCE_BAR_WIDTH};
pub use controller::{MinigameController, decide, unstable_max_duration};
pub use types::{ActionClass, ActionDecision, MinigameState, Pulse, TAP_PRESS_SECS, clamp01};
