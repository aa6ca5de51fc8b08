//! Glyph and state detection for the fishing minigame
//!
//! This module turns captured screen regions into game facts: rod state,
//! bite notifications, minigame presence and indicator/target positions.

pub mod config;
pub mod detector;
pub mod locator;
pub mod notification;
pub mod region;
pub mod rod_state;
pub mod segment;
pub mod template;


// Re-export main types and functions
pub use config::{ColorTolerance, DetectionConfig, create_default_config, create_strict_config};
pub use detector::{BarReading, DetectorSet};
pub use locator::{BarLocator, ColorState, LocateSource, Located};
pub use notification::{DetectionMethod, HazardReport, NotificationDetection, NotificationDetector};
pub use region::{DetectionRegion, RegionImage, RegionManager};
pub use rod_state::{RodReading, RodState, RodStateDetector, resolve_rod_state};
pub use template::{TemplateStore, names};
