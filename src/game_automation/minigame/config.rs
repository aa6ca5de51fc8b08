//! Controller tuning profiles

use crate::error::{ReelError, ReelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Bar width in pixels the multipliers were tuned on
pub const REFERENCE_BAR_WIDTH: f64 = 967.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerProfile {
    /// Wide deadzones, boundary pulses of different strength per side
    #[default]
    Ordinary,
    /// Narrow deadzones and boundaries, softer stabilize taps
    Alternate,
}

impl FromStr for ControllerProfile {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordinary" => Ok(ControllerProfile::Ordinary),
            "alternate" => Ok(ControllerProfile::Alternate),
            other => Err(ReelError::InvalidConfig {
                reason: format!("unknown profile '{other}' (expected ordinary or alternate)"),
            }),
        }
    }
}

impl fmt::Display for ControllerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerProfile::Ordinary => write!(f, "ordinary"),
            ControllerProfile::Alternate => write!(f, "alternate"),
        }
    }
}

/// Tunable constants of the minigame controller.
///
/// Positions and distances are fractions of the bar width; durations are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub profile: ControllerProfile,
    /// Rod control stat, selects the unstable duration cap
    pub control: f64,
    pub white_bar_half_width: f64,
    /// Duration of a boundary pulse
    pub side_delay: f64,

    pub stable_right_multiplier: f64,
    pub stable_right_division: f64,
    pub stable_left_multiplier: f64,
    pub stable_left_division: f64,
    pub unstable_right_multiplier: f64,
    pub unstable_right_division: f64,
    pub unstable_left_multiplier: f64,
    pub unstable_left_division: f64,

    pub pixel_scaling: f64,
    pub deadzone: f64,
    pub deadzone2: f64,
    pub max_left_bar: f64,
    pub max_right_bar: f64,
    pub max_intensity: f64,

    pub stabilize_intensity: f64,
    /// Period of one stabilize tap
    pub stabilize_interval: f64,
    pub boundary_right_intensity: f64,
    pub boundary_left_intensity: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::ordinary()
    }
}

impl ControllerConfig {
    pub fn ordinary() -> Self {
        Self {
            profile: ControllerProfile::Ordinary,
            control: 0.0,
            white_bar_half_width: 0.03,
            side_delay: 0.4,
            stable_right_multiplier: 2.36,
            stable_right_division: 1.55,
            stable_left_multiplier: 1.211,
            stable_left_division: 1.12,
            unstable_right_multiplier: 2.665,
            unstable_right_division: 1.5,
            unstable_left_multiplier: 2.19,
            unstable_left_division: 1.0,
            pixel_scaling: 1.0,
            deadzone: 0.05,
            deadzone2: 0.15,
            max_left_bar: 0.25,
            max_right_bar: 0.75,
            max_intensity: 1.5,
            stabilize_intensity: 0.8,
            stabilize_interval: 0.178,
            boundary_right_intensity: 1.1,
            boundary_left_intensity: 0.9,
        }
    }

    pub fn alternate() -> Self {
        Self {
            profile: ControllerProfile::Alternate,
            white_bar_half_width: 0.02,
            deadzone: 0.02,
            deadzone2: 0.04,
            max_left_bar: 0.15,
            max_right_bar: 0.85,
            max_intensity: 1.0,
            stabilize_intensity: 0.1,
            stabilize_interval: 0.01,
            boundary_right_intensity: 1.0,
            boundary_left_intensity: 1.0,
            ..Self::ordinary()
        }
    }

    pub fn for_profile(profile: ControllerProfile) -> Self {
        match profile {
            ControllerProfile::Ordinary => Self::ordinary(),
            ControllerProfile::Alternate => Self::alternate(),
        }
    }

    pub fn with_control(mut self, control: f64) -> Self {
        self.control = control;
        self
    }

    /// Pixel scaling for a bar measured `bar_width_px` wide on screen
    pub fn calibrated_for_width(mut self, bar_width_px: u32) -> Self {
        if bar_width_px > 0 {
            self.pixel_scaling = bar_width_px as f64 / REFERENCE_BAR_WIDTH;
        }
        self
    }

    /// Check the invariants `decide` relies on
    pub fn validate(&self) -> ReelResult<()> {
        let invalid = |reason: String| Err(ReelError::InvalidConfig { reason });

        let all = [
            ("control", self.control),
            ("white_bar_half_width", self.white_bar_half_width),
            ("side_delay", self.side_delay),
            ("pixel_scaling", self.pixel_scaling),
            ("deadzone", self.deadzone),
            ("deadzone2", self.deadzone2),
            ("max_intensity", self.max_intensity),
            ("stabilize_interval", self.stabilize_interval),
        ];
        if let Some((name, value)) = all.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return invalid(format!("{name} must be a finite non-negative number, got {value}"));
        }
        if self.white_bar_half_width <= 0.0 {
            return invalid("white_bar_half_width must be positive".to_string());
        }
        let divisions = [
            self.stable_right_division,
            self.stable_left_division,
            self.unstable_right_division,
            self.unstable_left_division,
        ];
        if divisions.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return invalid("divisions must be positive".to_string());
        }
        if self.deadzone2 <= self.deadzone {
            return invalid(format!(
                "deadzone2 ({}) must exceed deadzone ({})",
                self.deadzone2, self.deadzone
            ));
        }
        if self.max_left_bar >= self.max_right_bar {
            return invalid(format!(
                "max_left_bar ({}) must be below max_right_bar ({})",
                self.max_left_bar, self.max_right_bar
            ));
        }
        if !(0.0..=1.0).contains(&self.max_left_bar) || !(0.0..=1.0).contains(&self.max_right_bar) {
            return invalid("bar boundaries must lie within [0, 1]".to_string());
        }
        Ok(())
    }

    /// Overlay the fields present in a JSON object onto this config
    pub fn overlay_json(self, json: &str) -> Result<Self, serde_json::Error> {
        let mut base = serde_json::to_value(&self)?;
        let patch: serde_json::Value = serde_json::from_str(json)?;
        if let (Some(base), serde_json::Value::Object(patch)) = (base.as_object_mut(), patch) {
            for (key, value) in patch {
                base.insert(key, value);
            }
        }
        serde_json::from_value(base)
    }

    /// Read a JSON override file and apply it with [`Self::overlay_json`]
    pub fn overlay_file(self, path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ReelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.overlay_json(&text).map_err(|source| ReelError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_validate() {
        assert!(ControllerConfig::ordinary().validate().is_ok());
        assert!(ControllerConfig::alternate().validate().is_ok());
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(
            "Alternate".parse::<ControllerProfile>().unwrap(),
            ControllerProfile::Alternate
        );
        assert_eq!(
            " ordinary ".parse::<ControllerProfile>().unwrap(),
            ControllerProfile::Ordinary
        );
        assert!("turbo".parse::<ControllerProfile>().is_err());
        assert_eq!(ControllerProfile::Alternate.to_string(), "alternate");
    }

    #[test]
    fn test_deadzone_order_enforced() {
        let config = ControllerConfig {
            deadzone: 0.2,
            deadzone2: 0.1,
            ..ControllerConfig::ordinary()
        };
        assert!(matches!(config.validate(), Err(ReelError::InvalidConfig { .. })));
    }

    #[test]
    fn test_boundary_order_enforced() {
        let config = ControllerConfig {
            max_left_bar: 0.8,
            max_right_bar: 0.2,
            ..ControllerConfig::ordinary()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_division_rejected() {
        let config = ControllerConfig {
            unstable_left_division: 0.0,
            ..ControllerConfig::ordinary()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_calibration_against_reference_width() {
        let config = ControllerConfig::ordinary().calibrated_for_width(1934);
        assert!((config.pixel_scaling - 2.0).abs() < 1e-12);
        let unchanged = ControllerConfig::ordinary().calibrated_for_width(0);
        assert_eq!(unchanged.pixel_scaling, 1.0);
    }

    #[test]
    fn test_overlay_keeps_profile_values() {
        let config = ControllerConfig::alternate()
            .overlay_json(r#"{ "control": 0.2, "side_delay": 0.3 }"#)
            .unwrap();
        assert_eq!(config.control, 0.2);
        assert_eq!(config.side_delay, 0.3);
        assert_eq!(config.deadzone, 0.02);
        assert_eq!(config.profile, ControllerProfile::Alternate);
    }

    #[test]
    fn test_overlay_rejects_bad_json() {
        assert!(ControllerConfig::ordinary().overlay_json("{ control: }").is_err());
        assert!(
            ControllerConfig::ordinary()
                .overlay_json(r#"{ "deadzone": "wide" }"#)
                .is_err()
        );
    }
}
