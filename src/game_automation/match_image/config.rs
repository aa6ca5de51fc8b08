//! Thresholds and tolerances for the detectors

use crate::template_matching::{QUICK_SCALES, default_scales};
use serde::{Deserialize, Serialize};

/// RGB reference color with a per-channel tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorTolerance {
    pub rgb: [u8; 3],
    pub tolerance: u8,
}

impl ColorTolerance {
    pub const fn new(rgb: [u8; 3], tolerance: u8) -> Self {
        Self { rgb, tolerance }
    }

    pub fn matches(&self, pixel: [u8; 3]) -> bool {
        self.rgb
            .iter()
            .zip(pixel.iter())
            .all(|(&want, &got)| want.abs_diff(got) <= self.tolerance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Scales swept when matching large templates (rod icons, bite glyph)
    pub scales: Vec<f64>,
    /// Scales tried for the small fish-direction glyphs
    pub glyph_scales: Vec<f64>,
    /// Glyph match accepted without color fallback
    pub glyph_threshold: f32,

    pub rod_disengaged_threshold: f32,
    pub rod_engaged_threshold: f32,

    /// Notification template threshold outside hazard mode
    pub notify_template_threshold: f32,
    pub hazard_template_threshold: f32,
    pub shape_threshold: f32,
    pub hazard_shape_threshold: f32,
    pub color_threshold: f32,
    /// Largest hazard blob above this many pixels switches to hazard mode
    pub hazard_min_pixels: u32,
    /// ... or above this fraction of the searched region
    pub hazard_min_fraction: f32,

    pub target_default_color: ColorTolerance,
    pub target_hover_color: ColorTolerance,
    pub min_target_area: u32,

    /// Accepted width:height range of an indicator blob
    pub indicator_aspect: (f32, f32),
    pub min_indicator_area: u32,
    pub indicator_max_saturation: u8,
    /// Brightness threshold is `peak - offset`, clamped to [floor, ceiling]
    pub indicator_value_floor: u8,
    pub indicator_value_ceiling: u8,
    pub indicator_value_offset: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            scales: default_scales(),
            glyph_scales: QUICK_SCALES.to_vec(),
            glyph_threshold: 0.6,
            rod_disengaged_threshold: 0.5,
            rod_engaged_threshold: 0.5,
            notify_template_threshold: 0.7,
            hazard_template_threshold: 0.6,
            shape_threshold: 0.6,
            hazard_shape_threshold: 0.5,
            color_threshold: 0.5,
            hazard_min_pixels: 2000,
            hazard_min_fraction: 0.4,
            target_default_color: ColorTolerance::new([91, 75, 67], 8),
            target_hover_color: ColorTolerance::new([0, 180, 0], 30),
            min_target_area: 10,
            indicator_aspect: (0.5, 10.0),
            min_indicator_area: 5,
            indicator_max_saturation: 30,
            indicator_value_floor: 160,
            indicator_value_ceiling: 200,
            indicator_value_offset: 30,
        }
    }
}

impl DetectionConfig {
    /// Reject configurations the detectors cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.scales.is_empty() || self.glyph_scales.is_empty() {
            return Err("scale lists must not be empty".to_string());
        }
        if self.scales.iter().chain(&self.glyph_scales).any(|s| *s <= 0.0) {
            return Err("scales must be positive".to_string());
        }
        if self.indicator_aspect.0 > self.indicator_aspect.1 {
            return Err(format!(
                "indicator aspect range {:?} is inverted",
                self.indicator_aspect
            ));
        }
        if self.indicator_value_floor > self.indicator_value_ceiling {
            return Err("indicator brightness floor exceeds ceiling".to_string());
        }
        if !(0.0..=1.0).contains(&self.hazard_min_fraction) {
            return Err("hazard fraction must be within [0, 1]".to_string());
        }
        Ok(())
    }
}

/// Create the default detection configuration
pub fn create_default_config() -> DetectionConfig {
    DetectionConfig::default()
}

/// Preset with tighter acceptance, for scenes with many look-alike glyphs
pub fn create_strict_config() -> DetectionConfig {
    DetectionConfig {
        glyph_threshold: 0.7,
        rod_disengaged_threshold: 0.6,
        rod_engaged_threshold: 0.6,
        notify_template_threshold: 0.8,
        hazard_template_threshold: 0.7,
        shape_threshold: 0.7,
        hazard_shape_threshold: 0.6,
        color_threshold: 0.6,
        ..DetectionConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_tolerance() {
        let c = ColorTolerance::new([91, 75, 67], 8);
        assert!(c.matches([91, 75, 67]));
        assert!(c.matches([99, 67, 75]));
        assert!(!c.matches([100, 75, 67]));
    }

    #[test]
    fn test_presets_validate() {
        assert!(create_default_config().validate().is_ok());
        assert!(create_strict_config().validate().is_ok());
        let strict = create_strict_config();
        assert!(strict.glyph_threshold > create_default_config().glyph_threshold);
    }

    #[test]
    fn test_inverted_aspect_rejected() {
        let config = DetectionConfig {
            indicator_aspect: (10.0, 0.5),
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{ "glyph_threshold": 0.65 }"#).unwrap();
        assert_eq!(config.glyph_threshold, 0.65);
        assert_eq!(config.hazard_min_pixels, 2000);
    }
}
