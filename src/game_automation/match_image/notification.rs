//! Bite notification detector with hazard-scene suppression
//!
//! The "!" notification is found by template, then by shape, then by color.
//! Scenes dominated by one large saturated color (event water, lava) make
//! color detection unreliable; in that hazard mode only template and shape run.

use super::config::DetectionConfig;
use super::region::RegionImage;
use super::segment::{self, Blob, Hsv};
use crate::template_matching::{MatchResult, Template, match_multi_scale};
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::sync::Arc;

/// Accepted exclamation-mark area in pixels
const SHAPE_AREA: (u32, u32) = (20, 400);
const SHAPE_IDEAL_AREA: (u32, u32) = (30, 200);
/// Accepted height:width range
const SHAPE_ASPECT: (f32, f32) = (2.0, 6.0);
const SHAPE_IDEAL_ASPECT: (f32, f32) = (2.5, 4.5);
const SHAPE_MIN_SOLIDITY: f32 = 0.7;

/// Red components larger than this are background, not glyphs
const SMALL_RED_MAX_AREA: u32 = 150;
/// Medium red components larger than this count as water
const MEDIUM_RED_MAX_AREA: u32 = 800;
/// Medium red is excluded when less than this share of it sits in small components
const MEDIUM_RED_SMALL_SHARE: f32 = 0.1;

/// 30 degree hue bins for the hazard segmentation
const HAZARD_HUE_BINS: u32 = 12;

const ADAPTIVE_SIGMA: f32 = 2.0;
const ADAPTIVE_OFFSET: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionMethod {
    Template,
    Shape,
    Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationDetection {
    pub found: bool,
    pub confidence: f32,
    pub method: Option<DetectionMethod>,
    /// Whether hazard mode restricted the methods used
    pub hazard: bool,
}

impl NotificationDetection {
    fn hit(confidence: f32, method: DetectionMethod, hazard: bool) -> Self {
        Self {
            found: true,
            confidence: confidence.clamp(0.0, 1.0),
            method: Some(method),
            hazard,
        }
    }

    fn miss(hazard: bool) -> Self {
        Self {
            found: false,
            confidence: 0.0,
            method: None,
            hazard,
        }
    }
}

/// Largest single-color saturated area of a region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardReport {
    pub largest_area: u32,
    pub fraction: f32,
    pub active: bool,
}

fn is_saturated(hsv: Hsv) -> bool {
    hsv.s >= 80 && hsv.v >= 100
}

fn is_hazard_red(hsv: Hsv) -> bool {
    (hsv.h <= 30.0 || hsv.h >= 330.0) && is_saturated(hsv)
}

/// Dim, washed-out red to orange typical of tinted water
fn is_medium_red(hsv: Hsv) -> bool {
    hsv.h <= 50.0 && (40..=200).contains(&hsv.s) && (40..=200).contains(&hsv.v)
}

fn is_white(hsv: Hsv) -> bool {
    hsv.s <= 50 && hsv.v >= 200
}

fn is_yellow(hsv: Hsv) -> bool {
    (40.0..=60.0).contains(&hsv.h) && hsv.s >= 100 && hsv.v >= 150
}

fn is_vivid_red(hsv: Hsv) -> bool {
    (hsv.h <= 16.0 || hsv.h >= 344.0) && hsv.s >= 180 && hsv.v >= 180
}

fn is_blue(hsv: Hsv) -> bool {
    (160.0..=260.0).contains(&hsv.h) && hsv.s >= 50 && hsv.v >= 50
}

/// Exclamation-mark likeness of a blob in [0, 1].
///
/// Blobs outside the accepted area or height:width range score 0.
pub fn score_shape(blob: &Blob) -> f32 {
    if blob.area < SHAPE_AREA.0 || blob.area > SHAPE_AREA.1 {
        return 0.0;
    }
    let aspect = blob.height() as f32 / blob.width() as f32;
    if aspect < SHAPE_ASPECT.0 || aspect > SHAPE_ASPECT.1 {
        return 0.0;
    }

    let mut score = 0.0;
    score += if (SHAPE_IDEAL_ASPECT.0..=SHAPE_IDEAL_ASPECT.1).contains(&aspect) {
        0.4
    } else {
        0.2
    };
    score += if (SHAPE_IDEAL_AREA.0..=SHAPE_IDEAL_AREA.1).contains(&blob.area) {
        0.3
    } else {
        0.1
    };
    if blob.solidity() > SHAPE_MIN_SOLIDITY {
        score += 0.3;
    }
    score
}

fn best_shape_score(mask: &GrayImage) -> f32 {
    segment::blobs(mask)
        .iter()
        .map(score_shape)
        .fold(0.0, f32::max)
}

pub struct NotificationDetector {
    template: Option<Arc<Template>>,
    config: DetectionConfig,
}

impl NotificationDetector {
    pub fn new(template: Option<Arc<Template>>, config: DetectionConfig) -> Self {
        Self { template, config }
    }

    /// Segment each saturated hue separately, close gaps with a 5x5 window
    /// and measure the largest single-color area.
    pub fn hazard_check(&self, rgb: &RgbImage) -> HazardReport {
        let total = (rgb.width() * rgb.height()).max(1) as f32;
        let largest_area = segment::hue_bin_masks(rgb, HAZARD_HUE_BINS, is_saturated)
            .iter()
            .filter_map(|mask| segment::largest_blob(&segment::close_square(mask, 2)))
            .map(|b| b.area)
            .max()
            .unwrap_or(0);
        let fraction = largest_area as f32 / total;
        HazardReport {
            largest_area,
            fraction,
            active: largest_area > self.config.hazard_min_pixels
                || fraction > self.config.hazard_min_fraction,
        }
    }

    fn template_match(&self, frame: &RegionImage) -> Option<MatchResult> {
        let template = self.template.as_ref()?;
        let m = match_multi_scale(&frame.search, template, &self.config.scales)?;
        log::debug!("Notification {}", m.describe(&template.name));
        Some(m)
    }

    fn shape_score(&self, frame: &RegionImage) -> f32 {
        let mask = segment::adaptive_bright_mask(frame.search.gray(), ADAPTIVE_SIGMA, ADAPTIVE_OFFSET);
        best_shape_score(&mask)
    }

    /// White, yellow and small vivid-red blobs outside blue and large-red areas
    fn color_score(&self, rgb: &RgbImage) -> f32 {
        let hazard = segment::close_square(&segment::hsv_mask(rgb, is_hazard_red), 2);
        let large_red = segment::keep_large_components(
            &hazard,
            self.config.hazard_min_pixels,
            self.config.hazard_min_fraction,
        );
        let mut exclude = segment::union(&segment::hsv_mask(rgb, is_blue), &large_red);

        let medium_red = segment::hsv_mask(rgb, is_medium_red);
        let medium_total = segment::count_on(&medium_red);
        let medium_small =
            segment::count_on(&segment::keep_small_components(&medium_red, MEDIUM_RED_MAX_AREA));
        if (medium_small as f32) < medium_total as f32 * MEDIUM_RED_SMALL_SHARE {
            exclude = segment::union(&exclude, &medium_red);
        }

        let small_red =
            segment::keep_small_components(&segment::hsv_mask(rgb, is_vivid_red), SMALL_RED_MAX_AREA);
        let candidates = [
            ("white", segment::hsv_mask(rgb, is_white)),
            ("yellow", segment::hsv_mask(rgb, is_yellow)),
            ("red", small_red),
        ];

        let mut best = 0.0f32;
        for (name, mask) in candidates {
            let score = best_shape_score(&segment::subtract(&mask, &exclude));
            if score > self.config.color_threshold {
                log::debug!("{} exclamation candidate: {:.3}", name, score);
            }
            best = best.max(score);
        }
        best
    }

    /// Look for the bite notification in a captured region.
    pub fn detect(&self, frame: &RegionImage) -> NotificationDetection {
        let hazard = self.hazard_check(&frame.rgb);
        let cfg = &self.config;

        let (template_threshold, shape_threshold) = if hazard.active {
            log::debug!(
                "Hazard mode: largest flat color area {} px ({:.1}%), color detection disabled",
                hazard.largest_area,
                hazard.fraction * 100.0
            );
            (cfg.hazard_template_threshold, cfg.hazard_shape_threshold)
        } else {
            (cfg.notify_template_threshold, cfg.shape_threshold)
        };

        if let Some(m) = self.template_match(frame) {
            if m.score > template_threshold {
                return NotificationDetection::hit(m.score, DetectionMethod::Template, hazard.active);
            }
        }

        let shape = self.shape_score(frame);
        if shape > shape_threshold {
            return NotificationDetection::hit(shape, DetectionMethod::Shape, hazard.active);
        }

        if hazard.active {
            return NotificationDetection::miss(true);
        }

        let color = self.color_score(&frame.rgb);
        if color > cfg.color_threshold {
            return NotificationDetection::hit(color, DetectionMethod::Color, false);
        }
        NotificationDetection::miss(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn blob_from_rect(w: u32, h: u32) -> Blob {
        let mask = GrayImage::from_fn(w + 4, h + 4, |x, y| {
            let on = (2..2 + w).contains(&x) && (2..2 + h).contains(&y);
            Luma([if on { 255 } else { 0 }])
        });
        segment::largest_blob(&mask).unwrap()
    }

    #[test]
    fn test_ideal_bar_scores_full() {
        // 4x14: area 56, aspect 3.5
        assert!((score_shape(&blob_from_rect(4, 14)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_acceptable_shape_scores_partial() {
        // 2x11: area 22 (acceptable), aspect 5.5 (acceptable)
        let score = score_shape(&blob_from_rect(2, 11));
        assert!((score - 0.6).abs() < 1e-6, "score {score}");
    }

    #[test]
    fn test_shape_hard_filters() {
        // Too small
        assert_eq!(score_shape(&blob_from_rect(2, 5)), 0.0);
        // Too large
        assert_eq!(score_shape(&blob_from_rect(10, 50)), 0.0);
        // Too wide
        assert_eq!(score_shape(&blob_from_rect(10, 10)), 0.0);
    }

    #[test]
    fn test_hazard_check_on_red_region() {
        let detector = NotificationDetector::new(None, DetectionConfig::default());
        let rgb = RgbImage::from_fn(100, 100, |x, _| {
            if x < 50 { Rgb([220, 30, 20]) } else { Rgb([20, 40, 60]) }
        });
        let report = detector.hazard_check(&rgb);
        assert!(report.active);
        assert_eq!(report.largest_area, 5000);
        assert!((report.fraction - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hazard_check_on_flat_green() {
        let detector = NotificationDetector::new(None, DetectionConfig::default());
        let rgb = RgbImage::from_fn(100, 100, |_, y| {
            if y < 45 { Rgb([30, 200, 40]) } else { Rgb([20, 40, 60]) }
        });
        let report = detector.hazard_check(&rgb);
        assert!(report.active);
        assert_eq!(report.largest_area, 4500);
    }

    #[test]
    fn test_hazard_check_ignores_mixed_small_colors() {
        let detector = NotificationDetector::new(None, DetectionConfig::default());
        // Diagonal stripes of 10x10 red, green and blue tiles: saturated
        // everywhere, no single color dominates
        let palette = [Rgb([220, 30, 20]), Rgb([30, 200, 40]), Rgb([40, 60, 230])];
        let rgb = RgbImage::from_fn(60, 60, |x, y| palette[((x / 10 + y / 10) % 3) as usize]);
        let report = detector.hazard_check(&rgb);
        assert!(!report.active, "{report:?}");
    }

    #[test]
    fn test_medium_red_water_hides_red_marks() {
        let detector = NotificationDetector::new(None, DetectionConfig::default());
        let mark = RgbImage::from_pixel(4, 14, Rgb([195, 45, 45]));
        let mut plain = RgbImage::from_pixel(160, 120, Rgb([217, 217, 217]));
        image::imageops::replace(&mut plain, &mark, 28, 23);
        assert!(detector.color_score(&plain) > 0.9);

        // Same mark inside a 40x40 patch of dim orange water
        let mut water = RgbImage::from_pixel(160, 120, Rgb([217, 217, 217]));
        image::imageops::replace(&mut water, &RgbImage::from_pixel(40, 40, Rgb([170, 120, 60])), 10, 10);
        image::imageops::replace(&mut water, &mark, 28, 23);
        assert!(!detector.hazard_check(&water).active);
        assert_eq!(detector.color_score(&water), 0.0);
    }

    #[test]
    fn test_hazard_check_on_small_red() {
        let detector = NotificationDetector::new(None, DetectionConfig::default());
        let rgb = RgbImage::from_fn(100, 100, |x, y| {
            if x < 10 && y < 10 { Rgb([220, 30, 20]) } else { Rgb([20, 40, 60]) }
        });
        let report = detector.hazard_check(&rgb);
        assert!(!report.active);
        assert_eq!(report.largest_area, 100);
    }
}
