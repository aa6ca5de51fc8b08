//! Indicator and target locators for the minigame bar

use super::config::DetectionConfig;
use super::region::RegionImage;
use super::segment::{self, Hsv};
use crate::template_matching::{MatchResult, Template, match_multi_scale};
use serde::Serialize;
use std::sync::Arc;

/// Which tolerance mask found the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorState {
    Default,
    Hover,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LocateSource {
    Glyph { name: String, score: f32 },
    Color(ColorState),
    Brightness,
}

/// A horizontal position inside the bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Located {
    /// Centroid x divided by the bar width, in [0, 1]
    pub position: f32,
    /// Centroid x in region pixels
    pub pixel_x: f32,
    pub source: LocateSource,
}

impl Located {
    fn at(pixel_x: f32, width: u32, source: LocateSource) -> Self {
        let position = if width == 0 {
            0.5
        } else {
            (pixel_x / width as f32).clamp(0.0, 1.0)
        };
        Self {
            position,
            pixel_x,
            source,
        }
    }
}

/// Locates the fish (target) and the white cursor (indicator) in a bar capture.
pub struct BarLocator {
    fish_left: Arc<Template>,
    fish_right: Arc<Template>,
    indicator: Option<Arc<Template>>,
    config: DetectionConfig,
}

impl BarLocator {
    pub fn new(
        fish_left: Arc<Template>,
        fish_right: Arc<Template>,
        indicator: Option<Arc<Template>>,
        config: DetectionConfig,
    ) -> Self {
        Self {
            fish_left,
            fish_right,
            indicator,
            config,
        }
    }

    /// Best fish glyph match regardless of threshold
    fn best_fish_glyph(&self, frame: &RegionImage) -> Option<(MatchResult, &str)> {
        let scales = &self.config.glyph_scales;
        let left = match_multi_scale(&frame.search, &self.fish_left, scales)
            .map(|m| (m, self.fish_left.name.as_str()));
        let right = match_multi_scale(&frame.search, &self.fish_right, scales)
            .map(|m| (m, self.fish_right.name.as_str()));
        match (left, right) {
            (Some(l), Some(r)) => Some(if r.0.score > l.0.score { r } else { l }),
            (l, r) => l.or(r),
        }
    }

    fn glyph_active(&self, fish: Option<&(MatchResult, &str)>) -> bool {
        fish.is_some_and(|(m, _)| m.score > self.config.glyph_threshold)
    }

    /// True when either fish glyph is visible, i.e. the minigame is running
    pub fn bar_active(&self, frame: &RegionImage) -> bool {
        self.glyph_active(self.best_fish_glyph(frame).as_ref())
    }

    /// Target position: fish glyph first, then the two color masks.
    pub fn locate_target(&self, frame: &RegionImage) -> Option<Located> {
        self.target_from_glyph(frame, self.best_fish_glyph(frame))
    }

    /// Presence check and target position from a single fish glyph search
    pub fn active_and_target(&self, frame: &RegionImage) -> (bool, Option<Located>) {
        let fish = self.best_fish_glyph(frame);
        let active = self.glyph_active(fish.as_ref());
        (active, self.target_from_glyph(frame, fish))
    }

    fn target_from_glyph(&self, frame: &RegionImage, fish: Option<(MatchResult, &str)>) -> Option<Located> {
        if let Some((m, name)) = fish {
            if m.passes(self.config.glyph_threshold) {
                let (cx, _) = m.center();
                log::debug!("Target via {}", m.describe(name));
                return Some(Located::at(
                    cx as f32,
                    frame.width(),
                    LocateSource::Glyph {
                        name: name.to_string(),
                        score: m.score,
                    },
                ));
            }
            log::debug!("Fish glyph below threshold ({:.3}), trying color", m.score);
        }
        self.locate_target_by_color(frame)
    }

    fn locate_target_by_color(&self, frame: &RegionImage) -> Option<Located> {
        let candidates = [
            (ColorState::Default, self.config.target_default_color),
            (ColorState::Hover, self.config.target_hover_color),
        ];

        let mut best: Option<(segment::Blob, ColorState)> = None;
        for (state, color) in candidates {
            let mask = segment::rgb_mask(&frame.rgb, |p| color.matches(p.0));
            let Some(blob) = segment::largest_blob(&mask) else {
                continue;
            };
            if blob.area < self.config.min_target_area {
                continue;
            }
            if best.as_ref().is_none_or(|(b, _)| blob.area > b.area) {
                best = Some((blob, state));
            }
        }

        best.map(|(blob, state)| {
            log::debug!(
                "Target via {:?} color: area={} x={:.1}",
                state,
                blob.area,
                blob.centroid.0
            );
            Located::at(blob.centroid.0, frame.width(), LocateSource::Color(state))
        })
    }

    /// Indicator position: optional glyph, then bright low-saturation blobs.
    pub fn locate_indicator(&self, frame: &RegionImage) -> Option<Located> {
        if let Some(glyph) = &self.indicator {
            if let Some(m) = match_multi_scale(&frame.search, glyph, &self.config.glyph_scales) {
                if m.passes(self.config.glyph_threshold) {
                    let (cx, _) = m.center();
                    return Some(Located::at(
                        cx as f32,
                        frame.width(),
                        LocateSource::Glyph {
                            name: glyph.name.clone(),
                            score: m.score,
                        },
                    ));
                }
            }
        }
        self.locate_indicator_by_brightness(frame)
    }

    fn locate_indicator_by_brightness(&self, frame: &RegionImage) -> Option<Located> {
        let cfg = &self.config;
        let low_sat = |hsv: &Hsv| hsv.s <= cfg.indicator_max_saturation;

        let peak = frame
            .rgb
            .pixels()
            .map(segment::to_hsv)
            .filter(low_sat)
            .map(|hsv| hsv.v)
            .max()?;
        let threshold = peak
            .saturating_sub(cfg.indicator_value_offset)
            .clamp(cfg.indicator_value_floor, cfg.indicator_value_ceiling);

        let mask = segment::hsv_mask(&frame.rgb, |hsv| low_sat(&hsv) && hsv.v >= threshold);
        let cleaned = segment::open_close_cross(&mask, 1);

        let (min_aspect, max_aspect) = cfg.indicator_aspect;
        let blob = segment::blobs(&cleaned).into_iter().find(|b| {
            let aspect = b.width() as f32 / b.height() as f32;
            b.area >= cfg.min_indicator_area && (min_aspect..=max_aspect).contains(&aspect)
        })?;

        log::debug!(
            "Indicator via brightness: thr={} area={} x={:.1}",
            threshold,
            blob.area,
            blob.centroid.0
        );
        Some(Located::at(
            blob.centroid.0,
            frame.width(),
            LocateSource::Brightness,
        ))
    }
}
