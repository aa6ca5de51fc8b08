//! The detector set: every glyph and state detector the control loop uses

use super::config::DetectionConfig;
use super::locator::{BarLocator, Located};
use super::notification::{NotificationDetection, NotificationDetector};
use super::region::{RegionImage, RegionManager};
use super::rod_state::{RodReading, RodStateDetector};
use super::template::{TemplateStore, names};
use crate::error::{ReelError, ReelResult};
use serde::Serialize;

/// One analysis of the minigame bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarReading {
    /// Fish glyph visible
    pub glyph_active: bool,
    pub indicator: Option<Located>,
    pub target: Option<Located>,
    pub processing_time_ms: u128,
}

impl BarReading {
    /// The minigame counts as running when the glyph or either position is found
    pub fn is_active(&self) -> bool {
        self.glyph_active || self.indicator.is_some() || self.target.is_some()
    }
}

/// Explicitly constructed detection service owned by the control loop.
///
/// Built once at startup; every template it needs must already be loaded.
pub struct DetectorSet {
    regions: RegionManager,
    locator: BarLocator,
    notification: NotificationDetector,
    rod: RodStateDetector,
    config: DetectionConfig,
}

impl DetectorSet {
    pub fn new(
        store: &TemplateStore,
        config: DetectionConfig,
        regions: RegionManager,
    ) -> ReelResult<Self> {
        config
            .validate()
            .map_err(|reason| ReelError::InvalidConfig { reason })?;

        let locator = BarLocator::new(
            store.require(names::FISH_LEFT)?,
            store.require(names::FISH_RIGHT)?,
            store.get(names::INDICATOR),
            config.clone(),
        );
        let notification =
            NotificationDetector::new(Some(store.require(names::BITE_ALERT)?), config.clone());
        let rod = RodStateDetector::new(
            store.require(names::ROD_ENGAGED)?,
            store.require(names::ROD_DISENGAGED)?,
            config.clone(),
        );

        log::info!(
            "Detector set ready ({} templates, regions: {})",
            store.count(),
            regions.get_region_names().join(", ")
        );
        Ok(Self {
            regions,
            locator,
            notification,
            rod,
            config,
        })
    }

    pub fn regions(&self) -> &RegionManager {
        &self.regions
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn rod_state(&self, frame: &RegionImage) -> RodReading {
        self.rod.detect(frame)
    }

    pub fn detect_notification(&self, frame: &RegionImage) -> NotificationDetection {
        let detection = self.notification.detect(frame);
        if detection.found {
            log::info!(
                "Notification found via {:?} ({:.3}{})",
                detection.method,
                detection.confidence,
                if detection.hazard { ", hazard mode" } else { "" }
            );
        }
        detection
    }

    pub fn locate_indicator(&self, frame: &RegionImage) -> Option<Located> {
        self.locator.locate_indicator(frame)
    }

    pub fn locate_target(&self, frame: &RegionImage) -> Option<Located> {
        self.locator.locate_target(frame)
    }

    pub fn bar_active(&self, frame: &RegionImage) -> bool {
        self.locator.bar_active(frame)
    }

    /// Presence check plus both positions for one bar capture
    pub fn analyze_bar(&self, frame: &RegionImage) -> BarReading {
        let start_time = std::time::Instant::now();
        let (glyph_active, target) = self.locator.active_and_target(frame);
        let indicator = self.locator.locate_indicator(frame);
        let reading = BarReading {
            glyph_active,
            indicator,
            target,
            processing_time_ms: start_time.elapsed().as_millis(),
        };
        log::debug!(
            "Bar: active={} indicator={:?} target={:?} ({}ms)",
            reading.is_active(),
            reading.indicator.as_ref().map(|l| l.position),
            reading.target.as_ref().map(|l| l.position),
            reading.processing_time_ms
        );
        reading
    }
}
