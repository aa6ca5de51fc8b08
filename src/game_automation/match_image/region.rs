//! Screen regions the detectors look at

use crate::error::CaptureError;
use crate::template_matching::SearchImage;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference resolution the default regions were measured on
pub const REFERENCE_WIDTH: u32 = 1920;
pub const REFERENCE_HEIGHT: u32 = 1080;

pub const ROD_SLOT: &str = "rod_slot";
pub const MINIGAME_BAR: &str = "minigame_bar";
pub const BITE_ALERT: &str = "bite_alert";
pub const ACTION_POINT: &str = "action_point";

/// Size of the centered box searched for the bite notification
const BITE_ALERT_SIZE: (u32, u32) = (400, 300);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub name: String,
}

impl DetectionRegion {
    pub fn new(left: u32, top: u32, width: u32, height: u32, name: impl Into<String>) -> Self {
        Self {
            left,
            top,
            width,
            height,
            name: name.into(),
        }
    }

    /// Create a full-screen region
    pub fn full_screen(screen_width: u32, screen_height: u32) -> Self {
        Self::new(0, 0, screen_width, screen_height, "full_screen")
    }

    /// Box of the given size centered on the screen
    pub fn centered(
        screen_width: u32,
        screen_height: u32,
        width: u32,
        height: u32,
        name: impl Into<String>,
    ) -> Self {
        let width = width.min(screen_width);
        let height = height.min(screen_height);
        Self::new(
            (screen_width - width) / 2,
            (screen_height - height) / 2,
            width,
            height,
            name,
        )
    }

    /// Clip region to screen boundaries
    pub fn clip_to_screen(&self, screen_width: u32, screen_height: u32) -> Self {
        let left = self.left.min(screen_width.saturating_sub(1));
        let top = self.top.min(screen_height.saturating_sub(1));
        Self {
            left,
            top,
            width: self.width.min(screen_width.saturating_sub(left)),
            height: self.height.min(screen_height.saturating_sub(top)),
            name: self.name.clone(),
        }
    }

    /// Center point in screen coordinates
    pub fn center(&self) -> (u32, u32) {
        (self.left + self.width / 2, self.top + self.height / 2)
    }

    /// Check if this region is valid (non-zero dimensions)
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Convert a point local to this region into screen coordinates
    pub fn to_screen(&self, local: (u32, u32)) -> (u32, u32) {
        (self.left + local.0, self.top + local.1)
    }

    /// Cut this region out of a full-screen frame.
    ///
    /// Fails when the region is empty or not fully inside the frame; callers
    /// treat that as a skipped cycle.
    pub fn crop(&self, frame: &RgbImage) -> Result<RgbImage, CaptureError> {
        let fits = self.is_valid()
            && self.left + self.width <= frame.width()
            && self.top + self.height <= frame.height();
        if !fits {
            return Err(CaptureError::invalid_region(self));
        }
        Ok(image::imageops::crop_imm(frame, self.left, self.top, self.width, self.height).to_image())
    }
}

/// A captured region together with its matcher-ready grayscale channels.
#[derive(Debug, Clone)]
pub struct RegionImage {
    pub rgb: RgbImage,
    pub search: SearchImage,
}

impl RegionImage {
    pub fn new(rgb: RgbImage) -> Self {
        let search = SearchImage::from_rgb(&rgb);
        Self { rgb, search }
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }
}

/// Named regions of the game window.
pub struct RegionManager {
    regions: HashMap<String, DetectionRegion>,
    screen_width: u32,
    screen_height: u32,
}

impl RegionManager {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        let mut manager = Self {
            regions: HashMap::new(),
            screen_width,
            screen_height,
        };
        manager.add_default_regions();
        manager
    }

    fn add_default_regions(&mut self) {
        let (w, h) = (self.screen_width, self.screen_height);

        // Hotbar slot showing the rod icon
        self.add_region(DetectionRegion::new(725, 1004, 464, 68, ROD_SLOT));
        // Horizontal strip holding indicator and target
        self.add_region(DetectionRegion::new(498, 789, 967, 51, MINIGAME_BAR));
        self.add_region(DetectionRegion::centered(
            w,
            h,
            BITE_ALERT_SIZE.0,
            BITE_ALERT_SIZE.1,
            BITE_ALERT,
        ));
        // Where casts and bite clicks land
        let (cx, cy) = (w / 2, h / 2);
        self.add_region(DetectionRegion::new(cx, cy, 1, 1, ACTION_POINT));
    }

    /// Insert or replace a region under its own name
    pub fn add_region(&mut self, region: DetectionRegion) {
        let clipped = region.clip_to_screen(self.screen_width, self.screen_height);
        if clipped != region {
            log::warn!(
                "Region '{}' clipped to screen {}x{}",
                region.name,
                self.screen_width,
                self.screen_height
            );
        }
        self.regions.insert(clipped.name.clone(), clipped);
    }

    pub fn get_region(&self, name: &str) -> Option<&DetectionRegion> {
        self.regions.get(name)
    }

    pub fn get_region_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.regions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Named region, or the full screen for unknown names
    pub fn resolve_region(&self, name: &str) -> DetectionRegion {
        match self.get_region(name) {
            Some(region) => region.clone(),
            None => {
                log::debug!("Unknown region '{}', using full screen", name);
                DetectionRegion::full_screen(self.screen_width, self.screen_height)
            }
        }
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }
}

impl Default for RegionManager {
    fn default() -> Self {
        Self::new(REFERENCE_WIDTH, REFERENCE_HEIGHT)
    }
}
