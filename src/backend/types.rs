// Core backend types and traits
use crate::error::{CaptureError, InputError};
use crate::game_automation::match_image::DetectionRegion;
use image::RgbImage;
use serde::Serialize;

/// Screen coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

// Trait defining screen capture (live window grabber or recorded frames)
#[allow(async_fn_in_trait)]
pub trait CaptureProvider {
    /// Pixels of `region` from the current frame. Any error means "skip this cycle".
    async fn capture(&mut self, region: &DetectionRegion) -> Result<RgbImage, CaptureError>;

    fn screen_size(&self) -> (u32, u32);

    fn name(&self) -> &str;
}

/// Pointer primitives. Holding the primary button moves the minigame
/// indicator right; releasing it lets the indicator drift left.
///
/// Methods are synchronous so held input can be released from `Drop`.
pub trait InputDriver {
    fn press(&mut self) -> Result<(), InputError>;

    fn release(&mut self) -> Result<(), InputError>;

    fn move_to(&mut self, point: Point) -> Result<(), InputError>;
}
