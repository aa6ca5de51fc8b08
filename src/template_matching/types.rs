//! Template matching data types
use image::{GrayImage, Luma, RgbImage};
use imageproc::gradients::sobel_gradients;
use serde::Serialize;

/// Dense single-channel f32 buffer used by the correlation kernels.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl Plane {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Intensity plane straight from 8-bit luma
    pub fn from_gray(gray: &GrayImage) -> Self {
        let data = gray.pixels().map(|p| p[0] as f32).collect();
        Self::new(gray.width(), gray.height(), data)
    }

    /// Gradient-magnitude edge map of a grayscale image.
    ///
    /// Returns `None` for images too small to carry an interior gradient.
    pub fn edges_of(gray: &GrayImage) -> Option<Self> {
        if gray.width() < 3 || gray.height() < 3 {
            return None;
        }
        let grad = sobel_gradients(gray);
        let data = grad.pixels().map(|p: &Luma<u16>| p[0] as f32).collect();
        Some(Self::new(gray.width(), gray.height(), data))
    }

    /// Copy of the plane without a `margin` pixel frame.
    pub fn inset(&self, margin: u32) -> Option<Self> {
        if self.width <= 2 * margin || self.height <= 2 * margin {
            return None;
        }
        let w = self.width - 2 * margin;
        let h = self.height - 2 * margin;
        let mut data = Vec::with_capacity((w * h) as usize);
        for y in margin..margin + h {
            let row = (y * self.width) as usize;
            data.extend_from_slice(
                &self.data[row + margin as usize..row + (margin + w) as usize],
            );
        }
        Some(Self::new(w, h, data))
    }

}

/// Immutable reference glyph. Built once at load time and shared read-only
/// across scale-matching tasks.
#[derive(Clone, Debug)]
pub struct Template {
    /// Template label (file stem, e.g. "fish_left")
    pub name: String,
    /// Original color pixels
    pub color: RgbImage,
    /// Intensity channel used for correlation
    pub intensity: GrayImage,
    /// Edge map of `intensity`, `None` when the glyph is too small
    pub edges: Option<Plane>,
}

impl Template {
    pub fn from_rgb(name: impl Into<String>, color: RgbImage) -> Self {
        let intensity = image::DynamicImage::ImageRgb8(color.clone()).to_luma8();
        let edges = Plane::edges_of(&intensity);
        Self {
            name: name.into(),
            color,
            intensity,
            edges,
        }
    }

    pub fn width(&self) -> u32 {
        self.intensity.width()
    }

    pub fn height(&self) -> u32 {
        self.intensity.height()
    }
}

/// Best placement of a template found by [`super::match_multi_scale`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    /// Scale factor applied to the template
    pub scale: f64,
    /// `0.75 * intensity + 0.25 * edge` correlation
    pub score: f32,
    /// Intensity-channel correlation at `location`
    pub intensity_score: f32,
    /// Edge-channel correlation (-1.0 when no edge map was available)
    pub edge_score: f32,
    /// Top-left corner of the match in the searched image
    pub location: (u32, u32),
    /// Size of the scaled template
    pub size: (u32, u32),
}

impl MatchResult {
    /// Center of the matched rectangle
    pub fn center(&self) -> (u32, u32) {
        (
            self.location.0 + self.size.0 / 2,
            self.location.1 + self.size.1 / 2,
        )
    }

    pub fn passes(&self, threshold: f32) -> bool {
        self.score >= threshold
    }

    /// Score of an optional result; a template that never fit scores -1.
    pub fn score_of(result: Option<&MatchResult>) -> f32 {
        result.map(|m| m.score).unwrap_or(-1.0)
    }

    pub fn describe(&self, name: &str) -> String {
        format!(
            "{} at ({},{}) {}x{} scale={:.2} score={:.3} (i={:.3} e={:.3})",
            name,
            self.location.0,
            self.location.1,
            self.size.0,
            self.size.1,
            self.scale,
            self.score,
            self.intensity_score,
            self.edge_score
        )
    }
}
