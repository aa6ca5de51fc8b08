//! Multi-scale, dual-channel template matching
//!
//! Zero-mean normalized cross-correlation over an intensity channel and a
//! gradient-magnitude edge channel, blended 3:1 and maximised over scales.
use super::types::{MatchResult, Plane, Template};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};
use rayon::prelude::*;
use std::borrow::Cow;

/// Weight of the intensity correlation in the combined score
pub const INTENSITY_WEIGHT: f32 = 0.75;
/// Weight of the edge correlation in the combined score
pub const EDGE_WEIGHT: f32 = 0.25;
/// Edge score used when either edge map is unavailable
pub const MISSING_EDGE_SCORE: f32 = -1.0;

/// Short scale list for latency-sensitive glyph lookups. 1.0 first so an
/// unscaled hit wins ties.
pub const QUICK_SCALES: [f64; 5] = [1.0, 0.9, 0.8, 1.1, 1.2];

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Default scale sweep: 0.8 to 1.2 in 21 steps
pub fn default_scales() -> Vec<f64> {
    linspace(0.8, 1.2, 21)
}

/// Prefix sums of values and squared values for O(1) window statistics.
#[derive(Debug, Clone)]
struct Integral {
    stride: usize,
    sum: Vec<f64>,
    sq: Vec<f64>,
}

impl Integral {
    fn of(plane: &Plane) -> Self {
        let stride = plane.width as usize + 1;
        let rows = plane.height as usize + 1;
        let mut sum = vec![0.0; stride * rows];
        let mut sq = vec![0.0; stride * rows];
        for y in 0..plane.height as usize {
            let mut row_sum = 0.0;
            let mut row_sq = 0.0;
            for x in 0..plane.width as usize {
                let v = plane.data[y * plane.width as usize + x] as f64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sq[idx] = sq[idx - stride] + row_sq;
            }
        }
        Self { stride, sum, sq }
    }

    /// (sum, sum of squares) over the `w`x`h` window at (`x`,`y`)
    #[inline]
    fn window(&self, x: u32, y: u32, w: u32, h: u32) -> (f64, f64) {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        let s = self.stride;
        let pick = |v: &[f64]| v[y1 * s + x1] - v[y0 * s + x1] - v[y1 * s + x0] + v[y0 * s + x0];
        (pick(&self.sum), pick(&self.sq))
    }
}

/// One channel of a searched image with its window statistics.
#[derive(Debug, Clone)]
struct Channel {
    plane: Plane,
    integral: Integral,
}

impl Channel {
    fn new(plane: Plane) -> Self {
        let integral = Integral::of(&plane);
        Self { plane, integral }
    }
}

/// A captured image prepared for matching. Build it once per capture and
/// reuse it for every template.
#[derive(Debug, Clone)]
pub struct SearchImage {
    gray: GrayImage,
    intensity: Channel,
    edges: Option<Channel>,
}

impl SearchImage {
    pub fn from_gray(gray: GrayImage) -> Self {
        let intensity = Channel::new(Plane::from_gray(&gray));
        let edges = Plane::edges_of(&gray).map(Channel::new);
        Self {
            gray,
            intensity,
            edges,
        }
    }

    pub fn from_rgb(rgb: &RgbImage) -> Self {
        Self::from_gray(DynamicImage::ImageRgb8(rgb.clone()).to_luma8())
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }
}

/// Best zero-mean normalized correlation of `templ` over `channel`.
///
/// Returns `(score, x, y)`; `None` when the template is flat or does not fit.
/// Ties keep the first position in row-major order.
fn best_correlation(channel: &Channel, templ: &Plane) -> Option<(f32, u32, u32)> {
    let image = &channel.plane;
    if templ.width == 0 || templ.height == 0 || templ.width > image.width || templ.height > image.height
    {
        return None;
    }

    let n = (templ.width * templ.height) as f64;
    let mean = templ.data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let centered: Vec<f64> = templ.data.iter().map(|&v| v as f64 - mean).collect();
    let templ_energy: f64 = centered.iter().map(|v| v * v).sum();
    if templ_energy <= f64::EPSILON {
        return None;
    }

    let mut best: Option<(f32, u32, u32)> = None;
    for y in 0..=(image.height - templ.height) {
        for x in 0..=(image.width - templ.width) {
            let (sum, sq) = channel.integral.window(x, y, templ.width, templ.height);
            let window_energy = sq - sum * sum / n;
            let score = if window_energy <= 1e-9 {
                0.0
            } else {
                let mut num = 0.0;
                for ty in 0..templ.height {
                    let img_row = ((y + ty) * image.width + x) as usize;
                    let tpl_row = (ty * templ.width) as usize;
                    for tx in 0..templ.width as usize {
                        num += image.data[img_row + tx] as f64 * centered[tpl_row + tx];
                    }
                }
                (num / (templ_energy * window_energy).sqrt()).clamp(-1.0, 1.0) as f32
            };
            if best.is_none_or(|(b, _, _)| score > b) {
                best = Some((score, x, y));
            }
        }
    }
    best
}

/// Evaluate one scale; `None` when the scaled template exceeds the search area.
fn match_at_scale(screen: &SearchImage, template: &Template, scale: f64) -> Option<MatchResult> {
    let new_w = ((template.width() as f64 * scale).round() as u32).max(1);
    let new_h = ((template.height() as f64 * scale).round() as u32).max(1);
    if new_w > screen.width() || new_h > screen.height() {
        log::debug!(
            "  skip scale {:.2}: {}x{} exceeds {}x{}",
            scale,
            new_w,
            new_h,
            screen.width(),
            screen.height()
        );
        return None;
    }

    let same_size = new_w == template.width() && new_h == template.height();
    let resized: Cow<GrayImage> = if same_size {
        Cow::Borrowed(&template.intensity)
    } else {
        Cow::Owned(imageops::resize(
            &template.intensity,
            new_w,
            new_h,
            FilterType::Triangle,
        ))
    };

    let (intensity_score, x, y) =
        best_correlation(&screen.intensity, &Plane::from_gray(&resized)).unwrap_or((0.0, 0, 0));

    // Border gradients depend on pixels outside the glyph, so the template
    // edge map is compared without its outer pixel ring.
    let templ_edges: Option<Cow<Plane>> = if same_size {
        template.edges.as_ref().map(Cow::Borrowed)
    } else {
        Plane::edges_of(&resized).map(Cow::Owned)
    };
    let edge_score = match (&screen.edges, templ_edges.and_then(|e| e.inset(1))) {
        (Some(channel), Some(inner)) => best_correlation(channel, &inner)
            .map(|(s, _, _)| s)
            .unwrap_or(MISSING_EDGE_SCORE),
        _ => MISSING_EDGE_SCORE,
    };

    let score = INTENSITY_WEIGHT * intensity_score + EDGE_WEIGHT * edge_score;
    log::debug!(
        "  {} scale {:.2}: i={:.3} e={:.3} combined={:.3}",
        template.name,
        scale,
        intensity_score,
        edge_score,
        score
    );

    Some(MatchResult {
        scale,
        score,
        intensity_score,
        edge_score,
        location: (x, y),
        size: (new_w, new_h),
    })
}

/// Locate `template` in `screen` over every scale in `scales`.
///
/// Scales are evaluated in parallel and reduced in input order with a strict
/// `>`, so the first scale wins ties. No threshold is applied; `None` means no
/// scale fit inside the search area.
pub fn match_multi_scale(
    screen: &SearchImage,
    template: &Template,
    scales: &[f64],
) -> Option<MatchResult> {
    let per_scale: Vec<Option<MatchResult>> = scales
        .par_iter()
        .map(|&scale| match_at_scale(screen, template, scale))
        .collect();

    per_scale
        .into_iter()
        .flatten()
        .fold(None, |best: Option<MatchResult>, candidate| match best {
            Some(b) if candidate.score > b.score => Some(candidate),
            Some(b) => Some(b),
            None => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    /// Deterministic textured glyph so correlations are well defined
    fn glyph(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            let v = ((x * 37 + y * 91 + (x * y) % 13 * 11) % 200 + 30) as u8;
            Rgb([v, v / 2, 255 - v])
        })
    }

    fn noisy_background(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            let v = ((x * 7 + y * 3) % 23 + 100) as u8;
            Rgb([v, v, v])
        })
    }

    fn paste(dst: &mut RgbImage, src: &RgbImage, ox: u32, oy: u32) {
        imageops::replace(dst, src, ox as i64, oy as i64);
    }

    #[test]
    fn test_linspace_matches_default_sweep() {
        let scales = default_scales();
        assert_eq!(scales.len(), 21);
        assert!((scales[0] - 0.8).abs() < 1e-12);
        assert!((scales[10] - 1.0).abs() < 1e-12);
        assert!((scales[20] - 1.2).abs() < 1e-12);
        assert_eq!(linspace(0.5, 1.0, 1), vec![0.5]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_exact_copy_scores_near_one() {
        let tpl_img = glyph(24, 18);
        let mut screen = noisy_background(160, 90);
        paste(&mut screen, &tpl_img, 57, 33);

        let template = Template::from_rgb("glyph", tpl_img);
        let search = SearchImage::from_rgb(&screen);
        let result = match_multi_scale(&search, &template, &default_scales()).unwrap();

        assert!(result.score >= 0.99, "score {:.4}", result.score);
        assert!((result.scale - 1.0).abs() < 0.05, "scale {}", result.scale);
        assert!(result.location.0.abs_diff(57) <= 1, "x {}", result.location.0);
        assert!(result.location.1.abs_diff(33) <= 1, "y {}", result.location.1);
    }

    #[test]
    fn test_oversized_template_is_skipped() {
        let template = Template::from_rgb("big", glyph(40, 40));
        let search = SearchImage::from_rgb(&noisy_background(30, 30));
        assert!(match_multi_scale(&search, &template, &default_scales()).is_none());
    }

    #[test]
    fn test_only_fitting_scales_are_considered() {
        // 0.8 * 25 = 20 fits a 20x20 screen, larger scales do not
        let template = Template::from_rgb("edge", glyph(25, 25));
        let search = SearchImage::from_rgb(&noisy_background(20, 20));
        let result = match_multi_scale(&search, &template, &default_scales()).unwrap();
        assert!(result.scale <= 0.81);
        assert_eq!(result.size, (20, 20));
    }

    #[test]
    fn test_flat_template_gets_missing_edge_score() {
        let flat = RgbImage::from_pixel(6, 6, Rgb([90, 90, 90]));
        let template = Template::from_rgb("flat", flat);
        let search = SearchImage::from_rgb(&noisy_background(40, 40));
        let result = match_multi_scale(&search, &template, &[1.0]).unwrap();
        assert_eq!(result.edge_score, MISSING_EDGE_SCORE);
        assert_eq!(result.intensity_score, 0.0);
        assert!(result.score < 0.0);
    }

    #[test]
    fn test_ties_keep_first_scale() {
        // Identical scales produce identical scores; the first must be kept
        let tpl_img = glyph(12, 12);
        let mut screen = noisy_background(60, 60);
        paste(&mut screen, &tpl_img, 10, 10);
        let template = Template::from_rgb("glyph", tpl_img);
        let search = SearchImage::from_rgb(&screen);
        let result = match_multi_scale(&search, &template, &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(result.scale, 1.0);
        assert_eq!(result.location, (10, 10));
    }

    #[test]
    fn test_correlation_is_bounded() {
        let plane = Plane::new(4, 1, vec![1.0, 5.0, 2.0, 8.0]);
        let channel = Channel::new(plane);
        let templ = Plane::new(2, 1, vec![0.0, 10.0]);
        let (score, x, _) = best_correlation(&channel, &templ).unwrap();
        assert!((-1.0..=1.0).contains(&score));
        assert!((score - 1.0).abs() < 1e-6);
        assert_eq!(x, 0);
    }

    #[test]
    fn test_search_image_from_gray_keeps_dimensions() {
        let gray = GrayImage::from_pixel(9, 4, Luma([3]));
        let search = SearchImage::from_gray(gray);
        assert_eq!((search.width(), search.height()), (9, 4));
    }
}
