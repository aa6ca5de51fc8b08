//! Color segmentation and blob analysis helpers

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::convex_hull;
use imageproc::morphology;
use imageproc::point::Point;
use imageproc::region_labelling::{Connectivity, connected_components};

pub const ON: u8 = 255;

/// Hue in degrees [0, 360), saturation and value on a 0..=255 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: u8,
    pub v: u8,
}

pub fn to_hsv(p: &Rgb<u8>) -> Hsv {
    let [r, g, b] = p.0.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };
    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta) + 120.0
    } else {
        60.0 * ((r - g) / delta) + 240.0
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    Hsv {
        h,
        s: s.round() as u8,
        v: max as u8,
    }
}

/// Binary mask of pixels satisfying `pred`
pub fn rgb_mask(image: &RgbImage, pred: impl Fn(&Rgb<u8>) -> bool) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([if pred(image.get_pixel(x, y)) { ON } else { 0 }])
    })
}

/// Binary mask of pixels whose HSV value satisfies `pred`
pub fn hsv_mask(image: &RgbImage, pred: impl Fn(Hsv) -> bool) -> GrayImage {
    rgb_mask(image, |p| pred(to_hsv(p)))
}

/// One mask per occupied hue bin of the pixels passing `pred`.
///
/// Bins are `360 / bins` degrees wide and bin 0 is centered on red, so a
/// flat color always lands in a single mask.
pub fn hue_bin_masks(image: &RgbImage, bins: u32, pred: impl Fn(Hsv) -> bool) -> Vec<GrayImage> {
    let bins = bins.max(1);
    let bin_width = 360.0 / bins as f32;
    let mut masks: Vec<Option<GrayImage>> = vec![None; bins as usize];
    for (x, y, p) in image.enumerate_pixels() {
        let hsv = to_hsv(p);
        if !pred(hsv) {
            continue;
        }
        let bin = ((hsv.h + bin_width / 2.0) / bin_width) as u32 % bins;
        masks[bin as usize]
            .get_or_insert_with(|| GrayImage::new(image.width(), image.height()))
            .put_pixel(x, y, Luma([ON]));
    }
    masks.into_iter().flatten().collect()
}

pub fn count_on(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] > 0).count()
}

/// Pixels brighter than their gaussian-weighted neighborhood by more than `offset`
pub fn adaptive_bright_mask(gray: &GrayImage, sigma: f32, offset: f32) -> GrayImage {
    let local_mean = gaussian_blur_f32(gray, sigma);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0] as f32;
        let mean = local_mean.get_pixel(x, y)[0] as f32;
        Luma([if v > mean + offset { ON } else { 0 }])
    })
}

/// Closing with a square window of side `2k+1`
pub fn close_square(mask: &GrayImage, k: u8) -> GrayImage {
    morphology::close(mask, Norm::LInf, k)
}

/// Opening then closing with a cross of radius `k`
pub fn open_close_cross(mask: &GrayImage, k: u8) -> GrayImage {
    let opened = morphology::open(mask, Norm::L1, k);
    morphology::close(&opened, Norm::L1, k)
}

pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        Luma([a.get_pixel(x, y)[0].max(b.get_pixel(x, y)[0])])
    })
}

/// `mask` with every pixel set in `exclude` cleared
pub fn subtract(mask: &GrayImage, exclude: &GrayImage) -> GrayImage {
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let keep = mask.get_pixel(x, y)[0] > 0 && exclude.get_pixel(x, y)[0] == 0;
        Luma([if keep { ON } else { 0 }])
    })
}

/// One 8-connected component of a mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub area: u32,
    pub min: (u32, u32),
    pub max: (u32, u32),
    pub centroid: (f32, f32),
    pub pixels: Vec<(u32, u32)>,
}

impl Blob {
    pub fn width(&self) -> u32 {
        self.max.0 - self.min.0 + 1
    }

    pub fn height(&self) -> u32 {
        self.max.1 - self.min.1 + 1
    }

    /// Pixel count over the area of the convex hull of the pixel squares.
    pub fn solidity(&self) -> f32 {
        let corners: Vec<Point<i32>> = self
            .pixels
            .iter()
            .flat_map(|&(x, y)| {
                let (x, y) = (x as i32, y as i32);
                [
                    Point::new(x, y),
                    Point::new(x + 1, y),
                    Point::new(x, y + 1),
                    Point::new(x + 1, y + 1),
                ]
            })
            .collect();
        let hull = convex_hull(corners.as_slice());
        let hull_area = polygon_area(&hull);
        if hull_area <= 0.0 {
            return 0.0;
        }
        (self.area as f64 / hull_area).min(1.0) as f32
    }
}

/// Shoelace area of a closed polygon
fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice.abs() as f64 / 2.0
}

/// All 8-connected components of the set pixels, largest first.
pub fn blobs(mask: &GrayImage) -> Vec<Blob> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    let mut found: Vec<Blob> = Vec::new();
    let mut sums: Vec<(u64, u64)> = Vec::new();

    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0] as usize;
        if label == 0 {
            continue;
        }
        if found.len() < label {
            found.resize_with(label, || Blob {
                area: 0,
                min: (u32::MAX, u32::MAX),
                max: (0, 0),
                centroid: (0.0, 0.0),
                pixels: Vec::new(),
            });
            sums.resize(label, (0, 0));
        }
        let blob = &mut found[label - 1];
        blob.area += 1;
        blob.min = (blob.min.0.min(x), blob.min.1.min(y));
        blob.max = (blob.max.0.max(x), blob.max.1.max(y));
        blob.pixels.push((x, y));
        sums[label - 1].0 += x as u64;
        sums[label - 1].1 += y as u64;
    }

    let mut blobs: Vec<Blob> = found
        .into_iter()
        .zip(sums)
        .filter(|(b, _)| b.area > 0)
        .map(|(mut b, (sx, sy))| {
            b.centroid = (sx as f32 / b.area as f32, sy as f32 / b.area as f32);
            b
        })
        .collect();
    // Stable sort keeps label order among equal areas
    blobs.sort_by(|a, b| b.area.cmp(&a.area));
    blobs
}

pub fn largest_blob(mask: &GrayImage) -> Option<Blob> {
    blobs(mask).into_iter().next()
}

/// Mask keeping only components of at most `max_area` pixels
pub fn keep_small_components(mask: &GrayImage, max_area: u32) -> GrayImage {
    let mut out = GrayImage::new(mask.width(), mask.height());
    for blob in blobs(mask).iter().filter(|b| b.area <= max_area) {
        for &(x, y) in &blob.pixels {
            out.put_pixel(x, y, Luma([ON]));
        }
    }
    out
}

/// Mask keeping only components larger than `min_area` pixels or `min_fraction` of the image
pub fn keep_large_components(mask: &GrayImage, min_area: u32, min_fraction: f32) -> GrayImage {
    let total = (mask.width() * mask.height()).max(1) as f32;
    let mut out = GrayImage::new(mask.width(), mask.height());
    for blob in blobs(mask)
        .iter()
        .filter(|b| b.area > min_area || b.area as f32 / total > min_fraction)
    {
        for &(x, y) in &blob.pixels {
            out.put_pixel(x, y, Luma([ON]));
        }
    }
    out
}
