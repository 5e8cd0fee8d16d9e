use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::laplacian_filter;
use imageproc::morphology;
use palette::{Hsv, IntoColor, Srgb};

use crate::config::HsvRange;

/// Convert image to grayscale with BT.601 luma weights
/// (0.299 R + 0.587 G + 0.114 B, rounded).
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
        Luma([((weighted + 500) / 1000) as u8])
    })
}

/// Three-channel image holding (H, S, V) instead of (R, G, B)
pub type HsvImage = RgbImage;

/// Convert to HSV on the 8-bit scale: hue 0-180 (degrees / 2),
/// saturation and value 0-255.
pub fn to_hsv(img: &RgbImage) -> HsvImage {
    let mut hsv_img = RgbImage::new(img.width(), img.height());

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let hsv: Hsv = Srgb::new(r, g, b).into_format::<f32>().into_color();

        let hue = (hsv.hue.into_positive_degrees() / 2.0).round().min(180.0) as u8;
        let saturation = (hsv.saturation * 255.0).round().clamp(0.0, 255.0) as u8;
        let value = (hsv.value * 255.0).round().clamp(0.0, 255.0) as u8;

        hsv_img.put_pixel(x, y, image::Rgb([hue, saturation, value]));
    }

    hsv_img
}

/// Mask of HSV pixels inside the inclusive range
pub fn in_range(hsv: &HsvImage, range: &HsvRange) -> GrayImage {
    GrayImage::from_fn(hsv.width(), hsv.height(), |x, y| {
        if range.contains(hsv.get_pixel(x, y).0) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Mask of grayscale pixels with intensity in `low..=high`
pub fn intensity_range(gray: &GrayImage, low: u8, high: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        if v >= low && v <= high {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

fn combine(a: &GrayImage, b: &GrayImage, op: impl Fn(bool, bool) -> bool) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        let in_a = a.get_pixel(x, y)[0] > 0;
        let in_b = b.get_pixel(x, y)[0] > 0;
        if op(in_a, in_b) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
    combine(a, b, |p, q| p || q)
}

pub fn intersect(a: &GrayImage, b: &GrayImage) -> GrayImage {
    combine(a, b, |p, q| p && q)
}

/// Pixels in `a` but not in `b`
pub fn subtract(a: &GrayImage, b: &GrayImage) -> GrayImage {
    combine(a, b, |p, q| p && !q)
}

pub fn count_nonzero(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|p| p[0] > 0).count() as u64
}

// Repeating a square structuring element n times is the same as one
// square of n times the radius.
fn square_radius(kernel_size: u32, iterations: u32) -> u8 {
    let radius = (kernel_size / 2) * iterations;
    u8::try_from(radius).unwrap_or(u8::MAX)
}

/// Morphological closing (fills small gaps) with a square kernel
pub fn close(mask: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
    morphology::close(mask, Norm::LInf, square_radius(kernel_size, iterations))
}

/// Morphological opening (strips small specks) with a square kernel
pub fn open(mask: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
    morphology::open(mask, Norm::LInf, square_radius(kernel_size, iterations))
}

pub fn dilate(mask: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
    morphology::dilate(mask, Norm::LInf, square_radius(kernel_size, iterations))
}

pub fn mean_intensity(gray: &GrayImage) -> f64 {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = gray.pixels().map(|p| p[0] as u64).sum();
    sum as f64 / count as f64
}

/// Variance of the Laplacian response; low values mean a blurry photo
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return 0.0;
    }

    let response = laplacian_filter(gray);
    let n = count as f64;
    let mean = response.pixels().map(|p| p[0] as f64).sum::<f64>() / n;
    response
        .pixels()
        .map(|p| {
            let d = p[0] as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}
