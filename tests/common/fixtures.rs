use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use std::io::Cursor;
use trauma_eye::{
    BoundingBox, InfectionReport, InfectionRisk, InfectionSign, Measurement, SizeCategory,
};

/// Neutral background: zero saturation, so never segmented as tissue
pub const GRAY_BACKGROUND: Rgb<u8> = Rgb([128, 128, 128]);
/// Hue ~2 on the 0-180 scale, well inside the low red band
pub const WOUND_RED: Rgb<u8> = Rgb([220, 30, 20]);
/// Saturated, bright red for the inflammation halo
pub const INTENSE_RED: Rgb<u8> = Rgb([230, 20, 20]);
/// Hue ~27: yellow discharge
pub const PUS_YELLOW: Rgb<u8> = Rgb([220, 200, 30]);
/// Dark enough to count as charred (grayscale < 50) yet still segmented as red
pub const CHARRED_RED: Rgb<u8> = Rgb([60, 5, 5]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([250, 250, 250]);
pub const GRASS_GREEN: Rgb<u8> = Rgb([20, 200, 20]);

pub fn solid_image(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

pub fn fill_disk(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as i64 - cx;
        let dy = y as i64 - cy;
        if dx * dx + dy * dy <= radius * radius {
            *pixel = color;
        }
    }
}

pub fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    for py in y..(y + height).min(img.height()) {
        for px in x..(x + width).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

/// 500x500 gray photo with one red disk in the middle
pub fn red_disk_image(radius: i64) -> RgbImage {
    let mut img = solid_image(500, 500, GRAY_BACKGROUND);
    fill_disk(&mut img, 250, 250, radius, WOUND_RED);
    img
}

/// One-pixel checkerboard of two gray levels: very sharp, mean brightness
/// halfway between the two.
pub fn checkerboard(width: u32, height: u32, a: u8, b: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let v = if (x + y) % 2 == 0 { a } else { b };
        Rgb([v, v, v])
    })
}

pub fn disk_mask(width: u32, height: u32, cx: i64, cy: i64, radius: i64) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let dx = x as i64 - cx;
        let dy = y as i64 - cy;
        if dx * dx + dy * dy <= radius * radius {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes
}

/// Bare base64 PNG payload
pub fn png_base64(img: &RgbImage) -> String {
    STANDARD.encode(png_bytes(img))
}

/// Base64 PNG payload with a media-type prefix
pub fn png_data_url(img: &RgbImage) -> String {
    format!("data:image/png;base64,{}", png_base64(img))
}

/// Measurement with only the area mattering
pub fn measurement_with_area(area_px: u64) -> Measurement {
    Measurement {
        height_px: 100,
        width_px: 100,
        area_px,
        length_cm: 1.0,
        estimated_length: "~1.0cm".to_string(),
        size_category: SizeCategory::Medium,
        bounding_box: BoundingBox {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        },
    }
}

pub fn infection_with(risk_level: InfectionRisk) -> InfectionReport {
    let (signs, risk_factor_count) = match risk_level {
        InfectionRisk::High => (vec![InfectionSign::Discharge, InfectionSign::Necrosis], 4),
        InfectionRisk::Moderate => (vec![InfectionSign::Discharge], 2),
        InfectionRisk::Low => (vec![InfectionSign::NoObviousSigns], 0),
    };
    InfectionReport {
        risk_level,
        signs,
        risk_factor_count,
    }
}
