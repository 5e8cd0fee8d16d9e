use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::AnnotationConfig;
use crate::models::Region;

static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/font.ttf");

/// Font for the region label: the bundled face unless a configured
/// file loads.
#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
}

impl LabelFont {
    pub fn bundled() -> Self {
        let font = FontArc::try_from_slice(BUNDLED_FONT).expect("bundled label font is valid");
        Self { font }
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let data = std::fs::read(path).ok()?;
        let font = FontArc::try_from_vec(data).ok()?;
        Some(Self { font })
    }

    /// Configured font when it loads, bundled font otherwise
    pub fn load(config: &AnnotationConfig) -> Self {
        let Some(path) = &config.font_path else {
            return Self::bundled();
        };

        match Self::from_file(path) {
            Some(font) => {
                debug!(path = %path.display(), "label font loaded");
                font
            }
            None => {
                warn!(path = %path.display(), "configured label font could not be loaded, using bundled font");
                Self::bundled()
            }
        }
    }
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont").finish_non_exhaustive()
    }
}

/// Draw every surviving region: its boundary, its bounding box and a label.
pub fn annotate(
    img: &RgbImage,
    regions: &[Region],
    font: &LabelFont,
    config: &AnnotationConfig,
) -> RgbImage {
    let mut canvas = img.clone();

    for region in regions {
        draw_boundary(&mut canvas, region, config);
        draw_box(&mut canvas, region, config);
        draw_label(&mut canvas, region, &font.font, config);
    }

    canvas
}

fn draw_boundary(canvas: &mut RgbImage, region: &Region, config: &AnnotationConfig) {
    let color = Rgb(config.boundary_color);
    let thickness = config.boundary_thickness.max(1);
    let half = (thickness / 2) as i32;

    // Boundary points are pixel-adjacent, so stamping a square at each
    // one yields a continuous line of the requested thickness.
    for p in &region.points {
        let rect = Rect::at(p.x - half, p.y - half).of_size(thickness, thickness);
        draw_filled_rect_mut(canvas, rect, color);
    }
}

fn draw_box(canvas: &mut RgbImage, region: &Region, config: &AnnotationConfig) {
    let color = Rgb(config.box_color);
    let bbox = region.bbox;

    for t in 0..config.box_thickness.max(1) {
        let width = (bbox.width + 1).saturating_sub(2 * t);
        let height = (bbox.height + 1).saturating_sub(2 * t);
        if width == 0 || height == 0 {
            break;
        }
        let rect = Rect::at(bbox.x as i32 + t as i32, bbox.y as i32 + t as i32).of_size(width, height);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn draw_label(canvas: &mut RgbImage, region: &Region, font: &FontArc, config: &AnnotationConfig) {
    if config.label.is_empty() {
        return;
    }

    let color = Rgb(config.label_color);
    let scale = PxScale::from(config.label_scale);
    // Baseline sits `label_offset` above the box
    let baseline = region.bbox.y as i32 - config.label_offset;
    let (_, text_height) = text_size(scale, font, &config.label);

    draw_text_mut(
        canvas,
        color,
        region.bbox.x as i32,
        baseline - text_height as i32,
        scale,
        font,
        &config.label,
    );
}
