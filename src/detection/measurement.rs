use crate::config::MeasurementConfig;
use crate::models::{Measurement, Region, SizeCategory};

/// Derive size descriptors from the selected region's bounding box.
pub fn measure(region: &Region, config: &MeasurementConfig) -> Measurement {
    let bbox = region.bbox;
    let length_cm = (bbox.width + bbox.height) as f64 / (2.0 * config.pixels_per_cm);

    Measurement {
        height_px: bbox.height,
        width_px: bbox.width,
        area_px: region.area.max(0.0) as u64,
        length_cm,
        estimated_length: format!("~{:.1}cm", length_cm),
        size_category: size_category(length_cm, config),
        bounding_box: bbox,
    }
}

pub fn size_category(length_cm: f64, config: &MeasurementConfig) -> SizeCategory {
    if length_cm < config.small_max_cm {
        SizeCategory::Small
    } else if length_cm < config.medium_max_cm {
        SizeCategory::Medium
    } else if length_cm < config.large_max_cm {
        SizeCategory::Large
    } else {
        SizeCategory::VeryLarge
    }
}
