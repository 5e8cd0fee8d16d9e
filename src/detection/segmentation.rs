use image::RgbImage;
use tracing::debug;

use crate::config::SegmentationConfig;
use crate::detection::preprocessing::HsvImage;
use crate::detection::{contours, preprocessing};
use crate::models::{Mask, Region};

/// Wound mask plus every region that survived the noise filter
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub mask: Mask,
    pub regions: Vec<Region>,
}

impl Segmentation {
    /// The region taken as "the wound"
    pub fn largest(&self) -> Option<&Region> {
        contours::largest_region(&self.regions)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Isolate red (exposed tissue / blood) regions from the background.
pub fn segment(img: &RgbImage, config: &SegmentationConfig) -> Segmentation {
    segment_hsv(&preprocessing::to_hsv(img), config)
}

/// Same as [`segment`] on an already converted image
pub fn segment_hsv(hsv: &HsvImage, config: &SegmentationConfig) -> Segmentation {
    // Red wraps around hue 0, so it takes two bands
    let low = preprocessing::in_range(hsv, &config.red_low);
    let high = preprocessing::in_range(hsv, &config.red_high);
    let raw = preprocessing::union(&low, &high);

    let closed = preprocessing::close(&raw, config.kernel_size, config.close_iterations);
    let mask = preprocessing::open(&closed, config.kernel_size, config.open_iterations);

    let regions = contours::find_regions(&mask, config.min_region_area);
    debug!(regions = regions.len(), "segmentation finished");

    Segmentation { mask, regions }
}
