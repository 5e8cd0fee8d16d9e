use image::RgbImage;
use tracing::debug;

use crate::config::ClassificationConfig;
use crate::detection::preprocessing;
use crate::models::{BurnDegree, Region, WoundType};

/// Tissue tone fractions over the region's bounding crop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneFractions {
    pub charred: f64,
    pub pale: f64,
}

/// Assign wound-type labels to the selected region.
///
/// Rules run in a fixed order (burn, edge shape, puncture) and each may
/// add a label. With no label from any rule the region is a general
/// open wound. The result is never empty.
pub fn classify(img: &RgbImage, region: &Region, config: &ClassificationConfig) -> Vec<WoundType> {
    let Some(tones) = tone_fractions(img, region, config) else {
        return vec![WoundType::Unknown];
    };

    let mut wound_types = Vec::new();

    if let Some(degree) = burn_degree(tones, config) {
        wound_types.push(WoundType::Burn(degree));
    }

    // Shared by the edge-shape and puncture rules
    let circularity = region.circularity();

    if circularity < config.laceration_max_circularity {
        wound_types.push(WoundType::Laceration);
    } else if circularity < config.abrasion_max_circularity {
        wound_types.push(WoundType::Abrasion);
    }

    if region.area < config.puncture_max_area && circularity > config.puncture_min_circularity {
        wound_types.push(WoundType::Puncture);
    }

    if wound_types.is_empty() {
        wound_types.push(WoundType::OpenWound);
    }

    debug!(
        charred = tones.charred,
        pale = tones.pale,
        circularity,
        area = region.area,
        labels = ?wound_types,
        "wound classified"
    );

    wound_types
}

/// Charred and pale fractions of the crop bounding the region, or
/// `None` when the crop is empty.
pub fn tone_fractions(
    img: &RgbImage,
    region: &Region,
    config: &ClassificationConfig,
) -> Option<ToneFractions> {
    let bbox = region.bbox;
    if bbox.x >= img.width() || bbox.y >= img.height() {
        return None;
    }
    let width = bbox.width.min(img.width() - bbox.x);
    let height = bbox.height.min(img.height() - bbox.y);
    if width == 0 || height == 0 {
        return None;
    }

    let crop = image::imageops::crop_imm(img, bbox.x, bbox.y, width, height).to_image();
    let gray = preprocessing::to_grayscale(&crop);
    let total = (width as u64 * height as u64) as f64;

    let charred = gray
        .pixels()
        .filter(|p| p[0] < config.charred_intensity)
        .count() as f64;
    let pale = gray
        .pixels()
        .filter(|p| p[0] > config.pale_intensity)
        .count() as f64;

    Some(ToneFractions {
        charred: charred / total,
        pale: pale / total,
    })
}

/// Burn grading from tissue tones: charring dominates, then pallor.
pub fn burn_degree(tones: ToneFractions, config: &ClassificationConfig) -> Option<BurnDegree> {
    if tones.charred <= config.charred_burn_fraction && tones.pale <= config.pale_burn_fraction {
        return None;
    }

    if tones.charred > config.third_degree_charred_fraction {
        Some(BurnDegree::Third)
    } else if tones.pale > config.second_degree_pale_fraction {
        Some(BurnDegree::Second)
    } else {
        Some(BurnDegree::First)
    }
}
