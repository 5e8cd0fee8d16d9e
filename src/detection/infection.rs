use image::RgbImage;
use tracing::debug;

use crate::config::InfectionConfig;
use crate::detection::preprocessing::{self, HsvImage};
use crate::models::{InfectionReport, InfectionRisk, InfectionSign, Mask};

/// Intermediate masks behind an infection screen, kept for debug dumps
#[derive(Debug, Clone)]
pub struct InfectionMasks {
    pub discharge: Mask,
    pub necrosis: Mask,
    /// Band around the wound obtained by dilation minus the wound itself
    pub ring: Mask,
}

/// Signal ratios measured by the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfectionRatios {
    pub discharge: f64,
    pub necrosis: f64,
    pub inflammation: f64,
}

/// Score visual infection signs in and around the wound mask.
pub fn screen(img: &RgbImage, wound_mask: &Mask, config: &InfectionConfig) -> InfectionReport {
    let hsv = preprocessing::to_hsv(img);
    screen_with_masks(img, &hsv, wound_mask, config).0
}

/// Screen with a precomputed HSV view of `img`, also returning the
/// intermediate masks.
pub fn screen_with_masks(
    img: &RgbImage,
    hsv: &HsvImage,
    wound_mask: &Mask,
    config: &InfectionConfig,
) -> (InfectionReport, InfectionMasks) {
    let gray = preprocessing::to_grayscale(img);
    let wound_pixels = preprocessing::count_nonzero(wound_mask);

    // Yellow/green discharge inside the wound
    let yellow = preprocessing::in_range(hsv, &config.yellow);
    let green = preprocessing::in_range(hsv, &config.green);
    let discharge = preprocessing::intersect(&preprocessing::union(&yellow, &green), wound_mask);
    let discharge_ratio = ratio(preprocessing::count_nonzero(&discharge), wound_pixels);

    // Dark tissue inside the wound
    let dark = preprocessing::intensity_range(&gray, 0, config.necrotic_max_intensity);
    let necrosis = preprocessing::intersect(&dark, wound_mask);
    let necrosis_ratio = ratio(preprocessing::count_nonzero(&necrosis), wound_pixels);

    // Intense red halo just outside the wound
    let dilated = preprocessing::dilate(wound_mask, config.halo_kernel_size, config.halo_iterations);
    let ring = preprocessing::subtract(&dilated, wound_mask);
    let intense_red = preprocessing::in_range(hsv, &config.intense_red);
    let inflamed = preprocessing::intersect(&intense_red, &ring);
    let inflammation_ratio = ratio(
        preprocessing::count_nonzero(&inflamed),
        preprocessing::count_nonzero(&ring),
    );

    let ratios = InfectionRatios {
        discharge: discharge_ratio,
        necrosis: necrosis_ratio,
        inflammation: inflammation_ratio,
    };
    let report = assess(ratios, config);
    debug!(?ratios, tally = report.risk_factor_count, level = ?report.risk_level, "infection screened");

    (
        report,
        InfectionMasks {
            discharge,
            necrosis,
            ring,
        },
    )
}

/// Turn measured ratios into signs, a risk-factor tally and a level.
pub fn assess(ratios: InfectionRatios, config: &InfectionConfig) -> InfectionReport {
    let mut signs = Vec::new();
    let mut tally = 0;

    if ratios.discharge > config.discharge_ratio {
        signs.push(InfectionSign::Discharge);
        tally += config.discharge_weight;
    }
    if ratios.necrosis > config.necrosis_ratio {
        signs.push(InfectionSign::Necrosis);
        tally += config.necrosis_weight;
    }
    if ratios.inflammation > config.inflammation_ratio {
        signs.push(InfectionSign::Inflammation);
        tally += config.inflammation_weight;
    }

    let risk_level = if tally >= config.high_tally {
        InfectionRisk::High
    } else if tally >= config.moderate_tally {
        InfectionRisk::Moderate
    } else {
        signs.push(InfectionSign::NoObviousSigns);
        InfectionRisk::Low
    };

    InfectionReport {
        risk_level,
        signs,
        risk_factor_count: tally,
    }
}

fn ratio(hits: u64, total: u64) -> f64 {
    hits as f64 / total.max(1) as f64
}
