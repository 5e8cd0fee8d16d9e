use image::RgbImage;
use tracing::debug;

use crate::config::QualityConfig;
use crate::detection::preprocessing;
use crate::models::QualityReport;

/// Score a photo for resolution, lighting and focus.
///
/// Penalties are additive from a base of 100; the reported score is
/// clamped at 0. Issues are only listed when the photo is rejected.
pub fn check_quality(img: &RgbImage, config: &QualityConfig) -> QualityReport {
    let mut issues = Vec::new();
    let mut score: i32 = 100;

    let (width, height) = img.dimensions();
    if height < config.min_height || width < config.min_width {
        issues.push(format!(
            "Resolution too low ({}x{}). Minimum: {}x{}",
            width, height, config.min_width, config.min_height
        ));
        score -= config.resolution_penalty;
    }

    let gray = preprocessing::to_grayscale(img);
    let brightness = preprocessing::mean_intensity(&gray);

    if brightness < config.min_brightness {
        issues.push("Image too dark. Use better lighting.".to_string());
        score -= config.dark_penalty;
    } else if brightness > config.max_brightness {
        issues.push("Image too bright. Reduce lighting or avoid flash.".to_string());
        score -= config.bright_penalty;
    }

    let sharpness = preprocessing::laplacian_variance(&gray);
    if sharpness < config.blur_threshold {
        issues.push("Image is blurry. Hold camera steady and focus on wound.".to_string());
        score -= config.blur_penalty;
    }

    let acceptable = score >= config.min_acceptable_score;
    debug!(
        raw_score = score,
        brightness, sharpness, acceptable, "photo quality checked"
    );

    QualityReport {
        acceptable,
        score: score.max(0),
        issues: if acceptable { Vec::new() } else { issues },
        brightness,
        sharpness,
    }
}
