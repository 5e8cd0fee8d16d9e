use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;

/// Inclusive HSV bounds on the 8-bit scale (H 0-180, S/V 0-255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }
}

/// All thresholds used by the analyzer. Immutable once handed to
/// [`crate::WoundAnalyzer`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub quality: QualityConfig,
    pub segmentation: SegmentationConfig,
    pub measurement: MeasurementConfig,
    pub classification: ClassificationConfig,
    pub infection: InfectionConfig,
    pub risk: RiskConfig,
    pub treatment: TreatmentConfig,
    pub comparison: ComparisonConfig,
    pub annotation: AnnotationConfig,
}

impl AnalyzerConfig {
    /// Parse a JSON document. Missing sections and fields keep their defaults.
    pub fn from_json_str(data: &str) -> Result<Self, AnalysisError> {
        serde_json::from_str(data).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AnalysisError> {
        let data = fs::read_to_string(path).map_err(|e| {
            AnalysisError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        serde_json::from_str(&data).map_err(|e| {
            AnalysisError::Config(format!("Failed to parse config {}: {e}", path.display()))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub min_width: u32,
    pub min_height: u32,
    pub min_brightness: f64,
    pub max_brightness: f64,
    /// Minimum Laplacian variance for a photo to count as sharp
    pub blur_threshold: f64,
    pub resolution_penalty: i32,
    pub dark_penalty: i32,
    pub bright_penalty: i32,
    pub blur_penalty: i32,
    pub min_acceptable_score: i32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_width: 400,
            min_height: 400,
            min_brightness: 40.0,
            max_brightness: 240.0,
            blur_threshold: 100.0,
            resolution_penalty: 40,
            dark_penalty: 30,
            bright_penalty: 20,
            blur_penalty: 30,
            min_acceptable_score: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Red below the hue wraparound
    pub red_low: HsvRange,
    /// Red above the hue wraparound
    pub red_high: HsvRange,
    /// Side of the square structuring element
    pub kernel_size: u32,
    pub close_iterations: u32,
    pub open_iterations: u32,
    /// Regions with enclosed area at or below this are noise
    pub min_region_area: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            red_low: HsvRange::new([0, 50, 50], [10, 255, 255]),
            red_high: HsvRange::new([170, 50, 50], [180, 255, 255]),
            kernel_size: 5,
            close_iterations: 2,
            open_iterations: 1,
            min_region_area: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Fixed scale assumption, not a calibration
    pub pixels_per_cm: f64,
    pub small_max_cm: f64,
    pub medium_max_cm: f64,
    pub large_max_cm: f64,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            pixels_per_cm: 100.0,
            small_max_cm: 1.0,
            medium_max_cm: 3.0,
            large_max_cm: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Grayscale strictly below this counts as charred
    pub charred_intensity: u8,
    /// Grayscale strictly above this counts as pale
    pub pale_intensity: u8,
    pub charred_burn_fraction: f64,
    pub pale_burn_fraction: f64,
    pub third_degree_charred_fraction: f64,
    pub second_degree_pale_fraction: f64,
    pub laceration_max_circularity: f64,
    pub abrasion_max_circularity: f64,
    pub puncture_max_area: f64,
    pub puncture_min_circularity: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            charred_intensity: 50,
            pale_intensity: 200,
            charred_burn_fraction: 0.15,
            pale_burn_fraction: 0.2,
            third_degree_charred_fraction: 0.3,
            second_degree_pale_fraction: 0.3,
            laceration_max_circularity: 0.3,
            abrasion_max_circularity: 0.6,
            puncture_max_area: 2000.0,
            puncture_min_circularity: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfectionConfig {
    pub yellow: HsvRange,
    pub green: HsvRange,
    /// Grayscale at or below this counts as necrotic
    pub necrotic_max_intensity: u8,
    pub intense_red: HsvRange,
    pub halo_kernel_size: u32,
    pub halo_iterations: u32,
    pub discharge_ratio: f64,
    pub necrosis_ratio: f64,
    pub inflammation_ratio: f64,
    pub discharge_weight: u32,
    pub necrosis_weight: u32,
    pub inflammation_weight: u32,
    pub high_tally: u32,
    pub moderate_tally: u32,
}

impl Default for InfectionConfig {
    fn default() -> Self {
        Self {
            yellow: HsvRange::new([20, 50, 50], [40, 255, 255]),
            green: HsvRange::new([40, 50, 50], [80, 255, 255]),
            necrotic_max_intensity: 40,
            intense_red: HsvRange::new([0, 100, 100], [10, 255, 255]),
            halo_kernel_size: 15,
            halo_iterations: 3,
            discharge_ratio: 0.05,
            necrosis_ratio: 0.1,
            inflammation_ratio: 0.3,
            discharge_weight: 2,
            necrosis_weight: 2,
            inflammation_weight: 1,
            high_tally: 3,
            moderate_tally: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub very_large_area: u64,
    pub large_area: u64,
    pub medium_area: u64,
    pub emergency_burn_weight: u32,
    pub serious_wound_weight: u32,
    pub laceration_weight: u32,
    pub high_infection_weight: u32,
    pub moderate_infection_weight: u32,
    pub critical_score: u32,
    pub moderate_score: u32,
    pub critical_confidence: f64,
    pub moderate_confidence: f64,
    pub low_confidence: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            very_large_area: 50_000,
            large_area: 20_000,
            medium_area: 5_000,
            emergency_burn_weight: 4,
            serious_wound_weight: 2,
            laceration_weight: 1,
            high_infection_weight: 3,
            moderate_infection_weight: 2,
            critical_score: 6,
            moderate_score: 3,
            critical_confidence: 0.85,
            moderate_confidence: 0.75,
            low_confidence: 0.70,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentConfig {
    /// Wounds above this pixel area get the closure advisory
    pub closure_area: u64,
}

impl Default for TreatmentConfig {
    fn default() -> Self {
        Self {
            closure_area: 20_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub improving_below_percent: f64,
    pub worsening_above_percent: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            improving_below_percent: -10.0,
            worsening_above_percent: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub label: String,
    pub boundary_color: [u8; 3],
    pub box_color: [u8; 3],
    pub label_color: [u8; 3],
    pub boundary_thickness: u32,
    pub box_thickness: u32,
    pub label_scale: f32,
    /// Gap between the label baseline and the top of the box
    pub label_offset: i32,
    /// TrueType font for the label. When unset or unreadable, the
    /// bundled font is used.
    pub font_path: Option<PathBuf>,
    pub jpeg_quality: u8,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            label: "WOUND".to_string(),
            boundary_color: [0, 255, 0],
            box_color: [0, 0, 255],
            label_color: [0, 0, 255],
            boundary_thickness: 3,
            box_thickness: 2,
            label_scale: 24.0,
            label_offset: 10,
            font_path: None,
            jpeg_quality: 95,
        }
    }
}
