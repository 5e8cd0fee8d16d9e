use image::GrayImage;
use imageproc::point::Point;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::detection::contours;

/// Binary raster, 255 = inside, 0 = outside
pub type Mask = GrayImage;

/// Axis-aligned rectangle in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
}

impl BoundingBox {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A closed external boundary over a mask, with its derived geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub points: Vec<Point<i32>>,
    pub area: f64,
    pub perimeter: f64,
    pub bbox: BoundingBox,
}

impl Region {
    /// Build a region from an ordered boundary. Returns `None` for an
    /// empty boundary.
    pub fn from_boundary(points: Vec<Point<i32>>) -> Option<Self> {
        let bbox = contours::bounding_rect(&points)?;
        let area = contours::polygon_area(&points);
        let perimeter = contours::perimeter(&points);
        Some(Self {
            points,
            area,
            perimeter,
            bbox,
        })
    }

    /// 4π·area / perimeter²; 1.0 for a perfect circle
    pub fn circularity(&self) -> f64 {
        if self.perimeter <= 0.0 {
            return 0.0;
        }
        4.0 * std::f64::consts::PI * self.area / (self.perimeter * self.perimeter)
    }
}

macro_rules! serialize_as_display {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    #[serde(rename = "is_acceptable")]
    pub acceptable: bool,
    #[serde(rename = "quality_score")]
    pub score: i32,
    pub issues: Vec<String>,
    pub brightness: f64,
    pub sharpness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeCategory::Small => write!(f, "Small (<1cm)"),
            SizeCategory::Medium => write!(f, "Medium (1-3cm)"),
            SizeCategory::Large => write!(f, "Large (3-10cm)"),
            SizeCategory::VeryLarge => write!(f, "Very Large (>10cm)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    #[serde(rename = "length_pixels")]
    pub height_px: u32,
    #[serde(rename = "width_pixels")]
    pub width_px: u32,
    #[serde(rename = "area_pixels")]
    pub area_px: u64,
    #[serde(skip)]
    pub length_cm: f64,
    #[serde(rename = "estimated_cm")]
    pub estimated_length: String,
    pub size_category: SizeCategory,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnDegree {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WoundType {
    Burn(BurnDegree),
    Laceration,
    Abrasion,
    Puncture,
    OpenWound,
    Unknown,
}

impl WoundType {
    pub fn is_burn(&self) -> bool {
        matches!(self, WoundType::Burn(_))
    }

    /// Charred, full-thickness burn
    pub fn is_emergency(&self) -> bool {
        matches!(self, WoundType::Burn(BurnDegree::Third))
    }

    pub fn is_puncture(&self) -> bool {
        matches!(self, WoundType::Puncture)
    }
}

impl fmt::Display for WoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WoundType::Burn(BurnDegree::Third) => {
                write!(f, "3rd Degree Burn (charred tissue - EMERGENCY)")
            }
            WoundType::Burn(BurnDegree::Second) => {
                write!(f, "2nd Degree Burn (blisters/white tissue)")
            }
            WoundType::Burn(BurnDegree::First) => write!(f, "1st Degree Burn (redness)"),
            WoundType::Laceration => write!(f, "Laceration (cut with jagged edges)"),
            WoundType::Abrasion => write!(f, "Abrasion (scrape)"),
            WoundType::Puncture => write!(f, "Puncture wound (deep)"),
            WoundType::OpenWound => write!(f, "Open wound (general)"),
            WoundType::Unknown => write!(f, "Unknown wound type"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InfectionRisk {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfectionSign {
    Discharge,
    Necrosis,
    Inflammation,
    NoObviousSigns,
}

impl fmt::Display for InfectionSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfectionSign::Discharge => write!(f, "Yellow/green discharge detected (possible pus)"),
            InfectionSign::Necrosis => write!(f, "Dark/necrotic tissue detected"),
            InfectionSign::Inflammation => write!(f, "Excessive inflammation around wound"),
            InfectionSign::NoObviousSigns => write!(f, "No obvious signs of infection"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfectionReport {
    pub risk_level: InfectionRisk,
    pub signs: Vec<InfectionSign>,
    #[serde(rename = "risk_factors")]
    pub risk_factor_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Monitor,
    Urgent,
    Emergency,
}

impl From<RiskLevel> for Urgency {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Critical => Urgency::Emergency,
            RiskLevel::Moderate => Urgency::Urgent,
            RiskLevel::Low => Urgency::Monitor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentPlan {
    pub urgency: Urgency,
    pub steps: Vec<String>,
    #[serde(rename = "seek_emergency_if")]
    pub emergency_triggers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealingStatus {
    Improving,
    Stable,
    Worsening,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub healing_status: HealingStatus,
    pub comparison: String,
    #[serde(rename = "area_change_percent")]
    pub percent_change: f64,
    #[serde(rename = "previous_area_pixels", serialize_with = "serialize_area")]
    pub previous_area_px: f64,
    #[serde(rename = "current_area_pixels")]
    pub current_area_px: u64,
}

serialize_as_display!(SizeCategory, WoundType, InfectionSign);

// Whole-pixel areas go back out as integers, the way they came in
fn serialize_area<S: Serializer>(area: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if area.fract() == 0.0 && *area >= 0.0 && *area <= u64::MAX as f64 {
        serializer.serialize_u64(*area as u64)
    } else {
        serializer.serialize_f64(*area)
    }
}
