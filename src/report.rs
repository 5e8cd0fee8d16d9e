use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::{
    ComparisonResult, InfectionReport, Measurement, QualityReport, RiskAssessment, TreatmentPlan,
    WoundType,
};

pub const QUALITY_REJECTED_MESSAGE: &str =
    "Photo quality is insufficient for analysis. Please retake the photo.";
pub const NO_WOUND_MESSAGE: &str =
    "No wound detected in the image. Please ensure the wound is clearly visible.";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON input";

/// One analysis request as sent by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub previous_wound_data: Option<Value>,
}

/// Everything produced for a photo with a detected wound
#[derive(Debug, Clone, PartialEq)]
pub struct WoundAssessment {
    pub risk: RiskAssessment,
    pub message: String,
    pub wound_types: Vec<WoundType>,
    pub infection: InfectionReport,
    pub measurement: Measurement,
    pub treatment: TreatmentPlan,
    pub quality: QualityReport,
    pub comparison: Option<ComparisonResult>,
    /// Annotated photo as a JPEG data URL; absent if rendering failed
    pub visual_overlay: Option<String>,
}

/// The three non-error terminal shapes of an analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    QualityRejected { quality: QualityReport },
    NoWound { quality: QualityReport },
    Assessed(Box<WoundAssessment>),
}

impl AnalysisOutcome {
    /// Risk label as it appears on the wire
    pub fn risk_label(&self) -> &'static str {
        match self {
            AnalysisOutcome::QualityRejected { .. } => "UNKNOWN",
            AnalysisOutcome::NoWound { .. } => "NONE",
            AnalysisOutcome::Assessed(a) => a.risk.level.as_str(),
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            AnalysisOutcome::Assessed(a) => a.risk.confidence,
            _ => 0.0,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AnalysisOutcome::QualityRejected { .. } => QUALITY_REJECTED_MESSAGE,
            AnalysisOutcome::NoWound { .. } => NO_WOUND_MESSAGE,
            AnalysisOutcome::Assessed(a) => &a.message,
        }
    }

    pub fn quality(&self) -> &QualityReport {
        match self {
            AnalysisOutcome::QualityRejected { quality } | AnalysisOutcome::NoWound { quality } => {
                quality
            }
            AnalysisOutcome::Assessed(a) => &a.quality,
        }
    }

    pub fn assessment(&self) -> Option<&WoundAssessment> {
        match self {
            AnalysisOutcome::Assessed(a) => Some(a.as_ref()),
            _ => None,
        }
    }
}

/// A finished analysis, stamped with the time it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub outcome: AnalysisOutcome,
    pub timestamp: OffsetDateTime,
}

impl AnalysisResult {
    pub fn new(outcome: AnalysisOutcome) -> Self {
        Self {
            outcome,
            timestamp: now(),
        }
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let outcome = &self.outcome;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("risk", outcome.risk_label())?;
        map.serialize_entry("confidence", &outcome.confidence())?;

        if let Some(a) = outcome.assessment() {
            if let Some(overlay) = &a.visual_overlay {
                map.serialize_entry("visual_overlay", overlay)?;
            }
            map.serialize_entry("message", &a.message)?;
            map.serialize_entry("wound_types", &a.wound_types)?;
            map.serialize_entry("infection_analysis", &a.infection)?;
            map.serialize_entry("measurements", &a.measurement)?;
            map.serialize_entry("treatment_recommendations", &a.treatment)?;
            map.serialize_entry("photo_quality", &a.quality)?;
            map.serialize_entry("wound_comparison", &a.comparison)?;
        } else {
            map.serialize_entry("message", outcome.message())?;
            map.serialize_entry("photo_quality", outcome.quality())?;
        }

        map.serialize_entry("timestamp", &format_timestamp(&self.timestamp))?;
        map.end()
    }
}

/// Outward-facing failure record
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub message: String,
    pub timestamp: OffsetDateTime,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: now(),
        }
    }
}

impl Serialize for ErrorRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("error", &true)?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("timestamp", &format_timestamp(&self.timestamp))?;
        map.end()
    }
}

/// What a caller gets back for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Completed(AnalysisResult),
    Failed(ErrorRecord),
}

impl AnalysisResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        AnalysisResponse::Failed(ErrorRecord::new(message))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResponse::Failed(_))
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisResponse::Completed(r) => Some(r),
            AnalysisResponse::Failed(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn format_timestamp(ts: &OffsetDateTime) -> String {
    ts.format(&Rfc3339)
        .unwrap_or_else(|_| ts.unix_timestamp().to_string())
}
