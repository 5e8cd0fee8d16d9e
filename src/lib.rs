pub mod batch;
pub mod codec;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod triage;

pub use config::AnalyzerConfig;
pub use detection::WoundAnalyzer;
pub use error::AnalysisError;
pub use models::{
    BoundingBox, BurnDegree, ComparisonResult, HealingStatus, InfectionReport, InfectionRisk,
    InfectionSign, Mask, Measurement, QualityReport, Region, RiskAssessment, RiskLevel,
    SizeCategory, TreatmentPlan, Urgency, WoundType,
};
pub use pipeline::{DebugConfig, PipelineContext};
pub use report::{
    AnalysisOutcome, AnalysisRequest, AnalysisResponse, AnalysisResult, ErrorRecord,
    WoundAssessment,
};
