#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from trauma_eye for tests
pub use trauma_eye::{
    AnalysisOutcome, AnalysisResponse, AnalyzerConfig, BurnDegree, HealingStatus, InfectionRisk,
    InfectionSign, RiskLevel, Urgency, WoundAnalyzer, WoundType,
};
