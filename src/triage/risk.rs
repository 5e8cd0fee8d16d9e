use tracing::debug;

use crate::config::RiskConfig;
use crate::models::{
    BurnDegree, InfectionReport, InfectionRisk, Measurement, RiskAssessment, RiskLevel, WoundType,
};

/// Combine size, wound types and infection into one risk verdict.
///
/// Every label contributes, so independent concerns stack. Confidence is
/// a fixed value per tier.
pub fn aggregate(
    measurement: &Measurement,
    wound_types: &[WoundType],
    infection: &InfectionReport,
    config: &RiskConfig,
) -> RiskAssessment {
    let score = risk_score(measurement, wound_types, infection, config);

    let (level, confidence) = if score >= config.critical_score {
        (RiskLevel::Critical, config.critical_confidence)
    } else if score >= config.moderate_score {
        (RiskLevel::Moderate, config.moderate_confidence)
    } else {
        (RiskLevel::Low, config.low_confidence)
    };

    debug!(score, level = level.as_str(), "risk aggregated");
    RiskAssessment { level, confidence }
}

pub fn risk_score(
    measurement: &Measurement,
    wound_types: &[WoundType],
    infection: &InfectionReport,
    config: &RiskConfig,
) -> u32 {
    let area = measurement.area_px;
    let size_score = if area > config.very_large_area {
        3
    } else if area > config.large_area {
        2
    } else if area > config.medium_area {
        1
    } else {
        0
    };

    let type_score: u32 = wound_types.iter().map(|t| wound_type_weight(t, config)).sum();

    let infection_score = match infection.risk_level {
        InfectionRisk::High => config.high_infection_weight,
        InfectionRisk::Moderate => config.moderate_infection_weight,
        InfectionRisk::Low => 0,
    };

    size_score + type_score + infection_score
}

fn wound_type_weight(wound_type: &WoundType, config: &RiskConfig) -> u32 {
    match wound_type {
        WoundType::Burn(BurnDegree::Third) => config.emergency_burn_weight,
        WoundType::Burn(BurnDegree::Second) | WoundType::Puncture => config.serious_wound_weight,
        WoundType::Laceration => config.laceration_weight,
        WoundType::Burn(BurnDegree::First)
        | WoundType::Abrasion
        | WoundType::OpenWound
        | WoundType::Unknown => 0,
    }
}
