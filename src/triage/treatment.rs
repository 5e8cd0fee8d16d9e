use crate::config::TreatmentConfig;
use crate::models::{
    InfectionReport, InfectionRisk, Measurement, RiskAssessment, RiskLevel, TreatmentPlan, Urgency,
    WoundType,
};

/// Warning signs that always accompany a plan, in this order
pub const EMERGENCY_TRIGGERS: [&str; 5] = [
    "Bleeding doesn't stop after 10 minutes of pressure",
    "Wound edges gap open or won't stay closed",
    "Signs of infection worsen (fever, red streaks, increased pus)",
    "Numbness or loss of function in affected area",
    "Object embedded in wound",
];

const EMERGENCY_STEPS: [&str; 2] = [
    "CALL EMERGENCY SERVICES (911) IMMEDIATELY",
    "Do NOT attempt home treatment - professional care required",
];

const URGENT_STEPS: [&str; 1] = ["Seek medical attention within 2-4 hours"];

const SEVERE_BURN_STEPS: [&str; 2] = [
    "Cover burn loosely with sterile gauze - DO NOT remove clothing stuck to burn",
    "Elevate burned area above heart if possible",
];

const BURN_STEPS: [&str; 3] = [
    "Cool burn under running water for 10-20 minutes",
    "Cover with sterile, non-stick dressing",
    "DO NOT apply ice, butter, or ointments to burns",
];

const WOUND_CARE_STEPS: [&str; 6] = [
    "Stop any bleeding by applying direct pressure with clean cloth",
    "Clean wound gently with clean water or saline solution",
    "Remove any visible debris with clean tweezers",
    "Apply antibiotic ointment (like Neosporin) if not allergic",
    "Cover with sterile bandage or gauze",
    "Change dressing daily or when wet/dirty",
];

const INFECTION_STEPS: [&str; 2] = [
    "Signs of infection present - see doctor for antibiotics",
    "Watch for fever, increased pain, or spreading redness",
];

const CLOSURE_STEPS: [&str; 1] = ["Wound may require stitches or surgical closure"];

const PUNCTURE_STEPS: [&str; 2] = [
    "Tetanus shot may be needed if not up to date",
    "Puncture wounds have high infection risk - monitor closely",
];

const GENERAL_STEPS: [&str; 3] = [
    "Take over-the-counter pain reliever (ibuprofen or acetaminophen)",
    "Elevate injured area to reduce swelling",
    "Avoid picking at scabs or removing bandages prematurely",
];

/// Build the ordered care instructions for an assessed wound.
///
/// Blocks are concatenated in a fixed order; only the burn and general
/// wound-care blocks exclude each other.
pub fn plan(
    risk: &RiskAssessment,
    wound_types: &[WoundType],
    infection: &InfectionReport,
    measurement: &Measurement,
    config: &TreatmentConfig,
) -> TreatmentPlan {
    let urgency = Urgency::from(risk.level);
    let mut steps: Vec<&str> = Vec::new();

    match urgency {
        Urgency::Emergency => steps.extend(EMERGENCY_STEPS),
        Urgency::Urgent => steps.extend(URGENT_STEPS),
        Urgency::Monitor => {}
    }

    if wound_types.iter().any(WoundType::is_burn) {
        if wound_types.iter().any(WoundType::is_emergency) {
            steps.extend(SEVERE_BURN_STEPS);
        } else {
            steps.extend(BURN_STEPS);
        }
    } else {
        steps.extend(WOUND_CARE_STEPS);
    }

    if matches!(infection.risk_level, InfectionRisk::Moderate | InfectionRisk::High) {
        steps.extend(INFECTION_STEPS);
    }

    if measurement.area_px > config.closure_area {
        steps.extend(CLOSURE_STEPS);
    }

    if wound_types.iter().any(WoundType::is_puncture) {
        steps.extend(PUNCTURE_STEPS);
    }

    steps.extend(GENERAL_STEPS);

    TreatmentPlan {
        urgency,
        steps: steps.into_iter().map(String::from).collect(),
        emergency_triggers: EMERGENCY_TRIGGERS.iter().map(|s| s.to_string()).collect(),
    }
}

/// One-line summary shown with a full assessment
pub fn summary_message(level: RiskLevel, wound_types: &[WoundType]) -> String {
    match level {
        RiskLevel::Critical => {
            "CRITICAL WOUND DETECTED. Seek emergency medical care immediately!".to_string()
        }
        RiskLevel::Moderate => {
            let labels: Vec<String> = wound_types.iter().map(ToString::to_string).collect();
            format!(
                "Wound detected: {}. Medical attention recommended.",
                labels.join(", ")
            )
        }
        RiskLevel::Low => {
            "Minor wound detected. Follow treatment recommendations and monitor for changes."
                .to_string()
        }
    }
}
