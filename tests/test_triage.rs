//! Risk, treatment and healing-trend tests
//!
//! Covers:
//! - risk tiers and their fixed confidences
//! - contributions stacking across wound types
//! - strict size thresholds
//! - treatment blocks, their order and the constant warning list
//! - summary messages per tier
//! - comparison against an earlier record, including malformed records
//! - whole-pixel earlier areas staying integers on the wire

mod common;

use anyhow::Result;
use common::*;
use serde_json::json;
use trauma_eye::config::{ComparisonConfig, RiskConfig, TreatmentConfig};
use trauma_eye::triage::treatment::EMERGENCY_TRIGGERS;
use trauma_eye::triage::{PreviousRecord, aggregate, compare, plan, summary_message};

#[test]
fn test_large_charred_burn_is_critical() -> Result<()> {
    let risk = aggregate(
        &measurement_with_area(60_000),
        &[WoundType::Burn(BurnDegree::Third)],
        &infection_with(InfectionRisk::Low),
        &RiskConfig::default(),
    );

    assert_eq!(risk.level, RiskLevel::Critical);
    assert_eq!(risk.confidence, 0.85);

    Ok(())
}

#[test]
fn test_wound_type_contributions_stack() -> Result<()> {
    let config = RiskConfig::default();

    // Size 1 + laceration 1 + puncture 2 = 4
    let risk = aggregate(
        &measurement_with_area(10_000),
        &[WoundType::Laceration, WoundType::Puncture],
        &infection_with(InfectionRisk::Low),
        &config,
    );
    assert_eq!(risk.level, RiskLevel::Moderate);
    assert_eq!(risk.confidence, 0.75);

    // Same photo without the puncture: 2, LOW
    let risk = aggregate(
        &measurement_with_area(10_000),
        &[WoundType::Laceration],
        &infection_with(InfectionRisk::Low),
        &config,
    );
    assert_eq!(risk.level, RiskLevel::Low);
    assert_eq!(risk.confidence, 0.70);

    Ok(())
}

#[test]
fn test_size_thresholds_are_strict() -> Result<()> {
    let config = RiskConfig::default();
    let infection = infection_with(InfectionRisk::Low);
    let types = [WoundType::OpenWound];

    // 50 000 is "large" (2), not "very large" (3)
    let at_limit = aggregate(&measurement_with_area(50_000), &types, &infection, &config);
    assert_eq!(at_limit.level, RiskLevel::Low);

    let above = aggregate(&measurement_with_area(50_001), &types, &infection, &config);
    assert_eq!(above.level, RiskLevel::Moderate);

    Ok(())
}

#[test]
fn test_infection_alone_raises_risk() -> Result<()> {
    let risk = aggregate(
        &measurement_with_area(100),
        &[WoundType::OpenWound],
        &infection_with(InfectionRisk::High),
        &RiskConfig::default(),
    );
    assert_eq!(risk.level, RiskLevel::Moderate);
    Ok(())
}

#[test]
fn test_aggregation_is_pure() -> Result<()> {
    let config = RiskConfig::default();
    let measurement = measurement_with_area(25_000);
    let types = [WoundType::Abrasion, WoundType::Puncture];
    let infection = infection_with(InfectionRisk::Moderate);

    let first = aggregate(&measurement, &types, &infection, &config);
    let second = aggregate(&measurement, &types, &infection, &config);
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_emergency_burn_plan() -> Result<()> {
    let types = [WoundType::Burn(BurnDegree::Third)];
    let infection = infection_with(InfectionRisk::Low);
    let measurement = measurement_with_area(60_000);
    let risk = aggregate(&measurement, &types, &infection, &RiskConfig::default());

    let plan = plan(&risk, &types, &infection, &measurement, &TreatmentConfig::default());

    assert_eq!(plan.urgency, Urgency::Emergency);
    // Emergency 2 + severe burn 2 + closure 1 + general 3
    assert_eq!(plan.steps.len(), 8, "Steps were {:?}", plan.steps);
    assert_eq!(plan.steps[0], "CALL EMERGENCY SERVICES (911) IMMEDIATELY");
    assert!(plan.steps[2].starts_with("Cover burn loosely"));
    assert_eq!(plan.steps[4], "Wound may require stitches or surgical closure");
    assert!(
        !plan.steps.iter().any(|s| s.starts_with("Stop any bleeding")),
        "Burns replace the general wound-care block"
    );

    Ok(())
}

#[test]
fn test_infected_puncture_plan() -> Result<()> {
    let types = [WoundType::Laceration, WoundType::Puncture];
    let infection = infection_with(InfectionRisk::Moderate);
    let measurement = measurement_with_area(10_000);
    let risk = aggregate(&measurement, &types, &infection, &RiskConfig::default());
    assert_eq!(risk.level, RiskLevel::Critical, "1 + 1 + 2 + 2 = 6");

    let plan = plan(&risk, &types, &infection, &measurement, &TreatmentConfig::default());

    assert_eq!(plan.urgency, Urgency::Emergency);
    // Emergency 2 + wound care 6 + infection 2 + puncture 2 + general 3
    assert_eq!(plan.steps.len(), 15, "Steps were {:?}", plan.steps);
    assert_eq!(plan.steps[8], "Signs of infection present - see doctor for antibiotics");
    assert_eq!(plan.steps[10], "Tetanus shot may be needed if not up to date");
    assert_eq!(
        plan.steps.last().map(String::as_str),
        Some("Avoid picking at scabs or removing bandages prematurely")
    );

    Ok(())
}

#[test]
fn test_minor_wound_plan() -> Result<()> {
    let types = [WoundType::OpenWound];
    let infection = infection_with(InfectionRisk::Low);
    let measurement = measurement_with_area(1_000);
    let risk = aggregate(&measurement, &types, &infection, &RiskConfig::default());

    let plan = plan(&risk, &types, &infection, &measurement, &TreatmentConfig::default());

    assert_eq!(plan.urgency, Urgency::Monitor);
    // Wound care 6 + general 3
    assert_eq!(plan.steps.len(), 9);
    assert_eq!(plan.steps[0], "Stop any bleeding by applying direct pressure with clean cloth");
    assert_eq!(plan.emergency_triggers.len(), 5);
    assert_eq!(plan.emergency_triggers, EMERGENCY_TRIGGERS.map(String::from));

    Ok(())
}

#[test]
fn test_summary_messages() -> Result<()> {
    assert_eq!(
        summary_message(RiskLevel::Critical, &[WoundType::OpenWound]),
        "CRITICAL WOUND DETECTED. Seek emergency medical care immediately!"
    );
    assert_eq!(
        summary_message(RiskLevel::Moderate, &[WoundType::Laceration, WoundType::Puncture]),
        "Wound detected: Laceration (cut with jagged edges), Puncture wound (deep). \
         Medical attention recommended."
    );
    assert!(summary_message(RiskLevel::Low, &[]).starts_with("Minor wound detected."));
    Ok(())
}

#[test]
fn test_healing_trend() -> Result<()> {
    let config = ComparisonConfig::default();
    let previous = PreviousRecord { area_px: 100.0 };

    // 1. Shrinking
    let improving = compare(&measurement_with_area(80), &previous, &config)
        .expect("Comparison should be produced");
    assert_eq!(improving.healing_status, HealingStatus::Improving);
    assert_eq!(improving.percent_change, -20.0);
    assert_eq!(improving.comparison, "Wound decreased by 20.0% - healing well");

    // 2. Growing
    let worsening = compare(&measurement_with_area(125), &previous, &config)
        .expect("Comparison should be produced");
    assert_eq!(worsening.healing_status, HealingStatus::Worsening);
    assert_eq!(worsening.percent_change, 25.0);

    // 3. Within the band, boundary included
    let stable = compare(&measurement_with_area(105), &previous, &config)
        .expect("Comparison should be produced");
    assert_eq!(stable.healing_status, HealingStatus::Stable);
    let boundary = compare(&measurement_with_area(90), &previous, &config)
        .expect("Comparison should be produced");
    assert_eq!(boundary.healing_status, HealingStatus::Stable, "-10% is not improving");

    // 4. Rounded to two decimals
    let rounded = compare(&measurement_with_area(1), &PreviousRecord { area_px: 3.0 }, &config)
        .expect("Comparison should be produced");
    assert_eq!(rounded.percent_change, -66.67);

    Ok(())
}

#[test]
fn test_previous_area_keeps_its_number_form() -> Result<()> {
    let config = ComparisonConfig::default();

    // 1. Integer area in, integer area out
    let previous = PreviousRecord::from_value(&json!({"area_pixels": 100}))
        .expect("Record should parse");
    let whole = compare(&measurement_with_area(80), &previous, &config)
        .expect("Comparison should be produced");
    let value = serde_json::to_value(&whole)?;
    assert_eq!(value["previous_area_pixels"], json!(100));
    assert!(value["previous_area_pixels"].is_u64(), "100 must not become 100.0");
    assert_eq!(value["current_area_pixels"], json!(80));

    // 2. Fractional area is kept as given
    let fractional = compare(&measurement_with_area(40), &PreviousRecord { area_px: 42.5 }, &config)
        .expect("Comparison should be produced");
    let value = serde_json::to_value(&fractional)?;
    assert_eq!(value["previous_area_pixels"], json!(42.5));

    Ok(())
}

#[test]
fn test_previous_record_parsing() -> Result<()> {
    // 1. Shape of an earlier result
    let nested = json!({"measurements": {"area_pixels": 1500}});
    assert_eq!(
        PreviousRecord::from_value(&nested),
        Some(PreviousRecord { area_px: 1500.0 })
    );

    // 2. Flat shape
    let flat = json!({"area_pixels": 42.5});
    assert_eq!(
        PreviousRecord::from_value(&flat),
        Some(PreviousRecord { area_px: 42.5 })
    );

    // 3. Unusable records
    for bad in [
        json!({}),
        json!({"measurements": {"area_pixels": "large"}}),
        json!({"measurements": {"area_pixels": 0}}),
        json!({"area_pixels": -5}),
        json!("not an object"),
    ] {
        assert_eq!(PreviousRecord::from_value(&bad), None, "Record {bad} should be ignored");
    }

    // 4. Zero previous area never yields a comparison
    let none = compare(
        &measurement_with_area(100),
        &PreviousRecord { area_px: 0.0 },
        &ComparisonConfig::default(),
    );
    assert!(none.is_none());

    Ok(())
}
