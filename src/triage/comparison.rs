use serde_json::Value;
use tracing::debug;

use crate::config::ComparisonConfig;
use crate::models::{ComparisonResult, HealingStatus, Measurement};

/// The part of a caller-supplied earlier analysis that comparison needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviousRecord {
    pub area_px: f64,
}

impl PreviousRecord {
    /// Read the prior area from `measurements.area_pixels` (the shape of
    /// an earlier result) or a top-level `area_pixels`.
    ///
    /// Anything missing, non-numeric, zero or negative gives `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let area = value
            .get("measurements")
            .and_then(|m| m.get("area_pixels"))
            .or_else(|| value.get("area_pixels"))?
            .as_f64()?;

        if !area.is_finite() || area <= 0.0 {
            return None;
        }
        Some(Self { area_px: area })
    }
}

/// Healing trend between an earlier and the current measurement.
pub fn compare(
    current: &Measurement,
    previous: &PreviousRecord,
    config: &ComparisonConfig,
) -> Option<ComparisonResult> {
    if !previous.area_px.is_finite() || previous.area_px <= 0.0 {
        return None;
    }

    let current_area = current.area_px as f64;
    let change = (current_area - previous.area_px) / previous.area_px * 100.0;
    if !change.is_finite() {
        return None;
    }
    let percent_change = (change * 100.0).round() / 100.0;

    let (healing_status, comparison) = if change < config.improving_below_percent {
        (
            HealingStatus::Improving,
            format!("Wound decreased by {:.1}% - healing well", change.abs()),
        )
    } else if change > config.worsening_above_percent {
        (
            HealingStatus::Worsening,
            format!("Wound increased by {:.1}% - seek medical attention", change),
        )
    } else {
        (
            HealingStatus::Stable,
            format!("Wound size stable (±{:.1}%)", change.abs()),
        )
    };

    debug!(percent_change, status = ?healing_status, "wound compared");

    Some(ComparisonResult {
        healing_status,
        comparison,
        percent_change,
        previous_area_px: previous.area_px,
        current_area_px: current.area_px,
    })
}
