//! Infection screening tests
//!
//! Covers:
//! - discharge inside the wound (MODERATE)
//! - discharge plus necrosis (HIGH)
//! - an intensely red halo around the wound (inflammation)
//! - dark red tissue not mistaken for necrosis
//! - clean wounds and empty masks (LOW, "no obvious signs")
//! - strict ratio thresholds in the assessment step

mod common;

use anyhow::Result;
use common::*;
use image::Rgb;
use trauma_eye::config::InfectionConfig;
use trauma_eye::detection::infection::{InfectionRatios, assess, screen, screen_with_masks};
use trauma_eye::detection::preprocessing::to_hsv;

const SIZE: u32 = 500;

#[test]
fn test_yellow_discharge_is_moderate() -> Result<()> {
    let mut img = red_disk_image(60);
    fill_rect(&mut img, 230, 230, 40, 40, PUS_YELLOW);
    let mask = disk_mask(SIZE, SIZE, 250, 250, 60);

    let report = screen(&img, &mask, &InfectionConfig::default());

    assert_eq!(report.risk_level, InfectionRisk::Moderate);
    assert_eq!(report.signs, vec![InfectionSign::Discharge]);
    assert_eq!(report.risk_factor_count, 2);

    Ok(())
}

#[test]
fn test_discharge_and_necrosis_is_high() -> Result<()> {
    let mut img = red_disk_image(60);
    fill_rect(&mut img, 210, 230, 40, 40, PUS_YELLOW);
    fill_rect(&mut img, 255, 230, 40, 40, BLACK);
    let mask = disk_mask(SIZE, SIZE, 250, 250, 60);

    let report = screen(&img, &mask, &InfectionConfig::default());

    assert_eq!(report.risk_level, InfectionRisk::High);
    assert_eq!(
        report.signs,
        vec![InfectionSign::Discharge, InfectionSign::Necrosis],
        "Signs keep evaluation order"
    );
    assert_eq!(report.risk_factor_count, 4);

    Ok(())
}

#[test]
fn test_red_halo_is_inflammation() -> Result<()> {
    let mut img = solid_image(SIZE, SIZE, GRAY_BACKGROUND);
    fill_disk(&mut img, 250, 250, 95, INTENSE_RED);
    fill_disk(&mut img, 250, 250, 60, WOUND_RED);
    let mask = disk_mask(SIZE, SIZE, 250, 250, 60);

    let hsv = to_hsv(&img);
    let (report, masks) = screen_with_masks(&img, &hsv, &mask, &InfectionConfig::default());

    assert_eq!(report.signs, vec![InfectionSign::Inflammation]);
    assert_eq!(report.risk_factor_count, 1);
    assert_eq!(report.risk_level, InfectionRisk::Moderate);

    // The ring never overlaps the wound itself
    let overlap = masks
        .ring
        .enumerate_pixels()
        .filter(|(x, y, p)| p[0] > 0 && mask.get_pixel(*x, *y)[0] > 0)
        .count();
    assert_eq!(overlap, 0);

    Ok(())
}

#[test]
fn test_clean_wound_is_low() -> Result<()> {
    let img = red_disk_image(60);
    let mask = disk_mask(SIZE, SIZE, 250, 250, 60);

    let report = screen(&img, &mask, &InfectionConfig::default());

    assert_eq!(report.risk_level, InfectionRisk::Low);
    assert_eq!(report.signs, vec![InfectionSign::NoObviousSigns]);
    assert_eq!(report.risk_factor_count, 0);

    Ok(())
}

#[test]
fn test_dark_red_wound_is_not_necrotic() -> Result<()> {
    // Grayscale 46 under BT.601 weights: above the necrotic cutoff of 40
    let mut img = solid_image(SIZE, SIZE, GRAY_BACKGROUND);
    fill_disk(&mut img, 250, 250, 60, Rgb([120, 15, 15]));
    let mask = disk_mask(SIZE, SIZE, 250, 250, 60);

    let report = screen(&img, &mask, &InfectionConfig::default());

    assert_eq!(report.risk_level, InfectionRisk::Low);
    assert_eq!(report.signs, vec![InfectionSign::NoObviousSigns]);
    assert_eq!(report.risk_factor_count, 0);

    Ok(())
}

#[test]
fn test_empty_mask_is_low() -> Result<()> {
    let img = red_disk_image(60);
    let mask = disk_mask(SIZE, SIZE, -1000, -1000, 1);

    let report = screen(&img, &mask, &InfectionConfig::default());

    assert_eq!(report.risk_level, InfectionRisk::Low);
    assert_eq!(report.signs, vec![InfectionSign::NoObviousSigns]);

    Ok(())
}

#[test]
fn test_assessment_thresholds_are_strict() -> Result<()> {
    let config = InfectionConfig::default();

    // 1. Exactly at every threshold: nothing counts
    let at_limit = assess(
        InfectionRatios {
            discharge: 0.05,
            necrosis: 0.1,
            inflammation: 0.3,
        },
        &config,
    );
    assert_eq!(at_limit.risk_level, InfectionRisk::Low);
    assert_eq!(at_limit.risk_factor_count, 0);

    // 2. Necrosis plus inflammation: 2 + 1 = 3, HIGH
    let high = assess(
        InfectionRatios {
            discharge: 0.0,
            necrosis: 0.2,
            inflammation: 0.5,
        },
        &config,
    );
    assert_eq!(high.risk_level, InfectionRisk::High);
    assert_eq!(
        high.signs,
        vec![InfectionSign::Necrosis, InfectionSign::Inflammation]
    );
    assert!(
        !high.signs.contains(&InfectionSign::NoObviousSigns),
        "The no-signs entry only accompanies LOW"
    );

    Ok(())
}
