use super::config::ChemistryConfig;
use crate::roster::Role;
use std::collections::BTreeMap;

const SHARE_TOLERANCE: f64 = 1e-6;

/// Validate chemistry configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_chemistry(config: &ChemistryConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Weighting
    let w = &config.weighting;
    non_negative(&mut errors, "chemistry.weighting.performance_share", w.performance_share);
    non_negative(&mut errors, "chemistry.weighting.influence_share", w.influence_share);
    sums_to_one(
        &mut errors,
        "chemistry.weighting",
        "performance_share + influence_share",
        w.performance_share + w.influence_share,
    );
    non_negative(&mut errors, "chemistry.weighting.base_floor", w.base_floor);
    non_negative(&mut errors, "chemistry.weighting.base_range", w.base_range);
    within(&mut errors, "chemistry.weighting.degenerate_midpoint", w.degenerate_midpoint, 0.0, 1.0);
    for (name, value) in [
        ("active", w.active),
        ("questionable", w.questionable),
        ("day_to_day", w.day_to_day),
        ("out", w.out),
    ] {
        within(&mut errors, &format!("chemistry.weighting.{}", name), value, 0.0, 1.0);
    }

    // Elements
    let e = &config.elements;
    positive(&mut errors, "chemistry.elements.balance_deviation_scale", e.balance_deviation_scale);
    within(&mut errors, "chemistry.elements.dominance_threshold", e.dominance_threshold, 0.0, 100.0);
    within(&mut errors, "chemistry.elements.presence_threshold", e.presence_threshold, 0.0, 100.0);
    within(&mut errors, "chemistry.elements.synergy_bonus", e.synergy_bonus, 0.0, 100.0);
    within(&mut errors, "chemistry.elements.diversity_bonus", e.diversity_bonus, 0.0, 100.0);
    positive(&mut errors, "chemistry.elements.curve_exponent", e.curve_exponent);
    within(&mut errors, "chemistry.elements.neutral_score", e.neutral_score, 0.0, 100.0);

    // Aspects
    let a = &config.aspects;
    non_negative(&mut errors, "chemistry.aspects.aspect_share", a.aspect_share);
    non_negative(&mut errors, "chemistry.aspects.compatibility_share", a.compatibility_share);
    sums_to_one(
        &mut errors,
        "chemistry.aspects",
        "aspect_share + compatibility_share",
        a.aspect_share + a.compatibility_share,
    );
    non_negative(&mut errors, "chemistry.aspects.challenge_ratio", a.challenge_ratio);
    positive(&mut errors, "chemistry.aspects.logistic_steepness", a.logistic_steepness);
    finite(&mut errors, "chemistry.aspects.logistic_midpoint", a.logistic_midpoint);
    within(&mut errors, "chemistry.aspects.small_roster_boost", a.small_roster_boost, 0.0, 100.0);
    within(&mut errors, "chemistry.aspects.min_score", a.min_score, 0.0, 100.0);
    within(&mut errors, "chemistry.aspects.max_score", a.max_score, 0.0, 100.0);
    if a.min_score >= a.max_score {
        errors.push(format!(
            "chemistry.aspects: min_score ({}) must be below max_score ({})",
            a.min_score, a.max_score
        ));
    }

    // Composition
    let c = &config.composition;
    non_negative(&mut errors, "chemistry.composition.element_blend", c.element_blend);
    non_negative(&mut errors, "chemistry.composition.aspect_blend", c.aspect_blend);
    sums_to_one(
        &mut errors,
        "chemistry.composition",
        "element_blend + aspect_blend",
        c.element_blend + c.aspect_blend,
    );
    within(
        &mut errors,
        "chemistry.composition.max_transit_adjustment",
        c.max_transit_adjustment,
        0.0,
        0.25,
    );
    within(
        &mut errors,
        "chemistry.composition.max_historical_adjustment",
        c.max_historical_adjustment,
        0.0,
        0.25,
    );
    within(&mut errors, "chemistry.composition.small_roster_damping", c.small_roster_damping, 0.0, 1.0);
    within(&mut errors, "chemistry.composition.large_roster_damping", c.large_roster_damping, 0.0, 1.0);
    if c.small_roster_size > c.large_roster_size {
        errors.push(format!(
            "chemistry.composition: small_roster_size ({}) must not exceed large_roster_size ({})",
            c.small_roster_size, c.large_roster_size
        ));
    }
    positive(&mut errors, "chemistry.composition.calibration_exponent", c.calibration_exponent);
    if c.insufficient_data_score > 100 {
        errors.push(format!(
            "chemistry.composition.insufficient_data_score: must be at most 100, got {}",
            c.insufficient_data_score
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate role multiplier overrides.
pub fn validate_role_weights(role_weights: &BTreeMap<Role, f64>) -> Result<(), Vec<String>> {
    let errors: Vec<String> = role_weights
        .iter()
        .filter(|(_, m)| !(m.is_finite() && **m >= 0.0 && **m <= 1.5))
        .map(|(role, m)| {
            format!(
                "role_weights.{}: must be between 0 and 1.5, got {}",
                serde_json::to_value(role)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| format!("{:?}", role)),
                m
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn finite(errors: &mut Vec<String>, path: &str, value: f64) {
    if !value.is_finite() {
        errors.push(format!("{}: must be a finite number", path));
    }
}

fn non_negative(errors: &mut Vec<String>, path: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(format!("{}: must be non-negative, got {}", path, value));
    }
}

fn positive(errors: &mut Vec<String>, path: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(format!("{}: must be positive, got {}", path, value));
    }
}

fn within(errors: &mut Vec<String>, path: &str, value: f64, lo: f64, hi: f64) {
    if !(value.is_finite() && value >= lo && value <= hi) {
        errors.push(format!("{}: must be between {} and {}, got {}", path, lo, hi, value));
    }
}

fn sums_to_one(errors: &mut Vec<String>, path: &str, what: &str, sum: f64) {
    if !((sum - 1.0).abs() <= SHARE_TOLERANCE) {
        errors.push(format!("{}: {} must sum to 1, got {}", path, what, sum));
    }
}
