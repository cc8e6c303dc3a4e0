use crate::roster::AvailabilityStatus;
use serde::{Deserialize, Serialize};

/// Maximum mean absolute deviation from an even 25% split (one category at
/// 100%, three at 0%). Dividing by it maps the deviation onto 0-100.
pub const MAX_MEAN_DEVIATION: f64 = 37.5;

/// Complete set of chemistry constants.
///
/// Every magic number in the scoring path lives here so one canonical
/// formula is used everywhere. Sections may be omitted from YAML and fall
/// back to their defaults.
///
/// Example YAML:
/// ```yaml
/// chemistry:
///   elements:
///     dominance_threshold: 45
///   composition:
///     element_blend: 0.5
///     aspect_blend: 0.5
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ChemistryConfig {
    pub weighting: WeightingConfig,
    pub elements: ElementConfig,
    pub aspects: AspectConfig,
    pub composition: CompositionConfig,
}

/// Constants for turning raw member metrics into influence weights.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WeightingConfig {
    pub performance_share: f64,
    pub influence_share: f64,
    /// Minimum base weight so every available member has some influence
    pub base_floor: f64,
    pub base_range: f64,
    /// Normalized value used when a metric has no usable spread
    pub degenerate_midpoint: f64,
    pub active: f64,
    pub questionable: f64,
    pub day_to_day: f64,
    pub out: f64,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            performance_share: 0.6,
            influence_share: 0.4,
            base_floor: 0.2,
            base_range: 0.8,
            degenerate_midpoint: 0.5,
            active: 1.0,
            questionable: 0.7,
            day_to_day: 0.5,
            out: 0.0,
        }
    }
}

impl WeightingConfig {
    pub fn availability_multiplier(&self, status: AvailabilityStatus) -> f64 {
        match status {
            AvailabilityStatus::Active => self.active,
            AvailabilityStatus::Questionable => self.questionable,
            AvailabilityStatus::DayToDay => self.day_to_day,
            AvailabilityStatus::Out => self.out,
        }
    }
}

/// Constants for the elemental distribution sub-scores.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ElementConfig {
    /// Balance points lost per percentage point of mean deviation from 25%
    pub balance_deviation_scale: f64,
    /// Largest category share (percent) above which synergy applies
    pub dominance_threshold: f64,
    pub synergy_bonus: f64,
    /// Share (percent) every category must exceed for the diversity bonus
    pub presence_threshold: f64,
    pub diversity_bonus: f64,
    pub curve_exponent: f64,
    /// Composite reported when there is no weight to distribute
    pub neutral_score: f64,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            balance_deviation_scale: 100.0 / MAX_MEAN_DEVIATION,
            dominance_threshold: 40.0,
            synergy_bonus: 10.0,
            presence_threshold: 10.0,
            diversity_bonus: 10.0,
            curve_exponent: 1.15,
            neutral_score: 50.0,
        }
    }
}

/// Constants for the pairwise compatibility sub-score.
///
/// The aspect table and the category matrix are fixed data in
/// `chemistry::aspects`; only the blending and shaping is configurable.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AspectConfig {
    /// Share of the pair score taken from the angular relationship
    pub aspect_share: f64,
    /// Share of the pair score taken from category compatibility
    pub compatibility_share: f64,
    /// Net harmony = harmony - challenge_ratio * challenge
    pub challenge_ratio: f64,
    /// Logistic slope applied to net harmony
    pub logistic_steepness: f64,
    /// Net harmony mapped to a 50 aspect score
    pub logistic_midpoint: f64,
    /// Largest boost granted to the smallest rosters
    pub small_roster_boost: f64,
    /// Roster size at and above which no boost applies
    pub boost_reference_size: usize,
    pub min_score: f64,
    pub max_score: f64,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            aspect_share: 0.7,
            compatibility_share: 0.3,
            challenge_ratio: 0.75,
            logistic_steepness: 0.05,
            logistic_midpoint: 0.0,
            small_roster_boost: 5.0,
            boost_reference_size: 10,
            min_score: 5.0,
            max_score: 95.0,
        }
    }
}

/// Constants for blending the sub-scores into the final chemistry score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompositionConfig {
    pub element_blend: f64,
    pub aspect_blend: f64,
    /// Largest fractional adjustment a transit modifier may apply
    pub max_transit_adjustment: f64,
    /// Largest fractional adjustment a historical modifier may apply
    pub max_historical_adjustment: f64,
    /// Rosters with fewer active members are pulled toward the midpoint
    pub small_roster_size: usize,
    pub small_roster_damping: f64,
    /// Rosters with more active members are pulled toward the midpoint
    pub large_roster_size: usize,
    pub large_roster_damping: f64,
    pub calibration_exponent: f64,
    /// Score returned when fewer than two members can be categorized
    pub insufficient_data_score: u8,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            element_blend: 0.4,
            aspect_blend: 0.6,
            max_transit_adjustment: 0.08,
            max_historical_adjustment: 0.05,
            small_roster_size: 4,
            small_roster_damping: 0.85,
            large_roster_size: 15,
            large_roster_damping: 0.9,
            calibration_exponent: 0.95,
            insufficient_data_score: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chemistry_config() {
        let config = ChemistryConfig::default();

        assert_eq!(config.weighting.performance_share, 0.6);
        assert_eq!(config.weighting.influence_share, 0.4);
        assert_eq!(config.elements.dominance_threshold, 40.0);
        assert_eq!(config.composition.element_blend, 0.4);
        assert_eq!(config.composition.insufficient_data_score, 50);
    }

    #[test]
    fn test_availability_multipliers() {
        let weighting = WeightingConfig::default();

        assert_eq!(weighting.availability_multiplier(AvailabilityStatus::Active), 1.0);
        assert_eq!(weighting.availability_multiplier(AvailabilityStatus::Questionable), 0.7);
        assert_eq!(weighting.availability_multiplier(AvailabilityStatus::DayToDay), 0.5);
        assert_eq!(weighting.availability_multiplier(AvailabilityStatus::Out), 0.0);
    }

    #[test]
    fn test_balance_scale_spans_full_range() {
        let elements = ElementConfig::default();
        let worst = 100.0 - MAX_MEAN_DEVIATION * elements.balance_deviation_scale;
        assert!(worst.abs() < 1e-9);
    }

    #[test]
    fn test_chemistry_config_serde_roundtrip() {
        let config = ChemistryConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ChemistryConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_chemistry_config_parse() {
        let yaml = r#"
elements:
  dominance_threshold: 45
composition:
  element_blend: 0.5
  aspect_blend: 0.5
"#;
        let config: ChemistryConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.elements.dominance_threshold, 45.0);
        assert_eq!(config.elements.synergy_bonus, 10.0);
        assert_eq!(config.composition.element_blend, 0.5);
        assert_eq!(config.weighting, WeightingConfig::default());
    }

    #[test]
    fn test_empty_chemistry_config_parse() {
        let config: ChemistryConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ChemistryConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
composition:
  element_weight: 0.5
"#;
        let parsed: Result<ChemistryConfig, _> = serde_saphyr::from_str(yaml);
        assert!(parsed.is_err());
    }
}
