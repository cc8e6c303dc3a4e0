use super::aspects::{evaluate_pairs, AspectMember, AspectSummary};
use super::bound;
use super::config::{ChemistryConfig, CompositionConfig};
use super::elements::{distribute, ElementDistribution};
use super::modifiers::{bounded_adjustment, ModifierInput, NoopModifier, ScoreModifier};
use super::result::{
    round_score, round_signed, AspectBreakdown, ChemistryMetadata, ElementalBreakdown,
    TeamChemistryResult,
};
use super::weighting::compute_weights;
use super::zodiac::{sign_for_attribute, Element};
use crate::roster::{ChemistryContext, RosterMember};
use chrono::{DateTime, Utc};

/// Stateless chemistry scorer.
///
/// Holds only read-only configuration and the two modifier slots; every call
/// recomputes normalization bounds from the roster it is given. Safe to share
/// across threads.
pub struct ChemistryEngine {
    config: ChemistryConfig,
    transit: Box<dyn ScoreModifier>,
    historical: Box<dyn ScoreModifier>,
}

impl Default for ChemistryEngine {
    fn default() -> Self {
        Self::new(ChemistryConfig::default())
    }
}

impl ChemistryEngine {
    pub fn new(config: ChemistryConfig) -> Self {
        Self {
            config,
            transit: Box::new(NoopModifier),
            historical: Box::new(NoopModifier),
        }
    }

    pub fn with_transit(mut self, modifier: impl ScoreModifier + 'static) -> Self {
        self.transit = Box::new(modifier);
        self
    }

    pub fn with_historical(mut self, modifier: impl ScoreModifier + 'static) -> Self {
        self.historical = Box::new(modifier);
        self
    }

    pub fn config(&self) -> &ChemistryConfig {
        &self.config
    }

    pub fn calculate(
        &self,
        roster: &[RosterMember],
        context: Option<&ChemistryContext>,
    ) -> TeamChemistryResult {
        self.calculate_at(roster, context, Utc::now())
    }

    /// Score a roster, stamping the result with `calculated_at`.
    pub fn calculate_at(
        &self,
        roster: &[RosterMember],
        context: Option<&ChemistryContext>,
        calculated_at: DateTime<Utc>,
    ) -> TeamChemistryResult {
        let weights = compute_weights(
            roster,
            &self.config.weighting,
            context.map(|c| &c.role_weights),
        );
        let signs: Vec<_> = roster
            .iter()
            .map(|m| sign_for_attribute(m.date_attribute.as_deref()))
            .collect();

        let categorized_count = signs.iter().filter(|s| s.is_some()).count();

        let mut active: Vec<AspectMember<'_>> = roster
            .iter()
            .zip(&signs)
            .zip(&weights)
            .filter_map(|((member, sign), weight)| {
                let sign = (*sign)?;
                (*weight > 0.0).then_some(AspectMember {
                    id: member.id.as_str(),
                    sign,
                    weight: *weight,
                })
            })
            .collect();
        // Stable summation order regardless of roster order
        active.sort_by(|a, b| {
            a.id.cmp(b.id)
                .then(a.sign.cmp(&b.sign))
                .then(a.weight.total_cmp(&b.weight))
        });

        // Zero-weight members cannot form pairs, so they do not count here
        if active.len() < 2 {
            return insufficient_result(
                &self.config,
                roster.len(),
                categorized_count,
                active.len(),
                calculated_at,
            );
        }

        let elements = distribute(
            active.iter().map(|m| (m.sign.element(), m.weight)),
            &self.config.elements,
        );
        let aspects = evaluate_pairs(&active, &self.config.aspects);

        let composition = &self.config.composition;
        let mut score = composition.element_blend * elements.composite
            + composition.aspect_blend * aspects.score;

        let mut modifiers_applied = Vec::new();
        let slots = [
            (&self.transit, composition.max_transit_adjustment),
            (&self.historical, composition.max_historical_adjustment),
        ];
        for (modifier, limit) in slots {
            let input = ModifierInput {
                roster,
                weights: &weights,
                context,
                base_score: score,
            };
            let adjustment = bounded_adjustment(modifier.adjustment(&input), limit);
            if adjustment != 0.0 {
                score *= 1.0 + adjustment;
                modifiers_applied.push(modifier.name().to_string());
            }
        }

        let score = calibrate(dampen(score, active.len(), composition), composition);

        let mut bonuses_applied = Vec::new();
        if elements.synergy_bonus > 0.0 {
            bonuses_applied.push("synergy".to_string());
        }
        if elements.diversity_bonus > 0.0 {
            bonuses_applied.push("diversity".to_string());
        }

        TeamChemistryResult {
            score: round_score(score),
            elements: elemental_breakdown(&elements),
            aspects: aspect_breakdown(aspects),
            calculated_at,
            metadata: ChemistryMetadata {
                member_count: roster.len(),
                categorized_count,
                active_count: active.len(),
                bonuses_applied,
                modifiers_applied,
                context_used: context.is_some_and(ChemistryContext::has_data),
                insufficient_data: false,
            },
        }
    }
}

/// Score a roster with the given constants and no external modifiers.
pub fn calculate_chemistry(
    roster: &[RosterMember],
    context: Option<&ChemistryContext>,
    config: &ChemistryConfig,
) -> TeamChemistryResult {
    ChemistryEngine::new(config.clone()).calculate(roster, context)
}

/// Pull scores of very small or very large rosters toward the midpoint.
fn dampen(score: f64, active: usize, config: &CompositionConfig) -> f64 {
    let factor = if active < config.small_roster_size {
        config.small_roster_damping
    } else if active > config.large_roster_size {
        config.large_roster_damping
    } else {
        1.0
    };
    50.0 + (score - 50.0) * bound(factor, 0.0, 1.0)
}

fn calibrate(score: f64, config: &CompositionConfig) -> f64 {
    let clamped = bound(score, 0.0, 100.0);
    let curved = 100.0 * (clamped / 100.0).powf(config.calibration_exponent);
    if curved.is_finite() {
        bound(curved, 0.0, 100.0)
    } else {
        clamped
    }
}

fn elemental_breakdown(elements: &ElementDistribution) -> ElementalBreakdown {
    ElementalBreakdown {
        fire: elements.percentage(Element::Fire),
        earth: elements.percentage(Element::Earth),
        air: elements.percentage(Element::Air),
        water: elements.percentage(Element::Water),
        balance: round_score(elements.balance),
        synergy_bonus: round_score(elements.synergy_bonus),
        diversity_bonus: round_score(elements.diversity_bonus),
        composite: round_score(elements.composite),
    }
}

fn aspect_breakdown(aspects: AspectSummary) -> AspectBreakdown {
    AspectBreakdown {
        harmony: round_score(aspects.harmony),
        challenge: round_score(aspects.challenge),
        net_harmony: round_signed(aspects.net_harmony),
        raw_score: aspects
            .net_harmony
            .is_finite()
            .then_some(aspects.net_harmony),
        pairs: aspects.pairs,
    }
}

/// The fixed result for rosters with fewer than two categorized members:
/// the configured neutral score over an even split, with no pairs.
fn insufficient_result(
    config: &ChemistryConfig,
    member_count: usize,
    categorized_count: usize,
    active_count: usize,
    calculated_at: DateTime<Utc>,
) -> TeamChemistryResult {
    let neutral = ElementDistribution::neutral(&config.elements);
    TeamChemistryResult {
        score: config.composition.insufficient_data_score.min(100),
        elements: elemental_breakdown(&neutral),
        aspects: AspectBreakdown {
            harmony: 0,
            challenge: 0,
            net_harmony: 0,
            pairs: Vec::new(),
            raw_score: None,
        },
        calculated_at,
        metadata: ChemistryMetadata {
            member_count,
            categorized_count,
            active_count,
            bonuses_applied: Vec::new(),
            modifiers_applied: Vec::new(),
            context_used: false,
            insufficient_data: true,
        },
    }
}
