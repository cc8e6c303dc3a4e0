use super::aspects::PairAspect;
use super::zodiac::Element;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final chemistry payload handed back to callers.
///
/// All numeric fields are already bounded and rounded. Equality ignores
/// `calculated_at`, so two runs over the same roster compare equal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamChemistryResult {
    pub score: u8,
    pub elements: ElementalBreakdown,
    pub aspects: AspectBreakdown,
    pub calculated_at: DateTime<Utc>,
    pub metadata: ChemistryMetadata,
}

impl PartialEq for TeamChemistryResult {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
            && self.elements == other.elements
            && self.aspects == other.aspects
            && self.metadata == other.metadata
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ElementalBreakdown {
    pub fire: u8,
    pub earth: u8,
    pub air: u8,
    pub water: u8,
    pub balance: u8,
    pub synergy_bonus: u8,
    pub diversity_bonus: u8,
    pub composite: u8,
}

impl ElementalBreakdown {
    pub fn percentage(&self, element: Element) -> u8 {
        match element {
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Air => self.air,
            Element::Water => self.water,
        }
    }

    pub fn total_percentage(&self) -> u32 {
        Element::ALL
            .iter()
            .map(|e| u32::from(self.percentage(*e)))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AspectBreakdown {
    pub harmony: u8,
    pub challenge: u8,
    /// May be negative when challenges outweigh harmony
    pub net_harmony: i32,
    pub pairs: Vec<PairAspect>,
    /// Net harmony before the logistic transform
    pub raw_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChemistryMetadata {
    /// Every roster entry, including unavailable and uncategorized members
    pub member_count: usize,
    pub categorized_count: usize,
    /// Categorized members with non-zero weight
    pub active_count: usize,
    pub bonuses_applied: Vec<String>,
    pub modifiers_applied: Vec<String>,
    pub context_used: bool,
    pub insufficient_data: bool,
}

/// Round a 0-100 sub-score for the payload. Non-finite values become 0.
pub fn round_score(value: f64) -> u8 {
    if value.is_finite() {
        value.round().max(0.0).min(100.0) as u8
    } else {
        0
    }
}

pub fn round_signed(value: f64) -> i32 {
    if value.is_finite() {
        value.round().max(-100.0).min(100.0) as i32
    } else {
        0
    }
}
