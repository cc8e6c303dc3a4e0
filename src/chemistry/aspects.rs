//! Pairwise compatibility between categorized members.
//!
//! Each member sits at the midpoint of its sign on a 360 degree wheel. The
//! separation of two members is matched against a fixed table of aspects,
//! blended with an element compatibility matrix and scaled by the pair's
//! combined weight. The result is a pure function of its inputs.

use super::bound;
use super::config::AspectConfig;
use super::zodiac::{Element, Sign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    pub fn parse(s: &str) -> Option<Self> {
        ASPECTS
            .iter()
            .map(|a| a.kind)
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposition",
        }
    }

    pub fn definition(&self) -> &'static AspectDef {
        match self {
            AspectKind::Conjunction => &ASPECTS[0],
            AspectKind::Sextile => &ASPECTS[1],
            AspectKind::Square => &ASPECTS[2],
            AspectKind::Trine => &ASPECTS[3],
            AspectKind::Opposition => &ASPECTS[4],
        }
    }

    pub fn is_harmonious(&self) -> bool {
        self.definition().weight > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectDef {
    pub kind: AspectKind,
    /// Target separation in degrees
    pub angle: f64,
    /// Allowed distance from `angle`
    pub orb: f64,
    /// Positive for harmonious aspects, negative for challenging ones
    pub weight: f64,
}

pub const ASPECTS: [AspectDef; 5] = [
    AspectDef { kind: AspectKind::Conjunction, angle: 0.0, orb: 8.0, weight: 0.5 },
    AspectDef { kind: AspectKind::Sextile, angle: 60.0, orb: 6.0, weight: 0.6 },
    AspectDef { kind: AspectKind::Square, angle: 90.0, orb: 7.0, weight: -0.8 },
    AspectDef { kind: AspectKind::Trine, angle: 120.0, orb: 8.0, weight: 1.0 },
    AspectDef { kind: AspectKind::Opposition, angle: 180.0, orb: 8.0, weight: -0.7 },
];

/// Signed element compatibility, indexed by [`Element::index`]. Symmetric.
pub const COMPATIBILITY: [[f64; 4]; 4] = [
    // Fire  Earth  Air   Water
    [0.6, -0.4, 0.8, -0.6],
    [-0.4, 0.6, -0.4, 0.8],
    [0.8, -0.4, 0.6, -0.4],
    [-0.6, 0.8, -0.4, 0.6],
];

pub fn compatibility(a: Element, b: Element) -> f64 {
    COMPATIBILITY[a.index()][b.index()]
}

/// Angular separation folded into [0, 180].
pub fn separation(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Closest aspect within its orb, with strength `1 - diff / (2 * orb)`.
pub fn match_aspect(separation: f64) -> Option<(&'static AspectDef, f64)> {
    ASPECTS
        .iter()
        .map(|def| (def, (separation - def.angle).abs()))
        .filter(|(def, diff)| *diff <= def.orb)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(def, diff)| (def, 1.0 - diff / (2.0 * def.orb)))
}

/// Unscaled signed score for two signs, or None when no aspect applies.
pub fn pair_score(a: Sign, b: Sign, config: &AspectConfig) -> Option<(AspectKind, f64)> {
    let (def, strength) = match_aspect(separation(a.longitude(), b.longitude()))?;
    let score = config.aspect_share * def.weight * strength
        + config.compatibility_share * compatibility(a.element(), b.element());
    Some((def.kind, score))
}

/// A member eligible for pairing: categorized and carrying weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectMember<'a> {
    pub id: &'a str,
    pub sign: Sign,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PairAspect {
    pub first: String,
    pub second: String,
    pub aspect: AspectKind,
    /// Signed, weight-scaled contribution
    pub contribution: f64,
}

/// Unrounded pairwise sub-scores.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectSummary {
    pub harmony: f64,
    pub challenge: f64,
    pub net_harmony: f64,
    /// Final 0-100 aspect score after the logistic and roster-size shaping
    pub score: f64,
    pub pairs: Vec<PairAspect>,
}

/// Evaluate every unordered pair in the given order.
///
/// Callers pass members in a canonical order so floating-point sums do not
/// depend on how the roster was ordered.
pub fn evaluate_pairs(members: &[AspectMember<'_>], config: &AspectConfig) -> AspectSummary {
    let mut harmony_total = 0.0;
    let mut challenge_total = 0.0;
    let mut pair_weight_total = 0.0;
    let mut pairs = Vec::new();

    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            let pair_weight = (a.weight * b.weight).sqrt();
            if !pair_weight.is_finite() || pair_weight <= 0.0 {
                continue;
            }
            pair_weight_total += pair_weight;

            let Some((kind, score)) = pair_score(a.sign, b.sign, config) else {
                continue;
            };
            let contribution = score * pair_weight;
            if contribution > 0.0 {
                harmony_total += contribution;
            } else {
                challenge_total += contribution.abs();
            }
            pairs.push(PairAspect {
                first: a.id.to_string(),
                second: b.id.to_string(),
                aspect: kind,
                contribution,
            });
        }
    }

    let (harmony, challenge) = if pair_weight_total > 0.0 {
        (
            bound(100.0 * harmony_total / pair_weight_total, 0.0, 100.0),
            bound(100.0 * challenge_total / pair_weight_total, 0.0, 100.0),
        )
    } else {
        (0.0, 0.0)
    };
    let net_harmony = harmony - config.challenge_ratio * challenge;

    let logistic =
        100.0 / (1.0 + (-config.logistic_steepness * (net_harmony - config.logistic_midpoint)).exp());
    let boost = if pairs.is_empty() && pair_weight_total <= 0.0 {
        0.0
    } else {
        small_roster_boost(members.len(), config)
    };
    let shaped = if logistic.is_finite() { logistic + boost } else { 50.0 };
    let score = bound(shaped, config.min_score, config.max_score);

    AspectSummary {
        harmony,
        challenge,
        net_harmony,
        score,
        pairs,
    }
}

/// Linear boost from `small_roster_boost` at two members down to zero at
/// `boost_reference_size`.
fn small_roster_boost(active: usize, config: &AspectConfig) -> f64 {
    let reference = config.boost_reference_size;
    if reference <= 2 || active >= reference {
        return 0.0;
    }
    let fraction = (reference - active) as f64 / (reference - 2) as f64;
    config.small_roster_boost.max(0.0) * bound(fraction, 0.0, 1.0)
}
