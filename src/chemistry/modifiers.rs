use super::aspects::AspectKind;
use crate::roster::{ChemistryContext, RosterMember};

/// Everything a modifier may look at when adjusting a blended score.
#[derive(Debug, Clone, Copy)]
pub struct ModifierInput<'a> {
    pub roster: &'a [RosterMember],
    /// Member weights, aligned with `roster`
    pub weights: &'a [f64],
    pub context: Option<&'a ChemistryContext>,
    /// Blended score before this modifier is applied
    pub base_score: f64,
}

/// Pluggable score adjustment.
///
/// `adjustment` returns a signed fraction (0.05 means +5%). The engine clamps
/// it to the configured bound and treats non-finite values as zero, so
/// implementations need not guard either.
pub trait ScoreModifier: Send + Sync {
    fn name(&self) -> &str;

    fn adjustment(&self, input: &ModifierInput<'_>) -> f64;
}

/// Default modifier: never adjusts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopModifier;

impl ScoreModifier for NoopModifier {
    fn name(&self) -> &str {
        "noop"
    }

    fn adjustment(&self, _input: &ModifierInput<'_>) -> f64 {
        0.0
    }
}

/// Transit modifier driven by the daily ephemeris snapshot in the context.
#[derive(Debug, Clone)]
pub struct EphemerisTransit {
    pub retrograde_penalty: f64,
    pub full_moon_bonus: f64,
    /// Distance from phase 0.5 still counted as a full moon
    pub full_moon_window: f64,
    /// Added per harmonious Sun aspect, subtracted per challenging one
    pub sun_aspect_step: f64,
}

impl Default for EphemerisTransit {
    fn default() -> Self {
        Self {
            retrograde_penalty: 0.03,
            full_moon_bonus: 0.02,
            full_moon_window: 0.05,
            sun_aspect_step: 0.01,
        }
    }
}

impl ScoreModifier for EphemerisTransit {
    fn name(&self) -> &str {
        "transit"
    }

    fn adjustment(&self, input: &ModifierInput<'_>) -> f64 {
        let Some(transit) = input.context.and_then(|c| c.transit.as_ref()) else {
            return 0.0;
        };

        let mut adjustment = 0.0;
        if transit.mercury_retrograde {
            adjustment -= self.retrograde_penalty;
        }
        if (transit.moon_phase - 0.5).abs() <= self.full_moon_window {
            adjustment += self.full_moon_bonus;
        }

        for (bodies, aspect) in &transit.aspects {
            if !bodies.starts_with("sun_") {
                continue;
            }
            match aspect.as_deref().and_then(AspectKind::parse) {
                Some(kind) if kind.is_harmonious() => adjustment += self.sun_aspect_step,
                Some(_) => adjustment -= self.sun_aspect_step,
                None => {}
            }
        }

        adjustment
    }
}

/// Historical calibration from the team's season record.
#[derive(Debug, Clone)]
pub struct RecordCalibration {
    /// Adjustment per unit of win percentage above .500
    pub scale: f64,
}

impl Default for RecordCalibration {
    fn default() -> Self {
        Self { scale: 0.1 }
    }
}

impl ScoreModifier for RecordCalibration {
    fn name(&self) -> &str {
        "historical"
    }

    fn adjustment(&self, input: &ModifierInput<'_>) -> f64 {
        input
            .context
            .and_then(|c| c.historical)
            .and_then(|record| record.win_pct())
            .map_or(0.0, |pct| (pct - 0.5) * self.scale)
    }
}

/// Clamp a modifier's output to `[-limit, limit]`; non-finite becomes 0.
pub fn bounded_adjustment(raw: f64, limit: f64) -> f64 {
    let limit = if limit.is_finite() { limit.abs() } else { 0.0 };
    if raw.is_finite() {
        raw.max(-limit).min(limit)
    } else {
        0.0
    }
}
