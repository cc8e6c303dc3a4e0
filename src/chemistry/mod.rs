pub mod aspects;
pub mod config;
pub mod elements;
pub mod engine;
pub mod modifiers;
pub mod result;
pub mod validation;
pub mod weighting;
pub mod zodiac;

pub use aspects::{AspectKind, PairAspect};
pub use config::*;
pub use engine::{calculate_chemistry, ChemistryEngine};
pub use modifiers::{EphemerisTransit, ModifierInput, NoopModifier, RecordCalibration, ScoreModifier};
pub use result::{AspectBreakdown, ChemistryMetadata, ElementalBreakdown, TeamChemistryResult};
pub use validation::{validate_chemistry, validate_role_weights};
pub use zodiac::{Element, Sign};

/// Clamp without panicking on inverted bounds; NaN collapses to `lo`.
pub(crate) fn bound(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}
