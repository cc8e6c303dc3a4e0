use super::config::WeightingConfig;
use crate::roster::{Role, RosterMember};
use std::collections::BTreeMap;

/// Min/max of the usable (finite, positive) values of one metric.
///
/// Always computed from the roster being scored, never shared across calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    bounds: Option<(f64, f64)>,
}

impl MetricRange {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let bounds = values
            .into_iter()
            .filter(|v| is_usable(*v))
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        Self { bounds }
    }

    /// Normalize a value into [0, 1].
    ///
    /// With no usable values at all every member sits at `midpoint`. With no
    /// spread, members holding a usable value sit at `midpoint` and the rest
    /// at 0.
    pub fn normalize(&self, value: f64, midpoint: f64) -> f64 {
        let Some((lo, hi)) = self.bounds else {
            return midpoint;
        };
        if !is_usable(value) {
            return 0.0;
        }
        let span = hi - lo;
        if span <= f64::EPSILON {
            return midpoint;
        }
        ((value - lo) / span).clamp(0.0, 1.0)
    }
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Role multiplier with context overrides taking precedence.
pub fn role_multiplier(role: Role, overrides: Option<&BTreeMap<Role, f64>>) -> f64 {
    overrides
        .and_then(|map| map.get(&role))
        .copied()
        .filter(|m| m.is_finite() && *m >= 0.0)
        .unwrap_or_else(|| role.default_multiplier())
}

/// Compute one influence weight per member, in roster order.
pub fn compute_weights(
    roster: &[RosterMember],
    config: &WeightingConfig,
    role_overrides: Option<&BTreeMap<Role, f64>>,
) -> Vec<f64> {
    let performance = MetricRange::from_values(roster.iter().map(|m| m.performance_score));
    let influence = MetricRange::from_values(roster.iter().map(|m| m.secondary_influence_score));

    roster
        .iter()
        .map(|member| {
            let perf = performance.normalize(member.performance_score, config.degenerate_midpoint);
            let infl = influence.normalize(
                member.secondary_influence_score,
                config.degenerate_midpoint,
            );
            let combined = config.performance_share * perf + config.influence_share * infl;
            let base = config.base_floor + config.base_range * combined;
            let weight = base
                * config.availability_multiplier(member.availability_status)
                * role_multiplier(member.role_key(), role_overrides);

            if weight.is_finite() {
                weight.max(0.0)
            } else {
                0.0
            }
        })
        .collect()
}
