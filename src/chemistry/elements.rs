use super::bound;
use super::config::ElementConfig;
use super::zodiac::Element;

/// Unrounded elemental sub-scores plus the corrected percentage split.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDistribution {
    /// Percent share per element, indexed by [`Element::index`]; sums to 100
    pub percentages: [u8; 4],
    pub balance: f64,
    pub synergy_bonus: f64,
    pub diversity_bonus: f64,
    pub composite: f64,
}

impl ElementDistribution {
    /// Even split used when there is no weight to distribute.
    pub fn neutral(config: &ElementConfig) -> Self {
        Self {
            percentages: [25; 4],
            balance: 50.0,
            synergy_bonus: 0.0,
            diversity_bonus: 0.0,
            composite: bound(config.neutral_score, 0.0, 100.0),
        }
    }

    pub fn percentage(&self, element: Element) -> u8 {
        self.percentages[element.index()]
    }

    pub fn dominant(&self) -> Element {
        largest_index(&self.percentages.map(f64::from))
            .map(|i| Element::ALL[i])
            .unwrap_or(Element::Fire)
    }
}

/// Aggregate member weights by element and score the resulting split.
pub fn distribute(
    entries: impl IntoIterator<Item = (Element, f64)>,
    config: &ElementConfig,
) -> ElementDistribution {
    let mut totals = [0.0_f64; 4];
    for (element, weight) in entries {
        if weight.is_finite() && weight > 0.0 {
            totals[element.index()] += weight;
        }
    }

    let total: f64 = totals.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return ElementDistribution::neutral(config);
    }

    let raw = totals.map(|w| w / total * 100.0);
    let percentages = corrected_percentages(&raw);

    let mean_deviation = percentages
        .iter()
        .map(|p| (f64::from(*p) - 25.0).abs())
        .sum::<f64>()
        / 4.0;
    let balance = bound(100.0 - mean_deviation * config.balance_deviation_scale, 0.0, 100.0);

    let largest = percentages.iter().copied().max().unwrap_or(25);
    let synergy_bonus = if f64::from(largest) > config.dominance_threshold {
        config.synergy_bonus
    } else {
        0.0
    };

    let diversity_bonus = if percentages
        .iter()
        .all(|p| f64::from(*p) > config.presence_threshold)
    {
        config.diversity_bonus
    } else {
        0.0
    };

    let uncurved = (balance + synergy_bonus + diversity_bonus).max(0.0);
    let curved = 100.0 * (uncurved / 100.0).powf(config.curve_exponent);
    let composite = if curved.is_finite() {
        bound(curved, 0.0, 100.0)
    } else {
        bound(uncurved, 0.0, 100.0)
    };

    ElementDistribution {
        percentages,
        balance,
        synergy_bonus,
        diversity_bonus,
        composite,
    }
}

/// Round each share and push the rounding drift onto the largest share so
/// the four values add up to exactly 100.
fn corrected_percentages(raw: &[f64; 4]) -> [u8; 4] {
    let mut rounded = raw.map(|p| p.round() as i64);
    let drift = 100 - rounded.iter().sum::<i64>();
    if drift != 0 {
        if let Some(i) = largest_index(raw) {
            rounded[i] += drift;
        }
    }
    rounded.map(|p| p.clamp(0, 100) as u8)
}

/// Index of the largest value; ties go to the earliest element.
fn largest_index(values: &[f64; 4]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        match best {
            Some(b) if values[b] >= *v => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeat(element: Element, count: usize, weight: f64) -> Vec<(Element, f64)> {
        vec![(element, weight); count]
    }

    fn sum(d: &ElementDistribution) -> u32 {
        d.percentages.iter().map(|p| u32::from(*p)).sum()
    }

    #[test]
    fn test_zero_weight_is_neutral() {
        let config = ElementConfig::default();
        let d = distribute(vec![(Element::Fire, 0.0), (Element::Water, 0.0)], &config);
        assert_eq!(d, ElementDistribution::neutral(&config));
        assert_eq!(d.percentages, [25, 25, 25, 25]);
        assert_eq!(d.balance, 50.0);
    }

    #[test]
    fn test_rounding_drift_goes_to_largest() {
        let mut entries = repeat(Element::Fire, 3, 1.0);
        entries.extend(repeat(Element::Earth, 2, 1.0));
        entries.extend(repeat(Element::Air, 2, 1.0));
        entries.extend(repeat(Element::Water, 2, 1.0));

        let d = distribute(entries, &ElementConfig::default());
        assert_eq!(d.percentages, [34, 22, 22, 22]);
        assert_eq!(sum(&d), 100);
    }

    #[test]
    fn test_thirds_sum_to_hundred() {
        let entries = vec![(Element::Fire, 1.0), (Element::Air, 1.0), (Element::Water, 1.0)];
        let d = distribute(entries, &ElementConfig::default());
        assert_eq!(d.percentages, [34, 0, 33, 33]);
        assert_eq!(sum(&d), 100);
    }

    #[test]
    fn test_even_split_has_full_balance_and_diversity() {
        let entries = vec![
            (Element::Fire, 0.5),
            (Element::Earth, 0.5),
            (Element::Air, 0.5),
            (Element::Water, 0.5),
        ];
        let d = distribute(entries, &ElementConfig::default());
        assert_eq!(d.percentages, [25, 25, 25, 25]);
        assert_eq!(d.balance, 100.0);
        assert_eq!(d.synergy_bonus, 0.0);
        assert_eq!(d.diversity_bonus, 10.0);
        assert_eq!(d.composite, 100.0);
    }

    #[test]
    fn test_single_element_gets_synergy_but_no_balance() {
        let d = distribute(repeat(Element::Water, 4, 1.0), &ElementConfig::default());
        assert_eq!(d.percentages, [0, 0, 0, 100]);
        assert!(d.balance.abs() < 1e-9);
        assert_eq!(d.synergy_bonus, 10.0);
        assert_eq!(d.diversity_bonus, 0.0);
        assert!(d.composite > 0.0 && d.composite < 10.0);
        assert_eq!(d.dominant(), Element::Water);
    }

    #[test]
    fn test_balanced_nine_member_roster() {
        let mut entries = repeat(Element::Fire, 3, 0.6);
        entries.extend(repeat(Element::Earth, 2, 0.6));
        entries.extend(repeat(Element::Air, 2, 0.6));
        entries.extend(repeat(Element::Water, 2, 0.6));

        let d = distribute(entries, &ElementConfig::default());
        assert!((d.balance - 88.0).abs() < 1e-9);
        assert_eq!(d.synergy_bonus, 0.0);
        assert_eq!(d.diversity_bonus, 10.0);
        assert!(d.composite > 95.0 && d.composite <= 100.0);
    }

    #[test]
    fn test_weights_shift_distribution() {
        let entries = vec![(Element::Fire, 1.5), (Element::Earth, 0.5)];
        let d = distribute(entries, &ElementConfig::default());
        assert_eq!(d.percentage(Element::Fire), 75);
        assert_eq!(d.percentage(Element::Earth), 25);
        assert_eq!(d.synergy_bonus, 10.0);
    }

    #[test]
    fn test_largest_index_tie_prefers_first() {
        assert_eq!(largest_index(&[10.0, 40.0, 40.0, 10.0]), Some(1));
        assert_eq!(largest_index(&[25.0, 25.0, 25.0, 25.0]), Some(0));
    }
}
