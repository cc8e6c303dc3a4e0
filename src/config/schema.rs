use crate::chemistry::ChemistryConfig;
use crate::roster::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Chemistry constants; omitted sections use built-in defaults
    #[serde(default)]
    pub chemistry: Option<ChemistryConfig>,

    /// Role multiplier overrides applied to every roster
    #[serde(default)]
    pub role_weights: Option<BTreeMap<Role, f64>>,
}

impl Config {
    /// Effective chemistry constants.
    pub fn chemistry(&self) -> ChemistryConfig {
        self.chemistry.clone().unwrap_or_default()
    }

    /// Config with every constant and role multiplier written out.
    pub fn full_defaults() -> Self {
        let role_weights = Role::ALL
            .iter()
            .map(|role| (*role, role.default_multiplier()))
            .collect();
        Self {
            chemistry: Some(ChemistryConfig::default()),
            role_weights: Some(role_weights),
        }
    }
}
