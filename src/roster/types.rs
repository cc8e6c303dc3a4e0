use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single roster entry as supplied by the caller.
///
/// Field aliases match the column names used by the upstream player tables
/// (`birth_date`, `status`, `position`, `impact_score`) so exported rows load
/// without renaming.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RosterMember {
    pub id: String,

    #[serde(default, alias = "full_name")]
    pub name: String,

    /// Primary performance metric, expected 0-100 but never clamped on input
    #[serde(default, alias = "impact_score")]
    pub performance_score: f64,

    /// Secondary influence metric, same range as `performance_score`
    #[serde(default)]
    pub secondary_influence_score: f64,

    /// Calendar date string (`YYYY-MM-DD`, optionally with a time suffix)
    #[serde(default, alias = "birth_date")]
    pub date_attribute: Option<String>,

    #[serde(default, alias = "status")]
    pub availability_status: AvailabilityStatus,

    /// Free-form position string, mapped through [`Role::parse`]
    #[serde(default, alias = "position")]
    pub role: String,
}

impl RosterMember {
    /// Create an active member with no metrics, date or role.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            performance_score: 0.0,
            secondary_influence_score: 0.0,
            date_attribute: None,
            availability_status: AvailabilityStatus::Active,
            role: String::new(),
        }
    }

    pub fn role_key(&self) -> Role {
        Role::parse(&self.role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    Active,
    Questionable,
    #[serde(alias = "day-to-day", alias = "dtd")]
    DayToDay,
    #[serde(alias = "injured", alias = "inactive")]
    Out,
}

impl AvailabilityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AvailabilityStatus::Active => "active",
            AvailabilityStatus::Questionable => "questionable",
            AvailabilityStatus::DayToDay => "day_to_day",
            AvailabilityStatus::Out => "out",
        }
    }
}

/// Closed set of role keys. Unrecognized positions land on `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guard,
    Forward,
    Center,
    Pitcher,
    Catcher,
    Infielder,
    Outfielder,
    DesignatedHitter,
    Other,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Guard,
        Role::Forward,
        Role::Center,
        Role::Pitcher,
        Role::Catcher,
        Role::Infielder,
        Role::Outfielder,
        Role::DesignatedHitter,
        Role::Other,
    ];

    /// Map a position string to a role key.
    ///
    /// Bare "C" is read as a basketball center; catchers are "CA" or "CATCHER".
    pub fn parse(s: &str) -> Self {
        let key = s.trim().to_ascii_uppercase().replace(['-', '_'], " ");
        match key.as_str() {
            "PG" | "SG" | "G" | "GUARD" | "POINT GUARD" | "SHOOTING GUARD" => Role::Guard,
            "SF" | "PF" | "F" | "FORWARD" | "SMALL FORWARD" | "POWER FORWARD" => Role::Forward,
            "C" | "CENTER" => Role::Center,
            "P" | "SP" | "RP" | "CL" | "PITCHER" | "STARTING PITCHER" | "RELIEF PITCHER" => {
                Role::Pitcher
            }
            "CA" | "CATCHER" => Role::Catcher,
            "1B" | "2B" | "3B" | "SS" | "IF" | "INFIELDER" => Role::Infielder,
            "LF" | "CF" | "RF" | "OF" | "OUTFIELDER" => Role::Outfielder,
            "DH" | "DESIGNATED HITTER" => Role::DesignatedHitter,
            _ => Role::Other,
        }
    }

    /// Built-in role multiplier before any context override.
    pub fn default_multiplier(&self) -> f64 {
        match self {
            Role::Guard => 1.10,
            Role::Forward => 1.00,
            Role::Center => 1.05,
            Role::Pitcher => 1.15,
            Role::Catcher => 1.05,
            Role::Infielder => 1.00,
            Role::Outfielder => 1.00,
            Role::DesignatedHitter => 0.95,
            Role::Other => 1.00,
        }
    }
}

/// Optional per-call context handed to the engine alongside the roster.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChemistryContext {
    /// Daily ephemeris snapshot, read only by the transit modifier
    #[serde(default)]
    pub transit: Option<TransitData>,

    /// Per-role multiplier overrides
    #[serde(default)]
    pub role_weights: BTreeMap<Role, f64>,

    /// Season record, read only by the historical calibration modifier
    #[serde(default)]
    pub historical: Option<HistoricalRecord>,
}

impl ChemistryContext {
    /// True when the context carries anything the engine or its modifiers read.
    pub fn has_data(&self) -> bool {
        self.transit.is_some() || !self.role_weights.is_empty() || self.historical.is_some()
    }
}

/// One day of ephemeris data in the shape the ephemeris job stores it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TransitData {
    /// 0.0 = new moon, 0.5 = full moon
    #[serde(default)]
    pub moon_phase: f64,

    #[serde(default)]
    pub mercury_retrograde: bool,

    /// Named body pairs to aspect names, e.g. `"sun_mars": "square"`
    #[serde(default)]
    pub aspects: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoricalRecord {
    pub wins: u32,
    pub losses: u32,
}

impl HistoricalRecord {
    pub fn games(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// Win percentage, or None when no games have been played.
    pub fn win_pct(&self) -> Option<f64> {
        match self.games() {
            0 => None,
            n => Some(self.wins as f64 / n as f64),
        }
    }
}

/// On-disk roster file: one team and its members.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TeamRoster {
    pub team_id: String,

    #[serde(default)]
    pub team_name: Option<String>,

    #[serde(default)]
    pub members: Vec<RosterMember>,

    #[serde(default)]
    pub context: Option<ChemistryContext>,
}

impl TeamRoster {
    pub fn display_name(&self) -> &str {
        self.team_name.as_deref().unwrap_or(&self.team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_basketball() {
        assert_eq!(Role::parse("PG"), Role::Guard);
        assert_eq!(Role::parse("sg"), Role::Guard);
        assert_eq!(Role::parse("Power Forward"), Role::Forward);
        assert_eq!(Role::parse("C"), Role::Center);
    }

    #[test]
    fn test_role_parse_baseball() {
        assert_eq!(Role::parse("SP"), Role::Pitcher);
        assert_eq!(Role::parse("catcher"), Role::Catcher);
        assert_eq!(Role::parse("1B"), Role::Infielder);
        assert_eq!(Role::parse("cf"), Role::Outfielder);
        assert_eq!(Role::parse("designated-hitter"), Role::DesignatedHitter);
    }

    #[test]
    fn test_role_parse_unknown_is_other() {
        assert_eq!(Role::parse(""), Role::Other);
        assert_eq!(Role::parse("coach"), Role::Other);
        assert_eq!(Role::Other.default_multiplier(), 1.0);
    }

    #[test]
    fn test_availability_aliases() {
        let parsed: AvailabilityStatus = serde_json::from_str("\"day-to-day\"").unwrap();
        assert_eq!(parsed, AvailabilityStatus::DayToDay);
        let parsed: AvailabilityStatus = serde_json::from_str("\"injured\"").unwrap();
        assert_eq!(parsed, AvailabilityStatus::Out);
        let parsed: AvailabilityStatus = serde_json::from_str("\"questionable\"").unwrap();
        assert_eq!(parsed, AvailabilityStatus::Questionable);
    }

    #[test]
    fn test_unknown_availability_rejected() {
        let parsed: Result<AvailabilityStatus, _> = serde_json::from_str("\"probable\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_member_defaults_from_sparse_json() {
        let json = r#"{"id": "p1", "birth_date": "1990-04-01", "position": "PG"}"#;
        let member: RosterMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.id, "p1");
        assert_eq!(member.date_attribute.as_deref(), Some("1990-04-01"));
        assert_eq!(member.availability_status, AvailabilityStatus::Active);
        assert_eq!(member.role_key(), Role::Guard);
        assert_eq!(member.performance_score, 0.0);
    }

    #[test]
    fn test_historical_win_pct() {
        assert_eq!(HistoricalRecord { wins: 0, losses: 0 }.win_pct(), None);
        assert_eq!(HistoricalRecord { wins: 3, losses: 1 }.win_pct(), Some(0.75));
    }

    #[test]
    fn test_context_has_data() {
        let mut context = ChemistryContext::default();
        assert!(!context.has_data());
        context.role_weights.insert(Role::Guard, 1.2);
        assert!(context.has_data());
    }
}
