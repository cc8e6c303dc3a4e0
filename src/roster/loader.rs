use super::types::{ChemistryContext, TeamRoster};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a single team roster from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a valid roster
/// (including unknown availability statuses).
pub fn load_roster(path: &Path) -> Result<TeamRoster> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open roster file at {}", path.display()))?;

    let roster: TeamRoster = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse roster: invalid JSON in {}", path.display()))?;

    Ok(roster)
}

/// Async variant of [`load_roster`] for the batch command.
pub async fn load_roster_async(path: &Path) -> Result<TeamRoster> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read roster file at {}", path.display()))?;

    let roster: TeamRoster = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse roster: invalid JSON in {}", path.display()))?;

    Ok(roster)
}

/// Load a standalone context file (transit data, role overrides, record).
pub fn load_context(path: &Path) -> Result<ChemistryContext> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open context file at {}", path.display()))?;

    let context: ChemistryContext = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse context: invalid JSON in {}", path.display()))?;

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{AvailabilityStatus, Role};
    use std::env;

    const SAMPLE: &str = r#"{
        "team_id": "BOS",
        "team_name": "Boston",
        "members": [
            {"id": "1", "name": "A", "performance_score": 80, "birth_date": "1990-04-01", "position": "PG"},
            {"id": "2", "name": "B", "performance_score": 60, "status": "out"}
        ],
        "context": {"role_weights": {"guard": 1.3}}
    }"#;

    #[test]
    fn test_load_roster_roundtrip() {
        let temp_path = env::temp_dir().join("team_chemistry_test_roster.json");
        std::fs::write(&temp_path, SAMPLE).unwrap();

        let roster = load_roster(&temp_path).unwrap();
        assert_eq!(roster.team_id, "BOS");
        assert_eq!(roster.display_name(), "Boston");
        assert_eq!(roster.members.len(), 2);
        assert_eq!(roster.members[1].availability_status, AvailabilityStatus::Out);

        let context = roster.context.unwrap();
        assert_eq!(context.role_weights.get(&Role::Guard), Some(&1.3));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_missing_roster_errors() {
        let temp_path = env::temp_dir().join("team_chemistry_test_missing_roster.json");
        let _ = std::fs::remove_file(&temp_path);

        let err = load_roster(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Failed to open roster file"));
    }

    #[test]
    fn test_load_invalid_roster_errors() {
        let temp_path = env::temp_dir().join("team_chemistry_test_invalid_roster.json");
        std::fs::write(&temp_path, "{\"members\": []}").unwrap();

        let err = load_roster(&temp_path).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[tokio::test]
    async fn test_load_roster_async() {
        let temp_path = env::temp_dir().join("team_chemistry_test_roster_async.json");
        std::fs::write(&temp_path, SAMPLE).unwrap();

        let roster = load_roster_async(&temp_path).await.unwrap();
        assert_eq!(roster.members.len(), 2);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_context() {
        let temp_path = env::temp_dir().join("team_chemistry_test_context.json");
        std::fs::write(
            &temp_path,
            r#"{"transit": {"moon_phase": 0.5, "mercury_retrograde": true}, "historical": {"wins": 10, "losses": 5}}"#,
        )
        .unwrap();

        let context = load_context(&temp_path).unwrap();
        assert!(context.transit.unwrap().mercury_retrograde);
        assert_eq!(context.historical.unwrap().wins, 10);

        let _ = std::fs::remove_file(&temp_path);
    }
}
