use anyhow::{Context, Result};
use crate::buffered_eprintln;
use crate::chemistry::{ChemistryEngine, TeamChemistryResult};
use crate::roster::{load_roster_async, ChemistryContext};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Rosters that produced a result (including insufficient-data fallbacks)
    pub scored: usize,
    /// Rosters with no members
    pub skipped: usize,
    /// Files that could not be read or parsed
    pub errored: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamScore {
    pub path: PathBuf,
    pub team_id: String,
    pub team_name: String,
    pub result: TeamChemistryResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub teams: Vec<TeamScore>,
    pub summary: BatchSummary,
}

/// Expand a glob pattern into a sorted list of files.
///
/// Entries that cannot be read while walking are reported as warnings and
/// counted in the returned error tally.
pub fn expand_glob(pattern: &str) -> Result<(Vec<PathBuf>, usize)> {
    let entries =
        glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;

    let mut paths = Vec::new();
    let mut errors = 0;
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => {
                buffered_eprintln!("Skipping unreadable path {}: {}", e.path().display(), e.error());
                errors += 1;
            }
        }
    }
    paths.sort();
    paths.dedup();
    Ok((paths, errors))
}

/// Combine the run-wide context with the roster's own context.
///
/// Roster role weights override matching base entries; roster transit data
/// and record replace the base values when present.
pub fn effective_context(
    base: &ChemistryContext,
    roster: Option<&ChemistryContext>,
) -> ChemistryContext {
    let Some(own) = roster else {
        return base.clone();
    };

    let mut role_weights = base.role_weights.clone();
    role_weights.extend(own.role_weights.iter().map(|(role, m)| (*role, *m)));

    ChemistryContext {
        transit: own.transit.clone().or_else(|| base.transit.clone()),
        role_weights,
        historical: own.historical.or(base.historical),
    }
}

/// Load every roster file concurrently, then score each team once through
/// the shared engine. Results are sorted by score descending, then team id.
pub async fn score_rosters(
    paths: Vec<PathBuf>,
    engine: &ChemistryEngine,
    base_context: &ChemistryContext,
    verbose: bool,
) -> BatchReport {
    let mut summary = BatchSummary::default();
    let mut teams = Vec::new();

    let mut futures = FuturesUnordered::new();
    for path in paths {
        futures.push(async move {
            let result = load_roster_async(&path).await;
            (path, result)
        });
    }

    while let Some((path, loaded)) = futures.next().await {
        let roster = match loaded {
            Ok(roster) => roster,
            Err(e) => {
                buffered_eprintln!("Failed to load {}: {:#}", path.display(), e);
                summary.errored += 1;
                continue;
            }
        };

        if roster.members.is_empty() {
            buffered_eprintln!("Skipping {}: roster {} has no members", path.display(), roster.team_id);
            summary.skipped += 1;
            continue;
        }

        let context = effective_context(base_context, roster.context.as_ref());
        let context = context.has_data().then_some(&context);
        let result = engine.calculate(&roster.members, context);

        if verbose {
            eprintln!(
                "  Scored {} ({} members) from {}",
                roster.team_id,
                roster.members.len(),
                path.display()
            );
        }

        summary.scored += 1;
        teams.push(TeamScore {
            team_name: roster.display_name().to_string(),
            team_id: roster.team_id,
            path,
            result,
        });
    }

    teams.sort_by(|a, b| {
        b.result
            .score
            .cmp(&a.result.score)
            .then_with(|| a.team_id.cmp(&b.team_id))
            .then_with(|| a.path.cmp(&b.path))
    });

    BatchReport { teams, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{HistoricalRecord, Role};
    use std::env;
    use std::fs;

    fn write_roster(dir: &std::path::Path, file: &str, body: &str) -> PathBuf {
        let path = dir.join(file);
        fs::write(&path, body).unwrap();
        path
    }

    fn test_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const PAIR: &str = r#"{
        "team_id": "PAIR",
        "members": [
            {"id": "a", "name": "A", "performance_score": 50, "secondary_influence_score": 50, "date_attribute": "1990-04-01"},
            {"id": "b", "name": "B", "performance_score": 50, "secondary_influence_score": 50, "date_attribute": "1991-08-01"}
        ]
    }"#;

    const SOLO: &str = r#"{
        "team_id": "SOLO",
        "members": [
            {"id": "a", "name": "A", "performance_score": 50, "date_attribute": "1990-04-01"}
        ]
    }"#;

    const EMPTY: &str = r#"{"team_id": "EMPTY", "members": []}"#;

    #[test]
    fn test_effective_context_overlay() {
        let mut base = ChemistryContext::default();
        base.role_weights.insert(Role::Guard, 1.2);
        base.role_weights.insert(Role::Center, 1.0);
        base.historical = Some(HistoricalRecord { wins: 1, losses: 1 });

        let mut own = ChemistryContext::default();
        own.role_weights.insert(Role::Guard, 1.4);

        let merged = effective_context(&base, Some(&own));
        assert_eq!(merged.role_weights.get(&Role::Guard), Some(&1.4));
        assert_eq!(merged.role_weights.get(&Role::Center), Some(&1.0));
        assert_eq!(merged.historical, Some(HistoricalRecord { wins: 1, losses: 1 }));

        assert_eq!(effective_context(&base, None), base);
    }

    #[test]
    fn test_expand_glob_sorted_files_only() {
        let dir = test_dir("team_chemistry_test_glob");
        write_roster(&dir, "b.json", PAIR);
        write_roster(&dir, "a.json", SOLO);
        fs::create_dir_all(dir.join("nested.json")).unwrap();

        let pattern = format!("{}/*.json", dir.display());
        let (paths, errors) = expand_glob(&pattern).unwrap();
        assert_eq!(errors, 0);
        assert_eq!(paths, vec![dir.join("a.json"), dir.join("b.json")]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_expand_glob_invalid_pattern() {
        assert!(expand_glob("[unclosed").is_err());
    }

    #[tokio::test]
    async fn test_score_rosters_counts_and_order() {
        let _guard = crate::stderr_buffer::test_guard();
        let dir = test_dir("team_chemistry_test_batch");
        let paths = vec![
            write_roster(&dir, "solo.json", SOLO),
            write_roster(&dir, "pair.json", PAIR),
            write_roster(&dir, "empty.json", EMPTY),
            write_roster(&dir, "broken.json", "{not json"),
        ];

        let engine = ChemistryEngine::default();
        crate::stderr_buffer::activate();
        let report = score_rosters(paths, &engine, &ChemistryContext::default(), false).await;
        let warnings = crate::stderr_buffer::drain();

        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("broken.json")));
        assert!(warnings.iter().any(|w| w.contains("empty.json") && w.contains("no members")));
        assert_eq!(
            report.summary,
            BatchSummary {
                scored: 2,
                skipped: 1,
                errored: 1,
            }
        );
        assert_eq!(report.teams.len(), 2);
        assert!(report.teams[0].result.score >= report.teams[1].result.score);
        let solo = report.teams.iter().find(|t| t.team_id == "SOLO").unwrap();
        assert!(solo.result.metadata.insufficient_data);
        assert_eq!(solo.team_name, "SOLO");

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_score_rosters_matches_direct_scoring() {
        let dir = test_dir("team_chemistry_test_batch_direct");
        let path = write_roster(&dir, "pair.json", PAIR);
        let roster = crate::roster::load_roster(&path).unwrap();

        let engine = ChemistryEngine::default();
        let report = score_rosters(vec![path], &engine, &ChemistryContext::default(), false).await;
        let direct = engine.calculate(&roster.members, None);

        assert_eq!(report.teams[0].result, direct);

        let _ = fs::remove_dir_all(&dir);
    }
}
