use std::io::IsTerminal;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::batch::BatchSummary;
use crate::chemistry::{Element, TeamChemistryResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a chemistry score for display.
/// Insufficient-data results get an asterisk since the value is a fixed fallback.
pub fn format_score(score: u8, insufficient: bool) -> String {
    if insufficient {
        format!("{}*", score)
    } else {
        score.to_string()
    }
}

fn colored_score(score: u8, insufficient: bool, use_colors: bool) -> String {
    let text = format_score(score, insufficient);
    if !use_colors {
        return text;
    }
    if insufficient {
        text.dimmed().to_string()
    } else if score >= 70 {
        text.green().bold().to_string()
    } else if score >= 40 {
        text.yellow().bold().to_string()
    } else {
        text.red().bold().to_string()
    }
}

/// Format one team's result with the full breakdown.
pub fn format_result_detail(
    team_name: &str,
    team_id: &str,
    result: &TeamChemistryResult,
    use_colors: bool,
) -> String {
    let insufficient = result.metadata.insufficient_data;
    let header_name = if use_colors {
        team_name.bold().to_string()
    } else {
        team_name.to_string()
    };
    let header_id = if use_colors {
        team_id.cyan().to_string()
    } else {
        team_id.to_string()
    };

    let mut lines = vec![format!(
        "{} ({})  Chemistry: {}",
        header_name,
        header_id,
        colored_score(result.score, insufficient, use_colors)
    )];

    let e = &result.elements;
    let shares = Element::ALL
        .iter()
        .map(|el| format!("{} {}%", el.label(), e.percentage(*el)))
        .collect::<Vec<_>>()
        .join(" | ");
    lines.push(format!("  Elements: {}", shares));
    lines.push(format!(
        "  Balance: {}  Synergy: +{}  Diversity: +{}  Composite: {}",
        e.balance, e.synergy_bonus, e.diversity_bonus, e.composite
    ));

    let a = &result.aspects;
    lines.push(format!(
        "  Aspects: harmony {}  challenge {}  net {:+}",
        a.harmony, a.challenge, a.net_harmony
    ));

    if !a.pairs.is_empty() {
        lines.push("  Pairs:".to_string());
        for pair in &a.pairs {
            let contribution = format!("{:+.3}", pair.contribution);
            let contribution = if !use_colors {
                contribution
            } else if pair.contribution >= 0.0 {
                contribution.green().to_string()
            } else {
                contribution.red().to_string()
            };
            lines.push(format!(
                "    {} / {}  {}  {}",
                pair.first,
                pair.second,
                pair.aspect.label(),
                contribution
            ));
        }
    }

    let m = &result.metadata;
    if !m.bonuses_applied.is_empty() {
        lines.push(format!("  Bonuses: {}", m.bonuses_applied.join(", ")));
    }
    if !m.modifiers_applied.is_empty() {
        lines.push(format!("  Modifiers: {}", m.modifiers_applied.join(", ")));
    }
    lines.push(format!(
        "  Members: {} (categorized {}, active {})",
        m.member_count, m.categorized_count, m.active_count
    ));
    if insufficient {
        let note = "  Fewer than two members have a usable birth date; score is a fallback.";
        lines.push(if use_colors {
            note.dimmed().to_string()
        } else {
            note.to_string()
        });
    }

    lines.join("\n")
}

/// A team with its chemistry result for table display
pub struct ScoredTeam<'a> {
    pub team_id: &'a str,
    pub team_name: &'a str,
    pub result: &'a TeamChemistryResult,
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, counting chars rather than bytes
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format teams as a ranked table: Index, Score, Team name, Team id.
/// No headers. Score column is right-aligned, 4 chars wide (fits "100*").
pub fn format_batch_table(teams: &[ScoredTeam], use_colors: bool) -> String {
    if teams.is_empty() {
        return "No rosters scored.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 4;
    let separator = "  ";

    teams
        .iter()
        .enumerate()
        .map(|(idx, team)| {
            let index_str = format!("{:>2}.", idx + 1);
            let insufficient = team.result.metadata.insufficient_data;
            let score_str = format_score(team.result.score, insufficient);
            let score_padded = format!("{:>width$}", score_str, width = score_width);

            let fixed_width =
                index_width + 1 + score_width + separator.len() * 2 + team.team_id.chars().count();

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(team.team_name, width - fixed_width)
                }
                Some(_) => truncate_name(team.team_name, 20),
                None => team.team_name.to_string(),
            };

            if use_colors {
                let score_colored = if insufficient {
                    score_padded.dimmed().to_string()
                } else {
                    score_padded.bold().to_string()
                };
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_colored,
                    separator,
                    name,
                    separator,
                    team.team_id.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_padded, separator, name, separator, team.team_id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line batch summary: "Scored 3, skipped 1, errored 0"
pub fn format_summary(summary: &BatchSummary) -> String {
    format!(
        "Scored {}, skipped {}, errored {}",
        summary.scored, summary.skipped, summary.errored
    )
}

/// Pretty-printed JSON for any serializable output.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}
