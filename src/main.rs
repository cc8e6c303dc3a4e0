use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use team_chemistry::batch::{effective_context, expand_glob, score_rosters};
use team_chemistry::chemistry::{
    validate_chemistry, validate_role_weights, ChemistryEngine, EphemerisTransit,
    RecordCalibration,
};
use team_chemistry::output::{
    format_batch_table, format_json, format_result_detail, format_summary, should_use_colors,
    ScoredTeam,
};
use team_chemistry::roster::{load_context, load_roster, ChemistryContext};
use team_chemistry::stderr_buffer;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a single roster file
    Score {
        /// Path to the roster JSON file
        roster: PathBuf,

        /// Context JSON (transit data, role weights, season record)
        #[arg(long)]
        context: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score every roster file matching a glob pattern
    Batch {
        /// Glob pattern, e.g. "rosters/*.json"
        pattern: String,

        /// Print results and summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a config file populated with the defaults
    Init {
        /// Where to write (defaults to ~/.config/team-chemistry/config.yaml)
        path: Option<PathBuf>,

        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "team-chemistry")]
#[command(about = "Team chemistry scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/team-chemistry/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Apply the ephemeris transit adjustment when context carries transit data
    #[arg(long, global = true)]
    transit: bool,

    /// Apply the season record calibration when context carries a record
    #[arg(long, global = true)]
    historical: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    // Init writes the config, so it runs before one is loaded
    if let Commands::Init { path, force } = &cli.command {
        let interactive = std::io::stdin().is_terminal();
        if let Err(e) = team_chemistry::config::run_init(path.clone(), interactive, *force) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match team_chemistry::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate chemistry config at startup
    let chemistry = config.chemistry();
    let mut errors = validate_chemistry(&chemistry).err().unwrap_or_default();
    if let Some(role_weights) = &config.role_weights {
        errors.extend(validate_role_weights(role_weights).err().unwrap_or_default());
    }
    if !errors.is_empty() {
        eprintln!("Chemistry config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let mut engine = ChemistryEngine::new(chemistry);
    if cli.transit {
        engine = engine.with_transit(EphemerisTransit::default());
    }
    if cli.historical {
        engine = engine.with_historical(RecordCalibration::default());
    }

    if cli.verbose {
        let mut enabled = Vec::new();
        if cli.transit {
            enabled.push("transit");
        }
        if cli.historical {
            enabled.push("historical");
        }
        eprintln!(
            "Modifiers: {}",
            if enabled.is_empty() {
                "none".to_string()
            } else {
                enabled.join(", ")
            }
        );
    }

    let base_context = ChemistryContext {
        role_weights: config.role_weights.clone().unwrap_or_default(),
        ..Default::default()
    };

    let use_colors = should_use_colors();

    match cli.command {
        Commands::Score {
            roster,
            context,
            json,
        } => {
            let base_context = match context {
                Some(path) => match load_context(&path) {
                    Ok(file_context) => effective_context(&base_context, Some(&file_context)),
                    Err(e) => {
                        eprintln!("Context error: {:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
                None => base_context,
            };

            let team = match load_roster(&roster) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Roster error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if cli.verbose {
                eprintln!(
                    "Loaded roster {} with {} members",
                    team.team_id,
                    team.members.len()
                );
            }

            let context = effective_context(&base_context, team.context.as_ref());
            let context = context.has_data().then_some(&context);
            let result = engine.calculate(&team.members, context);

            if json {
                match format_json(&result) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                }
            } else {
                println!(
                    "{}",
                    format_result_detail(team.display_name(), &team.team_id, &result, use_colors)
                );
            }
        }
        Commands::Batch { pattern, json } => {
            stderr_buffer::activate();

            let (paths, walk_errors) = match expand_glob(&pattern) {
                Ok(found) => found,
                Err(e) => {
                    stderr_buffer::drain();
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if paths.is_empty() {
                for msg in stderr_buffer::drain() {
                    eprintln!("{}", msg);
                }
                eprintln!("No roster files match {}", pattern);
                std::process::exit(EXIT_INPUT);
            }

            if cli.verbose {
                eprintln!("Scoring {} roster files", paths.len());
            }

            let mut report = score_rosters(paths, &engine, &base_context, cli.verbose).await;
            report.summary.errored += walk_errors;

            if json {
                match format_json(&report) {
                    Ok(out) => println!("{}", out),
                    Err(e) => eprintln!("{:#}", e),
                }
            } else {
                let rows: Vec<ScoredTeam> = report
                    .teams
                    .iter()
                    .map(|t| ScoredTeam {
                        team_id: &t.team_id,
                        team_name: &t.team_name,
                        result: &t.result,
                    })
                    .collect();
                println!("{}", format_batch_table(&rows, use_colors));
            }

            for msg in stderr_buffer::drain() {
                eprintln!("{}", msg);
            }
            eprintln!("{}", format_summary(&report.summary));

            if report.summary.scored == 0 && report.summary.errored > 0 {
                std::process::exit(EXIT_INPUT);
            }
        }
        Commands::Init { .. } => {}
    }

    if cli.verbose {
        eprintln!(
            "Done in {}",
            humantime::format_duration(Duration::from_millis(
                start_time.elapsed().as_millis() as u64
            ))
        );
    }

    std::process::exit(EXIT_SUCCESS);
}
