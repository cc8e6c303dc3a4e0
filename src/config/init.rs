use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::chemistry::validate_chemistry;
use crate::config::{get_config_path, Config};

const CONFIG_HEADER: &str = "\
# team-chemistry configuration
# Every constant below is optional; delete a line to fall back to its default.
";

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Prompt until the answer parses as a number inside `[lo, hi]`.
fn prompt_number(message: &str, default: f64, lo: f64, hi: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= lo && v <= hi => return Ok(v),
            Ok(_) => println!("  Invalid: must be between {} and {}. Try again.", lo, hi),
            Err(_) => println!("  Invalid: not a number. Try again."),
        }
    }
}

/// Serialize a config to YAML with the explanatory header.
pub fn render_config(config: &Config) -> Result<String> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
    Ok(format!("{}{}", CONFIG_HEADER, yaml))
}

/// Write a config file atomically, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = render_config(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Create a config file populated with every default.
///
/// With `interactive`, asks for the headline blend and threshold values
/// first. An existing file is only replaced with `force` or after the user
/// confirms.
pub fn run_init(path: Option<PathBuf>, interactive: bool, force: bool) -> Result<()> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        let overwrite = interactive
            && prompt_yes_no(
                &format!(
                    "Config already exists at {}. Overwrite?",
                    config_path.display()
                ),
                false,
            )?;
        if !overwrite {
            println!("Config already exists at {}; leaving it unchanged.", config_path.display());
            return Ok(());
        }
    }

    let mut config = Config::full_defaults();

    if interactive && prompt_yes_no("Customize the score blend? (n accepts defaults)", false)? {
        let chemistry = config.chemistry.get_or_insert_with(Default::default);

        println!();
        println!("The final score blends the elemental balance with pairwise compatibility.");
        let element_blend = prompt_number(
            "Share of the elemental score (0-1)",
            chemistry.composition.element_blend,
            0.0,
            1.0,
        )?;
        chemistry.composition.element_blend = element_blend;
        chemistry.composition.aspect_blend = 1.0 - element_blend;

        println!();
        println!("A synergy bonus applies when one element holds more than this share of the roster.");
        chemistry.elements.dominance_threshold = prompt_number(
            "Dominance threshold (percent)",
            chemistry.elements.dominance_threshold,
            0.0,
            100.0,
        )?;

        println!();
        println!("Rosters with fewer than two members carrying a valid date get a fixed score.");
        chemistry.composition.insufficient_data_score = prompt_number(
            "Score for insufficient data (0-100)",
            f64::from(chemistry.composition.insufficient_data_score),
            0.0,
            100.0,
        )?
        .round() as u8;

        if let Err(errors) = validate_chemistry(chemistry) {
            anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
        }
    }

    write_config(&config_path, &config)?;
    println!("Config written to {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_render_config_has_header_and_sections() {
        let rendered = render_config(&Config::full_defaults()).unwrap();
        assert!(rendered.starts_with("# team-chemistry configuration"));
        assert!(rendered.contains("composition"));
        assert!(rendered.contains("role_weights"));
    }

    #[test]
    fn test_write_then_load() {
        let temp_path = env::temp_dir()
            .join("team_chemistry_test_init")
            .join("config.yaml");
        let _ = std::fs::remove_file(&temp_path);

        write_config(&temp_path, &Config::full_defaults()).unwrap();
        let loaded = crate::config::load_config(Some(temp_path.clone())).unwrap();
        assert_eq!(loaded, Config::full_defaults());

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_run_init_keeps_existing_file_without_force() {
        let temp_path = env::temp_dir().join("team_chemistry_test_init_existing.yaml");
        std::fs::write(&temp_path, "{}\n").unwrap();

        run_init(Some(temp_path.clone()), false, false).unwrap();
        assert_eq!(std::fs::read_to_string(&temp_path).unwrap(), "{}\n");

        run_init(Some(temp_path.clone()), false, true).unwrap();
        let written = std::fs::read_to_string(&temp_path).unwrap();
        assert!(written.starts_with("# team-chemistry configuration"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
