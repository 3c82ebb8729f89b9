//! Init command - scaffold a configuration file and the bundled rule sets

use colored::Colorize;
use std::fs;
use std::path::Path;

use super::InitArgs;
use crate::cli::exit_codes;
use crate::config::{Config, CONFIG_FILENAME};
use crate::error::{CcError, ConfigError};
use crate::rules::BUNDLED_RULE_FILES;

pub async fn execute(args: InitArgs) -> Result<i32, CcError> {
    let config_path = Path::new(CONFIG_FILENAME);
    let config = Config::default();
    let rules_dir = config.paths.rules.clone();

    let mut targets = vec![(config_path.to_path_buf(), config.to_toml()?)];
    for (name, content) in BUNDLED_RULE_FILES {
        targets.push((rules_dir.join(name), content.to_string()));
    }

    if !args.force {
        if let Some((existing, _)) = targets.iter().find(|(path, _)| path.exists()) {
            return Err(ConfigError::AlreadyExists(existing.display().to_string()).into());
        }
    }

    fs::create_dir_all(&rules_dir).map_err(|e| ConfigError::FileWrite {
        path: rules_dir.display().to_string(),
        source: e,
    })?;

    for (path, content) in &targets {
        fs::write(path, content).map_err(|e| ConfigError::FileWrite {
            path: path.display().to_string(),
            source: e,
        })?;
        println!("{} {}", "Created".green().bold(), path.display().to_string().cyan());
    }

    println!("\nNext steps:");
    println!(
        "  1. Put documents (.txt, .pdf, .docx) under {}",
        config.paths.docs.display().to_string().cyan()
    );
    println!("  2. Run {}", "ccscan scan --regime GDPR".cyan());
    println!("  3. Review past runs with {}", "ccscan history".cyan());

    Ok(exit_codes::SUCCESS)
}
