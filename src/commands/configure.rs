use std::path::Path;

use anyhow::Result;

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::utils::{print_success, print_warning};

pub fn handle_config_command(
    config: &Config,
    config_path: &Path,
    command: &ConfigCommands,
) -> Result<()> {
    match command {
        ConfigCommands::Show => handle_show_command(config),
        ConfigCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigCommands::Init { force } => handle_init_command(config_path, *force).map(|_| ()),
    }
}

fn handle_show_command(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write defaults to `config_path`; returns whether a file was written
fn handle_init_command(config_path: &Path, force: bool) -> Result<bool> {
    if config_path.exists() && !force {
        print_warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
        return Ok(false);
    }

    Config::default().save_to(config_path)?;
    print_success(&format!("Wrote default config to {}", config_path.display()));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_respects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nparameter = 3\n").unwrap();

        assert!(!handle_init_command(&path, false).unwrap());
        assert_eq!(Config::load_custom(&path).unwrap().general.parameter, 3);

        assert!(handle_init_command(&path, true).unwrap());
        assert_eq!(Config::load_custom(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("config.toml");

        assert!(handle_init_command(&path, false).unwrap());
        assert!(path.exists());
    }
}
