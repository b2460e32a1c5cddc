//! `lockstamp init`: write a default config file.

use crate::cli::InitArgs;
use lockstamp::config::{Config, DEFAULT_CONFIG_FILE};
use lockstamp::error::{Result, StampError};
use lockstamp::exit_codes;
use lockstamp::fs::atomic_write;
use std::path::Path;
use tracing::info;

pub(crate) fn cmd_init(config_path: Option<&Path>, args: InitArgs) -> Result<i32> {
    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

    if path.exists() && !args.force {
        return Err(StampError::UserError(format!(
            "config file '{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write(path, yaml.as_bytes())?;
    info!(path = %path.display(), "wrote default config");

    println!("Wrote {}", path.display());
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lockstamp.yaml");

        let code = cmd_init(Some(path.as_path()), InitArgs { force: false }).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.lock_path, Config::default().lock_path);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lockstamp.yaml");
        std::fs::write(&path, "log_level: debug\n").unwrap();

        let err = cmd_init(Some(path.as_path()), InitArgs { force: false }).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "log_level: debug\n");
    }

    #[test]
    fn test_init_force_overwrites_broken_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lockstamp.yaml");
        std::fs::write(&path, "log_level: [not, valid]\n").unwrap();

        cmd_init(Some(path.as_path()), InitArgs { force: true }).unwrap();
        assert!(Config::load(&path).is_ok());
    }
}
