//! Show or write the configuration file.

use std::path::Path;

use anyhow::Context;

use crate::config::{self, Config};

/// Print the effective configuration, or write it to disk with `init`.
///
/// `path` is the `--config` override; without it the OS config directory is used.
pub fn cmd_config(config: &Config, path: Option<&Path>, init: bool) -> anyhow::Result<()> {
    if init {
        match path {
            Some(path) => config::save_to(config, path)?,
            None => config::save(config)?,
        }
    }

    let shown = path.map(Path::to_path_buf).or_else(config::config_path);
    match shown {
        Some(path) if init => println!("Wrote {}", path.display()),
        Some(path) => println!("# {}", path.display()),
        None => println!("# no config directory available"),
    }

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.bind = "127.0.0.1:4000".to_string();
        cmd_config(&config, Some(&path), true).unwrap();

        assert_eq!(config::load_from(&path).server.bind, "127.0.0.1:4000");
    }

    #[test]
    fn test_show_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        cmd_config(&Config::default(), Some(&path), false).unwrap();
        assert!(!path.exists());
    }
}
