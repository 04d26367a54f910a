//! Configuration loading for the CLI

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Connection settings for the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server hostname or base URL
    pub server: Option<String>,
    /// Username for authenticated operations
    pub username: Option<String>,
    /// Password for authenticated operations
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from an explicit path, the `COBBLER_CONFIG`
    /// environment variable, or the default search paths.
    ///
    /// # Errors
    /// Returns an error if a named file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        if let Ok(path) = std::env::var("COBBLER_CONFIG") {
            return Self::read(Path::new(&path));
        }

        let paths = [
            PathBuf::from("cobbler.toml"),
            PathBuf::from("/etc/cobbler-rs/cobbler.toml"),
            dirs::config_dir()
                .map(|p| p.join("cobbler-rs/cobbler.toml"))
                .unwrap_or_default(),
        ];

        for path in paths {
            if path.exists() {
                return Self::read(&path);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Config::default())
    }

    fn read(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            "server = \"cobbler.example.com\"\nusername = \"admin\"\npassword = \"secret\"\n",
        )
        .unwrap();
        assert_eq!(config.server.as_deref(), Some("cobbler.example.com"));
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("server = \"localhost\"\n").unwrap();
        assert_eq!(config.server.as_deref(), Some("localhost"));
        assert_eq!(config.username, None);
        assert_eq!(config.password, None);
    }
}
