use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub poll: PollConfig,
    pub processes: ProcessesConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    /// Upper bound on how long one scheduled collect is waited for.
    pub collect_deadline_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval_ms: 5000,
            collect_deadline_ms: 10_000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProcessesConfig {
    /// How many ranked processes the process endpoints return.
    pub top: usize,
}

impl Default for ProcessesConfig {
    fn default() -> Self {
        ProcessesConfig { top: 50 }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vitals").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.server.listen, "0.0.0.0:3000");
        assert_eq!(config.poll.interval_ms, 5000);
        assert_eq!(config.poll.collect_deadline_ms, 10_000);
        assert_eq!(config.processes.top, 50);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[poll]
interval_ms = 1000
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.poll.interval_ms, 1000);
        // Other fields should be defaults
        assert_eq!(config.server.listen, "0.0.0.0:3000");
        assert_eq!(config.processes.top, 50);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:8080"

[poll]
interval_ms = 2500
collect_deadline_ms = 4000

[processes]
top = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:8080");
        assert_eq!(config.poll.interval_ms, 2500);
        assert_eq!(config.poll.collect_deadline_ms, 4000);
        assert_eq!(config.processes.top, 10);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.poll.interval_ms, 5000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("vitals_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.poll.interval_ms, 5000);
        let _ = std::fs::remove_file(&temp);
    }
}
