use handcount_core::model::player::{MAX_PLAYERS, MIN_PLAYERS};
use handcount_core::model::settings::TimeLimit;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

/// Optional YAML configuration for the terminal front-end.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CliConfig {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut cfg: CliConfig = read_yaml(path)?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg)
    }

    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.table.validate()?;
        self.logging.normalize();
        Ok(())
    }
}

/// Table defaults applied before the first prompt.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableConfig {
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default = "default_time_limit_seconds")]
    pub time_limit_seconds: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            time_limit_seconds: default_time_limit_seconds(),
        }
    }
}

impl TableConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if TimeLimit::from_seconds(self.time_limit_seconds).is_err() {
            let presets: Vec<String> = TimeLimit::PRESETS
                .iter()
                .map(|p| p.seconds().to_string())
                .collect();
            return Err(ValidationError::InvalidField {
                field: "table.time_limit_seconds".to_string(),
                message: format!("must be one of {}", presets.join(", ")),
            });
        }

        if !self.players.is_empty() {
            if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players.len()) {
                return Err(ValidationError::InvalidField {
                    field: "table.players".to_string(),
                    message: format!(
                        "expected between {MIN_PLAYERS} and {MAX_PLAYERS} names, got {}",
                        self.players.len()
                    ),
                });
            }
            if let Some(index) = self.players.iter().position(|n| n.trim().is_empty()) {
                return Err(ValidationError::InvalidField {
                    field: format!("table.players[{index}]"),
                    message: "player name must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn default_time_limit_seconds() -> u32 {
    TimeLimit::DEFAULT.seconds()
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            log_file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

pub(crate) fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Read {
        source,
        path: path.to_path_buf(),
    })?;
    serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
        source,
        path: path.to_path_buf(),
    })
}

/// Errors surfaced when loading configuration or replay files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
table:
  players: ["Ana", "Bruno", "Caio"]
  time_limit_seconds: 45
logging:
  enable_structured: true
  tracing_level: "debug"
  log_file: "logs/handcount.jsonl"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: CliConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");
        assert_eq!(cfg.table.players.len(), 3);
        assert_eq!(cfg.table.time_limit_seconds, 45);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(
            cfg.logging.log_file,
            Some(PathBuf::from("logs/handcount.jsonl"))
        );
    }

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg: CliConfig = serde_yaml::from_str("{}").expect("parse");
        cfg.validate().expect("defaults are valid");
        assert!(cfg.table.players.is_empty());
        assert_eq!(cfg.table.time_limit_seconds, 60);
        assert!(!cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::WARN));
    }

    #[test]
    fn rejects_time_limit_outside_presets() {
        let yaml = BASIC_YAML.replace("45", "50");
        let mut cfg: CliConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("50s is not a preset");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "table.time_limit_seconds"
        ));
    }

    #[test]
    fn rejects_blank_player_name() {
        let yaml = BASIC_YAML.replace("\"Bruno\"", "\"  \"");
        let mut cfg: CliConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("blank name");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "table.players[1]"
        ));
    }

    #[test]
    fn rejects_too_many_players() {
        let yaml = BASIC_YAML.replace(
            "[\"Ana\", \"Bruno\", \"Caio\"]",
            "[\"a\", \"b\", \"c\", \"d\", \"e\"]",
        );
        let mut cfg: CliConfig = serde_yaml::from_str(&yaml).expect("parse");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_level_normalizes_to_default() {
        let yaml = BASIC_YAML.replace("\"debug\"", "\"\"");
        let mut cfg: CliConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.logging.tracing_level, "warn");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CliConfig::from_path("does/not/exist.yaml").expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.path(), Path::new("does/not/exist.yaml"));
    }
}
