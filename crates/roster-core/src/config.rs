//! Configuration parsing and validation
//!
//! This module handles loading and validating the Roster project file.
//!
//! # Configuration File
//!
//! `roster.yaml` at the project root names the source file, the sink the
//! normalized documents are loaded into, the reference date for ages, and
//! how record-level errors are handled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::connectors::SinkConfig;
use crate::error::{Error, Result};
use crate::transform::default_reference_date;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "roster.yaml";

/// Root project configuration from `roster.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Date ages are computed against
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,

    /// Source file settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Where normalized documents are loaded
    #[serde(default)]
    pub sink: SinkConfig,

    /// Runtime configuration
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Record-level error handling
    #[serde(default)]
    pub error_handling: ErrorHandlingConfig,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Source file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the delimited personnel file
    #[serde(default = "default_source_path")]
    pub path: String,

    /// Field delimiter (a single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_source_path() -> String {
    "/data/member-data.txt".to_string()
}

fn default_delimiter() -> String {
    "|".to_string()
}

impl SourceConfig {
    /// The delimiter as a single byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(Error::ConfigInvalid {
                message: format!(
                    "source delimiter must be a single ASCII character, got '{}'",
                    self.delimiter
                ),
            }),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuntimeConfig {
    /// Runtime mode: local or remote
    #[serde(default)]
    pub mode: RuntimeMode,

    /// Local runtime settings
    #[serde(default)]
    pub local: LocalConfig,
}

/// Runtime mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Local mode with embedded PostgreSQL
    #[default]
    Local,
    /// Remote mode connecting to the configured sink URL
    Remote,
}

/// Local runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Directory for local data (embedded Postgres)
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Port for embedded PostgreSQL
    #[serde(default = "default_pg_port")]
    pub port: u16,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            port: default_pg_port(),
        }
    }
}

fn default_data_dir() -> String {
    ".roster/data".to_string()
}

fn default_pg_port() -> u16 {
    5433 // Avoid conflict with system Postgres on 5432
}

/// What to do when a record cannot be transformed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OnErrorBehavior {
    /// Abort the whole run on the first bad record
    #[default]
    StopOnError,
    /// Log the bad record and continue with the rest
    LogAndSkip,
}

/// Error handling configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorHandlingConfig {
    /// Behavior on a record-level error
    #[serde(default)]
    pub on_error: OnErrorBehavior,
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the project directory or roster.yaml file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-project")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;

        let config = Self { project, base_path };
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot express as types
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "project name must not be empty".to_string(),
            });
        }

        self.project.source.delimiter_byte()?;

        if let SinkConfig::Postgres(pg) = &self.project.sink {
            for (what, value) in [("database", &pg.database), ("collection", &pg.collection)] {
                if !is_identifier(value) {
                    return Err(Error::ConfigInvalid {
                        message: format!(
                            "sink {what} '{value}' must start with a letter or underscore and contain only letters, digits, and underscores"
                        ),
                    });
                }
            }
        }

        if self.project.runtime.mode == RuntimeMode::Remote {
            if let SinkConfig::Postgres(pg) = &self.project.sink {
                if pg.url.is_none() {
                    return Err(Error::ConfigInvalid {
                        message: "remote mode requires sink.url".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Source file path, resolved against the project directory
    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.project.source.path)
    }

    /// Sink configuration with file paths resolved against the project directory
    pub fn sink(&self) -> SinkConfig {
        match &self.project.sink {
            SinkConfig::File(file) => {
                let mut file = file.clone();
                file.path = self.resolve(&file.path).display().to_string();
                SinkConfig::File(file)
            }
            other => other.clone(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::PostgresSinkConfig;
    use tempfile::TempDir;

    fn project_with(yaml: &str) -> (TempDir, Result<Config>) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), yaml).unwrap();
        let config = Config::load(dir.path());
        (dir, config)
    }

    #[test]
    fn test_default_runtime_mode() {
        let mode = RuntimeMode::default();
        assert_eq!(mode, RuntimeMode::Local);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: test-project
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "test-project");
        assert_eq!(config.version, "0.1.0");
        assert_eq!(
            config.reference_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(config.source.path, "/data/member-data.txt");
        assert_eq!(config.source.delimiter, "|");
        assert_eq!(config.error_handling.on_error, OnErrorBehavior::StopOnError);
        match config.sink {
            SinkConfig::Postgres(pg) => {
                assert_eq!(pg.database, "etl_db");
                assert_eq!(pg.collection, "employees");
                assert!(pg.url.is_none());
            }
            _ => panic!("Expected postgres sink"),
        }
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: test-project
version: "1.0.0"
reference_date: 2025-07-15
source:
  path: ./data/members.txt
  delimiter: ","
sink:
  type: postgres
  url: "postgres://etl:etl@db_service:5432"
  database: staff
  collection: members
runtime:
  mode: remote
  local:
    data_dir: ".data"
    port: 5434
error_handling:
  on_error: log_and_skip
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, "1.0.0");
        assert_eq!(
            config.reference_date,
            NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()
        );
        assert_eq!(config.source.delimiter_byte().unwrap(), b',');
        assert_eq!(config.runtime.mode, RuntimeMode::Remote);
        assert_eq!(config.runtime.local.port, 5434);
        assert_eq!(config.error_handling.on_error, OnErrorBehavior::LogAndSkip);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let (dir, config) = project_with(
            "name: t\nsource:\n  path: data/in.txt\nsink:\n  type: file\n  path: out/docs.jsonl\n",
        );
        let config = config.unwrap();
        assert_eq!(config.source_path(), dir.path().join("data/in.txt"));
        match config.sink() {
            SinkConfig::File(f) => {
                assert_eq!(
                    f.path,
                    dir.path().join("out/docs.jsonl").display().to_string()
                );
            }
            _ => panic!("Expected file sink"),
        }
    }

    #[test]
    fn test_load_keeps_absolute_source_path() {
        let (_dir, config) = project_with("name: t\n");
        assert_eq!(
            config.unwrap().source_path(),
            PathBuf::from("/data/member-data.txt")
        );
    }

    #[test]
    fn test_validate_rejects_bad_delimiter() {
        let (_dir, config) = project_with("name: t\nsource:\n  delimiter: \"||\"\n");
        assert!(matches!(config, Err(Error::ConfigInvalid { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_collection() {
        let (_dir, config) =
            project_with("name: t\nsink:\n  type: postgres\n  collection: \"drop table\"\n");
        let err = config.unwrap_err();
        assert!(err.to_string().contains("collection"));
    }

    #[test]
    fn test_validate_remote_requires_url() {
        let (_dir, config) = project_with("name: t\nruntime:\n  mode: remote\n");
        assert!(matches!(config, Err(Error::ConfigInvalid { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let config = Config {
            project: serde_yaml::from_str("name: \"  \"\n").unwrap(),
            base_path: PathBuf::from("."),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("employees"));
        assert!(is_identifier("_staff_2024"));
        assert!(!is_identifier("2024_staff"));
        assert!(!is_identifier("staff;drop"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_default_sink_is_postgres() {
        let sink = SinkConfig::default();
        assert!(matches!(
            sink,
            SinkConfig::Postgres(PostgresSinkConfig { ref database, .. }) if database == "etl_db"
        ));
    }
}
