use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::{ExportOptions, ValidationMode};

/// Name of the workspace configuration file.
pub const CONFIG_FILE_NAME: &str = "hexam.toml";

/// Configuration of an exam workspace.
///
/// Directory settings are relative to the workspace root unless they are
/// absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Where exam files are kept.
    exams_dir: PathBuf,

    /// Where exports are written.
    ///
    /// Each export gets its own timestamped subdirectory.
    export_dir: PathBuf,

    /// The Hydro user ID written as `owner` in `problem.yaml`.
    owner: i64,

    /// Whether export validation uses the strict letter range check and
    /// reports 1-based problem numbers.
    pub strict_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exams_dir: default_exams_dir(),
            export_dir: default_export_dir(),
            owner: default_owner(),
            strict_validation: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration from the workspace `root`, falling back to the
    /// defaults if there is no usable config file.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE_NAME);
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config from {}: {e}", path.display());
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// The exams directory for the workspace at `root`.
    #[must_use]
    pub fn exams_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.exams_dir)
    }

    /// The export directory for the workspace at `root`.
    #[must_use]
    pub fn export_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.export_dir)
    }

    /// The Hydro owner ID for exported problems.
    #[must_use]
    pub const fn owner(&self) -> i64 {
        self.owner
    }

    /// The validation mode selected by this configuration.
    #[must_use]
    pub const fn validation_mode(&self) -> ValidationMode {
        if self.strict_validation {
            ValidationMode::Strict
        } else {
            ValidationMode::Literal
        }
    }

    /// Export options for the workspace at `root`.
    #[must_use]
    pub fn export_options(&self, root: &Path) -> ExportOptions {
        ExportOptions {
            export_root: self.export_dir(root),
            owner: self.owner,
            mode: self.validation_mode(),
        }
    }
}

fn default_exams_dir() -> PathBuf {
    PathBuf::from("exams")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("export")
}

const fn default_owner() -> i64 {
    1
}

/// Errors that can occur when reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    /// The config file could not be written.
    #[error("failed to write config file: {0}")]
    Write(#[source] std::io::Error),
    /// The config file is not valid.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_exams_dir")]
        exams_dir: PathBuf,

        #[serde(default = "default_export_dir")]
        export_dir: PathBuf,

        /// The Hydro user ID that owns exported problems.
        #[serde(default = "default_owner")]
        owner: i64,

        #[serde(default)]
        strict_validation: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                exams_dir,
                export_dir,
                owner,
                strict_validation,
            } => Self {
                exams_dir,
                export_dir,
                owner,
                strict_validation,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            exams_dir: config.exams_dir,
            export_dir: config.export_dir,
            owner: config.owner,
            strict_validation: config.strict_validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nexams_dir = \"papers\"\nexport_dir = \"out\"\nowner = 42\nstrict_validation = true\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        let root = Path::new("/workspace");
        assert_eq!(config.exams_dir(root), root.join("papers"));
        assert_eq!(config.export_dir(root), root.join("out"));
        assert_eq!(config.owner(), 42);
        assert_eq!(config.validation_mode(), ValidationMode::Strict);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read(_)));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nowner = \"one\"\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.validation_mode(), ValidationMode::Literal);
    }

    #[test]
    fn missing_config_falls_back_to_default() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_or_default(tmp.path()), Config::default());
    }

    #[test]
    fn saved_config_can_be_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        let config = Config {
            owner: 7,
            ..Config::default()
        };

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
