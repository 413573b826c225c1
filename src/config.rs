//! Configuration management for the prep scorer

use crate::error::{PrepScoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ontology: OntologyConfig,
    pub scoring: ScoringConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyConfig {
    /// Optional TOML ontology file. The built-in table is used when unset
    /// or when the file does not exist.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight applied to preferred skills in the skill-match aggregate.
    pub preferred_weight: f64,
    /// Default role hint; None derives the role from the job description.
    pub default_role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub enable_caching: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ontology: OntologyConfig { path: None },
            scoring: ScoringConfig {
                preferred_weight: 0.5,
                default_role: None,
            },
            processing: ProcessingConfig {
                enable_caching: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| PrepScoreError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| PrepScoreError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let w = self.scoring.preferred_weight;
        if !(w > 0.0 && w <= 1.0) {
            return Err(PrepScoreError::Config(format!(
                "scoring.preferred_weight must be in (0, 1], got {}",
                w
            )));
        }
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("prepscore")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.preferred_weight, 0.5);
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[ontology]

[scoring]
preferred_weight = 0.8

[processing]
enable_caching = false

[output]
format = "Json"
detailed = true
color_output = false
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.scoring.preferred_weight, 0.8);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.processing.enable_caching);
    }

    #[test]
    fn test_out_of_range_preferred_weight_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[ontology]

[scoring]
preferred_weight = 1.5

[processing]
enable_caching = true

[output]
format = "Console"
detailed = false
color_output = true
"#
        )
        .unwrap();

        assert!(matches!(
            Config::load_from(file.path()),
            Err(PrepScoreError::Config(_))
        ));
    }
}
