//! Configuration settings for the layout solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridConfig,
    pub solver: SolverConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Optional replacements for the computed grid dimensions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub columns: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub objects_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            solver: SolverConfig { timeout_seconds: 10 },
            input: InputConfig {
                objects_file: PathBuf::from("input/objects/salesforce.yaml"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output/layouts"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.timeout_seconds == 0 {
            anyhow::bail!("Solver timeout must be positive");
        }

        if self.grid.rows == Some(0) || self.grid.columns == Some(0) {
            anyhow::bail!("Grid overrides must be positive");
        }

        if !self.input.objects_file.exists() {
            anyhow::bail!("Objects file does not exist: {}", self.input.objects_file.display());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref objects_file) = cli_overrides.objects_file {
            self.input.objects_file = objects_file.clone();
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = timeout;
        }
        if let Some(rows) = cli_overrides.rows {
            self.grid.rows = Some(rows);
        }
        if let Some(columns) = cli_overrides.columns {
            self.grid.columns = Some(columns);
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub objects_file: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
    pub rows: Option<usize>,
    pub columns: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("default.yaml");

        let mut settings = Settings::default();
        settings.grid.rows = Some(8);
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.grid.rows, Some(8));
        assert_eq!(loaded.grid.columns, None);
        assert_eq!(loaded.solver.timeout_seconds, 10);
        assert_eq!(loaded.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_grid_overrides_are_optional_in_yaml() {
        let yaml = "
grid: {}
solver:
  timeout_seconds: 5
input:
  objects_file: objects.yaml
output:
  format: json
  output_directory: out
";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.grid.rows.is_none());
        assert_eq!(settings.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation() {
        let dir = tempdir().unwrap();
        let objects = dir.path().join("objects.yaml");
        std::fs::write(&objects, "- id: 0\n  name: Link\n").unwrap();

        let mut settings = Settings::default();
        assert!(settings.validate().is_err());

        settings.input.objects_file = objects;
        assert!(settings.validate().is_ok());

        settings.grid.columns = Some(0);
        assert!(settings.validate().is_err());

        settings.grid.columns = None;
        settings.solver.timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            objects_file: Some(PathBuf::from("other.yaml")),
            timeout_seconds: Some(30),
            rows: Some(8),
            columns: None,
            output_dir: None,
        });
        assert_eq!(settings.input.objects_file, PathBuf::from("other.yaml"));
        assert_eq!(settings.solver.timeout_seconds, 30);
        assert_eq!(settings.grid.rows, Some(8));
        assert_eq!(settings.grid.columns, None);
        assert_eq!(settings.output.output_directory, PathBuf::from("output/layouts"));
    }
}
