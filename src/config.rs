//! TOML-based run configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Error;
use crate::records::context::TableId;
use crate::series::shaper::{ControlledPeaks, PeakShaper, RandomPeaks};
use crate::series::types::{DEFAULT_NUM_POINTS, SeriesParams, SeriesVariant};

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the `controlled` preset. Load from TOML
/// with [`AppConfig::from_toml_file`] or use [`AppConfig::controlled`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Series generation parameters.
    #[serde(default)]
    pub series: SeriesConfig,
    /// Record composition parameters.
    #[serde(default)]
    pub records: RecordsConfig,
}

/// Series generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeriesConfig {
    /// First sample date, `"YYYY-MM-DD"`.
    pub start_date: NaiveDate,
    /// Last sample date (inclusive), `"YYYY-MM-DD"`.
    pub end_date: NaiveDate,
    /// Capacity shared by every sample (must be > 0).
    pub max_quantity: u32,
    /// Number of samples.
    pub num_points: usize,
    /// Peak shaping: `"controlled"` or `"random_peaks"`.
    pub variant: String,
    /// Random seed; omitted means a fresh OS-seeded run.
    pub seed: Option<u64>,
    /// Output CSV path.
    pub output: String,
    /// ASCII chart width in characters.
    pub plot_width: usize,
    /// ASCII chart height in rows.
    pub plot_height: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 30).unwrap_or_default(),
            max_quantity: 100,
            num_points: DEFAULT_NUM_POINTS,
            variant: "controlled".to_string(),
            seed: None,
            output: "generated_graph_data.csv".to_string(),
            plot_width: 72,
            plot_height: 16,
        }
    }
}

/// Reference table file names, relative to [`RecordsConfig::data_dir`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceFiles {
    pub users: String,
    pub discovery: String,
    pub groups: String,
    pub license_servers: String,
    pub license_types: String,
}

impl Default for ReferenceFiles {
    fn default() -> Self {
        Self {
            users: "user.csv".to_string(),
            discovery: "discovery.csv".to_string(),
            groups: "group.csv".to_string(),
            license_servers: "license_server.csv".to_string(),
            license_types: "license_type.csv".to_string(),
        }
    }
}

impl ReferenceFiles {
    /// Configured file name for a table.
    pub fn file_name(&self, id: TableId) -> &str {
        match id {
            TableId::Users => &self.users,
            TableId::Discovery => &self.discovery,
            TableId::Groups => &self.groups,
            TableId::LicenseServers => &self.license_servers,
            TableId::LicenseTypes => &self.license_types,
        }
    }
}

/// Record composition parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordsConfig {
    /// Directory holding the reference tables.
    pub data_dir: String,
    /// Offset added to the 1-based record number in generated ids.
    pub id_offset: usize,
    /// Value of each record's `source` field.
    pub source: String,
    /// Value of the `sys_created_by`/`sys_updated_by` fields.
    pub created_by: String,
    /// Spaces per nesting level in the written XML; 0 writes one line.
    pub indent: usize,
    /// Random seed; omitted means a fresh OS-seeded run.
    pub seed: Option<u64>,
    /// Reference table file names.
    pub files: ReferenceFiles,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            id_offset: 100,
            source: "OpeniT".to_string(),
            created_by: "admin".to_string(),
            indent: 2,
            seed: None,
            files: ReferenceFiles::default(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"series.num_points"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

impl AppConfig {
    /// The default run: 100 daily-ish samples from 2024-11-01 to 2024-12-30,
    /// capacity 100, controlled peaks.
    pub fn controlled() -> Self {
        Self::default()
    }

    /// Same span and capacity with randomly placed peaks over a random walk.
    pub fn random_peaks() -> Self {
        Self {
            series: SeriesConfig {
                variant: "random_peaks".to_string(),
                ..SeriesConfig::default()
            },
            ..Self::default()
        }
    }

    /// 32 days at one sample per day, capacity 50. Shorter controlled runs
    /// clamp the second peak onto the first.
    pub fn short() -> Self {
        Self {
            series: SeriesConfig {
                start_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap_or_default(),
                end_date: NaiveDate::from_ymd_opt(2024, 12, 2).unwrap_or_default(),
                max_quantity: 50,
                num_points: 32,
                ..SeriesConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["controlled", "random_peaks", "short"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "controlled" => Ok(Self::controlled()),
            "random_peaks" => Ok(Self::random_peaks()),
            "short" => Ok(Self::short()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.series;

        if s.start_date >= s.end_date {
            errors.push(ConfigError::new("series.start_date", "must be before series.end_date"));
        }
        if s.max_quantity == 0 {
            errors.push(ConfigError::new("series.max_quantity", "must be > 0"));
        }
        match SeriesVariant::from_name(&s.variant) {
            Some(variant) => {
                let min = min_points(variant);
                if s.num_points < min {
                    errors.push(ConfigError::new(
                        "series.num_points",
                        format!("must be >= {min} for the {} variant", variant.name()),
                    ));
                }
            }
            None => errors.push(ConfigError::new(
                "series.variant",
                format!(
                    "must be one of {}, got \"{}\"",
                    SeriesVariant::NAMES.join(", "),
                    s.variant
                ),
            )),
        }
        if s.output.trim().is_empty() {
            errors.push(ConfigError::new("series.output", "must not be empty"));
        }

        let r = &self.records;
        if r.data_dir.trim().is_empty() {
            errors.push(ConfigError::new("records.data_dir", "must not be empty"));
        }
        for id in TableId::ALL {
            if r.files.file_name(id).trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("records.files.{}", id.name()),
                    "must not be empty",
                ));
            }
        }

        errors
    }

    /// Series parameters for the configured run.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the variant name is unknown.
    pub fn series_params(&self) -> Result<SeriesParams, ConfigError> {
        let s = &self.series;
        let variant = SeriesVariant::from_name(&s.variant).ok_or_else(|| {
            ConfigError::new("series.variant", format!("unknown variant \"{}\"", s.variant))
        })?;
        Ok(SeriesParams::new(s.start_date, s.end_date, s.max_quantity, s.num_points).with_variant(variant))
    }
}

fn min_points(variant: SeriesVariant) -> usize {
    match variant {
        SeriesVariant::Controlled => ControlledPeaks.min_points(),
        SeriesVariant::RandomPeaks => RandomPeaks.min_points(),
    }
}
