use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use schoolroll_core::{DistributionTargets, SchoolProfile};
use schoolroll_generate::GenerateOptions;

use super::atomic::write_bytes_atomic;
use super::{ConfigError, ConfigResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationSettings {
    pub students: u64,
    pub buses: u64,
    pub seed: u64,
}

impl Default for PopulationSettings {
    fn default() -> Self {
        let options = GenerateOptions::default();
        Self {
            students: options.students,
            buses: options.buses,
            seed: options.seed,
        }
    }
}

/// Settings file layout: `[population]`, `[rates]` and `[school]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub population: PopulationSettings,
    pub rates: DistributionTargets,
    pub school: SchoolProfile,
}

impl Settings {
    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, students: Option<u64>, buses: Option<u64>, seed: Option<u64>) {
        if let Some(students) = students {
            self.population.students = students;
        }
        if let Some(buses) = buses {
            self.population.buses = buses;
        }
        if let Some(seed) = seed {
            self.population.seed = seed;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.rates
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        self.school
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.population.students > 0 && self.population.buses == 0 {
            return Err(ConfigError::Invalid(
                "population.buses must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn generate_options(&self, reference_time: NaiveDateTime) -> GenerateOptions {
        GenerateOptions {
            students: self.population.students,
            buses: self.population.buses,
            seed: self.population.seed,
            targets: self.rates.clone(),
            school: self.school.clone(),
            reference_time,
            ..GenerateOptions::default()
        }
    }
}

/// Defaults when no file is given, otherwise the parsed file.
pub fn load_settings(path: Option<&Path>) -> ConfigResult<Settings> {
    match path {
        Some(path) => load_or_create_settings(path),
        None => Ok(Settings::default()),
    }
}

/// Parse `path`, or write the defaults there when it does not exist yet.
pub fn load_or_create_settings(path: &Path) -> ConfigResult<Settings> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = Settings::default();
    save_settings(path, &settings)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> ConfigResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(path, encoded.as_bytes())
}
