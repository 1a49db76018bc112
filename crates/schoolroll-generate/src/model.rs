use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use schoolroll_core::{DistributionTargets, Ethnicity, Language, SchoolProfile};

use crate::allocator::{ClassificationAxes, StudentDraws};
use crate::errors::GenerationError;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Number of students; families are half of this, rounded up.
    pub students: u64,
    pub buses: u64,
    /// Seed for every random draw of the run.
    pub seed: u64,
    pub targets: DistributionTargets,
    pub school: SchoolProfile,
    /// "Recent" dates fall within the day before this instant.
    pub reference_time: NaiveDateTime,
    pub birth_date_start: NaiveDate,
    pub birth_date_end: NaiveDate,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            students: 100,
            buses: 10,
            seed: 42,
            targets: DistributionTargets::default(),
            school: SchoolProfile::default(),
            reference_time: chrono::Utc::now().naive_utc(),
            birth_date_start: NaiveDate::from_ymd_opt(2005, 1, 1).unwrap_or_default(),
            birth_date_end: NaiveDate::from_ymd_opt(2012, 12, 31).unwrap_or_default(),
        }
    }
}

impl GenerateOptions {
    pub fn families(&self) -> u64 {
        self.students.div_ceil(2)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        self.targets.validate()?;
        self.school.validate()?;
        if self.students > 0 && self.buses == 0 {
            return Err(GenerationError::InvalidOptions(
                "at least one bus is required to assign students".to_string(),
            ));
        }
        if self.birth_date_start > self.birth_date_end {
            return Err(GenerationError::InvalidOptions(
                "birth_date_start must be <= birth_date_end".to_string(),
            ));
        }
        Ok(())
    }
}

/// Row count of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableReport {
    pub table: String,
    pub rows: u64,
}

/// Budgeted versus realized count for an exact-quota axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AxisCount {
    pub target: u64,
    pub realized: u64,
}

/// Realized classification counts for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AxisReport {
    pub ell: AxisCount,
    pub special_education: AxisCount,
    pub economically_disadvantaged: AxisCount,
    pub homeless: AxisCount,
    pub languages: BTreeMap<Language, u64>,
    pub ethnicity: BTreeMap<Ethnicity, u64>,
}

impl AxisReport {
    pub fn from_axes(axes: &ClassificationAxes) -> Self {
        Self {
            ell: AxisCount {
                target: axes.language.target_total(),
                realized: 0,
            },
            special_education: AxisCount {
                target: axes.special_education.target_total(),
                realized: 0,
            },
            economically_disadvantaged: AxisCount {
                target: axes.economically_disadvantaged.target_total(),
                realized: 0,
            },
            homeless: AxisCount {
                target: axes.homeless.target_total(),
                realized: 0,
            },
            languages: BTreeMap::new(),
            ethnicity: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, draws: &StudentDraws) {
        *self.languages.entry(draws.language).or_insert(0) += 1;
        *self.ethnicity.entry(draws.ethnicity).or_insert(0) += 1;
        if draws.language.is_ell() {
            self.ell.realized += 1;
        }
        if draws.special_education {
            self.special_education.realized += 1;
        }
        if draws.economically_disadvantaged {
            self.economically_disadvantaged.realized += 1;
        }
        if draws.homeless {
            self.homeless.realized += 1;
        }
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub axes: AxisReport,
    /// Students whose `takes_bus` is false but who still carry a bus id.
    pub bus_ids_without_rider: u64,
    pub osis_redraws: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tables: Vec::new(),
            axes: AxisReport::default(),
            bus_ids_without_rider: 0,
            osis_redraws: 0,
            duration_ms: 0,
        }
    }

    pub fn record_table(&mut self, table: &str, rows: u64) {
        self.tables.push(TableReport {
            table: table.to_string(),
            rows,
        });
    }

    pub fn rows(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|report| report.table == table)
            .map(|report| report.rows)
    }
}
