use serde::{Deserialize, Serialize};

use crate::categories::{Ethnicity, Language};
use crate::error::{Error, Result};

/// Share of the ELL population speaking a given language, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: Language,
    pub percentage: f64,
}

/// Relative weight of an ethnicity in the sampling pool, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthnicityWeight {
    pub ethnicity: Ethnicity,
    pub percentage: f64,
}

/// Target rates for every classification axis drawn per student.
///
/// All rates are percentages of the student population, except
/// `ell_languages`, whose shares are percentages of the ELL population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionTargets {
    pub ell: f64,
    /// Priority order matters: quotas are drawn down front to back.
    pub ell_languages: Vec<LanguageShare>,
    pub special_education: f64,
    pub economically_disadvantaged: f64,
    pub homeless: f64,
    pub ethnicity: Vec<EthnicityWeight>,
}

impl Default for DistributionTargets {
    fn default() -> Self {
        Self {
            ell: 25.0,
            ell_languages: vec![
                LanguageShare {
                    language: Language::Spanish,
                    percentage: 98.0,
                },
                LanguageShare {
                    language: Language::Arabic,
                    percentage: 1.0,
                },
                LanguageShare {
                    language: Language::Russian,
                    percentage: 1.0,
                },
            ],
            special_education: 21.3,
            economically_disadvantaged: 90.1,
            homeless: 2.0,
            ethnicity: vec![
                EthnicityWeight {
                    ethnicity: Ethnicity::HispanicOrLatino,
                    percentage: 94.0,
                },
                EthnicityWeight {
                    ethnicity: Ethnicity::BlackOrAfricanAmerican,
                    percentage: 3.0,
                },
                EthnicityWeight {
                    ethnicity: Ethnicity::White,
                    percentage: 1.0,
                },
                EthnicityWeight {
                    ethnicity: Ethnicity::AsianOrPacificIslander,
                    percentage: 1.0,
                },
                EthnicityWeight {
                    ethnicity: Ethnicity::Multiracial,
                    percentage: 1.0,
                },
            ],
        }
    }
}

impl DistributionTargets {
    /// Check that every rate is a percentage and the categorical mixes are usable.
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("ell", self.ell),
            ("special_education", self.special_education),
            ("economically_disadvantaged", self.economically_disadvantaged),
            ("homeless", self.homeless),
        ];
        for (name, rate) in rates {
            check_percentage(name, rate)?;
        }

        let mut share_total = 0.0;
        for share in &self.ell_languages {
            check_percentage("ell_languages", share.percentage)?;
            if !share.language.is_ell() {
                return Err(Error::InvalidTargets(format!(
                    "ell_languages must not list {}",
                    share.language
                )));
            }
            share_total += share.percentage;
        }
        if share_total > 100.0 + f64::EPSILON {
            return Err(Error::InvalidTargets(format!(
                "ell_languages shares sum to {share_total}, above 100"
            )));
        }

        if self.ethnicity.is_empty() {
            return Err(Error::InvalidTargets(
                "ethnicity mix must not be empty".to_string(),
            ));
        }
        for weight in &self.ethnicity {
            check_percentage("ethnicity", weight.percentage)?;
        }
        if self.ethnicity.iter().all(|weight| weight.percentage.round() < 1.0) {
            return Err(Error::InvalidTargets(
                "ethnicity mix needs at least one weight of 1 or more".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_percentage(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidTargets(format!(
            "{name} must be between 0 and 100, got {value}"
        )))
    }
}

/// School-wide constants stamped onto generated records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolProfile {
    pub name: String,
    /// City used in every family mailing address.
    pub city: String,
    /// State abbreviation used in every family mailing address.
    pub state: String,
}

impl Default for SchoolProfile {
    fn default() -> Self {
        Self {
            name: "TEP".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
        }
    }
}

impl SchoolProfile {
    /// Reject values that would make the composite family address unparsable.
    pub fn validate(&self) -> Result<()> {
        if self.city.trim().is_empty() || self.city.contains(',') {
            return Err(Error::InvalidTargets(format!(
                "school city '{}' must be non-empty and free of commas",
                self.city
            )));
        }
        if self.state.trim().is_empty() || self.state.contains([',', ' ']) {
            return Err(Error::InvalidTargets(format!(
                "school state '{}' must be a single token",
                self.state
            )));
        }
        Ok(())
    }
}
