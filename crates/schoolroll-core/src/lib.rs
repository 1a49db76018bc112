//! Core contracts for schoolroll.
//!
//! This crate defines the school entity records, the categorical values they
//! carry, and the distribution targets shared by the generator, the store and
//! the exporter.

pub mod categories;
pub mod entities;
pub mod error;
pub mod targets;

pub use categories::{
    ContactMethod, DismissalMethod, Ethnicity, Gender, Language, Relationship,
};
pub use entities::{
    Bus, Contact, EmergencyContact, Family, NewBus, NewContact, NewEmergencyContact, NewFamily,
    NewSurveySubmission, Student, SurveySubmission,
};
pub use error::{Error, Result};
pub use targets::{DistributionTargets, EthnicityWeight, LanguageShare, SchoolProfile};

/// Sentinel street address for students without a fixed residence.
pub const HOMELESS_STREET: &str = "Homeless";
