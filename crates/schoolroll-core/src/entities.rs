use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::categories::{
    ContactMethod, DismissalMethod, Ethnicity, Gender, Language, Relationship,
};

/// Bus fields supplied at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBus {
    pub bus_number: String,
    pub route: String,
}

/// A stored bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub bus_id: i64,
    pub bus_number: String,
    pub route: String,
}

/// Household fields supplied at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFamily {
    pub primary_contact_name: String,
    pub primary_contact_phone: String,
    pub primary_contact_email: String,
    pub home_language: Language,
    /// Composite mailing address: `"<street>, <city>, <state> <zip>"`.
    pub address: String,
    pub secondary_contact_name: String,
    pub secondary_contact_phone: String,
    pub secondary_contact_email: String,
    pub relationship_to_student: Relationship,
}

/// A stored household. `home_language` is patched in the store when a
/// member is identified as an English-language learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub family_id: i64,
    pub primary_contact_name: String,
    pub primary_contact_phone: String,
    pub primary_contact_email: String,
    pub home_language: Language,
    pub address: String,
    pub secondary_contact_name: String,
    pub secondary_contact_phone: String,
    pub secondary_contact_email: String,
    pub relationship_to_student: Relationship,
}

impl Family {
    pub fn from_new(family_id: i64, family: NewFamily) -> Self {
        Self {
            family_id,
            primary_contact_name: family.primary_contact_name,
            primary_contact_phone: family.primary_contact_phone,
            primary_contact_email: family.primary_contact_email,
            home_language: family.home_language,
            address: family.address,
            secondary_contact_name: family.secondary_contact_name,
            secondary_contact_phone: family.secondary_contact_phone,
            secondary_contact_email: family.secondary_contact_email,
            relationship_to_student: family.relationship_to_student,
        }
    }
}

/// A student keyed by its 9-digit OSIS number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub osis_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub street_address: String,
    pub apt: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub current_grade: i64,
    pub current_school: String,
    pub current_school_address: String,
    pub home_language: Language,
    pub special_education_services: bool,
    pub family_id: i64,
    pub takes_bus: bool,
    /// Populated for every generated student, including those with
    /// `takes_bus == false`.
    pub bus_id: Option<i64>,
    pub dismissal_method: DismissalMethod,
    pub economically_disadvantaged: bool,
    pub ethnicity: Ethnicity,
}

impl Student {
    pub fn is_homeless(&self) -> bool {
        self.street_address == crate::HOMELESS_STREET
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSurveySubmission {
    pub osis_number: String,
    pub submission_status: bool,
    pub submission_date: Option<NaiveDateTime>,
    pub follow_up_attempts: i64,
    pub last_contacted: Option<NaiveDateTime>,
    pub follow_up_notes: Option<String>,
}

/// One survey submission per student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySubmission {
    pub submission_id: i64,
    pub osis_number: String,
    pub submission_status: bool,
    pub submission_date: Option<NaiveDateTime>,
    pub follow_up_attempts: i64,
    pub last_contacted: Option<NaiveDateTime>,
    pub follow_up_notes: Option<String>,
}

impl SurveySubmission {
    pub fn from_new(submission_id: i64, submission: NewSurveySubmission) -> Self {
        Self {
            submission_id,
            osis_number: submission.osis_number,
            submission_status: submission.submission_status,
            submission_date: submission.submission_date,
            follow_up_attempts: submission.follow_up_attempts,
            last_contacted: submission.last_contacted,
            follow_up_notes: submission.follow_up_notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContact {
    pub family_id: i64,
    pub contact_date: NaiveDateTime,
    pub contact_method: ContactMethod,
    pub contact_notes: String,
}

/// Family contact log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub contact_id: i64,
    pub family_id: i64,
    pub contact_date: NaiveDateTime,
    pub contact_method: ContactMethod,
    pub contact_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmergencyContact {
    pub osis_number: String,
    pub contact_name: String,
    pub contact_relation: Relationship,
    pub contact_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub contact_id: i64,
    pub osis_number: String,
    pub contact_name: String,
    pub contact_relation: Relationship,
    pub contact_phone: String,
}
