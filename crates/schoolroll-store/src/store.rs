use async_trait::async_trait;

use schoolroll_core::{
    Bus, Contact, EmergencyContact, Family, Language, NewBus, NewContact, NewEmergencyContact,
    NewFamily, NewSurveySubmission, Student, SurveySubmission,
};

use crate::error::StoreResult;

/// A submission joined to the `family_id` of the student it belongs to.
///
/// `family_id` is `None` only when the submission's student is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionWithFamily {
    pub submission: SurveySubmission,
    pub family_id: Option<i64>,
}

/// Persistence interface consumed by the generator and the exporter.
///
/// Every call completes before the next one is issued; implementations do not
/// need to support concurrent writers.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the engine identifier (e.g. `sqlite`).
    fn engine(&self) -> &'static str;

    /// Drop and recreate every table, leaving the store empty.
    async fn reset(&self) -> StoreResult<()>;

    async fn create_bus(&self, bus: NewBus) -> StoreResult<Bus>;

    async fn create_family(&self, family: NewFamily) -> StoreResult<Family>;

    /// Patch the home language of an existing family.
    async fn update_family_language(&self, family_id: i64, language: Language)
    -> StoreResult<()>;

    async fn create_student(&self, student: Student) -> StoreResult<Student>;

    async fn create_submission(
        &self,
        submission: NewSurveySubmission,
    ) -> StoreResult<SurveySubmission>;

    async fn create_contact(&self, contact: NewContact) -> StoreResult<Contact>;

    async fn create_emergency_contact(
        &self,
        contact: NewEmergencyContact,
    ) -> StoreResult<EmergencyContact>;

    async fn buses(&self) -> StoreResult<Vec<Bus>>;

    async fn families(&self) -> StoreResult<Vec<Family>>;

    async fn students(&self) -> StoreResult<Vec<Student>>;

    /// All submissions in creation order, each joined to its student's family.
    async fn submissions_with_family(&self) -> StoreResult<Vec<SubmissionWithFamily>>;

    async fn contacts(&self) -> StoreResult<Vec<Contact>>;

    async fn emergency_contacts(&self) -> StoreResult<Vec<EmergencyContact>>;
}
