use tracing::debug;

use schoolroll_core::{Bus, Contact, EmergencyContact, Family, Student};
use schoolroll_store::{Store, SubmissionWithFamily};

use crate::errors::ExportError;

/// Every table read back from the store, in creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSource {
    pub students: Vec<Student>,
    pub families: Vec<Family>,
    pub submissions: Vec<SubmissionWithFamily>,
    pub contacts: Vec<Contact>,
    pub buses: Vec<Bus>,
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl ExportSource {
    pub async fn load(store: &dyn Store) -> Result<Self, ExportError> {
        let source = Self {
            students: store.students().await?,
            families: store.families().await?,
            submissions: store.submissions_with_family().await?,
            contacts: store.contacts().await?,
            buses: store.buses().await?,
            emergency_contacts: store.emergency_contacts().await?,
        };
        debug!(
            students = source.students.len(),
            families = source.families.len(),
            submissions = source.submissions.len(),
            "export source loaded"
        );
        Ok(source)
    }
}
