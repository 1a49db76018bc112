use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use schoolroll_core::{
    Bus, Contact, EmergencyContact, Family, Language, NewBus, NewContact, NewEmergencyContact,
    NewFamily, NewSurveySubmission, Student, SurveySubmission,
};

use crate::error::{StoreError, StoreResult};
use crate::options::StoreOptions;
use crate::store::{Store, SubmissionWithFamily};

mod mapper;
mod queries;
mod schema;

/// Store backed by a single-connection SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store using a pre-configured pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database described by `options`.
    pub async fn open(options: &StoreOptions) -> StoreResult<Self> {
        let connect = match &options.path {
            Some(path) => file_options(path),
            None => SqliteConnectOptions::new().in_memory(true),
        }
        .foreign_keys(true);

        // One long-lived connection: writes are sequential and an in-memory
        // database only lives as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect)
            .await?;

        let store = Self::new(pool);
        if options.reset {
            store.reset().await?;
        }
        Ok(store)
    }

    /// Open a fresh in-memory store with empty tables.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::open(&StoreOptions::in_memory()).await
    }
}

fn file_options(path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    fn engine(&self) -> &'static str {
        "sqlite"
    }

    async fn reset(&self) -> StoreResult<()> {
        queries::run_script(&self.pool, schema::DROP_STATEMENTS).await?;
        queries::run_script(&self.pool, schema::CREATE_STATEMENTS).await?;
        debug!(engine = "sqlite", "tables recreated");
        Ok(())
    }

    async fn create_bus(&self, bus: NewBus) -> StoreResult<Bus> {
        let bus_id = queries::insert_bus(&self.pool, &bus).await?;
        Ok(Bus {
            bus_id,
            bus_number: bus.bus_number,
            route: bus.route,
        })
    }

    async fn create_family(&self, family: NewFamily) -> StoreResult<Family> {
        let family_id = queries::insert_family(&self.pool, &family).await?;
        Ok(Family::from_new(family_id, family))
    }

    async fn update_family_language(
        &self,
        family_id: i64,
        language: Language,
    ) -> StoreResult<()> {
        let touched = queries::update_family_language(&self.pool, family_id, language).await?;
        if touched == 0 {
            return Err(StoreError::NotFound {
                table: "families",
                id: family_id.to_string(),
            });
        }
        Ok(())
    }

    async fn create_student(&self, student: Student) -> StoreResult<Student> {
        queries::insert_student(&self.pool, &student).await?;
        Ok(student)
    }

    async fn create_submission(
        &self,
        submission: NewSurveySubmission,
    ) -> StoreResult<SurveySubmission> {
        let submission_id = queries::insert_submission(&self.pool, &submission).await?;
        Ok(SurveySubmission::from_new(submission_id, submission))
    }

    async fn create_contact(&self, contact: NewContact) -> StoreResult<Contact> {
        let contact_id = queries::insert_contact(&self.pool, &contact).await?;
        Ok(Contact {
            contact_id,
            family_id: contact.family_id,
            contact_date: contact.contact_date,
            contact_method: contact.contact_method,
            contact_notes: contact.contact_notes,
        })
    }

    async fn create_emergency_contact(
        &self,
        contact: NewEmergencyContact,
    ) -> StoreResult<EmergencyContact> {
        let contact_id = queries::insert_emergency_contact(&self.pool, &contact).await?;
        Ok(EmergencyContact {
            contact_id,
            osis_number: contact.osis_number,
            contact_name: contact.contact_name,
            contact_relation: contact.contact_relation,
            contact_phone: contact.contact_phone,
        })
    }

    async fn buses(&self) -> StoreResult<Vec<Bus>> {
        Ok(mapper::map_buses(queries::list_buses(&self.pool).await?))
    }

    async fn families(&self) -> StoreResult<Vec<Family>> {
        mapper::map_families(queries::list_families(&self.pool).await?)
    }

    async fn students(&self) -> StoreResult<Vec<Student>> {
        mapper::map_students(queries::list_students(&self.pool).await?)
    }

    async fn submissions_with_family(&self) -> StoreResult<Vec<SubmissionWithFamily>> {
        Ok(mapper::map_submissions(
            queries::list_submissions_with_family(&self.pool).await?,
        ))
    }

    async fn contacts(&self) -> StoreResult<Vec<Contact>> {
        mapper::map_contacts(queries::list_contacts(&self.pool).await?)
    }

    async fn emergency_contacts(&self) -> StoreResult<Vec<EmergencyContact>> {
        mapper::map_emergency_contacts(queries::list_emergency_contacts(&self.pool).await?)
    }
}
