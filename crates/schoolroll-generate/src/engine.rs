use std::collections::HashSet;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use schoolroll_core::{Bus, Family};
use schoolroll_store::Store;

use crate::allocator::ClassificationAxes;
use crate::errors::GenerationError;
use crate::factory::EntityFactory;
use crate::model::{AxisReport, GenerateOptions, GenerationReport};

/// Entry point for populating a store with a synthetic school.
#[derive(Debug, Clone)]
pub struct DataGenerator {
    options: GenerateOptions,
}

impl DataGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Rebuild `store` from empty and fill every table.
    ///
    /// Stages run strictly in order and every store call is awaited before
    /// the next one is issued. The first store error aborts the run; nothing
    /// written before it is rolled back.
    pub async fn run(&self, store: &dyn Store) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();
        self.options.validate()?;

        let options = &self.options;
        let mut report = GenerationReport::new(options.seed);
        let mut factory = EntityFactory::new(options);

        info!(
            engine = store.engine(),
            students = options.students,
            families = options.families(),
            buses = options.buses,
            seed = options.seed,
            "generation started"
        );

        store.reset().await?;

        let buses = self.create_buses(store, &factory).await?;
        report.record_table("buses", buses.len() as u64);

        let families = self.create_families(store, &mut factory).await?;
        report.record_table("families", families.len() as u64);

        let mut axes = ClassificationAxes::new(options.students, &options.targets)?;
        report.axes = AxisReport::from_axes(&axes);
        info!(
            ell = report.axes.ell.target,
            special_education = report.axes.special_education.target,
            economically_disadvantaged = report.axes.economically_disadvantaged.target,
            homeless = report.axes.homeless.target,
            "quotas allocated"
        );

        let mut osis_numbers: Vec<String> = Vec::with_capacity(options.students as usize);
        let mut seen: HashSet<String> = HashSet::with_capacity(options.students as usize);
        for _ in 0..options.students {
            let family_idx = factory.rng().random_range(0..families.len());
            let family = &families[family_idx];

            let draws = axes.draw(factory.rng());
            if draws.language.is_ell() {
                store
                    .update_family_language(family.family_id, draws.language)
                    .await?;
                debug!(
                    family_id = family.family_id,
                    language = %draws.language,
                    "family language updated"
                );
            }

            let mut osis = factory.osis_number();
            while seen.contains(&osis) {
                report.osis_redraws += 1;
                osis = factory.osis_number();
            }
            seen.insert(osis.clone());

            let student = factory.student(osis, family, &buses, &draws)?;
            if !student.takes_bus && student.bus_id.is_some() {
                report.bus_ids_without_rider += 1;
            }
            let student = store.create_student(student).await?;
            report.axes.record(&draws);
            debug!(
                osis_number = %student.osis_number,
                family_id = student.family_id,
                homeless = draws.homeless,
                "student created"
            );

            let submission = store
                .create_submission(factory.submission(&student.osis_number))
                .await?;
            debug!(
                submission_id = submission.submission_id,
                submitted = submission.submission_status,
                "submission created"
            );
            osis_numbers.push(student.osis_number);
        }
        report.record_table("students", osis_numbers.len() as u64);
        report.record_table("survey_submissions", osis_numbers.len() as u64);

        if report.bus_ids_without_rider > 0 {
            warn!(
                students = report.bus_ids_without_rider,
                "students assigned a bus id while not taking the bus"
            );
        }
        if report.osis_redraws > 0 {
            info!(redraws = report.osis_redraws, "osis numbers redrawn on collision");
        }

        for osis in &osis_numbers {
            let contact = store
                .create_emergency_contact(factory.emergency_contact(osis))
                .await?;
            debug!(contact_id = contact.contact_id, osis_number = %osis, "emergency contact created");
        }
        report.record_table("emergency_contacts", osis_numbers.len() as u64);

        for family in &families {
            let contact = store.create_contact(factory.contact(family.family_id)).await?;
            debug!(contact_id = contact.contact_id, family_id = family.family_id, "contact created");
        }
        report.record_table("contacts", families.len() as u64);

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            students = osis_numbers.len(),
            families = families.len(),
            ell = report.axes.ell.realized,
            special_education = report.axes.special_education.realized,
            economically_disadvantaged = report.axes.economically_disadvantaged.realized,
            homeless = report.axes.homeless.realized,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(report)
    }

    async fn create_buses(
        &self,
        store: &dyn Store,
        factory: &EntityFactory,
    ) -> Result<Vec<Bus>, GenerationError> {
        let mut buses = Vec::with_capacity(self.options.buses as usize);
        for index in 0..self.options.buses {
            let bus = store.create_bus(factory.bus(index)).await?;
            debug!(bus_id = bus.bus_id, "bus created");
            buses.push(bus);
        }
        info!(rows = buses.len(), "buses created");
        Ok(buses)
    }

    async fn create_families(
        &self,
        store: &dyn Store,
        factory: &mut EntityFactory,
    ) -> Result<Vec<Family>, GenerationError> {
        let count = self.options.families();
        let mut families = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let family = store.create_family(factory.family()).await?;
            debug!(family_id = family.family_id, "family created");
            families.push(family);
        }
        info!(rows = families.len(), "families created");
        Ok(families)
    }
}
