use chrono::{Duration, NaiveDate, NaiveDateTime};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, StreetName, ZipCode};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use schoolroll_core::{
    Bus, ContactMethod, DismissalMethod, Family, Gender, Language, NewBus, NewContact,
    NewEmergencyContact, NewFamily, NewSurveySubmission, Relationship, SchoolProfile, Student,
    HOMELESS_STREET,
};

use crate::address::{format_family_address, parse_family_address};
use crate::allocator::StudentDraws;
use crate::errors::GenerationError;
use crate::model::GenerateOptions;

const APARTMENTS: &[&str] = &["1A", "2B", "3C"];
const OSIS_MIN: u64 = 100_000_000;
const OSIS_MAX: u64 = 999_999_999;
const RECENT_WINDOW_SECONDS: i64 = 24 * 60 * 60;
const MAX_FOLLOW_UP_ATTEMPTS: i64 = 3;
const GRADES: std::ops::RangeInclusive<i64> = 1..=8;

/// Builds one record per call from a seeded random stream.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    rng: ChaCha8Rng,
    school: SchoolProfile,
    reference_time: NaiveDateTime,
    birth_date_start: NaiveDate,
    birth_date_end: NaiveDate,
}

impl EntityFactory {
    pub fn new(options: &GenerateOptions) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(options.seed),
            school: options.school.clone(),
            reference_time: options.reference_time,
            birth_date_start: options.birth_date_start,
            birth_date_end: options.birth_date_end,
        }
    }

    /// Random stream shared with the caller for draws outside the factory.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn bus(&self, index: u64) -> NewBus {
        NewBus {
            bus_number: format!("Bus-{}", index + 1),
            route: format!("Route-{}", index + 1),
        }
    }

    pub fn family(&mut self) -> NewFamily {
        let street = self.street_address();
        let zip: String = ZipCode().fake_with_rng(&mut self.rng);
        NewFamily {
            primary_contact_name: self.full_name(),
            primary_contact_phone: self.phone(),
            primary_contact_email: self.email(),
            home_language: Language::English,
            address: format_family_address(&street, &self.school.city, &self.school.state, &zip),
            secondary_contact_name: self.full_name(),
            secondary_contact_phone: self.phone(),
            secondary_contact_email: self.email(),
            relationship_to_student: self.pick(Relationship::ALL),
        }
    }

    pub fn osis_number(&mut self) -> String {
        self.rng.random_range(OSIS_MIN..=OSIS_MAX).to_string()
    }

    /// Synthesize a student of `family` classified by `draws`.
    ///
    /// Homeless students get the sentinel street and empty apt/city/state/zip;
    /// everyone else inherits the parts of the family address. The bus id is
    /// drawn from `buses` whether or not the student takes the bus.
    pub fn student(
        &mut self,
        osis_number: String,
        family: &Family,
        buses: &[Bus],
        draws: &StudentDraws,
    ) -> Result<Student, GenerationError> {
        if buses.is_empty() {
            return Err(GenerationError::InvalidOptions(
                "no buses to assign students to".to_string(),
            ));
        }

        let (street_address, apt, city, state, zip_code) = if draws.homeless {
            (
                HOMELESS_STREET.to_string(),
                Some(String::new()),
                String::new(),
                String::new(),
                String::new(),
            )
        } else {
            let parts = parse_family_address(&family.address)?;
            let apt = self.pick(APARTMENTS).to_string();
            (parts.street, Some(apt), parts.city, parts.state, parts.zip)
        };

        let first_name: String = FirstName().fake_with_rng(&mut self.rng);
        let middle_name: String = FirstName().fake_with_rng(&mut self.rng);
        let last_name: String = LastName().fake_with_rng(&mut self.rng);
        let date_of_birth = self.date_between(self.birth_date_start, self.birth_date_end);
        let gender = self.pick(Gender::ALL);
        let current_grade = self.rng.random_range(GRADES);
        let current_school_address = self.street_address();
        let takes_bus = self.rng.random_bool(0.5);
        let bus_id = buses[self.rng.random_range(0..buses.len())].bus_id;
        let dismissal_method = self.pick(DismissalMethod::ALL);

        Ok(Student {
            osis_number,
            first_name,
            middle_name: Some(middle_name),
            last_name,
            date_of_birth,
            gender,
            street_address,
            apt,
            city,
            state,
            zip_code,
            current_grade,
            current_school: self.school.name.clone(),
            current_school_address,
            home_language: draws.language,
            special_education_services: draws.special_education,
            family_id: family.family_id,
            takes_bus,
            bus_id: Some(bus_id),
            dismissal_method,
            economically_disadvantaged: draws.economically_disadvantaged,
            ethnicity: draws.ethnicity,
        })
    }

    /// Submission status, dates and follow-ups are drawn independently; both
    /// dates are filled even when nothing was submitted.
    pub fn submission(&mut self, osis_number: &str) -> NewSurveySubmission {
        NewSurveySubmission {
            osis_number: osis_number.to_string(),
            submission_status: self.rng.random_bool(0.5),
            submission_date: Some(self.recent()),
            follow_up_attempts: self.rng.random_range(0..=MAX_FOLLOW_UP_ATTEMPTS),
            last_contacted: Some(self.recent()),
            follow_up_notes: Some(self.sentence()),
        }
    }

    pub fn contact(&mut self, family_id: i64) -> NewContact {
        NewContact {
            family_id,
            contact_date: self.recent(),
            contact_method: self.pick(ContactMethod::ALL),
            contact_notes: self.sentence(),
        }
    }

    pub fn emergency_contact(&mut self, osis_number: &str) -> NewEmergencyContact {
        NewEmergencyContact {
            osis_number: osis_number.to_string(),
            contact_name: self.full_name(),
            contact_relation: self.pick(Relationship::ALL),
            contact_phone: self.phone(),
        }
    }

    /// Uniform pick; callers guarantee `values` is non-empty.
    fn pick<T: Copy>(&mut self, values: &[T]) -> T {
        values[self.rng.random_range(0..values.len())]
    }

    fn full_name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    fn phone(&mut self) -> String {
        PhoneNumber().fake_with_rng(&mut self.rng)
    }

    fn email(&mut self) -> String {
        SafeEmail().fake_with_rng(&mut self.rng)
    }

    fn sentence(&mut self) -> String {
        Sentence(3..10).fake_with_rng(&mut self.rng)
    }

    fn street_address(&mut self) -> String {
        let number: String = BuildingNumber().fake_with_rng(&mut self.rng);
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        format!("{number} {street}")
    }

    fn recent(&mut self) -> NaiveDateTime {
        let offset = self.rng.random_range(0..=RECENT_WINDOW_SECONDS);
        self.reference_time - Duration::seconds(offset)
    }

    fn date_between(&mut self, start: NaiveDate, end: NaiveDate) -> NaiveDate {
        let span = (end - start).num_days().max(0);
        start + Duration::days(self.rng.random_range(0..=span))
    }
}
