use schoolroll_core::{
    Bus, Contact, ContactMethod, DismissalMethod, EmergencyContact, Ethnicity, Family, Gender,
    Language, Relationship, Student, SurveySubmission,
};

use crate::error::StoreResult;
use crate::store::SubmissionWithFamily;

use super::queries::{
    RawBus, RawContact, RawEmergencyContact, RawFamily, RawStudent, RawSubmission,
};

pub fn map_buses(raw: Vec<RawBus>) -> Vec<Bus> {
    raw.into_iter()
        .map(|bus| Bus {
            bus_id: bus.bus_id,
            bus_number: bus.bus_number,
            route: bus.route,
        })
        .collect()
}

pub fn map_families(raw: Vec<RawFamily>) -> StoreResult<Vec<Family>> {
    raw.into_iter()
        .map(|family| {
            Ok(Family {
                family_id: family.family_id,
                primary_contact_name: family.primary_contact_name,
                primary_contact_phone: family.primary_contact_phone,
                primary_contact_email: family.primary_contact_email,
                home_language: Language::parse(&family.home_language)?,
                address: family.address,
                secondary_contact_name: family.secondary_contact_name,
                secondary_contact_phone: family.secondary_contact_phone,
                secondary_contact_email: family.secondary_contact_email,
                relationship_to_student: Relationship::parse(&family.relationship_to_student)?,
            })
        })
        .collect()
}

pub fn map_students(raw: Vec<RawStudent>) -> StoreResult<Vec<Student>> {
    raw.into_iter()
        .map(|student| {
            Ok(Student {
                osis_number: student.osis_number,
                first_name: student.first_name,
                middle_name: student.middle_name,
                last_name: student.last_name,
                date_of_birth: student.date_of_birth,
                gender: Gender::parse(&student.gender)?,
                street_address: student.street_address,
                apt: student.apt,
                city: student.city,
                state: student.state,
                zip_code: student.zip_code,
                current_grade: student.current_grade,
                current_school: student.current_school,
                current_school_address: student.current_school_address,
                home_language: Language::parse(&student.home_language)?,
                special_education_services: student.special_education_services,
                family_id: student.family_id,
                takes_bus: student.takes_bus,
                bus_id: student.bus_id,
                dismissal_method: DismissalMethod::parse(&student.dismissal_method)?,
                economically_disadvantaged: student.economically_disadvantaged,
                ethnicity: Ethnicity::parse(&student.ethnicity)?,
            })
        })
        .collect()
}

pub fn map_submissions(raw: Vec<RawSubmission>) -> Vec<SubmissionWithFamily> {
    raw.into_iter()
        .map(|row| SubmissionWithFamily {
            family_id: row.family_id,
            submission: SurveySubmission {
                submission_id: row.submission_id,
                osis_number: row.osis_number,
                submission_status: row.submission_status,
                submission_date: row.submission_date,
                follow_up_attempts: row.follow_up_attempts,
                last_contacted: row.last_contacted,
                follow_up_notes: row.follow_up_notes,
            },
        })
        .collect()
}

pub fn map_contacts(raw: Vec<RawContact>) -> StoreResult<Vec<Contact>> {
    raw.into_iter()
        .map(|contact| {
            Ok(Contact {
                contact_id: contact.contact_id,
                family_id: contact.family_id,
                contact_date: contact.contact_date,
                contact_method: ContactMethod::parse(&contact.contact_method)?,
                contact_notes: contact.contact_notes,
            })
        })
        .collect()
}

pub fn map_emergency_contacts(raw: Vec<RawEmergencyContact>) -> StoreResult<Vec<EmergencyContact>> {
    raw.into_iter()
        .map(|contact| {
            Ok(EmergencyContact {
                contact_id: contact.contact_id,
                osis_number: contact.osis_number,
                contact_name: contact.contact_name,
                contact_relation: Relationship::parse(&contact.contact_relation)?,
                contact_phone: contact.contact_phone,
            })
        })
        .collect()
}
