use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

use schoolroll_core::{
    Language, NewBus, NewContact, NewEmergencyContact, NewFamily, NewSurveySubmission, Student,
};

use crate::error::StoreResult;

use super::schema;

pub async fn run_script(pool: &SqlitePool, script: &str) -> StoreResult<()> {
    for statement in schema::statements(script) {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

pub async fn insert_bus(pool: &SqlitePool, bus: &NewBus) -> StoreResult<i64> {
    let result = sqlx::query("insert into buses (bus_number, route) values (?, ?)")
        .bind(&bus.bus_number)
        .bind(&bus.route)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_family(pool: &SqlitePool, family: &NewFamily) -> StoreResult<i64> {
    let result = sqlx::query(
        r#"
        insert into families (
          primary_contact_name, primary_contact_phone, primary_contact_email,
          home_language, address,
          secondary_contact_name, secondary_contact_phone, secondary_contact_email,
          relationship_to_student
        ) values (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&family.primary_contact_name)
    .bind(&family.primary_contact_phone)
    .bind(&family.primary_contact_email)
    .bind(family.home_language.as_str())
    .bind(&family.address)
    .bind(&family.secondary_contact_name)
    .bind(&family.secondary_contact_phone)
    .bind(&family.secondary_contact_email)
    .bind(family.relationship_to_student.as_str())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Returns the number of rows touched.
pub async fn update_family_language(
    pool: &SqlitePool,
    family_id: i64,
    language: Language,
) -> StoreResult<u64> {
    let result = sqlx::query("update families set home_language = ? where family_id = ?")
        .bind(language.as_str())
        .bind(family_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_student(pool: &SqlitePool, student: &Student) -> StoreResult<()> {
    sqlx::query(
        r#"
        insert into students (
          osis_number, first_name, middle_name, last_name, date_of_birth, gender,
          street_address, apt, city, state, zip_code,
          current_grade, current_school, current_school_address, home_language,
          special_education_services, family_id, takes_bus, bus_id, dismissal_method,
          economically_disadvantaged, ethnicity
        ) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&student.osis_number)
    .bind(&student.first_name)
    .bind(&student.middle_name)
    .bind(&student.last_name)
    .bind(student.date_of_birth)
    .bind(student.gender.as_str())
    .bind(&student.street_address)
    .bind(&student.apt)
    .bind(&student.city)
    .bind(&student.state)
    .bind(&student.zip_code)
    .bind(student.current_grade)
    .bind(&student.current_school)
    .bind(&student.current_school_address)
    .bind(student.home_language.as_str())
    .bind(student.special_education_services)
    .bind(student.family_id)
    .bind(student.takes_bus)
    .bind(student.bus_id)
    .bind(student.dismissal_method.as_str())
    .bind(student.economically_disadvantaged)
    .bind(student.ethnicity.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_submission(
    pool: &SqlitePool,
    submission: &NewSurveySubmission,
) -> StoreResult<i64> {
    let result = sqlx::query(
        r#"
        insert into survey_submissions (
          osis_number, submission_status, submission_date,
          follow_up_attempts, last_contacted, follow_up_notes
        ) values (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&submission.osis_number)
    .bind(submission.submission_status)
    .bind(submission.submission_date)
    .bind(submission.follow_up_attempts)
    .bind(submission.last_contacted)
    .bind(&submission.follow_up_notes)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_contact(pool: &SqlitePool, contact: &NewContact) -> StoreResult<i64> {
    let result = sqlx::query(
        r#"
        insert into contacts (family_id, contact_date, contact_method, contact_notes)
        values (?, ?, ?, ?)
        "#,
    )
    .bind(contact.family_id)
    .bind(contact.contact_date)
    .bind(contact.contact_method.as_str())
    .bind(&contact.contact_notes)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_emergency_contact(
    pool: &SqlitePool,
    contact: &NewEmergencyContact,
) -> StoreResult<i64> {
    let result = sqlx::query(
        r#"
        insert into emergency_contacts (osis_number, contact_name, contact_relation, contact_phone)
        values (?, ?, ?, ?)
        "#,
    )
    .bind(&contact.osis_number)
    .bind(&contact.contact_name)
    .bind(contact.contact_relation.as_str())
    .bind(&contact.contact_phone)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawBus {
    pub bus_id: i64,
    pub bus_number: String,
    pub route: String,
}

pub async fn list_buses(pool: &SqlitePool) -> StoreResult<Vec<RawBus>> {
    let rows = sqlx::query_as::<_, RawBus>(
        "select bus_id, bus_number, route from buses order by bus_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawFamily {
    pub family_id: i64,
    pub primary_contact_name: String,
    pub primary_contact_phone: String,
    pub primary_contact_email: String,
    pub home_language: String,
    pub address: String,
    pub secondary_contact_name: String,
    pub secondary_contact_phone: String,
    pub secondary_contact_email: String,
    pub relationship_to_student: String,
}

pub async fn list_families(pool: &SqlitePool) -> StoreResult<Vec<RawFamily>> {
    let rows = sqlx::query_as::<_, RawFamily>(
        r#"
        select
          family_id, primary_contact_name, primary_contact_phone, primary_contact_email,
          home_language, address,
          secondary_contact_name, secondary_contact_phone, secondary_contact_email,
          relationship_to_student
        from families
        order by family_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawStudent {
    pub osis_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub street_address: String,
    pub apt: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub current_grade: i64,
    pub current_school: String,
    pub current_school_address: String,
    pub home_language: String,
    pub special_education_services: bool,
    pub family_id: i64,
    pub takes_bus: bool,
    pub bus_id: Option<i64>,
    pub dismissal_method: String,
    pub economically_disadvantaged: bool,
    pub ethnicity: String,
}

pub async fn list_students(pool: &SqlitePool) -> StoreResult<Vec<RawStudent>> {
    let rows = sqlx::query_as::<_, RawStudent>(
        r#"
        select
          osis_number, first_name, middle_name, last_name, date_of_birth, gender,
          street_address, apt, city, state, zip_code,
          current_grade, current_school, current_school_address, home_language,
          special_education_services, family_id, takes_bus, bus_id, dismissal_method,
          economically_disadvantaged, ethnicity
        from students
        order by rowid
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawSubmission {
    pub submission_id: i64,
    pub osis_number: String,
    pub submission_status: bool,
    pub submission_date: Option<NaiveDateTime>,
    pub follow_up_attempts: i64,
    pub last_contacted: Option<NaiveDateTime>,
    pub follow_up_notes: Option<String>,
    pub family_id: Option<i64>,
}

pub async fn list_submissions_with_family(pool: &SqlitePool) -> StoreResult<Vec<RawSubmission>> {
    let rows = sqlx::query_as::<_, RawSubmission>(
        r#"
        select
          s.submission_id, s.osis_number, s.submission_status, s.submission_date,
          s.follow_up_attempts, s.last_contacted, s.follow_up_notes,
          st.family_id as family_id
        from survey_submissions s
        left join students st on st.osis_number = s.osis_number
        order by s.submission_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawContact {
    pub contact_id: i64,
    pub family_id: i64,
    pub contact_date: NaiveDateTime,
    pub contact_method: String,
    pub contact_notes: String,
}

pub async fn list_contacts(pool: &SqlitePool) -> StoreResult<Vec<RawContact>> {
    let rows = sqlx::query_as::<_, RawContact>(
        r#"
        select contact_id, family_id, contact_date, contact_method, contact_notes
        from contacts
        order by contact_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawEmergencyContact {
    pub contact_id: i64,
    pub osis_number: String,
    pub contact_name: String,
    pub contact_relation: String,
    pub contact_phone: String,
}

pub async fn list_emergency_contacts(pool: &SqlitePool) -> StoreResult<Vec<RawEmergencyContact>> {
    let rows = sqlx::query_as::<_, RawEmergencyContact>(
        r#"
        select contact_id, osis_number, contact_name, contact_relation, contact_phone
        from emergency_contacts
        order by contact_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
