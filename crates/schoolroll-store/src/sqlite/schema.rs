//! DDL for the generated dataset. Parents precede children so that
//! foreign keys always resolve at creation time.

pub const DROP_STATEMENTS: &str = r#"
drop table if exists emergency_contacts;
drop table if exists contacts;
drop table if exists survey_submissions;
drop table if exists students;
drop table if exists families;
drop table if exists buses;
"#;

pub const CREATE_STATEMENTS: &str = r#"
create table buses (
  bus_id integer primary key autoincrement,
  bus_number text not null,
  route text not null
);

create table families (
  family_id integer primary key autoincrement,
  primary_contact_name text not null,
  primary_contact_phone text not null,
  primary_contact_email text not null,
  home_language text not null,
  address text not null,
  secondary_contact_name text not null,
  secondary_contact_phone text not null,
  secondary_contact_email text not null,
  relationship_to_student text not null
);

create table students (
  osis_number varchar(9) primary key not null,
  first_name text not null,
  middle_name text,
  last_name text not null,
  date_of_birth date not null,
  gender text not null,
  street_address text not null,
  apt text,
  city text not null,
  state text not null,
  zip_code text not null,
  current_grade integer not null,
  current_school text not null,
  current_school_address text not null,
  home_language text not null,
  special_education_services boolean not null,
  family_id integer not null references families (family_id),
  takes_bus boolean not null,
  bus_id integer references buses (bus_id),
  dismissal_method text not null,
  economically_disadvantaged boolean not null,
  ethnicity text not null
);

create table survey_submissions (
  submission_id integer primary key autoincrement,
  osis_number varchar(9) not null references students (osis_number),
  submission_status boolean not null,
  submission_date datetime,
  follow_up_attempts integer not null check (follow_up_attempts >= 0),
  last_contacted datetime,
  follow_up_notes text
);

create table contacts (
  contact_id integer primary key autoincrement,
  family_id integer not null references families (family_id),
  contact_date datetime not null,
  contact_method text not null,
  contact_notes text not null
);

create table emergency_contacts (
  contact_id integer primary key autoincrement,
  osis_number varchar(9) not null references students (osis_number),
  contact_name text not null,
  contact_relation text not null,
  contact_phone text not null
);
"#;

/// Split a script into individual statements, skipping blanks.
pub fn statements(script: &str) -> impl Iterator<Item = &str> {
    script
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
}
