//! One sheet per table, plus cross-sheet reference columns.
//!
//! Reference cells hold a `HYPERLINK` to the referenced row whose label is
//! the second column of the target sheet. Key columns are located by header
//! and every data row gets its own formula, so the ranges follow the data.

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::ExportError;
use crate::participation::AnnotatedSubmission;
use crate::source::ExportSource;
use crate::workbook::{Cell, FIRST_DATA_ROW, Sheet, Workbook};

pub const STUDENTS: &str = "Students";
pub const FAMILIES: &str = "Families";
pub const SURVEY_SUBMISSIONS: &str = "Survey_Submissions";
pub const CONTACTS: &str = "Contacts";
pub const BUSES: &str = "Buses";
pub const EMERGENCY_CONTACTS: &str = "Emergency_Contacts";

/// Sheet order of the exported workbook.
pub const SHEET_ORDER: [&str; 6] = [
    STUDENTS,
    FAMILIES,
    SURVEY_SUBMISSIONS,
    CONTACTS,
    BUSES,
    EMERGENCY_CONTACTS,
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build the workbook from stored rows and the annotated submission view.
pub fn build_workbook(
    source: &ExportSource,
    submissions: &[AnnotatedSubmission],
) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    workbook.append_sheet(students_sheet(source)?)?;
    workbook.append_sheet(families_sheet(source))?;
    workbook.append_sheet(submissions_sheet(submissions)?)?;
    workbook.append_sheet(contacts_sheet(source)?)?;
    workbook.append_sheet(buses_sheet(source))?;
    workbook.append_sheet(emergency_contacts_sheet(source)?)?;
    Ok(workbook)
}

/// `HYPERLINK` to the row of `target` whose first column equals `key_cell`.
pub fn reference_formula(target: &str, key_cell: &str) -> String {
    format!(
        "HYPERLINK(\"#{target}!A\" & MATCH({key_cell}, {target}!A:A, 0), \
         VLOOKUP({key_cell}, {target}!A:B, 2, FALSE))"
    )
}

/// Append `header` and fill it with references keyed by `key_header`.
/// Rows whose key is empty get an empty reference.
fn add_reference_column(
    sheet: &mut Sheet,
    header: &str,
    key_header: &str,
    target: &str,
) -> Result<(), ExportError> {
    let key_letter = sheet.column_letter_of(key_header)?;
    let key_col = sheet.column_index(key_header).unwrap_or_default();
    let col = sheet.add_column(header);

    for row in 0..sheet.len() {
        let has_key = sheet
            .cell(row, key_col)
            .is_some_and(|cell| !cell.is_empty());
        let cell = if has_key {
            let key_cell = format!("{key_letter}{}", row + FIRST_DATA_ROW);
            Cell::Formula(reference_formula(target, &key_cell))
        } else {
            Cell::Empty
        };
        sheet.set_cell(row, col, cell);
    }
    Ok(())
}

fn date(value: NaiveDate) -> Cell {
    Cell::Text(value.format(DATE_FORMAT).to_string())
}

fn datetime(value: NaiveDateTime) -> Cell {
    Cell::Text(value.format(DATETIME_FORMAT).to_string())
}

fn students_sheet(source: &ExportSource) -> Result<Sheet, ExportError> {
    let mut sheet = Sheet::new(
        STUDENTS,
        [
            "OSIS_Number",
            "First_Name",
            "Middle_Name",
            "Last_Name",
            "Date_of_Birth",
            "Gender",
            "Street_Address",
            "Apt",
            "City",
            "State",
            "Zip_Code",
            "Current_Grade",
            "Current_School",
            "Current_School_Address",
            "Home_Language",
            "Special_Education_Services",
            "Family_ID",
            "Takes_Bus",
            "Bus_ID",
            "Dismissal_Method",
            "Economically_Disadvantaged",
            "Ethnicity",
        ],
    );
    for student in &source.students {
        sheet.push_row(vec![
            Cell::text(&student.osis_number),
            Cell::text(&student.first_name),
            Cell::optional_text(student.middle_name.as_deref()),
            Cell::text(&student.last_name),
            date(student.date_of_birth),
            Cell::text(student.gender.as_str()),
            Cell::text(&student.street_address),
            Cell::optional_text(student.apt.as_deref()),
            Cell::text(&student.city),
            Cell::text(&student.state),
            Cell::text(&student.zip_code),
            Cell::Int(student.current_grade),
            Cell::text(&student.current_school),
            Cell::text(&student.current_school_address),
            Cell::text(student.home_language.as_str()),
            Cell::Bool(student.special_education_services),
            Cell::Int(student.family_id),
            Cell::Bool(student.takes_bus),
            student.bus_id.map(Cell::Int).unwrap_or(Cell::Empty),
            Cell::text(student.dismissal_method.as_str()),
            Cell::Bool(student.economically_disadvantaged),
            Cell::text(student.ethnicity.as_str()),
        ]);
    }
    add_reference_column(&mut sheet, "Family_Reference", "Family_ID", FAMILIES)?;
    add_reference_column(&mut sheet, "Bus_Reference", "Bus_ID", BUSES)?;
    Ok(sheet)
}

fn families_sheet(source: &ExportSource) -> Sheet {
    let mut sheet = Sheet::new(
        FAMILIES,
        [
            "Family_ID",
            "Primary_Contact_Name",
            "Primary_Contact_Phone",
            "Primary_Contact_Email",
            "Home_Language",
            "Address",
            "Secondary_Contact_Name",
            "Secondary_Contact_Phone",
            "Secondary_Contact_Email",
            "Relationship_to_Student",
        ],
    );
    for family in &source.families {
        sheet.push_row(vec![
            Cell::Int(family.family_id),
            Cell::text(&family.primary_contact_name),
            Cell::text(&family.primary_contact_phone),
            Cell::text(&family.primary_contact_email),
            Cell::text(family.home_language.as_str()),
            Cell::text(&family.address),
            Cell::text(&family.secondary_contact_name),
            Cell::text(&family.secondary_contact_phone),
            Cell::text(&family.secondary_contact_email),
            Cell::text(family.relationship_to_student.as_str()),
        ]);
    }
    sheet
}

fn submissions_sheet(submissions: &[AnnotatedSubmission]) -> Result<Sheet, ExportError> {
    let mut sheet = Sheet::new(
        SURVEY_SUBMISSIONS,
        [
            "Submission_ID",
            "OSIS_Number",
            "Submission_Status",
            "Submission_Date",
            "Follow_Up_Attempts",
            "Last_Contacted",
            "Follow_Up_Notes",
            "Family_ID",
        ],
    );
    for entry in submissions {
        let submission = &entry.row.submission;
        sheet.push_row(vec![
            Cell::Int(submission.submission_id),
            Cell::text(&submission.osis_number),
            Cell::Bool(submission.submission_status),
            submission.submission_date.map(datetime).unwrap_or(Cell::Empty),
            Cell::Int(submission.follow_up_attempts),
            submission.last_contacted.map(datetime).unwrap_or(Cell::Empty),
            Cell::optional_text(submission.follow_up_notes.as_deref()),
            entry.row.family_id.map(Cell::Int).unwrap_or(Cell::Empty),
        ]);
    }
    add_reference_column(&mut sheet, "Family_Reference", "Family_ID", FAMILIES)?;
    add_reference_column(&mut sheet, "Student_Reference", "OSIS_Number", STUDENTS)?;

    let rate_col = sheet.add_column("Participation_Rate");
    for (row, entry) in submissions.iter().enumerate() {
        sheet.set_cell(row, rate_col, Cell::Number(entry.participation_rate));
    }
    Ok(sheet)
}

fn contacts_sheet(source: &ExportSource) -> Result<Sheet, ExportError> {
    let mut sheet = Sheet::new(
        CONTACTS,
        [
            "Contact_ID",
            "Family_ID",
            "Contact_Date",
            "Contact_Method",
            "Contact_Notes",
        ],
    );
    for contact in &source.contacts {
        sheet.push_row(vec![
            Cell::Int(contact.contact_id),
            Cell::Int(contact.family_id),
            datetime(contact.contact_date),
            Cell::text(contact.contact_method.as_str()),
            Cell::text(&contact.contact_notes),
        ]);
    }
    add_reference_column(&mut sheet, "Family_Reference", "Family_ID", FAMILIES)?;
    Ok(sheet)
}

fn buses_sheet(source: &ExportSource) -> Sheet {
    let mut sheet = Sheet::new(BUSES, ["Bus_ID", "Bus_Number", "Route"]);
    for bus in &source.buses {
        sheet.push_row(vec![
            Cell::Int(bus.bus_id),
            Cell::text(&bus.bus_number),
            Cell::text(&bus.route),
        ]);
    }
    sheet
}

fn emergency_contacts_sheet(source: &ExportSource) -> Result<Sheet, ExportError> {
    let mut sheet = Sheet::new(
        EMERGENCY_CONTACTS,
        [
            "Contact_ID",
            "OSIS_Number",
            "Contact_Name",
            "Contact_Relation",
            "Contact_Phone",
        ],
    );
    for contact in &source.emergency_contacts {
        sheet.push_row(vec![
            Cell::Int(contact.contact_id),
            Cell::text(&contact.osis_number),
            Cell::text(&contact.contact_name),
            Cell::text(contact.contact_relation.as_str()),
            Cell::text(&contact.contact_phone),
        ]);
    }
    add_reference_column(&mut sheet, "Student_Reference", "OSIS_Number", STUDENTS)?;
    Ok(sheet)
}
