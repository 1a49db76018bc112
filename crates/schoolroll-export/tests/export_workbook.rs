use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use schoolroll_core::{
    DismissalMethod, Ethnicity, Gender, Language, NewBus, NewFamily, NewSurveySubmission,
    Relationship, Student,
};
use schoolroll_export::sheets::{
    BUSES, CONTACTS, EMERGENCY_CONTACTS, FAMILIES, SHEET_ORDER, STUDENTS, SURVEY_SUBMISSIONS,
};
use schoolroll_export::{CsvWriter, OutputFormat, XlsxWriter, export};
use schoolroll_generate::{DataGenerator, GenerateOptions};
use schoolroll_store::{SqliteStore, Store};

fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("schoolroll-{label}-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("open csv");
    let headers = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (headers, rows)
}

fn column(headers: &[String], name: &str) -> usize {
    headers
        .iter()
        .position(|header| header == name)
        .unwrap_or_else(|| panic!("missing column {name}"))
}

async fn generated_store(students: u64) -> SqliteStore {
    let store = SqliteStore::in_memory().await.expect("open store");
    let options = GenerateOptions {
        students,
        ..GenerateOptions::default()
    };
    DataGenerator::new(options)
        .run(&store)
        .await
        .expect("generation succeeds");
    store
}

#[tokio::test]
async fn csv_export_has_every_sheet_with_references() {
    let store = generated_store(30).await;
    let dir = temp_dir("csv");
    let target = dir.join("SchoolData.xlsx");

    let report = export(&store, &CsvWriter::new(), &target)
        .await
        .expect("export succeeds");
    assert_eq!(report.format, OutputFormat::Csv);
    assert_eq!(report.files.len(), SHEET_ORDER.len());
    assert!(report.bytes_written.unwrap_or_default() > 0);
    assert_eq!(report.rows(STUDENTS), Some(30));
    assert_eq!(report.rows(FAMILIES), Some(15));
    assert_eq!(report.rows(SURVEY_SUBMISSIONS), Some(30));
    assert_eq!(report.rows(CONTACTS), Some(15));
    assert_eq!(report.rows(BUSES), Some(10));
    assert_eq!(report.rows(EMERGENCY_CONTACTS), Some(30));

    let out_dir = dir.join("SchoolData");
    let (headers, rows) = read_csv(&out_dir.join("Students.csv"));
    let family_ref = column(&headers, "Family_Reference");
    let bus_ref = column(&headers, "Bus_Reference");
    assert_eq!(family_ref, 22);
    assert_eq!(bus_ref, 23);
    assert_eq!(
        rows[0][family_ref],
        "=HYPERLINK(\"#Families!A\" & MATCH(Q2, Families!A:A, 0), \
         VLOOKUP(Q2, Families!A:B, 2, FALSE))"
    );
    assert_eq!(
        rows[29][bus_ref],
        "=HYPERLINK(\"#Buses!A\" & MATCH(S31, Buses!A:A, 0), \
         VLOOKUP(S31, Buses!A:B, 2, FALSE))"
    );

    let (headers, rows) = read_csv(&out_dir.join("Survey_Submissions.csv"));
    let student_ref = column(&headers, "Student_Reference");
    let family_ref = column(&headers, "Family_Reference");
    assert!(rows[4][student_ref].contains("MATCH(B6, Students!A:A, 0)"));
    assert!(rows[4][family_ref].contains("MATCH(H6, Families!A:A, 0)"));

    let (headers, rows) = read_csv(&out_dir.join("Contacts.csv"));
    assert_eq!(headers.last().map(String::as_str), Some("Family_Reference"));
    assert!(!headers.contains(&"Student_Reference".to_string()));
    assert!(rows[14][column(&headers, "Family_Reference")].contains("B16"));

    let (headers, rows) = read_csv(&out_dir.join("Emergency_Contacts.csv"));
    assert!(rows[0][column(&headers, "Student_Reference")].contains("#Students!A"));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn exported_submissions_follow_family_completion() {
    let store = generated_store(60).await;
    let dir = temp_dir("participation");
    let report = export(&store, &CsvWriter::new(), &dir.join("SchoolData.xlsx"))
        .await
        .expect("export succeeds");

    let (headers, rows) = read_csv(&dir.join("SchoolData").join("Survey_Submissions.csv"));
    let status = column(&headers, "Submission_Status");
    let family = column(&headers, "Family_ID");
    let rate = column(&headers, "Participation_Rate");

    let stored = store.submissions_with_family().await.expect("submissions");
    let completed: std::collections::HashSet<Option<i64>> = stored
        .iter()
        .filter(|row| row.submission.submission_status)
        .map(|row| row.family_id)
        .collect();

    let expected_rate = ((completed.len() as f64
        / report.participation.total_families as f64)
        * 100.0
        * 100.0)
        .round()
        / 100.0;
    assert_eq!(report.participation.completed_families, completed.len() as u64);
    assert_eq!(report.participation.rate, expected_rate);

    for row in &rows {
        let family_id: i64 = row[family].parse().expect("family id");
        if completed.contains(&Some(family_id)) {
            assert_eq!(row[status], "true");
        }
        let row_rate: f64 = row[rate].parse().expect("rate");
        assert_eq!(row_rate, report.participation.rate);
    }

    std::fs::remove_dir_all(&dir).ok();
}

fn student(osis: &str, family_id: i64, bus_id: i64) -> Student {
    Student {
        osis_number: osis.to_string(),
        first_name: "Sam".to_string(),
        middle_name: None,
        last_name: "Ortiz".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2009, 2, 3).expect("valid date"),
        gender: Gender::Male,
        street_address: "4 Oak Avenue".to_string(),
        apt: Some("1A".to_string()),
        city: "New York".to_string(),
        state: "NY".to_string(),
        zip_code: "10003".to_string(),
        current_grade: 6,
        current_school: "TEP".to_string(),
        current_school_address: "1 School Plaza".to_string(),
        home_language: Language::English,
        special_education_services: false,
        family_id,
        takes_bus: true,
        bus_id: Some(bus_id),
        dismissal_method: DismissalMethod::Bus,
        economically_disadvantaged: true,
        ethnicity: Ethnicity::HispanicOrLatino,
    }
}

#[tokio::test]
async fn sibling_submission_marks_whole_family_without_touching_the_store() {
    let store = SqliteStore::in_memory().await.expect("open store");
    let bus = store
        .create_bus(NewBus {
            bus_number: "Bus-1".to_string(),
            route: "Route-1".to_string(),
        })
        .await
        .expect("bus");
    let family = store
        .create_family(NewFamily {
            primary_contact_name: "Rosa Ortiz".to_string(),
            primary_contact_phone: "555-0110".to_string(),
            primary_contact_email: "rosa@example.com".to_string(),
            home_language: Language::English,
            address: "4 Oak Avenue, New York, NY 10003".to_string(),
            secondary_contact_name: "Dan Ortiz".to_string(),
            secondary_contact_phone: "555-0111".to_string(),
            secondary_contact_email: "dan@example.com".to_string(),
            relationship_to_student: Relationship::Mother,
        })
        .await
        .expect("family");
    for (osis, submitted) in [("200000001", true), ("200000002", false)] {
        store
            .create_student(student(osis, family.family_id, bus.bus_id))
            .await
            .expect("student");
        store
            .create_submission(NewSurveySubmission {
                osis_number: osis.to_string(),
                submission_status: submitted,
                submission_date: None,
                follow_up_attempts: 1,
                last_contacted: None,
                follow_up_notes: None,
            })
            .await
            .expect("submission");
    }

    let dir = temp_dir("siblings");
    let report = export(&store, &CsvWriter::new(), &dir.join("Roster.xlsx"))
        .await
        .expect("export succeeds");
    assert_eq!(report.participation.total_families, 1);
    assert_eq!(report.participation.rate, 100.0);

    let (headers, rows) = read_csv(&dir.join("Roster").join("Survey_Submissions.csv"));
    let status = column(&headers, "Submission_Status");
    let rate = column(&headers, "Participation_Rate");
    assert!(rows.iter().all(|row| row[status] == "true"));
    assert!(rows.iter().all(|row| row[rate] == "100"));

    let stored = store.submissions_with_family().await.expect("submissions");
    assert!(!stored[1].submission.submission_status);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn empty_store_exports_with_fallback_rate() {
    let store = SqliteStore::in_memory().await.expect("open store");
    let dir = temp_dir("empty");
    let report = export(&store, &CsvWriter::new(), &dir.join("SchoolData.xlsx"))
        .await
        .expect("export succeeds");
    assert_eq!(report.participation.total_families, 0);
    assert_eq!(report.participation.rate, 0.0);
    assert!(report.sheets.iter().all(|sheet| sheet.rows == 0));
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn xlsx_export_writes_a_single_archive() {
    let store = generated_store(20).await;
    let dir = temp_dir("xlsx");
    let target = dir.join("SchoolData.xlsx");

    let report = export(&store, &XlsxWriter::new(), &target)
        .await
        .expect("export succeeds");
    assert_eq!(report.format, OutputFormat::Xlsx);
    assert_eq!(report.files, vec![target.clone()]);

    let bytes = std::fs::read(&target).expect("read workbook");
    assert_eq!(Some(bytes.len() as u64), report.bytes_written);
    assert!(bytes.starts_with(b"PK"));

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["format"], "xlsx");
    assert_eq!(json["sheets"].as_array().map(Vec::len), Some(6));

    std::fs::remove_dir_all(&dir).ok();
}
