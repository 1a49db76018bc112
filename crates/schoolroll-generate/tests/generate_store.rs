use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use schoolroll_core::{HOMELESS_STREET, Language};
use schoolroll_generate::{DataGenerator, GenerateOptions, GenerationError};
use schoolroll_store::{SqliteStore, Store};

fn options(students: u64) -> GenerateOptions {
    GenerateOptions {
        students,
        reference_time: NaiveDate::from_ymd_opt(2024, 9, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid reference time"),
        ..GenerateOptions::default()
    }
}

async fn generate(options: GenerateOptions) -> SqliteStore {
    let store = SqliteStore::in_memory().await.expect("open store");
    DataGenerator::new(options)
        .run(&store)
        .await
        .expect("generation succeeds");
    store
}

#[tokio::test]
async fn hundred_students_realize_exact_quotas() {
    let store = SqliteStore::in_memory().await.expect("open store");
    let report = DataGenerator::new(options(100))
        .run(&store)
        .await
        .expect("generation succeeds");

    let students = store.students().await.expect("students");
    assert_eq!(students.len(), 100);
    assert_eq!(
        students.iter().filter(|s| s.special_education_services).count(),
        21
    );
    assert_eq!(
        students.iter().filter(|s| s.economically_disadvantaged).count(),
        90
    );
    assert_eq!(students.iter().filter(|s| s.is_homeless()).count(), 2);
    assert_eq!(
        students.iter().filter(|s| s.home_language.is_ell()).count(),
        25
    );

    assert_eq!(report.rows("students"), Some(100));
    assert_eq!(report.rows("families"), Some(50));
    assert_eq!(report.rows("buses"), Some(10));
    assert_eq!(report.rows("contacts"), Some(50));
    assert_eq!(report.rows("emergency_contacts"), Some(100));
    assert_eq!(report.axes.ell.realized, 25);
    assert_eq!(report.axes.special_education.realized, 21);
    assert_eq!(report.axes.homeless.target, 2);
    assert_eq!(report.axes.languages.values().sum::<u64>(), 100);
}

#[tokio::test]
async fn homeless_students_carry_sentinel_address() {
    let store = generate(options(100)).await;
    let students = store.students().await.expect("students");
    let homeless: Vec<_> = students.iter().filter(|s| s.is_homeless()).collect();
    assert_eq!(homeless.len(), 2);
    for student in homeless {
        assert_eq!(student.street_address, HOMELESS_STREET);
        assert!(student.city.is_empty());
        assert!(student.state.is_empty());
        assert!(student.zip_code.is_empty());
    }
    for student in students.iter().filter(|s| !s.is_homeless()) {
        assert_eq!(student.city, "New York");
        assert_eq!(student.state, "NY");
        assert!(!student.zip_code.is_empty());
    }
}

#[tokio::test]
async fn every_reference_points_at_an_existing_row() {
    let store = generate(options(60)).await;

    let families: HashSet<i64> = store
        .families()
        .await
        .expect("families")
        .iter()
        .map(|family| family.family_id)
        .collect();
    let buses: HashSet<i64> = store
        .buses()
        .await
        .expect("buses")
        .iter()
        .map(|bus| bus.bus_id)
        .collect();
    let students = store.students().await.expect("students");
    let osis: HashSet<&str> = students.iter().map(|s| s.osis_number.as_str()).collect();
    assert_eq!(osis.len(), students.len(), "osis numbers are unique");

    for student in &students {
        assert!(families.contains(&student.family_id));
        let bus_id = student.bus_id.expect("bus id always populated");
        assert!(buses.contains(&bus_id));
    }

    let submissions = store.submissions_with_family().await.expect("submissions");
    assert_eq!(submissions.len(), students.len());
    for row in &submissions {
        assert!(osis.contains(row.submission.osis_number.as_str()));
        assert!(row.family_id.is_some());
        assert!(row.submission.submission_date.is_some());
        assert!(row.submission.last_contacted.is_some());
    }

    for contact in store.emergency_contacts().await.expect("emergency contacts") {
        assert!(osis.contains(contact.osis_number.as_str()));
    }
    let contacts = store.contacts().await.expect("contacts");
    assert_eq!(contacts.len(), families.len());
    for contact in contacts {
        assert!(families.contains(&contact.family_id));
    }
}

#[tokio::test]
async fn bus_id_is_kept_for_students_who_do_not_ride() {
    let store = SqliteStore::in_memory().await.expect("open store");
    let report = DataGenerator::new(options(100))
        .run(&store)
        .await
        .expect("generation succeeds");
    let students = store.students().await.expect("students");
    let non_riders = students.iter().filter(|s| !s.takes_bus).count() as u64;
    assert!(non_riders > 0);
    assert_eq!(report.bus_ids_without_rider, non_riders);
}

#[tokio::test]
async fn report_serializes_axes_and_bus_anomalies() {
    let store = SqliteStore::in_memory().await.expect("open store");
    let report = DataGenerator::new(options(100))
        .run(&store)
        .await
        .expect("generation succeeds");

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["seed"], report.seed);
    assert_eq!(json["axes"]["ell"]["target"], 25);
    assert_eq!(json["axes"]["ell"]["realized"], 25);
    assert_eq!(json["axes"]["languages"]["Spanish"], 25);
    assert_eq!(json["bus_ids_without_rider"], report.bus_ids_without_rider);
    assert_eq!(json["tables"].as_array().map(Vec::len), Some(report.tables.len()));

    let decoded: schoolroll_generate::GenerationReport =
        serde_json::from_value(json).expect("decode report");
    assert_eq!(decoded.axes, report.axes);
    assert_eq!(decoded.tables, report.tables);
}

#[tokio::test]
async fn ell_students_patch_their_family_language() {
    let store = generate(options(100)).await;
    let students = store.students().await.expect("students");
    let families = store.families().await.expect("families");

    let mut languages_by_family: HashMap<i64, HashSet<Language>> = HashMap::new();
    for student in &students {
        languages_by_family
            .entry(student.family_id)
            .or_default()
            .insert(student.home_language);
    }

    let patched: Vec<_> = families
        .iter()
        .filter(|family| family.home_language != Language::English)
        .collect();
    assert!(!patched.is_empty());
    for family in patched {
        let seen = languages_by_family
            .get(&family.family_id)
            .expect("patched family has students");
        assert!(seen.contains(&family.home_language));
    }
    for student in students.iter().filter(|s| s.home_language.is_ell()) {
        let family = families
            .iter()
            .find(|family| family.family_id == student.family_id)
            .expect("family exists");
        assert!(family.home_language.is_ell());
    }
}

#[tokio::test]
async fn same_seed_and_reference_time_reproduce_the_dataset() {
    let first = generate(options(40)).await;
    let second = generate(options(40)).await;
    assert_eq!(
        first.students().await.expect("students"),
        second.students().await.expect("students")
    );
    assert_eq!(
        first.families().await.expect("families"),
        second.families().await.expect("families")
    );
    assert_eq!(
        first.submissions_with_family().await.expect("submissions"),
        second.submissions_with_family().await.expect("submissions")
    );

    let other = generate(GenerateOptions {
        seed: 7,
        ..options(40)
    })
    .await;
    assert_ne!(
        first.students().await.expect("students"),
        other.students().await.expect("students")
    );
}

#[tokio::test]
async fn rerun_starts_from_empty_tables() {
    let store = generate(options(10)).await;
    DataGenerator::new(options(6))
        .run(&store)
        .await
        .expect("second run");
    assert_eq!(store.students().await.expect("students").len(), 6);
    assert_eq!(store.families().await.expect("families").len(), 3);
    assert_eq!(store.buses().await.expect("buses").len(), 10);
}

#[tokio::test]
async fn zero_students_creates_only_buses() {
    let store = generate(options(0)).await;
    assert!(store.students().await.expect("students").is_empty());
    assert!(store.families().await.expect("families").is_empty());
    assert_eq!(store.buses().await.expect("buses").len(), 10);
}

#[tokio::test]
async fn invalid_options_are_rejected_before_any_write() {
    let store = generate(options(4)).await;

    let no_buses = GenerateOptions {
        buses: 0,
        ..options(10)
    };
    let err = DataGenerator::new(no_buses)
        .run(&store)
        .await
        .expect_err("buses are required");
    assert!(matches!(err, GenerationError::InvalidOptions(_)));

    let mut bad_targets = options(10);
    bad_targets.targets.homeless = 140.0;
    let err = DataGenerator::new(bad_targets)
        .run(&store)
        .await
        .expect_err("targets out of range");
    assert!(matches!(err, GenerationError::Targets(_)));

    assert_eq!(store.students().await.expect("students").len(), 4);
}
