//! Case lifecycle tests
//!
//! Create, edit, save, duplicate, delete, and the read-side queries.

use crate::*;

// =============================================================================
// CREATE / SAVE
// =============================================================================

#[test]
fn test_create_new_writes_file() {
    let (_dir, book) = open_temp();
    let file = book.create_new(None::<&str>).unwrap();

    assert!(file.path.is_file());
    assert_eq!(file.folder(), book.root());
    assert!(!file.case.id.is_empty());

    let loaded = book.load(&file.path).unwrap();
    assert_eq!(loaded.case.id, file.case.id);
}

#[test]
fn test_create_new_in_missing_folder_fails() {
    let (_dir, book) = open_temp();
    let err = book.create_new(Some("nowhere")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_save_trims_and_rejects_blank_name() {
    let (_dir, book) = open_temp();
    let mut file = book.create_new(None::<&str>).unwrap();

    file.case.name = "  Checkout  ".into();
    book.save(&mut file).unwrap();
    assert_eq!(book.load(&file.path).unwrap().case.name, "Checkout");

    file.case.name = "   ".into();
    let err = book.save(&mut file).unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(book.load(&file.path).unwrap().case.name, "Checkout");
}

#[test]
fn test_save_updates_timestamp() {
    let (_dir, book) = open_temp();
    let mut file = add_case(&book, None, "Timed", &[]);
    let created = file.case.created_at;

    file.case.set_field("priority", "High").unwrap();
    book.save(&mut file).unwrap();

    let loaded = book.load(&file.path).unwrap();
    assert_eq!(loaded.case.created_at, created);
    assert!(loaded.case.updated_at >= created);
    assert_eq!(loaded.case.priority, "High");
}

#[test]
fn test_stored_json_uses_camel_case_keys() {
    let (_dir, book) = open_temp();
    let mut file = add_case(&book, None, "Keys", &["Open"]);
    file.case.set_field("expected_result", "Done").unwrap();
    book.save(&mut file).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&file.path).unwrap()).unwrap();
    assert_eq!(raw["expectedResult"], "Done");
    assert!(raw["steps"][0]["expectedResult"].is_string());
    assert!(raw.get("expected_result").is_none());
}

// =============================================================================
// DUPLICATE / DELETE
// =============================================================================

#[test]
fn test_duplicate_gets_new_identity() {
    let (_dir, book) = open_temp();
    let original = add_case(&book, None, "Login", &["Open", "Submit"]);

    let copy = book.duplicate(&original).unwrap();
    assert_ne!(copy.case.id, original.case.id);
    assert_eq!(copy.case.name, "(copy) Login");
    assert_eq!(copy.case.steps.len(), 2);
    assert_eq!(copy.folder(), original.folder());
    assert!(copy.file_stem().starts_with(&format!("{}_copy_", original.file_stem())));

    let all = book.load_all().unwrap();
    assert_eq!(all.cases.len(), 2);
}

#[test]
fn test_delete_removes_file() {
    let (_dir, book) = open_temp();
    let file = add_case(&book, None, "Gone", &[]);
    book.delete(&file).unwrap();
    assert!(!file.path.exists());
    assert!(book.load(&file.path).unwrap_err().is_not_found());
}

// =============================================================================
// QUERIES
// =============================================================================

#[test]
fn test_load_all_reports_broken_files() {
    let (dir, book) = open_temp();
    add_case(&book, None, "Good", &[]);
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let report = book.load_all().unwrap();
    assert_eq!(report.cases.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("broken.json"));
}

#[test]
fn test_filter_and_distinct_values() {
    let (_dir, book) = open_temp();
    let mut a = add_case(&book, None, "Login ok", &[]);
    a.case.set_field("priority", "High").unwrap();
    a.case.set_field("tags", "smoke, auth").unwrap();
    book.save(&mut a).unwrap();
    let mut b = add_case(&book, None, "Logout", &[]);
    b.case.set_field("priority", "Low").unwrap();
    book.save(&mut b).unwrap();

    let high = book
        .filter(&CaseFilter::new().with_value(Field::Priority, "High"))
        .unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].case.name, "Login ok");

    let tagged = book
        .filter(&CaseFilter::new().with_value(Field::Tags, "auth"))
        .unwrap();
    assert_eq!(tagged.len(), 1);

    let by_name = book.filter(&CaseFilter::new().with_query("LOG")).unwrap();
    assert_eq!(by_name.len(), 2);

    assert_eq!(
        book.distinct_values(Field::Priority).unwrap(),
        vec!["High".to_string(), "Low".to_string()]
    );
}

#[test]
fn test_statistics_follow_step_statuses() {
    let (_dir, book) = open_temp();
    add_case(&book, None, "Pending", &["One"]);
    let mut passed = add_case(&book, None, "Passed", &["One"]);
    passed.case.steps[0].set_field("status", "passed").unwrap();
    book.save(&mut passed).unwrap();
    let mut failed = add_case(&book, None, "Failed", &["One", "Two"]);
    failed.case.steps[0].set_field("status", "passed").unwrap();
    failed.case.steps[1].set_field("status", "failed").unwrap();
    book.save(&mut failed).unwrap();

    let stats = book.statistics().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.passed, 1);
    assert_eq!(stats.failed, 1);
}

#[test]
fn test_run_status_workflow() {
    let (_dir, book) = open_temp();
    book.create_folder("", "auth").unwrap();
    let mut login = add_case(&book, Some("auth"), "Login", &["Submit"]);
    let mut logout = add_case(&book, None, "Logout", &[]);

    assert!(book.pass_all(&mut login).unwrap());
    assert_eq!(book.statistics().unwrap().passed, 1);

    logout.case.steps[0].set_field("status", "skipped").unwrap();
    logout.case.steps[0].set_field("skip_reason", "no session").unwrap();
    book.save(&mut logout).unwrap();

    let report = book.reset_all_statuses().unwrap();
    assert_eq!(report.succeeded, 2);
    let stats = book.statistics().unwrap();
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.passed, 0);
    let logout = book.load(&logout.path).unwrap();
    assert_eq!(logout.case.steps[0].status, StepStatus::Pending);
    assert!(logout.case.steps[0].skip_reason.is_empty());

    let mut login = book.load(&login.path).unwrap();
    book.pass_all(&mut login).unwrap();
    assert!(book.reset_statuses(&mut login).unwrap());
    assert_eq!(book.statistics().unwrap().pending, 2);
}

#[test]
fn test_summary_and_skeleton() {
    let (_dir, book) = open_temp();
    let mut file = add_case(&book, None, "Login works", &["Step 1"]);
    file.case.steps[0].set_field("description", "Open page").unwrap();
    file.case.steps[0].set_field("expected_result", "Form shown").unwrap();
    book.save(&mut file).unwrap();

    let summary = book.summary(&book.load(&file.path).unwrap().case);
    assert!(summary.starts_with("Name: Login works\n"));
    assert!(summary.ends_with("Steps:\n1. Open page → Form shown"));

    let skeleton = book.skeleton(&file.case);
    assert!(skeleton.contains("def test_"));
    assert!(skeleton.contains("allure.step"));
}
