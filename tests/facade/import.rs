//! Azure DevOps import tests

use crate::*;

const EXPORT: &str = r#"{
  "count": 2,
  "value": [
    {
      "project": {"id": "p1", "name": "Shop"},
      "testPlan": {"id": 10, "name": "Release"},
      "testSuite": {"id": 11, "name": "Auth"},
      "workItem": {
        "id": 4711,
        "name": "Login: happy path",
        "workItemFields": [
          {"Microsoft.VSTS.TCM.Steps": "<steps><step id=\"2\" type=\"ActionStep\"><parameterizedString>&lt;P&gt;Open the page&lt;/P&gt;</parameterizedString><parameterizedString>Form is shown</parameterizedString></step></steps>"},
          {"System.State": "Ready"}
        ]
      }
    },
    {
      "workItem": {"id": 4712, "name": "Logout",},
    },
  ],
}"#;

fn write_export(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_import_creates_cases_under_import_folder() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let export = write_export(src.path(), "sprint.json", EXPORT);

    let report = book.import_azure(&export);
    assert_eq!(report.created, 2);
    assert!(report.errors.is_empty());

    let folder = dir.path().join("from alm").join("sprint");
    let login = book.load(folder.join("Login_happy_path.json")).unwrap();
    assert_eq!(login.case.id, "4711");
    assert_eq!(login.case.status, "Ready");
    assert!(login.case.description.contains("Project: Shop"));
    assert_eq!(login.case.steps.len(), 1);
    assert!(login.case.steps[0].description.contains("Open the page"));

    let all = book.load_all().unwrap();
    assert_eq!(all.cases.len(), 2);
}

#[test]
fn test_reimport_does_not_overwrite() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let export = write_export(src.path(), "sprint.json", EXPORT);

    book.import_azure(&export);
    let report = book.import_azure(&export);
    assert_eq!(report.created, 2);
    assert!(dir
        .path()
        .join("from alm/sprint/Login_happy_path_1.json")
        .is_file());
    assert_eq!(book.load_all().unwrap().cases.len(), 4);
}

#[test]
fn test_import_failures_are_reported() {
    let (_dir, book) = open_temp();
    let src = TempDir::new().unwrap();

    let empty = write_export(src.path(), "empty.json", r#"{"value": []}"#);
    let report = book.import_azure(&empty);
    assert_eq!(report.created, 0);
    assert_eq!(report.errors, vec!["empty.json: no test cases found".to_string()]);

    let broken = write_export(src.path(), "broken.json", "{ nope");
    let report = book.import_azure(&broken);
    assert_eq!(report.created, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("broken.json: "));

    let report = book.import_azure(src.path().join("missing.json"));
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn test_import_uses_configured_folder_and_author() {
    let dir = TempDir::new().unwrap();
    let book = Casebook::builder()
        .root(dir.path())
        .import_folder("azure")
        .default_author("qa-team")
        .open()
        .unwrap();
    let src = TempDir::new().unwrap();
    let export = write_export(src.path(), "sprint.json", EXPORT);

    assert_eq!(book.import_azure(&export).created, 2);
    let logout = book
        .load(dir.path().join("azure/sprint/Logout.json"))
        .unwrap();
    assert_eq!(logout.case.author, "qa-team");
}
