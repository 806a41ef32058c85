//! Attachment tests
//!
//! Files attached to steps live in the `_attachment` folder next to the
//! case and follow it through duplicate, move and delete.

use crate::*;

#[test]
fn test_attach_copies_and_links() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    let mut file = add_case(&book, None, "Login", &["Open", "Submit"]);

    let name = book.attach(&mut file, &shot, 1, None).unwrap();
    assert_eq!(name, format!("{}_shot.png", file.case.id));
    assert!(dir.path().join("_attachment").join(&name).is_file());

    let stored = book.load(&file.path).unwrap();
    assert_eq!(stored.case.steps[1].attachments, vec![name.clone()]);
    assert!(stored.case.steps[0].attachments.is_empty());

    let listed = book.attachments(&stored).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, name);
    assert_eq!(listed[0].steps, vec![1]);
}

#[test]
fn test_attach_errors() {
    let (_dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");

    let mut no_steps = add_case(&book, None, "Empty", &[]);
    assert!(book
        .attach(&mut no_steps, &shot, 0, None)
        .unwrap_err()
        .is_invalid_input());

    let mut file = add_case(&book, None, "One step", &["Open"]);
    assert!(book.attach(&mut file, &shot, 3, None).unwrap_err().is_not_found());
    assert!(book
        .attach(&mut file, src.path().join("none.png"), 0, None)
        .unwrap_err()
        .is_not_found());

    book.attach(&mut file, &shot, 0, Some("login")).unwrap();
    assert!(book
        .attach(&mut file, &shot, 0, Some("login"))
        .unwrap_err()
        .is_conflict());
}

#[test]
fn test_detach_removes_file_and_links() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    let mut file = add_case(&book, None, "Login", &["Open"]);
    let name = book.attach(&mut file, &shot, 0, None).unwrap();

    assert!(book.detach(&mut file, &name).unwrap());
    assert!(!dir.path().join("_attachment").join(&name).exists());
    assert!(book.load(&file.path).unwrap().case.steps[0].attachments.is_empty());
    assert!(!book.detach(&mut file, &name).unwrap());
}

#[test]
fn test_duplicate_copies_attachments_under_new_id() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    let mut file = add_case(&book, None, "Login", &["Open"]);
    book.attach(&mut file, &shot, 0, None).unwrap();

    let copy = book.duplicate(&file).unwrap();
    let copied = format!("{}_shot.png", copy.case.id);
    assert_eq!(copy.case.steps[0].attachments, vec![copied.clone()]);
    assert!(dir.path().join("_attachment").join(&copied).is_file());
    assert_eq!(book.attachments(&file).unwrap().len(), 1);
}

#[test]
fn test_move_carries_attachments() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    let folder = book.create_folder("", "dest").unwrap();
    let mut file = add_case(&book, None, "Login", &["Open"]);
    let name = book.attach(&mut file, &shot, 0, None).unwrap();

    let dest = book
        .move_item(&file.path, &folder)
        .unwrap()
        .moved_to()
        .map(Path::to_path_buf)
        .unwrap();
    assert!(!dir.path().join("_attachment").join(&name).exists());
    assert!(folder.join("_attachment").join(&name).is_file());

    let moved = book.load(&dest).unwrap();
    assert_eq!(book.attachments(&moved).unwrap().len(), 1);
}

#[test]
fn test_delete_removes_attachments() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    let mut file = add_case(&book, None, "Login", &["Open"]);
    let name = book.attach(&mut file, &shot, 0, None).unwrap();

    book.delete(&file).unwrap();
    assert!(!dir.path().join("_attachment").join(&name).exists());
}

#[test]
fn test_attachment_dir_is_not_scanned() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let data = write_source(src.path(), "data.json");
    let mut file = add_case(&book, None, "Login", &["Open"]);
    book.attach(&mut file, &data, 0, None).unwrap();

    assert!(dir.path().join("_attachment").is_dir());
    let report = book.load_all().unwrap();
    assert_eq!(report.cases.len(), 1);
    assert!(report.is_clean());
    assert!(book.tree().unwrap().folders.is_empty());
}

// =============================================================================
// SEVERAL CASES PER FOLDER
// =============================================================================

/// Case with a fixed id, as imported work items keep theirs
fn case_with_id(book: &Casebook, name: &str, id: &str) -> CaseFile {
    let mut file = add_case(book, None, name, &["Open"]);
    file.case.id = id.to_string();
    book.save(&mut file).unwrap();
    file
}

#[test]
fn test_delete_keeps_attachments_of_ids_sharing_a_prefix() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    let mut one = case_with_id(&book, "One", "1");
    let mut twelve = case_with_id(&book, "Twelve", "12");
    let mut other = case_with_id(&book, "Other", "a1b");

    assert_eq!(book.attach(&mut one, &shot, 0, None).unwrap(), "1_shot.png");
    assert_eq!(book.attach(&mut twelve, &shot, 0, None).unwrap(), "12_shot.png");
    book.attach(&mut other, &shot, 0, None).unwrap();
    assert_eq!(book.attachments(&one).unwrap().len(), 1);

    book.delete(&one).unwrap();
    let attachments = dir.path().join("_attachment");
    assert!(!attachments.join("1_shot.png").exists());
    assert!(attachments.join("12_shot.png").is_file());
    assert!(attachments.join("a1b_shot.png").is_file());
    assert_eq!(book.attachments(&twelve).unwrap().len(), 1);
    assert_eq!(book.attachments(&other).unwrap().len(), 1);

    let report = book.bulk_delete(&[twelve.path.clone()]);
    assert!(report.is_clean());
    assert!(attachments.join("a1b_shot.png").is_file());
}

#[test]
fn test_cases_sharing_a_folder_keep_their_attachments() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    let dest = book.create_folder("", "dest").unwrap();
    let mut cases: Vec<CaseFile> = ["A", "B", "C"]
        .iter()
        .map(|name| add_case(&book, None, name, &["Open"]))
        .collect();
    let names: Vec<String> = cases
        .iter_mut()
        .map(|file| book.attach(file, &shot, 0, None).unwrap())
        .collect();

    let moved = book
        .move_item(&cases[0].path, &dest)
        .unwrap()
        .moved_to()
        .map(Path::to_path_buf)
        .unwrap();
    book.delete(&cases[1]).unwrap();

    let attachments = dir.path().join("_attachment");
    assert!(dest.join("_attachment").join(&names[0]).is_file());
    assert!(!attachments.join(&names[0]).exists());
    assert!(!attachments.join(&names[1]).exists());
    assert!(attachments.join(&names[2]).is_file());

    let moved = book.load(&moved).unwrap();
    assert_eq!(book.attachments(&moved).unwrap().len(), 1);
    let kept = book.load(&cases[2].path).unwrap();
    assert_eq!(book.attachments(&kept).unwrap()[0].name, names[2]);
}

#[test]
fn test_move_folder_carries_attachments() {
    let (dir, book) = open_temp();
    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    book.create_folder("", "suite").unwrap();
    let archive = book.create_folder("", "archive").unwrap();
    let mut login = add_case(&book, Some("suite"), "Login", &["Open"]);
    let mut logout = add_case(&book, Some("suite"), "Logout", &["Open"]);
    let login_name = book.attach(&mut login, &shot, 0, None).unwrap();
    book.attach(&mut logout, &shot, 1, None).unwrap();

    let moved = book
        .move_item("suite", &archive)
        .unwrap()
        .moved_to()
        .map(Path::to_path_buf)
        .unwrap();
    assert_eq!(moved, archive.join("suite"));
    assert!(!dir.path().join("suite").exists());

    let login = book.load(moved.join(login.file_name())).unwrap();
    let listed = book.attachments(&login).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, login_name);
    for step in &login.case.steps {
        for name in &step.attachments {
            assert!(moved.join("_attachment").join(name).is_file());
        }
    }
    let logout = book.load(moved.join(logout.file_name())).unwrap();
    assert_eq!(book.attachments(&logout).unwrap()[0].steps, vec![1]);
}
