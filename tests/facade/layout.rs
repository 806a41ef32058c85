//! Folder layout tests
//!
//! Folders, rename, move rules, bulk operations and the tree.

use crate::*;

// =============================================================================
// FOLDERS / RENAME
// =============================================================================

#[test]
fn test_create_folder_is_idempotent() {
    let (dir, book) = open_temp();
    let first = book.create_folder("", "auth").unwrap();
    let second = book.create_folder("", "auth").unwrap();
    assert_eq!(first, second);
    assert!(dir.path().join("auth").is_dir());
}

#[test]
fn test_create_folder_rejects_bad_names() {
    let (_dir, book) = open_temp();
    for name in ["", "  ", "..", "a/b"] {
        let err = book.create_folder("", name).unwrap_err();
        assert!(err.is_invalid_input(), "{:?} should be rejected", name);
    }
}

#[test]
fn test_rename_case_appends_extension() {
    let (dir, book) = open_temp();
    let file = add_case(&book, None, "Login", &[]);

    let renamed = book.rename(&file.path, "login").unwrap();
    assert_eq!(renamed, dir.path().join("login.json"));
    assert!(!file.path.exists());
    assert_eq!(book.load(&renamed).unwrap().case.name, "Login");
}

#[test]
fn test_rename_onto_existing_conflicts() {
    let (_dir, book) = open_temp();
    let a = add_case(&book, None, "A", &[]);
    let b = add_case(&book, None, "B", &[]);
    let err = book.rename(&a.path, &b.file_name()).unwrap_err();
    assert!(err.is_conflict());
    assert!(a.path.exists());
}

#[test]
fn test_rename_folder() {
    let (dir, book) = open_temp();
    book.create_folder("", "old").unwrap();
    let renamed = book.rename("old", "new").unwrap();
    assert_eq!(renamed, dir.path().join("new"));
    assert!(renamed.is_dir());
}

#[test]
fn test_delete_folder_refuses_root() {
    let (_dir, book) = open_temp();
    let err = book.delete_folder(book.root()).unwrap_err();
    assert!(err.is_invalid_input());
    let err = book.delete_folder("").unwrap_err();
    assert!(err.is_invalid_input());
    assert!(book.root().is_dir());
}

// =============================================================================
// MOVE
// =============================================================================

#[test]
fn test_move_case_into_folder() {
    let (dir, book) = open_temp();
    let folder = book.create_folder("", "auth").unwrap();
    let file = add_case(&book, None, "Login", &[]);

    let outcome = book.move_item(&file.path, &folder).unwrap();
    let dest = dir.path().join("auth").join(file.file_name());
    assert_eq!(outcome, MoveOutcome::Moved(dest.clone()));
    assert!(dest.is_file());
    assert!(!file.path.exists());
}

#[test]
fn test_move_rejections() {
    let (_dir, book) = open_temp();
    let parent = book.create_folder("", "parent").unwrap();
    let child = book.create_folder(&parent, "child").unwrap();
    let file = add_case(&book, Some("parent"), "Inside", &[]);

    // Already in the target folder
    assert!(matches!(
        book.move_item(&file.path, &parent).unwrap(),
        MoveOutcome::Rejected(MoveRejected::AlreadyInTarget)
    ));

    // Folder into its own descendant
    assert!(matches!(
        book.move_item(&parent, &child).unwrap(),
        MoveOutcome::Rejected(MoveRejected::IntoItself)
    ));

    // Missing source and target
    assert!(matches!(
        book.move_item("missing.json", &parent).unwrap(),
        MoveOutcome::Rejected(MoveRejected::SourceMissing(_))
    ));
    assert!(matches!(
        book.move_item(&file.path, "missing").unwrap(),
        MoveOutcome::Rejected(MoveRejected::TargetMissing(_))
    ));

    assert!(file.path.exists());
}

#[test]
fn test_move_onto_existing_name_is_rejected() {
    let (_dir, book) = open_temp();
    let folder = book.create_folder("", "dest").unwrap();
    let file = add_case(&book, None, "A", &[]);
    fs::copy(&file.path, folder.join(file.file_name())).unwrap();

    assert!(matches!(
        book.move_item(&file.path, &folder).unwrap(),
        MoveOutcome::Rejected(MoveRejected::NameTaken(_))
    ));
    assert!(file.path.exists());
}

#[test]
fn test_bulk_move_collects_errors() {
    let (_dir, book) = open_temp();
    let folder = book.create_folder("", "dest").unwrap();
    let a = add_case(&book, None, "A", &[]);
    let b = add_case(&book, None, "B", &[]);

    let report = book.bulk_move(
        &[a.path.clone(), b.path.clone(), folder.join("missing.json")],
        &folder,
    );
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(!report.is_clean());
}

#[test]
fn test_bulk_delete() {
    let (dir, book) = open_temp();
    book.create_folder("", "sub").unwrap();
    add_case(&book, Some("sub"), "Nested", &[]);
    let a = add_case(&book, None, "A", &[]);

    let report = book.bulk_delete(&[a.path.clone(), dir.path().join("sub")]);
    assert_eq!(report.succeeded, 2);
    assert!(report.is_clean());
    assert!(book.load_all().unwrap().cases.is_empty());

    let report = book.bulk_delete(&["ghost.json"]);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn test_bulk_delete_refuses_root() {
    let (dir, book) = open_temp();
    let a = add_case(&book, None, "A", &[]);

    let report = book.bulk_delete(&[dir.path().to_path_buf()]);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.errors.len(), 1);

    let report = book.bulk_delete(&["", ".", "sub/.."]);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.errors.len(), 3);

    assert!(dir.path().is_dir());
    assert!(a.path.exists());
}

#[test]
fn test_bulk_delete_refuses_ancestor_of_root() {
    let outer = TempDir::new().unwrap();
    let book = Casebook::open(outer.path().join("book")).unwrap();
    let a = add_case(&book, None, "A", &[]);

    let report = book.bulk_delete(&[outer.path().to_path_buf(), a.path.clone()]);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("root directory"));
    assert!(book.root().is_dir());
    assert!(!a.path.exists());
}

#[test]
fn test_bulk_move_refuses_root() {
    let (dir, book) = open_temp();
    let folder = book.create_folder("", "dest").unwrap();

    let report = book.bulk_move(&[""], &folder);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(dir.path().join("dest").is_dir());
}

// =============================================================================
// TREE
// =============================================================================

#[test]
fn test_tree_lists_folders_and_cases() {
    let (_dir, book) = open_temp();
    book.create_folder("", "auth").unwrap();
    book.create_folder("", "empty").unwrap();
    add_case(&book, Some("auth"), "Login", &[]);
    add_case(&book, None, "Top", &[]);

    let tree = book.tree().unwrap();
    assert_eq!(tree.count_cases(), 2);
    let names: Vec<_> = tree.folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["auth", "empty"]);
    assert_eq!(tree.cases.len(), 1);
    assert_eq!(tree.folders[0].cases[0].name, "Login");

    let filtered = tree.filtered("log");
    assert_eq!(filtered.count_cases(), 1);
    assert_eq!(filtered.folders.len(), 1);
}
