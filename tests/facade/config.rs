//! Configuration and builder tests

use crate::*;
use casebook::CONFIG_FILE_NAME;

#[test]
fn test_open_creates_missing_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("new").join("cases");
    let book = Casebook::open(&root).unwrap();
    assert!(root.is_dir());
    assert_eq!(book.root(), root.as_path());
    assert_eq!(book.config().root.as_deref(), Some(root.as_path()));
}

#[test]
fn test_builder_without_root_fails() {
    let err = Casebook::builder().open().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_config_file_in_root_is_honoured() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "attachment_dir_name = \"files\"\nimport_folder = \"azure\"\n",
    )
    .unwrap();

    let book = Casebook::open(dir.path()).unwrap();
    assert_eq!(book.config().attachment_dir_name, "files");
    assert_eq!(book.config().import_folder, "azure");

    let src = TempDir::new().unwrap();
    let shot = write_source(src.path(), "shot.png");
    let mut file = add_case(&book, None, "Login", &["Open"]);
    let name = book.attach(&mut file, &shot, 0, None).unwrap();
    assert!(dir.path().join("files").join(name).is_file());
}

#[test]
fn test_config_file_names_root() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("settings.toml");
    fs::write(&config_path, "root = \"cases\"\njson_indent = 2\n").unwrap();

    let book = Casebook::builder().config_file(&config_path).open().unwrap();
    assert_eq!(book.root(), dir.path().join("cases").as_path());
    assert_eq!(book.config().json_indent, 2);

    let file = add_case(&book, None, "Indented", &[]);
    let text = fs::read_to_string(&file.path).unwrap();
    assert!(text.contains("\n  \"id\""));
}

#[test]
fn test_builder_overrides_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "import_folder = \"azure\"\n").unwrap();
    let book = Casebook::builder()
        .root(dir.path())
        .import_folder("manual")
        .open()
        .unwrap();
    assert_eq!(book.config().import_folder, "manual");
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "colour = \"red\"\n").unwrap();
    let err = Casebook::open(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_folder_names_must_stay_inside_the_root() {
    let dir = TempDir::new().unwrap();
    let err = Casebook::builder()
        .root(dir.path().join("book"))
        .import_folder("../outside")
        .open()
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let err = Casebook::builder()
        .root(dir.path().join("book"))
        .attachment_dir_name("a/b")
        .open()
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    fs::write(dir.path().join(CONFIG_FILE_NAME), "import_folder = \"..\"\n").unwrap();
    assert!(Casebook::open(dir.path()).is_err());
    assert!(!dir.path().join("book").exists());
}
