// tests/integration/handle_modes.rs
use simple_file_io::{File, IoErrorKind, OpenMode, TextReader, TextWriter};

use crate::common::Scratch;

#[test]
fn invalid_mode_leaves_no_file_behind() {
    let scratch = Scratch::new();
    let path = scratch.path("never.txt");

    for mode in [OpenMode::empty(), OpenMode::WRITE | OpenMode::APPEND, OpenMode::READ | OpenMode::WRITE] {
        let err = File::open(&path, mode).unwrap_err();
        assert_eq!(err.kind(), IoErrorKind::Configuration, "{mode:?}");
    }
    assert!(!File::exists(&path));
}

#[test]
fn missing_file_is_not_found() {
    let scratch = Scratch::new();
    let path = scratch.path("absent.txt");

    let err = TextReader::open(&path).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), format!("File not found: {}", path.display()));

    let err = File::open(&path, OpenMode::READ | OpenMode::BINARY).unwrap_err();
    assert_eq!(err.kind(), IoErrorKind::NotFound);
}

#[test]
fn missing_parent_directory_is_reported_on_write() {
    let scratch = Scratch::new();
    let path = scratch.path("no/such/dir/out.txt");
    let err = TextWriter::create(&path).unwrap_err();
    assert_eq!(err.kind(), IoErrorKind::NotFound);
}

#[test]
fn operations_after_close_are_not_open() {
    let scratch = Scratch::new();
    let path = scratch.write_file("c.txt", "x\n");

    let mut reader = TextReader::open(&path).unwrap();
    reader.close();
    assert_eq!(reader.read_line().unwrap_err().kind(), IoErrorKind::NotOpen);

    let mut writer = TextWriter::append(&path).unwrap();
    writer.close().unwrap();
    let err = writer.write_line("late").unwrap_err();
    assert_eq!(err.kind(), IoErrorKind::NotOpen);
    assert!(err.to_string().starts_with("File operation failed 'file is not open': "));

    let mut handle = File::open(&path, OpenMode::READ).unwrap();
    handle.close().unwrap();
    assert_eq!(handle.read_string().unwrap_err().kind(), IoErrorKind::NotOpen);
}

#[test]
fn gating_follows_the_open_mode() {
    let scratch = Scratch::new();
    let path = scratch.write_file("g.txt", "text\n");

    let mut text = File::open(&path, OpenMode::READ).unwrap();
    assert_eq!(text.read_bytes().unwrap_err().kind(), IoErrorKind::Configuration);
    assert_eq!(text.write_line("x").unwrap_err().kind(), IoErrorKind::NotOpen);
    assert_eq!(text.read_line().unwrap().as_deref(), Some("text"));

    let mut binary = File::open(&path, OpenMode::APPEND | OpenMode::BINARY).unwrap();
    assert_eq!(binary.append_line("x").unwrap_err().kind(), IoErrorKind::Configuration);
    binary.write_bytes(b"raw").unwrap();
    binary.sync().unwrap();
    binary.close().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"text\nraw");
}

#[test]
fn exists_does_not_open() {
    let scratch = Scratch::new();
    let path = scratch.write_file("here.txt", "");
    assert!(TextReader::exists(&path));
    assert!(!TextWriter::exists(scratch.path("there.txt")));
    assert!(File::exists(scratch.root()));
}
