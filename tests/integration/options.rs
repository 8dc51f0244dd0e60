// tests/integration/options.rs
use simple_file_io::{BulkReadStrategy, ByteSize, File, IoErrorKind, IoOptions, OpenMode, TextReader};

use crate::common::Scratch;

#[test]
fn options_load_from_json_with_defaults() {
    let options = IoOptions::from_json_str(r#"{ "buffer_capacity": 16, "bulk_strategy": "sized" }"#).unwrap();
    assert_eq!(options.buffer_capacity, ByteSize::new(16));
    assert_eq!(options.bulk_strategy, BulkReadStrategy::Sized);
    assert_eq!(options.write_chunk_size, IoOptions::default().write_chunk_size);
}

#[test]
fn zero_sizes_are_configuration_errors() {
    let err = IoOptions::from_json_str(r#"{ "write_chunk_size": 0 }"#).unwrap_err();
    assert_eq!(err.kind(), IoErrorKind::Configuration);

    let scratch = Scratch::new();
    let path = scratch.path("unused.txt");
    let options = IoOptions { buffer_capacity: ByteSize::new(0), ..IoOptions::default() };
    let err = File::open_with_options(&path, OpenMode::WRITE, &options).unwrap_err();
    assert!(err.is_configuration());
    assert!(!path.exists());
}

#[test]
fn tiny_buffers_still_split_lines_correctly() {
    let scratch = Scratch::new();
    let path = scratch.write_file("tiny.txt", "alpha\n\nbeta gamma delta\nend");
    let options = IoOptions::builder()
        .buffer_capacity(ByteSize::new(3))
        .write_chunk_size(ByteSize::new(2))
        .build()
        .unwrap();

    let mut handle = File::open_with_options(&path, OpenMode::READ, &options).unwrap();
    let lines: Vec<String> = handle.lines().unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(lines, vec!["alpha", "", "beta gamma delta", "end"]);

    let reader = TextReader::open(&path).unwrap();
    assert!(reader.is_open());
}
