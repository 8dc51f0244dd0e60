// tests/integration/round_trip.rs
use simple_file_io::{
    BulkReadStrategy, ByteReader, ByteWriter, File, IoOptions, OpenMode, TextReader, TextWriter,
};

use crate::common::{Scratch, sample_lines};

#[test]
fn text_lines_round_trip_with_empty_lines() {
    let scratch = Scratch::new();
    let path = scratch.path("lines.txt");

    let mut writer = TextWriter::create(&path).unwrap();
    writer.write_lines(&["a", "", "b"]).unwrap();
    writer.close().unwrap();

    let mut reader = TextReader::open(&path).unwrap();
    assert_eq!(reader.read_lines(0).unwrap(), vec!["a", "", "b"]);
}

#[test]
fn end_of_file_is_distinct_from_an_empty_line() {
    let scratch = Scratch::new();
    let path = scratch.write_file("two.txt", "one\ntwo\n");

    let mut reader = TextReader::open(&path).unwrap();
    assert_eq!(reader.read_line().unwrap().as_deref(), Some("one"));
    assert_eq!(reader.read_line().unwrap().as_deref(), Some("two"));
    assert_eq!(reader.read_line().unwrap(), None);

    let path = scratch.write_file("blank.txt", "\n");
    let mut reader = TextReader::open(&path).unwrap();
    assert_eq!(reader.read_line().unwrap(), Some(String::new()));
    assert_eq!(reader.read_line().unwrap(), None);
}

#[test]
fn line_three_times_the_buffer_reads_back_intact() {
    let scratch = Scratch::new();
    let path = scratch.path("wide.txt");
    let wide = "x".repeat(3 * 1024 * 1024);

    let mut writer = TextWriter::create(&path).unwrap();
    writer.write_line(&wide).unwrap();
    writer.write_line("after").unwrap();
    writer.close().unwrap();

    let mut reader = TextReader::open(&path).unwrap();
    let line = reader.read_line().unwrap().expect("first line");
    assert_eq!(line.len(), wide.len());
    assert!(line == wide);
    assert_eq!(reader.read_line().unwrap().as_deref(), Some("after"));
    assert_eq!(reader.read_line().unwrap(), None);
}

#[test]
fn append_accumulates_after_write() {
    let scratch = Scratch::new();
    let path = scratch.path("log.txt");

    let mut first = TextWriter::create(&path).unwrap();
    first.write_line("first").unwrap();
    first.close().unwrap();

    let mut second = TextWriter::append(&path).unwrap();
    second.write_line("second").unwrap();
    second.close().unwrap();

    let mut reader = TextReader::open(&path).unwrap();
    assert_eq!(reader.read_lines(0).unwrap(), vec!["first", "second"]);
}

#[test]
fn write_mode_truncates_existing_content() {
    let scratch = Scratch::new();
    let path = scratch.write_file("old.txt", "a much longer previous body\n");

    let mut handle = File::open(&path, OpenMode::WRITE).unwrap();
    handle.write_string("new").unwrap();
    handle.close().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
}

#[test]
fn independent_handles_read_identical_bytes() {
    let scratch = Scratch::new();
    let body: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
    let path = scratch.write_file("data.bin", &body);

    let first = ByteReader::open(&path).unwrap().read_bytes().unwrap();
    let second = ByteReader::open(&path).unwrap().read_bytes().unwrap();
    assert_eq!(first, second);
    assert_eq!(first, body);
}

#[test]
fn bulk_strategies_agree() {
    let scratch = Scratch::new();
    let text = sample_lines(5_000).join("\n");
    let path = scratch.write_file("bulk.txt", &text);

    let read_with = |strategy: BulkReadStrategy| {
        let options = IoOptions::builder()
            .buffer_capacity(simple_file_io::ByteSize::kib(4))
            .bulk_strategy(strategy)
            .build()
            .unwrap();
        let mut handle = File::open_with_options(&path, OpenMode::READ, &options).unwrap();
        let head = handle.read_line().unwrap().unwrap();
        let rest = handle.read_string().unwrap();
        (head, rest)
    };

    let chunked = read_with(BulkReadStrategy::Chunked);
    let sized = read_with(BulkReadStrategy::Sized);
    assert_eq!(chunked, sized);
    assert_eq!(format!("{}\n{}", chunked.0, chunked.1), text);
}

#[test]
fn binary_round_trip_through_the_unified_handle() {
    let scratch = Scratch::new();
    let path = scratch.path("all.bin");
    let body: Vec<u8> = (0..=255u8).collect();

    let mut out = File::open(&path, OpenMode::WRITE | OpenMode::BINARY).unwrap();
    out.write_bytes(&body).unwrap();
    out.close().unwrap();

    let mut input = File::open(&path, OpenMode::READ | OpenMode::BINARY).unwrap();
    assert_eq!(input.read_bytes().unwrap(), body);
}

#[test]
fn empty_file_reads_as_empty() {
    let scratch = Scratch::new();
    let path = scratch.path("empty.bin");
    ByteWriter::create(&path).unwrap().close().unwrap();

    assert!(ByteReader::open(&path).unwrap().read_bytes().unwrap().is_empty());
    let mut reader = TextReader::open(&path).unwrap();
    assert_eq!(reader.read_string().unwrap(), "");
    assert_eq!(reader.read_line().unwrap(), None);
}

#[test]
fn dropped_writer_still_lands_on_disk() {
    let scratch = Scratch::new();
    let path = scratch.path("dropped.txt");
    {
        let mut writer = TextWriter::create(&path).unwrap();
        writer.write_string("kept").unwrap();
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept");
}

#[test]
fn byte_writer_append_extends_existing_bytes() {
    let scratch = Scratch::new();
    let path = scratch.path("frames.bin");

    let mut first = ByteWriter::create(&path).unwrap();
    first.write_bytes(&[0xde, 0xad]).unwrap();
    first.close().unwrap();

    let mut second = ByteWriter::append(&path).unwrap();
    second.write_bytes(&[0xbe, 0xef]).unwrap();
    second.close().unwrap();

    assert_eq!(ByteReader::open(&path).unwrap().read_bytes().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
}
