// crates/infra/src/persistence/chunked.rs
//! Write helpers shared by the text and byte writers.

use std::io::{self, Write};

use log::trace;

/// Issues exactly one `write` for `buf`.
///
/// A short count is reported as `WriteZero` and is not resumed. Only
/// `Interrupted`, which transfers nothing, is retried.
///
/// # Errors
///
/// Returns the sink's error, or `WriteZero` on a short write.
pub fn write_once<W: Write + ?Sized>(sink: &mut W, buf: &[u8]) -> io::Result<()> {
    if buf.is_empty() {
        return Ok(());
    }
    loop {
        match sink.write(buf) {
            Ok(n) if n == buf.len() => return Ok(()),
            Ok(n) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("short write: {n} of {} bytes", buf.len()),
                ));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// Writes `data` in pieces of at most `chunk` bytes, one `write` each.
///
/// # Errors
///
/// Stops at the first failed or short piece.
pub fn write_chunked<W: Write + ?Sized>(sink: &mut W, data: &[u8], chunk: usize) -> io::Result<()> {
    for piece in data.chunks(chunk.max(1)) {
        write_once(sink, piece)?;
        trace!("wrote chunk of {} bytes", piece.len());
    }
    Ok(())
}

/// Bytes needed to write `lines` with a `\n` after every line that lacks one.
pub fn batch_len<S: AsRef<[u8]>>(lines: &[S]) -> usize {
    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            line.len() + usize::from(!line.ends_with(b"\n"))
        })
        .sum()
}

/// Assembles `lines` into `scratch`, sized once up front, adding `\n` where
/// a line does not already end with one.
pub fn assemble_lines<S: AsRef<[u8]>>(lines: &[S], scratch: &mut Vec<u8>) {
    let total = batch_len(lines);
    scratch.clear();
    scratch.reserve(total);
    for line in lines {
        let line = line.as_ref();
        scratch.extend_from_slice(line);
        if !line.ends_with(b"\n") {
            scratch.push(b'\n');
        }
    }
    debug_assert_eq!(scratch.len(), total);
}

/// Places `line` and its terminating `\n` into `scratch`.
pub fn assemble_line(line: &[u8], scratch: &mut Vec<u8>) {
    scratch.clear();
    scratch.reserve(line.len() + 1);
    scratch.extend_from_slice(line);
    scratch.push(b'\n');
}
