// crates/infra/src/persistence/bulk.rs
//! Whole-file reads.

use std::io::{self, Read, Seek, SeekFrom};

use log::trace;

/// Reads `scratch`-sized chunks from `src` onto `out` until a zero-byte
/// read. Returns the number of bytes appended.
///
/// # Errors
///
/// Propagates the first read error other than `Interrupted`. Bytes appended
/// before the failure stay in `out`.
pub fn read_chunked<R: Read + ?Sized>(
    src: &mut R,
    scratch: &mut [u8],
    out: &mut Vec<u8>,
) -> io::Result<usize> {
    let mut total = 0;
    loop {
        match src.read(scratch) {
            Ok(0) => break,
            Ok(n) => {
                out.extend_from_slice(&scratch[..n]);
                total += n;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    trace!("chunked read: {total} bytes");
    Ok(total)
}

/// Sizes the remainder of `src` with seek-to-end/tell, allocates exactly and
/// reads it in one pass. Returns the number of bytes appended.
///
/// # Errors
///
/// Fails when seeking fails, when the remainder does not fit in memory, or
/// when the source delivers fewer bytes than its size announced. On failure
/// `out` is restored to its original length.
pub fn read_sized<R: Read + Seek + ?Sized>(src: &mut R, out: &mut Vec<u8>) -> io::Result<usize> {
    let start = src.stream_position()?;
    let end = src.seek(SeekFrom::End(0))?;
    src.seek(SeekFrom::Start(start))?;

    let remaining = usize::try_from(end.saturating_sub(start)).map_err(|_| {
        io::Error::new(io::ErrorKind::OutOfMemory, "file does not fit in memory")
    })?;
    let base = out.len();
    out.try_reserve_exact(remaining)
        .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
    out.resize(base + remaining, 0);

    if let Err(e) = src.read_exact(&mut out[base..]) {
        out.truncate(base);
        let e = if e.kind() == io::ErrorKind::UnexpectedEof {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short read: expected {remaining} bytes"),
            )
        } else {
            e
        };
        return Err(e);
    }
    trace!("sized read: {remaining} bytes");
    Ok(remaining)
}
