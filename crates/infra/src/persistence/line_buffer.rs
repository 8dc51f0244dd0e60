// crates/infra/src/persistence/line_buffer.rs
use std::{
    fmt,
    io::{self, Read},
};

use log::trace;

/// Fixed-capacity read buffer with a consume cursor.
///
/// `buf[cursor..end]` holds bytes read from the source that no caller has
/// seen yet. Bytes before `cursor` were already handed out. The storage is
/// allocated once and reused for every line.
pub struct LineBuffer {
    buf: Box<[u8]>,
    cursor: usize,
    end: usize,
}

impl LineBuffer {
    /// A zero capacity is bumped to one byte so refills always make progress.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: vec![0; capacity.max(1)].into_boxed_slice(), cursor: 0, end: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Unconsumed bytes currently held.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buf[self.cursor..self.end]
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.end
    }

    /// Moves the unconsumed tail to the front and issues one read into the
    /// free space behind it. Returns the number of new bytes.
    ///
    /// Only called once the buffer is exhausted, where zero means end-of-file.
    /// A buffer full of pending bytes has no free space and returns zero
    /// without touching `src`.
    ///
    /// # Errors
    ///
    /// Propagates the source's error. `Interrupted` is retried.
    pub(crate) fn refill<R: Read + ?Sized>(&mut self, src: &mut R) -> io::Result<usize> {
        let leftover = self.end - self.cursor;
        if leftover > 0 && self.cursor > 0 {
            self.buf.copy_within(self.cursor..self.end, 0);
        }
        self.cursor = 0;
        self.end = leftover;
        if self.end == self.buf.len() {
            return Ok(0);
        }

        let read = loop {
            match src.read(&mut self.buf[self.end..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        };
        self.end += read;
        trace!("line buffer refill: {read} new bytes, {leftover} carried over");
        Ok(read)
    }

    /// Appends pending bytes up to the next `\n` onto `line`.
    ///
    /// Returns `true` when the newline was found and consumed; the newline
    /// itself is not appended. Returns `false` when every pending byte was
    /// appended without meeting one.
    pub fn take_line_into(&mut self, line: &mut Vec<u8>) -> bool {
        let pending = &self.buf[self.cursor..self.end];
        match memchr::memchr(b'\n', pending) {
            Some(at) => {
                line.extend_from_slice(&pending[..at]);
                self.cursor += at + 1;
                true
            }
            None => {
                line.extend_from_slice(pending);
                self.cursor = self.end;
                false
            }
        }
    }

    /// Reads the next line from `src`, without its terminating `\n`.
    ///
    /// Returns `Ok(None)` only when the source is exhausted and this call
    /// gathered no bytes, so an empty line (`Some(vec![])`) stays
    /// distinguishable from end-of-file. A final line lacking `\n` is
    /// returned as-is.
    ///
    /// # Errors
    ///
    /// Propagates read failures; bytes gathered by this call are dropped.
    pub fn read_line<R: Read + ?Sized>(&mut self, src: &mut R) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let mut gathered = false;
        loop {
            if self.is_exhausted() && self.refill(src)? == 0 {
                return Ok(gathered.then_some(line));
            }
            gathered = true;
            if self.take_line_into(&mut line) {
                return Ok(Some(line));
            }
        }
    }

    /// Moves every pending byte onto `out` and empties the buffer.
    pub fn drain_into(&mut self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.pending());
        self.cursor = 0;
        self.end = 0;
    }

    /// Whole storage as scratch space. Pending bytes are discarded, so call
    /// [`Self::drain_into`] first.
    pub fn scratch(&mut self) -> &mut [u8] {
        debug_assert!(self.is_exhausted(), "scratch requested with pending bytes");
        self.cursor = 0;
        self.end = 0;
        &mut self.buf
    }
}

impl fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuffer")
            .field("capacity", &self.buf.len())
            .field("cursor", &self.cursor)
            .field("end", &self.end)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;

    use super::*;

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Fails its first read with `kind`, then serves `data`.
    struct Hiccup {
        data: Cursor<Vec<u8>>,
        kind: Option<io::ErrorKind>,
        calls: usize,
    }

    impl Hiccup {
        fn new(data: &[u8], kind: io::ErrorKind) -> Self {
            Self { data: Cursor::new(data.to_vec()), kind: Some(kind), calls: 0 }
        }
    }

    impl Read for Hiccup {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            match self.kind.take() {
                Some(kind) => Err(io::Error::from(kind)),
                None => self.data.read(buf),
            }
        }
    }

    fn all_lines(buffer: &mut LineBuffer, src: &mut impl Read) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        while let Some(line) = buffer.read_line(src).expect("read") {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn splits_on_newline_and_keeps_empty_lines() {
        let mut buffer = LineBuffer::with_capacity(16);
        let mut src = Cursor::new(b"a\n\nb\n".to_vec());
        assert_eq!(all_lines(&mut buffer, &mut src), vec![b"a".to_vec(), vec![], b"b".to_vec()]);
    }

    #[test]
    fn unterminated_final_line_is_returned_then_eof() {
        let mut buffer = LineBuffer::with_capacity(4);
        let mut src = Cursor::new(b"one\ntwo".to_vec());
        assert_eq!(buffer.read_line(&mut src).unwrap(), Some(b"one".to_vec()));
        assert_eq!(buffer.read_line(&mut src).unwrap(), Some(b"two".to_vec()));
        assert_eq!(buffer.read_line(&mut src).unwrap(), None);
        assert_eq!(buffer.read_line(&mut src).unwrap(), None);
    }

    #[test]
    fn lines_longer_than_capacity_span_refills() {
        let long = vec![b'x'; 37];
        let mut data = long.clone();
        data.extend_from_slice(b"\nend\n");

        let mut buffer = LineBuffer::with_capacity(8);
        let mut src = Trickle { data: &data, step: 3 };
        assert_eq!(all_lines(&mut buffer, &mut src), vec![long, b"end".to_vec()]);
    }

    #[test]
    fn empty_source_is_immediate_eof() {
        let mut buffer = LineBuffer::with_capacity(8);
        assert_eq!(buffer.read_line(&mut io::empty()).unwrap(), None);
    }

    #[test]
    fn refill_compacts_pending_tail() {
        let mut buffer = LineBuffer::with_capacity(8);
        let mut src = Cursor::new(b"ab\ncdefgh".to_vec());
        assert_eq!(buffer.refill(&mut src).unwrap(), 8);

        let mut line = Vec::new();
        assert!(buffer.take_line_into(&mut line));
        assert_eq!(buffer.pending(), b"cdefg");

        assert_eq!(buffer.refill(&mut src).unwrap(), 1);
        assert_eq!(buffer.pending(), b"cdefgh");
    }

    #[test]
    fn drain_hands_out_pending_bytes() {
        let mut buffer = LineBuffer::with_capacity(8);
        let mut src = Cursor::new(b"x\nrest".to_vec());
        assert_eq!(buffer.read_line(&mut src).unwrap(), Some(b"x".to_vec()));

        let mut out = Vec::new();
        buffer.drain_into(&mut out);
        assert_eq!(out, b"rest");
        assert!(buffer.is_exhausted());
        assert_eq!(buffer.scratch().len(), 8);
    }

    #[test]
    fn zero_capacity_is_bumped() {
        let mut buffer = LineBuffer::with_capacity(0);
        assert_eq!(buffer.capacity(), 1);
        let mut src = Cursor::new(b"ab\n".to_vec());
        assert_eq!(buffer.read_line(&mut src).unwrap(), Some(b"ab".to_vec()));
    }

    #[test]
    fn full_buffer_refill_leaves_source_untouched() {
        let mut buffer = LineBuffer::with_capacity(4);
        let mut src = Hiccup::new(b"abcdefgh", io::ErrorKind::Interrupted);
        assert_eq!(buffer.refill(&mut src).unwrap(), 4);
        let calls = src.calls;

        assert_eq!(buffer.refill(&mut src).unwrap(), 0);
        assert_eq!(src.calls, calls);
        assert_eq!(buffer.pending(), b"abcd");
    }

    #[test]
    fn interrupted_refill_is_retried() {
        let mut buffer = LineBuffer::with_capacity(8);
        let mut src = Hiccup::new(b"ab\ncd", io::ErrorKind::Interrupted);
        assert_eq!(all_lines(&mut buffer, &mut src), vec![b"ab".to_vec(), b"cd".to_vec()]);
        assert!(src.calls >= 3);
    }

    #[test]
    fn other_errors_surface_without_retry() {
        let mut buffer = LineBuffer::with_capacity(8);
        let mut src = Hiccup::new(b"ab\n", io::ErrorKind::BrokenPipe);
        let err = buffer.read_line(&mut src).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(src.calls, 1);
        assert!(buffer.is_exhausted());

        assert_eq!(buffer.read_line(&mut src).unwrap(), Some(b"ab".to_vec()));
    }

    proptest! {
        #[test]
        fn agrees_with_splitting_on_newline(
            data in prop::collection::vec(any::<u8>(), 0..512),
            capacity in 1usize..32,
            step in 1usize..16,
        ) {
            let mut expected: Vec<Vec<u8>> = data.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect();
            if data.is_empty() || data.ends_with(b"\n") {
                expected.pop();
            }
            let mut buffer = LineBuffer::with_capacity(capacity);
            let mut src = Trickle { data: &data, step };
            prop_assert_eq!(all_lines(&mut buffer, &mut src), expected);
        }
    }
}
