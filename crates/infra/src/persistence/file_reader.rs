// crates/infra/src/persistence/file_reader.rs
use std::{
    fs,
    io::{self, Read, Seek},
    path::{Path, PathBuf},
};

use log::{debug, warn};
use simple_file_io_domain::{BulkReadStrategy, IoOptions};
use simple_file_io_ports::filesystem::{FileSystem, RawFile};
use simple_file_io_shared_kernel::{AccessMode, FileIoError, IoErrorKind, Result};

use super::{bulk, line_buffer::LineBuffer};
use crate::filesystem::{OsFileSystem, acquire};

/// Read-side state shared by [`TextReader`], [`ByteReader`] and
/// [`crate::File`]: the descriptor, its line buffer and the bulk strategy.
#[derive(Debug)]
pub(crate) struct ReaderCore<F> {
    path: PathBuf,
    file: F,
    buffer: LineBuffer,
    strategy: BulkReadStrategy,
    reserve: usize,
    failed: bool,
}

impl<F: Read + Seek> ReaderCore<F> {
    pub(crate) fn new(path: PathBuf, file: F, options: &IoOptions) -> Self {
        Self {
            path,
            file,
            buffer: LineBuffer::with_capacity(options.buffer_capacity.bytes()),
            strategy: options.bulk_strategy,
            reserve: options.read_reserve.bytes(),
            failed: false,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_healthy(&self) -> Result<()> {
        if self.failed {
            return Err(FileIoError::new(
                IoErrorKind::ReadError,
                &self.path,
                "handle is unusable after an earlier read failure",
            ));
        }
        Ok(())
    }

    fn fail(&mut self, err: io::Error) -> FileIoError {
        self.failed = true;
        warn!("read failure on '{}': {err}", self.path.display());
        FileIoError::read(&self.path, err)
    }

    pub(crate) fn read_line_bytes(&mut self) -> Result<Option<Vec<u8>>> {
        self.ensure_healthy()?;
        match self.buffer.read_line(&mut self.file) {
            Ok(line) => Ok(line),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub(crate) fn read_line(&mut self) -> Result<Option<String>> {
        self.read_line_bytes()?.map(|bytes| decode(&self.path, bytes)).transpose()
    }

    /// Gathers up to `max` lines (`0` = until end-of-file) through `decode_line`.
    pub(crate) fn collect_lines<T>(
        &mut self,
        max: usize,
        mut decode_line: impl FnMut(&Path, Vec<u8>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut lines = Vec::with_capacity(max.min(1024));
        while max == 0 || lines.len() < max {
            match self.read_line_bytes()? {
                Some(bytes) => lines.push(decode_line(&self.path, bytes)?),
                None => break,
            }
        }
        Ok(lines)
    }

    pub(crate) fn read_lines(&mut self, max: usize) -> Result<Vec<String>> {
        self.collect_lines(max, decode)
    }

    /// Everything not yet handed out: bytes still in the line buffer followed
    /// by the rest of the descriptor.
    ///
    /// A failed up-front reservation consumes nothing and leaves the handle
    /// usable.
    pub(crate) fn read_to_end(&mut self) -> Result<Vec<u8>> {
        self.ensure_healthy()?;
        let mut out = Vec::new();
        if self.strategy == BulkReadStrategy::Chunked {
            out.try_reserve(self.reserve).map_err(|e| {
                FileIoError::read(&self.path, io::Error::new(io::ErrorKind::OutOfMemory, e))
            })?;
        }
        let result = match self.strategy {
            BulkReadStrategy::Chunked => {
                self.buffer.drain_into(&mut out);
                bulk::read_chunked(&mut self.file, self.buffer.scratch(), &mut out)
            }
            BulkReadStrategy::Sized => {
                self.buffer.drain_into(&mut out);
                bulk::read_sized(&mut self.file, &mut out)
            }
        };
        match result {
            Ok(_) => Ok(out),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub(crate) fn read_to_string(&mut self) -> Result<String> {
        let bytes = self.read_to_end()?;
        decode(&self.path, bytes)
    }
}

fn decode(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        let detail = format!("stream did not contain valid UTF-8: {e}");
        FileIoError::new(IoErrorKind::ReadError, path, detail)
    })
}

fn raw(_: &Path, bytes: Vec<u8>) -> Result<Vec<u8>> {
    Ok(bytes)
}

fn closed(path: &Path) -> FileIoError {
    FileIoError::not_open(path, "handle was closed")
}

fn open_core<S: FileSystem + ?Sized>(
    fs: &S,
    path: &Path,
    options: &IoOptions,
) -> Result<ReaderCore<S::File>> {
    options.validate()?;
    let file = acquire(fs, path, AccessMode::Read)?;
    Ok(ReaderCore::new(path.to_path_buf(), file, options))
}

/// Iterator over the remaining lines of a reader.
///
/// Yields `Err` at most once; iteration ends after an error.
#[derive(Debug)]
pub struct Lines<'a, F> {
    core: Option<&'a mut ReaderCore<F>>,
}

impl<'a, F> Lines<'a, F> {
    pub(crate) fn new(core: &'a mut ReaderCore<F>) -> Self {
        Self { core: Some(core) }
    }
}

impl<F: Read + Seek> Iterator for Lines<'_, F> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let core = self.core.as_mut()?;
        match core.read_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.core = None;
                None
            }
            Err(e) => {
                self.core = None;
                Some(Err(e))
            }
        }
    }
}

/// Buffered line-oriented reader for text files.
///
/// Lines are returned without their `\n`. End-of-file is `Ok(None)`, which
/// keeps it distinct from an empty line (`Ok(Some(String::new()))`).
#[derive(Debug)]
pub struct TextReader<F = fs::File> {
    path: PathBuf,
    core: Option<ReaderCore<F>>,
}

impl TextReader<fs::File> {
    /// Opens `path` with default options.
    ///
    /// # Errors
    ///
    /// `NotFound` or `PermissionDenied` from the platform, `NotOpen` otherwise.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(&OsFileSystem, path, &IoOptions::default())
    }

    /// Existence query that does not open the file.
    pub fn exists(path: impl AsRef<Path>) -> bool {
        OsFileSystem.exists(path.as_ref())
    }
}

impl<F: RawFile> TextReader<F> {
    /// Opens `path` through any [`FileSystem`] backend.
    ///
    /// # Errors
    ///
    /// Configuration errors for invalid `options`, open errors otherwise.
    pub fn open_with<S>(fs: &S, path: impl AsRef<Path>, options: &IoOptions) -> Result<Self>
    where
        S: FileSystem<File = F> + ?Sized,
    {
        let core = open_core(fs, path.as_ref(), options)?;
        Ok(Self { path: core.path().to_path_buf(), core: Some(core) })
    }
}

impl<F: Read + Seek> TextReader<F> {
    /// Wraps an already open descriptor; `path` is used for error messages.
    pub fn from_raw(path: impl Into<PathBuf>, file: F, options: &IoOptions) -> Self {
        let core = ReaderCore::new(path.into(), file, options);
        Self { path: core.path().to_path_buf(), core: Some(core) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.core.is_some()
    }

    fn core(&mut self) -> Result<&mut ReaderCore<F>> {
        self.core.as_mut().ok_or_else(|| closed(&self.path))
    }

    /// Reads everything not yet consumed into one string.
    ///
    /// # Errors
    ///
    /// `ReadError` on a platform failure or invalid UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        self.core()?.read_to_string()
    }

    /// Reads the next line, or `None` at end-of-file.
    ///
    /// # Errors
    ///
    /// `ReadError` on a platform failure or invalid UTF-8. A line partially
    /// gathered when the failure happened is discarded.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.core()?.read_line()
    }

    /// Like [`Self::read_line`] without UTF-8 decoding.
    ///
    /// # Errors
    ///
    /// `ReadError` on a platform failure.
    pub fn read_line_bytes(&mut self) -> Result<Option<Vec<u8>>> {
        self.core()?.read_line_bytes()
    }

    /// Reads up to `max` lines; `0` reads until end-of-file. Reaching
    /// end-of-file early is not an error.
    ///
    /// # Errors
    ///
    /// See [`Self::read_line`].
    pub fn read_lines(&mut self, max: usize) -> Result<Vec<String>> {
        self.core()?.read_lines(max)
    }

    /// Byte-level counterpart of [`Self::read_lines`].
    ///
    /// # Errors
    ///
    /// See [`Self::read_line_bytes`].
    pub fn read_lines_bytes(&mut self, max: usize) -> Result<Vec<Vec<u8>>> {
        self.core()?.collect_lines(max, raw)
    }

    /// Iterates over the remaining lines.
    ///
    /// # Errors
    ///
    /// `NotOpen` when the reader was closed.
    pub fn lines(&mut self) -> Result<Lines<'_, F>> {
        Ok(Lines::new(self.core()?))
    }

    /// Releases the descriptor. Later calls fail with `NotOpen`.
    pub fn close(&mut self) {
        if self.core.take().is_some() {
            debug!("closed '{}'", self.path.display());
        }
    }
}

/// Reader returning whole-file contents as raw bytes.
#[derive(Debug)]
pub struct ByteReader<F = fs::File> {
    path: PathBuf,
    core: Option<ReaderCore<F>>,
}

impl ByteReader<fs::File> {
    /// Opens `path` with default options.
    ///
    /// # Errors
    ///
    /// `NotFound` or `PermissionDenied` from the platform, `NotOpen` otherwise.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(&OsFileSystem, path, &IoOptions::default())
    }

    pub fn exists(path: impl AsRef<Path>) -> bool {
        OsFileSystem.exists(path.as_ref())
    }
}

impl<F: RawFile> ByteReader<F> {
    /// Opens `path` through any [`FileSystem`] backend.
    ///
    /// # Errors
    ///
    /// Configuration errors for invalid `options`, open errors otherwise.
    pub fn open_with<S>(fs: &S, path: impl AsRef<Path>, options: &IoOptions) -> Result<Self>
    where
        S: FileSystem<File = F> + ?Sized,
    {
        let core = open_core(fs, path.as_ref(), options)?;
        Ok(Self { path: core.path().to_path_buf(), core: Some(core) })
    }
}

impl<F: Read + Seek> ByteReader<F> {
    pub fn from_raw(path: impl Into<PathBuf>, file: F, options: &IoOptions) -> Self {
        let core = ReaderCore::new(path.into(), file, options);
        Self { path: core.path().to_path_buf(), core: Some(core) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.core.is_some()
    }

    /// Reads every remaining byte. An empty file yields an empty vector.
    ///
    /// # Errors
    ///
    /// `NotOpen` after [`Self::close`], `ReadError` on a platform failure or
    /// a short sized read.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        self.core.as_mut().ok_or_else(|| closed(&self.path))?.read_to_end()
    }

    pub fn close(&mut self) {
        if self.core.take().is_some() {
            debug!("closed '{}'", self.path.display());
        }
    }
}
