// crates/infra/src/persistence/file_writer.rs
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};
use simple_file_io_domain::IoOptions;
use simple_file_io_ports::filesystem::{FileSystem, RawFile};
use simple_file_io_shared_kernel::{AccessMode, FileIoError, Result};

use super::chunked::{assemble_line, assemble_lines, write_chunked, write_once};
use crate::filesystem::{OsFileSystem, acquire};

/// Write-side state shared by [`TextWriter`], [`ByteWriter`] and
/// [`crate::File`]: a buffered descriptor plus the reusable batch scratch.
#[derive(Debug)]
pub(crate) struct WriterCore<F: Write> {
    path: PathBuf,
    sink: BufWriter<F>,
    scratch: Vec<u8>,
    chunk: usize,
}

impl<F: RawFile> WriterCore<F> {
    pub(crate) fn new(path: PathBuf, file: F, options: &IoOptions) -> Self {
        Self {
            path,
            sink: BufWriter::with_capacity(options.buffer_capacity.bytes(), file),
            scratch: Vec::new(),
            chunk: options.write_chunk_size.bytes(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn fail(&self, err: io::Error) -> FileIoError {
        warn!("write failure on '{}': {err}", self.path.display());
        FileIoError::write(&self.path, err)
    }

    pub(crate) fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        write_chunked(&mut self.sink, data, self.chunk).map_err(|e| self.fail(e))
    }

    pub(crate) fn write_line(&mut self, line: &[u8]) -> Result<()> {
        assemble_line(line, &mut self.scratch);
        write_once(&mut self.sink, &self.scratch).map_err(|e| self.fail(e))
    }

    pub(crate) fn write_lines<S: AsRef<[u8]>>(&mut self, lines: &[S]) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        assemble_lines(lines, &mut self.scratch);
        write_once(&mut self.sink, &self.scratch).map_err(|e| self.fail(e))
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(|e| self.fail(e))
    }

    pub(crate) fn sync(&mut self) -> Result<()> {
        self.flush()?;
        self.sink.get_mut().sync_all().map_err(|e| self.fail(e))
    }

    /// Flushes and releases the descriptor. On a failed flush the buffered
    /// bytes are dropped rather than retried.
    pub(crate) fn finish(mut self) -> Result<()> {
        let flushed = self.flush();
        let (file, _unwritten) = self.sink.into_parts();
        drop(file);
        debug!("closed '{}'", self.path.display());
        flushed
    }

    /// [`Self::finish`] for teardown paths that cannot report errors.
    pub(crate) fn finish_quietly(self) {
        let path = self.path.clone();
        if let Err(err) = self.finish() {
            warn!("discarding unflushed data for '{}': {err}", path.display());
        }
    }
}

fn closed(path: &Path) -> FileIoError {
    FileIoError::not_open(path, "handle was closed")
}

fn open_core<S: FileSystem + ?Sized>(
    fs: &S,
    path: &Path,
    access: AccessMode,
    options: &IoOptions,
) -> Result<WriterCore<S::File>> {
    if access.is_read() {
        let err = FileIoError::configuration("writers open for write or append, not read");
        return Err(err.at_path(path));
    }
    options.validate()?;
    let file = acquire(fs, path, access)?;
    Ok(WriterCore::new(path.to_path_buf(), file, options))
}

/// Buffered writer for text files.
///
/// Dropping the writer flushes on a best-effort basis; call
/// [`TextWriter::close`] to observe flush failures.
#[derive(Debug)]
pub struct TextWriter<F: RawFile = fs::File> {
    path: PathBuf,
    core: Option<WriterCore<F>>,
}

impl TextWriter<fs::File> {
    /// Opens `path` for writing, truncating it, or for appending when
    /// `append` is set.
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied` or `NotOpen` from the platform.
    pub fn open(path: impl AsRef<Path>, append: bool) -> Result<Self> {
        let access = if append { AccessMode::Append } else { AccessMode::Write };
        Self::open_with(&OsFileSystem, path, access, &IoOptions::default())
    }

    /// Shorthand for `open(path, false)`.
    ///
    /// # Errors
    ///
    /// See [`Self::open`].
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, false)
    }

    /// Shorthand for `open(path, true)`.
    ///
    /// # Errors
    ///
    /// See [`Self::open`].
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, true)
    }

    pub fn exists(path: impl AsRef<Path>) -> bool {
        OsFileSystem.exists(path.as_ref())
    }
}

impl<F: RawFile> TextWriter<F> {
    /// Opens `path` through any [`FileSystem`] backend.
    ///
    /// # Errors
    ///
    /// A configuration error for `AccessMode::Read` or invalid `options`,
    /// open errors otherwise.
    pub fn open_with<S>(
        fs: &S,
        path: impl AsRef<Path>,
        access: AccessMode,
        options: &IoOptions,
    ) -> Result<Self>
    where
        S: FileSystem<File = F> + ?Sized,
    {
        let core = open_core(fs, path.as_ref(), access, options)?;
        Ok(Self { path: core.path().to_path_buf(), core: Some(core) })
    }

    pub fn from_raw(path: impl Into<PathBuf>, file: F, options: &IoOptions) -> Self {
        let core = WriterCore::new(path.into(), file, options);
        Self { path: core.path().to_path_buf(), core: Some(core) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.core.is_some()
    }

    fn core(&mut self) -> Result<&mut WriterCore<F>> {
        self.core.as_mut().ok_or_else(|| closed(&self.path))
    }

    /// Writes `data` as-is, in chunks of the configured size.
    ///
    /// # Errors
    ///
    /// `WriteError` on a failed or short chunk; earlier chunks stay written.
    pub fn write_string(&mut self, data: &str) -> Result<()> {
        self.core()?.write_bytes(data.as_bytes())
    }

    /// Writes `line` followed by `\n`.
    ///
    /// # Errors
    ///
    /// `WriteError` on a failed or short write.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.core()?.write_line(line.as_bytes())
    }

    /// Writes every line with one write call, adding `\n` to lines that do
    /// not already end with one.
    ///
    /// # Errors
    ///
    /// `WriteError` on a failed or short write.
    pub fn write_lines<S: AsRef<[u8]>>(&mut self, lines: &[S]) -> Result<()> {
        self.core()?.write_lines(lines)
    }

    /// Pushes buffered bytes to the descriptor without closing it.
    ///
    /// # Errors
    ///
    /// `WriteError` when the descriptor rejects the data.
    pub fn flush(&mut self) -> Result<()> {
        self.core()?.flush()
    }

    /// Flushes, then asks the platform to persist the file to storage.
    ///
    /// # Errors
    ///
    /// `WriteError` when flushing or syncing fails.
    pub fn sync(&mut self) -> Result<()> {
        self.core()?.sync()
    }

    /// Flushes and releases the descriptor. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// `WriteError` when the final flush fails.
    pub fn close(&mut self) -> Result<()> {
        self.core.take().map_or(Ok(()), WriterCore::finish)
    }
}

impl<F: RawFile> Drop for TextWriter<F> {
    fn drop(&mut self) {
        if let Some(core) = self.core.take() {
            core.finish_quietly();
        }
    }
}

/// Buffered writer for raw bytes.
#[derive(Debug)]
pub struct ByteWriter<F: RawFile = fs::File> {
    path: PathBuf,
    core: Option<WriterCore<F>>,
}

impl ByteWriter<fs::File> {
    /// Opens `path` for writing, truncating it, or for appending when
    /// `append` is set.
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied` or `NotOpen` from the platform.
    pub fn open(path: impl AsRef<Path>, append: bool) -> Result<Self> {
        let access = if append { AccessMode::Append } else { AccessMode::Write };
        Self::open_with(&OsFileSystem, path, access, &IoOptions::default())
    }

    /// Shorthand for `open(path, false)`.
    ///
    /// # Errors
    ///
    /// See [`Self::open`].
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, false)
    }

    /// Shorthand for `open(path, true)`.
    ///
    /// # Errors
    ///
    /// See [`Self::open`].
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, true)
    }

    pub fn exists(path: impl AsRef<Path>) -> bool {
        OsFileSystem.exists(path.as_ref())
    }
}

impl<F: RawFile> ByteWriter<F> {
    /// Opens `path` through any [`FileSystem`] backend.
    ///
    /// # Errors
    ///
    /// A configuration error for `AccessMode::Read` or invalid `options`,
    /// open errors otherwise.
    pub fn open_with<S>(
        fs: &S,
        path: impl AsRef<Path>,
        access: AccessMode,
        options: &IoOptions,
    ) -> Result<Self>
    where
        S: FileSystem<File = F> + ?Sized,
    {
        let core = open_core(fs, path.as_ref(), access, options)?;
        Ok(Self { path: core.path().to_path_buf(), core: Some(core) })
    }

    pub fn from_raw(path: impl Into<PathBuf>, file: F, options: &IoOptions) -> Self {
        let core = WriterCore::new(path.into(), file, options);
        Self { path: core.path().to_path_buf(), core: Some(core) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.core.is_some()
    }

    fn core(&mut self) -> Result<&mut WriterCore<F>> {
        self.core.as_mut().ok_or_else(|| closed(&self.path))
    }

    /// Writes `data` in chunks of the configured size. Partial writes are
    /// not resumed.
    ///
    /// # Errors
    ///
    /// `WriteError` on a failed or short chunk.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.core()?.write_bytes(data)
    }

    /// # Errors
    ///
    /// `WriteError` when the descriptor rejects the data.
    pub fn flush(&mut self) -> Result<()> {
        self.core()?.flush()
    }

    /// # Errors
    ///
    /// `WriteError` when flushing or syncing fails.
    pub fn sync(&mut self) -> Result<()> {
        self.core()?.sync()
    }

    /// # Errors
    ///
    /// `WriteError` when the final flush fails.
    pub fn close(&mut self) -> Result<()> {
        self.core.take().map_or(Ok(()), WriterCore::finish)
    }
}

impl<F: RawFile> Drop for ByteWriter<F> {
    fn drop(&mut self) {
        if let Some(core) = self.core.take() {
            core.finish_quietly();
        }
    }
}
