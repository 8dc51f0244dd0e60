// crates/infra/src/handle.rs
//! One handle for every open mode.
//!
//! [`File`] validates its [`OpenMode`] before touching the filesystem, then
//! acts as a reader or a writer for the rest of its life. Whether an
//! operation is allowed is decided at run time:
//!
//! | condition                                   | error           |
//! |---------------------------------------------|-----------------|
//! | handle closed                               | `NotOpen`       |
//! | read on a write/append handle, or vice versa| `NotOpen`       |
//! | text operation on a `BINARY` handle         | `Configuration` |
//! | byte operation on a text handle             | `Configuration` |

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use simple_file_io_domain::IoOptions;
use simple_file_io_ports::filesystem::{FileSystem, RawFile};
use simple_file_io_shared_kernel::{FileIoError, HandleMode, OpenMode, Result};

use crate::{
    filesystem::{OsFileSystem, acquire},
    persistence::{
        Lines,
        file_reader::ReaderCore,
        file_writer::WriterCore,
    },
};

#[derive(Debug)]
enum Role<F: RawFile> {
    Reader(ReaderCore<F>),
    Writer(WriterCore<F>),
}

fn check_kind(mode: HandleMode, path: &Path, binary_op: bool) -> Result<()> {
    let detail = match (mode.is_binary(), binary_op) {
        (true, false) => "text operation on a binary handle",
        (false, true) => "byte operation on a text handle",
        _ => return Ok(()),
    };
    Err(FileIoError::configuration(detail).at_path(path))
}

/// A file opened in one [`OpenMode`].
///
/// Dropping a writable handle flushes on a best-effort basis; call
/// [`File::close`] to observe flush failures.
#[derive(Debug)]
pub struct File<F: RawFile = fs::File> {
    path: PathBuf,
    mode: HandleMode,
    role: Option<Role<F>>,
}

impl File<fs::File> {
    /// Opens `path` with default [`IoOptions`].
    ///
    /// # Errors
    ///
    /// `Configuration` when `mode` does not name exactly one of `READ`,
    /// `WRITE` or `APPEND`; `NotFound`, `PermissionDenied` or `NotOpen` when
    /// the platform refuses the open.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use simple_file_io_infra::File;
    /// use simple_file_io_shared_kernel::OpenMode;
    ///
    /// let mut log = File::open("app.log", OpenMode::APPEND)?;
    /// log.append_line("started")?;
    /// log.close()?;
    /// # Ok::<(), simple_file_io_shared_kernel::FileIoError>(())
    /// ```
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        Self::open_with(&OsFileSystem, path, mode, &IoOptions::default())
    }

    /// # Errors
    ///
    /// See [`Self::open`]; invalid `options` are a `Configuration` error.
    pub fn open_with_options(
        path: impl AsRef<Path>,
        mode: OpenMode,
        options: &IoOptions,
    ) -> Result<Self> {
        Self::open_with(&OsFileSystem, path, mode, options)
    }

    /// Existence query that does not open the file.
    pub fn exists(path: impl AsRef<Path>) -> bool {
        OsFileSystem.exists(path.as_ref())
    }
}

impl<F: RawFile> File<F> {
    /// Opens `path` through any [`FileSystem`] backend.
    ///
    /// # Errors
    ///
    /// See [`File::open`].
    pub fn open_with<S>(
        fs: &S,
        path: impl AsRef<Path>,
        mode: OpenMode,
        options: &IoOptions,
    ) -> Result<Self>
    where
        S: FileSystem<File = F> + ?Sized,
    {
        let path = path.as_ref();
        let mode = mode.validate().map_err(|e| e.at_path(path))?;
        options.validate()?;

        let file = acquire(fs, path, mode.access())?;
        let path = path.to_path_buf();
        let role = if mode.access().is_read() {
            Role::Reader(ReaderCore::new(path.clone(), file, options))
        } else {
            Role::Writer(WriterCore::new(path.clone(), file, options))
        };
        debug!("handle '{}' ready in {mode} mode", path.display());
        Ok(Self { path, mode, role: Some(role) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> HandleMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.role.is_some()
    }

    fn reader(&mut self, binary_op: bool) -> Result<&mut ReaderCore<F>> {
        match self.role.as_mut() {
            None => Err(FileIoError::not_open(&self.path, "handle was closed")),
            Some(Role::Writer(_)) => Err(FileIoError::not_open(&self.path, "not open for reading")),
            Some(Role::Reader(core)) => {
                check_kind(self.mode, &self.path, binary_op)?;
                Ok(core)
            }
        }
    }

    fn writer(&mut self, binary_op: bool) -> Result<&mut WriterCore<F>> {
        match self.role.as_mut() {
            None => Err(FileIoError::not_open(&self.path, "handle was closed")),
            Some(Role::Reader(_)) => Err(FileIoError::not_open(&self.path, "not open for writing")),
            Some(Role::Writer(core)) => {
                check_kind(self.mode, &self.path, binary_op)?;
                Ok(core)
            }
        }
    }

    /// Reads everything not yet consumed as UTF-8 text.
    ///
    /// # Errors
    ///
    /// `ReadError` on platform failure or invalid UTF-8; gating errors as
    /// described in the module docs.
    pub fn read_string(&mut self) -> Result<String> {
        self.reader(false)?.read_to_string()
    }

    /// Next line without its `\n`, or `None` at end-of-file.
    ///
    /// # Errors
    ///
    /// `ReadError` on platform failure or invalid UTF-8.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.reader(false)?.read_line()
    }

    /// Up to `max` lines; `0` reads until end-of-file.
    ///
    /// # Errors
    ///
    /// See [`Self::read_line`].
    pub fn read_lines(&mut self, max: usize) -> Result<Vec<String>> {
        self.reader(false)?.read_lines(max)
    }

    /// # Errors
    ///
    /// Gating errors only; read failures surface through the iterator.
    pub fn lines(&mut self) -> Result<Lines<'_, F>> {
        Ok(Lines::new(self.reader(false)?))
    }

    /// Every remaining byte. Requires a `BINARY` handle.
    ///
    /// # Errors
    ///
    /// `ReadError` on platform failure or a short sized read.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        self.reader(true)?.read_to_end()
    }

    /// # Errors
    ///
    /// `WriteError` on a failed or short chunk.
    pub fn write_string(&mut self, data: &str) -> Result<()> {
        self.writer(false)?.write_bytes(data.as_bytes())
    }

    /// Same as [`Self::write_string`].
    ///
    /// # Errors
    ///
    /// See [`Self::write_string`].
    pub fn write_all(&mut self, data: &str) -> Result<()> {
        self.write_string(data)
    }

    /// Same as [`Self::write_string`], for handles opened with `APPEND`.
    ///
    /// # Errors
    ///
    /// See [`Self::write_string`].
    pub fn append(&mut self, data: &str) -> Result<()> {
        self.write_string(data)
    }

    /// # Errors
    ///
    /// `WriteError` on a failed or short write.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer(false)?.write_line(line.as_bytes())
    }

    /// # Errors
    ///
    /// See [`Self::write_line`].
    pub fn append_line(&mut self, line: &str) -> Result<()> {
        self.write_line(line)
    }

    /// Writes the batch with one write call, terminating each line that
    /// lacks a `\n`. An empty batch writes nothing.
    ///
    /// # Errors
    ///
    /// `WriteError` on a failed or short write.
    pub fn write_lines<S: AsRef<[u8]>>(&mut self, lines: &[S]) -> Result<()> {
        self.writer(false)?.write_lines(lines)
    }

    /// # Errors
    ///
    /// See [`Self::write_lines`].
    pub fn append_lines<S: AsRef<[u8]>>(&mut self, lines: &[S]) -> Result<()> {
        self.write_lines(lines)
    }

    /// Requires a `BINARY` handle.
    ///
    /// # Errors
    ///
    /// `WriteError` on a failed or short chunk.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer(true)?.write_bytes(data)
    }

    /// Pushes buffered bytes to the descriptor. A no-op on read handles.
    ///
    /// # Errors
    ///
    /// `NotOpen` after close, `WriteError` when the descriptor rejects data.
    pub fn flush(&mut self) -> Result<()> {
        match self.role.as_mut() {
            None => Err(FileIoError::not_open(&self.path, "handle was closed")),
            Some(Role::Reader(_)) => Ok(()),
            Some(Role::Writer(core)) => core.flush(),
        }
    }

    /// Flushes and syncs the file to storage. A no-op on read handles.
    ///
    /// # Errors
    ///
    /// `NotOpen` after close, `WriteError` when flushing or syncing fails.
    pub fn sync(&mut self) -> Result<()> {
        match self.role.as_mut() {
            None => Err(FileIoError::not_open(&self.path, "handle was closed")),
            Some(Role::Reader(_)) => Ok(()),
            Some(Role::Writer(core)) => core.sync(),
        }
    }

    /// Flushes pending writes and releases the descriptor. Every later
    /// operation fails with `NotOpen`; closing again is a no-op.
    ///
    /// # Errors
    ///
    /// `WriteError` when the final flush fails. The descriptor is released
    /// either way.
    pub fn close(&mut self) -> Result<()> {
        match self.role.take() {
            None => Ok(()),
            Some(Role::Reader(_)) => {
                debug!("closed '{}'", self.path.display());
                Ok(())
            }
            Some(Role::Writer(core)) => core.finish(),
        }
    }
}

impl<F: RawFile> Drop for File<F> {
    fn drop(&mut self) {
        if let Some(Role::Writer(core)) = self.role.take() {
            core.finish_quietly();
        }
    }
}
