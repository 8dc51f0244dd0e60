// crates/ports/src/filesystem.rs
use std::{
    fs,
    io::{self, Cursor},
    path::Path,
};

use simple_file_io_shared_kernel::AccessMode;

/// Descriptor-level operations used by readers and writers.
///
/// `read` returns `Ok(0)` at end-of-file; `write` may report fewer bytes
/// than requested. Seeking is only required for sized bulk reads.
pub trait RawFile: io::Read + io::Write + io::Seek {
    /// Pushes written data down to the storage device.
    fn sync_all(&mut self) -> io::Result<()>;
}

impl RawFile for fs::File {
    fn sync_all(&mut self) -> io::Result<()> {
        fs::File::sync_all(self)
    }
}

impl RawFile for Cursor<Vec<u8>> {
    fn sync_all(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<F: RawFile + ?Sized> RawFile for Box<F> {
    fn sync_all(&mut self) -> io::Result<()> {
        (**self).sync_all()
    }
}

/// Port for acquiring descriptors.
pub trait FileSystem {
    type File: RawFile;

    /// Opens `path` for `access`.
    ///
    /// `Read` requires the file to exist. `Write` creates or truncates.
    /// `Append` creates or extends, with every write landing at the end.
    fn open(&self, path: &Path, access: AccessMode) -> io::Result<Self::File>;

    /// Existence query independent of any open handle.
    fn exists(&self, path: &Path) -> bool;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    type File = T::File;

    fn open(&self, path: &Path, access: AccessMode) -> io::Result<Self::File> {
        (**self).open(path, access)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}
