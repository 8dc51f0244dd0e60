// crates/infra/src/filesystem.rs
use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
};

use log::debug;
use simple_file_io_ports::filesystem::FileSystem;
use simple_file_io_shared_kernel::{AccessMode, FileIoError, Result};

/// `std::fs` backend implementing the [`FileSystem`] port.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    type File = fs::File;

    fn open(&self, path: &Path, access: AccessMode) -> io::Result<fs::File> {
        let mut options = OpenOptions::new();
        match access {
            AccessMode::Read => options.read(true),
            AccessMode::Write => options.write(true).create(true).truncate(true),
            // O_APPEND: the kernel positions every write at end-of-file.
            AccessMode::Append => options.append(true).create(true),
        };
        options.open(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Opens `path` through `fs`, classifying failures into the error taxonomy.
pub(crate) fn acquire<S>(fs: &S, path: &Path, access: AccessMode) -> Result<S::File>
where
    S: FileSystem + ?Sized,
{
    match fs.open(path, access) {
        Ok(file) => {
            debug!("opened '{}' for {access}", path.display());
            Ok(file)
        }
        Err(err) => {
            debug!("failed to open '{}' for {access}: {err}", path.display());
            Err(FileIoError::from_open(path, err))
        }
    }
}
