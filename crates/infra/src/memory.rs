// crates/infra/src/memory.rs
//! In-memory backend for exercising readers and writers without touching disk.

use std::{
    collections::{HashMap, HashSet},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use simple_file_io_ports::filesystem::{FileSystem, RawFile};
use simple_file_io_shared_kernel::AccessMode;

type Contents = Arc<Mutex<Vec<u8>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Map of paths to shared byte vectors implementing the [`FileSystem`] port.
///
/// Paths are compared literally with no normalization. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, Contents>>>,
    denied: Arc<Mutex<HashSet<PathBuf>>>,
    opens: Arc<AtomicUsize>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        lock(&self.files)
            .insert(path.as_ref().to_path_buf(), Arc::new(Mutex::new(contents.into())));
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        lock(&self.files).get(path.as_ref()).map(|data| lock(data).clone())
    }

    /// Makes every later open of `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: impl AsRef<Path>) {
        lock(&self.denied).insert(path.as_ref().to_path_buf());
    }

    /// Number of `open` calls seen, successful or not.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }
}

impl FileSystem for MemoryFileSystem {
    type File = MemoryFile;

    fn open(&self, path: &Path, access: AccessMode) -> io::Result<MemoryFile> {
        self.opens.fetch_add(1, Ordering::Relaxed);
        if lock(&self.denied).contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }

        let mut files = lock(&self.files);
        let data = match access {
            AccessMode::Read => files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?,
            AccessMode::Write => {
                let data = files.entry(path.to_path_buf()).or_default().clone();
                lock(&data).clear();
                data
            }
            AccessMode::Append => files.entry(path.to_path_buf()).or_default().clone(),
        };
        Ok(MemoryFile { data, pos: 0, access })
    }

    fn exists(&self, path: &Path) -> bool {
        lock(&self.files).contains_key(path)
    }
}

/// Descriptor over one entry of a [`MemoryFileSystem`].
#[derive(Debug)]
pub struct MemoryFile {
    data: Contents,
    pos: u64,
    access: AccessMode,
}

impl MemoryFile {
    fn position(&self) -> usize {
        usize::try_from(self.pos).unwrap_or(usize::MAX)
    }
}

impl Read for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.access.is_read() {
            return Err(io::Error::other("descriptor not open for reading"));
        }
        let data = lock(&self.data);
        let start = self.position().min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        drop(data);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.access.is_write() {
            return Err(io::Error::other("descriptor not open for writing"));
        }
        let mut data = lock(&self.data);
        if self.access == AccessMode::Append {
            self.pos = data.len() as u64;
        }
        let start = self.position();
        let end = start + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(buf);
        self.pos = end as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = lock(&self.data).len() as i128;
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::End(delta) => len + i128::from(delta),
            SeekFrom::Current(delta) => i128::from(self.pos) + i128::from(delta),
        };
        self.pos = u64::try_from(target).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of file")
        })?;
        Ok(self.pos)
    }
}

impl RawFile for MemoryFile {
    fn sync_all(&mut self) -> io::Result<()> {
        Ok(())
    }
}
