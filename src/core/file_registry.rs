//! Path-keyed table of open log files
//!
//! At most one [`FileHandle`] is live per path in a registry. Loggers that
//! resolve to the same path share that handle and its append stream; each
//! acquisition counts as a holder, and the file is closed when the last holder
//! releases it.

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Shared, append-only writer bound to one log file
///
/// Cloning a handle is cheap and yields another reference to the same stream.
/// Each `write_str` call holds the handle's lock for the whole write and flush,
/// so lines from different writers never interleave.
#[derive(Clone)]
pub struct FileHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileHandle {
    /// Open `path` for appending, creating it if missing
    ///
    /// The returned flag is `true` when this call created the file.
    pub fn open(path: impl Into<PathBuf>) -> Result<(Self, bool)> {
        let path = path.into();
        let (file, created) = match OpenOptions::new().append(true).create_new(true).open(&path) {
            Ok(file) => (file, true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let file = OpenOptions::new().append(true).open(&path).map_err(|e| {
                    LoggerError::io_operation("opening log file", path.display().to_string(), e)
                })?;
                (file, false)
            }
            Err(e) => {
                return Err(LoggerError::io_operation(
                    "creating log file",
                    path.display().to_string(),
                    e,
                ))
            }
        };

        let handle = Self {
            inner: Arc::new(HandleInner {
                path,
                writer: Mutex::new(Some(BufWriter::new(file))),
            }),
        };
        Ok((handle, created))
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Append `text` verbatim and flush it to the file
    pub fn write_str(&self, text: &str) -> Result<()> {
        let mut guard = self.inner.writer.lock();
        let writer = guard.as_mut().ok_or_else(|| {
            LoggerError::not_open(format!("'{}' has been closed", self.inner.path.display()))
        })?;

        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::io_operation(
                    "writing log entry",
                    self.inner.path.display().to_string(),
                    e,
                )
            })
    }

    pub fn is_open(&self) -> bool {
        self.inner.writer.lock().is_some()
    }

    /// Flush and close the underlying file for every clone of this handle
    pub fn close(&self) -> Result<()> {
        if let Some(mut writer) = self.inner.writer.lock().take() {
            writer.flush().map_err(|e| {
                LoggerError::io_operation(
                    "closing log file",
                    self.inner.path.display().to_string(),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Whether both handles refer to the same open stream
    pub fn same_stream(&self, other: &FileHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.inner.path)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Where a logger wants its file, as computed from its output settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    /// Resolved output location (a directory, or the file itself)
    pub output_dir: PathBuf,
    /// Resolved path of the log file
    pub file_name: PathBuf,
    /// The output location already names a file with the active extension
    pub ends_with_ext: bool,
    /// Loggers targeting this path combine into one stream
    pub combine: bool,
}

/// Result of acquiring a handle from the registry
#[derive(Debug, Clone)]
pub struct Acquired {
    pub handle: FileHandle,
    /// The file did not exist before this acquisition
    pub created_file: bool,
    /// This acquisition created the registry entry
    pub new_entry: bool,
}

struct Entry {
    handle: FileHandle,
    holders: usize,
}

#[derive(Default)]
pub struct FileRegistry {
    open: Mutex<HashMap<PathBuf, Entry>>,
    /// Paths whose "Starting" marker was written; cleared on final release
    started: Mutex<HashSet<PathBuf>>,
}

static SHARED: OnceLock<Arc<FileRegistry>> = OnceLock::new();

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by loggers that are not given one
    pub fn shared() -> Arc<FileRegistry> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(FileRegistry::new())))
    }

    /// Prepare the output location and acquire the requested file
    ///
    /// Creates the output directory (or the file's parent directories when the
    /// output location is itself a file path) before opening.
    pub fn resolve(&self, request: &CreateRequest) -> Result<Acquired> {
        if request.output_dir.as_os_str().is_empty() {
            return Err(LoggerError::path("Output directory not specified"));
        }

        let dir = if request.ends_with_ext {
            request.file_name.parent().filter(|p| !p.as_os_str().is_empty())
        } else {
            Some(request.output_dir.as_path())
        };

        if let Some(dir) = dir {
            if !dir.is_dir() {
                fs::create_dir_all(dir).map_err(|e| {
                    LoggerError::io_operation("creating log directory", dir.display().to_string(), e)
                })?;
                tracing::debug!(dir = %dir.display(), "created log directory");
            }
        }

        self.acquire(&request.file_name)
    }

    /// Acquire the handle for `path`, opening the file on first use
    pub fn acquire(&self, path: &Path) -> Result<Acquired> {
        let mut open = self.open.lock();

        if let Some(entry) = open.get_mut(path) {
            entry.holders += 1;
            tracing::trace!(path = %path.display(), holders = entry.holders, "reusing log file handle");
            return Ok(Acquired {
                handle: entry.handle.clone(),
                created_file: false,
                new_entry: false,
            });
        }

        let (handle, created_file) = FileHandle::open(path)?;
        open.insert(
            path.to_path_buf(),
            Entry {
                handle: handle.clone(),
                holders: 1,
            },
        );
        tracing::debug!(path = %path.display(), created_file, "opened log file");

        Ok(Acquired {
            handle,
            created_file,
            new_entry: true,
        })
    }

    /// Drop one hold on `path`
    ///
    /// Returns `true` when this was the last holder and the entry was removed
    /// and its file closed. The path's marker record goes with it.
    pub fn release(&self, path: &Path) -> Result<bool> {
        let removed = {
            let mut open = self.open.lock();
            match open.get_mut(path) {
                Some(entry) if entry.holders > 1 => {
                    entry.holders -= 1;
                    tracing::trace!(path = %path.display(), holders = entry.holders, "released log file hold");
                    None
                }
                Some(_) => open.remove(path),
                None => None,
            }
        };

        match removed {
            Some(entry) => {
                tracing::debug!(path = %path.display(), "closing log file");
                self.started.lock().remove(path);
                entry.handle.close()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the entry for `path` regardless of how many holders remain
    ///
    /// The handle is returned still open; the caller decides whether to close it.
    pub fn remove(&self, path: &Path) -> Option<FileHandle> {
        self.open.lock().remove(path).map(|entry| entry.handle)
    }

    pub fn get(&self, path: &Path) -> Option<FileHandle> {
        self.open.lock().get(path).map(|entry| entry.handle.clone())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.open.lock().contains_key(path)
    }

    /// Number of holders of `path`, zero when it is not open
    pub fn holders(&self, path: &Path) -> usize {
        self.open.lock().get(path).map_or(0, |entry| entry.holders)
    }

    /// Number of open files
    pub fn len(&self) -> usize {
        self.open.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.lock().is_empty()
    }

    /// Record that the "Starting" marker was emitted for `path`
    ///
    /// Returns `false` if it already was while the file stayed open.
    pub(crate) fn mark_started(&self, path: &Path) -> bool {
        self.started.lock().insert(path.to_path_buf())
    }
}

impl fmt::Debug for FileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = self.open.lock();
        f.debug_struct("FileRegistry")
            .field("open", &open.keys().collect::<Vec<_>>())
            .finish()
    }
}
