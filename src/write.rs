//! Defines [`Writer`], through which every change to the output tree goes.
//! A dry-run [`Writer`] logs what it would do and leaves the filesystem
//! alone.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes files and directories into the output tree.
pub struct Writer {
    /// Whether to skip every filesystem change.
    dry_run: bool,

    /// Directories already created during this run.
    seen_dirs: RefCell<HashSet<PathBuf>>,
}

impl Writer {
    pub fn new(dry_run: bool) -> Writer {
        Writer {
            dry_run,
            seen_dirs: RefCell::new(HashSet::new()),
        }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Creates `dir` and any missing parents.
    pub fn create_dir(&self, dir: &Path) -> Result<()> {
        if !self.seen_dirs.borrow_mut().insert(dir.to_owned()) {
            return Ok(());
        }
        info!(path = %dir.display(), dry_run = self.dry_run, "creating directory");
        if self.dry_run {
            return Ok(());
        }
        std::fs::create_dir_all(dir).map_err(|err| Error::Io {
            path: dir.to_owned(),
            err,
        })
    }

    /// Writes `contents` to `path`, creating parent directories first.
    pub fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.create_parent(path)?;
        info!(
            path = %path.display(),
            bytes = contents.len(),
            dry_run = self.dry_run,
            "writing file"
        );
        if self.dry_run {
            return Ok(());
        }
        std::fs::write(path, contents).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })
    }

    /// Copies `from` to `to` byte for byte, creating parent directories
    /// first.
    pub fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        self.create_parent(to)?;
        info!(
            from = %from.display(),
            to = %to.display(),
            dry_run = self.dry_run,
            "copying file"
        );
        if self.dry_run {
            return Ok(());
        }
        std::fs::copy(from, to).map(|_| ()).map_err(|err| Error::Io {
            path: from.to_owned(),
            err,
        })
    }

    fn create_parent(&self, path: &Path) -> Result<()> {
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => self.create_dir(dir),
            _ => Ok(()),
        }
    }
}

/// The result of a fallible writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error writing the output tree.
#[derive(Debug)]
pub enum Error {
    /// An I/O error on the given path.
    Io { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
        }
    }
}
