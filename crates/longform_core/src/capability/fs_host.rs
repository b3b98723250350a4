//! Filesystem-backed capability implementations.
//!
//! # Responsibility
//! - Ground the capability contracts against `std::fs` for host embeddings
//!   that resolve destinations to local paths.
//!
//! # Invariants
//! - `FsWriteCapability::write_all` replaces the file content wholesale.

use super::{Acquisition, CapabilityHost, DirectoryCapability, WriteCapability};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write capability for one local file path.
#[derive(Debug)]
pub struct FsWriteCapability {
    path: PathBuf,
    display_name: String,
}

impl FsWriteCapability {
    pub fn new(path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, display_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WriteCapability for FsWriteCapability {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn write_all(&mut self, contents: &str) -> io::Result<()> {
        // fs::write opens with truncation and closes on return, which gives
        // the full replace-and-flush contract in one call.
        fs::write(&self.path, contents)
    }
}

/// Directory capability for one granted local directory.
#[derive(Debug)]
pub struct FsDirectoryCapability {
    dir: PathBuf,
    display_name: String,
}

impl FsDirectoryCapability {
    pub fn new(dir: PathBuf) -> Self {
        let display_name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.to_string_lossy().into_owned());
        Self { dir, display_name }
    }
}

impl DirectoryCapability for FsDirectoryCapability {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn create_file(&self, file_name: &str) -> io::Result<Box<dyn WriteCapability>> {
        Ok(Box::new(FsWriteCapability::new(self.dir.join(file_name))))
    }
}

/// Non-interactive host resolving both pickers against one export
/// directory.
///
/// Embeddings without a real picker UI configure the destination up front;
/// an unconfigured host reports both pickers unavailable. File picks
/// require a name hint (a remembered file name) and report cancellation
/// otherwise, mirroring a user who closes a picker they cannot answer.
#[derive(Debug, Default)]
pub struct FsCapabilityHost {
    export_dir: Option<PathBuf>,
}

impl FsCapabilityHost {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            export_dir: Some(export_dir),
        }
    }

    pub fn unconfigured() -> Self {
        Self::default()
    }
}

impl CapabilityHost for FsCapabilityHost {
    fn directory_picker_available(&self) -> bool {
        self.export_dir.is_some()
    }

    fn file_picker_available(&self) -> bool {
        self.export_dir.is_some()
    }

    fn pick_directory(&mut self) -> Acquisition<Box<dyn DirectoryCapability>> {
        match &self.export_dir {
            Some(dir) => Acquisition::Acquired(Box::new(FsDirectoryCapability::new(dir.clone()))),
            None => Acquisition::Unavailable,
        }
    }

    fn pick_file(&mut self, name_hint: Option<&str>) -> Acquisition<Box<dyn WriteCapability>> {
        let Some(dir) = &self.export_dir else {
            return Acquisition::Unavailable;
        };
        match name_hint {
            Some(name) => Acquisition::Acquired(Box::new(FsWriteCapability::new(dir.join(name)))),
            None => Acquisition::Cancelled,
        }
    }
}
