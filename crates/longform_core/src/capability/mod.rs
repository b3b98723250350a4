//! Write-capability model for permission-gated file destinations.
//!
//! # Responsibility
//! - Define the three-way interactive acquisition outcome.
//! - Define the host, directory and file capability contracts.
//! - Own the per-article capability cache and its durable name mapping.
//!
//! # Invariants
//! - Cancellation is a first-class outcome, never an error.
//! - Capabilities are session-scoped and deliberately non-serializable;
//!   only display names survive a session boundary.

use std::io;

pub mod cache;
pub mod fs_host;

pub use cache::{CapabilityCache, FILE_NAMES_SLOT};
pub use fs_host::{FsCapabilityHost, FsDirectoryCapability, FsWriteCapability};

/// Outcome of one interactive capability acquisition.
///
/// Cancellation and host-side unavailability are modeled as values so the
/// publish flow can treat them as ordinary, testable control flow.
#[derive(Debug)]
pub enum Acquisition<T> {
    /// The user granted a capability.
    Acquired(T),
    /// The user dismissed the picker. Benign, never logged as an error.
    Cancelled,
    /// The host does not expose the required picker.
    Unavailable,
}

/// Session-scoped permission to write one destination file.
pub trait WriteCapability {
    /// User-facing name of the destination, typically the file name.
    fn display_name(&self) -> &str;
    /// Writes the full serialized content, replacing prior content, and
    /// flushes before returning.
    fn write_all(&mut self, contents: &str) -> io::Result<()>;
}

/// Permission to create named files inside one granted directory.
pub trait DirectoryCapability {
    fn display_name(&self) -> &str;
    /// Opens (creating or truncating) a write capability for `file_name`
    /// inside the granted directory.
    fn create_file(&self, file_name: &str) -> io::Result<Box<dyn WriteCapability>>;
}

/// Host-provided interactive acquisition entry points.
///
/// Either picker may be missing depending on host support, and either may
/// be cancelled by the user.
pub trait CapabilityHost {
    /// Whether the host can ask the user for a destination directory.
    fn directory_picker_available(&self) -> bool;
    /// Whether the host can ask the user for a single existing file.
    fn file_picker_available(&self) -> bool;
    /// Interactively requests a destination directory for first-time
    /// publishing.
    fn pick_directory(&mut self) -> Acquisition<Box<dyn DirectoryCapability>>;
    /// Interactively requests the target file for an update. `name_hint`
    /// carries the remembered display name from an earlier session, when
    /// one exists.
    fn pick_file(&mut self, name_hint: Option<&str>) -> Acquisition<Box<dyn WriteCapability>>;
}
