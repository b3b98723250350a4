//! Publish/update orchestration over interactive write capabilities.
//!
//! # Responsibility
//! - Validate, serialize and write an edit buffer to a user-granted file
//!   destination.
//! - Reuse session capabilities silently; fall back to interactive
//!   re-acquisition with the remembered name as a hint.
//!
//! # Invariants
//! - A validation failure or cancellation performs zero writes.
//! - Cancellation is reported as `PublishOutcome::Cancelled`, never logged
//!   as an error.
//! - A successful write always updates the capability cache before
//!   reporting `Done`.
//! - One `Publisher` handles one request at a time; the exclusive borrows
//!   on cache and host make a second in-flight request for the same
//!   identity inexpressible.

use crate::capability::{Acquisition, CapabilityCache, CapabilityHost};
use crate::frontmatter;
use crate::model::article::{Article, EditBuffer, ValidationError};
use crate::model::identity::ArticleId;
use crate::outline::slugify;
use crate::repo::slot_store::SlotStore;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Terminal outcome of one publish or update request.
#[derive(Debug)]
pub enum PublishOutcome {
    /// Content was written and the capability cached.
    Done { file_name: String },
    /// Required fields were violated; nothing was written.
    Invalid(Vec<ValidationError>),
    /// The user dismissed the interactive picker. Benign.
    Cancelled,
    /// The operation failed and was reported to the user.
    Failed(PublishError),
}

impl PublishOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Failure reported from a publish or update request.
#[derive(Debug)]
pub enum PublishError {
    /// Update was requested for a buffer with no identity.
    MissingIdentity,
    /// The host lacks the named interactive picker.
    CapabilityUnavailable(&'static str),
    /// Destination write failed.
    Io(io::Error),
}

impl Display for PublishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentity => {
                write!(f, "update requires an article identity")
            }
            Self::CapabilityUnavailable(picker) => {
                write!(f, "host does not support the {picker}")
            }
            Self::Io(err) => write!(f, "destination write failed: {err}"),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PublishError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Publish/update orchestrator.
///
/// An explicit context object with session lifetime: it borrows the
/// capability cache and the interactive host instead of reaching for any
/// process-wide state.
pub struct Publisher<'a, S: SlotStore> {
    cache: &'a mut CapabilityCache<S>,
    host: &'a mut dyn CapabilityHost,
}

impl<'a, S: SlotStore> Publisher<'a, S> {
    pub fn new(cache: &'a mut CapabilityCache<S>, host: &'a mut dyn CapabilityHost) -> Self {
        Self { cache, host }
    }

    /// First-time write of a buffer to a freshly picked destination
    /// directory.
    ///
    /// A buffer without identity is assigned the file-origin identity
    /// derived from the destination file name, so a later scan of that file
    /// recovers the same mapping.
    pub fn publish(&mut self, buffer: &EditBuffer) -> PublishOutcome {
        info!("event=publish module=publish status=validating");
        if let Err(errors) = buffer.draft.validate() {
            info!(
                "event=publish module=publish status=invalid violations={}",
                errors.len()
            );
            return PublishOutcome::Invalid(errors);
        }

        if !self.host.directory_picker_available() {
            error!("event=publish module=publish status=failed error=no_directory_picker");
            return PublishOutcome::Failed(PublishError::CapabilityUnavailable(
                "directory picker",
            ));
        }

        info!("event=publish module=publish status=acquiring");
        let directory = match self.host.pick_directory() {
            Acquisition::Acquired(directory) => directory,
            Acquisition::Cancelled => {
                info!("event=publish module=publish status=aborted");
                return PublishOutcome::Cancelled;
            }
            Acquisition::Unavailable => {
                error!("event=publish module=publish status=failed error=no_directory_picker");
                return PublishOutcome::Failed(PublishError::CapabilityUnavailable(
                    "directory picker",
                ));
            }
        };

        let file_name = export_file_name(buffer);
        let id = buffer
            .id
            .clone()
            .unwrap_or_else(|| ArticleId::derive(&file_name));
        let article = Article::from_draft(id.clone(), buffer.draft.clone());
        let serialized = frontmatter::serialize(&article);

        info!("event=publish module=publish status=writing id={id} file={file_name}");
        let mut capability = match directory.create_file(&file_name) {
            Ok(capability) => capability,
            Err(err) => {
                error!("event=publish module=publish status=failed id={id} error={err}");
                return PublishOutcome::Failed(PublishError::Io(err));
            }
        };
        if let Err(err) = capability.write_all(&serialized) {
            error!("event=publish module=publish status=failed id={id} error={err}");
            return PublishOutcome::Failed(PublishError::Io(err));
        }

        self.cache.remember(&id, capability, &file_name);
        info!("event=publish module=publish status=done id={id} file={file_name}");
        PublishOutcome::Done { file_name }
    }

    /// Subsequent write for a buffer that already has an identity.
    ///
    /// Reuses the session capability silently when one exists; otherwise
    /// asks the user to pick the target file, hinted with the remembered
    /// display name.
    pub fn update(&mut self, buffer: &EditBuffer) -> PublishOutcome {
        let Some(id) = buffer.id.clone() else {
            error!("event=update module=publish status=failed error=missing_identity");
            return PublishOutcome::Failed(PublishError::MissingIdentity);
        };

        info!("event=update module=publish status=validating id={id}");
        if let Err(errors) = buffer.draft.validate() {
            info!(
                "event=update module=publish status=invalid id={id} violations={}",
                errors.len()
            );
            return PublishOutcome::Invalid(errors);
        }

        if !self.host.file_picker_available() {
            error!("event=update module=publish status=failed id={id} error=no_file_picker");
            return PublishOutcome::Failed(PublishError::CapabilityUnavailable("file picker"));
        }

        let article = Article::from_draft(id.clone(), buffer.draft.clone());
        let serialized = frontmatter::serialize(&article);

        // Silent path: a capability acquired earlier this session is reused
        // without any user interaction.
        if let Some(capability) = self.cache.get(&id) {
            info!("event=update module=publish status=writing id={id} silent=true");
            if let Err(err) = capability.write_all(&serialized) {
                error!("event=update module=publish status=failed id={id} error={err}");
                return PublishOutcome::Failed(PublishError::Io(err));
            }
            let file_name = capability.display_name().to_string();
            info!("event=update module=publish status=done id={id} file={file_name}");
            return PublishOutcome::Done { file_name };
        }

        let remembered = self.cache.remembered_name(&id);
        info!("event=update module=publish status=acquiring id={id}");
        let mut capability = match self.host.pick_file(remembered.as_deref()) {
            Acquisition::Acquired(capability) => capability,
            Acquisition::Cancelled => {
                info!("event=update module=publish status=aborted id={id}");
                return PublishOutcome::Cancelled;
            }
            Acquisition::Unavailable => {
                error!("event=update module=publish status=failed id={id} error=no_file_picker");
                return PublishOutcome::Failed(PublishError::CapabilityUnavailable(
                    "file picker",
                ));
            }
        };

        info!("event=update module=publish status=writing id={id} silent=false");
        if let Err(err) = capability.write_all(&serialized) {
            error!("event=update module=publish status=failed id={id} error={err}");
            return PublishOutcome::Failed(PublishError::Io(err));
        }

        // Keep the previously remembered name when one exists; otherwise
        // remember the freshly picked file's name.
        let file_name = remembered.unwrap_or_else(|| capability.display_name().to_string());
        self.cache.remember(&id, capability, &file_name);
        info!("event=update module=publish status=done id={id} file={file_name}");
        PublishOutcome::Done { file_name }
    }
}

/// Derives the destination file name from buffer metadata.
///
/// Date-and-title based, with a fixed fallback for titles that slugify to
/// nothing. Destinations are collision-tolerant: picking the same name
/// twice overwrites the earlier export.
pub fn export_file_name(buffer: &EditBuffer) -> String {
    let slug = slugify(&buffer.draft.title);
    if slug.is_empty() {
        format!("{}-untitled.md", buffer.draft.date)
    } else {
        format!("{}-{slug}.md", buffer.draft.date)
    }
}
