//! Per-article capability cache with a durable name mapping.
//!
//! # Responsibility
//! - Cache acquired write capabilities per article identity for the
//!   session.
//! - Persist the identity -> display-name mapping across sessions.
//!
//! # Invariants
//! - A cached capability is reused for all subsequent writes to that
//!   identity within the session.
//! - The durable slot stores display names only; capabilities are never
//!   serialized. After a restart the capability must be re-acquired
//!   interactively, with the remembered name as a hint.
//! - `remember` overwrites any prior name for the identity.

use crate::capability::WriteCapability;
use crate::model::identity::ArticleId;
use crate::repo::slot_store::SlotStore;
use log::{debug, error, warn};
use std::collections::{BTreeMap, HashMap};

/// Durable slot holding the serialized identity -> file-name mapping.
pub const FILE_NAMES_SLOT: &str = "article-file-names";

/// Session capability cache, mirrored to durable storage as names only.
///
/// Constructed once per application session and passed to the publish flow
/// explicitly; there is no global instance.
pub struct CapabilityCache<S: SlotStore> {
    slots: S,
    session: HashMap<ArticleId, Box<dyn WriteCapability>>,
}

impl<S: SlotStore> CapabilityCache<S> {
    pub fn new(slots: S) -> Self {
        Self {
            slots,
            session: HashMap::new(),
        }
    }

    /// Returns the capability acquired for `id` this session, if any.
    pub fn get(&mut self, id: &ArticleId) -> Option<&mut Box<dyn WriteCapability>> {
        self.session.get_mut(id)
    }

    /// Stores an acquired capability and persists its display name.
    ///
    /// The durable write replaces the whole mapping slot. A failed durable
    /// write is logged and does not evict the session entry.
    pub fn remember(
        &mut self,
        id: &ArticleId,
        capability: Box<dyn WriteCapability>,
        display_name: &str,
    ) {
        let mut names = self.read_names();
        names.insert(id.to_string(), display_name.to_string());

        match serde_json::to_string(&names) {
            Ok(body) => {
                if let Err(err) = self.slots.write_slot(FILE_NAMES_SLOT, &body) {
                    error!("event=names_write module=capability status=error id={id} error={err}");
                }
            }
            Err(err) => {
                error!("event=names_serialize module=capability status=error id={id} error={err}");
            }
        }

        debug!("event=capability_remember module=capability status=ok id={id} name={display_name}");
        self.session.insert(id.clone(), capability);
    }

    /// Returns the display name remembered for `id`, across sessions.
    pub fn remembered_name(&self, id: &ArticleId) -> Option<String> {
        self.read_names().get(&id.to_string()).cloned()
    }

    fn read_names(&self) -> BTreeMap<String, String> {
        let body = match self.slots.read_slot(FILE_NAMES_SLOT) {
            Ok(Some(body)) => body,
            Ok(None) => return BTreeMap::new(),
            Err(err) => {
                error!("event=names_read module=capability status=error error={err}");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&body) {
            Ok(names) => names,
            Err(err) => {
                warn!("event=names_parse module=capability status=error error={err}");
                BTreeMap::new()
            }
        }
    }
}
