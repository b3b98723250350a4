//! Named-slot storage contract and backends.
//!
//! # Responsibility
//! - Provide read/overwrite access to named durable slots.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `write_slot` replaces the slot body wholesale.
//! - Absent slots read as `None`, never as an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotError>;

/// Error for slot read/write operations.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Backend-specific failure, used by fakes with injected faults.
    Backend(&'static str),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "slot backend failure: {message}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage interface for named durable slots.
///
/// The seam exists so the store and the capability cache can be exercised
/// against an in-memory fake in tests; production code uses the SQLite
/// backend.
pub trait SlotStore {
    /// Reads the current body of `slot`, or `None` if never written.
    fn read_slot(&self, slot: &str) -> SlotResult<Option<String>>;
    /// Overwrites the body of `slot` wholesale.
    fn write_slot(&mut self, slot: &str, body: &str) -> SlotResult<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for &mut S {
    fn read_slot(&self, slot: &str) -> SlotResult<Option<String>> {
        (**self).read_slot(slot)
    }

    fn write_slot(&mut self, slot: &str, body: &str) -> SlotResult<()> {
        (**self).write_slot(slot, body)
    }
}

/// SQLite-backed slot storage.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn read_slot(&self, slot: &str) -> SlotResult<Option<String>> {
        let body = self
            .conn
            .query_row("SELECT body FROM slots WHERE slot = ?1;", [slot], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(body)
    }

    fn write_slot(&mut self, slot: &str, body: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO slots (slot, body, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(slot) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at;",
            params![slot, body],
        )?;
        Ok(())
    }
}

/// In-memory slot storage with injectable faults.
///
/// Used as the substitutable fake in tests and as a throwaway backend for
/// probes that need no durability.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail, simulating an unreadable mirror.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Makes every subsequent write fail, simulating a full/broken mirror.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Direct slot access for out-of-band inspection in tests.
    pub fn peek(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }
}

impl SlotStore for MemorySlotStore {
    fn read_slot(&self, slot: &str) -> SlotResult<Option<String>> {
        if self.fail_reads {
            return Err(SlotError::Backend("injected read failure"));
        }
        Ok(self.slots.get(slot).cloned())
    }

    fn write_slot(&mut self, slot: &str, body: &str) -> SlotResult<()> {
        if self.fail_writes {
            return Err(SlotError::Backend("injected write failure"));
        }
        self.slots.insert(slot.to_string(), body.to_string());
        Ok(())
    }
}
