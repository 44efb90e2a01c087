//! Two-tier cache of per-variant library snapshots.
//!
//! The memory tier is a plain map owned by [`LibraryCache`]; the persistent
//! tier is whatever [`SessionBackend`] the cache was built with (session
//! storage in the browser). Writes go to both tiers. Persistent failures are
//! logged and otherwise ignored: the cache is only ever a shortcut in front of
//! the server.

use crate::models::{CachedLibraryState, ViewVariant};
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("session storage is unavailable")]
    Unavailable,

    #[error("failed to read '{key}' from session storage")]
    Read { key: String },

    #[error("failed to write '{key}' to session storage")]
    Write { key: String },
}

/// Key-value store that survives reloads within one browser session.
pub trait SessionBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: SessionBackend + ?Sized> SessionBackend for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

impl<T: Clock + ?Sized> Clock for Rc<T> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

pub struct LibraryCache {
    memory: RefCell<HashMap<ViewVariant, CachedLibraryState>>,
    session: Box<dyn SessionBackend>,
    clock: Box<dyn Clock>,
    ttl: Duration,
}

impl std::fmt::Debug for LibraryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryCache")
            .field("memory_entries", &self.memory.borrow().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl LibraryCache {
    pub fn new(session: impl SessionBackend + 'static, clock: impl Clock + 'static) -> Self {
        Self::with_ttl(session, clock, CACHE_TTL)
    }

    pub fn with_ttl(
        session: impl SessionBackend + 'static,
        clock: impl Clock + 'static,
        ttl: Duration,
    ) -> Self {
        Self {
            memory: RefCell::new(HashMap::new()),
            session: Box::new(session),
            clock: Box::new(clock),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Entries stamped in the future count as stale, as do corrupted stamps.
    fn is_fresh(&self, entry: &CachedLibraryState, now: i64) -> bool {
        let ttl = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let age = now.saturating_sub(entry.cached_at);
        (0..ttl).contains(&age)
    }

    /// Returns the fresh snapshot for `variant`, if any.
    ///
    /// A fresh persistent entry is promoted into memory; a stale one is
    /// removed so it is not decoded again.
    pub fn read(&self, variant: ViewVariant) -> Option<CachedLibraryState> {
        let now = self.clock.now_millis();

        {
            let mut memory = self.memory.borrow_mut();
            if let Some(entry) = memory.get(&variant) {
                if self.is_fresh(entry, now) {
                    return Some(entry.clone());
                }
                debug!("Memory cache entry for {:?} expired", variant);
                memory.remove(&variant);
            }
        }

        let entry = self.read_persisted(variant)?;
        if self.is_fresh(&entry, now) {
            self.memory.borrow_mut().insert(variant, entry.clone());
            Some(entry)
        } else {
            debug!("Session cache entry for {:?} expired", variant);
            self.remove_persisted(variant);
            None
        }
    }

    fn read_persisted(&self, variant: ViewVariant) -> Option<CachedLibraryState> {
        let key = variant.cache_key();
        let raw = match self.session.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                debug!("Session cache read skipped: {e}");
                return None;
            }
        };

        match serde_json::from_str::<CachedLibraryState>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Discarding unreadable cache entry '{key}': {e}");
                self.remove_persisted(variant);
                None
            }
        }
    }

    fn remove_persisted(&self, variant: ViewVariant) {
        if let Err(e) = self.session.remove_item(variant.cache_key()) {
            debug!("Session cache remove skipped: {e}");
        }
    }

    /// Stores `snapshot` in both tiers, stamped with the current time.
    pub fn write(&self, variant: ViewVariant, mut snapshot: CachedLibraryState) {
        snapshot.cached_at = self.clock.now_millis();

        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(e) = self.session.set_item(variant.cache_key(), &raw) {
                    debug!("Session cache write skipped: {e}");
                }
            }
            Err(e) => debug!("Failed to encode cache entry: {e}"),
        }

        self.memory.borrow_mut().insert(variant, snapshot);
    }

    pub fn clear(&self, variant: ViewVariant) {
        self.memory.borrow_mut().remove(&variant);
        self.remove_persisted(variant);
    }

    /// Drops both variants from both tiers.
    pub fn clear_library_caches(&self) {
        for variant in ViewVariant::all_variants() {
            self.clear(variant);
        }
    }
}
