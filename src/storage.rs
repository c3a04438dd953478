/// Persistent link pool on top of chrome.storage.local
///
/// Storage is the source of truth: every mutation reads the stored pool,
/// modifies it and writes it back before the in-memory mirror is touched.
use std::cell::RefCell;
use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::link_data::{Counters, LinkCandidate, LinkEntry, Source};

pub const SAVED_TABS_KEY: &str = "savedTabs";
pub const COUNTS_KEY: &str = "counts";
/// Written by older popups, only ever deleted now
pub const CURRENT_PICK_KEY: &str = "currentPick";

/// Key-value storage service (`chrome.storage.local` in the extension)
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Fetch the given keys; absent keys are missing from the returned map
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StoreError>;

    /// Write every entry of `items` in one request
    async fn set(&self, items: Map<String, Value>) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read-only view of the pool and counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolSnapshot {
    pub entries: Vec<LinkEntry>,
    pub counts: Counters,
}

impl PoolSnapshot {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e.url == url)
    }
}

/// Owner of the saved links and counters
pub struct LinkPool<S> {
    store: S,
    clock: fn() -> f64,
    mirror: RefCell<PoolSnapshot>,
}

impl<S: KeyValueStore> LinkPool<S> {
    pub fn new(store: S, clock: fn() -> f64) -> Self {
        LinkPool {
            store,
            clock,
            mirror: RefCell::new(PoolSnapshot::default()),
        }
    }

    /// Last state read from or written to storage
    pub fn snapshot(&self) -> PoolSnapshot {
        self.mirror.borrow().clone()
    }

    /// Read pool and counters, dropping any stale pick left by older versions
    pub async fn load(&self) -> Result<PoolSnapshot> {
        let data = self.store.get(&[SAVED_TABS_KEY, COUNTS_KEY, CURRENT_PICK_KEY]).await?;
        let snapshot = PoolSnapshot {
            entries: match data.get(SAVED_TABS_KEY) {
                Some(Value::Array(items)) => decode_entries(items),
                _ => Vec::new(),
            },
            counts: decode_counts(data.get(COUNTS_KEY)),
        };

        self.store.remove(CURRENT_PICK_KEY).await?;

        log::debug!("Loaded {} saved links", snapshot.entries.len());
        *self.mirror.borrow_mut() = snapshot.clone();
        Ok(snapshot)
    }

    /// Append candidates whose URL is not in the pool yet
    ///
    /// Returns how many entries were added. Duplicates, both against the
    /// pool and within `candidates`, are skipped by exact URL match.
    pub async fn merge_insert(&self, candidates: &[LinkCandidate], source: Source) -> Result<usize> {
        let mut stored = self.read_stored().await?;
        let before = stored.len();
        let now = (self.clock)();

        let mut known: HashSet<String> = stored.iter().filter_map(stored_url).map(str::to_string).collect();
        for candidate in candidates {
            if candidate.url.is_empty() || !known.insert(candidate.url.clone()) {
                continue;
            }
            let entry = LinkEntry::new(candidate.title.clone(), candidate.url.clone(), now, source);
            stored.push(serde_json::to_value(entry).map_err(|e| StoreError::Encode {
                key: SAVED_TABS_KEY.to_string(),
                message: e.to_string(),
            })?);
        }

        let added = stored.len() - before;
        self.write_stored(stored.clone()).await?;

        log::info!("Merged {} new {:?} link(s), pool size {}", added, source, stored.len());
        self.mirror.borrow_mut().entries = decode_entries(&stored);
        Ok(added)
    }

    /// Remove the entry with `url`, working from the stored pool
    pub async fn remove_by_url(&self, url: &str) -> Result<()> {
        let mut stored = self.read_stored().await?;
        stored.retain(|item| stored_url(item) != Some(url));

        self.write_stored(stored.clone()).await?;
        self.store.remove(CURRENT_PICK_KEY).await?;

        log::debug!("Removed {}, pool size {}", url, stored.len());
        self.mirror.borrow_mut().entries = decode_entries(&stored);
        Ok(())
    }

    /// Add `by` to the stored counter for `kind`
    pub async fn bump_counter(&self, kind: Source, by: u64) -> Result<Counters> {
        let data = self.store.get(&[COUNTS_KEY]).await?;
        let mut counts = decode_counts(data.get(COUNTS_KEY));
        counts.add(kind, by);

        let value = serde_json::to_value(counts).map_err(|e| StoreError::Encode {
            key: COUNTS_KEY.to_string(),
            message: e.to_string(),
        })?;
        let mut items = Map::new();
        items.insert(COUNTS_KEY.to_string(), value);
        self.store.set(items).await?;

        self.mirror.borrow_mut().counts = counts;
        Ok(counts)
    }

    /// Stored pool elements as written, including ones that no longer
    /// decode as a `LinkEntry`; those are carried through untouched
    async fn read_stored(&self) -> Result<Vec<Value>> {
        let mut data = self.store.get(&[SAVED_TABS_KEY]).await?;
        Ok(match data.remove(SAVED_TABS_KEY) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        })
    }

    async fn write_stored(&self, stored: Vec<Value>) -> Result<()> {
        let mut items = Map::new();
        items.insert(SAVED_TABS_KEY.to_string(), Value::Array(stored));
        self.store.set(items).await?;
        Ok(())
    }
}

fn stored_url(item: &Value) -> Option<&str> {
    item.get("url").and_then(Value::as_str)
}

/// Decode the readable part of the stored pool
fn decode_entries(items: &[Value]) -> Vec<LinkEntry> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<LinkEntry>(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable saved link: {}", e);
                None
            }
        })
        .collect()
}

/// Decode each counter on its own so one bad field does not reset the other
fn decode_counts(value: Option<&Value>) -> Counters {
    let field = |name: &str| {
        let raw = value.and_then(|v| v.get(name))?;
        raw.as_u64().or_else(|| {
            raw.as_f64()
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as u64)
        })
    };

    Counters {
        imported: field("imported").unwrap_or_default(),
        captured: field("captured").unwrap_or_default(),
    }
}
