//! Keyed query cache with explicit invalidation.
//!
//! # Design
//! The cache is a plain value owned by whoever builds the sync layer and
//! shared through `Arc`, so every test gets its own instance. Each key holds
//! at most one entry. Fetches are tracked with tickets carrying a per-entry
//! logical clock: a fetch that started before the last settled one is
//! discarded when it finishes, and an invalidation that lands while a fetch
//! is in flight keeps the entry stale after that fetch settles.
//!
//! State changes are published on a broadcast channel so a renderer (or a
//! test) can observe invalidations without polling.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Address of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey(&'static str);

impl QueryKey {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Published whenever an entry changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// The entry was marked stale and should be re-fetched.
    Invalidated(QueryKey),
    /// A fetch finished and its result was stored.
    Settled(QueryKey),
}

/// What a reader sees for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus<T> {
    /// No fetch has settled yet.
    Loading,
    /// The last settled fetch failed.
    Failed(String),
    /// Data from the last successful fetch. `stale` means a re-fetch is due.
    Ready { data: T, stale: bool },
}

impl<T> QueryStatus<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryStatus::Ready { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Handed out by [`QueryCache::begin_fetch`] and returned on settle.
#[derive(Debug)]
#[must_use = "a fetch ticket must be settled with resolve or reject"]
pub struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> QueryKey {
        self.key
    }
}

#[derive(Debug)]
struct Entry<T> {
    data: Option<T>,
    error: Option<String>,
    stale: bool,
    clock: u64,
    settled_at: u64,
    invalidated_at: u64,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            stale: true,
            clock: 0,
            settled_at: 0,
            invalidated_at: 0,
        }
    }
}

impl<T> Entry<T> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Record a settle for `generation`. Returns false when a newer fetch has
    /// already settled.
    fn settle(&mut self, generation: u64) -> bool {
        if generation <= self.settled_at {
            return false;
        }
        self.settled_at = generation;
        true
    }
}

pub struct QueryCache<T> {
    entries: RwLock<HashMap<QueryKey, Entry<T>>>,
    events: broadcast::Sender<CacheEvent>,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for QueryCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("keys", &self.entries.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> QueryCache<T> {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// True when the key has never settled successfully or has been
    /// invalidated since.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.read().get(key).map_or(true, |entry| entry.stale)
    }

    /// Mark the entry stale and publish [`CacheEvent::Invalidated`].
    pub fn invalidate(&self, key: &QueryKey) {
        {
            let mut entries = self.entries.write();
            let entry = entries.entry(*key).or_default();
            entry.invalidated_at = entry.tick();
            entry.stale = true;
        }
        let _ = self.events.send(CacheEvent::Invalidated(*key));
    }

    pub fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        let mut entries = self.entries.write();
        let generation = entries.entry(*key).or_default().tick();
        FetchTicket {
            key: *key,
            generation,
        }
    }

    /// Store a successful result. Returns false if a newer fetch already
    /// settled, in which case `data` is dropped.
    pub fn resolve(&self, ticket: FetchTicket, data: T) -> bool {
        let applied = {
            let mut entries = self.entries.write();
            let entry = entries.entry(ticket.key).or_default();
            if entry.settle(ticket.generation) {
                entry.data = Some(data);
                entry.error = None;
                entry.stale = entry.invalidated_at > ticket.generation;
                true
            } else {
                false
            }
        };
        if applied {
            let _ = self.events.send(CacheEvent::Settled(ticket.key));
        }
        applied
    }

    /// Store a failed result. The entry stays stale so the next read
    /// re-fetches.
    pub fn reject(&self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        let applied = {
            let mut entries = self.entries.write();
            let entry = entries.entry(ticket.key).or_default();
            if entry.settle(ticket.generation) {
                entry.error = Some(message.into());
                entry.stale = true;
                true
            } else {
                false
            }
        };
        if applied {
            let _ = self.events.send(CacheEvent::Settled(ticket.key));
        }
        applied
    }
}

impl<T: Clone> QueryCache<T> {
    pub fn status(&self, key: &QueryKey) -> QueryStatus<T> {
        let entries = self.entries.read();
        let Some(entry) = entries.get(key) else {
            return QueryStatus::Loading;
        };
        if let Some(error) = &entry.error {
            return QueryStatus::Failed(error.clone());
        }
        match &entry.data {
            Some(data) => QueryStatus::Ready {
                data: data.clone(),
                stale: entry.stale,
            },
            None => QueryStatus::Loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: QueryKey = QueryKey::new("numbers");
    const OTHER: QueryKey = QueryKey::new("letters");

    #[test]
    fn unknown_key_is_loading_and_stale() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new();
        assert_eq!(cache.status(&KEY), QueryStatus::Loading);
        assert!(cache.is_stale(&KEY));
    }

    #[test]
    fn resolve_stores_fresh_data() {
        let cache = QueryCache::new();
        let ticket = cache.begin_fetch(&KEY);
        assert!(cache.resolve(ticket, vec![1, 2]));
        assert_eq!(
            cache.status(&KEY),
            QueryStatus::Ready {
                data: vec![1, 2],
                stale: false
            }
        );
        assert!(!cache.is_stale(&KEY));
    }

    #[test]
    fn invalidate_keeps_previous_data_visible() {
        let cache = QueryCache::new();
        let ticket = cache.begin_fetch(&KEY);
        cache.resolve(ticket, vec![1]);

        cache.invalidate(&KEY);
        assert!(cache.is_stale(&KEY));
        assert_eq!(
            cache.status(&KEY),
            QueryStatus::Ready {
                data: vec![1],
                stale: true
            }
        );
    }

    #[test]
    fn invalidate_only_touches_its_key() {
        let cache = QueryCache::new();
        for key in [KEY, OTHER] {
            let ticket = cache.begin_fetch(&key);
            cache.resolve(ticket, vec![0]);
        }
        cache.invalidate(&OTHER);
        assert!(!cache.is_stale(&KEY));
        assert!(cache.is_stale(&OTHER));
    }

    #[test]
    fn older_fetch_settling_late_is_discarded() {
        let cache = QueryCache::new();
        let slow = cache.begin_fetch(&KEY);
        let fast = cache.begin_fetch(&KEY);

        assert!(cache.resolve(fast, vec![2]));
        assert!(!cache.resolve(slow, vec![1]));
        assert_eq!(cache.status(&KEY).data(), Some(&vec![2]));
    }

    #[test]
    fn older_failure_does_not_hide_newer_data() {
        let cache = QueryCache::new();
        let slow = cache.begin_fetch(&KEY);
        let fast = cache.begin_fetch(&KEY);

        cache.resolve(fast, vec![2]);
        assert!(!cache.reject(slow, "boom"));
        assert_eq!(cache.status(&KEY).data(), Some(&vec![2]));
    }

    #[test]
    fn invalidation_during_fetch_leaves_entry_stale() {
        let cache = QueryCache::new();
        let ticket = cache.begin_fetch(&KEY);
        cache.invalidate(&KEY);
        cache.resolve(ticket, vec![1]);

        assert!(cache.is_stale(&KEY));
        assert_eq!(
            cache.status(&KEY),
            QueryStatus::Ready {
                data: vec![1],
                stale: true
            }
        );
    }

    #[test]
    fn reject_reports_failure_and_stays_stale() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new();
        let ticket = cache.begin_fetch(&KEY);
        cache.resolve(ticket, vec![1]);

        let ticket = cache.begin_fetch(&KEY);
        assert!(cache.reject(ticket, "Network response was not ok"));
        assert_eq!(
            cache.status(&KEY),
            QueryStatus::Failed("Network response was not ok".to_string())
        );
        assert!(cache.is_stale(&KEY));

        let ticket = cache.begin_fetch(&KEY);
        cache.resolve(ticket, vec![3]);
        assert_eq!(cache.status(&KEY).data(), Some(&vec![3]));
    }

    #[test]
    fn events_are_published_in_order() {
        let cache = QueryCache::new();
        let mut events = cache.subscribe();

        let ticket = cache.begin_fetch(&KEY);
        cache.resolve(ticket, vec![1]);
        cache.invalidate(&KEY);

        assert_eq!(events.try_recv().unwrap(), CacheEvent::Settled(KEY));
        assert_eq!(events.try_recv().unwrap(), CacheEvent::Invalidated(KEY));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn discarded_settle_publishes_nothing() {
        let cache = QueryCache::new();
        let slow = cache.begin_fetch(&KEY);
        let fast = cache.begin_fetch(&KEY);
        cache.resolve(fast, vec![2]);

        let mut events = cache.subscribe();
        cache.resolve(slow, vec![1]);
        assert!(events.try_recv().is_err());
    }
}
