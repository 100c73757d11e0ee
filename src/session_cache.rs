// Per-session room catalogs
// Availability is drawn once per catalog; keeping one catalog per visitor
// session means every interaction in that session sees the same rooms.
// Idle sessions release their catalog, and the map never holds more than
// `max_sessions` catalogs.

use crate::catalog::RoomCatalog;
use crate::config::HotelConfig;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct CatalogCacheStats {
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    expired_count: AtomicUsize,
    evicted_count: AtomicUsize,
    invalidated_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogCacheStatsReport {
    pub sessions: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub expired_count: usize,
    pub evicted_count: usize,
    pub invalidated_count: usize,
}

struct CatalogEntry {
    catalog: Arc<RoomCatalog>,
    created_at: Instant,
    last_accessed: Instant,
    ttl: Option<Duration>,
}

impl CatalogEntry {
    // Past its TTL, or untouched for longer than the idle timeout
    fn is_expired(&self, idle_timeout: Option<Duration>) -> bool {
        let outlived = self
            .ttl
            .map_or(false, |ttl| self.created_at.elapsed() > ttl);
        let idle = idle_timeout.map_or(false, |idle| self.last_accessed.elapsed() > idle);
        outlived || idle
    }
}

pub struct SessionCatalogs {
    config: HotelConfig,
    entries: DashMap<String, CatalogEntry>,
    stats: CatalogCacheStats,
}

impl SessionCatalogs {
    pub fn new(config: HotelConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
            stats: CatalogCacheStats::default(),
        }
    }

    pub fn config(&self) -> &HotelConfig {
        &self.config
    }

    /// Catalog for `session_id`, generated on first use and reused until the
    /// session is invalidated, evicted, idle for `session_idle_seconds` or its
    /// catalog outlives `catalog_ttl_seconds`.
    pub fn get_or_generate(&self, session_id: &str) -> Arc<RoomCatalog> {
        let idle_timeout = self.config.session_idle_timeout();

        if let Some(mut entry) = self.entries.get_mut(session_id) {
            if !entry.is_expired(idle_timeout) {
                entry.last_accessed = Instant::now();
                self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
                return Arc::clone(&entry.catalog);
            }
        }

        if !self.entries.contains_key(session_id) {
            self.make_room();
        }

        let mut expired = false;
        let mut generated = false;
        let catalog = {
            let mut entry = self
                .entries
                .entry(session_id.to_string())
                .or_insert_with(|| {
                    generated = true;
                    self.fresh_entry()
                });
            // Another caller may have refreshed it in between
            if !generated && entry.is_expired(idle_timeout) {
                expired = true;
                *entry = self.fresh_entry();
            }
            entry.last_accessed = Instant::now();
            Arc::clone(&entry.catalog)
        };

        if expired {
            self.stats.expired_count.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(session = session_id, "session catalog expired, regenerated");
        }
        if generated || expired {
            self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
        } else {
            self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
        }
        catalog
    }

    pub fn invalidate(&self, session_id: &str) -> bool {
        let removed = self.entries.remove(session_id).is_some();
        if removed {
            self.stats.invalidated_count.fetch_add(1, Ordering::SeqCst);
        }
        removed
    }

    // Drops every expired or idle catalog, returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let idle_timeout = self.config.session_idle_timeout();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(idle_timeout));
        let purged = before.saturating_sub(self.entries.len());
        self.stats.expired_count.fetch_add(purged, Ordering::SeqCst);
        purged
    }

    pub fn stats(&self) -> CatalogCacheStatsReport {
        CatalogCacheStatsReport {
            sessions: self.entries.len(),
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            expired_count: self.stats.expired_count.load(Ordering::SeqCst),
            evicted_count: self.stats.evicted_count.load(Ordering::SeqCst),
            invalidated_count: self.stats.invalidated_count.load(Ordering::SeqCst),
        }
    }

    // Frees a slot for a new session: expired catalogs first, then the least
    // recently used ones
    fn make_room(&self) {
        if self.entries.len() < self.config.max_sessions {
            return;
        }
        self.purge_expired();

        while self.entries.len() >= self.config.max_sessions {
            let oldest_key = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().last_accessed)
                .map(|entry| entry.key().clone());

            let Some(oldest_key) = oldest_key else {
                break;
            };
            if self.entries.remove(&oldest_key).is_some() {
                self.stats.evicted_count.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(session = %oldest_key, "evicted least recently used session catalog");
            }
        }
    }

    fn fresh_entry(&self) -> CatalogEntry {
        let now = Instant::now();
        CatalogEntry {
            catalog: Arc::new(RoomCatalog::generate(&self.config, &mut rand::thread_rng())),
            created_at: now,
            last_accessed: now,
            ttl: self.config.catalog_ttl(),
        }
    }
}
