//! Campaign Directory Cache
//!
//! Memoizes the campaign list so settings and product screens do not
//! refetch on every render. An entry is valid only while unexpired and
//! while the API key it was fetched with is still the current one, so a
//! key change invalidates implicitly. Concurrent refetches are harmless;
//! the last write wins.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

/// How long a fetched directory stays valid, in seconds.
///
/// One hour: long enough that an admin paging through product screens
/// reuses one fetch, short enough that campaigns created on the provider
/// show up the same day.
pub const CACHE_TTL_SECS: i64 = 60 * 60;

struct Entry {
    campaigns: HashMap<String, String>,
    key_fingerprint: u64,
    fetched_at: DateTime<Utc>,
}

/// TTL-bounded memo of one "list campaigns" response
pub struct CampaignCache {
    entry: RwLock<Option<Entry>>,
}

impl Default for CampaignCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CampaignCache {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
        }
    }

    /// Cached directory for the given key, `None` on miss, expiry, or a
    /// key that differs from the one the entry was fetched with
    pub fn get(&self, api_key: &str) -> Option<HashMap<String, String>> {
        let guard = self.entry.read().unwrap();
        let entry = guard.as_ref()?;

        if entry.key_fingerprint != fingerprint(api_key) {
            return None;
        }

        if Utc::now() - entry.fetched_at >= Duration::seconds(CACHE_TTL_SECS) {
            return None;
        }

        Some(entry.campaigns.clone())
    }

    /// Store a freshly fetched directory. Failures are never stored.
    pub fn store(&self, api_key: &str, campaigns: HashMap<String, String>) {
        *self.entry.write().unwrap() = Some(Entry {
            campaigns,
            key_fingerprint: fingerprint(api_key),
            fetched_at: Utc::now(),
        });
    }

    /// Drop the cached directory; the next read refetches
    pub fn invalidate(&self) {
        *self.entry.write().unwrap() = None;
    }

    /// Rewind the entry's fetch time, to exercise expiry in tests
    #[cfg(test)]
    fn backdate(&self, seconds: i64) {
        if let Some(entry) = self.entry.write().unwrap().as_mut() {
            entry.fetched_at -= Duration::seconds(seconds);
        }
    }
}

fn fingerprint(api_key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    api_key.hash(&mut hasher);
    hasher.finish()
}
