//! Process-local TTL cache for market data, shared across analysis runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Source of the current time, injectable so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cached market data families, each with its own lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheCategory {
    /// Per-stock financial statements. Slow-moving.
    Financial,
    /// Per-stock price indicators.
    Technical,
    /// Market-wide macro indicators.
    Macro,
}

impl CacheCategory {
    #[must_use]
    pub fn ttl(self) -> Duration {
        match self {
            CacheCategory::Financial => Duration::from_secs(24 * 60 * 60),
            CacheCategory::Technical => Duration::from_secs(5 * 60),
            CacheCategory::Macro => Duration::from_secs(7 * 24 * 60 * 60),
        }
    }

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            CacheCategory::Financial => "financial",
            CacheCategory::Technical => "technical",
            CacheCategory::Macro => "macro",
        }
    }

    /// `<category>:<scope>`, where scope is a stock code or `global`.
    #[must_use]
    pub fn key(self, scope: &str) -> String {
        format!("{}:{scope}", self.prefix())
    }
}

struct Entry {
    payload: Value,
    expires_at: DateTime<Utc>,
}

/// String-keyed store whose entries expire after a per-entry TTL.
///
/// An entry is readable while `now <= expires_at`. Reading it later evicts
/// it. Values are stored as JSON so one cache can hold every metric type.
pub struct TtlCache {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    #[must_use]
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value` under `key` until `now + ttl`, replacing any prior entry.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let payload = match serde_json::to_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(key, error = %e, "value not cacheable, skipping");
                return;
            }
        };
        let now = self.clock.now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries().insert(
            key.to_string(),
            Entry {
                payload,
                expires_at,
            },
        );
    }

    /// The live value under `key`. Expired entries are evicted and read as
    /// absent; so are entries that no longer decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.entries();

        let expired = entries.get(key)?.expires_at < now;
        if expired {
            entries.remove(key);
            tracing::debug!(key, "cache entry expired");
            return None;
        }

        let payload = entries.get(key)?.payload.clone();
        drop(entries);
        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of stored entries, expired ones included until they are read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::with_system_clock()
    }
}
