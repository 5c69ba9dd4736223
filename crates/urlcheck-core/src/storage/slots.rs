//! Typed throttle slots over a `KeyValueStore`.
//!
//! Reads fail open: an unreadable store or a malformed value is reported as
//! "absent" so a broken store can never keep the input locked. Write failures
//! are logged and swallowed.

use crate::clock::Timestamp;

use super::KeyValueStore;

/// Key holding the throttle expiration (decimal ms since the epoch).
pub const EXPIRATION_KEY: &str = "throttleExpiration";
/// Key holding the request counter when counter persistence is enabled.
pub const REQUEST_COUNT_KEY: &str = "requestCount";

pub struct ThrottleStore {
    inner: Box<dyn KeyValueStore>,
}

impl ThrottleStore {
    pub fn new(inner: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.inner.get(key) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, "storage read failed, treating as absent: {:#}", e);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.set(key, value) {
            tracing::warn!(key, "storage write failed: {:#}", e);
        }
    }

    fn clear(&self, key: &str) {
        if let Err(e) = self.inner.remove(key) {
            tracing::warn!(key, "storage remove failed: {:#}", e);
        }
    }

    /// Persisted throttle expiration, if any.
    pub fn expiration(&self) -> Option<Timestamp> {
        let raw = self.read(EXPIRATION_KEY)?;
        let parsed = Timestamp::parse(&raw);
        if parsed.is_none() {
            tracing::warn!("ignoring malformed {} value {:?}", EXPIRATION_KEY, raw);
        }
        parsed
    }

    pub fn set_expiration(&self, at: Timestamp) {
        self.write(EXPIRATION_KEY, &at.as_millis().to_string());
    }

    pub fn clear_expiration(&self) {
        self.clear(EXPIRATION_KEY);
    }

    /// Persisted request counter, if any.
    pub fn request_count(&self) -> Option<u32> {
        let raw = self.read(REQUEST_COUNT_KEY)?;
        raw.trim().parse().ok()
    }

    pub fn set_request_count(&self, count: u32) {
        self.write(REQUEST_COUNT_KEY, &count.to_string());
    }

    pub fn clear_request_count(&self) {
        self.clear(REQUEST_COUNT_KEY);
    }
}
