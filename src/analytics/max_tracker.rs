//! Running maximum with the set of keys tied at it.

use serde::Serialize;

/// Keys sharing the highest value seen, plus that value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaders<K> {
    pub keys: Vec<K>,
    pub value: u64,
}

impl<K> Leaders<K> {
    pub fn map_keys<T>(self, f: impl FnMut(K) -> T) -> Leaders<T> {
        Leaders {
            keys: self.keys.into_iter().map(f).collect(),
            value: self.value,
        }
    }
}

impl<K> Default for Leaders<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            value: 0,
        }
    }
}

/// Tracks `(running_max, keys_at_max)` over a stream of `(key, value)` observations.
///
/// A strictly greater value purges the key list and starts it over with the
/// observed key; an equal value appends. Callers only report a key when its
/// value actually changed, so a key never lands in the list twice for the
/// same value.
#[derive(Debug, Clone)]
pub struct MaxTracker<K> {
    max: u64,
    keys: Vec<K>,
}

impl<K> MaxTracker<K> {
    pub fn new() -> Self {
        Self {
            max: 0,
            keys: Vec::new(),
        }
    }

    pub fn observe(&mut self, key: K, value: u64) {
        if value > self.max {
            self.max = value;
            self.keys.clear();
            self.keys.push(key);
        } else if value == self.max && value > 0 {
            self.keys.push(key);
        }
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn into_leaders(self) -> Leaders<K> {
        Leaders {
            keys: self.keys,
            value: self.max,
        }
    }
}

impl<K> Default for MaxTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
