use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct Entry {
    price: f64,
    inserted_at: Instant,
}

/// In-memory TTL map for prices, shared across actix workers. Eviction is
/// lazy: an expired entry is dropped the next time its key is read. Lost on
/// restart, which is fine for a 5-minute price.
///
/// Concurrent cold reads for the same key are NOT coalesced; each miss is
/// free to trigger its own upstream fetch.
pub struct PriceCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    pub fn get(&self, token_id: &str) -> Option<f64> {
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(token_id) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    return Some(entry.price)
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: take the write lock to drop it.
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(token_id);
        None
    }

    pub fn insert(&self, token_id: &str, price: f64) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(token_id.to_string(), Entry { price, inserted_at: Instant::now() });
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}
