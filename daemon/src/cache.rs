use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::protocol::SearchResponse;
use crate::store::RecordKey;

struct CacheEntry {
    stored_at: Instant,
    response: SearchResponse,
}

/// Capacity-bounded FIFO cache with a per-entry TTL. Expired entries read as
/// misses and are replaced on the next insert for the same key.
pub struct ResponseCache {
    capacity: usize,
    ttl: Duration,
    map: HashMap<RecordKey, CacheEntry>,
    order: VecDeque<RecordKey>,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, key: &RecordKey) -> Option<SearchResponse> {
        let entry = self.map.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.response.clone())
    }

    pub fn insert(&mut self, key: RecordKey, response: SearchResponse) {
        if self.capacity == 0 {
            return;
        }
        let entry = CacheEntry {
            stored_at: Instant::now(),
            response,
        };
        if self.map.contains_key(&key) {
            self.map.insert(key, entry);
            return;
        }
        if self.map.len() == self.capacity {
            if let Some(front) = self.order.pop_front() {
                self.map.remove(&front);
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, entry);
    }
}
