//! Per-key trailing-edge debouncing.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

/// Coalesces bursts of calls per key into the last one.
///
/// Every [`settle`](Debouncer::settle) call for a key restarts that key's
/// quiet period; only the call still newest when the period ends gets `true`.
#[derive(Debug)]
pub struct Debouncer<K> {
    delay: Duration,
    generations: Mutex<HashMap<K, u64>>,
}

impl<K: Hash + Eq + Clone> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generations: Mutex::new(HashMap::new()),
        }
    }

    pub async fn settle(&self, key: K) -> bool {
        let ticket = {
            let mut generations = self.generations.lock();
            let generation = generations.entry(key.clone()).or_insert(0);
            *generation += 1;
            *generation
        };

        tokio::time::sleep(self.delay).await;

        let mut generations = self.generations.lock();
        if generations.get(&key) == Some(&ticket) {
            generations.remove(&key);
            true
        } else {
            false
        }
    }

    /// Keys with a quiet period still running.
    pub fn pending(&self) -> usize {
        self.generations.lock().len()
    }
}
