use heapless::Deque;

use super::gateway::{truncate_into, ParamGateway, ParamKey, ParamText};

/// Number of recent writes remembered by [`MemoryGateway`].
const WRITE_LOG_LEN: usize = 16;

/// In-memory [`ParamGateway`] for host simulators and tests.
///
/// Stores one value per key and keeps a short log of the writes the
/// controller made, so callers can check which commands were sent and in
/// what order. Values placed with [`insert()`](Self::insert) model the DSP
/// side and are not logged.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    values: [Option<ParamText>; ParamKey::COUNT],
    write_counts: [u32; ParamKey::COUNT],
    recent: Deque<ParamKey, WRITE_LOG_LEN>,
}

impl MemoryGateway {
    /// Create an empty gateway: every read misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value as the host would, without logging a write.
    pub fn insert(&mut self, key: ParamKey, value: &str) {
        self.values[key.index()] = Some(truncate_into(value));
    }

    /// Forget the value for `key`; subsequent reads miss.
    pub fn remove(&mut self, key: ParamKey) {
        self.values[key.index()] = None;
    }

    /// Current stored value, if any.
    pub fn value(&self, key: ParamKey) -> Option<&str> {
        self.values[key.index()].as_deref()
    }

    /// How many times the controller has written `key`.
    pub fn write_count(&self, key: ParamKey) -> u32 {
        self.write_counts[key.index()]
    }

    /// The most recent writes, oldest first.
    pub fn recent_writes(&self) -> impl Iterator<Item = ParamKey> + '_ {
        self.recent.iter().copied()
    }

    /// Reset write counters and the write log; stored values are kept.
    pub fn clear_log(&mut self) {
        self.write_counts = [0; ParamKey::COUNT];
        self.recent.clear();
    }
}

impl ParamGateway for MemoryGateway {
    fn get(&self, key: ParamKey) -> Option<ParamText> {
        self.values[key.index()].clone()
    }

    fn set(&mut self, key: ParamKey, value: &str) {
        self.values[key.index()] = Some(truncate_into(value));
        self.write_counts[key.index()] += 1;
        if self.recent.is_full() {
            self.recent.pop_front();
        }
        // Cannot fail: a slot was just freed if the log was full.
        let _ = self.recent.push_back(key);
    }
}
