use crate::accent::color::Color;
use std::collections::HashMap;

/// Identifies a result without touching the pixels: the caller's key for the
/// image source plus the stride it was sampled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: u64,
    pub downsample_factor: usize,
}

/// Accent colors of recently seen sources. When full, the entry with the
/// oldest use stamp is dropped.
#[derive(Debug)]
pub struct AccentCache {
    cap: usize,
    clock: u64,
    entries: HashMap<CacheKey, (Color, u64)>,
}

impl AccentCache {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            clock: 0,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: CacheKey) -> Option<Color> {
        let stamp = self.tick();
        let (color, used) = self.entries.get_mut(&key)?;
        *used = stamp;
        Some(*color)
    }

    pub fn insert(&mut self, key: CacheKey, color: Color) {
        let stamp = self.tick();
        if self.entries.insert(key, (color, stamp)).is_none() && self.entries.len() > self.cap {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, (_, used))| *used)
                .map(|(k, _)| *k);
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
            }
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}
