//! Height to block-hash lookup used by shift reconstruction

use std::collections::BTreeMap;

use crate::domain::error::GameError;

/// Append-only mapping from block height to block hash.
///
/// Entries are only ever added above the current watermark
/// ([`BlockHashCache::max_height`]); an existing height is never rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHashCache {
    hashes: BTreeMap<u64, String>,
}

impl BlockHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest cached height, the cache watermark
    pub fn max_height(&self) -> Option<u64> {
        self.hashes.keys().next_back().copied()
    }

    /// First height a sync should fetch
    pub fn next_height(&self) -> u64 {
        self.max_height().map_or(0, |h| h + 1)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn get(&self, height: u64) -> Option<&str> {
        self.hashes.get(&height).map(String::as_str)
    }

    /// Append a hash above the watermark. Returns `false` and leaves the cache
    /// unchanged for any height at or below it.
    pub fn append(&mut self, height: u64, hash: impl Into<String>) -> bool {
        if self.max_height().is_some_and(|max| height <= max) {
            return false;
        }
        self.hashes.insert(height, hash.into());
        true
    }

    /// Resolve every height in `from..to`, optionally keeping only hashes that
    /// contain one of `patterns`. A missing height fails the whole call.
    pub fn hashes_in_range(
        &self,
        from: u64,
        to: u64,
        patterns: Option<&[&str]>,
    ) -> Result<BTreeMap<u64, String>, GameError> {
        let mut result = BTreeMap::new();
        for height in from..to {
            let hash = self
                .get(height)
                .ok_or(GameError::MissingCachedBlock { height })?;
            let keep = patterns.map_or(true, |patterns| patterns.iter().any(|p| hash.contains(p)));
            if keep {
                result.insert(height, hash.to_string());
            }
        }
        Ok(result)
    }
}

impl FromIterator<(u64, String)> for BlockHashCache {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iter: I) -> Self {
        let mut entries: Vec<(u64, String)> = iter.into_iter().collect();
        entries.sort_by_key(|(height, _)| *height);

        let mut cache = Self::new();
        for (height, hash) in entries {
            cache.append(height, hash);
        }
        cache
    }
}
