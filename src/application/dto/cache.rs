use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::services::{CacheStats, SyncReport};

#[derive(Debug, Serialize)]
pub struct CacheStatsDto {
    pub count: usize,
    pub max_height: Option<u64>,
    pub block_count: u64,
    /// Heights below the block count that are not cached yet
    pub missing: u64,
}

impl From<CacheStats> for CacheStatsDto {
    fn from(s: CacheStats) -> Self {
        let next = s.max_height.map_or(0, |h| h + 1);
        Self {
            count: s.count,
            max_height: s.max_height,
            block_count: s.block_count,
            missing: s.block_count.saturating_sub(next),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncRequestDto {
    /// Drop the cache and fetch everything again
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Serialize)]
pub struct SyncResponseDto {
    pub fetched: usize,
    pub max_height: Option<u64>,
    pub block_count: u64,
}

impl From<SyncReport> for SyncResponseDto {
    fn from(r: SyncReport) -> Self {
        Self {
            fetched: r.fetched,
            max_height: r.max_height,
            block_count: r.block_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BlockHashQueryDto {
    pub from: u64,
    pub to: u64,
    /// Comma separated substrings; empty returns every hash in range
    #[serde(default)]
    pub patterns: Option<String>,
}

impl BlockHashQueryDto {
    pub fn pattern_list(&self) -> Vec<String> {
        self.patterns
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct BlockHashesResponseDto {
    pub hashes: BTreeMap<u64, String>,
}
