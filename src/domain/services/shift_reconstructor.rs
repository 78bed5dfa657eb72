//! Shift reconstructor - turns wallet history into an ordered shift sequence
//!
//! Reconstruction runs in two passes. [`select_burns`] picks the confirmed
//! burns to the mirror address from the raw wallet list; the caller then
//! resolves each burn's block height through the node. [`reconstruct`] walks
//! the located burns in height order and fills every height in between, and
//! after the last burn up to the chain tip, with small shifts built from the
//! cached block hashes.

use tracing::{debug, warn};

use crate::domain::entities::{LocatedBurn, Shift, ShiftHistory};
use crate::domain::error::GameError;
use crate::domain::value_objects::{BlockHashCache, WalletTransaction};

/// Burns picked from a wallet transaction list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BurnSelection {
    /// Confirmed burns from the creation burn onward, in chain order
    pub burns: Vec<WalletTransaction>,
    /// Whether any burn to the mirror address is still unconfirmed
    pub has_unconfirmed: bool,
}

/// Pick the burns that make up a mogwai's history.
///
/// Burns are ordered by time, then by position in the block. Nothing counts
/// before the first burn of at least `min_amount`: that burn is the creation.
pub fn select_burns(transactions: &[WalletTransaction], mirror_address: &str, min_amount: f64) -> BurnSelection {
    let mut burns: Vec<&WalletTransaction> = transactions
        .iter()
        .filter(|tx| tx.is_burn_to(mirror_address))
        .collect();
    burns.sort_by(|a, b| a.time.cmp(&b.time).then(a.block_index.cmp(&b.block_index)));

    let has_unconfirmed = burns.iter().any(|tx| !tx.is_confirmed());
    let burns: Vec<WalletTransaction> = burns
        .into_iter()
        .filter(|tx| tx.is_confirmed())
        .skip_while(|tx| tx.amount.abs() < min_amount)
        .cloned()
        .collect();

    BurnSelection {
        burns,
        has_unconfirmed,
    }
}

/// Build the shift history from located burns.
///
/// Trailing small shifts fill every height after the last burn that lies
/// below `block_count`. A height missing from the cache fails
/// the whole call so the caller can re-cache and retry.
pub fn reconstruct(
    address_hex: &str,
    burns: &[LocatedBurn],
    cache: &BlockHashCache,
    block_count: u64,
) -> Result<ShiftHistory, GameError> {
    let mut ordered: Vec<&LocatedBurn> = burns.iter().collect();
    ordered.sort_by(|a, b| a.height.cmp(&b.height).then(a.block_index.cmp(&b.block_index)));

    let mut history = ShiftHistory::new();
    let mut last_height: Option<u64> = None;

    for burn in ordered {
        if let Some(previous) = last_height {
            if burn.height <= previous {
                warn!(
                    tx_id = %burn.tx_id,
                    height = burn.height,
                    "Second burn in an already used block, ignored"
                );
                continue;
            }
            fill_small_shifts(&mut history, address_hex, cache, previous + 1, burn.height)?;
        }

        let index = history.len() as u64;
        history.insert(burn.height, Shift::from_burn(index, address_hex, burn));
        last_height = Some(burn.height);
    }

    if let Some(previous) = last_height {
        fill_small_shifts(&mut history, address_hex, cache, previous + 1, block_count)?;
    }

    debug!(
        shifts = history.len(),
        burns = burns.len(),
        block_count,
        "Shift history reconstructed"
    );
    Ok(history)
}

fn fill_small_shifts(
    history: &mut ShiftHistory,
    address_hex: &str,
    cache: &BlockHashCache,
    from: u64,
    to: u64,
) -> Result<(), GameError> {
    for (height, hash) in cache.hashes_in_range(from, to, None)? {
        let index = history.len() as u64;
        history.insert(height, Shift::small(index, address_hex, height, hash));
    }
    Ok(())
}
