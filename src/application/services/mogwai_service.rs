//! Mogwai service - binding, shift fetching and mogwai hydration
//!
//! Everything chain-facing about a mogwai goes through here: the node is
//! asked for the wallet history and block heights, the block cache supplies
//! the hashes for idle heights, and the domain turns both into a shift
//! history. Burns (binding and interactions) are built, signed and broadcast
//! as raw transactions.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{NodeError, NodeQueryPort, RawInput};
use crate::application::services::BlockCacheService;
use crate::domain::entities::{
    Adventure, AdventureAction, AdventureState, EvolveReport, LocatedBurn, Mogwai, ShiftHistory,
};
use crate::domain::error::GameError;
use crate::domain::services::{adventure_generator, shift_reconstructor};
use crate::domain::value_objects::{BoundState, GameRules, MogwaiAddress, TxCategory, WalletTransaction};

/// Confirmations an output needs before it can fund a burn
pub const MIN_SPEND_CONFIRMATIONS: u32 = 6;

const MAX_CONFIRMATIONS: u32 = 9_999_999;

/// Default wallet account, holding every bound address
const WALLET_ACCOUNT: &str = "";

#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("No mogwai is bound to this address")]
    NotBound,
    #[error("A mogwai is already bound to this address")]
    AlreadyBound,
    #[error("Binding is waiting for confirmation")]
    PendingConfirmation,
    #[error("No valid mirror address for {0}")]
    NoMirrorAddress(String),
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },
    #[error("Node could not fully sign the burn")]
    SigningIncomplete,
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error(transparent)]
    Lookup(#[from] anyhow::Error),
}

/// Reconstructed shifts of one address
#[derive(Debug, Clone)]
pub struct ShiftScan {
    pub bound_state: BoundState,
    pub shifts: ShiftHistory,
}

/// Incoming funds of one address that cannot be spent yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PendingFunds {
    /// Not in a block yet
    pub unconfirmed: f64,
    /// In a block, but below the spending threshold
    pub confirming: f64,
}

/// A mogwai evolved to some height, next to the bound state of its address
#[derive(Debug, Clone)]
pub struct MogwaiLookup {
    pub bound_state: BoundState,
    pub evolved: Option<(Mogwai, EvolveReport)>,
}

/// Result of playing one adventure locally
#[derive(Debug, Clone)]
pub struct AdventureRun {
    pub mogwai: Mogwai,
    pub evolve: EvolveReport,
    pub adventure: Adventure,
}

pub struct MogwaiService {
    node: Arc<dyn NodeQueryPort>,
    cache: Arc<BlockCacheService>,
    rules: GameRules,
    page_size: usize,
}

impl MogwaiService {
    pub fn new(
        node: Arc<dyn NodeQueryPort>,
        cache: Arc<BlockCacheService>,
        rules: GameRules,
        page_size: usize,
    ) -> Self {
        Self {
            node,
            cache,
            rules,
            page_size: page_size.max(1),
        }
    }

    /// Burn target for `address`
    pub async fn mirror_address(&self, address: &MogwaiAddress) -> Result<String, BindingError> {
        let info = self.node.mirror_address(address.as_str()).await?;
        if !info.is_valid || !info.is_mirror_valid || info.mirror_address.is_empty() {
            return Err(BindingError::NoMirrorAddress(address.to_string()));
        }
        Ok(info.mirror_address)
    }

    /// Every wallet transaction of `account`, page by page
    pub async fn fetch_transactions(&self, account: &str) -> Result<Vec<WalletTransaction>> {
        let mut transactions = Vec::new();
        loop {
            let page = self
                .node
                .list_transactions(account, self.page_size, transactions.len())
                .await
                .context("Failed to list wallet transactions")?;
            let done = page.len() < self.page_size;
            transactions.extend(page);
            if done {
                break;
            }
        }

        debug!(account, count = transactions.len(), "Fetched wallet transactions");
        Ok(transactions)
    }

    /// Reconstruct the shift history of `address`.
    ///
    /// A cache miss triggers one cache sync before the reconstruction is
    /// retried.
    #[instrument(skip(self, address), fields(address = %address))]
    pub async fn get_shifts(&self, address: &MogwaiAddress) -> Result<ShiftScan> {
        let mirror = self.mirror_address(address).await?;
        let transactions = self.fetch_transactions(WALLET_ACCOUNT).await?;
        let selection = shift_reconstructor::select_burns(&transactions, &mirror, self.rules.mogwai_cost);

        let mut burns = Vec::with_capacity(selection.burns.len());
        for tx in &selection.burns {
            let Some(block_hash) = tx.block_hash.as_deref() else {
                continue;
            };
            let block = self
                .node
                .get_block(block_hash)
                .await
                .with_context(|| format!("Failed to locate block of burn {}", tx.tx_id))?;
            if let Some(burn) = LocatedBurn::from_transaction(tx, block.height, self.rules.tx_fee) {
                burns.push(burn);
            }
        }

        let block_count = self
            .node
            .get_block_count()
            .await
            .context("Failed to get block count")?;
        let address_hex = address.to_hex();

        let reconstructed = {
            let cache = self.cache.read().await;
            shift_reconstructor::reconstruct(&address_hex, &burns, &cache, block_count)
        };
        let shifts = match reconstructed {
            Ok(shifts) => shifts,
            Err(GameError::MissingCachedBlock { height }) => {
                warn!(%address, height, "Block hash not cached, syncing before retry");
                self.cache.sync().await?;
                let cache = self.cache.read().await;
                shift_reconstructor::reconstruct(&address_hex, &burns, &cache, block_count)?
            }
            Err(e) => return Err(e.into()),
        };

        let bound_state = BoundState::classify(shifts.len(), selection.has_unconfirmed);
        debug!(%address, shifts = shifts.len(), bound_state = bound_state.as_str(), "Shifts reconstructed");
        Ok(ShiftScan {
            bound_state,
            shifts,
        })
    }

    pub async fn bound_state(&self, address: &MogwaiAddress) -> Result<BoundState> {
        Ok(self.get_shifts(address).await?.bound_state)
    }

    /// Hydrate the mogwai of `address`, if one is bound, and evolve it up to
    /// `height` or through the whole history
    pub async fn evolved_mogwai(&self, address: &MogwaiAddress, height: Option<u64>) -> Result<MogwaiLookup> {
        let scan = self.get_shifts(address).await?;
        if scan.shifts.is_empty() {
            return Ok(MogwaiLookup {
                bound_state: scan.bound_state,
                evolved: None,
            });
        }

        let mut mogwai = Mogwai::new(address.as_str(), scan.shifts, self.rules)?;
        let report = mogwai.evolve(height.unwrap_or(0))?;
        Ok(MogwaiLookup {
            bound_state: scan.bound_state,
            evolved: Some((mogwai, report)),
        })
    }

    /// Play an adventure against the mogwai's state at `height`. The shift
    /// at that point creates the adventure and plays its first step; while
    /// it keeps running, every later shift evolves the mogwai and plays one
    /// more step.
    pub async fn run_adventure(
        &self,
        address: &MogwaiAddress,
        action: AdventureAction,
        height: Option<u64>,
    ) -> Result<Option<AdventureRun>> {
        let Some((mut mogwai, mut evolve)) = self.evolved_mogwai(address, height).await?.evolved else {
            return Ok(None);
        };
        let shift = mogwai
            .current_shift()
            .cloned()
            .context("Mogwai has no shift at its pointer")?;

        let mut adventure = adventure_generator::create(&shift, action)?;
        let mut state = adventure.next_step(&mut mogwai, &shift);
        while state == AdventureState::Running {
            let Some(next) = mogwai
                .shifts()
                .range(mogwai.pointer() + 1..)
                .next()
                .map(|(_, shift)| shift.clone())
            else {
                break;
            };
            let report = mogwai.evolve(next.height)?;
            evolve.to = report.to;
            evolve.events.extend(report.events);
            state = adventure.next_step(&mut mogwai, &next);
        }
        for event in &adventure.events {
            debug!(
                adventure_id = %adventure.id,
                event = event.event_type(),
                height = event.metadata().height,
                "Adventure event"
            );
        }
        info!(%address, adventure_id = %adventure.id, ?state, "Adventure played");

        Ok(Some(AdventureRun {
            mogwai,
            evolve,
            adventure,
        }))
    }

    // =========================================================================
    // Burns
    // =========================================================================

    /// Burn the creation cost to bind a new mogwai
    #[instrument(skip(self, address), fields(address = %address))]
    pub async fn bind_mogwai(&self, address: &MogwaiAddress) -> Result<String, BindingError> {
        match self.bound_state(address).await? {
            BoundState::Bound => return Err(BindingError::AlreadyBound),
            BoundState::Wait => return Err(BindingError::PendingConfirmation),
            BoundState::None => {}
        }
        self.burn(address, self.rules.mogwai_cost, self.rules.tx_fee).await
    }

    /// Burn an adventure interaction for a bound mogwai
    pub async fn send_interaction(&self, address: &MogwaiAddress, action: &AdventureAction) -> Result<String, BindingError> {
        match self.bound_state(address).await? {
            BoundState::None => return Err(BindingError::NotBound),
            BoundState::Wait => return Err(BindingError::PendingConfirmation),
            BoundState::Bound => {}
        }
        self.burn(address, action.burn_amount(), self.rules.tx_fee + action.burn_fee())
            .await
    }

    /// Spend every mature output of `address` into a burn to its mirror
    /// address, returning change above the fee to `address`
    async fn burn(&self, address: &MogwaiAddress, amount: f64, fee: f64) -> Result<String, BindingError> {
        let mirror = self.mirror_address(address).await?;
        let unspent = self
            .node
            .list_unspent(MIN_SPEND_CONFIRMATIONS, MAX_CONFIRMATIONS, &[address.to_string()])
            .await?;

        let available: f64 = unspent.iter().map(|u| u.amount).sum();
        let needed = amount + fee;
        if available < needed {
            return Err(BindingError::InsufficientFunds { needed, available });
        }

        let inputs: Vec<RawInput> = unspent.iter().map(RawInput::from).collect();
        let mut outputs = BTreeMap::new();
        outputs.insert(mirror.clone(), round_coins(amount));
        if available - amount > fee {
            outputs.insert(address.to_string(), round_coins(available - amount - fee));
        }

        let raw = self.node.create_raw_transaction(&inputs, &outputs).await?;
        let signed = self.node.sign_raw_transaction(&raw).await?;
        if !signed.complete {
            return Err(BindingError::SigningIncomplete);
        }
        let tx_id = self.node.send_raw_transaction(&signed.hex).await?;

        info!(%address, %mirror, amount, fee, %tx_id, "Burn sent");
        Ok(tx_id)
    }

    // =========================================================================
    // Funds
    // =========================================================================

    pub async fn unspent_funds(&self, address: &MogwaiAddress) -> Result<f64> {
        let funds = self.unspent_funds_many(&[address.to_string()]).await?;
        Ok(funds.values().sum())
    }

    /// Spendable balance per address
    pub async fn unspent_funds_many(&self, addresses: &[String]) -> Result<BTreeMap<String, f64>> {
        let unspent = self
            .node
            .list_unspent(MIN_SPEND_CONFIRMATIONS, MAX_CONFIRMATIONS, addresses)
            .await
            .context("Failed to list unspent outputs")?;

        let mut funds: BTreeMap<String, f64> = addresses.iter().map(|a| (a.clone(), 0.0)).collect();
        for output in unspent {
            *funds.entry(output.address).or_default() += output.amount;
        }
        Ok(funds)
    }

    /// Incoming funds per address that are still maturing, from the
    /// wallet history of `account`
    pub async fn unconfirmed_funds(&self, account: &str, addresses: &[String]) -> Result<BTreeMap<String, PendingFunds>> {
        let transactions = self.fetch_transactions(account).await?;

        let mut funds: BTreeMap<String, PendingFunds> = BTreeMap::new();
        for tx in transactions {
            if tx.category != TxCategory::Receive
                || tx.confirmations >= MIN_SPEND_CONFIRMATIONS as i64
                || !addresses.contains(&tx.address)
            {
                continue;
            }
            let entry = funds.entry(tx.address).or_default();
            if tx.confirmations == 0 {
                entry.unconfirmed += tx.amount;
            } else {
                entry.confirming += tx.amount;
            }
        }
        Ok(funds)
    }
}

/// Round to the chain's eight decimals
fn round_coins(amount: f64) -> f64 {
    (amount * 100_000_000.0).round() / 100_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AdventureKind, AdventureType, DifficultyType};
    use crate::infrastructure::block_store::InMemoryBlockHashRepository;
    use crate::test_support::{confirmed_burn, pending_burn, receive, unspent, FakeNode, ADDRESS, MIRROR};

    fn address() -> MogwaiAddress {
        MogwaiAddress::parse(ADDRESS).unwrap()
    }

    async fn service(node: Arc<FakeNode>) -> MogwaiService {
        let repository = Arc::new(InMemoryBlockHashRepository::new());
        let cache = Arc::new(BlockCacheService::new(node.clone(), repository, 4));
        cache.sync().await.unwrap();
        MogwaiService::new(node, cache, GameRules::default(), 2)
    }

    #[tokio::test]
    async fn test_unbound_address() {
        let node = Arc::new(FakeNode::with_block_count(50));
        let service = service(node).await;

        assert_eq!(service.bound_state(&address()).await.unwrap(), BoundState::None);
        let lookup = service.evolved_mogwai(&address(), None).await.unwrap();
        assert_eq!(lookup.bound_state, BoundState::None);
        assert!(lookup.evolved.is_none());
    }

    #[tokio::test]
    async fn test_pending_burn_waits() {
        let node = Arc::new(FakeNode::with_block_count(50));
        node.add_transaction(pending_burn(1, 1.0));
        let service = service(node).await;

        assert_eq!(service.bound_state(&address()).await.unwrap(), BoundState::Wait);
        let lookup = service.evolved_mogwai(&address(), None).await.unwrap();
        assert_eq!(lookup.bound_state, BoundState::Wait);
        assert!(lookup.evolved.is_none());
    }

    #[tokio::test]
    async fn test_shifts_across_pages() {
        let node = Arc::new(FakeNode::with_block_count(60));
        node.add_transaction(confirmed_burn(10, 1, 0.2));
        node.add_transaction(confirmed_burn(20, 1, 1.0));
        node.add_transaction(confirmed_burn(25, 2, 0.3));
        node.add_transaction(confirmed_burn(30, 1, 0.1));
        node.add_transaction(confirmed_burn(41, 1, 0.1));
        let service = service(node).await;

        let scan = service.get_shifts(&address()).await.unwrap();

        assert_eq!(scan.bound_state, BoundState::Bound);
        // creation at 20, then every height up to 59
        assert_eq!(scan.shifts.keys().next(), Some(&20));
        assert_eq!(scan.shifts.len(), 40);
        let real: Vec<u64> = scan
            .shifts
            .values()
            .filter(|s| !s.is_small_shift)
            .map(|s| s.height)
            .collect();
        assert_eq!(real, vec![20, 25, 30, 41]);
    }

    #[tokio::test]
    async fn test_cache_miss_syncs_and_retries() {
        let node = Arc::new(FakeNode::with_block_count(30));
        node.add_transaction(confirmed_burn(20, 1, 1.0));
        let service = service(node.clone()).await;

        node.set_block_count(45);
        let scan = service.get_shifts(&address()).await.unwrap();
        assert_eq!(scan.shifts.keys().next_back(), Some(&44));
    }

    #[tokio::test]
    async fn test_hydration_is_deterministic() {
        let node = Arc::new(FakeNode::with_block_count(80));
        node.add_transaction(confirmed_burn(20, 1, 1.0));
        node.add_transaction(confirmed_burn(33, 1, 0.5));
        let service = service(node).await;

        let (a, report_a) = service.evolved_mogwai(&address(), None).await.unwrap().evolved.unwrap();
        let (b, report_b) = service.evolved_mogwai(&address(), None).await.unwrap().evolved.unwrap();

        assert_eq!(a, b);
        assert_eq!(report_a, report_b);
        assert_eq!(a.pointer(), 79);
    }

    #[tokio::test]
    async fn test_bind_builds_burn_with_change() {
        let node = Arc::new(FakeNode::with_block_count(10));
        node.add_unspent(unspent("a", 0.7, 10));
        node.add_unspent(unspent("b", 0.8, 6));
        node.add_unspent(unspent("c", 5.0, 2));
        let service = service(node.clone()).await;

        let tx_id = service.bind_mogwai(&address()).await.unwrap();
        assert!(!tx_id.is_empty());

        let (inputs, outputs) = node.created_transactions().pop().unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(outputs[MIRROR], 1.0);
        assert!((outputs[ADDRESS] - 0.4999).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_bind_rejects_bound_and_poor() {
        let node = Arc::new(FakeNode::with_block_count(30));
        node.add_unspent(unspent("a", 0.5, 10));
        let service = service(node.clone()).await;

        assert!(matches!(
            service.bind_mogwai(&address()).await,
            Err(BindingError::InsufficientFunds { .. })
        ));

        node.add_transaction(confirmed_burn(20, 1, 1.0));
        assert!(matches!(
            service.bind_mogwai(&address()).await,
            Err(BindingError::AlreadyBound)
        ));
    }

    #[tokio::test]
    async fn test_interaction_requires_binding() {
        let node = Arc::new(FakeNode::with_block_count(30));
        node.add_unspent(unspent("a", 2.0, 10));
        let service = service(node.clone()).await;
        let action = AdventureAction::new(AdventureType::TestRoom, DifficultyType::Average, 1).unwrap();

        assert!(matches!(
            service.send_interaction(&address(), &action).await,
            Err(BindingError::NotBound)
        ));

        node.add_transaction(confirmed_burn(20, 1, 1.0));
        service.send_interaction(&address(), &action).await.unwrap();

        let (_, outputs) = node.created_transactions().pop().unwrap();
        assert!((outputs[MIRROR] - 0.0003).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_run_adventure_reaches_terminal_state() {
        let node = Arc::new(FakeNode::with_block_count(40));
        node.add_transaction(confirmed_burn(20, 1, 1.0));
        let service = service(node).await;
        let action = AdventureAction::new(AdventureType::Dungeon, DifficultyType::Easy, 1).unwrap();

        let run = service
            .run_adventure(&address(), action, Some(30))
            .await
            .unwrap()
            .unwrap();

        assert!(run.adventure.state.is_terminal());
        let AdventureKind::DungeonCrawl(dungeon) = &run.adventure.kind else {
            panic!("expected a dungeon crawl");
        };
        // one shift per room fought, starting at 30
        let fought = dungeon.rooms().iter().filter(|r| r.cleared).count()
            + usize::from(run.adventure.state == AdventureState::Failed);
        assert_eq!(run.evolve.to, 30 + fought as u64 - 1);
        assert_eq!(run.mogwai.pointer(), run.evolve.to);

        let unsupported = AdventureAction::new(AdventureType::Quest, DifficultyType::Easy, 1).unwrap();
        assert!(service.run_adventure(&address(), unsupported, None).await.is_err());
    }

    #[tokio::test]
    async fn test_funds() {
        let node = Arc::new(FakeNode::with_block_count(10));
        node.add_unspent(unspent("a", 1.5, 10));
        node.add_unspent(unspent("c", 0.5, 3));
        let service = service(node).await;

        assert_eq!(service.unspent_funds(&address()).await.unwrap(), 1.5);

        let many = service
            .unspent_funds_many(&[ADDRESS.to_string(), "MOther".to_string()])
            .await
            .unwrap();
        assert_eq!(many[ADDRESS], 1.5);
        assert_eq!(many["MOther"], 0.0);
    }

    #[tokio::test]
    async fn test_unconfirmed_funds_split_by_maturity() {
        let node = Arc::new(FakeNode::with_block_count(10));
        node.add_transaction(receive(1, 0.25, 0));
        node.add_transaction(receive(2, 0.5, 3));
        node.add_transaction(receive(3, 2.0, 6));
        node.add_transaction(confirmed_burn(5, 1, 1.0));
        let service = service(node).await;

        let pending = service
            .unconfirmed_funds("", &[ADDRESS.to_string()])
            .await
            .unwrap();
        assert_eq!(
            pending[ADDRESS],
            PendingFunds {
                unconfirmed: 0.25,
                confirming: 0.5
            }
        );
        assert!(!pending.contains_key(MIRROR));
    }
}
