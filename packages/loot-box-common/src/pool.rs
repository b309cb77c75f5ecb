use cosmwasm_schema::cw_serde;

use crate::error::{RewardError, RewardResult};
use crate::probability::ProbabilityReporter;
use crate::selector::{self, StockPolicy};
use crate::stock::StockLedger;
use crate::types::{AssetKind, RewardAsset, RewardEntry};
use crate::weights::WeightTable;

/// A reward ready to be added to the pool.
#[cw_serde]
pub struct NewReward {
    pub asset: RewardAsset,
    pub weight: u32,
    pub stock: u64,
}

/// The outcome of a successful claim: which entry was drawn and what to send.
#[cw_serde]
pub struct Claim {
    pub index: u32,
    pub asset: RewardAsset,
    pub remaining_stock: u64,
}

/// Weight table and stock ledger, mutated together.
///
/// Every method validates before it writes, so a call that returns an error
/// leaves both structures as they were. Holding the pool behind a single
/// exclusive borrow (one contract execution, or one mutex off-chain) is what
/// keeps a draw from seeing an entry whose stock slot does not exist yet.
#[cw_serde]
#[derive(Default)]
pub struct RewardPool {
    table: WeightTable,
    ledger: StockLedger,
}

impl RewardPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &WeightTable {
        &self.table
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    pub fn probabilities(&self) -> ProbabilityReporter<'_> {
        ProbabilityReporter::new(&self.table)
    }

    pub fn add_reward(&mut self, reward: NewReward) -> RewardResult<u32> {
        let next = self.table.len() as u32;
        validate_reward(next, &reward)?;
        let index = self.table.add_entry(reward.weight, reward.asset)?;
        let slot = self.ledger.open_slot(reward.stock);
        debug_assert_eq!(index, slot);
        Ok(index)
    }

    /// Adds every reward or none of them.
    pub fn add_rewards(&mut self, rewards: Vec<NewReward>) -> RewardResult<Vec<u32>> {
        let first = self.table.len() as u32;
        for (offset, reward) in rewards.iter().enumerate() {
            validate_reward(first + offset as u32, reward)?;
        }
        rewards
            .into_iter()
            .map(|reward| self.add_reward(reward))
            .collect()
    }

    pub fn update_weight(&mut self, index: u32, weight: u32) -> RewardResult<()> {
        self.table.update_weight(index, weight)
    }

    /// Applies every `(index, weight)` update or none of them.
    pub fn update_weights(&mut self, updates: &[(u32, u32)]) -> RewardResult<()> {
        for (index, weight) in updates {
            if *weight == 0 {
                return Err(RewardError::InvalidWeight { weight: *weight });
            }
            self.table.active_entry(*index)?;
        }
        for (index, weight) in updates {
            self.table.update_weight(*index, *weight)?;
        }
        Ok(())
    }

    pub fn remove_reward(&mut self, index: u32) -> RewardResult<RewardEntry> {
        self.table.remove_entry(index)
    }

    pub fn stock_of(&self, index: u32) -> RewardResult<u64> {
        self.table.active_entry(index)?;
        self.ledger.stock_of(index)
    }

    pub fn set_stock(&mut self, index: u32, stock: u64) -> RewardResult<()> {
        let entry = self.table.active_entry(index)?;
        check_unique_stock(entry.index, &entry.asset.kind, stock)?;
        self.ledger.set_stock(index, stock)
    }

    /// Refill. Returns the new stock.
    pub fn add_stock(&mut self, index: u32, delta: u64) -> RewardResult<u64> {
        let entry = self.table.active_entry(index)?;
        let current = self.ledger.stock_of(index)?;
        check_unique_stock(entry.index, &entry.asset.kind, current.saturating_add(delta))?;
        self.ledger.add_stock(index, delta)
    }

    /// Gives back one unit taken by a claim whose transfer did not go through.
    /// Same rules as a refill of one: the reward must still be active and a
    /// unique token never goes above one unit.
    pub fn restore_stock(&mut self, index: u32) -> RewardResult<u64> {
        self.add_stock(index, 1)
    }

    pub fn draw_space(&self, policy: StockPolicy) -> u64 {
        selector::draw_space(&self.table, &self.ledger, policy)
    }

    pub fn resolve(&self, draw: u64, policy: StockPolicy) -> RewardResult<u32> {
        selector::resolve(draw, &self.table, &self.ledger, policy)
    }

    /// Selects the reward for `draw` and reserves one unit of its stock.
    pub fn claim(&mut self, draw: u64, policy: StockPolicy) -> RewardResult<Claim> {
        let index = selector::select(draw, &self.table, &mut self.ledger, policy)?;
        let entry = self.table.entry(index)?;
        Ok(Claim {
            index,
            asset: entry.asset.clone(),
            remaining_stock: self.ledger.stock_of(index)?,
        })
    }
}

fn validate_reward(index: u32, reward: &NewReward) -> RewardResult<()> {
    if reward.weight == 0 {
        return Err(RewardError::InvalidWeight {
            weight: reward.weight,
        });
    }
    reward.asset.validate()?;
    check_unique_stock(index, &reward.asset.kind, reward.stock)
}

/// A non-fungible reward names one token id, which can be handed out once.
fn check_unique_stock(index: u32, kind: &AssetKind, stock: u64) -> RewardResult<()> {
    if *kind == AssetKind::NonFungible && stock > 1 {
        return Err(RewardError::InvalidStock {
            index,
            reason: format!("non-fungible reward holds a single token, got stock {stock}"),
        });
    }
    Ok(())
}
