use cosmwasm_schema::cw_serde;

use crate::error::{RewardError, RewardResult};

/// Remaining claimable count per reward index, independent of weight.
///
/// `try_decrement` is the only way stock goes down.
#[cw_serde]
#[derive(Default)]
pub struct StockLedger {
    stock: Vec<u64>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the slot for the next reward index with its initial stock.
    pub fn open_slot(&mut self, initial: u64) -> u32 {
        self.stock.push(initial);
        (self.stock.len() - 1) as u32
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    pub fn stock_of(&self, index: u32) -> RewardResult<u64> {
        self.stock
            .get(index as usize)
            .copied()
            .ok_or(RewardError::NotFound { index })
    }

    pub fn set_stock(&mut self, index: u32, value: u64) -> RewardResult<()> {
        *self.slot_mut(index)? = value;
        Ok(())
    }

    /// Refill. A zero delta is rejected rather than treated as a no-op so that a
    /// refill always changes state.
    pub fn add_stock(&mut self, index: u32, delta: u64) -> RewardResult<u64> {
        if delta == 0 {
            return Err(RewardError::InvalidStock {
                index,
                reason: "refill amount must be positive".to_string(),
            });
        }
        let slot = self.slot_mut(index)?;
        let current = *slot;
        *slot = current
            .checked_add(delta)
            .ok_or(RewardError::Overflow {
                index,
                current,
                delta,
            })?;
        Ok(*slot)
    }

    /// Takes one unit. Returns false without mutating when the slot is empty.
    pub fn try_decrement(&mut self, index: u32) -> RewardResult<bool> {
        let slot = self.slot_mut(index)?;
        if *slot == 0 {
            return Ok(false);
        }
        *slot -= 1;
        Ok(true)
    }

    fn slot_mut(&mut self, index: u32) -> RewardResult<&mut u64> {
        self.stock
            .get_mut(index as usize)
            .ok_or(RewardError::NotFound { index })
    }
}
