use cosmwasm_schema::cw_serde;

use crate::error::{RewardError, RewardResult};
use crate::types::{RewardAsset, RewardEntry};

/// Ordered reward entries and their cumulative weights.
///
/// `cumulative[i]` is the sum of the weights of entries `0..=i`, which makes it
/// a non-decreasing step function (the CDF used for selection). Entry `i` owns
/// the half-open draw interval `[cumulative[i - 1], cumulative[i])`.
///
/// Removal deactivates an entry rather than compacting the table: the slot keeps
/// its index, its weight becomes zero (an empty interval) and the index is never
/// handed out again. Indices held by openings, statistics or admin tooling stay
/// valid for the lifetime of the table.
#[cw_serde]
#[derive(Default)]
pub struct WeightTable {
    entries: Vec<RewardEntry>,
    cumulative: Vec<u64>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its index.
    pub fn add_entry(&mut self, weight: u32, asset: RewardAsset) -> RewardResult<u32> {
        if weight == 0 {
            return Err(RewardError::InvalidWeight { weight });
        }
        let index = self.entries.len() as u32;
        let total = self.total_weight() + u64::from(weight);
        self.entries.push(RewardEntry {
            index,
            asset,
            weight,
            active: true,
        });
        self.cumulative.push(total);
        Ok(index)
    }

    pub fn update_weight(&mut self, index: u32, weight: u32) -> RewardResult<()> {
        if weight == 0 {
            return Err(RewardError::InvalidWeight { weight });
        }
        let entry = self.active_entry_mut(index)?;
        entry.weight = weight;
        self.recompute_from(index as usize);
        Ok(())
    }

    /// Deactivates an entry. Later indices do not move.
    pub fn remove_entry(&mut self, index: u32) -> RewardResult<RewardEntry> {
        let entry = self.active_entry_mut(index)?;
        entry.active = false;
        entry.weight = 0;
        let removed = entry.clone();
        self.recompute_from(index as usize);
        Ok(removed)
    }

    pub fn total_weight(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Cumulative weight up to and including `index`. A removed slot reports the
    /// value of its predecessor.
    pub fn cumulative_at(&self, index: u32) -> RewardResult<u64> {
        self.cumulative
            .get(index as usize)
            .copied()
            .ok_or(RewardError::NotFound { index })
    }

    /// Weight of an active entry.
    pub fn weight_of(&self, index: u32) -> RewardResult<u32> {
        self.active_entry(index).map(|entry| entry.weight)
    }

    pub fn entry(&self, index: u32) -> RewardResult<&RewardEntry> {
        self.entries
            .get(index as usize)
            .ok_or(RewardError::NotFound { index })
    }

    pub fn active_entry(&self, index: u32) -> RewardResult<&RewardEntry> {
        match self.entries.get(index as usize) {
            Some(entry) if entry.active => Ok(entry),
            _ => Err(RewardError::NotFound { index }),
        }
    }

    pub fn entries(&self) -> &[RewardEntry] {
        &self.entries
    }

    pub fn cumulative(&self) -> &[u64] {
        &self.cumulative
    }

    /// Number of slots, removed ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_len(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }

    /// Smallest index whose cumulative weight is strictly greater than `draw`.
    pub fn find(&self, draw: u64) -> RewardResult<u32> {
        let total = self.total_weight();
        if total == 0 {
            return Err(RewardError::EmptyTable);
        }
        if draw >= total {
            return Err(RewardError::InvalidDraw { draw, space: total });
        }
        // draw < total guarantees a hit, and zero-width slots are skipped because
        // their cumulative value equals their predecessor's.
        let position = self.cumulative.partition_point(|&c| c <= draw);
        Ok(position as u32)
    }

    fn active_entry_mut(&mut self, index: u32) -> RewardResult<&mut RewardEntry> {
        match self.entries.get_mut(index as usize) {
            Some(entry) if entry.active => Ok(entry),
            _ => Err(RewardError::NotFound { index }),
        }
    }

    fn recompute_from(&mut self, start: usize) {
        let mut running = if start == 0 {
            0
        } else {
            self.cumulative[start - 1]
        };
        for (entry, slot) in self.entries[start..]
            .iter()
            .zip(self.cumulative[start..].iter_mut())
        {
            running += u64::from(entry.weight);
            *slot = running;
        }
    }
}
