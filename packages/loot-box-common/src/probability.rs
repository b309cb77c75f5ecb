use cosmwasm_std::{Decimal, Uint128};

use crate::types::RarityTier;
use crate::weights::WeightTable;

/// Display probabilities derived from a weight table.
///
/// The reporter borrows the table and recomputes on every call, so there is no
/// cached state to invalidate: any mutation of the table is visible to the next
/// reporter built from it.
pub struct ProbabilityReporter<'a> {
    table: &'a WeightTable,
}

impl<'a> ProbabilityReporter<'a> {
    pub fn new(table: &'a WeightTable) -> Self {
        Self { table }
    }

    /// `weight / total_weight`, or zero for an empty table or an index that is
    /// removed or unknown.
    pub fn probability_of(&self, index: u32) -> Decimal {
        self.ratio(index, Uint128::one())
    }

    /// Probability scaled to percent.
    pub fn percentage_of(&self, index: u32) -> Decimal {
        self.ratio(index, Uint128::new(100))
    }

    pub fn tier_of(&self, index: u32) -> RarityTier {
        RarityTier::from_probability(self.probability_of(index))
    }

    /// Every slot in index order, removed slots reporting zero.
    pub fn all_probabilities(&self) -> Vec<(u32, Decimal)> {
        self.table
            .entries()
            .iter()
            .map(|entry| (entry.index, self.probability_of(entry.index)))
            .collect()
    }

    fn ratio(&self, index: u32, scale: Uint128) -> Decimal {
        let total = self.table.total_weight();
        if total == 0 {
            return Decimal::zero();
        }
        match self.table.weight_of(index) {
            Ok(weight) => Decimal::from_ratio(Uint128::from(weight) * scale, total),
            Err(_) => Decimal::zero(),
        }
    }
}
