//! Maps a draw to a reward index.
//!
//! Selection is CDF inversion: entry `i` owns `[cumulative[i - 1], cumulative[i])`,
//! so under a uniform draw over `[0, total)` the chance of landing on `i` is
//! exactly `weight[i] / total`. Resolution is a pure function of the draw and the
//! two structures; all randomness enters through `draw`.

use cosmwasm_schema::cw_serde;

use crate::error::{RewardError, RewardResult};
use crate::stock::StockLedger;
use crate::weights::WeightTable;

/// What happens when a draw can land on an entry without stock.
#[cw_serde]
#[derive(Default, Copy)]
pub enum StockPolicy {
    /// Stock and weight are independent. A draw that lands on an empty entry
    /// fails with `OutOfStock` and is never redirected to another entry.
    #[default]
    Strict,
    /// Entries without stock are treated as weight zero for the draw. The draw
    /// space shrinks to the weight of active entries that still have stock.
    SkipEmpty,
}

/// Exclusive upper bound of valid draws under `policy`.
pub fn draw_space(table: &WeightTable, ledger: &StockLedger, policy: StockPolicy) -> u64 {
    match policy {
        StockPolicy::Strict => table.total_weight(),
        StockPolicy::SkipEmpty => table
            .entries()
            .iter()
            .filter(|e| e.active && ledger.stock_of(e.index).unwrap_or(0) > 0)
            .map(|e| u64::from(e.weight))
            .sum(),
    }
}

/// Resolves `draw` to an index without touching stock.
pub fn resolve(
    draw: u64,
    table: &WeightTable,
    ledger: &StockLedger,
    policy: StockPolicy,
) -> RewardResult<u32> {
    match policy {
        StockPolicy::Strict => {
            let index = table.find(draw)?;
            if ledger.stock_of(index)? == 0 {
                return Err(RewardError::OutOfStock { index });
            }
            Ok(index)
        }
        StockPolicy::SkipEmpty => resolve_in_stock(draw, table, ledger),
    }
}

/// Resolves `draw` and reserves one unit of the selected entry's stock.
pub fn select(
    draw: u64,
    table: &WeightTable,
    ledger: &mut StockLedger,
    policy: StockPolicy,
) -> RewardResult<u32> {
    let index = resolve(draw, table, ledger, policy)?;
    if !ledger.try_decrement(index)? {
        return Err(RewardError::OutOfStock { index });
    }
    Ok(index)
}

fn resolve_in_stock(draw: u64, table: &WeightTable, ledger: &StockLedger) -> RewardResult<u32> {
    if table.total_weight() == 0 {
        return Err(RewardError::EmptyTable);
    }
    let space = draw_space(table, ledger, StockPolicy::SkipEmpty);
    if space == 0 {
        return Err(RewardError::NothingInStock);
    }
    if draw >= space {
        return Err(RewardError::InvalidDraw { draw, space });
    }

    let mut upper = 0u64;
    for entry in table.entries().iter().filter(|e| e.active) {
        if ledger.stock_of(entry.index)? == 0 {
            continue;
        }
        upper += u64::from(entry.weight);
        if draw < upper {
            return Ok(entry.index);
        }
    }
    // draw < space means the loop above always returns
    Err(RewardError::InvalidDraw { draw, space })
}
