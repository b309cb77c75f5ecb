use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Uint128};

use crate::error::{RewardError, RewardResult};

/// How `amount_or_id` of a reward asset is interpreted.
#[cw_serde]
pub enum AssetKind {
    /// A transferable quantity of a fungible denom.
    Fungible,
    /// One unique token id of an NFT collection.
    NonFungible,
    /// One unit of a token id of a multi-token contract.
    SemiFungible,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Fungible => "fungible",
            AssetKind::NonFungible => "non_fungible",
            AssetKind::SemiFungible => "semi_fungible",
        }
    }
}

/// The asset handed out when a reward is drawn. `asset_ref` is opaque to the
/// engine: a bank denom for fungible rewards, a contract address otherwise.
#[cw_serde]
pub struct RewardAsset {
    pub kind: AssetKind,
    pub asset_ref: String,
    pub amount_or_id: Uint128,
}

impl RewardAsset {
    pub fn validate(&self) -> RewardResult<()> {
        if self.asset_ref.trim().is_empty() {
            return Err(RewardError::InvalidAsset {
                reason: "asset_ref must not be empty".to_string(),
            });
        }
        if self.kind == AssetKind::Fungible && self.amount_or_id.is_zero() {
            return Err(RewardError::InvalidAsset {
                reason: "fungible reward amount must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// A slot in the weight table. Removed entries keep their slot with
/// `active == false` and a weight of zero.
#[cw_serde]
pub struct RewardEntry {
    pub index: u32,
    pub asset: RewardAsset,
    pub weight: u32,
    pub active: bool,
}

/// The lifecycle status of a box opening.
#[cw_serde]
pub enum OpeningStatus {
    Pending,
    Settled,
    Failed,
    Expired,
}

/// Display tier derived from a reward's probability.
#[cw_serde]
pub enum RarityTier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl RarityTier {
    /// >= 40% common, >= 20% rare, >= 5% epic, anything rarer is legendary.
    pub fn from_probability(probability: Decimal) -> Self {
        if probability >= Decimal::percent(40) {
            RarityTier::Common
        } else if probability >= Decimal::percent(20) {
            RarityTier::Rare
        } else if probability >= Decimal::percent(5) {
            RarityTier::Epic
        } else {
            RarityTier::Legendary
        }
    }
}
