use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};
use loot_box_common::{OpeningStatus, RewardAsset, RewardPool, StockPolicy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CONFIG: Item<BoxConfig> = Item::new("config");
pub const BOX_STATE: Item<BoxStateInfo> = Item::new("box_state");
/// Weight table and stock ledger live in one item so every message reads and
/// writes them together.
pub const POOL: Item<RewardPool> = Item::new("pool");
pub const OPENINGS: Map<u64, Opening> = Map::new("openings");

/// Per-user opening tracking
pub const USER_OPENINGS: Map<(&Addr, u64), ()> = Map::new("user_openings");
pub const USER_OPEN_COUNT: Map<&Addr, u32> = Map::new("user_open_count");

/// Settled openings per reward index
pub const REWARD_CLAIMS: Map<u32, u64> = Map::new("reward_claims");

#[cw_serde]
pub struct BoxConfig {
    pub admin: Addr,
    pub drand_oracle: Addr,
    /// Genesis time of the drand network (unix seconds)
    pub drand_genesis_time: u64,
    /// Period between drand rounds in seconds
    pub drand_period_seconds: u64,
    /// Rounds between the opening block and the beacon used to settle it
    pub round_delay: u64,
    pub fee_denom: String,
    /// Fee per opening, zero for free boxes
    pub open_fee: Uint128,
    /// How long an opening may stay pending before it can be expired (seconds)
    pub settle_deadline_seconds: u64,
    pub stock_policy: StockPolicy,
}

#[cw_serde]
pub struct BoxStateInfo {
    pub next_opening_id: u64,
    pub total_opened: u64,
    pub total_settled: u64,
    pub total_failed: u64,
    pub total_expired: u64,
    /// Fees paid by openings that are still pending (refundable)
    pub pending_fees: Uint128,
    /// Fees from settled openings, available to withdraw
    pub fee_balance: Uint128,
    /// Fees kept from settled openings over the contract's lifetime
    pub total_fees_collected: Uint128,
}

#[cw_serde]
pub struct Opening {
    pub id: u64,
    pub opener: Addr,
    pub status: OpeningStatus,
    pub target_drand_round: u64,
    pub fee_paid: Uint128,
    pub created_at: Timestamp,
    pub settle_deadline: Timestamp,
    pub settled_at: Option<Timestamp>,
    pub randomness: Option<Vec<u8>>,
    pub draw: Option<u64>,
    pub draw_space: Option<u64>,
    pub reward_index: Option<u32>,
    pub reward: Option<RewardAsset>,
    /// Why a settlement failed, e.g. the drawn reward was out of stock
    pub failure: Option<String>,
}

/// Response type for querying a beacon from the drand oracle.
/// Mirrors the StoredBeacon struct from the oracle contract. Fields this
/// contract does not read (submission metadata) are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct StoredBeaconResponse {
    pub round: u64,
    pub randomness: Vec<u8>,
    pub signature: Vec<u8>,
    pub verified: bool,
}
