use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Decimal, Uint128};
use loot_box_common::{NewReward, RarityTier, RewardAsset, StockPolicy};

use crate::state::{BoxConfig, BoxStateInfo, Opening};

#[cw_serde]
pub struct InstantiateMsg {
    pub drand_oracle: String,
    pub drand_genesis_time: u64,
    pub drand_period_seconds: u64,
    pub round_delay: u64,
    pub fee_denom: String,
    pub open_fee: Uint128,
    pub settle_deadline_seconds: u64,
    /// Defaults to `Strict`: a draw landing on an empty reward fails.
    pub stock_policy: Option<StockPolicy>,
}

#[cw_serde]
pub struct WeightUpdate {
    pub index: u32,
    pub weight: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Add a reward to the pool. Admin only.
    AddReward {
        asset: RewardAsset,
        weight: u32,
        stock: u64,
    },
    /// Add several rewards at once; all or none are added. Admin only.
    AddRewardsBatch { rewards: Vec<NewReward> },
    /// Change one reward's weight. Admin only.
    UpdateWeight { index: u32, weight: u32 },
    /// Change several weights at once; all or none are applied. Admin only.
    UpdateWeights { updates: Vec<WeightUpdate> },
    /// Deactivate a reward. Its index is never reused. Admin only.
    RemoveReward { index: u32 },
    /// Overwrite a reward's remaining stock. Admin only.
    SetStock { index: u32, stock: u64 },
    /// Add to a reward's remaining stock. Admin only.
    RefillStock { index: u32, amount: u64 },
    /// Pay the fee and open a box. Settled against a future drand round.
    OpenBox {},
    /// Settle a pending opening once its drand beacon is available. Anyone can call.
    SettleOpening { opening_id: u64 },
    /// Refund an opening that was not settled in time. Anyone can call.
    ExpireOpening { opening_id: u64 },
    /// Send the collected fees to `recipient`. Admin only.
    WithdrawFees { recipient: String },
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        drand_oracle: Option<String>,
        round_delay: Option<u64>,
        open_fee: Option<Uint128>,
        settle_deadline_seconds: Option<u64>,
        stock_policy: Option<StockPolicy>,
    },
}

pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub drand_oracle: Option<String>,
    pub round_delay: Option<u64>,
    pub open_fee: Option<Uint128>,
    pub settle_deadline_seconds: Option<u64>,
    pub stock_policy: Option<StockPolicy>,
}

#[cw_serde]
pub struct MigrateMsg {}

/// Query message for the drand oracle contract.
#[cw_serde]
pub enum OracleQueryMsg {
    Beacon { round: u64 },
}

/// Transfer message understood by cw721 collections.
#[cw_serde]
pub enum Cw721ExecuteMsg {
    TransferNft { recipient: String, token_id: String },
}

/// Transfer message understood by cw1155 multi-token contracts.
#[cw_serde]
pub enum Cw1155ExecuteMsg {
    SendFrom {
        from: String,
        to: String,
        token_id: String,
        value: Uint128,
        msg: Option<Binary>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(BoxConfig)]
    Config {},
    #[returns(BoxStateInfo)]
    BoxState {},
    #[returns(RewardResponse)]
    Reward { index: u32 },
    #[returns(RewardsResponse)]
    Rewards {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    /// The cumulative weight array and its total.
    #[returns(WeightsResponse)]
    Weights {},
    #[returns(ProbabilitiesResponse)]
    Probabilities {},
    /// Resolve a draw against the current pool without taking stock.
    #[returns(SimulateDrawResponse)]
    SimulateDraw { draw: u64 },
    #[returns(DrawSpaceResponse)]
    DrawSpace {},
    #[returns(Opening)]
    Opening { opening_id: u64 },
    #[returns(OpeningHistoryResponse)]
    OpeningHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(UserOpeningsResponse)]
    UserOpenings {
        address: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(RewardDistributionResponse)]
    RewardDistribution {},
}

#[cw_serde]
pub struct RewardResponse {
    pub index: u32,
    pub asset: RewardAsset,
    pub weight: u32,
    pub active: bool,
    pub stock: u64,
    pub cumulative_weight: u64,
    pub probability: Decimal,
    pub tier: RarityTier,
}

#[cw_serde]
pub struct RewardsResponse {
    pub rewards: Vec<RewardResponse>,
}

#[cw_serde]
pub struct WeightsResponse {
    pub cumulative: Vec<u64>,
    pub total_weight: u64,
}

#[cw_serde]
pub struct ProbabilityEntry {
    pub index: u32,
    pub probability: Decimal,
    pub percentage: Decimal,
    pub tier: RarityTier,
}

#[cw_serde]
pub struct ProbabilitiesResponse {
    pub total_weight: u64,
    pub entries: Vec<ProbabilityEntry>,
}

#[cw_serde]
pub struct SimulateDrawResponse {
    pub draw: u64,
    pub draw_space: u64,
    pub index: u32,
    pub asset: RewardAsset,
}

#[cw_serde]
pub struct DrawSpaceResponse {
    pub stock_policy: StockPolicy,
    pub draw_space: u64,
    pub total_weight: u64,
}

#[cw_serde]
pub struct OpeningHistoryResponse {
    pub openings: Vec<Opening>,
}

#[cw_serde]
pub struct UserOpeningsResponse {
    pub address: String,
    pub total_openings: u32,
    pub opening_ids: Vec<u64>,
}

#[cw_serde]
pub struct RewardClaimCount {
    pub index: u32,
    pub claims: u64,
    /// Share of all settled openings
    pub share: Decimal,
}

#[cw_serde]
pub struct RewardDistributionResponse {
    pub total_settled: u64,
    pub rewards: Vec<RewardClaimCount>,
}
