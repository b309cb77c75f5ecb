use cosmwasm_std::StdError;
use loot_box_common::RewardError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Reward(#[from] RewardError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("opening {opening_id} not found")]
    OpeningNotFound { opening_id: u64 },

    #[error("opening {opening_id} is not pending")]
    OpeningNotPending { opening_id: u64 },

    #[error("opening {opening_id} cannot expire: beacon for round {round} is available, settle it")]
    BeaconAvailable { opening_id: u64, round: u64 },

    #[error("opening {opening_id} has not expired yet (deadline: {deadline})")]
    OpeningNotExpired { opening_id: u64, deadline: u64 },

    #[error("drand beacon not found for round {round}")]
    BeaconNotFound { round: u64 },

    #[error("invalid fee: expected {expected}, got {got}")]
    InvalidFee { expected: String, got: String },

    #[error("invalid config: {field} = {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    #[error("no fees to withdraw")]
    NothingToWithdraw,
}
