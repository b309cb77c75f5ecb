use thiserror::Error;

/// Errors surfaced by the reward engine. Every operation reports them to the
/// immediate caller; nothing is retried or redirected internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("invalid weight {weight}: must be a positive integer")]
    InvalidWeight { weight: u32 },

    #[error("invalid stock for reward {index}: {reason}")]
    InvalidStock { index: u32, reason: String },

    #[error("reward {index} not found")]
    NotFound { index: u32 },

    #[error("draw {draw} outside [0, {space})")]
    InvalidDraw { draw: u64, space: u64 },

    #[error("reward {index} is out of stock")]
    OutOfStock { index: u32 },

    #[error("reward table has no active weight to draw from")]
    EmptyTable,

    #[error("no active reward has stock left")]
    NothingInStock,

    #[error("stock for reward {index} would overflow: {current} + {delta}")]
    Overflow { index: u32, current: u64, delta: u64 },

    #[error("invalid asset: {reason}")]
    InvalidAsset { reason: String },
}

pub type RewardResult<T> = Result<T, RewardError>;
