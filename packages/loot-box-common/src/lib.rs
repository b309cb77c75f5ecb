pub mod error;
pub mod pool;
pub mod probability;
pub mod randomness;
pub mod selector;
pub mod stock;
pub mod types;
pub mod weights;

pub use error::{RewardError, RewardResult};
pub use pool::{Claim, NewReward, RewardPool};
pub use probability::ProbabilityReporter;
pub use randomness::{derive_randomness, draw_from_randomness};
pub use selector::StockPolicy;
pub use stock::StockLedger;
pub use types::{AssetKind, OpeningStatus, RarityTier, RewardAsset, RewardEntry};
pub use weights::WeightTable;
