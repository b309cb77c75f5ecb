use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use loot_box_common::{NewReward, RewardPool};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{BoxConfig, BoxStateInfo, BOX_STATE, CONFIG, POOL};

const CONTRACT_NAME: &str = "crates.io:loot-reward-box";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    execute::validate_settle_deadline(msg.settle_deadline_seconds)?;
    execute::validate_round_delay(msg.round_delay)?;
    execute::validate_drand_period(msg.drand_period_seconds)?;

    let config = BoxConfig {
        admin: info.sender.clone(),
        drand_oracle: deps.api.addr_validate(&msg.drand_oracle)?,
        drand_genesis_time: msg.drand_genesis_time,
        drand_period_seconds: msg.drand_period_seconds,
        round_delay: msg.round_delay,
        fee_denom: msg.fee_denom,
        open_fee: msg.open_fee,
        settle_deadline_seconds: msg.settle_deadline_seconds,
        stock_policy: msg.stock_policy.unwrap_or_default(),
    };
    execute::validate_timing(&config)?;
    CONFIG.save(deps.storage, &config)?;

    let box_state = BoxStateInfo {
        next_opening_id: 0,
        total_opened: 0,
        total_settled: 0,
        total_failed: 0,
        total_expired: 0,
        pending_fees: Uint128::zero(),
        fee_balance: Uint128::zero(),
        total_fees_collected: Uint128::zero(),
    };
    BOX_STATE.save(deps.storage, &box_state)?;
    POOL.save(deps.storage, &RewardPool::new())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "reward-box")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddReward {
            asset,
            weight,
            stock,
        } => execute::add_reward(
            deps,
            env,
            info,
            NewReward {
                asset,
                weight,
                stock,
            },
        ),
        ExecuteMsg::AddRewardsBatch { rewards } => {
            execute::add_rewards_batch(deps, env, info, rewards)
        }
        ExecuteMsg::UpdateWeight { index, weight } => {
            execute::update_weight(deps, env, info, index, weight)
        }
        ExecuteMsg::UpdateWeights { updates } => execute::update_weights(deps, env, info, updates),
        ExecuteMsg::RemoveReward { index } => execute::remove_reward(deps, env, info, index),
        ExecuteMsg::SetStock { index, stock } => execute::set_stock(deps, env, info, index, stock),
        ExecuteMsg::RefillStock { index, amount } => {
            execute::refill_stock(deps, env, info, index, amount)
        }
        ExecuteMsg::OpenBox {} => execute::open_box(deps, env, info),
        ExecuteMsg::SettleOpening { opening_id } => {
            execute::settle_opening(deps, env, info, opening_id)
        }
        ExecuteMsg::ExpireOpening { opening_id } => {
            execute::expire_opening(deps, env, info, opening_id)
        }
        ExecuteMsg::WithdrawFees { recipient } => {
            execute::withdraw_fees(deps, env, info, recipient)
        }
        ExecuteMsg::UpdateConfig {
            admin,
            drand_oracle,
            round_delay,
            open_fee,
            settle_deadline_seconds,
            stock_policy,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                drand_oracle,
                round_delay,
                open_fee,
                settle_deadline_seconds,
                stock_policy,
            },
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::BoxState {} => query::query_box_state(deps),
        QueryMsg::Reward { index } => query::query_reward(deps, index),
        QueryMsg::Rewards { start_after, limit } => query::query_rewards(deps, start_after, limit),
        QueryMsg::Weights {} => query::query_weights(deps),
        QueryMsg::Probabilities {} => query::query_probabilities(deps),
        QueryMsg::SimulateDraw { draw } => query::query_simulate_draw(deps, draw),
        QueryMsg::DrawSpace {} => query::query_draw_space(deps),
        QueryMsg::Opening { opening_id } => query::query_opening(deps, opening_id),
        QueryMsg::OpeningHistory { start_after, limit } => {
            query::query_opening_history(deps, start_after, limit)
        }
        QueryMsg::UserOpenings {
            address,
            start_after,
            limit,
        } => query::query_user_openings(deps, address, start_after, limit),
        QueryMsg::RewardDistribution {} => query::query_reward_distribution(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
