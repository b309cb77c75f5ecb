use cosmwasm_std::{to_json_binary, Binary, Decimal, Deps, Order, StdError, StdResult};
use cw_storage_plus::Bound;
use loot_box_common::{RewardError, RewardPool};

use crate::msg::{
    DrawSpaceResponse, OpeningHistoryResponse, ProbabilitiesResponse, ProbabilityEntry,
    RewardClaimCount, RewardDistributionResponse, RewardResponse, RewardsResponse,
    SimulateDrawResponse, UserOpeningsResponse, WeightsResponse,
};
use crate::state::{
    BOX_STATE, CONFIG, OPENINGS, POOL, REWARD_CLAIMS, USER_OPENINGS, USER_OPEN_COUNT,
};

fn engine_err(err: RewardError) -> StdError {
    StdError::generic_err(err.to_string())
}

fn reward_response(pool: &RewardPool, index: u32) -> StdResult<RewardResponse> {
    let entry = pool.table().entry(index).map_err(engine_err)?;
    let reporter = pool.probabilities();
    Ok(RewardResponse {
        index,
        asset: entry.asset.clone(),
        weight: entry.weight,
        active: entry.active,
        stock: pool.ledger().stock_of(index).map_err(engine_err)?,
        cumulative_weight: pool.table().cumulative_at(index).map_err(engine_err)?,
        probability: reporter.probability_of(index),
        tier: reporter.tier_of(index),
    })
}

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_box_state(deps: Deps) -> StdResult<Binary> {
    let state = BOX_STATE.load(deps.storage)?;
    to_json_binary(&state)
}

pub fn query_reward(deps: Deps, index: u32) -> StdResult<Binary> {
    let pool = POOL.load(deps.storage)?;
    to_json_binary(&reward_response(&pool, index)?)
}

/// Every slot, removed ones included, in index order.
pub fn query_rewards(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let pool = POOL.load(deps.storage)?;
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(|i| i as usize + 1).unwrap_or(0);

    let rewards = (start..pool.table().len())
        .take(limit)
        .map(|i| reward_response(&pool, i as u32))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&RewardsResponse { rewards })
}

pub fn query_weights(deps: Deps) -> StdResult<Binary> {
    let pool = POOL.load(deps.storage)?;
    to_json_binary(&WeightsResponse {
        cumulative: pool.table().cumulative().to_vec(),
        total_weight: pool.table().total_weight(),
    })
}

pub fn query_probabilities(deps: Deps) -> StdResult<Binary> {
    let pool = POOL.load(deps.storage)?;
    let reporter = pool.probabilities();

    let entries = reporter
        .all_probabilities()
        .into_iter()
        .map(|(index, probability)| ProbabilityEntry {
            index,
            probability,
            percentage: reporter.percentage_of(index),
            tier: reporter.tier_of(index),
        })
        .collect();

    to_json_binary(&ProbabilitiesResponse {
        total_weight: pool.table().total_weight(),
        entries,
    })
}

pub fn query_simulate_draw(deps: Deps, draw: u64) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let pool = POOL.load(deps.storage)?;

    let index = pool
        .resolve(draw, config.stock_policy)
        .map_err(engine_err)?;
    let entry = pool.table().entry(index).map_err(engine_err)?;

    to_json_binary(&SimulateDrawResponse {
        draw,
        draw_space: pool.draw_space(config.stock_policy),
        index,
        asset: entry.asset.clone(),
    })
}

pub fn query_draw_space(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let pool = POOL.load(deps.storage)?;
    to_json_binary(&DrawSpaceResponse {
        stock_policy: config.stock_policy,
        draw_space: pool.draw_space(config.stock_policy),
        total_weight: pool.table().total_weight(),
    })
}

pub fn query_opening(deps: Deps, opening_id: u64) -> StdResult<Binary> {
    let opening = OPENINGS.load(deps.storage, opening_id)?;
    to_json_binary(&opening)
}

pub fn query_opening_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let openings: Vec<_> = OPENINGS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, opening)| opening)
        .collect();

    to_json_binary(&OpeningHistoryResponse { openings })
}

pub fn query_user_openings(
    deps: Deps,
    address: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let limit = limit.unwrap_or(100).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let opening_ids: Vec<u64> = USER_OPENINGS
        .prefix(&addr)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(opening_id, _)| opening_id)
        .collect();

    let total_openings = USER_OPEN_COUNT
        .may_load(deps.storage, &addr)?
        .unwrap_or(0);

    to_json_binary(&UserOpeningsResponse {
        address,
        total_openings,
        opening_ids,
    })
}

/// How often each reward has actually been handed out.
pub fn query_reward_distribution(deps: Deps) -> StdResult<Binary> {
    let state = BOX_STATE.load(deps.storage)?;

    let rewards = REWARD_CLAIMS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|r| {
            r.map(|(index, claims)| RewardClaimCount {
                index,
                claims,
                share: if state.total_settled == 0 {
                    Decimal::zero()
                } else {
                    Decimal::from_ratio(claims, state.total_settled)
                },
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&RewardDistributionResponse {
        total_settled: state.total_settled,
        rewards,
    })
}
