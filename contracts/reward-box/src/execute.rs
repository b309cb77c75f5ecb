use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, CosmosMsg, Deps, DepsMut, Env, Event, MessageInfo,
    QueryRequest, Response, StdResult, Timestamp, Uint128, WasmMsg, WasmQuery,
};
use loot_box_common::{
    derive_randomness, draw_from_randomness, AssetKind, NewReward, OpeningStatus, RewardAsset,
    RewardError,
};

use crate::error::ContractError;
use crate::msg::{
    Cw1155ExecuteMsg, Cw721ExecuteMsg, OracleQueryMsg, UpdateConfigParams, WeightUpdate,
};
use crate::state::{
    BoxConfig, Opening, StoredBeaconResponse, BOX_STATE, CONFIG, OPENINGS, POOL, REWARD_CLAIMS,
    USER_OPENINGS, USER_OPEN_COUNT,
};

const MIN_SETTLE_DEADLINE_SECONDS: u64 = 300;
const MAX_SETTLE_DEADLINE_SECONDS: u64 = 7 * 86400;
const MAX_ROUND_DELAY: u64 = 1000;

pub fn validate_settle_deadline(seconds: u64) -> Result<(), ContractError> {
    if !(MIN_SETTLE_DEADLINE_SECONDS..=MAX_SETTLE_DEADLINE_SECONDS).contains(&seconds) {
        return Err(ContractError::InvalidConfig {
            field: "settle_deadline_seconds".to_string(),
            value: seconds.to_string(),
            reason: format!(
                "must be between {MIN_SETTLE_DEADLINE_SECONDS} and {MAX_SETTLE_DEADLINE_SECONDS}"
            ),
        });
    }
    Ok(())
}

/// At least one round ahead, so the beacon is unknown when the box is opened.
pub fn validate_round_delay(rounds: u64) -> Result<(), ContractError> {
    if rounds == 0 || rounds > MAX_ROUND_DELAY {
        return Err(ContractError::InvalidConfig {
            field: "round_delay".to_string(),
            value: rounds.to_string(),
            reason: format!("must be between 1 and {MAX_ROUND_DELAY}"),
        });
    }
    Ok(())
}

/// The target round must be published well inside the settle window:
/// `(round_delay + 1) * drand_period_seconds < settle_deadline_seconds`.
pub fn validate_timing(config: &BoxConfig) -> Result<(), ContractError> {
    let wait = (config.round_delay + 1).saturating_mul(config.drand_period_seconds);
    if wait >= config.settle_deadline_seconds {
        return Err(ContractError::InvalidConfig {
            field: "settle_deadline_seconds".to_string(),
            value: config.settle_deadline_seconds.to_string(),
            reason: format!("must exceed the {wait}s until the target round is published"),
        });
    }
    Ok(())
}

pub fn validate_drand_period(seconds: u64) -> Result<(), ContractError> {
    if seconds == 0 {
        return Err(ContractError::InvalidConfig {
            field: "drand_period_seconds".to_string(),
            value: seconds.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

/// The drand round published at `time`, or 0 before genesis.
pub fn drand_round_at(config: &BoxConfig, time: Timestamp) -> u64 {
    let now = time.seconds();
    if now < config.drand_genesis_time {
        return 0;
    }
    (now - config.drand_genesis_time) / config.drand_period_seconds + 1
}

fn ensure_admin(config: &BoxConfig, sender: &Addr, action: &str) -> Result<(), ContractError> {
    if *sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: format!("only admin can {action}"),
        });
    }
    Ok(())
}

fn asset_event(event: Event, asset: &RewardAsset) -> Event {
    event
        .add_attribute("asset_kind", asset.kind.as_str())
        .add_attribute("asset_ref", asset.asset_ref.clone())
        .add_attribute("amount_or_id", asset.amount_or_id.to_string())
}

/// Add a reward to the pool. Admin only.
pub fn add_reward(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    reward: NewReward,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "add rewards")?;

    let mut pool = POOL.load(deps.storage)?;
    let event = asset_event(Event::new("loot_box_reward_added"), &reward.asset)
        .add_attribute("weight", reward.weight.to_string())
        .add_attribute("stock", reward.stock.to_string());
    let index = pool.add_reward(reward)?;
    POOL.save(deps.storage, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "add_reward")
        .add_attribute("index", index.to_string())
        .add_event(
            event
                .add_attribute("index", index.to_string())
                .add_attribute("total_weight", pool.table().total_weight().to_string()),
        ))
}

/// Add several rewards at once. Admin only.
pub fn add_rewards_batch(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    rewards: Vec<NewReward>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "add rewards")?;

    let mut pool = POOL.load(deps.storage)?;
    let indices = pool.add_rewards(rewards)?;
    POOL.save(deps.storage, &pool)?;

    let indices_str = indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok(Response::new()
        .add_attribute("action", "add_rewards_batch")
        .add_attribute("count", indices.len().to_string())
        .add_event(
            Event::new("loot_box_rewards_added")
                .add_attribute("indices", indices_str)
                .add_attribute("total_weight", pool.table().total_weight().to_string()),
        ))
}

/// Change one reward's weight. Admin only.
pub fn update_weight(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    index: u32,
    weight: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "update weights")?;

    let mut pool = POOL.load(deps.storage)?;
    let old_weight = pool.table().weight_of(index)?;
    pool.update_weight(index, weight)?;
    POOL.save(deps.storage, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "update_weight")
        .add_attribute("index", index.to_string())
        .add_event(
            Event::new("loot_box_weight_updated")
                .add_attribute("index", index.to_string())
                .add_attribute("old_weight", old_weight.to_string())
                .add_attribute("new_weight", weight.to_string())
                .add_attribute("total_weight", pool.table().total_weight().to_string()),
        ))
}

/// Change several weights at once. Admin only.
pub fn update_weights(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    updates: Vec<WeightUpdate>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "update weights")?;

    let pairs: Vec<(u32, u32)> = updates.iter().map(|u| (u.index, u.weight)).collect();
    let mut pool = POOL.load(deps.storage)?;
    pool.update_weights(&pairs)?;
    POOL.save(deps.storage, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "update_weights")
        .add_attribute("count", pairs.len().to_string())
        .add_event(
            Event::new("loot_box_weights_updated")
                .add_attribute("count", pairs.len().to_string())
                .add_attribute("total_weight", pool.table().total_weight().to_string()),
        ))
}

/// Deactivate a reward. Admin only.
pub fn remove_reward(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    index: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "remove rewards")?;

    let mut pool = POOL.load(deps.storage)?;
    let removed = pool.remove_reward(index)?;
    POOL.save(deps.storage, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "remove_reward")
        .add_attribute("index", index.to_string())
        .add_event(
            asset_event(Event::new("loot_box_reward_removed"), &removed.asset)
                .add_attribute("index", index.to_string())
                .add_attribute("total_weight", pool.table().total_weight().to_string()),
        ))
}

/// Overwrite a reward's stock. Admin only.
pub fn set_stock(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    index: u32,
    stock: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "set stock")?;

    let mut pool = POOL.load(deps.storage)?;
    pool.set_stock(index, stock)?;
    POOL.save(deps.storage, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "set_stock")
        .add_attribute("index", index.to_string())
        .add_event(
            Event::new("loot_box_stock_set")
                .add_attribute("index", index.to_string())
                .add_attribute("stock", stock.to_string()),
        ))
}

/// Add to a reward's stock. Admin only.
///
/// Whether the contract actually holds enough of the asset is the admin's
/// responsibility; the ledger only counts claimable units.
pub fn refill_stock(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    index: u32,
    amount: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "refill stock")?;

    let mut pool = POOL.load(deps.storage)?;
    let new_stock = pool.add_stock(index, amount)?;
    POOL.save(deps.storage, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "refill_stock")
        .add_attribute("index", index.to_string())
        .add_event(
            Event::new("loot_box_stock_refilled")
                .add_attribute("index", index.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("new_stock", new_stock.to_string()),
        ))
}

/// The verified beacon for `round`, if the oracle has one.
fn query_beacon(
    deps: Deps,
    config: &BoxConfig,
    round: u64,
) -> Result<Option<StoredBeaconResponse>, ContractError> {
    let beacon_query = QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: config.drand_oracle.to_string(),
        msg: to_json_binary(&OracleQueryMsg::Beacon { round })?,
    });
    let beacon: Option<StoredBeaconResponse> = deps.querier.query(&beacon_query)?;
    Ok(beacon.filter(|b| b.verified && b.randomness.len() == 32))
}

/// Pay the fee and open a box.
///
/// The opening is settled later against the drand round `round_delay` rounds
/// after the current one, so the randomness is unknown to the opener now.
pub fn open_box(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let pool = POOL.load(deps.storage)?;
    if pool.draw_space(config.stock_policy) == 0 {
        // Resolving reports whether the table is empty or only out of stock
        pool.resolve(0, config.stock_policy)?;
        return Err(RewardError::EmptyTable.into());
    }

    let fee_paid = check_open_fee(&config, &info)?;

    let mut state = BOX_STATE.load(deps.storage)?;
    let opening_id = state.next_opening_id;
    state.next_opening_id += 1;
    state.total_opened += 1;
    state.pending_fees += fee_paid;

    let target_drand_round = drand_round_at(&config, env.block.time) + config.round_delay;
    let settle_deadline = env.block.time.plus_seconds(config.settle_deadline_seconds);

    let opening = Opening {
        id: opening_id,
        opener: info.sender.clone(),
        status: OpeningStatus::Pending,
        target_drand_round,
        fee_paid,
        created_at: env.block.time,
        settle_deadline,
        settled_at: None,
        randomness: None,
        draw: None,
        draw_space: None,
        reward_index: None,
        reward: None,
        failure: None,
    };
    OPENINGS.save(deps.storage, opening_id, &opening)?;
    BOX_STATE.save(deps.storage, &state)?;

    USER_OPENINGS.save(deps.storage, (&info.sender, opening_id), &())?;
    let count = USER_OPEN_COUNT
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(0);
    USER_OPEN_COUNT.save(deps.storage, &info.sender, &(count + 1))?;

    Ok(Response::new()
        .add_attribute("action", "open_box")
        .add_attribute("opening_id", opening_id.to_string())
        .add_event(
            Event::new("loot_box_opened")
                .add_attribute("opening_id", opening_id.to_string())
                .add_attribute("opener", info.sender.to_string())
                .add_attribute("fee_paid", fee_paid.to_string())
                .add_attribute("target_drand_round", target_drand_round.to_string())
                .add_attribute("settle_deadline", settle_deadline.seconds().to_string()),
        ))
}

fn check_open_fee(config: &BoxConfig, info: &MessageInfo) -> Result<Uint128, ContractError> {
    let describe = |funds: &[cosmwasm_std::Coin]| {
        if funds.is_empty() {
            "nothing".to_string()
        } else {
            funds
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",")
        }
    };

    if config.open_fee.is_zero() {
        if !info.funds.is_empty() {
            return Err(ContractError::InvalidFee {
                expected: "nothing".to_string(),
                got: describe(info.funds.as_slice()),
            });
        }
        return Ok(Uint128::zero());
    }

    match info.funds.as_slice() {
        [coin] if coin.denom == config.fee_denom && coin.amount == config.open_fee => {
            Ok(coin.amount)
        }
        funds => Err(ContractError::InvalidFee {
            expected: format!("{}{}", config.open_fee, config.fee_denom),
            got: describe(funds),
        }),
    }
}

/// Settle a pending opening. Anyone can call.
///
/// 1. Load the drand beacon for the opening's target round
/// 2. randomness = sha256(beacon || opener || opening_id)
/// 3. draw = uint128(randomness[0..16]) % draw_space
/// 4. Claim the reward for the draw from the pool (reserves one unit of stock)
/// 5. Transfer the asset to the opener
///
/// A draw that lands on an empty reward (or finds nothing to draw) does not
/// pick another reward: the opening fails and its fee is refunded. Any other
/// error aborts the transaction and leaves the opening pending.
///
/// The settle deadline does not apply here. Once the beacon exists the outcome
/// is fixed, and the opening can only be settled, never expired.
pub fn settle_opening(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    opening_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut opening = OPENINGS
        .may_load(deps.storage, opening_id)?
        .ok_or(ContractError::OpeningNotFound { opening_id })?;

    if opening.status != OpeningStatus::Pending {
        return Err(ContractError::OpeningNotPending { opening_id });
    }

    // 1. Query drand oracle for beacon
    let round = opening.target_drand_round;
    let beacon = query_beacon(deps.as_ref(), &config, round)?
        .ok_or(ContractError::BeaconNotFound { round })?;

    // 2-3. Derive the draw
    let randomness = derive_randomness(&beacon.randomness, opening.opener.as_str(), opening_id);
    let mut pool = POOL.load(deps.storage)?;
    let space = pool.draw_space(config.stock_policy);
    let draw = draw_from_randomness(&randomness, space).ok();

    opening.settled_at = Some(env.block.time);
    opening.randomness = Some(randomness.to_vec());
    opening.draw = draw;
    opening.draw_space = Some(space);

    // 4. Claim
    let claim = match draw {
        Some(draw) => pool.claim(draw, config.stock_policy),
        None => Err(RewardError::EmptyTable),
    };
    let claim = match claim {
        Ok(claim) => claim,
        Err(
            err @ (RewardError::OutOfStock { .. }
            | RewardError::NothingInStock
            | RewardError::EmptyTable),
        ) => {
            return fail_opening(deps, env, opening, err);
        }
        Err(err) => return Err(err.into()),
    };
    POOL.save(deps.storage, &pool)?;

    // 5. Transfer. A failing transfer reverts the whole transaction, stock
    // reservation included, so no compensation is needed here.
    let transfer = reward_transfer_msg(&env, &claim.asset, &opening.opener)?;

    opening.status = OpeningStatus::Settled;
    opening.reward_index = Some(claim.index);
    opening.reward = Some(claim.asset.clone());
    OPENINGS.save(deps.storage, opening_id, &opening)?;

    let mut state = BOX_STATE.load(deps.storage)?;
    state.total_settled += 1;
    state.pending_fees = state.pending_fees.saturating_sub(opening.fee_paid);
    state.fee_balance += opening.fee_paid;
    state.total_fees_collected += opening.fee_paid;
    BOX_STATE.save(deps.storage, &state)?;

    let claims = REWARD_CLAIMS
        .may_load(deps.storage, claim.index)?
        .unwrap_or(0);
    REWARD_CLAIMS.save(deps.storage, claim.index, &(claims + 1))?;

    let event = Event::new("loot_box_settled")
        .add_attribute("opening_id", opening_id.to_string())
        .add_attribute("opener", opening.opener.to_string())
        .add_attribute("reward_index", claim.index.to_string())
        .add_attribute("remaining_stock", claim.remaining_stock.to_string())
        .add_attribute("draw", draw.unwrap_or_default().to_string())
        .add_attribute("draw_space", space.to_string())
        .add_attribute("randomness", hex::encode(randomness))
        .add_attribute("drand_round", round.to_string())
        .add_attribute("timestamp", env.block.time.seconds().to_string());

    Ok(Response::new()
        .add_message(transfer)
        .add_attribute("action", "settle_opening")
        .add_attribute("opening_id", opening_id.to_string())
        .add_attribute("reward_index", claim.index.to_string())
        .add_event(asset_event(event, &claim.asset)))
}

fn fail_opening(
    deps: DepsMut,
    env: Env,
    mut opening: Opening,
    err: RewardError,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    opening.status = OpeningStatus::Failed;
    opening.failure = Some(err.to_string());
    OPENINGS.save(deps.storage, opening.id, &opening)?;

    let mut state = BOX_STATE.load(deps.storage)?;
    state.total_failed += 1;
    state.pending_fees = state.pending_fees.saturating_sub(opening.fee_paid);
    BOX_STATE.save(deps.storage, &state)?;

    let mut response = Response::new()
        .add_attribute("action", "settle_opening")
        .add_attribute("opening_id", opening.id.to_string())
        .add_attribute("result", "failed")
        .add_event(
            Event::new("loot_box_open_failed")
                .add_attribute("opening_id", opening.id.to_string())
                .add_attribute("opener", opening.opener.to_string())
                .add_attribute("reason", err.to_string())
                .add_attribute("refunded", opening.fee_paid.to_string())
                .add_attribute("draw_space", opening.draw_space.unwrap_or_default().to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        );
    if let Some(refund) = refund_msg(&config, &opening) {
        response = response.add_message(refund);
    }
    Ok(response)
}

fn refund_msg(config: &BoxConfig, opening: &Opening) -> Option<BankMsg> {
    if opening.fee_paid.is_zero() {
        return None;
    }
    Some(BankMsg::Send {
        to_address: opening.opener.to_string(),
        amount: coins(opening.fee_paid.u128(), config.fee_denom.clone()),
    })
}

/// Message moving a drawn asset from the contract to `recipient`.
pub fn reward_transfer_msg(
    env: &Env,
    asset: &RewardAsset,
    recipient: &Addr,
) -> StdResult<CosmosMsg> {
    let msg = match asset.kind {
        AssetKind::Fungible => CosmosMsg::Bank(BankMsg::Send {
            to_address: recipient.to_string(),
            amount: coins(asset.amount_or_id.u128(), asset.asset_ref.clone()),
        }),
        AssetKind::NonFungible => CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: asset.asset_ref.clone(),
            msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
                recipient: recipient.to_string(),
                token_id: asset.amount_or_id.to_string(),
            })?,
            funds: vec![],
        }),
        AssetKind::SemiFungible => CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: asset.asset_ref.clone(),
            msg: to_json_binary(&Cw1155ExecuteMsg::SendFrom {
                from: env.contract.address.to_string(),
                to: recipient.to_string(),
                token_id: asset.amount_or_id.to_string(),
                value: Uint128::one(),
                msg: None,
            })?,
            funds: vec![],
        }),
    };
    Ok(msg)
}

/// Refund an opening that missed its settle deadline. Anyone can call.
///
/// Only openings whose beacon never arrived are refunded. With the beacon
/// published the draw is public, and a refund would let the opener keep the
/// box only when the draw is good.
pub fn expire_opening(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    opening_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut opening = OPENINGS
        .may_load(deps.storage, opening_id)?
        .ok_or(ContractError::OpeningNotFound { opening_id })?;

    if opening.status != OpeningStatus::Pending {
        return Err(ContractError::OpeningNotPending { opening_id });
    }

    if env.block.time <= opening.settle_deadline {
        return Err(ContractError::OpeningNotExpired {
            opening_id,
            deadline: opening.settle_deadline.seconds(),
        });
    }

    let round = opening.target_drand_round;
    if query_beacon(deps.as_ref(), &config, round)?.is_some() {
        return Err(ContractError::BeaconAvailable { opening_id, round });
    }

    let mut state = BOX_STATE.load(deps.storage)?;
    state.total_expired += 1;
    state.pending_fees = state.pending_fees.saturating_sub(opening.fee_paid);
    BOX_STATE.save(deps.storage, &state)?;

    opening.status = OpeningStatus::Expired;
    OPENINGS.save(deps.storage, opening_id, &opening)?;

    let mut response = Response::new()
        .add_attribute("action", "expire_opening")
        .add_attribute("opening_id", opening_id.to_string())
        .add_event(
            Event::new("loot_box_opening_expired")
                .add_attribute("opening_id", opening_id.to_string())
                .add_attribute("refunded", opening.fee_paid.to_string()),
        );
    if let Some(refund) = refund_msg(&config, &opening) {
        response = response.add_message(refund);
    }
    Ok(response)
}

/// Send the settled fees to `recipient`. Admin only.
pub fn withdraw_fees(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    recipient: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "withdraw fees")?;
    let recipient = deps.api.addr_validate(&recipient)?;

    let mut state = BOX_STATE.load(deps.storage)?;
    if state.fee_balance.is_zero() {
        return Err(ContractError::NothingToWithdraw);
    }
    let amount = state.fee_balance;
    state.fee_balance = Uint128::zero();
    BOX_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: recipient.to_string(),
            amount: coins(amount.u128(), config.fee_denom.clone()),
        })
        .add_attribute("action", "withdraw_fees")
        .add_event(
            Event::new("loot_box_fees_withdrawn")
                .add_attribute("recipient", recipient.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("denom", config.fee_denom),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin,
        drand_oracle,
        round_delay,
        open_fee,
        settle_deadline_seconds,
        stock_policy,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender, "update config")?;

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(oracle) = drand_oracle {
        config.drand_oracle = deps.api.addr_validate(&oracle)?;
    }
    if let Some(delay) = round_delay {
        validate_round_delay(delay)?;
        config.round_delay = delay;
    }
    if let Some(fee) = open_fee {
        config.open_fee = fee;
    }
    if let Some(deadline) = settle_deadline_seconds {
        validate_settle_deadline(deadline)?;
        config.settle_deadline_seconds = deadline;
    }
    if let Some(policy) = stock_policy {
        config.stock_policy = policy;
    }
    validate_timing(&config)?;

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}
