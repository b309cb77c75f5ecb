//! Integration tests for the loot reward box.
//!
//! These tests drive the contract through its `instantiate` / `execute` /
//! `query` entry points using `cosmwasm_std::testing` mocks, and check the
//! contract's outcomes against the reward engine in `loot-box-common`.
//!
//! Settlement queries the drand oracle, so the querier is mocked with
//! `MockQuerier::update_wasm`. Each round's randomness is `sha256(round)`.
//!
//! Run:
//! ```bash
//! cargo test -p loot-box-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, ContractResult, CosmosMsg, Decimal, Env,
    MemoryStorage, OwnedDeps, SystemError, SystemResult, Uint128, WasmQuery,
};
use loot_box_common::{
    derive_randomness, draw_from_randomness, AssetKind, NewReward, OpeningStatus, RewardAsset,
    RewardError, RewardPool, StockPolicy,
};
use loot_reward_box::contract::{execute, instantiate, query};
use loot_reward_box::msg::{
    ExecuteMsg, InstantiateMsg, OpeningHistoryResponse, OracleQueryMsg, ProbabilitiesResponse,
    QueryMsg, RewardDistributionResponse, RewardsResponse, SimulateDrawResponse,
    UserOpeningsResponse, WeightUpdate,
};
use loot_reward_box::state::{BoxStateInfo, Opening, StoredBeaconResponse};
use loot_reward_box::ContractError;
use sha2::{Digest, Sha256};

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

const FEE_DENOM: &str = "uinj";
const OPEN_FEE: u128 = 250_000;
const DRAND_PERIOD: u64 = 3;
const ROUND_DELAY: u64 = 2;
const SETTLE_DEADLINE: u64 = 3600;

// ─── Helpers ───

fn round_randomness(round: u64) -> Vec<u8> {
    Sha256::digest(round.to_be_bytes()).to_vec()
}

/// Serves a verified beacon for every round the contract asks for.
fn mock_oracle(deps: &mut TestDeps) {
    mock_oracle_until(deps, u64::MAX);
}

/// Oracle that stopped publishing after `last_round`.
fn mock_oracle_until(deps: &mut TestDeps, last_round: u64) {
    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { msg, .. } => {
            let parsed: Result<OracleQueryMsg, _> = from_json(msg);
            match parsed {
                Ok(OracleQueryMsg::Beacon { round }) => {
                    let beacon = (round <= last_round).then(|| StoredBeaconResponse {
                        round,
                        randomness: round_randomness(round),
                        signature: vec![],
                        verified: true,
                    });
                    SystemResult::Ok(ContractResult::Ok(to_json_binary(&beacon).unwrap()))
                }
                Err(_) => SystemResult::Err(SystemError::InvalidRequest {
                    error: "Unknown query".to_string(),
                    request: Default::default(),
                }),
            }
        }
        _ => SystemResult::Err(SystemError::InvalidRequest {
            error: "Only smart queries supported".to_string(),
            request: Default::default(),
        }),
    });
}

fn instantiate_msg(stock_policy: Option<StockPolicy>) -> InstantiateMsg {
    let mock_api = MockApi::default();
    InstantiateMsg {
        drand_oracle: mock_api.addr_make("drand_oracle").to_string(),
        drand_genesis_time: mock_env().block.time.seconds() - 30_000,
        drand_period_seconds: DRAND_PERIOD,
        round_delay: ROUND_DELAY,
        fee_denom: FEE_DENOM.to_string(),
        open_fee: Uint128::new(OPEN_FEE),
        settle_deadline_seconds: SETTLE_DEADLINE,
        stock_policy,
    }
}

fn setup_box(stock_policy: Option<StockPolicy>) -> TestDeps {
    let mut deps = mock_dependencies();
    mock_oracle(&mut deps);
    let admin = deps.api.addr_make("admin");
    instantiate(
        deps.as_mut(),
        mock_env(),
        message_info(&admin, &[]),
        instantiate_msg(stock_policy),
    )
    .unwrap();
    deps
}

fn admin_exec(
    deps: &mut TestDeps,
    msg: ExecuteMsg,
) -> Result<cosmwasm_std::Response, ContractError> {
    let admin = deps.api.addr_make("admin");
    execute(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg)
}

fn fungible(denom: &str, amount: u128, weight: u32, stock: u64) -> NewReward {
    NewReward {
        asset: RewardAsset {
            kind: AssetKind::Fungible,
            asset_ref: denom.to_string(),
            amount_or_id: Uint128::new(amount),
        },
        weight,
        stock,
    }
}

fn unique_nft(collection: &Addr, token_id: u128, weight: u32) -> NewReward {
    NewReward {
        asset: RewardAsset {
            kind: AssetKind::NonFungible,
            asset_ref: collection.to_string(),
            amount_or_id: Uint128::new(token_id),
        },
        weight,
        stock: 1,
    }
}

fn env_at(offset_seconds: u64) -> Env {
    let mut env = mock_env();
    env.block.time = env.block.time.plus_seconds(offset_seconds);
    env
}

fn open_box(deps: &mut TestDeps, env: Env, user: &Addr) -> u64 {
    let info = message_info(user, &coins(OPEN_FEE, FEE_DENOM));
    let res = execute(deps.as_mut(), env, info, ExecuteMsg::OpenBox {}).unwrap();
    res.attributes
        .iter()
        .find(|a| a.key == "opening_id")
        .unwrap()
        .value
        .parse()
        .unwrap()
}

fn settle(deps: &mut TestDeps, env: Env, opening_id: u64) -> cosmwasm_std::Response {
    let keeper = deps.api.addr_make("keeper");
    execute(
        deps.as_mut(),
        env,
        message_info(&keeper, &[]),
        ExecuteMsg::SettleOpening { opening_id },
    )
    .unwrap()
}

fn load_opening(deps: &TestDeps, opening_id: u64) -> Opening {
    let res = query(deps.as_ref(), mock_env(), QueryMsg::Opening { opening_id }).unwrap();
    from_json(res).unwrap()
}

fn load_state(deps: &TestDeps) -> BoxStateInfo {
    let res = query(deps.as_ref(), mock_env(), QueryMsg::BoxState {}).unwrap();
    from_json(res).unwrap()
}

fn load_pool(deps: &TestDeps) -> RewardPool {
    loot_reward_box::state::POOL.load(deps.as_ref().storage).unwrap()
}

/// What the engine says an opening should produce against `pool`.
fn expected_outcome(
    pool: &RewardPool,
    opening: &Opening,
    policy: StockPolicy,
) -> Result<u32, RewardError> {
    let randomness = derive_randomness(
        &round_randomness(opening.target_drand_round),
        opening.opener.as_str(),
        opening.id,
    );
    let draw = draw_from_randomness(&randomness, pool.draw_space(policy))?;
    pool.resolve(draw, policy)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_season() {
    // 60/30/10 pool with a single legendary NFT. Forty openings across four
    // players; every settlement must match the engine's resolution.
    let mut deps = setup_box(None);
    let collection = deps.api.addr_make("heroes");

    admin_exec(
        &mut deps,
        ExecuteMsg::AddRewardsBatch {
            rewards: vec![
                fungible("ugold", 500, 60, 1_000),
                fungible("ugold", 1_000, 30, 1_000),
                unique_nft(&collection, 2, 10),
            ],
        },
    )
    .unwrap();

    let players: Vec<Addr> = ["alice", "bob", "carol", "dave"]
        .iter()
        .map(|p| deps.api.addr_make(p))
        .collect();

    let mut settled = 0u64;
    let mut failed = 0u64;
    let mut claims = [0u64; 3];

    for i in 0..40u64 {
        let player = &players[(i % 4) as usize];
        // Spread openings over time so target rounds differ
        let opened_at = i * DRAND_PERIOD * 2;
        let opening_id = open_box(&mut deps, env_at(opened_at), player);
        assert_eq!(opening_id, i);

        let opening = load_opening(&deps, opening_id);
        let pool_before = load_pool(&deps);
        let expected = expected_outcome(&pool_before, &opening, StockPolicy::Strict);

        let res = settle(
            &mut deps,
            env_at(opened_at + ROUND_DELAY * DRAND_PERIOD),
            opening_id,
        );
        let opening = load_opening(&deps, opening_id);

        match expected {
            Ok(index) => {
                assert_eq!(opening.status, OpeningStatus::Settled);
                assert_eq!(opening.reward_index, Some(index));
                assert_eq!(res.messages.len(), 1);
                settled += 1;
                claims[index as usize] += 1;
            }
            Err(RewardError::OutOfStock { index }) => {
                // Only the single NFT can run out in this season
                assert_eq!(index, 2);
                assert_eq!(opening.status, OpeningStatus::Failed);
                assert_eq!(
                    res.messages[0].msg,
                    CosmosMsg::Bank(BankMsg::Send {
                        to_address: player.to_string(),
                        amount: coins(OPEN_FEE, FEE_DENOM),
                    })
                );
                failed += 1;
            }
            Err(err) => panic!("unexpected engine error {err}"),
        }
    }

    let state = load_state(&deps);
    assert_eq!(state.total_opened, 40);
    assert_eq!(state.total_settled, settled);
    assert_eq!(state.total_failed, failed);
    assert_eq!(settled + failed, 40);
    assert_eq!(state.pending_fees, Uint128::zero());
    assert_eq!(state.fee_balance, Uint128::new(OPEN_FEE * settled as u128));

    // Stock moved exactly by the number of claims
    let pool = load_pool(&deps);
    assert_eq!(pool.stock_of(0).unwrap(), 1_000 - claims[0]);
    assert_eq!(pool.stock_of(1).unwrap(), 1_000 - claims[1]);
    assert!(claims[2] <= 1);
    assert_eq!(pool.stock_of(2).unwrap(), 1 - claims[2]);

    let res = query(deps.as_ref(), mock_env(), QueryMsg::RewardDistribution {}).unwrap();
    let dist: RewardDistributionResponse = from_json(res).unwrap();
    assert_eq!(dist.total_settled, settled);
    let total_claims: u64 = dist.rewards.iter().map(|r| r.claims).sum();
    assert_eq!(total_claims, settled);
    for entry in &dist.rewards {
        assert_eq!(entry.claims, claims[entry.index as usize]);
    }

    // Per-user bookkeeping
    for player in &players {
        let res = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::UserOpenings {
                address: player.to_string(),
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
        let user: UserOpeningsResponse = from_json(res).unwrap();
        assert_eq!(user.total_openings, 10);
        assert_eq!(user.opening_ids.len(), 10);
    }

    // Admin collects the settled fees
    let treasury = deps.api.addr_make("treasury");
    let res = admin_exec(
        &mut deps,
        ExecuteMsg::WithdrawFees {
            recipient: treasury.to_string(),
        },
    )
    .unwrap();
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Bank(BankMsg::Send {
            to_address: treasury.to_string(),
            amount: coins(OPEN_FEE * settled as u128, FEE_DENOM),
        })
    );
}

#[test]
fn test_rebalance_between_open_and_settle() {
    // Settlement resolves against the pool as it stands when the beacon is
    // used, not as it was when the box was opened.
    let mut deps = setup_box(None);
    admin_exec(
        &mut deps,
        ExecuteMsg::AddRewardsBatch {
            rewards: vec![
                fungible("ugold", 500, 60, 100),
                fungible("ugem", 5, 30, 100),
                fungible("ustar", 1, 10, 100),
            ],
        },
    )
    .unwrap();

    let player = deps.api.addr_make("player");
    let opening_id = open_box(&mut deps, mock_env(), &player);

    admin_exec(&mut deps, ExecuteMsg::RemoveReward { index: 0 }).unwrap();
    admin_exec(
        &mut deps,
        ExecuteMsg::UpdateWeights {
            updates: vec![
                WeightUpdate {
                    index: 1,
                    weight: 45,
                },
                WeightUpdate {
                    index: 2,
                    weight: 5,
                },
            ],
        },
    )
    .unwrap();

    let opening = load_opening(&deps, opening_id);
    let expected = expected_outcome(&load_pool(&deps), &opening, StockPolicy::Strict).unwrap();
    assert_ne!(expected, 0);

    settle(&mut deps, env_at(ROUND_DELAY * DRAND_PERIOD), opening_id);
    let opening = load_opening(&deps, opening_id);
    assert_eq!(opening.status, OpeningStatus::Settled);
    assert_eq!(opening.draw_space, Some(50));
    assert_eq!(opening.reward_index, Some(expected));
}

#[test]
fn test_probabilities_match_simulated_draws() {
    // Counting the reward every draw in [0, total) resolves to reproduces the
    // reported probabilities exactly.
    let mut deps = setup_box(None);
    admin_exec(
        &mut deps,
        ExecuteMsg::AddRewardsBatch {
            rewards: vec![
                fungible("ugold", 500, 50, 10),
                fungible("ugem", 5, 25, 10),
                fungible("ustar", 1, 20, 10),
                fungible("umoon", 1, 5, 10),
            ],
        },
    )
    .unwrap();
    admin_exec(&mut deps, ExecuteMsg::RemoveReward { index: 1 }).unwrap();

    let res = query(deps.as_ref(), mock_env(), QueryMsg::Probabilities {}).unwrap();
    let probs: ProbabilitiesResponse = from_json(res).unwrap();
    assert_eq!(probs.total_weight, 75);

    let mut counts = [0u64; 4];
    for draw in 0..probs.total_weight {
        let res = query(deps.as_ref(), mock_env(), QueryMsg::SimulateDraw { draw }).unwrap();
        let sim: SimulateDrawResponse = from_json(res).unwrap();
        counts[sim.index as usize] += 1;
    }
    assert_eq!(counts, [50, 0, 20, 5]);

    for entry in &probs.entries {
        assert_eq!(
            entry.probability,
            Decimal::from_ratio(counts[entry.index as usize], probs.total_weight)
        );
    }
}

#[test]
fn test_skip_empty_season_never_fails() {
    // Under SkipEmpty every settlement succeeds while any stock remains, and
    // the box refuses to open once everything is gone.
    let mut deps = setup_box(Some(StockPolicy::SkipEmpty));
    let collection = deps.api.addr_make("heroes");
    admin_exec(
        &mut deps,
        ExecuteMsg::AddRewardsBatch {
            rewards: vec![
                fungible("ugold", 500, 70, 3),
                unique_nft(&collection, 1, 20),
                unique_nft(&collection, 2, 10),
            ],
        },
    )
    .unwrap();

    let player = deps.api.addr_make("player");
    for i in 0..5u64 {
        let opened_at = i * 30;
        let opening_id = open_box(&mut deps, env_at(opened_at), &player);
        let opening = load_opening(&deps, opening_id);
        let expected =
            expected_outcome(&load_pool(&deps), &opening, StockPolicy::SkipEmpty).unwrap();

        settle(
            &mut deps,
            env_at(opened_at + ROUND_DELAY * DRAND_PERIOD),
            opening_id,
        );
        let opening = load_opening(&deps, opening_id);
        assert_eq!(opening.status, OpeningStatus::Settled);
        assert_eq!(opening.reward_index, Some(expected));
    }

    let pool = load_pool(&deps);
    assert_eq!(pool.draw_space(StockPolicy::SkipEmpty), 0);
    assert_eq!(pool.table().total_weight(), 100);

    let err = execute(
        deps.as_mut(),
        env_at(1_000),
        message_info(&player, &coins(OPEN_FEE, FEE_DENOM)),
        ExecuteMsg::OpenBox {},
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ContractError::Reward(RewardError::NothingInStock)
    ));

    // A refill makes the box openable again
    admin_exec(
        &mut deps,
        ExecuteMsg::RefillStock {
            index: 0,
            amount: 1,
        },
    )
    .unwrap();
    let opening_id = open_box(&mut deps, env_at(1_000), &player);
    settle(
        &mut deps,
        env_at(1_000 + ROUND_DELAY * DRAND_PERIOD),
        opening_id,
    );
    assert_eq!(load_opening(&deps, opening_id).reward_index, Some(0));
}

#[test]
fn test_expired_openings_are_refunded() {
    let mut deps = setup_box(None);
    admin_exec(
        &mut deps,
        ExecuteMsg::AddReward {
            asset: fungible("ugold", 500, 1, 10).asset,
            weight: 1,
            stock: 10,
        },
    )
    .unwrap();

    let player = deps.api.addr_make("player");
    let first = open_box(&mut deps, mock_env(), &player);
    let second = open_box(&mut deps, env_at(60), &player);
    let first_round = load_opening(&deps, first).target_drand_round;
    assert!(load_opening(&deps, second).target_drand_round > first_round);

    // Oracle goes quiet right after the first opening's round
    mock_oracle_until(&mut deps, first_round);

    let late = env_at(60 + SETTLE_DEADLINE + 1);
    let keeper = deps.api.addr_make("keeper");

    // Its beacon is public, so the first opening must settle, not refund
    let err = execute(
        deps.as_mut(),
        late.clone(),
        message_info(&player, &[]),
        ExecuteMsg::ExpireOpening { opening_id: first },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ContractError::BeaconAvailable { opening_id, round }
            if opening_id == first && round == first_round
    ));
    settle(&mut deps, late.clone(), first);

    let err = execute(
        deps.as_mut(),
        late.clone(),
        message_info(&keeper, &[]),
        ExecuteMsg::SettleOpening { opening_id: second },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::BeaconNotFound { .. }));

    let res = execute(
        deps.as_mut(),
        late,
        message_info(&keeper, &[]),
        ExecuteMsg::ExpireOpening { opening_id: second },
    )
    .unwrap();
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Bank(BankMsg::Send {
            to_address: player.to_string(),
            amount: coins(OPEN_FEE, FEE_DENOM),
        })
    );

    let state = load_state(&deps);
    assert_eq!(state.total_settled, 1);
    assert_eq!(state.total_expired, 1);
    assert_eq!(state.pending_fees, Uint128::zero());
    assert_eq!(state.fee_balance, Uint128::new(OPEN_FEE));

    // Only the settled opening took stock
    assert_eq!(load_pool(&deps).stock_of(0).unwrap(), 9);

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::OpeningHistory {
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let history: OpeningHistoryResponse = from_json(res).unwrap();
    let statuses: Vec<_> = history.openings.iter().map(|o| o.status.clone()).collect();
    assert_eq!(statuses.len(), 2);
    assert!(statuses.contains(&OpeningStatus::Settled));
    assert!(statuses.contains(&OpeningStatus::Expired));
}

#[test]
fn test_reward_pagination() {
    let mut deps = setup_box(None);
    let rewards = (1..=25u32)
        .map(|i| fungible("ugold", u128::from(i) * 100, i, 5))
        .collect();
    admin_exec(&mut deps, ExecuteMsg::AddRewardsBatch { rewards }).unwrap();
    admin_exec(&mut deps, ExecuteMsg::RemoveReward { index: 3 }).unwrap();

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Rewards {
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let page: RewardsResponse = from_json(res).unwrap();
    assert_eq!(page.rewards.len(), 20);
    assert_eq!(page.rewards[0].index, 0);
    assert!(!page.rewards[3].active);

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Rewards {
            start_after: Some(19),
            limit: Some(10),
        },
    )
    .unwrap();
    let page: RewardsResponse = from_json(res).unwrap();
    assert_eq!(page.rewards.len(), 5);
    assert_eq!(page.rewards[0].index, 20);
    assert_eq!(page.rewards[4].cumulative_weight, 325 - 4);
}
