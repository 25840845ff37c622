mod common;

use alloy_primitives::{B256, U256};
use autodca::domain::entities::execution::Execution;
use autodca::domain::entities::plan::Authorization;
use autodca::domain::entities::token::MarketData;
use autodca::domain::entities::user::User;
use autodca::domain::ports::plan_store::{ExecutionFilter, PlanStore};
use autodca::domain::ports::portfolio_store::PortfolioStore;
use autodca::domain::ports::token_store::TokenStore;
use autodca::domain::values::portfolio::PortfolioSnapshot;
use autodca::infrastructure::sqlite::migrations::run_migrations;
use autodca::infrastructure::sqlite::plan_repo::SqlitePlanRepo;
use autodca::infrastructure::sqlite::portfolio_repo::SqlitePortfolioRepo;
use autodca::infrastructure::sqlite::token_repo::SqliteTokenRepo;
use chrono::{NaiveDate, Utc};
use common::*;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

struct Stores {
    plans: SqlitePlanRepo,
    tokens: SqliteTokenRepo,
    portfolios: SqlitePortfolioRepo,
}

fn stores() -> Stores {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));
    Stores {
        plans: SqlitePlanRepo::new(conn.clone()),
        tokens: SqliteTokenRepo::new(conn.clone()),
        portfolios: SqlitePortfolioRepo::new(conn),
    }
}

fn execution(plan_id: &str, seed: u8, amount_in: u64, amount_out: u64) -> Execution {
    Execution {
        tx_hash: B256::repeat_byte(seed),
        plan_id: plan_id.into(),
        amount_in: U256::from(amount_in),
        amount_out: U256::from(amount_out),
        fee_amount: U256::from(amount_in * 3 / 100),
        token_out: test_token(0x33, "TKN").address,
        decoded: true,
        executed_at: Utc::now(),
    }
}

#[test]
fn onchain_plan_round_trips() {
    let s = stores();
    let token = test_token(0x33, "TKN");
    s.tokens.add_token(&token).unwrap();

    let plan = onchain_plan("0xplanhash", token, 1_000_000, 86_400);
    s.plans.add_plan(&plan).unwrap();

    let stored = s.plans.get_plan("0xplanhash").unwrap().unwrap();
    assert_eq!(stored.id, plan.id);
    assert_eq!(stored.user_wallet, plan.user_wallet);
    assert_eq!(stored.recipient, plan.recipient);
    assert_eq!(stored.token_out.address, plan.token_out.address);
    assert_eq!(stored.amount_in, plan.amount_in);
    assert_eq!(stored.frequency, plan.frequency);
    assert_eq!(stored.last_executed_at, 0);
    assert!(stored.active);
    assert_eq!(stored.authorization, Authorization::OnChain);
}

#[test]
fn ledger_plan_round_trips_with_approval() {
    let s = stores();
    let token = test_token(0x44, "POOL").with_fee_tier(500);
    s.tokens.add_token(&token).unwrap();

    let plan = ledger_plan("7", token, 2_000_000, 3_600, 7, 5_000_000);
    s.plans.add_plan(&plan).unwrap();

    let stored = s.plans.get_plan("7").unwrap().unwrap();
    assert_eq!(
        stored.authorization,
        Authorization::Ledger {
            plan_id: 7,
            approval_amount: U256::from(5_000_000u64),
        }
    );
    assert_eq!(stored.token_out.fee_tier, Some(500));
}

#[test]
fn missing_plan_is_none() {
    let s = stores();
    assert!(s.plans.get_plan("nope").unwrap().is_none());
}

#[test]
fn list_active_excludes_and_preserves_order() {
    let s = stores();
    let token = test_token(0x33, "TKN");
    s.tokens.add_token(&token).unwrap();

    let a = onchain_plan("a", token.clone(), 1, 60);
    let mut b = onchain_plan("b", token.clone(), 1, 60);
    b.active = false;
    let c = onchain_plan("c", token, 1, 60);
    for plan in [&a, &b, &c] {
        s.plans.add_plan(plan).unwrap();
    }

    let active: Vec<String> = s
        .plans
        .list_active_plans()
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(active, vec!["a", "c"]);
}

#[test]
fn mark_executed_advances_schedule_and_approval() {
    let s = stores();
    let token = test_token(0x44, "POOL");
    s.tokens.add_token(&token).unwrap();
    let plan = ledger_plan("7", token, 2_000_000, 3_600, 7, 5_000_000);
    s.plans.add_plan(&plan).unwrap();

    s.plans
        .mark_executed("7", 1_700_000_000, Some(U256::from(3_000_000u64)))
        .unwrap();

    let stored = s.plans.get_plan("7").unwrap().unwrap();
    assert_eq!(stored.last_executed_at, 1_700_000_000);
    assert_eq!(stored.approval_amount(), Some(U256::from(3_000_000u64)));

    // A None approval leaves the current figure alone.
    s.plans.mark_executed("7", 1_700_003_600, None).unwrap();
    let stored = s.plans.get_plan("7").unwrap().unwrap();
    assert_eq!(stored.last_executed_at, 1_700_003_600);
    assert_eq!(stored.approval_amount(), Some(U256::from(3_000_000u64)));
}

#[test]
fn mark_executed_unknown_plan_is_not_found() {
    let s = stores();
    let err = s.plans.mark_executed("ghost", 1, None).unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn reset_approval_only_touches_ledger_plans() {
    let s = stores();
    let token = test_token(0x33, "TKN");
    s.tokens.add_token(&token).unwrap();

    let onchain = onchain_plan("0xplanhash", token.clone(), 1_000_000, 60);
    let ledger = ledger_plan("7", token, 1_000_000, 60, 7, 9_000_000);
    s.plans.add_plan(&onchain).unwrap();
    s.plans.add_plan(&ledger).unwrap();

    s.plans.reset_approval("7").unwrap();
    s.plans.reset_approval("0xplanhash").unwrap();

    let stored = s.plans.get_plan("7").unwrap().unwrap();
    assert_eq!(stored.approval_amount(), Some(U256::ZERO));
    let stored = s.plans.get_plan("0xplanhash").unwrap().unwrap();
    assert_eq!(stored.authorization, Authorization::OnChain);
}

#[test]
fn duplicate_execution_insert_is_ignored() {
    let s = stores();
    let token = test_token(0x33, "TKN");
    s.tokens.add_token(&token).unwrap();
    s.plans
        .add_plan(&onchain_plan("p", token, 1_000_000, 60))
        .unwrap();

    let exec = execution("p", 0xe1, 1_000_000, 500);
    assert!(s.plans.insert_execution(&exec).unwrap());
    assert!(!s.plans.insert_execution(&exec).unwrap());

    let all = s
        .plans
        .list_executions(&ExecutionFilter { plan_id: None, limit: None })
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].tx_hash, exec.tx_hash);
    assert_eq!(all[0].fee_amount, U256::from(30_000u64));
}

#[test]
fn executions_filter_and_limit_newest_first() {
    let s = stores();
    let token = test_token(0x33, "TKN");
    s.tokens.add_token(&token).unwrap();
    s.plans.add_plan(&onchain_plan("p1", token.clone(), 1, 60)).unwrap();
    s.plans.add_plan(&onchain_plan("p2", token, 1, 60)).unwrap();

    s.plans.insert_execution(&execution("p1", 1, 100, 1)).unwrap();
    s.plans.insert_execution(&execution("p2", 2, 200, 2)).unwrap();
    s.plans.insert_execution(&execution("p1", 3, 300, 3)).unwrap();

    let p1 = s
        .plans
        .list_executions(&ExecutionFilter { plan_id: Some("p1".into()), limit: None })
        .unwrap();
    assert_eq!(p1.len(), 2);
    // Newest first.
    assert_eq!(p1[0].tx_hash, B256::repeat_byte(3));
    assert_eq!(p1[1].tx_hash, B256::repeat_byte(1));

    let latest = s
        .plans
        .list_executions(&ExecutionFilter { plan_id: None, limit: Some(1) })
        .unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].plan_id, "p1");
}

#[test]
fn market_data_update_round_trips() {
    let s = stores();
    let token = test_token(0x33, "TKN");
    s.tokens.add_token(&token).unwrap();

    // Freshly added tokens carry no market snapshot.
    let stored = s.tokens.get_token(token.address).unwrap().unwrap();
    assert!(stored.market.is_none());

    s.tokens
        .update_market_data(
            token.address,
            &MarketData {
                price_usd: Some(1.25),
                market_cap_usd: Some(10_000.0),
                ..Default::default()
            },
        )
        .unwrap();

    let stored = s.tokens.get_token(token.address).unwrap().unwrap();
    assert_eq!(stored.price_usd(), Some(1.25));
    assert_eq!(stored.market.as_ref().unwrap().market_cap_usd, Some(10_000.0));
    assert_eq!(stored.market.as_ref().unwrap().fdv_usd, None);
}

#[test]
fn market_data_update_unknown_token_is_not_found() {
    let s = stores();
    let err = s
        .tokens
        .update_market_data(test_token(0x99, "X").address, &MarketData::default())
        .unwrap_err();
    assert!(err.to_string().contains("token"));
}

#[test]
fn data_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("autodca.db");

    {
        let conn = Connection::open(&path).unwrap();
        run_migrations(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let tokens = SqliteTokenRepo::new(conn.clone());
        let plans = SqlitePlanRepo::new(conn);
        let token = test_token(0x33, "TKN");
        tokens.add_token(&token).unwrap();
        plans.add_plan(&onchain_plan("0xplanhash", token, 1_000_000, 60)).unwrap();
    }

    let conn = Connection::open(&path).unwrap();
    run_migrations(&conn).unwrap();
    let plans = SqlitePlanRepo::new(Arc::new(Mutex::new(conn)));
    let stored = plans.get_plan("0xplanhash").unwrap().unwrap();
    assert_eq!(stored.amount_in, U256::from(1_000_000u64));
}

#[test]
fn snapshot_upsert_overwrites_same_day() {
    let s = stores();
    s.portfolios
        .add_user(&User { wallet: USER, fid: Some(42) })
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let first = PortfolioSnapshot {
        user_wallet: USER,
        date,
        invested_usd: 10.0,
        current_value_usd: 12.0,
        percent_change: 20.0,
    };
    s.portfolios.upsert_daily_snapshot(&first).unwrap();

    let second = PortfolioSnapshot {
        current_value_usd: 9.0,
        percent_change: -10.0,
        ..first
    };
    s.portfolios.upsert_daily_snapshot(&second).unwrap();

    let stored = s.portfolios.get_snapshot(USER, date).unwrap().unwrap();
    assert_eq!(stored.invested_usd, 10.0);
    assert_eq!(stored.current_value_usd, 9.0);
    assert_eq!(stored.percent_change, -10.0);

    // A different day is its own row.
    assert!(s
        .portfolios
        .get_snapshot(USER, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap())
        .unwrap()
        .is_none());

    let users = s.portfolios.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].fid, Some(42));
}
