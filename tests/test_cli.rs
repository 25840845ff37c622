mod common;

use alloy_primitives::U256;
use autodca::cli::commands::parse_plan;
use autodca::domain::entities::plan::Authorization;
use autodca::domain::error::EngineError;
use common::*;

#[test]
fn parses_onchain_plan_payload() {
    let env = setup();
    let token = test_token(0x33, "TKN");
    env.engine.add_token(&token).unwrap();

    let json = format!(
        r#"{{"id":"0xplanhash","user_wallet":"{USER}","recipient":"{RECIPIENT}",
            "token_out":"{}","amount_in":"1000000","frequency":86400}}"#,
        token.address
    );
    let plan = parse_plan(&env.engine, &json).unwrap();

    assert_eq!(plan.id, "0xplanhash");
    assert_eq!(plan.user_wallet, USER);
    assert_eq!(plan.amount_in, U256::from(1_000_000u64));
    assert_eq!(plan.authorization, Authorization::OnChain);
    assert!(plan.active);
}

#[test]
fn plan_id_field_selects_ledger_variant() {
    let env = setup();
    let token = test_token(0x44, "POOL");
    env.engine.add_token(&token).unwrap();

    let json = format!(
        r#"{{"id":"7","user_wallet":"{USER}","recipient":"{RECIPIENT}",
            "token_out":"{}","amount_in":"2000000","frequency":3600,
            "plan_id":7,"approval_amount":"5000000"}}"#,
        token.address
    );
    let plan = parse_plan(&env.engine, &json).unwrap();

    assert_eq!(
        plan.authorization,
        Authorization::Ledger {
            plan_id: 7,
            approval_amount: U256::from(5_000_000u64),
        }
    );
}

#[test]
fn missing_field_is_a_parse_error() {
    let env = setup();
    let token = test_token(0x33, "TKN");
    env.engine.add_token(&token).unwrap();

    let json = format!(
        r#"{{"id":"p","user_wallet":"{USER}","token_out":"{}","amount_in":"1","frequency":60}}"#,
        token.address
    );
    let err = parse_plan(&env.engine, &json).unwrap_err();
    assert!(matches!(err, EngineError::Parse(ref m) if m.contains("recipient")));
}

#[test]
fn unregistered_token_is_not_found() {
    let env = setup();
    let json = format!(
        r#"{{"id":"p","user_wallet":"{USER}","recipient":"{RECIPIENT}",
            "token_out":"{}","amount_in":"1","frequency":60}}"#,
        test_token(0x99, "GHOST").address
    );
    let err = parse_plan(&env.engine, &json).unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let env = setup();
    let err = parse_plan(&env.engine, "{not json").unwrap_err();
    assert!(matches!(err, EngineError::Parse(_)));
}
