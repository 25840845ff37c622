//! Shared test doubles and fixtures.
#![allow(dead_code)]

use alloy_primitives::{address, Address, B256, U256};
use autodca::domain::entities::plan::{
    Authorization, Plan, DCA_PLAN_EXECUTED_TOPIC, SWAP_EXECUTED_TOPIC,
};
use autodca::domain::entities::token::{MarketData, Token};
use autodca::domain::error::ChainError;
use autodca::domain::ports::chain_client::{ChainClient, EventLog, ExecutorCall, Receipt};
use autodca::domain::ports::notifier::{Notifier, NotifyReason};
use autodca::domain::ports::price_feed::PriceFeed;
use autodca::domain::ports::swap_provider::SwapProvider;
use autodca::DcaEngine;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const EXECUTOR: Address = address!("00000000000000000000000000000000000000e1");
pub const USDC: Address = address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913");
pub const USER: Address = address!("0000000000000000000000000000000000000011");
pub const RECIPIENT: Address = address!("0000000000000000000000000000000000000022");

pub struct MockChain {
    /// Allowance per owner wallet on the funding token.
    pub allowances: Mutex<HashMap<Address, U256>>,
    /// When set, allowance reads fail as if the node were unreachable.
    pub fail_allowance: Mutex<bool>,
    /// Scripted submit results, consumed in order.
    pub submit_results: Mutex<VecDeque<Result<Receipt, ChainError>>>,
    /// Every call that reached submission.
    pub submitted: Mutex<Vec<ExecutorCall>>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            allowances: Mutex::new(HashMap::new()),
            fail_allowance: Mutex::new(false),
            submit_results: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
        })
    }

    pub fn set_allowance(&self, owner: Address, amount: U256) {
        self.allowances.lock().unwrap().insert(owner, amount);
    }

    pub fn script_submit(&self, result: Result<Receipt, ChainError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    pub fn submitted_calls(&self) -> Vec<ExecutorCall> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChainClient for MockChain {
    fn executor_address(&self) -> Address {
        EXECUTOR
    }

    async fn allowance(&self, _token: Address, owner: Address) -> Result<U256, ChainError> {
        if *self.fail_allowance.lock().unwrap() {
            return Err(ChainError::Rpc("node unreachable".into()));
        }
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&owner)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn submit(&self, call: ExecutorCall) -> Result<Receipt, ChainError> {
        self.submitted.lock().unwrap().push(call);
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChainError::Rpc("no scripted receipt".into())))
    }
}

pub struct MockSwapProvider {
    pub calldata: Vec<u8>,
    pub fail: Mutex<bool>,
    pub quotes: Mutex<Vec<(Address, Address, U256)>>,
}

impl MockSwapProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calldata: vec![0xca, 0x11, 0xda, 0x7a],
            fail: Mutex::new(false),
            quotes: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl SwapProvider for MockSwapProvider {
    async fn quote(
        &self,
        src_token: Address,
        dst_token: Address,
        amount: U256,
        _spender: Address,
        _origin: Address,
    ) -> Result<Vec<u8>, String> {
        if *self.fail.lock().unwrap() {
            return Err("Aggregator API 500".into());
        }
        self.quotes.lock().unwrap().push((src_token, dst_token, amount));
        Ok(self.calldata.clone())
    }
}

pub struct MockFeed {
    pub prices: HashMap<Address, MarketData>,
}

impl MockFeed {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            prices: HashMap::new(),
        })
    }

    pub fn with_price(pairs: &[(Address, f64)]) -> Arc<Self> {
        let prices = pairs
            .iter()
            .map(|(addr, price)| {
                (
                    *addr,
                    MarketData {
                        price_usd: Some(*price),
                        ..Default::default()
                    },
                )
            })
            .collect();
        Arc::new(Self { prices })
    }
}

#[async_trait::async_trait]
impl PriceFeed for MockFeed {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, token: Address) -> Result<MarketData, String> {
        self.prices
            .get(&token)
            .cloned()
            .ok_or_else(|| format!("no data for {token}"))
    }
}

pub struct RecordingNotifier {
    pub notes: Mutex<Vec<(String, Address, NotifyReason)>>,
    pub fail: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            notes: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        plan_id: &str,
        wallet: Address,
        reason: NotifyReason,
    ) -> Result<(), String> {
        self.notes
            .lock()
            .unwrap()
            .push((plan_id.to_string(), wallet, reason));
        if *self.fail.lock().unwrap() {
            return Err("delivery failed".into());
        }
        Ok(())
    }
}

pub struct TestEnv {
    pub engine: DcaEngine,
    pub chain: Arc<MockChain>,
    pub swaps: Arc<MockSwapProvider>,
    pub feed: Arc<MockFeed>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn setup() -> TestEnv {
    setup_with_feed(MockFeed::empty())
}

pub fn setup_with_feed(feed: Arc<MockFeed>) -> TestEnv {
    let chain = MockChain::new();
    let swaps = MockSwapProvider::new();
    let notifier = RecordingNotifier::new();
    let engine = DcaEngine::with_providers(
        ":memory:",
        chain.clone(),
        swaps.clone(),
        feed.clone(),
        notifier.clone(),
        USDC,
        6,
    )
    .unwrap();
    TestEnv {
        engine,
        chain,
        swaps,
        feed,
        notifier,
    }
}

pub fn test_token(last_byte: u8, symbol: &str) -> Token {
    let mut bytes = [0u8; 20];
    bytes[19] = last_byte;
    Token::new(Address::from(bytes), symbol, 18)
}

pub fn onchain_plan(id: &str, token: Token, amount_in: u64, frequency: i64) -> Plan {
    Plan::new(
        id,
        USER,
        RECIPIENT,
        token,
        U256::from(amount_in),
        frequency,
        Authorization::OnChain,
    )
}

pub fn ledger_plan(
    id: &str,
    token: Token,
    amount_in: u64,
    frequency: i64,
    plan_id: u64,
    approval: u64,
) -> Plan {
    Plan::new(
        id,
        USER,
        RECIPIENT,
        token,
        U256::from(amount_in),
        frequency,
        Authorization::Ledger {
            plan_id,
            approval_amount: U256::from(approval),
        },
    )
}

fn word(v: u64) -> [u8; 32] {
    U256::from(v).to_be_bytes::<32>()
}

/// A confirmed receipt carrying a well-formed SwapExecuted event for `plan`.
pub fn swap_executed_receipt(plan: &Plan, amount_in: u64, amount_out: u64, seed: u8) -> Receipt {
    let mut data = Vec::new();
    data.extend_from_slice(plan.recipient.into_word().as_slice());
    data.extend_from_slice(plan.token_out.address.into_word().as_slice());
    data.extend_from_slice(&word(amount_in));

    Receipt {
        tx_hash: B256::repeat_byte(seed),
        block_number: 100,
        status: true,
        logs: vec![EventLog {
            address: EXECUTOR,
            topics: vec![
                SWAP_EXECUTED_TOPIC,
                plan.user_wallet.into_word(),
                B256::from(word(amount_out)),
            ],
            data,
        }],
    }
}

/// A confirmed receipt carrying a well-formed DCAPlanExecuted event.
pub fn plan_executed_receipt(
    plan: &Plan,
    amount_in: u64,
    amount_out: u64,
    fee: u64,
    seed: u8,
) -> Receipt {
    let mut data = Vec::new();
    data.extend_from_slice(plan.token_out.address.into_word().as_slice());
    data.extend_from_slice(&word(amount_in));
    data.extend_from_slice(&word(amount_out));
    data.extend_from_slice(&word(fee));

    Receipt {
        tx_hash: B256::repeat_byte(seed),
        block_number: 100,
        status: true,
        logs: vec![EventLog {
            address: EXECUTOR,
            topics: vec![DCA_PLAN_EXECUTED_TOPIC],
            data,
        }],
    }
}

/// A confirmed receipt whose event data is too short to decode.
pub fn truncated_receipt(plan: &Plan, seed: u8) -> Receipt {
    Receipt {
        tx_hash: B256::repeat_byte(seed),
        block_number: 100,
        status: true,
        logs: vec![EventLog {
            address: EXECUTOR,
            topics: vec![
                plan.authorization.event_topic(),
                plan.user_wallet.into_word(),
                B256::ZERO,
            ],
            data: vec![0u8; 32],
        }],
    }
}
