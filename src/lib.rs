pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::authorize::AuthorizationGuard;
use crate::application::portfolio::{PortfolioUseCase, SnapshotReport};
use crate::application::record::ExecutionRecorder;
use crate::application::run_batch::RunBatchUseCase;
use crate::application::submit::TransactionSubmitter;
use crate::application::update_prices::{PriceRefreshReport, UpdatePricesUseCase};
use crate::domain::entities::execution::Execution;
use crate::domain::entities::plan::Plan;
use crate::domain::entities::token::Token;
use crate::domain::entities::user::User;
use crate::domain::error::EngineError;
use crate::domain::ports::chain_client::ChainClient;
use crate::domain::ports::notifier::Notifier;
use crate::domain::ports::plan_store::{ExecutionFilter, PlanStore};
use crate::domain::ports::portfolio_store::PortfolioStore;
use crate::domain::ports::price_feed::PriceFeed;
use crate::domain::ports::swap_provider::SwapProvider;
use crate::domain::ports::token_store::TokenStore;
use crate::domain::values::batch::BatchReport;
use crate::domain::values::portfolio::PortfolioSnapshot;
use crate::infrastructure::aggregator::one_inch::OneInchProvider;
use crate::infrastructure::notify::log_notifier::LogNotifier;
use crate::infrastructure::pricing::gecko::GeckoTerminalFeed;
use crate::infrastructure::rpc::chain::JsonRpcChain;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::plan_repo::SqlitePlanRepo;
use crate::infrastructure::sqlite::portfolio_repo::SqlitePortfolioRepo;
use crate::infrastructure::sqlite::token_repo::SqliteTokenRepo;
use alloy_primitives::Address;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::Arc;

/// Environment-supplied configuration, passed explicitly into the engine
/// constructor so every collaborator can be swapped for a test double.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub db_path: String,
    pub rpc_url: String,
    /// Account the node signs submissions with.
    pub signer: Address,
    /// DCA executor contract.
    pub executor: Address,
    /// Funding asset debited by every plan (USDC in production).
    pub funding_token: Address,
    pub funding_decimals: u8,
    pub aggregator_url: String,
    pub aggregator_api_key: String,
    pub referrer: Address,
    pub price_feed_url: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, EngineError> {
        Ok(Self {
            db_path: std::env::var("AUTODCA_DB").unwrap_or_else(|_| "./autodca.db".into()),
            rpc_url: require_env("RPC_URL")?,
            signer: addr_env("SIGNER_ADDRESS", None)?,
            executor: addr_env("DCA_EXECUTOR_ADDRESS", None)?,
            funding_token: addr_env(
                "FUNDING_TOKEN_ADDRESS",
                // USDC on Base
                Some("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
            )?,
            funding_decimals: std::env::var("FUNDING_TOKEN_DECIMALS")
                .ok()
                .map(|s| s.parse().map_err(|e| EngineError::Config(format!("FUNDING_TOKEN_DECIMALS: {e}"))))
                .transpose()?
                .unwrap_or(6),
            aggregator_url: std::env::var("ONEINCH_BASE_URL")
                .unwrap_or_else(|_| "https://api.1inch.dev/swap/v6.0/8453/swap".into()),
            aggregator_api_key: require_env("ONEINCH_API_KEY")?,
            referrer: addr_env(
                "REFERRER_ADDRESS",
                Some("0xe42c136730a9cfefb5514d4d3d06eb27baaf3f08"),
            )?,
            price_feed_url: std::env::var("GECKOTERMINAL_BASE_URL").ok(),
        })
    }
}

fn require_env(name: &str) -> Result<String, EngineError> {
    std::env::var(name).map_err(|_| EngineError::Config(format!("{name} is not set")))
}

fn addr_env(name: &str, default: Option<&str>) -> Result<Address, EngineError> {
    let raw = match (std::env::var(name), default) {
        (Ok(v), _) => v,
        (Err(_), Some(d)) => d.to_string(),
        (Err(_), None) => return Err(EngineError::Config(format!("{name} is not set"))),
    };
    raw.parse()
        .map_err(|e| EngineError::Config(format!("{name}: {e}")))
}

pub struct DcaEngine {
    run_batch_uc: RunBatchUseCase,
    update_prices_uc: UpdatePricesUseCase,
    portfolio_uc: PortfolioUseCase,
    plan_store: Arc<dyn PlanStore>,
    token_store: Arc<dyn TokenStore>,
    portfolio_store: Arc<dyn PortfolioStore>,
}

impl DcaEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let chain: Arc<dyn ChainClient> = Arc::new(JsonRpcChain::new(
            config.rpc_url.clone(),
            config.signer,
            config.executor,
        ));
        let swaps: Arc<dyn SwapProvider> = Arc::new(OneInchProvider::new(
            config.aggregator_url.clone(),
            config.aggregator_api_key.clone(),
            config.referrer,
        ));
        let feed: Arc<dyn PriceFeed> = Arc::new(match &config.price_feed_url {
            Some(url) => GeckoTerminalFeed::new(url.clone()),
            None => GeckoTerminalFeed::base_network(),
        });

        Self::with_providers(
            &config.db_path,
            chain,
            swaps,
            feed,
            Arc::new(LogNotifier),
            config.funding_token,
            config.funding_decimals,
        )
    }

    /// Full wiring with injectable collaborators; the path `:memory:` gives
    /// an ephemeral store for tests.
    pub fn with_providers(
        db_path: &str,
        chain: Arc<dyn ChainClient>,
        swaps: Arc<dyn SwapProvider>,
        feed: Arc<dyn PriceFeed>,
        notifier: Arc<dyn Notifier>,
        funding_token: Address,
        funding_decimals: u8,
    ) -> Result<Self, EngineError> {
        // One connection shared across the repos: every batch write happens
        // on the single orchestrator thread, and a shared handle keeps
        // `:memory:` databases usable in tests.
        let conn = open_db(db_path)?;
        run_migrations(&conn).map_err(EngineError::Store)?;
        let conn = Arc::new(std::sync::Mutex::new(conn));

        let plan_store: Arc<dyn PlanStore> = Arc::new(SqlitePlanRepo::new(conn.clone()));
        let token_store: Arc<dyn TokenStore> = Arc::new(SqliteTokenRepo::new(conn.clone()));
        let portfolio_store: Arc<dyn PortfolioStore> = Arc::new(SqlitePortfolioRepo::new(conn));

        let executor = chain.executor_address();
        let guard = AuthorizationGuard::new(chain.clone(), funding_token);
        let submitter = TransactionSubmitter::new(chain.clone(), swaps, funding_token);
        let recorder = ExecutionRecorder::new(plan_store.clone());

        Ok(Self {
            run_batch_uc: RunBatchUseCase::new(
                plan_store.clone(),
                guard,
                submitter,
                recorder,
                notifier,
                executor,
            ),
            update_prices_uc: UpdatePricesUseCase::new(token_store.clone(), feed),
            portfolio_uc: PortfolioUseCase::new(
                plan_store.clone(),
                token_store.clone(),
                portfolio_store.clone(),
                funding_decimals,
            ),
            plan_store,
            token_store,
            portfolio_store,
        })
    }

    /// One pass over all active plans at `now` (unix seconds).
    pub async fn run_batch(&self, now: i64) -> Result<BatchReport, EngineError> {
        self.run_batch_uc.execute(now).await
    }

    pub async fn update_prices(&self) -> Result<PriceRefreshReport, EngineError> {
        self.update_prices_uc.execute().await
    }

    pub async fn update_portfolios(&self, date: NaiveDate) -> Result<SnapshotReport, EngineError> {
        self.portfolio_uc.execute(date).await
    }

    pub fn add_plan(&self, plan: &Plan) -> Result<(), EngineError> {
        self.plan_store.add_plan(plan)
    }

    pub fn get_plan(&self, id: &str) -> Result<Option<Plan>, EngineError> {
        self.plan_store.get_plan(id)
    }

    pub fn list_active_plans(&self) -> Result<Vec<Plan>, EngineError> {
        self.plan_store.list_active_plans()
    }

    pub fn executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>, EngineError> {
        self.plan_store.list_executions(filter)
    }

    pub fn add_token(&self, token: &Token) -> Result<(), EngineError> {
        self.token_store.add_token(token)
    }

    pub fn get_token(&self, address: Address) -> Result<Option<Token>, EngineError> {
        self.token_store.get_token(address)
    }

    pub fn add_user(&self, user: &User) -> Result<(), EngineError> {
        self.portfolio_store.add_user(user)
    }

    pub fn get_snapshot(
        &self,
        wallet: Address,
        date: NaiveDate,
    ) -> Result<Option<PortfolioSnapshot>, EngineError> {
        self.portfolio_store.get_snapshot(wallet, date)
    }
}

fn open_db(db_path: &str) -> Result<Connection, EngineError> {
    let conn = Connection::open(db_path)
        .map_err(|e| EngineError::Store(format!("DB error: {e}")))?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| EngineError::Store(format!("WAL error: {e}")))?;
    Ok(conn)
}
