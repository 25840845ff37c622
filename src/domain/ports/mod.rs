pub mod chain_client;
pub mod notifier;
pub mod plan_store;
pub mod portfolio_store;
pub mod price_feed;
pub mod swap_provider;
pub mod token_store;
