pub mod authorize;
pub mod portfolio;
pub mod record;
pub mod run_batch;
pub mod submit;
pub mod update_prices;
