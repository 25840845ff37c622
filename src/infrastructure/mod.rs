pub mod aggregator;
pub mod notify;
pub mod pricing;
pub mod rpc;
pub mod sqlite;
