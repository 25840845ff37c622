pub mod abi;
pub mod batch;
pub mod portfolio;
pub mod schedule;
pub mod swap_event;
