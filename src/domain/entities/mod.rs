pub mod execution;
pub mod plan;
pub mod token;
pub mod user;
