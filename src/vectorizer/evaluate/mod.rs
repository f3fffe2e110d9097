pub mod classify;
pub mod metrics;
