pub mod browse;
pub mod check;
pub mod export;
pub mod metrics;
pub mod sample;
pub mod show;
