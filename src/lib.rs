pub mod dashboard;
pub mod data;
pub mod feed;
pub mod logging;
pub mod metrics;
pub mod risk;
pub mod state;
