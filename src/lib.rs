pub mod analytics;
pub mod config;
pub mod core;
pub mod models;
pub mod monitor;
pub mod source;
#[cfg(test)]
pub mod test_helpers;

pub use crate::core::classify::{classify, TradeOutcome};
pub use crate::core::metrics::{format_duration, format_price, pct};
pub use crate::core::outcome::{resolve_outcome, LegOutcome, Outcome};
pub use crate::core::timeline::{build_timeline, Step, StepId, Timeline};
