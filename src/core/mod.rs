pub mod classify;
pub mod metrics;
pub mod outcome;
pub mod timeline;

pub use classify::{classify, TradeOutcome};
pub use metrics::{format_duration, format_pct, format_price, format_timestamp, pct};
pub use outcome::{resolve_outcome, HitSource, LegOutcome, Outcome};
pub use timeline::{build_timeline, Step, StepId, Timeline};
