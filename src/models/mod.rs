pub mod leg;
pub mod signal;
pub mod timestamp;

pub use leg::{LegId, ParseError, Status};
pub use signal::{Signal, SignalDetail, UpdateEvent, UpdateLog};
pub use timestamp::parse_timestamp;
