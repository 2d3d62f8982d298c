//! Domain models shared across the engine, the watcher and the host binary.

pub mod context;
pub mod field;

pub use context::{
    ContextSnapshot, MarginType, PositionRecord, DEFAULT_TIMEFRAME, MAX_LEVERAGE, MIN_LEVERAGE,
};
pub use field::Field;
