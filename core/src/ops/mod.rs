// brook/src/ops/mod.rs

//! Operator nodes. Each node wraps an upstream producer and reshapes the
//! element flow on its way down to the consumer.

pub mod cast;
pub mod fallback;
pub mod fill_absent;
pub mod filter;
pub mod flat_map;
pub mod inspect;
pub mod limit;
pub mod map;
pub mod skip;
pub mod sleep;
pub mod terminal_cache;
pub mod try_map;
pub mod until;

pub use cast::{AnyValue, CastOp};
pub use fallback::OrOp;
pub use fill_absent::FillAbsentOp;
pub use filter::FilterOp;
pub use flat_map::{FlatMapOp, FlatMapper, InnerCursor};
pub use inspect::{AssertEachOp, InspectOp};
pub use limit::LimitOp;
pub use map::{MapNullableOp, MapOp};
pub use skip::SkipOp;
pub use sleep::SleepOp;
pub use terminal_cache::{BufferTransform, BufferedOp};
pub use try_map::TryMapOp;
pub use until::{DropUntilOp, TakeUntilOp};
