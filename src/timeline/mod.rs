//! Execution timeline model.
//!
//! Everything here is a pure function of the record set, the current instant
//! and the user's range/type selection. Callers recompute the whole view on
//! every clock tick or selection change.

pub mod aggregate;
pub mod compare;
pub mod format;
pub mod layout;
pub mod lineage;
pub mod navigation;
pub mod stats;
pub mod window;

pub use aggregate::{FunctionRow, FunctionSummary, TimelineBar, TypeFilter, function_rows};
pub use compare::{Comparison, Verdict};
pub use lineage::{ExecutionIndex, ParentLink};
pub use navigation::{CompareMode, NavigationIntent};
pub use stats::{ExecutionStats, RollingStat, executions_on_day, rolling_stats};
pub use window::{Tick, TimeRange, TimeWindow};
