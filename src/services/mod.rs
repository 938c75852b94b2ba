mod clock;
mod execution_service;
mod function_service;
mod timeline_service;

pub use clock::{Clock, Ticker, TickerHandle};
pub use execution_service::{
    ExecutionLineage, ExecutionPage, ExecutionService, ListParams, ParentState,
};
pub use function_service::{Deployment, FunctionService};
pub use timeline_service::{DashboardStats, TimelineService, TimelineView};
