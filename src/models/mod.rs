pub mod execution;
pub mod function;

pub use execution::{ExecutionRecord, ExecutionStatus, ExecutionType};
pub use function::{EnvVar, FunctionDef, Runtime};
