pub mod execution;
pub mod function;
pub mod timeline;
