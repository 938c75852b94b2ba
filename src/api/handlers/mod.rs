pub mod execution;
pub mod function;
pub mod health;
pub mod timeline;
