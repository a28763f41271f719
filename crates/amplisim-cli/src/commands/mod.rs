//! CLI command implementations.

pub mod batch;
pub mod common;
pub mod grover;
pub mod plan;
pub mod run;
