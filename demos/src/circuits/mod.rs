//! Circuit generators for the demos.

pub mod adder;
pub mod encoding;
pub mod grover;
