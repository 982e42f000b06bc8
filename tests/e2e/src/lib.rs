//! End-to-end test support
//!
//! - [`harness`]: isolated on-disk snapshot stores and a simulated clock
//! - [`mocks`]: item pools and scripted learners

pub mod harness;
pub mod mocks;
