//! Grove benchmarking suite
//!
//! Benchmarks for load-order resolution, name merging and on-disk discovery.

pub mod common;

pub use common::*;
