//! Shared test utilities for osha-inspect integration tests.
//!
//! This module provides:
//! - `PageBuilder` for rendering inspection-detail HTML with chosen fields
//! - In-memory mapping tables and dataset builders
//! - `FakeFetcher` and `TestHarness` for batch runs against a temp cache

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{FakeFetcher, TestHarness};
