//! Run statistics.

pub mod aggregator;

pub use aggregator::*;
