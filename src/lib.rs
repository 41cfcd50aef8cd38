//! `cardinality-sketch` is a Rust crate for estimating the number of distinct elements in a stream of keys using bounded memory.
//!
//! This library uses a fixed bank of HyperLogLog registers with small-range and large-range bias
//! corrections, suitable for analytics aggregation and query planning statistics where an
//! approximate distinct count is acceptable.
pub mod hyperloglog;
mod registers;

pub use hyperloglog::HyperLogLog;
