//! Integration test crate for the circulant tracker.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives circulant-tracking with frames built from circulant-core types.

#[cfg(test)]
mod tracking;
