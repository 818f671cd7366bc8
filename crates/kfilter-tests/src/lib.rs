//! End-to-end tests for kfilter crates.
//!
//! This crate exercises decode, filter and encode together, and pins the
//! convolution output with golden SHA-256 digests.

#[cfg(test)]
mod golden;
