//! Tripwire — BLAKE3 hashing and drift detection for generated files.

pub mod drift;
pub mod hasher;
