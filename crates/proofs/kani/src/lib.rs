//! Kani harnesses for the rate math
//!
//! Run with: cargo kani -p proofs-kani

#![cfg(kani)]

mod bps;
mod codec;
mod steps;
