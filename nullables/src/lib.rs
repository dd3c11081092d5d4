//! Nullable infrastructure for deterministic testing.
//!
//! Storage is abstracted behind the `dac-store` traits. This crate provides a
//! test-friendly implementation that:
//! - Keeps everything in memory and never touches the filesystem
//! - Orders keys exactly as the LMDB backend does
//! - Can be told to fail the next batch commit
//!
//! Usage: swap the LMDB environment for a [`NullStore`] in tests.

pub mod store;

pub use store::NullStore;
