//! LMDB storage backend for the charity governance ledger.
//!
//! Implements all storage traits from `dac-store` using the `heed` LMDB
//! bindings. Each logical table maps to one named database inside a single
//! environment.

pub mod contributor;
pub mod environment;
pub mod error;
pub mod governance;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod payout;
pub mod receipt;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
