//! Non-fungible donation receipts.
//!
//! Any address with donation history may mint a receipt carrying an opaque
//! metadata URI. Receipts are never transferred or burned here.

pub mod error;
pub mod registry;

pub use error::ReceiptError;
pub use registry::{Receipt, ReceiptRegistry};
