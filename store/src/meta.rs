//! Metadata storage trait.

use crate::StoreError;

/// Key of the current chain height.
pub const HEIGHT_KEY: &str = "chain_height";
/// Key of the serialized treasury totals.
pub const TREASURY_KEY: &str = "treasury_totals";
/// Key of the schema version.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Trait for storing database metadata (schema version, chain height,
/// treasury totals).
///
/// This is a generic key-value store for bookkeeping that doesn't belong in
/// any domain-specific table.
pub trait MetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Current schema version, or 0 for a fresh database.
    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.get_meta(SCHEMA_VERSION_KEY)? {
            None => Ok(0),
            Some(bytes) => {
                let raw: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption(format!("schema version has {} bytes", bytes.len()))
                })?;
                Ok(u32::from_be_bytes(raw))
            }
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put_meta(SCHEMA_VERSION_KEY, &version.to_be_bytes())
    }
}
