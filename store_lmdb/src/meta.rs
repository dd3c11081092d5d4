//! LMDB implementation of MetaStore.

use dac_store::{MetaStore, StoreError};

use crate::LmdbEnvironment;

impl MetaStore for LmdbEnvironment {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        Ok(self.put(self.meta_db, key.as_bytes(), value)?)
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get(self.meta_db, key.as_bytes())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dac_store::meta::{HEIGHT_KEY, SCHEMA_VERSION_KEY};

    #[test]
    fn meta_roundtrip_and_corrupt_version() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("open");

        assert!(env.get_meta(HEIGHT_KEY).expect("get").is_none());
        env.put_meta(HEIGHT_KEY, &7u64.to_be_bytes()).expect("put");
        assert_eq!(
            env.get_meta(HEIGHT_KEY).expect("get"),
            Some(7u64.to_be_bytes().to_vec())
        );

        env.put_meta(SCHEMA_VERSION_KEY, b"xx").expect("put");
        assert!(matches!(
            env.get_schema_version(),
            Err(StoreError::Corruption(_))
        ));
    }
}
