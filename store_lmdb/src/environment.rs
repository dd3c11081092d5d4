//! LMDB environment setup.

use std::path::{Path, PathBuf};

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn};

use crate::migration::Migrator;
use crate::LmdbError;

/// Names of every database in the environment.
pub(crate) const DATABASES: &[&str] = &[
    "contributors",
    "proposals",
    "votes",
    "receipts",
    "payouts",
    "meta",
];

/// Wraps the LMDB environment and all database handles.
///
/// Implements every `dac-store` trait, so one value serves as the node's
/// whole store.
pub struct LmdbEnvironment {
    path: PathBuf,
    pub(crate) env: Env,
    pub(crate) contributors_db: Database<Bytes, Bytes>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) receipts_db: Database<Bytes, Bytes>,
    pub(crate) payouts_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path and bring its
    /// schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path
        // and never concurrently memory-mapped by another open call.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(DATABASES.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let contributors_db = env.create_database(&mut wtxn, Some("contributors"))?;
        let proposals_db = env.create_database(&mut wtxn, Some("proposals"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let receipts_db = env.create_database(&mut wtxn, Some("receipts"))?;
        let payouts_db = env.create_database(&mut wtxn, Some("payouts"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        let store = Self {
            path: path.to_path_buf(),
            env,
            contributors_db,
            proposals_db,
            votes_db,
            receipts_db,
            payouts_db,
            meta_db,
        };
        Migrator::run(&store)?;

        tracing::info!(path = %path.display(), map_size, "LMDB environment opened");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    // ── Shared helpers ──────────────────────────────────────────────────

    pub(crate) fn put(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &[u8],
    ) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        db.put(&mut wtxn, key, value)?;
        wtxn.commit()?;
        Ok(())
    }

    pub(crate) fn get(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        Ok(db.get(&rtxn, key)?.map(<[u8]>::to_vec))
    }

    /// Every value in `db`, in key order.
    pub(crate) fn values(&self, db: Database<Bytes, Bytes>) -> Result<Vec<Vec<u8>>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        collect_values(db, &rtxn)
    }

    pub(crate) fn count(&self, db: Database<Bytes, Bytes>) -> Result<u64, LmdbError> {
        let rtxn = self.env.read_txn()?;
        Ok(db.len(&rtxn)?)
    }
}

fn collect_values(db: Database<Bytes, Bytes>, rtxn: &RoTxn) -> Result<Vec<Vec<u8>>, LmdbError> {
    let mut out = Vec::new();
    for entry in db.iter(rtxn)? {
        let (_, value) = entry?;
        out.push(value.to_vec());
    }
    Ok(out)
}
