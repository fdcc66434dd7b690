//! File Ledger
//!
//! JSON snapshot on disk, rewritten under the table lock on every upsert.
//! A write that fails to persist is rolled back, so memory never runs ahead
//! of the file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{error, info};

use super::memory::LedgerTable;
use super::{GameOutcome, LedgerError, PlayerRecord, ScoreLedger};

/// Durable ledger stored as one JSON file.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    table: Mutex<LedgerTable>,
}

impl FileLedger {
    /// Open (or create) the ledger at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let table = if path.exists() {
            let data = fs::read(&path)?;
            let table: LedgerTable = serde_json::from_slice(&data)?;
            info!("Loaded ledger {} ({} players)", path.display(), table.players.len());
            table
        } else {
            info!("Creating ledger {}", path.display());
            let table = LedgerTable::default();
            persist(&path, &table)?;
            table
        };
        Ok(Self { path, table: Mutex::new(table) })
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerTable>, LedgerError> {
        self.table
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".into()))
    }
}

impl ScoreLedger for FileLedger {
    fn record_outcome(&self, username: &str, outcome: GameOutcome) -> Result<PlayerRecord, LedgerError> {
        let mut table = self.lock()?;
        let (record, previous) = table.apply(username, outcome);
        if let Err(e) = persist(&self.path, &table) {
            error!("Failed to persist ledger {}: {}", self.path.display(), e);
            table.rollback(username, previous);
            return Err(e);
        }
        Ok(record)
    }

    fn player(&self, username: &str) -> Result<Option<PlayerRecord>, LedgerError> {
        Ok(self.lock()?.players.get(username).cloned())
    }

    fn top_players(&self, limit: usize) -> Result<Vec<PlayerRecord>, LedgerError> {
        Ok(self.lock()?.top(limit))
    }
}

/// Write to a sibling temp file, then rename over the target.
fn persist(path: &Path, table: &LedgerTable) -> Result<(), LedgerError> {
    let data = serde_json::to_vec_pretty(table)?;
    let tmp = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&data)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
