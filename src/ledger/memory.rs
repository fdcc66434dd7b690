//! In-Memory Ledger
//!
//! Whole table behind one mutex: every upsert is a single critical section.
//! Used on its own for development, as the offline stand-in of the
//! scoreboard, and as the working table of the file ledger.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::{leaderboard_order, GameOutcome, LedgerError, PlayerRecord, ScoreLedger};

/// Player rows plus the next registration number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerTable {
    /// Next registration sequence number.
    pub next_seq: u64,
    /// Rows keyed by username.
    pub players: BTreeMap<String, PlayerRecord>,
}

impl LedgerTable {
    /// Upsert one outcome, returning the previous row (for rollback).
    pub fn apply(&mut self, username: &str, outcome: GameOutcome) -> (PlayerRecord, Option<PlayerRecord>) {
        let previous = self.players.get(username).cloned();
        let seq = self.next_seq;
        let record = self
            .players
            .entry(username.to_string())
            .or_insert_with(|| PlayerRecord::new(username, seq));
        if previous.is_none() {
            self.next_seq += 1;
        }
        record.apply(outcome);
        (record.clone(), previous)
    }

    /// Undo an [`apply`](Self::apply).
    pub fn rollback(&mut self, username: &str, previous: Option<PlayerRecord>) {
        match previous {
            Some(record) => {
                self.players.insert(username.to_string(), record);
            }
            None => {
                self.players.remove(username);
                self.next_seq = self.next_seq.saturating_sub(1);
            }
        }
    }

    /// Ranked rows.
    pub fn top(&self, limit: usize) -> Vec<PlayerRecord> {
        let mut rows: Vec<PlayerRecord> = self.players.values().cloned().collect();
        rows.sort_by(leaderboard_order);
        rows.truncate(limit);
        rows
    }
}

/// Ledger held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    table: Mutex<LedgerTable>,
}

impl InMemoryLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.lock().map(|t| t.players.len()).unwrap_or(0)
    }

    /// No players yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerTable>, LedgerError> {
        self.table
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".into()))
    }
}

impl ScoreLedger for InMemoryLedger {
    fn record_outcome(&self, username: &str, outcome: GameOutcome) -> Result<PlayerRecord, LedgerError> {
        let mut table = self.lock()?;
        Ok(table.apply(username, outcome).0)
    }

    fn player(&self, username: &str) -> Result<Option<PlayerRecord>, LedgerError> {
        Ok(self.lock()?.players.get(username).cloned())
    }

    fn top_players(&self, limit: usize) -> Result<Vec<PlayerRecord>, LedgerError> {
        Ok(self.lock()?.top(limit))
    }
}
