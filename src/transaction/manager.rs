// ============================================================================
// Transaction Manager
// ============================================================================

use super::{Change, Transaction, TransactionId};
use crate::config::StoreConfig;
use crate::core::{Result, TagError};
use crate::storage::StoreState;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;

/// Changes published by one successful commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub transaction: TransactionId,
    pub committed_at: DateTime<Utc>,
    pub changes: Vec<Change>,
}

pub struct TransactionManager {
    committed: RwLock<StoreState>,

    // One writer at a time; held by a transaction from begin to commit/rollback.
    writer: Arc<Mutex<()>>,
    lock_timeout: Option<Duration>,

    history: RwLock<VecDeque<CommitRecord>>,
    history_capacity: usize,
}

impl TransactionManager {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            committed: RwLock::new(StoreState::new(config.name_comparison)),
            writer: Arc::new(Mutex::new(())),
            lock_timeout: config.lock_timeout,
            history: RwLock::new(VecDeque::with_capacity(config.history_capacity)),
            history_capacity: config.history_capacity,
        }
    }

    /// Wait for the writer lock, then start from the latest committed state.
    pub async fn begin(&self) -> Result<Transaction> {
        let acquire = self.writer.clone().lock_owned();
        let writer = match self.lock_timeout {
            Some(limit) => tokio::time::timeout(limit, acquire).await.map_err(|_| {
                TagError::Store(format!("timed out after {:?} waiting for writer lock", limit))
            })?,
            None => acquire.await,
        };

        let working = self.snapshot()?;
        let transaction = Transaction::new(TransactionId::new(), working, writer);
        debug!("Began {}", transaction.id());
        Ok(transaction)
    }

    /// Install the transaction's working copy as the committed state.
    pub fn commit(&self, transaction: &mut Transaction) -> Result<()> {
        let (working, changes) = transaction.commit()?;
        {
            let mut committed = self.committed.write()?;
            *committed = working;
        }
        transaction.release_writer();

        info!(
            "Committed {} with {} change(s) in {:?}",
            transaction.id(),
            changes.len(),
            transaction.duration()
        );
        self.record_history(transaction.id(), changes)
    }

    pub fn rollback(&self, transaction: &mut Transaction) -> Result<()> {
        let discarded = transaction.change_count();
        transaction.rollback()?;
        debug!(
            "Rolled back {} discarding {} change(s)",
            transaction.id(),
            discarded
        );
        Ok(())
    }

    /// Latest committed state. Cheap: the maps are shared, not copied.
    pub fn snapshot(&self) -> Result<StoreState> {
        Ok(self.committed.read()?.clone())
    }

    /// Commit records, oldest first
    pub fn history(&self) -> Result<Vec<CommitRecord>> {
        Ok(self.history.read()?.iter().cloned().collect())
    }

    fn record_history(&self, transaction: TransactionId, changes: Vec<Change>) -> Result<()> {
        if self.history_capacity == 0 {
            return Ok(());
        }

        let mut history = self.history.write()?;
        while history.len() >= self.history_capacity {
            history.pop_front();
        }
        history.push_back(CommitRecord {
            transaction,
            committed_at: Utc::now(),
            changes,
        });
        Ok(())
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}
