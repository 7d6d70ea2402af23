// ============================================================================
// Transaction State Management
// ============================================================================
//
// Each transaction moves through defined states: Active -> Committed/Aborted.
//
// A transaction owns:
// - the store's writer lock, so writers are serialized,
// - a private working copy of the committed state,
// - the list of changes applied to that copy.
//
// Dropping an active transaction releases the lock and discards the copy,
// which is a rollback.
//
// ============================================================================

use super::Change;
use crate::core::{Result, TagError};
use crate::storage::StoreState;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::OwnedMutexGuard;

/// Global transaction ID counter
static NEXT_TXN_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Generate a new unique transaction ID
    pub fn new() -> Self {
        TransactionId(NEXT_TXN_ID.fetch_add(1, Ordering::SeqCst))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "txn_{}", self.0)
    }
}

/// Transaction state
///
/// ```text
/// Active ──commit──> Committed
///   │
///   └──rollback──> Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Active,
    Committed,
    Aborted,
}

impl TransactionState {
    pub fn is_active(&self) -> bool {
        matches!(self, TransactionState::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionState::Committed | TransactionState::Aborted
        )
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionState::Active => write!(f, "ACTIVE"),
            TransactionState::Committed => write!(f, "COMMITTED"),
            TransactionState::Aborted => write!(f, "ABORTED"),
        }
    }
}

pub struct Transaction {
    id: TransactionId,
    state: TransactionState,
    working: StoreState,
    changes: Vec<Change>,
    start_time: std::time::Instant,
    /// Held from begin until commit/rollback
    writer: Option<OwnedMutexGuard<()>>,
}

impl Transaction {
    pub(crate) fn new(id: TransactionId, working: StoreState, writer: OwnedMutexGuard<()>) -> Self {
        Self {
            id,
            state: TransactionState::Active,
            working,
            changes: Vec::new(),
            start_time: std::time::Instant::now(),
            writer: Some(writer),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    pub fn duration(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    fn ensure_active(&self, action: &str) -> Result<()> {
        if !self.state.is_active() {
            return Err(TagError::Store(format!(
                "Cannot {}: transaction {} is {}",
                action, self.id, self.state
            )));
        }
        Ok(())
    }

    /// Working copy, readable only while active
    pub fn working(&self) -> Result<&StoreState> {
        self.ensure_active("read")?;
        Ok(&self.working)
    }

    pub fn working_mut(&mut self) -> Result<&mut StoreState> {
        self.ensure_active("write")?;
        Ok(&mut self.working)
    }

    pub fn record_change(&mut self, change: Change) -> Result<()> {
        self.ensure_active("record change")?;
        self.changes.push(change);
        Ok(())
    }

    /// Mark committed and hand over the working copy and its changes.
    ///
    /// The writer lock stays held until [`Transaction::release_writer`], so
    /// the caller can install the state before another writer begins.
    pub(crate) fn commit(&mut self) -> Result<(StoreState, Vec<Change>)> {
        self.ensure_active("commit")?;
        self.state = TransactionState::Committed;
        let comparison = self.working.comparison();
        let working = std::mem::replace(&mut self.working, StoreState::new(comparison));
        Ok((working, std::mem::take(&mut self.changes)))
    }

    pub(crate) fn release_writer(&mut self) {
        self.writer.take();
    }

    /// Mark aborted, discard the working copy and release the writer lock
    pub fn rollback(&mut self) -> Result<()> {
        self.ensure_active("rollback")?;
        self.changes.clear();
        self.working = StoreState::new(self.working.comparison());
        self.state = TransactionState::Aborted;
        self.release_writer();
        Ok(())
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("changes", &self.changes.len())
            .field("holds_writer", &self.writer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NewTag, TagId};
    use chrono::Utc;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    async fn begin(lock: &Arc<Mutex<()>>) -> Transaction {
        let guard = lock.clone().lock_owned().await;
        Transaction::new(TransactionId::new(), StoreState::default(), guard)
    }

    #[test]
    fn test_transaction_id_generation() {
        let id1 = TransactionId::new();
        let id2 = TransactionId::new();
        assert!(id2.as_u64() > id1.as_u64());
    }

    #[tokio::test]
    async fn test_transaction_lifecycle() {
        let lock = Arc::new(Mutex::new(()));
        let mut txn = begin(&lock).await;

        assert_eq!(txn.state(), TransactionState::Active);
        assert!(!txn.state().is_terminal());
        assert!(lock.try_lock().is_err());

        let (state, changes) = txn.commit().unwrap();
        assert_eq!(state.tag_count(), 0);
        assert!(changes.is_empty());
        assert_eq!(txn.state(), TransactionState::Committed);
        assert!(lock.try_lock().is_err());

        txn.release_writer();
        assert!(lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_cannot_commit_twice() {
        let lock = Arc::new(Mutex::new(()));
        let mut txn = begin(&lock).await;

        txn.commit().unwrap();
        assert!(txn.commit().is_err());
        assert!(txn.rollback().is_err());
    }

    #[tokio::test]
    async fn test_rollback_discards_work_and_releases_lock() {
        let lock = Arc::new(Mutex::new(()));
        let mut txn = begin(&lock).await;

        let tag = txn
            .working_mut()
            .unwrap()
            .insert(NewTag::new("x", Utc::now()))
            .unwrap();
        txn.record_change(Change::CreateTag { tag }).unwrap();
        assert_eq!(txn.change_count(), 1);

        txn.rollback().unwrap();
        assert_eq!(txn.change_count(), 0);
        assert_eq!(txn.state(), TransactionState::Aborted);
        assert!(lock.try_lock().is_ok());
        assert!(txn.working().is_err());
    }

    #[tokio::test]
    async fn test_drop_releases_lock() {
        let lock = Arc::new(Mutex::new(()));
        {
            let _txn = begin(&lock).await;
            assert!(lock.try_lock().is_err());
        }
        assert!(lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_cannot_write_after_commit() {
        let lock = Arc::new(Mutex::new(()));
        let mut txn = begin(&lock).await;
        txn.commit().unwrap();

        assert!(txn.working_mut().is_err());
        let change = Change::DestroyImage {
            tag_id: TagId(1),
            removed: false,
        };
        assert!(txn.record_change(change).is_err());
    }
}
