use super::{Repository, TagAccess};
use crate::core::{NewTag, Result, Tag, TagId, TagPartial};
use crate::transaction::{Change, Transaction, TransactionId};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tag accessor over a transaction's working copy
#[derive(Clone)]
pub struct TxTagAccess {
    id: TransactionId,
    transaction: Arc<Mutex<Transaction>>,
}

#[async_trait]
impl TagAccess for TxTagAccess {
    async fn find(&self, id: TagId) -> Result<Option<Tag>> {
        let txn = self.transaction.lock().await;
        Ok(txn.working()?.find(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let txn = self.transaction.lock().await;
        Ok(txn.working()?.find_by_name(name).cloned())
    }

    async fn create(&self, tag: NewTag) -> Result<Tag> {
        let mut txn = self.transaction.lock().await;
        let created = txn.working_mut()?.insert(tag)?;
        debug!("{}: created tag {} '{}'", self.id, created.id, created.name);
        txn.record_change(Change::CreateTag {
            tag: created.clone(),
        })?;
        Ok(created)
    }

    async fn update(&self, tag: TagPartial) -> Result<Tag> {
        let mut txn = self.transaction.lock().await;
        let (previous, current) = txn.working_mut()?.update(tag)?;
        debug!("{}: updated tag {}", self.id, current.id);
        txn.record_change(Change::UpdateTag {
            previous,
            current: current.clone(),
        })?;
        Ok(current)
    }

    async fn destroy(&self, id: TagId) -> Result<()> {
        let mut txn = self.transaction.lock().await;
        let (tag, image) = txn.working_mut()?.remove(id)?;
        debug!("{}: destroyed tag {}", self.id, id);
        txn.record_change(Change::DestroyTag {
            tag,
            had_image: image.is_some(),
        })
    }

    async fn update_image(&self, id: TagId, image: &[u8]) -> Result<()> {
        let mut txn = self.transaction.lock().await;
        let replaced = txn.working_mut()?.set_image(id, image)?;
        txn.record_change(Change::UpdateImage {
            tag_id: id,
            size: image.len(),
            replaced: replaced.is_some(),
        })
    }

    async fn destroy_image(&self, id: TagId) -> Result<()> {
        let mut txn = self.transaction.lock().await;
        let removed = txn.working_mut()?.clear_image(id);
        txn.record_change(Change::DestroyImage {
            tag_id: id,
            removed: removed.is_some(),
        })
    }

    async fn image(&self, id: TagId) -> Result<Option<Vec<u8>>> {
        let txn = self.transaction.lock().await;
        Ok(txn.working()?.image(id).map(<[u8]>::to_vec))
    }

    async fn all(&self) -> Result<Vec<Tag>> {
        let txn = self.transaction.lock().await;
        Ok(txn.working()?.all())
    }

    async fn count(&self) -> Result<usize> {
        let txn = self.transaction.lock().await;
        Ok(txn.working()?.tag_count())
    }
}

/// Repository handle bound to one in-memory transaction.
///
/// Clones share the transaction. Once it is committed or rolled back every
/// call through any clone fails with a store error.
#[derive(Clone)]
pub struct TxRepository {
    tags: TxTagAccess,
}

impl TxRepository {
    pub(crate) fn new(transaction: Transaction) -> Self {
        Self {
            tags: TxTagAccess {
                id: transaction.id(),
                transaction: Arc::new(Mutex::new(transaction)),
            },
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.tags.id
    }

    pub(crate) fn transaction(&self) -> &Arc<Mutex<Transaction>> {
        &self.tags.transaction
    }
}

impl Repository for TxRepository {
    type Tags = TxTagAccess;

    fn tag(&self) -> &TxTagAccess {
        &self.tags
    }
}

impl std::fmt::Debug for TxRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxRepository")
            .field("transaction", &self.tags.id)
            .finish()
    }
}
