use crate::config::StoreConfig;
use crate::context::OperationContext;
use crate::core::{Result, Tag, TagError, TagId};
use crate::repository::{TransactionProvider, TxRepository};
use crate::transaction::{CommitRecord, TransactionManager, with_transaction};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// In-memory tag store.
///
/// Cheap to clone; clones share the same tables. Reads through the store see
/// only committed state. Writes go through [`TagStore::transaction`] (or any
/// caller of [`with_transaction`]).
#[derive(Clone)]
pub struct TagStore {
    manager: Arc<TransactionManager>,
    config: Arc<StoreConfig>,
}

impl TagStore {
    pub fn new() -> Self {
        let config = StoreConfig::default();
        Self {
            manager: Arc::new(TransactionManager::new(&config)),
            config: Arc::new(config),
        }
    }

    pub fn with_config(config: StoreConfig) -> Result<Self> {
        config.validate().map_err(TagError::InvalidInput)?;
        Ok(Self {
            manager: Arc::new(TransactionManager::new(&config)),
            config: Arc::new(config),
        })
    }

    /// Open a store described by a `tagstore://` URL
    pub fn open(url: &str) -> Result<Self> {
        let config = StoreConfig::from_url(url).map_err(TagError::InvalidInput)?;
        Self::with_config(config)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run `op` in a transaction on this store
    pub async fn transaction<F, Fut, T>(&self, ctx: &OperationContext, op: F) -> Result<T>
    where
        F: FnOnce(TxRepository) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        with_transaction(self, ctx, op).await
    }

    pub fn find_tag(&self, id: TagId) -> Result<Option<Tag>> {
        Ok(self.manager.snapshot()?.find(id).cloned())
    }

    pub fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        Ok(self.manager.snapshot()?.find_by_name(name).cloned())
    }

    pub fn tag_image(&self, id: TagId) -> Result<Option<Vec<u8>>> {
        Ok(self.manager.snapshot()?.image(id).map(<[u8]>::to_vec))
    }

    pub fn all_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.manager.snapshot()?.all())
    }

    pub fn tag_count(&self) -> Result<usize> {
        Ok(self.manager.snapshot()?.tag_count())
    }

    /// Recent commits, oldest first
    pub fn history(&self) -> Result<Vec<CommitRecord>> {
        self.manager.history()
    }
}

impl Default for TagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagStore")
            .field("url", &self.config.to_url())
            .finish()
    }
}

#[async_trait]
impl TransactionProvider for TagStore {
    type Repo = TxRepository;

    async fn begin(&self) -> Result<TxRepository> {
        let transaction = self.manager.begin().await?;
        Ok(TxRepository::new(transaction))
    }

    async fn commit(&self, repo: &TxRepository) -> Result<()> {
        let mut transaction = repo.transaction().lock().await;
        self.manager.commit(&mut transaction)
    }

    async fn rollback(&self, repo: &TxRepository) -> Result<()> {
        let mut transaction = repo.transaction().lock().await;
        self.manager.rollback(&mut transaction)
    }
}
