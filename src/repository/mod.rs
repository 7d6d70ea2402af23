//! Data-access seams used by the mutation orchestrators.
//!
//! Every call on a [`TagAccess`] operates inside the transaction its
//! [`Repository`] handle is bound to. Handles are produced and finished by a
//! [`TransactionProvider`]; orchestrators never see the provider directly but
//! go through [`crate::transaction::with_transaction`].

use crate::core::{NewTag, Result, Tag, TagId, TagPartial};
use async_trait::async_trait;

pub mod in_memory;

pub use in_memory::{TxRepository, TxTagAccess};

#[async_trait]
pub trait TagAccess: Send + Sync {
    async fn find(&self, id: TagId) -> Result<Option<Tag>>;

    /// Lookup under the store's name comparison policy
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>>;

    async fn create(&self, tag: NewTag) -> Result<Tag>;

    async fn update(&self, tag: TagPartial) -> Result<Tag>;

    /// Fails with `NotFound` when the tag does not exist. Removes the image too.
    async fn destroy(&self, id: TagId) -> Result<()>;

    async fn update_image(&self, id: TagId, image: &[u8]) -> Result<()>;

    /// Clearing an absent image succeeds.
    async fn destroy_image(&self, id: TagId) -> Result<()>;

    async fn image(&self, id: TagId) -> Result<Option<Vec<u8>>>;

    async fn all(&self) -> Result<Vec<Tag>>;

    async fn count(&self) -> Result<usize>;
}

/// Per-entity-kind accessors bound to one transaction
pub trait Repository: Send + Sync {
    type Tags: TagAccess;

    fn tag(&self) -> &Self::Tags;
}

#[async_trait]
pub trait TransactionProvider: Send + Sync {
    type Repo: Repository + Clone + 'static;

    async fn begin(&self) -> Result<Self::Repo>;

    async fn commit(&self, repo: &Self::Repo) -> Result<()>;

    async fn rollback(&self, repo: &Self::Repo) -> Result<()>;
}
