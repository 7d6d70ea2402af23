// ============================================================================
// tagstore Library
// ============================================================================

pub mod config;
pub mod context;
pub mod core;
pub mod facade;
pub mod mutation;
pub mod prelude;
pub mod repository;
pub mod storage;
pub mod transaction;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use context::OperationContext;
pub use crate::core::{NewTag, Result, Tag, TagError, TagId, TagPartial};
pub use facade::TagStore;
pub use mutation::{
    ChangesetTranslator, DataUrlDecoder, ImageDecoder, TagCreateInput, TagDestroyInput,
    TagMutations, TagUpdateInput, TagUpdateRequest,
};
pub use repository::{Repository, TagAccess, TransactionProvider};
pub use storage::NameComparison;
pub use transaction::{Change, CommitRecord, with_transaction};

/// Tag mutations over a fresh in-memory store
///
/// # Examples
///
/// ```
/// use tagstore::{OperationContext, TagCreateInput, TagDestroyInput, TagUpdateRequest};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> tagstore::Result<()> {
/// let tags = tagstore::in_memory();
/// let ctx = OperationContext::new();
///
/// let tag = tags.tag_create(&ctx, TagCreateInput::new("sunset")).await?;
///
/// let update = TagUpdateRequest::from_json(json!({"id": tag.id.to_string(), "name": "dusk"}))?;
/// let renamed = tags.tag_update(&ctx, update).await?;
/// assert_eq!(renamed.name, "dusk");
///
/// assert!(tags.tag_destroy(&ctx, TagDestroyInput::new(tag.id.to_string())).await?);
/// # Ok(())
/// # }
/// ```
pub fn in_memory() -> TagMutations<TagStore> {
    TagMutations::new(TagStore::new())
}
