//! Common imports grouped by abstraction level.
//!
//! `dx` covers callers of the tag mutations.
//! `advanced` adds the seams needed to plug in another store.

pub mod dx {
    //! Invoking mutations against the in-memory store.
    pub use crate::{
        OperationContext, Result, StoreConfig, Tag, TagCreateInput, TagDestroyInput, TagError,
        TagId, TagMutations, TagStore, TagUpdateInput, TagUpdateRequest,
    };
}

pub mod advanced {
    //! Repository and transaction seams.
    //!
    //! Implement [`TransactionProvider`](crate::repository::TransactionProvider)
    //! for another backend and hand it to `TagMutations::new`.
    pub use crate::mutation::{ChangesetTranslator, ImageDecoder, ensure_name_unique};
    pub use crate::repository::{Repository, TagAccess, TransactionProvider};
    pub use crate::transaction::{Change, CommitRecord, with_transaction};
}
