// ============================================================================
// Transaction Change Tracking
// ============================================================================
//
// Every mutation a transaction performs on its working copy is recorded as a
// `Change`. The list is discarded on ROLLBACK and published to the commit
// history on COMMIT.
//
// ============================================================================

use crate::core::{Tag, TagId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    CreateTag { tag: Tag },

    UpdateTag { previous: Tag, current: Tag },

    /// Destroying a tag also drops its image
    DestroyTag { tag: Tag, had_image: bool },

    UpdateImage {
        tag_id: TagId,
        size: usize,
        replaced: bool,
    },

    /// `removed` is false when there was no image to clear
    DestroyImage { tag_id: TagId, removed: bool },
}

impl Change {
    /// The tag this change applies to
    pub fn tag_id(&self) -> TagId {
        match self {
            Change::CreateTag { tag } => tag.id,
            Change::UpdateTag { current, .. } => current.id,
            Change::DestroyTag { tag, .. } => tag.id,
            Change::UpdateImage { tag_id, .. } => *tag_id,
            Change::DestroyImage { tag_id, .. } => *tag_id,
        }
    }

    pub fn is_image_change(&self) -> bool {
        matches!(
            self,
            Change::UpdateImage { .. } | Change::DestroyImage { .. }
        )
    }
}
