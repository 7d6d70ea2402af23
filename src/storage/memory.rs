// ============================================================================
// In-Memory Tag Tables
// ============================================================================
//
// Committed state and every transaction's working copy are values of
// `StoreState`. All maps are persistent (`im`), so cloning a state for a new
// transaction is O(1) and commit is a pointer swap.
//
// ============================================================================

use crate::core::{NewTag, Result, Tag, TagError, TagId, TagPartial};
use im::{HashMap, OrdMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How tag names are compared for uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameComparison {
    CaseSensitive,
    #[default]
    CaseInsensitive,
}

impl NameComparison {
    /// Key under which a name is stored in the unique index.
    pub fn key(&self, name: &str) -> String {
        match self {
            NameComparison::CaseSensitive => name.to_string(),
            NameComparison::CaseInsensitive => name.to_lowercase(),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "case-sensitive" | "sensitive" | "exact" => Some(Self::CaseSensitive),
            "case-insensitive" | "insensitive" | "nocase" => Some(Self::CaseInsensitive),
            _ => None,
        }
    }
}

impl fmt::Display for NameComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameComparison::CaseSensitive => write!(f, "case-sensitive"),
            NameComparison::CaseInsensitive => write!(f, "case-insensitive"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreState {
    comparison: NameComparison,
    tags: OrdMap<TagId, Tag>,
    /// Unique index: normalized name -> owner
    names: HashMap<String, TagId>,
    images: OrdMap<TagId, Arc<[u8]>>,
    next_id: i64,
}

impl StoreState {
    pub fn new(comparison: NameComparison) -> Self {
        Self {
            comparison,
            tags: OrdMap::new(),
            names: HashMap::new(),
            images: OrdMap::new(),
            next_id: 1,
        }
    }

    pub fn comparison(&self) -> NameComparison {
        self.comparison
    }

    pub fn find(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Tag> {
        let key = self.comparison.key(name);
        self.names.get(&key).and_then(|id| self.tags.get(id))
    }

    pub fn image(&self, id: TagId) -> Option<&[u8]> {
        self.images.get(&id).map(|bytes| bytes.as_ref())
    }

    /// Tags in id order.
    pub fn all(&self) -> Vec<Tag> {
        self.tags.values().cloned().collect()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn insert(&mut self, new_tag: NewTag) -> Result<Tag> {
        let key = self.comparison.key(&new_tag.name);
        if self.names.contains_key(&key) {
            return Err(TagError::DuplicateName(new_tag.name));
        }

        let id = TagId(self.next_id);
        self.next_id += 1;

        let tag = Tag {
            id,
            name: new_tag.name,
            created_at: new_tag.created_at,
            updated_at: new_tag.updated_at,
        };
        self.names.insert(key, id);
        self.tags.insert(id, tag.clone());
        Ok(tag)
    }

    /// Returns `(previous, current)`.
    pub fn update(&mut self, partial: TagPartial) -> Result<(Tag, Tag)> {
        let previous = self
            .tags
            .get(&partial.id)
            .cloned()
            .ok_or(TagError::NotFound(partial.id))?;

        let old_key = self.comparison.key(&previous.name);
        let new_key = self.comparison.key(&partial.name);
        if old_key != new_key {
            if let Some(owner) = self.names.get(&new_key) {
                if *owner != partial.id {
                    return Err(TagError::DuplicateName(partial.name));
                }
            }
            self.names.remove(&old_key);
            self.names.insert(new_key, partial.id);
        }

        let current = Tag {
            id: previous.id,
            name: partial.name,
            created_at: previous.created_at,
            updated_at: partial.updated_at,
        };
        self.tags.insert(current.id, current.clone());
        Ok((previous, current))
    }

    /// Removes the tag and its image. Returns what was removed.
    pub fn remove(&mut self, id: TagId) -> Result<(Tag, Option<Arc<[u8]>>)> {
        let removed = self.tags.remove(&id).ok_or(TagError::NotFound(id))?;
        self.names.remove(&self.comparison.key(&removed.name));
        let image = self.images.remove(&id);
        Ok((removed, image))
    }

    /// Returns the replaced image, if any.
    pub fn set_image(&mut self, id: TagId, image: &[u8]) -> Result<Option<Arc<[u8]>>> {
        if !self.tags.contains_key(&id) {
            return Err(TagError::NotFound(id));
        }
        Ok(self.images.insert(id, Arc::from(image)))
    }

    /// Missing image is not an error.
    pub fn clear_image(&mut self, id: TagId) -> Option<Arc<[u8]>> {
        self.images.remove(&id)
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new(NameComparison::default())
    }
}
