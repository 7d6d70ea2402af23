use crate::core::{Result, TagError, TagId};
use crate::repository::TagAccess;

/// Fails with `DuplicateName` if another tag already uses `name`.
///
/// `own_id` is `None` on create (any match collides) and the tag's id on
/// update (a match on itself is fine). Name comparison is the store's.
pub async fn ensure_name_unique<A>(own_id: Option<TagId>, name: &str, tags: &A) -> Result<()>
where
    A: TagAccess + ?Sized,
{
    match tags.find_by_name(name).await? {
        Some(existing) if Some(existing.id) != own_id => {
            Err(TagError::DuplicateName(name.to_string()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NewTag, Tag, TagPartial};
    use async_trait::async_trait;
    use chrono::Utc;

    /// Name lookup only, exact match, no constraint of its own
    struct Named(Vec<Tag>);

    impl Named {
        fn with(names: &[(i64, &str)]) -> Self {
            let now = Utc::now();
            Named(
                names
                    .iter()
                    .map(|(id, name)| Tag {
                        id: TagId(*id),
                        name: name.to_string(),
                        created_at: now,
                        updated_at: now,
                    })
                    .collect(),
            )
        }
    }

    #[async_trait]
    impl TagAccess for Named {
        async fn find(&self, id: TagId) -> Result<Option<Tag>> {
            Ok(self.0.iter().find(|t| t.id == id).cloned())
        }
        async fn find_by_name(&self, name: &str) -> Result<Option<Tag>> {
            Ok(self.0.iter().find(|t| t.name == name).cloned())
        }
        async fn create(&self, _tag: NewTag) -> Result<Tag> {
            Err(TagError::Store("lookup only".into()))
        }
        async fn update(&self, _tag: TagPartial) -> Result<Tag> {
            Err(TagError::Store("lookup only".into()))
        }
        async fn destroy(&self, _id: TagId) -> Result<()> {
            Err(TagError::Store("lookup only".into()))
        }
        async fn update_image(&self, _id: TagId, _image: &[u8]) -> Result<()> {
            Err(TagError::Store("lookup only".into()))
        }
        async fn destroy_image(&self, _id: TagId) -> Result<()> {
            Err(TagError::Store("lookup only".into()))
        }
        async fn image(&self, _id: TagId) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }
        async fn all(&self) -> Result<Vec<Tag>> {
            Ok(self.0.clone())
        }
        async fn count(&self) -> Result<usize> {
            Ok(self.0.len())
        }
    }

    #[tokio::test]
    async fn test_create_collides_with_any_match() {
        let tags = Named::with(&[(1, "beach")]);

        let err = ensure_name_unique(None, "beach", &tags).await.unwrap_err();
        assert_eq!(err, TagError::DuplicateName("beach".into()));

        assert!(ensure_name_unique(None, "forest", &tags).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_may_match_itself() {
        let tags = Named::with(&[(1, "beach"), (2, "forest")]);
        assert!(ensure_name_unique(Some(TagId(1)), "beach", &tags).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_collides_with_other_tag() {
        let tags = Named::with(&[(1, "beach"), (2, "forest")]);

        let err = ensure_name_unique(Some(TagId(1)), "forest", &tags)
            .await
            .unwrap_err();
        assert_eq!(err, TagError::DuplicateName("forest".into()));
    }

    #[tokio::test]
    async fn test_lookup_error_propagates() {
        struct Broken;

        #[async_trait]
        impl TagAccess for Broken {
            async fn find(&self, _id: TagId) -> Result<Option<Tag>> {
                Ok(None)
            }
            async fn find_by_name(&self, _name: &str) -> Result<Option<Tag>> {
                Err(TagError::Store("index offline".into()))
            }
            async fn create(&self, _tag: NewTag) -> Result<Tag> {
                Err(TagError::Store("index offline".into()))
            }
            async fn update(&self, _tag: TagPartial) -> Result<Tag> {
                Err(TagError::Store("index offline".into()))
            }
            async fn destroy(&self, _id: TagId) -> Result<()> {
                Ok(())
            }
            async fn update_image(&self, _id: TagId, _image: &[u8]) -> Result<()> {
                Ok(())
            }
            async fn destroy_image(&self, _id: TagId) -> Result<()> {
                Ok(())
            }
            async fn image(&self, _id: TagId) -> Result<Option<Vec<u8>>> {
                Ok(None)
            }
            async fn all(&self) -> Result<Vec<Tag>> {
                Ok(Vec::new())
            }
            async fn count(&self) -> Result<usize> {
                Ok(0)
            }
        }

        let err = ensure_name_unique(None, "x", &Broken).await.unwrap_err();
        assert_eq!(err, TagError::Store("index offline".into()));
    }
}
