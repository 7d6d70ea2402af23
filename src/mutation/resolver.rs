use super::image::{DataUrlDecoder, ImageDecoder};
use super::input::{TagCreateInput, TagDestroyInput, TagUpdateRequest};
use super::uniqueness::ensure_name_unique;
use crate::context::OperationContext;
use crate::core::{NewTag, Result, Tag, TagError, TagId, TagPartial};
use crate::repository::{Repository, TagAccess, TransactionProvider};
use crate::transaction::with_transaction;
use chrono::Utc;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};

/// Create, update and destroy operations for tags.
///
/// Each operation validates and decodes its input first, then performs all
/// of its writes in a single transaction: either every write commits or none
/// does, and the failing step's error is returned as-is.
pub struct TagMutations<P> {
    provider: P,
    decoder: Arc<dyn ImageDecoder>,
}

impl<P: TransactionProvider> TagMutations<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            decoder: Arc::new(DataUrlDecoder),
        }
    }

    pub fn with_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn decode_image(&self, image: Option<&str>) -> Result<Vec<u8>> {
        match image {
            Some(raw) => self.decoder.decode(raw),
            None => Ok(Vec::new()),
        }
    }

    pub async fn tag_create(&self, ctx: &OperationContext, input: TagCreateInput) -> Result<Tag> {
        let span = info_span!("tag_create", name = %input.name);
        async move {
            let new_tag = NewTag::new(input.name, Utc::now());

            // decode outside the transaction
            let image_data = self.decode_image(input.image.as_deref())?;

            let tag = with_transaction(&self.provider, ctx, |repo| async move {
                let qb = repo.tag();
                ensure_name_unique(None, &new_tag.name, qb).await?;

                let tag = qb.create(new_tag).await?;
                if !image_data.is_empty() {
                    qb.update_image(tag.id, &image_data).await?;
                }
                Ok(tag)
            })
            .await?;

            debug!(tag_id = %tag.id, "tag created");
            Ok(tag)
        }
        .instrument(span)
        .await
    }

    pub async fn tag_update(&self, ctx: &OperationContext, request: TagUpdateRequest) -> Result<Tag> {
        let span = info_span!("tag_update", id = %request.input.id);
        async move {
            let TagUpdateRequest { input, translator } = request;

            let tag_id = TagId::parse(&input.id)?;
            let updated_at = Utc::now();
            let image_data = self.decode_image(input.image.as_deref())?;
            let image_included = translator.has_field("image");
            let name = input.name;

            let tag = with_transaction(&self.provider, ctx, |repo| async move {
                let qb = repo.tag();

                let existing = qb.find(tag_id).await?.ok_or(TagError::NotFound(tag_id))?;
                let candidate = TagPartial {
                    id: tag_id,
                    name: name.unwrap_or_else(|| existing.name.clone()),
                    updated_at,
                };

                if existing.name != candidate.name {
                    ensure_name_unique(Some(tag_id), &candidate.name, qb).await?;
                }

                let tag = qb.update(candidate).await?;

                if !image_data.is_empty() {
                    qb.update_image(tag.id, &image_data).await?;
                } else if image_included {
                    // included but empty: explicit clear
                    qb.destroy_image(tag.id).await?;
                }
                Ok(tag)
            })
            .await?;

            debug!(tag_id = %tag.id, "tag updated");
            Ok(tag)
        }
        .instrument(span)
        .await
    }

    pub async fn tag_destroy(&self, ctx: &OperationContext, input: TagDestroyInput) -> Result<bool> {
        let span = info_span!("tag_destroy", id = %input.id);
        async move {
            let tag_id = TagId::parse(&input.id)?;

            with_transaction(&self.provider, ctx, |repo| async move {
                repo.tag().destroy(tag_id).await
            })
            .await?;

            debug!(%tag_id, "tag destroyed");
            Ok(true)
        }
        .instrument(span)
        .await
    }

    /// All-or-nothing: the first failure rolls back every destroy in the batch.
    pub async fn tags_destroy<S>(&self, ctx: &OperationContext, ids: &[S]) -> Result<bool>
    where
        S: AsRef<str> + Sync,
    {
        let span = info_span!("tags_destroy", count = ids.len());
        async move {
            let tag_ids = TagId::parse_all(ids)?;

            with_transaction(&self.provider, ctx, |repo| async move {
                let qb = repo.tag();
                for id in &tag_ids {
                    qb.destroy(*id).await?;
                }
                Ok(())
            })
            .await?;

            debug!("tags destroyed");
            Ok(true)
        }
        .instrument(span)
        .await
    }
}
