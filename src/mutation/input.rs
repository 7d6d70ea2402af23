use super::changeset::ChangesetTranslator;
use crate::core::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCreateInput {
    pub name: String,
    /// Encoded image, see [`super::ImageDecoder`]
    #[serde(default)]
    pub image: Option<String>,
}

impl TagCreateInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
        }
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdateInput {
    pub id: String,
    /// `None` keeps the stored name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDestroyInput {
    pub id: String,
}

impl TagDestroyInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Typed update input plus the field presence of the raw input it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TagUpdateRequest {
    pub input: TagUpdateInput,
    pub translator: ChangesetTranslator,
}

impl TagUpdateRequest {
    pub fn new(input: TagUpdateInput, translator: ChangesetTranslator) -> Self {
        Self { input, translator }
    }

    /// Decode the raw payload, keeping its key set for the translator.
    pub fn from_json(raw: Value) -> Result<Self> {
        let translator = ChangesetTranslator::from_value(&raw)?;
        let input = serde_json::from_value(raw)?;
        Ok(Self { input, translator })
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(raw)?)
    }
}
