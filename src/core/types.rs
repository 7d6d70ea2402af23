use super::error::{Result, TagError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a tag. Never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub i64);

impl TagId {
    /// Parse an identifier received as a string (e.g. from a transport layer).
    pub fn parse(raw: &str) -> Result<Self> {
        raw.parse::<i64>()
            .map(TagId)
            .map_err(|e| TagError::InvalidIdentifier(format!("'{}': {}", raw, e)))
    }

    /// Parse every identifier, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>> {
        raw.iter().map(|id| Self::parse(id.as_ref())).collect()
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for TagId {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create candidate. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTag {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Update candidate: only the fields a tag update may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPartial {
    pub id: TagId,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_id() {
        assert_eq!(TagId::parse("42").unwrap(), TagId(42));
        assert_eq!(TagId::parse("-3").unwrap(), TagId(-3));
        assert_eq!("7".parse::<TagId>().unwrap().as_i64(), 7);
    }

    #[test]
    fn test_parse_malformed_tag_id() {
        for raw in ["", "abc", "1.5", " 1", "99999999999999999999"] {
            let err = TagId::parse(raw).unwrap_err();
            assert!(matches!(err, TagError::InvalidIdentifier(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn test_parse_all_stops_on_first_bad_id() {
        let ids = TagId::parse_all(&["1", "2", "3"]).unwrap();
        assert_eq!(ids, vec![TagId(1), TagId(2), TagId(3)]);

        let err = TagId::parse_all(&["1", "two", "x"]).unwrap_err();
        assert_eq!(
            err,
            TagError::InvalidIdentifier(
                "'two': invalid digit found in string".to_string()
            )
        );
    }

    #[test]
    fn test_tag_serializes_with_plain_id() {
        let now = Utc::now();
        let tag = Tag {
            id: TagId(5),
            name: "outdoor".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["name"], "outdoor");
    }
}
