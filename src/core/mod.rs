pub mod error;
pub mod types;

pub use error::{Result, TagError};
pub use types::{NewTag, Tag, TagId, TagPartial};
