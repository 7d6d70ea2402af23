pub mod changeset;
pub mod image;
pub mod input;
pub mod resolver;
pub mod uniqueness;

pub use changeset::ChangesetTranslator;
pub use image::{DataUrlDecoder, ImageDecoder};
pub use input::{TagCreateInput, TagDestroyInput, TagUpdateInput, TagUpdateRequest};
pub use resolver::TagMutations;
pub use uniqueness::ensure_name_unique;
