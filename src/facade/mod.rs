pub mod store;

pub use store::TagStore;
