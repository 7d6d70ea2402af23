pub mod memory;

pub use memory::{NameComparison, StoreState};
