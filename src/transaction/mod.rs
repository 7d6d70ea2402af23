// ============================================================================
// Transaction Management Module
// ============================================================================
//
// Serializable transactions over the in-memory tag tables.
//
// - State Pattern: Transaction state management (Active, Committed, Aborted)
// - Copy-on-Write: each transaction mutates a private clone of committed state
// - Unit of work: `with_transaction` owns commit/rollback around a closure
//
// ============================================================================

pub mod change;
pub mod manager;
pub mod scope;
pub mod state;

pub use change::Change;
pub use manager::{CommitRecord, TransactionManager};
pub use scope::with_transaction;
pub use state::{Transaction, TransactionId, TransactionState};
