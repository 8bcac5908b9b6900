//! Data store layer.
//!
//! - [`traits`]: the `UserStore`, `ProductStore` and `OrderStore` capabilities
//! - [`sql`]: libsql-backed production store (local file or `:memory:`)
//! - [`memory`]: in-process store used by tests and local experiments

#![allow(missing_docs)]

pub mod memory;
pub mod sql;
pub mod traits;

pub use memory::MemoryStore;
pub use sql::SqlStore;
pub use traits::{OrderStore, ProductStore, UserStore};
