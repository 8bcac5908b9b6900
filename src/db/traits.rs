//! Data store capabilities
//!
//! Handlers and the auth middleware depend on these traits rather than on a
//! concrete backend. [`SqlStore`](super::SqlStore) implements them on libsql;
//! [`MemoryStore`](super::MemoryStore) implements them in-process for tests.
//!
//! Lookups by key return `Ok(None)` when the record does not exist; `Err` is
//! reserved for backend failures.

use crate::types::{
    CreateProductRequest, NewOrder, NewOrderItem, NewUser, Product, Result, User,
};
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Inserts a user and returns its generated id.
    async fn create_user(&self, user: NewUser) -> Result<i64>;

    async fn get_users(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_products(&self) -> Result<Vec<Product>>;

    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>>;

    /// Returns the products that exist among `ids`; missing ids are skipped.
    async fn get_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>>;

    /// Inserts a product and returns its generated id.
    async fn create_product(&self, product: &CreateProductRequest) -> Result<i64>;

    async fn update_product(&self, product: &Product) -> Result<()>;

    /// Takes `quantity` units out of stock in a single step. Returns `false`
    /// and leaves the row untouched when fewer units remain.
    async fn decrement_stock(&self, product_id: i64, quantity: i64) -> Result<bool>;

    /// Puts `quantity` units back into stock.
    async fn restock(&self, product_id: i64, quantity: i64) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts an order and returns its generated id.
    async fn create_order(&self, order: NewOrder) -> Result<i64>;

    async fn create_order_item(&self, item: NewOrderItem) -> Result<()>;
}
