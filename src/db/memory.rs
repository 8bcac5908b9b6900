use super::traits::{OrderStore, ProductStore, UserStore};
use crate::types::{
    AppError, CreateProductRequest, NewOrder, NewOrderItem, NewUser, Order, OrderItem, Product,
    Result, User,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store implementing every store trait.
///
/// Ids are assigned from a single counter shared across tables. Calling
/// [`MemoryStore::fail_with`] makes every subsequent operation fail with
/// [`AppError::Database`], which is how tests reach the 500 paths.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Deletes a user; returns whether it existed.
    pub fn remove_user(&self, id: i64) -> bool {
        let mut tables = self.tables.lock();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        tables.users.len() != before
    }

    pub fn orders(&self) -> Vec<Order> {
        self.tables.lock().orders.clone()
    }

    pub fn order_items(&self) -> Vec<OrderItem> {
        self.tables.lock().order_items.clone()
    }

    fn check(&self) -> Result<()> {
        match self.failure.lock().as_ref() {
            Some(message) => Err(AppError::Database(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.check()?;
        let tables = self.tables.lock();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.check()?;
        let tables = self.tables.lock();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<i64> {
        self.check()?;
        let mut tables = self.tables.lock();

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Database(
                "UNIQUE constraint failed: users.email".to_string(),
            ));
        }

        let id = tables.next_id();
        tables.users.push(User {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn get_users(&self) -> Result<Vec<User>> {
        self.check()?;
        Ok(self.tables.lock().users.clone())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn get_products(&self) -> Result<Vec<Product>> {
        self.check()?;
        Ok(self.tables.lock().products.clone())
    }

    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>> {
        self.check()?;
        let tables = self.tables.lock();
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
        self.check()?;
        let tables = self.tables.lock();
        Ok(tables
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: &CreateProductRequest) -> Result<i64> {
        self.check()?;
        let mut tables = self.tables.lock();

        let id = tables.next_id();
        tables.products.push(Product {
            id,
            name: product.name.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            price: product.price,
            quantity: product.quantity,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock();

        if let Some(existing) = tables.products.iter_mut().find(|p| p.id == product.id) {
            existing.name = product.name.clone();
            existing.description = product.description.clone();
            existing.image = product.image.clone();
            existing.price = product.price;
            existing.quantity = product.quantity;
        }

        Ok(())
    }

    async fn decrement_stock(&self, product_id: i64, quantity: i64) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.lock();

        match tables.products.iter_mut().find(|p| p.id == product_id) {
            Some(product) if product.quantity >= quantity => {
                product.quantity -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restock(&self, product_id: i64, quantity: i64) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock();

        if let Some(product) = tables.products.iter_mut().find(|p| p.id == product_id) {
            product.quantity += quantity;
        }

        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<i64> {
        self.check()?;
        let mut tables = self.tables.lock();

        let id = tables.next_id();
        tables.orders.push(Order {
            id,
            user_id: order.user_id,
            total: order.total,
            status: order.status,
            address: order.address,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn create_order_item(&self, item: NewOrderItem) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock();

        let id = tables.next_id();
        tables.order_items.push(OrderItem {
            id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
            created_at: Utc::now(),
        });

        Ok(())
    }
}
