use super::traits::{OrderStore, ProductStore, UserStore};
use crate::types::{
    AppError, CreateProductRequest, NewOrder, NewOrderItem, NewUser, Product, Result, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params::Params, Builder, Connection, Database, Row, Value};
use std::path::Path;

/// Relational store backed by libsql (SQLite file or in-memory database).
pub struct SqlStore {
    _db: Database,
    conn: Connection,
}

impl SqlStore {
    /// Opens (or creates) a local database at `path` and ensures the schema.
    ///
    /// `":memory:"` opens an ephemeral database.
    pub async fn new_local(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Database(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let store = Self { _db: db, conn };
        store.initialize_schema().await?;

        tracing::info!(path, "database ready");
        Ok(store)
    }

    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                image TEXT NOT NULL,
                price REAL NOT NULL,
                quantity INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create products table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                total REAL NOT NULL,
                status TEXT NOT NULL,
                address TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create orders table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS order_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                order_id INTEGER NOT NULL,
                product_id INTEGER NOT NULL,
                quantity INTEGER NOT NULL,
                price REAL NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (order_id) REFERENCES orders(id),
                FOREIGN KEY (product_id) REFERENCES products(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create order_items table: {}", e)))?;

        Ok(())
    }

    async fn insert_returning_id(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<i64> {
        let mut rows = self
            .conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert: {}", e)))?;

        let row = rows
            .next()
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::Database("Insert returned no id".to_string()))?;

        row.get::<i64>(0).map_err(db_err)
    }

    async fn query_users(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<Vec<User>> {
        let mut rows = self
            .conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to query users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn query_products(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<Vec<Product>> {
        let mut rows = self
            .conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to query products: {}", e)))?;

        let mut products = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            products.push(row_to_product(&row)?);
        }

        Ok(products)
    }
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password, created_at";
const PRODUCT_COLUMNS: &str = "id, name, description, image, price, quantity, created_at";

fn db_err(e: libsql::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp: {}", secs)))
}

fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get(0).map_err(db_err)?,
        first_name: row.get(1).map_err(db_err)?,
        last_name: row.get(2).map_err(db_err)?,
        email: row.get(3).map_err(db_err)?,
        password: row.get(4).map_err(db_err)?,
        created_at: timestamp(row.get::<i64>(5).map_err(db_err)?)?,
    })
}

fn row_to_product(row: &Row) -> Result<Product> {
    Ok(Product {
        id: row.get(0).map_err(db_err)?,
        name: row.get(1).map_err(db_err)?,
        description: row.get(2).map_err(db_err)?,
        image: row.get(3).map_err(db_err)?,
        price: row.get(4).map_err(db_err)?,
        quantity: row.get(5).map_err(db_err)?,
        created_at: timestamp(row.get::<i64>(6).map_err(db_err)?)?,
    })
}

#[async_trait]
impl UserStore for SqlStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        Ok(self.query_users(&sql, [email]).await?.into_iter().next())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        Ok(self.query_users(&sql, [id]).await?.into_iter().next())
    }

    async fn create_user(&self, user: NewUser) -> Result<i64> {
        let now = Utc::now().timestamp();

        self.insert_returning_id(
            "INSERT INTO users (first_name, last_name, email, password, created_at)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
            (user.first_name, user.last_name, user.email, user.password, now),
        )
        .await
    }

    async fn get_users(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        self.query_users(&sql, ()).await
    }
}

#[async_trait]
impl ProductStore for SqlStore {
    async fn get_products(&self) -> Result<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        self.query_products(&sql, ()).await
    }

    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");
        Ok(self.query_products(&sql, [id]).await?.into_iter().next())
    }

    async fn get_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ({placeholders})");
        let params = Params::Positional(ids.iter().map(|id| Value::Integer(*id)).collect());

        self.query_products(&sql, params).await
    }

    async fn create_product(&self, product: &CreateProductRequest) -> Result<i64> {
        let now = Utc::now().timestamp();

        self.insert_returning_id(
            "INSERT INTO products (name, description, image, price, quantity, created_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
            (
                product.name.as_str(),
                product.description.as_str(),
                product.image.as_str(),
                product.price,
                product.quantity,
                now,
            ),
        )
        .await
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        self.conn
            .execute(
                "UPDATE products SET name = ?, description = ?, image = ?, price = ?, quantity = ?
                 WHERE id = ?",
                (
                    product.name.as_str(),
                    product.description.as_str(),
                    product.image.as_str(),
                    product.price,
                    product.quantity,
                    product.id,
                ),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update product: {}", e)))?;

        Ok(())
    }

    async fn decrement_stock(&self, product_id: i64, quantity: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE products SET quantity = quantity - ?1 WHERE id = ?2 AND quantity >= ?1",
                (quantity, product_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to reserve stock: {}", e)))?;

        Ok(changed == 1)
    }

    async fn restock(&self, product_id: i64, quantity: i64) -> Result<()> {
        self.conn
            .execute(
                "UPDATE products SET quantity = quantity + ? WHERE id = ?",
                (quantity, product_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to restock product: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl OrderStore for SqlStore {
    async fn create_order(&self, order: NewOrder) -> Result<i64> {
        let now = Utc::now().timestamp();

        self.insert_returning_id(
            "INSERT INTO orders (user_id, total, status, address, created_at)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
            (order.user_id, order.total, order.status, order.address, now),
        )
        .await
    }

    async fn create_order_item(&self, item: NewOrderItem) -> Result<()> {
        let now = Utc::now().timestamp();

        self.conn
            .execute(
                "INSERT INTO order_items (order_id, product_id, quantity, price, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                (item.order_id, item.product_id, item.quantity, item.price, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create order item: {}", e)))?;

        Ok(())
    }
}
