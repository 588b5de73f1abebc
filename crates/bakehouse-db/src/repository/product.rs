//! # Product Repository
//!
//! Database operations for products (recipes over inventory).
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product = row + ordered recipe lines                 │
//! │                                                                         │
//! │  products                          product_ingredients                  │
//! │  ┌──────────────────────┐          ┌────────────────────────────────┐   │
//! │  │ id: p-1              │◄─────────│ product_id: p-1, position: 0   │   │
//! │  │ name: Chocolate Cake │          │ Flour 250 g  → 1125            │   │
//! │  │ total_cost: 3125     │◄─────────│ product_id: p-1, position: 1   │   │
//! │  └──────────────────────┘          │ Cocoa  50 g  → 2000            │   │
//! │                                    └────────────────────────────────┘   │
//! │                                                                         │
//! │  Insert and update write both tables in ONE transaction.                │
//! │  Delete cascades to the lines.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bakehouse_core::{CatalogProduct, Product, ProductIngredient, Unit};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    tenant_id: String,
    name: String,
    weight_grams: f64,
    total_cost_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    product_id: String,
    ingredient_id: String,
    ingredient_name: String,
    quantity: f64,
    unit: Unit,
    cost_cents: i64,
}

impl From<IngredientRow> for ProductIngredient {
    fn from(row: IngredientRow) -> Self {
        ProductIngredient {
            ingredient_id: row.ingredient_id,
            ingredient_name: row.ingredient_name,
            quantity: row.quantity,
            unit: row.unit,
            cost_cents: row.cost_cents,
        }
    }
}

impl ProductRow {
    fn into_product(self, ingredients: Vec<ProductIngredient>) -> Product {
        Product {
            id: self.id,
            tenant_id: self.tenant_id,
            name: self.name,
            weight_grams: self.weight_grams,
            ingredients,
            total_cost_cents: self.total_cost_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: String,
    name: String,
    total_cost_cents: i64,
    weight_grams: f64,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists a tenant's products with their recipes, oldest first.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, weight_grams, total_cost_cents, created_at, updated_at
            FROM products
            WHERE tenant_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        // One query for every line of every product, grouped in memory.
        let lines: Vec<IngredientRow> = sqlx::query_as(
            r#"
            SELECT pi.product_id, pi.ingredient_id, pi.ingredient_name,
                   pi.quantity, pi.unit, pi.cost_cents
            FROM product_ingredients pi
            JOIN products p ON p.id = pi.product_id
            WHERE p.tenant_id = ?1
            ORDER BY pi.product_id, pi.position
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_product: HashMap<String, Vec<ProductIngredient>> = HashMap::new();
        for line in lines {
            by_product
                .entry(line.product_id.clone())
                .or_default()
                .push(line.into());
        }

        debug!(tenant_id = %tenant_id, count = rows.len(), "Listed products");

        Ok(rows
            .into_iter()
            .map(|row| {
                let ingredients = by_product.remove(&row.id).unwrap_or_default();
                row.into_product(ingredients)
            })
            .collect())
    }

    /// Gets one product with its recipe.
    pub async fn get(&self, tenant_id: &str, id: &str) -> DbResult<Product> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, weight_grams, total_cost_cents, created_at, updated_at
            FROM products
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| DbError::not_found("Product", id))?;

        let lines: Vec<IngredientRow> = sqlx::query_as(
            r#"
            SELECT product_id, ingredient_id, ingredient_name, quantity, unit, cost_cents
            FROM product_ingredients
            WHERE product_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(row.into_product(lines.into_iter().map(ProductIngredient::from).collect()))
    }

    /// Catalog projection used by billing: id, name, cost basis, weight.
    pub async fn catalog(&self, tenant_id: &str) -> DbResult<Vec<CatalogProduct>> {
        let rows: Vec<CatalogRow> = sqlx::query_as(
            r#"
            SELECT id, name, total_cost_cents, weight_grams
            FROM products
            WHERE tenant_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CatalogProduct {
                id: row.id,
                name: row.name,
                cost_basis_cents: row.total_cost_cents,
                weight_grams: row.weight_grams,
            })
            .collect())
    }

    /// Inserts a product and its recipe lines atomically.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, tenant_id, name, weight_grams, total_cost_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.tenant_id)
        .bind(&product.name)
        .bind(product.weight_grams)
        .bind(product.total_cost_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_ingredients(&mut tx, &product.id, &product.ingredients).await?;

        tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }

    /// Replaces a product's fields and its whole recipe atomically.
    ///
    /// ## Errors
    /// [`DbError::NotFound`] when the tenant has no product with this id;
    /// nothing is written in that case.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?3,
                weight_grams = ?4,
                total_cost_cents = ?5,
                updated_at = ?6
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(&product.tenant_id)
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.weight_grams)
        .bind(product.total_cost_cents)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(DbError::not_found("Product", &product.id));
        }

        sqlx::query("DELETE FROM product_ingredients WHERE product_id = ?1")
            .bind(&product.id)
            .execute(&mut *tx)
            .await?;

        insert_ingredients(&mut tx, &product.id, &product.ingredients).await?;

        tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }

    /// Deletes a product; its recipe lines go with it.
    pub async fn delete(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE tenant_id = ?1 AND id = ?2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

async fn insert_ingredients(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: &str,
    ingredients: &[ProductIngredient],
) -> DbResult<()> {
    for (position, ingredient) in ingredients.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO product_ingredients (
                product_id, position, ingredient_id, ingredient_name,
                quantity, unit, cost_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(product_id)
        .bind(position as i64)
        .bind(&ingredient.ingredient_id)
        .bind(&ingredient.ingredient_name)
        .bind(ingredient.quantity)
        .bind(ingredient.unit)
        .bind(ingredient.cost_cents)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
