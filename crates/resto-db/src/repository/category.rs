//! # Category Repository
//!
//! Database operations for menu categories.
//!
//! Category names are unique and case-sensitive. Deleting a category does
//! not touch menu items that reference it by name.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::live::{LiveQuery, LiveSource};
use crate::pool::{notify, Table};
use resto_core::validation::validate_category_name;
use resto_core::Category;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
        }
    }
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
    changes: broadcast::Sender<Table>,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool, changes: broadcast::Sender<Table>) -> Self {
        CategoryRepository { pool, changes }
    }

    /// Inserts a category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - With the generated id
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, name: &str) -> DbResult<Category> {
        let name = validate_category_name(name)?;
        debug!(name = %name, "Inserting category");

        let result = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(&name)
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_name(e, &name))?;

        notify(&self.changes, Table::Categories);

        Ok(Category {
            id: result.last_insert_rowid(),
            name,
        })
    }

    /// Renames a category. Items keep referencing the old name.
    pub async fn rename(&self, id: i64, name: &str) -> DbResult<()> {
        let name = validate_category_name(name)?;
        debug!(id, name = %name, "Renaming category");

        let result = sqlx::query("UPDATE categories SET name = ?2 WHERE id = ?1")
            .bind(id)
            .bind(&name)
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_name(e, &name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        notify(&self.changes, Table::Categories);
        Ok(())
    }

    /// Deletes a category.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        notify(&self.changes, Table::Categories);
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Category::from))
    }

    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let row =
            sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories WHERE name = ?1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Category::from))
    }

    /// All categories in creation order.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Live view of all categories.
    pub fn watch_all(&self) -> LiveQuery<AllCategories> {
        LiveQuery::new(AllCategories { repo: self.clone() }, self.changes.subscribe())
    }
}

/// Maps a unique violation on insert/rename to the offending name.
fn duplicate_name(err: sqlx::Error, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("category", name),
        other => other,
    }
}

/// Live source: every category.
pub struct AllCategories {
    repo: CategoryRepository,
}

#[async_trait]
impl LiveSource for AllCategories {
    type Item = Category;

    fn table(&self) -> Table {
        Table::Categories
    }

    async fn fetch(&self) -> DbResult<Vec<Category>> {
        self.repo.list_all().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
