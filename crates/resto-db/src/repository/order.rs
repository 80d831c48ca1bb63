//! # Order Repository
//!
//! Database operations for orders.
//!
//! ## Status Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Staff dashboard                                                        │
//! │                                                                         │
//! │  watch_by_status(Pending)   ──► "New orders"      [Accept] [Reject]     │
//! │  watch_by_status(Accepted)  ──► "In the kitchen"  [Complete]            │
//! │  watch_by_statuses([Completed, Rejected]) ──► "History"  [Clear]        │
//! │                                                                         │
//! │  Status is stored as its exact string ('Pending', 'Accepted', ...)      │
//! │  and filtered by equality.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transition Safety
//! `update_status` reads the current status and writes the new one in a
//! single transaction. An order that vanished meanwhile yields `NotFound`;
//! a move the status machine forbids yields `IllegalTransition` and the
//! row is left untouched.

use async_trait::async_trait;
use resto_core::{Money, NewOrder, Order, OrderStatus, ValidationError};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::live::{LiveQuery, LiveSource};
use crate::pool::{notify, Table};

const SELECT_COLUMNS: &str =
    "SELECT id, customer_name, items, total, status, created_at FROM orders";

/// Newest first.
const ORDER_BY: &str = " ORDER BY created_at DESC, id DESC";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    items: String,
    total: f64,
    status: String,
    created_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            customer_name: row.customer_name,
            items: row.items,
            total: Money::from_major_f64(row.total),
            status: row.status.parse::<OrderStatus>()?,
            created_at: row.created_at,
        })
    }
}

fn into_orders(rows: Vec<OrderRow>) -> DbResult<Vec<Order>> {
    rows.into_iter().map(Order::try_from).collect()
}

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.orders();
///
/// let pending = repo.list_by_status(OrderStatus::Pending).await?;
/// repo.update_status(pending[0].id, OrderStatus::Accepted).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    changes: broadcast::Sender<Table>,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool, changes: broadcast::Sender<Table>) -> Self {
        OrderRepository { pool, changes }
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Inserts a prepared order.
    ///
    /// Snapshot and total go in the same single-row INSERT, so they are
    /// written atomically.
    ///
    /// ## Returns
    /// * `Ok(id)` - The generated order id, once the insert is acknowledged
    pub async fn insert(&self, order: &NewOrder) -> DbResult<i64> {
        debug!(customer = %order.customer_name, total = %order.total, "Inserting order");

        let result = sqlx::query(
            r#"
            INSERT INTO orders (customer_name, items, total, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&order.customer_name)
        .bind(&order.items)
        .bind(order.total.to_major_f64())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        notify(&self.changes, Table::Orders);

        Ok(id)
    }

    /// Moves an order to `new_status` if the status machine allows it.
    ///
    /// ## Returns
    /// * `Ok(Order)` - The order as stored after the change
    /// * `Err(DbError::NotFound)` - No order with this id
    /// * `Err(DbError::Core(IllegalTransition))` - Move not allowed, row untouched
    pub async fn update_status(&self, id: i64, new_status: OrderStatus) -> DbResult<Order> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        let mut order = Order::try_from(row)?;
        let from = order.status;
        order.status = from.transition(new_status)?;

        sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(new_status.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(order_id = id, from = %from, to = %new_status, "Order status changed");
        notify(&self.changes, Table::Orders);

        Ok(order)
    }

    /// Bulk-deletes every order whose status is in `statuses`.
    ///
    /// This is the only way an order row is removed, and only terminal
    /// orders qualify.
    ///
    /// ## Returns
    /// * `Ok(n)` - Orders removed. An empty set removes nothing.
    /// * `Err(DbError::Core(Validation))` - A Pending or Accepted status was given
    pub async fn delete_by_statuses(&self, statuses: &[OrderStatus]) -> DbResult<u64> {
        if let Some(active) = statuses.iter().find(|s| !s.is_terminal()) {
            return Err(ValidationError::InvalidFormat {
                field: "statuses".to_string(),
                reason: format!("{} orders cannot be cleared", active),
            }
            .into());
        }
        if statuses.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM orders WHERE status IN (");
        push_status_list(&mut builder, statuses);

        let removed = builder.build().execute(&self.pool).await?.rows_affected();

        info!(removed, statuses = ?statuses, "Cleared orders");
        if removed > 0 {
            notify(&self.changes, Table::Orders);
        }

        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Every order, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_COLUMNS}{ORDER_BY}"))
            .fetch_all(&self.pool)
            .await?;

        into_orders(rows)
    }

    /// Orders in one status, newest first.
    pub async fn list_by_status(&self, status: OrderStatus) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_COLUMNS} WHERE status = ?1{ORDER_BY}"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        into_orders(rows)
    }

    /// Orders in any of the given statuses, newest first.
    pub async fn list_by_statuses(&self, statuses: &[OrderStatus]) -> DbResult<Vec<Order>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        builder.push(" WHERE status IN (");
        push_status_list(&mut builder, statuses);
        builder.push(ORDER_BY);

        let rows = builder
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await?;

        into_orders(rows)
    }

    pub async fn count_by_status(&self, status: OrderStatus) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ?1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Live reads
    // -------------------------------------------------------------------------

    pub fn watch_all(&self) -> LiveQuery<Orders> {
        self.watch(None)
    }

    pub fn watch_by_status(&self, status: OrderStatus) -> LiveQuery<Orders> {
        self.watch(Some(vec![status]))
    }

    pub fn watch_by_statuses(&self, statuses: &[OrderStatus]) -> LiveQuery<Orders> {
        self.watch(Some(statuses.to_vec()))
    }

    fn watch(&self, statuses: Option<Vec<OrderStatus>>) -> LiveQuery<Orders> {
        LiveQuery::new(
            Orders {
                repo: self.clone(),
                statuses,
            },
            self.changes.subscribe(),
        )
    }
}

/// Appends `?, ?, ...)` binding each status string.
fn push_status_list(builder: &mut QueryBuilder<'_, Sqlite>, statuses: &[OrderStatus]) {
    let mut list = builder.separated(", ");
    for status in statuses {
        list.push_bind(status.as_str());
    }
    list.push_unseparated(")");
}

/// Live source: all orders, or orders in a status set.
pub struct Orders {
    repo: OrderRepository,
    statuses: Option<Vec<OrderStatus>>,
}

#[async_trait]
impl LiveSource for Orders {
    type Item = Order;

    fn table(&self) -> Table {
        Table::Orders
    }

    async fn fetch(&self) -> DbResult<Vec<Order>> {
        match &self.statuses {
            Some(statuses) => self.repo.list_by_statuses(statuses).await,
            None => self.repo.list_all().await,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
