//! # Live Queries
//!
//! Push-style reads: a live query emits the full current result set once,
//! then again after every write to the table it watches.
//!
//! ```text
//! repository write ──► notify(Table::Orders)
//!                           │ broadcast::Sender<Table>
//!          ┌────────────────┼────────────────┐
//!          ▼                ▼                ▼
//!   LiveQuery<Orders>  LiveQuery<Orders>  LiveQuery<MenuItems>
//!   (Pending)          (Completed|...)    ignores Orders
//!          │                │
//!          ▼                ▼
//!   re-query, emit   re-query, emit
//! ```
//!
//! A subscriber that falls behind the notification buffer re-queries once
//! and carries on; no intermediate state is replayed, only the latest set.

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::pool::Table;

/// Something a live query can re-run.
#[async_trait]
pub trait LiveSource: Send + Sync {
    type Item: Send;

    /// The table whose writes invalidate this source.
    fn table(&self) -> Table;

    /// Runs the query.
    async fn fetch(&self) -> DbResult<Vec<Self::Item>>;
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A subscription that yields the current result set of `S` on every change.
///
/// ## Usage
/// ```rust,ignore
/// let mut pending = db.orders().watch_by_status(OrderStatus::Pending);
///
/// while let Some(orders) = pending.next().await {
///     render(orders?);
/// }
/// ```
pub struct LiveQuery<S: LiveSource> {
    source: S,
    changes: broadcast::Receiver<Table>,
    primed: bool,
    filter: Option<Predicate<S::Item>>,
}

impl<S: LiveSource> LiveQuery<S> {
    pub fn new(source: S, changes: broadcast::Receiver<Table>) -> Self {
        Self {
            source,
            changes,
            primed: false,
            filter: None,
        }
    }

    /// Narrows every emitted set to the items matching `predicate`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&S::Item) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Waits for the next result set.
    ///
    /// The first call returns immediately with the current set. Later calls
    /// wait for a write to the watched table. Returns `None` once the
    /// database's change channel is closed.
    pub async fn next(&mut self) -> Option<DbResult<Vec<S::Item>>> {
        if self.primed {
            self.wait_for_change().await?;
        }
        self.primed = true;

        Some(self.query().await)
    }

    async fn wait_for_change(&mut self) -> Option<()> {
        let watched = self.source.table();
        loop {
            match self.changes.recv().await {
                Ok(table) if table == watched => return Some(()),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(table = %watched, skipped, "Live query lagged, re-querying");
                    return Some(());
                }
                Err(RecvError::Closed) => {
                    debug!(table = %watched, "Change channel closed");
                    return None;
                }
            }
        }
    }

    async fn query(&self) -> DbResult<Vec<S::Item>> {
        let mut items = self.source.fetch().await?;
        if let Some(predicate) = &self.filter {
            items.retain(|item| predicate(item));
        }
        Ok(items)
    }

    /// Adapts the query into a `Stream` of result sets.
    pub fn into_stream(self) -> impl Stream<Item = DbResult<Vec<S::Item>>> + Send
    where
        S: 'static,
        S::Item: 'static,
    {
        stream::unfold(self, |mut query| async move {
            let next = query.next().await?;
            Some((next, query))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use futures_util::StreamExt;
    use resto_core::{Money, NewMenuItem};
    use std::time::Duration;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_emission_is_current_set() {
        let db = setup().await;
        db.categories().insert("Starters").await.unwrap();

        let mut live = db.categories().watch_all();
        let first = live.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_other_tables_do_not_wake() {
        let db = setup().await;
        let mut live = db.categories().watch_all();
        live.next().await.unwrap().unwrap();

        db.menu_items()
            .insert(&NewMenuItem::new("Coke", Money::from_cents(4_000), "Beverages"))
            .await
            .unwrap();

        let woke = tokio::time::timeout(Duration::from_millis(100), live.next()).await;
        assert!(woke.is_err());
    }

    #[tokio::test]
    async fn test_every_write_emits() {
        let db = setup().await;
        let repo = db.categories();
        let mut live = repo.watch_all();
        live.next().await.unwrap().unwrap();

        repo.insert("A").await.unwrap();
        repo.insert("B").await.unwrap();

        assert!(!live.next().await.unwrap().unwrap().is_empty());
        assert_eq!(live.next().await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_filter() {
        let db = setup().await;
        let repo = db.menu_items();
        repo.insert(&NewMenuItem::new("Coke", Money::from_cents(4_000), "Beverages"))
            .await
            .unwrap();
        repo.insert(&NewMenuItem::new("Rasmalai", Money::from_cents(12_000), "Desserts"))
            .await
            .unwrap();

        let mut drinks = repo.watch_all().filter(|item| item.category == "Beverages");
        let set = drinks.next().await.unwrap().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].name, "Coke");
    }

    #[tokio::test]
    async fn test_lagged_subscriber_requeries() {
        let db = setup().await;
        let repo = db.categories();
        let mut live = repo.watch_all();
        live.next().await.unwrap().unwrap();

        // Overflow the notification buffer
        for i in 0..100 {
            repo.insert(&format!("Category {i}")).await.unwrap();
        }

        let set = live.next().await.unwrap().unwrap();
        assert_eq!(set.len(), 100);
    }

    #[tokio::test]
    async fn test_into_stream() {
        let db = setup().await;
        let repo = db.categories();
        let mut stream = Box::pin(repo.watch_all().into_stream());

        assert!(stream.next().await.unwrap().unwrap().is_empty());
        repo.insert("Desserts").await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap().len(), 1);
    }
}
