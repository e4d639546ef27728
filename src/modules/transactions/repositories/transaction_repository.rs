use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::traits::Repository;
use crate::core::{AppError, Result};
use crate::modules::transactions::models::FeeTransaction;

/// In-place change applied to a stored transaction
pub type TransactionChange = Box<dyn FnOnce(&mut FeeTransaction) -> Result<()> + Send>;

/// Storage for applied fee transactions
#[async_trait]
pub trait FeeTransactionRepository: Repository<FeeTransaction, Uuid> {
    /// Apply `change` to the stored transaction atomically
    ///
    /// The change sees the current state and nothing is written when it
    /// fails, so concurrent status transitions cannot overwrite each other.
    async fn modify(&self, id: Uuid, change: TransactionChange) -> Result<FeeTransaction>;

    /// Transactions processed within `[start, end]`, oldest first
    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FeeTransaction>>;
}

/// Process-local transaction store
///
/// Contents are lost on restart; there is no persistence layer behind it.
#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    transactions: RwLock<HashMap<Uuid, FeeTransaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut transactions: Vec<FeeTransaction>) -> Vec<FeeTransaction> {
    transactions.sort_by(|a, b| {
        a.processed_at
            .cmp(&b.processed_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    transactions
}

#[async_trait]
impl Repository<FeeTransaction, Uuid> for InMemoryTransactionRepository {
    async fn create(&self, entity: FeeTransaction) -> Result<FeeTransaction> {
        let mut transactions = self.transactions.write().await;
        if transactions.contains_key(&entity.id) {
            return Err(AppError::validation(format!(
                "Fee transaction {} already exists",
                entity.id
            )));
        }
        transactions.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FeeTransaction>> {
        Ok(self.transactions.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, entity: FeeTransaction) -> Result<FeeTransaction> {
        let mut transactions = self.transactions.write().await;
        match transactions.get_mut(&id) {
            Some(existing) => {
                *existing = entity.clone();
                Ok(entity)
            }
            None => Err(AppError::not_found(format!("Fee transaction {}", id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.transactions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Fee transaction {}", id)))
    }

    async fn list(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Vec<FeeTransaction>> {
        let all = sorted(self.transactions.read().await.values().cloned().collect());
        let offset = offset.unwrap_or(0) as usize;
        let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);

        Ok(all.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait]
impl FeeTransactionRepository for InMemoryTransactionRepository {
    async fn modify(&self, id: Uuid, change: TransactionChange) -> Result<FeeTransaction> {
        let mut transactions = self.transactions.write().await;
        let existing = transactions
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Fee transaction {}", id)))?;

        let mut updated = existing.clone();
        change(&mut updated)?;
        *existing = updated.clone();
        Ok(updated)
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FeeTransaction>> {
        let matching = self
            .transactions
            .read()
            .await
            .values()
            .filter(|tx| tx.processed_at >= start && tx.processed_at <= end)
            .cloned()
            .collect();

        Ok(sorted(matching))
    }
}
