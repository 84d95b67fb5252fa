use crate::intent::PaymentIntent;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Intent already exists: {0}")]
    AlreadyExists(String),

    #[error("Stale intent version for {id}: expected {expected}, got {actual}")]
    VersionConflict { id: String, expected: u64, actual: u64 },

    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Persistence boundary for payment intents.
///
/// `update` is version-checked: callers must pass back the version they
/// read, so concurrent capture/refund on one intent id cannot silently
/// overwrite each other.
#[async_trait]
pub trait PaymentIntentStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentIntent>, StoreError>;

    async fn create(&self, intent: &PaymentIntent) -> Result<(), StoreError>;

    async fn update(&self, intent: &PaymentIntent) -> Result<(), StoreError>;
}

/// Reference store keeping intents in process memory.
#[derive(Default)]
pub struct InMemoryIntentStore {
    intents: RwLock<HashMap<String, PaymentIntent>>,
}

impl InMemoryIntentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.intents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.intents.read().await.is_empty()
    }

    /// Snapshot of every stored intent, ordered by creation time. Meant
    /// for inspection and tests, not part of the store boundary.
    pub async fn all(&self) -> Vec<PaymentIntent> {
        let mut intents: Vec<_> = self.intents.read().await.values().cloned().collect();
        intents.sort_by_key(|i| i.created_at);
        intents
    }
}

#[async_trait]
impl PaymentIntentStore for InMemoryIntentStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentIntent>, StoreError> {
        Ok(self.intents.read().await.get(id).cloned())
    }

    async fn create(&self, intent: &PaymentIntent) -> Result<(), StoreError> {
        let mut intents = self.intents.write().await;
        if intents.contains_key(&intent.id) {
            return Err(StoreError::AlreadyExists(intent.id.clone()));
        }
        intents.insert(intent.id.clone(), intent.clone());
        Ok(())
    }

    async fn update(&self, intent: &PaymentIntent) -> Result<(), StoreError> {
        let mut intents = self.intents.write().await;
        let current = intents
            .get(&intent.id)
            .ok_or_else(|| StoreError::Backend(format!("unknown intent {}", intent.id)))?;

        if current.version != intent.version {
            return Err(StoreError::VersionConflict {
                id: intent.id.clone(),
                expected: current.version,
                actual: intent.version,
            });
        }

        let mut stored = intent.clone();
        stored.version += 1;
        intents.insert(stored.id.clone(), stored);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn intent() -> PaymentIntent {
        let amount = Money::new("10.00".parse().unwrap(), "USD").unwrap();
        PaymentIntent::new("credit_card", amount)
    }

    #[tokio::test]
    async fn create_then_find() {
        let store = InMemoryIntentStore::new();
        let intent = intent();
        store.create(&intent).await.unwrap();

        let found = store.find_by_id(&intent.id).await.unwrap().unwrap();
        assert_eq!(found.id, intent.id);
        assert!(store.find_by_id("pi_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let store = InMemoryIntentStore::new();
        let intent = intent();
        store.create(&intent).await.unwrap();
        assert!(matches!(
            store.create(&intent).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let store = InMemoryIntentStore::new();
        let mut intent = intent();
        store.create(&intent).await.unwrap();

        intent.authorize().unwrap();
        store.update(&intent).await.unwrap();

        let stored = store.find_by_id(&intent.id).await.unwrap().unwrap();
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn stale_update_is_rejected() {
        let store = InMemoryIntentStore::new();
        let created = intent();
        store.create(&created).await.unwrap();

        // Two readers take the same snapshot.
        let mut first = store.find_by_id(&created.id).await.unwrap().unwrap();
        let mut second = store.find_by_id(&created.id).await.unwrap().unwrap();

        first.authorize().unwrap();
        store.update(&first).await.unwrap();

        second.cancel().unwrap();
        assert!(matches!(
            store.update(&second).await,
            Err(StoreError::VersionConflict { .. })
        ));
    }
}
