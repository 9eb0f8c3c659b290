use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Commitment, Error, Result};

/// Registered user data.
#[derive(Clone, Debug)]
pub struct UserRecord {
    /// Unique identifier for the user.
    pub user_id: String,
    /// Public record `(y1, y2)` submitted at registration.
    pub commitments: Commitment,
    /// Unix timestamp of registration.
    pub registered_at: u64,
}

/// Storage of registration records.
///
/// `add` must check and insert atomically; records are never replaced.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Stores the record of a new user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserExists`] if the id is taken.
    async fn add(&self, user_id: &str, commitments: Commitment) -> Result<()>;

    /// Fetches the record of a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserDoesNotExist`] for unknown ids.
    async fn get(&self, user_id: &str) -> Result<Commitment>;
}

/// In-memory registry shared by all connections.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the full record of a user.
    pub async fn record(&self, user_id: &str) -> Option<UserRecord> {
        self.users.read().await.get(user_id).cloned()
    }

    /// Number of registered users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn add(&self, user_id: &str, commitments: Commitment) -> Result<()> {
        let mut users = self.users.write().await;

        match users.entry(user_id.to_string()) {
            Entry::Occupied(_) => Err(Error::UserExists(user_id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(UserRecord {
                    user_id: user_id.to_string(),
                    commitments,
                    registered_at: SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .unwrap_or_else(|_| unreachable!("System time is after UNIX_EPOCH"))
                        .as_secs(),
                });
                Ok(())
            }
        }
    }

    async fn get(&self, user_id: &str) -> Result<Commitment> {
        self.users
            .read()
            .await
            .get(user_id)
            .map(|record| record.commitments.clone())
            .ok_or_else(|| Error::UserDoesNotExist(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    fn record(y1: u32, y2: u32) -> Commitment {
        Commitment::new(BigUint::from(y1), BigUint::from(y2))
    }

    #[tokio::test]
    async fn add_then_get() {
        let registry = InMemoryRegistry::new();
        registry.add("alice", record(2, 3)).await.unwrap();

        assert_eq!(registry.get("alice").await.unwrap(), record(2, 3));
        assert_eq!(registry.user_count().await, 1);
        assert_eq!(registry.record("alice").await.unwrap().user_id, "alice");
    }

    #[tokio::test]
    async fn duplicate_keeps_first_record() {
        let registry = InMemoryRegistry::new();
        registry.add("alice", record(2, 3)).await.unwrap();

        let err = registry.add("alice", record(18, 16)).await.unwrap_err();
        assert!(matches!(err, Error::UserExists(ref user) if user == "alice"));
        assert_eq!(err.to_string(), "user already exists");
        assert_eq!(registry.get("alice").await.unwrap(), record(2, 3));
    }

    #[tokio::test]
    async fn unknown_user() {
        let registry = InMemoryRegistry::new();
        let err = registry.get("bob").await.unwrap_err();
        assert!(matches!(err, Error::UserDoesNotExist(ref user) if user == "bob"));
        assert_eq!(err.to_string(), "user doesn't exist");
    }

    #[tokio::test]
    async fn concurrent_registration_has_one_winner() {
        let registry = InMemoryRegistry::new();
        let mut handles = Vec::new();
        for i in 0..16u32 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.add("carol", record(i + 1, i + 2)).await.is_ok()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(registry.user_count().await, 1);
    }
}
