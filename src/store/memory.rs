//! In-process `ProfileRepository`, used by the binary and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::traits::ProfileRepository;
use crate::error::RepositoryError;
use crate::onboarding::Profile;

/// Keeps snapshots as JSON values in memory. Contents are lost when the
/// process exits.
#[derive(Debug, Default)]
pub struct MemoryProfileRepository {
    snapshots: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn load_profile(&self, user_key: &str) -> Result<Option<Profile>, RepositoryError> {
        let snapshots = self.snapshots.read().await;
        match snapshots.get(user_key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn save_profile(&self, user_key: &str, profile: &Profile) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(profile)?;
        self.snapshots
            .write()
            .await
            .insert(user_key.to_string(), value);
        Ok(())
    }

    async fn delete_profile(&self, user_key: &str) -> Result<bool, RepositoryError> {
        Ok(self.snapshots.write().await.remove(user_key).is_some())
    }
}
