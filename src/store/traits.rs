//! `ProfileRepository` trait: where a session's profile snapshot goes
//! between sessions.
//!
//! The onboarding core does not persist anything itself. A repository
//! accepts the current snapshot after each mutation and produces one to
//! hydrate the store when a session starts.

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::onboarding::Profile;

/// Backend-agnostic snapshot storage keyed by user.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Load the last saved snapshot for `user_key`, if any.
    async fn load_profile(&self, user_key: &str) -> Result<Option<Profile>, RepositoryError>;

    /// Store `profile` as the snapshot for `user_key`, replacing any previous one.
    async fn save_profile(&self, user_key: &str, profile: &Profile) -> Result<(), RepositoryError>;

    /// Remove the snapshot for `user_key`. Returns whether one existed.
    async fn delete_profile(&self, user_key: &str) -> Result<bool, RepositoryError>;
}
