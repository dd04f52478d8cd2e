//! OnboardingSession: the injected, session-scoped owner of the profile
//! store.
//!
//! Screens and the navigator share one session. It serializes access to the
//! store, runs the checks screens perform before writing (contact presence on
//! sign-in, goal membership), decides where a returning user lands, and hands
//! every new snapshot to the repository.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{self, OnboardingError};
use crate::store::ProfileRepository;

use super::model::{PrimaryGoal, Profile, ProfileFragment};
use super::profile_store::ProfileStore;
use super::state::OnboardingStep;
use super::validate;

/// Where the navigator should send the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "step", rename_all = "snake_case")]
pub enum Route {
    /// Onboarding is not finished; resume at this step.
    Onboarding(OnboardingStep),
    /// The completion gate passes.
    MainApp,
}

/// Per-step view used by the progress UI.
#[derive(Debug, Clone, Serialize)]
pub struct StepStatus {
    pub step: OnboardingStep,
    pub satisfied: bool,
    pub required: bool,
}

/// Onboarding status returned by the REST endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    /// Result of the completion gate, not the cached profile flag.
    pub onboarding_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<OnboardingStep>,
    pub progress_percent: f32,
    pub steps: Vec<StepStatus>,
    pub profile: Profile,
}

/// One user's onboarding session.
pub struct OnboardingSession {
    store: Arc<RwLock<ProfileStore>>,
    repository: Arc<dyn ProfileRepository>,
    user_key: String,
}

impl OnboardingSession {
    pub fn new(
        store: ProfileStore,
        repository: Arc<dyn ProfileRepository>,
        user_key: impl Into<String>,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            repository,
            user_key: user_key.into(),
        }
    }

    /// Open a session from the saved snapshot, if there is one. A failed
    /// load is returned to the caller.
    pub async fn resume(
        store: ProfileStore,
        repository: Arc<dyn ProfileRepository>,
        user_key: impl Into<String>,
    ) -> error::Result<Self> {
        let session = Self::new(store, repository, user_key);
        session.load_snapshot().await?;
        Ok(session)
    }

    /// Like `resume`, but a failed load leaves the store as given.
    pub async fn start(
        store: ProfileStore,
        repository: Arc<dyn ProfileRepository>,
        user_key: impl Into<String>,
    ) -> Self {
        let session = Self::new(store, repository, user_key);
        if let Err(e) = session.load_snapshot().await {
            warn!(user_key = %session.user_key, "Failed to load profile snapshot: {}", e);
        }
        session
    }

    async fn load_snapshot(&self) -> error::Result<()> {
        match self.repository.load_profile(&self.user_key).await? {
            Some(profile) => {
                info!(user_key = %self.user_key, "Resuming onboarding session from snapshot");
                self.store.write().await.hydrate(profile);
            }
            None => {
                info!(user_key = %self.user_key, "Starting new onboarding session");
            }
        }
        Ok(())
    }

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    /// Current profile snapshot.
    pub async fn profile(&self) -> Profile {
        self.store.read().await.snapshot()
    }

    /// Shallow-merge a fragment and persist. Returns the new snapshot.
    pub async fn update(&self, fragment: ProfileFragment) -> Profile {
        let snapshot = {
            let mut store = self.store.write().await;
            store.update(fragment);
            store.snapshot()
        };
        self.persist(&snapshot).await;
        snapshot
    }

    /// Sign-out: back to the default profile, and the saved snapshot with it.
    pub async fn reset(&self) -> Profile {
        let snapshot = {
            let mut store = self.store.write().await;
            store.reset();
            store.snapshot()
        };
        info!(user_key = %self.user_key, "Profile reset on sign-out");
        if let Err(e) = self.repository.delete_profile(&self.user_key).await {
            warn!(user_key = %self.user_key, "Failed to delete profile snapshot: {}", e);
        }
        snapshot
    }

    /// Record contact details after authentication.
    ///
    /// At least one of email or phone must be non-blank. A profile id is
    /// assigned on first sign-in and kept afterwards.
    pub async fn sign_in(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Profile, OnboardingError> {
        let email = email.map(str::trim).filter(|s| !s.is_empty());
        let phone = phone.map(str::trim).filter(|s| !s.is_empty());
        if email.is_none() && phone.is_none() {
            return Err(OnboardingError::MissingContact);
        }

        let mut fragment = ProfileFragment::new();
        fragment.email = email.map(String::from);
        fragment.phone = phone.map(String::from);

        let snapshot = {
            let mut store = self.store.write().await;
            if store.profile().id.is_none() {
                fragment.id = Some(Uuid::new_v4().to_string());
            }
            store.update(fragment);
            store.snapshot()
        };
        info!(user_key = %self.user_key, "User signed in");
        self.persist(&snapshot).await;
        Ok(snapshot)
    }

    /// Store a goal after checking it is one of the offered options.
    pub async fn select_goal(&self, raw: &str) -> Result<PrimaryGoal, OnboardingError> {
        let goal: PrimaryGoal = raw.parse().map_err(|_| OnboardingError::UnrecognizedGoal {
            goal: raw.to_string(),
        })?;
        self.update(ProfileFragment::new().primary_goal(goal.label()))
            .await;
        Ok(goal)
    }

    pub async fn is_step_valid(&self, step: OnboardingStep) -> bool {
        self.store.read().await.is_step_valid(step)
    }

    pub async fn is_complete(&self) -> bool {
        self.store.read().await.is_complete()
    }

    /// Decide whether the session goes to the main app or back into
    /// onboarding, and at which step.
    pub async fn route(&self) -> Route {
        let store = self.store.read().await;
        route_for(store.profile())
    }

    /// Leave onboarding. Sets the cached completion flag when the gate
    /// passes; otherwise reports the missing steps and changes nothing.
    pub async fn complete(&self) -> Result<Profile, OnboardingError> {
        let snapshot = {
            let mut store = self.store.write().await;
            let missing = validate::missing_requirements(store.profile());
            if !missing.is_empty() {
                return Err(OnboardingError::Incomplete { missing });
            }
            store.mark_completed();
            store.snapshot()
        };
        info!(user_key = %self.user_key, "Onboarding completed");
        self.persist(&snapshot).await;
        Ok(snapshot)
    }

    /// Full status for the status endpoint.
    pub async fn status(&self) -> OnboardingStatus {
        let profile = self.profile().await;
        let steps = OnboardingStep::ALL
            .into_iter()
            .map(|step| StepStatus {
                step,
                satisfied: step.is_satisfied(&profile),
                required: step.is_required(),
            })
            .collect();
        let current_step = match route_for(&profile) {
            Route::Onboarding(step) => Some(step),
            Route::MainApp => None,
        };
        OnboardingStatus {
            onboarding_completed: validate::is_complete(&profile),
            current_step,
            progress_percent: current_step.map_or(100.0, |s| s.progress_percent()),
            steps,
            profile,
        }
    }

    /// Hand the snapshot to the repository. Failures are logged, never
    /// surfaced: the in-memory profile stays authoritative.
    async fn persist(&self, profile: &Profile) {
        if let Err(e) = self.repository.save_profile(&self.user_key, profile).await {
            warn!(user_key = %self.user_key, "Failed to persist profile snapshot: {}", e);
        }
    }
}

fn route_for(profile: &Profile) -> Route {
    if validate::is_complete(profile) {
        return Route::MainApp;
    }
    match validate::first_unsatisfied_step(profile) {
        Some(step) => Route::Onboarding(step),
        None => Route::MainApp,
    }
}
