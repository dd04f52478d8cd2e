//! ProfileStore: owns the session's profile and applies merge-updates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::model::{Profile, ProfileFragment};
use super::state::OnboardingStep;
use super::validate;

/// Source of "now" for update stamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Holds the single profile for one session.
///
/// Operations run to completion synchronously and never fail. No validation
/// happens here: out-of-range values are stored as given.
pub struct ProfileStore {
    profile: Profile,
    clock: Arc<dyn Clock>,
    /// Latest stamp issued, kept across `reset` so stamps never go backwards.
    high_water: Option<DateTime<Utc>>,
}

impl ProfileStore {
    /// A store with the default profile and the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            profile: Profile::default(),
            clock,
            high_water: None,
        }
    }

    /// Current profile.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Owned copy of the current profile.
    pub fn snapshot(&self) -> Profile {
        self.profile.clone()
    }

    /// Replace the profile with a persisted snapshot at session start.
    pub fn hydrate(&mut self, profile: Profile) {
        if let Some(stamp) = profile.last_updated {
            self.high_water = Some(self.high_water.map_or(stamp, |hw| hw.max(stamp)));
        }
        self.profile = profile;
        debug!("Profile hydrated from snapshot");
    }

    /// Shallow-merge `fragment` and stamp `last_updated`, even when nothing
    /// changed.
    ///
    /// A cached completion flag is dropped if the merged profile no longer
    /// passes the gate.
    pub fn update(&mut self, fragment: ProfileFragment) {
        self.profile.merge(fragment);
        if self.profile.onboarding_completed && !validate::is_complete(&self.profile) {
            self.profile.onboarding_completed = false;
            self.profile.onboarding_completed_at = None;
            debug!("Completion flag cleared, gate no longer passes");
        }
        let stamp = self.next_stamp();
        self.profile.last_updated = Some(stamp);
        debug!(last_updated = %stamp, "Profile updated");
    }

    /// Back to the default profile. Nothing from before survives.
    pub fn reset(&mut self) {
        self.profile = Profile::default();
        debug!("Profile reset");
    }

    /// Whether the current profile satisfies `step`.
    pub fn is_step_valid(&self, step: OnboardingStep) -> bool {
        step.is_satisfied(&self.profile)
    }

    /// Whether the current profile passes the completion gate.
    pub fn is_complete(&self) -> bool {
        validate::is_complete(&self.profile)
    }

    /// Set the cached completion flag and its timestamp. Only the session
    /// layer calls this, after checking the gate.
    pub(crate) fn mark_completed(&mut self) {
        let stamp = self.next_stamp();
        self.profile.onboarding_completed = true;
        self.profile.onboarding_completed_at = Some(stamp);
        self.profile.last_updated = Some(stamp);
    }

    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = self.clock.now();
        let stamp = match self.high_water {
            Some(hw) if hw > now => hw,
            _ => now,
        };
        self.high_water = Some(stamp);
        stamp
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("profile", &self.profile)
            .field("high_water", &self.high_water)
            .finish()
    }
}
