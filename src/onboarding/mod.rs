//! Onboarding core: a step-gated profile accumulator.
//!
//! Each onboarding screen writes a fragment of the user's profile through the
//! session, then asks whether its own step is satisfied before moving on. The
//! completion gate decides when the user may leave onboarding for the main
//! app.

pub mod manager;
pub mod model;
pub mod profile_store;
pub mod routes;
pub mod state;
pub mod validate;

pub use manager::{OnboardingSession, OnboardingStatus, Route, StepStatus};
pub use model::{
    LabelSet, Location, MacroPreferences, MealTimings, PrimaryGoal, Profile, ProfileFragment,
    SubscriptionTier,
};
pub use profile_store::{Clock, ProfileStore, SystemClock};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use state::OnboardingStep;
pub use validate::{is_complete, missing_requirements};
