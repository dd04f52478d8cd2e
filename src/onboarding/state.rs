//! Onboarding steps: the closed set of screens and their navigation order.

use serde::{Deserialize, Serialize};

/// One onboarding screen.
///
/// Navigation order: Location → Diet → Goals → Timings → Calories → Macros →
/// Cuisines → Allergies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Location,
    Diet,
    Goals,
    Timings,
    Calories,
    Macros,
    Cuisines,
    Allergies,
}

impl OnboardingStep {
    /// Every step in navigation order.
    pub const ALL: [OnboardingStep; 8] = [
        Self::Location,
        Self::Diet,
        Self::Goals,
        Self::Timings,
        Self::Calories,
        Self::Macros,
        Self::Cuisines,
        Self::Allergies,
    ];

    /// Stable string key for the step.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Diet => "diet",
            Self::Goals => "goals",
            Self::Timings => "timings",
            Self::Calories => "calories",
            Self::Macros => "macros",
            Self::Cuisines => "cuisines",
            Self::Allergies => "allergies",
        }
    }

    /// Zero-based position in the navigation order.
    pub fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// Get the next step in the navigation order, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        Self::ALL.get(self.position() + 1).copied()
    }

    /// Get the previous step in the navigation order, if any.
    pub fn previous(&self) -> Option<OnboardingStep> {
        self.position()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Progress bar value shown on this step's screen.
    pub fn progress_percent(&self) -> f32 {
        (self.position() + 1) as f32 * 100.0 / Self::ALL.len() as f32
    }

    /// Whether the completion gate depends on this step.
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Macros)
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for OnboardingStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.key() == s)
            .ok_or_else(|| format!("unknown onboarding step: {s}"))
    }
}
