//! Profile data model: the accumulated onboarding answers and account state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account subscription tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Premium,
}

impl Default for SubscriptionTier {
    fn default() -> Self {
        Self::Free
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

/// The goals a user can pick on the goals screen.
///
/// The profile stores the raw label; this enumeration is what callers check
/// membership against before writing it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryGoal {
    LoseWeight,
    GainMuscle,
    ImproveHealth,
    EatSmarter,
}

impl PrimaryGoal {
    pub const ALL: [PrimaryGoal; 4] = [
        Self::LoseWeight,
        Self::GainMuscle,
        Self::ImproveHealth,
        Self::EatSmarter,
    ];

    /// Stable label stored in `Profile::primary_goal`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LoseWeight => "lose-weight",
            Self::GainMuscle => "gain-muscle",
            Self::ImproveHealth => "improve-health",
            Self::EatSmarter => "eat-smarter",
        }
    }
}

impl std::fmt::Display for PrimaryGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for PrimaryGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|goal| goal.label() == s)
            .ok_or_else(|| format!("unrecognized goal: {s}"))
    }
}

/// An insertion-ordered set of free-text labels.
///
/// Serializes as a plain JSON array. Duplicates are dropped on insert and on
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label. Returns false if it was already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.0.push(label);
        true
    }

    /// Remove a label. Returns false if it was not present.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|l| l != label);
        self.0.len() != before
    }

    /// Add the label if absent, remove it if present. Returns whether the
    /// label is selected afterwards.
    pub fn toggle(&mut self, label: &str) -> bool {
        if self.remove(label) {
            false
        } else {
            self.0.push(label.to_string());
            true
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

impl<S: Into<String>> From<Vec<S>> for LabelSet {
    fn from(labels: Vec<S>) -> Self {
        labels.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for LabelSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let labels = Vec::<String>::deserialize(deserializer)?;
        Ok(labels.into_iter().collect())
    }
}

/// Where the user is, as entered or as resolved from the device.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    /// City and country without coordinates.
    pub fn named(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            country: Some(country.into()),
            ..Default::default()
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// Usual meal times, as time-of-day strings (e.g. "07:30").
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealTimings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<String>,
}

impl MealTimings {
    pub fn new(
        breakfast: impl Into<String>,
        lunch: impl Into<String>,
        dinner: impl Into<String>,
    ) -> Self {
        Self {
            breakfast: Some(breakfast.into()),
            lunch: Some(lunch.into()),
            dinner: Some(dinner.into()),
        }
    }
}

/// Macro split preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<u32>,
}

/// The user profile accumulated during onboarding.
///
/// Every onboarding answer is optional until the matching screen writes it.
/// `allergies` distinguishes "never asked" (`None`) from "no allergies"
/// (`Some` of an empty set).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<LabelSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_timings: Option<MealTimings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_preferences: Option<MacroPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_cuisines: Option<LabelSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<LabelSet>,

    /// Cached gate result, set on completion. Cleared by the store when an
    /// update breaks the gate.
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Profile {
    /// Shallow-merge a fragment: every field the fragment mentions replaces
    /// the current value wholesale, everything else is kept.
    pub fn merge(&mut self, fragment: ProfileFragment) {
        let ProfileFragment {
            id,
            email,
            phone,
            location,
            dietary_preferences,
            primary_goal,
            meal_timings,
            calorie_target,
            macro_preferences,
            preferred_cuisines,
            allergies,
            onboarding_completed,
            subscription_tier,
        } = fragment;

        if id.is_some() {
            self.id = id;
        }
        if email.is_some() {
            self.email = email;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        if location.is_some() {
            self.location = location;
        }
        if dietary_preferences.is_some() {
            self.dietary_preferences = dietary_preferences;
        }
        if primary_goal.is_some() {
            self.primary_goal = primary_goal;
        }
        if meal_timings.is_some() {
            self.meal_timings = meal_timings;
        }
        if calorie_target.is_some() {
            self.calorie_target = calorie_target;
        }
        if macro_preferences.is_some() {
            self.macro_preferences = macro_preferences;
        }
        if preferred_cuisines.is_some() {
            self.preferred_cuisines = preferred_cuisines;
        }
        if allergies.is_some() {
            self.allergies = allergies;
        }
        if let Some(completed) = onboarding_completed {
            self.onboarding_completed = completed;
        }
        if let Some(tier) = subscription_tier {
            self.subscription_tier = tier;
        }
    }
}

/// A partial profile passed to `update`. `None` means "not mentioned".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<LabelSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_timings: Option<MealTimings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macro_preferences: Option<MacroPreferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_cuisines: Option<LabelSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<LabelSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<SubscriptionTier>,
}

impl ProfileFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn dietary_preferences(mut self, labels: impl Into<LabelSet>) -> Self {
        self.dietary_preferences = Some(labels.into());
        self
    }

    pub fn primary_goal(mut self, goal: impl Into<String>) -> Self {
        self.primary_goal = Some(goal.into());
        self
    }

    pub fn meal_timings(mut self, timings: MealTimings) -> Self {
        self.meal_timings = Some(timings);
        self
    }

    pub fn calorie_target(mut self, calories: i32) -> Self {
        self.calorie_target = Some(calories);
        self
    }

    pub fn macro_preferences(mut self, macros: MacroPreferences) -> Self {
        self.macro_preferences = Some(macros);
        self
    }

    pub fn preferred_cuisines(mut self, labels: impl Into<LabelSet>) -> Self {
        self.preferred_cuisines = Some(labels.into());
        self
    }

    pub fn allergies(mut self, labels: impl Into<LabelSet>) -> Self {
        self.allergies = Some(labels.into());
        self
    }

    pub fn onboarding_completed(mut self, completed: bool) -> Self {
        self.onboarding_completed = Some(completed);
        self
    }

    pub fn subscription_tier(mut self, tier: SubscriptionTier) -> Self {
        self.subscription_tier = Some(tier);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_has_expected_values() {
        let p = Profile::default();
        assert_eq!(p.subscription_tier, SubscriptionTier::Free);
        assert!(!p.onboarding_completed);
        assert!(p.id.is_none());
        assert!(p.location.is_none());
        assert!(p.allergies.is_none());
        assert!(p.last_updated.is_none());
    }

    #[test]
    fn default_profile_serializes_to_two_fields() {
        let json = serde_json::to_value(Profile::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "onboarding_completed": false,
                "subscription_tier": "free"
            })
        );
    }

    #[test]
    fn merge_keeps_unmentioned_fields() {
        let mut p = Profile::default();
        p.merge(ProfileFragment::new().primary_goal("lose-weight"));
        p.merge(ProfileFragment::new().calorie_target(1800));

        assert_eq!(p.primary_goal.as_deref(), Some("lose-weight"));
        assert_eq!(p.calorie_target, Some(1800));
    }

    #[test]
    fn merge_replaces_nested_values_wholesale() {
        let mut p = Profile::default();
        p.merge(ProfileFragment::new().location(
            Location::named("Lisbon", "Portugal").with_coordinates(38.72, -9.14),
        ));
        p.merge(ProfileFragment::new().location(Location {
            city: Some("Porto".to_string()),
            ..Default::default()
        }));

        let loc = p.location.unwrap();
        assert_eq!(loc.city.as_deref(), Some("Porto"));
        // Not deep-merged: country and coordinates are gone.
        assert!(loc.country.is_none());
        assert!(loc.latitude.is_none());
    }

    #[test]
    fn later_fragment_overrides_earlier() {
        let mut p = Profile::default();
        p.merge(ProfileFragment::new().primary_goal("lose-weight"));
        p.merge(ProfileFragment::new().primary_goal("gain-muscle"));
        assert_eq!(p.primary_goal.as_deref(), Some("gain-muscle"));
    }

    #[test]
    fn fragment_deserializes_missing_keys_as_unmentioned() {
        let fragment: ProfileFragment =
            serde_json::from_str(r#"{"allergies": [], "calorie_target": 2000}"#).unwrap();
        assert_eq!(fragment.allergies, Some(LabelSet::new()));
        assert_eq!(fragment.calorie_target, Some(2000));
        assert!(fragment.location.is_none());
        assert!(fragment.subscription_tier.is_none());
    }

    #[test]
    fn label_set_toggle_and_order() {
        let mut set = LabelSet::new();
        assert!(set.toggle("Vegan"));
        assert!(set.toggle("Keto"));
        assert!(!set.insert("Vegan"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Vegan", "Keto"]);

        assert!(!set.toggle("Vegan"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Keto"]);
        assert!(!set.remove("Paleo"));
    }

    #[test]
    fn label_set_deserialize_drops_duplicates() {
        let set: LabelSet = serde_json::from_str(r#"["Thai", "Italian", "Thai"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["Thai","Italian"]"#);
    }

    #[test]
    fn primary_goal_labels_parse() {
        for goal in PrimaryGoal::ALL {
            assert_eq!(goal.label().parse::<PrimaryGoal>().unwrap(), goal);
            let json = serde_json::to_string(&goal).unwrap();
            assert_eq!(json, format!("\"{goal}\""));
        }
        assert!("get-rich".parse::<PrimaryGoal>().is_err());
        assert!("Lose Weight".parse::<PrimaryGoal>().is_err());
    }

    #[test]
    fn subscription_tier_serde() {
        let premium: SubscriptionTier = serde_json::from_str("\"premium\"").unwrap();
        assert_eq!(premium, SubscriptionTier::Premium);
        assert_eq!(SubscriptionTier::default().to_string(), "free");
    }

    #[test]
    fn profile_serde_roundtrip() {
        let mut profile = Profile::default();
        profile.merge(
            ProfileFragment::new()
                .email("ana@example.com")
                .location(Location::named("Lisbon", "Portugal"))
                .dietary_preferences(vec!["Vegetarian"])
                .meal_timings(MealTimings::new("08:00", "13:00", "20:00"))
                .allergies(Vec::<String>::new()),
        );

        let json = serde_json::to_string(&profile).unwrap();
        let parsed: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
        assert_eq!(parsed.allergies, Some(LabelSet::new()));
    }
}
