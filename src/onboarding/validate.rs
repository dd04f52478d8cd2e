//! Step validators and the completion gate.
//!
//! Every function here is a pure predicate over a `Profile`. Step order is
//! not enforced: any step can be checked at any time.

use super::model::{LabelSet, Profile};
use super::state::OnboardingStep;

/// Steps the completion gate depends on, in navigation order.
pub const REQUIRED_STEPS: [OnboardingStep; 7] = [
    OnboardingStep::Location,
    OnboardingStep::Diet,
    OnboardingStep::Goals,
    OnboardingStep::Timings,
    OnboardingStep::Calories,
    OnboardingStep::Cuisines,
    OnboardingStep::Allergies,
];

fn non_empty(value: Option<&String>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

fn has_labels(labels: Option<&LabelSet>) -> bool {
    labels.is_some_and(|set| !set.is_empty())
}

/// City and country both non-empty. Coordinates are not needed.
pub fn location_satisfied(profile: &Profile) -> bool {
    profile
        .location
        .as_ref()
        .is_some_and(|loc| non_empty(loc.city.as_ref()) && non_empty(loc.country.as_ref()))
}

/// At least one dietary preference.
pub fn diet_satisfied(profile: &Profile) -> bool {
    has_labels(profile.dietary_preferences.as_ref())
}

/// A goal has been written. Membership in `PrimaryGoal` is the caller's check.
pub fn goals_satisfied(profile: &Profile) -> bool {
    non_empty(profile.primary_goal.as_ref())
}

/// Breakfast, lunch and dinner all set.
pub fn timings_satisfied(profile: &Profile) -> bool {
    profile.meal_timings.as_ref().is_some_and(|t| {
        non_empty(t.breakfast.as_ref()) && non_empty(t.lunch.as_ref()) && non_empty(t.dinner.as_ref())
    })
}

/// A strictly positive calorie target.
pub fn calories_satisfied(profile: &Profile) -> bool {
    profile.calorie_target.is_some_and(|c| c > 0)
}

/// Protein alone decides; carbs and fat are not looked at.
pub fn macros_satisfied(profile: &Profile) -> bool {
    profile
        .macro_preferences
        .as_ref()
        .and_then(|m| m.protein)
        .is_some_and(|p| p != 0)
}

/// At least one preferred cuisine.
pub fn cuisines_satisfied(profile: &Profile) -> bool {
    has_labels(profile.preferred_cuisines.as_ref())
}

/// Allergies were explicitly answered. An empty set counts.
pub fn allergies_satisfied(profile: &Profile) -> bool {
    profile.allergies.is_some()
}

impl OnboardingStep {
    /// Whether `profile` currently satisfies this step.
    pub fn is_satisfied(&self, profile: &Profile) -> bool {
        match self {
            Self::Location => location_satisfied(profile),
            Self::Diet => diet_satisfied(profile),
            Self::Goals => goals_satisfied(profile),
            Self::Timings => timings_satisfied(profile),
            Self::Calories => calories_satisfied(profile),
            Self::Macros => macros_satisfied(profile),
            Self::Cuisines => cuisines_satisfied(profile),
            Self::Allergies => allergies_satisfied(profile),
        }
    }
}

/// String-keyed check for callers that still hold raw keys. Unknown keys are
/// never satisfied.
pub fn is_step_key_valid(profile: &Profile, key: &str) -> bool {
    key.parse::<OnboardingStep>()
        .is_ok_and(|step| step.is_satisfied(profile))
}

/// Whether `step` counts as answered for the completion gate.
///
/// Same as the step predicate except for calories, where the gate only needs
/// a non-zero target: a negative value passes the gate but not the step.
fn gate_requirement_met(step: OnboardingStep, profile: &Profile) -> bool {
    match step {
        OnboardingStep::Calories => profile.calorie_target.is_some_and(|c| c != 0),
        OnboardingStep::Macros => true,
        other => other.is_satisfied(profile),
    }
}

/// The completion gate: may this user leave onboarding for the main app?
///
/// Macro preferences are not part of it.
pub fn is_complete(profile: &Profile) -> bool {
    location_satisfied(profile)
        && diet_satisfied(profile)
        && goals_satisfied(profile)
        && timings_satisfied(profile)
        && profile.calorie_target.is_some_and(|c| c != 0)
        && cuisines_satisfied(profile)
        && allergies_satisfied(profile)
}

/// Required steps the gate still rejects, in navigation order. Empty iff
/// `is_complete`.
pub fn missing_requirements(profile: &Profile) -> Vec<OnboardingStep> {
    REQUIRED_STEPS
        .into_iter()
        .filter(|step| !gate_requirement_met(*step, profile))
        .collect()
}

/// First step in navigation order whose predicate fails.
pub fn first_unsatisfied_step(profile: &Profile) -> Option<OnboardingStep> {
    OnboardingStep::ALL
        .into_iter()
        .find(|step| !step.is_satisfied(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::{Location, MacroPreferences, MealTimings, ProfileFragment};

    fn with(fragment: ProfileFragment) -> Profile {
        let mut p = Profile::default();
        p.merge(fragment);
        p
    }

    fn complete_fragments() -> Vec<ProfileFragment> {
        vec![
            ProfileFragment::new().location(Location::named("Lisbon", "Portugal")),
            ProfileFragment::new().dietary_preferences(vec!["Vegetarian"]),
            ProfileFragment::new().primary_goal("lose-weight"),
            ProfileFragment::new().meal_timings(MealTimings::new("08:00", "13:00", "20:00")),
            ProfileFragment::new().calorie_target(1800),
            ProfileFragment::new().preferred_cuisines(vec!["Thai"]),
            ProfileFragment::new().allergies(Vec::<String>::new()),
        ]
    }

    #[test]
    fn default_profile_satisfies_nothing() {
        let p = Profile::default();
        for step in OnboardingStep::ALL {
            assert!(!step.is_satisfied(&p), "{step} should not be satisfied");
        }
        assert!(!is_complete(&p));
    }

    #[test]
    fn location_needs_city_and_country() {
        assert!(location_satisfied(&with(
            ProfileFragment::new().location(Location::named("Lisbon", "Portugal"))
        )));

        let city_only = with(ProfileFragment::new().location(Location {
            city: Some("Lisbon".to_string()),
            latitude: Some(38.7),
            longitude: Some(-9.1),
            ..Default::default()
        }));
        assert!(!location_satisfied(&city_only));

        let blank_country = with(ProfileFragment::new().location(Location::named("Lisbon", "")));
        assert!(!location_satisfied(&blank_country));
    }

    #[test]
    fn diet_flips_with_single_label() {
        let mut labels = LabelSet::new();
        let mut p = with(ProfileFragment::new().dietary_preferences(labels.clone()));
        assert!(!diet_satisfied(&p));

        labels.toggle("Keto");
        p.merge(ProfileFragment::new().dietary_preferences(labels.clone()));
        assert!(diet_satisfied(&p));

        labels.toggle("Keto");
        p.merge(ProfileFragment::new().dietary_preferences(labels));
        assert!(!diet_satisfied(&p));
    }

    #[test]
    fn goals_accepts_any_non_empty_label() {
        assert!(goals_satisfied(&with(ProfileFragment::new().primary_goal("lose-weight"))));
        // Enumeration membership is not checked here.
        assert!(goals_satisfied(&with(ProfileFragment::new().primary_goal("get-rich"))));
        assert!(!goals_satisfied(&with(ProfileFragment::new().primary_goal(""))));
    }

    #[test]
    fn timings_need_all_three_meals() {
        assert!(timings_satisfied(&with(
            ProfileFragment::new().meal_timings(MealTimings::new("08:00", "13:00", "20:00"))
        )));
        let no_dinner = with(ProfileFragment::new().meal_timings(MealTimings {
            breakfast: Some("08:00".to_string()),
            lunch: Some("13:00".to_string()),
            dinner: None,
        }));
        assert!(!timings_satisfied(&no_dinner));
    }

    #[test]
    fn calories_must_be_positive() {
        assert!(calories_satisfied(&with(ProfileFragment::new().calorie_target(1))));
        assert!(!calories_satisfied(&with(ProfileFragment::new().calorie_target(0))));
        assert!(!calories_satisfied(&with(ProfileFragment::new().calorie_target(-500))));
    }

    #[test]
    fn macros_only_looks_at_protein() {
        let protein_only = with(ProfileFragment::new().macro_preferences(MacroPreferences {
            protein: Some(30),
            ..Default::default()
        }));
        assert!(macros_satisfied(&protein_only));

        let no_protein = with(ProfileFragment::new().macro_preferences(MacroPreferences {
            protein: None,
            carbs: Some(40),
            fat: Some(30),
        }));
        assert!(!macros_satisfied(&no_protein));

        let zero_protein = with(ProfileFragment::new().macro_preferences(MacroPreferences {
            protein: Some(0),
            ..Default::default()
        }));
        assert!(!macros_satisfied(&zero_protein));
    }

    #[test]
    fn cuisines_need_a_label() {
        assert!(cuisines_satisfied(&with(ProfileFragment::new().preferred_cuisines(vec!["Thai"]))));
        assert!(!cuisines_satisfied(&with(
            ProfileFragment::new().preferred_cuisines(Vec::<String>::new())
        )));
    }

    #[test]
    fn allergies_is_set_not_non_empty() {
        assert!(!allergies_satisfied(&Profile::default()));
        assert!(allergies_satisfied(&with(
            ProfileFragment::new().allergies(Vec::<String>::new())
        )));
        assert!(allergies_satisfied(&with(ProfileFragment::new().allergies(vec!["Peanuts"]))));
    }

    #[test]
    fn string_keys_fail_closed() {
        let p = with(ProfileFragment::new().allergies(Vec::<String>::new()));
        assert!(is_step_key_valid(&p, "allergies"));
        assert!(!is_step_key_valid(&p, "diet"));
        assert!(!is_step_key_valid(&p, "payment"));
        assert!(!is_step_key_valid(&p, ""));
    }

    #[test]
    fn gate_flips_only_after_last_required_fragment() {
        let mut p = Profile::default();
        let fragments = complete_fragments();
        let last = fragments.len() - 1;
        for (i, fragment) in fragments.into_iter().enumerate() {
            p.merge(fragment);
            assert_eq!(is_complete(&p), i == last, "after fragment {i}");
        }
        assert!(missing_requirements(&p).is_empty());
    }

    #[test]
    fn gate_ignores_macros() {
        let mut p = Profile::default();
        for fragment in complete_fragments() {
            p.merge(fragment);
        }
        assert!(p.macro_preferences.is_none());
        assert!(!macros_satisfied(&p));
        assert!(is_complete(&p));
    }

    #[test]
    fn gate_needs_non_zero_calories_only() {
        let mut p = Profile::default();
        for fragment in complete_fragments() {
            p.merge(fragment);
        }

        p.merge(ProfileFragment::new().calorie_target(-100));
        assert!(is_complete(&p));
        assert!(missing_requirements(&p).is_empty());
        assert!(!calories_satisfied(&p));

        p.merge(ProfileFragment::new().calorie_target(0));
        assert!(!is_complete(&p));
        assert_eq!(missing_requirements(&p), vec![OnboardingStep::Calories]);
    }

    #[test]
    fn missing_requirements_agrees_with_gate() {
        let mut p = Profile::default();
        assert!(!missing_requirements(&p).is_empty());
        for fragment in complete_fragments() {
            p.merge(fragment);
            assert_eq!(missing_requirements(&p).is_empty(), is_complete(&p));
        }
    }

    #[test]
    fn missing_requirements_in_navigation_order() {
        let p = with(ProfileFragment::new().primary_goal("eat-smarter"));
        assert_eq!(
            missing_requirements(&p),
            vec![
                OnboardingStep::Location,
                OnboardingStep::Diet,
                OnboardingStep::Timings,
                OnboardingStep::Calories,
                OnboardingStep::Cuisines,
                OnboardingStep::Allergies,
            ]
        );
    }

    #[test]
    fn first_unsatisfied_includes_macros() {
        let mut p = Profile::default();
        for fragment in complete_fragments().into_iter().take(5) {
            p.merge(fragment);
        }
        assert_eq!(first_unsatisfied_step(&p), Some(OnboardingStep::Macros));
    }
}
