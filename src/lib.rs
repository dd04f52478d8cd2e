//! NutriAI onboarding: profile accumulation and step gating.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod store;
