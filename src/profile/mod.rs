//! Profiles created during onboarding.
//!
//! A profile scopes every transaction and budget. The current profile is
//! identified by an encrypted cookie, and pages that need one are guarded by
//! middleware that redirects to the onboarding form.

mod cookie;
mod core;
mod middleware;
mod onboarding;

pub use core::{NewProfile, Profile, ProfileId, create_profile, create_profile_table, get_profile};
pub use middleware::{profile_guard, profile_guard_hx};
pub use onboarding::{create_profile_endpoint, get_onboarding_page};

#[cfg(test)]
pub(crate) use core::test_profile;
