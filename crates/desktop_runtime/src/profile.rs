//! In-memory holder of the onboarded user's identity.

use crate::model::{AvatarRef, UserProfile};

/// Session-owned profile slot. Empty until onboarding completes or a stored record is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStore {
    profile: Option<UserProfile>,
}

impl ProfileStore {
    pub fn from_loaded(profile: Option<UserProfile>) -> Self {
        Self { profile }
    }

    pub fn get(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn needs_onboarding(&self) -> bool {
        self.profile.is_none()
    }

    /// Stores the onboarding result. Returns `false` when a profile already exists.
    pub fn complete_onboarding(&mut self, profile: UserProfile) -> bool {
        if self.profile.is_some() {
            return false;
        }
        self.profile = Some(profile);
        true
    }

    /// Sets the avatar. Returns the updated profile, or `None` before onboarding.
    pub fn set_avatar(&mut self, avatar: AvatarRef) -> Option<&UserProfile> {
        let profile = self.profile.as_mut()?;
        profile.set_avatar(avatar);
        Some(profile)
    }

    pub fn clear(&mut self) {
        self.profile = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> UserProfile {
        UserProfile::new("Ada", "Europe/London").expect("valid profile")
    }

    #[test]
    fn onboarding_happens_once() {
        let mut store = ProfileStore::default();
        assert!(store.needs_onboarding());
        assert!(store.complete_onboarding(ada()));
        assert!(!store.complete_onboarding(UserProfile::new("Bob", "UTC").expect("valid")));
        assert_eq!(store.get().map(UserProfile::name), Some("Ada"));
    }

    #[test]
    fn avatar_requires_a_profile_and_clear_forgets_everything() {
        let mut store = ProfileStore::default();
        assert!(store.set_avatar(AvatarRef::new("data:,")).is_none());

        store.complete_onboarding(ada());
        let updated = store.set_avatar(AvatarRef::new("data:,")).cloned();
        assert_eq!(
            updated.and_then(|p| p.avatar().cloned()),
            Some(AvatarRef::new("data:,"))
        );

        store.clear();
        assert!(store.needs_onboarding());
    }
}
