//! Profile record persistence through the host [`PrefsStore`].
//!
//! The record is the only durable state of a session: read once at boot, written when onboarding
//! completes or the avatar changes, deleted at logout.

use platform_host::{delete_pref_with, load_pref_with, save_pref_with, PrefsStore};
use serde::{Deserialize, Serialize};

use crate::model::UserProfile;

pub const PROFILE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub schema_version: u32,
    pub profile: UserProfile,
}

fn migrate_profile_record(record: ProfileRecord) -> Option<UserProfile> {
    match record.schema_version {
        PROFILE_SCHEMA_VERSION => Some(record.profile),
        _ => None,
    }
}

/// Loads the stored profile, if any.
///
/// Records with an unknown schema version are ignored, which sends the user back through
/// onboarding.
///
/// # Errors
///
/// Returns an error when the store fails or the record is not valid JSON.
pub async fn load_profile(
    store: &dyn PrefsStore,
    key: &str,
) -> Result<Option<UserProfile>, String> {
    let record = load_pref_with::<_, ProfileRecord>(store, key).await?;
    Ok(record.and_then(|record| {
        let version = record.schema_version;
        let profile = migrate_profile_record(record);
        if profile.is_none() {
            tracing::warn!(version, "ignoring profile record with unknown schema version");
        }
        profile
    }))
}

/// Writes the profile record under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the store save fails.
pub async fn persist_profile(
    store: &dyn PrefsStore,
    key: &str,
    profile: &UserProfile,
) -> Result<(), String> {
    let record = ProfileRecord {
        schema_version: PROFILE_SCHEMA_VERSION,
        profile: profile.clone(),
    };
    save_pref_with(store, key, &record).await
}

/// Deletes the profile record under `key`.
///
/// # Errors
///
/// Returns an error when the store delete fails.
pub async fn clear_profile(store: &dyn PrefsStore, key: &str) -> Result<(), String> {
    delete_pref_with(store, key).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::AvatarRef;

    const KEY: &str = "vdesk.profile.v1";

    #[test]
    fn persisted_profile_loads_back() {
        let store = MemoryPrefsStore::default();
        let profile = UserProfile::new("Ada", "Europe/London").expect("valid");

        block_on(persist_profile(&store, KEY, &profile)).expect("persist");

        assert_eq!(
            block_on(load_profile(&store, KEY)).expect("load"),
            Some(profile)
        );
    }

    #[test]
    fn record_layout_is_versioned_json() {
        let store = MemoryPrefsStore::default();
        let profile = UserProfile::new("Ada", "UTC").expect("valid");
        block_on(persist_profile(&store, KEY, &profile)).expect("persist");

        let raw: serde_json::Value =
            serde_json::from_str(&store.raw(KEY).expect("stored")).expect("json");
        assert_eq!(
            raw,
            json!({
                "schema_version": 1,
                "profile": {"name": "Ada", "timezone": "UTC", "avatar": null}
            })
        );
    }

    #[test]
    fn missing_and_unknown_version_records_mean_onboarding() {
        let store = MemoryPrefsStore::default();
        assert_eq!(block_on(load_profile(&store, KEY)).expect("load"), None);

        store.insert_raw(
            KEY,
            r#"{"schema_version":9,"profile":{"name":"Ada","timezone":"UTC","avatar":null}}"#,
        );
        assert_eq!(block_on(load_profile(&store, KEY)).expect("load"), None);
    }

    #[test]
    fn records_failing_profile_validation_are_rejected() {
        let store = MemoryPrefsStore::default();
        store.insert_raw(
            KEY,
            r#"{"schema_version":1,"profile":{"name":"","timezone":"not a zone","avatar":null}}"#,
        );
        assert!(block_on(load_profile(&store, KEY)).is_err());

        store.insert_raw(
            KEY,
            r#"{"schema_version":1,"profile":{"name":"Ada","timezone":"not a zone","avatar":null}}"#,
        );
        assert!(block_on(load_profile(&store, KEY)).is_err());
    }

    #[test]
    fn stored_profiles_are_normalized_and_keep_their_avatar() {
        let store = MemoryPrefsStore::default();
        store.insert_raw(
            KEY,
            r#"{"schema_version":1,"profile":{"name":" Ada ","timezone":"","avatar":"data:image/png;base64,AQ=="}}"#,
        );

        let profile = block_on(load_profile(&store, KEY))
            .expect("load")
            .expect("profile");
        assert_eq!(profile.name(), "Ada");
        assert_eq!(profile.timezone(), "UTC");
        assert_eq!(
            profile.avatar().map(AvatarRef::as_str),
            Some("data:image/png;base64,AQ==")
        );
    }

    #[test]
    fn clear_deletes_the_record() {
        let store = MemoryPrefsStore::default();
        let profile = UserProfile::new("Ada", "UTC").expect("valid");
        block_on(persist_profile(&store, KEY, &profile)).expect("persist");

        block_on(clear_profile(&store, KEY)).expect("clear");

        assert_eq!(store.raw(KEY), None);
    }
}
