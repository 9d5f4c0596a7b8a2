//! Persisted user preferences.
//!
//! Only an explicitly whitelisted subset of session state survives the app:
//! the auto-save toggle and user-defined presets. Transient editing state
//! (live settings, history) never goes through here.

use serde::{Deserialize, Serialize};
use crate::platform::KeyValueStore;
use crate::presets::FilterPreset;
use crate::utils::{EditorError, EditorResult};

const PREFS_KEY: &str = "studioshot.prefs";

/// The whitelisted persistence subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPrefs {
    pub auto_save: bool,
    pub custom_presets: Vec<FilterPreset>,
}

impl UserPrefs {
    /// Loads preferences, defaulting when nothing was stored yet.
    pub async fn load(store: &dyn KeyValueStore) -> EditorResult<Self> {
        match store.get(PREFS_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| EditorError::io(format!("Failed to parse stored prefs: {}", e))),
            None => Ok(Self::default()),
        }
    }

    pub async fn save(&self, store: &dyn KeyValueStore) -> EditorResult<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| EditorError::io(format!("Failed to serialize prefs: {}", e)))?;
        store.set(PREFS_KEY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use crate::core::{Layer, Param};

    #[derive(Default)]
    struct MemoryStore(Mutex<HashMap<String, String>>);

    impl KeyValueStore for MemoryStore {
        fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, EditorResult<Option<String>>> {
            let value = self.0.lock().unwrap().get(key).cloned();
            async move { Ok(value) }.boxed()
        }

        fn set<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, EditorResult<()>> {
            self.0.lock().unwrap().insert(key.to_string(), value.to_string());
            async { Ok(()) }.boxed()
        }
    }

    #[tokio::test]
    async fn missing_key_loads_defaults() {
        let store = MemoryStore::default();
        let prefs = UserPrefs::load(&store).await.unwrap();
        assert_eq!(prefs, UserPrefs::default());
    }

    #[tokio::test]
    async fn round_trips_through_the_store() {
        let store = MemoryStore::default();
        let prefs = UserPrefs {
            auto_save: true,
            custom_presets: vec![FilterPreset {
                key: "my-look".into(),
                name: "My Look".into(),
                scope: Layer::Product,
                values: vec![(Param::Warmth, 18.0), (Param::Clarity, 25.0)],
            }],
        };
        prefs.save(&store).await.unwrap();
        let restored = UserPrefs::load(&store).await.unwrap();
        assert_eq!(restored, prefs);
    }

    #[tokio::test]
    async fn corrupt_payload_surfaces_as_io_error() {
        let store = MemoryStore::default();
        store.0.lock().unwrap().insert(PREFS_KEY.into(), "{not json".into());
        assert!(matches!(UserPrefs::load(&store).await, Err(EditorError::Io(_))));
    }
}
