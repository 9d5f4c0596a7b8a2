//! Editing-session façade.
//!
//! Ties the adjustment model, history and preset catalog together for one
//! open photo. The view layer drives it: live `update` calls during a drag,
//! a `commit` on release, preset/crop applies, undo/redo, and an explicit
//! (or auto) save through the repository collaborator.

mod prefs;

pub use prefs::UserPrefs;

use std::sync::Arc;
use tracing::{debug, warn};
use crate::core::{
    generate_style, vignette_intensity, AdjustmentSettings, Effect, History, Layer, ResetScope,
    SettingsPatch, VisualCrop,
};
use crate::platform::{AssetResolver, Background, BackgroundKind, Notifier, PhotoRepository, Severity};
use crate::presets::find_preset;
use crate::utils::EditorResult;

/// One photo's editing session.
///
/// Single-writer: only the active session mutates its settings. The
/// history is only touched through commit/undo/redo.
pub struct EditorSession {
    photo_id: String,
    settings: AdjustmentSettings,
    history: History,
    repository: Arc<dyn PhotoRepository>,
    assets: Arc<dyn AssetResolver>,
    notifier: Arc<dyn Notifier>,
    auto_save: bool,
}

impl EditorSession {
    /// Opens a session for `photo_id`, seeding settings from the photo's
    /// saved state (or defaults for a never-edited photo).
    pub async fn open(
        photo_id: &str,
        repository: Arc<dyn PhotoRepository>,
        assets: Arc<dyn AssetResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> EditorResult<Self> {
        let photo = repository.fetch_photo_by_id(photo_id).await?;
        let settings = photo.settings.unwrap_or_default();
        debug!("Opened session for photo '{}'", photo_id);
        Ok(Self {
            photo_id: photo_id.to_string(),
            history: History::new(settings.clone()),
            settings,
            repository,
            assets,
            notifier,
            auto_save: false,
        })
    }

    pub fn settings(&self) -> &AdjustmentSettings {
        &self.settings
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.auto_save = enabled;
    }

    /// Live update without a history snapshot. Used for every intermediate
    /// slider value during a drag.
    pub fn update(&mut self, patch: &SettingsPatch) {
        self.settings = self.settings.updated(patch);
    }

    /// Commit boundary (slider release, preset apply, crop apply).
    ///
    /// Snapshots the live settings into history; identical consecutive
    /// snapshots are dropped. Saves to the repository when auto-save is on
    /// and the snapshot was new. Returns whether a snapshot was added.
    pub async fn commit(&mut self) -> EditorResult<bool> {
        let added = self.history.commit(&self.settings);
        if added && self.auto_save {
            self.save().await?;
        }
        Ok(added)
    }

    /// Applies a named preset atomically: zero the preset's whole layer
    /// scope, merge its values, then take exactly one history snapshot.
    ///
    /// An unknown key is a loud no-op, never an error.
    pub async fn apply_preset(&mut self, key: &str) -> EditorResult<bool> {
        let Some(preset) = find_preset(key) else {
            warn!("Unknown filter preset '{}'", key);
            self.notifier
                .notify(Severity::Warning, &format!("Unknown preset '{}'", key));
            return Ok(false);
        };
        let patch = SettingsPatch {
            values: preset
                .values
                .iter()
                .map(|&(param, value)| (preset.scope, param, value))
                .collect(),
            ..SettingsPatch::default()
        };
        self.settings = self
            .settings
            .reset(ResetScope::Layer(preset.scope))
            .updated(&patch);
        self.commit().await?;
        Ok(true)
    }

    /// Resets the given scope to defaults and commits.
    pub async fn reset(&mut self, scope: ResetScope) -> EditorResult<()> {
        self.settings = self.settings.reset(scope);
        self.commit().await?;
        Ok(())
    }

    /// Restores the previous snapshot; no-op at the beginning.
    pub fn undo(&mut self) -> &AdjustmentSettings {
        self.settings = self.history.undo().clone();
        &self.settings
    }

    /// Re-applies the next snapshot; no-op at the end.
    pub fn redo(&mut self) -> &AdjustmentSettings {
        self.settings = self.history.redo().clone();
        &self.settings
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Lists the backdrops available for [`Self::choose_background`].
    pub async fn backgrounds(&self) -> EditorResult<Vec<Background>> {
        self.repository.fetch_backgrounds().await
    }

    /// Selects a backdrop, resolving asset-backed ones first so a missing
    /// download surfaces before the reference is committed.
    pub async fn choose_background(&mut self, background: &Background) -> EditorResult<()> {
        if let BackgroundKind::Asset(asset_id) = &background.kind {
            self.assets.resolve(asset_id).await?;
        }
        self.update(&SettingsPatch {
            background_id: Some(Some(background.id.clone())),
            ..SettingsPatch::default()
        });
        self.commit().await?;
        Ok(())
    }

    /// Live crop update; call [`Self::commit`] on apply.
    pub fn set_crop(&mut self, crop: Option<VisualCrop>) {
        self.update(&SettingsPatch {
            visual_crop: Some(crop),
            ..SettingsPatch::default()
        });
    }

    /// Persists the live settings to the photo record. Explicit: never
    /// implied by `update`.
    pub async fn save(&self) -> EditorResult<()> {
        self.repository
            .save_photo_settings(&self.photo_id, &self.settings)
            .await
    }

    /// Render descriptor for one layer.
    pub fn style(&self, layer: Layer, bypass: bool) -> Vec<Effect> {
        generate_style(&self.settings, layer, bypass)
    }

    /// Intensity for the view layer's vignette overlay.
    pub fn vignette(&self) -> f32 {
        vignette_intensity(&self.settings)
    }
}
