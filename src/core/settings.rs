//! The adjustment model: per-layer knobs, transform, crop and backdrop.
//!
//! This is the central value object of an editing session. It is mutated
//! with replace-whole-object semantics (`updated` returns a new state) so
//! history snapshots are cheap clones. Persistence is a separate explicit
//! save call; rapid slider drags must not imply writes.

use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::core::params::{clamp_param, Layer, Param};

/// Knobs shared by both layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerAdjustments {
    pub exposure: f32,
    pub brightness: f32,
    pub highlights: f32,
    pub shadows: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub vibrance: f32,
    pub warmth: f32,
    pub clarity: f32,
}

/// Backdrop knobs: the shared set plus the background-only effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundAdjustments {
    #[serde(flatten)]
    pub base: LayerAdjustments,
    pub vignette: f32,
    pub blur: f32,
}

/// Aspect-ratio tag plus a normalized crop rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualCrop {
    /// Aspect tag such as `"1:1"` or `"4:5"`; free-form, owned by the view.
    pub aspect: String,
    pub rect: CropRect,
}

/// Normalized rectangle, every coordinate in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
            width: self.width.clamp(0.0, 1.0),
            height: self.height.clamp(0.0, 1.0),
        }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

fn default_scale() -> f32 {
    1.0
}

fn default_position() -> f32 {
    0.5
}

/// All state of an editing session's image: per-layer adjustments, the
/// chosen backdrop, the product-layer transform and an optional crop.
///
/// Missing keys deserialize to defaults and unknown keys are ignored, so
/// settings saved by older app versions load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdjustmentSettings {
    pub product: LayerAdjustments,
    pub background: BackgroundAdjustments,
    /// Reference to a background asset or color; the asset itself is owned
    /// by the repository collaborator.
    pub background_id: Option<String>,
    /// Normalized product-layer position, `[0, 1]` on both axes.
    #[serde(default = "default_position")]
    pub photo_x: f32,
    #[serde(default = "default_position")]
    pub photo_y: f32,
    /// Product-layer scale, `[0.1, 5]`.
    #[serde(default = "default_scale")]
    pub photo_scale: f32,
    /// Rotation in degrees. Finite-checked but unbounded.
    pub photo_rotation: f32,
    pub visual_crop: Option<VisualCrop>,
}

impl Default for AdjustmentSettings {
    fn default() -> Self {
        Self {
            product: LayerAdjustments::default(),
            background: BackgroundAdjustments::default(),
            background_id: None,
            photo_x: default_position(),
            photo_y: default_position(),
            photo_scale: default_scale(),
            photo_rotation: 0.0,
            visual_crop: None,
        }
    }
}

/// Scope selector for [`AdjustmentSettings::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Everything back to defaults.
    All,
    /// One layer's knobs only.
    Layer(Layer),
    /// Position, scale and rotation.
    Transform,
    /// The crop rectangle.
    Crop,
}

/// Partial update merged over the current state by [`AdjustmentSettings::updated`].
///
/// `Option<Option<..>>` fields distinguish "leave unchanged" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub values: Vec<(Layer, Param, f32)>,
    pub background_id: Option<Option<String>>,
    pub photo_x: Option<f32>,
    pub photo_y: Option<f32>,
    pub photo_scale: Option<f32>,
    pub photo_rotation: Option<f32>,
    pub visual_crop: Option<Option<VisualCrop>>,
}

impl SettingsPatch {
    /// Patch setting a single adjustment value.
    pub fn value(layer: Layer, param: Param, value: f32) -> Self {
        Self {
            values: vec![(layer, param, value)],
            ..Self::default()
        }
    }
}

impl AdjustmentSettings {
    /// Reads one adjustment value. Background-only params read as 0 on the
    /// product layer.
    pub fn get(&self, layer: Layer, param: Param) -> f32 {
        let base = match layer {
            Layer::Product => &self.product,
            Layer::Background => &self.background.base,
        };
        match param {
            Param::Exposure => base.exposure,
            Param::Brightness => base.brightness,
            Param::Highlights => base.highlights,
            Param::Shadows => base.shadows,
            Param::Contrast => base.contrast,
            Param::Saturation => base.saturation,
            Param::Vibrance => base.vibrance,
            Param::Warmth => base.warmth,
            Param::Clarity => base.clarity,
            Param::Vignette => match layer {
                Layer::Background => self.background.vignette,
                Layer::Product => 0.0,
            },
            Param::Blur => match layer {
                Layer::Background => self.background.blur,
                Layer::Product => 0.0,
            },
        }
    }

    fn set_clamped(&mut self, layer: Layer, param: Param, value: f32) {
        if !param.valid_for(layer) {
            warn!("Dropping {:?} for {:?} layer (background-only parameter)", param, layer);
            return;
        }
        let Some(value) = clamp_param(param, value) else {
            warn!("Dropping non-finite value for {:?}/{:?}", layer, param);
            return;
        };
        let base = match layer {
            Layer::Product => &mut self.product,
            Layer::Background => &mut self.background.base,
        };
        match param {
            Param::Exposure => base.exposure = value,
            Param::Brightness => base.brightness = value,
            Param::Highlights => base.highlights = value,
            Param::Shadows => base.shadows = value,
            Param::Contrast => base.contrast = value,
            Param::Saturation => base.saturation = value,
            Param::Vibrance => base.vibrance = value,
            Param::Warmth => base.warmth = value,
            Param::Clarity => base.clarity = value,
            Param::Vignette => self.background.vignette = value,
            Param::Blur => self.background.blur = value,
        }
    }

    /// Merges a patch over the current state, returning the new state.
    ///
    /// Every numeric value is clamped to its declared range before merging;
    /// non-finite values (and background-only params aimed at the product
    /// layer) are dropped with a log line, never an error.
    pub fn updated(&self, patch: &SettingsPatch) -> Self {
        let mut next = self.clone();
        for &(layer, param, value) in &patch.values {
            next.set_clamped(layer, param, value);
        }
        if let Some(background_id) = &patch.background_id {
            next.background_id = background_id.clone();
        }
        if let Some(x) = patch.photo_x {
            if x.is_finite() {
                next.photo_x = x.clamp(0.0, 1.0);
            } else {
                warn!("Dropping non-finite photoX");
            }
        }
        if let Some(y) = patch.photo_y {
            if y.is_finite() {
                next.photo_y = y.clamp(0.0, 1.0);
            } else {
                warn!("Dropping non-finite photoY");
            }
        }
        if let Some(scale) = patch.photo_scale {
            if scale.is_finite() {
                next.photo_scale = scale.clamp(0.1, 5.0);
            } else {
                warn!("Dropping non-finite photoScale");
            }
        }
        if let Some(rotation) = patch.photo_rotation {
            if rotation.is_finite() {
                next.photo_rotation = rotation;
            } else {
                warn!("Dropping non-finite photoRotation");
            }
        }
        if let Some(crop) = &patch.visual_crop {
            match crop {
                Some(crop) if !crop.rect.is_finite() => warn!("Dropping non-finite crop rect"),
                Some(crop) => {
                    next.visual_crop = Some(VisualCrop {
                        aspect: crop.aspect.clone(),
                        rect: crop.rect.clamped(),
                    });
                }
                None => next.visual_crop = None,
            }
        }
        next
    }

    /// Restores the selected scope to defaults, returning the new state.
    pub fn reset(&self, scope: ResetScope) -> Self {
        let mut next = self.clone();
        match scope {
            ResetScope::All => next = Self::default(),
            ResetScope::Layer(Layer::Product) => next.product = LayerAdjustments::default(),
            ResetScope::Layer(Layer::Background) => {
                next.background = BackgroundAdjustments::default();
            }
            ResetScope::Transform => {
                next.photo_x = default_position();
                next.photo_y = default_position();
                next.photo_scale = default_scale();
                next.photo_rotation = 0.0;
            }
            ResetScope::Crop => next.visual_crop = None,
        }
        next
    }

    /// Whether every field is at its default (an unedited photo).
    pub fn is_unedited(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_clamps_out_of_range_values() {
        let settings = AdjustmentSettings::default();
        let next = settings.updated(&SettingsPatch::value(Layer::Product, Param::Exposure, 250.0));
        assert_eq!(next.get(Layer::Product, Param::Exposure), 100.0);

        let next = next.updated(&SettingsPatch::value(Layer::Background, Param::Blur, -5.0));
        assert_eq!(next.get(Layer::Background, Param::Blur), 0.0);
    }

    #[test]
    fn non_finite_values_leave_existing_value_unchanged() {
        let settings = AdjustmentSettings::default()
            .updated(&SettingsPatch::value(Layer::Product, Param::Contrast, 30.0));
        let next = settings.updated(&SettingsPatch::value(Layer::Product, Param::Contrast, f32::NAN));
        assert_eq!(next.get(Layer::Product, Param::Contrast), 30.0);
        assert_eq!(next, settings);
    }

    #[test]
    fn background_only_params_are_dropped_on_product_layer() {
        let settings = AdjustmentSettings::default();
        let next = settings.updated(&SettingsPatch::value(Layer::Product, Param::Blur, 50.0));
        assert_eq!(next, settings);
        assert_eq!(next.get(Layer::Product, Param::Blur), 0.0);
    }

    #[test]
    fn transform_fields_clamp_to_their_ranges() {
        let settings = AdjustmentSettings::default();
        let patch = SettingsPatch {
            photo_x: Some(2.0),
            photo_y: Some(-1.0),
            photo_scale: Some(9.0),
            photo_rotation: Some(540.0),
            ..SettingsPatch::default()
        };
        let next = settings.updated(&patch);
        assert_eq!(next.photo_x, 1.0);
        assert_eq!(next.photo_y, 0.0);
        assert_eq!(next.photo_scale, 5.0);
        assert_eq!(next.photo_rotation, 540.0);
    }

    #[test]
    fn reset_layer_scope_leaves_other_layer_untouched() {
        let settings = AdjustmentSettings::default()
            .updated(&SettingsPatch::value(Layer::Product, Param::Warmth, 40.0))
            .updated(&SettingsPatch::value(Layer::Background, Param::Vignette, 60.0));

        let next = settings.reset(ResetScope::Layer(Layer::Background));
        assert_eq!(next.get(Layer::Background, Param::Vignette), 0.0);
        assert_eq!(next.get(Layer::Product, Param::Warmth), 40.0);
    }

    #[test]
    fn defaults_and_serde_round_trip() {
        let settings = AdjustmentSettings::default();
        assert!(settings.is_unedited());
        assert_eq!(settings.photo_scale, 1.0);
        assert_eq!(settings.photo_x, 0.5);

        let edited = settings.updated(&SettingsPatch {
            values: vec![(Layer::Product, Param::Exposure, 25.0)],
            background_id: Some(Some("bg-studio-white".into())),
            visual_crop: Some(Some(VisualCrop {
                aspect: "1:1".into(),
                rect: CropRect { x: 0.1, y: 0.1, width: 0.8, height: 0.8 },
            })),
            ..SettingsPatch::default()
        });
        let json = serde_json::to_string(&edited).unwrap();
        let restored: AdjustmentSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(edited, restored);
        assert!(!restored.is_unedited());
    }

    #[test]
    fn unknown_keys_are_ignored_and_missing_keys_default() {
        let restored: AdjustmentSettings =
            serde_json::from_str(r#"{"photoScale": 2.0, "someFutureField": true}"#).unwrap();
        assert_eq!(restored.photo_scale, 2.0);
        assert_eq!(restored.photo_x, 0.5);
        assert_eq!(restored.get(Layer::Product, Param::Exposure), 0.0);
    }
}
