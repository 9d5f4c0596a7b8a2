//! Filter-preset catalog.
//!
//! A preset is an absolute value bundle: applying one resets every knob in
//! its scope to zero first, then merges its declared values. The catalog is
//! read-only; user-defined presets live in [`crate::session::UserPrefs`].

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use crate::core::{Layer, Param};

/// A named, immutable bundle of adjustment values for one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    /// Stable lookup key, e.g. `"studio"`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// The layer whose knobs this preset owns. Applying the preset zeroes
    /// this whole layer before merging.
    pub scope: Layer,
    pub values: Vec<(Param, f32)>,
}

impl FilterPreset {
    fn new(key: &str, name: &str, scope: Layer, values: &[(Param, f32)]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            scope,
            values: values.to_vec(),
        }
    }
}

lazy_static! {
    /// Built-in looks tuned for product photography.
    pub static ref FILTER_PRESETS: Vec<FilterPreset> = vec![
        FilterPreset::new("studio", "Studio", Layer::Product, &[
            (Param::Exposure, 8.0),
            (Param::Contrast, 12.0),
            (Param::Clarity, 20.0),
        ]),
        FilterPreset::new("bright", "Bright & Airy", Layer::Product, &[
            (Param::Exposure, 22.0),
            (Param::Shadows, 30.0),
            (Param::Contrast, -10.0),
            (Param::Vibrance, 12.0),
        ]),
        FilterPreset::new("warm", "Warm", Layer::Product, &[
            (Param::Warmth, 35.0),
            (Param::Brightness, 8.0),
            (Param::Vibrance, 10.0),
        ]),
        FilterPreset::new("cool", "Cool", Layer::Product, &[
            (Param::Warmth, -30.0),
            (Param::Contrast, 8.0),
        ]),
        FilterPreset::new("vivid", "Vivid", Layer::Product, &[
            (Param::Saturation, 28.0),
            (Param::Contrast, 18.0),
            (Param::Clarity, 30.0),
        ]),
        FilterPreset::new("matte", "Matte", Layer::Product, &[
            (Param::Contrast, -22.0),
            (Param::Shadows, 18.0),
            (Param::Saturation, -12.0),
        ]),
        FilterPreset::new("mono", "Monochrome", Layer::Product, &[
            (Param::Saturation, -100.0),
            (Param::Contrast, 15.0),
        ]),
        FilterPreset::new("backdrop-soft", "Soft Backdrop", Layer::Background, &[
            (Param::Blur, 35.0),
            (Param::Brightness, 6.0),
            (Param::Vignette, 20.0),
        ]),
        FilterPreset::new("backdrop-focus", "Focus Backdrop", Layer::Background, &[
            (Param::Blur, 60.0),
            (Param::Vignette, 45.0),
            (Param::Saturation, -15.0),
        ]),
    ];
}

/// Looks up a preset by key.
pub fn find_preset(key: &str) -> Option<&'static FilterPreset> {
    FILTER_PRESETS.iter().find(|p| p.key == key)
}
