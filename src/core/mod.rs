//! Core editing model.
//!
//! The fundamental types of an editing session:
//! - [`AdjustmentSettings`]: per-layer knobs, transform and crop
//! - [`Layer`]/[`Param`]: the typed adjustment vocabulary
//! - [`History`]: undo/redo snapshot ring
//! - [`Effect`]/[`generate_style`]: the render descriptor derivation

mod params;
mod settings;
mod history;
mod style;

pub use params::{clamp_param, Layer, Param};
pub use settings::{
    AdjustmentSettings, BackgroundAdjustments, CropRect, LayerAdjustments, ResetScope,
    SettingsPatch, VisualCrop,
};
pub use history::{History, HistoryEntry};
pub use style::{generate_style, vignette_intensity, Effect};
