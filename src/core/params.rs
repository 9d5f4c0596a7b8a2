//! Typed adjustment vocabulary.
//!
//! Each knob belongs to one of two independently adjustable planes and
//! carries a declared range. Keeping the vocabulary as enums (rather than
//! `"product_exposure"`-style string keys) gives exhaustiveness checks in
//! the style generator and the preset catalog.

use serde::{Deserialize, Serialize};

/// One of the two independently adjustable visual planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Foreground subject (the product cutout).
    Product,
    /// Backdrop behind the subject.
    Background,
}

/// A semantic adjustment parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Param {
    Exposure,
    Brightness,
    Highlights,
    Shadows,
    Contrast,
    Saturation,
    Vibrance,
    Warmth,
    Clarity,
    /// Background only. Radial-darkening intensity, rendered by the view layer.
    Vignette,
    /// Background only. Gaussian blur strength.
    Blur,
}

impl Param {
    /// Declared `[min, max]` range for this parameter.
    pub fn range(self) -> (f32, f32) {
        match self {
            Param::Vignette | Param::Blur => (0.0, 100.0),
            _ => (-100.0, 100.0),
        }
    }

    /// Whether the parameter applies to the given layer.
    ///
    /// Vignette and blur only make sense on the backdrop; the product layer
    /// silently ignores them.
    pub fn valid_for(self, layer: Layer) -> bool {
        match self {
            Param::Vignette | Param::Blur => layer == Layer::Background,
            _ => true,
        }
    }

}

/// Clamps `value` to the parameter's declared range.
///
/// Returns `None` for non-finite input, which callers must drop silently
/// (validation errors never surface past the model boundary).
pub fn clamp_param(param: Param, value: f32) -> Option<f32> {
    if !value.is_finite() {
        return None;
    }
    let (min, max) = param.range();
    Some(value.clamp(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_clamp_to_declared_range() {
        assert_eq!(clamp_param(Param::Exposure, 250.0), Some(100.0));
        assert_eq!(clamp_param(Param::Exposure, -250.0), Some(-100.0));
        assert_eq!(clamp_param(Param::Vignette, -10.0), Some(0.0));
        assert_eq!(clamp_param(Param::Blur, 130.0), Some(100.0));
        assert_eq!(clamp_param(Param::Contrast, 42.0), Some(42.0));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(clamp_param(Param::Exposure, f32::NAN), None);
        assert_eq!(clamp_param(Param::Exposure, f32::INFINITY), None);
        assert_eq!(clamp_param(Param::Blur, f32::NEG_INFINITY), None);
    }

    #[test]
    fn vignette_and_blur_are_background_only() {
        assert!(!Param::Vignette.valid_for(Layer::Product));
        assert!(!Param::Blur.valid_for(Layer::Product));
        assert!(Param::Vignette.valid_for(Layer::Background));
        assert!(Param::Exposure.valid_for(Layer::Product));
    }
}
