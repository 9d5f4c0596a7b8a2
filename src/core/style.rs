//! Style generator: semantic adjustments to primitive effect lists.
//!
//! The render layer only understands a small vocabulary of visual-filter
//! primitives (multipliers, hue rotation, blur radius). Each semantic knob
//! maps onto one or more of them with a deterministic formula. The exact
//! constants are tuned for a pleasing response, not a principled tone
//! model; the documented guarantees are direction and relative magnitude:
//!
//! - exposure sweeps brightness harder than brightness does, asymmetric
//!   (damped on the negative side, floored at 0.1)
//! - vibrance is a gentler saturation than saturation, with a tiny hue
//!   perturbation once it passes a threshold
//! - warmth is the dominant hue driver, always rotating further than
//!   vibrance at the same input
//! - highlights/shadows/clarity are tone-curve approximations built from
//!   brightness/contrast nudges since no tone-curve primitive exists
//!
//! Vignette is not expressible in this vocabulary at all; the view layers a
//! radial-darkening overlay driven by [`vignette_intensity`].

use crate::core::params::{Layer, Param};
use crate::core::settings::AdjustmentSettings;

/// A primitive visual-filter operation. The consuming view applies these
/// in list order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Brightness multiplier, 1.0 = unchanged.
    Brightness(f32),
    /// Contrast multiplier, 1.0 = unchanged.
    Contrast(f32),
    /// Saturation multiplier, 1.0 = unchanged.
    Saturate(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
    /// Gaussian blur radius in pixels.
    Blur(f32),
    /// Edge-emphasis amount, 0..=1.
    Sharpen(f32),
}

// Slopes for the two brightness-like knobs. Exposure must visibly diverge
// from brightness for the same input.
const EXPOSURE_POSITIVE_SLOPE: f32 = 1.5;
const EXPOSURE_NEGATIVE_SLOPE: f32 = 0.9;
const BRIGHTNESS_SLOPE: f32 = 0.6;
const MULTIPLIER_FLOOR: f32 = 0.1;

const VIBRANCE_SATURATION_SLOPE: f32 = 0.5;
const VIBRANCE_HUE_THRESHOLD: f32 = 20.0;
const VIBRANCE_HUE_SLOPE: f32 = 4.0;
const WARMTH_HUE_SLOPE: f32 = 24.0;
const WARMTH_SATURATION_SLOPE: f32 = 0.2;

const CLARITY_CONTRAST_SLOPE: f32 = 0.3;
const CLARITY_SATURATION_SLOPE: f32 = 0.15;
const CLARITY_SHARPEN_THRESHOLD: f32 = 50.0;
const CLARITY_SOFTEN_THRESHOLD: f32 = -50.0;
const CLARITY_SOFTEN_MAX_RADIUS: f32 = 2.0;

const BACKGROUND_BLUR_MAX_RADIUS: f32 = 20.0;

/// Derives the ordered effect list for one layer.
///
/// Pure and order-stable: identical inputs always yield an equal list, and
/// one layer's output never depends on the other layer's values. `bypass`
/// (show-original) returns the identity descriptor.
pub fn generate_style(settings: &AdjustmentSettings, layer: Layer, bypass: bool) -> Vec<Effect> {
    let mut effects = Vec::new();
    if bypass {
        return effects;
    }

    let value = |param: Param| settings.get(layer, param);

    let exposure = value(Param::Exposure);
    if exposure != 0.0 {
        let t = exposure / 100.0;
        let multiplier = if exposure > 0.0 {
            1.0 + t * EXPOSURE_POSITIVE_SLOPE
        } else {
            (1.0 + t * EXPOSURE_NEGATIVE_SLOPE).max(MULTIPLIER_FLOOR)
        };
        effects.push(Effect::Brightness(multiplier));
    }

    let brightness = value(Param::Brightness);
    if brightness != 0.0 {
        let multiplier = (1.0 + brightness / 100.0 * BRIGHTNESS_SLOPE).max(MULTIPLIER_FLOOR);
        effects.push(Effect::Brightness(multiplier));
    }

    let contrast = value(Param::Contrast);
    if contrast != 0.0 {
        effects.push(Effect::Contrast((1.0 + contrast / 100.0).max(MULTIPLIER_FLOOR)));
    }

    // Highlights: nudge both multipliers in the knob's direction.
    let highlights = value(Param::Highlights);
    if highlights != 0.0 {
        let t = highlights / 100.0;
        effects.push(Effect::Brightness((1.0 + t * 0.2).max(MULTIPLIER_FLOOR)));
        effects.push(Effect::Contrast((1.0 + t * 0.1).max(MULTIPLIER_FLOOR)));
    }

    // Shadows: lifting brightens and flattens; crushing only raises contrast.
    let shadows = value(Param::Shadows);
    if shadows > 0.0 {
        let t = shadows / 100.0;
        effects.push(Effect::Brightness(1.0 + t * 0.25));
        effects.push(Effect::Contrast((1.0 - t * 0.1).max(MULTIPLIER_FLOOR)));
    } else if shadows < 0.0 {
        effects.push(Effect::Contrast(1.0 + (-shadows / 100.0) * 0.15));
    }

    let saturation = value(Param::Saturation);
    if saturation != 0.0 {
        effects.push(Effect::Saturate((1.0 + saturation / 100.0).max(0.0)));
    }

    let vibrance = value(Param::Vibrance);
    if vibrance != 0.0 {
        let t = vibrance / 100.0;
        effects.push(Effect::Saturate((1.0 + t * VIBRANCE_SATURATION_SLOPE).max(0.0)));
        if vibrance.abs() > VIBRANCE_HUE_THRESHOLD {
            effects.push(Effect::HueRotate(t * VIBRANCE_HUE_SLOPE));
        }
    }

    let warmth = value(Param::Warmth);
    if warmth != 0.0 {
        let t = warmth / 100.0;
        // Negative rotation shifts toward orange on the render layer's wheel.
        effects.push(Effect::HueRotate(-t * WARMTH_HUE_SLOPE));
        effects.push(Effect::Saturate(1.0 + t.abs() * WARMTH_SATURATION_SLOPE));
    }

    let clarity = value(Param::Clarity);
    if clarity > 0.0 {
        let t = clarity / 100.0;
        effects.push(Effect::Contrast(1.0 + t * CLARITY_CONTRAST_SLOPE));
        effects.push(Effect::Saturate(1.0 + t * CLARITY_SATURATION_SLOPE));
        if clarity > CLARITY_SHARPEN_THRESHOLD {
            effects.push(Effect::Sharpen(
                (clarity - CLARITY_SHARPEN_THRESHOLD) / (100.0 - CLARITY_SHARPEN_THRESHOLD),
            ));
        }
    } else if clarity < 0.0 {
        let t = clarity / 100.0;
        effects.push(Effect::Contrast((1.0 + t * CLARITY_CONTRAST_SLOPE).max(MULTIPLIER_FLOOR)));
        if clarity < CLARITY_SOFTEN_THRESHOLD {
            let over = (-clarity + CLARITY_SOFTEN_THRESHOLD) / (100.0 + CLARITY_SOFTEN_THRESHOLD);
            effects.push(Effect::Blur(over * CLARITY_SOFTEN_MAX_RADIUS));
        }
    }

    if layer == Layer::Background {
        let blur = value(Param::Blur);
        if blur > 0.0 {
            effects.push(Effect::Blur(blur / 100.0 * BACKGROUND_BLUR_MAX_RADIUS));
        }
    }

    effects
}

/// Vignette intensity for the view layer's radial-darkening overlay,
/// normalized to `0..=1`. Always 0 for the product layer.
pub fn vignette_intensity(settings: &AdjustmentSettings) -> f32 {
    settings.get(Layer::Background, Param::Vignette) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::SettingsPatch;

    fn settings_with(layer: Layer, param: Param, value: f32) -> AdjustmentSettings {
        AdjustmentSettings::default().updated(&SettingsPatch::value(layer, param, value))
    }

    fn brightness_of(effects: &[Effect]) -> Option<f32> {
        effects.iter().find_map(|e| match e {
            Effect::Brightness(v) => Some(*v),
            _ => None,
        })
    }

    fn hue_of(effects: &[Effect]) -> Option<f32> {
        effects.iter().find_map(|e| match e {
            Effect::HueRotate(v) => Some(*v),
            _ => None,
        })
    }

    #[test]
    fn identical_inputs_yield_identical_lists() {
        let settings = settings_with(Layer::Product, Param::Warmth, 35.0)
            .updated(&SettingsPatch::value(Layer::Product, Param::Clarity, 70.0));
        let a = generate_style(&settings, Layer::Product, false);
        let b = generate_style(&settings, Layer::Product, false);
        assert_eq!(a, b);
    }

    #[test]
    fn bypass_returns_identity() {
        let settings = settings_with(Layer::Product, Param::Exposure, 80.0);
        assert!(generate_style(&settings, Layer::Product, true).is_empty());
    }

    #[test]
    fn other_layer_values_never_leak() {
        let settings = settings_with(Layer::Background, Param::Saturation, 90.0);
        assert!(generate_style(&settings, Layer::Product, false).is_empty());
    }

    #[test]
    fn exposure_diverges_from_brightness_at_equal_input() {
        let exposure = settings_with(Layer::Product, Param::Exposure, 50.0);
        let brightness = settings_with(Layer::Product, Param::Brightness, 50.0);
        let e = brightness_of(&generate_style(&exposure, Layer::Product, false)).unwrap();
        let b = brightness_of(&generate_style(&brightness, Layer::Product, false)).unwrap();
        assert_ne!(e, b);
        assert!((e - 1.0).abs() > (b - 1.0).abs(), "exposure must sweep wider");
    }

    #[test]
    fn negative_exposure_floors_the_multiplier() {
        let settings = settings_with(Layer::Product, Param::Exposure, -100.0);
        let m = brightness_of(&generate_style(&settings, Layer::Product, false)).unwrap();
        assert!(m >= 0.1);
    }

    #[test]
    fn warmth_dominates_vibrance_hue_rotation() {
        let warmth = settings_with(Layer::Product, Param::Warmth, 60.0);
        let vibrance = settings_with(Layer::Product, Param::Vibrance, 60.0);
        let w = hue_of(&generate_style(&warmth, Layer::Product, false)).unwrap();
        let v = hue_of(&generate_style(&vibrance, Layer::Product, false)).unwrap();
        assert!(w.abs() > v.abs());
    }

    #[test]
    fn vibrance_is_gentler_than_saturation() {
        let vibrance = settings_with(Layer::Product, Param::Vibrance, 60.0);
        let saturation = settings_with(Layer::Product, Param::Saturation, 60.0);
        let sat_of = |effects: &[Effect]| {
            effects
                .iter()
                .find_map(|e| match e {
                    Effect::Saturate(v) => Some(*v),
                    _ => None,
                })
                .unwrap()
        };
        let v = sat_of(&generate_style(&vibrance, Layer::Product, false));
        let s = sat_of(&generate_style(&saturation, Layer::Product, false));
        assert!(v < s);
    }

    #[test]
    fn vibrance_hue_perturbation_needs_the_threshold() {
        let below = settings_with(Layer::Product, Param::Vibrance, 15.0);
        assert!(hue_of(&generate_style(&below, Layer::Product, false)).is_none());
        let above = settings_with(Layer::Product, Param::Vibrance, 40.0);
        assert!(hue_of(&generate_style(&above, Layer::Product, false)).is_some());
    }

    #[test]
    fn positive_shadows_lift_brightness_and_flatten_contrast() {
        let settings = settings_with(Layer::Product, Param::Shadows, 50.0);
        let effects = generate_style(&settings, Layer::Product, false);
        assert!(brightness_of(&effects).unwrap() > 1.0);
        let contrast = effects
            .iter()
            .find_map(|e| match e {
                Effect::Contrast(v) => Some(*v),
                _ => None,
            })
            .unwrap();
        assert!(contrast < 1.0);
    }

    #[test]
    fn negative_shadows_raise_contrast_without_brightness() {
        let settings = settings_with(Layer::Product, Param::Shadows, -50.0);
        let effects = generate_style(&settings, Layer::Product, false);
        assert!(brightness_of(&effects).is_none());
        assert!(matches!(effects[0], Effect::Contrast(v) if v > 1.0));
    }

    #[test]
    fn clarity_never_alters_brightness() {
        for v in [-90.0, -30.0, 30.0, 90.0] {
            let settings = settings_with(Layer::Product, Param::Clarity, v);
            let effects = generate_style(&settings, Layer::Product, false);
            assert!(brightness_of(&effects).is_none(), "clarity {v} produced brightness");
        }
    }

    #[test]
    fn deep_negative_clarity_softens_with_blur() {
        let settings = settings_with(Layer::Product, Param::Clarity, -80.0);
        let effects = generate_style(&settings, Layer::Product, false);
        assert!(effects.iter().any(|e| matches!(e, Effect::Blur(r) if *r > 0.0)));
    }

    #[test]
    fn strong_clarity_adds_sharpen() {
        let settings = settings_with(Layer::Product, Param::Clarity, 75.0);
        let effects = generate_style(&settings, Layer::Product, false);
        assert!(effects.iter().any(|e| matches!(e, Effect::Sharpen(_))));
    }

    #[test]
    fn background_blur_maps_to_bounded_radius() {
        let settings = settings_with(Layer::Background, Param::Blur, 100.0);
        let effects = generate_style(&settings, Layer::Background, false);
        assert!(effects.iter().any(|e| matches!(e, Effect::Blur(r) if *r == 20.0)));
    }

    #[test]
    fn vignette_is_an_overlay_not_an_effect() {
        let settings = settings_with(Layer::Background, Param::Vignette, 80.0);
        let effects = generate_style(&settings, Layer::Background, false);
        assert!(effects.is_empty());
        assert!((vignette_intensity(&settings) - 0.8).abs() < 1e-6);
    }
}
