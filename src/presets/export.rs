//! Export-preset catalog.
//!
//! Each preset fixes the target dimensions, container format and compression
//! quality of a delivered asset. The catalog is read-only except for ad-hoc
//! custom sizes synthesized from user input.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use crate::utils::{EditorError, EditorResult};

/// Delivered container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Jpg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpg => "jpg",
            ExportFormat::Png => "png",
        }
    }
}

/// Target dimensions, format and quality for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPreset {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    /// Compression quality in `(0, 1]`. The pipeline raises this to at
    /// least 0.98 at the final stage.
    pub quality: f32,
    pub category: String,
    pub icon: String,
}

impl ExportPreset {
    fn new(
        id: &str,
        name: &str,
        width: u32,
        height: u32,
        format: ExportFormat,
        quality: f32,
        category: &str,
        icon: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            width,
            height,
            format,
            quality,
            category: category.to_string(),
            icon: icon.to_string(),
        }
    }

    /// Synthesizes an ad-hoc preset from user-entered dimensions.
    pub fn custom(width: u32, height: u32, format: ExportFormat) -> EditorResult<Self> {
        if width == 0 || height == 0 {
            return Err(EditorError::validation(format!(
                "Custom export size must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self::new(
            &format!("custom-{}x{}", width, height),
            "Custom Size",
            width,
            height,
            format,
            0.95,
            "custom",
            "resize",
        ))
    }

    /// Long edge in pixels.
    pub fn long_edge(&self) -> u32 {
        self.width.max(self.height)
    }
}

lazy_static! {
    /// Built-in delivery targets.
    pub static ref EXPORT_PRESETS: Vec<ExportPreset> = vec![
        ExportPreset::new("ig-square", "Instagram Post", 1080, 1080, ExportFormat::Jpg, 0.9, "social", "instagram"),
        ExportPreset::new("ig-story", "Instagram Story", 1080, 1920, ExportFormat::Jpg, 0.9, "social", "instagram"),
        ExportPreset::new("marketplace", "Marketplace Listing", 2000, 2000, ExportFormat::Jpg, 0.92, "commerce", "storefront"),
        ExportPreset::new("web-hero", "Web Hero", 1920, 1080, ExportFormat::Jpg, 0.88, "web", "globe"),
        ExportPreset::new("web-thumb", "Web Thumbnail", 512, 512, ExportFormat::Jpg, 0.85, "web", "image"),
        ExportPreset::new("print", "Print", 3000, 3000, ExportFormat::Png, 1.0, "print", "printer"),
        ExportPreset::new("transparent", "Transparent PNG", 2048, 2048, ExportFormat::Png, 1.0, "commerce", "layers"),
    ];
}

/// Looks up an export preset by id.
pub fn find_export_preset(id: &str) -> Option<&'static ExportPreset> {
    EXPORT_PRESETS.iter().find(|p| p.id == id)
}
