//! Collaborator interfaces at the crate boundary.
//!
//! The core never touches a UI tree, the network or the media library
//! directly; it talks to these capability traits, injected explicitly at
//! construction (no process-wide singletons). Async seams return
//! [`BoxFuture`] so the traits stay object-safe and mockable.

use std::path::{Path, PathBuf};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use crate::core::AdjustmentSettings;
use crate::presets::ExportFormat;
use crate::utils::EditorResult;

/// A photo record owned by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    /// URI of the source image (local path or remote reference).
    pub uri: String,
    /// Saved per-photo settings, absent for a never-edited photo.
    pub settings: Option<AdjustmentSettings>,
}

/// A selectable backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    pub id: String,
    pub name: String,
    pub kind: BackgroundKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum BackgroundKind {
    /// Solid color, CSS-style hex string.
    Color(String),
    /// Bundled or downloadable image asset id.
    Asset(String),
}

/// Where a finished export goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOption {
    /// Persist to the user's media library.
    SaveToLibrary,
    /// Hand to the system share surface.
    Share,
}

/// Parameters for one capture of the composited preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRequest {
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    /// Capture quality in `(0, 1]`; the export pipeline always captures at 1.0.
    pub quality: f32,
}

/// Photo and background persistence.
///
/// Network failures surface as [`crate::EditorError::Io`]; the core adds no
/// retry of its own (the caller decides).
pub trait PhotoRepository: Send + Sync {
    fn fetch_photo_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, EditorResult<Photo>>;
    fn save_photo_settings<'a>(
        &'a self,
        id: &'a str,
        settings: &'a AdjustmentSettings,
    ) -> BoxFuture<'a, EditorResult<()>>;
    fn fetch_backgrounds(&self) -> BoxFuture<'_, EditorResult<Vec<Background>>>;
}

/// Capability interface over the live composited preview.
///
/// Implemented by the view layer; fails while the surface is not mounted or
/// laid out, which the export pipeline bridges with bounded readiness
/// polling.
pub trait SurfaceCapture: Send + Sync {
    /// Rasterizes the surface at the requested resolution into a new file
    /// and returns its path. The caller owns (and deletes) the file.
    fn capture(&self, request: CaptureRequest) -> BoxFuture<'_, EditorResult<PathBuf>>;
}

/// Image resize/compress collaborator.
pub trait ImageResizer: Send + Sync {
    /// Produces a new image file at the target dimensions/format/quality.
    /// The source file is left untouched; the caller owns both files.
    fn resize<'a>(
        &'a self,
        source: &'a Path,
        width: u32,
        height: u32,
        format: ExportFormat,
        quality: f32,
    ) -> BoxFuture<'a, EditorResult<PathBuf>>;
}

/// Media-library persistence. May fail with `PermissionDenied`.
pub trait MediaLibrary: Send + Sync {
    fn save_to_gallery<'a>(
        &'a self,
        path: &'a Path,
        filename: &'a str,
    ) -> BoxFuture<'a, EditorResult<()>>;
}

/// System share surface. May fail with `PermissionDenied`.
pub trait ShareSheet: Send + Sync {
    fn share<'a>(&'a self, path: &'a Path, filename: &'a str) -> BoxFuture<'a, EditorResult<()>>;
}

/// Resolves a bundled-asset reference to a local file, downloading if
/// necessary. Downloads carry their own timeout and surface `Timeout`.
pub trait AssetResolver: Send + Sync {
    fn resolve<'a>(&'a self, asset_id: &'a str) -> BoxFuture<'a, EditorResult<PathBuf>>;
}

/// Network-backed background-removal service.
pub trait BackgroundRemover: Send + Sync {
    /// Returns the path of the cut-out product image for `photo_id`.
    fn remove_background<'a>(&'a self, photo_id: &'a str) -> BoxFuture<'a, EditorResult<PathBuf>>;
}

/// User-notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// User-visible notification sink, injected in place of the source app's
/// global toast/dialog services. The core only reports; rendering is the
/// implementer's concern.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// In-memory image-cache collaborator, invoked by queue cleanup passes.
pub trait CacheClearer: Send + Sync {
    /// `aggressive` is the emergency variant: drop everything, not just
    /// expired entries.
    fn clear(&self, aggressive: bool);
}

/// Minimal key-value persistence for the whitelisted preference subset.
pub trait KeyValueStore: Send + Sync {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, EditorResult<Option<String>>>;
    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, EditorResult<()>>;
}
