//! Layered non-destructive photo-editing and export core for product
//! photography apps.
//!
//! The crate owns the editing model (per-layer adjustments, presets,
//! undo/redo history, style descriptors) and the heavy-operation machinery
//! (memory-aware scheduling, single-flight locking, the staged export
//! pipeline). Everything platform-shaped (rendering, file pickers, the
//! media library, the background-removal service) is a collaborator trait
//! in [`platform`], injected by the embedding app.

// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod presets;
pub mod platform;
pub mod queue;
pub mod export;
pub mod session;
pub mod batch;

// Public exports for external consumers
pub use crate::core::{
    generate_style, vignette_intensity, AdjustmentSettings, Effect, History, Layer, Param,
    ResetScope, SettingsPatch, VisualCrop,
};
pub use presets::{
    find_export_preset, find_preset, ExportFormat, ExportPreset, FilterPreset, EXPORT_PRESETS,
    FILTER_PRESETS,
};
pub use queue::{OperationQueue, OperationSpec, PlatformProfile, Priority, SingleFlight};
pub use export::ExportPipeline;
pub use session::{EditorSession, UserPrefs};
pub use batch::{remove_backgrounds, BatchOutcome};
pub use utils::{EditorError, EditorResult};
