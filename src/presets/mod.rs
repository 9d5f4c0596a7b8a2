mod filters;
mod export;

pub use filters::{find_preset, FilterPreset, FILTER_PRESETS};
pub use export::{find_export_preset, ExportFormat, ExportPreset, EXPORT_PRESETS};
