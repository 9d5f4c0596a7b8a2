//! Multi-stage high-quality export.
//!
//! A single large-ratio downscale from the captured surface aliases badly,
//! so delivery goes through three stages: an ultra-high-resolution lossless
//! capture, a lossless intermediate at 1.5x the target, and the exact-size
//! compressed final. Every stage deletes the artifact it consumed, on both
//! success and failure paths, and the whole run is guarded by the
//! single-flight "export" key plus a high-priority queue slot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::platform::{CaptureRequest, ImageResizer, MediaLibrary, ShareOption, ShareSheet, SurfaceCapture};
use crate::presets::{ExportFormat, ExportPreset};
use crate::queue::{OperationQueue, OperationSpec, Priority, SingleFlight};
use crate::utils::{await_ready, timestamp_ms, EditorResult};

/// Minimum long edge of the stage-1 capture.
const ULTRA_MIN_LONG_EDGE: u32 = 4096;
/// Intermediate stage size as a multiple of the target.
const INTERMEDIATE_FACTOR: f32 = 1.5;
/// Floor for the final-stage compression quality.
const FINAL_QUALITY_FLOOR: f32 = 0.98;

/// Trial micro-capture edge used to probe surface readiness.
const PROBE_EDGE: u32 = 16;
const READY_MAX_ATTEMPTS: u32 = 10;
const READY_INTERVAL: Duration = Duration::from_millis(250);

/// Overall budget for one export run.
const EXPORT_TIMEOUT_MS: u64 = 120_000;

/// Drives capture -> downscale -> compress -> deliver for one preset.
///
/// Collaborators are injected; the pipeline owns no rendering technology
/// of its own.
#[derive(Clone)]
pub struct ExportPipeline {
    surface: Arc<dyn SurfaceCapture>,
    resizer: Arc<dyn ImageResizer>,
    library: Arc<dyn MediaLibrary>,
    share_sheet: Arc<dyn ShareSheet>,
    queue: OperationQueue,
    export_lock: Arc<SingleFlight<()>>,
}

impl ExportPipeline {
    pub fn new(
        surface: Arc<dyn SurfaceCapture>,
        resizer: Arc<dyn ImageResizer>,
        library: Arc<dyn MediaLibrary>,
        share_sheet: Arc<dyn ShareSheet>,
        queue: OperationQueue,
    ) -> Self {
        Self {
            surface,
            resizer,
            library,
            share_sheet,
            queue,
            export_lock: Arc::new(SingleFlight::new()),
        }
    }

    /// Exports the current composited preview per `preset` and delivers it
    /// per `share_option`.
    ///
    /// Concurrent callers join the in-flight export rather than starting a
    /// second one; the run itself executes as a high-priority queue
    /// operation with a dimension-derived memory estimate.
    pub async fn export(&self, preset: &ExportPreset, share_option: ShareOption) -> EditorResult<()> {
        let preset = preset.clone();
        let surface = Arc::clone(&self.surface);
        let resizer = Arc::clone(&self.resizer);
        let library = Arc::clone(&self.library);
        let share_sheet = Arc::clone(&self.share_sheet);
        let queue = self.queue.clone();

        self.export_lock
            .run("export", move || async move {
                let spec = OperationSpec::new(
                    format!("export:{}", preset.id),
                    Priority::High,
                    export_memory_estimate_mb(&preset),
                    EXPORT_TIMEOUT_MS,
                );
                queue
                    .run(spec, run_stages(surface, resizer, library, share_sheet, preset, share_option))
                    .await
            })
            .await
    }
}

/// Stage-1 capture dimensions: at least [`ULTRA_MIN_LONG_EDGE`] on the long
/// edge, or 2x the target, whichever is larger, keeping the target aspect.
fn ultra_dimensions(preset: &ExportPreset) -> (u32, u32) {
    let long = preset.long_edge();
    let ultra_long = ULTRA_MIN_LONG_EDGE.max(long * 2);
    let scale = ultra_long as f32 / long as f32;
    (
        (preset.width as f32 * scale).round() as u32,
        (preset.height as f32 * scale).round() as u32,
    )
}

fn intermediate_dimensions(preset: &ExportPreset) -> (u32, u32) {
    (
        (preset.width as f32 * INTERMEDIATE_FACTOR).round() as u32,
        (preset.height as f32 * INTERMEDIATE_FACTOR).round() as u32,
    )
}

/// Peak-memory estimate for the queue: the ultra capture decoded at 4 bytes
/// per pixel, plus headroom for the resize stages.
fn export_memory_estimate_mb(preset: &ExportPreset) -> f64 {
    let (w, h) = ultra_dimensions(preset);
    let ultra_bytes = w as f64 * h as f64 * 4.0;
    (ultra_bytes * 1.5) / (1024.0 * 1024.0)
}

/// A staged temp file that is deleted when the guard drops.
///
/// Stage cleanup must run even when the queue's timeout race drops the
/// export future mid-stage, so deletion lives in `Drop` rather than inline
/// after each stage.
struct StageArtifact(PathBuf);

impl StageArtifact {
    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for StageArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.0) {
            Ok(()) => debug!("Removed stage artifact: {}", self.0.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove stage artifact {}: {}", self.0.display(), e),
        }
    }
}

async fn run_stages(
    surface: Arc<dyn SurfaceCapture>,
    resizer: Arc<dyn ImageResizer>,
    library: Arc<dyn MediaLibrary>,
    share_sheet: Arc<dyn ShareSheet>,
    preset: ExportPreset,
    share_option: ShareOption,
) -> EditorResult<()> {
    // The surface may not be mounted or laid out yet; probe with a trial
    // micro-capture before committing to the full-size one.
    let probe_surface = Arc::clone(&surface);
    await_ready(
        "export surface",
        move || {
            let surface = Arc::clone(&probe_surface);
            async move {
                match surface
                    .capture(CaptureRequest {
                        width: PROBE_EDGE,
                        height: PROBE_EDGE,
                        format: ExportFormat::Png,
                        quality: 1.0,
                    })
                    .await
                {
                    Ok(path) => {
                        drop(StageArtifact(path));
                        true
                    }
                    Err(_) => false,
                }
            }
        },
        READY_MAX_ATTEMPTS,
        READY_INTERVAL,
    )
    .await?;

    // Stage 1: lossless ultra-high-resolution capture.
    let (ultra_w, ultra_h) = ultra_dimensions(&preset);
    debug!("Export '{}': capturing at {}x{}", preset.id, ultra_w, ultra_h);
    let ultra = StageArtifact(
        surface
            .capture(CaptureRequest {
                width: ultra_w,
                height: ultra_h,
                format: ExportFormat::Png,
                quality: 1.0,
            })
            .await?,
    );

    // Stage 2: lossless intermediate at 1.5x target; the ultra capture is
    // consumed here and dropped whether or not the resize succeeded.
    let (inter_w, inter_h) = intermediate_dimensions(&preset);
    let intermediate = {
        let result = resizer
            .resize(ultra.path(), inter_w, inter_h, ExportFormat::Png, 1.0)
            .await;
        drop(ultra);
        StageArtifact(result?)
    };

    // Stage 3: exact target size in the preset's format.
    let final_quality = preset.quality.max(FINAL_QUALITY_FLOOR);
    let final_file = {
        let result = resizer
            .resize(intermediate.path(), preset.width, preset.height, preset.format, final_quality)
            .await;
        drop(intermediate);
        StageArtifact(result?)
    };

    // Deliver, then drop the final artifact no matter how delivery went.
    let filename = format!("{}_{}.{}", preset.id, timestamp_ms(), preset.format.extension());
    let delivered = match share_option {
        ShareOption::SaveToLibrary => library.save_to_gallery(final_file.path(), &filename).await,
        ShareOption::Share => share_sheet.share(final_file.path(), &filename).await,
    };
    drop(final_file);
    delivered?;

    info!("Export '{}' delivered as {}", preset.id, filename);
    Ok(())
}
