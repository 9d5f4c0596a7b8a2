//! Batch background removal.
//!
//! Per-item success/failure is tracked independently: one photo's failure
//! never aborts its siblings, and the caller gets both sets back keyed by
//! photo id.

use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};
use crate::platform::BackgroundRemover;
use crate::utils::EditorError;

/// Outcome of a batch run: disjoint success and error sets.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Photo id -> path of the produced cut-out.
    pub succeeded: HashMap<String, PathBuf>,
    /// Photo id -> the error that item hit.
    pub failed: HashMap<String, EditorError>,
}

impl BatchOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Removes backgrounds for every photo in `photo_ids`.
///
/// Items run one at a time since the removal service is the bottleneck,
/// not local compute. Each failure is recorded and skipped past.
pub async fn remove_backgrounds(
    remover: &dyn BackgroundRemover,
    photo_ids: &[String],
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for photo_id in photo_ids {
        match remover.remove_background(photo_id).await {
            Ok(path) => {
                outcome.succeeded.insert(photo_id.clone(), path);
            }
            Err(e) => {
                warn!("Background removal failed for '{}': {}", photo_id, e);
                outcome.failed.insert(photo_id.clone(), e);
            }
        }
    }
    info!(
        "Background removal batch done: {} ok, {} failed",
        outcome.succeeded.len(),
        outcome.failed.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use crate::utils::EditorResult;

    struct FlakyRemover;

    impl BackgroundRemover for FlakyRemover {
        fn remove_background<'a>(&'a self, photo_id: &'a str) -> BoxFuture<'a, EditorResult<PathBuf>> {
            async move {
                if photo_id == "bad" {
                    Err(EditorError::io("upstream 500"))
                } else {
                    Ok(PathBuf::from(format!("/cutouts/{photo_id}.png")))
                }
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings() {
        let ids = vec!["a".to_string(), "bad".to_string(), "c".to_string()];
        let outcome = remove_backgrounds(&FlakyRemover, &ids).await;

        assert_eq!(outcome.succeeded.len(), 2);
        assert!(outcome.succeeded.contains_key("a"));
        assert!(outcome.succeeded.contains_key("c"));
        assert_eq!(outcome.failed.len(), 1);
        assert!(matches!(outcome.failed.get("bad"), Some(EditorError::Io(_))));
        assert!(!outcome.is_complete_success());
    }

    #[tokio::test]
    async fn empty_batch_is_a_complete_success() {
        let outcome = remove_backgrounds(&FlakyRemover, &[]).await;
        assert!(outcome.is_complete_success());
    }
}
