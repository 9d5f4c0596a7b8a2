//! Linear undo/redo history over settings snapshots.
//!
//! Commit boundaries are caller-controlled: the session commits on
//! slider-release, preset apply and crop apply, never per intermediate
//! drag value, so the history stays usable.

use crate::core::settings::AdjustmentSettings;
use crate::utils::timestamp_ms;

/// One committed snapshot.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub settings: AdjustmentSettings,
    /// UNIX milliseconds at commit time.
    pub timestamp: u128,
}

/// Snapshot sequence plus a cursor.
///
/// Invariant: the cursor always points at the entry equal to the live
/// settings (after undo/redo) or at the last entry (after a commit, which
/// truncates any redo-able future).
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    /// Seeds the history with the session's opening state.
    pub fn new(initial: AdjustmentSettings) -> Self {
        Self {
            entries: vec![HistoryEntry {
                settings: initial,
                timestamp: timestamp_ms(),
            }],
            cursor: 0,
        }
    }

    /// Commits a snapshot at the cursor.
    ///
    /// A snapshot deep-equal to the entry at the cursor is a no-op, which
    /// keeps no-op drags from bloating the history. Otherwise any entries
    /// beyond the cursor are truncated and the snapshot is appended.
    /// Returns whether an entry was added.
    pub fn commit(&mut self, current: &AdjustmentSettings) -> bool {
        if self.entries[self.cursor].settings == *current {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            settings: current.clone(),
            timestamp: timestamp_ms(),
        });
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Steps the cursor back, returning the snapshot that is now live.
    /// No-op at the beginning.
    pub fn undo(&mut self) -> &AdjustmentSettings {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        &self.entries[self.cursor].settings
    }

    /// Steps the cursor forward, returning the snapshot that is now live.
    /// No-op at the end.
    pub fn redo(&mut self) -> &AdjustmentSettings {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
        &self.entries[self.cursor].settings
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
