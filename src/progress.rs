//! Progress accounting.
//!
//! The engine only knows the `ProgressSink` interface: add byte/item deltas,
//! and temporarily silence reporting around a secondary step (the removal
//! leg of a cross-device move). `Estimator` is a ready-made single-threaded
//! accumulator for hosts that do not bring their own tracker.

use std::cell::Cell;
use std::path::Path;
use walkdir::WalkDir;

/// External progress/ETA tracker as seen by the engine.
pub trait ProgressSink {
    /// Record `bytes` transferred and `items` completed.
    fn update(&self, bytes: u64, items: u64);

    /// Silence reporting; returns the previous silence state.
    fn silence(&self) -> bool;

    /// Restore a silence state previously returned by `silence`.
    fn set_silenced(&self, silent: bool);
}

/// Totals for a subtree, gathered ahead of an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub bytes: u64,
    pub items: u64,
}

impl Totals {
    /// Walk `root` without following symlinks and sum sizes/entries.
    /// Unreadable entries are skipped; the result is an estimate.
    pub fn scan(root: &Path) -> Self {
        let mut totals = Totals::default();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
        {
            totals.items += 1;
            if entry.file_type().is_file() {
                totals.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
        totals
    }
}

#[derive(Debug, Default)]
pub struct Estimator {
    total: Totals,
    bytes: Cell<u64>,
    items: Cell<u64>,
    silent: Cell<bool>,
}

impl Estimator {
    pub fn new(total: Totals) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn total(&self) -> Totals {
        self.total
    }

    pub fn done(&self) -> Totals {
        Totals {
            bytes: self.bytes.get(),
            items: self.items.get(),
        }
    }

    /// Completed fraction of the byte total, or of the item total when no
    /// bytes are expected.
    pub fn ratio(&self) -> f64 {
        let done = self.done();
        if self.total.bytes > 0 {
            (done.bytes as f64 / self.total.bytes as f64).min(1.0)
        } else if self.total.items > 0 {
            (done.items as f64 / self.total.items as f64).min(1.0)
        } else {
            1.0
        }
    }
}

impl ProgressSink for Estimator {
    fn update(&self, bytes: u64, items: u64) {
        if self.silent.get() {
            return;
        }
        self.bytes.set(self.bytes.get().saturating_add(bytes));
        self.items.set(self.items.get().saturating_add(items));
    }

    fn silence(&self) -> bool {
        self.silent.replace(true)
    }

    fn set_silenced(&self, silent: bool) {
        self.silent.set(silent);
    }
}
