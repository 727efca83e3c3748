//! Fixed-budget stride sampling for rendering
//!
//! A sequence longer than the target is sampled every `ceil(len / target)`
//! items starting at the first, and the real last item is appended if the
//! stride skipped it. The result has at most `target + 1` items and always
//! ends on the true final point.
//!
//! Zoomed windows are always sampled from full-resolution records, never
//! from the overview sample, so aliasing does not compound across zoom levels.

use tv_core::{TimeRange, ZoomWindow};
use crate::record::Record;
use crate::store::RecordStore;

pub const DEFAULT_OVERVIEW_TARGET: usize = 2000;
pub const DEFAULT_WINDOW_TARGET: usize = 1000;

/// Indices kept by stride sampling `len` items down to about `target`
pub fn stride_indices(len: usize, target: usize) -> Vec<usize> {
    if len <= target {
        return (0..len).collect();
    }
    // A zero budget still keeps the endpoints
    let step = len.div_ceil(target.max(1));
    let mut indices: Vec<usize> = (0..len).step_by(step).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

/// Stride-sample `items`; returned unchanged when already within `target`
pub fn decimate<T>(items: &[T], target: usize) -> Vec<&T> {
    stride_indices(items.len(), target)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Render-data reducer with separate overview and window budgets
#[derive(Debug, Clone, Copy)]
pub struct SeriesReducer {
    overview_target: usize,
    window_target: usize,
}

impl SeriesReducer {
    pub fn new(overview_target: usize, window_target: usize) -> Self {
        Self {
            overview_target,
            window_target,
        }
    }

    pub fn overview_target(&self) -> usize {
        self.overview_target
    }

    pub fn window_target(&self) -> usize {
        self.window_target
    }

    /// Reduce the full record sequence
    pub fn decimate_for_overview<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        decimate(records, self.overview_target)
    }

    /// Reduce records already filtered to the active window
    pub fn decimate_for_window<'a>(&self, window_records: &'a [Record]) -> Vec<&'a Record> {
        decimate(window_records, self.window_target)
    }

    /// Indices into `store` to render for `window`
    pub fn window_indices(&self, store: &RecordStore, window: &ZoomWindow) -> Vec<usize> {
        match window {
            ZoomWindow::Full => stride_indices(store.len(), self.overview_target),
            ZoomWindow::Range(range) => self.range_indices(store, range),
        }
    }

    /// Records of `store` to render for `window`
    pub fn reduce_window<'a>(&self, store: &'a RecordStore, window: &ZoomWindow) -> Vec<&'a Record> {
        match window {
            ZoomWindow::Full => self.decimate_for_overview(store.records()),
            ZoomWindow::Range(range) => self.decimate_for_window(store.slice_in(range)),
        }
    }

    fn range_indices(&self, store: &RecordStore, range: &TimeRange) -> Vec<usize> {
        let span = store.range_indices(range);
        stride_indices(span.len(), self.window_target)
            .into_iter()
            .map(|i| span.start + i)
            .collect()
    }
}

impl Default for SeriesReducer {
    fn default() -> Self {
        Self::new(DEFAULT_OVERVIEW_TARGET, DEFAULT_WINDOW_TARGET)
    }
}
