//! Brush selections that turn into zooms
//!
//! A drag on a view builds a brush; committing it zooms every view through
//! the coordinator. The brush is removed before the zoom is emitted, so a
//! second commit for the same gesture does nothing.

use parking_lot::RwLock;
use ahash::AHashMap;

use crate::viewport::{TimeRange, Timestamp, ViewId, ViewportCoordinator, ViewportError};

/// In-progress drag selection on one view
#[derive(Debug, Clone, Copy, PartialEq)]
struct Brush {
    anchor: Timestamp,
    cursor: Timestamp,
}

impl Brush {
    fn range(&self) -> TimeRange {
        TimeRange::new(self.anchor, self.cursor).normalized()
    }
}

/// Per-view brush bookkeeping
pub struct SelectionManager {
    brushes: RwLock<AHashMap<ViewId, Brush>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self {
            brushes: RwLock::new(AHashMap::new()),
        }
    }

    /// Start a brush at `time`, replacing any brush the view already had
    pub fn begin(&self, view: ViewId, time: Timestamp) {
        self.brushes.write().insert(view, Brush { anchor: time, cursor: time });
    }

    /// Move the free end of the view's brush
    pub fn extend(&self, view: ViewId, time: Timestamp) -> Option<TimeRange> {
        let mut brushes = self.brushes.write();
        let brush = brushes.get_mut(&view)?;
        brush.cursor = time;
        Some(brush.range())
    }

    /// Range currently covered by the view's brush
    pub fn active(&self, view: ViewId) -> Option<TimeRange> {
        self.brushes.read().get(&view).map(Brush::range)
    }

    /// Finish the view's brush and zoom to it.
    ///
    /// Returns `Ok(None)` when there was no brush or it had zero width.
    pub fn commit(
        &self,
        view: ViewId,
        coordinator: &ViewportCoordinator,
    ) -> Result<Option<TimeRange>, ViewportError> {
        let Some(brush) = self.brushes.write().remove(&view) else {
            return Ok(None);
        };

        let range = brush.range();
        if range.start == range.end {
            return Ok(None);
        }

        coordinator.emit_zoom(range).map(Some)
    }

    /// Drop the view's brush. Safe to call repeatedly.
    pub fn clear(&self, view: ViewId) -> bool {
        self.brushes.write().remove(&view).is_some()
    }

    pub fn clear_all(&self) {
        self.brushes.write().clear();
    }
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;
    use crate::viewport::ZoomWindow;

    fn t(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_commit_zooms_once() {
        let coordinator = ViewportCoordinator::default();
        coordinator.set_data_bounds(TimeRange::new(t(0), t(100)));
        let selections = SelectionManager::new();
        let view = Uuid::new_v4();

        selections.begin(view, t(80));
        assert_eq!(selections.extend(view, t(40)), Some(TimeRange::new(t(40), t(80))));

        let committed = selections.commit(view, &coordinator).unwrap();
        assert_eq!(committed, Some(TimeRange::new(t(40), t(80))));
        assert_eq!(coordinator.current_zoom(), ZoomWindow::Range(TimeRange::new(t(40), t(80))));

        // Selection is gone; a repeated commit changes nothing
        coordinator.clear_zoom();
        assert_eq!(selections.commit(view, &coordinator).unwrap(), None);
        assert!(coordinator.current_zoom().is_full());
    }

    #[test]
    fn test_click_without_drag_does_not_zoom() {
        let coordinator = ViewportCoordinator::default();
        coordinator.set_data_bounds(TimeRange::new(t(0), t(100)));
        let selections = SelectionManager::new();
        let view = Uuid::new_v4();

        selections.begin(view, t(10));
        assert_eq!(selections.commit(view, &coordinator).unwrap(), None);
        assert!(coordinator.current_zoom().is_full());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let selections = SelectionManager::new();
        let view = Uuid::new_v4();
        selections.begin(view, t(1));

        assert!(selections.clear(view));
        assert!(!selections.clear(view));
        assert_eq!(selections.active(view), None);
    }
}
