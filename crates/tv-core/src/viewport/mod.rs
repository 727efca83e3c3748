//! Shared time-domain viewport
//!
//! Every view reads its visible window from the same [`ViewportCoordinator`]
//! and pushes zoom and hover changes back into it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod coordinator;
mod range;
mod throttle;

pub use coordinator::ViewportCoordinator;
pub use range::TimeRange;
pub use throttle::Throttle;

/// An instant on the shared time axis
pub type Timestamp = DateTime<Utc>;

/// Identifier of a view participating in synchronization
pub type ViewId = Uuid;

/// Visible window of the shared time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomWindow {
    /// Whole data extent
    Full,
    /// Explicit sub-range, always inside the data bounds it was clamped to
    Range(TimeRange),
}

impl ZoomWindow {
    pub fn is_full(&self) -> bool {
        matches!(self, ZoomWindow::Full)
    }

    /// Concrete range this window covers, given the data bounds
    pub fn resolve(&self, bounds: Option<TimeRange>) -> Option<TimeRange> {
        match self {
            ZoomWindow::Full => bounds,
            ZoomWindow::Range(range) => Some(*range),
        }
    }
}

impl Default for ZoomWindow {
    fn default() -> Self {
        ZoomWindow::Full
    }
}

/// Cursor position broadcast while the pointer moves over a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverEvent {
    /// Instant under the cursor
    pub time: Timestamp,
    /// View that produced the event
    pub source: Option<ViewId>,
    /// Index of the record the cursor snapped to, if the view resolved one
    pub record_index: Option<usize>,
}

impl HoverEvent {
    pub fn at(time: Timestamp) -> Self {
        Self {
            time,
            source: None,
            record_index: None,
        }
    }

    pub fn from_view(mut self, view: ViewId) -> Self {
        self.source = Some(view);
        self
    }

    pub fn snapped_to(mut self, index: usize) -> Self {
        self.record_index = Some(index);
        self
    }
}

/// Viewport tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Minimum spacing between two forwarded hover events
    pub hover_interval_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            hover_interval_ms: 50,
        }
    }
}

/// Errors raised by zoom requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    #[error("no data bounds have been set")]
    NoDataBounds,

    #[error("requested window {requested} lies outside the data bounds {bounds}")]
    OutsideBounds {
        requested: TimeRange,
        bounds: TimeRange,
    },
}
