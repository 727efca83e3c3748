//! Viewport coordinator implementation

use std::sync::Arc;
use std::time::{Duration, Instant};
use parking_lot::{Mutex, RwLock};

use super::{HoverEvent, Throttle, TimeRange, ViewportConfig, ViewportError, ZoomWindow};
use crate::channel::{BroadcastChannel, CachedChannel, Subscriber};

/// Owns the shared time window and relays the hover cursor between views.
///
/// One instance exists per viewer and is handed to views explicitly. The zoom
/// channel caches its last value, the hover channel does not.
pub struct ViewportCoordinator {
    bounds: RwLock<Option<TimeRange>>,
    zoom: CachedChannel<ZoomWindow>,
    hover: BroadcastChannel<Option<HoverEvent>>,
    hover_throttle: Mutex<Throttle<HoverEvent>>,
}

impl ViewportCoordinator {
    /// Create a coordinator with no data bounds and a full window
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            bounds: RwLock::new(None),
            zoom: CachedChannel::new(ZoomWindow::Full),
            hover: BroadcastChannel::new(),
            hover_throttle: Mutex::new(Throttle::new(Duration::from_millis(
                config.hover_interval_ms,
            ))),
        }
    }

    /// Replace the data bounds for a freshly loaded dataset.
    ///
    /// A window from the previous dataset is meaningless against the new
    /// bounds, so the window is reset to [`ZoomWindow::Full`] and subscribers
    /// are notified.
    pub fn set_data_bounds(&self, bounds: TimeRange) {
        let bounds = bounds.normalized();
        *self.bounds.write() = Some(bounds);
        tracing::debug!("Viewport data bounds set to {}", bounds);
        self.zoom.publish(ZoomWindow::Full);
    }

    /// Forget the data bounds (e.g. an empty dataset was loaded)
    pub fn clear_data_bounds(&self) {
        *self.bounds.write() = None;
        self.zoom.publish(ZoomWindow::Full);
    }

    pub fn data_bounds(&self) -> Option<TimeRange> {
        *self.bounds.read()
    }

    /// Zoom every view to `range`, clamped to the data bounds.
    ///
    /// An inverted range is swapped first. A range that does not touch the
    /// data bounds at all is rejected and the current window is kept.
    pub fn emit_zoom(&self, range: TimeRange) -> Result<TimeRange, ViewportError> {
        let bounds = self.data_bounds().ok_or(ViewportError::NoDataBounds)?;
        let requested = range.normalized();

        if !bounds.intersects(&requested) {
            tracing::warn!("Rejecting zoom {} outside data bounds {}", requested, bounds);
            return Err(ViewportError::OutsideBounds { requested, bounds });
        }

        let clamped = requested.clamp_to(&bounds);
        self.zoom.publish(ZoomWindow::Range(clamped));
        Ok(clamped)
    }

    /// Return every view to the full data extent
    pub fn clear_zoom(&self) {
        self.zoom.publish(ZoomWindow::Full);
    }

    pub fn current_zoom(&self) -> ZoomWindow {
        self.zoom.current()
    }

    /// Current window as a concrete range, `None` when no data is loaded
    pub fn visible_range(&self) -> Option<TimeRange> {
        self.current_zoom().resolve(self.data_bounds())
    }

    /// Subscribe to zoom changes; the current window is delivered immediately
    pub fn subscribe_zoom(&self, subscriber: Arc<dyn Subscriber<ZoomWindow>>) {
        self.zoom.subscribe(subscriber);
    }

    /// Subscribe to hover changes; earlier hover events are not replayed
    pub fn subscribe_hover(&self, subscriber: Arc<dyn Subscriber<Option<HoverEvent>>>) {
        self.hover.subscribe(subscriber);
    }

    /// Broadcast a hover event unthrottled. `None` means the cursor left the
    /// data area.
    pub fn emit_hover(&self, event: Option<HoverEvent>) {
        self.hover.publish(&event);
    }

    /// Rate-limited hover entry point for raw pointer movement.
    ///
    /// Returns `true` if the event was broadcast now. A suppressed event is
    /// kept as the pending one and released by [`Self::flush_hover`]. A leave
    /// event always goes through and drops anything pending.
    pub fn offer_hover(&self, event: Option<HoverEvent>, now: Instant) -> bool {
        let released = {
            let mut throttle = self.hover_throttle.lock();
            match event {
                Some(event) => throttle.offer(event, now).map(Some),
                None => {
                    throttle.discard_pending();
                    Some(None)
                }
            }
        };

        match released {
            Some(event) => {
                self.emit_hover(event);
                true
            }
            None => false,
        }
    }

    /// Broadcast the pending hover event once its interval has elapsed
    pub fn flush_hover(&self, now: Instant) -> bool {
        let released = self.hover_throttle.lock().flush(now);
        match released {
            Some(event) => {
                self.emit_hover(Some(event));
                true
            }
            None => false,
        }
    }
}

impl Default for ViewportCoordinator {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}
