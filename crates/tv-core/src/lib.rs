//! Core time-domain primitives for the synchronized time-series viewer
//!
//! This crate owns the shared viewport (zoom window plus hover cursor), the
//! broadcast channels views subscribe to, and the event bus used to announce
//! dataset replacement. It knows nothing about records; `tv-data` builds on it.

pub mod channel;
pub mod events;
pub mod sync;
pub mod viewport;

// Re-export commonly used types
pub use channel::{BroadcastChannel, CachedChannel, Subscriber};
pub use events::{EventBus, Event, EventHandler};
pub use sync::SelectionManager;
pub use viewport::{
    HoverEvent, Throttle, TimeRange, Timestamp, ViewId, ViewportConfig, ViewportCoordinator,
    ViewportError, ZoomWindow,
};
