use std::any::{Any, TypeId};
use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

type SharedHandler = Arc<Mutex<dyn EventHandler>>;

/// Typed event bus for dataset lifecycle notifications
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<TypeId, Vec<SharedHandler>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Dataset lifecycle events
pub mod events {
    use super::Event;
    use crate::viewport::TimeRange;

    /// A new dataset replaced the previous one
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub record_count: usize,
        pub field_count: usize,
        pub dropped_rows: usize,
        pub bounds: Option<TimeRange>,
    }

    /// A load failed; the previous dataset is still active
    #[derive(Debug, Clone)]
    pub struct DatasetRejected {
        pub source_name: String,
        pub error: String,
    }

    /// A field was toggled in or out of the plotted selection
    #[derive(Debug, Clone)]
    pub struct FieldSelectionChanged {
        pub field: String,
        pub selected: bool,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(DatasetLoaded, DatasetRejected, FieldSelectionChanged);
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = TypeId::of::<E>();
        let handler: SharedHandler = Arc::new(Mutex::new(BoxedHandler(handler)));
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_default().push(handler);
    }

    /// Subscribe a closure that receives the concrete event type
    pub fn on<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event: &dyn Event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event to every handler registered for its type.
    ///
    /// The handler list is snapshotted and the map lock released before
    /// dispatch, so handlers may publish or subscribe on this bus. A handler
    /// that is still running when its own event type is published again is
    /// skipped for the nested event.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let event_handlers: Vec<SharedHandler> = self
            .handlers
            .lock()
            .get(&type_id)
            .cloned()
            .unwrap_or_default();

        for handler in event_handlers {
            match handler.try_lock() {
                Some(mut handler) => handler.handle(&event),
                None => tracing::warn!(
                    "Skipping re-entrant delivery of {}",
                    std::any::type_name::<E>()
                ),
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter so boxed handlers can sit behind a shared lock
struct BoxedHandler(Box<dyn EventHandler>);

impl EventHandler for BoxedHandler {
    fn handle(&mut self, event: &dyn Event) {
        self.0.handle(event);
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
