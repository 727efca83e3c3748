//! Synchronous publish/subscribe primitives
//!
//! Two flavours are provided: [`CachedChannel`] remembers the last published
//! value and replays it to late subscribers, [`BroadcastChannel`] forgets a
//! value as soon as it has been delivered. Both deliver to every live
//! subscriber, in publish order, before `publish` returns.
//!
//! Subscribers are held weakly: dropping the last `Arc` unsubscribes.

use std::sync::{Arc, Weak};
use parking_lot::RwLock;

/// Trait for components that react to values published on a channel
pub trait Subscriber<T>: Send + Sync {
    /// Called synchronously for every published value
    fn notify(&self, value: &T);
}

impl<T, F> Subscriber<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    fn notify(&self, value: &T) {
        self(value)
    }
}

/// Weak subscriber registry shared by both channel flavours
struct SubscriberList<T: 'static> {
    entries: RwLock<Vec<Weak<dyn Subscriber<T>>>>,
}

impl<T: 'static> SubscriberList<T> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    fn add(&self, subscriber: &Arc<dyn Subscriber<T>>) {
        self.entries.write().push(Arc::downgrade(subscriber));
    }

    /// Prune dead entries and return strong handles to the live ones.
    ///
    /// The lock is released before anyone is notified so a subscriber may
    /// publish or subscribe from inside its callback.
    fn live(&self) -> Vec<Arc<dyn Subscriber<T>>> {
        let mut entries = self.entries.write();
        entries.retain(|weak| weak.strong_count() > 0);
        entries.iter().filter_map(Weak::upgrade).collect()
    }

    fn dispatch(&self, value: &T) {
        for subscriber in self.live() {
            subscriber.notify(value);
        }
    }
}

/// Fire-and-forget channel: values reach current subscribers only
pub struct BroadcastChannel<T: 'static> {
    subscribers: SubscriberList<T>,
}

impl<T: 'static> BroadcastChannel<T> {
    pub fn new() -> Self {
        Self {
            subscribers: SubscriberList::new(),
        }
    }

    /// Register a subscriber. Nothing is replayed.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>) {
        self.subscribers.add(&subscriber);
    }

    pub fn publish(&self, value: &T) {
        self.subscribers.dispatch(value);
    }

    /// Number of subscribers still alive
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.live().len()
    }
}

impl<T: 'static> Default for BroadcastChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Current-value channel: the last published value is cached and handed to
/// every new subscriber at registration time
pub struct CachedChannel<T: Clone + 'static> {
    current: RwLock<T>,
    subscribers: SubscriberList<T>,
}

impl<T: Clone + 'static> CachedChannel<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: RwLock::new(initial),
            subscribers: SubscriberList::new(),
        }
    }

    /// Register a subscriber and immediately deliver the cached value to it
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>) {
        self.subscribers.add(&subscriber);
        let current = self.current();
        subscriber.notify(&current);
    }

    /// Store `value` as the current value, then notify all subscribers
    pub fn publish(&self, value: T) {
        *self.current.write() = value.clone();
        self.subscribers.dispatch(&value);
    }

    pub fn current(&self) -> T {
        self.current.read().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.live().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, Arc<dyn Subscriber<T>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscriber: Arc<dyn Subscriber<T>> = Arc::new(move |value: &T| {
            sink.lock().push(value.clone());
        });
        (seen, subscriber)
    }

    #[test]
    fn test_cached_channel_replays_current_value() {
        let channel = CachedChannel::new(1);
        channel.publish(2);

        let (seen, subscriber) = recorder::<i32>();
        channel.subscribe(subscriber.clone());
        channel.publish(3);

        assert_eq!(*seen.lock(), vec![2, 3]);
        assert_eq!(channel.current(), 3);
    }

    #[test]
    fn test_broadcast_channel_does_not_replay() {
        let channel = BroadcastChannel::new();
        channel.publish(&"early");

        let (seen, subscriber) = recorder::<&'static str>();
        channel.subscribe(subscriber.clone());
        channel.publish(&"late");

        assert_eq!(*seen.lock(), vec!["late"]);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let channel = BroadcastChannel::<u8>::new();
        let (_seen, subscriber) = recorder::<u8>();
        channel.subscribe(subscriber.clone());
        assert_eq!(channel.subscriber_count(), 1);

        drop(subscriber);
        channel.publish(&1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_delivery_follows_publish_order() {
        let channel = CachedChannel::new(0u32);
        let (first, a) = recorder::<u32>();
        let (second, b) = recorder::<u32>();
        channel.subscribe(a.clone());
        channel.subscribe(b.clone());

        for value in 1..=3 {
            channel.publish(value);
        }

        assert_eq!(*first.lock(), vec![0, 1, 2, 3]);
        assert_eq!(*second.lock(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_subscriber_may_publish_from_callback() {
        let channel = Arc::new(CachedChannel::new(0u32));
        let inner = Arc::downgrade(&channel);
        let subscriber: Arc<dyn Subscriber<u32>> = Arc::new(move |value: &u32| {
            if *value == 1 {
                if let Some(channel) = inner.upgrade() {
                    channel.publish(2);
                }
            }
        });
        channel.subscribe(subscriber.clone());

        channel.publish(1);
        assert_eq!(channel.current(), 2);
    }
}
