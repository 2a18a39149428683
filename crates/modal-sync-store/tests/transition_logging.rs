//! Transition events are emitted through `tracing` and can be silenced.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use modal_sync_store::{ModalId, ModalsStore};
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Clone, Default)]
struct DebugCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for DebugCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::DEBUG && meta.target() == "modal_sync::store" {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_debug_events(store: ModalsStore<u8>) -> usize {
    let counter = DebugCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    tracing::subscriber::with_default(subscriber, || {
        let id = ModalId::next("log");
        store.open(&id, Some(1));
        store.set_visible_on_mount_if_needed(&id);
        store.close(&id);
        store.remove(&id);
    });
    counter.0.load(Ordering::SeqCst)
}

#[test]
fn transitions_are_logged_at_debug() {
    assert_eq!(count_debug_events(ModalsStore::new()), 4);
}

#[test]
fn transition_logging_can_be_disabled() {
    assert_eq!(count_debug_events(ModalsStore::with_logging(false)), 0);
}
