use crate::{
    core::constants::MAX_QUEUED_EVENTS,
    input::events::{MapEvent, MapEventKind},
    prelude::{HashMap, VecDeque},
};

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Observer registry for map notifications.
///
/// Listeners run synchronously inside [`EventManager::emit`]. Every emitted
/// event is also queued so hosts that prefer polling can drain it with
/// [`EventManager::process_events`].
#[derive(Default)]
pub struct EventManager {
    listeners: HashMap<MapEventKind, Vec<EventCallback>>,
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Box::new(callback));
    }

    /// Notify listeners and queue the event
    pub fn emit(&mut self, event: MapEvent) {
        if let Some(callbacks) = self.listeners.get(&event.kind()) {
            for callback in callbacks {
                callback(&event);
            }
        }

        if self.event_queue.len() >= MAX_QUEUED_EVENTS {
            self.event_queue.pop_front();
        }
        self.event_queue.push_back(event);
    }

    /// Drain all queued events
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_queue.drain(..).collect()
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn view_changed() -> MapEvent {
        MapEvent::ViewChanged {
            center: LatLng::default(),
            zoom: 1,
        }
    }

    #[test]
    fn test_listener_receives_matching_kind_only() {
        let mut manager = EventManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        manager.on(MapEventKind::ViewChanged, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.emit(view_changed());
        manager.emit(MapEvent::LayerAdded {
            name: "osm".to_string(),
        });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending_events(), 2);
    }

    #[test]
    fn test_process_events_drains_queue() {
        let mut manager = EventManager::new();
        manager.emit(view_changed());

        let events = manager.process_events();
        assert_eq!(events, vec![view_changed()]);
        assert_eq!(manager.pending_events(), 0);
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut manager = EventManager::new();
        for _ in 0..(MAX_QUEUED_EVENTS + 10) {
            manager.emit(view_changed());
        }
        assert_eq!(manager.pending_events(), MAX_QUEUED_EVENTS);
    }
}
