#![allow(dead_code)]

use mapctl::prelude::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// Imagery service double that records configuration calls
#[derive(Clone, Default)]
pub struct RecordingImagery {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub queue: Arc<AtomicUsize>,
    pub notifier: Arc<Mutex<Option<ImageryNotifier>>>,
}

impl RecordingImagery {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_queue(&self, size: usize) {
        self.queue.store(size, Ordering::SeqCst);
    }

    pub fn notifier(&self) -> ImageryNotifier {
        self.notifier.lock().unwrap().clone().expect("service not attached")
    }
}

impl ImageryService for RecordingImagery {
    fn load_queue_size(&self) -> usize {
        self.queue.load(Ordering::SeqCst)
    }

    fn set_cache_dir(&mut self, config: CacheConfig) -> mapctl::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("cache:{}:{}", config.directory.display(), config.max_size_mb));
        Ok(())
    }

    fn set_proxy(&mut self, config: ProxyConfig) -> mapctl::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("proxy:{}:{}", config.host, config.port));
        Ok(())
    }

    fn attach(&mut self, notifier: ImageryNotifier) {
        *self.notifier.lock().unwrap() = Some(notifier);
    }
}

pub fn osm_layer() -> Box<dyn LayerTrait> {
    Box::new(MapLayer::new("osm", Arc::new(MercatorAdapter::osm())))
}

/// 400x300 control centered on Berlin at zoom 10, events drained
pub fn control_with(clock: ManualClock, imagery: RecordingImagery) -> MapControl {
    let mut control = MapControlBuilder::new()
        .with_viewport_size(400.0, 300.0)
        .with_center_and_zoom(LatLng::new(52.52, 13.405), 10)
        .with_clock(Box::new(clock))
        .with_imagery(Box::new(imagery))
        .with_layer(osm_layer())
        .build()
        .unwrap();
    control.process_events();
    control
}

pub fn control() -> MapControl {
    control_with(ManualClock::new(), RecordingImagery::default())
}

pub fn count(events: &[MapEvent], kind: MapEventKind) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}

pub fn assert_close(a: LatLng, b: LatLng, epsilon: f64) {
    assert!(
        (a.lat - b.lat).abs() < epsilon && (a.lng - b.lng).abs() < epsilon,
        "{:?} != {:?}",
        a,
        b
    );
}
