use crate::{
    animation::{
        driver::{PanAnimator, TickOutcome},
        scheduler::{Clock, Scheduler, SystemClock, TimerTask},
    },
    core::{
        config::{MapControlConfig, WheelZoomAnchor},
        geo::{LatLng, LatLngBounds, Point},
        projection::MapAdapter,
        update::UpdateGate,
        viewport::{Projector, Viewport},
    },
    input::{
        dispatcher::{Action, DispatchContext, InteractionDispatcher, MouseMode},
        events::{EventHandled, MapEvent, MapEventKind, MouseEvent, WheelEvent},
        handler::EventManager,
    },
    layers::{base::LayerTrait, manager::LayerManager, vector::Geometry},
    rendering::{
        compositor::{FrameCompositor, FrameInputs},
        context::RenderContext,
    },
    tiles::{
        bridge::{ImageryNotifier, TileArrivalBridge},
        imagery::{CacheConfig, ImageryService, NullImagery, ProxyConfig},
    },
    Result,
};
use std::sync::Arc;

/// Interactive viewport controller.
///
/// Owns the view, the layers, and every piece of transient state that input,
/// animation ticks and tile arrivals touch. All of it is driven from one
/// thread: the host forwards input, calls [`MapControl::update`] regularly and
/// reads the presented frame from [`MapControl::paint`].
pub struct MapControl {
    viewport: Viewport,
    layers: LayerManager,
    dispatcher: InteractionDispatcher,
    animator: PanAnimator,
    scheduler: Scheduler,
    clock: Box<dyn Clock>,
    gate: UpdateGate,
    compositor: FrameCompositor,
    events: EventManager,
    bridge: TileArrivalBridge,
    imagery: Box<dyn ImageryService>,
    followed: Vec<String>,
    show_scale: bool,
    show_crosshairs: bool,
    wheel_anchor: WheelZoomAnchor,
}

impl MapControl {
    /// Control without imagery service, on the system clock
    pub fn new(config: MapControlConfig) -> Result<Self> {
        Self::with_parts(config, Box::new(NullImagery::new()), Box::new(SystemClock::new()))
    }

    pub fn with_parts(
        config: MapControlConfig,
        mut imagery: Box<dyn ImageryService>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let bridge = TileArrivalBridge::new();
        imagery.attach(bridge.notifier());
        if let Some(cache) = config.cache.clone() {
            imagery.set_cache_dir(cache)?;
        }
        if let Some(proxy) = config.proxy.clone() {
            imagery.set_proxy(proxy)?;
        }

        let mut gate = UpdateGate::new();
        gate.request_redraw();

        Ok(Self {
            viewport: Viewport::new(config.initial_center, config.initial_zoom, config.viewport_size),
            layers: LayerManager::new(),
            dispatcher: InteractionDispatcher::new(
                config.initial_mouse_mode,
                config.mouse_wheel_events,
                config.interaction.clone(),
            ),
            animator: PanAnimator::new(config.animation.clone()),
            scheduler: Scheduler::new(),
            clock,
            gate,
            compositor: FrameCompositor::new(config.viewport_size),
            events: EventManager::new(),
            bridge,
            imagery,
            followed: Vec::new(),
            show_scale: config.show_scale,
            show_crosshairs: config.show_crosshairs,
            wheel_anchor: config.interaction.wheel_zoom_anchor,
        })
    }

    fn adapter(&self) -> Option<Arc<dyn MapAdapter>> {
        self.layers.active_adapter()
    }

    /// Active adapter, logging when there is none
    fn require_adapter(&self, operation: &str) -> Option<Arc<dyn MapAdapter>> {
        let adapter = self.adapter();
        if adapter.is_none() {
            log::debug!("{} ignored, no map layer configured", operation);
        }
        adapter
    }

    /// Emits view changed now, or once the update gate is released
    fn view_changed(&mut self) {
        if self.gate.is_suspended() {
            self.gate.defer_view_change();
        } else {
            self.emit_view_changed();
        }
    }

    fn emit_view_changed(&mut self) {
        self.events.emit(MapEvent::ViewChanged {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
        });
    }

    // Layers

    /// Adds a layer on top of existing layers with the same z-index
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let name = layer.name().to_string();
        self.layers.add_layer(layer)?;

        self.clamp_zoom_to_active_layer();

        log::debug!("layer '{}' added", name);
        self.events.emit(MapEvent::LayerAdded { name });
        self.gate.request_redraw();
        Ok(())
    }

    pub fn remove_layer(&mut self, name: &str) -> Option<Box<dyn LayerTrait>> {
        let removed = self.layers.remove_layer(name);
        if removed.is_some() {
            self.events.emit(MapEvent::LayerRemoved {
                name: name.to_string(),
            });
            // another map layer may have taken over with a narrower range
            if let Some(before) = self.clamp_zoom_to_active_layer() {
                self.layers.note_zoom_change(before, self.viewport.zoom);
                self.view_changed();
            }
            self.gate.request_redraw();
        } else {
            log::debug!("remove_layer: no layer named '{}'", name);
        }
        removed
    }

    /// Clamps the zoom into the active layer's range; returns the old zoom if it changed
    fn clamp_zoom_to_active_layer(&mut self) -> Option<u8> {
        let adapter = self.adapter()?;
        let before = self.viewport.zoom;
        self.viewport
            .set_zoom(before as i32, adapter.as_ref())
            .then_some(before)
    }

    pub fn layer(&self, name: &str) -> Option<&dyn LayerTrait> {
        self.layers.get_layer(name)
    }

    /// Mutates a layer in place and schedules a redraw
    pub fn with_layer_mut<F, R>(&mut self, name: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        let result = self.layers.with_layer_mut(name, f);
        if result.is_some() {
            self.gate.request_redraw();
        }
        result
    }

    /// Layer names in draw order
    pub fn layers(&self) -> Vec<String> {
        self.layers.layer_names()
    }

    pub fn number_of_layers(&self) -> usize {
        self.layers.len()
    }

    // View queries

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn current_coordinate(&self) -> LatLng {
        self.viewport.center
    }

    pub fn current_zoom(&self) -> u8 {
        self.viewport.zoom
    }

    /// Lowest zoom of the active layer; 0 without one
    pub fn min_zoom(&self) -> u8 {
        self.adapter().map_or(0, |a| a.min_zoom())
    }

    pub fn max_zoom(&self) -> u8 {
        self.adapter().map_or(0, |a| a.max_zoom())
    }

    /// Screen pixel to coordinate; the origin coordinate without a map layer
    pub fn click_to_world_coordinate(&self, pixel: &Point) -> LatLng {
        match self.require_adapter("click_to_world_coordinate") {
            Some(adapter) => self.viewport.screen_to_coordinate(pixel, adapter.as_ref()),
            None => LatLng::default(),
        }
    }

    pub fn world_coordinate_to_screen(&self, coordinate: &LatLng) -> Point {
        match self.require_adapter("world_coordinate_to_screen") {
            Some(adapter) => self.viewport.coordinate_to_screen(coordinate, adapter.as_ref()),
            None => Point::default(),
        }
    }

    /// Visible geographic rectangle; empty without a map layer
    pub fn get_viewport(&self) -> LatLngBounds {
        match self.require_adapter("get_viewport") {
            Some(adapter) => self.viewport.bounds(adapter.as_ref()),
            None => LatLngBounds::empty(),
        }
    }

    /// True iff the visible rectangle fully contains the geometry's bounding box
    pub fn is_geometry_visible(&self, geometry: &Geometry) -> bool {
        self.get_viewport()
            .contains_bounds(&geometry.bounding_box())
    }

    // Navigation

    fn change_zoom<F>(&mut self, operation: &str, f: F)
    where
        F: FnOnce(&mut Viewport, &dyn MapAdapter) -> bool,
    {
        let Some(adapter) = self.require_adapter(operation) else {
            return;
        };
        let before = self.viewport.zoom;
        f(&mut self.viewport, adapter.as_ref());
        if self.viewport.zoom != before {
            self.layers.note_zoom_change(before, self.viewport.zoom);
        }
        self.view_changed();
        self.gate.request_redraw();
    }

    pub fn zoom_in(&mut self) {
        self.change_zoom("zoom_in", |viewport, adapter| viewport.zoom_in(adapter));
    }

    pub fn zoom_out(&mut self) {
        self.change_zoom("zoom_out", |viewport, adapter| viewport.zoom_out(adapter));
    }

    /// Sets the zoom level, clamped to the active layer's range
    pub fn set_zoom(&mut self, zoom: i32) {
        self.change_zoom("set_zoom", |viewport, adapter| viewport.set_zoom(zoom, adapter));
    }

    pub fn set_view(&mut self, coordinate: LatLng) {
        if self.require_adapter("set_view").is_none() {
            return;
        }
        self.viewport.set_center(coordinate);
        self.view_changed();
        self.gate.request_redraw();
    }

    /// Centers on the coordinates and zooms out until all are visible
    pub fn set_view_all(&mut self, coordinates: &[LatLng]) {
        self.change_zoom("set_view_all", |viewport, adapter| {
            viewport.fit(coordinates, adapter)
        });
    }

    /// Like [`MapControl::set_view_all`] but picks the tightest zoom that still fits
    pub fn set_view_and_zoom_in(&mut self, coordinates: &[LatLng]) {
        self.change_zoom("set_view_and_zoom_in", |viewport, adapter| {
            viewport.fit_and_zoom_in(coordinates, adapter)
        });
    }

    /// Re-applies the current center and reports it
    pub fn update_view(&mut self) {
        let center = self.viewport.center;
        self.set_view(center);
    }

    /// Pans by a world pixel delta
    pub fn scroll(&mut self, delta: Point) {
        let Some(adapter) = self.require_adapter("scroll") else {
            return;
        };
        if !self.viewport.scroll(&delta, adapter.as_ref()) {
            return;
        }
        self.view_changed();
        self.gate.request_redraw();
    }

    pub fn scroll_left(&mut self, pixels: f64) {
        self.scroll(Point::new(-pixels, 0.0));
    }

    pub fn scroll_right(&mut self, pixels: f64) {
        self.scroll(Point::new(pixels, 0.0));
    }

    pub fn scroll_up(&mut self, pixels: f64) {
        self.scroll(Point::new(0.0, -pixels));
    }

    pub fn scroll_down(&mut self, pixels: f64) {
        self.scroll(Point::new(0.0, pixels));
    }

    // Animation

    /// Starts an animated pan toward `target`. Returns `false` if a pan is
    /// already running; that run keeps its target.
    pub fn move_to(&mut self, target: LatLng) -> bool {
        self.scheduler.advance(self.clock.now());
        self.animator.move_to(target, &mut self.scheduler)
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn animation_target(&self) -> Option<LatLng> {
        self.animator.target()
    }

    fn animation_tick(&mut self) {
        let adapter = self.adapter();
        let outcome = self
            .animator
            .tick(&mut self.viewport, adapter.as_deref(), &mut self.scheduler);

        match outcome {
            TickOutcome::Stepped => {
                self.gate.request_redraw();
            }
            TickOutcome::Completed => {
                self.gate.request_redraw();
                self.view_changed();
            }
            TickOutcome::Aborted | TickOutcome::Idle => {}
        }
    }

    // Following

    /// Keeps the view centered on a point geometry whenever it reports a move
    pub fn follow_geometry(&mut self, geometry_id: impl Into<String>) {
        let id = geometry_id.into();
        if !self.followed.contains(&id) {
            self.followed.push(id);
        }
    }

    pub fn stop_following(&mut self, geometry_id: &str) {
        self.followed.retain(|id| id != geometry_id);
    }

    pub fn is_following(&self, geometry_id: &str) -> bool {
        self.followed.iter().any(|id| id == geometry_id)
    }

    /// Position update for a geometry; recenters if it is followed
    pub fn geometry_position_changed(&mut self, geometry: &Geometry) {
        if !self.is_following(&geometry.id) {
            return;
        }
        let Some(adapter) = self.require_adapter("geometry_position_changed") else {
            return;
        };
        let Some(position) = geometry.position() else {
            return;
        };

        let start = self.viewport.world_middle(adapter.as_ref());
        let dest = adapter.coordinate_to_display(&position, self.viewport.zoom);
        if !self.viewport.scroll(&dest.subtract(&start), adapter.as_ref()) {
            return;
        }
        self.view_changed();
        self.force_redraw();
    }

    // Bounding box

    pub fn set_use_bounding_box(&mut self, enabled: bool) {
        self.viewport.set_use_bounding_box(enabled);
    }

    pub fn is_bounding_box_enabled(&self) -> bool {
        self.viewport.is_bounding_box_enabled()
    }

    pub fn set_bounding_box(&mut self, bounds: LatLngBounds) {
        self.viewport.set_bounding_box(bounds);
    }

    pub fn get_bounding_box(&self) -> LatLngBounds {
        self.viewport.bounding_box()
    }

    // Input

    fn dispatch_context(&self) -> DispatchContext {
        let adapter = self.adapter();
        DispatchContext {
            has_layers: !self.layers.is_empty(),
            zoom: adapter.as_ref().map_or(0, |_| self.viewport.zoom),
            min_zoom: adapter.as_ref().map_or(0, |a| a.min_zoom()),
            max_zoom: adapter.as_ref().map_or(0, |a| a.max_zoom()),
        }
    }

    pub fn mouse_press(&mut self, event: MouseEvent) {
        let context = self.dispatch_context();
        let actions = self.dispatcher.press(event, &context);
        self.run_actions(actions);
    }

    pub fn mouse_move(&mut self, event: MouseEvent) {
        let actions = self.dispatcher.mouse_move(event);
        self.run_actions(actions);
    }

    pub fn mouse_release(&mut self, event: MouseEvent) {
        let actions = self.dispatcher.release(event);
        self.run_actions(actions);
    }

    /// Returns whether the wheel event was consumed
    pub fn wheel(&mut self, event: WheelEvent) -> EventHandled {
        let context = self.dispatch_context();
        let (handled, actions) = self.dispatcher.wheel(event, &context);
        self.run_actions(actions);
        handled
    }

    fn run_actions(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::ForwardToLayers(event) => self.forward_to_layers(&event),
                Action::Pan(delta) => self.scroll(delta),
                Action::ZoomIn => self.zoom_in(),
                Action::ZoomOut => self.zoom_out(),
                Action::WheelZoomIn(anchor) => self.wheel_zoom_in(anchor),
                Action::WheelZoomOut => {
                    self.suspend_update(true);
                    self.zoom_out();
                    self.suspend_update(false);
                    self.force_redraw();
                }
                Action::CancelAnimation => {
                    self.animator.cancel(&mut self.scheduler);
                }
                Action::CommitBox { start, end } => self.commit_box(start, end),
                Action::EmitCoordinate(event) => {
                    let coordinate = self.click_to_world_coordinate(&event.position);
                    self.events
                        .emit(MapEvent::MouseCoordinate { event, coordinate });
                }
                Action::Redraw => {
                    self.gate.request_redraw();
                }
            }
        }
    }

    fn wheel_zoom_in(&mut self, anchor: Point) {
        self.suspend_update(true);
        match self.wheel_anchor {
            WheelZoomAnchor::Cursor => {
                let target = self.viewport.zoom as i32 + 1;
                self.change_zoom("wheel zoom", |viewport, adapter| {
                    viewport.zoom_at(&anchor, target, adapter)
                });
            }
            WheelZoomAnchor::Recenter => {
                let coordinate = self.click_to_world_coordinate(&anchor);
                self.set_view(coordinate);
                self.zoom_in();
            }
        }
        self.suspend_update(false);
        self.force_redraw();
    }

    fn forward_to_layers(&mut self, event: &MouseEvent) {
        let Some(adapter) = self.adapter() else {
            log::trace!("mouse event not forwarded, no map layer configured");
            return;
        };
        let projector = Projector::new(&self.viewport, adapter.as_ref());
        let hits = self.layers.forward_mouse_event(event, &projector);
        for hit in hits {
            self.events.emit(MapEvent::GeometryClicked {
                layer: hit.layer,
                geometry_id: hit.geometry_id,
            });
        }
    }

    fn commit_box(&mut self, start: Point, end: Point) {
        let Some(adapter) = self.require_adapter("box selection") else {
            return;
        };
        let start = self.viewport.screen_to_coordinate(&start, adapter.as_ref());
        let end = self.viewport.screen_to_coordinate(&end, adapter.as_ref());
        self.events.emit(MapEvent::BoxDragged {
            bounds: LatLngBounds::from_corners(start, end),
            start,
            end,
        });
    }

    pub fn set_mouse_mode(&mut self, mode: MouseMode) {
        self.dispatcher.set_mode(mode);
    }

    pub fn mouse_mode(&self) -> MouseMode {
        self.dispatcher.mode()
    }

    /// Also gates the right/middle button zoom
    pub fn enable_mouse_wheel_events(&mut self, enabled: bool) {
        self.dispatcher.set_wheel_enabled(enabled);
    }

    pub fn mouse_wheel_events_enabled(&self) -> bool {
        self.dispatcher.wheel_enabled()
    }

    pub fn is_mouse_pressed(&self) -> bool {
        self.dispatcher.is_pressed()
    }

    // Overlays and size

    pub fn show_scale(&mut self, visible: bool) {
        self.show_scale = visible;
        self.gate.request_redraw();
    }

    pub fn is_scale_visible(&self) -> bool {
        self.show_scale
    }

    pub fn show_crosshairs(&mut self, visible: bool) {
        self.show_crosshairs = visible;
        self.gate.request_redraw();
    }

    pub fn are_crosshairs_visible(&self) -> bool {
        self.show_crosshairs
    }

    /// Resizes the widget; a no-op when the size is unchanged
    pub fn resize(&mut self, size: Point) {
        if !self.viewport.set_size(size) {
            return;
        }
        log::debug!("viewport resized to {}x{}", size.x, size.y);
        self.view_changed();
        self.gate.request_redraw();
    }

    pub fn viewport_size(&self) -> Point {
        self.viewport.size
    }

    // Update gate and frames

    /// `true` acquires one suspension level, `false` releases one.
    /// Releasing the last level reports a view change deferred meanwhile.
    pub fn suspend_update(&mut self, suspend: bool) {
        if self.gate.suspend(suspend) {
            self.emit_view_changed();
        }
    }

    pub fn is_update_suspended(&self) -> bool {
        self.gate.is_suspended()
    }

    /// Requests a full recomposition; dropped while updates are suspended
    pub fn force_redraw(&mut self) {
        self.gate.request_redraw();
    }

    pub fn needs_redraw(&self) -> bool {
        self.gate.is_redraw_pending()
    }

    /// Drains tile arrivals and runs due timer tasks
    pub fn update(&mut self) {
        let arrivals = self.bridge.drain();
        if arrivals.images > 0 {
            log::trace!("{} tile images arrived", arrivals.images);
            self.force_redraw();
        }
        if arrivals.finished > 0 && self.layers.remove_zoom_image() {
            self.force_redraw();
        }

        let now = self.clock.now();
        while let Some(task) = self.scheduler.pop_due(now) {
            match task {
                TimerTask::AnimationTick => self.animation_tick(),
            }
        }
        self.scheduler.advance(now);
    }

    /// Recomposes if needed and returns the presented frame
    pub fn paint(&mut self) -> &RenderContext {
        if self.gate.is_suspended() {
            return self.compositor.front();
        }

        let resized = !self.compositor.matches_size(&self.viewport.size);
        if self.gate.take_redraw() || resized {
            let adapter = self.adapter();
            self.compositor.compose(&FrameInputs {
                viewport: &self.viewport,
                layers: &self.layers,
                adapter: adapter.as_deref(),
                show_scale: self.show_scale,
                show_crosshairs: self.show_crosshairs,
                selection: self.dispatcher.selection(),
            });
        }
        self.compositor.front()
    }

    /// Last presented frame, without recomposing
    pub fn frame(&self) -> &RenderContext {
        self.compositor.front()
    }

    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    // Imagery

    pub fn loading_queue_size(&self) -> usize {
        self.imagery.load_queue_size()
    }

    pub fn enable_persistent_cache(&mut self, config: CacheConfig) -> Result<()> {
        self.imagery.set_cache_dir(config)
    }

    pub fn set_proxy(&mut self, config: ProxyConfig) -> Result<()> {
        self.imagery.set_proxy(config)
    }

    /// Another sending handle for tile arrival notifications
    pub fn imagery_notifier(&self) -> ImageryNotifier {
        self.bridge.notifier()
    }

    // Events

    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, callback);
    }

    /// Drains queued notifications
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.events.process_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::projection::MercatorAdapter, layers::map_layer::MapLayer};

    fn control() -> MapControl {
        let mut control = MapControl::new(MapControlConfig::default().with_viewport_size(400.0, 300.0)).unwrap();
        control
            .add_layer(Box::new(MapLayer::new("osm", Arc::new(MercatorAdapter::osm()))))
            .unwrap();
        control.process_events();
        control
    }

    fn view_changes(events: &[MapEvent]) -> usize {
        events
            .iter()
            .filter(|e| e.kind() == MapEventKind::ViewChanged)
            .count()
    }

    #[test]
    fn test_navigation_without_layers_is_noop() {
        let mut control = MapControl::new(MapControlConfig::default()).unwrap();
        control.zoom_in();
        control.scroll_left(10.0);
        control.set_view(LatLng::new(10.0, 10.0));

        assert_eq!(control.current_zoom(), 0);
        assert_eq!(control.current_coordinate(), LatLng::new(0.0, 0.0));
        assert!(control.get_viewport().is_empty());
        assert_eq!(control.click_to_world_coordinate(&Point::new(5.0, 5.0)), LatLng::default());
        assert_eq!(view_changes(&control.process_events()), 0);
    }

    #[test]
    fn test_each_mutator_emits_one_view_change() {
        let mut control = control();
        control.zoom_in();
        assert_eq!(view_changes(&control.process_events()), 1);

        control.scroll_right(20.0);
        assert_eq!(view_changes(&control.process_events()), 1);

        control.set_view_all(&[LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0)]);
        assert_eq!(view_changes(&control.process_events()), 1);
    }

    #[test]
    fn test_zoom_change_records_placeholder() {
        let mut control = control();
        control.set_zoom(4);
        assert_eq!(control.layers.zoom_image().map(|z| z.from_zoom), Some(0));

        control.imagery_notifier().loading_finished();
        control.update();
        assert!(control.layers.zoom_image().is_none());
    }

    #[test]
    fn test_suspended_paint_keeps_previous_frame() {
        let mut control = control();
        let frames = {
            control.paint();
            control.compositor().frames()
        };

        control.suspend_update(true);
        control.zoom_in();
        control.paint();
        assert_eq!(control.compositor().frames(), frames);

        control.suspend_update(false);
        control.force_redraw();
        control.paint();
        assert_eq!(control.compositor().frames(), frames + 1);
    }

    #[test]
    fn test_follow_geometry_registers_once() {
        let mut control = control();
        control.follow_geometry("car");
        control.follow_geometry("car");
        assert_eq!(control.followed.len(), 1);

        control.stop_following("car");
        assert!(!control.is_following("car"));
    }
}
