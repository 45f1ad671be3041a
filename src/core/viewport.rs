use crate::core::{
    geo::{LatLng, LatLngBounds, Point},
    projection::MapAdapter,
};
use serde::{Deserialize, Serialize};

/// The current view of the map: center, zoom, and screen dimensions.
///
/// This is the only persistent navigation state. Every method that needs to
/// translate between pixels and coordinates takes the active [`MapAdapter`];
/// callers without one degrade before reaching this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: u8,
    /// The size of the viewport in pixels
    pub size: Point,
    /// Region the center is confined to while `use_bounding_box` is set
    bounding_box: LatLngBounds,
    use_bounding_box: bool,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: u8, size: Point) -> Self {
        Self {
            center: center.clamped(),
            zoom,
            size,
            bounding_box: LatLngBounds::empty(),
            use_bounding_box: false,
        }
    }

    pub fn screen_middle(&self) -> Point {
        Point::new(self.size.x / 2.0, self.size.y / 2.0)
    }

    /// Sets the viewport size, returning whether it changed
    pub fn set_size(&mut self, size: Point) -> bool {
        if self.size == size {
            return false;
        }
        self.size = size;
        true
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center.clamped();
    }

    /// World pixel of the current center
    pub fn world_middle(&self, adapter: &dyn MapAdapter) -> Point {
        adapter.coordinate_to_display(&self.center, self.zoom)
    }

    /// Screen pixel to world pixel at the current zoom
    pub fn screen_to_world(&self, pixel: &Point, adapter: &dyn MapAdapter) -> Point {
        pixel
            .subtract(&self.screen_middle())
            .add(&self.world_middle(adapter))
    }

    /// Converts screen pixel coordinates to geographical coordinates
    pub fn screen_to_coordinate(&self, pixel: &Point, adapter: &dyn MapAdapter) -> LatLng {
        adapter.display_to_coordinate(&self.screen_to_world(pixel, adapter), self.zoom)
    }

    /// Converts a geographical coordinate to screen pixel coordinates
    pub fn coordinate_to_screen(&self, coordinate: &LatLng, adapter: &dyn MapAdapter) -> Point {
        adapter
            .coordinate_to_display(coordinate, self.zoom)
            .subtract(&self.world_middle(adapter))
            .add(&self.screen_middle())
    }

    /// Shifts the center by a world pixel delta.
    ///
    /// Returns `false` when the bounding box restriction refused the move.
    pub fn scroll(&mut self, delta: &Point, adapter: &dyn MapAdapter) -> bool {
        let target = self.world_middle(adapter).add(delta);
        let new_center = adapter.display_to_coordinate(&target, self.zoom);

        if self.use_bounding_box && !self.bounding_box.contains(&new_center) {
            log::trace!("scroll refused, center would leave the bounding box");
            return false;
        }

        self.set_center(new_center);
        true
    }

    /// Sets the zoom level, clamped to the adapter range. Returns whether it changed.
    pub fn set_zoom(&mut self, zoom: i32, adapter: &dyn MapAdapter) -> bool {
        let clamped = adapter.clamp_zoom(zoom);
        if clamped as i32 != zoom {
            log::debug!("zoom {} clamped to {}", zoom, clamped);
        }
        if clamped == self.zoom {
            return false;
        }
        self.zoom = clamped;
        true
    }

    pub fn zoom_in(&mut self, adapter: &dyn MapAdapter) -> bool {
        self.set_zoom(self.zoom as i32 + 1, adapter)
    }

    pub fn zoom_out(&mut self, adapter: &dyn MapAdapter) -> bool {
        self.set_zoom(self.zoom as i32 - 1, adapter)
    }

    /// Changes the zoom level while keeping the coordinate under `anchor` fixed on screen
    pub fn zoom_at(&mut self, anchor: &Point, zoom: i32, adapter: &dyn MapAdapter) -> bool {
        let anchored = self.screen_to_coordinate(anchor, adapter);
        if !self.set_zoom(zoom, adapter) {
            return false;
        }

        let anchored_world = adapter.coordinate_to_display(&anchored, self.zoom);
        let world_middle = anchored_world
            .subtract(anchor)
            .add(&self.screen_middle());
        self.set_center(adapter.display_to_coordinate(&world_middle, self.zoom));
        true
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self, adapter: &dyn MapAdapter) -> LatLngBounds {
        let nw = self.screen_to_coordinate(&Point::new(0.0, 0.0), adapter);
        let se = self.screen_to_coordinate(&self.size, adapter);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    pub fn contains_all(&self, coordinates: &[LatLng], adapter: &dyn MapAdapter) -> bool {
        let bounds = self.bounds(adapter);
        coordinates.iter().all(|c| bounds.contains(c))
    }

    /// Centers on the bounding box of `coordinates` and zooms out until all of them are visible
    pub fn fit(&mut self, coordinates: &[LatLng], adapter: &dyn MapAdapter) -> bool {
        if coordinates.is_empty() {
            return false;
        }
        self.set_center(LatLngBounds::from_points(coordinates).center());

        while !self.contains_all(coordinates, adapter) && self.zoom > adapter.min_zoom() {
            self.zoom_out(adapter);
        }
        true
    }

    /// Like [`Viewport::fit`], but also zooms in to the tightest level that still shows every coordinate
    pub fn fit_and_zoom_in(&mut self, coordinates: &[LatLng], adapter: &dyn MapAdapter) -> bool {
        if coordinates.is_empty() {
            return false;
        }
        self.set_center(LatLngBounds::from_points(coordinates).center());

        while self.contains_all(coordinates, adapter) && self.zoom < adapter.max_zoom() {
            self.zoom_in(adapter);
        }
        while !self.contains_all(coordinates, adapter) && self.zoom > adapter.min_zoom() {
            self.zoom_out(adapter);
        }
        true
    }

    pub fn set_use_bounding_box(&mut self, enabled: bool) {
        self.use_bounding_box = enabled;
    }

    pub fn is_bounding_box_enabled(&self) -> bool {
        self.use_bounding_box
    }

    pub fn set_bounding_box(&mut self, bounds: LatLngBounds) {
        self.bounding_box = bounds;
    }

    pub fn bounding_box(&self) -> LatLngBounds {
        self.bounding_box
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0, Point::new(100.0, 100.0))
    }
}

/// A viewport paired with the active adapter, handed to layers while drawing
#[derive(Clone, Copy)]
pub struct Projector<'a> {
    pub viewport: &'a Viewport,
    pub adapter: &'a dyn MapAdapter,
}

impl<'a> Projector<'a> {
    pub fn new(viewport: &'a Viewport, adapter: &'a dyn MapAdapter) -> Self {
        Self { viewport, adapter }
    }

    pub fn zoom(&self) -> u8 {
        self.viewport.zoom
    }

    pub fn to_screen(&self, coordinate: &LatLng) -> Point {
        self.viewport.coordinate_to_screen(coordinate, self.adapter)
    }

    pub fn to_coordinate(&self, pixel: &Point) -> LatLng {
        self.viewport.screen_to_coordinate(pixel, self.adapter)
    }

    /// World pixel of the top-left screen corner
    pub fn world_origin(&self) -> Point {
        self.viewport
            .screen_to_world(&Point::new(0.0, 0.0), self.adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::projection::MercatorAdapter;
    use approx::assert_relative_eq;

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(0.0, 0.0), 3, Point::new(400.0, 300.0))
    }

    #[test]
    fn test_screen_middle_maps_to_center() {
        let adapter = MercatorAdapter::osm();
        let viewport = Viewport::new(LatLng::new(48.2, 16.37), 10, Point::new(640.0, 480.0));

        let middle = viewport.screen_to_coordinate(&viewport.screen_middle(), &adapter);
        assert_relative_eq!(middle.lat, 48.2, epsilon = 1e-9);
        assert_relative_eq!(middle.lng, 16.37, epsilon = 1e-9);
    }

    #[test]
    fn test_coordinate_round_trip() {
        let adapter = MercatorAdapter::osm();
        let viewport = viewport();
        let pixel = Point::new(37.0, 211.0);

        let coordinate = viewport.screen_to_coordinate(&pixel, &adapter);
        let back = viewport.coordinate_to_screen(&coordinate, &adapter);
        assert_relative_eq!(back.x, pixel.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, pixel.y, epsilon = 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let adapter = MercatorAdapter::new(2, 15);
        let mut viewport = viewport();

        viewport.set_zoom(1, &adapter);
        assert_eq!(viewport.zoom, 2);

        viewport.set_zoom(20, &adapter);
        assert_eq!(viewport.zoom, 15);
        assert!(!viewport.zoom_in(&adapter));
    }

    #[test]
    fn test_scroll_moves_center() {
        let adapter = MercatorAdapter::osm();
        let mut viewport = viewport();

        assert!(viewport.scroll(&Point::new(10.0, 0.0), &adapter));
        assert!(viewport.center.lng > 0.0);
        assert_relative_eq!(viewport.center.lat, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounding_box_refuses_scroll() {
        let adapter = MercatorAdapter::osm();
        let mut viewport = viewport();
        viewport.set_bounding_box(LatLngBounds::from_coords(-1.0, -1.0, 1.0, 1.0));
        viewport.set_use_bounding_box(true);

        assert!(!viewport.scroll(&Point::new(500.0, 0.0), &adapter));
        assert_eq!(viewport.center, LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let adapter = MercatorAdapter::osm();
        let mut viewport = Viewport::new(LatLng::new(40.0, -3.7), 6, Point::new(800.0, 600.0));
        let anchor = Point::new(120.0, 430.0);

        let before = viewport.screen_to_coordinate(&anchor, &adapter);
        assert!(viewport.zoom_at(&anchor, 7, &adapter));
        let after = viewport.screen_to_coordinate(&anchor, &adapter);

        assert_eq!(viewport.zoom, 7);
        assert_relative_eq!(before.lat, after.lat, epsilon = 1e-7);
        assert_relative_eq!(before.lng, after.lng, epsilon = 1e-7);
    }

    #[test]
    fn test_fit_contains_all_coordinates() {
        let adapter = MercatorAdapter::osm();
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 17, Point::new(400.0, 300.0));
        let coordinates = [LatLng::new(48.85, 2.35), LatLng::new(51.5, -0.12)];

        assert!(viewport.fit(&coordinates, &adapter));
        assert!(viewport.contains_all(&coordinates, &adapter));
    }

    #[test]
    fn test_fit_and_zoom_in_is_tightest() {
        let adapter = MercatorAdapter::osm();
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 0, Point::new(400.0, 300.0));
        let coordinates = [LatLng::new(48.85, 2.35), LatLng::new(51.5, -0.12)];

        assert!(viewport.fit_and_zoom_in(&coordinates, &adapter));
        assert!(viewport.contains_all(&coordinates, &adapter));

        let mut tighter = viewport.clone();
        tighter.zoom_in(&adapter);
        assert!(!tighter.contains_all(&coordinates, &adapter));
    }

    #[test]
    fn test_fit_with_no_coordinates_is_noop() {
        let adapter = MercatorAdapter::osm();
        let mut viewport = viewport();
        assert!(!viewport.fit(&[], &adapter));
        assert_eq!(viewport, self::viewport());
    }
}
