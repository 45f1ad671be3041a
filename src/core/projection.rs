//! The coordinate mapping capability consumed by the viewport.
//!
//! A [`MapAdapter`] converts between geographic coordinates and *world pixels*
//! at a given zoom level. World pixels are absolute: `(0, 0)` is the top-left
//! corner of the whole world at that zoom. Screen conversion happens in
//! [`crate::core::viewport`].

use crate::core::{
    constants::TILE_SIZE,
    geo::{LatLng, Point, EARTH_RADIUS},
};
use std::f64::consts::PI;

pub trait MapAdapter: Send + Sync {
    /// World pixel of `coordinate` at `zoom`
    fn coordinate_to_display(&self, coordinate: &LatLng, zoom: u8) -> Point;

    /// Coordinate at world pixel `point` at `zoom`
    fn display_to_coordinate(&self, point: &Point, zoom: u8) -> LatLng;

    fn min_zoom(&self) -> u8;

    fn max_zoom(&self) -> u8;

    fn tile_size(&self) -> u32 {
        TILE_SIZE
    }

    /// Clamp a requested zoom level into the supported range
    fn clamp_zoom(&self, zoom: i32) -> u8 {
        zoom.clamp(self.min_zoom() as i32, self.max_zoom() as i32) as u8
    }
}

/// Spherical Web Mercator (EPSG:3857) with square tiles
#[derive(Debug, Clone, PartialEq)]
pub struct MercatorAdapter {
    min_zoom: u8,
    max_zoom: u8,
    tile_size: u32,
}

impl MercatorAdapter {
    pub fn new(min_zoom: u8, max_zoom: u8) -> Self {
        Self {
            min_zoom: min_zoom.min(max_zoom),
            max_zoom: max_zoom.max(min_zoom),
            tile_size: TILE_SIZE,
        }
    }

    /// OpenStreetMap zoom range
    pub fn osm() -> Self {
        Self::new(0, 17)
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size.max(1);
        self
    }

    fn world_size(&self, zoom: u8) -> f64 {
        self.tile_size as f64 * 2_f64.powi(zoom as i32)
    }
}

impl Default for MercatorAdapter {
    fn default() -> Self {
        Self::osm()
    }
}

impl MapAdapter for MercatorAdapter {
    fn coordinate_to_display(&self, coordinate: &LatLng, zoom: u8) -> Point {
        let scale = self.world_size(zoom);
        let mercator = LatLng::new(LatLng::clamp_lat(coordinate.lat), coordinate.lng).to_mercator();

        let circumference = 2.0 * PI * EARTH_RADIUS;
        let x = (mercator.x + PI * EARTH_RADIUS) / circumference * scale;
        let y = (-mercator.y + PI * EARTH_RADIUS) / circumference * scale;
        Point::new(x, y)
    }

    fn display_to_coordinate(&self, point: &Point, zoom: u8) -> LatLng {
        let scale = self.world_size(zoom);
        let circumference = 2.0 * PI * EARTH_RADIUS;

        let x = (point.x / scale) * circumference - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (point.y / scale) * circumference;
        LatLng::from_mercator(Point::new(x, y))
    }

    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_maps_to_world_center() {
        let adapter = MercatorAdapter::osm();
        let center = adapter.coordinate_to_display(&LatLng::new(0.0, 0.0), 1);
        assert_relative_eq!(center.x, 256.0, epsilon = 1e-9);
        assert_relative_eq!(center.y, 256.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip_within_rounding() {
        let adapter = MercatorAdapter::osm();
        let berlin = LatLng::new(52.52, 13.405);
        let pixel = adapter.coordinate_to_display(&berlin, 12);
        let back = adapter.display_to_coordinate(&pixel, 12);
        assert_relative_eq!(back.lat, berlin.lat, epsilon = 1e-9);
        assert_relative_eq!(back.lng, berlin.lng, epsilon = 1e-9);
    }

    #[test]
    fn test_clamp_zoom() {
        let adapter = MercatorAdapter::new(2, 10);
        assert_eq!(adapter.clamp_zoom(-3), 2);
        assert_eq!(adapter.clamp_zoom(5), 5);
        assert_eq!(adapter.clamp_zoom(42), 10);
    }

    #[test]
    fn test_swapped_limits_are_ordered() {
        let adapter = MercatorAdapter::new(9, 3);
        assert_eq!(adapter.min_zoom(), 3);
        assert_eq!(adapter.max_zoom(), 9);
    }
}
