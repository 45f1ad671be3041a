use crate::{
    core::{
        geo::{Point, TileCoord},
        projection::MapAdapter,
        viewport::Projector,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::RenderContext,
    Result,
};
use std::sync::Arc;

/// Base imagery layer. Owns the coordinate mapping and emits one tile
/// command per tile intersecting the viewport; fetching the imagery for
/// those tiles is the imagery service's job.
pub struct MapLayer {
    properties: LayerProperties,
    adapter: Arc<dyn MapAdapter>,
}

impl MapLayer {
    pub fn new(name: impl Into<String>, adapter: Arc<dyn MapAdapter>) -> Self {
        let mut properties = LayerProperties::new(name, LayerType::Map);
        properties.interactive = false;
        Self {
            properties,
            adapter,
        }
    }

    pub fn adapter(&self) -> &dyn MapAdapter {
        self.adapter.as_ref()
    }

    /// Tiles covering the screen at the projector's zoom
    pub fn visible_tiles(&self, projector: &Projector) -> Vec<TileCoord> {
        let zoom = projector.zoom();
        let tile_size = self.adapter.tile_size() as f64;
        // tile indices must fit TileCoord's u32
        let Some(tiles_per_side) = 1_i64
            .checked_shl(zoom as u32)
            .filter(|n| *n <= u32::MAX as i64 + 1)
        else {
            log::trace!("zoom {} beyond the addressable tile grid, no tiles", zoom);
            return Vec::new();
        };

        let nw = projector.world_origin();
        let se = nw.add(&projector.viewport.size);

        let min_x = ((nw.x / tile_size).floor() as i64).max(0);
        let min_y = ((nw.y / tile_size).floor() as i64).max(0);
        let max_x = ((se.x / tile_size).ceil() as i64).min(tiles_per_side);
        let max_y = ((se.y / tile_size).ceil() as i64).min(tiles_per_side);

        let mut tiles = Vec::new();
        for y in min_y..max_y {
            for x in min_x..max_x {
                tiles.push(TileCoord::new(x as u32, y as u32, zoom));
            }
        }
        tiles
    }

    fn tile_screen_bounds(&self, coord: &TileCoord, origin: &Point) -> (Point, Point) {
        let tile_size = self.adapter.tile_size() as f64;
        let min = Point::new(coord.x as f64 * tile_size, coord.y as f64 * tile_size).subtract(origin);
        (min, min.add(&Point::new(tile_size, tile_size)))
    }
}

impl LayerTrait for MapLayer {
    crate::impl_layer_trait!(MapLayer, properties);

    fn map_adapter(&self) -> Option<Arc<dyn MapAdapter>> {
        Some(self.adapter.clone())
    }

    fn draw_image(&self, context: &mut RenderContext, projector: &Projector) -> Result<()> {
        let origin = projector.world_origin();
        for coord in self.visible_tiles(projector) {
            let bounds = self.tile_screen_bounds(&coord, &origin);
            context.render_tile(coord, bounds, self.properties.opacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{geo::LatLng, projection::MercatorAdapter, viewport::Viewport};

    #[test]
    fn test_whole_world_at_zoom_zero() {
        let layer = MapLayer::new("osm", Arc::new(MercatorAdapter::osm()));
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 0, Point::new(800.0, 600.0));
        let projector = Projector::new(&viewport, layer.adapter());

        assert_eq!(layer.visible_tiles(&projector), vec![TileCoord::new(0, 0, 0)]);
    }

    #[test]
    fn test_tiles_cover_viewport() {
        let layer = MapLayer::new("osm", Arc::new(MercatorAdapter::osm()));
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2, Point::new(256.0, 256.0));
        let projector = Projector::new(&viewport, layer.adapter());

        let tiles = layer.visible_tiles(&projector);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.contains(&TileCoord::new(1, 1, 2)));
        assert!(tiles.contains(&TileCoord::new(2, 2, 2)));

        let mut context = RenderContext::new(256, 256);
        layer.draw_image(&mut context, &projector).unwrap();
        assert_eq!(context.get_drawing_queue().len(), 4);
    }

    #[test]
    fn test_deep_zoom_yields_no_tiles() {
        let layer = MapLayer::new("deep", Arc::new(MercatorAdapter::new(0, 70)));
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 70, Point::new(256.0, 256.0));
        let projector = Projector::new(&viewport, layer.adapter());
        assert!(layer.visible_tiles(&projector).is_empty());

        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 32, Point::new(256.0, 256.0));
        let projector = Projector::new(&viewport, layer.adapter());
        assert!(!layer.visible_tiles(&projector).is_empty());
    }

    #[test]
    fn test_map_layer_exposes_adapter() {
        let layer = MapLayer::new("osm", Arc::new(MercatorAdapter::new(3, 9)));
        assert_eq!(layer.map_adapter().map(|a| a.min_zoom()), Some(3));
        assert_eq!(layer.layer_type(), LayerType::Map);
        assert!(!layer.is_interactive());
    }
}
