mod common;

use common::*;
use mapctl::prelude::*;

fn has_placeholder(frame: &RenderContext) -> bool {
    frame
        .get_drawing_queue()
        .iter()
        .any(|c| matches!(c, DrawCommand::Placeholder { .. }))
}

/// Redraw gating, resizing and imagery notifications
#[cfg(test)]
mod frame_tests {
    use super::*;

    #[test]
    fn test_paint_only_recomposes_when_needed() {
        let mut control = control();
        control.paint();
        let frames = control.compositor().frames();
        assert!(!control.needs_redraw());

        control.paint();
        assert_eq!(control.compositor().frames(), frames);

        control.scroll_left(3.0);
        assert!(control.needs_redraw());
        control.paint();
        assert_eq!(control.compositor().frames(), frames + 1);
    }

    #[test]
    fn test_resize_to_same_size_is_noop() {
        let mut control = control();
        control.paint();

        control.resize(Point::new(400.0, 300.0));
        assert!(control.process_events().is_empty());
        assert!(!control.needs_redraw());
        control.paint();
        assert_eq!(control.compositor().reallocations(), 0);
    }

    #[test]
    fn test_resize_reallocates_once() {
        let mut control = control();
        control.paint();

        control.resize(Point::new(640.0, 480.0));
        assert_eq!(count(&control.process_events(), MapEventKind::ViewChanged), 1);
        assert_eq!(control.viewport_size(), Point::new(640.0, 480.0));

        let frame = control.paint();
        assert_eq!((frame.width, frame.height), (640, 480));
        control.force_redraw();
        control.paint();
        assert_eq!(control.compositor().reallocations(), 1);

        // the coordinate under the new screen middle is still the center
        let middle = control.click_to_world_coordinate(&Point::new(320.0, 240.0));
        assert_close(middle, control.current_coordinate(), 1e-9);
    }

    #[test]
    fn test_nested_suspension_defers_single_notification() {
        let mut control = control();
        control.paint();
        let frames = control.compositor().frames();

        control.suspend_update(true);
        control.suspend_update(true);
        control.zoom_in();
        control.scroll_right(40.0);
        control.paint();
        assert_eq!(control.compositor().frames(), frames);
        assert!(control.process_events().is_empty());

        control.suspend_update(false);
        assert!(control.is_update_suspended());
        assert!(control.process_events().is_empty());

        control.suspend_update(false);
        assert!(!control.is_update_suspended());
        let events = control.process_events();
        assert_eq!(count(&events, MapEventKind::ViewChanged), 1);

        // redraws requested while suspended were dropped
        assert!(!control.needs_redraw());
        control.force_redraw();
        control.paint();
        assert_eq!(control.compositor().frames(), frames + 1);
    }

    #[test]
    fn test_unmatched_release_is_ignored() {
        let mut control = control();
        control.suspend_update(false);
        assert!(!control.is_update_suspended());

        control.zoom_in();
        assert_eq!(count(&control.process_events(), MapEventKind::ViewChanged), 1);
    }

    #[test]
    fn test_suspension_without_change_stays_quiet() {
        let mut control = control();
        control.suspend_update(true);
        control.suspend_update(false);
        assert!(control.process_events().is_empty());
    }

    #[test]
    fn test_tile_arrival_requests_redraw() {
        let imagery = RecordingImagery::default();
        let mut control = control_with(ManualClock::new(), imagery.clone());
        control.paint();
        let frames = control.compositor().frames();

        imagery.notifier().image_received();
        assert!(!control.needs_redraw());
        control.update();
        assert!(control.needs_redraw());

        control.paint();
        assert_eq!(control.compositor().frames(), frames + 1);
    }

    #[test]
    fn test_loading_finished_drops_zoom_placeholder() {
        let imagery = RecordingImagery::default();
        let mut control = control_with(ManualClock::new(), imagery.clone());

        control.zoom_in();
        assert!(has_placeholder(control.paint()));

        imagery.notifier().image_received();
        control.update();
        assert!(has_placeholder(control.paint()));

        imagery.notifier().loading_finished();
        control.update();
        assert!(!has_placeholder(control.paint()));
    }

    #[test]
    fn test_imagery_configuration_forwarded() {
        let imagery = RecordingImagery::default();
        let mut control = MapControlBuilder::new()
            .with_imagery(Box::new(imagery.clone()))
            .with_persistent_cache(CacheConfig::new("/var/cache/tiles", 256))
            .with_proxy(ProxyConfig::new("proxy.local", 3128))
            .build()
            .unwrap();

        assert_eq!(
            imagery.calls(),
            vec![
                "cache:/var/cache/tiles:256".to_string(),
                "proxy:proxy.local:3128".to_string()
            ]
        );

        control
            .set_proxy(ProxyConfig::new("other.local", 8080).with_credentials("user", "secret"))
            .unwrap();
        assert_eq!(imagery.calls().len(), 3);

        imagery.set_queue(7);
        assert_eq!(control.loading_queue_size(), 7);
    }

    #[test]
    fn test_default_imagery_rejects_configuration() {
        let mut control = control_with(ManualClock::new(), RecordingImagery::default());
        assert_eq!(control.loading_queue_size(), 0);

        let mut bare = MapControlBuilder::new().build().unwrap();
        assert!(bare
            .enable_persistent_cache(CacheConfig::new("/tmp/tiles", 10))
            .is_err());
        assert!(control
            .enable_persistent_cache(CacheConfig::new("/tmp/tiles", 10))
            .is_ok());
    }

    #[test]
    fn test_overlays_follow_toggles() {
        let mut control = control();
        control.show_crosshairs(false);
        control.show_scale(true);

        let frame = control.paint();
        let labels: Vec<&str> = frame
            .get_drawing_queue()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["10 km"]);

        let border = DrawCommand::Rect {
            min: Point::new(0.0, 0.0),
            max: Point::new(400.0, 300.0),
            stroke: StrokeStyle::new(Color::BLACK, 1.0),
        };
        assert_eq!(frame.get_drawing_queue().last(), Some(&border));

        control.show_scale(false);
        let frame = control.paint();
        assert!(!frame
            .get_drawing_queue()
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { .. })));
    }

    #[test]
    fn test_scale_hidden_without_map_layer() {
        let mut control = MapControlBuilder::new().with_scale(true).build().unwrap();
        let frame = control.paint();
        assert!(!frame
            .get_drawing_queue()
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { .. })));
    }

    #[test]
    fn test_paint_at_extreme_zoom() {
        let mut control = MapControlBuilder::new()
            .with_center_and_zoom(LatLng::new(0.0, 0.0), 70)
            .with_layer(Box::new(MapLayer::new("deep", Arc::new(MercatorAdapter::new(0, 70)))))
            .build()
            .unwrap();
        assert_eq!(control.current_zoom(), 70);

        let frame = control.paint();
        assert!(!frame
            .get_drawing_queue()
            .iter()
            .any(|c| matches!(c, DrawCommand::Tile { .. })));
    }

    #[test]
    fn test_config_file_round_trip_builds_control() {
        let json = r#"{
            "viewport_size": { "x": 320.0, "y": 240.0 },
            "initial_center": { "lat": 48.2, "lng": 16.37 },
            "initial_zoom": 7,
            "initial_mouse_mode": "DraggingNoZoom",
            "show_scale": true
        }"#;
        let config = MapControlConfig::from_json_str(json).unwrap();
        let control = MapControlBuilder::new()
            .with_config(config)
            .with_layer(osm_layer())
            .build()
            .unwrap();

        assert_eq!(control.viewport_size(), Point::new(320.0, 240.0));
        assert_eq!(control.current_zoom(), 7);
        assert_eq!(control.mouse_mode(), MouseMode::DraggingNoZoom);
        assert!(control.is_scale_visible());
        assert!(control.are_crosshairs_visible());
    }
}
