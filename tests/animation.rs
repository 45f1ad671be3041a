mod common;

use common::*;
use mapctl::prelude::*;

const START_DELAY: Duration = Duration::from_millis(40);
const TICK: Duration = Duration::from_millis(50);

/// Animated pans driven by a manual clock
#[cfg(test)]
mod animation_tests {
    use super::*;

    #[test]
    fn test_move_to_reaches_target_in_25_ticks() {
        let clock = ManualClock::new();
        let mut control = control_with(clock.clone(), RecordingImagery::default());
        let start = control.current_coordinate();
        let target = LatLng::new(52.4, 13.6);

        assert!(control.move_to(target));
        assert!(control.is_animating());
        assert_eq!(control.animation_target(), Some(target));

        clock.advance(START_DELAY - Duration::from_millis(1));
        control.update();
        assert_eq!(control.current_coordinate(), start);

        clock.advance(Duration::from_millis(1));
        control.update();
        assert_ne!(control.current_coordinate(), start);

        for _ in 0..23 {
            clock.advance(TICK);
            control.update();
        }
        assert!(control.is_animating());
        assert_eq!(count(&control.process_events(), MapEventKind::ViewChanged), 0);

        clock.advance(TICK);
        control.update();
        assert!(!control.is_animating());
        assert_close(control.current_coordinate(), target, 1e-9);
        assert_eq!(count(&control.process_events(), MapEventKind::ViewChanged), 1);

        clock.advance(Duration::from_secs(5));
        control.update();
        assert_close(control.current_coordinate(), target, 1e-9);
    }

    #[test]
    fn test_late_update_catches_up() {
        let clock = ManualClock::new();
        let mut control = control_with(clock.clone(), RecordingImagery::default());
        let target = LatLng::new(52.0, 13.0);

        control.move_to(target);
        clock.advance(Duration::from_secs(10));
        control.update();

        assert!(!control.is_animating());
        assert_close(control.current_coordinate(), target, 1e-9);
    }

    #[test]
    fn test_second_move_to_is_rejected() {
        let clock = ManualClock::new();
        let mut control = control_with(clock.clone(), RecordingImagery::default());
        let first = LatLng::new(52.4, 13.6);

        assert!(control.move_to(first));
        clock.advance(START_DELAY);
        control.update();

        assert!(!control.move_to(LatLng::new(40.0, -3.0)));
        assert_eq!(control.animation_target(), Some(first));

        clock.advance(TICK * 30);
        control.update();
        assert_close(control.current_coordinate(), first, 1e-9);

        // idle again, so a new run is accepted
        assert!(control.move_to(LatLng::new(52.5, 13.4)));
    }

    #[test]
    fn test_press_cancels_animation() {
        let clock = ManualClock::new();
        let mut control = control_with(clock.clone(), RecordingImagery::default());

        control.move_to(LatLng::new(52.0, 13.0));
        clock.advance(START_DELAY);
        control.update();
        let stopped_at = control.current_coordinate();

        control.mouse_press(MouseEvent::press(MouseButton::Left, Point::new(10.0, 10.0)));
        assert!(!control.is_animating());

        clock.advance(Duration::from_secs(2));
        control.update();
        assert_eq!(control.current_coordinate(), stopped_at);
    }

    #[test]
    fn test_passthrough_press_keeps_animating() {
        let clock = ManualClock::new();
        let mut control = control_with(clock.clone(), RecordingImagery::default());

        control.move_to(LatLng::new(52.0, 13.0));
        control.mouse_press(
            MouseEvent::press(MouseButton::Left, Point::new(10.0, 10.0))
                .with_modifiers(KeyModifiers::shift()),
        );
        assert!(control.is_animating());
    }

    #[test]
    fn test_press_cancel_can_be_disabled() {
        let clock = ManualClock::new();
        let mut control = MapControlBuilder::new()
            .with_viewport_size(400.0, 300.0)
            .with_center_and_zoom(LatLng::new(52.52, 13.405), 10)
            .with_clock(Box::new(clock.clone()))
            .with_interaction(InteractionConfig {
                cancel_animation_on_press: false,
                ..Default::default()
            })
            .with_layer(osm_layer())
            .build()
            .unwrap();

        control.move_to(LatLng::new(52.0, 13.0));
        control.mouse_press(MouseEvent::press(MouseButton::Left, Point::new(10.0, 10.0)));
        assert!(control.is_animating());
    }

    #[test]
    fn test_custom_step_count() {
        let clock = ManualClock::new();
        let mut control = MapControlBuilder::new()
            .with_viewport_size(400.0, 300.0)
            .with_center_and_zoom(LatLng::new(52.52, 13.405), 10)
            .with_clock(Box::new(clock.clone()))
            .with_animation(AnimationConfig {
                steps: 2,
                start_delay_ms: 10,
                tick_interval_ms: 20,
            })
            .with_layer(osm_layer())
            .build()
            .unwrap();
        let target = LatLng::new(52.0, 13.0);

        control.move_to(target);
        clock.advance(Duration::from_millis(10));
        control.update();
        assert!(control.is_animating());

        clock.advance(Duration::from_millis(20));
        control.update();
        assert!(!control.is_animating());
        assert_close(control.current_coordinate(), target, 1e-9);
    }

    #[test]
    fn test_animation_aborts_without_map_layer() {
        let clock = ManualClock::new();
        let mut control = control_with(clock.clone(), RecordingImagery::default());
        let start = control.current_coordinate();

        control.move_to(LatLng::new(52.0, 13.0));
        control.remove_layer("osm");
        clock.advance(START_DELAY);
        control.update();

        assert!(!control.is_animating());
        assert_eq!(control.current_coordinate(), start);
    }
}
