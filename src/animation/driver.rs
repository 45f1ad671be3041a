use crate::{
    animation::scheduler::{Scheduler, TimerTask},
    core::{config::AnimationConfig, geo::LatLng, projection::MapAdapter, viewport::Viewport},
};

/// An in-flight pan toward `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRun {
    pub target: LatLng,
    pub remaining_steps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating(AnimationRun),
}

/// Result of one animation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Panned one step, another tick is scheduled
    Stepped,
    /// Panned the final step and went idle
    Completed,
    /// No active layer; the run was dropped
    Aborted,
    /// Stale tick with no run in progress
    Idle,
}

/// Linear, fixed-step pan animation.
///
/// At most one run exists at a time. A `move_to` while animating is dropped,
/// leaving the current run untouched.
#[derive(Debug, Clone)]
pub struct PanAnimator {
    state: AnimationState,
    config: AnimationConfig,
    ticks_run: u64,
}

impl PanAnimator {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            state: AnimationState::Idle,
            config,
            ticks_run: 0,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating(_))
    }

    pub fn target(&self) -> Option<LatLng> {
        match self.state {
            AnimationState::Animating(run) => Some(run.target),
            AnimationState::Idle => None,
        }
    }

    /// Total ticks processed over the animator's lifetime
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// Starts a run unless one is already active. Returns whether it started.
    pub fn move_to(&mut self, target: LatLng, scheduler: &mut Scheduler) -> bool {
        if let AnimationState::Animating(run) = self.state {
            log::debug!(
                "move_to ({}, {}) dropped, still animating toward ({}, {})",
                target.lat,
                target.lng,
                run.target.lat,
                run.target.lng
            );
            return false;
        }

        self.state = AnimationState::Animating(AnimationRun {
            target: target.clamped(),
            remaining_steps: self.config.steps.max(1),
        });
        scheduler.schedule(self.config.start_delay(), TimerTask::AnimationTick);
        true
    }

    /// Drops the active run together with its queued tick
    pub fn cancel(&mut self, scheduler: &mut Scheduler) -> bool {
        if !self.is_animating() {
            return false;
        }
        log::debug!("pan animation cancelled");
        self.state = AnimationState::Idle;
        scheduler.clear();
        true
    }

    pub fn tick(
        &mut self,
        viewport: &mut Viewport,
        adapter: Option<&dyn MapAdapter>,
        scheduler: &mut Scheduler,
    ) -> TickOutcome {
        let AnimationState::Animating(mut run) = self.state else {
            return TickOutcome::Idle;
        };
        self.ticks_run += 1;

        let Some(adapter) = adapter else {
            log::warn!("animation tick without an active map layer, aborting run");
            self.state = AnimationState::Idle;
            return TickOutcome::Aborted;
        };

        let start = viewport.world_middle(adapter);
        let dest = adapter.coordinate_to_display(&run.target, viewport.zoom);
        let step = dest.subtract(&start).divide(run.remaining_steps as f64);
        viewport.scroll(&step, adapter);

        run.remaining_steps -= 1;
        if run.remaining_steps == 0 {
            self.state = AnimationState::Idle;
            return TickOutcome::Completed;
        }

        self.state = AnimationState::Animating(run);
        scheduler.schedule(self.config.tick_interval(), TimerTask::AnimationTick);
        TickOutcome::Stepped
    }
}

impl Default for PanAnimator {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{geo::Point, projection::MercatorAdapter};
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn run_to_completion(
        animator: &mut PanAnimator,
        viewport: &mut Viewport,
        adapter: &MercatorAdapter,
        scheduler: &mut Scheduler,
    ) -> usize {
        let mut ticks = 0;
        while let Some(TimerTask::AnimationTick) = scheduler.pop_due(Duration::MAX) {
            ticks += 1;
            if animator.tick(viewport, Some(adapter), scheduler) == TickOutcome::Completed {
                break;
            }
        }
        ticks
    }

    #[test]
    fn test_move_to_completes_in_configured_steps() {
        let adapter = MercatorAdapter::osm();
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 8, Point::new(400.0, 300.0));
        let mut scheduler = Scheduler::new();
        let mut animator = PanAnimator::default();
        let target = LatLng::new(1.5, 2.5);

        assert!(animator.move_to(target, &mut scheduler));
        let ticks = run_to_completion(&mut animator, &mut viewport, &adapter, &mut scheduler);

        assert_eq!(ticks, 25);
        assert!(!animator.is_animating());
        assert_relative_eq!(viewport.center.lat, target.lat, epsilon = 1e-6);
        assert_relative_eq!(viewport.center.lng, target.lng, epsilon = 1e-6);
    }

    #[test]
    fn test_first_tick_waits_for_start_delay() {
        let mut scheduler = Scheduler::new();
        let mut animator = PanAnimator::default();
        animator.move_to(LatLng::new(1.0, 1.0), &mut scheduler);

        assert_eq!(scheduler.pop_due(Duration::from_millis(39)), None);
        assert!(scheduler.pop_due(Duration::from_millis(40)).is_some());
    }

    #[test]
    fn test_second_move_to_is_dropped() {
        let mut scheduler = Scheduler::new();
        let mut animator = PanAnimator::default();
        let first = LatLng::new(10.0, 10.0);

        assert!(animator.move_to(first, &mut scheduler));
        assert!(!animator.move_to(LatLng::new(-5.0, -5.0), &mut scheduler));
        assert_eq!(animator.target(), Some(first));
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_tick_without_adapter_aborts() {
        let mut viewport = Viewport::default();
        let mut scheduler = Scheduler::new();
        let mut animator = PanAnimator::default();
        animator.move_to(LatLng::new(1.0, 1.0), &mut scheduler);
        scheduler.pop_due(Duration::MAX);

        assert_eq!(
            animator.tick(&mut viewport, None, &mut scheduler),
            TickOutcome::Aborted
        );
        assert!(!animator.is_animating());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_drops_run_and_queued_tick() {
        let adapter = MercatorAdapter::osm();
        let mut viewport = Viewport::default();
        let mut scheduler = Scheduler::new();
        let mut animator = PanAnimator::default();
        animator.move_to(LatLng::new(1.0, 1.0), &mut scheduler);

        assert!(animator.cancel(&mut scheduler));
        assert!(!animator.cancel(&mut scheduler));
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(
            animator.tick(&mut viewport, Some(&adapter), &mut scheduler),
            TickOutcome::Idle
        );
        assert_eq!(viewport.center, LatLng::new(0.0, 0.0));
    }
}
