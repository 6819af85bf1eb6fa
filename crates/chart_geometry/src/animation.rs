//! Reveal animation
//!
//! The animation is a plain state value advanced by a pure `step` call on
//! every frame tick; whoever owns the frame clock passes the current time
//! in. Restarting bumps a generation counter, so ticks scheduled for an
//! earlier run are ignored instead of fighting over the reveal value.

use crate::geometry::Rect;
use crate::model::Orientation;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;

/// Animation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationPhase {
    #[default]
    Idle,
    Running,
}

/// Progress curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Slow start and end, fast middle
    #[default]
    AccelerateDecelerate,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress; 0 and 1 are exact
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
        }
    }
}

/// Identifies one run of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationToken(u64);

/// One sampled tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealFrame {
    /// Eased reveal value in [0, 1]
    pub value: f64,
    /// This was the last frame of the run
    pub finished: bool,
}

/// Reveal animation state
#[derive(Debug, Clone, PartialEq)]
pub struct RevealAnimation {
    phase: AnimationPhase,
    /// Linear progress in [0, 1]
    progress: f64,
    duration: Duration,
    start_time: Duration,
    generation: u64,
    easing: Easing,
}

impl RevealAnimation {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            phase: AnimationPhase::Idle,
            progress: 0.0,
            duration,
            start_time: Duration::ZERO,
            generation: 0,
            easing,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == AnimationPhase::Running
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Eased value of the current progress
    pub fn reveal_value(&self) -> f64 {
        self.easing.apply(self.progress)
    }

    /// Start from zero at `now`, abandoning any run in flight.
    pub fn start(&mut self, now: Duration) -> AnimationToken {
        self.generation += 1;
        self.phase = AnimationPhase::Running;
        self.start_time = now;
        self.progress = 0.0;
        tracing::debug!(generation = self.generation, "reveal animation started");
        AnimationToken(self.generation)
    }

    /// Stop the current run; its token goes stale.
    pub fn cancel(&mut self) {
        if self.phase == AnimationPhase::Running {
            tracing::debug!(generation = self.generation, "reveal animation cancelled");
        }
        self.generation += 1;
        self.phase = AnimationPhase::Idle;
    }

    /// Advance to `now`.
    ///
    /// Returns `None` for a stale token or when idle. Progress never moves
    /// backwards, even if `now` does.
    pub fn step(&mut self, token: AnimationToken, now: Duration) -> Option<RevealFrame> {
        if token.0 != self.generation || self.phase != AnimationPhase::Running {
            return None;
        }

        let elapsed = now.saturating_sub(self.start_time);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        self.progress = self.progress.max(t);

        let finished = self.progress >= 1.0;
        if finished {
            self.phase = AnimationPhase::Idle;
        }
        let value = self.reveal_value();
        tracing::trace!(progress = self.progress, value, "reveal tick");
        Some(RevealFrame { value, finished })
    }
}

impl Default for RevealAnimation {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000), Easing::default())
    }
}

/// Part of a bar revealed at `fraction`, growing from its baseline
pub fn reveal_rect(rect: Rect, orientation: Orientation, fraction: f64) -> Rect {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction >= 1.0 {
        return rect;
    }
    match orientation {
        Orientation::Vertical => {
            let height = rect.height * fraction;
            Rect::new(rect.x, rect.bottom() - height, rect.width, height)
        }
        Orientation::Horizontal => Rect::new(rect.x, rect.y, rect.width * fraction, rect.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_easing_endpoints_exact() {
        for easing in [Easing::Linear, Easing::AccelerateDecelerate] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert!((Easing::AccelerateDecelerate.apply(0.5) - 0.5).abs() < 1e-12);
        assert!(Easing::AccelerateDecelerate.apply(0.1) < 0.1);
    }

    #[test]
    fn test_idle_running_idle() {
        let mut animation = RevealAnimation::new(ms(1000), Easing::Linear);
        assert_eq!(animation.phase(), AnimationPhase::Idle);

        let token = animation.start(ms(500));
        assert!(animation.is_running());

        let frame = animation.step(token, ms(1000)).unwrap();
        assert_eq!(frame.value, 0.5);
        assert!(!frame.finished);

        let frame = animation.step(token, ms(1600)).unwrap();
        assert_eq!(frame.value, 1.0);
        assert!(frame.finished);
        assert_eq!(animation.phase(), AnimationPhase::Idle);
        assert!(animation.step(token, ms(1700)).is_none());
    }

    #[test]
    fn test_restart_invalidates_old_token() {
        let mut animation = RevealAnimation::new(ms(1000), Easing::Linear);
        let old = animation.start(ms(0));
        animation.step(old, ms(800)).unwrap();

        let new = animation.start(ms(1000));
        assert!(animation.step(old, ms(1100)).is_none());
        let frame = animation.step(new, ms(1100)).unwrap();
        assert!((frame.value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut animation = RevealAnimation::default();
        let token = animation.start(ms(0));
        animation.cancel();

        assert_eq!(animation.phase(), AnimationPhase::Idle);
        assert!(animation.step(token, ms(100)).is_none());
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut animation = RevealAnimation::new(ms(1000), Easing::Linear);
        let token = animation.start(ms(0));
        animation.step(token, ms(600)).unwrap();

        let frame = animation.step(token, ms(300)).unwrap();
        assert_eq!(frame.value, 0.6);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut animation = RevealAnimation::new(Duration::ZERO, Easing::Linear);
        let token = animation.start(ms(10));
        let frame = animation.step(token, ms(10)).unwrap();

        assert_eq!(frame.value, 1.0);
        assert!(frame.finished);
    }

    #[test]
    fn test_reveal_rect() {
        let rect = Rect::new(10.0, 20.0, 30.0, 80.0);

        assert_eq!(reveal_rect(rect, Orientation::Vertical, 0.0), Rect::new(10.0, 100.0, 30.0, 0.0));
        assert_eq!(reveal_rect(rect, Orientation::Vertical, 0.5), Rect::new(10.0, 60.0, 30.0, 40.0));
        assert_eq!(reveal_rect(rect, Orientation::Vertical, 1.0), rect);
        assert_eq!(reveal_rect(rect, Orientation::Horizontal, 0.5), Rect::new(10.0, 20.0, 15.0, 80.0));
    }
}
