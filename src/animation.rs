//! Animation mapping for UI components.

use std::time::{Duration, Instant};

/// Cubic ease-in-out mapping.
/// Input: linear progress in [0.0, 1.0].
/// Output: eased progress in [0.0, 1.0].
pub(crate) fn easing(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Time-based interpolation between two scalar values.
///
/// A glide starts when constructed and sweeps from `from` to `to` over a
/// fixed duration with eased progress. Callers sample [`Glide::value`] once
/// per frame and drop the glide once it reports finished.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Glide {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl Glide {
    pub(crate) fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            started: Instant::now(),
            duration,
        }
    }

    pub(crate) fn target(&self) -> f32 {
        self.to
    }

    pub(crate) fn value(&self) -> f32 {
        self.value_at(Instant::now())
    }

    pub(crate) fn value_at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        let fraction = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        self.from + (self.to - self.from) * easing(fraction)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished_at(Instant::now())
    }

    pub(crate) fn finished_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_endpoints() {
        assert_eq!(easing(0.0), 0.0);
        assert_eq!(easing(1.0), 1.0);
        assert!((easing(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn easing_clamps_out_of_range_input() {
        assert_eq!(easing(-3.0), 0.0);
        assert_eq!(easing(7.5), 1.0);
    }

    #[test]
    fn easing_is_monotone() {
        let mut previous = easing(0.0);
        for step in 1..=100 {
            let next = easing(step as f32 / 100.0);
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn glide_sweeps_between_endpoints() {
        let glide = Glide::new(100.0, 300.0, Duration::from_millis(200));
        let start = glide.started;
        assert_eq!(glide.value_at(start), 100.0);
        assert_eq!(glide.value_at(start + Duration::from_millis(200)), 300.0);
        assert!(!glide.finished_at(start + Duration::from_millis(100)));
        assert!(glide.finished_at(start + Duration::from_millis(200)));

        let halfway = glide.value_at(start + Duration::from_millis(100));
        assert!(halfway > 100.0 && halfway < 300.0);
    }

    #[test]
    fn zero_duration_glide_is_immediately_done() {
        let glide = Glide::new(10.0, 20.0, Duration::ZERO);
        assert_eq!(glide.value_at(glide.started), 20.0);
        assert!(glide.finished_at(glide.started));
    }
}
