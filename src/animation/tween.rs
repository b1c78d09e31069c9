use crate::{
    animation::ease::Ease,
    foundation::{core::Millis, core::Point, math::lerp},
};

/// Values that can be blended by a normalized factor.
pub trait Lerp: Sized {
    /// Blend `a` toward `b`; `t == 0` yields `a`, `t == 1` yields `b`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp(*a, *b, t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
    }
}

/// A time-bounded interpolation from `from` to `to`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: Millis,
    duration_ms: u64,
    ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn new(from: T, to: T, start: Millis, duration_ms: u64, ease: Ease) -> Self {
        Self {
            from,
            to,
            start,
            duration_ms,
            ease,
        }
    }

    /// Linear (un-eased) completion in `[0, 1]`.
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (now.since(self.start) as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Millis) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to.clone();
        }
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }

    pub fn is_done(&self, now: Millis) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn target(&self) -> &T {
        &self.to
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Replace this tween with one heading to `to`, starting from wherever it is at `now`.
    pub fn retarget(&mut self, now: Millis, to: T, duration_ms: u64, ease: Ease) {
        let from = self.sample(now);
        *self = Self::new(from, to, now, duration_ms, ease);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
