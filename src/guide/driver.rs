use crate::{
    animation::{ease::Ease, tween::Tween},
    foundation::core::Viewport,
    guide::{path::PathInterpolator, pose::Pose},
    runtime::scheduler::{Scheduler, TaskId},
    scroll::tracker::ScrollSample,
};

/// Tween durations and curves for chasing the target pose.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TweenTiming {
    /// Used while the user is actively scrolling.
    pub scrolling_ms: u64,
    pub scrolling_ease: Ease,
    /// Used once scrolling has gone idle.
    pub settle_ms: u64,
    pub settle_ease: Ease,
}

impl Default for TweenTiming {
    fn default() -> Self {
        Self {
            scrolling_ms: 300,
            scrolling_ease: Ease::OutCubic,
            settle_ms: 800,
            settle_ease: Ease::OutQuart,
        }
    }
}

impl TweenTiming {
    fn pick(&self, is_scrolling: bool) -> (u64, Ease) {
        if is_scrolling {
            (self.scrolling_ms, self.scrolling_ease)
        } else {
            (self.settle_ms, self.settle_ease)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverPhase {
    /// Waiting for the hero entrance to finish; nothing is mounted.
    Settling,
    /// Output mounted at the resting pose; not yet following scroll.
    Revealing,
    /// Chasing the target pose.
    Tracking,
    Stopped,
}

/// Mount-time parameters for a [`GuideDriver`].
#[derive(Clone, Debug)]
pub struct DriverSetup {
    pub interpolator: PathInterpolator,
    pub timing: TweenTiming,
    pub resting: Pose,
    pub viewport: Viewport,
    pub settle_ms: u64,
    pub reveal_ms: u64,
}

/// Owns the rendered guide pose and tweens it toward the scroll-derived target.
#[derive(Debug)]
pub struct GuideDriver {
    interp: PathInterpolator,
    timing: TweenTiming,
    viewport: Viewport,
    phase: DriverPhase,
    rendered: Pose,
    tween: Option<Tween<Pose>>,
    latest: ScrollSample,
    last_input: Option<(f64, bool)>,
    reveal_ms: u64,
    settle_timer: Option<TaskId>,
    reveal_timer: Option<TaskId>,
    frame: Option<TaskId>,
    paused: bool,
}

impl GuideDriver {
    /// A zero `settle_ms` skips straight to `Revealing`.
    pub fn mount(setup: DriverSetup, sched: &mut Scheduler) -> Self {
        let mut driver = Self {
            interp: setup.interpolator,
            timing: setup.timing,
            viewport: setup.viewport,
            phase: DriverPhase::Settling,
            rendered: setup.resting,
            tween: None,
            latest: ScrollSample::default(),
            last_input: None,
            reveal_ms: setup.reveal_ms,
            settle_timer: None,
            reveal_timer: None,
            frame: None,
            paused: false,
        };
        if setup.settle_ms == 0 {
            driver.reveal(sched);
        } else {
            driver.settle_timer = Some(sched.set_timeout(setup.settle_ms));
        }
        driver
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn rendered(&self) -> Pose {
        self.rendered
    }

    pub fn is_tweening(&self) -> bool {
        self.tween.is_some()
    }

    /// The pose to present, or `None` while nothing should be mounted.
    pub fn output(&self) -> Option<Pose> {
        match self.phase {
            DriverPhase::Revealing | DriverPhase::Tracking => Some(self.rendered),
            DriverPhase::Settling | DriverPhase::Stopped => None,
        }
    }

    pub fn on_timeout(&mut self, id: TaskId, sched: &mut Scheduler) -> bool {
        if self.settle_timer == Some(id) {
            self.settle_timer = None;
            self.reveal(sched);
            return true;
        }
        if self.reveal_timer == Some(id) {
            self.reveal_timer = None;
            self.phase = DriverPhase::Tracking;
            self.last_input = Some((self.latest.progress, self.latest.is_scrolling));
            self.retarget(sched);
            tracing::debug!(progress = self.latest.progress, "guide tracking");
            return true;
        }
        false
    }

    fn reveal(&mut self, sched: &mut Scheduler) {
        self.phase = DriverPhase::Revealing;
        self.reveal_timer = Some(sched.set_timeout(self.reveal_ms));
        tracing::debug!("guide revealed");
    }

    pub fn on_sample(&mut self, sample: ScrollSample, sched: &mut Scheduler) {
        self.latest = sample;
        if self.phase != DriverPhase::Tracking {
            return;
        }
        let input = (sample.progress, sample.is_scrolling);
        if self.last_input != Some(input) {
            self.last_input = Some(input);
            self.retarget(sched);
        }
    }

    /// Same logical progress, new pixel space.
    pub fn on_resize(&mut self, viewport: Viewport, sched: &mut Scheduler) {
        self.viewport = viewport;
        if self.phase == DriverPhase::Tracking {
            self.retarget(sched);
        }
    }

    pub fn on_frame(&mut self, fired: &[TaskId], sched: &mut Scheduler) {
        let Some(id) = self.frame else {
            return;
        };
        if !fired.contains(&id) {
            return;
        }
        self.frame = None;
        let now = sched.now();
        let done = match &self.tween {
            Some(tween) => {
                self.rendered = tween.sample(now);
                tween.is_done(now)
            }
            None => false,
        };
        if done {
            self.tween = None;
        }
        if self.tween.is_some() {
            self.ensure_frame(sched);
        }
    }

    pub fn set_paused(&mut self, paused: bool, sched: &mut Scheduler) {
        self.paused = paused;
        if paused {
            if let Some(id) = self.frame.take() {
                sched.cancel_frame(id);
            }
        } else if self.tween.is_some() {
            self.ensure_frame(sched);
        }
    }

    /// Kill the in-flight tween (if any) and start a new one from the current interpolated
    /// pose toward the target for the latest sample.
    fn retarget(&mut self, sched: &mut Scheduler) {
        let now = sched.now();
        let target = self.interp.target_pose(self.latest.progress, self.viewport);
        let (duration_ms, ease) = self.timing.pick(self.latest.is_scrolling);
        match &mut self.tween {
            Some(tween) => {
                self.rendered = tween.sample(now);
                tween.retarget(now, target, duration_ms, ease);
            }
            None => {
                self.tween = Some(Tween::new(self.rendered, target, now, duration_ms, ease));
            }
        }
        self.ensure_frame(sched);
    }

    fn ensure_frame(&mut self, sched: &mut Scheduler) {
        if self.frame.is_none() && !self.paused {
            self.frame = Some(sched.request_frame());
        }
    }

    pub fn unmount(&mut self, sched: &mut Scheduler) {
        for id in [self.settle_timer.take(), self.reveal_timer.take()]
            .into_iter()
            .flatten()
        {
            sched.clear_timeout(id);
        }
        if let Some(id) = self.frame.take() {
            sched.cancel_frame(id);
        }
        self.tween = None;
        self.phase = DriverPhase::Stopped;
        tracing::debug!("guide driver stopped");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/guide/driver.rs"]
mod tests;
