use crate::{
    config::{StageConfig, Variant},
    foundation::{
        core::{DocumentMetrics, Millis, Viewport},
        error::GuideResult,
    },
    guide::driver::{DriverSetup, GuideDriver},
    platform::{
        capability::{CapabilityGate, GateChange},
        signals::PlatformSignals,
    },
    present::{
        compile::{StageFrame, compile_frame},
        sink::Presenter,
    },
    runtime::scheduler::{HostSignal, ListenerId, Scheduler, TaskId},
    session::{PRELOADER_SEEN, SessionStore},
    scroll::tracker::{ScrollSample, ScrollTracker},
    trail::sim::{TrailSimulator, TrailState},
};

/// Input from the host page.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Scroll { offset_px: f64 },
    Resize { viewport: Viewport },
    /// Content above or below the fold changed the scrollable height.
    DocumentResized { document_height: f64 },
    MotionPreference { reduced: bool },
    Visibility { visible: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum StagePhase {
    /// Waiting for the hero (and, on a first visit, the preloader) to finish.
    Settling,
    /// The configured visual is mounted.
    Animating,
    /// No animated visual. The progress bar remains only while the gate allows animation.
    Static,
    Unmounted,
}

/// Composition root: owns the capability gate, the scroll tracker and whichever visual the
/// configured [`Variant`] selects, and routes scheduler ids back to them.
#[derive(Debug)]
pub struct Stage<S: SessionStore> {
    config: StageConfig,
    session: S,
    gate: CapabilityGate,
    metrics: DocumentMetrics,
    phase: StagePhase,
    visible: bool,
    tracker: ScrollTracker,
    driver: Option<GuideDriver>,
    trail: Option<TrailSimulator>,
    settle_timer: Option<TaskId>,
    write_preloader_flag: bool,
    motion_listener: Option<ListenerId>,
    visibility_listener: Option<ListenerId>,
    frames: u64,
}

impl<S: SessionStore> Stage<S> {
    #[tracing::instrument(
        name = "stage_mount",
        skip_all,
        fields(variant = ?config.variant, document_height = metrics.document_height)
    )]
    pub fn mount(
        config: StageConfig,
        signals: PlatformSignals,
        session: S,
        metrics: DocumentMetrics,
        offset_px: f64,
        sched: &mut Scheduler,
    ) -> GuideResult<Self> {
        config.validate()?;

        let gate = CapabilityGate::new(config.capability, signals);
        let tracker = ScrollTracker::mount(metrics, offset_px, config.timing.scroll_idle_ms, sched);

        let first_visit = !session.contains(PRELOADER_SEEN);
        let mut settle_ms = config.timing.hero_settle_ms;
        if first_visit {
            settle_ms = settle_ms.saturating_add(config.timing.preloader_ms);
        }

        let phase = if gate.should_animate() && config.variant != Variant::ProgressOnly {
            StagePhase::Settling
        } else {
            StagePhase::Static
        };
        tracing::info!(
            ?phase,
            decision = ?gate.decision(),
            settle_ms,
            first_visit,
            "stage mounted"
        );

        Ok(Self {
            config,
            session,
            gate,
            metrics,
            phase,
            visible: true,
            tracker,
            driver: None,
            trail: None,
            settle_timer: Some(sched.set_timeout(settle_ms)),
            write_preloader_flag: first_visit,
            motion_listener: Some(sched.subscribe(HostSignal::MotionPreference)),
            visibility_listener: Some(sched.subscribe(HostSignal::Visibility)),
            frames: 0,
        })
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn gate(&self) -> &CapabilityGate {
        &self.gate
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn metrics(&self) -> DocumentMetrics {
        self.metrics
    }

    pub fn scroll(&self) -> ScrollSample {
        self.tracker.sample()
    }

    pub fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    pub fn driver(&self) -> Option<&GuideDriver> {
        self.driver.as_ref()
    }

    pub fn trail(&self) -> Option<&TrailSimulator> {
        self.trail.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn handle(&mut self, event: HostEvent, sched: &mut Scheduler) {
        if self.phase == StagePhase::Unmounted {
            return;
        }
        match event {
            HostEvent::Scroll { offset_px } => self.tracker.on_scroll(offset_px, sched),
            HostEvent::Resize { viewport } => {
                self.metrics.viewport = viewport;
                self.tracker.on_resize(self.metrics, sched);
                if self.gate.on_resize(viewport.width) == GateChange::Downgraded {
                    self.downgrade(sched);
                    return;
                }
                if let Some(driver) = &mut self.driver {
                    driver.on_resize(viewport, sched);
                }
                if let Some(trail) = &mut self.trail {
                    trail.on_geometry(self.metrics);
                }
            }
            HostEvent::DocumentResized { document_height } => {
                self.metrics.document_height = document_height;
                self.tracker.on_resize(self.metrics, sched);
                if let Some(trail) = &mut self.trail {
                    trail.on_geometry(self.metrics);
                }
            }
            HostEvent::MotionPreference { reduced } => {
                if self.gate.on_motion_preference(reduced) == GateChange::Downgraded {
                    self.downgrade(sched);
                }
            }
            HostEvent::Visibility { visible } => self.on_visibility(visible, sched),
        }
    }

    /// Fire every timer due at or before `now`, then move the clock to `now`.
    pub fn advance_to(&mut self, now: Millis, sched: &mut Scheduler) {
        while let Some(id) = sched.pop_due(now) {
            self.on_timeout(id, sched);
        }
        sched.advance_to(now);
    }

    fn on_timeout(&mut self, id: TaskId, sched: &mut Scheduler) {
        if self.settle_timer == Some(id) {
            self.settle_timer = None;
            self.on_settled(sched);
            return;
        }
        if self.tracker.on_timeout(id, sched) {
            return;
        }
        if let Some(driver) = &mut self.driver {
            driver.on_timeout(id, sched);
        }
    }

    fn on_settled(&mut self, sched: &mut Scheduler) {
        if std::mem::take(&mut self.write_preloader_flag) {
            self.session.set(PRELOADER_SEEN, "true");
        }
        if self.phase != StagePhase::Settling {
            return;
        }
        self.phase = StagePhase::Animating;
        match self.config.variant {
            Variant::Cobra => {
                let mut driver = GuideDriver::mount(
                    DriverSetup {
                        interpolator: self.config.guide.interpolator.clone(),
                        timing: self.config.guide.tweens,
                        resting: self.config.guide.resting,
                        viewport: self.metrics.viewport,
                        settle_ms: 0,
                        reveal_ms: self.config.timing.reveal_ms,
                    },
                    sched,
                );
                driver.on_sample(self.tracker.sample(), sched);
                driver.set_paused(!self.visible, sched);
                self.driver = Some(driver);
            }
            Variant::Trail => {
                if self.visible {
                    self.mount_trail(sched);
                }
            }
            Variant::ProgressOnly => {}
        }
        tracing::debug!(variant = ?self.config.variant, "stage settled");
    }

    fn mount_trail(&mut self, sched: &mut Scheduler) {
        let mut trail = TrailSimulator::new(self.config.trail);
        trail.mount(self.metrics, self.tracker.sample(), sched);
        self.trail = Some(trail);
    }

    fn on_visibility(&mut self, visible: bool, sched: &mut Scheduler) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        tracing::debug!(visible, "visibility changed");
        if let Some(driver) = &mut self.driver {
            driver.set_paused(!visible, sched);
        }
        if self.phase != StagePhase::Animating || self.config.variant != Variant::Trail {
            return;
        }
        if visible {
            if self.trail.is_none() && self.gate.should_animate() {
                self.mount_trail(sched);
            }
        } else if let Some(mut trail) = self.trail.take() {
            trail.stop(sched);
        }
    }

    /// Tear down every animation resource, the progress bar included.
    fn downgrade(&mut self, sched: &mut Scheduler) {
        self.teardown_visuals(sched);
        self.phase = StagePhase::Static;
        tracing::info!(decision = ?self.gate.decision(), "animation torn down");
    }

    fn teardown_visuals(&mut self, sched: &mut Scheduler) {
        if let Some(mut driver) = self.driver.take() {
            driver.unmount(sched);
        }
        if let Some(mut trail) = self.trail.take() {
            trail.stop(sched);
        }
    }

    /// Run one display frame: deliver the coalesced scroll sample and step the visuals.
    pub fn frame(&mut self, sched: &mut Scheduler) -> StageFrame {
        let fired = sched.take_frames();
        if let Some(sample) = self.tracker.on_frame(&fired) {
            if let Some(driver) = &mut self.driver {
                driver.on_sample(sample, sched);
            }
            if let Some(trail) = &mut self.trail {
                trail.set_target(sample);
            }
        }
        if let Some(driver) = &mut self.driver {
            driver.on_frame(&fired, sched);
        }
        if let Some(trail) = &mut self.trail {
            trail.on_frame(&fired, sched);
        }

        StageFrame {
            time: sched.now(),
            progress: self
                .gate
                .should_animate()
                .then(|| self.tracker.sample().progress),
            guide: self.driver.as_ref().and_then(GuideDriver::output),
            trail: self
                .trail
                .as_ref()
                .filter(|t| t.state() == TrailState::Running)
                .map(|t| t.last_frame().clone()),
        }
    }

    /// [`Stage::frame`], compiled and handed to `presenter`.
    pub fn render(&mut self, sched: &mut Scheduler, presenter: &mut dyn Presenter) -> GuideResult<()> {
        let frame = self.frame(sched);
        let list = compile_frame(self.frames, &frame, &self.config.style);
        self.frames += 1;
        presenter.present(&list)
    }

    pub fn unmount(&mut self, sched: &mut Scheduler) {
        if self.phase == StagePhase::Unmounted {
            return;
        }
        self.teardown_visuals(sched);
        self.tracker.unmount(sched);
        if let Some(id) = self.settle_timer.take() {
            sched.clear_timeout(id);
        }
        for id in [self.motion_listener.take(), self.visibility_listener.take()]
            .into_iter()
            .flatten()
        {
            sched.unsubscribe(id);
        }
        self.phase = StagePhase::Unmounted;
        tracing::info!(frames = self.frames, "stage unmounted");
    }
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;
