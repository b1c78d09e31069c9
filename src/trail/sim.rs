use crate::{
    foundation::{
        core::{DocumentMetrics, Point},
        error::{GuideError, GuideResult},
        math::{Rng64, clamp01},
    },
    runtime::scheduler::{Scheduler, TaskId},
    scroll::tracker::ScrollSample,
    trail::path::{GeneratedPath, PathShape},
};

/// Tunables for the particle trail.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    pub particle_count: usize,
    /// Delay of particle `i` along the shared timeline is `i * phase_step`.
    pub phase_step: f64,
    pub speed_multiplier: f64,
    /// Exponential smoothing factor applied to progress once per frame.
    pub smoothing: f64,
    pub base_alpha: f64,
    /// Share of each particle's travel spent fading in.
    pub fade_in_span: f64,
    /// Share of each particle's travel spent fading out.
    pub fade_out_span: f64,
    /// Particles further than this outside the viewport are not drawn.
    pub cull_margin_px: f64,
    /// Both ends of a link must be at least this opaque.
    pub link_min_opacity: f64,
    pub min_size_px: f64,
    pub size_jitter_px: f64,
    pub seed: u64,
    /// Document or viewport changes smaller than this keep the current path.
    pub regenerate_threshold_px: f64,
    pub shape: PathShape,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            particle_count: 80,
            phase_step: 0.02,
            speed_multiplier: 1.2,
            smoothing: 0.05,
            base_alpha: 0.6,
            fade_in_span: 0.2,
            fade_out_span: 0.05,
            cull_margin_px: 100.0,
            link_min_opacity: 0.1,
            min_size_px: 2.0,
            size_jitter_px: 3.0,
            seed: 0x5EED_0F_7A11,
            regenerate_threshold_px: 1.0,
            shape: PathShape::default(),
        }
    }
}

impl TrailSettings {
    pub fn validate(&self) -> GuideResult<()> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(GuideError::validation("trail smoothing must be in (0, 1]"));
        }
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier > 0.0) {
            return Err(GuideError::validation("trail speed_multiplier must be > 0"));
        }
        if !(self.phase_step.is_finite() && self.phase_step >= 0.0) {
            return Err(GuideError::validation("trail phase_step must be >= 0"));
        }
        if !(self.fade_in_span > 0.0 && self.fade_out_span > 0.0) {
            return Err(GuideError::validation("trail fade spans must be > 0"));
        }
        if !(self.min_size_px > 0.0 && self.size_jitter_px >= 0.0) {
            return Err(GuideError::validation("trail particle sizes must be > 0"));
        }
        self.shape.validate()
    }

    fn fade(&self, particle_progress: f64) -> f64 {
        let fade_in = (particle_progress / self.fade_in_span).min(1.0);
        let fade_out = if particle_progress > 1.0 - self.fade_out_span {
            (1.0 - particle_progress) / self.fade_out_span
        } else {
            1.0
        };
        fade_in * fade_out * self.base_alpha
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Particle {
    pub phase_offset: f64,
    pub base_size: f64,
    /// Document coordinates of the last update.
    pub position: Point,
    pub opacity: f64,
    /// Drawn in the most recent frame.
    pub drawn: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TrailState {
    Uninitialized,
    Loading,
    Running,
    Stopped,
}

/// A drawn particle, in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TrailDot {
    pub center: Point,
    pub size: f64,
    pub opacity: f64,
}

/// Everything one frame of the trail draws.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TrailFrame {
    pub smoothed_progress: f64,
    /// Document y of the viewport's top edge at update time.
    pub viewport_top: f64,
    pub dots: Vec<TrailDot>,
    pub links: Vec<(Point, Point)>,
}

/// Particle trail following a generated serpentine path.
#[derive(Debug)]
pub struct TrailSimulator {
    settings: TrailSettings,
    state: TrailState,
    metrics: Option<DocumentMetrics>,
    path: Option<GeneratedPath>,
    particles: Vec<Particle>,
    smoothed: f64,
    target: f64,
    viewport_top: f64,
    frame: Option<TaskId>,
    last_frame: TrailFrame,
    regenerations: u32,
}

impl TrailSimulator {
    pub fn new(settings: TrailSettings) -> Self {
        Self {
            settings,
            state: TrailState::Uninitialized,
            metrics: None,
            path: None,
            particles: Vec::new(),
            smoothed: 0.0,
            target: 0.0,
            viewport_top: 0.0,
            frame: None,
            last_frame: TrailFrame::default(),
            regenerations: 0,
        }
    }

    pub fn state(&self) -> TrailState {
        self.state
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn path(&self) -> Option<&GeneratedPath> {
        self.path.as_ref()
    }

    pub fn smoothed_progress(&self) -> f64 {
        self.smoothed
    }

    pub fn last_frame(&self) -> &TrailFrame {
        &self.last_frame
    }

    /// Times the path was rebuilt after mount.
    pub fn regenerations(&self) -> u32 {
        self.regenerations
    }

    /// Generate the path, allocate particles and start the frame loop.
    ///
    /// Only valid from `Uninitialized`; a stopped simulator must be replaced, not remounted.
    pub fn mount(&mut self, metrics: DocumentMetrics, sample: ScrollSample, sched: &mut Scheduler) {
        if self.state != TrailState::Uninitialized {
            return;
        }
        self.state = TrailState::Loading;
        tracing::debug!(
            document_height = metrics.document_height,
            particles = self.settings.particle_count,
            "trail loading"
        );

        self.metrics = Some(metrics);
        self.path = Some(GeneratedPath::generate(
            metrics.document_height,
            metrics.viewport.width,
            &self.settings.shape,
        ));
        let mut rng = Rng64::new(self.settings.seed);
        self.particles = (0..self.settings.particle_count)
            .map(|i| Particle {
                phase_offset: i as f64 * self.settings.phase_step,
                base_size: self.settings.min_size_px
                    + rng.next_f64_01() * self.settings.size_jitter_px,
                position: Point::ORIGIN,
                opacity: 0.0,
                drawn: false,
            })
            .collect();
        self.set_target(sample);
        // Grow in from the top of the document, even when mounted mid-page.
        self.smoothed = 0.0;

        self.state = TrailState::Running;
        self.frame = Some(sched.request_frame());
        tracing::debug!("trail running");
    }

    pub fn set_target(&mut self, sample: ScrollSample) {
        self.target = clamp01(sample.progress);
        self.viewport_top = sample.offset_px;
    }

    /// Regenerate the path when the document or viewport changed materially.
    pub fn on_geometry(&mut self, metrics: DocumentMetrics) {
        if self.state != TrailState::Running {
            return;
        }
        self.metrics = Some(metrics);
        let stale = self.path.as_ref().is_none_or(|p| {
            p.is_stale(
                metrics.document_height,
                metrics.viewport.width,
                self.settings.regenerate_threshold_px,
            )
        });
        if stale {
            self.path = Some(GeneratedPath::generate(
                metrics.document_height,
                metrics.viewport.width,
                &self.settings.shape,
            ));
            self.regenerations += 1;
            tracing::debug!(
                document_height = metrics.document_height,
                "trail path regenerated"
            );
        }
    }

    /// Run one frame if `fired` contains this simulator's frame request, then re-arm.
    pub fn on_frame(&mut self, fired: &[TaskId], sched: &mut Scheduler) -> bool {
        let Some(id) = self.frame else {
            return false;
        };
        if !fired.contains(&id) {
            return false;
        }
        self.frame = None;
        if self.state != TrailState::Running {
            return false;
        }
        self.last_frame = self.step();
        self.frame = Some(sched.request_frame());
        true
    }

    /// Advance smoothing one frame and recompute every particle.
    pub fn step(&mut self) -> TrailFrame {
        let s = self.settings;
        self.smoothed += (self.target - self.smoothed) * s.smoothing;

        let mut frame = TrailFrame {
            smoothed_progress: self.smoothed,
            viewport_top: self.viewport_top,
            ..TrailFrame::default()
        };
        let Some(path) = &self.path else {
            return frame;
        };
        let viewport_height = self.metrics.map_or(0.0, |m| m.viewport.height);
        let top = self.viewport_top - s.cull_margin_px;
        let bottom = self.viewport_top + viewport_height + s.cull_margin_px;

        let mut prev: Option<TrailDot> = None;
        for particle in &mut self.particles {
            particle.drawn = false;
            let progress = clamp01(self.smoothed * s.speed_multiplier - particle.phase_offset);
            if progress <= 0.0 {
                particle.opacity = 0.0;
                prev = None;
                continue;
            }

            particle.position = path.sample(progress);
            particle.opacity = s.fade(progress);

            if particle.position.y < top || particle.position.y > bottom {
                prev = None;
                continue;
            }
            particle.drawn = true;
            let dot = TrailDot {
                center: particle.position,
                size: particle.base_size,
                opacity: particle.opacity,
            };
            if let Some(p) = prev
                && p.opacity > s.link_min_opacity
                && dot.opacity > s.link_min_opacity
            {
                frame.links.push((p.center, dot.center));
            }
            frame.dots.push(dot);
            prev = Some(dot);
        }
        frame
    }

    pub fn stop(&mut self, sched: &mut Scheduler) {
        if let Some(id) = self.frame.take() {
            sched.cancel_frame(id);
        }
        if self.state != TrailState::Stopped {
            tracing::debug!(state = ?self.state, "trail stopped");
        }
        self.state = TrailState::Stopped;
        self.particles.clear();
        self.path = None;
        self.last_frame = TrailFrame::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trail/sim.rs"]
mod tests;
