use crate::{
    foundation::{core::DocumentMetrics, math::clamp01},
    runtime::scheduler::{HostSignal, ListenerId, Scheduler, TaskId},
};

/// Last observed scroll direction. Sticky: unchanged offsets keep the previous value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
    #[default]
    None,
}

/// One reading of the document scroll position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollSample {
    /// Normalized position in `[0, 1]`; 0 is the top of the document.
    pub progress: f64,
    pub offset_px: f64,
    pub direction: ScrollDirection,
    pub is_scrolling: bool,
}

impl Default for ScrollSample {
    fn default() -> Self {
        Self {
            progress: 0.0,
            offset_px: 0.0,
            direction: ScrollDirection::None,
            is_scrolling: false,
        }
    }
}

/// `offset / (document_height - viewport_height)`, clamped; 0 when nothing can scroll.
pub fn progress_fraction(offset_px: f64, metrics: DocumentMetrics) -> f64 {
    let max = metrics.max_scroll();
    if max <= 0.0 {
        return 0.0;
    }
    clamp01(offset_px / max)
}

/// Samples document scroll and derives progress, direction and an "actively scrolling" flag.
///
/// Samples are recomputed on every event but handed to consumers at most once per frame.
/// `is_scrolling` is raised on every scroll event and cleared by a debounce timer that is
/// reset, not merely started, on each event.
#[derive(Debug)]
pub struct ScrollTracker {
    metrics: DocumentMetrics,
    sample: ScrollSample,
    idle_ms: u64,
    idle_timer: Option<TaskId>,
    flush_frame: Option<TaskId>,
    dirty: bool,
    scroll_listener: Option<ListenerId>,
    resize_listener: Option<ListenerId>,
    idle_transitions: u64,
}

impl ScrollTracker {
    pub fn mount(
        metrics: DocumentMetrics,
        offset_px: f64,
        idle_ms: u64,
        sched: &mut Scheduler,
    ) -> Self {
        let mut tracker = Self {
            metrics,
            sample: ScrollSample {
                offset_px: offset_px.max(0.0),
                ..ScrollSample::default()
            },
            idle_ms,
            idle_timer: None,
            flush_frame: None,
            dirty: false,
            scroll_listener: Some(sched.subscribe(HostSignal::Scroll)),
            resize_listener: Some(sched.subscribe(HostSignal::Resize)),
            idle_transitions: 0,
        };
        tracker.recompute(offset_px);
        tracker.mark_dirty(sched);
        tracker
    }

    pub fn sample(&self) -> ScrollSample {
        self.sample
    }

    pub fn metrics(&self) -> DocumentMetrics {
        self.metrics
    }

    pub fn is_mounted(&self) -> bool {
        self.scroll_listener.is_some()
    }

    /// Number of `is_scrolling` true-to-false transitions so far.
    pub fn idle_transitions(&self) -> u64 {
        self.idle_transitions
    }

    /// Recompute progress and direction for `offset_px`. Idempotent for a repeated offset.
    pub fn recompute(&mut self, offset_px: f64) -> ScrollSample {
        let offset_px = if offset_px.is_finite() {
            offset_px.max(0.0)
        } else {
            self.sample.offset_px
        };
        let direction = if offset_px > self.sample.offset_px {
            ScrollDirection::Down
        } else if offset_px < self.sample.offset_px {
            ScrollDirection::Up
        } else {
            self.sample.direction
        };
        self.sample = ScrollSample {
            progress: progress_fraction(offset_px, self.metrics),
            offset_px,
            direction,
            is_scrolling: self.sample.is_scrolling,
        };
        self.sample
    }

    pub fn on_scroll(&mut self, offset_px: f64, sched: &mut Scheduler) {
        if !self.is_mounted() {
            return;
        }
        self.recompute(offset_px);
        self.sample.is_scrolling = true;
        if let Some(id) = self.idle_timer.take() {
            sched.clear_timeout(id);
        }
        self.idle_timer = Some(sched.set_timeout(self.idle_ms));
        self.mark_dirty(sched);
    }

    pub fn on_resize(&mut self, metrics: DocumentMetrics, sched: &mut Scheduler) {
        if !self.is_mounted() {
            return;
        }
        self.metrics = metrics;
        self.recompute(self.sample.offset_px);
        self.mark_dirty(sched);
    }

    /// Returns `true` when `id` was this tracker's idle timer.
    pub fn on_timeout(&mut self, id: TaskId, sched: &mut Scheduler) -> bool {
        if self.idle_timer != Some(id) {
            return false;
        }
        self.idle_timer = None;
        if self.sample.is_scrolling {
            self.sample.is_scrolling = false;
            self.idle_transitions += 1;
            tracing::trace!(offset = self.sample.offset_px, "scroll idle");
            self.mark_dirty(sched);
        }
        true
    }

    /// Emit the coalesced sample if this frame belongs to the tracker and anything changed.
    pub fn on_frame(&mut self, fired: &[TaskId]) -> Option<ScrollSample> {
        let id = self.flush_frame?;
        if !fired.contains(&id) {
            return None;
        }
        self.flush_frame = None;
        if std::mem::take(&mut self.dirty) {
            Some(self.sample)
        } else {
            None
        }
    }

    fn mark_dirty(&mut self, sched: &mut Scheduler) {
        self.dirty = true;
        if self.flush_frame.is_none() {
            self.flush_frame = Some(sched.request_frame());
        }
    }

    pub fn unmount(&mut self, sched: &mut Scheduler) {
        if let Some(id) = self.scroll_listener.take() {
            sched.unsubscribe(id);
        }
        if let Some(id) = self.resize_listener.take() {
            sched.unsubscribe(id);
        }
        if let Some(id) = self.idle_timer.take() {
            sched.clear_timeout(id);
        }
        if let Some(id) = self.flush_frame.take() {
            sched.cancel_frame(id);
        }
        self.dirty = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tracker.rs"]
mod tests;
