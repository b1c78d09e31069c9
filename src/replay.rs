//! Scripted browsing sessions replayed against a [`Stage`] at a fixed frame interval.

use crate::{
    foundation::{
        core::{DocumentMetrics, Millis},
        error::{GuideError, GuideResult},
    },
    platform::signals::PlatformSignals,
    present::sink::Presenter,
    runtime::scheduler::Scheduler,
    session::{MemorySession, SessionStore},
    stage::{HostEvent, Stage},
};

/// A host event stamped with the time it happened.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: HostEvent,
}

/// A recorded browsing session.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Script {
    pub metrics: DocumentMetrics,
    /// Scroll offset at mount.
    #[serde(default)]
    pub offset_px: f64,
    #[serde(default)]
    pub signals: PlatformSignals,
    #[serde(default)]
    pub session: MemorySession,
    pub duration_ms: u64,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

/// Present one frame every `frame_ms` from time zero through `duration_ms`.
///
/// Events are handled at their own `at_ms`, after every timer due before them has fired, so
/// debounce and settle timing do not drift to the next frame boundary. Events past
/// `duration_ms` are dropped. Returns the number of frames presented.
pub fn replay<S: SessionStore>(
    stage: &mut Stage<S>,
    events: &[TimedEvent],
    duration_ms: u64,
    frame_ms: u64,
    sched: &mut Scheduler,
    presenter: &mut dyn Presenter,
) -> GuideResult<u64> {
    if frame_ms == 0 {
        return Err(GuideError::validation("replay frame_ms must be > 0"));
    }
    let mut ordered: Vec<&TimedEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.at_ms);
    let mut pending = ordered.into_iter().peekable();

    let mut frames = 0;
    let mut t = 0;
    while t <= duration_ms {
        while let Some(timed) = pending.next_if(|e| e.at_ms <= t) {
            stage.advance_to(Millis(timed.at_ms), sched);
            stage.handle(timed.event, sched);
        }
        stage.advance_to(Millis(t), sched);
        stage.render(sched, presenter)?;
        frames += 1;
        t += frame_ms;
    }
    tracing::debug!(frames, dropped = pending.count(), "replay finished");
    Ok(frames)
}

#[cfg(test)]
#[path = "../tests/unit/replay.rs"]
mod tests;
