//! Scrollguide is a scroll-synchronized guide animation engine.
//!
//! A page's scroll position is turned into a normalized progress signal, and that signal drives
//! one of several visuals: a single glyph that follows an authored waypoint path, a particle
//! trail along a generated serpentine path, or just a progress bar.
//!
//! # Pipeline overview
//!
//! 1. **Gate**: platform signals -> [`CapabilityDecision`] (reduced motion, low-end heuristics)
//! 2. **Track**: scroll events -> [`ScrollSample`] (progress, direction, "is scrolling")
//! 3. **Animate**: samples -> tweened [`Pose`] ([`GuideDriver`]) or particles ([`TrailSimulator`])
//! 4. **Present**: [`StageFrame`] -> [`DisplayList`] of [`DrawOp`]s, handed to a [`Presenter`]
//!
//! [`Stage`] wires all of it together. Everything runs against a deterministic [`Scheduler`]
//! owned by the host, so timers, frame requests and listeners can be counted and torn down
//! exactly.
//!
//! The math is pure: interpolation, easing and simulation never touch IO, and degenerate
//! geometry falls back to progress 0 instead of failing.
#![forbid(unsafe_code)]

pub mod animation;
pub mod config;
pub mod foundation;
pub mod guide;
pub mod platform;
pub mod present;
pub mod replay;
pub mod runtime;
pub mod scroll;
pub mod session;
pub mod stage;
pub mod trail;

pub use animation::{
    ease::Ease,
    tween::{Lerp, Tween},
};
pub use config::{GuideConfig, StageConfig, TimingConfig, Variant};
pub use foundation::{
    core::{Affine, DocumentMetrics, Millis, Point, Vec2, Viewport},
    error::{GuideError, GuideResult},
};
pub use guide::{
    driver::{DriverPhase, DriverSetup, GuideDriver, TweenTiming},
    path::{FadeEnvelope, GuidePath, NarrowAdjust, PathInterpolator, Waypoint, sample_waypoints},
    pose::Pose,
};
pub use platform::{
    capability::{CapabilityDecision, CapabilityGate, CapabilityPolicy, GateChange},
    signals::{EffectiveType, PlatformSignals, SignalSource},
};
pub use present::{
    compile::{DisplayList, DrawOp, GradientStop, Hsla, StageFrame, TrailStyle, compile_frame},
    sink::{JsonLines, Presenter, Recorder},
};
pub use replay::{Script, TimedEvent, replay};
pub use runtime::scheduler::{
    HostSignal, ListenerId, LiveCounts, Scheduler, SchedulerLedger, TaskId,
};
pub use scroll::tracker::{ScrollDirection, ScrollSample, ScrollTracker, progress_fraction};
pub use session::{MemorySession, PRELOADER_SEEN, SessionStore};
pub use stage::{HostEvent, Stage, StagePhase};
pub use trail::{
    path::{GeneratedPath, PathShape},
    sim::{Particle, TrailDot, TrailFrame, TrailSettings, TrailSimulator, TrailState},
};
