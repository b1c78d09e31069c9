use super::*;
use crate::{
    guide::{driver::DriverPhase, pose::Pose},
    present::sink::Recorder,
    session::MemorySession,
};

fn metrics() -> DocumentMetrics {
    DocumentMetrics {
        viewport: Viewport::new(1200.0, 1000.0).unwrap(),
        document_height: 5000.0,
    }
}

fn desktop() -> PlatformSignals {
    PlatformSignals {
        reduced_motion: Some(false),
        viewport_width: Some(1200.0),
        device_memory_gb: Some(2.0),
        hardware_concurrency: Some(8),
        ..PlatformSignals::default()
    }
}

fn returning() -> MemorySession {
    MemorySession::new().with(PRELOADER_SEEN, "true")
}

fn config(variant: Variant) -> StageConfig {
    StageConfig {
        variant,
        ..StageConfig::default()
    }
}

fn mount(
    variant: Variant,
    signals: PlatformSignals,
    session: MemorySession,
    s: &mut Scheduler,
) -> Stage<MemorySession> {
    Stage::mount(config(variant), signals, session, metrics(), 0.0, s).unwrap()
}

fn run(stage: &mut Stage<MemorySession>, s: &mut Scheduler, until: u64) -> StageFrame {
    stage.advance_to(Millis(until), s);
    stage.frame(s)
}

#[test]
fn returning_visit_settles_after_the_hero_delay() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::Cobra, desktop(), returning(), &mut s);
    assert_eq!(stage.phase(), StagePhase::Settling);

    let f = run(&mut stage, &mut s, 1999);
    assert!(f.guide.is_none());
    assert!(stage.driver().is_none());

    let f = run(&mut stage, &mut s, 2000);
    assert_eq!(stage.phase(), StagePhase::Animating);
    assert_eq!(f.guide, Some(Pose::default()));
    assert_eq!(stage.driver().unwrap().phase(), DriverPhase::Revealing);

    run(&mut stage, &mut s, 2500);
    assert_eq!(stage.driver().unwrap().phase(), DriverPhase::Tracking);
}

#[test]
fn first_visit_waits_for_the_preloader_and_records_it() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::Cobra, desktop(), MemorySession::new(), &mut s);

    run(&mut stage, &mut s, 2000);
    assert_eq!(stage.phase(), StagePhase::Settling);
    assert!(!stage.session().contains(PRELOADER_SEEN));

    run(&mut stage, &mut s, 11_000);
    assert_eq!(stage.phase(), StagePhase::Animating);
    assert_eq!(stage.session().get(PRELOADER_SEEN).as_deref(), Some("true"));
}

#[test]
fn reduced_motion_draws_nothing_at_all() {
    let mut s = Scheduler::new();
    let signals = PlatformSignals {
        reduced_motion: Some(true),
        ..desktop()
    };
    let mut stage = mount(Variant::Cobra, signals, returning(), &mut s);
    assert_eq!(stage.phase(), StagePhase::Static);

    stage.handle(HostEvent::Scroll { offset_px: 2000.0 }, &mut s);
    stage.advance_to(Millis(5000), &mut s);
    let mut out = Recorder::new();
    stage.render(&mut s, &mut out).unwrap();
    assert!(stage.driver().is_none());
    assert_eq!(stage.scroll().progress, 0.5);

    let list = out.last().unwrap();
    assert!(list.ops.is_empty(), "{:?}", list.ops);
}

#[test]
fn downgrade_tears_down_and_never_comes_back() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::Cobra, desktop(), returning(), &mut s);
    run(&mut stage, &mut s, 2500);
    stage.handle(HostEvent::Scroll { offset_px: 1000.0 }, &mut s);
    run(&mut stage, &mut s, 2516);
    assert!(stage.driver().unwrap().is_tweening());

    stage.handle(HostEvent::MotionPreference { reduced: true }, &mut s);
    assert_eq!(stage.phase(), StagePhase::Static);
    assert!(stage.driver().is_none());
    assert_eq!(stage.frame(&mut s).progress, None);

    stage.handle(HostEvent::MotionPreference { reduced: false }, &mut s);
    run(&mut stage, &mut s, 20_000);
    assert_eq!(stage.phase(), StagePhase::Static);
    assert!(stage.driver().is_none());
    assert!(!s.has_pending_frames());
}

#[test]
fn narrow_resize_on_a_low_memory_device_downgrades() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::Trail, desktop(), returning(), &mut s);
    run(&mut stage, &mut s, 2000);
    assert!(stage.trail().is_some());

    stage.handle(
        HostEvent::Resize {
            viewport: Viewport::new(400.0, 800.0).unwrap(),
        },
        &mut s,
    );
    assert_eq!(stage.phase(), StagePhase::Static);
    assert!(stage.trail().is_none());
    assert!(!stage.gate().should_animate());
}

#[test]
fn trail_stops_while_hidden_and_remounts_when_shown() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::Trail, desktop(), returning(), &mut s);
    stage.handle(HostEvent::Scroll { offset_px: 2000.0 }, &mut s);
    run(&mut stage, &mut s, 2000);
    let mut t = 2000;
    let f = loop {
        t += 16;
        let f = run(&mut stage, &mut s, t);
        if t >= 2000 + 16 * 60 {
            break f;
        }
    };
    assert_eq!(stage.trail().unwrap().state(), TrailState::Running);
    assert!(!f.trail.unwrap().dots.is_empty());

    stage.handle(HostEvent::Visibility { visible: false }, &mut s);
    assert!(stage.trail().is_none());
    assert!(!s.has_pending_frames());
    let f = run(&mut stage, &mut s, t + 16);
    assert!(f.trail.is_none());

    // A fresh simulator grows in again from the top.
    stage.handle(HostEvent::Visibility { visible: true }, &mut s);
    let trail = stage.trail().unwrap();
    assert_eq!(trail.state(), TrailState::Running);
    assert_eq!(trail.smoothed_progress(), 0.0);
    let f = run(&mut stage, &mut s, t + 32);
    let frame = f.trail.unwrap();
    assert!(frame.smoothed_progress > 0.0 && frame.smoothed_progress < 0.1);
}

#[test]
fn hidden_tab_pauses_the_driver() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::Cobra, desktop(), returning(), &mut s);
    run(&mut stage, &mut s, 2500);
    stage.handle(HostEvent::Visibility { visible: false }, &mut s);
    stage.handle(HostEvent::Scroll { offset_px: 3000.0 }, &mut s);
    run(&mut stage, &mut s, 2516);
    let before = stage.driver().unwrap().rendered();
    run(&mut stage, &mut s, 2600);
    assert_eq!(stage.driver().unwrap().rendered(), before);

    stage.handle(HostEvent::Visibility { visible: true }, &mut s);
    run(&mut stage, &mut s, 2700);
    assert_ne!(stage.driver().unwrap().rendered(), before);
}

#[test]
fn document_growth_regenerates_the_trail_path() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::Trail, desktop(), returning(), &mut s);
    run(&mut stage, &mut s, 2000);
    stage.handle(
        HostEvent::DocumentResized {
            document_height: 7000.0,
        },
        &mut s,
    );
    let trail = stage.trail().unwrap();
    assert_eq!(trail.regenerations(), 1);
    assert_eq!(trail.path().unwrap().document_height(), 7000.0);
    assert_eq!(stage.metrics().document_height, 7000.0);
}

#[test]
fn progress_only_mounts_no_visuals() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::ProgressOnly, desktop(), MemorySession::new(), &mut s);
    assert_eq!(stage.phase(), StagePhase::Static);
    stage.handle(HostEvent::Scroll { offset_px: 4000.0 }, &mut s);
    let f = run(&mut stage, &mut s, 12_000);
    assert_eq!(f.progress, Some(1.0));
    assert!(f.guide.is_none() && f.trail.is_none());
    assert!(stage.session().contains(PRELOADER_SEEN));
}

#[test]
fn invalid_config_is_rejected_at_mount() {
    let mut s = Scheduler::new();
    let mut cfg = config(Variant::Cobra);
    cfg.timing.scroll_idle_ms = 0;
    let res = Stage::mount(cfg, desktop(), returning(), metrics(), 0.0, &mut s);
    assert!(res.is_err());
    assert_eq!(s.live().total(), 0);
}

#[test]
fn unmount_is_idempotent() {
    let mut s = Scheduler::new();
    let mut stage = mount(Variant::Cobra, desktop(), returning(), &mut s);
    run(&mut stage, &mut s, 2500);
    stage.unmount(&mut s);
    stage.unmount(&mut s);
    assert_eq!(stage.phase(), StagePhase::Unmounted);
    assert_eq!(s.live().total(), 0);

    stage.handle(HostEvent::Scroll { offset_px: 10.0 }, &mut s);
    assert_eq!(s.live().total(), 0);
}
