use super::*;
use crate::trail::sim::TrailDot;

fn trail() -> TrailFrame {
    TrailFrame {
        smoothed_progress: 0.5,
        viewport_top: 2000.0,
        dots: vec![
            TrailDot {
                center: Point::new(600.0, 2500.0),
                size: 3.0,
                opacity: 0.6,
            },
            TrailDot {
                center: Point::new(640.0, 2400.0),
                size: 2.0,
                opacity: 0.5,
            },
        ],
        links: vec![(Point::new(600.0, 2500.0), Point::new(640.0, 2400.0))],
    }
}

#[test]
fn progress_bar_is_last_and_unsmoothed() {
    let frame = StageFrame {
        time: Millis(16),
        progress: Some(0.37),
        ..StageFrame::default()
    };
    let list = compile_frame(4, &frame, &TrailStyle::default());
    assert_eq!(list.frame, 4);
    assert_eq!(list.time_ms, 16);
    assert_eq!(list.ops, vec![DrawOp::ProgressBar { scale_x: 0.37 }]);
}

#[test]
fn glyph_uses_the_pose_transform() {
    let pose = Pose {
        x_px: 100.0,
        y_px: 200.0,
        rotation_deg: 90.0,
        scale: 0.5,
        opacity: 0.6,
    };
    let frame = StageFrame {
        guide: Some(pose),
        ..StageFrame::default()
    };
    let list = compile_frame(0, &frame, &TrailStyle::default());
    let DrawOp::Glyph { transform, opacity } = &list.ops[0] else {
        panic!("expected glyph, got {:?}", list.ops[0]);
    };
    assert_eq!(*opacity, 0.6);
    let p = *transform * Point::new(10.0, 0.0);
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 205.0).abs() < 1e-9);
}

#[test]
fn transparent_glyph_is_not_drawn() {
    let frame = StageFrame {
        guide: Some(Pose::default()),
        ..StageFrame::default()
    };
    let list = compile_frame(0, &frame, &TrailStyle::default());
    assert!(list.ops.is_empty());
}

#[test]
fn gated_off_frames_have_no_progress_bar() {
    let frame = StageFrame {
        time: Millis(32),
        progress: None,
        ..StageFrame::default()
    };
    let list = compile_frame(2, &frame, &TrailStyle::default());
    assert!(list.ops.is_empty());
    assert_eq!(list.time_ms, 32);
}

#[test]
fn particles_become_glow_core_and_links_in_viewport_space() {
    let style = TrailStyle::default();
    let frame = StageFrame {
        trail: Some(trail()),
        progress: Some(0.5),
        ..StageFrame::default()
    };
    let list = compile_frame(0, &frame, &style);
    // 2 dots x (glow + core) + 1 link + bar
    assert_eq!(list.ops.len(), 6);

    match &list.ops[0] {
        DrawOp::RadialGlow {
            center,
            radius,
            stops,
        } => {
            assert_eq!(*center, Point::new(600.0, 500.0));
            assert_eq!(*radius, 12.0);
            assert_eq!(stops[0].color.a, 0.6);
            assert!((stops[1].color.a - 0.18).abs() < 1e-12);
            assert_eq!(stops[2].color.a, 0.0);
        }
        other => panic!("expected glow, got {other:?}"),
    }
    match &list.ops[1] {
        DrawOp::Disc {
            radius, color, ..
        } => {
            assert_eq!(*radius, 3.0);
            assert_eq!(color.l, 70.0);
            assert_eq!(color.h, 190.0);
        }
        other => panic!("expected disc, got {other:?}"),
    }
    match &list.ops[4] {
        DrawOp::Line { from, to, color, .. } => {
            assert_eq!(*from, Point::new(600.0, 500.0));
            assert_eq!(*to, Point::new(640.0, 400.0));
            assert_eq!(color.a, 0.1);
        }
        other => panic!("expected line, got {other:?}"),
    }
}

#[test]
fn ops_serialize_with_a_tag() {
    let json = serde_json::to_value(DrawOp::ProgressBar { scale_x: 0.25 }).unwrap();
    assert_eq!(json["op"], "progress_bar");
    assert_eq!(json["scale_x"], 0.25);
}
