use super::*;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn three_point() -> GuidePath {
    GuidePath::new(vec![
        Waypoint::new(0.0, 30.0, -15.0, 1.0),
        Waypoint::new(50.0, 60.0, 0.0, 0.9),
        Waypoint::new(100.0, 90.0, 15.0, 0.8),
    ])
    .unwrap()
}

#[test]
fn quarter_progress_is_mid_first_segment() {
    let w = three_point().sample(0.25, Ease::Linear);
    assert!(approx_eq(w.x_pct, 25.0));
    assert!(approx_eq(w.y_pct, 45.0));
    assert!(approx_eq(w.rotation_deg, -7.5));
    assert!(approx_eq(w.scale, 0.95));
}

#[test]
fn boundaries_are_exact_for_every_ease() {
    let cobra = GuidePath::cobra();
    let first = cobra.waypoints()[0];
    let last = *cobra.waypoints().last().unwrap();
    for ease in [Ease::Linear, Ease::InOutCubic, Ease::OutQuart, Ease::InQuad] {
        assert_eq!(cobra.sample(0.0, ease), first);
        assert_eq!(cobra.sample(1.0, ease), last);
    }
}

#[test]
fn samples_stay_inside_bracketing_waypoints() {
    let cobra = GuidePath::cobra();
    let wps = cobra.waypoints();
    let segments = wps.len() - 1;
    for step in 0..=1000 {
        let p = step as f64 / 1000.0;
        let w = cobra.sample(p, Ease::InOutCubic);
        let i = ((p * segments as f64).floor() as usize).min(segments - 1);
        let (a, b) = (wps[i], wps[i + 1]);
        let within = |v: f64, x: f64, y: f64| v >= x.min(y) - 1e-9 && v <= x.max(y) + 1e-9;
        assert!(within(w.x_pct, a.x_pct, b.x_pct), "x at {p}");
        assert!(within(w.y_pct, a.y_pct, b.y_pct), "y at {p}");
        assert!(within(w.rotation_deg, a.rotation_deg, b.rotation_deg), "rot at {p}");
        assert!(within(w.scale, a.scale, b.scale), "scale at {p}");
    }
}

#[test]
fn opacity_envelope_defaults() {
    let fade = FadeEnvelope::default();
    assert_eq!(fade.opacity(0.0), 0.0);
    assert!(fade.opacity(1.0).abs() < 1e-9);
    assert_eq!(fade.opacity(0.5), fade.interior);
    assert!(approx_eq(fade.opacity(0.025), 0.3));
    assert!(approx_eq(fade.opacity(0.95), 0.3));
    assert_eq!(fade.opacity(0.05), fade.interior);
    assert_eq!(fade.opacity(0.9), fade.interior);
}

#[test]
fn degenerate_fade_widths_do_not_divide_by_zero() {
    let fade = FadeEnvelope {
        fade_in_end: 0.0,
        fade_out_start: 1.0,
        interior: 1.0,
    };
    assert!(fade.validate().is_ok());
    assert_eq!(fade.opacity(0.0), 1.0);
    assert_eq!(fade.opacity(1.0), 1.0);

    let inverted = FadeEnvelope {
        fade_in_end: 0.8,
        fade_out_start: 0.2,
        interior: 0.6,
    };
    assert!(inverted.validate().is_err());
}

#[test]
fn target_pose_converts_percent_to_pixels() {
    let interp = PathInterpolator {
        path: three_point(),
        ease: Ease::Linear,
        ..PathInterpolator::default()
    };
    let vp = Viewport::new(1000.0, 800.0).unwrap();
    let pose = interp.target_pose(0.25, vp);
    assert!(approx_eq(pose.x_px, 250.0));
    assert!(approx_eq(pose.y_px, 360.0));
    assert!(approx_eq(pose.scale, 0.95));
    assert_eq!(pose.opacity, 0.6);
}

#[test]
fn narrow_viewports_shrink_and_dim() {
    let interp = PathInterpolator::default();
    let wide = interp.target_pose(0.5, Viewport::new(1280.0, 800.0).unwrap());
    let narrow = interp.target_pose(0.5, Viewport::new(390.0, 800.0).unwrap());
    assert!(approx_eq(narrow.scale, wide.scale * 0.6));
    assert!(approx_eq(narrow.opacity, wide.opacity * 0.7));
}

#[test]
fn zero_viewport_collapses_to_origin() {
    let pose = PathInterpolator::default().target_pose(0.4, Viewport::new(0.0, 0.0).unwrap());
    assert_eq!(pose.x_px, 0.0);
    assert_eq!(pose.y_px, 0.0);
}

#[test]
fn short_tables_are_handled() {
    assert_eq!(sample_waypoints(&[], 0.5, Ease::Linear), None);
    let only = Waypoint::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(sample_waypoints(&[only], 0.5, Ease::Linear), Some(only));
    assert!(GuidePath::new(vec![only]).is_err());
    assert!(serde_json::from_str::<GuidePath>("[]").is_err());
}

#[test]
fn path_deserializes_from_plain_array() {
    let path: GuidePath = serde_json::from_str(
        r#"[
            { "x_pct": 0, "y_pct": 0, "rotation_deg": 0, "scale": 1 },
            { "x_pct": 10, "y_pct": 20, "rotation_deg": 30, "scale": 0.5 }
        ]"#,
    )
    .unwrap();
    assert_eq!(path.waypoints().len(), 2);
}
