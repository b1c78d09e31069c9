use super::*;

#[test]
fn spans_the_full_document() {
    let path = GeneratedPath::generate(5000.0, 1200.0, &PathShape::default());
    let pts = path.points();
    assert_eq!(pts.len(), 26);
    assert_eq!(pts[0], Point::new(600.0, 0.0));
    assert_eq!(pts.last().unwrap().y, 5000.0);
    assert!(pts.windows(2).all(|w| w[0].y < w[1].y));
}

#[test]
fn sway_stays_within_amplitude_bounds() {
    let shape = PathShape::default();
    let path = GeneratedPath::generate(12000.0, 1000.0, &shape);
    let max_offset = shape.base_amplitude_px + shape.amplitude_swing_px;
    for p in path.points() {
        assert!((p.x - 500.0).abs() <= max_offset + 1e-9);
    }
}

#[test]
fn sampling_hits_endpoints_and_interpolates() {
    let path = GeneratedPath::generate(4000.0, 800.0, &PathShape::default());
    let pts = path.points();
    assert_eq!(path.sample(0.0), pts[0]);
    assert_eq!(path.sample(1.0), *pts.last().unwrap());

    // Midway through the first segment.
    let t = 0.5 / (pts.len() - 1) as f64;
    let mid = path.sample(t);
    assert!((mid.x - (pts[0].x + pts[1].x) / 2.0).abs() < 1e-9);
    assert!((mid.y - (pts[0].y + pts[1].y) / 2.0).abs() < 1e-9);
}

#[test]
fn tiny_documents_still_have_two_points() {
    let path = GeneratedPath::generate(50.0, 400.0, &PathShape::default());
    assert_eq!(path.points().len(), 2);
    let empty = GeneratedPath::generate(f64::NAN, -3.0, &PathShape::default());
    assert_eq!(empty.points().len(), 2);
    assert_eq!(empty.document_height(), 0.0);
}

#[test]
fn staleness_uses_the_threshold() {
    let path = GeneratedPath::generate(5000.0, 1200.0, &PathShape::default());
    assert!(!path.is_stale(5000.5, 1200.0, 1.0));
    assert!(path.is_stale(5400.0, 1200.0, 1.0));
    assert!(path.is_stale(5000.0, 390.0, 1.0));
}

#[test]
fn shape_rejects_zero_spacing() {
    let shape = PathShape {
        spacing_px: 0.0,
        ..PathShape::default()
    };
    assert!(shape.validate().is_err());
}

#[test]
fn shape_rejects_sub_pixel_spacing_and_no_segments() {
    let tiny = PathShape {
        spacing_px: 1e-9,
        ..PathShape::default()
    };
    assert!(tiny.validate().is_err());
    let capped_out = PathShape {
        max_segments: 0,
        ..PathShape::default()
    };
    assert!(capped_out.validate().is_err());
}

#[test]
fn huge_documents_are_capped_and_still_span_the_height() {
    let shape = PathShape::default();
    let path = GeneratedPath::generate(1e20, 1000.0, &shape);
    let pts = path.points();
    assert_eq!(pts.len(), shape.max_segments + 1);
    assert_eq!(pts[0].y, 0.0);
    assert_eq!(pts.last().unwrap().y, 1e20);

    // Unvalidated spacing is floored rather than trusted.
    let tiny = PathShape {
        spacing_px: 1e-9,
        max_segments: 64,
        ..PathShape::default()
    };
    let path = GeneratedPath::generate(1e6, 1000.0, &tiny);
    assert_eq!(path.points().len(), 65);
}
