use super::*;

#[test]
fn linear_tween_hits_midpoint_and_end() {
    let tw = Tween::new(0.0, 10.0, Millis(100), 200, Ease::Linear);
    assert_eq!(tw.sample(Millis(0)), 0.0);
    assert_eq!(tw.sample(Millis(100)), 0.0);
    assert_eq!(tw.sample(Millis(200)), 5.0);
    assert_eq!(tw.sample(Millis(300)), 10.0);
    assert!(!tw.is_done(Millis(299)));
    assert!(tw.is_done(Millis(300)));
}

#[test]
fn zero_duration_jumps_to_target() {
    let tw = Tween::new(3.0, 7.0, Millis(50), 0, Ease::OutCubic);
    assert!(tw.is_done(Millis(50)));
    assert_eq!(tw.sample(Millis(50)), 7.0);
}

#[test]
fn retarget_starts_from_current_value() {
    let mut tw = Tween::new(0.0, 100.0, Millis(0), 100, Ease::Linear);
    tw.retarget(Millis(40), -20.0, 400, Ease::OutQuart);
    assert_eq!(tw.sample(Millis(40)), 40.0);
    assert_eq!(*tw.target(), -20.0);
    assert_eq!(tw.duration_ms(), 400);
    assert_eq!(tw.ease(), Ease::OutQuart);
    assert_eq!(tw.sample(Millis(440)), -20.0);
}

#[test]
fn points_interpolate_per_axis() {
    let tw = Tween::new(
        Point::new(0.0, 10.0),
        Point::new(10.0, 30.0),
        Millis(0),
        10,
        Ease::Linear,
    );
    assert_eq!(tw.sample(Millis(5)), Point::new(5.0, 20.0));
}
