use is_shifty::timer::GameTimer;

#[test]
fn countdown_reports_expiry_once_and_clamps() {
    let mut timer = GameTimer::new(2);
    assert!(!timer.countdown());
    assert!(timer.countdown());
    assert!(timer.is_expired());
    assert!(!timer.countdown());
    assert_eq!(timer.seconds_left(), 0);
}

#[test]
fn advance_ticks_once_per_sixty_nominal_frames() {
    let mut timer = GameTimer::new(3);
    for _ in 0..59 {
        assert!(!timer.advance(1.0));
    }
    assert_eq!(timer.seconds_left(), 3);
    assert!(!timer.advance(1.0));
    assert_eq!(timer.seconds_left(), 2);

    for _ in 0..40 {
        timer.advance(3.0);
    }
    assert_eq!(timer.seconds_left(), 0);
}

#[test]
fn set_resets_partial_second() {
    let mut timer = GameTimer::new(5);
    timer.advance(50.0);
    timer.set(5);
    timer.advance(20.0);
    assert_eq!(timer.seconds_left(), 5);
}

#[test]
fn display_is_minutes_and_seconds() {
    assert_eq!(GameTimer::new(180).display(), "3:00");
    assert_eq!(GameTimer::new(65).display(), "1:05");
    assert_eq!(GameTimer::new(0).display(), "0:00");
}
