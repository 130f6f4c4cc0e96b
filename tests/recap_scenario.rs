// End-to-end recap session: form submission, playback, replay and reset

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use motorecap::{
    PlaybackEngine, PlaybackState, REFERENCE_DECK, RiderRank, SlideContent, SlideId, TapZone,
    submit,
};

fn form(fields: &[(&str, &str)]) -> HashMap<String, String> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_full_recap_session() {
    let stats = submit(&form(&[
        ("userName", "Ghost"),
        ("totalDistanceKm", "12450"),
        ("totalTrips", ""),
        ("accidents", "0"),
    ]))
    .unwrap();
    assert_eq!(stats.safety_score, 98);
    assert_eq!(stats.challans.count, 0);
    assert_eq!(stats.challans.total_fine, 0);
    assert_eq!(stats.rank(), RiderRank::TarmacVeteran);

    let mut engine = PlaybackEngine::default();
    let t0 = Instant::now();
    engine.start(stats, t0).unwrap();
    assert_eq!(engine.state(), PlaybackState::Playing {
        index: 0,
        elapsed: Duration::ZERO
    });

    let mut seen = Vec::new();
    for _ in 0..REFERENCE_DECK.len() {
        seen.push(engine.active_slide().unwrap().id());
        engine.next(t0);
    }
    assert_eq!(seen, vec![
        SlideId::Intro,
        SlideId::Distance,
        SlideId::Speed,
        SlideId::Challan,
        SlideId::Safety,
        SlideId::Summary,
    ]);
    assert_eq!(engine.state(), PlaybackState::Finished);

    engine.restart(t0 + Duration::from_secs(1));
    assert_eq!(engine.state(), PlaybackState::Playing {
        index: 0,
        elapsed: Duration::ZERO
    });
    assert_eq!(engine.stats().unwrap().user_name, "Ghost");

    engine.reset();
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert!(engine.stats().is_none());
}

#[test]
fn test_safety_score_follows_accidents() {
    let crashed = submit(&form(&[
        ("userName", "Ghost"),
        ("totalDistanceKm", "12450"),
        ("accidents", "2"),
    ]))
    .unwrap();
    assert_eq!(crashed.safety_score, 60);

    let wrecked = submit(&form(&[
        ("userName", "Ghost"),
        ("totalDistanceKm", "12450"),
        ("accidents", "10"),
    ]))
    .unwrap();
    assert_eq!(wrecked.safety_score, 0);
}

#[test]
fn test_invalid_submissions_leave_engine_idle() {
    let engine = PlaybackEngine::default();
    let err = submit(&form(&[("userName", "   "), ("totalDistanceKm", "100")])).unwrap_err();
    assert!(err.is_validation());
    let err = submit(&form(&[("userName", "Ghost"), ("totalDistanceKm", "-5")])).unwrap_err();
    assert!(err.is_validation());
    assert!(engine.state().is_idle());
}

#[test]
fn test_timed_playback_with_taps() {
    let stats = submit(&form(&[
        ("userName", "Ghost"),
        ("totalDistanceKm", "12450"),
        ("topSpeedKh", "145"),
        ("challanCount", "3"),
        ("challanFine", "2500"),
    ]))
    .unwrap();
    let mut engine = PlaybackEngine::default();
    let t0 = Instant::now();
    engine.start(stats, t0).unwrap();

    // the intro times out on its own
    let mut now = t0;
    while engine.state().current_index() == Some(0) {
        now += Duration::from_millis(50);
        engine.tick(now);
    }
    assert_eq!(now - t0, Duration::from_millis(4_000));

    let distance = SlideContent::for_active(&engine.active_slide().unwrap());
    assert_eq!(distance.figure.as_deref(), Some("0"));

    assert_eq!(engine.tap(250., 300., now), Some(TapZone::Forward));
    let speed = SlideContent::for_active(&engine.active_slide().unwrap());
    assert_eq!(speed.lines, vec!["FLYING LOW?"]);

    assert_eq!(engine.tap(99., 300., now), Some(TapZone::Back));
    assert_eq!(engine.state().current_index(), Some(1));
    assert!(!engine.can_export());

    for _ in 0..4 {
        engine.next(now);
    }
    assert!(engine.can_export());
    let summary = SlideContent::for_active(&engine.active_slide().unwrap());
    assert_eq!(summary.card.unwrap().cells[0].value, "12,450");
}
