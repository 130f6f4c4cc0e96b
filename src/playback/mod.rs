// Slide deck definition and the pure playback state machine

pub mod driver;
pub mod engine;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::errors::RecapError;

pub use driver::{PlaybackObserver, autoplay, next_poll};
pub use engine::{ActiveSlide, PlaybackEngine};

/// Identifies one story slide. The order of the variants is the playback order of the
/// reference deck.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SlideId {
    Intro,
    Distance,
    Speed,
    Challan,
    Safety,
    Summary,
}

impl SlideId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideId::Intro => "intro",
            SlideId::Distance => "distance",
            SlideId::Speed => "speed",
            SlideId::Challan => "challan",
            SlideId::Safety => "safety",
            SlideId::Summary => "summary",
        }
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlideSpec {
    pub id: SlideId,
    pub duration: Duration,
}

impl SlideSpec {
    pub const fn new(id: SlideId, duration_ms: u64) -> Self {
        Self {
            id,
            duration: Duration::from_millis(duration_ms),
        }
    }
}

/// The six slides of the recap, in order. The summary stays up long enough to save the card.
pub const REFERENCE_DECK: [SlideSpec; 6] = [
    SlideSpec::new(SlideId::Intro, 4_000),
    SlideSpec::new(SlideId::Distance, 5_500),
    SlideSpec::new(SlideId::Speed, 4_500),
    SlideSpec::new(SlideId::Challan, 6_000),
    SlideSpec::new(SlideId::Safety, 5_000),
    SlideSpec::new(SlideId::Summary, 15_000),
];

/// Checks that a deck can be played: at least one slide and no zero durations.
pub fn validate_deck(deck: &[SlideSpec]) -> Result<(), RecapError> {
    if deck.is_empty() {
        return Err(RecapError::EmptySlideDeck);
    }
    if let Some(slide) = deck.iter().find(|slide| slide.duration.is_zero()) {
        return Err(RecapError::ZeroSlideDuration {
            id: slide.id.to_string(),
        });
    }
    Ok(())
}

/// Where a session is in the deck.
///
/// Transitions are pure: each method consumes the current state and returns the next one.
/// Entering `Playing` always starts with `elapsed == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No stats yet
    #[default]
    Idle,
    Playing {
        index: usize,
        elapsed: Duration,
    },
    Finished,
}

impl PlaybackState {
    pub const fn started() -> Self {
        PlaybackState::Playing {
            index: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self {
            PlaybackState::Playing { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            PlaybackState::Playing { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PlaybackState::Idle)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, PlaybackState::Finished)
    }

    /// Forward step. The last slide leads to `Finished`, never past the end of the deck.
    pub fn next(self, slide_count: usize) -> Self {
        match self {
            PlaybackState::Playing { index, .. } if index + 1 < slide_count => {
                PlaybackState::Playing {
                    index: index + 1,
                    elapsed: Duration::ZERO,
                }
            }
            PlaybackState::Playing { .. } => PlaybackState::Finished,
            other => other,
        }
    }

    /// Backward step. The previous slide restarts from zero; no-op on the first slide.
    pub fn prev(self) -> Self {
        match self {
            PlaybackState::Playing { index, .. } if index > 0 => PlaybackState::Playing {
                index: index - 1,
                elapsed: Duration::ZERO,
            },
            other => other,
        }
    }

    /// Adds `delta` to the active slide's clock and takes the timeout transition once the
    /// slide's duration is reached. At most one slide is left per call.
    pub fn advance_clock(self, delta: Duration, deck: &[SlideSpec]) -> Self {
        match self {
            PlaybackState::Playing { index, elapsed } => {
                let elapsed = elapsed.saturating_add(delta);
                match deck.get(index) {
                    Some(slide) if elapsed >= slide.duration => self.next(deck.len()),
                    Some(_) => PlaybackState::Playing { index, elapsed },
                    None => PlaybackState::Finished,
                }
            }
            other => other,
        }
    }

    /// Back to the first slide. `Idle` stays `Idle` since there is nothing to replay.
    pub fn restart(self) -> Self {
        match self {
            PlaybackState::Idle => PlaybackState::Idle,
            _ => PlaybackState::started(),
        }
    }

    /// Fill fraction in `0..=1` of the progress bar of slide `slide_index`.
    pub fn progress_of(&self, slide_index: usize, deck: &[SlideSpec]) -> f32 {
        match self {
            PlaybackState::Idle => 0.,
            PlaybackState::Finished => 1.,
            PlaybackState::Playing { index, elapsed } => {
                if slide_index < *index {
                    1.
                } else if slide_index > *index {
                    0.
                } else {
                    match deck.get(slide_index) {
                        Some(slide) if !slide.duration.is_zero() => {
                            (elapsed.as_secs_f64() / slide.duration.as_secs_f64()).clamp(0., 1.)
                                as f32
                        }
                        _ => 1.,
                    }
                }
            }
        }
    }
}

/// Side of the playback surface a tap landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapZone {
    /// Left third of the surface
    Back,
    /// Remaining two thirds
    Forward,
}

impl TapZone {
    /// Classifies a tap at horizontal offset `x` (from the left edge) on a surface `width` wide.
    pub fn classify(x: f32, width: f32) -> Self {
        if x < width / 3. {
            TapZone::Back
        } else {
            TapZone::Forward
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const N: usize = REFERENCE_DECK.len();

    fn playing(index: usize, elapsed_ms: u64) -> PlaybackState {
        PlaybackState::Playing {
            index,
            elapsed: Duration::from_millis(elapsed_ms),
        }
    }

    #[test]
    fn test_reference_deck_order_and_durations() {
        let ids: Vec<&str> = REFERENCE_DECK.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["intro", "distance", "speed", "challan", "safety", "summary"]
        );
        assert_eq!(REFERENCE_DECK[0].duration, Duration::from_millis(4_000));
        assert_eq!(REFERENCE_DECK[5].duration, Duration::from_millis(15_000));
        assert!(validate_deck(&REFERENCE_DECK).is_ok());
    }

    #[test]
    fn test_deck_validation() {
        assert!(matches!(
            validate_deck(&[]),
            Err(RecapError::EmptySlideDeck)
        ));
        let deck = [
            SlideSpec::new(SlideId::Intro, 100),
            SlideSpec::new(SlideId::Speed, 0),
        ];
        assert!(matches!(
            validate_deck(&deck),
            Err(RecapError::ZeroSlideDuration { ref id }) if id == "speed"
        ));
    }

    #[test]
    fn test_next_moves_forward_and_finishes() {
        assert_eq!(playing(0, 1_200).next(N), playing(1, 0));
        assert_eq!(playing(4, 10).next(N), playing(5, 0));
        assert_eq!(playing(5, 10).next(N), PlaybackState::Finished);
        assert_eq!(PlaybackState::Idle.next(N), PlaybackState::Idle);
        assert_eq!(PlaybackState::Finished.next(N), PlaybackState::Finished);
    }

    #[test]
    fn test_prev_moves_back_with_fresh_clock() {
        assert_eq!(playing(0, 300).prev(), playing(0, 300));
        assert_eq!(playing(3, 2_500).prev(), playing(2, 0));
        assert_eq!(PlaybackState::Finished.prev(), PlaybackState::Finished);
        assert_eq!(PlaybackState::Idle.prev(), PlaybackState::Idle);
    }

    #[test]
    fn test_clock_never_advances_early() {
        let deck = REFERENCE_DECK;
        let state = playing(0, 0).advance_clock(Duration::from_millis(3_999), &deck);
        assert_eq!(state, playing(0, 3_999));
        let state = state.advance_clock(Duration::from_millis(1), &deck);
        assert_eq!(state, playing(1, 0));
    }

    #[test]
    fn test_clock_leaves_at_most_one_slide_per_step() {
        let state = playing(0, 0).advance_clock(Duration::from_secs(60), &REFERENCE_DECK);
        assert_eq!(state, playing(1, 0));
        let state = playing(5, 0).advance_clock(Duration::from_secs(60), &REFERENCE_DECK);
        assert_eq!(state, PlaybackState::Finished);
        assert_eq!(
            PlaybackState::Finished.advance_clock(Duration::from_secs(60), &REFERENCE_DECK),
            PlaybackState::Finished
        );
    }

    #[test]
    fn test_restart() {
        assert_eq!(PlaybackState::Finished.restart(), playing(0, 0));
        assert_eq!(playing(3, 100).restart(), playing(0, 0));
        assert_eq!(PlaybackState::Idle.restart(), PlaybackState::Idle);
    }

    #[test]
    fn test_progress_bars() {
        let deck = REFERENCE_DECK;
        let state = playing(2, 2_250);
        assert_eq!(state.progress_of(0, &deck), 1.);
        assert_eq!(state.progress_of(1, &deck), 1.);
        assert!((state.progress_of(2, &deck) - 0.5).abs() < 1e-6);
        assert_eq!(state.progress_of(3, &deck), 0.);
        assert_eq!(PlaybackState::Idle.progress_of(0, &deck), 0.);
        assert_eq!(PlaybackState::Finished.progress_of(5, &deck), 1.);
    }

    #[test]
    fn test_tap_zones() {
        assert_eq!(TapZone::classify(0., 300.), TapZone::Back);
        assert_eq!(TapZone::classify(99.9, 300.), TapZone::Back);
        assert_eq!(TapZone::classify(100., 300.), TapZone::Forward);
        // half way is still forward, the split is at one third
        assert_eq!(TapZone::classify(140., 300.), TapZone::Forward);
        assert_eq!(TapZone::classify(299., 300.), TapZone::Forward);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_tap_split_at_one_third(fraction in 0f32..1f32) {
            let zone = TapZone::classify(fraction, 1.);
            if fraction < 1. / 3. {
                prop_assert_eq!(zone, TapZone::Back);
            } else {
                prop_assert_eq!(zone, TapZone::Forward);
            }
        }

        #[test]
        fn prop_progress_is_monotonic_within_a_slide(
            index in 0usize..N,
            steps in proptest::collection::vec(0u64..2_000, 1..20),
        ) {
            let deck = REFERENCE_DECK;
            let mut state = playing(index, 0);
            let mut last = state.progress_of(index, &deck);
            for step in steps {
                let next = state.advance_clock(Duration::from_millis(step), &deck);
                if next.current_index() != Some(index) {
                    break;
                }
                let progress = next.progress_of(index, &deck);
                prop_assert!((0. ..=1.).contains(&progress));
                prop_assert!(progress >= last);
                last = progress;
                state = next;
            }
        }

        #[test]
        fn prop_next_never_leaves_the_deck(index in 0usize..N, elapsed in 0u64..20_000) {
            match playing(index, elapsed).next(N) {
                PlaybackState::Playing { index: next, elapsed } => {
                    prop_assert_eq!(next, index + 1);
                    prop_assert!(next < N);
                    prop_assert_eq!(elapsed, Duration::ZERO);
                }
                PlaybackState::Finished => {
                    prop_assert_eq!(index, N - 1);
                }
                PlaybackState::Idle => {
                    prop_assert!(false, "next() never goes idle");
                }
            }
        }
    }
}
