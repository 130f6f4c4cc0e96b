use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::{PlaybackState, REFERENCE_DECK, SlideId, SlideSpec, TapZone, validate_deck};
use crate::{errors::RecapError, stats::RideStats};

/// Clock of the active slide. Exactly one exists while a slide is playing; it is replaced
/// whenever the active slide changes and dropped when playback leaves `Playing`.
#[derive(Clone, Copy, Debug)]
struct SlideTimer {
    last_tick: Instant,
}

/// What the renderer needs to draw the current slide.
#[derive(Clone, Copy, Debug)]
pub struct ActiveSlide<'a> {
    pub index: usize,
    pub spec: &'a SlideSpec,
    pub stats: &'a RideStats,
    pub elapsed: Duration,
    pub progress: f32,
}

impl ActiveSlide<'_> {
    pub fn id(&self) -> SlideId {
        self.spec.id
    }
}

/// Owns a recap session: the deck, the rider's stats, the playback state and the slide timer.
///
/// Every time-sensitive operation takes the current instant, the engine never reads the clock
/// itself. Callers poll [`PlaybackEngine::tick`] at a fixed period; a slide advances on the first
/// tick at or after its duration has elapsed, so never early and at most one tick period late.
#[derive(Debug)]
pub struct PlaybackEngine {
    deck: Vec<SlideSpec>,
    state: PlaybackState,
    stats: Option<RideStats>,
    timer: Option<SlideTimer>,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self {
            deck: REFERENCE_DECK.to_vec(),
            state: PlaybackState::Idle,
            stats: None,
            timer: None,
        }
    }
}

impl PlaybackEngine {
    pub fn new(deck: Vec<SlideSpec>) -> Result<Self, RecapError> {
        validate_deck(&deck)?;
        Ok(Self {
            deck,
            ..Default::default()
        })
    }

    pub fn deck(&self) -> &[SlideSpec] {
        &self.deck
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn stats(&self) -> Option<&RideStats> {
        self.stats.as_ref()
    }

    /// Begins playback of `stats` from the first slide. Only valid while idle.
    pub fn start(&mut self, stats: RideStats, now: Instant) -> Result<(), RecapError> {
        if !self.state.is_idle() {
            warn!("Ignoring start request, playback is {:?}", self.state);
            return Err(RecapError::PlaybackAlreadyStarted);
        }
        info!("Starting recap for {}", stats.user_name);
        self.stats = Some(stats);
        self.transition(PlaybackState::started(), now, true);
        Ok(())
    }

    /// Advances the active slide's clock to `now`, taking the timeout transition when due.
    pub fn tick(&mut self, now: Instant) {
        let Some(timer) = self.timer.as_mut() else {
            return;
        };
        let delta = now.saturating_duration_since(timer.last_tick);
        timer.last_tick = now;
        let next = self.state.advance_clock(delta, &self.deck);
        let rearm = next.current_index() != self.state.current_index();
        self.transition(next, now, rearm);
    }

    pub fn next(&mut self, now: Instant) {
        let next = self.state.next(self.deck.len());
        self.transition(next, now, true);
    }

    pub fn prev(&mut self, now: Instant) {
        let next = self.state.prev();
        let rearm = next != self.state;
        self.transition(next, now, rearm);
    }

    /// Tap on the playback surface: the left third goes back, the rest goes forward.
    /// Ignored unless a slide is playing.
    pub fn tap(&mut self, x: f32, width: f32, now: Instant) -> Option<TapZone> {
        if !self.state.is_playing() {
            return None;
        }
        let zone = TapZone::classify(x, width);
        match zone {
            TapZone::Back => self.prev(now),
            TapZone::Forward => self.next(now),
        }
        Some(zone)
    }

    /// Replays the same stats from the first slide.
    pub fn restart(&mut self, now: Instant) {
        if self.stats.is_none() {
            return;
        }
        info!("Restarting recap");
        let next = self.state.restart();
        self.transition(next, now, true);
    }

    /// Drops the stats and returns to idle, whatever the current state.
    pub fn reset(&mut self) {
        info!("Resetting recap");
        self.stats = None;
        self.timer = None;
        self.state = PlaybackState::Idle;
    }

    pub fn active_slide(&self) -> Option<ActiveSlide<'_>> {
        let PlaybackState::Playing { index, elapsed } = self.state else {
            return None;
        };
        Some(ActiveSlide {
            index,
            spec: self.deck.get(index)?,
            stats: self.stats.as_ref()?,
            elapsed,
            progress: self.state.progress_of(index, &self.deck),
        })
    }

    /// Progress of every slide in deck order.
    pub fn progress(&self) -> Vec<f32> {
        (0..self.deck.len())
            .map(|index| self.state.progress_of(index, &self.deck))
            .collect()
    }

    /// The summary card can only be saved while the summary slide is on screen.
    pub fn can_export(&self) -> bool {
        self.active_slide()
            .is_some_and(|slide| slide.id() == SlideId::Summary)
    }

    /// Instant at which the active slide will time out, if one is playing.
    pub fn deadline(&self) -> Option<Instant> {
        let (timer, slide) = (self.timer?, self.active_slide()?);
        Some(timer.last_tick + slide.spec.duration.saturating_sub(slide.elapsed))
    }

    fn transition(&mut self, next: PlaybackState, now: Instant, rearm: bool) {
        let previous = self.state;
        self.state = next;

        match next {
            PlaybackState::Playing { index, .. } => {
                if rearm || self.timer.is_none() {
                    debug!(
                        "Entering slide {} ({}), timer re-armed",
                        index,
                        self.deck.get(index).map(|s| s.id.as_str()).unwrap_or("?")
                    );
                    self.timer = Some(SlideTimer { last_tick: now });
                }
            }
            PlaybackState::Finished => {
                if !previous.is_finished() {
                    info!("Recap finished");
                }
                self.timer = None;
            }
            PlaybackState::Idle => {
                self.timer = None;
            }
        }
    }
}
