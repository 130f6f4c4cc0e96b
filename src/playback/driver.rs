use std::{
    thread,
    time::{Duration, Instant},
};

use log::debug;

use super::{ActiveSlide, PlaybackEngine};

/// Receives playback progress from [`autoplay`].
pub trait PlaybackObserver {
    /// Called once each time a slide becomes active.
    fn slide_entered(&mut self, slide: &ActiveSlide<'_>);

    fn finished(&mut self);
}

/// Plays an already started engine to the end without user input, polling its clock every
/// `tick_period`, or sooner when the active slide is due. Returns the number of slides shown.
pub fn autoplay(
    engine: &mut PlaybackEngine,
    tick_period: Duration,
    observer: &mut impl PlaybackObserver,
) -> usize {
    let tick_period = tick_period.max(Duration::from_millis(1));
    let mut slides_shown = 0;
    let mut last_index = None;

    while engine.state().is_playing() {
        if let Some(slide) = engine.active_slide()
            && last_index != Some(slide.index)
        {
            last_index = Some(slide.index);
            slides_shown += 1;
            observer.slide_entered(&slide);
        }

        thread::sleep(next_poll(engine, tick_period, Instant::now()));
        engine.tick(Instant::now());
    }

    if engine.state().is_finished() {
        debug!("Autoplay done after {} slides", slides_shown);
        observer.finished();
    }
    slides_shown
}

/// Time to wait before the next poll: one tick period, cut short by the active slide's deadline.
pub fn next_poll(engine: &PlaybackEngine, tick_period: Duration, now: Instant) -> Duration {
    engine
        .deadline()
        .map(|deadline| deadline.saturating_duration_since(now))
        .map_or(tick_period, |until_due| until_due.min(tick_period))
}
