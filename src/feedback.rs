//! Cosmetic completion feedback.
//!
//! Nothing here feeds back into the task store. The UI reports completion
//! toggles and store changes, calls `tick` once per loop iteration, and reads
//! back what should currently be on screen: a motivational quote, a confetti
//! celebration and the typewriter tagline.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::store::{TaskStore, Toggle};
use crate::view::Progress;

pub const QUOTES: [&str; 8] = [
    "🎉 Amazing! You're crushing your goals!",
    "✨ One step closer to greatness!",
    "🚀 You're unstoppable today!",
    "💪 Keep that momentum going!",
    "🌟 Excellence is your standard!",
    "🎯 Bulls-eye! Another win!",
    "🔥 You're on fire!",
    "⚡ Productivity champion!",
];

pub const TAGLINES: [&str; 4] = [
    "Conquer your day, one task at a time...",
    "Turn your dreams into achievements...",
    "Every task completed is progress made...",
    "You've got this! Let's make it happen...",
];

pub const QUOTE_DURATION: Duration = Duration::from_secs(3);
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(3);
pub const CONFETTI_PIECES: usize = 50;

const TYPE_STEP: Duration = Duration::from_millis(100);
const ERASE_STEP: Duration = Duration::from_millis(50);
const HOLD: Duration = Duration::from_millis(2000);

/// A message shown until `expires_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: &'static str,
    pub expires_at: Instant,
}

/// Confetti positions as percentages of the screen, drawn once per trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Celebration {
    pub confetti: Vec<(u16, u16)>,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Typing,
    Holding,
    Erasing,
}

/// Tagline that types itself out, pauses, erases and moves to the next phrase.
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: &'static [&'static str],
    index: usize,
    shown: usize,
    phase: Phase,
    pending: Duration,
}

impl Typewriter {
    pub fn new(phrases: &'static [&'static str]) -> Self {
        Typewriter {
            phrases,
            index: 0,
            shown: 0,
            phase: Phase::Typing,
            pending: Duration::ZERO,
        }
    }

    fn current_len(&self) -> usize {
        self.phrases.get(self.index).map_or(0, |p| p.chars().count())
    }

    /// Advance the animation by `elapsed` wall time.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.phrases.is_empty() {
            return;
        }
        self.pending += elapsed;
        loop {
            let step = match self.phase {
                Phase::Typing => TYPE_STEP,
                Phase::Holding => HOLD,
                Phase::Erasing => ERASE_STEP,
            };
            if self.pending < step {
                break;
            }
            self.pending -= step;
            match self.phase {
                Phase::Typing => {
                    self.shown += 1;
                    if self.shown >= self.current_len() {
                        self.phase = Phase::Holding;
                    }
                }
                Phase::Holding => self.phase = Phase::Erasing,
                Phase::Erasing => {
                    self.shown = self.shown.saturating_sub(1);
                    if self.shown == 0 {
                        self.index = (self.index + 1) % self.phrases.len();
                        self.phase = Phase::Typing;
                    }
                }
            }
        }
    }

    /// The visible part of the current phrase.
    pub fn text(&self) -> String {
        self.phrases
            .get(self.index)
            .map(|p| p.chars().take(self.shown).collect())
            .unwrap_or_default()
    }

    pub fn phrase_index(&self) -> usize {
        self.index
    }
}

/// Transient feedback state owned by the UI.
#[derive(Debug)]
pub struct Feedback {
    quote: Option<Toast>,
    celebration: Option<Celebration>,
    observed_version: u64,
    last_tick: Option<Instant>,
    typewriter: Typewriter,
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new()
    }
}

impl Feedback {
    pub fn new() -> Self {
        Feedback {
            quote: None,
            celebration: None,
            observed_version: 0,
            last_tick: None,
            typewriter: Typewriter::new(&TAGLINES),
        }
    }

    /// React to a completion toggle: completing a task pops a random quote.
    pub fn on_toggle<R: Rng>(&mut self, toggle: Toggle, now: Instant, rng: &mut R) {
        if toggle != Toggle::Completed {
            return;
        }
        if let Some(&text) = QUOTES.choose(rng) {
            debug!(quote = text, "showing completion quote");
            self.quote = Some(Toast { text, expires_at: now + QUOTE_DURATION });
        }
    }

    /// Check the store after a change; celebrate when nothing is left pending.
    ///
    /// Only a new store version can trigger, so repeated calls without a
    /// mutation in between do not restart the celebration.
    pub fn observe<R: Rng>(&mut self, store: &TaskStore, now: Instant, rng: &mut R) {
        if store.version() == self.observed_version {
            return;
        }
        self.observed_version = store.version();
        if Progress::of(store.tasks()).all_done() {
            debug!(tasks = store.len(), "all tasks completed, celebrating");
            let confetti = (0..CONFETTI_PIECES)
                .map(|_| (rng.gen_range(0..100), rng.gen_range(0..100)))
                .collect();
            self.celebration = Some(Celebration {
                confetti,
                expires_at: now + CELEBRATION_DURATION,
            });
        }
    }

    /// Expire finished signals and advance the tagline.
    pub fn tick(&mut self, now: Instant) {
        if let Some(last) = self.last_tick {
            self.typewriter.advance(now.saturating_duration_since(last));
        }
        self.last_tick = Some(now);

        if self.quote.as_ref().is_some_and(|q| now >= q.expires_at) {
            self.quote = None;
        }
        if self.celebration.as_ref().is_some_and(|c| now >= c.expires_at) {
            self.celebration = None;
        }
    }

    pub fn quote(&self) -> Option<&Toast> {
        self.quote.as_ref()
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebration.as_ref()
    }

    pub fn tagline(&self) -> String {
        self.typewriter.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Category, Priority};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_quote_on_completion_only() {
        let mut feedback = Feedback::new();
        let now = Instant::now();
        feedback.on_toggle(Toggle::Reopened, now, &mut rng());
        assert!(feedback.quote().is_none());

        feedback.on_toggle(Toggle::Completed, now, &mut rng());
        let quote = feedback.quote().unwrap();
        assert!(QUOTES.contains(&quote.text));
    }

    #[test]
    fn test_quote_expires() {
        let mut feedback = Feedback::new();
        let now = Instant::now();
        feedback.on_toggle(Toggle::Completed, now, &mut rng());
        feedback.tick(now + Duration::from_secs(1));
        assert!(feedback.quote().is_some());
        feedback.tick(now + QUOTE_DURATION);
        assert!(feedback.quote().is_none());
    }

    #[test]
    fn test_celebration_when_last_task_completed() {
        let mut store = TaskStore::new();
        let mut feedback = Feedback::new();
        let now = Instant::now();
        let a = store.create("a", Category::Work, None, Priority::Low).unwrap();
        let b = store.create("b", Category::Work, None, Priority::Low).unwrap();

        store.toggle_completion(a).unwrap();
        feedback.observe(&store, now, &mut rng());
        assert!(feedback.celebration().is_none());

        store.toggle_completion(b).unwrap();
        feedback.observe(&store, now, &mut rng());
        let celebration = feedback.celebration().unwrap();
        assert_eq!(celebration.confetti.len(), CONFETTI_PIECES);
        assert!(celebration.confetti.iter().all(|&(x, y)| x < 100 && y < 100));

        feedback.tick(now + CELEBRATION_DURATION);
        assert!(feedback.celebration().is_none());
    }

    #[test]
    fn test_celebration_when_last_pending_task_deleted() {
        let mut store = TaskStore::new();
        let mut feedback = Feedback::new();
        let now = Instant::now();
        let a = store.create("a", Category::Work, None, Priority::Low).unwrap();
        let b = store.create("b", Category::Work, None, Priority::Low).unwrap();

        store.toggle_completion(a).unwrap();
        feedback.observe(&store, now, &mut rng());
        assert!(feedback.celebration().is_none());

        store.delete(b).unwrap();
        feedback.observe(&store, now, &mut rng());
        assert!(feedback.celebration().is_some());
    }

    #[test]
    fn test_no_celebration_for_empty_store() {
        let mut store = TaskStore::new();
        let mut feedback = Feedback::new();
        let a = store.create("a", Category::Work, None, Priority::Low).unwrap();
        store.delete(a).unwrap();
        feedback.observe(&store, Instant::now(), &mut rng());
        assert!(feedback.celebration().is_none());
    }

    #[test]
    fn test_celebration_needs_new_version() {
        let mut store = TaskStore::new();
        let mut feedback = Feedback::new();
        let now = Instant::now();
        let a = store.create("a", Category::Work, None, Priority::Low).unwrap();
        store.toggle_completion(a).unwrap();
        feedback.observe(&store, now, &mut rng());
        feedback.tick(now + CELEBRATION_DURATION);
        assert!(feedback.celebration().is_none());

        feedback.observe(&store, now + CELEBRATION_DURATION, &mut rng());
        assert!(feedback.celebration().is_none());
    }

    #[test]
    fn test_typewriter_cycle() {
        let mut tw = Typewriter::new(&TAGLINES);
        let len = TAGLINES[0].chars().count() as u32;
        assert_eq!(tw.text(), "");

        tw.advance(TYPE_STEP);
        assert_eq!(tw.text(), "C");

        tw.advance(TYPE_STEP * (len - 1));
        assert_eq!(tw.text(), TAGLINES[0]);

        tw.advance(HOLD - Duration::from_millis(1));
        assert_eq!(tw.text(), TAGLINES[0]);
        tw.advance(Duration::from_millis(1));

        tw.advance(ERASE_STEP);
        assert_eq!(tw.text().chars().count() as u32, len - 1);

        tw.advance(ERASE_STEP * (len - 1));
        assert_eq!(tw.text(), "");
        assert_eq!(tw.phrase_index(), 1);

        tw.advance(TYPE_STEP);
        assert_eq!(tw.text(), "T");
    }

    #[test]
    fn test_tick_drives_typewriter() {
        let mut feedback = Feedback::new();
        let start = Instant::now();
        feedback.tick(start);
        assert_eq!(feedback.tagline(), "");
        feedback.tick(start + Duration::from_millis(300));
        assert_eq!(feedback.tagline(), "Con");
    }
}
