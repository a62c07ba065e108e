//! Three-stage intro: preloader, tile wipe, main content.
//!
//! Stage changes go through [`transition`], a pure function of the current
//! stage and an [`IntroEvent`]. Stages only move forward, so each observer
//! callback can be reached at most once and always in order.

pub mod progress;
pub mod reveal;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    config::IntroConfig,
    host::{Document, ListenerGuard, ListenerKind, Viewport},
    timeline::{PlaybackClock, Scheduler, TimerId},
    tween::{RandomOrder, StaggerOrder},
};

pub use progress::{format_remaining, LoadingIndicator, ScrambleText};
pub use reveal::{BlockReveal, GridSize, RevealPhase, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Loading,
    Revealing,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroEvent {
    LoadingComplete,
    RevealComplete,
    /// The reveal overran its deadline.
    RevealTimedOut,
}

/// Next stage for `event`, or `None` when the event does not apply.
pub fn transition(stage: Stage, event: IntroEvent) -> Option<Stage> {
    match (stage, event) {
        (Stage::Loading, IntroEvent::LoadingComplete) => Some(Stage::Revealing),
        (Stage::Revealing, IntroEvent::RevealComplete | IntroEvent::RevealTimedOut) => {
            Some(Stage::Ready)
        }
        _ => None,
    }
}

/// Receives the two intro milestones.
pub trait IntroObserver {
    fn on_loading_complete(&mut self);
    fn on_reveal_complete(&mut self);
}

/// [`IntroObserver`] backed by two closures.
pub struct IntroCallbacks<L, R> {
    pub on_loading_complete: L,
    pub on_reveal_complete: R,
}

impl<L: FnMut(), R: FnMut()> IntroObserver for IntroCallbacks<L, R> {
    fn on_loading_complete(&mut self) {
        (self.on_loading_complete)();
    }

    fn on_reveal_complete(&mut self) {
        (self.on_reveal_complete)();
    }
}

/// Which intro visuals are mounted. The preloader stays mounted under the
/// tile grid while the reveal plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntroLayers {
    pub preloader: bool,
    pub tile_grid: bool,
    pub main_content: bool,
}

impl IntroLayers {
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Loading => Self {
                preloader: true,
                tile_grid: false,
                main_content: false,
            },
            Stage::Revealing => Self {
                preloader: true,
                tile_grid: true,
                main_content: false,
            },
            Stage::Ready => Self {
                preloader: false,
                tile_grid: false,
                main_content: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntroTimer {
    StartIndicator,
    SettleIndicator,
    SignalLoaded,
    RevealDeadline,
}

/// Drives the intro in host-supplied time steps.
pub struct IntroSequencer {
    config: IntroConfig,
    stage: Stage,
    clock: PlaybackClock,
    timers: Scheduler<IntroTimer>,
    indicator: LoadingIndicator,
    reveal: Option<BlockReveal>,
    stagger: Box<dyn StaggerOrder>,
    viewport: Viewport,
    document: Document,
    resize_listener: Option<ListenerGuard>,
    deadline: Option<TimerId>,
    /// Clock time the indicator started animating.
    indicator_started_at: Option<f32>,
    /// Clock time REVEALING was entered.
    revealing_since: f32,
    /// Clock time the current reveal run started; moved by resizes.
    reveal_started_at: f32,
    completion: Option<IntroEvent>,
    tile_container: bool,
    torn_down: bool,
}

impl IntroSequencer {
    pub fn new(config: IntroConfig, viewport: Viewport, document: Document) -> Self {
        Self::with_parts(
            config,
            viewport,
            document,
            Box::new(RandomOrder::from_entropy()),
            StdRng::from_entropy(),
        )
    }

    /// Deterministic sequencer: the stagger order and the label scramble are
    /// both derived from `seed`.
    pub fn seeded(config: IntroConfig, viewport: Viewport, document: Document, seed: u64) -> Self {
        Self::with_parts(
            config,
            viewport,
            document,
            Box::new(RandomOrder::seeded(seed)),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        )
    }

    pub fn with_stagger(mut self, stagger: Box<dyn StaggerOrder>) -> Self {
        self.stagger = stagger;
        self
    }

    fn with_parts(
        config: IntroConfig,
        viewport: Viewport,
        document: Document,
        stagger: Box<dyn StaggerOrder>,
        rng: StdRng,
    ) -> Self {
        let indicator = LoadingIndicator::new(config.effective_progress_duration(), rng);
        let clock = PlaybackClock::default();
        let mut timers = Scheduler::new();
        timers.schedule_after(&clock, config.start_delay_seconds, IntroTimer::StartIndicator);

        Self {
            config,
            stage: Stage::Loading,
            clock,
            timers,
            indicator,
            reveal: None,
            stagger,
            viewport,
            document,
            resize_listener: None,
            deadline: None,
            indicator_started_at: None,
            revealing_since: 0.0,
            reveal_started_at: 0.0,
            completion: None,
            tile_container: true,
            torn_down: false,
        }
    }

    /// Tells the sequencer whether the host has a container to draw the tile
    /// grid into. Without one the reveal is skipped but still completes.
    pub fn set_tile_container(&mut self, present: bool) {
        self.tile_container = present;
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn layers(&self) -> IntroLayers {
        if self.torn_down {
            return IntroLayers {
                preloader: false,
                tile_grid: false,
                main_content: false,
            };
        }
        IntroLayers::for_stage(self.stage)
    }

    pub fn indicator(&self) -> &LoadingIndicator {
        &self.indicator
    }

    pub fn reveal(&self) -> Option<&BlockReveal> {
        self.reveal.as_ref()
    }

    pub fn tiles(&self) -> &[Tile] {
        self.reveal.as_ref().map(BlockReveal::tiles).unwrap_or(&[])
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.time_seconds
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Event that ended the reveal: [`IntroEvent::RevealComplete`] for a
    /// normal finish, [`IntroEvent::RevealTimedOut`] for the fallback.
    pub fn completion(&self) -> Option<IntroEvent> {
        self.completion
    }

    /// Advances time by `delta` seconds and returns the resulting stage.
    pub fn tick(&mut self, delta: f32, observer: &mut dyn IntroObserver) -> Stage {
        if self.torn_down || self.stage == Stage::Ready {
            return self.stage;
        }

        let frame_start = self.clock.time_seconds;
        self.clock.advance(delta);
        loop {
            let due = self.timers.drain_due(&self.clock);
            if due.is_empty() {
                break;
            }
            for scheduled in due {
                self.fire(scheduled.event, scheduled.time_seconds, observer);
            }
        }

        // Work that began inside this frame only sees the time since it began.
        let now = self.clock.time_seconds;
        match self.stage {
            Stage::Loading => {
                let since = self.indicator_started_at.unwrap_or(now).max(frame_start);
                if self.indicator.advance(now - since) {
                    tracing::debug!(elapsed = self.clock.time_seconds, "progress reached 100");
                    self.timers.schedule_after(
                        &self.clock,
                        self.config.settle_seconds,
                        IntroTimer::SettleIndicator,
                    );
                }
            }
            Stage::Revealing => {
                let since = self.reveal_started_at.max(frame_start);
                let finished = self
                    .reveal
                    .as_mut()
                    .map(|reveal| reveal.advance(now - since))
                    .unwrap_or(true);
                if finished {
                    self.apply(IntroEvent::RevealComplete, now, observer);
                }
            }
            Stage::Ready => {}
        }

        self.stage
    }

    /// Records a viewport change. While the reveal plays the tile grid is
    /// rebuilt, its animation restarted and the fallback deadline re-armed
    /// for the new run.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.torn_down || self.stage != Stage::Revealing {
            return;
        }
        let restarted = match self.reveal.as_mut() {
            Some(reveal) => reveal.resize(viewport, self.stagger.as_mut()),
            None => false,
        };
        if restarted {
            let now = self.clock.time_seconds;
            self.reveal_started_at = now;
            self.arm_deadline(now);
        }
    }

    /// Cancels every pending timer and releases listeners. Later ticks are
    /// no-ops and no further callbacks fire.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.timers.cancel_all();
        self.deadline = None;
        self.reveal = None;
        self.resize_listener = None;
        tracing::debug!(stage = ?self.stage, "intro torn down");
    }

    /// Handles a timer that was due at `at`.
    fn fire(&mut self, timer: IntroTimer, at: f32, observer: &mut dyn IntroObserver) {
        match timer {
            IntroTimer::StartIndicator => {
                self.indicator.start();
                self.indicator_started_at = Some(at);
            }
            IntroTimer::SettleIndicator => {
                self.indicator.mark_complete();
                self.timers.schedule_at(
                    at + self.config.signal_delay_seconds.max(0.0),
                    IntroTimer::SignalLoaded,
                );
            }
            IntroTimer::SignalLoaded => self.apply(IntroEvent::LoadingComplete, at, observer),
            IntroTimer::RevealDeadline => {
                self.deadline = None;
                tracing::warn!(
                    in_stage = at - self.revealing_since,
                    generation = self.reveal.as_ref().map(BlockReveal::generation),
                    "block reveal did not finish in time, forcing ready"
                );
                self.apply(IntroEvent::RevealTimedOut, at, observer);
            }
        }
    }

    fn apply(&mut self, event: IntroEvent, at: f32, observer: &mut dyn IntroObserver) {
        let Some(next) = transition(self.stage, event) else {
            tracing::debug!(stage = ?self.stage, ?event, "ignored intro event");
            return;
        };
        tracing::info!(from = ?self.stage, to = ?next, ?event, "intro stage changed");
        self.stage = next;

        match next {
            Stage::Revealing => {
                observer.on_loading_complete();
                self.begin_reveal(at);
            }
            Stage::Ready => {
                self.completion = Some(event);
                self.finish_reveal();
                observer.on_reveal_complete();
            }
            Stage::Loading => {}
        }
    }

    fn begin_reveal(&mut self, at: f32) {
        self.resize_listener = Some(self.document.add_listener(ListenerKind::Resize));
        let reveal = if self.tile_container {
            BlockReveal::new(self.config.reveal.clone(), self.viewport, self.stagger.as_mut())
        } else {
            tracing::warn!("tile container is not mounted, skipping block reveal");
            BlockReveal::detached(self.config.reveal.clone())
        };
        tracing::debug!(tiles = reveal.tiles().len(), "block reveal mounted");
        self.reveal = Some(reveal);
        self.revealing_since = at;
        self.reveal_started_at = at;
        self.arm_deadline(at);
    }

    /// Schedules the fallback for a reveal run starting at `from`: its own
    /// finish time plus the configured slack, capped by the stage ceiling.
    fn arm_deadline(&mut self, from: f32) {
        if let Some(previous) = self.deadline.take() {
            self.timers.cancel(previous);
        }
        let finish = self.reveal.as_ref().map(BlockReveal::finish_time).unwrap_or(0.0);
        let ceiling = self.revealing_since + self.config.reveal_max_seconds;
        let at = (from + finish + self.config.reveal_timeout_seconds).min(ceiling);
        tracing::debug!(deadline = at, "reveal deadline armed");
        self.deadline = Some(self.timers.schedule_at(at, IntroTimer::RevealDeadline));
    }

    fn finish_reveal(&mut self) {
        if let Some(deadline) = self.deadline.take() {
            self.timers.cancel(deadline);
        }
        self.timers.cancel_all();
        self.reveal = None;
        self.resize_listener = None;
    }
}

impl std::fmt::Debug for IntroSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntroSequencer")
            .field("stage", &self.stage)
            .field("elapsed", &self.clock.time_seconds)
            .field("progress", &self.indicator.progress())
            .field("tiles", &self.tiles().len())
            .field("pending_timers", &self.timers.pending())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RevealConfig, tween::SequentialOrder};

    #[derive(Debug, Default)]
    struct CallbackLog {
        calls: Vec<&'static str>,
    }

    impl IntroObserver for CallbackLog {
        fn on_loading_complete(&mut self) {
            self.calls.push("loading");
        }

        fn on_reveal_complete(&mut self) {
            self.calls.push("reveal");
        }
    }

    fn fast_config() -> IntroConfig {
        IntroConfig {
            start_delay_seconds: 0.1,
            progress_duration_seconds: 0.5,
            reveal: RevealConfig {
                hold_seconds: 0.2,
                ..RevealConfig::default()
            },
            ..IntroConfig::default()
        }
    }

    fn sequencer(config: IntroConfig) -> (IntroSequencer, Document) {
        let document = Document::new();
        let sequencer = IntroSequencer::new(config, Viewport::new(400.0, 300.0), document.clone())
            .with_stagger(Box::new(SequentialOrder));
        (sequencer, document)
    }

    fn run_until(
        sequencer: &mut IntroSequencer,
        log: &mut CallbackLog,
        stage: Stage,
        limit_seconds: f32,
    ) {
        let step = 1.0 / 60.0;
        let mut elapsed = 0.0;
        while sequencer.stage() != stage && elapsed < limit_seconds {
            sequencer.tick(step, log);
            elapsed += step;
        }
    }

    #[test]
    fn transitions_only_move_forward() {
        assert_eq!(
            transition(Stage::Loading, IntroEvent::LoadingComplete),
            Some(Stage::Revealing)
        );
        assert_eq!(
            transition(Stage::Revealing, IntroEvent::RevealComplete),
            Some(Stage::Ready)
        );
        assert_eq!(
            transition(Stage::Revealing, IntroEvent::RevealTimedOut),
            Some(Stage::Ready)
        );
        assert_eq!(transition(Stage::Loading, IntroEvent::RevealComplete), None);
        assert_eq!(transition(Stage::Revealing, IntroEvent::LoadingComplete), None);
        assert_eq!(transition(Stage::Ready, IntroEvent::LoadingComplete), None);
        assert_eq!(transition(Stage::Ready, IntroEvent::RevealTimedOut), None);
    }

    #[test]
    fn waits_for_start_delay_before_progress() {
        let (mut sequencer, _document) = sequencer(fast_config());
        let mut log = CallbackLog::default();

        sequencer.tick(0.05, &mut log);
        assert!(!sequencer.indicator().is_animating());
        sequencer.tick(0.1, &mut log);
        assert!(sequencer.indicator().is_animating());
    }

    #[test]
    fn layers_follow_stages() {
        let (mut sequencer, document) = sequencer(fast_config());
        let mut log = CallbackLog::default();
        assert_eq!(sequencer.layers(), IntroLayers::for_stage(Stage::Loading));

        run_until(&mut sequencer, &mut log, Stage::Revealing, 5.0);
        assert_eq!(log.calls, vec!["loading"]);
        let layers = sequencer.layers();
        assert!(layers.preloader && layers.tile_grid && !layers.main_content);
        assert_eq!(sequencer.tiles().len(), 12);
        assert_eq!(document.listener_count(ListenerKind::Resize), 1);

        run_until(&mut sequencer, &mut log, Stage::Ready, 10.0);
        assert_eq!(log.calls, vec!["loading", "reveal"]);
        let layers = sequencer.layers();
        assert!(!layers.preloader && !layers.tile_grid && layers.main_content);
        assert!(sequencer.tiles().is_empty());
        assert_eq!(sequencer.pending_timers(), 0);
        assert_eq!(document.listener_count(ListenerKind::Resize), 0);
    }

    #[test]
    fn resize_during_reveal_rebuilds_without_double_completion() {
        let (mut sequencer, _document) = sequencer(fast_config());
        let mut log = CallbackLog::default();
        run_until(&mut sequencer, &mut log, Stage::Revealing, 5.0);

        sequencer.tick(0.3, &mut log);
        sequencer.resize(Viewport::new(1000.0, 250.0));
        let reveal = sequencer.reveal().unwrap();
        assert_eq!(reveal.grid(), GridSize { cols: 10, rows: 3 });
        assert_eq!(reveal.generation(), 1);
        assert_eq!(sequencer.tiles().len(), 30);

        run_until(&mut sequencer, &mut log, Stage::Ready, 10.0);
        assert_eq!(sequencer.stage(), Stage::Ready);
        assert_eq!(log.calls, vec!["loading", "reveal"]);

        sequencer.tick(5.0, &mut log);
        assert_eq!(log.calls.len(), 2);
    }

    #[test]
    fn resize_storm_hits_stage_ceiling() {
        let mut config = fast_config();
        config.reveal_max_seconds = 2.0;
        let (mut sequencer, _document) = sequencer(config);
        let mut log = CallbackLog::default();

        run_until(&mut sequencer, &mut log, Stage::Revealing, 5.0);
        let entered = sequencer.elapsed();
        let sizes = [Viewport::new(800.0, 600.0), Viewport::new(400.0, 300.0)];
        let mut frames = 0;
        while sequencer.stage() == Stage::Revealing && frames < 600 {
            // Every restart needs longer than this to finish.
            if frames % 18 == 0 {
                sequencer.resize(sizes[(frames / 18) % 2]);
            }
            sequencer.tick(1.0 / 60.0, &mut log);
            frames += 1;
        }

        assert_eq!(sequencer.stage(), Stage::Ready);
        assert_eq!(sequencer.completion(), Some(IntroEvent::RevealTimedOut));
        assert!(sequencer.elapsed() - entered >= 2.0 - 1.0 / 60.0);
        assert!(sequencer.elapsed() - entered < 2.1);
        assert_eq!(log.calls, vec!["loading", "reveal"]);
    }

    #[test]
    fn large_viewport_reveal_finishes_before_fallback() {
        let document = Document::new();
        let mut sequencer = IntroSequencer::new(
            IntroConfig::default(),
            Viewport::new(5120.0, 2880.0),
            document,
        )
        .with_stagger(Box::new(SequentialOrder));
        let mut log = CallbackLog::default();

        run_until(&mut sequencer, &mut log, Stage::Revealing, 30.0);
        let finish = sequencer.reveal().map(BlockReveal::finish_time).unwrap_or(0.0);
        assert_eq!(sequencer.tiles().len(), 52 * 29);
        assert!(finish > sequencer.config.reveal_timeout_seconds);

        run_until(&mut sequencer, &mut log, Stage::Ready, 60.0);
        assert_eq!(sequencer.completion(), Some(IntroEvent::RevealComplete));
        assert_eq!(log.calls, vec!["loading", "reveal"]);
    }

    #[test]
    fn resize_late_in_reveal_re_arms_deadline() {
        let document = Document::new();
        let mut sequencer = IntroSequencer::new(
            IntroConfig::default(),
            Viewport::new(3840.0, 2160.0),
            document,
        )
        .with_stagger(Box::new(SequentialOrder));
        let mut log = CallbackLog::default();

        run_until(&mut sequencer, &mut log, Stage::Revealing, 30.0);
        // Each run takes about 8.9s, so two late restarts end well past
        // the first run's finish plus slack.
        for _ in 0..2 {
            run_until(&mut sequencer, &mut log, Stage::Ready, 7.0);
            assert_eq!(sequencer.stage(), Stage::Revealing);
            sequencer.resize(Viewport::new(3840.0, 2160.0));
        }
        run_until(&mut sequencer, &mut log, Stage::Ready, 60.0);
        assert_eq!(sequencer.completion(), Some(IntroEvent::RevealComplete));
    }

    #[test]
    fn indicator_started_mid_frame_counts_from_start() {
        let config = IntroConfig {
            start_delay_seconds: 0.1,
            progress_duration_seconds: 1.0,
            ..IntroConfig::default()
        };
        let (mut sequencer, _document) = sequencer(config);
        let mut log = CallbackLog::default();

        sequencer.tick(0.15, &mut log);
        let progress = sequencer.indicator().progress();
        assert!((4..=5).contains(&progress), "progress {progress}");
    }

    #[test]
    fn reveal_mounted_mid_frame_counts_from_mount() {
        let config = IntroConfig {
            start_delay_seconds: 0.0,
            progress_duration_seconds: 0.5,
            settle_seconds: 0.1,
            signal_delay_seconds: 0.1,
            ..IntroConfig::default()
        };
        let (mut sequencer, _document) = sequencer(config);
        let mut log = CallbackLog::default();

        // Progress completes in the first frame; settle and signal chain
        // through 1.1s and 1.2s inside the second.
        sequencer.tick(1.0, &mut log);
        assert_eq!(sequencer.stage(), Stage::Loading);
        sequencer.tick(1.0, &mut log);
        assert_eq!(sequencer.stage(), Stage::Revealing);

        let reveal = sequencer.reveal().unwrap();
        assert!((reveal.elapsed() - 0.8).abs() < 1e-3, "{}", reveal.elapsed());
    }

    #[test]
    fn missing_tile_container_still_completes() {
        let (mut sequencer, _document) = sequencer(fast_config());
        sequencer.set_tile_container(false);
        let mut log = CallbackLog::default();

        run_until(&mut sequencer, &mut log, Stage::Ready, 5.0);

        // Ready is reached on the same tick loading completes.
        assert_eq!(sequencer.stage(), Stage::Ready);
        assert!(sequencer.elapsed() < 1.0);
        assert_eq!(log.calls, vec!["loading", "reveal"]);
    }

    #[test]
    fn teardown_cancels_pending_work() {
        let (mut sequencer, document) = sequencer(fast_config());
        let mut log = CallbackLog::default();
        run_until(&mut sequencer, &mut log, Stage::Revealing, 5.0);

        sequencer.teardown();
        assert_eq!(sequencer.pending_timers(), 0);
        assert_eq!(document.listener_count(ListenerKind::Resize), 0);

        sequencer.tick(30.0, &mut log);
        assert_eq!(sequencer.stage(), Stage::Revealing);
        assert_eq!(log.calls, vec!["loading"]);
        assert!(!sequencer.layers().preloader);
    }

    #[test]
    fn closure_callbacks_fire_in_order() {
        let order = std::cell::RefCell::new(Vec::new());
        let mut callbacks = IntroCallbacks {
            on_loading_complete: || order.borrow_mut().push(Stage::Revealing),
            on_reveal_complete: || order.borrow_mut().push(Stage::Ready),
        };
        let (mut sequencer, _document) = sequencer(fast_config());
        for _ in 0..600 {
            sequencer.tick(1.0 / 60.0, &mut callbacks);
        }

        assert_eq!(order.into_inner(), vec![Stage::Revealing, Stage::Ready]);
    }
}
