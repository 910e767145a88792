use crate::error::{Result, TypingError};
use crate::round_stats::RoundStats;
use crate::runtime::TickSource;
use crate::scorer::{classify, Classification};
use crate::words::{TargetSequence, WordBatchGenerator};
use rand::Rng;
use std::time::Instant;
use tracing::{debug, info, trace};

pub const TOTAL_WORDS: usize = 10;
pub const ROUND_DURATION_SECS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub total_words: usize,
    pub round_duration_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_words: TOTAL_WORDS,
            round_duration_secs: ROUND_DURATION_SECS,
        }
    }
}

impl SessionConfig {
    pub fn new(total_words: usize, round_duration_secs: u32) -> Result<Self> {
        if total_words == 0 {
            return Err(TypingError::InvalidConfig(
                "number of words must be at least 1".to_string(),
            ));
        }
        if round_duration_secs == 0 {
            return Err(TypingError::InvalidConfig(
                "round duration must be at least 1 second".to_string(),
            ));
        }
        Ok(Self {
            total_words,
            round_duration_secs,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Words shown, waiting for the first keystroke
    Idle,
    /// Countdown running
    Running,
    /// Countdown hit zero; scoring and reset in progress
    Ended,
}

/// What the controller hands to the summary collaborator after each round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// 1-based round counter
    pub round: u32,
    pub stats: RoundStats,
    pub duration_secs: u32,
}

impl RoundReport {
    pub fn accuracy(&self) -> f64 {
        self.stats.accuracy
    }

    pub fn wpm(&self) -> f64 {
        self.stats.wpm
    }
}

/// Display and input collaborator driven by the controller
pub trait SessionSink {
    /// A new target sequence is on screen
    fn on_words_changed(&mut self, target: &TargetSequence);
    fn on_display_update(&mut self, classifications: &[Classification]);
    fn on_timer_update(&mut self, seconds_remaining: u32);
    fn on_round_ended(&mut self, report: &RoundReport);
    fn on_round_started(&mut self) {}
    /// The controller has cleared the typed text; the input field must follow
    fn on_input_cleared(&mut self) {}
    fn on_input_enabled(&mut self, _enabled: bool) {}
}

/// Drives a round from first keystroke through countdown, scoring and reset.
///
/// All round state is owned here and only changes inside `on_input_changed`
/// and `on_tick`, which the caller serializes onto one thread.
#[derive(Debug)]
pub struct SessionController<T: TickSource, R: Rng> {
    config: SessionConfig,
    generator: WordBatchGenerator,
    rng: R,
    ticks: T,
    state: SessionState,
    started: bool,
    countdown: u32,
    target: TargetSequence,
    typed: String,
    classifications: Vec<Classification>,
    rounds_completed: u32,
}

impl<T: TickSource, R: Rng> SessionController<T, R> {
    /// Build a controller and show the first round's words.
    ///
    /// Fails with [`TypingError::EmptyPool`] when `pool` has no words.
    pub fn new<S: SessionSink + ?Sized>(
        pool: Vec<String>,
        config: SessionConfig,
        rng: R,
        ticks: T,
        sink: &mut S,
    ) -> Result<Self> {
        let generator = WordBatchGenerator::new(pool, config.total_words);
        let mut controller = Self {
            config,
            generator,
            rng,
            ticks,
            state: SessionState::Idle,
            started: false,
            countdown: config.round_duration_secs,
            target: TargetSequence::default(),
            typed: String::new(),
            classifications: Vec::new(),
            rounds_completed: 0,
        };
        controller.ticks.stop();
        controller.load_round(sink)?;
        info!(
            pool = controller.generator.pool().len(),
            words = config.total_words,
            secs = config.round_duration_secs,
            "session ready"
        );
        Ok(controller)
    }

    /// The input field changed; `text` is its full content.
    pub fn on_input_changed<S: SessionSink + ?Sized>(
        &mut self,
        text: &str,
        sink: &mut S,
    ) -> Result<()> {
        if !self.started {
            if text.is_empty() {
                // cleared field, not a keystroke
                trace!("ignoring empty input while idle");
                return Ok(());
            }
            self.start_round(sink)?;
        }

        self.typed = text.to_owned();
        self.classifications = classify(&self.target, &self.typed);
        sink.on_display_update(&self.classifications);
        Ok(())
    }

    /// One second has passed. Returns the report when this tick ended the round.
    pub fn on_tick<S: SessionSink + ?Sized>(&mut self, sink: &mut S) -> Result<Option<RoundReport>> {
        if self.state != SessionState::Running || !self.ticks.is_active() {
            trace!(state = ?self.state, "tick outside a running round");
            return Ok(None);
        }

        self.ticks.acknowledge();
        self.countdown = self.countdown.saturating_sub(1);
        sink.on_timer_update(self.countdown);
        debug!(remaining = self.countdown, "tick");

        if self.countdown == 0 {
            return self.end_round(sink).map(Some);
        }
        Ok(None)
    }

    fn start_round<S: SessionSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        if self.target.is_empty() {
            // a previous reset failed to produce words; retry before starting
            self.load_round(sink)?;
        }

        self.ticks.stop();
        self.started = true;
        self.state = SessionState::Running;
        self.countdown = self.config.round_duration_secs;
        self.ticks.start();
        sink.on_round_started();
        sink.on_timer_update(self.countdown);
        info!(round = self.rounds_completed + 1, "round started");
        Ok(())
    }

    fn end_round<S: SessionSink + ?Sized>(&mut self, sink: &mut S) -> Result<RoundReport> {
        self.state = SessionState::Ended;
        self.ticks.stop();
        sink.on_input_enabled(false);

        let typed = std::mem::take(&mut self.typed);
        let stats = RoundStats::compute(
            &self.target,
            &typed,
            self.config.round_duration_secs as f64,
        );
        self.rounds_completed += 1;

        let report = RoundReport {
            round: self.rounds_completed,
            stats,
            duration_secs: self.config.round_duration_secs,
        };
        info!(
            round = report.round,
            accuracy = stats.accuracy,
            wpm = stats.wpm,
            total = stats.total_characters,
            correct = stats.correct_characters,
            "round ended"
        );
        sink.on_round_ended(&report);

        self.reset(sink)?;
        Ok(report)
    }

    fn reset<S: SessionSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.typed.clear();
        sink.on_input_cleared();
        self.target = TargetSequence::default();
        self.started = false;
        self.countdown = self.config.round_duration_secs;

        self.load_round(sink)?;

        sink.on_input_enabled(true);
        self.state = SessionState::Idle;
        debug!("reset for next round");
        Ok(())
    }

    fn load_round<S: SessionSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.target = self.generator.next_batch(&mut self.rng)?;
        self.classifications = classify(&self.target, "");
        sink.on_words_changed(&self.target);
        sink.on_display_update(&self.classifications);
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn target(&self) -> &TargetSequence {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tick_source(&self) -> &T {
        &self.ticks
    }

    /// When the runner should deliver the next tick
    pub fn next_tick(&self) -> Option<Instant> {
        self.ticks.deadline()
    }
}
