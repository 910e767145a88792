use crate::error::Result;
use crate::runtime::Metronome;
use crate::scorer::Classification;
use crate::session::{RoundReport, SessionConfig, SessionController, SessionSink};
use crate::words::TargetSequence;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What the main loop should do after handling a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the screen shows. Kept in sync by the session controller.
#[derive(Debug, Clone)]
pub struct View {
    pub target: TargetSequence,
    pub classifications: Vec<Classification>,
    /// Content of the input line
    pub input: String,
    pub input_enabled: bool,
    /// None until the first keystroke of a round
    pub seconds_remaining: Option<u32>,
    /// Summary of the previous round, shown until the next one starts
    pub last_report: Option<RoundReport>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            target: TargetSequence::default(),
            classifications: Vec::new(),
            input: String::new(),
            input_enabled: true,
            seconds_remaining: None,
            last_report: None,
        }
    }
}

impl SessionSink for View {
    fn on_words_changed(&mut self, target: &TargetSequence) {
        self.target = target.clone();
    }

    fn on_display_update(&mut self, classifications: &[Classification]) {
        self.classifications = classifications.to_vec();
    }

    fn on_timer_update(&mut self, seconds_remaining: u32) {
        self.seconds_remaining = Some(seconds_remaining);
    }

    fn on_round_ended(&mut self, report: &RoundReport) {
        self.last_report = Some(report.clone());
        self.seconds_remaining = None;
    }

    fn on_round_started(&mut self) {
        self.last_report = None;
    }

    fn on_input_cleared(&mut self) {
        self.input.clear();
    }

    fn on_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }
}

#[derive(Debug)]
pub struct App {
    pub session: SessionController<Metronome, StdRng>,
    pub view: View,
}

impl App {
    pub fn new(words: Vec<String>, config: SessionConfig) -> Result<Self> {
        Self::with_parts(
            words,
            config,
            StdRng::from_entropy(),
            Metronome::new(TICK_INTERVAL),
        )
    }

    /// Build with an explicit rng and tick interval, for tests and replays
    pub fn with_parts(
        words: Vec<String>,
        config: SessionConfig,
        rng: StdRng,
        metronome: Metronome,
    ) -> Result<Self> {
        let mut view = View::default();
        let session = SessionController::new(words, config, rng, metronome, &mut view)?;
        Ok(Self { session, view })
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Result<Flow> {
        if key.kind == KeyEventKind::Release {
            return Ok(Flow::Continue);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => return Ok(Flow::Quit),
            KeyCode::Char('c') if ctrl => return Ok(Flow::Quit),
            KeyCode::Char('w') if ctrl => self.edit(delete_word)?,
            KeyCode::Backspace if ctrl || alt => self.edit(delete_word)?,
            KeyCode::Backspace => self.edit(|input| {
                input.pop();
            })?,
            KeyCode::Char(c) if !ctrl => self.edit(|input| input.push(c))?,
            _ => {}
        }

        Ok(Flow::Continue)
    }

    pub fn on_tick(&mut self) -> Result<()> {
        self.session.on_tick(&mut self.view)?;
        Ok(())
    }

    pub fn next_tick(&self) -> Option<Instant> {
        self.session.next_tick()
    }

    /// Apply an edit to the input line and forward the result if it changed
    fn edit<F: FnOnce(&mut String)>(&mut self, f: F) -> Result<()> {
        if !self.view.input_enabled {
            return Ok(());
        }

        let before = self.view.input.clone();
        f(&mut self.view.input);
        if self.view.input == before {
            return Ok(());
        }

        let text = self.view.input.clone();
        self.session.on_input_changed(&text, &mut self.view)
    }
}

/// Drop trailing spaces, then the word before them
fn delete_word(input: &mut String) {
    let trimmed = input.trim_end_matches(' ').len();
    input.truncate(trimmed);
    let keep = input.rfind(' ').map_or(0, |idx| idx + 1);
    input.truncate(keep);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    fn app(words: &[&str], total: usize, secs: u32) -> App {
        App::with_parts(
            words.iter().map(|w| w.to_string()).collect(),
            SessionConfig::new(total, secs).unwrap(),
            StdRng::seed_from_u64(9),
            Metronome::new(Duration::from_secs(1)),
        )
        .unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            assert_eq!(app.on_key(key(KeyCode::Char(c))).unwrap(), Flow::Continue);
        }
    }

    #[test]
    fn typing_updates_view_and_starts_round() {
        let mut app = app(&["cat"], 2, 10);
        assert_eq!(app.view.seconds_remaining, None);
        assert!(app.next_tick().is_none());

        type_str(&mut app, "cxt");

        assert_eq!(app.view.input, "cxt");
        assert_eq!(app.view.seconds_remaining, Some(10));
        assert_eq!(app.session.state(), SessionState::Running);
        assert!(app.next_tick().is_some());
        assert_eq!(app.view.classifications[..3], [
            Classification::Correct,
            Classification::Incorrect,
            Classification::Correct,
        ]);
    }

    #[test]
    fn backspace_on_empty_input_does_not_start() {
        let mut app = app(&["cat"], 1, 10);
        app.on_key(key(KeyCode::Backspace)).unwrap();

        assert_eq!(app.session.state(), SessionState::Idle);
        assert_eq!(app.view.seconds_remaining, None);
    }

    #[test]
    fn backspace_removes_last_char() {
        let mut app = app(&["cat"], 1, 10);
        type_str(&mut app, "ca");
        app.on_key(key(KeyCode::Backspace)).unwrap();

        assert_eq!(app.view.input, "c");
        assert_eq!(app.session.typed(), "c");
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut app = app(&["cat"], 3, 10);
        type_str(&mut app, "cat ca");
        app.on_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL))
            .unwrap();

        assert_eq!(app.view.input, "cat ");
        assert_eq!(app.session.typed(), "cat ");
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut app = app(&["cat"], 1, 10);
        assert_eq!(app.on_key(key(KeyCode::Esc)).unwrap(), Flow::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
                .unwrap(),
            Flow::Quit
        );
        assert_eq!(app.view.input, "");
    }

    #[test]
    fn round_end_shows_report_and_clears_input() {
        let mut app = app(&["cat"], 2, 2);
        type_str(&mut app, "cat");
        app.on_tick().unwrap();
        app.on_tick().unwrap();

        let report = app.view.last_report.clone().expect("report after the last tick");
        assert_eq!(report.stats.correct_characters, 3);
        assert_eq!(app.view.input, "");
        assert!(app.view.input_enabled);
        assert_eq!(app.view.seconds_remaining, None);
        assert_eq!(app.session.state(), SessionState::Idle);

        // next keystroke starts a fresh round and hides the summary
        type_str(&mut app, "c");
        assert!(app.view.last_report.is_none());
        assert_eq!(app.view.seconds_remaining, Some(2));
    }

    #[test]
    fn delete_word_cases() {
        let mut s = String::from("one two");
        delete_word(&mut s);
        assert_eq!(s, "one ");
        delete_word(&mut s);
        assert_eq!(s, "");
        delete_word(&mut s);
        assert_eq!(s, "");
    }
}
