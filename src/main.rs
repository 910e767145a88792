use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::info;
use typeathon::{
    app::{App, Flow},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, Runner, TypeEvent},
    ui::TITLE,
    words::BundledList,
};

const IDLE_POLL_MS: u64 = 250;

/// timed typing practice: ten random words, ten seconds, live feedback
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the words shown before the countdown runs out. Every character turns green or red as you type; when time is up you get accuracy and words per minute, and a new batch of words appears."
)]
pub struct Cli {
    /// number of words per round
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// number of seconds per round
    #[clap(short = 's', long)]
    number_of_secs: Option<u32>,

    /// bundled word list to draw from
    #[clap(short = 'l', long, value_enum)]
    word_list: Option<BundledList>,

    /// read candidate words from a file, one per line
    #[clap(short = 'f', long)]
    words_file: Option<PathBuf>,

    /// remember the given options as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command-line options override the stored configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(n) = self.number_of_words {
            config.number_of_words = n;
        }
        if let Some(secs) = self.number_of_secs {
            config.number_of_secs = secs;
        }
        if let Some(list) = self.word_list {
            config.word_list = list;
            // an explicit bundled list beats a stored file
            config.words_file = None;
        }
        if let Some(path) = &self.words_file {
            config.words_file = Some(path.clone());
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = logging::init();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved configuration");
    }

    let session_config = config.session_config()?;
    let words = config.load_words()?;
    let mut app = App::new(words, session_config)?;
    info!(?log_path, ?config, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(TITLE))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(rounds = app.session.rounds_completed(), "exiting");
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(IDLE_POLL_MS),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let Some(event) = runner.step(app.next_tick()) else {
            break;
        };

        match event {
            TypeEvent::Tick => app.on_tick()?,
            TypeEvent::Resize => {}
            TypeEvent::Key(key) => {
                if app.on_key(key)? == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
