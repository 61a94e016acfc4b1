pub mod app_dirs;
pub mod celebration;
pub mod classify;
pub mod config;
pub mod countdown;
pub mod dictionary;
pub mod history;
pub mod ocr;
pub mod runtime;
pub mod session;
pub mod speech;
pub mod ui;
pub mod wordlist;

use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Utc;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use env_logger::{Env, Target};
use log::{debug, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::app_dirs::AppDirs;
use crate::celebration::CelebrationAnimation;
use crate::config::{Config, ConfigStore, FileConfigStore, PracticeMode};
use crate::countdown::{CountdownStatus, RevealCountdown};
use crate::dictionary::{DefinitionProvider, DictionaryApiClient, LookupError};
use crate::history::HistoryRecord;
use crate::ocr::{load_image, TesseractExtractor, TextExtractor};
use crate::runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner};
use crate::session::{AdvanceOutcome, EmptyInputError, PracticeSession, SessionPhase};
use crate::speech::{AudioPlayer, GoogleSynthesizer, RodioPlayer, SpeechSynthesizer};
use crate::wordlist::WordList;

const TICK_RATE_MS: u64 = 100;

/// scan a practice list and drill it aloud at the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Scans a photographed practice list (spelling words or math facts), then drills the items one at a time: each item is read aloud, hidden behind a mask, and revealed on demand or on a timer."
)]
pub struct Cli {
    /// photo of the practice list to scan
    #[clap(value_name = "IMAGE", required_unless_present = "from_text")]
    image: Option<PathBuf>,

    /// read items from a plain text file instead of scanning a photo
    #[clap(long, value_name = "FILE", conflicts_with = "image")]
    from_text: Option<PathBuf>,

    /// cap on how many items one round drills
    #[clap(short = 'm', long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_items: Option<usize>,

    /// keep items in scanned order instead of shuffling
    #[clap(long)]
    no_shuffle: bool,

    /// reveal each item automatically after it is read aloud
    #[clap(long)]
    auto_reveal: bool,

    /// seconds between reading an item aloud and its automatic reveal
    #[clap(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=10))]
    reveal_delay: Option<u64>,

    /// what kind of list is being practiced
    #[clap(long, value_enum)]
    mode: Option<PracticeMode>,
}

impl Cli {
    /// Layer command-line overrides on top of the saved settings.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(max_items) = self.max_items {
            config.max_items = max_items;
        }
        if self.no_shuffle {
            config.randomize = false;
        }
        if self.auto_reveal {
            config.auto_reveal = true;
        }
        if let Some(delay) = self.reveal_delay {
            config.reveal_delay_secs = delay;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        config.sanitized()
    }
}

/// Side-effecting collaborators, boxed so tests can swap them out.
pub struct Services {
    pub speech: Box<dyn SpeechSynthesizer>,
    pub player: Box<dyn AudioPlayer>,
    pub dictionary: Box<dyn DefinitionProvider>,
}

impl Services {
    fn live() -> Self {
        Self {
            speech: Box::new(GoogleSynthesizer::new()),
            player: Box::new(RodioPlayer),
            dictionary: Box::new(DictionaryApiClient::new()),
        }
    }
}

pub struct App {
    pub session: Option<PracticeSession>,
    pub settings: Config,
    pub countdown: Option<RevealCountdown>,
    pub definition: Option<Result<String, LookupError>>,
    pub celebration: CelebrationAnimation,
    pub last_practiced: Option<HistoryRecord>,
    pub source_label: String,
    pub size: (u16, u16),
    word_list: WordList,
    services: Services,
    config_store: Box<dyn ConfigStore>,
    history_path: Option<PathBuf>,
}

impl App {
    pub fn new(
        word_list: WordList,
        source_label: String,
        settings: Config,
        services: Services,
        config_store: Box<dyn ConfigStore>,
        history_path: Option<PathBuf>,
    ) -> Result<Self, EmptyInputError> {
        let session = PracticeSession::start(&word_list, settings.max_items, settings.randomize)?;
        let last_practiced = history_path.as_deref().and_then(history::last_practiced);

        Ok(Self {
            session: Some(session),
            settings,
            countdown: None,
            definition: None,
            celebration: CelebrationAnimation::new(),
            last_practiced,
            source_label,
            size: (80, 24),
            word_list,
            services,
            config_store,
            history_path,
        })
    }

    fn speak(&self, text: &str) {
        match self.services.speech.synthesize(text) {
            Ok(clip) => self.services.player.play(clip),
            Err(e) => warn!("speech synthesis failed for {text:?}: {e}"),
        }
    }

    /// Read the current item aloud. With auto-reveal on, this also arms the
    /// reveal countdown unless one is already pending.
    pub fn read_aloud(&mut self) {
        let Some(session) = &self.session else { return };
        if session.is_complete() {
            return;
        }

        let item = session.current_item().to_string();
        let wants_countdown =
            self.settings.auto_reveal && !session.is_revealed() && self.countdown.is_none();
        self.speak(&item);

        if wants_countdown {
            self.countdown = Some(RevealCountdown::new(self.settings.reveal_delay_secs));
        }
    }

    pub fn reveal(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        if session.is_complete() {
            return;
        }

        let first_reveal = !session.is_revealed();
        session.reveal();
        let item = session.current_item().to_string();
        self.countdown = None;

        if first_reveal
            && self.settings.speak_on_reveal
            && self.settings.mode == PracticeMode::SpellingBee
        {
            self.speak(&item);
        }
    }

    pub fn advance(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        let outcome = session.advance();
        let item_count = session.items().len();
        self.countdown = None;
        self.definition = None;

        if outcome == AdvanceOutcome::Completed {
            debug!(
                "round complete: {item_count} items from {}",
                self.source_label
            );
            self.last_practiced = self.history_path.as_deref().and_then(history::last_practiced);

            if let Some(path) = &self.history_path {
                let record = HistoryRecord {
                    finished_at: Utc::now(),
                    mode: self.settings.mode,
                    item_count,
                    randomized: self.settings.randomize,
                    source: self.source_label.clone(),
                };
                if let Err(e) = history::append(path, &record) {
                    warn!("could not record the finished round: {e}");
                }
            }

            self.celebration.start(self.size.0, self.size.1);
        }
    }

    /// Show or hide the definition panel. The lookup runs on first show and
    /// the result is kept for the rest of the item; failed lookups are retried
    /// the next time the panel opens.
    pub fn toggle_definition(&mut self) {
        if self.settings.mode != PracticeMode::SpellingBee {
            return;
        }
        let Some(session) = self.session.as_mut() else { return };
        if session.is_complete() {
            return;
        }

        session.toggle_definition();
        if !session.definition_visible() {
            return;
        }
        let word = session.current_item().to_string();

        if !matches!(self.definition, Some(Ok(_))) {
            let result = self.services.dictionary.define(&word);
            if let Err(e) = &result {
                warn!("definition lookup failed for {word:?}: {e}");
            }
            self.definition = Some(result);
        }
    }

    /// Start a fresh round over the retained word list.
    pub fn restart(&mut self) {
        self.clear_session();

        match PracticeSession::start(
            &self.word_list,
            self.settings.max_items,
            self.settings.randomize,
        ) {
            Ok(session) => self.session = Some(session),
            Err(e) => warn!("could not start a new round: {e}"),
        }
    }

    pub fn clear_session(&mut self) {
        self.session = None;
        self.countdown = None;
        self.definition = None;
        self.celebration = CelebrationAnimation::new();
    }

    pub fn on_tick(&mut self) {
        let fired = match self.countdown.as_mut() {
            Some(countdown) => {
                countdown.tick(Duration::from_millis(TICK_RATE_MS)) == CountdownStatus::Elapsed
            }
            None => false,
        };
        if fired {
            self.countdown = None;
            self.reveal();
        }

        self.celebration.update();
    }

    pub fn is_animating(&self) -> bool {
        self.countdown.is_some() || self.celebration.is_active
    }

    fn persist_settings(&self) {
        if let Err(e) = self.config_store.save(&self.settings) {
            warn!("could not save settings: {e}");
        }
    }

    pub fn toggle_shuffle(&mut self) {
        self.settings.randomize = !self.settings.randomize;
        self.persist_settings();
    }

    pub fn toggle_auto_reveal(&mut self) {
        self.settings.auto_reveal = !self.settings.auto_reveal;
        self.persist_settings();
    }

    pub fn cycle_mode(&mut self) {
        self.settings.mode = match self.settings.mode {
            PracticeMode::SpellingBee => PracticeMode::MathGeneral,
            PracticeMode::MathGeneral => PracticeMode::SpellingBee,
        };
        self.persist_settings();
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc {
            return true;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.session.as_ref().map(|s| s.phase()) {
            Some(SessionPhase::Active) => match key.code {
                KeyCode::Char(' ') => self.read_aloud(),
                KeyCode::Char('r') => self.reveal(),
                KeyCode::Char('d') => self.toggle_definition(),
                KeyCode::Char('n') | KeyCode::Right | KeyCode::Enter => self.advance(),
                KeyCode::Left => self.restart(),
                _ => {}
            },
            Some(SessionPhase::Complete) => match key.code {
                KeyCode::Char('n') | KeyCode::Char('r') => self.restart(),
                KeyCode::Char('1') => self.toggle_shuffle(),
                KeyCode::Char('2') => self.toggle_auto_reveal(),
                KeyCode::Char('3') => self.cycle_mode(),
                KeyCode::Left => self.clear_session(),
                _ => {}
            },
            None => {
                if key.code == KeyCode::Char('n') {
                    self.restart();
                }
            }
        }

        false
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    // The TUI owns stdout, so logs go to a file under the state dir.
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init();
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_practice_items(cli: &Cli) -> Result<(WordList, String), String> {
    if let Some(path) = &cli.from_text {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("could not read {}: {e}", path.display()))?;
        let word_list = WordList::from_lines(raw.lines());
        debug!("loaded {} items from {}", word_list.len(), path.display());
        Ok((word_list, source_name(path)))
    } else if let Some(path) = &cli.image {
        let photo = load_image(path).map_err(|e| e.to_string())?;
        let lines = TesseractExtractor::new()
            .extract_lines(&photo)
            .map_err(|e| e.to_string())?;
        let word_list = WordList::from_lines(lines);
        debug!("scanned {} items from {}", word_list.len(), path.display());
        Ok((word_list, source_name(path)))
    } else {
        // clap enforces one of the two sources
        Err("a photo or --from-text file is required".to_string())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let (word_list, source_label) = match load_practice_items(&cli) {
        Ok(loaded) => loaded,
        Err(message) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, message).exit();
        }
    };

    let store = FileConfigStore::new();
    let settings = cli.apply(store.load());

    let mut app = match App::new(
        word_list,
        source_label,
        settings,
        Services::live(),
        Box::new(store),
        AppDirs::history_path(),
    ) {
        Ok(app) => app,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit();
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    let size = terminal.size().unwrap_or_default();
    app.size = (size.width, size.height);
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                let was_animating = app.is_animating();
                app.on_tick();

                // Redraw only while a countdown or celebration is running.
                if was_animating || app.is_animating() {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            AppEvent::Resize => {
                let size = terminal.size().unwrap_or_default();
                app.size = (size.width, size.height);
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Key(key) => {
                if app.handle_key(key) {
                    break;
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
