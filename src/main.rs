pub mod config;
pub mod engine;
pub mod generator;
pub mod runtime;
pub mod ui;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    engine::Engine,
    generator::{GenConfig, PassageGenerator, WordSource},
    runtime::{CrosstermEventSource, Event, EventSource, Runner},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const EVENT_POLL_MS: u64 = 100;

/// minimalist typing speed trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimalist typing TUI: type the passage, fix mistakes with backspace, ctrl+w and ctrl+u, and get your time and words per minute at the end."
)]
pub struct Cli {
    /// number of words to use in test (defaults to the saved config)
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// custom passage to type instead of a generated one
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// where generated words come from (defaults to the saved config)
    #[clap(short = 's', long, value_enum)]
    word_source: Option<WordSource>,
}

/// Settings for one run, resolved from CLI flags over the saved config.
#[derive(Debug, Clone)]
pub struct Settings {
    pub number_of_words: usize,
    pub source: WordSource,
    pub custom_passage: Option<String>,
}

impl Settings {
    fn resolve(cli: &Cli, cfg: &Config) -> Self {
        let source = cli.word_source.unwrap_or_else(|| {
            match cfg.word_source.as_str() {
                "random" => WordSource::Random,
                _ => WordSource::English,
            }
        });

        Self {
            number_of_words: cli.number_of_words.unwrap_or(cfg.number_of_words),
            source,
            custom_passage: cli.prompt.clone(),
        }
    }

    fn gen_config(&self) -> GenConfig {
        GenConfig {
            number_of_words: self.number_of_words,
            custom_passage: self.custom_passage.clone(),
            source: self.source,
        }
    }
}

impl From<&Settings> for Config {
    fn from(s: &Settings) -> Self {
        Self {
            number_of_words: s.number_of_words,
            word_source: s.source.to_string().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Typing,
    Help,
    Results,
}

#[derive(Debug)]
pub struct App {
    pub settings: Settings,
    pub engine: Engine,
    pub page: Page,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let generator = PassageGenerator::new(settings.gen_config());
        let engine = Engine::new(&generator.generate());

        Self {
            settings,
            engine,
            page: Page::Typing,
        }
    }

    /// Throw away the current attempt and start over with a fresh passage.
    pub fn new_test(&mut self) {
        let generator = PassageGenerator::new(self.settings.gen_config());
        self.engine = Engine::new(&generator.generate());
        self.page = Page::Typing;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let settings = Settings::resolve(&cli, &store.load());
    // Persist the resolved settings; failure to write is not fatal
    let _ = store.save(&Config::from(&settings));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(EVENT_POLL_MS),
    );
    let res = run_app(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            None | Some(Event::Resize) => {}
            Some(Event::Paste(text)) => {
                if app.page == Page::Typing && !app.engine.has_finished() {
                    app.engine.write_str(&text);
                    if app.engine.has_finished() {
                        app.page = Page::Results;
                    }
                }
            }
            Some(Event::Key(key)) => match app.page {
                Page::Typing => match key.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Tab => app.new_test(),
                    KeyCode::Backspace => {
                        // a finished attempt is read-only
                        if !app.engine.has_finished() {
                            if key.modifiers.contains(KeyModifiers::ALT) {
                                app.engine.delete_word();
                            } else {
                                app.engine.backspace();
                            }
                        }
                    }
                    KeyCode::Char(c) => {
                        if key.modifiers.contains(KeyModifiers::CONTROL) {
                            match c {
                                'c' => return Ok(()),
                                'w' if !app.engine.has_finished() => app.engine.delete_word(),
                                'u' if !app.engine.has_finished() => app.engine.clear_line(),
                                _ => {}
                            }
                        } else if c == '?' {
                            app.page = Page::Help;
                        } else if !app.engine.has_finished() {
                            app.engine.write(c);
                            if app.engine.has_finished() {
                                app.page = Page::Results;
                            }
                        }
                    }
                    _ => {}
                },
                Page::Help | Page::Results => match key.code {
                    KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => app.new_test(),
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    KeyCode::Char('?') => app.page = Page::Help,
                    _ => {}
                },
            },
        }
    }
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
