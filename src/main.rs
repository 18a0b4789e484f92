use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};

use typecycle::{
    bootstrap,
    config::{Config, ConfigStore, FileConfigStore},
    merge_options,
    presentation::{ensure_theme, TypewriterView},
    responsive::Viewport,
    runtime::{Clock, CrosstermEventSource, HostEvent, Runner, SystemClock},
    Container, OptionOverrides, Page, Typewriter,
};

const MAX_IDLE_MS: u64 = 100;
const DEFAULT_WORDS: &str = "fast,reliable,productive";

/// typewriter-style word cycling in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Cycles through a list of words with a typing/deleting animation that adapts its timing and word length to the terminal width."
)]
pub struct Cli {
    /// comma-separated words to cycle through
    #[clap(short = 'w', long)]
    words: Option<String>,

    /// JSON page describing one or more typewriter containers
    #[clap(long)]
    page: Option<PathBuf>,

    /// delay per typed character in ms
    #[clap(long)]
    typing_speed: Option<u64>,

    /// delay per deleted character in ms
    #[clap(long)]
    deleting_speed: Option<u64>,

    /// pause after a fully typed word in ms
    #[clap(long)]
    pause_duration: Option<u64>,

    /// cursor glyph
    #[clap(long)]
    cursor_char: Option<String>,

    /// cursor blink half-period in ms
    #[clap(long)]
    cursor_blink_speed: Option<u64>,

    /// viewport width in px (8px per column) below which the compact mode applies
    #[clap(long)]
    responsive_breakpoint: Option<u32>,

    /// longest word shown in compact mode before truncation
    #[clap(long)]
    max_word_length: Option<usize>,

    /// keep the cursor steady instead of blinking
    #[clap(long)]
    reduced_motion: bool,

    /// write logs to this file (level from RUST_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// persist the effective options as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            typing_speed: self.typing_speed,
            deleting_speed: self.deleting_speed,
            pause_duration: self.pause_duration,
            cursor_char: self.cursor_char.clone(),
            cursor_blink_speed: self.cursor_blink_speed,
            responsive_breakpoint: self.responsive_breakpoint,
            max_word_length: self.max_word_length,
        }
    }

    /// The page to bootstrap: a file when given, otherwise a single container
    fn page(&self) -> io::Result<Page> {
        match &self.page {
            Some(path) => Page::load(path),
            None => Ok(Page {
                containers: vec![Container::typewriter(
                    "main",
                    self.words.as_deref().unwrap_or(DEFAULT_WORDS),
                )],
            }),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub typewriters: Vec<Typewriter>,
    pub reduced_motion: bool,
    pub paused: bool,
}

impl App {
    pub fn new(cli: &Cli, config: &Config, viewport: Viewport) -> io::Result<Self> {
        let options = merge_options(&config.options, &cli.overrides());
        let mut page = cli.page()?;
        let typewriters = bootstrap(&mut page, &options, viewport);
        Ok(Self {
            typewriters,
            reduced_motion: cli.reduced_motion || config.reduced_motion,
            paused: false,
        })
    }

    pub fn start(&mut self, now_ms: u64) {
        self.typewriters.iter_mut().for_each(|tw| tw.start(now_ms));
        self.paused = false;
    }

    pub fn toggle(&mut self, now_ms: u64) {
        if self.paused {
            self.start(now_ms);
        } else {
            self.typewriters.iter_mut().for_each(Typewriter::stop);
            self.paused = true;
        }
    }

    pub fn destroy(&mut self) {
        self.typewriters.iter_mut().for_each(Typewriter::destroy);
    }

    pub fn on_resize(&mut self, viewport: Viewport, now_ms: u64) {
        self.typewriters
            .iter_mut()
            .for_each(|tw| tw.on_resize(viewport, now_ms));
    }

    /// Poll every widget; true when something needs redrawing
    pub fn poll(&mut self, now_ms: u64) -> bool {
        self.typewriters
            .iter_mut()
            .fold(false, |changed, tw| tw.poll(now_ms) | changed)
    }

    /// Drain every widget's frame request; true if any tick asked for a redraw
    pub fn take_frame_requests(&mut self) -> bool {
        self.typewriters
            .iter_mut()
            .fold(false, |requested, tw| tw.take_frame_request().is_some() | requested)
    }

    /// Earliest cursor blink toggle across live widgets
    pub fn next_blink(&self, now_ms: u64) -> Option<u64> {
        self.typewriters
            .iter()
            .filter(|tw| !tw.is_destroyed())
            .filter_map(|tw| {
                TypewriterView::new(tw, now_ms, self.reduced_motion)
                    .blink()
                    .next_toggle(now_ms)
            })
            .min()
    }

    pub fn next_deadline(&self, now_ms: u64) -> Option<u64> {
        self.typewriters
            .iter()
            .filter_map(Typewriter::next_deadline)
            .chain(self.next_blink(now_ms))
            .min()
    }

    pub fn title(&self) -> String {
        self.typewriters
            .iter()
            .filter_map(Typewriter::accessible_label)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    if cli.save_config {
        config.options = merge_options(&config.options, &cli.overrides());
        config.reduced_motion |= cli.reduced_motion;
        store.save(&config)?;
        log::info!("saved config to {}", store.path().display());
    }

    let (cols, rows) = crossterm::terminal::size()?;
    let mut app = App::new(&cli, &config, Viewport::new(cols, rows))?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(app.title()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), SetTitle(""), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let clock = SystemClock::new();
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(MAX_IDLE_MS),
    );

    app.start(clock.now_ms());
    app.poll(clock.now_ms());
    app.take_frame_requests();
    terminal.draw(|f| ui(app, f, clock.now_ms()))?;
    let mut blink_due = app.next_blink(clock.now_ms());

    loop {
        let now = clock.now_ms();
        let event = runner.step(now, app.next_deadline(now));
        let mut dirty = !matches!(event, HostEvent::Tick);
        match event {
            HostEvent::Tick => {}
            HostEvent::Resize(cols, rows) => app.on_resize(Viewport::new(cols, rows), clock.now_ms()),
            HostEvent::Key(key) => {
                if is_quit(&key) {
                    break;
                }
                match key.code {
                    KeyCode::Char(' ') => app.toggle(clock.now_ms()),
                    KeyCode::Char('d') => {
                        app.destroy();
                        execute!(io::stdout(), SetTitle(""))?;
                    }
                    _ => {}
                }
            }
        }

        let now = clock.now_ms();
        dirty |= app.poll(now);
        dirty |= app.take_frame_requests();
        dirty |= blink_due.is_some_and(|due| now >= due);
        if dirty {
            terminal.draw(|f| ui(app, f, now))?;
            blink_due = app.next_blink(now);
        }
    }

    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
}

fn ui(app: &App, f: &mut Frame, now_ms: u64) {
    let area = f.area();
    let theme = ensure_theme();

    let heights: Vec<u16> = app
        .typewriters
        .iter()
        .map(|tw| tw.layout().height)
        .collect();
    let content = heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h));
    let pad = area.height.saturating_sub(content.saturating_add(1)) / 2;

    let mut constraints = vec![Constraint::Length(pad)];
    constraints.extend(heights.iter().map(|h| Constraint::Length(*h)));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints(constraints)
        .split(area);

    for (idx, tw) in app.typewriters.iter().enumerate() {
        f.render_widget(
            TypewriterView::new(tw, now_ms, app.reduced_motion),
            chunks[idx + 1],
        );
    }

    let hint = if app.paused {
        "paused · space resume · d destroy · esc quit"
    } else {
        "space pause · d destroy · esc quit"
    };
    let footer: Rect = chunks[chunks.len() - 1];
    f.render_widget(
        Paragraph::new(Span::styled(hint, theme.hint)).alignment(Alignment::Center),
        footer,
    );
}
