use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
};
use typing_speed::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, Settings},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    Metric,
};

/// live typing speed readout for your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type into the scratch area and watch your live words or characters per unit time, with idle detection and an optional smoothed min-max band."
)]
pub struct Cli {
    /// settings file to load and save (defaults to the platform config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// metric to display for this run
    #[clap(short = 'm', long, value_enum)]
    metric: Option<Metric>,

    /// show the smoothed min-max band for this run
    #[clap(long)]
    show_minmax: bool,

    /// ticks per second for this run
    #[clap(short = 't', long, value_parser = clap::value_parser!(u32).range(1..=20))]
    tick_rate: Option<u32>,

    /// write logs here (filter with RUST_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Stored settings with this run's overrides applied.
    fn effective_settings(&self, stored: &Settings) -> Settings {
        let mut settings = stored.clone();
        if let Some(metric) = self.metric {
            settings.metrics = metric;
        }
        if self.show_minmax {
            settings.show_minmax = true;
        }
        if let Some(tick_rate) = self.tick_rate {
            settings.tick_rate = tick_rate;
        }
        settings
    }
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(path: Option<PathBuf>) {
    let Some(path) = path.or_else(AppDirs::log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.clone());

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let stored = store.load();
    let effective = cli.effective_settings(&stored);
    log::info!("starting with {effective:?} (settings at {})", store.path().display());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, stored, effective);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend, S: ConfigStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<(), Box<dyn Error>> {
    let ticker = FixedTicker::from_tick_rate(app.engine.settings().tick_rate);
    let mut runner = Runner::new(CrosstermEventSource::new(), ticker);

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    let outcome = loop {
        match app.handle(runner.step()) {
            Flow::Quit => break Ok(()),
            Flow::Continue => {}
            Flow::Redraw => {
                if let Err(err) = terminal.draw(|f| f.render_widget(&*app, f.area())) {
                    break Err(err);
                }
            }
        }
    };

    runner.shutdown();
    outcome.map_err(Into::into)
}
