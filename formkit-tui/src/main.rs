//! formkit TUI — fill in a form defined by a TOML or JSON config.
//!
//! Keys:
//! - Tab / Down, Shift+Tab / Up: move between controls
//! - Typing, Backspace: edit the focused text input
//! - Enter: commit the focused text input
//! - h / l, Left / Right: move the focused slider by one step
//! - Ctrl+S: save committed values
//! - Esc / Ctrl+C: quit (values are saved on exit)

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use formkit_core::FormConfig;
use formkit_tui::{input, persistence, ui, AppState};

#[derive(Parser)]
#[command(name = "formkit-tui", about = "Fill in a formkit form in the terminal")]
struct Args {
    /// Form config file (.toml or .json)
    config: PathBuf,

    /// State file for committed values [default: <config dir>/formkit/<form>.json]
    #[arg(long)]
    state: Option<PathBuf>,

    /// Start from the config's values, ignoring saved state
    #[arg(long)]
    fresh: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut config = FormConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let state_path = args.state.unwrap_or_else(|| default_state_path(&args.config));

    // Load persisted state
    let persisted = if args.fresh {
        persistence::PersistedState::default()
    } else {
        persistence::load(&state_path)
    };
    persistence::apply_values(&mut config, &persisted);

    let mut app = AppState::new(&config, Some(state_path.clone()))?;
    persistence::apply_focus(&mut app, &persisted);
    info!(fields = config.fields.len(), state = %state_path.display(), "form ready");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(err) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %err, "failed to save state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms poll keeps the loop responsive without spinning.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

/// The terminal owns stdout, so logs go to the file named by `FORMKIT_LOG`.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("FORMKIT_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", Path::new(&path).display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn default_state_path(config: &Path) -> PathBuf {
    let stem = config
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "form".to_string());
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formkit")
        .join(format!("{stem}.json"))
}
