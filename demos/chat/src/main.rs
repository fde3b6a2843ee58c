mod app;
mod handlers;
mod ui;

use std::{io, time::Duration};

use app::App;
use chainpad::{FeatureMode, chat::HttpChatApi};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use handlers::handle_key_event;
use ratatui::{Terminal, backend::CrosstermBackend};
use ui::ui;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Block,
    Price,
}

#[derive(Parser)]
#[command(name = "chainpad-chat")]
#[command(about = "A TUI chat for the chainpad block explorer and price checker")]
#[command(version)]
struct Args {
    /// Chainpad server to talk to
    #[arg(
        short,
        long,
        default_value = "http://127.0.0.1:5000",
        env = "CHAINPAD_SERVER"
    )]
    server: String,

    /// Feature mode to start in
    #[arg(short, long, value_enum, default_value = "block")]
    mode: Mode,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let directive = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(directive)
        .with_writer(io::stderr)
        .init();

    let api = HttpChatApi::new(&args.server, Duration::from_secs(args.timeout))?;
    let mut app = App::new(api, args.mode.into());

    let mut terminal = enter_terminal()?;
    let res = run_app(&mut terminal, &mut app).await;
    leave_terminal(&mut terminal)?;

    res?;
    Ok(())
}

impl From<Mode> for FeatureMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Block => FeatureMode::BlockExplorer,
            Mode::Price => FeatureMode::PriceChecker,
        }
    }
}

fn enter_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

fn leave_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Draw, then either send the queued line or drain key events.
///
/// A queued line is sent only after a frame showing the thinking indicator
/// has been drawn, so the user sees it for the whole round trip.
async fn run_app(terminal: &mut Tui, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if app.pending.is_some() {
            app.send_pending().await;
            continue;
        }

        if event::poll(Duration::from_millis(50))? {
            // Drain everything already queued before redrawing
            loop {
                if let Event::Key(key) = event::read()?
                    && key.kind == KeyEventKind::Press
                {
                    handle_key_event(app, key.code, key.modifiers);
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
