//! social-mosaic — one shuffled feed from Twitter, Instagram and Facebook.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ WidgetMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ worker.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │  (tokio)  │ ◄───────── │ (state)  │          │ (render) │
//! └───────────┘  Request   └──────────┘          └──────────┘
//!       │                       ▲
//!       ▼                       │ handle_key_event()
//! ┌───────────┐            ┌──────────┐
//! │ widget.rs │            │ input.rs │
//! └───────────┘            └──────────┘
//! ```
//!
//! * **`client/`** — the injected provider interface and its HTTP
//!   implementation.
//! * **`source/`** — one `DataSource` per platform plus `FeedItem`.
//! * **`aggregate`** — concurrent fetch, fail-fast join, shuffle.
//! * **`widget`** — a configured instance: connect + fetch.
//! * **`worker`** — runs the widget on the tokio runtime.
//! * **`app`** / **`ui`** / **`input`** — the terminal presenter.
//! * **`main`** — parse args, load config, pick TUI or `--json` output.

mod aggregate;
mod app;
mod client;
mod config;
mod input;
mod source;
mod ui;
mod widget;
mod worker;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use app::App;
use config::SocialConfig;
use source::FeedItem;
use widget::{Clients, SocialWidget};
use worker::WidgetRequest;

#[derive(Debug, Parser)]
#[command(name = "social-mosaic", about = "Shuffled feed of your social media posts")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, default_value = "social.toml")]
    config: PathBuf,

    /// Fetch once and print the shuffled feed as JSON instead of starting the TUI.
    #[arg(long)]
    json: bool,

    /// Write logs to this file.  Without it the TUI discards logs.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Logs must never reach the alternate screen, so the TUI either writes
/// them to `--log-file` or drops them.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("social_mosaic=info"));

    let writer = match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if args.json => BoxMakeWriter::new(io::stderr),
        None => BoxMakeWriter::new(io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(args.log_file.is_none())
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let config = SocialConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let clients = Clients::http(&config).context("Failed to build provider clients")?;
    let widget = SocialWidget::new(config, clients);

    tracing::info!(
        config = %args.config.display(),
        platforms = ?widget.enabled_platforms(),
        "Widget configured"
    );

    let runtime = tokio::runtime::Runtime::new()?;

    // An inert widget still answers `--json`, with an empty feed.
    if args.json {
        let items = runtime.block_on(widget.fetch())?;
        write_json(io::stdout().lock(), &items)?;
        return Ok(());
    }

    if !widget.is_active() {
        eprintln!("No platform enabled in {}", args.config.display());
        return Ok(());
    }

    run_tui(&runtime, widget)
}

/// Pretty-print one aggregation result, newline terminated.
fn write_json<W: Write>(mut out: W, items: &[FeedItem]) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, items)?;
    writeln!(out)?;
    Ok(())
}

fn run_tui(runtime: &tokio::runtime::Runtime, widget: SocialWidget) -> Result<()> {
    install_panic_hook();

    let mut app = App::new(&widget.enabled_platforms());
    let mut worker = worker::spawn(runtime.handle(), widget);
    app.request_refresh();

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // ~10 fps: drain worker messages, send pending requests, render, poll keys.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = worker.events.try_recv() {
            app.apply(msg);
        }

        if app.take_refresh_request() && worker.requests.send(WidgetRequest::Fetch).is_err() {
            app.fetching = false;
            app.status = "Error: worker stopped".into();
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeClient;
    use crate::source::Platform;
    use std::sync::Arc;

    #[tokio::test]
    async fn inert_widget_prints_empty_json_array() {
        let clients = Clients {
            twitter: Arc::new(FakeClient::new(Platform::Twitter)),
            instagram: Arc::new(FakeClient::new(Platform::Instagram)),
            facebook: Arc::new(FakeClient::new(Platform::Facebook)),
        };
        let widget = SocialWidget::new(SocialConfig::default(), clients);
        assert!(!widget.is_active());

        let items = widget.fetch().await.unwrap();
        let mut out = Vec::new();
        write_json(&mut out, &items).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn json_output_is_tagged_by_platform() {
        let items = vec![FeedItem::Twitter { text: "hi".into() }];
        let mut out = Vec::new();
        write_json(&mut out, &items).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, serde_json::json!([{"social": "twitter", "text": "hi"}]));
    }
}
