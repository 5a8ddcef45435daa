//! cardwall - terminal card gallery for spreadsheet-backed feeds
//!
//! # Usage
//!
//! ```bash
//! # Endpoint from ~/.config/cardwall/gallery.toml or the environment
//! cardwall
//!
//! # Explicit endpoint and page size
//! cardwall --endpoint https://script.example.com/macros/s/abc/exec --page-size 12
//!
//! # With verbose logging (written to the runtime dir, not the screen)
//! RUST_LOG=debug cardwall
//! ```
//!
//! # Environment Variables
//!
//! - `CARDWALL_ENDPOINT`: feed endpoint URL
//! - `CARDWALL_PAGE_SIZE`: cards per page
//! - `CARDWALL_SORT`: "sheet" or "alphabetical"
//! - `RUST_LOG`: log level (trace, debug, info, warn, error)

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use curator_core::{default_config_path, load_config_from_path, ConfigOverrides, SortMode};

use cardwall_tui::App;

#[derive(Debug, Parser)]
#[command(name = "cardwall", version, about = "Terminal card gallery for spreadsheet-backed feeds")]
struct Args {
    /// Feed endpoint URL (overrides config file and environment)
    #[arg(long)]
    endpoint: Option<String>,

    /// Cards per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Card ordering: "sheet" or "alphabetical"
    #[arg(long)]
    sort: Option<SortMode>,

    /// Path to an alternate gallery.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Log file under the runtime dir; the alternate screen owns stdout/stderr
fn default_log_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("cardwall").join("tui.log")
    } else {
        std::env::temp_dir().join("cardwall").join("tui.log")
    }
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env();
    let path = default_log_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match std::fs::File::create(&path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("loading configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(endpoint) = args.endpoint {
        overrides = overrides.with_endpoint(endpoint);
    }
    if let Some(page_size) = args.page_size {
        overrides = overrides.with_page_size(page_size);
    }
    if let Some(sort) = args.sort {
        overrides = overrides.with_sort(sort);
    }
    overrides.apply(&mut config);
    config.validate()?;

    tracing::info!(source = %config.source(), endpoint = %config.feed.endpoint, "Starting cardwall");

    enable_raw_mode().context("enabling raw mode")?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .context("entering alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let mut app = App::new(config);
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
