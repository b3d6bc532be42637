//! Mongrid Listener Binary
//!
//! Init playback grid, bind command socket, jalankan receive loop di
//! dedicated thread, lalu putar startup streams dari main thread.
//!
//! Usage:
//!   cargo run --release --bin mongrid_listener -- [OPTIONS]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mongrid::core::CommandDispatcher;
use mongrid::network::Listener;
use mongrid::playback::{HeadlessGrid, PlaybackGrid};
use mongrid::{load_config, ListenerConfig};

#[derive(Parser, Debug)]
#[command(name = "mongrid_listener", version, about = "Video-wall UDP command listener")]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Bind host (default: all local addresses)
    #[arg(short, long)]
    bind: Option<String>,
    /// Service port (default: 7001)
    #[arg(short = 'p', long)]
    service: Option<String>,
    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut ListenerConfig) {
        if let Some(bind) = &self.bind {
            config.bind_host = bind.clone();
        }
        if let Some(service) = &self.service {
            config.service = service.clone();
        }
        if self.verbose {
            config.log_filter = "debug".into();
        }
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn play_startup_streams<G: PlaybackGrid>(grid: &G, config: &ListenerConfig) {
    for stream in &config.startup_streams {
        if let Err(err) = grid.play_stream(
            stream.cell(),
            &stream.uri,
            &stream.description,
            &stream.stream_type,
        ) {
            warn!(cell = %stream.cell(), error = %err, "startup stream failed");
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);
    config.validate().context("validating configuration")?;

    init_tracing(&config.log_filter);
    info!(
        service = %config.service,
        rows = config.grid_rows,
        cols = config.grid_cols,
        target = %config.target_cell(),
        "starting mongrid listener"
    );

    let grid = Arc::new(HeadlessGrid::new());
    grid.init_grid(config.grid_rows, config.grid_cols)
        .context("initialising playback grid")?;

    let dispatcher = CommandDispatcher::with_target(Arc::clone(&grid), config.target_cell());
    let listener = Listener::bind(&config, dispatcher).context("binding command socket")?;
    let handle = listener
        .spawn()
        .context("spawning command listener thread")?;

    play_startup_streams(&grid, &config);

    let stats = handle
        .join()
        .map_err(|_| anyhow!("command listener thread panicked"))?
        .context("command listener")?;
    info!(
        datagrams = stats.datagrams_received,
        dispatched = stats.commands_dispatched,
        "exiting"
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("mongrid_listener: {err:#}");
        std::process::exit(1);
    }
}
