//! corvidd — a single-server IRC daemon core.
//!
//! Grounded in the teacher's `main.rs` bootstrap shape (resolve config
//! path, init tracing before anything else can log, validate, spawn a
//! signal handler, then run) with every piece of server-to-server,
//! database, metrics-HTTP, and always-on-client machinery removed: this
//! daemon is one core loop over in-memory state, fed by one listener set
//! and a one-second ticker.

mod config;
mod error;
mod handlers;
mod network;
mod state;

use std::path::Path;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::{Config, LogFormat};

/// CLI flags, grounded in the teacher's manual (non-`clap`) argument
/// parsing style; `-nofork`/`-wait` exist because spec.md §6.3 names
/// them explicitly, even though this daemon never daemonizes itself.
struct Cli {
    config_path: String,
    nofork: bool,
    debug: bool,
    nolog: bool,
    logfile: Option<String>,
    wait: Option<u64>,
}

fn parse_args() -> Cli {
    let mut cli = Cli {
        config_path: "config.toml".to_string(),
        nofork: false,
        debug: false,
        nolog: false,
        logfile: None,
        wait: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-nofork" => cli.nofork = true,
            "-debug" => cli.debug = true,
            "-nolog" => cli.nolog = true,
            "-logfile" => {
                cli.logfile = Some(args.next().unwrap_or_else(|| {
                    eprintln!("Missing path after -logfile");
                    std::process::exit(1);
                }));
            }
            "-wait" => {
                let raw = args.next().unwrap_or_else(|| {
                    eprintln!("Missing seconds after -wait");
                    std::process::exit(1);
                });
                cli.wait = Some(raw.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid -wait value: {raw}");
                    std::process::exit(1);
                }));
            }
            "-c" | "--config" => {
                cli.config_path = args.next().unwrap_or_else(|| {
                    eprintln!("Missing path after {arg}");
                    std::process::exit(1);
                });
            }
            other => cli.config_path = other.to_string(),
        }
    }
    // Canonicalize up front so a later REHASH doesn't depend on the
    // process's current working directory.
    cli.config_path = match std::fs::canonicalize(Path::new(&cli.config_path)) {
        Ok(p) => p.to_string_lossy().into_owned(),
        Err(_) => cli.config_path,
    };
    cli
}

fn init_tracing(cli: &Cli, format: LogFormat) {
    if cli.nolog {
        return;
    }
    let default_level = if cli.debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let writer = match cli.logfile.clone() {
        Some(path) => BoxMakeWriter::new(move || {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .unwrap_or_else(|err| panic!("failed to open -logfile {path}: {err}"))
        }),
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(writer);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Install SIGTERM/SIGINT (clean shutdown) and SIGHUP (rehash notice)
/// handlers, named by spec.md §6.3 but not detailed there; built fresh
/// since no teacher file does process signal handling at all.
fn spawn_signal_handler() {
    tokio::spawn(async move {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        let mut sighup = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
            .expect("failed to install SIGHUP handler");
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("SIGINT received, shutting down");
                    std::process::exit(0);
                }
                _ = sigterm.recv() => {
                    info!("SIGTERM received, shutting down");
                    std::process::exit(0);
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received; send REHASH from an operator to reload configuration");
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = parse_args();
    let _ = cli.nofork; // accepted for compatibility; this daemon never backgrounds itself

    let config = Config::load(&cli.config_path).map_err(|err| {
        eprintln!("ERROR: failed to load config from {}: {err}", cli.config_path);
        err
    })?;

    init_tracing(&cli, config.log_format);

    if let Err(errors) = config.validate() {
        for err in &errors {
            error!(error = %err, "configuration validation failed");
        }
        return Err(anyhow::anyhow!(
            "configuration validation failed with {} error(s)",
            errors.len()
        ));
    }

    info!(
        server = %config.server_name,
        network = %config.network_name,
        "starting corvidd"
    );

    if let Some(secs) = cli.wait {
        info!(seconds = secs, "waiting before binding listeners");
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    spawn_signal_handler();

    let (events_tx, events_rx) = state::event_channel();

    {
        let tick_tx = events_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                if tick_tx.send(state::LoopEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }

    {
        let listen_tx = events_tx.clone();
        let addrs = config.bind.clone();
        let recvq_limit = config.recvq_limit;
        tokio::spawn(async move {
            if let Err(err) = network::run_listeners(&addrs, listen_tx, recvq_limit).await {
                error!(%err, "listener failed");
            }
        });
    }

    drop(events_tx);

    let now = state::now_unix();
    let server = state::Server::new(config, now);
    state::run_event_loop(server, events_rx).await;

    Ok(())
}
