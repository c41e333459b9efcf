use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use log::{LevelFilter, info};
use tokio::net::TcpListener;

use triago::api::{AppState, create_router};
use triago::settings::Settings;

const APP_NAME: &str = "triago";

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.common);

    match cli.command {
        Command::Serve(cmd) => {
            let settings = load_settings(&cli.common, &cmd)?;
            async_serve(settings)
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
            Ok(())
        }
    }
}

#[tokio::main]
async fn async_serve(settings: Settings) -> Result<()> {
    let addr: SocketAddr = settings.bind_addr()?;

    let state = AppState::from_settings(settings);
    let router = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, router).await.context("server error")
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Triago - healthcare triage platform backend.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Enable debug logging (equivalent to -vv)
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
struct ServeCommand {
    /// Override the bind host
    #[arg(long)]
    host: Option<String>,
    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

fn load_settings(common: &CommonOpts, cmd: &ServeCommand) -> Result<Settings> {
    let mut settings = Settings::load(common.config.as_deref())?;
    if let Some(host) = &cmd.host {
        settings.host = host.clone();
    }
    if let Some(port) = cmd.port {
        settings.port = port;
    }
    Ok(settings)
}

fn init_logging(common: &CommonOpts) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    if common.quiet {
        log::set_max_level(LevelFilter::Off);
        return;
    }

    let level = match effective_log_level(common) {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("triago={level},tower_http={level}")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();

    // Also init env_logger for compatibility with log crate users
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.filter_level(effective_log_level(common));
    builder.try_init().ok();
}

fn effective_log_level(common: &CommonOpts) -> LevelFilter {
    if common.debug {
        LevelFilter::Debug
    } else {
        match common.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
