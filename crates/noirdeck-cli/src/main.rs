use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use noirdeck_core::{AppConfig, PointerSetting};

mod commands;

#[derive(Parser)]
#[command(name = "noirdeck")]
#[command(author, version, about = "A cinematic, screen-by-screen presentation player for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ~/.config/noirdeck/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a deck full-screen (the default)
    Run(RunArgs),
    /// Validate a deck file and summarise it
    Check {
        /// Deck file to validate
        deck: PathBuf,
    },
    /// Print when each fragment of a deck reveals
    Timeline {
        /// Deck file (default: configured deck, else the bundled one)
        deck: Option<PathBuf>,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Deck file to play
    #[arg(short, long)]
    pub deck: Option<PathBuf>,
    /// Do not play background audio
    #[arg(long)]
    pub no_audio: bool,
    /// Override pointer detection
    #[arg(long, value_enum)]
    pub pointer: Option<PointerArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PointerArg {
    Auto,
    Fine,
    Coarse,
}

impl From<PointerArg> for PointerSetting {
    fn from(arg: PointerArg) -> Self {
        match arg {
            PointerArg::Auto => PointerSetting::Auto,
            PointerArg::Fine => PointerSetting::Fine,
            PointerArg::Coarse => PointerSetting::Coarse,
        }
    }
}

/// Logs go to a file while the TUI owns the terminal, to stderr otherwise
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let path = config.log_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Writing the defaults must work even when the current file is broken
    if let Some(Commands::InitConfig { force }) = cli.command {
        let path = cli.config.unwrap_or_else(AppConfig::config_path);
        return commands::init_config::run(&path, force);
    }

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let runs_tui = matches!(cli.command, None | Some(Commands::Run(_)));
    init_logging(&config, runs_tui)?;

    match cli.command {
        Some(Commands::Run(args)) => commands::run::run(config, args).await,
        None => commands::run::run(config, RunArgs::default()).await,
        Some(Commands::Check { deck }) => commands::check::run(&deck),
        Some(Commands::Timeline { deck }) => commands::timeline::run(&config, deck.as_deref()),
        Some(Commands::InitConfig { .. }) => Ok(()),
    }
}
