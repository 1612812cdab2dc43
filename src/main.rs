use anyhow::{Context, Result};
use clap::Parser;
use running_to_reality::config::CliConfig;
use running_to_reality::{Config, GameInterface, Theme, VERSION};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info};

const LOG_FILE: &str = "runner-game.log";

#[derive(Parser)]
#[command(name = "runner-game")]
#[command(about = "A terminal side-scrolling runner game")]
#[command(version = VERSION)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Theme to play directly, skipping the menus ("Escaping F", "Escaping T", "Rescuing G" or 1-3)
    #[arg(short, long)]
    theme: Option<String>,

    /// Results CSV path
    #[arg(short, long)]
    results: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the statistics summary and exit
    #[arg(long)]
    stats: bool,

    /// Print statistics as JSON
    #[arg(long, requires = "stats")]
    json: bool,
}

fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(path) = cli.config.as_deref() {
        if !path.exists() {
            Config::from_file(path).with_context(|| format!("creating default config at {:?}", path))?;
        }
    }

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    config.merge_with_cli(CliConfig {
        results_file: cli.results.clone(),
        log_level: cli.log_level.clone(),
        debug: cli.debug,
    });
    config.validate()?;
    Ok(config)
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = format!("running_to_reality={},warn", config.logging.level);

    // The game owns the terminal while playing, so logs go to a file by default.
    if config.logging.log_to_file {
        std::fs::create_dir_all(config.get_logs_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.get_logs_dir().join(LOG_FILE))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&config)?;

    info!("Starting Running to Reality v{}", VERSION);

    let mut game_interface = GameInterface::new(config)?;

    if cli.stats {
        game_interface.print_statistics(cli.json).await?;
        return Ok(());
    }

    let result = match cli.theme.as_deref() {
        Some(theme_id) => {
            let theme = Theme::from_id(theme_id)?;
            info!("Playing theme {} directly", theme);
            game_interface.play(Some(theme)).await
        }
        None => game_interface.run().await,
    };

    if let Err(e) = result {
        error!("Game error: {}", e);
        eprintln!("An error occurred: {}", e);
        std::process::exit(1);
    }

    info!("Game session ended");
    Ok(())
}
