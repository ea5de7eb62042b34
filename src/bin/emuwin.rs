use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use emuwin::actor::coordinator::Coordinator;
use emuwin::common::config::{Config, config_file};
use emuwin::common::log;
use emuwin::sys::sim::{Scene, SimHost};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "emuwin")]
#[command(about = "Arranges the windows of multi-window emulators")]
struct Cli {
    /// Configuration file. Defaults to ~/.config/emuwin.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the configuration and report any problems with it
    CheckConfig,
    /// Print the built-in configuration
    Defaults,
    /// Arrange the windows of a scene file and print where they end up
    Plan {
        /// JSON file describing displays and windows
        scene: PathBuf,
    },
}

fn main() {
    let cli: Cli = Parser::parse();
    log::init_logging("info");

    if let Err(err) = run(cli) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let path = cli.config.unwrap_or_else(config_file);

    match cli.command {
        Commands::CheckConfig => {
            let config = Config::load(&path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let issues = config.validate();
            if issues.is_empty() {
                println!("{}: ok", path.display());
                return Ok(());
            }
            for issue in &issues {
                println!("{issue}");
            }
            anyhow::bail!("{} issue(s) in {}", issues.len(), path.display());
        }
        Commands::Defaults => {
            print!("{}", toml::to_string(&Config::default())?);
            Ok(())
        }
        Commands::Plan { scene } => {
            let mut config = Config::load(&path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let fixed = config.auto_fix_values();
            if fixed > 0 {
                info!(fixed, "corrected invalid configuration values");
            }

            let buf = std::fs::read_to_string(&scene)
                .with_context(|| format!("failed to read {}", scene.display()))?;
            let scene: Scene = serde_json::from_str(&buf)
                .with_context(|| format!("failed to parse {}", scene.display()))?;

            let mut coordinator = Coordinator::new(SimHost::from_scene(&scene), config)?;
            coordinator.start();
            coordinator.run_until_idle();

            let windows = coordinator.host().snapshot();
            println!("{}", serde_json::to_string_pretty(&windows)?);
            Ok(())
        }
    }
}
