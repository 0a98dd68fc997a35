//! SoundNest - ambient sound player for the terminal.
//!
//! Pick a background loop (rain, waves, fire, noise colors) from a small
//! built-in catalog and let it play, with a volume slider and a sleep timer
//! that pauses playback after a chosen duration. The player screen is an
//! optional feature; the rest of the CLI handles onboarding, the home listing
//! and configuration.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use soundnest::config;
use std::error::Error;
use std::io;

mod cli;

#[derive(Parser)]
#[command(name = "nest")]
#[command(about = "Ambient sound player with a sleep timer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up SoundNest for the first time
    Init {
        /// Your name (prompted for if omitted)
        name: Option<String>,
    },
    /// Show the greeting, recently played sound and the catalog
    Home {
        /// Only list sounds in this category
        #[arg(short, long, value_parser = PossibleValuesParser::new(["all", "ambient", "beach", "sunset", "forest"]))]
        category: Option<String>,
    },
    /// Open the player for a sound
    Play {
        /// Sound title, e.g. Rain
        sound: String,
        /// Starting volume between 0 and 1
        #[arg(short, long)]
        volume: Option<f32>,
        /// Pause after this long, e.g. 45m, 1h30m, 01:30:00
        #[arg(short, long)]
        timer: Option<String>,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new(config::KEYS))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { name } => {
            cli::init::handle_init(name.as_deref())?;
        }
        Commands::Home { category } => {
            cli::home::handle_home(category.as_deref())?;
        }
        Commands::Play {
            sound,
            volume,
            timer,
        } => {
            cli::play::handle_play(&sound, volume, timer.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
    }

    Ok(())
}
