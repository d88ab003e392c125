//! Pinkmon CLI - random Pokémon roster generator
//!
//! Loads the Showdown dex, applies the configured filters and prints a
//! roster, or inspects the dex and its sprites.

use clap::{Parser, Subcommand};
use pinkmon_generator::mcp_interface::{
    display_dex_status, display_options, display_presets, display_results,
    handle_lookup_command, handle_sprites_command, parse_option_command,
};
use pinkmon_generator::{
    Action, AppState, DexLoadTask, GeneratorConfig, HttpDexSource, SeededRng,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Pinkmon - random Pokémon roster generator
#[derive(Parser)]
#[command(name = "pinkmon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Generator config file (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dex location (URL or file), overriding the config
    #[arg(long)]
    dex: Option<String>,

    /// Override file location (URL or file), overriding the config
    #[arg(long)]
    overrides: Option<String>,

    /// Skip the override file entirely
    #[arg(long)]
    no_overrides: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a roster
    Generate {
        /// Start from a named preset
        #[arg(short, long)]
        preset: Option<String>,

        /// Roster size (1-12)
        #[arg(short = 'n', long)]
        count: Option<i64>,

        /// Required type (repeatable; all must match)
        #[arg(short, long = "type")]
        types: Vec<String>,

        /// Allowed generation (repeatable)
        #[arg(short, long = "gen")]
        gens: Vec<u8>,

        /// Option command, e.g. "stat spe 100" or "fusion on" (repeatable)
        #[arg(short, long = "set")]
        set: Vec<String>,

        /// Seed for a reproducible roster
        #[arg(long)]
        seed: Option<u64>,

        /// Show mystery cards face up
        #[arg(long)]
        reveal: bool,

        /// Print the roster as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one species
    Lookup { name: String },

    /// List sprite URLs for a species in fallback order
    Sprites {
        name: String,

        #[arg(long)]
        shiny: bool,
    },

    /// List every type in the dex
    Types,

    /// List the compiled presets
    Presets,

    /// Show the effective options
    Options,
}

fn option_commands(
    preset: Option<String>,
    count: Option<i64>,
    types: Vec<String>,
    gens: Vec<u8>,
    set: Vec<String>,
) -> Vec<String> {
    let mut commands = Vec::new();
    if let Some(preset) = preset {
        commands.push(format!("preset {}", preset));
    }
    if let Some(count) = count {
        commands.push(format!("count {}", count));
    }
    if !types.is_empty() {
        commands.push("types none".to_string());
        commands.extend(types.into_iter().map(|t| format!("type {}", t)));
    }
    if !gens.is_empty() {
        commands.push("gens none".to_string());
        commands.extend(gens.into_iter().map(|g| format!("gen {}", g)));
    }
    commands.extend(set);
    commands
}

async fn load(
    state: AppState,
    config: &GeneratorConfig,
    rng: &mut SeededRng,
) -> AppState {
    let state = state.apply(Action::BeginLoad, rng);
    let Some(ticket) = state.loading_ticket() else {
        return state;
    };

    let source = HttpDexSource::new(config.dataset_url.clone(), config.override_url.clone());
    let task = DexLoadTask::spawn(Arc::new(source), ticket);
    match task.join().await {
        Some((ticket, result)) => state.apply(Action::DexLoaded { ticket, result }, rng),
        None => state,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = GeneratorConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dex) = cli.dex {
        config.dataset_url = dex;
    }
    if cli.overrides.is_some() {
        config.override_url = cli.overrides;
    }
    if cli.no_overrides {
        config.override_url = None;
    }

    let mut state = AppState::new(config.options.clone());

    match cli.command {
        Commands::Presets => {
            print!("{}", display_presets());
            return Ok(());
        }
        Commands::Options => {
            println!("{}", display_options(&state.options));
            return Ok(());
        }
        _ => {}
    }

    match cli.command {
        Commands::Generate {
            preset,
            count,
            types,
            gens,
            set,
            seed,
            reveal,
            json,
        } => {
            let mut rng = SeededRng::new(seed.or(config.seed));
            for command in option_commands(preset, count, types, gens, set) {
                let action = parse_option_command(&command, &state)
                    .map_err(|e| format!("{} ({})", e, command))?;
                debug!(%command, "applying option command");
                state = state.apply(action, &mut rng);
            }
            state.options.validate()?;

            state = load(state, &config, &mut rng).await;
            if !state.can_generate() {
                return Err(display_dex_status(&state).into());
            }
            state = state.apply(Action::Generate, &mut rng);

            if reveal {
                let keys: Vec<String> = state
                    .results
                    .iter()
                    .flatten()
                    .map(|r| r.key.clone())
                    .collect();
                for key in keys {
                    state = state.apply(Action::Reveal(key), &mut rng);
                }
            }

            if json {
                let results = state.results.as_deref().unwrap_or_default();
                println!("{}", serde_json::to_string_pretty(results)?);
            } else {
                println!("{}", display_results(&state));
            }
        }
        Commands::Lookup { name } => {
            let mut rng = SeededRng::new(config.seed);
            state = load(state, &config, &mut rng).await;
            println!("{}", handle_lookup_command(&name, &state));
        }
        Commands::Sprites { name, shiny } => {
            let mut rng = SeededRng::new(config.seed);
            state = load(state, &config, &mut rng).await;
            println!("{}", handle_sprites_command(&name, shiny, &state));
        }
        Commands::Types => {
            let mut rng = SeededRng::new(config.seed);
            state = load(state, &config, &mut rng).await;
            match &state.dex {
                Some(dex) => println!("{}", dex.types.join("\n")),
                None => return Err(display_dex_status(&state).into()),
            }
        }
        Commands::Presets | Commands::Options => {}
    }

    Ok(())
}
