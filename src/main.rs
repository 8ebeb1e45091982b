//! Fydo - nearby shops gate
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use fydo::cli::{
    FindCommand, FindOptions, InitCommand, InitOptions, ShopsCommand, ShopsOptions,
    StatusCommand, StatusOptions,
};
use fydo::config::{crash_log_path, Config};
use fydo::core::Coordinate;
use fydo::error::exit_codes;
use fydo::location::{
    FailingLocationProvider, FixedLocationProvider, LocationProvider, SimulatedFailure,
};
use fydo::storage::FileCounterStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// Fydo - find shops near you
#[derive(Parser)]
#[command(name = "fydo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one find-shops attempt
    Find {
        /// Current latitude in degrees
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Current longitude in degrees
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Fail the location fix the given way
        #[arg(long, value_enum, conflicts_with_all = ["lat", "lon"])]
        simulate: Option<SimulateArg>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the retry counter and what the next attempt will do
    Status {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// List the shop catalog
    Shops {
        /// Show the demo catalog
        #[arg(long)]
        demo: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Write the default project config
    Init {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Overwrite an existing config file
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SimulateArg {
    PermissionDenied,
    Timeout,
    Unsupported,
}

impl From<SimulateArg> for SimulatedFailure {
    fn from(arg: SimulateArg) -> Self {
        match arg {
            SimulateArg::PermissionDenied => SimulatedFailure::PermissionDenied,
            SimulateArg::Timeout => SimulatedFailure::Timeout,
            SimulateArg::Unsupported => SimulatedFailure::Unsupported,
        }
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    setup_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fydo error: {}", e);
            ExitCode::from(exit_codes::USAGE as u8)
        }
    }
}

/// Log to stderr so JSON on stdout stays parseable.
fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fydo=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Set up the global panic handler.
///
/// On panic, appends to `<fydo_home>/crash.log` and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("fydo panic: {}", info);

        if let Some(crash_log) = crash_log_path() {
            if let Some(parent) = crash_log.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Find {
            lat,
            lon,
            simulate,
            json,
            quiet,
        } => run_find(lat.zip(lon), simulate, json, quiet),
        Commands::Status { json } => run_status(json),
        Commands::Shops { demo, json } => run_shops(demo, json),
        Commands::Init { json, quiet, force } => run_init(json, quiet, force, &cwd),
    }
}

/// Load and validate configuration.
fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config = Config::load();
    config.validate()?;
    Ok(config)
}

fn open_store(config: &Config) -> Result<FileCounterStore, Box<dyn std::error::Error>> {
    let store = match config.storage.resolve_path() {
        Some(path) => FileCounterStore::with_path(path)?,
        None => FileCounterStore::new()?,
    };
    Ok(store)
}

/// Pick the location source for this invocation.
///
/// A command line has no device fix of its own, so without `--lat/--lon`
/// the attempt fails the way an unsupported platform would.
fn select_provider(
    coordinate: Option<(f64, f64)>,
    simulate: Option<SimulateArg>,
) -> Box<dyn LocationProvider> {
    if let Some((lat, lon)) = coordinate {
        return Box::new(FixedLocationProvider::new(Coordinate::new(lat, lon)));
    }
    match simulate {
        Some(failure) => Box::new(FailingLocationProvider::new(failure.into())),
        None => Box::new(FailingLocationProvider::unsupported(
            "no location source configured, pass --lat and --lon",
        )),
    }
}

fn run_find(
    coordinate: Option<(f64, f64)>,
    simulate: Option<SimulateArg>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config)?;
    let provider = select_provider(coordinate, simulate);

    let mut cmd = FindCommand::new(store, provider, &config);
    let options = FindOptions { json, quiet };

    let output = cmd.run();
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    if output.success {
        Ok(ExitCode::from(exit_codes::SUCCESS as u8))
    } else {
        Ok(ExitCode::from(exit_codes::LOCATION_FAILED as u8))
    }
}

fn run_status(json: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config)?;

    let cmd = StatusCommand::new(store, &config);
    let options = StatusOptions { json };

    let output = cmd.run();
    println!("{}", cmd.format_output(&output, &options));

    Ok(ExitCode::from(exit_codes::SUCCESS as u8))
}

fn run_shops(demo: bool, json: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ShopsCommand::new();
    let options = ShopsOptions { demo, json };

    let output = cmd.run(&options);
    println!("{}", cmd.format_output(&output, &options));

    Ok(ExitCode::from(exit_codes::SUCCESS as u8))
}

fn run_init(
    json: bool,
    quiet: bool,
    force: bool,
    cwd: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = InitCommand::new(cwd.to_string_lossy().to_string());
    let options = InitOptions { json, quiet, force };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    if output.success {
        Ok(ExitCode::from(exit_codes::SUCCESS as u8))
    } else {
        Ok(ExitCode::from(exit_codes::USAGE as u8))
    }
}
