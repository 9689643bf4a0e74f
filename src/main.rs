//! avdriver command-line host.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use avdriver::registry::DeviceClass;
use avdriver::{BackendRegistry, DriverState, Error, Settings};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "avdriver")]
#[command(about = "Select and initialize audio, video and input drivers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List compiled-in drivers
    List,

    /// Initialize the configured drivers, report the result, and shut down
    Probe {
        /// Settings file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Set RUST_LOG to control the log level, e.g. RUST_LOG=avdriver=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let registry = Arc::new(BackendRegistry::builtin());

    match cli.command {
        Commands::List => {
            list(&registry);
            ExitCode::SUCCESS
        }
        Commands::Probe { config } => match probe(registry, config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report(&e);
                ExitCode::FAILURE
            }
        },
    }
}

fn list(registry: &BackendRegistry) {
    for class in DeviceClass::ALL {
        println!("{} drivers:", class);
        for ident in registry.identifiers(class) {
            let caps = match registry.resolve(class, &ident) {
                Ok(resolved) => resolved.capabilities(),
                Err(_) => continue,
            };
            let mut flags = Vec::new();
            if caps.float_samples {
                flags.push("float");
            }
            if caps.nonblocking {
                flags.push("nonblock");
            }
            if caps.bundled_input {
                flags.push("input");
            }
            if flags.is_empty() {
                println!("\t{}", ident);
            } else {
                println!("\t{} [{}]", ident, flags.join(", "));
            }
        }
    }
    #[cfg(feature = "alsa")]
    if !avdriver::backends::alsa_available() {
        println!("(no ALSA playback device could be opened)");
    }
}

fn probe(registry: Arc<BackendRegistry>, config: Option<PathBuf>) -> avdriver::Result<()> {
    let settings = match config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut drivers = DriverState::new(registry);
    let result = drivers.init_drivers(&settings);
    if result.is_ok() {
        print_state(&drivers);
    }
    drivers.uninit_drivers();
    result
}

fn print_state(drivers: &DriverState) {
    let video = drivers.video();
    if let Some(geometry) = video.geometry() {
        println!(
            "video:     {} ({}x{})",
            video.video_ident().unwrap_or("-"),
            geometry.width,
            geometry.height
        );
    }
    println!("upscale:   {}", video.upscale());
    println!(
        "input:     {} ({:?})",
        video.input_ident().unwrap_or("-"),
        video.ownership()
    );

    let audio = drivers.audio();
    if drivers.audio_active() {
        println!(
            "audio:     {} (chunk {} frames, float {})",
            audio.driver_ident().unwrap_or("-"),
            audio.chunk_size(),
            audio.use_float()
        );
    } else {
        println!("audio:     inactive");
    }
}

fn report(error: &Error) {
    eprintln!("avdriver: {}", error);
    if let Error::BackendNotFound(e) = error {
        eprint!("{}", e.listing());
    }
}
