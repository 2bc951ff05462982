//! Virtual hat try-on backend server binary.

use anyhow::Result;
use clap::Parser;
use hat_tryon::config::Config;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Landmark extractor backend (synthetic, none)
    #[arg(short, long)]
    extractor: Option<String>,

    /// Smoothing factor in [0, 1] (0 = no smoothing, 1 = frozen)
    #[arg(short, long)]
    smoothing: Option<f64>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    // CLI flags override the file
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(extractor) = args.extractor {
        config.detection.extractor = extractor;
    }
    if let Some(smoothing) = args.smoothing {
        config.smoothing.factor = smoothing;
    }
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(hat_tryon::server::run(config))?;
    Ok(())
}
