// ABOUTME: Main entry point for the blogagogo program.
// ABOUTME: Provides CLI interface for building the site once or building and serving it.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use blogagogo::{Config, Generator, WatchConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site from the content directory
    Build(BuildArgs),

    /// Build the site, then serve it over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Remove all files from previous runs first
    #[arg(long)]
    clean: bool,

    /// Keep rescanning the content directory for changes
    #[arg(short, long)]
    watch: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Port number
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Remove all files from previous runs first
    #[arg(long)]
    clean: bool,

    /// Keep rescanning the content directory for changes
    #[arg(short, long)]
    watch: bool,
}

/// Load the config and run the first build pass
fn first_build(config_path: &Path, clean: bool, watch: bool) -> anyhow::Result<Generator> {
    let mut config = Config::from_file(config_path)?;
    config.watch |= watch;

    if clean {
        blogagogo::clean_previous_run(&config).context("Failed to clean previous run")?;
    }

    let mut generator = Generator::new(config)?;
    let report = generator.build().context("Initial build failed")?;
    println!("Site built: {}", report);
    Ok(generator)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Build(args)) => {
            let mut generator = first_build(&cli.config, args.clean, args.watch)?;
            if generator.config().watch {
                let watch_config = WatchConfig::from_config(generator.config());
                println!("Watching for changes (Press Ctrl+C to stop)");
                blogagogo::watch_site(&mut generator, &watch_config)?;
            }
            Ok(())
        }
        Some(Commands::Serve(args)) => {
            let mut generator = first_build(&cli.config, args.clean, args.watch)?;
            let server = blogagogo::start_server(generator.resolver(), args.port)?;
            println!("Serving on http://localhost:{} (Press Ctrl+C to stop)", args.port);

            if generator.config().watch {
                let watch_config = WatchConfig::from_config(generator.config());
                blogagogo::watch_site(&mut generator, &watch_config)?;
            }
            server
                .join()
                .map_err(|_| anyhow::anyhow!("HTTP server thread panicked"))
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
