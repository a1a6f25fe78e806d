//! taskbridge CLI - Demo host for the bridge
//!
//! Commands:
//! - `taskbridge demo` - Run the demo scenarios on a host event loop
//! - `taskbridge scrape` - Save the URLs linked from a page

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod host;

#[derive(Parser)]
#[command(name = "taskbridge")]
#[command(author, version, about = "Run native tasks on a host event loop", long_about = None)]
struct Cli {
    /// Bridge configuration file (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the value, sleep, exception, queue and cancel scenarios
    Demo {
        /// Also scrape this URL
        #[arg(long, requires = "output")]
        url: Option<String>,

        /// Where the scraped URLs are written
        #[arg(long, requires = "url")]
        output: Option<PathBuf>,
    },

    /// Fetch a page and write the URLs it links to
    Scrape {
        /// Page to fetch
        url: String,

        /// Output file, one URL per line
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    taskbridge_logging::init_logging(config.level()?);

    let mut host = host::Host::new(&config)?;
    let outcome = match cli.command {
        Commands::Demo { url, output } => {
            let scrape = url.zip(output);
            demo::run(&mut host, scrape)
        }
        Commands::Scrape { url, output } => demo::scrape(&mut host, url, output),
    };
    if !host.finish() {
        println!(
            "Gave up waiting for {} bridge(s) after {} ms",
            host.bridge().active_bridges(),
            config.shutdown_timeout_ms
        );
    }

    outcome
}
