use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dayboard", version, about = "Dayboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prioritized task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Timeline block management
    Block {
        #[command(subcommand)]
        action: commands::block::BlockAction,
    },
    /// Recurring series
    Series {
        #[command(subcommand)]
        action: commands::series::SeriesAction,
    },
    /// Progress statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Water intake tracker
    Water {
        #[command(subcommand)]
        action: commands::water::WaterAction,
    },
    /// Day lifecycle
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Memory-match break game
    Memory {
        #[command(subcommand)]
        action: commands::memory::MemoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Block { action } => commands::block::run(action),
        Commands::Series { action } => commands::series::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Water { action } => commands::water::run(action),
        Commands::Day { action } => commands::day::run(action),
        Commands::Memory { action } => commands::memory::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
