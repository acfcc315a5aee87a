use clap::{Parser, Subcommand};
use multitimer_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod notifier;

#[derive(Parser)]
#[command(name = "multitimer", version, about = "Multiple named countdown timers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single countdown in the foreground
    Countdown(commands::countdown::CountdownArgs),
    /// Interactive board of timers driven from stdin
    Session(commands::session::SessionArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MULTITIMER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Countdown(args) => commands::countdown::run(args, &Config::load_or_default()),
        Commands::Session(args) => commands::session::run(args, &Config::load_or_default()),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
