use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tinywins", version, about = "Tiny Wins habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identity selection
    Identity {
        #[command(subcommand)]
        action: commands::identity::IdentityAction,
    },
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Daily check-ins and streaks
    Checkin {
        #[command(subcommand)]
        action: commands::checkin::CheckinAction,
    },
    /// Pause and resume progress
    Recovery {
        #[command(subcommand)]
        action: commands::recovery::RecoveryAction,
    },
    /// Encouraging and celebration messages
    Message {
        #[command(subcommand)]
        action: commands::message::MessageAction,
    },
    /// Celebration intensity
    Whimsy {
        #[command(subcommand)]
        action: commands::whimsy::WhimsyAction,
    },
    /// Progress statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TINYWINS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Identity { action } => commands::identity::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Checkin { action } => commands::checkin::run(action),
        Commands::Recovery { action } => commands::recovery::run(action),
        Commands::Message { action } => commands::message::run(action),
        Commands::Whimsy { action } => commands::whimsy::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
