use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod sinks;

#[derive(Parser)]
#[command(name = "focusroom", version, about = "Focusroom focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a countdown in the foreground
    Run(commands::run::RunArgs),
    /// List the configured presets
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Completed session history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Build a Google Calendar event link
    Calendar(commands::calendar::CalendarArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    logging::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Presets { json } => commands::presets::run(json),
        Commands::History { action } => commands::history::run(action),
        Commands::Calendar(args) => commands::calendar::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
