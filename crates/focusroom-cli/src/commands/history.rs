use clap::Subcommand;
use focusroom_core::Config;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List completed sessions, most recent first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a session by id
    Delete {
        /// Session id
        id: String,
    },
    /// Session count and total focused minutes
    Stats,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut controller = super::open_durable_controller(&config)?;

    match action {
        HistoryAction::List { json } => {
            let sessions = controller.history().recent_first();
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("No completed sessions yet.");
            } else {
                for s in &sessions {
                    println!(
                        "{}  {} {}  {} min  {}  {}",
                        s.id,
                        s.date,
                        s.completed_local_time(),
                        s.duration_min,
                        s.session_type,
                        s.title
                    );
                }
            }
        }
        HistoryAction::Delete { id: raw } => match controller.history().resolve_id(&raw) {
            Some(id) => {
                controller
                    .delete_session(&id)
                    .map_err(|e| format!("session {id} was not deleted from storage: {e}"))?;
                println!("deleted {id}");
            }
            None => println!("no session with id {raw}"),
        },
        HistoryAction::Stats => {
            let totals = controller.history().totals();
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
    }
    Ok(())
}
