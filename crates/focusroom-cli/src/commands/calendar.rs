use chrono::Utc;
use clap::Args;
use focusroom_core::{CalendarLink, Config, CoreError};

#[derive(Args)]
pub struct CalendarArgs {
    /// Id of a completed session
    #[arg(conflicts_with_all = ["title", "preset"], required_unless_present = "title")]
    pub id: Option<String>,
    /// Title of a session that has not been run yet
    #[arg(long, short)]
    pub title: Option<String>,
    /// Preset for --title (defaults to the first configured preset)
    #[arg(long, short, requires = "title")]
    pub preset: Option<String>,
    /// Open the link in the default browser
    #[arg(long)]
    pub open: bool,
}

pub fn run(args: CalendarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    let link: CalendarLink = match (args.id, args.title) {
        (Some(id), _) => {
            let controller = super::open_durable_controller(&config)?;
            let id = controller
                .history()
                .resolve_id(&id)
                .ok_or(CoreError::SessionNotFound(id))?;
            controller.calendar_link_for(&id)?
        }
        (None, Some(title)) => {
            let mut controller = super::open_controller(&config)?;
            if let Some(label) = &args.preset {
                controller.select_preset(label)?;
            }
            controller.set_title(title);
            controller.calendar_link_for_current(Utc::now())?
        }
        (None, None) => return Err("either a session id or --title is required".into()),
    };

    println!("{link}");
    if args.open {
        link.open()?;
    }
    Ok(())
}
