use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use focusroom_core::cue::PULSE_OFFSETS_MS;
use focusroom_core::{
    format_clock, Config, CueRequest, CueScheduler, Event, FocusController, MemoryStore,
    PersistenceStatus, SessionStore, SilentCue, TimerEngine,
};

use crate::sinks;

#[derive(Args)]
pub struct RunArgs {
    /// What you are working on
    #[arg(long, short)]
    pub title: String,
    /// Preset label (defaults to the first configured preset)
    #[arg(long, short)]
    pub preset: Option<String>,
    /// Do not open a calendar event when the session completes
    #[arg(long)]
    pub no_calendar: bool,
    /// Keep the session history in memory only
    #[arg(long)]
    pub ephemeral: bool,
    /// Do not print the live countdown
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_countdown(args, config))
}

async fn run_countdown(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(config.catalog()?);
    let cue: Arc<dyn CueRequest> = if config.cue.enabled {
        Arc::new(CueScheduler::new(
            tokio::runtime::Handle::current(),
            sinks::default_sink(),
            config.cue.tone(),
        ))
    } else {
        Arc::new(SilentCue)
    };

    let store: Box<dyn SessionStore> = if args.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        super::open_store()
    };

    let mut calendar = config.calendar.clone();
    if args.no_calendar {
        calendar.open_on_complete = false;
    }

    let mut controller = FocusController::open(TimerEngine::new(catalog, cue), store, calendar);
    if let PersistenceStatus::MemoryOnly { reason } = controller.persistence_status() {
        eprintln!("warning: session history will not be saved ({reason})");
    }

    if let Some(label) = &args.preset {
        controller.select_preset(label)?;
    }
    controller.set_title(args.title);
    controller.start()?;
    status_line(&controller, args.quiet);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let completed = loop {
        tokio::select! {
            event = controller.next_tick() => {
                match event {
                    Some(event @ Event::TimerCompleted { .. }) => break event,
                    _ => status_line(&controller, args.quiet),
                }
            }
            _ = &mut ctrl_c => {
                controller.shutdown();
                if !args.quiet {
                    eprintln!();
                }
                let snapshot = controller.engine().snapshot();
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }
        }
    };

    if !args.quiet {
        eprintln!();
    }
    println!("{}", serde_json::to_string_pretty(&completed)?);
    if completed.completed_record().is_none() {
        eprintln!("session finished without a title; nothing recorded");
    } else if let PersistenceStatus::MemoryOnly { reason } = controller.persistence_status() {
        eprintln!("warning: session recorded in memory only and will be lost on exit ({reason})");
    }

    if config.cue.enabled {
        // Keep the runtime alive until the last pulse has played.
        let last = PULSE_OFFSETS_MS.iter().max().copied().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(last + config.cue.decay_ms)).await;
    }
    Ok(())
}

fn status_line(controller: &FocusController, quiet: bool) {
    if quiet {
        return;
    }
    let engine = controller.engine();
    let mut err = std::io::stderr();
    // Best effort.
    let _ = write!(
        err,
        "\r{}  {}  {}   ",
        format_clock(engine.remaining_secs()),
        engine.active_preset().label,
        engine.title()
    );
    let _ = err.flush();
}
