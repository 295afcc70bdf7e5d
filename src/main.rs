//! Year Arcade entry point
//!
//! Without a display backend the binary runs attract mode: one round of the
//! requested year (default 1972) in real time with an idle player and no
//! display, then logs the outcome.
//!
//! Usage: `year-arcade [YEAR]`

use std::env;
use std::process::ExitCode;

use year_arcade::Options;
use year_arcade::games::{BuiltinCatalog, Catalog, Year};
use year_arcade::launcher::LaunchConfig;
use year_arcade::platform::{Console, ScriptedInput, SystemClock};
use year_arcade::renderer::NullPresenter;
use year_arcade::sim::{Round, RoundOutcome, Scheduler, SchedulerConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = LaunchConfig::from_env();
    log::info!("Data directory: {}", config.data_dir.display());

    let year = match env::args().nth(1) {
        None => Year::Y1972,
        Some(arg) => match arg.parse().ok().and_then(Year::from_number) {
            Some(year) => year,
            None => {
                log::error!("Unknown year: {}", arg);
                return ExitCode::FAILURE;
            }
        },
    };

    let mut options = Options::load(&config.options_path());
    let settings = options.snapshot();
    let catalog = BuiltinCatalog::new(seed());

    let Some(game) = catalog.create(year) else {
        log::warn!("{} ({}) is not available yet", year.number(), year.title());
        return ExitCode::FAILURE;
    };

    log::info!(
        "Attract mode: {} {} ({})",
        year.number(),
        year.title(),
        settings.difficulty.as_str()
    );
    let mut console = Console::new(
        Box::new(SystemClock::new()),
        Box::new(ScriptedInput::new()),
        Box::new(NullPresenter::default()),
    );
    console.audio.set_enabled(settings.sound_enabled);
    let mut scheduler = Scheduler::new(SchedulerConfig::default());

    match Round::new(game).play(&mut scheduler, &settings, &mut console) {
        RoundOutcome::Completed {
            won, score, detail, ..
        } => {
            log::info!(
                "Round over: {} score {} ({})",
                if won { "won" } else { "lost" },
                score,
                detail
            );
        }
        RoundOutcome::Aborted => log::info!("Round aborted"),
    }

    if let Err(e) = options.save_if_dirty(&config.options_path()) {
        log::warn!("Failed to save options: {}", e);
    }
    ExitCode::SUCCESS
}

fn seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
