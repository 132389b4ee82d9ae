/// Prints a saved event log in human-readable form
///
/// Reads the JSON written at the end of a session (see `[logging]` in config.toml)
use plaguedoctor::event_log::EventLog;
use plaguedoctor::session::{GameEvent, InfectionCause};
use std::env;

fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::PatientCoughed { patient } => format!("patient {} coughs", patient.0),
        GameEvent::TreatmentStarted { player, patient } => {
            format!("player {} starts treating patient {}", player.0, patient.0)
        }
        GameEvent::PatientTreated { player, patient, was_infected } => format!(
            "player {} treated patient {}{}",
            player.0,
            patient.0,
            if *was_infected { " (plague)" } else { "" }
        ),
        GameEvent::PlayerInfected { player, cause } => match cause {
            InfectionCause::Proximity => format!("player {} caught the plague from another player", player.0),
            InfectionCause::Treatment(patient) => {
                format!("player {} caught the plague from patient {}", player.0, patient.0)
            }
        },
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <event_log.json> [--no-coughs]", args[0]);
        std::process::exit(1);
    }
    let hide_coughs = args.iter().any(|a| a == "--no-coughs");

    let log = match EventLog::load_from_file(&args[1]) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args[1], e);
            std::process::exit(1);
        }
    };

    println!("=== Event Log: {} ===", args[1]);
    for logged in log.events() {
        if hide_coughs && matches!(logged.event, GameEvent::PatientCoughed { .. }) {
            continue;
        }
        println!("[{:8}ms] {}", logged.timestamp_ms, describe(&logged.event));
    }

    println!("\n=== Summary ===");
    println!("{}", log.summary());
}
