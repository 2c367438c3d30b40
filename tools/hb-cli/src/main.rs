use std::env;
use std::fs;
use std::process::ExitCode;

use hb_data::EngineConfig;
use hb_engine::simulation::Simulation;
use hb_types::enums::{StarLevel, Team};
use hb_types::event::EventKind;
use hb_types::HexCoord;

struct Args {
    seed: u64,
    blue_unit: String,
    red_unit: String,
    verbosity: u8,
    output: Option<String>,
}

fn parse_args() -> Args {
    let raw: Vec<String> = env::args().collect();
    let mut seed = 42u64;
    let mut blue_unit = "brawler".to_string();
    let mut red_unit = "marksman".to_string();
    let mut verbosity = 0u8;
    let mut output = None;

    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--seed" | "-s" => {
                i += 1;
                if i < raw.len() {
                    seed = raw[i].parse().unwrap_or(seed);
                }
            }
            "--blue" => {
                i += 1;
                if i < raw.len() {
                    blue_unit = raw[i].clone();
                }
            }
            "--red" => {
                i += 1;
                if i < raw.len() {
                    red_unit = raw[i].clone();
                }
            }
            "--output" | "-o" => {
                i += 1;
                if i < raw.len() {
                    output = Some(raw[i].clone());
                }
            }
            "-v" => verbosity = verbosity.max(1),
            "-vv" => verbosity = verbosity.max(2),
            _ => {}
        }
        i += 1;
    }

    Args { seed, blue_unit, red_unit, verbosity, output }
}

fn install_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).without_time().finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> ExitCode {
    let args = parse_args();
    install_tracing(args.verbosity);

    let mut sim = Simulation::new(args.seed, EngineConfig::default());

    if let Err(e) = sim.add_unit(&args.blue_unit, Team::Blue, HexCoord::new(0, 0), StarLevel::Two) {
        eprintln!("configuration error: {e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = sim.add_unit(&args.red_unit, Team::Red, HexCoord::new(6, 0), StarLevel::Two) {
        eprintln!("configuration error: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(seed = args.seed, blue = %args.blue_unit, red = %args.red_unit, "SIMULATION_START");
    let result = sim.run();
    tracing::info!(winner = ?result.winner_team, ticks = result.total_ticks, "SIMULATION_END");

    println!("seed: {}", args.seed);
    println!("blue: {}  red: {}", args.blue_unit, args.red_unit);
    match result.winner_team {
        Some(Team::Blue) => println!("winner: blue"),
        Some(Team::Red) => println!("winner: red"),
        None => println!("winner: none (timed out)"),
    }
    println!("total_ticks: {}", result.total_ticks);
    println!("deaths_per_team: blue={} red={}", result.deaths_per_team[0], result.deaths_per_team[1]);

    if args.verbosity > 0 {
        for event in sim.event_log().iter() {
            print_event(event);
        }
    }

    if let Some(path) = &args.output {
        match serde_json::to_string_pretty(sim.event_log()) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    eprintln!("failed to write event log to {path}: {e}");
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => {
                eprintln!("failed to serialize event log: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_event(event: &hb_types::event::Event) {
    match &event.kind {
        EventKind::UnitDamage { unit_id, target_id, final_damage, crit, dodged, .. } => {
            println!(
                "  [{}] {} -> {} : {:.1} dmg{}{}",
                event.tick,
                unit_id,
                target_id,
                final_damage,
                if *crit { " (crit)" } else { "" },
                if *dodged { " (dodged)" } else { "" },
            );
        }
        EventKind::UnitDeath { unit_id } => {
            println!("  [{}] {} died", event.tick, unit_id);
        }
        EventKind::StateChange { unit_id, from, to } => {
            println!("  [{}] {} {} -> {}", event.tick, unit_id, from, to);
        }
        other => {
            println!("  [{}] {:?}", event.tick, other);
        }
    }
}
