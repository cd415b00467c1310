use crate::fleet::FleetRegistry;
use crate::scenario::Scenario;
use crate::schedule::scheduler::TripScheduler;
use crate::schedule::trip_id::{RandomTripIds, TripIdGenerator};
use crate::store::{InMemoryTripStore, InMemoryVehicleStore};
use crate::time::{Clock, SimClock, parse_instant, parse_offset};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::settings::Style;
use tracing::Level;

mod airport;
mod api;
mod error;
mod fleet;
mod scenario;
mod schedule;
mod store;
mod time;
mod trip;
mod vehicle;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Log level for diagnostics written to stderr
    #[arg(short, long, value_name = "LEVEL", default_value = "warn")]
    log_level: Level,

    /// Seed for trip id generation
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the clock frozen at this ISO-8601 instant
    #[arg(long, value_name = "ISO")]
    now: Option<String>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => println!("{}", e.to_string().red()),
    }
}

fn print_fleet(scheduler: &TripScheduler, vehicle_id: Option<&str>) {
    let listing = match vehicle_id {
        Some(id) => scheduler.fleet().vehicle(id).map(|v| v.into_iter().collect::<Vec<_>>()),
        None => scheduler.fleet().vehicles(),
    };
    match listing {
        Ok(vehicles) if vehicles.is_empty() => println!("No matching vehicles found."),
        Ok(vehicles) => {
            let mut table = tabled::Table::new(&vehicles);
            table.with(Style::rounded());
            table.with(tabled::settings::Alignment::left());
            println!("{}", table);
        }
        Err(e) => println!("{}", e.to_string().red()),
    }
}

fn run_clock(clock: &SimClock, arg: Option<&str>) {
    match arg {
        None => {}
        Some("now") => clock.resume(),
        Some(offset) if offset.starts_with('+') => match parse_offset(offset) {
            Some(by) => clock.advance(by),
            None => println!("Usage: clock +<minutes>"),
        },
        Some(iso) => match parse_instant(iso) {
            Some(at) => clock.freeze(at),
            None => println!("{}", format!("Invalid instant: {}", iso).red()),
        },
    }
    let mode = if clock.is_frozen() { "frozen" } else { "running" };
    println!("Clock {} at {}", mode, clock.now());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let scenario = Scenario::load_from_file(&args.scenario)?;
    println!(
        "Dispatch online. Loaded {} vehicles from {}",
        scenario.vehicles.len(),
        args.scenario.display()
    );

    let clock = match &args.now {
        Some(now) => {
            let at = parse_instant(now).ok_or_else(|| format!("Invalid --now instant: {}", now))?;
            Arc::new(SimClock::frozen_at(at))
        }
        None => Arc::new(SimClock::system()),
    };
    let ids: Box<dyn TripIdGenerator> = match args.seed {
        Some(seed) => Box::new(RandomTripIds::seeded(seed)),
        None => Box::new(RandomTripIds::from_os_rng()),
    };
    let routes = scenario.route_table();
    let scheduler = TripScheduler::new(
        FleetRegistry::new(Box::new(InMemoryVehicleStore::new(scenario.vehicles))),
        Box::new(InMemoryTripStore::new()),
        routes,
        clock.clone(),
        ids,
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "fleet".to_string(),
            "request".to_string(),
            "cancel".to_string(),
            "status".to_string(),
            "http".to_string(),
            "clock".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "fleet" | "ls" => print_fleet(&scheduler, parts.get(1).copied()),
                    "request" => {
                        if let (Some(from), Some(to), Some(at)) = (parts.get(1), parts.get(2), parts.get(3)) {
                            match scheduler.request_trip(from, to, at) {
                                Ok(status) => {
                                    println!("{}", format!("Trip {} booked.", status.trip_id).green());
                                    print_json(&status);
                                }
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: request <from> <to> <iso_time>");
                        }
                    },
                    "cancel" => {
                        if let Some(id) = parts.get(1) {
                            match scheduler.cancel_trip(id) {
                                Ok(message) => println!("{}", message.green()),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: cancel <trip_id>");
                        }
                    },
                    "status" => {
                        if let Some(id) = parts.get(1) {
                            match scheduler.trip_status(id) {
                                Ok(status) => print_json(&status),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: status <trip_id>");
                        }
                    },
                    "http" => {
                        // the body may contain spaces, so keep the remainder intact
                        let pieces: Vec<&str> = trimmed.splitn(4, ' ').collect();
                        if let (Some(method), Some(path)) = (pieces.get(1), pieces.get(2)) {
                            let response = api::handle(&scheduler, method, path, pieces.get(3).copied());
                            let code = response.status.to_string();
                            if response.status < 400 {
                                println!("{}", code.green());
                            } else {
                                println!("{}", code.red());
                            }
                            print_json(&response.body);
                        } else {
                            println!("Usage: http <METHOD> <PATH> [json_body]");
                        }
                    },
                    "clock" => run_clock(&clock, parts.get(1).copied()),
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  fleet [vehicle_id]        - List all vehicles, or one, in a table");
                        println!("  request <from> <to> <iso> - Book a trip, e.g. request JFK LAX 2025-06-01T00:00:00Z");
                        println!("  cancel <trip_id>          - Cancel a trip; frees the vehicle if not yet departed");
                        println!("  status <trip_id>          - Show a trip and where it is now");
                        println!("  http <METHOD> <PATH> [b]  - Call the service boundary, e.g. http GET /trip/TRIP-X");
                        println!("  clock [iso|now|+<m>]      - Show, freeze, resume or advance the clock");
                        println!("  help / ?                  - Show this help menu");
                        println!("  exit / quit               - Exit the dispatcher\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
