//! Offline catch-up replay CLI.
//!
//! Starts one activity on a fresh save, pretends the player was away for a
//! number of ticks, replays them and prints the away report.
//!
//! Usage:
//!   cargo run --bin catchup -- [OPTIONS]
//!
//! Options:
//!   -t, --ticks <N>        ticks away (default 36000, one hour)
//!   -s, --seed <N>         RNG seed (default: random)
//!   -c, --chunk <N>        ticks per chunk (default 1000)
//!   -a, --activity <KIND:ID>  gather:<action>[#recipe] | course:<a>,<b>,.. |
//!                            monster:<id> | dungeon:<id> (default gather:normal_tree)
//!       --json             print the report as JSON
//!
//! Examples:
//!   cargo run --bin catchup -- -t 72000 -s 42
//!   cargo run --bin catchup -- --activity dungeon:goblin_camp --json

use idlesim::core::constants::TICK_INTERVAL_MS;
use idlesim::core::ids::{ActionId, DungeonId, MonsterId};
use idlesim::core::{GameSession, GameState, ToggleError};
use idlesim::drops::StandardDrops;
use idlesim::modifiers::NoModifiers;
use idlesim::registry::Registry;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

struct Options {
    ticks: u64,
    seed: Option<u64>,
    chunk: u64,
    activity: String,
    json: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ticks: 36_000,
            seed: None,
            chunk: idlesim::core::constants::CATCH_UP_CHUNK_TICKS,
            activity: "gather:normal_tree".to_string(),
            json: false,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    let seed = options.seed.unwrap_or_else(rand::random);

    let mut session = GameSession::new(
        GameState::new(0),
        Registry::builtin(),
        Box::new(NoModifiers),
        Box::new(StandardDrops),
    );
    if let Err(e) = start_activity(&mut session, &options.activity) {
        eprintln!("Cannot start `{}`: {}", options.activity, e);
        return ExitCode::FAILURE;
    }

    tracing::info!(seed, ticks = options.ticks, chunk = options.chunk, "replaying");
    let now_ms = options.ticks as i64 * TICK_INTERVAL_MS;
    let simulator = session
        .begin_catch_up(now_ms, ChaCha8Rng::seed_from_u64(seed))
        .with_chunk_size(options.chunk);
    let result = simulator.run_with(&session.context(), |progress| {
        tracing::debug!(percent = progress.fraction() * 100.0, "catch-up progress");
    });
    let away = session.finish_catch_up(result);

    if options.json {
        match serde_json::to_string_pretty(away) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Seed: {}", seed);
        println!("{}", away.to_text());
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn start_activity(session: &mut GameSession, activity: &str) -> Result<(), ToggleError> {
    let (kind, id) = activity.split_once(':').unwrap_or(("gather", activity));
    match kind {
        "course" => session.start_course(id.split(',').map(ActionId::new).collect()),
        "monster" => session.start_monster(&MonsterId::new(id)),
        "dungeon" => session.start_dungeon(&DungeonId::new(id)),
        _ => {
            let (action, recipe) = match id.split_once('#') {
                Some((action, index)) => (action, index.parse().ok()),
                None => (id, None),
            };
            session.start_gathering(&ActionId::new(action), recipe)
        }
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-t" | "--ticks" => {
                if i + 1 < args.len() {
                    options.ticks = args[i + 1].parse().unwrap_or(options.ticks);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    options.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-c" | "--chunk" => {
                if i + 1 < args.len() {
                    options.chunk = args[i + 1].parse().unwrap_or(options.chunk);
                    i += 1;
                }
            }
            "-a" | "--activity" => {
                if i + 1 < args.len() {
                    options.activity = args[i + 1].clone();
                    i += 1;
                }
            }
            "--json" => options.json = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => eprintln!("Ignoring unknown argument `{}`", other),
        }
        i += 1;
    }

    options
}

fn print_help() {
    println!("Offline catch-up replay");
    println!();
    println!("Usage: catchup [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -t, --ticks <N>        Ticks away (default: 36000)");
    println!("  -s, --seed <N>         RNG seed (default: random)");
    println!("  -c, --chunk <N>        Ticks per chunk (default: 1000)");
    println!("  -a, --activity <KIND:ID>  gather:<action>[#recipe], course:<a>,<b>,");
    println!("                            monster:<id>, dungeon:<id>");
    println!("      --json             Print the report as JSON");
    println!("  -h, --help             Show this help");
}
