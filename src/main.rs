use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use bevy_utils::tracing::warn;
use tracing_subscriber::EnvFilter;

use consent_cascade::data::session_config::DEFAULT_SESSION_CONFIG_PATH;
use consent_cascade::simulation::monologue::SequencerState;
use consent_cascade::ui::console::{render_status, ConsoleRenderer};
use consent_cascade::{load_session_config, PopupId, Session, SessionConfig};

const FRAME_MS: u64 = 16;
const MAX_SPAWN_PER_COMMAND: usize = 500;
const HELP: &str = "Commands: click <clear_history|turn_off_tracking|opt_out> | begin | spawn [n] | close <id> | accept | decline | tick [ms] | wait <ms> | status | log | help | quit";

struct CliArgs {
    config_path: PathBuf,
    seed: u64,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = parse_args(env::args().collect());
    let config = load_config(&args.config_path);

    let mut session = match Session::new(config, args.seed) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Failed to start session: {}", err);
            std::process::exit(1);
        }
    };
    session.subscribe(ConsoleRenderer::new(args.json));

    println!("{}", HELP);
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "click" => match parts.next() {
                Some(action) => {
                    if let Err(err) = session.on_user_action(action) {
                        println!("{}", err);
                    }
                }
                None => println!("Usage: click <clear_history|turn_off_tracking|opt_out>"),
            },
            "begin" => session.begin_escalation(),
            "spawn" => {
                let count = spawn_count(parts.next());
                let spawned = session.spawn_popups(count);
                if spawned.is_empty() {
                    println!("No popups spawned.");
                }
            }
            "close" => match parts.next().and_then(|raw| raw.trim_start_matches('#').parse().ok()) {
                Some(id) => {
                    session.on_popup_closed_by_user(PopupId(id));
                }
                None => println!("Usage: close <popup_id>"),
            },
            "accept" | "yes" => {
                if !session.on_decision_accept() {
                    println!("Nothing to accept.");
                }
            }
            "decline" | "no" => {
                if session.on_decision_decline().is_none() {
                    println!("Nothing to decline.");
                }
            }
            "tick" => {
                let dt = parse_or(parts.next(), FRAME_MS);
                session.tick(dt);
            }
            "wait" => match parts.next().and_then(|raw| raw.parse::<u64>().ok()) {
                Some(total) => play(&mut session, total),
                None => println!("Usage: wait <ms>"),
            },
            "status" => print!("{}", render_status(&session.snapshot())),
            "log" => print!("{}", session.action_log().render()),
            _ => println!("Unknown command '{}'. {}", cmd, HELP),
        }
    }

    session.dispose();
}

/// Runs real-time frames until `total_ms` elapsed or the monologue ends.
fn play(session: &mut Session, total_ms: u64) {
    let mut elapsed = 0;
    while elapsed < total_ms {
        let dt = FRAME_MS.min(total_ms - elapsed);
        thread::sleep(Duration::from_millis(dt));
        session.tick(dt);
        elapsed += dt;
        if session.sequencer_state() == SequencerState::Done {
            break;
        }
    }
}

fn load_config(path: &Path) -> SessionConfig {
    match load_session_config(path) {
        Ok(config) => config,
        Err(err) => {
            warn!("Failed to load session config from {}: {}", path.display(), err);
            SessionConfig::default()
        }
    }
}

fn parse_args(args: Vec<String>) -> CliArgs {
    let mut iter = args.iter().skip(1);
    let mut parsed = CliArgs {
        config_path: PathBuf::from(DEFAULT_SESSION_CONFIG_PATH),
        seed: 0,
        json: false,
    };
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(value) = iter.next() {
                    parsed.config_path = PathBuf::from(value);
                }
            }
            "--seed" => {
                if let Some(value) = iter.next() {
                    parsed.seed = value.parse().unwrap_or(0);
                }
            }
            "--json" => parsed.json = true,
            _ => {}
        }
    }
    parsed
}

/// Popups requested by one `spawn` command, capped.
fn spawn_count(raw: Option<&str>) -> usize {
    parse_or(raw, 1usize).min(MAX_SPAWN_PER_COMMAND)
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.parse().ok()).unwrap_or(default)
}
