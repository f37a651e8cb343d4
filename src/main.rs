use std::io::{self, BufReader, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info};

use lol_live_terminal::config::WatchConfig;
use lol_live_terminal::feed;
use lol_live_terminal::persist;
use lol_live_terminal::state::{Delta, WatchState, apply_delta};

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = WatchConfig::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.session_path = Some(PathBuf::from(path));
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &WatchConfig) -> Result<()> {
    let session = match &config.session_path {
        Some(path) => feed::load_session(path)?,
        None => {
            info!(
                "no session given, replaying {} synthetic frames",
                config.demo_frames
            );
            feed::synthetic_session(config.demo_frames, Utc::now(), &mut rand::thread_rng())
        }
    };

    let (tx, rx) = mpsc::channel();
    // Piped stdin carries `toggle <id>` / `sort blue|red` lines.
    let mut commands_tx = (!io::stdin().is_terminal()).then(|| tx.clone());
    let provider = feed::spawn_replay(session, config.replay_interval, tx);

    let mut state = WatchState::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for delta in rx {
        let is_session = matches!(delta, Delta::SetSession(_));
        let is_frame = matches!(delta, Delta::PushFrames { .. });
        if let Delta::Log(msg) = &delta {
            info!("{msg}");
        }

        apply_delta(&mut state, delta);

        if is_session {
            if config.persist {
                persist::load_into_state(&mut state);
            }
            // Commands start after the session so a restore cannot overwrite them.
            if let Some(tx) = commands_tx.take() {
                let _ = feed::spawn_commands(BufReader::new(io::stdin()), tx);
            }
        }
        if is_frame && let Some(view) = state.view() {
            serde_json::to_writer(&mut out, &view).context("write view")?;
            writeln!(out).context("write view")?;
        }
    }

    let _ = provider.join();
    if config.persist {
        persist::save_from_state(&state);
    }
    info!("replayed {} frames", state.frames_seen);
    Ok(())
}
