use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::frames::GameState;
use crate::state::WatchState;
use crate::view::SortMode;

const CACHE_DIR: &str = "lol_live_terminal";
const CACHE_FILE: &str = "watch.json";
const CACHE_VERSION: u32 = 1;
const MAX_GAMES: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    games: HashMap<String, GameCache>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GameCache {
    #[serde(default)]
    game_state: Option<GameState>,
    #[serde(default)]
    expanded: HashMap<u8, bool>,
    #[serde(default)]
    blue_sort: SortMode,
    #[serde(default)]
    red_sort: SortMode,
    #[serde(default)]
    saved_at: u64,
}

pub fn load_into_state(state: &mut WatchState) {
    if let Some(path) = cache_path() {
        load_into_state_from(&path, state);
    }
}

pub fn save_from_state(state: &WatchState) {
    if let Some(path) = cache_path() {
        save_from_state_to(&path, state);
    }
}

/// Restore UI state and the last announced game state for the current game.
pub fn load_into_state_from(path: &Path, state: &mut WatchState) {
    let Some(key) = state.game_key() else {
        return;
    };
    let Some(cache) = load_cache_file(path) else {
        return;
    };
    if cache.version != CACHE_VERSION {
        return;
    }
    let Some(game) = cache.games.get(&key) else {
        return;
    };
    debug!("restoring watch state for {key}");
    if state.game_state.is_none() {
        state.game_state = game.game_state;
    }
    state.ui.expanded = game.expanded.clone();
    state.ui.blue_sort = game.blue_sort;
    state.ui.red_sort = game.red_sort;
}

pub fn save_from_state_to(path: &Path, state: &WatchState) {
    let Some(key) = state.game_key() else {
        return;
    };
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);

    let mut cache = load_cache_file(path)
        .filter(|c| c.version == CACHE_VERSION)
        .unwrap_or_default();
    cache.version = CACHE_VERSION;
    cache.games.insert(
        key,
        GameCache {
            game_state: state.game_state,
            expanded: state.ui.expanded.clone(),
            blue_sort: state.ui.blue_sort,
            red_sort: state.ui.red_sort,
            saved_at: now_secs(),
        },
    );
    prune_oldest(&mut cache.games);

    if let Ok(json) = serde_json::to_string(&cache) {
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, path);
        }
    }
}

fn prune_oldest(games: &mut HashMap<String, GameCache>) {
    while games.len() > MAX_GAMES {
        let Some(oldest) = games
            .iter()
            .min_by_key(|(_, g)| g.saved_at)
            .map(|(k, _)| k.clone())
        else {
            return;
        };
        games.remove(&oldest);
    }
}

fn load_cache_file(path: &Path) -> Option<CacheFile> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str::<CacheFile>(&raw).ok()
}

fn cache_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
