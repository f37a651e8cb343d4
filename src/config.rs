use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub session_path: Option<PathBuf>,
    pub replay_interval: Duration,
    pub demo_frames: usize,
    pub persist: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            session_path: None,
            replay_interval: Duration::from_millis(1000),
            demo_frames: 120,
            persist: true,
        }
    }
}

impl WatchConfig {
    /// Reads `LIVE_*` variables. Call after dotenvy has loaded `.env` files.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let session_path = lookup("LIVE_SESSION_PATH")
            .filter(|val| !val.trim().is_empty())
            .map(|val| PathBuf::from(val.trim()));
        let replay_interval = lookup("LIVE_REPLAY_INTERVAL_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.replay_interval);
        let demo_frames = lookup("LIVE_DEMO_FRAMES")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.demo_frames)
            .clamp(1, 5000);
        let persist = lookup("LIVE_PERSIST")
            .map(|val| !matches!(val.trim().to_lowercase().as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(defaults.persist);
        Self {
            session_path,
            replay_interval,
            demo_frames,
            persist,
        }
    }
}
