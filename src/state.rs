use std::collections::VecDeque;

use log::{info, warn};

use crate::frames::{
    DetailsFrame, EventDetails, GameMetadata, GameState, Record, Side, TeamResult, WindowFrame,
};
use crate::view::{MatchView, SortMode, TableUi, ViewInput, build_match_view};

const MAX_LOGS: usize = 200;

/// Static per-match inputs that do not change frame to frame.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub metadata: GameMetadata,
    pub event: EventDetails,
    pub records: Option<Vec<Record>>,
    pub results: Option<Vec<TeamResult>>,
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetSession(Box<SessionInfo>),
    PushFrames {
        window: Box<WindowFrame>,
        details: Box<DetailsFrame>,
    },
    ToggleRow(u8),
    CycleSort(Side),
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GameState,
    pub to: GameState,
}

#[derive(Debug, Clone, Default)]
pub struct WatchState {
    pub session: Option<SessionInfo>,
    pub first_window: Option<WindowFrame>,
    pub last_window: Option<WindowFrame>,
    pub last_details: Option<DetailsFrame>,
    pub game_state: Option<GameState>,
    pub ui: TableUi,
    pub frames_seen: usize,
    pub logs: VecDeque<String>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn toggle_row(&mut self, participant_id: u8) {
        let entry = self.ui.expanded.entry(participant_id).or_insert(false);
        *entry = !*entry;
    }

    pub fn cycle_sort(&mut self, side: Side) {
        let sort = match side {
            Side::Blue => &mut self.ui.blue_sort,
            Side::Red => &mut self.ui.red_sort,
        };
        *sort = sort.next();
    }

    pub fn sort_for(&self, side: Side) -> SortMode {
        self.ui.sort_for(side)
    }

    /// Key used to persist per-game UI state.
    pub fn game_key(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        if !session.event.id.is_empty() {
            return Some(session.event.id.clone());
        }
        let teams = &session.event.match_info.teams;
        let codes: Vec<&str> = teams.iter().map(|t| t.code.as_str()).collect();
        if codes.is_empty() {
            None
        } else {
            Some(codes.join("-"))
        }
    }

    pub fn view(&self) -> Option<MatchView> {
        let session = self.session.as_ref()?;
        let last_window = self.last_window.as_ref()?;
        let input = ViewInput {
            first_window: self.first_window.as_ref().unwrap_or(last_window),
            last_window,
            last_details: self.last_details.as_ref()?,
            metadata: &session.metadata,
            event: &session.event,
            records: session.records.as_deref(),
            results: session.results.as_deref(),
            game_state: self.game_state,
        };
        Some(build_match_view(&input, &self.ui))
    }

    fn observe_game_state(&mut self, window: &WindowFrame) -> Option<Transition> {
        let current = match window.parsed_game_state() {
            Ok(state) => state,
            Err(err) => {
                warn!("frame at {}: {err}", window.rfc460_timestamp);
                self.push_log(format!("[WARN] {err}"));
                return None;
            }
        };
        // The first frame of a game only seeds the state, whatever was restored.
        let previous = self.game_state.replace(current);
        if self.frames_seen == 0 {
            return None;
        }
        let previous = previous?;
        if previous == current {
            return None;
        }
        let label = current.label().to_uppercase();
        info!("game status changed: {previous} -> {current}");
        self.push_log(format!("[INFO] Game status changed: {label}"));
        Some(Transition {
            from: previous,
            to: current,
        })
    }
}

/// Apply one update. Returns the game-state transition it caused, if any.
pub fn apply_delta(state: &mut WatchState, delta: Delta) -> Option<Transition> {
    match delta {
        Delta::SetSession(session) => {
            let had_session = state.session.is_some();
            let previous_key = state.game_key();
            state.session = Some(*session);
            if had_session && previous_key != state.game_key() {
                state.first_window = None;
                state.last_window = None;
                state.last_details = None;
                state.game_state = None;
                state.frames_seen = 0;
                state.ui = TableUi::default();
            }
            None
        }
        Delta::PushFrames { window, details } => {
            let transition = state.observe_game_state(&window);
            if state.first_window.is_none() {
                state.first_window = Some((*window).clone());
            }
            state.last_window = Some(*window);
            state.last_details = Some(*details);
            state.frames_seen += 1;
            transition
        }
        Delta::ToggleRow(participant_id) => {
            state.toggle_row(participant_id);
            None
        }
        Delta::CycleSort(side) => {
            state.cycle_sort(side);
            None
        }
        Delta::Log(msg) => {
            state.push_log(msg);
            None
        }
    }
}
