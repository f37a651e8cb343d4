use std::fs;
use std::path::PathBuf;

use lol_live_terminal::feed::{Session, parse_session_json};
use lol_live_terminal::frames::{GameState, Side};
use lol_live_terminal::state::{Delta, Transition, WatchState, apply_delta};
use lol_live_terminal::view::SortMode;

fn session() -> Session {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("session.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_session_json(&raw).expect("fixture should parse")
}

fn push_frame(state: &mut WatchState, session: &Session, idx: usize) -> Option<Transition> {
    let details = session.details_frames.last().expect("details frame");
    apply_delta(
        state,
        Delta::PushFrames {
            window: Box::new(session.window_frames[idx].clone()),
            details: Box::new(details.clone()),
        },
    )
}

#[test]
fn first_frame_sets_state_without_notification() {
    let session = session();
    let mut state = WatchState::new();
    apply_delta(&mut state, Delta::SetSession(Box::new(session.info())));

    assert_eq!(push_frame(&mut state, &session, 0), None);
    assert_eq!(state.game_state, Some(GameState::InGame));
    assert!(state.logs.is_empty());
    assert_eq!(state.frames_seen, 1);
}

#[test]
fn state_change_is_announced_once() {
    let session = session();
    let mut state = WatchState::new();
    apply_delta(&mut state, Delta::SetSession(Box::new(session.info())));
    push_frame(&mut state, &session, 0);

    let paused = push_frame(&mut state, &session, 1);
    assert_eq!(
        paused,
        Some(Transition {
            from: GameState::InGame,
            to: GameState::Paused,
        })
    );
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[INFO] Game status changed: PAUSED")
    );

    // Same state again: nothing new.
    assert_eq!(push_frame(&mut state, &session, 1), None);
    assert_eq!(state.logs.len(), 1);

    let resumed = push_frame(&mut state, &session, 2);
    assert_eq!(resumed.map(|t| t.to), Some(GameState::InGame));
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[INFO] Game status changed: IN GAME")
    );
}

#[test]
fn unknown_game_state_is_logged_and_previous_kept() {
    let session = session();
    let mut state = WatchState::new();
    apply_delta(&mut state, Delta::SetSession(Box::new(session.info())));
    push_frame(&mut state, &session, 0);

    let mut broken = session.window_frames[1].clone();
    broken.game_state = "halftime".to_string();
    let transition = apply_delta(
        &mut state,
        Delta::PushFrames {
            window: Box::new(broken),
            details: Box::new(session.details_frames[0].clone()),
        },
    );
    assert_eq!(transition, None);
    assert_eq!(state.game_state, Some(GameState::InGame));
    assert!(
        state
            .logs
            .back()
            .is_some_and(|l| l.starts_with("[WARN]") && l.contains("halftime"))
    );
    // The frame itself is still taken.
    assert_eq!(state.frames_seen, 2);
}

#[test]
fn first_window_is_kept_for_the_clock() {
    let session = session();
    let mut state = WatchState::new();
    apply_delta(&mut state, Delta::SetSession(Box::new(session.info())));
    for idx in 0..3 {
        push_frame(&mut state, &session, idx);
    }
    let view = state.view().expect("view available");
    assert_eq!(view.in_game_time, "1:01:05");
}

#[test]
fn toggle_rows_by_participant_id() {
    let mut state = WatchState::new();
    apply_delta(&mut state, Delta::ToggleRow(3));
    apply_delta(&mut state, Delta::ToggleRow(8));
    assert!(state.ui.is_expanded(3));
    assert!(state.ui.is_expanded(8));
    assert!(!state.ui.is_expanded(4));

    apply_delta(&mut state, Delta::ToggleRow(3));
    assert!(!state.ui.is_expanded(3));
    assert!(state.ui.is_expanded(8));
}

#[test]
fn sort_cycles_per_table() {
    let mut state = WatchState::new();
    apply_delta(&mut state, Delta::CycleSort(Side::Red));
    assert_eq!(state.sort_for(Side::Red), SortMode::Gold);
    assert_eq!(state.sort_for(Side::Blue), SortMode::Role);

    for _ in 0..4 {
        apply_delta(&mut state, Delta::CycleSort(Side::Red));
    }
    assert_eq!(state.sort_for(Side::Red), SortMode::Role);
}

#[test]
fn new_game_resets_frame_state() {
    let session = session();
    let mut state = WatchState::new();
    apply_delta(&mut state, Delta::SetSession(Box::new(session.info())));
    push_frame(&mut state, &session, 0);
    apply_delta(&mut state, Delta::ToggleRow(1));

    let mut next = session.info();
    next.event.id = "110153".to_string();
    apply_delta(&mut state, Delta::SetSession(Box::new(next)));
    assert!(state.last_window.is_none());
    assert!(state.game_state.is_none());
    assert!(!state.ui.is_expanded(1));
    assert_eq!(state.frames_seen, 0);
    assert!(state.view().is_none());
}

#[test]
fn log_ring_is_bounded() {
    let mut state = WatchState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] 50"));
}

#[test]
fn view_requires_session_and_frames() {
    let session = session();
    let mut state = WatchState::new();
    assert!(state.view().is_none());
    push_frame(&mut state, &session, 0);
    assert!(state.view().is_none());
    apply_delta(&mut state, Delta::SetSession(Box::new(session.info())));
    assert!(state.view().is_some());
}

#[test]
fn new_game_without_event_id_resets_frame_state() {
    let session = session();
    let mut first = session.info();
    first.event.id = String::new();
    let mut state = WatchState::new();
    apply_delta(&mut state, Delta::SetSession(Box::new(first.clone())));
    push_frame(&mut state, &session, 0);
    push_frame(&mut state, &session, 2);
    apply_delta(&mut state, Delta::ToggleRow(2));
    assert_eq!(state.game_key().as_deref(), Some("GEN-T1"));

    // Same game re-sent: frames are kept.
    apply_delta(&mut state, Delta::SetSession(Box::new(first.clone())));
    assert_eq!(state.frames_seen, 2);

    let mut next = first;
    for team in &mut next.event.match_info.teams {
        team.code.push('X');
    }
    apply_delta(&mut state, Delta::SetSession(Box::new(next)));
    assert_eq!(state.game_key().as_deref(), Some("GENX-T1X"));
    assert_eq!(state.frames_seen, 0);
    assert!(state.first_window.is_none());
    assert!(state.game_state.is_none());
    assert!(!state.ui.is_expanded(2));

    // The clock restarts from the new game's first frame.
    push_frame(&mut state, &session, 2);
    let view = state.view().expect("view available");
    assert_eq!(view.in_game_time, "0:00");
}
