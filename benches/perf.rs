use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use lol_live_terminal::derive::{format_in_game_time, gold_difference, gold_percentage};
use lol_live_terminal::feed::{Session, synthetic_session};
use lol_live_terminal::state::{Delta, WatchState, apply_delta};
use lol_live_terminal::view::{TableUi, ViewInput, build_match_view};

fn sample_session(frames: usize) -> Session {
    let start = Utc
        .with_ymd_and_hms(2024, 5, 19, 8, 0, 0)
        .single()
        .expect("valid start time");
    synthetic_session(frames, start, &mut StdRng::seed_from_u64(1))
}

fn bench_derivations(c: &mut Criterion) {
    let session = sample_session(120);
    let first = &session.window_frames[0];
    let last = &session.window_frames[119];
    c.bench_function("derive_frame", |b| {
        b.iter(|| {
            let clock = format_in_game_time(first.rfc460_timestamp, last.rfc460_timestamp);
            let split = gold_percentage(last.blue_team.total_gold, last.red_team.total_gold);
            let mut total = 0i64;
            for p in last.blue_team.participants.iter().chain(&last.red_team.participants) {
                if let Some(diff) = gold_difference(p, black_box(last)) {
                    total += diff.value;
                }
            }
            black_box((clock, split, total));
        })
    });
}

fn bench_build_view(c: &mut Criterion) {
    let session = sample_session(120);
    let ui = TableUi::default();
    let input = ViewInput {
        first_window: &session.window_frames[0],
        last_window: &session.window_frames[119],
        last_details: &session.details_frames[119],
        metadata: &session.game_metadata,
        event: &session.event_details,
        records: None,
        results: None,
        game_state: None,
    };
    c.bench_function("build_match_view", |b| {
        b.iter(|| {
            let view = build_match_view(black_box(&input), &ui);
            black_box(view.blue_table.rows.len());
        })
    });
}

fn bench_replay_apply(c: &mut Criterion) {
    let session = sample_session(300);
    c.bench_function("apply_300_frames", |b| {
        b.iter(|| {
            let mut state = WatchState::new();
            apply_delta(&mut state, Delta::SetSession(Box::new(session.info())));
            for (window, details) in session.frame_pairs() {
                apply_delta(
                    &mut state,
                    Delta::PushFrames {
                        window: Box::new(window.clone()),
                        details: Box::new(details.clone()),
                    },
                );
            }
            black_box(state.view());
        })
    });
}

criterion_group!(
    benches,
    bench_derivations,
    bench_build_view,
    bench_replay_apply
);
criterion_main!(benches);
