use std::fs;
use std::io::BufRead;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::frames::{
    DetailParticipant, DetailsFrame, Dragon, EventDetails, EventTeam, GameMetadata, League,
    MatchInfo, ParticipantMetadata, Record, Side, Strategy, TeamMetadata, TeamResult, TeamStats,
    WindowFrame, WindowParticipant,
};
use crate::state::{Delta, SessionInfo};

/// A recorded game: static metadata plus the frame streams in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub game_metadata: GameMetadata,
    pub event_details: EventDetails,
    #[serde(default)]
    pub records: Option<Vec<Record>>,
    #[serde(default)]
    pub results: Option<Vec<TeamResult>>,
    #[serde(default)]
    pub window_frames: Vec<WindowFrame>,
    #[serde(default)]
    pub details_frames: Vec<DetailsFrame>,
}

impl Session {
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            metadata: self.game_metadata.clone(),
            event: self.event_details.clone(),
            records: self.records.clone(),
            results: self.results.clone(),
        }
    }

    /// Window frames paired with the details frame at the same index; a
    /// shorter details stream repeats its last frame.
    pub fn frame_pairs(&self) -> Vec<(&WindowFrame, &DetailsFrame)> {
        let Some(last_details) = self.details_frames.last() else {
            return Vec::new();
        };
        self.window_frames
            .iter()
            .enumerate()
            .map(|(idx, window)| (window, self.details_frames.get(idx).unwrap_or(last_details)))
            .collect()
    }
}

pub fn parse_session_json(raw: &str) -> Result<Session> {
    let session: Session = serde_json::from_str(raw.trim()).context("invalid session json")?;
    if session.event_details.match_info.teams.len() < 2 {
        return Err(anyhow!(
            "session needs two teams, got {}",
            session.event_details.match_info.teams.len()
        ));
    }
    Ok(session)
}

pub fn load_session(path: &Path) -> Result<Session> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read session {}", path.display()))?;
    parse_session_json(&raw).with_context(|| format!("parse session {}", path.display()))
}

/// Push a session into the watch loop, one frame pair per `interval`.
pub fn spawn_replay(session: Session, interval: Duration, tx: Sender<Delta>) -> JoinHandle<()> {
    thread::spawn(move || {
        if tx.send(Delta::SetSession(Box::new(session.info()))).is_err() {
            return;
        }
        let pairs = session.frame_pairs();
        if pairs.is_empty() {
            warn!("session has no frame pairs to replay");
            let _ = tx.send(Delta::Log("[WARN] Session has no frames".to_string()));
            return;
        }
        debug!("replaying {} frame pairs", pairs.len());
        for (idx, (window, details)) in pairs.into_iter().enumerate() {
            if idx > 0 && !interval.is_zero() {
                thread::sleep(interval);
            }
            let delta = Delta::PushFrames {
                window: Box::new(window.clone()),
                details: Box::new(details.clone()),
            };
            if tx.send(delta).is_err() {
                debug!("watch loop hung up, stopping replay");
                return;
            }
        }
    })
}

/// Parse one control line: `toggle <participant id>` or `sort blue|red`.
/// Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Delta>> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let delta = match (verb.to_lowercase().as_str(), parts.next()) {
        ("toggle", Some(id)) => {
            let id: u8 = id
                .parse()
                .with_context(|| format!("bad participant id {id:?}"))?;
            Side::from_participant_id(id)?;
            Delta::ToggleRow(id)
        }
        ("sort", Some(side)) => match side.to_lowercase().as_str() {
            "blue" => Delta::CycleSort(Side::Blue),
            "red" => Delta::CycleSort(Side::Red),
            other => return Err(anyhow!("unknown side {other:?}")),
        },
        _ => return Err(anyhow!("unknown command {:?}", line.trim())),
    };
    Ok(Some(delta))
}

/// Forward control lines from `reader` as deltas until EOF. Bad lines become
/// `[WARN]` log entries.
pub fn spawn_commands<R>(reader: R, tx: Sender<Delta>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else {
                return;
            };
            let delta = match parse_command(&line) {
                Ok(Some(delta)) => delta,
                Ok(None) => continue,
                Err(err) => {
                    warn!("ignoring command: {err:#}");
                    Delta::Log(format!("[WARN] Ignored command: {err}"))
                }
            };
            if tx.send(delta).is_err() {
                return;
            }
        }
    })
}

const BLUE_ROSTER: [(&str, &str, &str); 5] = [
    ("T1 Zeus", "Gnar", "top"),
    ("T1 Oner", "LeeSin", "jungle"),
    ("T1 Faker", "Azir", "mid"),
    ("T1 Gumayusi", "Jinx", "bottom"),
    ("T1 Keria", "Thresh", "support"),
];

const RED_ROSTER: [(&str, &str, &str); 5] = [
    ("GEN Kiin", "Jax", "top"),
    ("GEN Canyon", "Viego", "jungle"),
    ("GEN Chovy", "Orianna", "mid"),
    ("GEN Peyz", "Aphelios", "bottom"),
    ("GEN Lehends", "Rakan", "support"),
];

const DRAGON_POOL: [Dragon; 5] = [
    Dragon::Ocean,
    Dragon::Infernal,
    Dragon::Cloud,
    Dragon::Mountain,
    Dragon::Hextech,
];

/// A plausible fake game with ten-second frames, a short pause in the middle
/// and a finished final frame.
pub fn synthetic_session<R: Rng>(frames: usize, start: DateTime<Utc>, rng: &mut R) -> Session {
    let frames = frames.max(1);
    let pause_from = frames / 2;
    let pause_to = pause_from + 3;

    let mut blue = seed_team(1);
    let mut red = seed_team(6);
    let mut window_frames = Vec::with_capacity(frames);
    let mut details_frames = Vec::with_capacity(frames);

    for idx in 0..frames {
        let paused = (pause_from..pause_to).contains(&idx) && idx + 1 < frames;
        let game_state = if idx + 1 == frames && frames > 1 {
            "finished"
        } else if paused {
            "paused"
        } else {
            "in_game"
        };

        if !paused && idx > 0 {
            tick_team(&mut blue, &mut red, rng);
            tick_team(&mut red, &mut blue, rng);
        }

        let ts = start + ChronoDuration::seconds(10 * idx as i64);
        window_frames.push(WindowFrame {
            rfc460_timestamp: ts,
            game_state: game_state.to_string(),
            blue_team: blue.clone(),
            red_team: red.clone(),
        });
        details_frames.push(DetailsFrame {
            rfc460_timestamp: ts,
            participants: synthetic_details(&blue, &red, idx),
        });
    }

    Session {
        game_metadata: GameMetadata {
            patch_version: "14.10.585.5656".to_string(),
            blue_team_metadata: roster_metadata("T1", 1, &BLUE_ROSTER),
            red_team_metadata: roster_metadata("GEN", 6, &RED_ROSTER),
        },
        event_details: EventDetails {
            id: "synthetic-demo".to_string(),
            league: League {
                name: "LCK".to_string(),
                image: String::new(),
            },
            match_info: MatchInfo {
                strategy: Strategy { count: 5 },
                teams: vec![
                    EventTeam {
                        name: "T1".to_string(),
                        code: "T1".to_string(),
                        image: String::new(),
                        result: Some(TeamResult {
                            outcome: None,
                            game_wins: 1,
                        }),
                    },
                    EventTeam {
                        name: "Gen.G".to_string(),
                        code: "GEN".to_string(),
                        image: String::new(),
                        result: Some(TeamResult {
                            outcome: None,
                            game_wins: 1,
                        }),
                    },
                ],
            },
        },
        records: None,
        results: None,
        window_frames,
        details_frames,
    }
}

fn seed_team(first_id: u8) -> TeamStats {
    TeamStats {
        total_gold: 500 * 5,
        participants: (first_id..first_id + 5)
            .map(|participant_id| WindowParticipant {
                participant_id,
                total_gold: 500,
                level: 1,
                current_health: 600,
                max_health: 600,
                ..WindowParticipant::default()
            })
            .collect(),
        ..TeamStats::default()
    }
}

fn tick_team<R: Rng>(team: &mut TeamStats, enemy: &mut TeamStats, rng: &mut R) {
    for player in &mut team.participants {
        let gold = rng.gen_range(150..450);
        player.total_gold += gold;
        player.creep_score += rng.gen_range(0..10);
        if player.level < 18 && rng.gen_bool(0.08) {
            player.level += 1;
            player.max_health += 90;
        }
        player.current_health = rng.gen_range(player.max_health / 4..=player.max_health);
    }

    if rng.gen_bool(0.1) && !team.participants.is_empty() && !enemy.participants.is_empty() {
        let killer = rng.gen_range(0..team.participants.len());
        let victim = rng.gen_range(0..enemy.participants.len());
        team.participants[killer].kills += 1;
        team.participants[killer].total_gold += 300;
        let assister = (killer + 1) % team.participants.len();
        team.participants[assister].assists += 1;
        enemy.participants[victim].deaths += 1;
        team.total_kills += 1;
    }
    if rng.gen_bool(0.02) && team.dragons.len() < 4 {
        team.dragons.push(DRAGON_POOL[rng.gen_range(0..DRAGON_POOL.len())]);
    }
    if rng.gen_bool(0.03) && team.towers < 11 {
        team.towers += 1;
    }

    team.total_gold = team.participants.iter().map(|p| p.total_gold).sum();
}

fn synthetic_details(blue: &TeamStats, red: &TeamStats, frame: usize) -> Vec<DetailParticipant> {
    let skill_cycle = ["Q", "W", "E", "Q", "Q", "R"];
    let abilities: Vec<String> = skill_cycle
        .iter()
        .cycle()
        .take((frame / 6).clamp(1, 18))
        .map(|s| s.to_string())
        .collect();

    [blue, red]
        .into_iter()
        .flat_map(|team| {
            let team_kills = team.total_kills.max(1);
            let team_gold = team.total_gold.max(1);
            let abilities = abilities.clone();
            team.participants.iter().map(move |p| DetailParticipant {
                participant_id: p.participant_id,
                attack_damage: 60.0 + f64::from(p.level) * 3.0,
                ability_power: f64::from(p.level) * 5.0,
                attack_speed: 100.0 + f64::from(p.level) * 2.0,
                life_steal: 0.0,
                armor: 30.0 + f64::from(p.level) * 4.0,
                magic_resistance: 30.0 + f64::from(p.level) * 1.5,
                wards_placed: p.level,
                wards_destroyed: p.level / 3,
                champion_damage_share: p.total_gold as f64 / team_gold as f64,
                kill_participation: f64::from(p.kills + p.assists) / f64::from(team_kills),
                items: Vec::new(),
                abilities: abilities.clone(),
            })
        })
        .collect()
}

fn roster_metadata(team_id: &str, first_id: u8, roster: &[(&str, &str, &str)]) -> TeamMetadata {
    TeamMetadata {
        esports_team_id: team_id.to_string(),
        participant_metadata: roster
            .iter()
            .zip(first_id..)
            .map(|((name, champ, role), participant_id)| ParticipantMetadata {
                participant_id,
                summoner_name: name.to_string(),
                champion_id: champ.to_string(),
                role: role.to_string(),
            })
            .collect(),
    }
}
