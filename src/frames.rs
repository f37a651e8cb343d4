use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FrameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    /// Participants 1-5 play on the blue side, 6-10 on the red side.
    pub fn from_participant_id(id: u8) -> Result<Self, FrameError> {
        match id {
            1..=5 => Ok(Side::Blue),
            6..=10 => Ok(Side::Red),
            other => Err(FrameError::ParticipantOutOfRange(other)),
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    /// Participant id of the first slot on this side.
    pub fn first_participant_id(self) -> u8 {
        match self {
            Side::Blue => 1,
            Side::Red => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InGame,
    Paused,
    Finished,
}

impl GameState {
    pub fn label(self) -> &'static str {
        match self {
            GameState::InGame => "in game",
            GameState::Paused => "paused",
            GameState::Finished => "match ended",
        }
    }
}

impl FromStr for GameState {
    type Err = FrameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "in_game" => Ok(GameState::InGame),
            "paused" => Ok(GameState::Paused),
            "finished" => Ok(GameState::Finished),
            other => Err(FrameError::UnknownGameState(other.to_string())),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dragon {
    Ocean,
    Infernal,
    Cloud,
    Mountain,
    Elder,
    Hextech,
    Chemtech,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowFrame {
    pub rfc460_timestamp: DateTime<Utc>,
    pub game_state: String,
    pub blue_team: TeamStats,
    pub red_team: TeamStats,
}

impl WindowFrame {
    pub fn team(&self, side: Side) -> &TeamStats {
        match side {
            Side::Blue => &self.blue_team,
            Side::Red => &self.red_team,
        }
    }

    pub fn parsed_game_state(&self) -> Result<GameState, FrameError> {
        self.game_state.parse()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    #[serde(default)]
    pub total_gold: i64,
    #[serde(default)]
    pub inhibitors: u32,
    #[serde(default)]
    pub towers: u32,
    #[serde(default)]
    pub barons: u32,
    #[serde(default)]
    pub total_kills: u32,
    #[serde(default)]
    pub dragons: Vec<Dragon>,
    #[serde(default)]
    pub participants: Vec<WindowParticipant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowParticipant {
    pub participant_id: u8,
    #[serde(default)]
    pub total_gold: i64,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub creep_score: u32,
    #[serde(default)]
    pub current_health: u32,
    #[serde(default)]
    pub max_health: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsFrame {
    pub rfc460_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<DetailParticipant>,
}

impl DetailsFrame {
    pub fn participant(&self, participant_id: u8) -> Option<&DetailParticipant> {
        self.participants
            .iter()
            .find(|p| p.participant_id == participant_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailParticipant {
    pub participant_id: u8,
    pub attack_damage: f64,
    pub ability_power: f64,
    pub attack_speed: f64,
    pub life_steal: f64,
    pub armor: f64,
    pub magic_resistance: f64,
    pub wards_placed: u32,
    pub wards_destroyed: u32,
    pub champion_damage_share: f64,
    pub kill_participation: f64,
    pub items: Vec<u32>,
    pub abilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    #[serde(default)]
    pub patch_version: String,
    pub blue_team_metadata: TeamMetadata,
    pub red_team_metadata: TeamMetadata,
}

impl GameMetadata {
    pub fn team(&self, side: Side) -> &TeamMetadata {
        match side {
            Side::Blue => &self.blue_team_metadata,
            Side::Red => &self.red_team_metadata,
        }
    }

    /// Roster entry for a participant; falls back to the slot position when
    /// the metadata omits ids.
    pub fn participant(&self, participant_id: u8) -> Option<&ParticipantMetadata> {
        let side = Side::from_participant_id(participant_id).ok()?;
        let roster = &self.team(side).participant_metadata;
        roster
            .iter()
            .find(|p| p.participant_id == participant_id)
            .or_else(|| {
                let slot = usize::from(participant_id - side.first_participant_id());
                roster.get(slot)
            })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMetadata {
    #[serde(default)]
    pub esports_team_id: String,
    #[serde(default)]
    pub participant_metadata: Vec<ParticipantMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantMetadata {
    #[serde(default)]
    pub participant_id: u8,
    #[serde(default)]
    pub summoner_name: String,
    #[serde(default)]
    pub champion_id: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(default)]
    pub id: String,
    pub league: League,
    #[serde(rename = "match")]
    pub match_info: MatchInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfo {
    #[serde(default)]
    pub strategy: Strategy,
    pub teams: Vec<EventTeam>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTeam {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub result: Option<TeamResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResult {
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub game_wins: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

pub fn parse_window_frame_json(raw: &str) -> Result<WindowFrame> {
    serde_json::from_str(raw.trim()).context("invalid window frame json")
}

pub fn parse_details_frame_json(raw: &str) -> Result<DetailsFrame> {
    serde_json::from_str(raw.trim()).context("invalid details frame json")
}

pub fn parse_game_metadata_json(raw: &str) -> Result<GameMetadata> {
    serde_json::from_str(raw.trim()).context("invalid game metadata json")
}

pub fn parse_event_details_json(raw: &str) -> Result<EventDetails> {
    serde_json::from_str(raw.trim()).context("invalid event details json")
}
