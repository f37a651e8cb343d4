use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::derive::{
    self, GoldDifference, GoldSplit, champion_detail_lines, format_in_game_time,
    format_thousands, gold_difference, gold_percentage, health_fraction, series_score,
};
use crate::frames::{
    DetailsFrame, Dragon, EventDetails, EventTeam, GameMetadata, GameState, Record, Side,
    TeamResult, TeamStats, WindowFrame, WindowParticipant,
};

/// Everything one render pass reads. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    pub first_window: &'a WindowFrame,
    pub last_window: &'a WindowFrame,
    pub last_details: &'a DetailsFrame,
    pub metadata: &'a GameMetadata,
    pub event: &'a EventDetails,
    pub records: Option<&'a [Record]>,
    pub results: Option<&'a [TeamResult]>,
    pub game_state: Option<GameState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Role,
    Gold,
    GoldDiff,
    CreepScore,
    Kills,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Role => SortMode::Gold,
            SortMode::Gold => SortMode::GoldDiff,
            SortMode::GoldDiff => SortMode::CreepScore,
            SortMode::CreepScore => SortMode::Kills,
            SortMode::Kills => SortMode::Role,
        }
    }
}

/// Per-table UI state owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct TableUi {
    pub expanded: HashMap<u8, bool>,
    pub blue_sort: SortMode,
    pub red_sort: SortMode,
}

impl TableUi {
    pub fn is_expanded(&self, participant_id: u8) -> bool {
        self.expanded.get(&participant_id).copied().unwrap_or(false)
    }

    pub fn sort_for(&self, side: Side) -> SortMode {
        match side {
            Side::Blue => self.blue_sort,
            Side::Red => self.red_sort,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchView {
    pub title: String,
    pub league: String,
    pub best_of: u32,
    pub series_score: Option<String>,
    pub game_state: Option<String>,
    pub in_game_time: String,
    pub blue: TeamHeader,
    pub red: TeamHeader,
    pub gold_split: GoldSplit,
    pub blue_dragons: Vec<Dragon>,
    pub red_dragons: Vec<Dragon>,
    pub blue_table: PlayerTable,
    pub red_table: PlayerTable,
    pub patch_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamHeader {
    pub name: String,
    pub code: String,
    pub outcome: Option<String>,
    pub record: Option<String>,
    pub inhibitors: u32,
    pub barons: u32,
    pub towers: u32,
    pub total_gold: String,
    pub total_kills: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerTable {
    pub heading: String,
    pub sort: SortMode,
    pub rows: Vec<PlayerRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    pub participant_id: u8,
    pub champion: String,
    pub summoner: String,
    pub level: u32,
    pub health: f64,
    pub items: Vec<u32>,
    pub creep_score: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub total_gold: i64,
    pub gold: String,
    pub gold_difference: Option<GoldDifference>,
    pub expanded: bool,
    pub details: Vec<String>,
}

pub fn build_match_view(input: &ViewInput<'_>, ui: &TableUi) -> MatchView {
    let teams = &input.event.match_info.teams;
    let fallback = EventTeam::default();
    let first = teams.first().unwrap_or(&fallback);
    let second = teams.get(1).unwrap_or(&fallback);
    let (blue_team, red_team) = derive::resolve_team_sides(first, second, input.metadata);

    // Header cards and series score follow the event's own team order.
    let results: [Option<&TeamResult>; 2] = match input.results {
        Some(results) => [results.first(), results.get(1)],
        None => [first.result.as_ref(), second.result.as_ref()],
    };
    let record_label = |idx: usize| {
        input
            .records
            .and_then(|r| r.get(idx))
            .map(|r| format!("{} - {}", r.wins, r.losses))
    };

    let window = input.last_window;
    let mut red_dragons = window.red_team.dragons.clone();
    red_dragons.reverse();

    MatchView {
        title: format!("{} VS {}", blue_team.name, red_team.name),
        league: input.event.league.name.clone(),
        best_of: input.event.match_info.strategy.count,
        series_score: series_score(results[0], results[1]),
        game_state: input.game_state.map(|s| s.label().to_uppercase()),
        in_game_time: format_in_game_time(
            input.first_window.rfc460_timestamp,
            window.rfc460_timestamp,
        ),
        blue: team_header(first, results[0], record_label(0), &window.blue_team),
        red: team_header(second, results[1], record_label(1), &window.red_team),
        gold_split: gold_percentage(window.blue_team.total_gold, window.red_team.total_gold),
        blue_dragons: window.blue_team.dragons.clone(),
        red_dragons,
        blue_table: player_table(input, ui, Side::Blue, &blue_team.name),
        red_table: player_table(input, ui, Side::Red, &red_team.name),
        patch_version: input.metadata.patch_version.clone(),
    }
}

fn team_header(
    team: &EventTeam,
    result: Option<&TeamResult>,
    record: Option<String>,
    stats: &TeamStats,
) -> TeamHeader {
    TeamHeader {
        name: team.name.clone(),
        code: team.code.clone(),
        outcome: result.and_then(|r| r.outcome.clone()),
        record,
        inhibitors: stats.inhibitors,
        barons: stats.barons,
        towers: stats.towers,
        total_gold: format_thousands(stats.total_gold),
        total_kills: stats.total_kills,
    }
}

fn player_table(input: &ViewInput<'_>, ui: &TableUi, side: Side, team_name: &str) -> PlayerTable {
    let sort = ui.sort_for(side);
    let mut rows: Vec<PlayerRow> = input
        .last_window
        .team(side)
        .participants
        .iter()
        .map(|player| player_row(input, ui, player))
        .collect();
    sort_rows(&mut rows, sort);
    PlayerTable {
        heading: team_name.to_uppercase(),
        sort,
        rows,
    }
}

fn player_row(input: &ViewInput<'_>, ui: &TableUi, player: &WindowParticipant) -> PlayerRow {
    let roster = input.metadata.participant(player.participant_id);
    let details = input.last_details.participant(player.participant_id);
    PlayerRow {
        participant_id: player.participant_id,
        champion: roster.map(|p| p.champion_id.clone()).unwrap_or_default(),
        summoner: roster.map(|p| p.summoner_name.clone()).unwrap_or_default(),
        level: player.level,
        health: health_fraction(player.current_health, player.max_health),
        items: details.map(|d| d.items.clone()).unwrap_or_default(),
        creep_score: player.creep_score,
        kills: player.kills,
        deaths: player.deaths,
        assists: player.assists,
        total_gold: player.total_gold,
        gold: format_thousands(player.total_gold),
        gold_difference: gold_difference(player, input.last_window),
        expanded: ui.is_expanded(player.participant_id),
        details: details.map(champion_detail_lines).unwrap_or_default(),
    }
}

fn sort_rows(rows: &mut [PlayerRow], sort: SortMode) {
    // Stable sorts; ties keep role order.
    match sort {
        SortMode::Role => rows.sort_by_key(|r| r.participant_id),
        SortMode::Gold => rows.sort_by(|a, b| b.total_gold.cmp(&a.total_gold)),
        SortMode::GoldDiff => rows.sort_by(|a, b| {
            let a = a.gold_difference.as_ref().map(|d| d.value);
            let b = b.gold_difference.as_ref().map(|d| d.value);
            b.cmp(&a)
        }),
        SortMode::CreepScore => rows.sort_by(|a, b| b.creep_score.cmp(&a.creep_score)),
        SortMode::Kills => rows.sort_by(|a, b| b.kills.cmp(&a.kills)),
    }
}
