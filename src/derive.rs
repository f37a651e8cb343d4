use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::frames::{
    DetailParticipant, EventTeam, GameMetadata, Side, TeamResult, WindowFrame, WindowParticipant,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoldStyle {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoldDifference {
    pub value: i64,
    pub style: GoldStyle,
    pub formatted: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoldSplit {
    pub blue: f64,
    pub red: f64,
}

/// Decide which event team is displayed as blue.
///
/// Some leagues report the two teams in swapped order, so the source's own
/// labels are not trusted. The first blue-side summoner name is expected to
/// start with the team code ("T1 Faker" -> "T1"); if the team the source calls
/// red carries that code the pair is swapped. Only the leading part of the
/// code is compared because academy rosters append a letter to the code that
/// player names do not carry.
pub fn resolve_team_sides<'a>(
    first: &'a EventTeam,
    second: &'a EventTeam,
    metadata: &GameMetadata,
) -> (&'a EventTeam, &'a EventTeam) {
    let token = metadata
        .blue_team_metadata
        .participant_metadata
        .first()
        .and_then(|p| p.summoner_name.split_whitespace().next());

    match token {
        Some(token) if second.code.starts_with(token) => (second, first),
        _ => (first, second),
    }
}

/// Elapsed game clock between two frame timestamps, `M:SS` or `H:MM:SS`.
pub fn format_in_game_time(start: DateTime<Utc>, current: DateTime<Utc>) -> String {
    let total_secs = (current - start).num_milliseconds().max(0) / 1000;
    format_clock(total_secs)
}

/// Days are folded into the hour count.
pub fn format_clock(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Lane opponent by slot position: blue `p` faces red index `p-1`, red `p`
/// faces blue index `p-6`.
pub fn lane_opponent<'a>(
    frame: &'a WindowFrame,
    player: &WindowParticipant,
) -> Option<&'a WindowParticipant> {
    let side = Side::from_participant_id(player.participant_id).ok()?;
    let slot = usize::from(player.participant_id - side.first_participant_id());
    frame.team(side.opponent()).participants.get(slot)
}

pub fn gold_difference(player: &WindowParticipant, frame: &WindowFrame) -> Option<GoldDifference> {
    let opponent = lane_opponent(frame, player)?;
    Some(gold_difference_between(player.total_gold, opponent.total_gold))
}

pub fn gold_difference_between(own_gold: i64, opponent_gold: i64) -> GoldDifference {
    let value = own_gold - opponent_gold;
    if value >= 0 {
        GoldDifference {
            value,
            style: GoldStyle::Positive,
            formatted: format!("+{}", format_thousands(value)),
        }
    } else {
        GoldDifference {
            value,
            style: GoldStyle::Negative,
            formatted: format_thousands(value),
        }
    }
}

/// Flex weights for the two-segment gold bar, as percentages of the total.
pub fn gold_percentage(blue_gold: i64, red_gold: i64) -> GoldSplit {
    let total = blue_gold + red_gold;
    if total <= 0 {
        return GoldSplit {
            blue: 50.0,
            red: 50.0,
        };
    }
    let total = total as f64;
    GoldSplit {
        blue: blue_gold as f64 / total * 100.0,
        red: red_gold as f64 / total * 100.0,
    }
}

/// en-US digit grouping: `1234567` -> `1,234,567`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A 0..1 ratio as a percentage rounded to two decimals, without trailing zeros.
pub fn format_ratio_percent(ratio: f64) -> String {
    let pct = (ratio * 10000.0).round() / 100.0;
    format!("{}%", trim_number(pct))
}

fn trim_number(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn champion_detail_lines(details: &DetailParticipant) -> Vec<String> {
    vec![
        format!("Attack Damage: {}", details.attack_damage),
        format!("Ability Power: {}", details.ability_power),
        format!("Attack Speed: {}", details.attack_speed),
        format!("Life Steal: {}%", details.life_steal),
        format!("Armor: {}", details.armor),
        format!("Magic Resistance: {}", details.magic_resistance),
        format!("Wards Destroyed: {}", details.wards_destroyed),
        format!("Wards Placed: {}", details.wards_placed),
        format!(
            "Damage Share: {}",
            format_ratio_percent(details.champion_damage_share)
        ),
        format!(
            "Kill Participation: {}",
            format_ratio_percent(details.kill_participation)
        ),
        format!("Skill Order: {}", details.abilities.join("->")),
    ]
}

pub fn health_fraction(current: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (f64::from(current) / f64::from(max)).clamp(0.0, 1.0)
}

pub fn series_score(first: Option<&TeamResult>, second: Option<&TeamResult>) -> Option<String> {
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{}-{}", a.game_wins, b.game_wins)),
        _ => None,
    }
}
