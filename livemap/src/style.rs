//! Marker styling and display formatting shared by every live map host.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use crate::consts::{
    CHOOSING_COLOR, FALLBACK_TEAM_COLOR, PASSENGER_COLOR, SHORT_SERVER_ID_LEN, TRANSIT_POLICE_COLOR,
};
use crate::entity::Player;

/// Palette color for a team name, if the team has one.
#[must_use]
pub fn team_palette(team: &str) -> Option<&'static str> {
    match team {
        "Bus Operator" => Some("#f0b232"),
        "Choosing" => Some("#6b8bff"),
        "Civilian" => Some("#7dd3fc"),
        "Passenger" => Some("#9cfab6"),
        "Transit Police" => Some("#4ad295"),
        _ => None,
    }
}

/// Team color for a marker, ignoring the passenger override.
///
/// Transit police and players still choosing always get their fixed colors;
/// otherwise the server-supplied team color wins over the palette.
#[must_use]
pub fn team_color(player: &Player) -> &str {
    match player.team.as_str() {
        "Transit Police" => TRANSIT_POLICE_COLOR,
        "Choosing" => CHOOSING_COLOR,
        team => match player.team_color.as_deref() {
            Some(color) if !color.is_empty() => color,
            _ => team_palette(team).unwrap_or(FALLBACK_TEAM_COLOR),
        },
    }
}

/// Fill color for a player's marker. Passengers are always white.
#[must_use]
pub fn marker_color(player: &Player) -> &str {
    if player.is_passenger() { PASSENGER_COLOR } else { team_color(player) }
}

/// Short form of a server id for selectors and legends.
///
/// Ids look like `placeId:jobId`; the job id is shown, cut to eight
/// characters with a trailing `...`.
#[must_use]
pub fn format_server_id(id: &str) -> String {
    if id.is_empty() {
        return "-".to_owned();
    }
    let value = id.split(':').nth(1).filter(|job| !job.is_empty()).unwrap_or(id);
    if value.chars().count() > SHORT_SERVER_ID_LEN {
        let head: String = value.chars().take(SHORT_SERVER_ID_LEN).collect();
        format!("{head}...")
    } else {
        value.to_owned()
    }
}

/// Deep link that launches the game client into a specific server.
#[must_use]
pub fn join_url(place_id: Option<i64>, job_id: Option<&str>) -> Option<String> {
    match (place_id, job_id) {
        (Some(place), Some(job)) if place != 0 && !job.is_empty() => {
            Some(format!("roblox://experiences/start?placeId={place}&gameInstanceId={job}"))
        }
        _ => None,
    }
}

/// Human label for a community group rank.
#[must_use]
pub fn group_rank_label(rank: i64) -> String {
    match rank {
        r if r >= 235 => "Administrator".to_owned(),
        123 => "Lead Supervisor".to_owned(),
        121 | 122 => "Supervisor".to_owned(),
        r => format!("Rank {r}"),
    }
}

/// Name highlight color from group rank and role, if any applies.
#[must_use]
pub fn name_color(group_rank: Option<i64>, role: Option<&str>) -> Option<&'static str> {
    match group_rank {
        Some(r) if r >= 235 => return Some("#ef4444"),
        Some(121..=123) => return Some("#22c55e"),
        _ => {}
    }
    let role = role.unwrap_or_default().to_lowercase();
    if role.contains("transit police") {
        Some("#4da6ff")
    } else if role.contains("staff") {
        Some("#a970ff")
    } else {
        None
    }
}
