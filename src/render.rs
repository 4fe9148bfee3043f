//! Plain-text views: the live map grid, server list and summary.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use livemap::engine::{MapEngine, Marker};
use livemap::entity::{GameState, Player};
use livemap::prefs::DotSize;
use livemap::style::{format_server_id, join_url, marker_color};

use crate::api::types::Summary;

const PINNED_GLYPH: char = '@';
const PASSENGER_GLYPH: char = 'o';

fn marker_glyph(marker: &Marker, dot_size: DotSize) -> char {
    if marker.pinned {
        PINNED_GLYPH
    } else if marker.passenger {
        PASSENGER_GLYPH
    } else {
        match dot_size {
            DotSize::Small => '.',
            DotSize::Medium => '*',
            DotSize::Large => '#',
        }
    }
}

/// Draw the engine's current server into a `cols` x `rows` character grid.
///
/// Each cell covers `width / cols` by `height / rows` viewport pixels. Markers
/// panned or zoomed off the viewport are not drawn. The pinned marker is drawn
/// last so it stays visible when markers share a cell.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn render_map(engine: &MapEngine, cols: usize, rows: usize) -> String {
    let camera = engine.camera();
    let server_label = engine.current_server().map_or_else(|| "-".to_owned(), |s| format_server_id(&s.server_id));
    let mut lines = vec![format!(
        "server {server_label} | zoom {:.2}x | offset ({:.0}, {:.0}) | dots {}",
        camera.zoom,
        camera.offset_x,
        camera.offset_y,
        engine.prefs.dot_size
    )];

    if engine.viewport.is_empty() || cols == 0 || rows == 0 {
        lines.push("(viewport not measured)".to_owned());
        return lines.join("\n");
    }

    let cell_w = engine.viewport.width / cols as f64;
    let cell_h = engine.viewport.height / rows as f64;
    let mut grid = vec![vec![' '; cols]; rows];

    let mut markers = engine.markers();
    markers.sort_by_key(|m| m.pinned);
    let mut drawn = 0usize;
    for marker in &markers {
        let col = (marker.screen.x / cell_w).floor();
        let row = (marker.screen.y / cell_h).floor();
        if col < 0.0 || row < 0.0 || col >= cols as f64 || row >= rows as f64 {
            continue;
        }
        grid[row as usize][col as usize] = marker_glyph(marker, engine.prefs.dot_size);
        drawn += 1;
    }

    let border = format!("+{}+", "-".repeat(cols));
    lines.push(border.clone());
    lines.extend(grid.into_iter().map(|row| format!("|{}|", row.into_iter().collect::<String>())));
    lines.push(border);

    if let Some(message) = engine.status_message() {
        lines.push(message.to_owned());
    }
    if let Some(player) = engine.pinned.and_then(|id| engine.player(id)) {
        lines.push(format!("pinned: {}", player_line(player)));
    }
    if let Some(server) = engine.current_server() {
        let positioned = server.positioned_players().count();
        lines.push(format!(
            "{} players, {positioned} positioned, {drawn} drawn",
            server.players.len()
        ));
        lines.extend(server.positioned_players().map(|p| format!("  {}", player_line(p))));
    }
    lines.join("\n")
}

fn player_line(player: &Player) -> String {
    let name = if player.display_name.is_empty() { &player.username } else { &player.display_name };
    format!("{name} (@{}) {} {}", player.username, player.role_label(), marker_color(player))
}

/// One row per server: short id, player count and join link.
#[must_use]
pub fn render_servers(state: &GameState) -> String {
    if state.servers.is_empty() {
        return "No servers available.".to_owned();
    }
    let mut lines = vec![format!("{:<12} {:>7}  {}", "SERVER", "PLAYERS", "JOIN")];
    lines.extend(state.servers.iter().map(|server| {
        let join = join_url(server.place_id, server.job_id.as_deref()).unwrap_or_else(|| "-".to_owned());
        format!("{:<12} {:>7}  {join}", format_server_id(&server.server_id), server.players.len())
    }));
    lines.join("\n")
}

#[must_use]
pub fn render_summary(summary: &Summary) -> String {
    let mut lines = vec![
        format!("online:  {}", summary.online_total),
        format!("servers: {}", summary.servers_online),
    ];
    if let Some(by_role) = &summary.online_by_role {
        lines.extend(by_role.iter().map(|(role, count)| format!("  {role}: {count}")));
    }
    if let Some(updated) = &summary.last_updated {
        lines.push(format!("updated: {updated}"));
    }
    lines.join("\n")
}
