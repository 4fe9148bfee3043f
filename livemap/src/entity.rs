//! Player and server snapshots, and projection from map space to the screen.
//!
//! Field names follow the dashboard API's camelCase JSON so a
//! `/dashboard/players` response deserializes straight into [`GameState`].
//! Positions are normalized to the map image (`0..=1` on both axes); anything
//! missing or non-finite is treated as "no position" and dropped by
//! [`project`] rather than reported as an error.

#[cfg(test)]
#[path = "entity_test.rs"]
mod entity_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point, Size};

/// Roblox user id of a player.
pub type PlayerId = i64;

/// Position of a player, in world units and in normalized map space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPosition {
    #[serde(default)]
    pub world_x: Option<f64>,
    #[serde(default)]
    pub world_z: Option<f64>,
    #[serde(default)]
    pub map_x: Option<f64>,
    #[serde(default)]
    pub map_y: Option<f64>,
}

impl PlayerPosition {
    /// Normalized coordinates, if both are present and finite.
    #[must_use]
    pub fn normalized(&self) -> Option<Point> {
        match (self.map_x, self.map_y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// One connected player as reported by the live feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub user_id: PlayerId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub team_color: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub miles: Option<f64>,
    #[serde(default)]
    pub cash: Option<f64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub joined_at: String,
    #[serde(default)]
    pub position: Option<PlayerPosition>,
}

impl Player {
    /// Whether this player is riding as a passenger (by role or team).
    #[must_use]
    pub fn is_passenger(&self) -> bool {
        self.role == "Passenger" || self.team == "Passenger"
    }

    /// Role if set, else team, else `-`.
    #[must_use]
    pub fn role_label(&self) -> &str {
        if !self.role.is_empty() {
            &self.role
        } else if !self.team.is_empty() {
            &self.team
        } else {
            "-"
        }
    }
}

/// One game server instance and its current players.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub server_id: String,
    #[serde(default)]
    pub place_id: Option<i64>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Server {
    /// Players that carry a usable map position.
    pub fn positioned_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.map_point().is_some())
    }
}

/// Full live snapshot from `/dashboard/players`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Anything that may carry a normalized map position.
pub trait Locatable {
    fn map_point(&self) -> Option<Point>;
}

impl Locatable for PlayerPosition {
    fn map_point(&self) -> Option<Point> {
        self.normalized()
    }
}

impl Locatable for Player {
    fn map_point(&self) -> Option<Point> {
        self.position.as_ref().and_then(PlayerPosition::normalized)
    }
}

impl Locatable for Point {
    fn map_point(&self) -> Option<Point> {
        (self.x.is_finite() && self.y.is_finite()).then_some(*self)
    }
}

/// Screen position of one entity under `camera` on a surface of `size`.
///
/// `screen = offset + normalized * size * zoom`. Returns `None` for entities
/// without a finite position.
#[must_use]
pub fn project_to_screen<T: Locatable + ?Sized>(entity: &T, camera: &Camera, size: Size) -> Option<Point> {
    let p = entity.map_point()?;
    let screen = camera.content_to_screen(Point::new(p.x * size.width, p.y * size.height));
    (screen.x.is_finite() && screen.y.is_finite()).then_some(screen)
}

/// Project every positioned entity, skipping the rest.
pub fn project<'a, T: Locatable>(
    entities: impl IntoIterator<Item = &'a T>,
    camera: &Camera,
    size: Size,
) -> Vec<(&'a T, Point)>
where
    T: 'a,
{
    entities
        .into_iter()
        .filter_map(|e| project_to_screen(e, camera, size).map(|screen| (e, screen)))
        .collect()
}
