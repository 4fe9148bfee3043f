use crate::camera::{Camera, Point, Size, center_offset_for};
use crate::consts::ZOOM_FACTOR;
use crate::entity::{GameState, Player, PlayerId, Server, project};
use crate::input::{Button, InputState, Key, PointerTarget, WheelDelta};
use crate::prefs::{DotSize, MapPrefs};
use crate::style::marker_color;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Camera, markers or overlays changed; redraw.
    RenderNeeded,
    /// The event was consumed by the map; stop it from scrolling the page.
    SuppressScroll,
    /// Preferences changed; persist them.
    PrefsChanged(MapPrefs),
    /// The engine picked a server on its own (first snapshot with no selection).
    ServerSelected(String),
    /// The pinned player changed.
    PlayerPinned(Option<PlayerId>),
    /// Fullscreen presentation toggled; the host should resize the surface.
    FullscreenChanged(bool),
    /// Update the pointer cursor style.
    SetCursor(&'static str),
}

/// A positioned player marker ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub player_id: PlayerId,
    /// Marker center in screen pixels.
    pub screen: Point,
    pub color: String,
    /// Marker diameter in pixels.
    pub size_px: f64,
    pub passenger: bool,
    pub pinned: bool,
    pub hovered: bool,
}

/// Live map state: camera, surface size, gesture, selection and preferences.
///
/// Holds no browser handles so hosts and tests can drive it directly.
#[derive(Debug, Clone, Default)]
pub struct MapEngine {
    pub camera: Camera,
    pub viewport: Size,
    pub input: InputState,
    pub prefs: MapPrefs,
    pub state: GameState,
    pub selected_server: Option<String>,
    pub pinned: Option<PlayerId>,
    pub hovered: Option<PlayerId>,
    pub fullscreen: bool,
    pub show_settings: bool,
}

impl MapEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine starting from previously persisted preferences.
    #[must_use]
    pub fn with_prefs(prefs: MapPrefs) -> Self {
        Self { prefs, ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace the live snapshot.
    ///
    /// When nothing is selected yet the first server becomes the selection.
    /// Pan, zoom and the pinned player are left untouched.
    pub fn load_snapshot(&mut self, state: GameState) -> Vec<Action> {
        self.state = state;
        let mut actions = Vec::new();
        if self.selected_server.is_none() {
            if let Some(first) = self.state.servers.first() {
                self.selected_server = Some(first.server_id.clone());
                actions.push(Action::ServerSelected(first.server_id.clone()));
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Choose which server's players are drawn.
    pub fn select_server(&mut self, server_id: impl Into<String>) -> Vec<Action> {
        self.selected_server = Some(server_id.into());
        vec![Action::RenderNeeded]
    }

    // --- Viewport ---

    /// Update the surface size and recenter at the current zoom.
    ///
    /// Called for every observed resize, including fullscreen changes. An
    /// in-progress drag keeps its anchor. Non-finite or negative sizes count
    /// as unmeasured.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport = Size::new(sanitize_len(width), sanitize_len(height));
        if self.viewport.is_empty() {
            return Vec::new();
        }
        self.camera.recenter(self.viewport);
        vec![Action::RenderNeeded]
    }

    /// Offset that centers the surface at `zoom`.
    #[must_use]
    pub fn center_offset_for(&self, zoom: f64) -> Point {
        center_offset_for(zoom, self.viewport.width, self.viewport.height)
    }

    // --- Camera operations ---

    /// Zoom by `factor` about `origin`, or about the viewport center when `None`.
    pub fn zoom_at_point(&mut self, factor: f64, origin: Option<Point>) -> Vec<Action> {
        let origin = origin.unwrap_or_else(|| self.viewport.center());
        if self.camera.zoom_at(factor, origin) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Zoom-in button.
    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_at_point(ZOOM_FACTOR, None)
    }

    /// Zoom-out button.
    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_at_point(1.0 / ZOOM_FACTOR, None)
    }

    /// Reset button: back to zoom 1, centered.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.camera = Camera::centered(1.0, self.viewport);
        vec![Action::RenderNeeded]
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        self.camera.pan_by(dx, dy);
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    /// Start a drag on primary press, unless the press landed on an overlay control.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, target: PointerTarget) -> Vec<Action> {
        if button != Button::Primary || target == PointerTarget::Overlay {
            return Vec::new();
        }
        if !(screen_pt.x.is_finite() && screen_pt.y.is_finite()) {
            return Vec::new();
        }
        self.input = InputState::start_pan(screen_pt, self.camera.offset());
        vec![Action::SetCursor("grabbing")]
    }

    /// Follow the pointer while dragging.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let Some(offset) = self.input.pan_offset(screen_pt) else {
            return Vec::new();
        };
        if !(offset.x.is_finite() && offset.y.is_finite()) {
            return Vec::new();
        }
        self.camera.offset_x = offset.x;
        self.camera.offset_y = offset.y;
        vec![Action::RenderNeeded]
    }

    /// Release ends the drag.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.end_drag()
    }

    /// Leaving the surface ends the drag too.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_drag()
    }

    fn end_drag(&mut self) -> Vec<Action> {
        if !self.input.is_panning() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::SetCursor("grab")]
    }

    /// Click: a marker toggles its pin, bare map clears it.
    pub fn on_click(&mut self, target: PointerTarget) -> Vec<Action> {
        let next = match target {
            PointerTarget::Overlay => return Vec::new(),
            PointerTarget::Surface => None,
            PointerTarget::Marker(id) => (self.pinned != Some(id)).then_some(id),
        };
        if next == self.pinned {
            return Vec::new();
        }
        self.pinned = next;
        vec![Action::PlayerPinned(next), Action::RenderNeeded]
    }

    /// Pin a player from outside the map (e.g. a roster click), or clear with `None`.
    pub fn pin_player(&mut self, id: Option<PlayerId>) -> Vec<Action> {
        if self.pinned == id {
            return Vec::new();
        }
        self.pinned = id;
        vec![Action::PlayerPinned(id), Action::RenderNeeded]
    }

    pub fn on_marker_enter(&mut self, id: PlayerId) -> Vec<Action> {
        if self.hovered == Some(id) {
            return Vec::new();
        }
        self.hovered = Some(id);
        vec![Action::RenderNeeded]
    }

    /// Clears hover only if `id` is the hovered marker.
    pub fn on_marker_leave(&mut self, id: PlayerId) -> Vec<Action> {
        if self.hovered != Some(id) {
            return Vec::new();
        }
        self.hovered = None;
        vec![Action::RenderNeeded]
    }

    /// Wheel zoom: one fixed step per event, anchored at the cursor or the center.
    ///
    /// Always reports [`Action::SuppressScroll`]; the map owns the gesture even
    /// when the zoom is already at a limit.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let factor = if delta.zooms_in() { ZOOM_FACTOR } else { 1.0 / ZOOM_FACTOR };
        let origin = if self.prefs.zoom_to_cursor { Some(screen_pt) } else { None };
        let mut actions = vec![Action::SuppressScroll];
        actions.extend(self.zoom_at_point(factor, origin));
        actions
    }

    /// Escape leaves fullscreen.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() && self.fullscreen { self.set_fullscreen(false) } else { Vec::new() }
    }

    // --- Presentation ---

    pub fn toggle_fullscreen(&mut self) -> Vec<Action> {
        self.set_fullscreen(!self.fullscreen)
    }

    /// Enter or leave fullscreen. The host follows up with [`Self::set_viewport`].
    pub fn set_fullscreen(&mut self, on: bool) -> Vec<Action> {
        if self.fullscreen == on {
            return Vec::new();
        }
        self.fullscreen = on;
        vec![Action::FullscreenChanged(on), Action::RenderNeeded]
    }

    pub fn toggle_settings(&mut self) -> Vec<Action> {
        self.show_settings = !self.show_settings;
        vec![Action::RenderNeeded]
    }

    pub fn set_zoom_to_cursor(&mut self, on: bool) -> Vec<Action> {
        if self.prefs.zoom_to_cursor == on {
            return Vec::new();
        }
        self.prefs.zoom_to_cursor = on;
        vec![Action::PrefsChanged(self.prefs)]
    }

    pub fn set_dot_size(&mut self, size: DotSize) -> Vec<Action> {
        if self.prefs.dot_size == size {
            return Vec::new();
        }
        self.prefs.dot_size = size;
        vec![Action::PrefsChanged(self.prefs), Action::RenderNeeded]
    }

    // --- Queries ---

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.input.is_panning()
    }

    /// Server whose players are drawn: the selection if present, else the first one.
    #[must_use]
    pub fn current_server(&self) -> Option<&Server> {
        let servers = &self.state.servers;
        self.selected_server
            .as_deref()
            .and_then(|id| servers.iter().find(|s| s.server_id == id))
            .or_else(|| servers.first())
    }

    /// Look up a player on the current server.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.current_server()?.players.iter().find(|p| p.user_id == id)
    }

    /// The hovered player, for tooltips.
    #[must_use]
    pub fn hovered_player(&self) -> Option<&Player> {
        self.player(self.hovered?)
    }

    /// Markers for every positioned player on the current server.
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        let Some(server) = self.current_server() else {
            return Vec::new();
        };
        let size_px = self.prefs.dot_size.px();
        project(&server.players, &self.camera, self.viewport)
            .into_iter()
            .map(|(player, screen)| Marker {
                player_id: player.user_id,
                screen,
                color: marker_color(player).to_owned(),
                size_px,
                passenger: player.is_passenger(),
                pinned: self.pinned == Some(player.user_id),
                hovered: self.hovered == Some(player.user_id),
            })
            .collect()
    }

    /// Empty-state text to overlay on the map, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&'static str> {
        match self.current_server() {
            None => Some("No servers available."),
            Some(server) if server.positioned_players().next().is_none() => {
                Some("No player coordinates for this server.")
            }
            Some(_) => None,
        }
    }
}

fn sanitize_len(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
