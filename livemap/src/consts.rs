//! Shared constants for the live map crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor the camera accepts.
pub const MIN_ZOOM: f64 = 0.5;

/// Largest zoom factor the camera accepts.
pub const MAX_ZOOM: f64 = 4.0;

/// Multiplicative step for one wheel notch or one zoom button press.
pub const ZOOM_FACTOR: f64 = 1.1;

// ── Markers ─────────────────────────────────────────────────────

/// Marker diameter in pixels for [`crate::prefs::DotSize::Small`].
pub const DOT_SMALL_PX: f64 = 8.0;

/// Marker diameter in pixels for [`crate::prefs::DotSize::Medium`].
pub const DOT_MEDIUM_PX: f64 = 11.0;

/// Marker diameter in pixels for [`crate::prefs::DotSize::Large`].
pub const DOT_LARGE_PX: f64 = 14.0;

/// Fill for passenger markers, regardless of team color.
pub const PASSENGER_COLOR: &str = "#ffffff";

/// Fill for the transit police team.
pub const TRANSIT_POLICE_COLOR: &str = "#00A8FF";

/// Fill for players still choosing a team.
pub const CHOOSING_COLOR: &str = "#A0A0A0";

/// Fill when neither the player nor the palette supplies a color.
pub const FALLBACK_TEAM_COLOR: &str = "#6a6adf";

// ── Storage ─────────────────────────────────────────────────────

/// Storage key for the dot size preference.
pub const DOT_SIZE_KEY: &str = "net-dashboard.dotSize";

/// Storage key for the zoom-to-cursor preference.
pub const ZOOM_TO_CURSOR_KEY: &str = "net-dashboard.zoomToCursor";

// ── Display ─────────────────────────────────────────────────────

/// Characters of a job id kept before truncating with `...`.
pub const SHORT_SERVER_ID_LEN: usize = 8;
