//! Live map viewport engine for the network operations dashboard.
//!
//! This crate owns the interactive part of the live map: translating raw
//! pointer, wheel and keyboard input into pan/zoom changes, projecting player
//! positions from normalized map space into screen pixels, and remembering the
//! user's display preferences between sessions. The host (a browser shell or
//! the `netdash` terminal client) is responsible only for wiring events to the
//! engine and drawing the resulting [`engine::Marker`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::MapEngine`]: viewport, selection, gestures, emitted [`engine::Action`]s |
//! | [`camera`] | Pan/zoom camera, cursor-anchored zoom and centering |
//! | [`input`] | Pointer buttons, targets, wheel deltas and the drag gesture |
//! | [`entity`] | Player/server wire types and the pure projection |
//! | [`style`] | Marker colors, dot sizes and display formatting |
//! | [`prefs`] | Persisted display preferences over a key-value store |
//! | [`consts`] | Shared numeric constants and storage keys |

pub mod camera;
pub mod consts;
pub mod engine;
pub mod entity;
pub mod input;
pub mod prefs;
pub mod style;
