//! Shared numeric constants for the canvas crate.

// ── Resolver ────────────────────────────────────────────────────

/// Distance kept between a clamped element and the bottom of the last
/// section when it is dragged past the end of the canvas, in pixels.
pub const DEFAULT_BOTTOM_MARGIN_PX: f64 = 50.0;

// ── Viewport ────────────────────────────────────────────────────

/// Viewport height assumed when the host has not reported one yet.
pub const DEFAULT_VIEWPORT_HEIGHT_PX: f64 = 800.0;
