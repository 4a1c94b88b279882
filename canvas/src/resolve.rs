//! Section resolver: maps an absolute Y back to a section and a local Y.
//!
//! Called once per drag-move and once on drag-end. Every call recomputes from
//! the current section list; nothing is carried between calls except the
//! element's current section, which the caller owns.
//!
//! Placement rules, checked in order:
//! - still inside the current section's `[offset, offset + height)` → unchanged
//! - above the canvas (`y < 0`) → first section, local `y = 0`
//! - at or past the bottom (`y >= total`) → last section, `height - bottom_margin`
//! - otherwise → the section whose range holds `y`, local `y - offset`

#[cfg(test)]
#[path = "resolve_test.rs"]
mod resolve_test;

use serde::Serialize;

use crate::config::{LayoutConfig, UnknownSectionPolicy};
use crate::doc::{Section, SectionId};
use crate::error::{LayoutError, ensure_finite};
use crate::offset::{OffsetEntry, OffsetIndex};

/// Why an element landed where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    /// The coordinate fell inside the section's range.
    Within,
    /// The coordinate was above the canvas and was pinned to the first section's top.
    ClampedAbove,
    /// The coordinate was at or below the canvas bottom and was pinned inside the last section.
    ClampedBelow,
}

/// A section assignment plus the element's Y local to that section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub section_id: SectionId,
    pub local_y: f64,
    pub kind: PlacementKind,
}

/// Result of a resolve call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// The coordinate is still inside the current section; no remapping needed.
    Unchanged,
    /// The element belongs somewhere else (or had to be clamped).
    Placed(Placement),
    /// No section to resolve against: the list is empty or the current
    /// section is not in it. The caller picks a fallback.
    NotFound,
}

/// Resolve `absolute_y` for an element currently owned by `current_section_id`.
///
/// `sections` may be unsorted. `viewport_height` converts `vh` sections.
///
/// # Errors
///
/// Returns [`LayoutError::NonFiniteCoordinate`] if `absolute_y` or
/// `viewport_height` is NaN or infinite.
pub fn resolve(
    absolute_y: f64,
    current_section_id: &str,
    sections: &[Section],
    viewport_height: f64,
    config: &LayoutConfig,
) -> Result<Resolution, LayoutError> {
    ensure_finite(viewport_height)?;
    let index = OffsetIndex::build(sections, viewport_height);
    resolve_in(&index, absolute_y, current_section_id, config)
}

/// [`resolve`] against a prebuilt index.
///
/// # Errors
///
/// Returns [`LayoutError::NonFiniteCoordinate`] for a NaN or infinite `absolute_y`.
pub fn resolve_in(
    index: &OffsetIndex,
    absolute_y: f64,
    current_section_id: &str,
    config: &LayoutConfig,
) -> Result<Resolution, LayoutError> {
    ensure_finite(absolute_y)?;
    let Some(current) = index.entry(current_section_id) else {
        if !index.is_empty() {
            tracing::warn!(section = current_section_id, "resolve against unknown section");
        }
        return Ok(Resolution::NotFound);
    };
    if current.contains(absolute_y) {
        return Ok(Resolution::Unchanged);
    }
    Ok(locate_in(index, absolute_y, config)?.map_or(Resolution::NotFound, Resolution::Placed))
}

/// [`resolve_in`], with `config.unknown_section` applied to a `NotFound` result.
///
/// Under [`UnknownSectionPolicy::ClampBelow`] an element whose section has
/// vanished is treated as dragged past the bottom of the canvas. Under
/// [`UnknownSectionPolicy::Keep`], or when there is nowhere to clamp to, the
/// result stays `NotFound`.
///
/// # Errors
///
/// Returns [`LayoutError::NonFiniteCoordinate`] for a NaN or infinite `absolute_y`.
pub fn resolve_with_fallback(
    index: &OffsetIndex,
    absolute_y: f64,
    current_section_id: &str,
    config: &LayoutConfig,
) -> Result<Resolution, LayoutError> {
    let resolution = resolve_in(index, absolute_y, current_section_id, config)?;
    if resolution != Resolution::NotFound || config.unknown_section == UnknownSectionPolicy::Keep {
        return Ok(resolution);
    }
    Ok(clamp_below(index, config).map_or(Resolution::NotFound, Resolution::Placed))
}

/// Place `absolute_y` with no current section, e.g. when dropping a new element.
///
/// Returns `Ok(None)` for an empty section list.
///
/// # Errors
///
/// Returns [`LayoutError::NonFiniteCoordinate`] for non-finite input.
pub fn locate(
    absolute_y: f64,
    sections: &[Section],
    viewport_height: f64,
    config: &LayoutConfig,
) -> Result<Option<Placement>, LayoutError> {
    ensure_finite(viewport_height)?;
    locate_in(&OffsetIndex::build(sections, viewport_height), absolute_y, config)
}

/// [`locate`] against a prebuilt index.
///
/// # Errors
///
/// Returns [`LayoutError::NonFiniteCoordinate`] for a NaN or infinite `absolute_y`.
pub fn locate_in(index: &OffsetIndex, absolute_y: f64, config: &LayoutConfig) -> Result<Option<Placement>, LayoutError> {
    ensure_finite(absolute_y)?;
    let Some(first) = index.first_visible() else {
        return Ok(None);
    };

    if absolute_y < first.offset {
        return Ok(Some(placement(first, 0.0, PlacementKind::ClampedAbove)));
    }
    if let Some(entry) = index.containing(absolute_y) {
        return Ok(Some(placement(entry, absolute_y - entry.offset, PlacementKind::Within)));
    }
    Ok(clamp_below(index, config))
}

/// Placement for a coordinate past the bottom of the canvas.
///
/// Also the fallback for elements whose section vanished mid-drag. Returns
/// `None` when no section occupies any space.
#[must_use]
pub fn clamp_below(index: &OffsetIndex, config: &LayoutConfig) -> Option<Placement> {
    index.last_visible().map(|last| clamp_into(last, config))
}

fn clamp_into(last: &OffsetEntry, config: &LayoutConfig) -> Placement {
    // Sections shorter than the margin pin to their top.
    let local_y = (last.height - config.bottom_margin).max(0.0);
    placement(last, local_y, PlacementKind::ClampedBelow)
}

fn placement(entry: &OffsetEntry, local_y: f64, kind: PlacementKind) -> Placement {
    Placement { section_id: entry.id.clone(), local_y, kind }
}
