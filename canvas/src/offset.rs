//! Section offset index: where each section starts on the canvas.
//!
//! Offsets are derived data. They are rebuilt from the section list whenever
//! it changes and never stored. Building sorts a copy of the list by `order`
//! and accumulates heights top-down, so each section's offset is the sum of
//! the heights of everything displayed above it.

#[cfg(test)]
#[path = "offset_test.rs"]
mod offset_test;

use std::collections::HashMap;

use serde::Serialize;

use crate::doc::{Section, SectionId, sort_by_order};
use crate::units::is_valid_px;

/// A section's placement in canvas space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetEntry {
    pub id: SectionId,
    /// Absolute Y where the section begins.
    pub offset: f64,
    /// Height in pixels. Zero for sections whose height was invalid.
    pub height: f64,
}

impl OffsetEntry {
    /// Absolute Y just past the section's bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.offset + self.height
    }

    /// Half-open range test: the top edge belongs to this section, the
    /// bottom edge belongs to the next one.
    #[must_use]
    pub fn contains(&self, absolute_y: f64) -> bool {
        self.offset <= absolute_y && absolute_y < self.bottom()
    }
}

/// Offsets for every section, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetIndex {
    entries: Vec<OffsetEntry>,
    total: f64,
}

impl OffsetIndex {
    /// Build the index. `sections` may be in any order and is not modified.
    ///
    /// `viewport_height` converts `vh` sections to pixels.
    #[must_use]
    pub fn build(sections: &[Section], viewport_height: f64) -> Self {
        let mut entries = Vec::with_capacity(sections.len());
        let mut acc = 0.0;
        for section in sort_by_order(sections) {
            let height = layout_height(section, viewport_height);
            entries.push(OffsetEntry { id: section.id.clone(), offset: acc, height });
            acc += height;
        }
        Self { entries, total: acc }
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[OffsetEntry] {
        &self.entries
    }

    /// Sum of all section heights.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.total
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&OffsetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Offset of the section with `id`, if present.
    #[must_use]
    pub fn offset(&self, id: &str) -> Option<f64> {
        self.entry(id).map(|e| e.offset)
    }

    /// Section id → offset.
    #[must_use]
    pub fn offsets(&self) -> HashMap<SectionId, f64> {
        self.entries.iter().map(|e| (e.id.clone(), e.offset)).collect()
    }

    #[must_use]
    pub fn first(&self) -> Option<&OffsetEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&OffsetEntry> {
        self.entries.last()
    }

    /// Topmost entry that occupies space. Skips sections zeroed for an invalid height.
    #[must_use]
    pub fn first_visible(&self) -> Option<&OffsetEntry> {
        self.entries.iter().find(|e| e.height > 0.0)
    }

    /// Bottommost entry that occupies space.
    #[must_use]
    pub fn last_visible(&self) -> Option<&OffsetEntry> {
        self.entries.iter().rev().find(|e| e.height > 0.0)
    }

    /// The section whose `[offset, offset + height)` range holds `absolute_y`.
    #[must_use]
    pub fn containing(&self, absolute_y: f64) -> Option<&OffsetEntry> {
        self.entries.iter().find(|e| e.contains(absolute_y))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Section id → offset for an unsorted section list.
#[must_use]
pub fn compute_offsets(sections: &[Section], viewport_height: f64) -> HashMap<SectionId, f64> {
    OffsetIndex::build(sections, viewport_height).offsets()
}

/// Total canvas height: the sum of every section's pixel height.
#[must_use]
pub fn total_height(sections: &[Section], viewport_height: f64) -> f64 {
    sections.iter().map(|s| layout_height(s, viewport_height)).sum()
}

/// Offset of `sections[index]`, treating the slice as already in display order.
///
/// Avoids building a full index when only one section is needed. Returns
/// `None` when `index` is out of bounds.
#[must_use]
pub fn offset_at(sections: &[Section], index: usize, viewport_height: f64) -> Option<f64> {
    if index >= sections.len() {
        return None;
    }
    Some(sections[..index].iter().map(|s| layout_height(s, viewport_height)).sum())
}

/// Pixel height used for stacking. Invalid heights collapse to zero.
fn layout_height(section: &Section, viewport_height: f64) -> f64 {
    let px = section.height_px(viewport_height);
    if is_valid_px(px) {
        px
    } else {
        tracing::warn!(section = %section.id, height = section.height, unit = ?section.unit, "invalid section height; treating as zero");
        0.0
    }
}
