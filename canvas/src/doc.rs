//! Document model: sections, positioned elements, and the in-memory store.
//!
//! The canvas is an ordered stack of `Section`s. Every `Element` belongs to
//! exactly one section and stores `x`/`y` relative to that section's top-left
//! corner. `DocStore` is the editor's state container: it owns both lists and
//! applies the lifecycle edits (append, reorder, resize, delete) and the
//! sparse element updates produced by the drag engine.
//!
//! Display order is ascending `order`. Ties keep insertion order, so the
//! store never reorders `sections` except when a move swaps two neighbours.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LayoutError;
use crate::units::{HeightUnit, SectionHeight};

/// Unique identifier for a section.
pub type SectionId = String;

/// Unique identifier for a positioned element.
pub type ElementId = String;

/// A vertically stacked region of the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Stable identifier, unique within the canvas.
    pub id: SectionId,
    /// Display rank; lower values sit higher on the canvas. Need not be contiguous.
    pub order: f64,
    /// Height in `unit`s.
    pub height: f64,
    /// Unit `height` is expressed in.
    #[serde(default)]
    pub unit: HeightUnit,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<SectionId>, order: f64, height: SectionHeight) -> Self {
        Self { id: id.into(), order, height: height.value, unit: height.unit }
    }

    /// The height together with its unit.
    #[must_use]
    pub fn section_height(&self) -> SectionHeight {
        SectionHeight { value: self.height, unit: self.unit }
    }

    /// Height in pixels for the given viewport height.
    #[must_use]
    pub fn height_px(&self, viewport_height: f64) -> f64 {
        self.section_height().to_px(viewport_height)
    }
}

/// A positioned element (text, shape, image, countdown) on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Section that owns the element.
    pub section_id: SectionId,
    /// Left edge relative to the owning section.
    pub x: f64,
    /// Top edge relative to the owning section.
    pub y: f64,
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialElement {
    /// New owning section, if the element crossed a boundary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    /// New local x, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New local y, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Return the sections in display order without mutating the input.
///
/// The sort is stable, so sections with equal `order` keep their relative
/// position in `sections`.
#[must_use]
pub fn sort_by_order(sections: &[Section]) -> Vec<&Section> {
    let mut sorted: Vec<&Section> = sections.iter().collect();
    sorted.sort_by(|a, b| a.order.total_cmp(&b.order));
    sorted
}

/// Check a raw section list before handing it to the offset index.
///
/// # Errors
///
/// Returns the first problem found: an empty id, a duplicate id, a
/// non-finite order, or a height that is not a positive finite number.
pub fn validate_sections(sections: &[Section]) -> Result<(), LayoutError> {
    for (i, section) in sections.iter().enumerate() {
        validate_section(section)?;
        if sections[..i].iter().any(|s| s.id == section.id) {
            return Err(LayoutError::DuplicateSection(section.id.clone()));
        }
    }
    Ok(())
}

fn validate_section(section: &Section) -> Result<(), LayoutError> {
    if section.id.is_empty() {
        return Err(LayoutError::EmptySectionId);
    }
    if !section.order.is_finite() {
        return Err(LayoutError::InvalidOrder { id: section.id.clone() });
    }
    validate_height(&section.id, section.height)
}

fn validate_height(id: &str, height: f64) -> Result<(), LayoutError> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidHeight { id: id.to_string(), height })
    }
}

/// In-memory store of sections and elements.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    sections: Vec<Section>,
    elements: HashMap<ElementId, Element>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all sections and elements with a full snapshot.
    ///
    /// # Errors
    ///
    /// Fails without touching the store if the sections are invalid or an
    /// element references a section that is not in the snapshot.
    pub fn load_snapshot(&mut self, sections: Vec<Section>, elements: Vec<Element>) -> Result<(), LayoutError> {
        validate_sections(&sections)?;
        if let Some(orphan) = elements.iter().find(|e| !sections.iter().any(|s| s.id == e.section_id)) {
            return Err(LayoutError::UnknownSection(orphan.section_id.clone()));
        }
        self.sections = sections;
        self.elements = elements.into_iter().map(|e| (e.id.clone(), e)).collect();
        Ok(())
    }

    // --- Sections ---

    /// Sections in insertion order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections in display order.
    #[must_use]
    pub fn sorted_sections(&self) -> Vec<&Section> {
        sort_by_order(&self.sections)
    }

    /// Look up a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Append a new section below all existing ones, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidHeight`] for a non-positive height.
    pub fn append_section(&mut self, height: SectionHeight) -> Result<SectionId, LayoutError> {
        let id = Uuid::new_v4().to_string();
        validate_height(&id, height.value)?;
        let order = self
            .sections
            .iter()
            .map(|s| s.order)
            .max_by(f64::total_cmp)
            .map_or(0.0, |max| max + 1.0);
        self.sections.push(Section::new(id.clone(), order, height));
        Ok(id)
    }

    /// Insert a caller-built section.
    ///
    /// # Errors
    ///
    /// Rejects invalid fields and ids that are already taken.
    pub fn insert_section(&mut self, section: Section) -> Result<(), LayoutError> {
        validate_section(&section)?;
        if self.section(&section.id).is_some() {
            return Err(LayoutError::DuplicateSection(section.id));
        }
        self.sections.push(section);
        Ok(())
    }

    /// Change a section's height.
    ///
    /// # Errors
    ///
    /// Fails for an unknown section or an invalid height.
    pub fn resize_section(&mut self, id: &str, height: SectionHeight) -> Result<(), LayoutError> {
        validate_height(id, height.value)?;
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| LayoutError::UnknownSection(id.to_string()))?;
        section.height = height.value;
        section.unit = height.unit;
        Ok(())
    }

    /// Swap a section with the one displayed directly above it.
    ///
    /// Returns `Ok(false)` when the section is already first.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownSection`] if `id` is not in the store.
    pub fn move_section_up(&mut self, id: &str) -> Result<bool, LayoutError> {
        self.swap_with_neighbour(id, -1)
    }

    /// Swap a section with the one displayed directly below it.
    ///
    /// Returns `Ok(false)` when the section is already last.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownSection`] if `id` is not in the store.
    pub fn move_section_down(&mut self, id: &str) -> Result<bool, LayoutError> {
        self.swap_with_neighbour(id, 1)
    }

    fn swap_with_neighbour(&mut self, id: &str, step: isize) -> Result<bool, LayoutError> {
        // Indices into `self.sections`, in display order.
        let mut display: Vec<usize> = (0..self.sections.len()).collect();
        display.sort_by(|&a, &b| self.sections[a].order.total_cmp(&self.sections[b].order));

        let pos = display
            .iter()
            .position(|&i| self.sections[i].id == id)
            .ok_or_else(|| LayoutError::UnknownSection(id.to_string()))?;
        let Some(&neighbour) = pos.checked_add_signed(step).and_then(|p| display.get(p)) else {
            return Ok(false);
        };
        let current = display[pos];

        let order = self.sections[current].order;
        self.sections[current].order = self.sections[neighbour].order;
        self.sections[neighbour].order = order;
        // Equal orders fall back to insertion order, so swap slots too.
        self.sections.swap(current, neighbour);
        Ok(true)
    }

    /// Remove a section together with every element it owns.
    pub fn remove_section(&mut self, id: &str) -> Option<(Section, Vec<Element>)> {
        let idx = self.sections.iter().position(|s| s.id == id)?;
        let section = self.sections.remove(idx);
        let owned: Vec<ElementId> = self
            .elements
            .values()
            .filter(|e| e.section_id == id)
            .map(|e| e.id.clone())
            .collect();
        let mut removed: Vec<Element> = owned.iter().filter_map(|eid| self.elements.remove(eid)).collect();
        removed.sort_by(|a, b| a.id.cmp(&b.id));
        Some((section, removed))
    }

    // --- Elements ---

    /// Insert or replace an element.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownSection`] if the owning section is missing.
    pub fn insert_element(&mut self, element: Element) -> Result<(), LayoutError> {
        if self.section(&element.section_id).is_none() {
            return Err(LayoutError::UnknownSection(element.section_id));
        }
        self.elements.insert(element.id.clone(), element);
        Ok(())
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// All elements sorted by id.
    #[must_use]
    pub fn elements(&self) -> Vec<&Element> {
        let mut all: Vec<&Element> = self.elements.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Elements owned by a section, sorted by id.
    #[must_use]
    pub fn elements_in(&self, section_id: &str) -> Vec<&Element> {
        let mut owned: Vec<&Element> = self.elements.values().filter(|e| e.section_id == section_id).collect();
        owned.sort_by(|a, b| a.id.cmp(&b.id));
        owned
    }

    /// Apply a partial update to an existing element.
    ///
    /// Returns false if the element doesn't exist or the update points it at
    /// a section that doesn't exist.
    pub fn apply_partial(&mut self, id: &str, partial: &PartialElement) -> bool {
        if let Some(section_id) = &partial.section_id {
            if self.section(section_id).is_none() {
                return false;
            }
        }
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if let Some(section_id) = &partial.section_id {
            element.section_id.clone_from(section_id);
        }
        if let Some(x) = partial.x {
            element.x = x;
        }
        if let Some(y) = partial.y {
            element.y = y;
        }
        true
    }

    /// Number of sections in the store.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of elements in the store.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store has no sections (and therefore no elements).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
