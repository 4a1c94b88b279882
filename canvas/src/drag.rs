//! Drag session context.
//!
//! One `DragSession` exists per drag gesture. The host creates it on
//! pointer-down via [`crate::engine::EditorCore::begin_drag`] and passes it by
//! `&mut` to every move handler. Other components that need to suspend
//! dragging (inline text editing, section resizing) mute the session they
//! were handed rather than flipping a shared global flag.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::doc::{ElementId, SectionId};
use crate::resolve::Placement;

/// A point in canvas space (absolute) or section space (local).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// State for one in-progress element drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    element_id: ElementId,
    /// Pointer minus the element's absolute top-left at pointer-down.
    grab_offset: Point,
    /// Section and local position at pointer-down, used to revert on cancel.
    origin_section: SectionId,
    origin_local: Point,
    /// Section the element was assigned to by the most recent move.
    current_section: SectionId,
    /// Most recent placement applied to the element. `None` until the first move.
    last_placement: Option<Placement>,
    muted: bool,
}

impl DragSession {
    #[must_use]
    pub fn new(element_id: ElementId, grab_offset: Point, section_id: SectionId, local: Point) -> Self {
        Self {
            element_id,
            grab_offset,
            origin_section: section_id.clone(),
            origin_local: local,
            current_section: section_id,
            last_placement: None,
            muted: false,
        }
    }

    #[must_use]
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    #[must_use]
    pub fn origin_section(&self) -> &str {
        &self.origin_section
    }

    #[must_use]
    pub fn origin_local(&self) -> Point {
        self.origin_local
    }

    #[must_use]
    pub fn current_section(&self) -> &str {
        &self.current_section
    }

    /// The placement applied by the most recent move, including how it was
    /// reached (inside a section or clamped at an edge).
    #[must_use]
    pub fn last_placement(&self) -> Option<&Placement> {
        self.last_placement.as_ref()
    }

    pub(crate) fn record(&mut self, placement: Placement) {
        self.current_section.clone_from(&placement.section_id);
        self.last_placement = Some(placement);
    }

    /// Whether the element has left the section it started in.
    #[must_use]
    pub fn crossed_section(&self) -> bool {
        self.current_section != self.origin_section
    }

    /// Absolute top-left of the element for a pointer position.
    #[must_use]
    pub fn element_position(&self, pointer: Point) -> Point {
        Point::new(pointer.x - self.grab_offset.x, pointer.y - self.grab_offset.y)
    }

    /// Ignore pointer moves until [`Self::unmute`] is called.
    pub fn mute(&mut self) {
        self.muted = true;
    }

    pub fn unmute(&mut self) {
        self.muted = false;
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}
