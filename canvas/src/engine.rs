use crate::config::LayoutConfig;
use crate::consts::DEFAULT_VIEWPORT_HEIGHT_PX;
use crate::doc::{DocStore, Element, ElementId, PartialElement, Section, SectionId};
use crate::drag::{DragSession, Point};
use crate::error::{LayoutError, ensure_finite};
use crate::offset::OffsetIndex;
use crate::resolve::{Placement, PlacementKind, Resolution, locate_in, resolve_with_fallback};
use crate::units::SectionHeight;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from editor handlers for the host to persist or render.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId, fields: PartialElement },
    ElementDeleted { id: ElementId },
    SectionChanged { id: ElementId, from: SectionId, to: SectionId },
    SectionsReordered,
    RenderNeeded,
}

/// Editor state and the handlers that mutate it.
///
/// Drag handlers take the gesture's [`DragSession`] explicitly; nothing about
/// an in-progress drag lives on the core itself.
#[derive(Debug, Clone)]
pub struct EditorCore {
    pub doc: DocStore,
    pub config: LayoutConfig,
    viewport_height: f64,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl EditorCore {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { doc: DocStore::new(), config, viewport_height: DEFAULT_VIEWPORT_HEIGHT_PX }
    }

    // --- Viewport ---

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Update the viewport height used to size `vh` sections, then re-home
    /// elements that no longer fit the resized sections.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NonFiniteCoordinate`] for NaN or infinite heights.
    pub fn set_viewport_height(&mut self, height: f64) -> Result<Vec<Action>, LayoutError> {
        self.viewport_height = ensure_finite(height)?.max(0.0);
        self.settle()
    }

    // --- Queries ---

    /// Current offset index for the document's sections.
    #[must_use]
    pub fn offsets(&self) -> OffsetIndex {
        OffsetIndex::build(self.doc.sections(), self.viewport_height)
    }

    /// Absolute canvas position of an element's top-left corner.
    #[must_use]
    pub fn absolute_position(&self, element_id: &str) -> Option<Point> {
        let element = self.doc.element(element_id)?;
        let offset = self.offsets().offset(&element.section_id)?;
        Some(Point::new(element.x, offset + element.y))
    }

    // --- Sections ---

    /// Append a section at the bottom of the canvas.
    ///
    /// # Errors
    ///
    /// Fails for a non-positive height.
    pub fn append_section(&mut self, height: SectionHeight) -> Result<(SectionId, Vec<Action>), LayoutError> {
        let id = self.doc.append_section(height)?;
        Ok((id, vec![Action::SectionsReordered, Action::RenderNeeded]))
    }

    /// Move a section one slot up. Empty when it is already first.
    ///
    /// # Errors
    ///
    /// Fails for an unknown section.
    pub fn move_section_up(&mut self, id: &str) -> Result<Vec<Action>, LayoutError> {
        let moved = self.doc.move_section_up(id)?;
        Ok(reordered(moved))
    }

    /// Move a section one slot down. Empty when it is already last.
    ///
    /// # Errors
    ///
    /// Fails for an unknown section.
    pub fn move_section_down(&mut self, id: &str) -> Result<Vec<Action>, LayoutError> {
        let moved = self.doc.move_section_down(id)?;
        Ok(reordered(moved))
    }

    /// Resize a section, then re-home any elements that no longer fit it.
    ///
    /// # Errors
    ///
    /// Fails for an unknown section or an invalid height.
    pub fn resize_section(&mut self, id: &str, height: SectionHeight) -> Result<Vec<Action>, LayoutError> {
        self.doc.resize_section(id, height)?;
        let mut actions = self.settle()?;
        if !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        Ok(actions)
    }

    /// Delete a section and the elements it owns.
    pub fn remove_section(&mut self, id: &str) -> Vec<Action> {
        let Some((_, removed)) = self.doc.remove_section(id) else {
            return Vec::new();
        };
        let mut actions: Vec<Action> = removed.into_iter().map(|e| Action::ElementDeleted { id: e.id }).collect();
        actions.push(Action::SectionsReordered);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Elements ---

    /// Drop a new element at an absolute canvas position.
    ///
    /// The owning section and local coordinates are derived from `absolute`.
    ///
    /// # Errors
    ///
    /// Fails for non-finite coordinates and for an id that is already taken.
    pub fn drop_element(&mut self, id: ElementId, absolute: Point) -> Result<Vec<Action>, LayoutError> {
        ensure_finite(absolute.x)?;
        if self.doc.element(&id).is_some() {
            return Err(LayoutError::DuplicateElement(id));
        }
        let Some(placement) = locate_in(&self.offsets(), absolute.y, &self.config)? else {
            tracing::warn!(element = %id, "drop on a canvas with no sections");
            return Ok(Vec::new());
        };
        let element = Element { id, section_id: placement.section_id, x: absolute.x, y: placement.local_y };
        self.doc.insert_element(element.clone())?;
        Ok(vec![Action::ElementCreated(element), Action::RenderNeeded])
    }

    // --- Drag ---

    /// Start dragging an element. `pointer` is in canvas space.
    #[must_use]
    pub fn begin_drag(&self, element_id: &str, pointer: Point) -> Option<DragSession> {
        let element = self.doc.element(element_id)?;
        let origin = self.absolute_position(element_id)?;
        let grab = Point::new(pointer.x - origin.x, pointer.y - origin.y);
        Some(DragSession::new(
            element.id.clone(),
            grab,
            element.section_id.clone(),
            Point::new(element.x, element.y),
        ))
    }

    /// Handle a pointer move during a drag.
    ///
    /// # Errors
    ///
    /// Fails for non-finite pointer coordinates.
    pub fn on_drag_move(&mut self, session: &mut DragSession, pointer: Point) -> Result<Vec<Action>, LayoutError> {
        if session.is_muted() {
            return Ok(Vec::new());
        }
        self.drag_to(session, pointer)
    }

    /// Handle pointer release. The placement computed here is final.
    ///
    /// # Errors
    ///
    /// Fails for non-finite pointer coordinates.
    pub fn on_drag_end(&mut self, mut session: DragSession, pointer: Point) -> Result<Vec<Action>, LayoutError> {
        if session.is_muted() {
            return Ok(Vec::new());
        }
        let actions = self.drag_to(&mut session, pointer)?;
        if session.crossed_section() {
            tracing::debug!(
                element = session.element_id(),
                from = session.origin_section(),
                to = session.current_section(),
                "drag ended in a new section"
            );
        }
        Ok(actions)
    }

    /// Abort a drag and put the element back where it started.
    pub fn cancel_drag(&mut self, session: DragSession) -> Vec<Action> {
        let origin = session.origin_local();
        let fields = PartialElement {
            section_id: Some(session.origin_section().to_string()),
            x: Some(origin.x),
            y: Some(origin.y),
        };
        if !self.doc.apply_partial(session.element_id(), &fields) {
            return Vec::new();
        }
        vec![
            Action::ElementUpdated { id: session.element_id().to_string(), fields },
            Action::RenderNeeded,
        ]
    }

    fn drag_to(&mut self, session: &mut DragSession, pointer: Point) -> Result<Vec<Action>, LayoutError> {
        let target = session.element_position(pointer);
        let (actions, placement) = self.move_element_to(session.element_id(), target)?;
        if let Some(placement) = placement {
            session.record(placement);
        }
        Ok(actions)
    }

    /// Re-home every element whose local Y has left its section's range.
    ///
    /// Run after edits that change section geometry so each element ends up
    /// inside the section it is assigned to.
    ///
    /// # Errors
    ///
    /// Fails if an element carries non-finite coordinates.
    pub fn settle(&mut self) -> Result<Vec<Action>, LayoutError> {
        let index = self.offsets();
        let stray: Vec<(ElementId, Point)> = self
            .doc
            .elements()
            .into_iter()
            .filter_map(|e| {
                let entry = index.entry(&e.section_id)?;
                let absolute = Point::new(e.x, entry.offset + e.y);
                (!entry.contains(absolute.y)).then(|| (e.id.clone(), absolute))
            })
            .collect();

        let mut actions = Vec::new();
        for (id, absolute) in stray {
            let (moved, _) = self.move_element_to(&id, absolute)?;
            actions.extend(moved.into_iter().filter(|a| *a != Action::RenderNeeded));
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        Ok(actions)
    }

    /// Move an element so its top-left sits at `absolute`, reassigning its
    /// section when it crosses a boundary. Returns the applied placement
    /// alongside the actions; both are empty when nothing moved.
    fn move_element_to(&mut self, id: &str, absolute: Point) -> Result<(Vec<Action>, Option<Placement>), LayoutError> {
        ensure_finite(absolute.x)?;
        let Some(element) = self.doc.element(id) else {
            return Ok((Vec::new(), None));
        };
        let from = element.section_id.clone();
        let index = self.offsets();

        let Some(placement) = self.target_for(&index, &from, absolute.y)? else {
            return Ok((Vec::new(), None));
        };

        let to = placement.section_id.clone();
        let changed = to != from;
        let fields = PartialElement {
            section_id: changed.then(|| to.clone()),
            x: Some(absolute.x),
            y: Some(placement.local_y),
        };
        if !self.doc.apply_partial(id, &fields) {
            return Ok((Vec::new(), None));
        }

        let mut actions = vec![Action::ElementUpdated { id: id.to_string(), fields }];
        if changed {
            tracing::debug!(element = id, from = %from, to = %to, "element changed section");
            actions.push(Action::SectionChanged { id: id.to_string(), from, to });
        }
        actions.push(Action::RenderNeeded);
        Ok((actions, Some(placement)))
    }

    /// Where an element of section `from` lands when its top edge is at
    /// `absolute_y`. `None` leaves the element untouched.
    fn target_for(&self, index: &OffsetIndex, from: &str, absolute_y: f64) -> Result<Option<Placement>, LayoutError> {
        if index.entry(from).is_none() {
            tracing::warn!(section = from, policy = ?self.config.unknown_section, "element section missing");
        }
        let target = match resolve_with_fallback(index, absolute_y, from, &self.config)? {
            Resolution::Unchanged => Some(Placement {
                section_id: from.to_string(),
                local_y: absolute_y - index.offset(from).unwrap_or_default(),
                kind: PlacementKind::Within,
            }),
            Resolution::Placed(placement) => Some(placement),
            Resolution::NotFound => None,
        };
        Ok(target)
    }

    /// Replace the document with a snapshot of sections and elements.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot is invalid; the current document is kept.
    pub fn load_snapshot(&mut self, sections: Vec<Section>, elements: Vec<Element>) -> Result<(), LayoutError> {
        self.doc.load_snapshot(sections, elements)
    }
}

fn reordered(moved: bool) -> Vec<Action> {
    if moved { vec![Action::SectionsReordered, Action::RenderNeeded] } else { Vec::new() }
}
