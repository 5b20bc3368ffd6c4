//! Unit selection with pointer drag rectangles.

use tracing::debug;

use crate::command::Command;
use crate::coord::ScreenPos;
use crate::world::{EntityId, Session};

/// The in-progress drag rectangle, in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragRect {
    pub anchor: ScreenPos,
    pub cursor: ScreenPos,
}

/// The set of selected entities plus drag state.
///
/// Ids keep selection order; an entity is never listed twice. Resolution
/// against the world happens on release, through the session's
/// region query.
#[derive(Debug, Default)]
pub struct UnitSelection {
    ids: Vec<EntityId>,
    drag: Option<DragRect>,
}

impl UnitSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.drag = None;
    }

    /// Anchor a drag at the given position.
    pub fn drag_begin(&mut self, at: ScreenPos) {
        self.drag = Some(DragRect {
            anchor: at,
            cursor: at,
        });
    }

    /// Move the drag cursor; anchors first if no drag is active, so a
    /// release that never saw a press still resolves as a point pick.
    pub fn drag_update(&mut self, to: ScreenPos) {
        match &mut self.drag {
            Some(rect) => rect.cursor = to,
            None => self.drag_begin(to),
        }
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Resolve the rectangle against the world. `extend` keeps the current
    /// selection and adds; otherwise the result replaces it.
    pub fn drag_release(&mut self, session: &dyn Session, extend: bool) {
        let Some(rect) = self.drag.take() else {
            return;
        };
        let found = session.entities_in_region(rect.anchor, rect.cursor);
        if !extend {
            self.ids.clear();
        }
        for id in found {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        debug!("selection resolved to {} entities", self.ids.len());
    }

    /// Whether any selected entity can construct buildings.
    pub fn contains_builders(&self, session: &dyn Session) -> bool {
        self.ids.iter().any(|&id| session.can_build(id))
    }

    /// Apply a command to every selected entity.
    pub fn issue(&self, session: &mut dyn Session, command: &Command) {
        for &id in &self.ids {
            session.apply_command(id, command);
        }
    }

    /// Remove every selected entity from the world and empty the set.
    pub fn kill(&mut self, session: &mut dyn Session) {
        for &id in &self.ids {
            session.remove_entity(id);
        }
        debug!("killed {} selected entities", self.ids.len());
        self.ids.clear();
    }
}
