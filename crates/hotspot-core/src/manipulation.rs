//! Hotspot manipulation: whole-shape drag, per-vertex drag, selection and
//! deletion.
//!
//! The two drag modes accumulate differently. A whole-hotspot drag keeps a
//! pending translation recomputed from the gesture origin on every move and
//! only folds it into the coordinates on release. A vertex drag mutates the
//! point live by each incremental delta so the rendering follows the pointer.

use crate::error::{HotspotError, Result};
use crate::geometry::{self, ContainerSize};
use crate::hotspot::{Hotspot, HotspotCollection, HotspotId};
use kurbo::Vec2;
use std::collections::HashMap;

/// What a drag gesture is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragTarget {
    /// The whole hotspot.
    Hotspot(HotspotId),
    /// One vertex of a hotspot.
    Vertex { id: HotspotId, index: usize },
}

impl DragTarget {
    pub fn hotspot_id(&self) -> HotspotId {
        match *self {
            DragTarget::Hotspot(id) | DragTarget::Vertex { id, .. } => id,
        }
    }
}

/// Result of [`Manipulator::delete_selected`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<T> {
    /// Nothing selected, or editing disabled.
    NoOp,
    /// The selected hotspot was removed and the selection cleared.
    Deleted(Hotspot<T>),
    /// The selection pointed at a hotspot no longer in the collection; only
    /// the selection was cleared.
    SelectionCleared,
}

/// Selection, pending translations and the missed-click counter.
#[derive(Debug, Clone, Default)]
pub struct Manipulator {
    pending: HashMap<HotspotId, Vec2>,
    selected: Option<HotspotId>,
    missed_clicks: u64,
}

impl Manipulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the whole-hotspot translation for a drag that has moved `total`
    /// pixels from its origin, replacing any earlier value.
    pub fn drag_hotspot(
        &mut self,
        id: HotspotId,
        total: Vec2,
        size: Option<ContainerSize>,
    ) -> Result<()> {
        let translation = geometry::delta_to_fraction(total, size)?;
        log::trace!("Pending translation for {id}: ({:.4}, {:.4})", translation.x, translation.y);
        self.pending.insert(id, translation);
        Ok(())
    }

    /// Fold the pending translation into the hotspot.
    ///
    /// Returns `false` when the drag never moved, in which case the hotspot
    /// is left untouched.
    pub fn commit_hotspot<T>(
        &mut self,
        collection: &mut HotspotCollection<T>,
        id: HotspotId,
    ) -> Result<bool> {
        let Some(translation) = self.pending.remove(&id) else {
            return Ok(false);
        };
        collection.require_mut(id)?.translate(translation);
        log::debug!("Committed translation ({:.4}, {:.4}) to {id}", translation.x, translation.y);
        Ok(true)
    }

    /// Move one vertex by an incremental pixel delta.
    pub fn drag_vertex<T>(
        &mut self,
        collection: &mut HotspotCollection<T>,
        id: HotspotId,
        index: usize,
        delta: Vec2,
        size: Option<ContainerSize>,
    ) -> Result<()> {
        let step = geometry::delta_to_fraction(delta, size)?;
        let hotspot = collection.require_mut(id)?;
        let point = hotspot
            .coords
            .get_mut(index)
            .ok_or(HotspotError::VertexOutOfRange { id, index })?;
        *point += step;
        Ok(())
    }

    /// Drop a pending translation without applying it.
    pub fn discard(&mut self, id: HotspotId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Drop every pending translation.
    pub fn discard_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending_translation(&self, id: HotspotId) -> Option<Vec2> {
        self.pending.get(&id).copied()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn selected(&self) -> Option<HotspotId> {
        self.selected
    }

    pub fn select(&mut self, id: HotspotId) {
        log::debug!("Selected hotspot {id}");
        self.selected = Some(id);
    }

    pub fn set_selected(&mut self, id: Option<HotspotId>) {
        self.selected = id;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Count a click that hit nothing and return the running total.
    pub fn click_missed(&mut self) -> u64 {
        self.missed_clicks += 1;
        self.missed_clicks
    }

    pub fn missed_clicks(&self) -> u64 {
        self.missed_clicks
    }

    /// Remove the selected hotspot from `collection`.
    pub fn delete_selected<T>(
        &mut self,
        collection: &mut HotspotCollection<T>,
        editable: bool,
    ) -> DeleteOutcome<T> {
        if !editable {
            return DeleteOutcome::NoOp;
        }
        let Some(id) = self.selected.take() else {
            return DeleteOutcome::NoOp;
        };
        self.pending.remove(&id);
        match collection.remove(id) {
            Some(hotspot) => {
                log::debug!("Deleted hotspot {id}");
                DeleteOutcome::Deleted(hotspot)
            }
            None => DeleteOutcome::SelectionCleared,
        }
    }
}
