//! The hotspot interaction engine.
//!
//! [`HotspotEngine`] owns one widget instance's hotspot collection and all
//! interaction state. Hosts feed it [`InputEvent`]s, call
//! [`poll`](HotspotEngine::poll) when the click timer is due, and drain the
//! resulting [`HotspotEvent`]s with [`take_events`](HotspotEngine::take_events).

use crate::click::ClickDisambiguator;
use crate::drawing::{DrawingMachine, DrawingState};
use crate::error::{HotspotError, Result};
use crate::geometry::{self, ClickOffset, ContainerSize, OffsetPolicy, PrimaryOnly, ZeroOffsetFallback};
use crate::gesture::{GestureEvent, GestureSource, InputKind};
use crate::hotspot::{Hotspot, HotspotCollection, HotspotId};
use crate::manipulation::{DeleteOutcome, DragTarget, Manipulator};
use crate::size::ContainerSizeTracker;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Contact id used for mouse/pen pointer gestures.
const POINTER_CONTACT: u64 = 0;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gates drawing, dragging and deletion. When false, single clicks that
    /// miss every hotspot are only reported as missed clicks.
    pub editable: bool,
    /// Quiet period separating a single click from a double click.
    pub click_window_ms: u64,
    /// Grab radius around a vertex, in device pixels.
    pub vertex_hit_radius: f64,
    /// Fall back to the alternate click offset when the primary reads `(0, 0)`.
    pub offset_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            editable: false,
            click_window_ms: 50,
            vertex_hit_radius: 8.0,
            offset_fallback: true,
        }
    }
}

impl EngineConfig {
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_click_window_ms(mut self, ms: u64) -> Self {
        self.click_window_ms = ms;
        self
    }

    pub fn with_vertex_hit_radius(mut self, radius: f64) -> Self {
        self.vertex_hit_radius = radius;
        self
    }

    pub fn with_offset_fallback(mut self, enabled: bool) -> Self {
        self.offset_fallback = enabled;
        self
    }

    fn offset_policy(&self) -> Box<dyn OffsetPolicy> {
        if self.offset_fallback {
            Box::new(ZeroOffsetFallback)
        } else {
            Box::new(PrimaryOnly)
        }
    }
}

/// Keyboard triggers understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyTrigger {
    /// Finish the polygon being drawn (Enter).
    Complete,
    /// Abandon the polygon being drawn (Escape).
    Cancel,
    /// Delete the selected hotspot (Delete).
    DeleteSelected,
}

/// Input accepted by [`HotspotEngine::handle`].
///
/// Positions are device pixels relative to the container's content box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown { position: Point },
    PointerMove { position: Point },
    PointerUp,
    TouchStart { id: u64, position: Point },
    TouchMove { id: u64, position: Point },
    TouchEnd { id: u64 },
    /// The platform interrupted a touch; the gesture ends without completing.
    TouchCancel { id: u64 },
    Click { offset: ClickOffset },
    DoubleClick,
    Key(KeyTrigger),
    Resize { width: f64, height: f64 },
}

/// Events raised to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HotspotEvent<T> {
    /// The collection changed; carries the full updated collection.
    CollectionChanged(Vec<Hotspot<T>>),
    /// The selection changed.
    SelectionChanged(Option<HotspotId>),
    /// A click landed on a hotspot's area.
    HotspotClicked(HotspotId),
    /// A non-editable single click hit no hotspot.
    MissedClick { count: u64 },
}

/// Interaction engine for one hotspot widget instance.
#[derive(Debug)]
pub struct HotspotEngine<T = ()> {
    config: EngineConfig,
    hotspots: HotspotCollection<T>,
    size: ContainerSizeTracker,
    gestures: GestureSource,
    drag: Option<DragTarget>,
    /// Hotspot whose drag just ended; the click synthesized from the same
    /// release belongs to it.
    released_on: Option<HotspotId>,
    clicks: ClickDisambiguator<Point>,
    drawing: DrawingMachine,
    manipulator: Manipulator,
    offset_policy: Box<dyn OffsetPolicy>,
    events: Vec<HotspotEvent<T>>,
    attached: bool,
}

impl<T: Clone> HotspotEngine<T> {
    /// Create an engine with an empty collection.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_hotspots(config, HotspotCollection::new())
    }

    /// Create an engine over an existing collection.
    pub fn with_hotspots(config: EngineConfig, hotspots: HotspotCollection<T>) -> Self {
        let offset_policy = config.offset_policy();
        let clicks = ClickDisambiguator::new(Duration::from_millis(config.click_window_ms));
        Self {
            config,
            hotspots,
            size: ContainerSizeTracker::new(),
            gestures: GestureSource::new(),
            drag: None,
            released_on: None,
            clicks,
            drawing: DrawingMachine::new(),
            manipulator: Manipulator::new(),
            offset_policy,
            events: Vec::new(),
            attached: true,
        }
    }

    /// Replace the click offset policy for the host platform.
    pub fn with_offset_policy(mut self, policy: Box<dyn OffsetPolicy>) -> Self {
        self.offset_policy = policy;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Toggle edit mode. Leaving edit mode abandons any polygon in progress
    /// and any drag. A vertex that already moved is reported as changed.
    pub fn set_editable(&mut self, editable: bool) {
        self.config.editable = editable;
        if editable {
            return;
        }
        if self.drawing.cancel() {
            log::debug!("Edit mode disabled, drawing cancelled");
        }
        if let Some(target) = self.abort_drag() {
            log::debug!("Edit mode disabled, drag on {target:?} aborted");
            if matches!(target, DragTarget::Vertex { .. }) {
                self.emit_collection_changed();
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Process one input event.
    ///
    /// Clicks whose quiet period ended before `now` are resolved first, so
    /// their effects land in timestamp order.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Result<()> {
        self.ensure_attached()?;
        let flushed = self.poll(now);
        let handled = self.dispatch(event, now);
        if let Err(err) = &handled {
            log::warn!("Input refused: {err}");
        }
        flushed.and(handled)
    }

    /// Fire every single click whose quiet period has elapsed.
    ///
    /// All due clicks are processed; the first failure is returned.
    pub fn poll(&mut self, now: Instant) -> Result<()> {
        self.ensure_attached()?;
        let mut result = Ok(());
        for pixel in self.clicks.poll(now) {
            if let Err(err) = self.single_click(pixel) {
                log::warn!("Single click refused: {err}");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    /// When the host should next call [`poll`](Self::poll).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.clicks.next_deadline()
    }

    fn dispatch(&mut self, event: InputEvent, now: Instant) -> Result<()> {
        match event {
            InputEvent::PointerDown { position } => self.press(InputKind::Pointer, POINTER_CONTACT, position),
            InputEvent::PointerMove { position } => self.moved(InputKind::Pointer, POINTER_CONTACT, position),
            InputEvent::PointerUp => self.release(InputKind::Pointer, POINTER_CONTACT),
            InputEvent::TouchStart { id, position } => self.press(InputKind::Touch, id, position),
            InputEvent::TouchMove { id, position } => self.moved(InputKind::Touch, id, position),
            InputEvent::TouchEnd { id } => self.release(InputKind::Touch, id),
            InputEvent::TouchCancel { id } => {
                self.interrupt(InputKind::Touch, id);
                Ok(())
            }
            InputEvent::Click { offset } => self.click(offset, now),
            InputEvent::DoubleClick => {
                self.double_click(now);
                Ok(())
            }
            InputEvent::Key(KeyTrigger::Complete) => {
                self.complete_drawing();
                Ok(())
            }
            InputEvent::Key(KeyTrigger::Cancel) => {
                self.cancel_drawing();
                Ok(())
            }
            InputEvent::Key(KeyTrigger::DeleteSelected) => {
                self.delete_selected();
                Ok(())
            }
            InputEvent::Resize { width, height } => self.size.observe(width, height).map(|_| ()),
        }
    }

    fn press(&mut self, kind: InputKind, contact: u64, position: Point) -> Result<()> {
        self.released_on = None;
        if !self.config.editable || self.drawing.is_drawing() || self.gestures.is_active() {
            return Ok(());
        }
        let size = self.size.require()?;
        let target = match self
            .hotspots
            .hit_test_vertex(position, size, self.config.vertex_hit_radius)
        {
            Some((id, index)) => Some(DragTarget::Vertex { id, index }),
            None => self
                .hotspots
                .hit_test(geometry::to_fraction(position, Some(size))?)
                .map(DragTarget::Hotspot),
        };
        match target {
            Some(target) => self.begin_drag(target, kind, contact, position).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Start dragging `target` from `position`.
    ///
    /// Hosts with their own hit testing call this directly. Returns `false`
    /// when not editable or when a gesture is already active.
    pub fn begin_drag(
        &mut self,
        target: DragTarget,
        kind: InputKind,
        contact: u64,
        position: Point,
    ) -> Result<bool> {
        self.ensure_attached()?;
        if !self.config.editable {
            return Ok(false);
        }
        let hotspot = self
            .hotspots
            .get(target.hotspot_id())
            .ok_or(HotspotError::UnknownHotspot(target.hotspot_id()))?;
        if let DragTarget::Vertex { id, index } = target {
            if index >= hotspot.coords.len() {
                return Err(HotspotError::VertexOutOfRange { id, index });
            }
        }
        if self.gestures.start(kind, contact, position).is_none() {
            return Ok(false);
        }
        log::debug!("Drag started on {target:?}");
        self.drag = Some(target);
        Ok(true)
    }

    fn moved(&mut self, kind: InputKind, contact: u64, position: Point) -> Result<()> {
        let mut result = Ok(());
        if self.drawing.is_tracking_preview() {
            result = geometry::to_fraction(position, self.size.current())
                .map(|point| {
                    self.drawing.update_preview(point);
                });
        }
        let Some(GestureEvent::Move { total, delta }) = self.gestures.moved(kind, contact, position) else {
            return result;
        };
        let size = self.size.current();
        let dragged = match self.drag {
            Some(DragTarget::Hotspot(id)) => self.manipulator.drag_hotspot(id, total, size),
            Some(DragTarget::Vertex { id, index }) => {
                self.manipulator
                    .drag_vertex(&mut self.hotspots, id, index, delta, size)
            }
            None => Ok(()),
        };
        result.and(dragged)
    }

    fn release(&mut self, kind: InputKind, contact: u64) -> Result<()> {
        if self.gestures.end(kind, contact) != Some(GestureEvent::End) {
            return Ok(());
        }
        let target = self.drag.take();
        self.released_on = target.map(|t| t.hotspot_id());
        match target {
            Some(DragTarget::Hotspot(id)) => {
                if self.manipulator.commit_hotspot(&mut self.hotspots, id)? {
                    self.emit_collection_changed();
                }
            }
            Some(DragTarget::Vertex { id, index }) => {
                log::debug!("Vertex {index} of {id} released");
                self.emit_collection_changed();
            }
            None => {}
        }
        Ok(())
    }

    /// End a gesture without a completion signal. A pending translation is
    /// discarded; a vertex that already moved is reported as changed.
    fn interrupt(&mut self, kind: InputKind, contact: u64) {
        if !self.gestures.cancel(kind, contact) {
            return;
        }
        match self.drag.take() {
            Some(DragTarget::Hotspot(id)) => {
                if self.manipulator.discard(id) {
                    log::debug!("Drag on {id} interrupted, translation discarded");
                }
            }
            Some(DragTarget::Vertex { .. }) => self.emit_collection_changed(),
            None => {}
        }
    }

    fn click(&mut self, offset: ClickOffset, now: Instant) -> Result<()> {
        if let Some(id) = self.released_on.take() {
            return if self.hotspots.contains(id) {
                self.click_hotspot(id)
            } else {
                Ok(())
            };
        }
        let pixel = self.offset_policy.resolve(&offset);
        if !self.hotspots.is_empty() {
            let point = geometry::to_fraction(pixel, self.size.current())?;
            if let Some(id) = self.hotspots.hit_test(point) {
                return self.click_hotspot(id);
            }
        }
        self.clicks.click(pixel, now);
        Ok(())
    }

    fn double_click(&mut self, now: Instant) {
        let suppressed = self.clicks.double_click(now);
        if suppressed > 0 {
            log::trace!("Double click suppressed {suppressed} pending click(s)");
        }
        self.complete_drawing();
    }

    fn single_click(&mut self, pixel: Point) -> Result<()> {
        if !self.config.editable {
            self.click_missed();
            return Ok(());
        }
        let point = geometry::to_fraction(pixel, self.size.current())?;
        self.drawing.begin_or_append(point);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Report a click on a hotspot: raises `HotspotClicked` and selects it.
    pub fn click_hotspot(&mut self, id: HotspotId) -> Result<()> {
        if !self.hotspots.contains(id) {
            return Err(HotspotError::UnknownHotspot(id));
        }
        self.events.push(HotspotEvent::HotspotClicked(id));
        self.select(id)
    }

    /// Select a hotspot and raise `SelectionChanged`.
    pub fn select(&mut self, id: HotspotId) -> Result<()> {
        if !self.hotspots.contains(id) {
            return Err(HotspotError::UnknownHotspot(id));
        }
        self.manipulator.select(id);
        self.events.push(HotspotEvent::SelectionChanged(Some(id)));
        Ok(())
    }

    /// Mirror a selection made by the host. Raises no event.
    pub fn set_selected(&mut self, id: Option<HotspotId>) {
        self.manipulator.set_selected(id);
    }

    /// Count a click that hit nothing and raise `MissedClick`.
    pub fn click_missed(&mut self) -> u64 {
        let count = self.manipulator.click_missed();
        self.events.push(HotspotEvent::MissedClick { count });
        count
    }

    /// Finish the polygon in progress. No-op while idle.
    pub fn complete_drawing(&mut self) -> Option<HotspotId> {
        let vertices = self.drawing.complete()?;
        let id = self.hotspots.push(Hotspot::new(vertices));
        self.emit_collection_changed();
        Some(id)
    }

    /// Abandon the polygon in progress. No-op while idle.
    pub fn cancel_drawing(&mut self) -> bool {
        self.drawing.cancel()
    }

    /// Delete the selected hotspot. No-op without a selection or edit mode.
    pub fn delete_selected(&mut self) -> bool {
        match self
            .manipulator
            .delete_selected(&mut self.hotspots, self.config.editable)
        {
            DeleteOutcome::NoOp => false,
            DeleteOutcome::Deleted(hotspot) => {
                if self.drag.is_some_and(|t| t.hotspot_id() == hotspot.id) {
                    self.abort_drag();
                }
                self.emit_collection_changed();
                self.events.push(HotspotEvent::SelectionChanged(None));
                true
            }
            DeleteOutcome::SelectionCleared => {
                self.events.push(HotspotEvent::SelectionChanged(None));
                true
            }
        }
    }

    /// Replace the collection from the host side.
    ///
    /// Refused while a drag or drawing is in flight.
    pub fn replace_hotspots(&mut self, hotspots: HotspotCollection<T>) -> Result<()> {
        if self.drag.is_some() || self.drawing.is_drawing() {
            return Err(HotspotError::Busy);
        }
        self.hotspots = hotspots;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Tear down all subscriptions.
    ///
    /// An active whole-hotspot drag is dropped with its pending translation
    /// unapplied; drawing and armed clicks are discarded. No events fire.
    pub fn detach(&mut self) {
        if let Some(target) = self.abort_drag() {
            log::debug!("Detached during drag on {target:?}, discarding");
        }
        self.manipulator.discard_all();
        self.released_on = None;
        self.drawing.cancel();
        self.clicks.clear();
        self.attached = false;
    }

    /// Re-enable input after [`detach`](Self::detach).
    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn ensure_attached(&self) -> Result<()> {
        if self.attached {
            Ok(())
        } else {
            Err(HotspotError::RenderTargetUnavailable)
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn hotspots(&self) -> &HotspotCollection<T> {
        &self.hotspots
    }

    pub fn hotspot(&self, id: HotspotId) -> Option<&Hotspot<T>> {
        self.hotspots.get(id)
    }

    pub fn selected(&self) -> Option<HotspotId> {
        self.manipulator.selected()
    }

    pub fn missed_clicks(&self) -> u64 {
        self.manipulator.missed_clicks()
    }

    pub fn drawing_state(&self) -> &DrawingState {
        self.drawing.state()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_drawing()
    }

    /// Rubber-band outline of the polygon being drawn.
    pub fn preview_polygon(&self) -> Vec<Point> {
        self.drawing.preview_polygon()
    }

    pub fn drag_target(&self) -> Option<DragTarget> {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the host should block native gesture handling right now.
    pub fn suppresses_default(&self) -> bool {
        self.gestures.suppresses_default()
    }

    pub fn container_size(&self) -> Option<ContainerSize> {
        self.size.current()
    }

    pub fn pending_translation(&self, id: HotspotId) -> Option<Vec2> {
        self.manipulator.pending_translation(id)
    }

    /// Pending translation in device pixels, for a translate-style preview.
    pub fn pending_translation_px(&self, id: HotspotId) -> Result<Option<Vec2>> {
        self.manipulator
            .pending_translation(id)
            .map(|t| geometry::to_pixel_delta(t, self.size.current()))
            .transpose()
    }

    /// Coordinates to render for a hotspot, pending translation included.
    pub fn display_coords(&self, id: HotspotId) -> Option<Vec<Point>> {
        let hotspot = self.hotspots.get(id)?;
        let offset = self.manipulator.pending_translation(id).unwrap_or(Vec2::ZERO);
        Some(hotspot.coords.iter().map(|&p| p + offset).collect())
    }

    /// Drain the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<HotspotEvent<T>> {
        std::mem::take(&mut self.events)
    }

    /// Drop the active gesture and its target without committing.
    fn abort_drag(&mut self) -> Option<DragTarget> {
        self.gestures.abort();
        let target = self.drag.take()?;
        if let DragTarget::Hotspot(id) = target {
            self.manipulator.discard(id);
        }
        Some(target)
    }

    fn emit_collection_changed(&mut self) {
        self.events
            .push(HotspotEvent::CollectionChanged(self.hotspots.as_slice().to_vec()));
    }
}
