//! Unified pointer/touch drag gestures.
//!
//! A [`GestureSource`] turns raw pointer and touch events into a single
//! stream of [`GestureEvent`]s. The first input kind to start a gesture
//! claims it; events from the other kind, or from a different touch, are
//! ignored until the gesture ends.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// The device family that produced an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    Pointer,
    Touch,
}

/// Events emitted by a [`GestureSource`], positions and deltas in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// The gesture began at `origin`.
    Start { origin: Point },
    /// The contact moved. `total` is relative to the origin, `delta` to the
    /// previous move.
    Move { total: Vec2, delta: Vec2 },
    /// The contact was released.
    End,
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    kind: InputKind,
    contact: u64,
    origin: Point,
    previous: Point,
}

/// Tracks at most one drag gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct GestureSource {
    active: Option<ActiveGesture>,
}

impl GestureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a gesture. Ignored while another gesture is active.
    ///
    /// `contact` identifies the finger for touch input; pointer input uses 0.
    pub fn start(&mut self, kind: InputKind, contact: u64, position: Point) -> Option<GestureEvent> {
        if self.active.is_some() {
            return None;
        }
        self.active = Some(ActiveGesture {
            kind,
            contact,
            origin: position,
            previous: position,
        });
        Some(GestureEvent::Start { origin: position })
    }

    /// Feed a move. Only the claiming kind and contact produce events.
    pub fn moved(&mut self, kind: InputKind, contact: u64, position: Point) -> Option<GestureEvent> {
        let gesture = self.active.as_mut()?;
        if gesture.kind != kind || gesture.contact != contact {
            return None;
        }
        let total = position - gesture.origin;
        let delta = position - gesture.previous;
        gesture.previous = position;
        Some(GestureEvent::Move { total, delta })
    }

    /// Release the contact. A stray end without a start is a no-op.
    pub fn end(&mut self, kind: InputKind, contact: u64) -> Option<GestureEvent> {
        match self.active {
            Some(gesture) if gesture.kind == kind && gesture.contact == contact => {
                self.active = None;
                Some(GestureEvent::End)
            }
            _ => None,
        }
    }

    /// Drop the gesture owned by `kind`/`contact` without emitting `End`.
    pub fn cancel(&mut self, kind: InputKind, contact: u64) -> bool {
        match self.active {
            Some(gesture) if gesture.kind == kind && gesture.contact == contact => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the active gesture without emitting `End`.
    pub fn abort(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Which input kind claimed the active gesture, if any.
    pub fn claimed_by(&self) -> Option<InputKind> {
        self.active.map(|g| g.kind)
    }

    /// Whether the host should suppress native handling (text selection,
    /// scrolling) for the current input.
    pub fn suppresses_default(&self) -> bool {
        self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_move_end() {
        let mut source = GestureSource::new();

        assert_eq!(
            source.start(InputKind::Pointer, 0, Point::new(10.0, 10.0)),
            Some(GestureEvent::Start {
                origin: Point::new(10.0, 10.0)
            })
        );
        assert!(source.suppresses_default());

        assert_eq!(
            source.moved(InputKind::Pointer, 0, Point::new(15.0, 12.0)),
            Some(GestureEvent::Move {
                total: Vec2::new(5.0, 2.0),
                delta: Vec2::new(5.0, 2.0),
            })
        );
        assert_eq!(
            source.moved(InputKind::Pointer, 0, Point::new(20.0, 10.0)),
            Some(GestureEvent::Move {
                total: Vec2::new(10.0, 0.0),
                delta: Vec2::new(5.0, -2.0),
            })
        );

        assert_eq!(source.end(InputKind::Pointer, 0), Some(GestureEvent::End));
        assert!(!source.is_active());
    }

    #[test]
    fn test_second_start_ignored() {
        let mut source = GestureSource::new();
        source.start(InputKind::Pointer, 0, Point::new(0.0, 0.0));
        assert_eq!(source.start(InputKind::Pointer, 0, Point::new(50.0, 50.0)), None);

        // Origin is still the first start.
        assert_eq!(
            source.moved(InputKind::Pointer, 0, Point::new(1.0, 0.0)),
            Some(GestureEvent::Move {
                total: Vec2::new(1.0, 0.0),
                delta: Vec2::new(1.0, 0.0),
            })
        );
    }

    #[test]
    fn test_first_kind_claims_gesture() {
        let mut source = GestureSource::new();
        source.start(InputKind::Touch, 3, Point::new(0.0, 0.0));
        assert_eq!(source.claimed_by(), Some(InputKind::Touch));

        assert_eq!(source.start(InputKind::Pointer, 0, Point::new(0.0, 0.0)), None);
        assert_eq!(source.moved(InputKind::Pointer, 0, Point::new(5.0, 5.0)), None);
        assert_eq!(source.end(InputKind::Pointer, 0), None);

        // A second finger does not hijack the gesture.
        assert_eq!(source.moved(InputKind::Touch, 4, Point::new(5.0, 5.0)), None);
        assert_eq!(source.end(InputKind::Touch, 3), Some(GestureEvent::End));
    }

    #[test]
    fn test_stray_end_is_noop() {
        let mut source = GestureSource::new();
        assert_eq!(source.end(InputKind::Pointer, 0), None);
        assert_eq!(source.moved(InputKind::Pointer, 0, Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_cancel_only_for_owner() {
        let mut source = GestureSource::new();
        source.start(InputKind::Touch, 1, Point::ZERO);
        assert!(!source.cancel(InputKind::Touch, 2));
        assert!(source.cancel(InputKind::Touch, 1));
        assert!(!source.is_active());
    }

    #[test]
    fn test_abort() {
        let mut source = GestureSource::new();
        source.start(InputKind::Pointer, 0, Point::ZERO);
        assert!(source.abort());
        assert!(!source.abort());
        assert_eq!(source.end(InputKind::Pointer, 0), None);
    }
}
