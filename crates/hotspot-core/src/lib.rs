//! Hotspot Core Library
//!
//! Platform-agnostic interaction engine for polygon hotspots drawn over an
//! image: drawing new hotspots vertex by vertex, dragging whole hotspots or
//! single vertices, selection and deletion. Rendering and persistence are
//! left to the host.

pub mod click;
pub mod drawing;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod hotspot;
pub mod input;
pub mod manipulation;
pub mod size;

pub use click::{ClickDisambiguator, ClickPhase, DEFAULT_CLICK_WINDOW};
pub use drawing::{DrawingMachine, DrawingState};
pub use engine::{EngineConfig, HotspotEngine, HotspotEvent, InputEvent, KeyTrigger};
pub use error::{HotspotError, Result};
pub use geometry::{ClickOffset, ContainerSize, OffsetPolicy, PrimaryOnly, ZeroOffsetFallback};
pub use gesture::{GestureEvent, GestureSource, InputKind};
pub use hotspot::{Hotspot, HotspotCollection, HotspotId};
pub use input::WinitInput;
pub use manipulation::{DeleteOutcome, DragTarget, Manipulator};
pub use size::ContainerSizeTracker;
