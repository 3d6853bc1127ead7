//! Error types for the hotspot engine.

use crate::hotspot::HotspotId;
use thiserror::Error;

/// Errors raised when the engine is driven outside its lifecycle.
///
/// All of these abort the current operation before any mutation; no event
/// is emitted for a refused operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HotspotError {
    #[error("Container size unknown: no resize has been observed yet")]
    ContainerSizeUnknown,
    #[error("Invalid container size: {width}x{height}")]
    InvalidContainerSize { width: f64, height: f64 },
    #[error("Render target unavailable: engine is detached")]
    RenderTargetUnavailable,
    #[error("Unknown hotspot: {0}")]
    UnknownHotspot(HotspotId),
    #[error("Vertex {index} out of range for hotspot {id}")]
    VertexOutOfRange { id: HotspotId, index: usize },
    #[error("Hotspot collection is busy: a drag or drawing is in progress")]
    Busy,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, HotspotError>;
