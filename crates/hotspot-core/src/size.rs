//! Container size tracking.

use crate::error::{HotspotError, Result};
use crate::geometry::ContainerSize;

/// Holds the latest measured container size.
///
/// Existing hotspot coordinates are fractional and never rescaled; only
/// future pixel conversions see the new size, including moves of a drag
/// that spans the resize.
#[derive(Debug, Clone, Default)]
pub struct ContainerSizeTracker {
    current: Option<ContainerSize>,
    revision: u64,
}

impl ContainerSizeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new content-box measurement.
    ///
    /// Returns `true` if the size changed. Invalid dimensions are refused
    /// and the previous size is kept.
    pub fn observe(&mut self, width: f64, height: f64) -> Result<bool> {
        let size = ContainerSize::new(width, height)?;
        if self.current == Some(size) {
            return Ok(false);
        }
        log::debug!("Container resized to {}x{}", size.width, size.height);
        self.current = Some(size);
        self.revision += 1;
        Ok(true)
    }

    /// The current size, if one has been measured.
    pub fn current(&self) -> Option<ContainerSize> {
        self.current
    }

    /// The current size, or an error before the first measurement.
    pub fn require(&self) -> Result<ContainerSize> {
        self.current.ok_or(HotspotError::ContainerSizeUnknown)
    }

    /// Number of distinct sizes observed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Forget the measured size (container unmounted).
    pub fn reset(&mut self) {
        self.current = None;
    }
}
