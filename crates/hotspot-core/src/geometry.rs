//! Container sizing and pixel <-> fraction conversion.
//!
//! Hotspot coordinates are stored as fractions of the container's content
//! box, so they survive any resize untouched. Only pixel values coming from
//! input (click offsets, drag deltas) are converted, always against the
//! size that is current at the moment of conversion.

use crate::error::{HotspotError, Result};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-box size of the container in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    /// Create a size, rejecting non-positive or non-finite dimensions.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(HotspotError::InvalidContainerSize { width, height });
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<Size> for ContainerSize {
    type Error = HotspotError;

    fn try_from(size: Size) -> Result<Self> {
        Self::new(size.width, size.height)
    }
}

impl From<ContainerSize> for Size {
    fn from(size: ContainerSize) -> Self {
        Size::new(size.width, size.height)
    }
}

/// Convert a container-relative pixel position to a fractional point.
pub fn to_fraction(pixel: Point, size: Option<ContainerSize>) -> Result<Point> {
    let size = size.ok_or(HotspotError::ContainerSizeUnknown)?;
    Ok(Point::new(pixel.x / size.width, pixel.y / size.height))
}

/// Convert a pixel delta to a fractional delta.
pub fn delta_to_fraction(delta: Vec2, size: Option<ContainerSize>) -> Result<Vec2> {
    let size = size.ok_or(HotspotError::ContainerSizeUnknown)?;
    Ok(Vec2::new(delta.x / size.width, delta.y / size.height))
}

/// Convert a fractional delta back to pixels (render-side translate preview).
pub fn to_pixel_delta(delta: Vec2, size: Option<ContainerSize>) -> Result<Vec2> {
    let size = size.ok_or(HotspotError::ContainerSizeUnknown)?;
    Ok(Vec2::new(delta.x * size.width, delta.y * size.height))
}

/// Raw offset fields reported by a click, relative to the container.
///
/// `primary` is the field that should carry the content-box offset.
/// Some platforms leave it zeroed and only populate `alternate`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClickOffset {
    pub primary: Point,
    pub alternate: Option<Point>,
}

impl ClickOffset {
    pub fn new(primary: Point) -> Self {
        Self {
            primary,
            alternate: None,
        }
    }

    pub fn with_alternate(mut self, alternate: Point) -> Self {
        self.alternate = Some(alternate);
        self
    }
}

impl From<Point> for ClickOffset {
    fn from(primary: Point) -> Self {
        Self::new(primary)
    }
}

/// Policy picking the pixel offset to use from a [`ClickOffset`].
pub trait OffsetPolicy: fmt::Debug {
    fn resolve(&self, offset: &ClickOffset) -> Point;
}

/// Always trust the primary field.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryOnly;

impl OffsetPolicy for PrimaryOnly {
    fn resolve(&self, offset: &ClickOffset) -> Point {
        offset.primary
    }
}

/// Use the alternate field on an axis when the primary reads exactly `(0, 0)`
/// and the alternate value for that axis is positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroOffsetFallback;

impl OffsetPolicy for ZeroOffsetFallback {
    fn resolve(&self, offset: &ClickOffset) -> Point {
        let primary = offset.primary;
        let Some(alternate) = offset.alternate else {
            return primary;
        };
        if primary.x != 0.0 || primary.y != 0.0 {
            return primary;
        }
        Point::new(
            if alternate.x > 0.0 { alternate.x } else { primary.x },
            if alternate.y > 0.0 { alternate.y } else { primary.y },
        )
    }
}
