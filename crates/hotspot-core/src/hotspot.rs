//! Hotspot data model.
//!
//! Hotspots live in an ordered arena keyed by [`HotspotId`]. Identity is the
//! id, never the coordinates: two hotspots with identical points are still
//! distinct entries.

use crate::error::{HotspotError, Result};
use crate::geometry::ContainerSize;
use kurbo::{BezPath, Point, Shape as _, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable handle of a hotspot inside a [`HotspotCollection`].
pub type HotspotId = Uuid;

/// A polygon over the image, in fractional container coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Hotspot<T = ()> {
    #[serde(default = "Uuid::new_v4")]
    pub id: HotspotId,
    pub coords: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> Hotspot<T> {
    /// Create a hotspot with a fresh id and no payload.
    pub fn new(coords: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            coords,
            payload: None,
        }
    }

    /// Attach an opaque payload.
    pub fn with_payload(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Check whether a fractional point falls inside the polygon.
    ///
    /// Shapes with fewer than three points have no area and never contain
    /// anything.
    pub fn contains(&self, point: Point) -> bool {
        if self.coords.len() < 3 {
            return false;
        }
        let mut path = BezPath::new();
        path.move_to(self.coords[0]);
        for &p in &self.coords[1..] {
            path.line_to(p);
        }
        path.close_path();
        path.contains(point)
    }

    /// Shift every point by a fractional delta.
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.coords {
            *p += delta;
        }
    }
}

/// Ordered collection of hotspots owned by one widget instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotspotCollection<T = ()> {
    hotspots: Vec<Hotspot<T>>,
}

impl<T> Default for HotspotCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HotspotCollection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            hotspots: Vec::new(),
        }
    }

    /// Wrap an existing list of hotspots.
    pub fn from_hotspots(hotspots: Vec<Hotspot<T>>) -> Self {
        Self { hotspots }
    }

    /// Append a hotspot and return its id.
    pub fn push(&mut self, hotspot: Hotspot<T>) -> HotspotId {
        let id = hotspot.id;
        self.hotspots.push(hotspot);
        id
    }

    /// Remove a hotspot by id.
    pub fn remove(&mut self, id: HotspotId) -> Option<Hotspot<T>> {
        let index = self.index_of(id)?;
        Some(self.hotspots.remove(index))
    }

    pub fn get(&self, id: HotspotId) -> Option<&Hotspot<T>> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    pub fn get_mut(&mut self, id: HotspotId) -> Option<&mut Hotspot<T>> {
        self.hotspots.iter_mut().find(|h| h.id == id)
    }

    /// Like [`get_mut`](Self::get_mut) but reports a missing id as an error.
    pub fn require_mut(&mut self, id: HotspotId) -> Result<&mut Hotspot<T>> {
        self.get_mut(id).ok_or(HotspotError::UnknownHotspot(id))
    }

    pub fn contains(&self, id: HotspotId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: HotspotId) -> Option<usize> {
        self.hotspots.iter().position(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot<T>> {
        self.hotspots.iter()
    }

    pub fn as_slice(&self) -> &[Hotspot<T>] {
        &self.hotspots
    }

    pub fn into_vec(self) -> Vec<Hotspot<T>> {
        self.hotspots
    }

    /// Find the topmost hotspot whose area contains a fractional point.
    ///
    /// Later entries are drawn above earlier ones, so the search runs back
    /// to front.
    pub fn hit_test(&self, point: Point) -> Option<HotspotId> {
        self.hotspots
            .iter()
            .rev()
            .find(|h| h.contains(point))
            .map(|h| h.id)
    }

    /// Find the topmost vertex within `radius` device pixels of `pixel`.
    pub fn hit_test_vertex(
        &self,
        pixel: Point,
        size: ContainerSize,
        radius: f64,
    ) -> Option<(HotspotId, usize)> {
        let radius_sq = radius * radius;
        for hotspot in self.hotspots.iter().rev() {
            for (index, p) in hotspot.coords.iter().enumerate() {
                let dx = p.x * size.width - pixel.x;
                let dy = p.y * size.height - pixel.y;
                if dx * dx + dy * dy <= radius_sq {
                    return Some((hotspot.id, index));
                }
            }
        }
        None
    }
}

impl<T: Serialize> HotspotCollection<T> {
    /// Serialize the collection to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<T: for<'de> Deserialize<'de>> HotspotCollection<T> {
    /// Deserialize a collection from JSON. Entries without an id get a fresh one.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, side: f64) -> Hotspot {
        Hotspot::new(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
    }

    #[test]
    fn test_identity_is_not_value() {
        let mut collection = HotspotCollection::new();
        let a = collection.push(square(0.1, 0.1, 0.2));
        let b = collection.push(square(0.1, 0.1, 0.2));
        assert_ne!(a, b);

        collection.remove(a);
        assert_eq!(collection.len(), 1);
        assert!(collection.contains(b));
        assert!(!collection.contains(a));
    }

    #[test]
    fn test_contains() {
        let h = square(0.2, 0.2, 0.2);
        assert!(h.contains(Point::new(0.3, 0.3)));
        assert!(!h.contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_degenerate_has_no_area() {
        let h: Hotspot = Hotspot::new(vec![Point::new(0.1, 0.1), Point::new(0.9, 0.9)]);
        assert!(!h.contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_hit_test_topmost_wins() {
        let mut collection = HotspotCollection::new();
        let _bottom = collection.push(square(0.0, 0.0, 0.5));
        let top = collection.push(square(0.2, 0.2, 0.5));
        assert_eq!(collection.hit_test(Point::new(0.3, 0.3)), Some(top));
        assert_eq!(collection.hit_test(Point::new(0.9, 0.1)), None);
    }

    #[test]
    fn test_hit_test_vertex() {
        let mut collection = HotspotCollection::new();
        let id = collection.push(square(0.1, 0.1, 0.2));
        let size = ContainerSize::new(100.0, 100.0).unwrap();

        assert_eq!(
            collection.hit_test_vertex(Point::new(31.0, 9.0), size, 4.0),
            Some((id, 1))
        );
        assert_eq!(collection.hit_test_vertex(Point::new(50.0, 50.0), size, 4.0), None);
    }

    #[test]
    fn test_translate() {
        let mut h = square(0.1, 0.1, 0.1);
        h.translate(Vec2::new(0.1, -0.05));
        assert!((h.coords[0].x - 0.2).abs() < 1e-12);
        assert!((h.coords[0].y - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_json_without_ids() {
        let json = r#"[{"coords":[{"x":0.1,"y":0.2}],"payload":"door"}]"#;
        let collection: HotspotCollection<String> = HotspotCollection::from_json(json).unwrap();
        assert_eq!(collection.len(), 1);
        let h = &collection.as_slice()[0];
        assert_eq!(h.payload.as_deref(), Some("door"));
        assert_eq!(h.coords, vec![Point::new(0.1, 0.2)]);
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Link {
        target: String,
    }

    #[test]
    fn test_json_payload_without_default() {
        let mut collection: HotspotCollection<Link> = HotspotCollection::new();
        let linked = collection.push(Hotspot::new(square(0.0, 0.0, 0.1).coords).with_payload(Link {
            target: "kitchen".to_string(),
        }));
        let bare = collection.push(Hotspot::new(square(0.5, 0.5, 0.1).coords));

        let json = collection.to_json().unwrap();
        let restored: HotspotCollection<Link> = HotspotCollection::from_json(&json).unwrap();
        assert_eq!(restored, collection);
        assert_eq!(
            restored.get(linked).and_then(|h| h.payload.as_ref()),
            Some(&Link {
                target: "kitchen".to_string()
            })
        );
        assert!(restored.get(bare).unwrap().payload.is_none());
    }

    #[test]
    fn test_json_keeps_ids() {
        let mut collection = HotspotCollection::new();
        let id = collection.push(square(0.0, 0.0, 0.1));
        let json = collection.to_json().unwrap();
        let restored: HotspotCollection = HotspotCollection::from_json(&json).unwrap();
        assert!(restored.contains(id));
    }
}
