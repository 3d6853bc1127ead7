//! New-hotspot drawing state machine.

use kurbo::Point;

/// State of an in-progress polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawingState {
    /// No polygon is being drawn.
    #[default]
    Idle,
    /// A polygon is being drawn.
    Drawing {
        /// Committed vertices (at least one).
        vertices: Vec<Point>,
        /// Next vertex candidate, follows the pointer.
        preview: Point,
    },
}

/// Owns the polygon under construction.
///
/// The preview tracker is armed exactly while the state is
/// [`DrawingState::Drawing`].
#[derive(Debug, Clone, Default)]
pub struct DrawingMachine {
    state: DrawingState,
}

impl DrawingMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// Start a polygon at `point`, or append `point` to the current one.
    pub fn begin_or_append(&mut self, point: Point) {
        if let DrawingState::Drawing { vertices, .. } = &mut self.state {
            vertices.push(point);
            log::debug!("Vertex {} appended", vertices.len());
            return;
        }
        log::debug!("Drawing started at ({:.4}, {:.4})", point.x, point.y);
        self.state = DrawingState::Drawing {
            vertices: vec![point],
            preview: point,
        };
    }

    /// Move the preview vertex. No-op while idle; returns whether it applied.
    pub fn update_preview(&mut self, point: Point) -> bool {
        if let DrawingState::Drawing { preview, .. } = &mut self.state {
            *preview = point;
            true
        } else {
            false
        }
    }

    /// Finish the polygon and hand back its vertices, preview excluded.
    pub fn complete(&mut self) -> Option<Vec<Point>> {
        match std::mem::take(&mut self.state) {
            DrawingState::Drawing { vertices, .. } => {
                log::debug!("Drawing completed with {} vertices", vertices.len());
                Some(vertices)
            }
            DrawingState::Idle => None,
        }
    }

    /// Discard the polygon. Returns `false` if nothing was being drawn.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            DrawingState::Drawing { vertices, .. } => {
                log::debug!("Drawing cancelled, {} vertices discarded", vertices.len());
                true
            }
            DrawingState::Idle => false,
        }
    }

    /// Check if a polygon is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing { .. })
    }

    /// Whether pointer moves should update the preview vertex.
    pub fn is_tracking_preview(&self) -> bool {
        self.is_drawing()
    }

    pub fn vertices(&self) -> &[Point] {
        match &self.state {
            DrawingState::Drawing { vertices, .. } => vertices,
            DrawingState::Idle => &[],
        }
    }

    pub fn preview(&self) -> Option<Point> {
        match &self.state {
            DrawingState::Drawing { preview, .. } => Some(*preview),
            DrawingState::Idle => None,
        }
    }

    /// Outline to render while drawing: the preview followed by the vertices.
    pub fn preview_polygon(&self) -> Vec<Point> {
        match &self.state {
            DrawingState::Drawing { vertices, preview } => {
                let mut outline = Vec::with_capacity(vertices.len() + 1);
                outline.push(*preview);
                outline.extend_from_slice(vertices);
                outline
            }
            DrawingState::Idle => Vec::new(),
        }
    }
}
