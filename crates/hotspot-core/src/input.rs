//! winit window events -> engine input.
//!
//! winit reports raw button and touch transitions only, so this adapter
//! also synthesizes clicks (on release) and double clicks (a second click
//! close in time and space), in the same order a browser would deliver them.

use crate::engine::{InputEvent, KeyTrigger};
use crate::geometry::ClickOffset;
use kurbo::Point;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{Key, NamedKey};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Translates winit events into [`InputEvent`]s for one container.
#[derive(Debug, Clone)]
pub struct WinitInput {
    /// Top-left of the container's content box in window pixels.
    container_origin: Point,
    /// Emit `Resize` from window resizes (the container fills the window).
    container_fills_window: bool,
    /// Last cursor position, container-relative.
    cursor: Point,
    left_pressed: bool,
    /// Last click time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last click position for double-click detection.
    last_click_position: Option<Point>,
}

impl Default for WinitInput {
    fn default() -> Self {
        Self {
            container_origin: Point::ZERO,
            container_fills_window: true,
            cursor: Point::ZERO,
            left_pressed: false,
            last_click_time: None,
            last_click_position: None,
        }
    }
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set where the container sits inside the window.
    pub fn set_container_origin(&mut self, origin: Point) {
        self.container_origin = origin;
    }

    /// Whether window resizes should be reported as container resizes.
    pub fn with_container_fills_window(mut self, fills: bool) -> Self {
        self.container_fills_window = fills;
        self
    }

    /// Current cursor position relative to the container.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Translate one window event. Most events produce zero or one input;
    /// a release can produce up to three (up, click, double click).
    pub fn translate(&mut self, event: &WindowEvent, now: Instant) -> Vec<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(*position),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button, now),
            WindowEvent::Touch(touch) => self.touch(touch.phase, touch.id, touch.location, now),
            WindowEvent::KeyboardInput { event, .. } => {
                self.key(&event.logical_key, event.state, event.repeat)
            }
            WindowEvent::Resized(size) => self.resized(size.width, size.height),
            _ => Vec::new(),
        }
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> Vec<InputEvent> {
        self.cursor = self.local(position);
        vec![InputEvent::PointerMove {
            position: self.cursor,
        }]
    }

    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton, now: Instant) -> Vec<InputEvent> {
        if button != MouseButton::Left {
            return Vec::new();
        }
        match state {
            ElementState::Pressed => {
                self.left_pressed = true;
                vec![InputEvent::PointerDown {
                    position: self.cursor,
                }]
            }
            ElementState::Released => {
                let mut out = vec![InputEvent::PointerUp];
                if std::mem::take(&mut self.left_pressed) {
                    self.register_click(self.cursor, now, &mut out);
                }
                out
            }
        }
    }

    pub fn touch(
        &mut self,
        phase: TouchPhase,
        id: u64,
        location: PhysicalPosition<f64>,
        now: Instant,
    ) -> Vec<InputEvent> {
        let position = self.local(location);
        match phase {
            TouchPhase::Started => vec![InputEvent::TouchStart { id, position }],
            TouchPhase::Moved => vec![InputEvent::TouchMove { id, position }],
            TouchPhase::Ended => {
                let mut out = vec![InputEvent::TouchEnd { id }];
                self.register_click(position, now, &mut out);
                out
            }
            TouchPhase::Cancelled => vec![InputEvent::TouchCancel { id }],
        }
    }

    pub fn key(&mut self, key: &Key, state: ElementState, repeat: bool) -> Vec<InputEvent> {
        if state != ElementState::Pressed || repeat {
            return Vec::new();
        }
        let trigger = match key {
            Key::Named(NamedKey::Enter) => KeyTrigger::Complete,
            Key::Named(NamedKey::Escape) => KeyTrigger::Cancel,
            Key::Named(NamedKey::Delete) => KeyTrigger::DeleteSelected,
            _ => return Vec::new(),
        };
        vec![InputEvent::Key(trigger)]
    }

    pub fn resized(&mut self, width: u32, height: u32) -> Vec<InputEvent> {
        // Minimized windows report a zero size.
        if !self.container_fills_window || width == 0 || height == 0 {
            return Vec::new();
        }
        vec![InputEvent::Resize {
            width: width as f64,
            height: height as f64,
        }]
    }

    fn local(&self, position: PhysicalPosition<f64>) -> Point {
        Point::new(
            position.x - self.container_origin.x,
            position.y - self.container_origin.y,
        )
    }

    fn register_click(&mut self, position: Point, now: Instant, out: &mut Vec<InputEvent>) {
        out.push(InputEvent::Click {
            offset: ClickOffset::new(position),
        });

        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = position.distance(last_pos);
            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                out.push(InputEvent::DoubleClick);
                // Reset to prevent triple-click being detected as another double-click
                self.last_click_time = None;
                self.last_click_position = None;
                return;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(x: f64, y: f64) -> PhysicalPosition<f64> {
        PhysicalPosition::new(x, y)
    }

    fn click_offset(x: f64, y: f64) -> InputEvent {
        InputEvent::Click {
            offset: ClickOffset::new(Point::new(x, y)),
        }
    }

    #[test]
    fn test_positions_are_container_relative() {
        let mut input = WinitInput::new();
        input.set_container_origin(Point::new(100.0, 50.0));

        assert_eq!(
            input.cursor_moved(at(130.0, 70.0)),
            vec![InputEvent::PointerMove {
                position: Point::new(30.0, 20.0)
            }]
        );
        assert_eq!(input.cursor(), Point::new(30.0, 20.0));
    }

    #[test]
    fn test_press_release_synthesizes_click() {
        let t0 = Instant::now();
        let mut input = WinitInput::new();
        input.cursor_moved(at(10.0, 10.0));

        assert_eq!(
            input.mouse_input(ElementState::Pressed, MouseButton::Left, t0),
            vec![InputEvent::PointerDown {
                position: Point::new(10.0, 10.0)
            }]
        );
        assert_eq!(
            input.mouse_input(ElementState::Released, MouseButton::Left, t0),
            vec![InputEvent::PointerUp, click_offset(10.0, 10.0)]
        );
    }

    #[test]
    fn test_double_click_detection() {
        let t0 = Instant::now();
        let mut input = WinitInput::new();
        input.cursor_moved(at(10.0, 10.0));

        input.mouse_input(ElementState::Pressed, MouseButton::Left, t0);
        input.mouse_input(ElementState::Released, MouseButton::Left, t0);

        let t1 = t0 + Duration::from_millis(100);
        input.mouse_input(ElementState::Pressed, MouseButton::Left, t1);
        assert_eq!(
            input.mouse_input(ElementState::Released, MouseButton::Left, t1),
            vec![InputEvent::PointerUp, click_offset(10.0, 10.0), InputEvent::DoubleClick]
        );

        // A third click starts a new pair.
        let t2 = t1 + Duration::from_millis(100);
        input.mouse_input(ElementState::Pressed, MouseButton::Left, t2);
        assert_eq!(
            input.mouse_input(ElementState::Released, MouseButton::Left, t2),
            vec![InputEvent::PointerUp, click_offset(10.0, 10.0)]
        );
    }

    #[test]
    fn test_double_click_too_far_or_late() {
        let t0 = Instant::now();
        let mut input = WinitInput::new();

        input.touch(TouchPhase::Ended, 1, at(10.0, 10.0), t0);
        let out = input.touch(TouchPhase::Ended, 1, at(40.0, 10.0), t0);
        assert!(!out.contains(&InputEvent::DoubleClick));

        let late = t0 + Duration::from_millis(600);
        let out = input.touch(TouchPhase::Ended, 1, at(40.0, 10.0), late);
        assert!(!out.contains(&InputEvent::DoubleClick));
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut input = WinitInput::new();
        let t0 = Instant::now();
        assert!(input.mouse_input(ElementState::Pressed, MouseButton::Right, t0).is_empty());
        // Release without a left press still ends any gesture but is not a click.
        assert_eq!(
            input.mouse_input(ElementState::Released, MouseButton::Left, t0),
            vec![InputEvent::PointerUp]
        );
    }

    #[test]
    fn test_touch_phases() {
        let mut input = WinitInput::new();
        let t0 = Instant::now();
        assert_eq!(
            input.touch(TouchPhase::Started, 4, at(1.0, 2.0), t0),
            vec![InputEvent::TouchStart {
                id: 4,
                position: Point::new(1.0, 2.0)
            }]
        );
        assert_eq!(
            input.touch(TouchPhase::Moved, 4, at(3.0, 2.0), t0),
            vec![InputEvent::TouchMove {
                id: 4,
                position: Point::new(3.0, 2.0)
            }]
        );
        assert_eq!(
            input.touch(TouchPhase::Cancelled, 4, at(3.0, 2.0), t0),
            vec![InputEvent::TouchCancel { id: 4 }]
        );
    }

    #[test]
    fn test_keys() {
        let mut input = WinitInput::new();
        assert_eq!(
            input.key(&Key::Named(NamedKey::Enter), ElementState::Pressed, false),
            vec![InputEvent::Key(KeyTrigger::Complete)]
        );
        assert_eq!(
            input.key(&Key::Named(NamedKey::Escape), ElementState::Pressed, false),
            vec![InputEvent::Key(KeyTrigger::Cancel)]
        );
        assert_eq!(
            input.key(&Key::Named(NamedKey::Delete), ElementState::Pressed, false),
            vec![InputEvent::Key(KeyTrigger::DeleteSelected)]
        );
        assert!(input.key(&Key::Named(NamedKey::Enter), ElementState::Released, false).is_empty());
        assert!(input.key(&Key::Named(NamedKey::Enter), ElementState::Pressed, true).is_empty());
    }

    #[test]
    fn test_resize_skips_zero() {
        let mut input = WinitInput::new();
        assert!(input.resized(0, 100).is_empty());
        assert_eq!(
            input.resized(640, 480),
            vec![InputEvent::Resize {
                width: 640.0,
                height: 480.0
            }]
        );

        let mut fixed = WinitInput::new().with_container_fills_window(false);
        assert!(fixed.resized(640, 480).is_empty());
    }

    #[test]
    fn test_translate_window_event() {
        let mut input = WinitInput::new();
        let t0 = Instant::now();
        let event = WindowEvent::CursorMoved {
            device_id: winit::event::DeviceId::dummy(),
            position: at(5.0, 6.0),
        };
        assert_eq!(
            input.translate(&event, t0),
            vec![InputEvent::PointerMove {
                position: Point::new(5.0, 6.0)
            }]
        );
        assert!(input.translate(&WindowEvent::Focused(true), t0).is_empty());
    }
}
