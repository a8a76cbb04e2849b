//! Pointer and keyboard input types fed to the editor.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Identifies one pointer in a multi-pointer session.
///
/// The mouse is a single pointer; each touch contact carries the stable id
/// assigned by the windowing layer for the lifetime of that contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Space held down (temporary pan).
    pub space: bool,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        pointer: PointerId,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        pointer: PointerId,
        position: Point,
        modifiers: Modifiers,
    },
    Up {
        pointer: PointerId,
        position: Point,
        modifiers: Modifiers,
    },
    /// Pointer left the surface or the contact was cancelled by the system.
    Cancel { pointer: PointerId },
}

impl PointerEvent {
    pub fn pointer(&self) -> PointerId {
        match *self {
            PointerEvent::Down { pointer, .. }
            | PointerEvent::Move { pointer, .. }
            | PointerEvent::Up { pointer, .. }
            | PointerEvent::Cancel { pointer } => pointer,
        }
    }

    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => Some(position),
            PointerEvent::Cancel { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_accessor() {
        let ev = PointerEvent::Move {
            pointer: PointerId::Touch(7),
            position: Point::new(1.0, 2.0),
            modifiers: Modifiers::default(),
        };
        assert_eq!(ev.pointer(), PointerId::Touch(7));
        assert_eq!(ev.position(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_cancel_has_no_position() {
        let ev = PointerEvent::Cancel {
            pointer: PointerId::Mouse,
        };
        assert_eq!(ev.position(), None);
    }
}
