use bitflags::bitflags;

use crate::Vec2;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const META  = 1 << 3; // Cmd on Mac, Win key on Windows
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    Press(PointerButton),
    Release(PointerButton),
    Move,
    Drag(PointerButton),
    /// Wheel delta in notches; positive y scrolls content up.
    Scroll(Vec2),
    KeyDown(Key),
    KeyUp(Key),
    Enter,
    Leave,
    Cancel,
}

/// One discrete input event. `pos` is the pointer position in the receiving
/// node's parent space; containers rebase it before forwarding.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    pub pos: Vec2,
    pub modifiers: Modifiers,
}

impl InputEvent {
    pub fn new(kind: EventKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, m: Modifiers) -> Self {
        self.modifiers = m;
        self
    }

    pub fn press(pos: Vec2) -> Self {
        Self::new(EventKind::Press(PointerButton::Primary), pos)
    }

    pub fn release(pos: Vec2) -> Self {
        Self::new(EventKind::Release(PointerButton::Primary), pos)
    }

    pub fn drag(pos: Vec2) -> Self {
        Self::new(EventKind::Drag(PointerButton::Primary), pos)
    }

    pub fn moved(pos: Vec2) -> Self {
        Self::new(EventKind::Move, pos)
    }

    /// Same event, pointer position shifted by `-origin`.
    pub fn rebased(&self, origin: Vec2) -> Self {
        Self {
            kind: self.kind.clone(),
            pos: self.pos - origin,
            modifiers: self.modifiers,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self.kind, EventKind::KeyDown(_) | EventKind::KeyUp(_))
    }
}

/// Outcome of delivering an event to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    Used,
    Ignored,
}

impl Response {
    pub fn is_used(self) -> bool {
        matches!(self, Response::Used)
    }
}
