#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! The host maps its native keyboard and pointer events onto these types
//! before handing them to the stack.
//!
//! # Design Notes
//!
//! - Pointer coordinates are CSS-style pixels relative to the viewport
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish
//! - `Modifiers` use bitflags for easy combination

use bitflags::bitflags;

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if this is a specific character key, ignoring ASCII case.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&c))
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }
}

/// Key codes the stack cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Escape key.
    Escape,

    /// Anything else.
    Other,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Kind of device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    /// Mouse.
    #[default]
    Mouse,
    /// Stylus.
    Pen,
    /// Finger on a touch screen.
    Touch,
}

/// Which part of a toast the pointer interaction started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerTarget {
    /// The toast body (draggable).
    #[default]
    Body,
    /// The close affordance.
    CloseButton,
    /// Any other interactive control embedded in the toast.
    Control,
}

impl PointerTarget {
    /// Interactive sub-elements never start a swipe.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        !matches!(self, Self::Body)
    }
}

/// A pointer (mouse, pen, or touch) event on a toast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Horizontal position in pixels.
    pub x: f64,

    /// Vertical position in pixels.
    pub y: f64,

    /// Device kind.
    pub pointer_type: PointerType,

    /// Sub-element the event originated on.
    pub target: PointerTarget,
}

impl PointerEvent {
    /// Create a mouse event on the toast body.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pointer_type: PointerType::Mouse,
            target: PointerTarget::Body,
        }
    }

    /// Set the device kind.
    #[must_use]
    pub const fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Set the originating sub-element.
    #[must_use]
    pub const fn with_target(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }

    /// Get the position as a tuple.
    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}
