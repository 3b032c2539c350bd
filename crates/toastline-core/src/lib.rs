#![forbid(unsafe_code)]

//! Core: host-driven time, one-shot timers, identifiers, and input events.
//!
//! Beyond the id type, nothing here knows about toasts. It provides the
//! deterministic building blocks the `toastline` engine schedules and reacts
//! with.

pub mod clock;
pub mod event;
pub mod id;
pub mod timer_queue;

pub use clock::DeterministicClock;
pub use event::{
    KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerEvent, PointerTarget, PointerType,
};
pub use id::{ToastId, generate};
pub use timer_queue::{TimerHandle, TimerQueue};
