#![forbid(unsafe_code)]

//! Stacked toast notifications.
//!
//! A [`ToastStack`] owns the toast records, lays them out as a collapsed or
//! expanded stack, removes them when their timers fire or when they are
//! swiped away, and projects every change onto a host [`RenderSurface`].
//! The host supplies time (`advance`), layout passes (`frame`), and input
//! events; nothing here touches a real clock or a real document.
//!
//! ```
//! use core::time::Duration;
//! use toastline::{MemorySurface, StackConfig, ToastOptions, ToastStack};
//!
//! let surface = MemorySurface::new();
//! let stack = ToastStack::with_config(surface.clone(), StackConfig::default());
//!
//! let saved = stack.success("Saved", ToastOptions::new().description("2 files"));
//! stack.frame();
//! assert!(stack.snapshot(saved.id()).unwrap().state.mounted);
//!
//! stack.pointer_enter();
//! stack.advance(Duration::from_secs(60));
//! assert!(saved.is_alive());
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod gesture;
pub mod global;
pub mod icon;
pub mod model;
pub mod promise;
pub mod record;
pub mod render;
pub mod stack;
pub mod timers;

pub use config::{
    GAP, HorizontalAlign, Hotkey, Position, REMOVE_GRACE, StackConfig, ToastOptions,
    VISIBLE_TOASTS_AMOUNT, VerticalEdge,
};
pub use controller::ToastController;
pub use error::ToastError;
pub use gesture::{GesturePhase, GestureTracker, SwipeConfig, SwipeUpdate};
pub use icon::{Icon, IconKind};
pub use model::{LayoutParams, StackModel};
pub use promise::{PromiseMessage, PromiseOptions, PromiseToast};
pub use record::{
    DEFAULT_DURATION, Title, ToastDuration, ToastLayout, ToastRecord, ToastState, ToastType,
};
pub use render::{MemorySurface, NodeAttributes, RenderSurface, StackAttributes};
pub use stack::{RemovalReason, ToastLifecycleEvent, ToastStack};
pub use timers::{TimerKind, TimerRegistry, TimerTask};

pub use toastline_core::{
    KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerEvent, PointerTarget, PointerType, ToastId,
};
