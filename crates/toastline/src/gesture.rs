#![forbid(unsafe_code)]

//! Swipe-to-dismiss gesture tracking.
//!
//! Every mounted toast has one entry. An entry is a small state machine:
//!
//! ```text
//! Idle --start--> Dragging --end (far or fast)--> DismissRequested
//!                    |
//!                    +--end (short and slow) / cancel--> Idle
//! ```
//!
//! # Productive axis
//!
//! Only vertical movement away from the anchored edge counts: a top stack
//! keeps negative `dy` (swipe up), a bottom stack keeps positive `dy` (swipe
//! down). The clamped delta must exceed a start threshold (2px for mouse and
//! pen, 10px for touch) before it moves the toast. If horizontal movement
//! exceeds the same threshold while the productive delta does not, the
//! interaction is locked out: it stays `Dragging`, but further moves are
//! ignored.
//!
//! # Decision rule
//!
//! On release, `velocity = |offset| / elapsed_ms`. The toast is dismissed
//! when `|offset| >= dismiss_distance` or `velocity > dismiss_velocity`
//! (20 px and 0.11 px/ms unless `StackConfig::swipe` overrides them).
//!
//! # Invariants
//!
//! 1. The tracker holds no record data beyond interaction-scoped start
//!    position, start time, and current offset.
//! 2. Entries exist only between mount and eviction.

use core::time::Duration;
use std::collections::HashMap;

use toastline_core::{PointerEvent, PointerType, ToastId};

use crate::config::VerticalEdge;

/// Tuning constants for swipe decisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Offset in pixels that dismisses regardless of speed (default: 20).
    pub dismiss_distance: f64,
    /// Velocity in px/ms above which any offset dismisses (default: 0.11).
    pub dismiss_velocity: f64,
    /// Start threshold for mouse and pen in pixels (default: 2).
    pub pointer_threshold: f64,
    /// Start threshold for touch in pixels (default: 10).
    pub touch_threshold: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            dismiss_distance: 20.0,
            dismiss_velocity: 0.11,
            pointer_threshold: 2.0,
            touch_threshold: 10.0,
        }
    }
}

impl SwipeConfig {
    fn start_threshold(&self, pointer_type: PointerType) -> f64 {
        match pointer_type {
            PointerType::Touch => self.touch_threshold,
            PointerType::Mouse | PointerType::Pen => self.pointer_threshold,
        }
    }
}

/// State of an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    start: (f64, f64),
    start_time: Duration,
    offset: f64,
    locked_out: bool,
}

impl DragSession {
    /// Current productive-axis offset.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether cross-axis movement has disabled further updates.
    #[must_use]
    pub const fn locked_out(&self) -> bool {
        self.locked_out
    }
}

/// Phase of a toast's gesture entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    /// No interaction in progress.
    #[default]
    Idle,
    /// Pointer is down.
    Dragging(DragSession),
    /// The last drag dismissed the toast.
    DismissRequested,
}

/// Outcome of feeding a pointer event to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeUpdate {
    /// Nothing changed.
    Ignored,
    /// A drag started; the toast is now swiping.
    Started,
    /// The visual offset changed.
    Offset(f64),
    /// Cross-axis movement locked this interaction out.
    LockedOut,
    /// Release dismissed the toast.
    Dismiss {
        /// Productive-axis offset at release.
        displacement: f64,
        /// Release velocity in px/ms.
        velocity: f64,
    },
    /// Release (or cancel) snapped the toast back.
    Reset,
}

/// Per-toast swipe state machines.
#[derive(Debug, Default)]
pub struct GestureTracker {
    config: SwipeConfig,
    entries: HashMap<ToastId, GesturePhase>,
}

impl GestureTracker {
    /// Create a tracker with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with custom thresholds.
    #[must_use]
    pub fn with_config(config: SwipeConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    /// Start tracking `id`. Re-registering keeps an existing entry.
    pub fn register(&mut self, id: &ToastId) {
        self.entries.entry(id.clone()).or_default();
    }

    /// Stop tracking `id`.
    pub fn unregister(&mut self, id: &ToastId) {
        self.entries.remove(id);
    }

    /// Whether `id` is tracked.
    #[must_use]
    pub fn is_registered(&self, id: &ToastId) -> bool {
        self.entries.contains_key(id)
    }

    /// Current phase of `id`.
    #[must_use]
    pub fn phase(&self, id: &ToastId) -> Option<GesturePhase> {
        self.entries.get(id).copied()
    }

    /// Number of tracked toasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pointer went down on a toast.
    pub fn start(&mut self, id: &ToastId, event: &PointerEvent, now: Duration) -> SwipeUpdate {
        if event.target.is_interactive() {
            return SwipeUpdate::Ignored;
        }
        let Some(phase) = self.entries.get_mut(id) else {
            return SwipeUpdate::Ignored;
        };
        if matches!(phase, GesturePhase::DismissRequested) {
            return SwipeUpdate::Ignored;
        }
        *phase = GesturePhase::Dragging(DragSession {
            start: event.position(),
            start_time: now,
            offset: 0.0,
            locked_out: false,
        });
        SwipeUpdate::Started
    }

    /// Pointer moved while down.
    pub fn update(
        &mut self,
        id: &ToastId,
        event: &PointerEvent,
        edge: VerticalEdge,
    ) -> SwipeUpdate {
        let threshold = self.config.start_threshold(event.pointer_type);
        let Some(GesturePhase::Dragging(session)) = self.entries.get_mut(id) else {
            return SwipeUpdate::Ignored;
        };
        if session.locked_out {
            return SwipeUpdate::Ignored;
        }

        let dx = event.x - session.start.0;
        let dy = event.y - session.start.1;
        let clamped = match edge {
            VerticalEdge::Top => dy.min(0.0),
            VerticalEdge::Bottom => dy.max(0.0),
        };

        if clamped.abs() > threshold {
            session.offset = clamped;
            SwipeUpdate::Offset(clamped)
        } else if dx.abs() > threshold {
            session.locked_out = true;
            SwipeUpdate::LockedOut
        } else {
            SwipeUpdate::Ignored
        }
    }

    /// Pointer released.
    pub fn end(&mut self, id: &ToastId, now: Duration) -> SwipeUpdate {
        let Some(phase) = self.entries.get_mut(id) else {
            return SwipeUpdate::Ignored;
        };
        let GesturePhase::Dragging(session) = *phase else {
            return SwipeUpdate::Ignored;
        };

        let displacement = session.offset;
        let elapsed_ms = now.saturating_sub(session.start_time).as_secs_f64() * 1000.0;
        let velocity = release_velocity(displacement, elapsed_ms);

        if displacement.abs() >= self.config.dismiss_distance
            || velocity > self.config.dismiss_velocity
        {
            *phase = GesturePhase::DismissRequested;
            SwipeUpdate::Dismiss {
                displacement,
                velocity,
            }
        } else {
            *phase = GesturePhase::Idle;
            SwipeUpdate::Reset
        }
    }

    /// Pointer interaction aborted by the host.
    pub fn cancel(&mut self, id: &ToastId) -> SwipeUpdate {
        let Some(phase) = self.entries.get_mut(id) else {
            return SwipeUpdate::Ignored;
        };
        if matches!(phase, GesturePhase::Dragging(_)) {
            *phase = GesturePhase::Idle;
            SwipeUpdate::Reset
        } else {
            SwipeUpdate::Ignored
        }
    }
}

/// `|displacement| / elapsed`, treating an instant release as infinitely fast
/// when anything moved.
fn release_velocity(displacement: f64, elapsed_ms: f64) -> f64 {
    if displacement == 0.0 {
        0.0
    } else if elapsed_ms <= 0.0 {
        f64::INFINITY
    } else {
        displacement.abs() / elapsed_ms
    }
}
