#![forbid(unsafe_code)]

//! The toast stack: creation, expansion, swipe handling, and removal.
//!
//! [`ToastStack`] is an explicit context object. It is a cheap-clone handle
//! over shared single-threaded state; clones and the [`ToastController`]s it
//! hands out all address the same stack. A process-wide default instance
//! lives in [`crate::global`].
//!
//! # Host loop
//!
//! The host drives time and input:
//!
//! 1. Forward hover, key, and pointer events.
//! 2. Call [`ToastStack::frame`] after each layout pass, or
//!    [`ToastStack::advance`] with the elapsed time (which runs a frame
//!    first).
//!
//! # Ordering
//!
//! - `show` mounts immediately but measures, arms the timer, and registers
//!   the gesture entry on the next frame. No timer exists for a toast before
//!   that step.
//! - Every mutation flips flags first, then recomputes the layout, then
//!   pushes the projection to the surface.
//! - `remove` marks the toast removed synchronously and evicts it 200ms
//!   later; eviction tears down the timer and gesture entries.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use toastline::{MemorySurface, ToastOptions, ToastStack};
//!
//! let surface = MemorySurface::new();
//! let stack = ToastStack::new(surface.clone());
//! let toast = stack.show("Saved", ToastOptions::default());
//!
//! stack.advance(Duration::from_millis(4000));
//! assert!(stack.snapshot(toast.id()).unwrap().state.removed);
//!
//! stack.advance(Duration::from_millis(200));
//! assert!(stack.snapshot(toast.id()).is_none());
//! assert!(surface.is_empty());
//! ```

use core::fmt;
use core::future::Future;
use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use toastline_core::{DeterministicClock, KeyCode, KeyEvent, KeyEventKind, PointerEvent, ToastId};

use crate::config::{StackConfig, ToastOptions};
use crate::controller::ToastController;
use crate::error::ToastError;
use crate::gesture::{GestureTracker, SwipeUpdate};
use crate::icon;
use crate::model::{LayoutParams, StackModel};
use crate::promise::{PromiseOptions, PromiseToast};
use crate::record::{Title, ToastDuration, ToastRecord, ToastType};
use crate::render::{NodeAttributes, RenderSurface, StackAttributes};
use crate::timers::{TimerKind, TimerRegistry, TimerTask};

/// Why a toast was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Its lifetime elapsed.
    Timeout,
    /// It was swiped away.
    Swipe,
    /// `remove`, `dismiss`, or the close affordance.
    Dismissed,
}

/// Lifecycle notifications, drained with [`ToastStack::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastLifecycleEvent {
    /// Created and attached.
    Shown(ToastId),
    /// Measured; timer and gesture tracking active.
    Mounted(ToastId),
    /// Removal requested; grace period started.
    Removed {
        /// Toast id.
        id: ToastId,
        /// Trigger.
        reason: RemovalReason,
    },
    /// Permanently detached.
    Evicted(ToastId),
}

pub(crate) struct StackState {
    config: StackConfig,
    initialized: bool,
    expanded: bool,
    clock: DeterministicClock,
    model: StackModel,
    timers: TimerRegistry,
    gestures: GestureTracker,
    surface: Box<dyn RenderSurface>,
    pending_frame: Vec<ToastId>,
    events: Vec<ToastLifecycleEvent>,
}

impl StackState {
    fn new(surface: Box<dyn RenderSurface>) -> Self {
        Self {
            config: StackConfig::default(),
            initialized: false,
            expanded: false,
            clock: DeterministicClock::new(),
            model: StackModel::new(),
            timers: TimerRegistry::new(),
            gestures: GestureTracker::new(),
            surface,
            pending_frame: Vec::new(),
            events: Vec::new(),
        }
    }

    fn now(&self) -> Duration {
        self.clock.now()
    }

    // --- Initialization ---

    fn init(&mut self, config: StackConfig) {
        if self.initialized {
            self.reattach();
            return;
        }
        self.expanded = config.expand;
        self.model.set_params(LayoutParams {
            visible_toasts: config.visible_toasts,
            gap: config.gap,
        });
        self.gestures = GestureTracker::with_config(config.swipe);
        self.config = config;
        self.initialized = true;

        let attrs = self.stack_attributes();
        if self.surface.has_stack() {
            self.surface.update_stack(&attrs);
        } else {
            self.surface.create_stack(&attrs);
        }
        tracing::debug!(position = %self.config.position, "toast stack initialized");
    }

    /// Restore gesture entries and missing timers for mounted toasts.
    fn reattach(&mut self) {
        let now = self.now();
        let mut rearmed = 0usize;
        for record in self.model.active().filter(|r| r.state.mounted) {
            self.gestures.register(&record.id);
            if !record.state.expanded
                && self.timers.pending(&record.id).is_none()
                && self.timers.arm(&record.id, record.duration, now).is_some()
            {
                rearmed += 1;
            }
        }
        tracing::debug!(rearmed, "toast stack already initialized; re-attached");
    }

    fn ensure_init(&mut self) {
        if !self.initialized {
            self.init(StackConfig::default());
        }
    }

    // --- Creation ---

    fn show(&mut self, title: Title, options: ToastOptions, preset: ToastType) -> ToastId {
        self.ensure_init();

        let toast_type = options.toast_type.unwrap_or(preset);
        let id = toastline_core::generate();
        let mut record = ToastRecord::new(id.clone(), title)
            .with_type(toast_type)
            .with_description(options.description)
            .with_duration(options.duration.unwrap_or(self.config.default_duration))
            .with_dismissible(options.dismissible.unwrap_or(true));
        if let Some(icon) = options.icon {
            record = record.with_icon(Some(icon));
        }
        record.state.expanded = self.expanded;

        self.model.insert(record);
        if let Some(record) = self.model.get(&id) {
            self.surface.mount(&NodeAttributes::project(record, &self.config));
        }
        self.pending_frame.push(id.clone());
        self.sync();

        tracing::debug!(toast = %id, kind = ?toast_type, "toast shown");
        self.events.push(ToastLifecycleEvent::Shown(id.clone()));
        id
    }

    /// Run deferred mount steps queued by `show`.
    fn run_frame(&mut self) {
        for id in std::mem::take(&mut self.pending_frame) {
            if let Err(err) = self.complete_mount(&id) {
                tracing::warn!(toast = %id, error = %err, "deferred mount failed");
            }
        }
    }

    /// Height capture, then timer, then gesture registration.
    fn complete_mount(&mut self, id: &ToastId) -> Result<(), ToastError> {
        let Some(record) = self.model.get(id) else {
            return Ok(());
        };
        if !record.is_active() {
            return Ok(());
        }

        let height = self.surface.measure_height(id).unwrap_or_else(|| {
            tracing::warn!(toast = %id, "surface returned no height; stacking with zero height");
            0.0
        });
        let expanded = {
            let Some(record) = self.model.get_mut(id) else {
                return Ok(());
            };
            record.capture_height(height);
            record.state.mounted = true;
            record.state.expanded
        };
        self.model.recompute();

        if !expanded {
            self.arm_timer(id)?;
        }
        self.gestures.register(id);
        self.sync();

        tracing::trace!(toast = %id, height, "toast mounted");
        self.events.push(ToastLifecycleEvent::Mounted(id.clone()));
        Ok(())
    }

    /// Arm the removal timer for a live toast.
    fn arm_timer(&mut self, id: &ToastId) -> Result<(), ToastError> {
        let record = self
            .model
            .get(id)
            .filter(|r| r.is_active())
            .ok_or_else(|| ToastError::InvalidTarget(id.clone()))?;
        if !self.surface.contains(id) {
            return Err(ToastError::InvalidTarget(id.clone()));
        }
        let duration = record.duration;
        let now = self.now();
        self.timers.arm(id, duration, now);
        Ok(())
    }

    // --- Removal ---

    fn remove(&mut self, id: &ToastId, reason: RemovalReason) -> bool {
        let Some(record) = self.model.get_mut(id) else {
            return false;
        };
        if record.state.removed {
            return false;
        }
        record.state.removed = true;
        self.model.recompute();

        let now = self.now();
        self.timers.arm_eviction(id, now);
        self.sync();

        tracing::debug!(toast = %id, ?reason, "toast removed");
        self.events.push(ToastLifecycleEvent::Removed {
            id: id.clone(),
            reason,
        });
        true
    }

    fn evict(&mut self, id: &ToastId) {
        self.timers.cancel(id);
        self.gestures.unregister(id);
        self.pending_frame.retain(|pending| pending != id);
        if self.model.evict(id).is_none() {
            return;
        }
        self.surface.detach(id);
        self.sync();

        tracing::debug!(toast = %id, "toast evicted");
        self.events.push(ToastLifecycleEvent::Evicted(id.clone()));
    }

    // --- Expansion ---

    fn set_expanded(&mut self, expanded: bool) {
        if self.expanded == expanded {
            return;
        }
        self.expanded = expanded;
        for record in self.model.iter_mut().filter(|r| r.is_active()) {
            record.state.expanded = expanded;
        }
        self.model.recompute();

        let now = self.now();
        let mounted: Vec<(ToastId, ToastDuration)> = self
            .model
            .active()
            .filter(|r| r.state.mounted)
            .map(|r| (r.id.clone(), r.duration))
            .collect();
        for (id, duration) in mounted {
            if expanded {
                self.timers.cancel(&id);
            } else {
                self.timers.arm(&id, duration, now);
            }
        }
        self.sync();
        tracing::debug!(expanded, "toast stack expansion changed");
    }

    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if event.kind == KeyEventKind::Release {
            return false;
        }
        if self.config.hotkey.matches(event) {
            let Some(front) = self.model.front() else {
                return false;
            };
            let expand = !front.state.expanded;
            self.set_expanded(expand);
            return true;
        }
        if event.code == KeyCode::Escape && self.expanded {
            self.set_expanded(false);
            return true;
        }
        false
    }

    // --- Swipe ---

    fn swipeable(&self, id: &ToastId) -> bool {
        self.model
            .get(id)
            .is_some_and(|r| r.is_active() && r.state.mounted && r.dismissible)
    }

    fn pointer_down(&mut self, id: &ToastId, event: &PointerEvent) {
        if !self.swipeable(id) {
            return;
        }
        let now = self.now();
        if self.gestures.start(id, event, now) == SwipeUpdate::Started {
            if let Some(record) = self.model.get_mut(id) {
                record.state.swiping = true;
            }
            self.sync_node(id);
        }
    }

    fn pointer_move(&mut self, id: &ToastId, event: &PointerEvent) {
        let edge = self.config.position.vertical();
        if let SwipeUpdate::Offset(offset) = self.gestures.update(id, event, edge) {
            if let Some(record) = self.model.get_mut(id) {
                record.swipe_amount = offset;
            }
            self.sync_node(id);
        }
    }

    fn pointer_up(&mut self, id: &ToastId) {
        let now = self.now();
        match self.gestures.end(id, now) {
            SwipeUpdate::Dismiss {
                displacement,
                velocity,
            } => {
                if let Some(record) = self.model.get_mut(id) {
                    record.state.swiping = false;
                    record.state.swiped_out = true;
                }
                tracing::trace!(toast = %id, displacement, velocity, "swipe dismissed toast");
                self.remove(id, RemovalReason::Swipe);
            }
            SwipeUpdate::Reset => self.reset_swipe(id),
            _ => {}
        }
    }

    fn pointer_cancel(&mut self, id: &ToastId) {
        if self.gestures.cancel(id) == SwipeUpdate::Reset {
            self.reset_swipe(id);
        }
    }

    fn reset_swipe(&mut self, id: &ToastId) {
        if let Some(record) = self.model.get_mut(id) {
            record.swipe_amount = 0.0;
            record.state.swiping = false;
        }
        self.sync_node(id);
    }

    // --- Controller mutations ---

    pub(crate) fn set_title(&mut self, id: &ToastId, title: Title) {
        if let Some(record) = self.model.get_mut(id).filter(|r| r.is_active()) {
            record.title = title;
            self.sync_node(id);
        }
    }

    pub(crate) fn set_icon(&mut self, id: &ToastId, toast_type: ToastType) {
        if let Some(record) = self.model.get_mut(id).filter(|r| r.is_active()) {
            record.icon = icon::resolve(toast_type);
            self.sync_node(id);
        }
    }

    pub(crate) fn set_type(&mut self, id: &ToastId, toast_type: ToastType) {
        if let Some(record) = self.model.get_mut(id).filter(|r| r.is_active()) {
            record.toast_type = toast_type;
            record.icon = icon::resolve(toast_type);
            self.sync_node(id);
        }
    }

    pub(crate) fn set_duration(&mut self, id: &ToastId, duration: ToastDuration) {
        let Some(record) = self.model.get_mut(id).filter(|r| r.is_active()) else {
            return;
        };
        record.duration = duration;
        if !record.state.mounted || record.state.expanded {
            return;
        }
        match duration {
            ToastDuration::Persistent => {
                self.timers.cancel(id);
            }
            ToastDuration::After(_) => {
                if let Err(err) = self.arm_timer(id) {
                    tracing::debug!(toast = %id, error = %err, "skipped re-arm");
                }
            }
        }
    }

    pub(crate) fn dismiss(&mut self, id: &ToastId) {
        self.remove(id, RemovalReason::Dismissed);
    }

    pub(crate) fn is_alive(&self, id: &ToastId) -> bool {
        self.model.get(id).is_some_and(ToastRecord::is_active)
    }

    // --- Time ---

    fn advance_to(&mut self, target: Duration) {
        let target_ms = target.as_millis() as u64;
        let _span = tracing::trace_span!("toast_stack.advance", target_ms).entered();
        self.run_frame();
        while let Some((deadline, task)) = self.timers.pop_due(target) {
            self.clock.set(deadline);
            match task {
                TimerTask::AutoRemove(id) => {
                    self.remove(&id, RemovalReason::Timeout);
                }
                TimerTask::Evict(id) => self.evict(&id),
            }
        }
        self.clock.set(target);
    }

    // --- Projection ---

    fn stack_attributes(&self) -> StackAttributes {
        StackAttributes::project(&self.config, self.expanded, self.model.front_height())
    }

    fn sync_node(&mut self, id: &ToastId) {
        if let Some(record) = self.model.get(id) {
            self.surface
                .update(&NodeAttributes::project(record, &self.config));
        }
    }

    fn sync(&mut self) {
        for record in self.model.iter() {
            self.surface
                .update(&NodeAttributes::project(record, &self.config));
        }
        let attrs = self.stack_attributes();
        self.surface.update_stack(&attrs);
    }
}

/// Handle to a toast stack.
///
/// Single-threaded: the handle is `!Send`. Clone it freely; all clones share
/// state.
#[derive(Clone)]
pub struct ToastStack {
    state: Rc<RefCell<StackState>>,
}

impl fmt::Debug for ToastStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ToastStack")
            .field("initialized", &state.initialized)
            .field("expanded", &state.expanded)
            .field("records", &state.model.len())
            .field("now", &state.now())
            .finish_non_exhaustive()
    }
}

impl ToastStack {
    /// Create an uninitialized stack rendering into `surface`.
    ///
    /// The first `show` initializes it with defaults if [`ToastStack::init`]
    /// was not called.
    #[must_use]
    pub fn new(surface: impl RenderSurface + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(StackState::new(Box::new(surface)))),
        }
    }

    /// Create and initialize a stack.
    #[must_use]
    pub fn with_config(surface: impl RenderSurface + 'static, config: StackConfig) -> Self {
        let stack = Self::new(surface);
        stack.init(config);
        stack
    }

    /// Initialize the stack. Idempotent: later calls keep the original
    /// config and only re-attach timers and gesture tracking to existing
    /// toasts.
    pub fn init(&self, config: StackConfig) {
        self.state.borrow_mut().init(config);
    }

    /// Whether `init` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> StackConfig {
        self.state.borrow().config.clone()
    }

    fn controller(&self, id: ToastId) -> ToastController {
        ToastController::new(id, Rc::downgrade(&self.state))
    }

    fn show_typed(
        &self,
        title: Title,
        options: ToastOptions,
        preset: ToastType,
    ) -> ToastController {
        let id = self.state.borrow_mut().show(title, options, preset);
        self.controller(id)
    }

    /// Show a toast.
    pub fn show(&self, message: impl Into<Title>, options: ToastOptions) -> ToastController {
        self.show_typed(message.into(), options, ToastType::Unset)
    }

    /// Show a success toast.
    pub fn success(&self, message: impl Into<Title>, options: ToastOptions) -> ToastController {
        self.show_typed(message.into(), options, ToastType::Success)
    }

    /// Show an error toast.
    pub fn error(&self, message: impl Into<Title>, options: ToastOptions) -> ToastController {
        self.show_typed(message.into(), options, ToastType::Error)
    }

    /// Show an info toast.
    pub fn info(&self, message: impl Into<Title>, options: ToastOptions) -> ToastController {
        self.show_typed(message.into(), options, ToastType::Info)
    }

    /// Show a warning toast.
    pub fn warning(&self, message: impl Into<Title>, options: ToastOptions) -> ToastController {
        self.show_typed(message.into(), options, ToastType::Warning)
    }

    /// Show a loading toast.
    pub fn loading(&self, message: impl Into<Title>, options: ToastOptions) -> ToastController {
        self.show_typed(message.into(), options, ToastType::Loading)
    }

    /// Show a persistent loading toast that follows `future`.
    ///
    /// The returned [`PromiseToast`] must be polled (awaited) to drive
    /// `future`. On completion the toast switches to the success or error
    /// message and starts a normal lifetime; the future's result is returned
    /// unchanged, so errors still reach the caller.
    pub fn promise<F, T, E>(&self, future: F, options: PromiseOptions<T, E>) -> PromiseToast<T, E>
    where
        F: Future<Output = Result<T, E>> + 'static,
        T: 'static,
        E: 'static,
    {
        let mut show_options = ToastOptions::new().persistent();
        show_options.description = options.description.clone();
        let controller = self.show_typed(
            Title::Plain(options.loading.clone()),
            show_options,
            ToastType::Loading,
        );
        let settle_duration = options
            .duration
            .unwrap_or_else(|| self.state.borrow().config.default_duration);
        PromiseToast::new(controller, Box::pin(future), options, settle_duration)
    }

    /// Request removal of a toast. Missing or already removed ids are
    /// ignored.
    pub fn remove(&self, id: &ToastId) {
        self.state.borrow_mut().remove(id, RemovalReason::Dismissed);
    }

    /// Request removal of every live toast.
    pub fn remove_all(&self) {
        let mut state = self.state.borrow_mut();
        let ids: Vec<ToastId> = state.model.active().map(|r| r.id.clone()).collect();
        for id in ids {
            state.remove(&id, RemovalReason::Dismissed);
        }
    }

    /// Pointer entered the stack: expand and pause every timer.
    pub fn pointer_enter(&self) {
        self.state.borrow_mut().set_expanded(true);
    }

    /// Pointer left the stack: collapse and restart every timer.
    pub fn pointer_leave(&self) {
        self.state.borrow_mut().set_expanded(false);
    }

    /// Handle a key press. Returns `true` if the stack consumed it.
    pub fn handle_key(&self, event: &KeyEvent) -> bool {
        self.state.borrow_mut().handle_key(event)
    }

    /// Pointer pressed on a toast.
    pub fn pointer_down(&self, id: &ToastId, event: &PointerEvent) {
        self.state.borrow_mut().pointer_down(id, event);
    }

    /// Pointer moved while pressed on a toast.
    pub fn pointer_move(&self, id: &ToastId, event: &PointerEvent) {
        self.state.borrow_mut().pointer_move(id, event);
    }

    /// Pointer released on a toast.
    pub fn pointer_up(&self, id: &ToastId) {
        self.state.borrow_mut().pointer_up(id);
    }

    /// Pointer interaction aborted.
    pub fn pointer_cancel(&self, id: &ToastId) {
        self.state.borrow_mut().pointer_cancel(id);
    }

    /// Run deferred mount steps. Call after the host's layout pass.
    pub fn frame(&self) {
        self.state.borrow_mut().run_frame();
    }

    /// Advance time by `dt`, running a frame and then every due timer.
    pub fn advance(&self, dt: Duration) {
        let mut state = self.state.borrow_mut();
        let target = state.now().saturating_add(dt);
        state.advance_to(target);
    }

    /// Advance time to `now`, running a frame and then every due timer.
    pub fn advance_to(&self, now: Duration) {
        self.state.borrow_mut().advance_to(now);
    }

    /// Current stack time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now()
    }

    /// Earliest pending timer deadline, for hosts that sleep until it.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.borrow().timers.next_deadline()
    }

    /// Kind and deadline of the timer pending for `id`.
    #[must_use]
    pub fn pending_timer(&self, id: &ToastId) -> Option<(TimerKind, Duration)> {
        self.state.borrow().timers.pending(id)
    }

    /// Whether the stack is expanded.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.state.borrow().expanded
    }

    /// Copy of a record.
    #[must_use]
    pub fn snapshot(&self, id: &ToastId) -> Option<ToastRecord> {
        self.state.borrow().model.get(id).cloned()
    }

    /// Copies of all records in stack order, newest first.
    #[must_use]
    pub fn records(&self) -> Vec<ToastRecord> {
        self.state.borrow().model.iter().cloned().collect()
    }

    /// Records present, including those in their grace period.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().model.len()
    }

    /// Whether no record is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().model.is_empty()
    }

    /// Whether `id` has a gesture entry.
    #[must_use]
    pub fn is_tracking_gesture(&self, id: &ToastId) -> bool {
        self.state.borrow().gestures.is_registered(id)
    }

    /// Take the lifecycle events recorded since the last call.
    pub fn drain_events(&self) -> Vec<ToastLifecycleEvent> {
        std::mem::take(&mut self.state.borrow_mut().events)
    }

    /// Arm the removal timer for `id` from its full duration.
    ///
    /// Fails with [`ToastError::InvalidTarget`] when no live toast with that
    /// id is attached.
    pub fn arm_timer(&self, id: &ToastId) -> Result<(), ToastError> {
        self.state.borrow_mut().arm_timer(id)
    }
}
