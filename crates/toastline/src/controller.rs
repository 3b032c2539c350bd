#![forbid(unsafe_code)]

//! Handle for mutating a live toast after `show`.

use std::cell::RefCell;
use std::rc::Weak;

use toastline_core::ToastId;

use crate::record::{Title, ToastDuration, ToastType};
use crate::stack::StackState;

/// Returned by `show` and the typed helpers.
///
/// Every method is a silent no-op once the toast has been removed or the
/// stack dropped.
#[derive(Debug, Clone)]
pub struct ToastController {
    id: ToastId,
    stack: Weak<RefCell<StackState>>,
}

impl ToastController {
    pub(crate) fn new(id: ToastId, stack: Weak<RefCell<StackState>>) -> Self {
        Self { id, stack }
    }

    /// Id of the controlled toast.
    #[must_use]
    pub fn id(&self) -> &ToastId {
        &self.id
    }

    /// Whether the toast is still live (present and not removed).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        let Some(stack) = self.stack.upgrade() else {
            return false;
        };
        stack.try_borrow().is_ok_and(|s| s.is_alive(&self.id))
    }

    fn with_stack(&self, f: impl FnOnce(&mut StackState)) {
        let Some(stack) = self.stack.upgrade() else {
            return;
        };
        match stack.try_borrow_mut() {
            Ok(mut state) => f(&mut *state),
            Err(_) => tracing::warn!(toast = %self.id, "toast stack busy; update dropped"),
        }
    }

    /// Replace the title. `raw` passes trusted markup through unescaped.
    pub fn set_title(&self, text: impl Into<String>, raw: bool) -> &Self {
        let title = Title::new(text, raw);
        self.with_stack(|s| s.set_title(&self.id, title));
        self
    }

    /// Replace the icon with the default asset for `toast_type`.
    pub fn set_icon(&self, toast_type: ToastType) -> &Self {
        self.with_stack(|s| s.set_icon(&self.id, toast_type));
        self
    }

    /// Change the semantic type, re-resolving the icon.
    pub fn set_type(&self, toast_type: ToastType) -> &Self {
        self.with_stack(|s| s.set_type(&self.id, toast_type));
        self
    }

    /// Store a new lifetime and restart the timer from it.
    ///
    /// The timer only restarts for a mounted toast in a collapsed stack;
    /// otherwise the new lifetime applies on the next arm. A persistent
    /// lifetime cancels the pending timer.
    pub fn set_duration(&self, duration: impl Into<ToastDuration>) -> &Self {
        let duration = duration.into();
        self.with_stack(|s| s.set_duration(&self.id, duration));
        self
    }

    /// Request removal.
    pub fn dismiss(&self) -> &Self {
        self.with_stack(|s| s.dismiss(&self.id));
        self
    }
}
