#![forbid(unsafe_code)]

//! Process-wide default stack (thread-local) and convenience functions.
//!
//! Hosts install their stack once with [`install`]; until then the default
//! renders into a [`MemorySurface`]. The free functions forward to
//! [`global`].

use std::cell::RefCell;

use core::future::Future;
use toastline_core::ToastId;

use crate::config::{StackConfig, ToastOptions};
use crate::controller::ToastController;
use crate::promise::{PromiseOptions, PromiseToast};
use crate::record::Title;
use crate::render::MemorySurface;
use crate::stack::ToastStack;

thread_local! {
    static GLOBAL_STACK: RefCell<Option<ToastStack>> = const { RefCell::new(None) };
}

/// Access the default stack, creating it on first use.
#[must_use]
pub fn global() -> ToastStack {
    GLOBAL_STACK.with(|slot| {
        slot.borrow_mut()
            .get_or_insert_with(|| ToastStack::new(MemorySurface::new()))
            .clone()
    })
}

/// Replace the default stack, returning the previous one.
pub fn install(stack: ToastStack) -> Option<ToastStack> {
    GLOBAL_STACK.with(|slot| slot.borrow_mut().replace(stack))
}

/// Convenience: initialize the default stack.
pub fn init(config: StackConfig) {
    global().init(config);
}

/// Convenience: show a toast on the default stack.
pub fn show(message: impl Into<Title>, options: ToastOptions) -> ToastController {
    global().show(message, options)
}

/// Convenience: show a success toast on the default stack.
pub fn success(message: impl Into<Title>, options: ToastOptions) -> ToastController {
    global().success(message, options)
}

/// Convenience: show an error toast on the default stack.
pub fn error(message: impl Into<Title>, options: ToastOptions) -> ToastController {
    global().error(message, options)
}

/// Convenience: show an info toast on the default stack.
pub fn info(message: impl Into<Title>, options: ToastOptions) -> ToastController {
    global().info(message, options)
}

/// Convenience: show a warning toast on the default stack.
pub fn warning(message: impl Into<Title>, options: ToastOptions) -> ToastController {
    global().warning(message, options)
}

/// Convenience: show a loading toast on the default stack.
pub fn loading(message: impl Into<Title>, options: ToastOptions) -> ToastController {
    global().loading(message, options)
}

/// Convenience: show a promise toast on the default stack.
pub fn promise<F, T, E>(future: F, options: PromiseOptions<T, E>) -> PromiseToast<T, E>
where
    F: Future<Output = Result<T, E>> + 'static,
    T: 'static,
    E: 'static,
{
    global().promise(future, options)
}

/// Convenience: remove a toast from the default stack.
pub fn remove(id: &ToastId) {
    global().remove(id);
}

/// Convenience: remove every toast from the default stack.
pub fn remove_all() {
    global().remove_all();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_is_shared_per_thread() {
        let a = global();
        let toast = show("hello", ToastOptions::default());
        assert!(a.snapshot(toast.id()).is_some());
        remove_all();
        assert!(!toast.is_alive());
    }

    #[test]
    fn install_replaces_default() {
        let surface = MemorySurface::new();
        let stack = ToastStack::new(surface.clone());
        let _previous = install(stack.clone());

        let toast = success("done", ToastOptions::default());
        assert!(stack.snapshot(toast.id()).is_some());
        assert_eq!(surface.len(), 1);
    }
}
