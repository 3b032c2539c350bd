#![forbid(unsafe_code)]

//! Promise toasts driven by a hand-released future.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use toastline::{
    Icon, IconKind, MemorySurface, PromiseMessage, PromiseOptions, StackConfig, TimerKind, Title,
    ToastStack, ToastType,
};

/// Future that stays pending until the test releases a value.
struct Gate<T>(Rc<RefCell<Option<T>>>);

impl<T> Gate<T> {
    fn new() -> (Self, Rc<RefCell<Option<T>>>) {
        let slot = Rc::new(RefCell::new(None));
        (Self(Rc::clone(&slot)), slot)
    }
}

impl<T> Future for Gate<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<T> {
        match self.0.borrow_mut().take() {
            Some(value) => Poll::Ready(value),
            None => Poll::Pending,
        }
    }
}

fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
    let mut cx = Context::from_waker(Waker::noop());
    Pin::new(future).poll(&mut cx)
}

fn options() -> PromiseOptions<u32, String> {
    PromiseOptions::new(
        "Saving...",
        PromiseMessage::with(|n: &u32| format!("Saved {n} files")),
        PromiseMessage::with(|e: &String| format!("Failed: {e}")),
    )
}

fn setup() -> ToastStack {
    ToastStack::with_config(MemorySurface::new(), StackConfig::default())
}

#[test]
fn loading_toast_persists_while_pending() {
    let stack = setup();
    let (gate, _slot) = Gate::<Result<u32, String>>::new();
    let mut toast = stack.promise(gate, options());
    let id = toast.controller().id().clone();

    stack.frame();
    let record = stack.snapshot(&id).unwrap();
    assert_eq!(record.toast_type, ToastType::Loading);
    assert_eq!(record.icon, Some(Icon::Asset(IconKind::Loading)));
    assert_eq!(record.title, Title::Plain("Saving...".into()));
    assert_eq!(stack.pending_timer(&id), None);

    assert!(poll_once(&mut toast).is_pending());
    stack.advance(Duration::from_secs(120));
    assert!(toast.controller().is_alive());
    assert!(!toast.is_settled());
}

#[test]
fn success_switches_presentation_and_arms_timer() {
    let stack = setup();
    let (gate, slot) = Gate::new();
    let mut toast = stack.promise(gate, options());
    let id = toast.controller().id().clone();
    stack.advance(Duration::from_millis(700));

    *slot.borrow_mut() = Some(Ok(3));
    assert_eq!(poll_once(&mut toast), Poll::Ready(Ok(3)));
    assert!(toast.is_settled());

    let record = stack.snapshot(&id).unwrap();
    assert_eq!(record.toast_type, ToastType::Success);
    assert_eq!(record.icon, Some(Icon::Asset(IconKind::Success)));
    assert_eq!(record.title, Title::Plain("Saved 3 files".into()));
    assert_eq!(
        stack.pending_timer(&id),
        Some((TimerKind::AutoRemove, Duration::from_millis(4700)))
    );
}

#[test]
fn rejection_is_shown_and_propagated() {
    let stack = setup();
    let (gate, slot) = Gate::new();
    let mut toast = stack.promise(gate, options());
    let id = toast.controller().id().clone();
    stack.frame();

    *slot.borrow_mut() = Some(Err("disk full".to_string()));
    assert_eq!(poll_once(&mut toast), Poll::Ready(Err("disk full".to_string())));

    let record = stack.snapshot(&id).unwrap();
    assert_eq!(record.toast_type, ToastType::Error);
    assert_eq!(record.title, Title::Plain("Failed: disk full".into()));

    stack.advance(Duration::from_millis(4000));
    assert!(stack.snapshot(&id).unwrap().state.removed);
}

#[test]
fn fixed_messages_and_custom_duration() {
    let stack = setup();
    let (gate, slot) = Gate::<Result<(), ()>>::new();
    let mut toast = stack.promise(
        gate,
        PromiseOptions::new("Working", "Done", "Oops")
            .description("sync")
            .duration(Duration::from_millis(1500)),
    );
    let id = toast.controller().id().clone();
    stack.frame();
    assert_eq!(
        stack.snapshot(&id).unwrap().description.as_deref(),
        Some("sync")
    );

    *slot.borrow_mut() = Some(Ok(()));
    assert!(poll_once(&mut toast).is_ready());
    assert_eq!(stack.snapshot(&id).unwrap().title.text(), "Done");
    assert_eq!(
        stack.pending_timer(&id),
        Some((TimerKind::AutoRemove, Duration::from_millis(1500)))
    );
}

#[test]
fn settling_after_dismiss_still_returns_result() {
    let stack = setup();
    let (gate, slot) = Gate::new();
    let mut toast = stack.promise(gate, options());
    stack.frame();

    toast.controller().dismiss();
    stack.advance(Duration::from_millis(200));
    assert!(stack.is_empty());

    *slot.borrow_mut() = Some(Ok(1));
    assert_eq!(poll_once(&mut toast), Poll::Ready(Ok(1)));
    assert!(stack.is_empty());
}

#[test]
fn settling_before_first_frame_arms_at_mount() {
    let stack = setup();
    let (gate, slot) = Gate::new();
    let mut toast = stack.promise(gate, options());
    let id = toast.controller().id().clone();

    *slot.borrow_mut() = Some(Ok(2));
    assert!(poll_once(&mut toast).is_ready());
    assert_eq!(stack.pending_timer(&id), None);

    stack.frame();
    assert_eq!(
        stack.pending_timer(&id),
        Some((TimerKind::AutoRemove, Duration::from_millis(4000)))
    );
}
