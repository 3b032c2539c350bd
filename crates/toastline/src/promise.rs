#![forbid(unsafe_code)]

//! Loading toasts that follow an asynchronous operation.
//!
//! [`ToastStack::promise`](crate::ToastStack::promise) shows a persistent
//! loading toast and wraps the operation in a [`PromiseToast`]. Awaiting the
//! wrapper drives the operation; on completion the same toast is switched to
//! the success or error presentation and given a normal lifetime.
//!
//! The operation's result is returned unchanged. An `Err` is reported to the
//! user through the toast and still reaches the caller.

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, ready};

use crate::controller::ToastController;
use crate::record::{ToastDuration, ToastType};

/// Text shown when an operation settles: fixed, or derived from the outcome.
pub enum PromiseMessage<T: ?Sized> {
    /// Fixed text.
    Text(String),
    /// Text computed from the settled value.
    With(Box<dyn Fn(&T) -> String>),
}

impl<T: ?Sized> PromiseMessage<T> {
    /// Message computed from the settled value.
    pub fn with(f: impl Fn(&T) -> String + 'static) -> Self {
        Self::With(Box::new(f))
    }

    /// Resolve the message for `value`.
    #[must_use]
    pub fn render(&self, value: &T) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::With(f) => f(value),
        }
    }
}

impl<T: ?Sized> fmt::Debug for PromiseMessage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::With(_) => f.write_str("With(<fn>)"),
        }
    }
}

impl<T: ?Sized> From<&str> for PromiseMessage<T> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<T: ?Sized> From<String> for PromiseMessage<T> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Messages for each phase of a promise toast.
#[derive(Debug)]
pub struct PromiseOptions<T, E> {
    /// Title while pending.
    pub loading: String,
    /// Title on success.
    pub success: PromiseMessage<T>,
    /// Title on failure.
    pub error: PromiseMessage<E>,
    /// Description, kept across all phases.
    pub description: Option<String>,
    /// Lifetime after settling; falls back to the stack's default.
    pub duration: Option<ToastDuration>,
}

impl<T, E> PromiseOptions<T, E> {
    /// Options with the three phase messages.
    pub fn new(
        loading: impl Into<String>,
        success: impl Into<PromiseMessage<T>>,
        error: impl Into<PromiseMessage<E>>,
    ) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error: error.into(),
            description: None,
            duration: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the post-settle lifetime.
    #[must_use]
    pub fn duration(mut self, duration: impl Into<ToastDuration>) -> Self {
        self.duration = Some(duration.into());
        self
    }
}

/// Future returned by [`ToastStack::promise`](crate::ToastStack::promise).
///
/// Resolves to the wrapped operation's result after updating the toast.
#[must_use = "the operation only runs while the PromiseToast is polled"]
pub struct PromiseToast<T, E> {
    controller: ToastController,
    future: Pin<Box<dyn Future<Output = Result<T, E>>>>,
    success: PromiseMessage<T>,
    error: PromiseMessage<E>,
    settle_duration: ToastDuration,
    settled: bool,
}

impl<T, E> fmt::Debug for PromiseToast<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromiseToast")
            .field("controller", &self.controller)
            .field("settled", &self.settled)
            .finish_non_exhaustive()
    }
}

impl<T, E> PromiseToast<T, E> {
    pub(crate) fn new(
        controller: ToastController,
        future: Pin<Box<dyn Future<Output = Result<T, E>>>>,
        options: PromiseOptions<T, E>,
        settle_duration: ToastDuration,
    ) -> Self {
        Self {
            controller,
            future,
            success: options.success,
            error: options.error,
            settle_duration,
            settled: false,
        }
    }

    /// Controller for the loading toast.
    #[must_use]
    pub fn controller(&self) -> &ToastController {
        &self.controller
    }

    /// Whether the operation has completed.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    fn settle(&mut self, result: &Result<T, E>) {
        let (toast_type, title) = match result {
            Ok(value) => (ToastType::Success, self.success.render(value)),
            Err(err) => (ToastType::Error, self.error.render(err)),
        };
        tracing::debug!(toast = %self.controller.id(), kind = ?toast_type, "promise toast settled");
        self.controller
            .set_type(toast_type)
            .set_title(title, false)
            .set_duration(self.settle_duration);
        self.settled = true;
    }
}

impl<T, E> Future for PromiseToast<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let result = ready!(this.future.as_mut().poll(cx));
        this.settle(&result);
        Poll::Ready(result)
    }
}
