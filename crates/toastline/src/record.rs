#![forbid(unsafe_code)]

//! Toast records: the typed state of one entry in the stack.
//!
//! Records are the single source of truth. The render surface only ever
//! receives a projection of them (see [`crate::render`]).

use core::time::Duration;

use toastline_core::ToastId;

use crate::icon::{self, Icon};

/// Default auto-dismiss lifetime.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(4000);

/// Semantic type of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ToastType {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
    /// Informational.
    Info,
    /// Needs attention.
    Warning,
    /// Work in progress.
    Loading,
    /// Explicitly untyped.
    Neutral,
    /// No type given.
    #[default]
    Unset,
}

impl ToastType {
    /// Attribute value, `None` for unset.
    #[must_use]
    pub const fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Success => Some("success"),
            Self::Error => Some("error"),
            Self::Info => Some("info"),
            Self::Warning => Some("warning"),
            Self::Loading => Some("loading"),
            Self::Neutral => Some("neutral"),
            Self::Unset => None,
        }
    }
}

/// Title text of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    /// Plain text, escaped before it reaches the surface.
    Plain(String),
    /// Trusted markup, passed through verbatim.
    Raw(String),
}

impl Title {
    /// Build a title, choosing raw markup when `raw` is set.
    #[must_use]
    pub fn new(text: impl Into<String>, raw: bool) -> Self {
        if raw {
            Self::Raw(text.into())
        } else {
            Self::Plain(text.into())
        }
    }

    /// The unprocessed text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Raw(text) => text,
        }
    }

    /// Whether the title carries trusted markup.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

impl From<String> for Title {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

/// Requested lifetime of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastDuration {
    /// Request removal after the given time.
    After(Duration),
    /// Never auto-dismiss.
    Persistent,
}

impl ToastDuration {
    /// Interpret a millisecond count. Any negative value (conventionally
    /// `-1`) means persistent.
    #[must_use]
    pub fn from_millis(ms: i64) -> Self {
        if ms < 0 {
            Self::Persistent
        } else {
            Self::After(Duration::from_millis(ms.unsigned_abs()))
        }
    }

    /// Millisecond count with `-1` for persistent.
    #[must_use]
    pub fn as_millis(self) -> i64 {
        match self {
            Self::After(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
            Self::Persistent => -1,
        }
    }

    /// The timed lifetime, if any.
    #[must_use]
    pub const fn lifetime(self) -> Option<Duration> {
        match self {
            Self::After(d) => Some(d),
            Self::Persistent => None,
        }
    }
}

impl Default for ToastDuration {
    fn default() -> Self {
        Self::After(DEFAULT_DURATION)
    }
}

impl From<Duration> for ToastDuration {
    fn from(d: Duration) -> Self {
        Self::After(d)
    }
}

/// Lifecycle flags of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToastState {
    /// Attached and measured.
    pub mounted: bool,
    /// Shown in expanded (fanned-out) mode.
    pub expanded: bool,
    /// Removal requested; waiting out the grace period.
    pub removed: bool,
    /// A drag is in progress.
    pub swiping: bool,
    /// Dismissed by a swipe.
    pub swiped_out: bool,
}

/// Layout outputs assigned by [`StackModel::recompute`](crate::model::StackModel::recompute).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToastLayout {
    /// Dense index among non-removed records, `None` once removed.
    pub stack_index: Option<usize>,
    /// Most recent non-removed record.
    pub front: bool,
    /// Among the front-most visible records.
    pub visible: bool,
    /// Cumulative pixel offset from the anchored edge.
    pub offset: f64,
    /// Paint order, higher paints on top.
    pub z_order: usize,
}

/// One entry in the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastRecord {
    /// Stable identifier.
    pub id: ToastId,
    /// Semantic type.
    pub toast_type: ToastType,
    /// Title text.
    pub title: Title,
    /// Secondary text, fixed at creation.
    pub description: Option<String>,
    /// Resolved icon.
    pub icon: Option<Icon>,
    /// Requested lifetime.
    pub duration: ToastDuration,
    /// Whether swipe and the close affordance may remove it.
    pub dismissible: bool,
    /// Lifecycle flags.
    pub state: ToastState,
    /// Height captured after mount.
    measured_height: Option<f64>,
    /// Layout outputs.
    pub layout: ToastLayout,
    /// Transient swipe offset along the productive axis.
    pub swipe_amount: f64,
}

impl ToastRecord {
    /// Create an unmounted record.
    #[must_use]
    pub fn new(id: ToastId, title: impl Into<Title>) -> Self {
        Self {
            id,
            toast_type: ToastType::Unset,
            title: title.into(),
            description: None,
            icon: None,
            duration: ToastDuration::default(),
            dismissible: true,
            state: ToastState::default(),
            measured_height: None,
            layout: ToastLayout::default(),
            swipe_amount: 0.0,
        }
    }

    /// Set the type, resolving its default icon.
    #[must_use]
    pub fn with_type(mut self, toast_type: ToastType) -> Self {
        self.toast_type = toast_type;
        self.icon = icon::resolve(toast_type);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Override the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: Option<Icon>) -> Self {
        self.icon = icon;
        self
    }

    /// Set the lifetime.
    #[must_use]
    pub fn with_duration(mut self, duration: ToastDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Set whether the toast may be swiped or closed.
    #[must_use]
    pub fn with_dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    /// Height captured after mount.
    #[must_use]
    pub fn measured_height(&self) -> Option<f64> {
        self.measured_height
    }

    /// Record the post-mount height. Only the first call takes effect.
    ///
    /// Returns `true` if the height was stored.
    pub fn capture_height(&mut self, height: f64) -> bool {
        if self.measured_height.is_some() {
            return false;
        }
        self.measured_height = Some(height.max(0.0));
        true
    }

    /// Still part of the live stack.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.state.removed
    }
}
