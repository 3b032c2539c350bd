#![forbid(unsafe_code)]

//! Stack and per-toast configuration.
//!
//! With the `serde` feature, [`StackConfig`] and [`ToastOptions`] deserialize
//! from the camelCase JSON a web host passes through (`{"closeButton": true,
//! "position": "top-center"}`), and durations use the millisecond convention
//! with `-1` for persistent toasts.

use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use toastline_core::{KeyEvent, KeyEventKind, Modifiers};

use crate::error::ToastError;
use crate::gesture::SwipeConfig;
use crate::icon::Icon;
use crate::record::{DEFAULT_DURATION, ToastDuration, ToastType};

/// Number of front-most toasts shown at once.
pub const VISIBLE_TOASTS_AMOUNT: usize = 3;

/// Vertical gap between stacked toasts in pixels.
pub const GAP: f64 = 14.0;

/// Delay between a removal request and eviction.
pub const REMOVE_GRACE: Duration = Duration::from_millis(200);

/// Anchored edge of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalEdge {
    /// Anchored to the top; newest toast on top.
    Top,
    /// Anchored to the bottom; newest toast at the bottom.
    Bottom,
}

/// Horizontal alignment of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Left edge.
    Left,
    /// Centered.
    Center,
    /// Right edge.
    Right,
}

/// Where the stack is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Position {
    /// Top-left corner.
    TopLeft,
    /// Top center.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom center.
    BottomCenter,
    /// Bottom-right corner.
    #[default]
    BottomRight,
}

impl Position {
    /// All positions in declaration order.
    pub const ALL: [Self; 6] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Hyphenated vertical-horizontal name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// The edge the stack is anchored to.
    #[must_use]
    pub const fn vertical(self) -> VerticalEdge {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => VerticalEdge::Top,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => VerticalEdge::Bottom,
        }
    }

    /// Horizontal alignment.
    #[must_use]
    pub const fn horizontal(self) -> HorizontalAlign {
        match self {
            Self::TopLeft | Self::BottomLeft => HorizontalAlign::Left,
            Self::TopCenter | Self::BottomCenter => HorizontalAlign::Center,
            Self::TopRight | Self::BottomRight => HorizontalAlign::Right,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ToastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ToastError::InvalidPosition(s.to_string()))
    }
}

/// Keyboard shortcut that toggles expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    /// Modifiers that must be held.
    pub modifiers: Modifiers,
    /// Character key, matched case-insensitively.
    pub key: char,
}

impl Hotkey {
    /// Create a hotkey.
    #[must_use]
    pub const fn new(modifiers: Modifiers, key: char) -> Self {
        Self { modifiers, key }
    }

    /// Whether a key press triggers this hotkey.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.kind != KeyEventKind::Release
            && event.modifiers.contains(self.modifiers)
            && event.is_char(self.key)
    }
}

impl Default for Hotkey {
    fn default() -> Self {
        Self::new(Modifiers::ALT, 't')
    }
}

/// Configuration of a toast stack, applied by `init`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct StackConfig {
    /// Render a dismiss affordance on every toast.
    pub close_button: bool,
    /// Presentation flag passed through to the surface.
    pub rich_colors: bool,
    /// Where the stack is anchored.
    pub position: Position,
    /// How many front-most toasts are visible.
    pub visible_toasts: usize,
    /// Gap between toasts in pixels.
    pub gap: f64,
    /// Lifetime used when a toast does not request one.
    pub default_duration: ToastDuration,
    /// Start in expanded mode.
    pub expand: bool,
    /// Expansion toggle shortcut.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub hotkey: Hotkey,
    /// Swipe-to-dismiss thresholds.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub swipe: SwipeConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            close_button: false,
            rich_colors: false,
            position: Position::default(),
            visible_toasts: VISIBLE_TOASTS_AMOUNT,
            gap: GAP,
            default_duration: ToastDuration::After(DEFAULT_DURATION),
            expand: false,
            hotkey: Hotkey::default(),
            swipe: SwipeConfig::default(),
        }
    }
}

impl StackConfig {
    /// Set the close-button flag.
    #[must_use]
    pub fn close_button(mut self, enabled: bool) -> Self {
        self.close_button = enabled;
        self
    }

    /// Set the rich-colors flag.
    #[must_use]
    pub fn rich_colors(mut self, enabled: bool) -> Self {
        self.rich_colors = enabled;
        self
    }

    /// Set the stack position.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set how many toasts are visible.
    #[must_use]
    pub fn visible_toasts(mut self, count: usize) -> Self {
        self.visible_toasts = count;
        self
    }

    /// Set the default lifetime.
    #[must_use]
    pub fn default_duration(mut self, duration: ToastDuration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Start expanded.
    #[must_use]
    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Set the expansion shortcut.
    #[must_use]
    pub fn hotkey(mut self, hotkey: Hotkey) -> Self {
        self.hotkey = hotkey;
        self
    }

    /// Set the swipe-to-dismiss thresholds.
    #[must_use]
    pub fn swipe(mut self, swipe: SwipeConfig) -> Self {
        self.swipe = swipe;
        self
    }
}

/// Options accepted by `show` and the typed helpers.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ToastOptions {
    /// Semantic type; overrides a helper's preset.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub toast_type: Option<ToastType>,
    /// Secondary text.
    pub description: Option<String>,
    /// Icon; overrides the type's default icon.
    pub icon: Option<Icon>,
    /// Lifetime; falls back to the stack's default.
    pub duration: Option<ToastDuration>,
    /// Whether swipe and close may remove it (default `true`).
    pub dismissible: Option<bool>,
}

impl ToastOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type.
    #[must_use]
    pub fn toast_type(mut self, toast_type: ToastType) -> Self {
        self.toast_type = Some(toast_type);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the icon.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<Icon>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the lifetime.
    #[must_use]
    pub fn duration(mut self, duration: impl Into<ToastDuration>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Never auto-dismiss.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.duration = Some(ToastDuration::Persistent);
        self
    }

    /// Set whether the toast may be dismissed by the user.
    #[must_use]
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = Some(dismissible);
        self
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ToastDuration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ToastDuration {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ms = i64::deserialize(deserializer)?;
        Ok(Self::from_millis(ms))
    }
}
