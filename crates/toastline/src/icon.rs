#![forbid(unsafe_code)]

//! Icon tokens and the type → icon mapping.
//!
//! The engine only carries tokens. Hosts map [`IconKind::asset_name`] onto
//! their own SVG sprites, glyphs, or images.

use crate::record::ToastType;

/// Built-in icon assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum IconKind {
    /// Checkmark.
    Success,
    /// Cross.
    Error,
    /// Circled "i".
    Info,
    /// Exclamation triangle.
    Warning,
    /// Spinner.
    Loading,
}

impl IconKind {
    /// Asset name the host resolves to a visual.
    #[must_use]
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Loading => "loader",
        }
    }

    /// Single display character for text-only hosts.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Success => '\u{2713}', // ✓
            Self::Error => '\u{2717}',   // ✗
            Self::Info => 'i',
            Self::Warning => '!',
            Self::Loading => '\u{25cc}', // ◌
        }
    }
}

/// A resolved icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Icon {
    /// One of the built-in assets.
    Asset(IconKind),
    /// Host-defined token (asset name, emoji, ...).
    Custom(String),
}

impl Icon {
    /// Token rendered into the icon region.
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Asset(kind) => kind.asset_name(),
            Self::Custom(token) => token,
        }
    }
}

impl From<IconKind> for Icon {
    fn from(kind: IconKind) -> Self {
        Self::Asset(kind)
    }
}

/// Resolve the default icon for a toast type.
///
/// Neutral and unset toasts carry no icon.
#[must_use]
pub fn resolve(toast_type: ToastType) -> Option<Icon> {
    let kind = match toast_type {
        ToastType::Success => IconKind::Success,
        ToastType::Error => IconKind::Error,
        ToastType::Info => IconKind::Info,
        ToastType::Warning => IconKind::Warning,
        ToastType::Loading => IconKind::Loading,
        ToastType::Neutral | ToastType::Unset => return None,
    };
    Some(Icon::Asset(kind))
}
