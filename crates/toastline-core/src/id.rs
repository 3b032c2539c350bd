#![forbid(unsafe_code)]

//! Collision-resistant identifiers for toasts.
//!
//! An identifier combines a strictly increasing millisecond component with a
//! random 32-bit component. The time part is read from the system clock and
//! bumped past the last issued value, so two identifiers issued in the same
//! process never share a time part even when the clock stalls or steps back.
//!
//! # Example
//!
//! ```
//! use toastline_core::id::generate;
//!
//! let a = generate();
//! let b = generate();
//! assert_ne!(a, b);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Opaque unique identifier of a toast.
///
/// Assigned once at creation and never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ToastId(String);

impl ToastId {
    /// Wrap an existing identifier string.
    ///
    /// Hosts use this to route events for nodes they already know by id.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ToastId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ToastId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh identifier.
#[must_use]
pub fn generate() -> ToastId {
    let millis = next_millis(wall_millis());
    let entropy: u32 = rand::thread_rng().r#gen();
    ToastId(format!("{}-{entropy:08x}", to_base36(millis)))
}

/// Current wall clock in milliseconds since the Unix epoch.
fn wall_millis() -> u64 {
    let now = web_time::SystemTime::now();
    let since_epoch = now.duration_since(web_time::UNIX_EPOCH).unwrap_or_default();
    u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
}

/// Reserve the next time component, never repeating a previous one.
fn next_millis(observed: u64) -> u64 {
    let mut issued = observed;
    let _ = LAST_MILLIS.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
        issued = observed.max(last.saturating_add(1));
        Some(issued)
    });
    issued
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<ToastId> = (0..2_000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 2_000);
    }

    #[test]
    fn time_component_never_repeats() {
        let a = next_millis(10);
        let b = next_millis(10);
        let c = next_millis(5);
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn id_has_time_and_random_parts() {
        let id = generate();
        let (time, entropy) = id.as_str().split_once('-').expect("separator");
        assert!(!time.is_empty());
        assert_eq!(entropy.len(), 8);
        assert!(entropy.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn display_matches_as_str() {
        let id = ToastId::new("abc-123");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(ToastId::from("abc-123"), id);
    }
}
