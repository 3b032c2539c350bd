#![forbid(unsafe_code)]

//! Ordered toast collection and layout recomputation.
//!
//! Records are kept newest first. Removed records stay in the collection
//! through their grace period but no longer take part in the layout.
//!
//! # Layout pass
//!
//! [`StackModel::recompute`] walks the records once in stack order and, for
//! every non-removed record at dense index `i`:
//!
//! - `front = i == 0`
//! - `visible = i < visible_toasts`
//! - `offset = gap * i + heights_before` where `heights_before` sums the
//!   measured heights of the non-removed records in front of it
//! - `z_order = total_len - physical_position`
//!
//! # Invariants
//!
//! 1. Stack indices over non-removed records are exactly `0..k`.
//! 2. Exactly one record is `front` when `k >= 1`, none when `k == 0`.
//! 3. At most `visible_toasts` records are `visible`: the lowest indices.

use std::collections::VecDeque;

use toastline_core::ToastId;

use crate::config::{GAP, VISIBLE_TOASTS_AMOUNT};
use crate::record::{ToastLayout, ToastRecord};

/// Parameters of the layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// How many front-most records are visible.
    pub visible_toasts: usize,
    /// Gap between records in pixels.
    pub gap: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            visible_toasts: VISIBLE_TOASTS_AMOUNT,
            gap: GAP,
        }
    }
}

/// The stack of toast records.
#[derive(Debug, Clone, Default)]
pub struct StackModel {
    records: VecDeque<ToastRecord>,
    params: LayoutParams,
}

impl StackModel {
    /// Create an empty stack with default layout parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack with custom layout parameters.
    #[must_use]
    pub fn with_params(params: LayoutParams) -> Self {
        Self {
            records: VecDeque::new(),
            params,
        }
    }

    /// Current layout parameters.
    #[must_use]
    pub fn params(&self) -> LayoutParams {
        self.params
    }

    /// Replace the layout parameters and recompute.
    pub fn set_params(&mut self, params: LayoutParams) {
        self.params = params;
        self.recompute();
    }

    /// Prepend a record as the new front and recompute.
    pub fn insert(&mut self, record: ToastRecord) {
        self.records.push_front(record);
        self.recompute();
    }

    /// Assign index, front, visibility, offset, and z-order to every
    /// non-removed record.
    pub fn recompute(&mut self) {
        let total = self.records.len();
        let mut index = 0usize;
        let mut heights_before = 0.0f64;

        for (position, record) in self.records.iter_mut().enumerate() {
            if record.state.removed {
                record.layout.stack_index = None;
                record.layout.front = false;
                record.layout.visible = false;
                continue;
            }
            record.layout = ToastLayout {
                stack_index: Some(index),
                front: index == 0,
                visible: index < self.params.visible_toasts,
                offset: self.params.gap * index as f64 + heights_before,
                z_order: total - position,
            };
            heights_before += record.measured_height().unwrap_or(0.0);
            index += 1;
        }
    }

    /// Permanently delete a record, returning it.
    pub fn evict(&mut self, id: &ToastId) -> Option<ToastRecord> {
        let position = self.position(id)?;
        let record = self.records.remove(position);
        self.recompute();
        record
    }

    /// Physical position of a record.
    #[must_use]
    pub fn position(&self, id: &ToastId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }

    /// Look up a record.
    #[must_use]
    pub fn get(&self, id: &ToastId) -> Option<&ToastRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Look up a record for mutation. Callers recompute afterwards.
    pub fn get_mut(&mut self, id: &ToastId) -> Option<&mut ToastRecord> {
        self.records.iter_mut().find(|r| &r.id == id)
    }

    /// Whether a record (removed or not) is present.
    #[must_use]
    pub fn contains(&self, id: &ToastId) -> bool {
        self.get(id).is_some()
    }

    /// Records in stack order, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ToastRecord> {
        self.records.iter()
    }

    /// Records in stack order, for mutation. Callers recompute afterwards.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ToastRecord> {
        self.records.iter_mut()
    }

    /// Non-removed records in stack order.
    pub fn active(&self) -> impl Iterator<Item = &ToastRecord> {
        self.records.iter().filter(|r| r.is_active())
    }

    /// The front record.
    #[must_use]
    pub fn front(&self) -> Option<&ToastRecord> {
        self.active().next()
    }

    /// Height of the front record, the collapsed height of the stack.
    #[must_use]
    pub fn front_height(&self) -> f64 {
        self.front()
            .and_then(ToastRecord::measured_height)
            .unwrap_or(0.0)
    }

    /// Total records including those in their grace period.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of non-removed records.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.active().count()
    }
}
