#![forbid(unsafe_code)]

//! Projection of toast state onto a render surface.
//!
//! The engine never reads state back from the surface. After every
//! mutation it projects records into [`NodeAttributes`] and pushes them
//! through [`RenderSurface`]. The one exception is the post-mount height,
//! read once via [`RenderSurface::measure_height`].
//!
//! A DOM host applies [`NodeAttributes::data_attributes`] to the toast
//! element and writes the icon, title, and description regions; a native
//! host can consume the typed fields directly.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use toastline_core::ToastId;

use crate::config::{HorizontalAlign, Position, StackConfig, VerticalEdge};
use crate::record::{Title, ToastRecord};

/// Attributes of the stack container.
#[derive(Debug, Clone, PartialEq)]
pub struct StackAttributes {
    /// Anchoring position.
    pub position: Position,
    /// Presentation flag.
    pub rich_colors: bool,
    /// Whether toasts render a close affordance.
    pub close_button: bool,
    /// Whether the stack is expanded.
    pub expanded: bool,
    /// Height of the front toast, the collapsed stack height.
    pub front_height: f64,
    /// Gap between toasts.
    pub gap: f64,
}

impl StackAttributes {
    /// Project the container attributes.
    #[must_use]
    pub fn project(config: &StackConfig, expanded: bool, front_height: f64) -> Self {
        Self {
            position: config.position,
            rich_colors: config.rich_colors,
            close_button: config.close_button,
            expanded,
            front_height,
            gap: config.gap,
        }
    }

    /// `data-*` and ARIA attributes for a DOM container.
    #[must_use]
    pub fn data_attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("aria-live", "polite".to_string()),
            ("data-y-position", y_position(self.position).to_string()),
            ("data-x-position", x_position(self.position).to_string()),
            ("data-rich-colors", self.rich_colors.to_string()),
            ("data-expanded", self.expanded.to_string()),
            ("--front-toast-height", px(self.front_height)),
            ("--gap", px(self.gap)),
        ]
    }
}

/// Attributes of one toast node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttributes {
    /// Stable identifier.
    pub id: ToastId,
    /// Type attribute, absent for untyped toasts.
    pub toast_type: Option<&'static str>,
    /// Anchored edge, drives swipe direction in styles.
    pub y_position: VerticalEdge,
    /// Attached and measured.
    pub mounted: bool,
    /// In its grace period.
    pub removed: bool,
    /// Expanded mode.
    pub expanded: bool,
    /// Being dragged.
    pub swiping: bool,
    /// Dismissed by a swipe.
    pub swipe_out: bool,
    /// Among the visible front-most toasts.
    pub visible: bool,
    /// Front-most toast.
    pub front: bool,
    /// Can be swiped or closed.
    pub dismissible: bool,
    /// Renders a close affordance.
    pub close_button: bool,
    /// Stack index, absent once removed.
    pub index: Option<usize>,
    /// Paint order.
    pub z_index: usize,
    /// Cumulative offset in pixels.
    pub offset: f64,
    /// Height measured after mount.
    pub initial_height: Option<f64>,
    /// Current swipe offset in pixels.
    pub swipe_amount: f64,
    /// Icon token.
    pub icon: Option<String>,
    /// Title as markup; plain titles are escaped.
    pub title_html: String,
    /// Description as escaped markup.
    pub description_html: Option<String>,
}

impl NodeAttributes {
    /// Project a record.
    #[must_use]
    pub fn project(record: &ToastRecord, config: &StackConfig) -> Self {
        Self {
            id: record.id.clone(),
            toast_type: record.toast_type.as_str(),
            y_position: config.position.vertical(),
            mounted: record.state.mounted,
            removed: record.state.removed,
            expanded: record.state.expanded,
            swiping: record.state.swiping,
            swipe_out: record.state.swiped_out,
            visible: record.layout.visible,
            front: record.layout.front,
            dismissible: record.dismissible,
            close_button: config.close_button && record.dismissible,
            index: record.layout.stack_index,
            z_index: record.layout.z_order,
            offset: record.layout.offset,
            initial_height: record.measured_height(),
            swipe_amount: record.swipe_amount,
            icon: record.icon.as_ref().map(|icon| icon.token().to_string()),
            title_html: title_markup(&record.title),
            description_html: record.description.as_deref().map(escape_html),
        }
    }

    /// `data-*` attributes and style properties for a DOM node.
    #[must_use]
    pub fn data_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("data-id", self.id.to_string()),
            ("data-mounted", self.mounted.to_string()),
            ("data-removed", self.removed.to_string()),
            ("data-expanded", self.expanded.to_string()),
            ("data-swiping", self.swiping.to_string()),
            ("data-swipe-out", self.swipe_out.to_string()),
            ("data-visible", self.visible.to_string()),
            ("data-front", self.front.to_string()),
            ("data-dismissible", self.dismissible.to_string()),
            (
                "data-y-position",
                match self.y_position {
                    VerticalEdge::Top => "top",
                    VerticalEdge::Bottom => "bottom",
                }
                .to_string(),
            ),
            ("--z-index", self.z_index.to_string()),
            ("--offset", px(self.offset)),
            ("--swipe-amount", px(self.swipe_amount)),
        ];
        if let Some(kind) = self.toast_type {
            attrs.push(("data-type", kind.to_string()));
        }
        if let Some(index) = self.index {
            attrs.push(("--index", index.to_string()));
        }
        if let Some(height) = self.initial_height {
            attrs.push(("--initial-height", px(height)));
        }
        attrs
    }
}

fn title_markup(title: &Title) -> String {
    match title {
        Title::Plain(text) => escape_html(text),
        Title::Raw(markup) => markup.clone(),
    }
}

fn y_position(position: Position) -> &'static str {
    match position.vertical() {
        VerticalEdge::Top => "top",
        VerticalEdge::Bottom => "bottom",
    }
}

fn x_position(position: Position) -> &'static str {
    match position.horizontal() {
        HorizontalAlign::Left => "left",
        HorizontalAlign::Center => "center",
        HorizontalAlign::Right => "right",
    }
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Escape text for inclusion in HTML element content or attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Host surface the engine renders into.
pub trait RenderSurface {
    /// Whether the stack container already exists.
    fn has_stack(&self) -> bool;

    /// Create the stack container.
    fn create_stack(&mut self, attrs: &StackAttributes);

    /// Update the stack container.
    fn update_stack(&mut self, attrs: &StackAttributes);

    /// Attach a new toast node.
    fn mount(&mut self, node: &NodeAttributes);

    /// Update an attached node.
    fn update(&mut self, node: &NodeAttributes);

    /// Height of an attached node after layout, in pixels.
    fn measure_height(&self, id: &ToastId) -> Option<f64>;

    /// Remove a node.
    fn detach(&mut self, id: &ToastId);

    /// Whether a node is attached.
    fn contains(&self, id: &ToastId) -> bool;
}

#[derive(Debug, Default)]
struct MemoryNodes {
    stack: Option<StackAttributes>,
    nodes: HashMap<ToastId, NodeAttributes>,
    heights: HashMap<ToastId, f64>,
    default_height: f64,
    mounts: usize,
    detached: Vec<ToastId>,
}

/// In-memory surface for headless hosts and tests.
///
/// Clones share the same nodes, so a host can keep a handle while the stack
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    inner: Rc<RefCell<MemoryNodes>>,
}

impl MemorySurface {
    /// Default node height reported by [`MemorySurface::measure_height`].
    pub const DEFAULT_HEIGHT: f64 = 56.0;

    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_height(Self::DEFAULT_HEIGHT)
    }

    /// Create an empty surface reporting `height` for every node.
    #[must_use]
    pub fn with_default_height(height: f64) -> Self {
        let surface = Self::default();
        surface.inner.borrow_mut().default_height = height;
        surface
    }

    /// Report `height` for the node with `id` instead of the default.
    pub fn set_height(&self, id: &ToastId, height: f64) {
        self.inner.borrow_mut().heights.insert(id.clone(), height);
    }

    /// Last attributes pushed for `id`.
    #[must_use]
    pub fn node(&self, id: &ToastId) -> Option<NodeAttributes> {
        self.inner.borrow().nodes.get(id).cloned()
    }

    /// Last container attributes.
    #[must_use]
    pub fn stack(&self) -> Option<StackAttributes> {
        self.inner.borrow().stack.clone()
    }

    /// Attached node count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Whether no node is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().nodes.is_empty()
    }

    /// Total mounts performed.
    #[must_use]
    pub fn mount_count(&self) -> usize {
        self.inner.borrow().mounts
    }

    /// Ids detached so far, in order.
    #[must_use]
    pub fn detached(&self) -> Vec<ToastId> {
        self.inner.borrow().detached.clone()
    }
}

impl RenderSurface for MemorySurface {
    fn has_stack(&self) -> bool {
        self.inner.borrow().stack.is_some()
    }

    fn create_stack(&mut self, attrs: &StackAttributes) {
        self.inner.borrow_mut().stack = Some(attrs.clone());
    }

    fn update_stack(&mut self, attrs: &StackAttributes) {
        self.inner.borrow_mut().stack = Some(attrs.clone());
    }

    fn mount(&mut self, node: &NodeAttributes) {
        let mut inner = self.inner.borrow_mut();
        inner.mounts += 1;
        inner.nodes.insert(node.id.clone(), node.clone());
    }

    fn update(&mut self, node: &NodeAttributes) {
        if let Some(existing) = self.inner.borrow_mut().nodes.get_mut(&node.id) {
            *existing = node.clone();
        }
    }

    fn measure_height(&self, id: &ToastId) -> Option<f64> {
        let inner = self.inner.borrow();
        if !inner.nodes.contains_key(id) {
            return None;
        }
        Some(inner.heights.get(id).copied().unwrap_or(inner.default_height))
    }

    fn detach(&mut self, id: &ToastId) {
        let mut inner = self.inner.borrow_mut();
        if inner.nodes.remove(id).is_some() {
            inner.detached.push(id.clone());
        }
    }

    fn contains(&self, id: &ToastId) -> bool {
        self.inner.borrow().nodes.contains_key(id)
    }
}
