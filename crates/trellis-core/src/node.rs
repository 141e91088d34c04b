//! # Nodes
//!
//! A `Node` is the geometry and state block every widget embeds: position
//! (parent-relative), assigned size, final size, explicit minimum, padding,
//! alignment and autoscale flags, visibility, and the dirty/damage flags that
//! drive demand-driven layout and repaint.
//!
//! Dirty and damage flags live in a shared [`NodeMeta`] cell. A child keeps a
//! weak [`ParentLink`] to its parent's cell so it can mark the parent dirty
//! without owning it; ownership only ever flows downward through child lists.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::{Axis, Padding, Rect, Size, Vec2, metrics};

pub type NodeId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> NodeId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

bitflags! {
    /// Edge alignment. Both edges of an axis mean "fill", one edge means
    /// "stick to it", none means "center".
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Align: u8 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const TOP    = 1 << 2;
        const BOTTOM = 1 << 3;

        const FILL_H = Self::LEFT.bits() | Self::RIGHT.bits();
        const FILL_V = Self::TOP.bits() | Self::BOTTOM.bits();
        const FILL   = Self::FILL_H.bits() | Self::FILL_V.bits();
    }
}

impl Align {
    /// Edges belonging to `axis`.
    pub fn edges(axis: Axis) -> Align {
        match axis {
            Axis::Horizontal => Align::FILL_H,
            Axis::Vertical => Align::FILL_V,
        }
    }

    pub fn leading(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Align::LEFT),
            Axis::Vertical => self.contains(Align::TOP),
        }
    }

    pub fn trailing(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Align::RIGHT),
            Axis::Vertical => self.contains(Align::BOTTOM),
        }
    }

    pub fn fills(self, axis: Axis) -> bool {
        self.leading(axis) && self.trailing(axis)
    }

    /// Replaces the edges of one axis, leaving the other untouched.
    pub fn with_axis(self, axis: Axis, edges: Align) -> Align {
        let mask = Align::edges(axis);
        (self - mask) | (edges & mask)
    }

    /// Position of an extent `size` inside `[origin, origin + avail]`.
    pub fn place(self, axis: Axis, origin: f32, avail: f32, size: f32) -> f32 {
        match (self.leading(axis), self.trailing(axis)) {
            (true, _) => origin,
            (false, true) => origin + avail - size,
            (false, false) => origin + (avail - size) * 0.5,
        }
    }
}

bitflags! {
    /// Axes on which a container grows to fit its content.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Autoscale: u8 {
        const WIDTH  = 1 << 0;
        const HEIGHT = 1 << 1;
        const BOTH   = Self::WIDTH.bits() | Self::HEIGHT.bits();
    }
}

impl Autoscale {
    pub fn on(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Autoscale::WIDTH),
            Axis::Vertical => self.contains(Autoscale::HEIGHT),
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    struct StateFlags: u8 {
        const HIDDEN   = 1 << 0;
        const INACTIVE = 1 << 1;
    }
}

/// Flags shared between a node and its children's back-links.
#[derive(Debug)]
pub struct NodeMeta {
    id: NodeId,
    dirty: AtomicBool,
    damaged: AtomicBool,
    redraw: AtomicBool,
    capture: AtomicBool,
}

impl NodeMeta {
    fn new() -> Self {
        Self {
            id: next_id(),
            dirty: AtomicBool::new(true),
            damaged: AtomicBool::new(true),
            redraw: AtomicBool::new(false),
            capture: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
        self.damaged.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}

/// Non-owning back-reference from a child to its parent.
#[derive(Clone, Debug)]
pub struct ParentLink {
    id: NodeId,
    meta: Weak<NodeMeta>,
}

impl ParentLink {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Marks the parent dirty if it is still alive.
    pub fn mark_dirty(&self) {
        if let Some(m) = self.meta.upgrade() {
            m.mark_dirty();
        }
    }
}

#[derive(Debug)]
pub struct Node {
    meta: Arc<NodeMeta>,
    pub pos: Vec2,
    request: Size,
    size: Size,
    min: Size,
    padding: Padding,
    align: Align,
    autoscale: Autoscale,
    state: StateFlags,
    parent: Option<ParentLink>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    pub fn new() -> Self {
        Self {
            meta: Arc::new(NodeMeta::new()),
            pos: Vec2::ZERO,
            request: Size::ZERO,
            size: Size::ZERO,
            min: Size::ZERO,
            padding: Padding::UNSET,
            align: Align::empty(),
            autoscale: Autoscale::empty(),
            state: StateFlags::empty(),
            parent: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.meta.id
    }

    pub fn meta(&self) -> &Arc<NodeMeta> {
        &self.meta
    }

    /// Back-link handed to children on `add`.
    pub fn link(&self) -> ParentLink {
        ParentLink {
            id: self.meta.id,
            meta: Arc::downgrade(&self.meta),
        }
    }

    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub fn set_parent(&mut self, parent: Option<ParentLink>) {
        self.parent = parent;
        self.mark_dirty();
    }

    // geometry

    pub fn set_pos(&mut self, pos: Vec2) {
        if self.pos != pos {
            self.pos = pos;
            self.mark_damaged();
        }
    }

    /// Size assigned by the user or by a parent layout.
    pub fn request(&self) -> Size {
        self.request
    }

    pub fn set_request(&mut self, size: Size) {
        if self.request != size {
            self.request = size;
            self.mark_dirty();
        }
    }

    pub fn set_request_along(&mut self, axis: Axis, v: f32) {
        let mut r = self.request;
        r.set_along(axis, v);
        self.set_request(r);
    }

    /// Final size from the last arrange pass.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Overrides the final size of a clean node without marking it dirty.
    /// Layouts use this after they have already re-arranged the node.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.mark_damaged();
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Explicit lower bound on the final size.
    pub fn min(&self) -> Size {
        self.min
    }

    pub fn set_min(&mut self, min: Size) {
        if self.min != min {
            self.min = min;
            self.mark_dirty();
        }
    }

    /// Padding with unset edges resolved against the current metrics.
    pub fn padding(&self) -> Padding {
        self.padding.resolve(metrics().padding)
    }

    pub fn set_padding(&mut self, p: Padding) {
        if self.padding != p {
            self.padding = p;
            self.mark_dirty();
        }
    }

    pub fn align(&self) -> Align {
        self.align
    }

    pub fn set_align(&mut self, align: Align) {
        if self.align != align {
            self.align = align;
            self.mark_dirty();
        }
    }

    pub fn set_align_axis(&mut self, axis: Axis, edges: Align) {
        self.set_align(self.align.with_axis(axis, edges));
    }

    pub fn autoscale(&self) -> Autoscale {
        self.autoscale
    }

    pub fn set_autoscale(&mut self, a: Autoscale) {
        if self.autoscale != a {
            self.autoscale = a;
            self.mark_dirty();
        }
    }

    // state

    pub fn is_visible(&self) -> bool {
        !self.state.contains(StateFlags::HIDDEN)
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.is_visible() != visible {
            self.state.set(StateFlags::HIDDEN, !visible);
            self.mark_dirty();
            self.mark_parent_dirty();
        }
    }

    pub fn is_active(&self) -> bool {
        !self.state.contains(StateFlags::INACTIVE)
    }

    pub fn set_active(&mut self, active: bool) {
        if self.is_active() != active {
            self.state.set(StateFlags::INACTIVE, !active);
            self.mark_damaged();
        }
    }

    /// Visible and active: may receive events.
    pub fn is_eligible(&self) -> bool {
        self.state.is_empty()
    }

    // flags

    pub fn is_dirty(&self) -> bool {
        self.meta.is_dirty()
    }

    pub fn mark_dirty(&self) {
        self.meta.mark_dirty();
    }

    pub fn mark_parent_dirty(&self) {
        if let Some(p) = &self.parent {
            p.mark_dirty();
        }
    }

    pub fn is_damaged(&self) -> bool {
        self.meta.damaged.load(Ordering::Acquire)
    }

    pub fn mark_damaged(&self) {
        self.meta.damaged.store(true, Ordering::Release);
    }

    pub fn clear_damage(&self) {
        self.meta.damaged.store(false, Ordering::Release);
    }

    /// Asks the host loop for one more frame.
    pub fn request_redraw(&self) {
        self.meta.redraw.store(true, Ordering::Release);
    }

    pub fn wants_redraw(&self) -> bool {
        self.meta.redraw.load(Ordering::Acquire)
    }

    pub fn clear_redraw(&self) {
        self.meta.redraw.store(false, Ordering::Release);
    }

    /// Asks the host to route the rest of the current press (drags and the
    /// release) straight to this node.
    pub fn capture_pointer(&self) {
        self.meta.capture.store(true, Ordering::Release);
    }

    /// Returns and clears a pending capture request.
    pub fn take_capture(&self) -> bool {
        self.meta.capture.swap(false, Ordering::AcqRel)
    }

    /// Last step of every arrange pass: final size is the assigned size
    /// raised to `min`, and the dirty flag is cleared.
    pub fn finalize(&mut self, min: Size) {
        let size = self.request.max(min).max(self.min);
        if size != self.size {
            self.size = size;
            self.mark_damaged();
        }
        self.meta.dirty.store(false, Ordering::Release);
    }
}
