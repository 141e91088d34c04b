use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::{
    ChildList, CursorIcon, InputEvent, Node, NodeId, Response, Scene, Size, Vec2,
};

/// Behaviour shared by every element of the tree.
///
/// Positions handed to `hit_test` / `handle_event` are in the parent's
/// content space; `draw` receives the absolute origin of that space.
pub trait Widget: Send {
    fn node(&self) -> &Node;
    fn node_mut(&mut self) -> &mut Node;

    /// Smallest size satisfying the widget's own content constraints.
    fn min_size(&self) -> Size {
        self.node().min()
    }

    /// Own dirty flag, or for containers any descendant's.
    fn changed(&self) -> bool {
        self.node().is_dirty()
    }

    fn arrange(&mut self) {
        let min = self.min_size();
        self.node_mut().finalize(min);
    }

    fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        let n = self.node();
        (n.is_visible() && n.rect().contains(p)).then(|| n.id())
    }

    fn handle_event(&mut self, _ev: &InputEvent) -> Response {
        Response::Ignored
    }

    fn draw(&mut self, _scene: &mut Scene, _origin: Vec2) {
        self.node().clear_damage();
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Arrow
    }

    /// Polled once per frame by the host loop.
    fn needs_redraw(&self) -> bool {
        self.node().wants_redraw()
    }

    // Capabilities. Present means "this widget can do X".

    fn children(&self) -> Option<&ChildList> {
        None
    }

    /// Translation from the node's padded box to its content (scroll offset).
    fn content_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn labeled(&self) -> Option<&dyn Labeled> {
        None
    }

    fn labeled_mut(&mut self) -> Option<&mut dyn Labeled> {
        None
    }

    /// Overlays set this once they are done (a menu item was picked, say);
    /// the popup host then tears them down.
    fn close_requested(&self) -> bool {
        false
    }
}

/// Where a composite puts its label relative to its action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelPos {
    None,
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl LabelPos {
    pub fn side_by_side(self) -> bool {
        matches!(self, LabelPos::Left | LabelPos::Right)
    }

    pub fn stacked(self) -> bool {
        matches!(self, LabelPos::Top | LabelPos::Bottom)
    }
}

/// Capability of label+action composites, used to align label columns.
pub trait Labeled {
    fn label_pos(&self) -> LabelPos;
    /// Measured label extent, ignoring any pin.
    fn measured_label(&self) -> Size;
    /// Pins the label extent, or releases the pin with `None`.
    fn pin_label(&mut self, size: Option<Size>);
}

/// Shared handle to a node. The tree owns nodes through these; identity is
/// pointer identity.
#[derive(Clone)]
pub struct NodeRef {
    id: NodeId,
    inner: Arc<Mutex<dyn Widget>>,
}

impl std::fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef").field("id", &self.id).finish()
    }
}

impl NodeRef {
    pub fn new(w: impl Widget + 'static) -> Self {
        Handle::new(w).into()
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn lock(&self) -> MutexGuard<'_, dyn Widget> {
        self.inner.lock()
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }

    /// Arranges the node if anything below it changed.
    pub fn layout(&self) -> bool {
        let mut w = self.lock();
        if w.changed() {
            w.arrange();
            true
        } else {
            false
        }
    }
}

/// Typed handle, for callers that keep talking to a concrete widget after
/// handing it to the tree.
pub struct Handle<W: Widget> {
    id: NodeId,
    inner: Arc<Mutex<W>>,
}

impl<W: Widget> Clone for Handle<W> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: self.inner.clone(),
        }
    }
}

impl<W: Widget + 'static> Handle<W> {
    pub fn new(w: W) -> Self {
        Self {
            id: w.node().id(),
            inner: Arc::new(Mutex::new(w)),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.inner.lock()
    }

    pub fn node_ref(&self) -> NodeRef {
        let inner: Arc<Mutex<dyn Widget>> = self.inner.clone();
        NodeRef { id: self.id, inner }
    }
}

impl<W: Widget + 'static> From<Handle<W>> for NodeRef {
    fn from(h: Handle<W>) -> Self {
        h.node_ref()
    }
}

impl<W: Widget + 'static> From<&Handle<W>> for NodeRef {
    fn from(h: &Handle<W>) -> Self {
        h.node_ref()
    }
}
