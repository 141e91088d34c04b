//! # Containers
//!
//! A container owns an ordered list of children. The list lives behind its
//! own lock inside a cloneable [`ChildList`] handle, so structural changes
//! (`add` / `remove` / `clear`) may be issued from anywhere, including from a
//! callback running inside a dispatch over the same list.
//!
//! The list lock is held only while the vector itself is read or written.
//! Traversals (`hit_test`, `dispatch`, `draw`, `changed`) take a snapshot of
//! the handles and release the lock before calling into any child.
//!
//! Child order is draw order, event priority order, and for ordered
//! containers the placement order along the primary axis.

use std::sync::Arc;

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::{
    InputEvent, Node, NodeId, NodeMeta, NodeRef, Padding, Rect, Response, Scene, Size, Vec2,
    Widget,
};

pub type Snapshot = SmallVec<[NodeRef; 8]>;

#[derive(Clone)]
pub struct ChildList {
    owner: Arc<NodeMeta>,
    link: crate::ParentLink,
    items: Arc<Mutex<Vec<NodeRef>>>,
}

impl std::fmt::Debug for ChildList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildList")
            .field("owner", &self.owner.id())
            .field("len", &self.len())
            .finish()
    }
}

impl ChildList {
    pub fn new(owner: &Node) -> Self {
        Self {
            owner: owner.meta().clone(),
            link: owner.link(),
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn owner_id(&self) -> NodeId {
        self.owner.id()
    }

    /// Appends `n` and adopts it. Returns false if `n` is already a child
    /// here, or already belongs to another container.
    pub fn add(&self, n: impl Into<NodeRef>) -> bool {
        let n = n.into();
        if self.contains(n.id()) {
            return false;
        }
        {
            let mut w = n.lock();
            if let Some(p) = w.node().parent() {
                log::warn!(
                    "add: node {} already belongs to {}; remove it there first",
                    n.id(),
                    p.id()
                );
                return false;
            }
            w.node_mut().set_parent(Some(self.link.clone()));
        }
        self.items.lock().push(n);
        self.owner.mark_dirty();
        true
    }

    /// Detaches the child with `id`, handing ownership back to the caller.
    pub fn remove(&self, id: NodeId) -> Option<NodeRef> {
        let removed = {
            let mut items = self.items.lock();
            let i = items.iter().position(|c| c.id() == id)?;
            items.remove(i)
        };
        removed.lock().node_mut().set_parent(None);
        self.owner.mark_dirty();
        Some(removed)
    }

    /// Empties the list. With `erase` the children are dropped here;
    /// otherwise the detached handles are returned.
    pub fn clear(&self, erase: bool) -> Vec<NodeRef> {
        let taken = std::mem::take(&mut *self.items.lock());
        self.owner.mark_dirty();
        for c in &taken {
            c.lock().node_mut().set_parent(None);
        }
        if erase {
            log::debug!("clear: erasing {} children of {}", taken.len(), self.owner.id());
            return Vec::new();
        }
        taken
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.items.lock().iter().any(|c| c.id() == id)
    }

    pub fn get(&self, i: usize) -> Option<NodeRef> {
        self.items.lock().get(i).cloned()
    }

    /// Copy of the handles; the lock is released on return.
    pub fn snapshot(&self) -> Snapshot {
        self.items.lock().iter().cloned().collect()
    }

    /// True if any child reports `changed()`.
    pub fn changed(&self) -> bool {
        self.snapshot().iter().any(|c| c.lock().changed())
    }

    /// Re-arranges every child that reports `changed()`.
    pub fn arrange_changed(&self) {
        for c in self.snapshot() {
            let mut w = c.lock();
            if w.changed() {
                w.arrange();
            }
        }
    }

    /// Union of the visible children's rects, grown by `pad`. Empty lists
    /// give a rect of just the padding.
    pub fn content_bounds(&self, pad: Padding) -> Rect {
        let mut bounds: Option<Rect> = None;
        for c in self.snapshot() {
            let w = c.lock();
            if !w.node().is_visible() {
                continue;
            }
            let r = w.node().rect();
            bounds = Some(match bounds {
                Some(b) => b.union(&r),
                None => r,
            });
        }
        match bounds {
            Some(b) => Rect::new(
                b.x - pad.left,
                b.y - pad.top,
                b.w + pad.left + pad.right,
                b.h + pad.top + pad.bottom,
            ),
            None => Rect::new(0.0, 0.0, pad.left + pad.right, pad.top + pad.bottom),
        }
    }

    /// Deepest eligible node at `p` (content space). Child containers are
    /// tried before leaves; within each group list order wins.
    pub fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        let snap = self.snapshot();
        for containers in [true, false] {
            for c in &snap {
                let w = c.lock();
                if !w.node().is_eligible() || w.children().is_some() != containers {
                    continue;
                }
                if let Some(id) = w.hit_test(p) {
                    return Some(id);
                }
            }
        }
        None
    }

    /// First-match delivery: the first eligible child under the pointer
    /// that uses the event ends propagation.
    pub fn dispatch(&self, ev: &InputEvent) -> Response {
        for c in self.snapshot() {
            let mut w = c.lock();
            if !w.node().is_eligible() || w.hit_test(ev.pos).is_none() {
                continue;
            }
            if w.handle_event(ev).is_used() {
                log::trace!("dispatch: {:?} used by {}", ev.kind, c.id());
                return Response::Used;
            }
        }
        Response::Ignored
    }

    pub fn draw(&self, scene: &mut Scene, origin: Vec2) {
        for c in self.snapshot() {
            let mut w = c.lock();
            if w.node().is_visible() {
                w.draw(scene, origin);
            }
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.snapshot().iter().any(|c| c.lock().needs_redraw())
    }

    /// Finds the descendant that asked for pointer capture during the last
    /// dispatch, clearing the request. Returns it with its parent origin.
    pub fn take_capture(&self, origin: Vec2) -> Option<(NodeRef, Vec2)> {
        for c in self.snapshot() {
            let nested = {
                let w = c.lock();
                if w.node().take_capture() {
                    return Some((c.clone(), origin));
                }
                w.children()
                    .map(|ch| (ch.clone(), origin + w.node().pos - w.content_offset()))
            };
            if let Some((ch, o)) = nested
                && let Some(hit) = ch.take_capture(o)
            {
                return Some(hit);
            }
        }
        None
    }

    /// Finds a descendant by id, with the absolute origin of its parent's
    /// content space (`origin` is this list's own content origin).
    pub fn find(&self, id: NodeId, origin: Vec2) -> Option<(NodeRef, Vec2)> {
        for c in self.snapshot() {
            if c.id() == id {
                return Some((c, origin));
            }
            let nested = {
                let w = c.lock();
                w.children()
                    .map(|ch| (ch.clone(), origin + w.node().pos - w.content_offset()))
            };
            if let Some((ch, o)) = nested
                && let Some(hit) = ch.find(id, o)
            {
                return Some(hit);
            }
        }
        None
    }
}

/// Hit-test for any widget owning a child list: outside ⇒ none; inside ⇒
/// the deepest child hit, else the widget itself.
pub fn hit_test_container(w: &dyn Widget, p: Vec2) -> Option<NodeId> {
    let n = w.node();
    if !n.is_visible() || !n.rect().contains(p) {
        return None;
    }
    let local = p - n.pos + w.content_offset();
    w.children()
        .and_then(|ch| ch.hit_test(local))
        .or(Some(n.id()))
}

/// Forwards an event to the children of `w`, rebased into its content space.
pub fn dispatch_container(w: &dyn Widget, ev: &InputEvent) -> Response {
    let n = w.node();
    match w.children() {
        Some(ch) => ch.dispatch(&ev.rebased(n.pos - w.content_offset())),
        None => Response::Ignored,
    }
}

/// Free-form container: children keep the positions they were given.
pub struct Container {
    node: Node,
    children: ChildList,
    content: Rect,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    pub fn new() -> Self {
        let node = Node::new();
        let children = ChildList::new(&node);
        Self {
            node,
            children,
            content: Rect::default(),
        }
    }

    pub fn list(&self) -> &ChildList {
        &self.children
    }

    pub fn add(&self, n: impl Into<NodeRef>) -> bool {
        self.children.add(n)
    }

    pub fn remove(&self, id: NodeId) -> Option<NodeRef> {
        self.children.remove(id)
    }

    pub fn clear(&self, erase: bool) -> Vec<NodeRef> {
        self.children.clear(erase)
    }

    pub fn content_rect(&self) -> Rect {
        self.content
    }
}

impl Widget for Container {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn changed(&self) -> bool {
        self.node.is_dirty() || self.children.changed()
    }

    fn arrange(&mut self) {
        self.children.arrange_changed();
        self.content = self.children.content_bounds(self.node.padding());
        let mut req = self.node.request();
        let auto = self.node.autoscale();
        if auto.on(crate::Axis::Horizontal) {
            req.width = req.width.max(self.content.right());
        }
        if auto.on(crate::Axis::Vertical) {
            req.height = req.height.max(self.content.bottom());
        }
        self.node.set_request(req);
        let min = self.min_size();
        self.node.finalize(min);
    }

    fn min_size(&self) -> Size {
        self.node.min()
    }

    fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        hit_test_container(self, p)
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        dispatch_container(self, ev)
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        let r = self.node.rect().translate(origin);
        scene.push_clip(r);
        self.children.draw(scene, r.pos());
        scene.pop_clip();
        self.node.clear_damage();
    }

    fn needs_redraw(&self) -> bool {
        self.node.wants_redraw() || self.children.needs_redraw()
    }

    fn children(&self) -> Option<&ChildList> {
        Some(&self.children)
    }
}
