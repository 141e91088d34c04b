//! # Ordered layout
//!
//! [`Linear`] places its visible children one after another along a primary
//! axis, separated by `spacing`, inside its padding. The cross axis follows
//! the container's alignment flags: leading, trailing, centered, or stretched
//! when both edges are set.
//!
//! One arrange pass runs these steps in order:
//!
//! 1. arrange every child that reports `changed()`;
//! 2. align: place children along the primary axis, packing the run toward
//!    the far edge or the center when there is slack, and place each child on
//!    the cross axis with `Align::place`;
//! 3. fill: if the cross axis is stretched, give every child the available
//!    cross extent and re-arrange it;
//! 4. record the content rect (children's union plus padding);
//! 5. autoscale: grow the assigned size to cover the content;
//! 6. ([`Aligner`] only) stretch the resizable child along the primary axis
//!    to absorb the remaining space, then re-align;
//! 7. finalize: size = max(assigned, min_size, explicit min).
//!
//! ```rust
//! use trellis_core::*;
//! use trellis_ui::{Block, Linear};
//!
//! let mut col = Linear::column();
//! col.node_mut().set_padding(Padding::ZERO);
//! col.set_spacing(2.0);
//! col.add(NodeRef::new(Block::new(Size::new(10.0, 5.0))));
//! col.add(NodeRef::new(Block::new(Size::new(20.0, 5.0))));
//! assert_eq!(col.min_size(), Size::new(20.0, 12.0));
//! ```

use trellis_core::*;

use crate::visible;

pub struct Linear {
    node: Node,
    axis: Axis,
    spacing: f32,
    children: ChildList,
    content: Rect,
}

impl Linear {
    pub fn new(axis: Axis) -> Self {
        let mut node = Node::new();
        node.set_align(Align::LEFT | Align::TOP);
        node.set_autoscale(Autoscale::BOTH);
        let children = ChildList::new(&node);
        Self {
            node,
            axis,
            spacing: -1.0,
            children,
            content: Rect::default(),
        }
    }

    pub fn row() -> Self {
        Self::new(Axis::Horizontal)
    }

    pub fn column() -> Self {
        Self::new(Axis::Vertical)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Gap between consecutive children; negative means "use the metrics".
    pub fn spacing(&self) -> f32 {
        if self.spacing < 0.0 {
            metrics().spacing
        } else {
            self.spacing
        }
    }

    pub fn set_spacing(&mut self, s: f32) {
        if self.spacing != s {
            self.spacing = s;
            self.node.mark_dirty();
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

    /// Assigned size minus padding.
    pub(crate) fn inner(&self) -> Size {
        let req = self.node.request();
        let pad = self.node.padding().total();
        Size::new(
            (req.width - pad.width).max(0.0),
            (req.height - pad.height).max(0.0),
        )
    }

    /// Cross extent children are placed in: the larger of the assigned
    /// inner extent and the widest child minimum.
    fn cross_avail(&self, kids: &[NodeRef]) -> f32 {
        let cross = self.axis.cross();
        kids.iter()
            .map(|c| c.lock().min_size().along(cross))
            .fold(self.inner().along(cross), f32::max)
    }

    /// Steps 1 through 5.
    pub(crate) fn layout_children(&mut self) {
        self.children.arrange_changed();
        self.align_pass();
        if self.fill_pass() {
            self.align_pass();
        }
        self.update_content();
        self.autoscale();
    }

    /// Step 7.
    pub(crate) fn finish(&mut self) {
        let min = self.min_size();
        self.node.finalize(min);
    }

    pub(crate) fn align_pass(&mut self) {
        let axis = self.axis;
        let cross = axis.cross();
        let pad = self.node.padding();
        let align = self.node.align();
        let spacing = self.spacing();
        let kids = visible(&self.children);
        if kids.is_empty() {
            return;
        }

        let run = kids
            .iter()
            .map(|c| c.lock().node().size().along(axis))
            .sum::<f32>()
            + spacing * (kids.len() - 1) as f32;
        let slack = self.inner().along(axis) - run;
        let mut cursor = pad.leading(axis);
        if slack > 0.0 && !align.leading(axis) {
            cursor += if align.trailing(axis) { slack } else { slack * 0.5 };
        }

        let avail = self.cross_avail(&kids);
        for c in &kids {
            let mut w = c.lock();
            let s = w.node().size();
            let mut p = Vec2::ZERO;
            p.set_along(axis, cursor);
            p.set_along(cross, align.place(cross, pad.leading(cross), avail, s.along(cross)));
            w.node_mut().set_pos(p);
            cursor += s.along(axis) + spacing;
        }
    }

    /// Returns true if any child was re-arranged.
    fn fill_pass(&mut self) -> bool {
        let cross = self.axis.cross();
        if !self.node.align().fills(cross) {
            return false;
        }
        let kids = visible(&self.children);
        let avail = self.cross_avail(&kids);
        let mut any = false;
        for c in &kids {
            let mut w = c.lock();
            let target = avail.max(w.min_size().along(cross));
            w.node_mut().set_request_along(cross, target);
            if w.changed() {
                w.arrange();
                any = true;
            }
        }
        any
    }

    pub(crate) fn update_content(&mut self) {
        self.content = self.children.content_bounds(self.node.padding());
    }

    fn autoscale(&mut self) {
        let auto = self.node.autoscale();
        let mut req = self.node.request();
        if auto.on(Axis::Horizontal) {
            req.width = req.width.max(self.content.right());
        }
        if auto.on(Axis::Vertical) {
            req.height = req.height.max(self.content.bottom());
        }
        self.node.set_request(req);
    }
}

impl Widget for Linear {
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
        self.layout_children();
        self.finish();
    }

    /// Sum of the visible children's minimums along the primary axis plus
    /// spacing, the largest on the cross axis, both plus padding.
    fn min_size(&self) -> Size {
        let axis = self.axis;
        let cross = axis.cross();
        let pad = self.node.padding();
        let kids = visible(&self.children);
        let mut primary = 0.0;
        let mut cross_max: f32 = 0.0;
        for c in &kids {
            let m = c.lock().min_size();
            primary += m.along(axis);
            cross_max = cross_max.max(m.along(cross));
        }
        if !kids.is_empty() {
            primary += self.spacing() * (kids.len() - 1) as f32;
        }
        Size::from_axes(axis, primary + pad.sum(axis), cross_max + pad.sum(cross))
            .max(self.node.min())
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

/// Ordered container with one resizable child that absorbs whatever space
/// along the primary axis the others leave over.
///
/// The stretch only applies when the container fills its primary axis
/// (both edges set). Unlike a plain [`Linear`] it does not autoscale along
/// the primary axis, so it can shrink back when its assigned size does.
pub struct Aligner {
    inner: Linear,
    resizable: Option<NodeId>,
}

impl Aligner {
    pub fn new(axis: Axis) -> Self {
        let mut inner = Linear::new(axis);
        inner.node_mut().set_align(Align::FILL);
        inner.node_mut().set_autoscale(match axis {
            Axis::Horizontal => Autoscale::HEIGHT,
            Axis::Vertical => Autoscale::WIDTH,
        });
        Self {
            inner,
            resizable: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.inner.axis()
    }

    pub fn linear(&self) -> &Linear {
        &self.inner
    }

    pub fn linear_mut(&mut self) -> &mut Linear {
        &mut self.inner
    }

    pub fn list(&self) -> &ChildList {
        self.inner.list()
    }

    pub fn add(&self, n: impl Into<NodeRef>) -> bool {
        self.inner.add(n)
    }

    pub fn set_spacing(&mut self, s: f32) {
        self.inner.set_spacing(s);
    }

    pub fn resizable(&self) -> Option<NodeId> {
        self.resizable
    }

    /// Marks the child `id` as the one that stretches.
    pub fn set_resizable(&mut self, id: Option<NodeId>) {
        if self.resizable != id {
            if let Some(id) = id
                && !self.inner.list().contains(id)
            {
                log::warn!("set_resizable: {} is not a child of {}", id, self.inner.node().id());
            }
            self.resizable = id;
            self.inner.node().mark_dirty();
        }
    }

    /// Step 6.
    fn stretch_resizable(&mut self) {
        let axis = self.inner.axis();
        let Some(rid) = self.resizable else { return };
        if !self.inner.node().align().fills(axis) {
            return;
        }
        let kids = visible(self.inner.list());
        let Some(target) = kids.iter().find(|c| c.id() == rid) else {
            return;
        };
        let others: f32 = kids
            .iter()
            .filter(|c| c.id() != rid)
            .map(|c| c.lock().node().size().along(axis))
            .sum();
        let gaps = self.inner.spacing() * kids.len().saturating_sub(1) as f32;
        let avail = self.inner.inner().along(axis);
        {
            let mut w = target.lock();
            let len = (avail - others - gaps).max(w.min_size().along(axis));
            w.node_mut().set_request_along(axis, len);
            if w.changed() {
                w.arrange();
            }
        }
        self.inner.align_pass();
        self.inner.update_content();
    }
}

impl Widget for Aligner {
    fn node(&self) -> &Node {
        self.inner.node()
    }
    fn node_mut(&mut self) -> &mut Node {
        self.inner.node_mut()
    }

    fn changed(&self) -> bool {
        self.inner.changed()
    }

    fn arrange(&mut self) {
        self.inner.layout_children();
        self.stretch_resizable();
        self.inner.finish();
    }

    fn min_size(&self) -> Size {
        self.inner.min_size()
    }

    fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        hit_test_container(self, p)
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        dispatch_container(self, ev)
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        self.inner.draw(scene, origin);
    }

    fn needs_redraw(&self) -> bool {
        self.inner.needs_redraw()
    }

    fn children(&self) -> Option<&ChildList> {
        self.inner.children()
    }
}
