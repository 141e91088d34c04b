//! Label + action composites, and groups that line their labels up.

use std::sync::Arc;

use trellis_core::*;

use crate::Linear;

/// A text label beside, above or below a single action widget.
///
/// The composite owns the action as its only child. Its minimum is the
/// label extent (or the pinned one), the gap, and the action's minimum,
/// combined along the axis implied by [`LabelPos`].
pub struct LabeledWidget {
    node: Node,
    children: ChildList,
    action: NodeId,
    text: String,
    pos: LabelPos,
    gap: f32,
    text_align: Align,
    pinned: Option<Size>,
    measure: Arc<dyn TextMeasure>,
    label_rect: Rect,
}

impl LabeledWidget {
    pub fn new(
        text: impl Into<String>,
        action: impl Into<NodeRef>,
        measure: Arc<dyn TextMeasure>,
    ) -> Self {
        let action = action.into();
        let mut node = Node::new();
        node.set_padding(Padding::ZERO);
        let children = ChildList::new(&node);
        let id = action.id();
        children.add(action);
        Self {
            node,
            children,
            action: id,
            text: text.into(),
            pos: LabelPos::Left,
            gap: -1.0,
            text_align: Align::LEFT,
            pinned: None,
            measure,
            label_rect: Rect::default(),
        }
    }

    pub fn action(&self) -> Option<NodeRef> {
        self.children.get(0)
    }

    pub fn action_id(&self) -> NodeId {
        self.action
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.touch();
    }

    pub fn set_label_pos(&mut self, pos: LabelPos) {
        if self.pos != pos {
            self.pos = pos;
            self.touch();
        }
    }

    /// Label-to-action gap; negative means "use the metrics".
    pub fn gap(&self) -> f32 {
        if self.gap < 0.0 {
            metrics().label_gap
        } else {
            self.gap
        }
    }

    pub fn set_gap(&mut self, gap: f32) {
        if self.gap != gap {
            self.gap = gap;
            self.touch();
        }
    }

    /// How the text sits inside its label region.
    pub fn set_text_align(&mut self, a: Align) {
        self.text_align = a;
        self.node.mark_damaged();
    }

    pub fn label_rect(&self) -> Rect {
        self.label_rect
    }

    fn touch(&mut self) {
        self.node.mark_dirty();
        self.node.mark_parent_dirty();
    }

    fn label_size(&self) -> Size {
        match self.pos {
            LabelPos::None => Size::ZERO,
            _ => self.pinned.unwrap_or_else(|| self.measured_label()),
        }
    }

    fn gap_or_zero(&self) -> f32 {
        if self.pos == LabelPos::None {
            0.0
        } else {
            self.gap()
        }
    }
}

impl Labeled for LabeledWidget {
    fn label_pos(&self) -> LabelPos {
        self.pos
    }

    fn measured_label(&self) -> Size {
        self.measure.measure(&self.text, metrics().font_size)
    }

    fn pin_label(&mut self, size: Option<Size>) {
        if self.pinned != size {
            self.pinned = size;
            self.node.mark_dirty();
        }
    }
}

impl Widget for LabeledWidget {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn changed(&self) -> bool {
        self.node.is_dirty() || self.children.changed()
    }

    fn min_size(&self) -> Size {
        let label = self.label_size();
        let gap = self.gap_or_zero();
        let action = self
            .action()
            .map(|a| a.lock().min_size())
            .unwrap_or(Size::ZERO);
        let body = match self.pos {
            LabelPos::None => action,
            LabelPos::Left | LabelPos::Right => Size::new(
                label.width + gap + action.width,
                label.height.max(action.height),
            ),
            LabelPos::Top | LabelPos::Bottom => Size::new(
                label.width.max(action.width),
                label.height + gap + action.height,
            ),
        };
        let pad = self.node.padding().total();
        Size::new(body.width + pad.width, body.height + pad.height).max(self.node.min())
    }

    fn arrange(&mut self) {
        self.children.arrange_changed();
        let pad = self.node.padding();
        let total = self.node.request().max(self.min_size());
        let inner = Rect::new(
            pad.left,
            pad.top,
            (total.width - pad.left - pad.right).max(0.0),
            (total.height - pad.top - pad.bottom).max(0.0),
        );
        let l = self.label_size();
        let gap = self.gap_or_zero();

        let (label, action) = match self.pos {
            LabelPos::None => (Rect::new(inner.x, inner.y, 0.0, 0.0), inner),
            LabelPos::Left => (
                Rect::new(inner.x, inner.y, l.width, inner.h),
                Rect::new(inner.x + l.width + gap, inner.y, inner.w - l.width - gap, inner.h),
            ),
            LabelPos::Right => (
                Rect::new(inner.right() - l.width, inner.y, l.width, inner.h),
                Rect::new(inner.x, inner.y, inner.w - l.width - gap, inner.h),
            ),
            LabelPos::Top => (
                Rect::new(inner.x, inner.y, inner.w, l.height),
                Rect::new(inner.x, inner.y + l.height + gap, inner.w, inner.h - l.height - gap),
            ),
            LabelPos::Bottom => (
                Rect::new(inner.x, inner.bottom() - l.height, inner.w, l.height),
                Rect::new(inner.x, inner.y, inner.w, inner.h - l.height - gap),
            ),
        };
        self.label_rect = label;

        if let Some(a) = self.action() {
            let mut w = a.lock();
            w.node_mut().set_pos(action.pos());
            w.node_mut().set_request(action.size());
            if w.changed() {
                w.arrange();
            }
        }
        self.node.finalize(total);
    }

    fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        hit_test_container(self, p)
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        dispatch_container(self, ev)
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        let at = origin + self.node.pos;
        if self.pos != LabelPos::None {
            let font = metrics().font_size;
            let t = self.measured_label();
            let lr = self.label_rect.translate(at);
            let x = self.text_align.place(Axis::Horizontal, lr.x, lr.w, t.width);
            let y = Align::empty().place(Axis::Vertical, lr.y, lr.h, t.height);
            let color = if self.node.is_active() {
                theme().on_surface
            } else {
                theme().disabled
            };
            scene.text(Rect::new(x, y, t.width, t.height), self.text.clone(), color, font);
        }
        self.children.draw(scene, at);
        self.node.clear_damage();
    }

    fn needs_redraw(&self) -> bool {
        self.node.wants_redraw() || self.children.needs_redraw()
    }

    fn children(&self) -> Option<&ChildList> {
        Some(&self.children)
    }

    fn labeled(&self) -> Option<&dyn Labeled> {
        Some(self)
    }

    fn labeled_mut(&mut self) -> Option<&mut dyn Labeled> {
        Some(self)
    }
}

/// Vertical stack of composites whose side labels share one width.
///
/// Before laying out, the group measures every side-by-side child label and
/// pins them all to the widest, so the actions line up in a column.
pub struct LabelGroup {
    inner: Linear,
}

impl Default for LabelGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelGroup {
    pub fn new() -> Self {
        let mut inner = Linear::column();
        inner.node_mut().set_align(Align::FILL_H | Align::TOP);
        Self { inner }
    }

    pub fn list(&self) -> &ChildList {
        self.inner.list()
    }

    pub fn add(&self, n: impl Into<NodeRef>) -> bool {
        self.inner.add(n)
    }

    pub fn linear_mut(&mut self) -> &mut Linear {
        &mut self.inner
    }

    /// Widest measured side label among the visible children.
    pub fn label_width(&self) -> f32 {
        crate::visible(self.inner.list())
            .iter()
            .filter_map(|c| {
                let w = c.lock();
                w.labeled()
                    .filter(|l| l.label_pos().side_by_side())
                    .map(|l| l.measured_label().width)
            })
            .fold(0.0, f32::max)
    }

    fn pin_labels(&self) {
        let width = self.label_width();
        for c in self.inner.list().snapshot() {
            let mut w = c.lock();
            if let Some(l) = w.labeled_mut() {
                let pin = l.label_pos().side_by_side().then(|| {
                    let m = l.measured_label();
                    Size::new(width, m.height)
                });
                l.pin_label(pin);
            }
        }
    }
}

impl Widget for LabelGroup {
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
        self.pin_labels();
        self.inner.arrange();
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
