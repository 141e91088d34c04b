//! # Scroll model
//!
//! Trellis separates the *scroll state* (offset, extents, scrollbar
//! interaction, fade timer) from the *scroll view* that clips and translates
//! its content.
//!
//! - `ScrollState`: per-axis offset clamped to `[0, content - viewport]`.
//!   When the content fits on an axis, the offset is whatever the alignment
//!   implies instead: 0 for leading, `content - viewport` (negative) for
//!   trailing, half of that for centered.
//! - `ScrollView`: a container with one content child. Wheel events that
//!   no nested view consumed scroll it; its scrollbar thumbs can be dragged.
//!
//! `scroll_immediate` consumes a requested delta and returns the leftover
//! motion, which an outer view can use for nested scrolling.
//!
//! Scrollbars show while there has been recent activity. Every wheel step,
//! drag or programmatic scroll refills the activity timer; each drawn frame
//! with no hover or drag decays it. The timer only affects visibility.
//!
//! ```rust
//! use trellis_core::*;
//! use trellis_ui::ScrollState;
//!
//! let mut s = ScrollState::new();
//! s.set_extent(Rect::new(0.0, 0.0, 100.0, 100.0), Size::new(100.0, 300.0));
//! s.set_offset(Vec2::new(0.0, 1000.0));
//! assert_eq!(s.offset().y, 200.0);
//! ```

use trellis_core::*;

/// Activity lost per idle frame.
const FADE_STEP: f32 = 1.0 / 30.0;
/// Shortest thumb, in dp.
const MIN_THUMB_DP: f32 = 16.0;

#[derive(Clone, Copy, Debug)]
struct ThumbDrag {
    axis: Axis,
    start: f32,
    start_offset: f32,
}

#[derive(Clone, Debug)]
pub struct ScrollState {
    offset: Vec2,
    viewport: Rect,
    content: Size,
    align: Align,
    hover: Option<Axis>,
    drag: Option<ThumbDrag>,
    recent: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport: Rect::default(),
            content: Size::ZERO,
            align: Align::LEFT | Align::TOP,
            hover: None,
            drag: None,
            recent: 0.0,
        }
    }

    /// Alignment used on axes where the content fits.
    pub fn set_align(&mut self, align: Align) {
        self.align = align;
        self.clamp();
    }

    pub fn set_extent(&mut self, viewport: Rect, content: Size) {
        self.viewport = viewport;
        self.content = content;
        self.clamp();
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn content(&self) -> Size {
        self.content
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_offset(&mut self, off: Vec2) {
        self.offset = off;
        self.clamp();
        self.touch();
    }

    pub fn scrollable(&self, axis: Axis) -> bool {
        self.content.along(axis) > self.viewport.extent(axis)
    }

    pub fn max_offset(&self, axis: Axis) -> f32 {
        (self.content.along(axis) - self.viewport.extent(axis)).max(0.0)
    }

    fn clamp(&mut self) {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let v = if self.scrollable(axis) {
                self.offset.along(axis).clamp(0.0, self.max_offset(axis))
            } else {
                let slack = self.content.along(axis) - self.viewport.extent(axis);
                match (self.align.leading(axis), self.align.trailing(axis)) {
                    (true, _) => 0.0,
                    (false, true) => slack,
                    (false, false) => slack * 0.5,
                }
            };
            self.offset.set_along(axis, v);
        }
    }

    /// Consumes `d` pixels on `axis`, clamped to bounds, and returns the
    /// leftover.
    pub fn scroll_immediate(&mut self, axis: Axis, d: f32) -> f32 {
        if !self.scrollable(axis) {
            return d;
        }
        let before = self.offset.along(axis);
        let after = (before + d).clamp(0.0, self.max_offset(axis));
        self.offset.set_along(axis, after);
        if after != before {
            self.touch();
        }
        d - (after - before)
    }

    /// One wheel event; positive y moves the content up. Returns true if
    /// the offset moved.
    pub fn wheel(&mut self, notches: Vec2) -> bool {
        let step = metrics().wheel_step;
        let before = self.offset;
        self.scroll_immediate(Axis::Vertical, -notches.y * step);
        self.scroll_immediate(Axis::Horizontal, -notches.x * step);
        self.offset != before
    }

    pub fn touch(&mut self) {
        self.recent = 1.0;
    }

    /// Scrollbar opacity in `[0, 1]`.
    pub fn visibility(&self) -> f32 {
        self.recent
    }

    /// Called once per drawn frame. Returns true while the bars are still
    /// fading, i.e. another frame is wanted.
    pub fn tick_frame(&mut self) -> bool {
        if self.hover.is_some() || self.drag.is_some() {
            self.recent = 1.0;
            return false;
        }
        self.recent = (self.recent - FADE_STEP).max(0.0);
        self.recent > 0.0
    }

    fn thickness(&self, axis: Axis) -> f32 {
        let t = metrics().scrollbar_thickness;
        let hot = self.hover == Some(axis) || self.drag.is_some_and(|d| d.axis == axis);
        if hot { t * 1.5 } else { t }
    }

    /// Track along `axis`, hugging the far edge of the viewport.
    pub fn track_rect(&self, axis: Axis) -> Option<Rect> {
        if !self.scrollable(axis) {
            return None;
        }
        let vp = self.viewport;
        let t = self.thickness(axis);
        Some(match axis {
            Axis::Vertical => Rect::new(vp.right() - t, vp.y, t, vp.h),
            Axis::Horizontal => Rect::new(vp.x, vp.bottom() - t, vp.w, t),
        })
    }

    pub fn thumb_rect(&self, axis: Axis) -> Option<Rect> {
        let track = self.track_rect(axis)?;
        let view = self.viewport.extent(axis);
        let len = track.extent(axis);
        let thumb = (len * view / self.content.along(axis))
            .max(dp_to_px(MIN_THUMB_DP))
            .min(len);
        let t = self.offset.along(axis) / self.max_offset(axis);
        let at = track.start(axis) + t * (len - thumb);
        Some(match axis {
            Axis::Vertical => Rect::new(track.x, at, track.w, thumb),
            Axis::Horizontal => Rect::new(at, track.y, thumb, track.h),
        })
    }

    pub fn thumb_at(&self, p: Vec2) -> Option<Axis> {
        [Axis::Vertical, Axis::Horizontal]
            .into_iter()
            .find(|&a| self.thumb_rect(a).is_some_and(|r| r.contains(p)))
    }

    /// Updates thumb hover. Returns true if it changed.
    pub fn pointer_move(&mut self, p: Vec2) -> bool {
        let hover = self.thumb_at(p);
        let changed = hover != self.hover;
        self.hover = hover;
        if changed && hover.is_some() {
            self.touch();
        }
        changed
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts a thumb drag if `p` is on a thumb.
    pub fn begin_drag(&mut self, p: Vec2) -> bool {
        let Some(axis) = self.thumb_at(p) else {
            return false;
        };
        self.drag = Some(ThumbDrag {
            axis,
            start: p.along(axis),
            start_offset: self.offset.along(axis),
        });
        self.touch();
        true
    }

    /// Maps the pointer travel since `begin_drag` to content travel by the
    /// content/track ratio.
    pub fn drag_to(&mut self, p: Vec2) {
        let Some(d) = self.drag else { return };
        let track = self.viewport.extent(d.axis);
        if track <= 0.0 {
            return;
        }
        let ratio = self.content.along(d.axis) / track;
        let off = d.start_offset + (p.along(d.axis) - d.start) * ratio;
        self.offset
            .set_along(d.axis, off.clamp(0.0, self.max_offset(d.axis)));
        self.touch();
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }
}

/// Clipping container with one content child.
///
/// Axes listed in `scroll_axes` scroll; on the others the content is
/// stretched to the viewport.
pub struct ScrollView {
    node: Node,
    children: ChildList,
    state: ScrollState,
    axes: Autoscale,
}

impl ScrollView {
    pub fn new(content: impl Into<NodeRef>) -> Self {
        Self::with_axes(content, Autoscale::HEIGHT)
    }

    pub fn with_axes(content: impl Into<NodeRef>, axes: Autoscale) -> Self {
        let node = Node::new();
        let children = ChildList::new(&node);
        children.add(content);
        Self {
            node,
            children,
            state: ScrollState::new(),
            axes,
        }
    }

    pub fn content(&self) -> Option<NodeRef> {
        self.children.get(0)
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ScrollState {
        self.node.mark_damaged();
        &mut self.state
    }

    pub fn set_offset(&mut self, off: Vec2) {
        self.state.set_offset(off);
        self.node.mark_damaged();
    }

    fn viewport(&self) -> Rect {
        let pad = self.node.padding();
        let s = self.node.request().max(self.node.min());
        Rect::new(
            pad.left,
            pad.top,
            (s.width - pad.left - pad.right).max(0.0),
            (s.height - pad.top - pad.bottom).max(0.0),
        )
    }
}

impl Widget for ScrollView {
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
        let pad = self.node.padding().total();
        self.node.min().max(pad)
    }

    fn arrange(&mut self) {
        let vp = self.viewport();
        let mut content = Size::ZERO;
        if let Some(c) = self.content() {
            let mut w = c.lock();
            for axis in [Axis::Horizontal, Axis::Vertical] {
                if !self.axes.on(axis) {
                    let len = vp.extent(axis).max(w.min_size().along(axis));
                    w.node_mut().set_request_along(axis, len);
                }
            }
            w.node_mut().set_pos(vp.pos());
            if w.changed() {
                w.arrange();
            }
            content = w.node().size();
        }
        self.state.set_extent(vp, content);
        let min = self.min_size();
        self.node.finalize(min);
    }

    fn content_offset(&self) -> Vec2 {
        self.state.offset()
    }

    fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        let n = &self.node;
        if !n.is_visible() || !n.rect().contains(p) {
            return None;
        }
        let local = p - n.pos;
        if self.state.thumb_at(local).is_some() || !self.state.viewport().contains(local) {
            return Some(n.id());
        }
        self.children
            .hit_test(local + self.state.offset())
            .or(Some(n.id()))
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        let local = ev.pos - self.node.pos;
        match ev.kind {
            EventKind::Move => {
                if self.state.pointer_move(local) {
                    self.node.mark_damaged();
                }
                if self.state.thumb_at(local).is_some() {
                    return Response::Used;
                }
                dispatch_container(self, ev)
            }
            EventKind::Press(PointerButton::Primary) if self.state.begin_drag(local) => {
                self.node.capture_pointer();
                self.node.mark_damaged();
                Response::Used
            }
            EventKind::Drag(_) if self.state.is_dragging() => {
                self.state.drag_to(local);
                self.node.mark_damaged();
                Response::Used
            }
            EventKind::Release(_) | EventKind::Cancel if self.state.is_dragging() => {
                self.state.end_drag();
                Response::Used
            }
            EventKind::Scroll(notches) => {
                if dispatch_container(self, ev).is_used() {
                    return Response::Used;
                }
                if self.state.wheel(notches) {
                    self.node.mark_damaged();
                    Response::Used
                } else {
                    Response::Ignored
                }
            }
            EventKind::Leave => {
                if self.state.pointer_move(Vec2::new(f32::MIN, f32::MIN)) {
                    self.node.mark_damaged();
                }
                Response::Ignored
            }
            _ => dispatch_container(self, ev),
        }
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        let at = origin + self.node.pos;
        let vp = self.state.viewport().translate(at);
        scene.push_clip(vp);
        self.children.draw(scene, at - self.state.offset());
        scene.pop_clip();

        let alpha = self.state.visibility();
        if alpha > 0.0 {
            let th = theme();
            for axis in [Axis::Vertical, Axis::Horizontal] {
                if let (Some(track), Some(thumb)) =
                    (self.state.track_rect(axis), self.state.thumb_rect(axis))
                {
                    scene.fill(track.translate(at), th.scrollbar_track.mul_alpha(alpha), 0.0);
                    let r = track.extent(axis.cross()) * 0.5;
                    scene.fill(thumb.translate(at), th.scrollbar_thumb.mul_alpha(alpha), r);
                }
            }
        }
        if self.state.tick_frame() {
            self.node.request_redraw();
        } else {
            self.node.clear_redraw();
        }
        self.node.clear_damage();
    }

    fn needs_redraw(&self) -> bool {
        self.node.wants_redraw() || self.children.needs_redraw()
    }

    fn children(&self) -> Option<&ChildList> {
        Some(&self.children)
    }
}
