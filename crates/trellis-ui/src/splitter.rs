//! Draggable seams between the children of an ordered container.

use trellis_core::*;

use crate::{Aligner, visible};

#[derive(Clone, Copy, Debug)]
struct Drag {
    boundary: usize,
    start: f32,
    before: f32,
    after: f32,
}

/// Ordered container whose seams can be dragged to trade space between
/// neighbors. The last visible child absorbs whatever the others leave.
///
/// A seam sits between child `i - 1` and child `i`; the pointer is "on" it
/// within `split_tolerance` of the gap. Dragging never shrinks either
/// neighbor below `min_split` or its own minimum. Unless SHIFT is held the
/// moving seam snaps toward the equal split of the pair, or toward a
/// neighbor size of total / N, when it comes within `snap_threshold`.
pub struct Splitter {
    inner: Aligner,
    hover: Option<usize>,
    drag: Option<Drag>,
}

impl Splitter {
    pub fn new(axis: Axis) -> Self {
        let mut inner = Aligner::new(axis);
        inner.node_mut().set_padding(Padding::ZERO);
        Self {
            inner,
            hover: None,
            drag: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.inner.axis()
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

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Seam index under `p` (content space), if any.
    pub fn boundary_at(&self, p: Vec2) -> Option<usize> {
        let axis = self.axis();
        let tol = metrics().split_tolerance;
        let at = p.along(axis);
        let kids = visible(self.list());
        (1..kids.len()).find(|&i| {
            let prev = kids[i - 1].lock().node().rect();
            let next = kids[i].lock().node().pos.along(axis);
            let prev_end = prev.start(axis) + prev.extent(axis);
            at >= prev_end - tol && at <= next + tol
        })
    }

    /// Primary-axis sizes of the two neighbors of seam `boundary`.
    pub fn pair(&self, boundary: usize) -> Option<(f32, f32)> {
        let axis = self.axis();
        let kids = visible(self.list());
        if boundary == 0 || boundary >= kids.len() {
            return None;
        }
        let a = kids[boundary - 1].lock().node().size().along(axis);
        let b = kids[boundary].lock().node().size().along(axis);
        Some((a, b))
    }

    /// Resizes the neighbors of `boundary` from `before`/`after` by `delta`,
    /// clamped and optionally snapped. Returns the delta actually applied.
    pub fn resize(&mut self, boundary: usize, before: f32, after: f32, delta: f32, snap: bool) -> f32 {
        let axis = self.axis();
        let kids = visible(self.list());
        if boundary == 0 || boundary >= kids.len() {
            return 0.0;
        }
        let (a, b) = (&kids[boundary - 1], &kids[boundary]);
        let floor = metrics().min_split;
        let a_min = a.lock().min_size().along(axis).max(floor);
        let b_min = b.lock().min_size().along(axis).max(floor);

        let mut d = delta;
        if snap {
            let total: f32 = kids
                .iter()
                .map(|c| c.lock().node().size().along(axis))
                .sum();
            d = snap_delta(before, after, total, kids.len(), d);
        }
        let lo = a_min - before;
        let hi = after - b_min;
        if lo > hi {
            log::debug!("resize: seam {boundary} is pinned by its neighbors' minimums");
            return 0.0;
        }
        let d = d.clamp(lo, hi);

        a.lock().node_mut().set_request_along(axis, before + d);
        b.lock().node_mut().set_request_along(axis, after - d);
        self.inner.arrange();
        d
    }

    fn cursor_for_axis(&self) -> CursorIcon {
        match self.axis() {
            Axis::Horizontal => CursorIcon::ResizeHorizontal,
            Axis::Vertical => CursorIcon::ResizeVertical,
        }
    }

    /// Keeps the last visible child as the one that absorbs slack.
    fn sync_resizable(&mut self) {
        let last = visible(self.list()).last().map(|c| c.id());
        self.inner.set_resizable(last);
    }
}

/// Adjusts `d` so the seam lands on a snap target when it is close to one.
fn snap_delta(before: f32, after: f32, total: f32, n: usize, d: f32) -> f32 {
    let threshold = metrics().snap_threshold;
    let pair = before + after;
    let share = total / n as f32;
    let targets = [pair * 0.5, share, pair - share];
    let moved = before + d;
    targets
        .iter()
        .map(|&t| (t, (moved - t).abs()))
        .filter(|&(_, dist)| dist <= threshold)
        .min_by(|x, y| x.1.total_cmp(&y.1))
        .map(|(t, _)| t - before)
        .unwrap_or(d)
}

impl Widget for Splitter {
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
        self.sync_resizable();
        self.inner.arrange();
    }

    fn min_size(&self) -> Size {
        self.inner.min_size()
    }

    fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        hit_test_container(self, p)
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        let axis = self.axis();
        let local = ev.pos - self.node().pos;
        match ev.kind {
            EventKind::Move => {
                let hover = self.boundary_at(local);
                if hover != self.hover {
                    self.hover = hover;
                    self.node().mark_damaged();
                }
                dispatch_container(self, ev)
            }
            EventKind::Press(PointerButton::Primary) => {
                let Some(boundary) = self.boundary_at(local) else {
                    return dispatch_container(self, ev);
                };
                let Some((before, after)) = self.pair(boundary) else {
                    return Response::Ignored;
                };
                self.drag = Some(Drag {
                    boundary,
                    start: local.along(axis),
                    before,
                    after,
                });
                self.node().capture_pointer();
                Response::Used
            }
            EventKind::Drag(_) if self.drag.is_some() => {
                if let Some(d) = self.drag {
                    let snap = !ev.modifiers.contains(Modifiers::SHIFT);
                    let delta = local.along(axis) - d.start;
                    self.resize(d.boundary, d.before, d.after, delta, snap);
                }
                Response::Used
            }
            EventKind::Release(_) | EventKind::Cancel if self.drag.is_some() => {
                self.drag = None;
                self.node().mark_damaged();
                Response::Used
            }
            _ => dispatch_container(self, ev),
        }
    }

    fn cursor(&self) -> CursorIcon {
        if self.drag.is_some() || self.hover.is_some() {
            self.cursor_for_axis()
        } else {
            CursorIcon::Arrow
        }
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        self.inner.draw(scene, origin);
        let active = self.drag.map(|d| d.boundary).or(self.hover);
        if let Some(i) = active
            && let Some(c) = visible(self.list()).get(i)
        {
            let axis = self.axis();
            let at = origin + self.node().pos;
            let x = c.lock().node().pos.along(axis);
            let size = self.node().size();
            let seam = match axis {
                Axis::Horizontal => Rect::new(at.x + x - 1.0, at.y, 2.0, size.height),
                Axis::Vertical => Rect::new(at.x, at.y + x - 1.0, size.width, 2.0),
            };
            scene.fill(seam, theme().primary, 0.0);
        }
    }

    fn needs_redraw(&self) -> bool {
        self.inner.needs_redraw()
    }

    fn children(&self) -> Option<&ChildList> {
        self.inner.children()
    }
}
