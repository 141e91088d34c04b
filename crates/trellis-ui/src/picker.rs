//! # Picking points in a 3D viewport
//!
//! [`Picker3d`] turns a viewport pixel plus a depth-buffer sample into a
//! world-space point by inverting the view-projection matrix. It has two
//! states:
//!
//! - `Idle`: every move, press and drag samples the depth under the cursor.
//! - `Locked { depth }`: entered when a press callback claims the press;
//!   drags reuse the depth captured at press time, so the dragged point
//!   slides in a plane instead of jumping onto whatever lies behind it.
//!   The release reuses it too, then returns to `Idle`.
//!
//! Pixels are viewport-local with y down; depth is normalized to `[0, 1]`.

use vek::{Mat4, Vec3, Vec4};

use trellis_core::*;

/// Source of depth-buffer samples, normalized to `[0, 1]`.
pub trait DepthSampler: Send {
    fn depth_at(&self, pixel: Vec2) -> f32;
}

impl<F: Fn(Vec2) -> f32 + Send> DepthSampler for F {
    fn depth_at(&self, pixel: Vec2) -> f32 {
        self(pixel)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickState {
    Idle,
    Locked { depth: f32 },
}

pub type PointFn = Box<dyn FnMut(Vec3<f32>) + Send>;
/// Returns true to claim the press and lock the depth.
pub type PushFn = Box<dyn FnMut(PointerButton, Vec3<f32>) -> bool + Send>;
pub type ReleaseFn = Box<dyn FnMut(PointerButton, Vec3<f32>) + Send>;

pub struct Picker3d {
    state: PickState,
    viewport: Size,
    view_proj: Mat4<f32>,
    inverse: Option<Mat4<f32>>,
    sampler: Box<dyn DepthSampler>,
    last: Option<(Vec3<f32>, f32)>,
    on_move: Option<PointFn>,
    on_push: Option<PushFn>,
    on_drag: Option<PointFn>,
    on_release: Option<ReleaseFn>,
}

impl Picker3d {
    pub fn new(sampler: impl DepthSampler + 'static) -> Self {
        Self {
            state: PickState::Idle,
            viewport: Size::ZERO,
            view_proj: Mat4::identity(),
            inverse: Some(Mat4::identity()),
            sampler: Box::new(sampler),
            last: None,
            on_move: None,
            on_push: None,
            on_drag: None,
            on_release: None,
        }
    }

    pub fn state(&self) -> PickState {
        self.state
    }

    /// Last picked point and the depth it was computed from.
    pub fn last(&self) -> Option<(Vec3<f32>, f32)> {
        self.last
    }

    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
    }

    pub fn view_proj(&self) -> Mat4<f32> {
        self.view_proj
    }

    /// Sets the matrix used for unprojection. A singular matrix disables
    /// picking until a usable one is set.
    pub fn set_view_proj(&mut self, m: Mat4<f32>) {
        self.view_proj = m;
        self.inverse = if m.determinant() != 0.0 {
            Some(m.inverted())
        } else {
            log::warn!("picker: singular view-projection matrix; picking disabled");
            None
        };
    }

    pub fn on_move(&mut self, f: impl FnMut(Vec3<f32>) + Send + 'static) {
        self.on_move = Some(Box::new(f));
    }

    pub fn on_push(&mut self, f: impl FnMut(PointerButton, Vec3<f32>) -> bool + Send + 'static) {
        self.on_push = Some(Box::new(f));
    }

    pub fn on_drag(&mut self, f: impl FnMut(Vec3<f32>) + Send + 'static) {
        self.on_drag = Some(Box::new(f));
    }

    pub fn on_release(&mut self, f: impl FnMut(PointerButton, Vec3<f32>) + Send + 'static) {
        self.on_release = Some(Box::new(f));
    }

    /// World point at viewport `pixel` and normalized `depth`.
    pub fn unproject(&self, pixel: Vec2, depth: f32) -> Option<Vec3<f32>> {
        let inv = self.inverse?;
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return None;
        }
        let nx = 2.0 * pixel.x / self.viewport.width - 1.0;
        let ny = 1.0 - 2.0 * pixel.y / self.viewport.height;
        let nz = 2.0 * depth - 1.0;
        let h = inv * Vec4::new(nx, ny, nz, 1.0);
        if h.w.abs() <= f32::EPSILON {
            return None;
        }
        Some(h.xyz() / h.w)
    }

    fn depth_for(&self, pixel: Vec2) -> f32 {
        match self.state {
            PickState::Locked { depth } => depth,
            PickState::Idle => self.sampler.depth_at(pixel),
        }
    }

    fn pick(&mut self, pixel: Vec2) -> Option<Vec3<f32>> {
        let depth = self.depth_for(pixel);
        let p = self.unproject(pixel, depth)?;
        self.last = Some((p, depth));
        Some(p)
    }

    pub fn pointer_move(&mut self, pixel: Vec2) {
        if let Some(p) = self.pick(pixel)
            && let Some(cb) = self.on_move.as_mut()
        {
            cb(p);
        }
    }

    /// Returns true if the push callback claimed the press.
    pub fn press(&mut self, button: PointerButton, pixel: Vec2) -> bool {
        let Some(p) = self.pick(pixel) else {
            return false;
        };
        let claimed = self.on_push.as_mut().is_some_and(|cb| cb(button, p));
        if claimed && let Some((_, depth)) = self.last {
            log::debug!("picker: locked at depth {depth}");
            self.state = PickState::Locked { depth };
        }
        claimed
    }

    pub fn drag(&mut self, pixel: Vec2) {
        if let Some(p) = self.pick(pixel) {
            if let Some(cb) = self.on_drag.as_mut() {
                cb(p);
            } else if let Some(cb) = self.on_move.as_mut() {
                cb(p);
            }
        }
    }

    pub fn release(&mut self, button: PointerButton, pixel: Vec2) {
        if let Some(p) = self.pick(pixel)
            && let Some(cb) = self.on_release.as_mut()
        {
            cb(button, p);
        }
        self.state = PickState::Idle;
    }

    pub fn cancel(&mut self) {
        self.state = PickState::Idle;
    }
}

/// Leaf that feeds its pointer events to a [`Picker3d`]. The scene itself is
/// rendered elsewhere; this only reserves the rect and routes input.
pub struct Viewport3d {
    node: Node,
    picker: Picker3d,
}

impl Viewport3d {
    pub fn new(picker: Picker3d) -> Self {
        let mut node = Node::new();
        node.set_padding(Padding::ZERO);
        Self { node, picker }
    }

    pub fn picker(&self) -> &Picker3d {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut Picker3d {
        &mut self.picker
    }
}

impl Widget for Viewport3d {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn arrange(&mut self) {
        let min = self.min_size();
        self.node.finalize(min);
        self.picker.set_viewport(self.node.size());
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        let pixel = ev.pos - self.node.pos;
        match ev.kind {
            EventKind::Move => {
                self.picker.pointer_move(pixel);
                Response::Used
            }
            EventKind::Press(button) => {
                if self.picker.press(button, pixel) {
                    self.node.capture_pointer();
                    Response::Used
                } else {
                    Response::Ignored
                }
            }
            EventKind::Drag(_) => {
                self.picker.drag(pixel);
                Response::Used
            }
            EventKind::Release(button) => {
                self.picker.release(button, pixel);
                Response::Used
            }
            EventKind::Cancel => {
                self.picker.cancel();
                Response::Used
            }
            _ => Response::Ignored,
        }
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        scene.border(self.node.rect().translate(origin), theme().outline, 1.0);
        self.node.clear_damage();
    }
}
