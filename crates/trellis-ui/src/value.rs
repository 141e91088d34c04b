//! Value controls: checkbox, slider and numeric entry.
//!
//! Each control commits a new value through one internal path that updates
//! the widget, writes the optional auto-value cell, and then calls the
//! `on_change` callback, in that order, on the caller's thread. Callbacks
//! run while the control's node lock is held; they may lock other nodes or
//! mutate child lists, but must not lock the control that is calling them.

use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::*;

/// Change notification surface shared by the value controls.
pub struct ValueSlot<T> {
    on_change: Option<Box<dyn FnMut(&T) + Send>>,
    auto: Option<Arc<Mutex<T>>>,
}

impl<T> Default for ValueSlot<T> {
    fn default() -> Self {
        Self {
            on_change: None,
            auto: None,
        }
    }
}

impl<T: Clone> ValueSlot<T> {
    pub fn set_on_change(&mut self, f: impl FnMut(&T) + Send + 'static) {
        self.on_change = Some(Box::new(f));
    }

    /// Cell that always mirrors the committed value.
    pub fn bind(&mut self, cell: Arc<Mutex<T>>) {
        self.auto = Some(cell);
    }

    fn notify(&mut self, v: &T) {
        if let Some(cell) = &self.auto {
            *cell.lock() = v.clone();
        }
        if let Some(cb) = self.on_change.as_mut() {
            cb(v);
        }
    }
}

fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

fn norm(value: f32, min: f32, max: f32) -> f32 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.0
    }
}

fn snap_step(v: f32, step: Option<f32>, min: f32, max: f32) -> f32 {
    match step {
        Some(s) if s > 0.0 => {
            let k = ((v - min) / s).round();
            (min + k * s).clamp(min, max)
        }
        _ => v.clamp(min, max),
    }
}

pub struct Checkbox {
    node: Node,
    checked: bool,
    armed: bool,
    slot: ValueSlot<bool>,
}

impl Checkbox {
    pub fn new(checked: bool) -> Self {
        let mut node = Node::new();
        node.set_padding(Padding::ZERO);
        Self {
            node,
            checked,
            armed: false,
            slot: ValueSlot::default(),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn slot(&mut self) -> &mut ValueSlot<bool> {
        &mut self.slot
    }

    pub fn set_checked(&mut self, v: bool) {
        if self.checked != v {
            self.checked = v;
            self.node.mark_damaged();
            self.slot.notify(&v);
        }
    }
}

impl Widget for Checkbox {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn min_size(&self) -> Size {
        let s = metrics().control_height * 0.75;
        Size::new(s, s).max(self.node.min())
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        match ev.kind {
            EventKind::Press(PointerButton::Primary) => {
                self.armed = true;
                self.node.capture_pointer();
                Response::Used
            }
            EventKind::Release(PointerButton::Primary) if self.armed => {
                self.armed = false;
                if self.node.rect().contains(ev.pos) {
                    self.set_checked(!self.checked);
                }
                Response::Used
            }
            EventKind::KeyDown(Key::Character(' ')) => {
                self.set_checked(!self.checked);
                Response::Used
            }
            _ => Response::Ignored,
        }
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        let th = theme();
        let r = self.node.rect().translate(origin);
        let side = r.w.min(r.h);
        let b = Rect::new(r.x, r.y + (r.h - side) * 0.5, side, side);
        scene.fill(b, if self.checked { th.primary } else { th.surface }, 3.0);
        scene.border(b, th.outline, 1.0);
        self.node.clear_damage();
    }
}

pub struct Slider {
    node: Node,
    value: f32,
    min: f32,
    max: f32,
    step: Option<f32>,
    dragging: bool,
    slot: ValueSlot<f32>,
}

impl Slider {
    pub fn new(value: f32, min: f32, max: f32) -> Self {
        let mut node = Node::new();
        node.set_padding(Padding::ZERO);
        Self {
            node,
            value: value.clamp(min, max.max(min)),
            min,
            max: max.max(min),
            step: None,
            dragging: false,
            slot: ValueSlot::default(),
        }
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = Some(step);
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn slot(&mut self) -> &mut ValueSlot<f32> {
        &mut self.slot
    }

    pub fn set_value(&mut self, v: f32) {
        let v = snap_step(v, self.step, self.min, self.max);
        if v != self.value {
            self.value = v;
            self.node.mark_damaged();
            self.slot.notify(&v);
        }
    }

    fn value_at(&self, x: f32) -> f32 {
        let r = self.node.rect();
        let t = if r.w > 0.0 { clamp01((x - r.x) / r.w) } else { 0.0 };
        self.min + t * (self.max - self.min)
    }

    fn nudge(&mut self, dir: f32) {
        let step = self.step.unwrap_or((self.max - self.min) / 100.0);
        self.set_value(self.value + dir * step);
    }
}

impl Widget for Slider {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn min_size(&self) -> Size {
        let h = metrics().control_height;
        Size::new(h * 4.0, h).max(self.node.min())
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        match ev.kind {
            EventKind::Press(PointerButton::Primary) => {
                self.dragging = true;
                self.node.capture_pointer();
                self.set_value(self.value_at(ev.pos.x));
                Response::Used
            }
            EventKind::Drag(_) if self.dragging => {
                self.set_value(self.value_at(ev.pos.x));
                Response::Used
            }
            EventKind::Release(_) | EventKind::Cancel if self.dragging => {
                self.dragging = false;
                Response::Used
            }
            EventKind::KeyDown(Key::ArrowLeft) | EventKind::KeyDown(Key::ArrowDown) => {
                self.nudge(-1.0);
                Response::Used
            }
            EventKind::KeyDown(Key::ArrowRight) | EventKind::KeyDown(Key::ArrowUp) => {
                self.nudge(1.0);
                Response::Used
            }
            _ => Response::Ignored,
        }
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        let th = theme();
        let r = self.node.rect().translate(origin);
        let track_h = dp_to_px(4.0);
        let knob = dp_to_px(14.0).min(r.h);
        let cy = r.y + r.h * 0.5;
        scene.fill(Rect::new(r.x, cy - track_h * 0.5, r.w, track_h), th.outline, track_h * 0.5);
        let kx = r.x + clamp01(norm(self.value, self.min, self.max)) * r.w;
        let k = Rect::new(kx - knob * 0.5, cy - knob * 0.5, knob, knob);
        scene.fill(k, th.primary, knob * 0.5);
        self.node.clear_damage();
    }
}

/// Numeric text entry with range validation.
///
/// Setting a value and editing the text both end in [`NumberBox::commit`].
/// Text that fails to parse, or parses outside `[min, max]`, leaves the
/// value unchanged and marks the box invalid until the next good commit.
pub struct NumberBox {
    node: Node,
    text: String,
    value: f64,
    min: f64,
    max: f64,
    precision: usize,
    error: Option<UiError>,
    measure: Arc<dyn TextMeasure>,
    slot: ValueSlot<f64>,
}

impl NumberBox {
    pub fn new(value: f64, min: f64, max: f64, measure: Arc<dyn TextMeasure>) -> Self {
        let mut b = Self {
            node: Node::new(),
            text: String::new(),
            value: value.clamp(min, max.max(min)),
            min,
            max: max.max(min),
            precision: 2,
            error: None,
            measure,
            slot: ValueSlot::default(),
        };
        b.text = b.format(b.value);
        b
    }

    pub fn with_precision(mut self, digits: usize) -> Self {
        self.precision = digits;
        self.text = self.format(self.value);
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&UiError> {
        self.error.as_ref()
    }

    pub fn slot(&mut self) -> &mut ValueSlot<f64> {
        &mut self.slot
    }

    fn format(&self, v: f64) -> String {
        format!("{:.*}", self.precision, v)
    }

    /// Parses and range-checks `text`.
    pub fn parse(&self, text: &str) -> Result<f64, UiError> {
        let v: f64 = text
            .trim()
            .parse()
            .map_err(|_| UiError::InvalidNumber(text.to_string()))?;
        if !v.is_finite() {
            return Err(UiError::InvalidNumber(text.to_string()));
        }
        if v < self.min || v > self.max {
            return Err(UiError::OutOfRange {
                value: v,
                min: self.min,
                max: self.max,
            });
        }
        Ok(v)
    }

    /// Programmatic set; the text is reformatted from the value.
    pub fn set_value(&mut self, v: f64) -> Result<(), UiError> {
        let text = self.format(v);
        self.commit(text)
    }

    /// Replaces the text as if the user had typed it.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), UiError> {
        self.commit(text.into())
    }

    /// The single commit path. On success the value changes (and listeners
    /// are told) only if it differs; on failure the value stays and the box
    /// reports the error.
    pub fn commit(&mut self, text: String) -> Result<(), UiError> {
        self.node.mark_damaged();
        match self.parse(&text) {
            Ok(v) => {
                self.text = text;
                self.error = None;
                if v != self.value {
                    self.value = v;
                    self.slot.notify(&v);
                }
                Ok(())
            }
            Err(e) => {
                log::debug!("number box {}: {e}", self.node.id());
                self.text = text;
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }
}

impl Widget for NumberBox {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn min_size(&self) -> Size {
        let m = metrics();
        let t = self.measure.measure("0000000", m.font_size);
        let p = self.node.padding().total();
        Size::new(t.width + p.width, (t.height + p.height).max(m.control_height))
            .max(self.node.min())
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        match &ev.kind {
            EventKind::Press(PointerButton::Primary) => Response::Used,
            EventKind::KeyDown(Key::Character(c)) if c.is_ascii_digit() || "+-.eE".contains(*c) => {
                let mut t = self.text.clone();
                t.push(*c);
                let _ = self.commit(t);
                Response::Used
            }
            EventKind::KeyDown(Key::Backspace) => {
                let mut t = self.text.clone();
                t.pop();
                let _ = self.commit(t);
                Response::Used
            }
            EventKind::KeyDown(Key::Escape) => {
                let _ = self.set_value(self.value);
                Response::Used
            }
            EventKind::KeyDown(Key::ArrowUp) | EventKind::KeyDown(Key::ArrowDown) => {
                let dir = if ev.kind == EventKind::KeyDown(Key::ArrowUp) { 1.0 } else { -1.0 };
                let step = 10f64.powi(-(self.precision as i32));
                let _ = self.set_value((self.value + dir * step).clamp(self.min, self.max));
                Response::Used
            }
            _ => Response::Ignored,
        }
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        let th = theme();
        let m = metrics();
        let r = self.node.rect().translate(origin);
        scene.fill(r, th.surface, 3.0);
        let outline = if self.is_valid() { th.outline } else { th.error };
        scene.border(r, outline, 1.0);
        let pad = self.node.padding();
        let t = self.measure.measure(&self.text, m.font_size);
        let text = Rect::new(r.x + pad.left, r.y + (r.h - t.height) * 0.5, t.width, t.height);
        scene.text(text, self.text.clone(), th.on_surface, m.font_size);
        self.node.clear_damage();
    }
}
