//! Leaf widgets: plain blocks, text labels and push buttons.

use std::sync::Arc;

use trellis_core::*;

/// Sized rectangle with an optional fill. Mostly a spacer.
pub struct Block {
    node: Node,
    color: Option<Color>,
}

impl Block {
    pub fn new(min: Size) -> Self {
        let mut node = Node::new();
        node.set_min(min);
        node.set_padding(Padding::ZERO);
        Self { node, color: None }
    }

    pub fn filled(min: Size, color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::new(min)
        }
    }
}

impl Widget for Block {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        if let Some(c) = self.color {
            scene.fill(self.node.rect().translate(origin), c, 0.0);
        }
        self.node.clear_damage();
    }
}

/// Single run of text.
pub struct Label {
    node: Node,
    text: String,
    font_px: f32,
    color: Option<Color>,
    measure: Arc<dyn TextMeasure>,
}

impl Label {
    pub fn new(text: impl Into<String>, measure: Arc<dyn TextMeasure>) -> Self {
        let mut node = Node::new();
        node.set_padding(Padding::ZERO);
        Self {
            node,
            text: text.into(),
            font_px: -1.0,
            color: None,
            measure,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.node.mark_dirty();
            self.node.mark_parent_dirty();
        }
    }

    pub fn set_font_px(&mut self, px: f32) {
        self.font_px = px;
        self.node.mark_dirty();
    }

    pub fn set_color(&mut self, c: Color) {
        self.color = Some(c);
        self.node.mark_damaged();
    }

    fn font_px(&self) -> f32 {
        if self.font_px < 0.0 {
            metrics().font_size
        } else {
            self.font_px
        }
    }
}

impl Widget for Label {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn min_size(&self) -> Size {
        let t = self.measure.measure(&self.text, self.font_px());
        let p = self.node.padding().total();
        Size::new(t.width + p.width, t.height + p.height).max(self.node.min())
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        let pad = self.node.padding();
        let r = self.node.rect().translate(origin + pad.origin());
        let color = self.color.unwrap_or(theme().on_surface);
        scene.text(r, self.text.clone(), color, self.font_px());
        self.node.clear_damage();
    }
}

pub type ClickFn = Box<dyn FnMut() + Send>;

/// Push button. Fires `on_click` when a press is released over it.
pub struct Button {
    node: Node,
    text: String,
    measure: Arc<dyn TextMeasure>,
    on_click: Option<ClickFn>,
    pressed: bool,
    hovered: bool,
}

impl Button {
    pub fn new(text: impl Into<String>, measure: Arc<dyn TextMeasure>) -> Self {
        Self {
            node: Node::new(),
            text: text.into(),
            measure,
            on_click: None,
            pressed: false,
            hovered: false,
        }
    }

    pub fn on_click(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    pub fn set_on_click(&mut self, f: impl FnMut() + Send + 'static) {
        self.on_click = Some(Box::new(f));
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl Widget for Button {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn min_size(&self) -> Size {
        let m = metrics();
        let t = self.measure.measure(&self.text, m.font_size);
        let p = self.node.padding().total();
        Size::new(t.width + p.width, (t.height + p.height).max(m.control_height))
            .max(self.node.min())
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        let inside = self.node.rect().contains(ev.pos);
        match ev.kind {
            EventKind::Press(PointerButton::Primary) => {
                self.pressed = true;
                self.node.capture_pointer();
                self.node.mark_damaged();
                Response::Used
            }
            EventKind::Release(PointerButton::Primary) if self.pressed => {
                self.pressed = false;
                self.node.mark_damaged();
                if inside && let Some(cb) = self.on_click.as_mut() {
                    cb();
                }
                Response::Used
            }
            EventKind::Enter | EventKind::Leave => {
                self.hovered = matches!(ev.kind, EventKind::Enter);
                self.node.mark_damaged();
                Response::Used
            }
            EventKind::Cancel => {
                self.pressed = false;
                Response::Used
            }
            _ => Response::Ignored,
        }
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        let th = theme();
        let r = self.node.rect().translate(origin);
        let bg = if self.pressed {
            th.primary
        } else if self.hovered {
            th.outline
        } else {
            th.surface
        };
        let bg = if self.node.is_active() { bg } else { th.disabled };
        scene.fill(r, bg, 4.0);
        scene.border(r, th.outline, 1.0);
        let font = metrics().font_size;
        let t = self.measure.measure(&self.text, font);
        let text_rect = Rect::new(
            r.x + (r.w - t.width) * 0.5,
            r.y + (r.h - t.height) * 0.5,
            t.width,
            t.height,
        );
        scene.text(text_rect, self.text.clone(), th.on_surface, font);
        self.node.clear_damage();
    }
}
