//! # Cascading popup menus
//!
//! A [`MenuStack`] is the open chain of menu levels: level 0 is the root
//! menu, level `k + 1` is the submenu of the item hovered in level `k`. Only
//! one chain exists at a time. Hovering a different item in level `k` tears
//! down every level above `k` (each exactly once, deepest first) before any
//! new submenu opens.
//!
//! Releasing over a selectable item reports its payload; the owning
//! [`PopupMenu`] then runs its callback and asks the host to close the whole
//! chain. Releasing outside every level dismisses without a selection.
//! Separators (label `"-"`) and disabled items are never selectable.

use std::sync::Arc;

use smallvec::SmallVec;
use trellis_core::*;

/// Label that marks a separator row.
pub const SEPARATOR: &str = "-";

#[derive(Clone, Debug, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub payload: i64,
    pub enabled: bool,
    pub items: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, payload: i64) -> Self {
        Self {
            label: label.into(),
            payload,
            enabled: true,
            items: Vec::new(),
        }
    }

    pub fn separator() -> Self {
        Self {
            enabled: false,
            ..Self::new(SEPARATOR, 0)
        }
    }

    pub fn submenu(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            items,
            ..Self::new(label, 0)
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_separator(&self) -> bool {
        self.label == SEPARATOR
    }

    pub fn has_submenu(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn is_selectable(&self) -> bool {
        self.enabled && !self.is_separator() && !self.has_submenu()
    }
}

/// Level transitions and outcomes reported by a [`MenuStack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    Opened { depth: usize },
    Closed { depth: usize },
    Selected(i64),
    Dismissed,
}

pub type MenuEvents = SmallVec<[MenuEvent; 4]>;

#[derive(Clone, Debug)]
struct Level {
    items: Vec<MenuItem>,
    rect: Rect,
    item_h: f32,
    hovered: Option<usize>,
}

impl Level {
    fn new(items: Vec<MenuItem>, at: Vec2, measure: &dyn TextMeasure) -> Self {
        let m = metrics();
        let line = measure.measure("Ag", m.font_size).height;
        let item_h = line + 2.0 * m.item_padding;
        let arrow = measure.measure(" >", m.font_size).width;
        let width = items
            .iter()
            .map(|i| {
                let w = measure.measure(&i.label, m.font_size).width;
                if i.has_submenu() { w + arrow } else { w }
            })
            .fold(0.0, f32::max)
            + 2.0 * m.padding;
        let h = item_h * items.len() as f32;
        Self {
            items,
            rect: Rect::new(at.x, at.y, width, h),
            item_h,
            hovered: None,
        }
    }

    fn item_at(&self, p: Vec2) -> Option<usize> {
        if !self.rect.contains(p) || self.item_h <= 0.0 {
            return None;
        }
        let i = ((p.y - self.rect.y) / self.item_h) as usize;
        (i < self.items.len()).then_some(i)
    }

    fn item_rect(&self, i: usize) -> Rect {
        Rect::new(
            self.rect.x,
            self.rect.y + i as f32 * self.item_h,
            self.rect.w,
            self.item_h,
        )
    }
}

/// The open chain of menu levels. Coordinates are in the menu's own space.
pub struct MenuStack {
    levels: SmallVec<[Level; 4]>,
    measure: Arc<dyn TextMeasure>,
}

impl MenuStack {
    pub fn new(items: Vec<MenuItem>, measure: Arc<dyn TextMeasure>) -> Self {
        let root = Level::new(items, Vec2::ZERO, measure.as_ref());
        let mut levels = SmallVec::new();
        levels.push(root);
        Self { levels, measure }
    }

    /// Number of open levels, root included.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn level_rect(&self, depth: usize) -> Option<Rect> {
        self.levels.get(depth).map(|l| l.rect)
    }

    pub fn hovered(&self, depth: usize) -> Option<usize> {
        self.levels.get(depth).and_then(|l| l.hovered)
    }

    /// Union of every open level.
    pub fn bounds(&self) -> Rect {
        self.levels
            .iter()
            .map(|l| l.rect)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.levels.iter().any(|l| l.rect.contains(p))
    }

    /// Deepest level under `p`.
    fn level_at(&self, p: Vec2) -> Option<usize> {
        self.levels.iter().rposition(|l| l.rect.contains(p))
    }

    /// Closes every level at `depth` and above, deepest first.
    fn close_from(&mut self, depth: usize) -> MenuEvents {
        let mut out = MenuEvents::new();
        while self.levels.len() > depth.max(1) {
            self.levels.pop();
            out.push(MenuEvent::Closed {
                depth: self.levels.len(),
            });
        }
        out
    }

    /// Hover tracking. Outside every level nothing changes.
    pub fn pointer_move(&mut self, p: Vec2) -> MenuEvents {
        let Some(depth) = self.level_at(p) else {
            return MenuEvents::new();
        };
        let idx = self.levels[depth].item_at(p);
        if self.levels[depth].hovered == idx {
            return MenuEvents::new();
        }
        let mut out = self.close_from(depth + 1);
        self.levels[depth].hovered = idx;

        if let Some(i) = idx {
            let level = &self.levels[depth];
            let item = &level.items[i];
            if item.enabled && item.has_submenu() {
                let at = Vec2::new(level.rect.right(), level.item_rect(i).y);
                let sub = Level::new(item.items.clone(), at, self.measure.as_ref());
                self.levels.push(sub);
                log::debug!("menu: opened level {}", depth + 1);
                out.push(MenuEvent::Opened { depth: depth + 1 });
            }
        }
        out
    }

    /// Release: selects, dismisses, or (over an inert row) does nothing.
    pub fn release(&mut self, p: Vec2) -> Option<MenuEvent> {
        let Some(depth) = self.level_at(p) else {
            return Some(MenuEvent::Dismissed);
        };
        let item = self.levels[depth]
            .item_at(p)
            .map(|i| &self.levels[depth].items[i])?;
        item.is_selectable()
            .then_some(MenuEvent::Selected(item.payload))
    }

    /// Tears the whole chain down, reporting each closed level once.
    pub fn close_all(&mut self) -> MenuEvents {
        let mut out = self.close_from(1);
        if let Some(root) = self.levels.first_mut() {
            root.hovered = None;
        }
        out.push(MenuEvent::Closed { depth: 0 });
        out
    }

    fn draw(&self, scene: &mut Scene, at: Vec2) {
        let th = theme();
        let m = metrics();
        for level in &self.levels {
            let r = level.rect.translate(at);
            scene.fill(r, th.surface, 4.0);
            scene.border(r, th.outline, 1.0);
            for (i, item) in level.items.iter().enumerate() {
                let ir = level.item_rect(i).translate(at);
                if item.is_separator() {
                    let y = ir.y + ir.h * 0.5;
                    scene.fill(Rect::new(ir.x + m.padding, y, ir.w - 2.0 * m.padding, 1.0), th.outline, 0.0);
                    continue;
                }
                if level.hovered == Some(i) && item.enabled {
                    scene.fill(ir, th.primary.mul_alpha(0.4), 0.0);
                }
                let color = if item.enabled { th.on_surface } else { th.disabled };
                let text = Rect::new(ir.x + m.padding, ir.y + m.item_padding, ir.w, ir.h);
                scene.text(text, item.label.clone(), color, m.font_size);
                if item.has_submenu() {
                    let arrow = self.measure.measure(">", m.font_size);
                    let ar = Rect::new(ir.right() - m.padding - arrow.width, text.y, arrow.width, arrow.height);
                    scene.text(ar, ">", color, m.font_size);
                }
            }
        }
    }
}

pub type SelectFn = Box<dyn FnMut(i64) + Send>;

/// Overlay widget wrapping a [`MenuStack`]. Show it through the popup host.
pub struct PopupMenu {
    node: Node,
    stack: MenuStack,
    on_select: Option<SelectFn>,
    on_level: Option<Box<dyn FnMut(MenuEvent) + Send>>,
    done: bool,
}

impl PopupMenu {
    pub fn new(items: Vec<MenuItem>, measure: Arc<dyn TextMeasure>) -> Self {
        let mut node = Node::new();
        node.set_padding(Padding::ZERO);
        let stack = MenuStack::new(items, measure);
        Self {
            node,
            stack,
            on_select: None,
            on_level: None,
            done: false,
        }
    }

    pub fn on_select(mut self, f: impl FnMut(i64) + Send + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// Observer for level open/close transitions.
    pub fn on_level(mut self, f: impl FnMut(MenuEvent) + Send + 'static) -> Self {
        self.on_level = Some(Box::new(f));
        self
    }

    pub fn stack(&self) -> &MenuStack {
        &self.stack
    }

    fn emit(&mut self, events: MenuEvents) {
        if events.is_empty() {
            return;
        }
        self.node.mark_dirty();
        if let Some(cb) = self.on_level.as_mut() {
            for e in events {
                cb(e);
            }
        }
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        let events = self.stack.close_all();
        self.emit(events);
    }
}

impl Widget for PopupMenu {
    fn node(&self) -> &Node {
        &self.node
    }
    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn min_size(&self) -> Size {
        let b = self.stack.bounds();
        Size::new(b.right(), b.bottom())
    }

    fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        (self.node.is_visible() && self.stack.contains(p - self.node.pos)).then(|| self.node.id())
    }

    fn handle_event(&mut self, ev: &InputEvent) -> Response {
        if self.done {
            return Response::Ignored;
        }
        let local = ev.pos - self.node.pos;
        match ev.kind {
            EventKind::Move | EventKind::Drag(_) => {
                let events = self.stack.pointer_move(local);
                self.emit(events);
                Response::Used
            }
            EventKind::Press(_) => Response::Used,
            EventKind::Release(_) => {
                match self.stack.release(local) {
                    Some(MenuEvent::Selected(payload)) => {
                        log::debug!("menu: selected {payload}");
                        if let Some(cb) = self.on_select.as_mut() {
                            cb(payload);
                        }
                        self.finish();
                    }
                    Some(MenuEvent::Dismissed) => self.finish(),
                    _ => {}
                }
                Response::Used
            }
            EventKind::KeyDown(Key::Escape) | EventKind::Cancel => {
                self.finish();
                Response::Used
            }
            _ => Response::Ignored,
        }
    }

    fn draw(&mut self, scene: &mut Scene, origin: Vec2) {
        if !self.done {
            self.stack.draw(scene, origin + self.node.pos);
        }
        self.node.clear_damage();
    }

    fn close_requested(&self) -> bool {
        self.done
    }
}
