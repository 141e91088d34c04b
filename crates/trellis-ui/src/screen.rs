//! # Screen: the root of a window
//!
//! `Screen` owns the root node and the popup overlays and is what a host
//! loop talks to:
//!
//! - `layout()`: re-arranges whatever changed;
//! - `handle(ev)`: routes one input event (screen coordinates);
//! - `draw()`: produces the frame's [`Scene`];
//! - `needs_redraw()`: true while something (a fading scrollbar, say)
//!   wants another frame.
//!
//! Routing order for an event:
//!
//! 1. open overlays, topmost first. A press outside every overlay closes
//!    them all (`ClickOutside`) and then continues to the tree;
//! 2. the pointer grab: after a press, drags and the release go straight to
//!    the node that captured the pointer, even outside its rect;
//! 3. hover tracking on moves, synthesizing `Leave`/`Enter`;
//! 4. first-match dispatch from the root.

use trellis_core::*;

/// Why an overlay closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissReason {
    /// The overlay finished on its own (a menu item was chosen).
    Action,
    ClickOutside,
    Cancel,
}

pub type DismissFn = Box<dyn FnMut(DismissReason) + Send>;

struct Overlay {
    node: NodeRef,
    on_dismiss: Option<DismissFn>,
}

/// Stack of overlays drawn above the tree and offered events first.
#[derive(Default)]
pub struct PopupHost {
    overlays: Vec<Overlay>,
}

impl PopupHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `node` with its top-left at `at` (screen space).
    pub fn show(&mut self, node: impl Into<NodeRef>, at: Vec2) -> NodeId {
        self.show_with(node, at, None)
    }

    pub fn show_with(
        &mut self,
        node: impl Into<NodeRef>,
        at: Vec2,
        on_dismiss: Option<DismissFn>,
    ) -> NodeId {
        let node = node.into();
        node.lock().node_mut().set_pos(at);
        let id = node.id();
        log::debug!("popup: show {id} at ({}, {})", at.x, at.y);
        self.overlays.push(Overlay { node, on_dismiss });
        id
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.overlays.iter().any(|o| o.node.id() == id)
    }

    /// Closes `id` and everything opened after it.
    pub fn dismiss(&mut self, id: NodeId, reason: DismissReason) -> bool {
        let Some(i) = self.overlays.iter().position(|o| o.node.id() == id) else {
            return false;
        };
        while self.overlays.len() > i {
            if let Some(mut o) = self.overlays.pop() {
                Self::close(&mut o, reason);
            }
        }
        true
    }

    pub fn dismiss_all(&mut self, reason: DismissReason) {
        while let Some(mut o) = self.overlays.pop() {
            Self::close(&mut o, reason);
        }
    }

    fn close(o: &mut Overlay, reason: DismissReason) {
        log::debug!("popup: dismiss {} ({reason:?})", o.node.id());
        {
            let mut w = o.node.lock();
            if !w.close_requested() {
                let at = w.node().pos;
                w.handle_event(&InputEvent::new(EventKind::Cancel, at));
            }
        }
        if let Some(cb) = o.on_dismiss.as_mut() {
            cb(reason);
        }
    }

    pub fn layout(&self) {
        for o in &self.overlays {
            o.node.layout();
        }
    }

    /// Offers `ev` to the overlays. `None` means the tree should see it.
    pub fn route(&mut self, ev: &InputEvent) -> Option<Response> {
        if self.overlays.is_empty() {
            return None;
        }
        let hit = self
            .overlays
            .iter()
            .rposition(|o| o.node.lock().hit_test(ev.pos).is_some());

        let target = match (&ev.kind, hit) {
            (EventKind::Press(_), None) => {
                self.dismiss_all(DismissReason::ClickOutside);
                return None;
            }
            (EventKind::KeyDown(Key::Escape), _) => {
                if let Some(id) = self.overlays.last().map(|o| o.node.id()) {
                    self.dismiss(id, DismissReason::Cancel);
                }
                return Some(Response::Used);
            }
            (_, Some(i)) => i,
            // pointer moves and releases outside still belong to the
            // topmost overlay while one is open
            (_, None) => self.overlays.len() - 1,
        };

        let node = self.overlays[target].node.clone();
        let (resp, done) = {
            let mut w = node.lock();
            let r = w.handle_event(ev);
            (r, w.close_requested())
        };
        if done {
            self.dismiss(node.id(), DismissReason::Action);
        }
        Some(resp)
    }

    pub fn draw(&self, scene: &mut Scene) {
        for o in &self.overlays {
            o.node.lock().draw(scene, Vec2::ZERO);
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.overlays.iter().any(|o| o.node.lock().needs_redraw())
    }
}

pub struct Screen {
    root: NodeRef,
    size: Size,
    hovered: Option<NodeId>,
    grab: Option<(NodeRef, Vec2)>,
    cursor: CursorIcon,
    popups: PopupHost,
}

impl Screen {
    pub fn new(root: impl Into<NodeRef>, size: Size) -> Self {
        let root = root.into();
        root.lock().node_mut().set_request(size);
        Self {
            root,
            size,
            hovered: None,
            grab: None,
            cursor: CursorIcon::Arrow,
            popups: PopupHost::new(),
        }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.root.lock().node_mut().set_request(size);
    }

    pub fn popups(&self) -> &PopupHost {
        &self.popups
    }

    pub fn popups_mut(&mut self) -> &mut PopupHost {
        &mut self.popups
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    /// Arranges whatever changed. Returns true if the tree was re-arranged.
    pub fn layout(&mut self) -> bool {
        let ran = self.root.layout();
        self.popups.layout();
        ran
    }

    /// Delivers `ev` to the node with `id`, rebased into its parent space.
    fn send_to(&self, id: NodeId, ev: &InputEvent) -> Response {
        if id == self.root.id() {
            return self.root.lock().handle_event(ev);
        }
        let list = self.root.lock().children().cloned();
        let origin = {
            let w = self.root.lock();
            w.node().pos - w.content_offset()
        };
        match list.and_then(|l| l.find(id, origin)) {
            Some((n, o)) => n.lock().handle_event(&ev.rebased(o)),
            None => Response::Ignored,
        }
    }

    fn update_hover(&mut self, pos: Vec2) {
        let hit = self.root.lock().hit_test(pos);
        if hit == self.hovered {
            return;
        }
        if let Some(old) = self.hovered {
            self.send_to(old, &InputEvent::new(EventKind::Leave, pos));
        }
        if let Some(new) = hit {
            self.send_to(new, &InputEvent::new(EventKind::Enter, pos));
        }
        log::trace!("hover: {:?} -> {:?}", self.hovered, hit);
        self.hovered = hit;
    }

    fn cursor_of(&self, id: Option<NodeId>) -> CursorIcon {
        let Some(id) = id else {
            return CursorIcon::Arrow;
        };
        if id == self.root.id() {
            return self.root.lock().cursor();
        }
        let list = self.root.lock().children().cloned();
        list.and_then(|l| l.find(id, Vec2::ZERO))
            .map(|(n, _)| n.lock().cursor())
            .unwrap_or_default()
    }

    fn take_capture(&self) -> Option<(NodeRef, Vec2)> {
        let (captured, list, origin) = {
            let w = self.root.lock();
            (
                w.node().take_capture(),
                w.children().cloned(),
                w.node().pos - w.content_offset(),
            )
        };
        if captured {
            return Some((self.root.clone(), Vec2::ZERO));
        }
        list.and_then(|l| l.take_capture(origin))
    }

    pub fn handle(&mut self, ev: &InputEvent) -> Response {
        if let Some(r) = self.popups.route(ev) {
            return r;
        }

        if let Some((node, origin)) = self.grab.clone()
            && matches!(ev.kind, EventKind::Drag(_) | EventKind::Release(_) | EventKind::Cancel)
        {
            let r = node.lock().handle_event(&ev.rebased(origin));
            self.cursor = node.lock().cursor();
            if !matches!(ev.kind, EventKind::Drag(_)) {
                self.grab = None;
            }
            return r;
        }

        if matches!(ev.kind, EventKind::Move) {
            self.update_hover(ev.pos);
        }

        let r = self.root.lock().handle_event(ev);

        if matches!(ev.kind, EventKind::Press(_)) {
            // leftover requests from ignored presses are dropped here too
            self.grab = self.take_capture().filter(|_| r.is_used());
        }
        if matches!(ev.kind, EventKind::Move) {
            self.cursor = self.cursor_of(self.hovered);
        }
        r
    }

    pub fn draw(&mut self) -> Scene {
        let mut scene = Scene {
            clear_color: theme().background,
            nodes: Vec::new(),
        };
        self.root.lock().draw(&mut scene, Vec2::ZERO);
        self.popups.draw(&mut scene);
        scene
    }

    pub fn needs_redraw(&self) -> bool {
        self.root.lock().needs_redraw() || self.popups.needs_redraw()
    }
}
