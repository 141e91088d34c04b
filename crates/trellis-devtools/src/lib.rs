//! Debug overlay and tree dumps.
//!
//! [`Inspector`] draws a frame counter and outlines the hovered node on top
//! of a finished [`Scene`]. [`dump_tree`] renders a subtree as indented text
//! (id, rect, flags), handy with `RUST_LOG=debug` via [`log_tree`].

use std::fmt::Write as _;
use std::time::Instant;

use trellis_core::{Color, NodeId, NodeRef, Rect, Scene, Widget};

pub struct Hud {
    pub inspector_enabled: bool,
    pub hovered: Option<Rect>,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub stats: Option<FrameStats>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            inspector_enabled: false,
            hovered: None,
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            stats: None,
        }
    }

    pub fn toggle_inspector(&mut self) {
        self.inspector_enabled = !self.inspector_enabled;
    }

    pub fn set_hovered(&mut self, r: Option<Rect>) {
        self.hovered = r;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn overlay(&mut self, scene: &mut Scene) {
        self.frame_count += 1;
        let now = Instant::now();
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
        let mut lines = vec![
            format!("frame: {}", self.frame_count),
            format!("fps: {:.1}", self.fps_smooth),
        ];
        if let Some(m) = &self.stats {
            lines.push(format!("layout: {:.2} ms", m.layout_ms));
            lines.push(format!("nodes: {}", m.nodes));
            lines.push(format!("scene: {}", m.scene_nodes));
        }
        scene.text(
            Rect::new(8.0, 8.0, 200.0, 16.0),
            lines.join("  |  "),
            Color::from_hex("#AAAAAA"),
            14.0,
        );

        if let Some(r) = self.hovered {
            scene.border(r, Color::from_hex("#44AAFF"), 2.0);
        }
    }
}

/// Per-frame numbers shown in the overlay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub layout_ms: f32,
    pub nodes: usize,
    pub scene_nodes: usize,
}

pub struct Inspector {
    pub hud: Hud,
    layout_ms: f32,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            hud: Hud::new(),
            layout_ms: 0.0,
        }
    }

    /// Runs the host's layout pass (`Screen::layout`, say) and records how
    /// long it took for the next overlay.
    pub fn timed_layout<R>(&mut self, layout: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let r = layout();
        self.layout_ms = start.elapsed().as_secs_f32() * 1000.0;
        r
    }

    /// Adds the overlay for this frame. `hovered` is whatever the host's
    /// hover tracking reports. The stats count the scene as it was before
    /// the overlay was added.
    pub fn frame(&mut self, scene: &mut Scene, root: &NodeRef, hovered: Option<NodeId>) {
        if !self.hud.inspector_enabled {
            return;
        }
        self.hud.stats = Some(FrameStats {
            layout_ms: self.layout_ms,
            nodes: count_nodes(root),
            scene_nodes: scene.nodes.len(),
        });
        self.hud.set_hovered(hovered.and_then(|id| absolute_rect(root, id)));
        self.hud.overlay(scene);
    }
}

/// Screen-space rect of the node `id` under `root`.
pub fn absolute_rect(root: &NodeRef, id: NodeId) -> Option<Rect> {
    let (list, origin) = {
        let w = root.lock();
        if w.node().id() == id {
            return Some(w.node().rect());
        }
        (w.children()?.clone(), w.node().pos - w.content_offset())
    };
    let (node, parent_origin) = list.find(id, origin)?;
    let rect = node.lock().node().rect();
    Some(rect.translate(parent_origin))
}

/// Number of nodes in the subtree.
pub fn count_nodes(root: &NodeRef) -> usize {
    let list = root.lock().children().cloned();
    1 + list
        .map(|l| l.snapshot().iter().map(count_nodes).sum::<usize>())
        .unwrap_or(0)
}

/// One line per node: `id [x y w h] flags`, children indented.
pub fn dump_tree(root: &NodeRef) -> String {
    let mut out = String::new();
    dump_into(root, 0, &mut out);
    out
}

fn dump_into(n: &NodeRef, depth: usize, out: &mut String) {
    let list = {
        let w = n.lock();
        let node = w.node();
        let r = node.rect();
        let mut flags = String::new();
        if !node.is_visible() {
            flags.push_str(" hidden");
        }
        if !node.is_active() {
            flags.push_str(" inactive");
        }
        if node.is_dirty() {
            flags.push_str(" dirty");
        }
        let _ = writeln!(
            out,
            "{:indent$}#{} [{} {} {} {}]{}",
            "",
            node.id(),
            r.x,
            r.y,
            r.w,
            r.h,
            flags,
            indent = depth * 2
        );
        w.children().cloned()
    };
    if let Some(list) = list {
        for c in list.snapshot() {
            dump_into(&c, depth + 1, out);
        }
    }
}

pub fn log_tree(root: &NodeRef) {
    for line in dump_tree(root).lines() {
        log::debug!("{line}");
    }
}
