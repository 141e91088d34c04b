//! Row-major grid with per-column and per-row track sizing.

use trellis_core::*;

use crate::visible;

/// Lays visible children out row-major. Column widths are the largest
/// child minimum width in each column, row heights likewise per row, and
/// every child is sized to its cell. Hidden children take no cell.
pub struct Grid {
    node: Node,
    children: ChildList,
    columns: Option<usize>,
    spacing: f32,
    cols: Vec<f32>,
    rows: Vec<f32>,
    content: Rect,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        let node = Node::new();
        let children = ChildList::new(&node);
        Self {
            node,
            children,
            columns: None,
            spacing: -1.0,
            cols: Vec::new(),
            rows: Vec::new(),
            content: Rect::default(),
        }
    }

    pub fn with_columns(n: usize) -> Self {
        Self {
            columns: Some(n.max(1)),
            ..Self::new()
        }
    }

    pub fn list(&self) -> &ChildList {
        &self.children
    }

    pub fn add(&self, n: impl Into<NodeRef>) -> bool {
        self.children.add(n)
    }

    pub fn set_columns(&mut self, n: Option<usize>) {
        self.columns = n.map(|n| n.max(1));
        self.node.mark_dirty();
    }

    pub fn set_spacing(&mut self, s: f32) {
        if self.spacing != s {
            self.spacing = s;
            self.node.mark_dirty();
        }
    }

    pub fn spacing(&self) -> f32 {
        if self.spacing < 0.0 {
            metrics().spacing
        } else {
            self.spacing
        }
    }

    /// Explicit count, or ceil(sqrt(visible children)).
    pub fn columns(&self) -> usize {
        self.columns.unwrap_or_else(|| {
            let n = visible(&self.children).len();
            (n as f64).sqrt().ceil() as usize
        })
        .max(1)
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.cols
    }

    pub fn row_heights(&self) -> &[f32] {
        &self.rows
    }

    pub fn content_rect(&self) -> Rect {
        self.content
    }

    fn tracks(&self, kids: &[NodeRef]) -> (Vec<f32>, Vec<f32>) {
        let ncols = self.columns();
        let nrows = kids.len().div_ceil(ncols);
        let mut cols = vec![0.0f32; ncols.min(kids.len())];
        let mut rows = vec![0.0f32; nrows];
        for (k, c) in kids.iter().enumerate() {
            let m = c.lock().min_size();
            let (col, row) = (k % ncols, k / ncols);
            cols[col] = cols[col].max(m.width);
            rows[row] = rows[row].max(m.height);
        }
        (cols, rows)
    }

    fn extent(&self, tracks: &[f32]) -> f32 {
        tracks.iter().sum::<f32>() + self.spacing() * tracks.len().saturating_sub(1) as f32
    }
}

impl Widget for Grid {
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
        let kids = visible(&self.children);
        let (cols, rows) = self.tracks(&kids);
        let pad = self.node.padding().total();
        Size::new(
            self.extent(&cols) + pad.width,
            self.extent(&rows) + pad.height,
        )
        .max(self.node.min())
    }

    fn arrange(&mut self) {
        self.children.arrange_changed();
        let kids = visible(&self.children);
        let (cols, rows) = self.tracks(&kids);
        let ncols = self.columns();
        let spacing = self.spacing();
        let pad = self.node.padding();

        for (k, c) in kids.iter().enumerate() {
            let (col, row) = (k % ncols, k / ncols);
            let x = pad.left + cols[..col].iter().sum::<f32>() + spacing * col as f32;
            let y = pad.top + rows[..row].iter().sum::<f32>() + spacing * row as f32;
            let mut w = c.lock();
            w.node_mut().set_pos(Vec2::new(x, y));
            w.node_mut().set_request(Size::new(cols[col], rows[row]));
            if w.changed() {
                w.arrange();
            }
        }
        self.cols = cols;
        self.rows = rows;
        self.content = self.children.content_bounds(pad);
        let min = self.min_size();
        self.node.finalize(min);
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
