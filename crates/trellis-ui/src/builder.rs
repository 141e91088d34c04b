//! Nested construction with an explicit parent stack.
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis_core::*;
//! use trellis_ui::Builder;
//!
//! let mut b = Builder::new(Arc::new(FixedMeasure::default()));
//! let root = b.column(|b| {
//!     b.label("Name");
//!     b.row(|b| {
//!         b.button("Ok", || {});
//!         b.button("Cancel", || {});
//!     });
//! });
//! assert_eq!(root.lock().list().len(), 2);
//! ```

use std::sync::Arc;

use trellis_core::*;

use crate::{
    Aligner, Block, Button, Grid, Label, LabelGroup, LabeledWidget, Linear, ScrollView, Splitter,
};

/// Adds every widget it creates to the innermost open container.
pub struct Builder {
    measure: Arc<dyn TextMeasure>,
    stack: Vec<ChildList>,
}

impl Builder {
    pub fn new(measure: Arc<dyn TextMeasure>) -> Self {
        Self {
            measure,
            stack: Vec::new(),
        }
    }

    /// Builds into an existing container.
    pub fn into_list(measure: Arc<dyn TextMeasure>, list: ChildList) -> Self {
        Self {
            measure,
            stack: vec![list],
        }
    }

    pub fn measure(&self) -> Arc<dyn TextMeasure> {
        self.measure.clone()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn add<W: Widget + 'static>(&mut self, w: W) -> Handle<W> {
        let h = Handle::new(w);
        if let Some(top) = self.stack.last() {
            top.add(&h);
        }
        h
    }

    /// Adds `w`, then runs `f` with `w` as the open container.
    pub fn nest<W: Widget + 'static>(&mut self, w: W, f: impl FnOnce(&mut Builder)) -> Handle<W> {
        let list = w.children().cloned();
        let h = self.add(w);
        match list {
            Some(list) => {
                self.stack.push(list);
                f(self);
                self.stack.pop();
            }
            None => log::warn!("nest: {} has no children; contents skipped", h.id()),
        }
        h
    }

    pub fn row(&mut self, f: impl FnOnce(&mut Builder)) -> Handle<Linear> {
        self.nest(Linear::row(), f)
    }

    pub fn column(&mut self, f: impl FnOnce(&mut Builder)) -> Handle<Linear> {
        self.nest(Linear::column(), f)
    }

    pub fn aligner(&mut self, axis: Axis, f: impl FnOnce(&mut Builder)) -> Handle<Aligner> {
        self.nest(Aligner::new(axis), f)
    }

    pub fn group(&mut self, f: impl FnOnce(&mut Builder)) -> Handle<LabelGroup> {
        self.nest(LabelGroup::new(), f)
    }

    pub fn grid(&mut self, columns: Option<usize>, f: impl FnOnce(&mut Builder)) -> Handle<Grid> {
        let mut g = Grid::new();
        g.set_columns(columns);
        self.nest(g, f)
    }

    pub fn splitter(&mut self, axis: Axis, f: impl FnOnce(&mut Builder)) -> Handle<Splitter> {
        self.nest(Splitter::new(axis), f)
    }

    /// Scroll view around a column built by `f`.
    pub fn scroll(&mut self, f: impl FnOnce(&mut Builder)) -> Handle<ScrollView> {
        let mut inner = Builder::new(self.measure.clone());
        let content = inner.column(f);
        self.add(ScrollView::new(content))
    }

    pub fn label(&mut self, text: impl Into<String>) -> Handle<Label> {
        let m = self.measure.clone();
        self.add(Label::new(text, m))
    }

    pub fn button(
        &mut self,
        text: impl Into<String>,
        on_click: impl FnMut() + Send + 'static,
    ) -> Handle<Button> {
        let m = self.measure.clone();
        self.add(Button::new(text, m).on_click(on_click))
    }

    pub fn block(&mut self, min: Size) -> Handle<Block> {
        self.add(Block::new(min))
    }

    /// Label composite around `action`.
    pub fn labeled<W: Widget + 'static>(
        &mut self,
        text: impl Into<String>,
        action: W,
    ) -> (Handle<LabeledWidget>, Handle<W>) {
        let action = Handle::new(action);
        let m = self.measure.clone();
        let composite = self.add(LabeledWidget::new(text, &action, m));
        (composite, action)
    }
}
