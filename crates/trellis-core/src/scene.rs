use crate::{Color, Rect};

/// Display list produced by a draw pass. Coordinates are absolute px.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
    },
    Border {
        rect: Rect,
        color: Color,
        width: f32,
        radius: f32,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        size: f32,
    },
    PushClip {
        rect: Rect,
    },
    PopClip,
}

impl Scene {
    pub fn fill(&mut self, rect: Rect, color: Color, radius: f32) {
        self.nodes.push(SceneNode::Rect {
            rect,
            color,
            radius,
        });
    }

    pub fn border(&mut self, rect: Rect, color: Color, width: f32) {
        self.nodes.push(SceneNode::Border {
            rect,
            color,
            width,
            radius: 0.0,
        });
    }

    pub fn text(&mut self, rect: Rect, text: impl Into<String>, color: Color, size: f32) {
        self.nodes.push(SceneNode::Text {
            rect,
            text: text.into(),
            color,
            size,
        });
    }

    pub fn push_clip(&mut self, rect: Rect) {
        self.nodes.push(SceneNode::PushClip { rect });
    }

    pub fn pop_clip(&mut self) {
        self.nodes.push(SceneNode::PopClip);
    }
}

/// Pointer cursor requested by the hovered node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorIcon {
    #[default]
    Arrow,
    ResizeHorizontal,
    ResizeVertical,
    Crosshair,
}
