pub use crate::color::Color;
pub use crate::container::{ChildList, Container};
pub use crate::error::UiError;
pub use crate::geometry::{Axis, Padding, Rect, Size, Vec2};
pub use crate::input::{EventKind, InputEvent, Key, Modifiers, PointerButton, Response};
pub use crate::locals::{
    Density, Dp, Metrics, Theme, density, dp_to_px, metrics, theme, with_density, with_metrics,
    with_theme,
};
pub use crate::node::{Align, Autoscale, Node, NodeId};
pub use crate::render_api::{FixedMeasure, RenderBackend, TextMeasure};
pub use crate::scene::{CursorIcon, Scene, SceneNode};
pub use crate::widget::{Handle, LabelPos, Labeled, NodeRef, Widget};
