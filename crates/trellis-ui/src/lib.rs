//! Layouts, composites, scrolling, popups, 3D picking and value controls.
//!
//! Everything here is a [`trellis_core::Widget`]. Containers share the
//! core's child-list, hit-test and dispatch machinery and differ only in how
//! `arrange` places children:
//!
//! - [`Linear`] / [`Aligner`]: ordered placement along one axis;
//! - [`LabeledWidget`] / [`LabelGroup`]: label + action composites with
//!   aligned label columns;
//! - [`Splitter`]: draggable seams between neighbors;
//! - [`Grid`]: row-major cells;
//! - [`ScrollView`]: clipped, offset content with fading scrollbars.
//!
//! [`Screen`] ties a root node, pointer grab, hover tracking and the popup
//! overlays together for a host loop.

pub mod builder;
pub mod grid;
pub mod labeled;
pub mod linear;
pub mod picker;
pub mod popup;
pub mod screen;
pub mod scroll;
pub mod splitter;
pub mod tests;
pub mod value;
pub mod widgets;

pub use builder::Builder;
pub use grid::Grid;
pub use labeled::{LabelGroup, LabeledWidget};
pub use linear::{Aligner, Linear};
pub use picker::{DepthSampler, PickState, Picker3d, Viewport3d};
pub use popup::{MenuEvent, MenuItem, MenuStack, PopupMenu, SEPARATOR};
pub use screen::{DismissReason, PopupHost, Screen};
pub use scroll::{ScrollState, ScrollView};
pub use splitter::Splitter;
pub use value::{Checkbox, NumberBox, Slider, ValueSlot};
pub use widgets::{Block, Button, Label};

use trellis_core::{ChildList, container::Snapshot};

/// Visible children of `list`, in order.
pub(crate) fn visible(list: &ChildList) -> Snapshot {
    list.snapshot()
        .into_iter()
        .filter(|c| c.lock().node().is_visible())
        .collect()
}
