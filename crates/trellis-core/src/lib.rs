//! # Nodes, containers and dispatch
//!
//! Trellis is a retained-mode toolkit: the UI is a tree of long-lived nodes
//! that keep their own geometry and state between frames. This crate holds
//! the pieces every widget shares:
//!
//! - `Node` — geometry, padding, alignment/autoscale flags, dirty/damage flags.
//! - `Widget` — the trait every tree element implements, with capability
//!   accessors (`children()`, `labeled()`, ...) instead of downcasts.
//! - `ChildList` / `Container` — ordered, lock-guarded child ownership,
//!   hit-testing and first-match event dispatch.
//! - `Scene` — the display list a draw pass produces for a `RenderBackend`.
//!
//! ## Building a small tree
//!
//! ```rust
//! use trellis_core::*;
//!
//! let root = Container::new();
//! let mut leaf = Container::new();
//! leaf.node_mut().set_pos(Vec2::new(10.0, 10.0));
//! leaf.node_mut().set_request(Size::new(20.0, 20.0));
//! let leaf = NodeRef::new(leaf);
//!
//! assert!(root.add(leaf.clone()));
//! assert!(!root.add(leaf.clone())); // already present
//! assert_eq!(root.list().len(), 1);
//! ```
//!
//! ## Dirty flags
//!
//! Any geometry-affecting setter marks the node dirty. `changed()` reports the
//! node's own flag or any descendant's, and the layout pass only runs when it
//! is true, so a second `arrange` with nothing changed is a no-op:
//!
//! ```rust
//! use trellis_core::*;
//!
//! let root = NodeRef::new(Container::new());
//! assert!(root.layout());
//! assert!(!root.layout());
//! ```
//!
//! ## Threads
//!
//! Layout, drawing and dispatch run on one UI thread. Child lists may be
//! mutated from elsewhere; see the `container` module for the locking rules.

pub mod color;
pub mod container;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locals;
pub mod node;
pub mod prelude;
pub mod render_api;
pub mod scene;
pub mod tests;
pub mod widget;

pub use color::*;
pub use container::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use locals::*;
pub use node::*;
pub use render_api::*;
pub use scene::*;
pub use widget::*;
