//! # Theme, density and sizing metrics
//!
//! Trellis keeps its ambient UI parameters in thread‑local "locals" that are
//! pushed for the duration of a closure:
//!
//! - `Theme` — colors used by the default drawing code.
//! - `Density` — dp→px scale factor.
//! - `Metrics` — default padding, spacing and control dimensions. Any node
//!   field left at its negative "unset" sentinel resolves against these.
//!
//! ```rust
//! use trellis_core::*;
//!
//! let roomy = Metrics { padding: 12.0, spacing: 8.0, ..Metrics::default() };
//! with_metrics(roomy, || {
//!     assert_eq!(metrics().padding, 12.0);
//! });
//! assert_eq!(metrics().padding, Metrics::default().padding);
//! ```
//!
//! Layout and drawing run on the UI thread, so the locals seen there are the
//! ones pushed around `Screen::layout` / `Screen::draw`.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::Color;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

/// density‑independent pixels (dp)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dp(pub f32);

impl Dp {
    /// Converts this dp value into physical pixels using the current Density.
    pub fn to_px(self) -> f32 {
        self.0 * density().scale
    }
}

/// Convenience: convert a raw dp scalar into px using current Density.
pub fn dp_to_px(dp: f32) -> f32 {
    Dp(dp).to_px()
}

fn with_local<T: Any, R>(value: T, f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| {
        let mut frame: HashMap<TypeId, Box<dyn Any>> = HashMap::new();
        frame.insert(TypeId::of::<T>(), Box::new(value));
        st.borrow_mut().push(frame);
    });
    let _guard = Guard;
    f()
}

fn local<T: Any + Copy + Default>() -> T {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return *t;
            }
        }
        T::default()
    })
}

/// Colors for the default drawing code. Styling is out of scope; this is
/// just enough for a readable debug rendering.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub on_surface: Color,
    pub primary: Color,
    pub outline: Color,
    pub disabled: Color,
    pub scrollbar_track: Color,
    pub scrollbar_thumb: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#121212"),
            surface: Color::from_hex("#1E1E1E"),
            on_surface: Color::from_hex("#DDDDDD"),
            primary: Color::from_hex("#34AF82"),
            outline: Color::from_hex("#555555"),
            disabled: Color::from_hex("#777777"),
            scrollbar_track: Color(0xDD, 0xDD, 0xDD, 32),
            scrollbar_thumb: Color(0xDD, 0xDD, 0xDD, 140),
            error: Color::from_hex("#ae3636"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Density {
    pub scale: f32, // dp→px multiplier
}

impl Default for Density {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Default sizing. All values are dp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// Padding used when a node leaves an edge unset.
    pub padding: f32,
    /// Gap between children of ordered containers and grids.
    pub spacing: f32,
    /// Gap between a label and its action.
    pub label_gap: f32,
    pub font_size: f32,
    /// Default height for buttons, sliders and similar controls.
    pub control_height: f32,
    /// Vertical padding around each popup menu item.
    pub item_padding: f32,
    pub scrollbar_thickness: f32,
    /// Pixels scrolled per wheel notch.
    pub wheel_step: f32,
    /// Distance from a splitter seam that still counts as "on" it.
    pub split_tolerance: f32,
    /// Smallest size a splitter lets either neighbor shrink to.
    pub min_split: f32,
    /// Snap distance for splitter targets.
    pub snap_threshold: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            padding: 4.0,
            spacing: 4.0,
            label_gap: 6.0,
            font_size: 14.0,
            control_height: 24.0,
            item_padding: 4.0,
            scrollbar_thickness: 6.0,
            wheel_step: 20.0,
            split_tolerance: 3.0,
            min_split: 16.0,
            snap_threshold: 8.0,
        }
    }
}

pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    with_local(theme, f)
}

pub fn with_density<R>(density: Density, f: impl FnOnce() -> R) -> R {
    with_local(density, f)
}

pub fn with_metrics<R>(m: Metrics, f: impl FnOnce() -> R) -> R {
    with_local(m, f)
}

pub fn theme() -> Theme {
    local::<Theme>()
}

pub fn density() -> Density {
    local::<Density>()
}

/// Current metrics, already converted to px.
pub fn metrics() -> Metrics {
    let m = local::<Metrics>();
    let s = density().scale;
    if s == 1.0 {
        return m;
    }
    Metrics {
        padding: m.padding * s,
        spacing: m.spacing * s,
        label_gap: m.label_gap * s,
        font_size: m.font_size * s,
        control_height: m.control_height * s,
        item_padding: m.item_padding * s,
        scrollbar_thickness: m.scrollbar_thickness * s,
        wheel_step: m.wheel_step * s,
        split_tolerance: m.split_tolerance * s,
        min_split: m.min_split * s,
        snap_threshold: m.snap_threshold * s,
    }
}
