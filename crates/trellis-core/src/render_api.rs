use crate::{Scene, Size};

pub trait RenderBackend {
    fn configure_surface(&mut self, width: u32, height: u32);
    fn frame(&mut self, scene: &Scene);
}

/// Text measurement collaborator. Implementations wrap a real shaper; the
/// core only needs the rendered extent.
pub trait TextMeasure: Send + Sync {
    fn measure(&self, text: &str, font_px: f32) -> Size;
}

/// Fixed-advance measurement: every char is `advance × font_px` wide and a
/// line is `line_height × font_px` tall. Good enough for headless layout.
#[derive(Clone, Copy, Debug)]
pub struct FixedMeasure {
    pub advance: f32,
    pub line_height: f32,
}

impl Default for FixedMeasure {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_height: 1.25,
        }
    }
}

impl TextMeasure for FixedMeasure {
    fn measure(&self, text: &str, font_px: f32) -> Size {
        let lines = text.lines().count().max(1);
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            widest as f32 * self.advance * font_px,
            lines as f32 * self.line_height * font_px,
        )
    }
}
