//! Interfaces to the presentation layer.
//!
//! The core never touches glyph geometry. A pointer resolver turns screen
//! positions into character indices, and a selection observer (the mask
//! renderer) is told whenever a surface's intervals change.

use crate::id::TextSurfaceId;
use crate::interval::Interval;

/// A position in screen space, in whatever units the host uses.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl ScreenPos {
    /// Create a position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Maps a screen position on a surface to a character index.
pub trait PointerResolver {
    /// The character under `pos`, or `None` if the pointer is off the text.
    fn resolve(&self, pos: ScreenPos, surface: &TextSurfaceId) -> Option<usize>;
}

/// Receives selection changes, typically to redraw black-box masks.
pub trait SelectionObserver {
    /// Called after every change to a surface's committed or pending selection.
    fn selection_changed(
        &mut self,
        surface: &TextSurfaceId,
        committed: &[Interval],
        pending: Option<Interval>,
    );
}
