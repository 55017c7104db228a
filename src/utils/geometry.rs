use serde::{Deserialize, Serialize};

/// Size of a surface in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// One percent of the smaller axis, the CSS `vmin` unit.
    pub fn vmin(&self) -> f64 {
        self.width.min(self.height) / 100.0
    }
}

/// Measurements sampled from the host when the window changes.
///
/// `window` drives the thumbnail size, `container` is the element
/// that hosts the speaker tile.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub window: Extent,
    pub container: Extent,
}
