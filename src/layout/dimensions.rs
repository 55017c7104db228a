//! Speaker tile sizing.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::utils::geometry::Extent;

/// Computed size of the speaker tile.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Fits the speaker tile into `container`.
///
/// The tile fills the container width minus the margin at the configured
/// aspect ratio. A dual-stream speaker gets half of that width so camera and
/// screen can sit side by side. If the result is too tall for the container,
/// height is pinned to the available height and width follows the ratio.
/// Containers smaller than the margins yield a zero-sized tile.
pub fn compute_dimensions(container: Extent, is_dual_stream: bool, config: &LayoutConfig) -> Dimensions {
    let ratio = config.aspect_ratio;
    let height_for = |width: f64| width / ratio.width * ratio.height;

    let mut width = (container.width - config.margin_width).max(0.0);
    let mut height = height_for(width);

    if is_dual_stream {
        width /= 2.0;
        height = height_for(width);
    }

    let available_height = (container.height - config.margin_height).max(0.0);
    if height > available_height {
        height = available_height;
        width = height / ratio.height * ratio.width;
    }

    Dimensions { width, height }
}
