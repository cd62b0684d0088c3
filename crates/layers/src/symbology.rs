use serde::{Deserialize, Serialize};

/// 8-bit RGBA, the color format of the overlay renderer.
pub type Rgba = [u8; 4];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub visible: bool,
    pub filled: bool,
    pub fill_color: Rgba,
}

impl LayerStyle {
    pub const fn new(visible: bool, filled: bool, fill_color: Rgba) -> Self {
        Self {
            visible,
            filled,
            fill_color,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            filled: true,
            fill_color: [30, 100, 220, 150],
        }
    }
}
