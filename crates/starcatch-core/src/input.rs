use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The four directional keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Identifies one pointer (mouse or touch point) across its down/up pair.
pub type PointerId = u32;

/// Raw input delivered by the host, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Direction),
    KeyUp(Direction),
    PointerDown { id: PointerId, position: Vec2 },
    PointerUp { id: PointerId, position: Vec2 },
}

/// What the host device can deliver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCapabilities {
    pub touch: bool,
}
