use serde::{Deserialize, Serialize};

/// Integer grid coordinate. `x` runs along the canvas width, `z` along its depth.
///
/// Field order gives row-major ordering (`z` first, then `x`), which matches the
/// scan order of the tile grid and the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub z: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { z, x }
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self { z: self.z + dz, x: self.x + dx }
    }

    pub fn distance_to(self, other: Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Void,
    Floor,
    Wall,
    Door,
}

impl Cell {
    /// Floor and doorways can be walked on; both count as floor for the codec.
    pub fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Door)
    }
}
