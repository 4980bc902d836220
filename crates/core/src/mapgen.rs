//! Procedural dungeon generation split into coherent submodules.

pub mod catalog;
pub mod model;
pub mod params;

mod context;
mod corridors;
mod generator;
mod grid;
mod layout;
mod populate;
mod props;
mod seed;
mod spawns;
mod walls;

use thiserror::Error;

pub use context::GenerationContext;
pub use corridors::{Corridor, connect_rooms};
pub use generator::DungeonGenerator;
pub use grid::{TileGrid, build_tile_grid};
pub use layout::{RoomRect, place_rooms};
pub use model::{
    CapacityShortfall, GeneratedDungeon, PropPlacement, RoamingClass, Room, RoomId, RoomKind,
    SpawnPlan, SpawnPoint,
};
pub use params::{GenerationParams, MAX_TIER, ParamsError};
pub use populate::populate_level;
pub use seed::{SubStream, Subsystem};
pub use spawns::tier_for_distance;
pub use walls::{Side, WallEdge, WallSet, apply_wall_cells, derive_walls};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid generation parameters: {0}")]
    InvalidParams(#[from] ParamsError),
    #[error("placed {placed} of {required} required rooms after {attempts} attempts")]
    PlacementExhausted { placed: usize, required: usize, attempts: u32 },
}

pub fn generate_dungeon(params: GenerationParams) -> Result<GeneratedDungeon, GenerationError> {
    DungeonGenerator::new(params)?.generate()
}

#[cfg(test)]
mod tests {
    use super::DungeonGenerator;
    use super::params::test_params::standard;

    #[test]
    fn generate_dungeon_matches_generator_output() {
        let from_helper = super::generate_dungeon(standard(123)).expect("helper generates");
        let from_generator = DungeonGenerator::new(standard(123))
            .and_then(|generator| generator.generate())
            .expect("generator generates");

        assert_eq!(from_helper, from_generator);
    }
}
