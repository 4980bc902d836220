pub mod chunks;
pub mod codec;
pub mod map_file;
pub mod mapgen;
pub mod types;

pub use chunks::{
    BuiltChunk, CancelToken, ChunkBuild, ChunkDescriptor, ChunkView, GeometryBuilder, plan_chunks,
};
pub use codec::FormatError;
pub use map_file::{MapFile, MapFileError, RestoredLevel};
pub use mapgen::{
    DungeonGenerator, GeneratedDungeon, GenerationError, GenerationParams, SpawnPlan,
    generate_dungeon,
};
pub use types::*;
