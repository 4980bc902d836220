//! Public data models for generated dungeons, rooms, and spawn plans.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::chunks::{CancelToken, ChunkBuild, GeometryBuilder};
use crate::types::{Cell, Pos};

use super::catalog::{MonsterKind, PropKind};
use super::corridors::Corridor;
use super::grid::TileGrid;
use super::layout::RoomRect;
use super::walls::WallSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Spawn,
    Chamber,
    Hall,
    Lair,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub rect: RoomRect,
    pub kind: RoomKind,
    pub cleared: bool,
}

impl Room {
    pub fn center(&self) -> Pos {
        self.rect.center()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.rect.contains(pos)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoamingClass {
    Normal,
    Roamer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub pos: Pos,
    /// Distance tier, 1 through [`super::params::MAX_TIER`].
    pub tier: u8,
    pub is_boss: bool,
    pub monster: MonsterKind,
    pub roaming: RoamingClass,
    pub room: Option<RoomId>,
    pub rotation_y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropPlacement {
    pub kind: PropKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation_y: f32,
    pub scale: f32,
}

/// A room that could not hold its drawn spawn count at the configured separation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityShortfall {
    pub room: RoomId,
    pub requested: usize,
    pub placed: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnPlan {
    pub enemies: Vec<SpawnPoint>,
    pub props: Vec<PropPlacement>,
    pub shortfalls: Vec<CapacityShortfall>,
}

impl SpawnPlan {
    pub fn bosses(&self) -> impl Iterator<Item = &SpawnPoint> {
        self.enemies.iter().filter(|spawn| spawn.is_boss)
    }
}

/// Output of one complete generation pass; immutable once handed out.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedDungeon {
    pub seed: u64,
    pub chunk_edge: usize,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub grid: TileGrid,
    pub walls: WallSet,
    pub spawn_position: Pos,
    pub plan: SpawnPlan,
}

impl GeneratedDungeon {
    pub fn spawn_room(&self) -> &Room {
        &self.rooms[0]
    }

    pub fn chunk_build<B: GeometryBuilder>(
        &self,
        builder: B,
        cancel: CancelToken,
    ) -> ChunkBuild<'_, B> {
        ChunkBuild::new(&self.grid, &self.walls, self.chunk_edge, builder, cancel)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.seed.to_le_bytes());
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.depth() as u32).to_le_bytes());
        for cell in self.grid.cells() {
            bytes.push(match cell {
                Cell::Void => 0,
                Cell::Floor => 1,
                Cell::Wall => 2,
                Cell::Door => 3,
            });
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            for value in [room.rect.x, room.rect.z, room.rect.width, room.rect.depth] {
                bytes.extend((value as u32).to_le_bytes());
            }
            bytes.push(room.kind as u8);
        }

        bytes.extend(self.spawn_position.x.to_le_bytes());
        bytes.extend(self.spawn_position.z.to_le_bytes());

        bytes.extend((self.plan.enemies.len() as u32).to_le_bytes());
        for spawn in &self.plan.enemies {
            bytes.extend(spawn.pos.x.to_le_bytes());
            bytes.extend(spawn.pos.z.to_le_bytes());
            bytes.push(spawn.tier);
            bytes.push(u8::from(spawn.is_boss));
            bytes.push(spawn.monster as u8);
            bytes.push(spawn.roaming as u8);
            bytes.extend(spawn.rotation_y.to_bits().to_le_bytes());
        }

        bytes.extend((self.plan.props.len() as u32).to_le_bytes());
        for prop in &self.plan.props {
            bytes.push(prop.kind as u8);
            for value in [prop.x, prop.y, prop.z, prop.rotation_y, prop.scale] {
                bytes.extend(value.to_bits().to_le_bytes());
            }
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
