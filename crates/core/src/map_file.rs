//! JSON map envelope: metadata plus the base64 tile blob.
//!
//! Doors do not survive the tile codec, so the envelope lists them explicitly
//! and [`MapFile::restore_level`] reapplies them before re-deriving walls.

use std::fs;
use std::io;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::codec::{self, FormatError};
use crate::mapgen::catalog::{MonsterKind, PropKind};
use crate::mapgen::{
    GeneratedDungeon, GenerationParams, PropPlacement, RoamingClass, RoomId, SpawnPlan,
    SpawnPoint, TileGrid, WallSet, apply_wall_cells, derive_walls, populate_level,
};
use crate::types::{Cell, Pos};

pub const MAP_FORMAT_VERSION: u32 = 1;
pub const POPULATED_SUFFIX: &str = " (Populated)";

#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("map file I/O: {0}")]
    Io(#[from] io::Error),
    #[error("map file JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tile data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("tile data: {0}")]
    Format(#[from] FormatError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnemyEntry {
    #[serde(rename = "type")]
    pub kind: MonsterKind,
    /// Owning room, `-1` for roamers.
    pub room_id: i64,
    pub position: Pos,
    pub level: u8,
    pub is_boss: bool,
    #[serde(default)]
    pub roamer: bool,
    pub rotation_y: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropEntry {
    #[serde(rename = "type")]
    pub kind: PropKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation_y: f32,
    pub scale: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapFile {
    pub format_version: u32,
    pub name: String,
    pub seed: u64,
    pub width: usize,
    pub depth: usize,
    pub spawn_position: Pos,
    pub tile_data: String,
    #[serde(default)]
    pub doors: Vec<Pos>,
    #[serde(default)]
    pub enemies: Vec<EnemyEntry>,
    #[serde(default)]
    pub placed_props: Vec<PropEntry>,
}

/// Grid and walls rebuilt from a loaded map.
#[derive(Clone, Debug, PartialEq)]
pub struct RestoredLevel {
    pub grid: TileGrid,
    pub walls: WallSet,
}

impl MapFile {
    pub fn from_dungeon(dungeon: &GeneratedDungeon, name: &str) -> Result<Self, MapFileError> {
        let grid = &dungeon.grid;
        Ok(Self {
            format_version: MAP_FORMAT_VERSION,
            name: name.to_string(),
            seed: dungeon.seed,
            width: grid.width(),
            depth: grid.depth(),
            spawn_position: dungeon.spawn_position,
            tile_data: STANDARD.encode(codec::encode(grid)?),
            doors: grid.positions().filter(|&pos| grid.get(pos) == Cell::Door).collect(),
            enemies: dungeon.plan.enemies.iter().map(EnemyEntry::from).collect(),
            placed_props: dungeon.plan.props.iter().map(PropEntry::from).collect(),
        })
    }

    pub fn write_atomic(&self, path: &Path) -> Result<(), MapFileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, MapFileError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Decodes the tile blob. The blob header wins over the declared size.
    pub fn decode_grid(&self) -> Result<TileGrid, MapFileError> {
        let bytes = STANDARD.decode(self.tile_data.as_bytes())?;
        let grid = codec::decode(&bytes)?;
        if (grid.width(), grid.depth()) != (self.width, self.depth) {
            warn!(
                declared_width = self.width,
                declared_depth = self.depth,
                stored_width = grid.width(),
                stored_depth = grid.depth(),
                "map size disagrees with tile data header; using the header"
            );
        }
        Ok(grid)
    }

    /// Decodes the grid, reapplies doors, and re-derives walls.
    pub fn restore_level(&self) -> Result<RestoredLevel, MapFileError> {
        let mut grid = self.decode_grid()?;
        for &door in &self.doors {
            if grid.get(door) == Cell::Floor {
                grid.set(door, Cell::Door);
            }
        }
        let walls = derive_walls(&grid);
        apply_wall_cells(&mut grid, &walls);
        Ok(RestoredLevel { grid, walls })
    }

    pub fn spawn_points(&self) -> Vec<SpawnPoint> {
        self.enemies
            .iter()
            .map(|entry| SpawnPoint {
                pos: entry.position,
                tier: entry.level,
                is_boss: entry.is_boss,
                monster: entry.kind,
                roaming: if entry.roamer { RoamingClass::Roamer } else { RoamingClass::Normal },
                room: usize::try_from(entry.room_id).ok().map(RoomId),
                rotation_y: entry.rotation_y,
            })
            .collect()
    }

    /// Appends roaming packs and props planned over the restored level.
    ///
    /// Existing entries are kept and block new placements. Returns the additions.
    pub fn populate(&mut self, params: &GenerationParams) -> Result<SpawnPlan, MapFileError> {
        let level = self.restore_level()?;
        let added = populate_level(&level.grid, self.spawn_position, &self.spawn_points(), params);

        self.enemies.extend(added.enemies.iter().map(EnemyEntry::from));
        self.placed_props.extend(added.props.iter().map(PropEntry::from));
        if !self.name.ends_with(POPULATED_SUFFIX) {
            self.name.push_str(POPULATED_SUFFIX);
        }
        Ok(added)
    }
}

impl From<&SpawnPoint> for EnemyEntry {
    fn from(spawn: &SpawnPoint) -> Self {
        Self {
            kind: spawn.monster,
            room_id: spawn.room.map_or(-1, |room| room.0 as i64),
            position: spawn.pos,
            level: spawn.tier,
            is_boss: spawn.is_boss,
            roamer: spawn.roaming == RoamingClass::Roamer,
            rotation_y: spawn.rotation_y,
        }
    }
}

impl From<&PropPlacement> for PropEntry {
    fn from(prop: &PropPlacement) -> Self {
        Self {
            kind: prop.kind,
            x: prop.x,
            y: prop.y,
            z: prop.z,
            rotation_y: prop.rotation_y,
            scale: prop.scale,
        }
    }
}
