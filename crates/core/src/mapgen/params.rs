//! Explicit generation parameters, loaded from TOML and validated before use.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec;

/// Highest distance tier a spawn point can receive.
pub const MAX_TIER: u8 = 5;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read parameter file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse parameter file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub fn contains(self, value: usize) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasParams {
    pub width: usize,
    pub depth: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomParams {
    pub count: CountRange,
    pub size: CountRange,
    pub buffer_margin: usize,
    pub max_attempts: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpawnParams {
    /// Ascending distance cut-offs; a point below `tier_thresholds[i]` gets tier `i + 1`.
    pub tier_thresholds: Vec<f32>,
    pub per_room: CountRange,
    pub min_separation: f32,
    /// No enemy, room-bound or roaming, is placed closer than this to the spawn position.
    pub safe_zone_radius: f32,
    pub boss_chance: f64,
    pub boss_min_distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoamingParams {
    pub cells_per_cluster: usize,
    pub max_clusters: usize,
    pub cluster_size: CountRange,
    pub cluster_radius: i32,
    pub min_spawn_distance: f32,
    pub anchor_clearance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropParams {
    pub cells_per_prop: usize,
    pub min_separation: f32,
}

/// Everything a generation pass depends on. There is intentionally no `Default`:
/// every value has to be spelled out by the caller or a parameter file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationParams {
    pub seed: u64,
    pub canvas: CanvasParams,
    pub rooms: RoomParams,
    pub corridor_width: usize,
    pub chunk_edge: usize,
    pub spawns: SpawnParams,
    pub roaming: RoamingParams,
    pub props: PropParams,
}

impl GenerationParams {
    pub fn from_toml_str(source: &str) -> Result<Self, ParamsError> {
        let params: Self = toml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: &Path) -> Result<Self, ParamsError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        let CanvasParams { width, depth } = self.canvas;
        ensure(width > 0 && depth > 0, "canvas width and depth must be positive")?;
        codec::ensure_encodable(width, depth)
            .map_err(|error| ParamsError::Invalid(format!("canvas: {error}")))?;

        let rooms = &self.rooms;
        ensure_range(rooms.count, "rooms.count")?;
        ensure(rooms.count.min >= 1, "rooms.count.min must be at least 1")?;
        ensure_range(rooms.size, "rooms.size")?;
        ensure(rooms.size.min >= 1, "rooms.size.min must be at least 1")?;
        // One void cell on every side of a room keeps its walls inside the canvas.
        ensure(
            rooms.size.max + 2 <= width && rooms.size.max + 2 <= depth,
            "rooms.size.max plus a one-cell border must fit inside the canvas",
        )?;
        ensure(rooms.max_attempts >= 1, "rooms.max_attempts must be at least 1")?;

        ensure(self.corridor_width >= 1, "corridor_width must be at least 1")?;
        ensure(self.chunk_edge >= 1, "chunk_edge must be at least 1")?;

        let spawns = &self.spawns;
        ensure(
            spawns.tier_thresholds.len() < MAX_TIER as usize,
            "spawns.tier_thresholds may hold at most four cut-offs",
        )?;
        ensure(
            spawns.tier_thresholds.iter().all(|threshold| threshold.is_finite()),
            "spawns.tier_thresholds must be finite",
        )?;
        ensure(
            spawns.tier_thresholds.windows(2).all(|pair| pair[0] < pair[1]),
            "spawns.tier_thresholds must be strictly increasing",
        )?;
        ensure_range(spawns.per_room, "spawns.per_room")?;
        ensure(
            spawns.min_separation.is_finite() && spawns.min_separation >= 0.0,
            "spawns.min_separation must be a non-negative number",
        )?;
        ensure(
            spawns.safe_zone_radius.is_finite() && spawns.safe_zone_radius >= 0.0,
            "spawns.safe_zone_radius must be a non-negative number",
        )?;
        ensure(
            (0.0..=1.0).contains(&spawns.boss_chance),
            "spawns.boss_chance must lie in [0, 1]",
        )?;
        ensure(spawns.boss_min_distance.is_finite(), "spawns.boss_min_distance must be finite")?;

        let roaming = &self.roaming;
        ensure(roaming.cells_per_cluster >= 1, "roaming.cells_per_cluster must be at least 1")?;
        ensure_range(roaming.cluster_size, "roaming.cluster_size")?;
        ensure(roaming.cluster_radius >= 0, "roaming.cluster_radius must not be negative")?;
        ensure(
            roaming.min_spawn_distance.is_finite() && roaming.anchor_clearance.is_finite(),
            "roaming distances must be finite",
        )?;

        ensure(self.props.cells_per_prop >= 1, "props.cells_per_prop must be at least 1")?;
        ensure(
            self.props.min_separation.is_finite() && self.props.min_separation >= 0.0,
            "props.min_separation must be a non-negative number",
        )?;
        Ok(())
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), ParamsError> {
    if condition { Ok(()) } else { Err(ParamsError::Invalid(message.to_string())) }
}

fn ensure_range(range: CountRange, name: &str) -> Result<(), ParamsError> {
    if range.min <= range.max {
        Ok(())
    } else {
        Err(ParamsError::Invalid(format!(
            "{name}: min {} is greater than max {}",
            range.min, range.max
        )))
    }
}

#[cfg(test)]
pub(crate) mod test_params {
    use super::*;

    /// The 80x80 reference layout used across unit and integration tests.
    pub(crate) fn standard(seed: u64) -> GenerationParams {
        GenerationParams {
            seed,
            canvas: CanvasParams { width: 80, depth: 80 },
            rooms: RoomParams {
                count: CountRange { min: 5, max: 8 },
                size: CountRange { min: 8, max: 16 },
                buffer_margin: 1,
                max_attempts: 500,
            },
            corridor_width: 5,
            chunk_edge: 16,
            spawns: SpawnParams {
                tier_thresholds: vec![30.0, 60.0, 100.0, 150.0],
                per_room: CountRange { min: 2, max: 4 },
                min_separation: 3.0,
                safe_zone_radius: 15.0,
                boss_chance: 0.25,
                boss_min_distance: 40.0,
            },
            roaming: RoamingParams {
                cells_per_cluster: 500,
                max_clusters: 20,
                cluster_size: CountRange { min: 3, max: 5 },
                cluster_radius: 4,
                min_spawn_distance: 40.0,
                anchor_clearance: 10.0,
            },
            props: PropParams { cells_per_prop: 50, min_separation: 2.0 },
        }
    }
}
