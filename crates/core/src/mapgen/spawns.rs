//! Enemy spawn planning: per-room tiered placement, boss rolls, and roaming packs.

use std::f32::consts::TAU;

use tracing::{debug, warn};

use crate::types::{Cell, Pos};

use super::catalog::{BOSSES, cluster_pool, tier_pool};
use super::grid::TileGrid;
use super::model::{CapacityShortfall, RoamingClass, Room, SpawnPoint};
use super::params::{MAX_TIER, RoamingParams, SpawnParams};
use super::seed::SubStream;

/// Step function from distance to tier: one tier per threshold crossed.
///
/// Monotonic non-decreasing in `distance` for ascending `thresholds`.
pub fn tier_for_distance(thresholds: &[f32], distance: f32) -> u8 {
    let crossed = thresholds.iter().take_while(|&&threshold| distance >= threshold).count();
    (1 + crossed).min(MAX_TIER as usize) as u8
}

pub(super) struct SpawnContext<'a> {
    pub(super) grid: &'a TileGrid,
    pub(super) rooms: &'a [Room],
    pub(super) spawn_position: Pos,
    pub(super) spawns: &'a SpawnParams,
    pub(super) roaming: &'a RoamingParams,
}

impl SpawnContext<'_> {
    fn tier_at(&self, pos: Pos) -> u8 {
        tier_for_distance(&self.spawns.tier_thresholds, self.spawn_position.distance_to(pos))
    }

    fn outside_safe_zone(&self, pos: Pos) -> bool {
        self.spawn_position.distance_to(pos) >= self.spawns.safe_zone_radius
    }
}

fn is_clear(pos: Pos, occupied: &[Pos], min_separation: f32) -> bool {
    occupied.iter().all(|&other| other.distance_to(pos) >= min_separation)
}

pub(super) struct RoomSpawns {
    pub(super) points: Vec<SpawnPoint>,
    pub(super) shortfalls: Vec<CapacityShortfall>,
}

/// Places a drawn number of enemies in every room but the spawn room.
pub(super) fn plan_room_spawns(
    context: &SpawnContext<'_>,
    stream: &mut SubStream,
    cosmetics: &mut SubStream,
) -> RoomSpawns {
    let mut points: Vec<SpawnPoint> = Vec::new();
    let mut shortfalls = Vec::new();
    let mut occupied = vec![context.spawn_position];
    let spawn_center = context.rooms[0].center();

    for room in context.rooms.iter().skip(1) {
        let room_distance = spawn_center.distance_to(room.center());
        let per_room = context.spawns.per_room;
        let requested = stream.range_usize(per_room.min, per_room.max);

        let mut candidates: Vec<Pos> = room
            .rect
            .positions()
            .filter(|&pos| context.grid.get(pos) == Cell::Floor && context.outside_safe_zone(pos))
            .collect();
        stream.shuffle(&mut candidates);

        let first_index = points.len();
        for pos in candidates {
            if points.len() - first_index == requested {
                break;
            }
            if !is_clear(pos, &occupied, context.spawns.min_separation) {
                continue;
            }
            let tier = context.tier_at(pos);
            points.push(SpawnPoint {
                pos,
                tier,
                is_boss: false,
                monster: stream.pick(tier_pool(tier)),
                roaming: RoamingClass::Normal,
                room: Some(room.id),
                rotation_y: cosmetics.range_f32(0.0, TAU),
            });
            occupied.push(pos);
        }

        let placed = points.len() - first_index;
        if placed < requested {
            warn!(
                room = room.id.0,
                requested,
                placed,
                min_separation = context.spawns.min_separation,
                "room cannot fit its spawn count at the configured separation"
            );
            shortfalls.push(CapacityShortfall { room: room.id, requested, placed });
        }

        if placed > 0
            && room_distance >= context.spawns.boss_min_distance
            && stream.chance(context.spawns.boss_chance)
        {
            let boss = &mut points[first_index];
            boss.is_boss = true;
            boss.monster = stream.pick(BOSSES);
            debug!(room = room.id.0, monster = boss.monster.tag(), "promoted spawn to boss");
        }
    }

    RoomSpawns { points, shortfalls }
}

/// Scatters small roaming packs over floor away from the spawn room.
pub(super) fn plan_roamers(
    context: &SpawnContext<'_>,
    existing: &[SpawnPoint],
    stream: &mut SubStream,
    cosmetics: &mut SubStream,
) -> Vec<SpawnPoint> {
    let roaming = context.roaming;
    let floor_cells: Vec<Pos> =
        context.grid.positions().filter(|&pos| context.grid.get(pos) == Cell::Floor).collect();
    let cluster_target = (floor_cells.len() / roaming.cells_per_cluster).min(roaming.max_clusters);
    if cluster_target == 0 {
        return Vec::new();
    }

    let mut anchors: Vec<Pos> = floor_cells
        .into_iter()
        .filter(|&pos| context.spawn_position.distance_to(pos) >= roaming.min_spawn_distance)
        .collect();
    stream.shuffle(&mut anchors);

    let mut occupied: Vec<Pos> = existing.iter().map(|spawn| spawn.pos).collect();
    occupied.push(context.spawn_position);

    let mut roamers = Vec::new();
    let mut clusters = 0_usize;
    for anchor in anchors {
        if clusters == cluster_target {
            break;
        }
        if !is_clear(anchor, &occupied, roaming.anchor_clearance) {
            continue;
        }

        let cluster_size = stream.range_usize(roaming.cluster_size.min, roaming.cluster_size.max);
        let mut members = 0_usize;
        for _ in 0..cluster_size * 4 {
            if members == cluster_size {
                break;
            }
            let dx = stream.range_i32(-roaming.cluster_radius, roaming.cluster_radius);
            let dz = stream.range_i32(-roaming.cluster_radius, roaming.cluster_radius);
            let pos = anchor.offset(dx, dz);
            if context.grid.get(pos) != Cell::Floor
                || !context.outside_safe_zone(pos)
                || !is_clear(pos, &occupied, context.spawns.min_separation)
            {
                continue;
            }
            let tier = context.tier_at(pos);
            roamers.push(SpawnPoint {
                pos,
                tier,
                is_boss: false,
                monster: stream.pick(cluster_pool(tier)),
                roaming: RoamingClass::Roamer,
                room: None,
                rotation_y: cosmetics.range_f32(0.0, TAU),
            });
            occupied.push(pos);
            members += 1;
        }

        if members == 0 {
            continue;
        }
        if members < cluster_size {
            debug!(?anchor, members, cluster_size, "roaming pack placed partially");
        }
        occupied.push(anchor);
        clusters += 1;
    }

    debug!(clusters, roamers = roamers.len(), "roaming packs placed");
    roamers
}
