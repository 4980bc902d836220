//! Adds roaming packs and props to an already carved level, keeping what it holds.

use tracing::info;

use crate::types::Pos;

use super::context::GenerationContext;
use super::grid::TileGrid;
use super::model::{SpawnPlan, SpawnPoint};
use super::params::GenerationParams;
use super::props::plan_props;
use super::seed::Subsystem;
use super::spawns::{SpawnContext, plan_roamers};

/// Plans the additions for a loaded level. `existing` enemies stay put and
/// block new placements; the returned plan holds only the new entries.
///
/// Rooms are not known for a loaded level, so only roaming packs are added.
pub fn populate_level(
    grid: &TileGrid,
    spawn_position: Pos,
    existing: &[SpawnPoint],
    params: &GenerationParams,
) -> SpawnPlan {
    let context = GenerationContext::new(params);
    let spawn_context = SpawnContext {
        grid,
        rooms: &[],
        spawn_position,
        spawns: &params.spawns,
        roaming: &params.roaming,
    };

    let enemies = plan_roamers(
        &spawn_context,
        existing,
        &mut context.stream(Subsystem::Roamers),
        &mut context.stream(Subsystem::EnemyCosmetics),
    );

    let mut blocking = existing.to_vec();
    blocking.extend(enemies.iter().cloned());
    let props = plan_props(
        grid,
        spawn_position,
        &blocking,
        &params.props,
        &mut context.stream(Subsystem::Props),
        &mut context.stream(Subsystem::PropCosmetics),
    );

    info!(
        seed = context.seed(),
        existing = existing.len(),
        enemies = enemies.len(),
        props = props.len(),
        "level populated"
    );
    SpawnPlan { enemies, props, shortfalls: Vec::new() }
}
