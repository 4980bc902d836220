//! Phase-ordered generation pass: carve, derive walls, plan spawns, plan props.

use tracing::{debug, info};

use super::super::GenerationError;
use super::super::context::GenerationContext;
use super::super::corridors::connect_rooms;
use super::super::grid::build_tile_grid;
use super::super::layout::place_rooms;
use super::super::model::{GeneratedDungeon, SpawnPlan};
use super::super::props::plan_props;
use super::super::seed::Subsystem;
use super::super::spawns::{SpawnContext, plan_roamers, plan_room_spawns};
use super::super::walls::{apply_wall_cells, derive_walls};

pub(super) fn generate_dungeon(
    context: &GenerationContext<'_>,
) -> Result<GeneratedDungeon, GenerationError> {
    let params = context.params();
    let canvas = params.canvas;

    let rooms = place_rooms(context)?;
    let corridors = connect_rooms(&rooms, params.corridor_width, canvas.width, canvas.depth);

    let mut grid = build_tile_grid(canvas.width, canvas.depth, &rooms, &corridors);
    let walls = derive_walls(&grid);
    apply_wall_cells(&mut grid, &walls);
    debug!(walls = walls.len(), "walls derived");

    let spawn_position = rooms[0].center();
    let spawn_context = SpawnContext {
        grid: &grid,
        rooms: &rooms,
        spawn_position,
        spawns: &params.spawns,
        roaming: &params.roaming,
    };

    let mut enemy_cosmetics = context.stream(Subsystem::EnemyCosmetics);
    let room_spawns = plan_room_spawns(
        &spawn_context,
        &mut context.stream(Subsystem::RoomSpawns),
        &mut enemy_cosmetics,
    );
    let mut enemies = room_spawns.points;
    let roamers = plan_roamers(
        &spawn_context,
        &enemies,
        &mut context.stream(Subsystem::Roamers),
        &mut enemy_cosmetics,
    );
    enemies.extend(roamers);

    let props = plan_props(
        &grid,
        spawn_position,
        &enemies,
        &params.props,
        &mut context.stream(Subsystem::Props),
        &mut context.stream(Subsystem::PropCosmetics),
    );

    info!(
        seed = context.seed(),
        rooms = rooms.len(),
        enemies = enemies.len(),
        props = props.len(),
        shortfalls = room_spawns.shortfalls.len(),
        "dungeon generated"
    );

    Ok(GeneratedDungeon {
        seed: context.seed(),
        chunk_edge: params.chunk_edge,
        rooms,
        corridors,
        grid,
        walls,
        spawn_position,
        plan: SpawnPlan { enemies, props, shortfalls: room_spawns.shortfalls },
    })
}
