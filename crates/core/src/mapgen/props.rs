//! Distance-themed prop scatter over open floor.

use std::f32::consts::TAU;

use tracing::debug;

use crate::types::{Cell, Pos};

use super::catalog::{PropKind, prop_themes};
use super::grid::TileGrid;
use super::model::{PropPlacement, SpawnPoint};
use super::params::PropParams;
use super::seed::SubStream;

const PROP_JITTER: f32 = 0.3;

pub(super) fn plan_props(
    grid: &TileGrid,
    spawn_position: Pos,
    enemies: &[SpawnPoint],
    params: &PropParams,
    stream: &mut SubStream,
    cosmetics: &mut SubStream,
) -> Vec<PropPlacement> {
    let mut floor_cells: Vec<Pos> =
        grid.positions().filter(|&pos| grid.get(pos) == Cell::Floor).collect();
    let target = floor_cells.len() / params.cells_per_prop;
    stream.shuffle(&mut floor_cells);

    let mut occupied: Vec<Pos> = enemies.iter().map(|spawn| spawn.pos).collect();
    occupied.push(spawn_position);

    let mut props = Vec::with_capacity(target);
    for pos in floor_cells {
        if props.len() == target {
            break;
        }
        if occupied.iter().any(|&other| other.distance_to(pos) < params.min_separation) {
            continue;
        }

        let themes = prop_themes(spawn_position.distance_to(pos));
        let kind = pick_themed(stream, themes);
        props.push(PropPlacement {
            kind,
            x: pos.x as f32 + cosmetics.range_f32(-PROP_JITTER, PROP_JITTER),
            y: 0.0,
            z: pos.z as f32 + cosmetics.range_f32(-PROP_JITTER, PROP_JITTER),
            rotation_y: cosmetics.range_f32(0.0, TAU),
            scale: cosmetics.range_f32(0.8, 1.2),
        });
        occupied.push(pos);
    }

    debug!(props = props.len(), target, "props placed");
    props
}

fn pick_themed(stream: &mut SubStream, themes: &[&[PropKind]]) -> PropKind {
    let total: usize = themes.iter().map(|group| group.len()).sum();
    let mut roll = stream.range_usize(0, total - 1);
    for group in themes {
        if roll < group.len() {
            return group[roll];
        }
        roll -= group.len();
    }
    themes[0][0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::catalog::MonsterKind;
    use crate::mapgen::model::RoamingClass;

    fn open_grid(width: usize, depth: usize) -> TileGrid {
        let mut grid = TileGrid::new(width, depth);
        for z in 1..depth - 1 {
            for x in 1..width - 1 {
                grid.set(Pos::new(x as i32, z as i32), Cell::Floor);
            }
        }
        grid
    }

    #[test]
    fn props_keep_clear_of_enemies_and_each_other() {
        let grid = open_grid(40, 40);
        let params = PropParams { cells_per_prop: 50, min_separation: 2.0 };
        let enemy = SpawnPoint {
            pos: Pos::new(20, 20),
            tier: 1,
            is_boss: false,
            monster: MonsterKind::Slime,
            roaming: RoamingClass::Normal,
            room: None,
            rotation_y: 0.0,
        };

        let props = plan_props(
            &grid,
            Pos::new(5, 5),
            &[enemy.clone()],
            &params,
            &mut SubStream::from_seed(9),
            &mut SubStream::from_seed(10),
        );

        assert_eq!(props.len(), 38 * 38 / 50);
        let cells: Vec<Pos> = props
            .iter()
            .map(|prop| Pos::new(prop.x.round() as i32, prop.z.round() as i32))
            .collect();
        for (index, &cell) in cells.iter().enumerate() {
            assert_eq!(grid.get(cell), Cell::Floor);
            assert!(cell.distance_to(enemy.pos) >= params.min_separation);
            for &other in &cells[index + 1..] {
                assert!(cell.distance_to(other) >= params.min_separation);
            }
        }
        for prop in &props {
            assert!((0.8..=1.2).contains(&prop.scale));
        }
    }

    #[test]
    fn themed_pick_draws_from_every_group() {
        let themes = prop_themes(10.0);
        let mut stream = SubStream::from_seed(4);
        let mut saw_camp = false;
        let mut saw_dungeon = false;
        for _ in 0..200 {
            match pick_themed(&mut stream, themes) {
                PropKind::Campfire
                | PropKind::AbandonedCampfire
                | PropKind::RatNest
                | PropKind::MoldyBread => saw_camp = true,
                _ => saw_dungeon = true,
            }
        }
        assert!(saw_camp && saw_dungeon);
    }
}
