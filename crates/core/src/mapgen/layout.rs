//! Rejection-sampling room placement.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Pos;

use super::GenerationError;
use super::context::GenerationContext;
use super::model::{Room, RoomId, RoomKind};
use super::seed::Subsystem;

/// Axis-aligned cell rectangle; `x`/`z` is the origin corner, sizes are in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomRect {
    pub x: usize,
    pub z: usize,
    pub width: usize,
    pub depth: usize,
}

impl RoomRect {
    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.z + self.depth - 1
    }

    pub fn center(self) -> Pos {
        Pos { z: (self.z + (self.depth / 2)) as i32, x: (self.x + (self.width / 2)) as i32 }
    }

    pub fn area(self) -> usize {
        self.width * self.depth
    }

    pub fn expanded(self, margin: usize) -> Self {
        let expanded_x = self.x.saturating_sub(margin);
        let expanded_z = self.z.saturating_sub(margin);
        let expanded_right = self.right().saturating_add(margin);
        let expanded_bottom = self.bottom().saturating_add(margin);
        Self {
            x: expanded_x,
            z: expanded_z,
            width: expanded_right - expanded_x + 1,
            depth: expanded_bottom - expanded_z + 1,
        }
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.z <= other.bottom()
            && self.bottom() >= other.z
    }

    pub fn contains(self, pos: Pos) -> bool {
        if pos.x < 0 || pos.z < 0 {
            return false;
        }
        let px = pos.x as usize;
        let pz = pos.z as usize;
        px >= self.x && px <= self.right() && pz >= self.z && pz <= self.bottom()
    }

    pub fn positions(self) -> impl Iterator<Item = Pos> {
        (self.z..=self.bottom()).flat_map(move |z| {
            (self.x..=self.right()).map(move |x| Pos { z: z as i32, x: x as i32 })
        })
    }
}

/// Places rooms until the drawn target count is met or the attempt budget runs out.
///
/// `rooms[0]` is the spawn room. Fails with [`GenerationError::PlacementExhausted`]
/// when fewer than `rooms.count.min` rooms fit.
pub fn place_rooms(context: &GenerationContext<'_>) -> Result<Vec<Room>, GenerationError> {
    let params = context.params();
    let canvas = params.canvas;
    let room_params = params.rooms;
    let mut stream = context.stream(Subsystem::RoomPlacement);

    let target_room_count = stream.range_usize(room_params.count.min, room_params.count.max);
    let mut rects: Vec<RoomRect> = Vec::with_capacity(target_room_count);
    let mut attempts = 0_u32;

    while rects.len() < target_room_count && attempts < room_params.max_attempts {
        attempts += 1;
        let room_width = stream.range_usize(room_params.size.min, room_params.size.max);
        let room_depth = stream.range_usize(room_params.size.min, room_params.size.max);

        // Origins keep a one-cell void ring between the room and the canvas edge.
        let max_x = canvas.width - room_width - 1;
        let max_z = canvas.depth - room_depth - 1;
        let x = stream.range_usize(1, max_x);
        let z = stream.range_usize(1, max_z);

        let candidate = RoomRect { x, z, width: room_width, depth: room_depth };
        let candidate_with_margin = candidate.expanded(room_params.buffer_margin);
        if rects.iter().any(|existing_room| {
            existing_room.expanded(room_params.buffer_margin).intersects(&candidate_with_margin)
        }) {
            continue;
        }
        rects.push(candidate);
    }

    if rects.len() < room_params.count.min {
        return Err(GenerationError::PlacementExhausted {
            placed: rects.len(),
            required: room_params.count.min,
            attempts,
        });
    }

    debug!(rooms = rects.len(), target_room_count, attempts, "room placement finished");
    Ok(tag_rooms(&rects))
}

fn tag_rooms(rects: &[RoomRect]) -> Vec<Room> {
    let spawn_center = rects[0].center();
    let lair_index = rects
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|(left_index, left), (right_index, right)| {
            let left_distance = spawn_center.distance_to(left.center());
            let right_distance = spawn_center.distance_to(right.center());
            left_distance.total_cmp(&right_distance).then(right_index.cmp(left_index))
        })
        .map(|(index, _)| index);

    rects
        .iter()
        .enumerate()
        .map(|(index, &rect)| {
            let kind = if index == 0 {
                RoomKind::Spawn
            } else if Some(index) == lair_index {
                RoomKind::Lair
            } else if rect.width >= rect.depth * 2 || rect.depth >= rect.width * 2 {
                RoomKind::Hall
            } else {
                RoomKind::Chamber
            };
            Room { id: RoomId(index), rect, kind, cleared: false }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::params::test_params::standard;

    #[test]
    fn room_layout_places_non_overlapping_rooms_inside_canvas() {
        let params = standard(42);
        let context = GenerationContext::new(&params);
        let rooms = place_rooms(&context).expect("standard params should place rooms");
        assert!(params.rooms.count.contains(rooms.len()), "got {} rooms", rooms.len());

        for room in &rooms {
            assert!(room.rect.x >= 1 && room.rect.right() < params.canvas.width - 1);
            assert!(room.rect.z >= 1 && room.rect.bottom() < params.canvas.depth - 1);
        }

        for left_index in 0..rooms.len() {
            for right_index in (left_index + 1)..rooms.len() {
                let margin = params.rooms.buffer_margin;
                let left_with_margin = rooms[left_index].rect.expanded(margin);
                let right_with_margin = rooms[right_index].rect.expanded(margin);
                assert!(
                    !left_with_margin.intersects(&right_with_margin),
                    "rooms must keep their buffer: {:?} vs {:?}",
                    rooms[left_index],
                    rooms[right_index]
                );
            }
        }
    }

    #[test]
    fn first_room_is_spawn_and_exactly_one_lair_exists() {
        let params = standard(7);
        let rooms = place_rooms(&GenerationContext::new(&params)).expect("rooms");
        assert_eq!(rooms[0].kind, RoomKind::Spawn);
        assert_eq!(rooms.iter().filter(|room| room.kind == RoomKind::Lair).count(), 1);
        assert!(rooms.iter().all(|room| !room.cleared));
        for (index, room) in rooms.iter().enumerate() {
            assert_eq!(room.id, RoomId(index));
        }
    }

    #[test]
    fn identical_seeds_produce_identical_room_lists() {
        let params = standard(1_234);
        let first = place_rooms(&GenerationContext::new(&params)).expect("rooms");
        let second = place_rooms(&GenerationContext::new(&params)).expect("rooms");
        assert_eq!(first, second);
    }

    #[test]
    fn exhausted_attempts_report_placement_failure() {
        let mut params = standard(3);
        params.canvas.width = 20;
        params.canvas.depth = 20;
        params.rooms.size.min = 16;
        params.rooms.size.max = 16;
        params.rooms.count.min = 2;
        params.rooms.count.max = 3;
        params.rooms.max_attempts = 50;

        let err = place_rooms(&GenerationContext::new(&params))
            .expect_err("only one 16x16 room fits on a 20x20 canvas");
        match err {
            GenerationError::PlacementExhausted { placed, required, attempts } => {
                assert_eq!(placed, 1);
                assert_eq!(required, 2);
                assert_eq!(attempts, 50);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn expanded_rect_saturates_at_origin() {
        let rect = RoomRect { x: 0, z: 1, width: 3, depth: 2 };
        let expanded = rect.expanded(2);
        assert_eq!(expanded, RoomRect { x: 0, z: 0, width: 5, depth: 5 });
        assert!(expanded.contains(Pos::new(4, 4)));
        assert!(!expanded.contains(Pos::new(5, 4)));
        assert!(!expanded.contains(Pos::new(4, 5)));
        assert_eq!(rect.positions().count(), rect.area());
    }
}
