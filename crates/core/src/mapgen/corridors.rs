//! L-shaped corridors chaining rooms in placement order.

use serde::{Deserialize, Serialize};

use super::layout::RoomRect;
use super::model::{Room, RoomId};

/// Two axis-aligned footprints: the x-run at the source row, then the z-run at
/// the target column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub from: RoomId,
    pub to: RoomId,
    pub segments: [RoomRect; 2],
}

/// Links `rooms[i]` to `rooms[i + 1]` for every consecutive pair.
///
/// The chain starts at the spawn room, so every room is reachable from it.
/// A `corridor_width` of zero is carved as one cell wide.
pub fn connect_rooms(
    rooms: &[Room],
    corridor_width: usize,
    canvas_width: usize,
    canvas_depth: usize,
) -> Vec<Corridor> {
    let corridor_width = corridor_width.max(1);
    rooms
        .windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            let start = from.center();
            let end = to.center();
            let bounds = InteriorBounds::new(canvas_width, canvas_depth);

            let along_x = bounds.band(
                (start.x.min(end.x), start.x.max(end.x)),
                (start.z, start.z),
                corridor_width,
            );
            let along_z = bounds.band(
                (end.x, end.x),
                (start.z.min(end.z), start.z.max(end.z)),
                corridor_width,
            );
            Corridor { from: from.id, to: to.id, segments: [along_x, along_z] }
        })
        .collect()
}

struct InteriorBounds {
    max_x: i64,
    max_z: i64,
}

impl InteriorBounds {
    fn new(canvas_width: usize, canvas_depth: usize) -> Self {
        Self { max_x: canvas_width as i64 - 2, max_z: canvas_depth as i64 - 2 }
    }

    /// Widens a center line by `width` cells (extending its ends by the same
    /// half-widths so elbows come out square) and clamps it to the interior.
    fn band(&self, x_span: (i32, i32), z_span: (i32, i32), width: usize) -> RoomRect {
        let below = ((width - 1) / 2) as i64;
        let above = (width / 2) as i64;
        let left = (i64::from(x_span.0) - below).clamp(1, self.max_x);
        let right = (i64::from(x_span.1) + above).clamp(1, self.max_x);
        let top = (i64::from(z_span.0) - below).clamp(1, self.max_z);
        let bottom = (i64::from(z_span.1) + above).clamp(1, self.max_z);
        RoomRect {
            x: left as usize,
            z: top as usize,
            width: (right - left + 1) as usize,
            depth: (bottom - top + 1) as usize,
        }
    }
}
