use super::*;
use crate::types::Pos;

fn grid_from_rows(rows: &[&str]) -> TileGrid {
    let width = rows[0].len();
    let cells = rows
        .iter()
        .flat_map(|row| row.chars())
        .map(|ch| match ch {
            '.' => Cell::Floor,
            '+' => Cell::Door,
            '#' => Cell::Wall,
            _ => Cell::Void,
        })
        .collect();
    TileGrid::from_cells(width, rows.len(), cells).expect("rows are rectangular")
}

fn floor_mask(grid: &TileGrid) -> Vec<bool> {
    grid.cells().iter().map(|cell| cell.is_walkable()).collect()
}

#[test]
fn ring_of_floor_encodes_as_three_short_runs() {
    let grid = grid_from_rows(&["...", ". .", "..."]);
    assert_eq!(
        scan_runs(&grid),
        vec![
            Run { floor: true, len: 4 },
            Run { floor: false, len: 1 },
            Run { floor: true, len: 4 },
        ]
    );
    assert_eq!(encode_runs(&grid).expect("encodes"), vec![3, 0, 0, 0, 3, 0, 0, 0, 9, 2, 9]);
}

#[test]
fn run_of_sixty_three_is_short_and_sixty_four_is_long() {
    let mut grid = TileGrid::new(127, 1);
    for x in 0..63 {
        grid.set(Pos::new(x, 0), Cell::Floor);
    }

    let raw = encode_runs(&grid).expect("encodes");
    assert_eq!(&raw[HEADER_LEN..], &[0x7F, 0x80, 64, 0]);
    assert_eq!(floor_mask(&decode_runs(&raw).expect("decodes")), floor_mask(&grid));
}

#[test]
fn runs_longer_than_u16_are_split() {
    let grid = TileGrid::new(MAX_LONG_RUN + 10, 1);
    let raw = encode_runs(&grid).expect("encodes");
    assert_eq!(&raw[HEADER_LEN..], &[0x80, 0xFF, 0xFF, 10 << 1]);
    assert_eq!(decode_runs(&raw).expect("decodes").count(Cell::Void), MAX_LONG_RUN + 10);
}

#[test]
fn all_void_and_all_floor_round_trip() {
    let void = TileGrid::new(40, 25);
    let decoded = decode(&encode(&void).expect("encodes")).expect("void grid decodes");
    assert_eq!(decoded, void);

    let floor = TileGrid::from_cells(40, 25, vec![Cell::Floor; 1000]).expect("sized");
    let decoded = decode(&encode(&floor).expect("encodes")).expect("floor grid decodes");
    assert_eq!(decoded, floor);
}

#[test]
fn walls_and_doors_collapse_to_the_floor_classification() {
    let grid = grid_from_rows(&["#####", "#..+ ", "#####"]);
    let decoded = decode(&encode(&grid).expect("encodes")).expect("decodes");
    assert_eq!(decoded.get(Pos::new(0, 0)), Cell::Void);
    assert_eq!(decoded.get(Pos::new(3, 1)), Cell::Floor);
    assert_eq!(floor_mask(&decoded), floor_mask(&grid));
}

#[test]
fn decoder_wraps_at_the_stored_width() {
    // 2x3 grid: one floor run of 3 crosses the row boundary.
    let raw = [2, 0, 0, 0, 3, 0, 0, 0, (3 << 1) | 1, 3 << 1];
    let grid = decode_runs(&raw).expect("decodes");
    assert_eq!((grid.width(), grid.depth()), (2, 3));
    assert_eq!(grid.get(Pos::new(1, 0)), Cell::Floor);
    assert_eq!(grid.get(Pos::new(0, 1)), Cell::Floor);
    assert_eq!(grid.get(Pos::new(1, 1)), Cell::Void);
}

#[test]
fn truncated_header_is_rejected() {
    assert_eq!(decode_runs(&[1, 0, 0]), Err(FormatError::TruncatedHeader { len: 3 }));
}

#[test]
fn negative_and_oversized_dimensions_are_rejected() {
    let mut raw = Vec::new();
    raw.extend((-4_i32).to_le_bytes());
    raw.extend(4_i32.to_le_bytes());
    assert_eq!(decode_runs(&raw), Err(FormatError::InvalidDimensions { width: -4, depth: 4 }));

    let mut raw = Vec::new();
    raw.extend(i32::MAX.to_le_bytes());
    raw.extend(i32::MAX.to_le_bytes());
    assert!(matches!(decode_runs(&raw), Err(FormatError::InvalidDimensions { .. })));
}

#[test]
fn long_run_missing_its_length_is_truncated() {
    let raw = [4, 0, 0, 0, 1, 0, 0, 0, 0x81, 4];
    assert_eq!(decode_runs(&raw), Err(FormatError::TruncatedRun { offset: 8 }));
}

#[test]
fn zero_length_runs_are_rejected() {
    let raw = [1, 0, 0, 0, 1, 0, 0, 0, 0x01];
    assert_eq!(decode_runs(&raw), Err(FormatError::ZeroLengthRun { offset: 8 }));

    let raw = [1, 0, 0, 0, 1, 0, 0, 0, 0x80, 0, 0];
    assert_eq!(decode_runs(&raw), Err(FormatError::ZeroLengthRun { offset: 8 }));
}

#[test]
fn runs_past_the_grid_overflow() {
    let raw = [2, 0, 0, 0, 2, 0, 0, 0, (4 << 1) | 1, 1 << 1];
    assert_eq!(decode_runs(&raw), Err(FormatError::RunOverflow { offset: 9, capacity: 4 }));
}

#[test]
fn short_blob_reports_missing_cells() {
    let raw = [3, 0, 0, 0, 3, 0, 0, 0, (4 << 1) | 1];
    assert_eq!(decode_runs(&raw), Err(FormatError::MissingCells { decoded: 4, expected: 9 }));
}

#[test]
fn corrupt_envelope_is_a_format_error() {
    assert!(matches!(decode(&[1, 2]), Err(FormatError::Envelope(_))));

    let mut bytes = encode(&TileGrid::new(8, 8)).expect("encodes");
    bytes[0..4].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(decode(&bytes), Err(FormatError::Envelope(_))));

    let mut bytes = encode(&TileGrid::new(8, 8)).expect("encodes");
    bytes.truncate(bytes.len() - 1);
    assert!(matches!(decode(&bytes), Err(FormatError::Envelope(_))));
}

#[test]
fn encoder_refuses_grids_the_decoder_would_reject() {
    assert_eq!(ensure_encodable(8192, 8192), Ok(()));
    assert_eq!(
        ensure_encodable(8193, 8192),
        Err(FormatError::GridTooLarge { width: 8193, depth: 8192 })
    );
    assert!(ensure_encodable(i32::MAX as usize + 1, 1).is_err());
    assert!(ensure_encodable(usize::MAX, 2).is_err());

    let oversized = TileGrid::new(8193, 8192);
    assert_eq!(encode(&oversized), Err(FormatError::GridTooLarge { width: 8193, depth: 8192 }));
}
