// Coordinate spaces:
//   - `Cell` (coord.rs) is logical: rank 0 is White's home rank, always.
//   - `DisplayCell` is what the local viewer sees: (0, 0) is the top-left square
//     of the rendered board, so each player finds their own pieces at the bottom.
//   - `ScreenPos` is a pixel position on the canvas.

use crate::coord::{BOARD_SIZE, Cell, File, Rank};
use crate::force::Force;


// A square as drawn for a specific viewer. Not guaranteed to be on the board:
// pointer input may produce out-of-range values, which `from_display_cell`
// filters out.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DisplayCell {
    pub x: i8,
    pub y: i8,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

// Tile size and board origin on the canvas, in pixels.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoardLayout {
    pub tile_size: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl BoardLayout {
    pub fn with_tile_size(tile_size: f64) -> Self {
        BoardLayout { tile_size, offset_x: 0., offset_y: 0. }
    }
}


// Black sees the logical board as-is; for White both axes are mirrored.
pub fn to_display_cell(cell: Cell, viewer: Force) -> DisplayCell {
    let x = cell.file.to_zero_based() as i8;
    let y = cell.rank.to_zero_based() as i8;
    match viewer {
        Force::Black => DisplayCell { x, y },
        Force::White => DisplayCell {
            x: BOARD_SIZE as i8 - x - 1,
            y: BOARD_SIZE as i8 - y - 1,
        },
    }
}

// Inverse of `to_display_cell`. `None` if the square is off the board.
pub fn from_display_cell(cell: DisplayCell, viewer: Force) -> Option<Cell> {
    let range = 0..BOARD_SIZE as i8;
    if !range.contains(&cell.x) || !range.contains(&cell.y) {
        return None;
    }
    let (x, y) = match viewer {
        Force::Black => (cell.x, cell.y),
        Force::White => (BOARD_SIZE as i8 - cell.x - 1, BOARD_SIZE as i8 - cell.y - 1),
    };
    Some(Cell::new(File::from_zero_based(x as u8), Rank::from_zero_based(y as u8)))
}

// Pixel center of a tile.
pub fn screen_center(cell: DisplayCell, layout: &BoardLayout) -> ScreenPos {
    ScreenPos {
        x: layout.offset_x + (f64::from(cell.x) + 0.5) * layout.tile_size,
        y: layout.offset_y + (f64::from(cell.y) + 0.5) * layout.tile_size,
    }
}

// Approximate inverse of `screen_center` via floor division. May return an
// out-of-range cell (the cast saturates for far-away pixels); bounds checking
// happens in `from_display_cell`.
pub fn position_to_display_cell(pos: ScreenPos, layout: &BoardLayout) -> DisplayCell {
    DisplayCell {
        x: ((pos.x - layout.offset_x) / layout.tile_size).floor() as i8,
        y: ((pos.y - layout.offset_y) / layout.tile_size).floor() as i8,
    }
}


#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn display_transform_is_a_bijection() {
        for viewer in Force::iter() {
            for cell in Cell::all() {
                assert_eq!(from_display_cell(to_display_cell(cell, viewer), viewer), Some(cell));
            }
        }
    }

    #[test]
    fn black_viewer_sees_logical_coordinates() {
        let cell = Cell::from_algebraic("e2").unwrap();
        assert_eq!(to_display_cell(cell, Force::Black), DisplayCell { x: 4, y: 1 });
    }

    #[test]
    fn white_viewer_sees_both_axes_mirrored() {
        let cell = Cell::from_algebraic("e2").unwrap();
        assert_eq!(to_display_cell(cell, Force::White), DisplayCell { x: 3, y: 6 });
    }

    #[test]
    fn out_of_range_display_cell_is_rejected() {
        for viewer in Force::iter() {
            assert_eq!(from_display_cell(DisplayCell { x: -1, y: 0 }, viewer), None);
            assert_eq!(from_display_cell(DisplayCell { x: 0, y: 8 }, viewer), None);
        }
    }

    #[test]
    fn screen_mapping_round_trip() {
        let layout = BoardLayout { tile_size: 80., offset_x: 16., offset_y: 0. };
        for cell in Cell::all() {
            let display = to_display_cell(cell, Force::White);
            let center = screen_center(display, &layout);
            assert_eq!(position_to_display_cell(center, &layout), display);
        }
    }

    #[test]
    fn click_outside_the_canvas_maps_off_board() {
        let layout = BoardLayout::with_tile_size(80.);
        let cell = position_to_display_cell(ScreenPos { x: -5., y: 700. }, &layout);
        assert_eq!(cell, DisplayCell { x: -1, y: 8 });
    }
}
