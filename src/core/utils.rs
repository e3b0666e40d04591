use crate::config::BOARD_SIZE;
use crate::core::engine::Position;

/// Single-step offsets of the four orthogonal rays, in the order moves are generated.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[derive(Debug)]
pub struct DirectionIterator {
    position: Option<Position>,
    direction: (i8, i8),
}

impl Iterator for DirectionIterator {
    type Item = Position;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (dx, dy) = self.direction;
        self.position = self.position.and_then(|pos| pos.offset(dx, dy));
        self.position
    }
}

/// Cells along a ray starting next to `position`, up to the board edge.
pub fn in_direction(position: Position, direction: (i8, i8)) -> DirectionIterator {
    debug_assert!(direction != (0, 0), "Zero direction never leaves its cell!");
    DirectionIterator {
        position: Some(position),
        direction,
    }
}

/// Manhattan distance.
pub fn distance(a: Position, b: Position) -> u8 {
    a.x().abs_diff(b.x()) + a.y().abs_diff(b.y())
}

pub fn chebyshev(a: Position, b: Position) -> u8 {
    a.x().abs_diff(b.x()).max(a.y().abs_diff(b.y()))
}

/// Attack reach shared by every piece type: a king step or a knight jump.
pub fn is_adjacent(a: Position, b: Position) -> bool {
    let dx = a.x().abs_diff(b.x());
    let dy = a.y().abs_diff(b.y());
    chebyshev(a, b) <= 1 || (dx == 2 && dy == 1) || (dx == 1 && dy == 2)
}

#[inline]
pub fn is_valid_coord(x: i16, y: i16) -> bool {
    (0..BOARD_SIZE as i16).contains(&x) && (0..BOARD_SIZE as i16).contains(&y)
}

/// Algebraic name of a cell: row 0 is rank 8, column 0 is file a.
pub fn pos_to_str(pos: Position) -> String {
    let file = (b'a' + pos.x()) as char;
    let rank = BOARD_SIZE - pos.y();
    format!("{file}{rank}")
}
