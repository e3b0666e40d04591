use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::config::{BOARD_SIZE, KNIGHT_HEALTH, PAWN_HEALTH, ROOK_HEALTH};
use crate::core::utils::{in_direction, is_valid_coord, pos_to_str, KNIGHT_OFFSETS, ROOK_DIRECTIONS};

const CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

#[derive(PartialEq, Eq, Hash, Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub enum Color {
    Black,
    #[default]
    White,
}

impl Color {
    pub fn opposite(self) -> Color {
        if self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Row step of a pawn of this color: white marches up the board, black down.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(if self == &Self::White {
            "White"
        } else {
            "Black"
        })
    }
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Rook,
}

impl PieceType {
    pub const ALL: [PieceType; 3] = [PieceType::Pawn, PieceType::Knight, PieceType::Rook];

    pub fn max_health(self) -> u8 {
        match self {
            PieceType::Pawn => PAWN_HEALTH,
            PieceType::Knight => KNIGHT_HEALTH,
            PieceType::Rook => ROOK_HEALTH,
        }
    }

    pub fn symbol(self, color: Color) -> char {
        match (self, color) {
            (PieceType::Pawn, Color::White) => '♙',
            (PieceType::Pawn, Color::Black) => '♟',
            (PieceType::Knight, Color::White) => '♘',
            (PieceType::Knight, Color::Black) => '♞',
            (PieceType::Rook, Color::White) => '♖',
            (PieceType::Rook, Color::Black) => '♜',
        }
    }
}

impl Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PieceType::Pawn => "Pawn",
            PieceType::Knight => "Knight",
            PieceType::Rook => "Rook",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPositionError {
    pub x: u8,
    pub y: u8,
}

impl Display for InvalidPositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell ({}, {}) is outside of the board", self.x, self.y)
    }
}

impl std::error::Error for InvalidPositionError {}

/** Board cell; `y` grows from black's back rank (0) to white's (7). */
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /** Panics on off-board coordinates: callers must never produce them. */
    pub fn new(x: u8, y: u8) -> Position {
        assert!(
            x < BOARD_SIZE && y < BOARD_SIZE,
            "Position ({x}, {y}) is off the board!"
        );
        Position { x, y }
    }

    pub fn x(self) -> u8 {
        self.x
    }

    pub fn y(self) -> u8 {
        self.y
    }

    /// Neighbouring cell at the given offset, if it is still on the board.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Position> {
        let (x, y) = (self.x as i16 + dx as i16, self.y as i16 + dy as i16);
        if is_valid_coord(x, y) {
            Some(Position {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    fn index(self) -> usize {
        self.y as usize * BOARD_SIZE as usize + self.x as usize
    }

    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Position { x, y }))
    }
}

impl TryFrom<(u8, u8)> for Position {
    type Error = InvalidPositionError;

    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Ok(Position { x, y })
        } else {
            Err(InvalidPositionError { x, y })
        }
    }
}

impl From<Position> for (u8, u8) {
    fn from(value: Position) -> Self {
        (value.x, value.y)
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&pos_to_str(*self))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceType,
    pub color: Color,
    pub position: Position,
    pub health: u8,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceType, color: Color, position: Position) -> Piece {
        Piece {
            id,
            kind,
            color,
            position,
            health: kind.max_health(),
        }
    }

    pub fn is_enemy(&self, other: &Piece) -> bool {
        self.color != other.color
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} at {} ({} hp)",
            self.color, self.kind, self.id, self.position, self.health
        )
    }
}

/** Unlimited-supply bank entry used to drop fresh pieces during setup. */
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Template {
    pub kind: PieceType,
    pub color: Color,
}

impl Template {
    pub fn new(kind: PieceType, color: Color) -> Template {
        Template { kind, color }
    }

    /// Every template offered by the bank, white before black for each type.
    pub fn bank() -> [Template; 6] {
        let mut bank = [Template::new(PieceType::Pawn, Color::White); 6];
        for (i, kind) in PieceType::ALL.into_iter().enumerate() {
            bank[2 * i] = Template::new(kind, Color::White);
            bank[2 * i + 1] = Template::new(kind, Color::Black);
        }
        bank
    }
}

/** Occupancy grid, row-major. Always derived from a piece list. */
#[serde_as]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde_as(as = "[_; CELLS]")]
    cells: [Option<Piece>; CELLS],
}

impl Board {
    pub fn new() -> Board {
        Board {
            cells: [None; CELLS],
        }
    }

    /** Rebuild the grid from scratch. Later pieces win on collisions. */
    pub fn from_pieces<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> Board {
        let mut board = Board::new();
        for piece in pieces {
            board.put(*piece);
        }
        board
    }

    pub fn get(&self, pos: Position) -> Option<&Piece> {
        self.cells[pos.index()].as_ref()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.cells[pos.index()].is_none()
    }

    /// Whether `pos` holds a piece of the other color than `color`.
    pub fn is_enemy_at(&self, pos: Position, color: Color) -> bool {
        self.get(pos).map(|piece| piece.color != color).unwrap_or(false)
    }

    /// Store a copy of `piece` at its own position.
    pub fn put(&mut self, piece: Piece) {
        self.cells[piece.position.index()] = Some(piece);
    }

    pub fn clear(&mut self, pos: Position) {
        self.cells[pos.index()] = None;
    }

    /// Occupied cells in row-major scan order.
    pub fn iter_pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter_pieces()).finish()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            write!(f, "{} ", BOARD_SIZE - y)?;
            for x in 0..BOARD_SIZE {
                match self.get(Position::new(x, y)) {
                    Some(piece) => write!(f, " {}{}", piece.kind.symbol(piece.color), piece.health)?,
                    None => write!(f, " · ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for x in 0..BOARD_SIZE {
            write!(f, " {} ", (b'a' + x) as char)?;
        }
        writeln!(f)
    }
}

/// Destinations `piece` may legally reach on `board`: empty cells and enemy
/// cells per its movement rule. Never yields off-board cells.
pub fn get_valid_moves(piece: &Piece, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(16);
    let from = piece.position;
    match piece.kind {
        PieceType::Pawn => {
            let step = piece.color.forward();
            // push
            if let Some(front) = from.offset(0, step) {
                if board.is_empty_at(front) {
                    moves.push(front);
                }
            }
            // capture
            for side in [-1, 1] {
                if let Some(pos) = from.offset(side, step) {
                    if board.is_enemy_at(pos, piece.color) {
                        moves.push(pos);
                    }
                }
            }
        }
        PieceType::Knight => {
            moves.extend(
                KNIGHT_OFFSETS
                    .iter()
                    .filter_map(|&(dx, dy)| from.offset(dx, dy))
                    .filter(|&pos| board.get(pos).map_or(true, |other| other.is_enemy(piece))),
            );
        }
        PieceType::Rook => {
            for direction in ROOK_DIRECTIONS {
                for pos in in_direction(from, direction) {
                    match board.get(pos) {
                        None => moves.push(pos),
                        Some(other) => {
                            if other.is_enemy(piece) {
                                moves.push(pos);
                            }
                            break;
                        }
                    }
                }
            }
        }
    }
    moves
}
