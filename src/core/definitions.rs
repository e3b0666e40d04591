//! Read-only views of the simulation for a renderer.
//!
//! Nothing in here feeds back into the rules: animation and arrows are
//! derived from the difference between two consecutive states.

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};

use crate::config::MOVE_INDICATOR_TTL_MS;
use crate::core::engine::{Board, Color, PieceId, PieceType, Position};
use crate::core::game::{GameState, Phase};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Figure {
    pub id: PieceId,
    pub kind: PieceType,
    pub color: Color,
    pub health: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Figure(Figure),
}

/// Rows of cells, `[y][x]`.
pub fn ui_board(board: &Board) -> Vec<Vec<Cell>> {
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for pos in Position::all() {
        if pos.x() == 0 {
            rows.push(Vec::new());
        }
        let cell = match board.get(pos) {
            Some(piece) => Cell::Figure(Figure {
                id: piece.id,
                kind: piece.kind,
                color: piece.color,
                health: piece.health,
            }),
            None => Cell::Empty,
        };
        if let Some(row) = rows.last_mut() {
            row.push(cell);
        }
    }
    rows
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    /// who is moving, where from, where to
    Moved {
        id: PieceId,
        color: Color,
        from: Position,
        to: Position,
    },
    /// who was hit, where, health left
    Hit {
        id: PieceId,
        at: Position,
        health: u8,
    },
    /// who was removed, from where
    Captured { id: PieceId, at: Position },
}

/// Events that turn `prev` into `next`, in `prev`'s piece order.
pub fn diff(prev: &GameState, next: &GameState) -> Vec<TickEvent> {
    let mut events = Vec::new();
    for before in prev.pieces() {
        match next.piece(before.id) {
            None => events.push(TickEvent::Captured {
                id: before.id,
                at: before.position,
            }),
            Some(after) => {
                if after.health < before.health {
                    events.push(TickEvent::Hit {
                        id: after.id,
                        at: after.position,
                        health: after.health,
                    });
                }
                if after.position != before.position {
                    events.push(TickEvent::Moved {
                        id: after.id,
                        color: after.color,
                        from: before.position,
                        to: after.position,
                    });
                }
            }
        }
    }
    events
}

/// Transient arrow from a move's origin to its destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveIndicator {
    pub id: u64,
    pub from: Position,
    pub to: Position,
    pub color: Color,
    pub issued_at: Instant,
}

impl MoveIndicator {
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.issued_at) >= ttl
    }
}

#[derive(Debug, Clone)]
pub struct MoveIndicators {
    indicators: Vec<MoveIndicator>,
    next_id: u64,
    ttl: Duration,
}

impl MoveIndicators {
    pub fn new(ttl: Duration) -> Self {
        MoveIndicators {
            indicators: Vec::new(),
            next_id: 0,
            ttl,
        }
    }

    /// Add an arrow for every move in `events`.
    pub fn record(&mut self, events: &[TickEvent], now: Instant) {
        for event in events {
            if let TickEvent::Moved { color, from, to, .. } = event {
                self.indicators.push(MoveIndicator {
                    id: self.next_id,
                    from: *from,
                    to: *to,
                    color: *color,
                    issued_at: now,
                });
                self.next_id += 1;
            }
        }
    }

    /// Drop expired arrows.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.indicators.retain(|indicator| !indicator.is_expired(now, ttl));
    }

    pub fn active(&self) -> &[MoveIndicator] {
        &self.indicators
    }
}

impl Default for MoveIndicators {
    fn default() -> Self {
        MoveIndicators::new(Duration::from_millis(MOVE_INDICATOR_TTL_MS))
    }
}

/// Everything a renderer needs for one tick, encodable for transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub phase: Phase,
    pub turn: Color,
    pub cells: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(tick: u64, phase: Phase, state: &GameState) -> Frame {
        Frame {
            tick,
            phase,
            turn: state.turn(),
            cells: ui_board(state.board()),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Frame, postcard::Error> {
        from_bytes(bytes)
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tick {} ({}), {} to move", self.tick, self.phase, self.turn)?;
        let rows = self.cells.len();
        for (y, row) in self.cells.iter().enumerate() {
            write!(f, "{} ", rows - y)?;
            for cell in row {
                match cell {
                    Cell::Figure(figure) => write!(f, " {}{}", figure.kind.symbol(figure.color), figure.health)?,
                    Cell::Empty => write!(f, " · ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for x in 0..self.cells.first().map_or(0, Vec::len) {
            write!(f, " {} ", (b'a' + x as u8) as char)?;
        }
        writeln!(f)
    }
}
