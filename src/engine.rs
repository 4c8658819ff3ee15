use std::fmt;

use crate::coord::Cell;
use crate::force::Force;
use crate::game::{BoardSetup, PiecePlacement};
use crate::piece::PieceKind;
use crate::turn::{MoveOutcome, Turn};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnError {
    IllegalTurn,
    GameOver,
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::IllegalTurn => write!(f, "illegal turn"),
            TurnError::GameOver => write!(f, "game is over"),
        }
    }
}

// The query surface of the chess-rules engine. The client never inspects rules
// itself: legality, check detection and turn bookkeeping all live behind this
// trait. `apply_turn` mutates the authoritative board and is not idempotent,
// so the caller must never double-apply a turn.
pub trait RulesEngine {
    fn from_setup(setup: &BoardSetup) -> Self
    where
        Self: Sized;

    // Empty if the cell is empty or its piece has no legal moves.
    fn legal_destinations(&self, from: Cell) -> Vec<Cell>;

    // `None` if the move is illegal (including `from` not holding a piece of
    // the current mover). A stale `from` after an opponent turn lands here.
    fn resolve_move(&self, from: Cell, to: Cell) -> Option<MoveOutcome>;

    fn apply_turn(&mut self, turn: &Turn) -> Result<(), TurnError>;

    fn current_mover(&self) -> Force;

    fn piece_at(&self, cell: Cell) -> Option<(PieceKind, Force)>;

    // Authoritative occupancy, used for full re-renders.
    fn snapshot(&self) -> Vec<PiecePlacement> {
        Cell::all()
            .filter_map(|cell| {
                self.piece_at(cell).map(|(kind, force)| PiecePlacement { cell, kind, force })
            })
            .collect()
    }
}
