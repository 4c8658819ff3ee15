use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::coord::Cell;
use crate::force::Force;
use crate::piece::PieceKind;


// A side effect of a move beyond the primary mover's relocation. Affects are
// ordered: later affects may reference squares vacated by earlier ones.
//
// Captures are always `Kill` affects, including ordinary captures at the
// primary destination. En passant produces a `Kill` elsewhere; castling
// produces a `Move` affect for the rook.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Affect {
    Kill { at: Cell },
    Move { from: Cell, to: Cell },
}

// Result of resolving a candidate move against the rules engine.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    pub from: Cell,
    pub to: Cell,
    pub affects: Vec<Affect>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TurnKind {
    Move,
}

// A fully resolved, recorded move: what goes over the wire and into the log.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Turn {
    pub force: Force,
    pub kind: TurnKind,
    pub from: Cell,
    pub to: Cell,
    pub piece_kind: PieceKind,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub affects: Vec<Affect>,
}

impl Turn {
    pub fn from_outcome(
        outcome: MoveOutcome, force: Force, piece_kind: PieceKind, timestamp: OffsetDateTime,
    ) -> Self {
        Turn {
            force,
            kind: TurnKind::Move,
            from: outcome.from,
            to: outcome.to,
            piece_kind,
            timestamp,
            affects: outcome.affects,
        }
    }
}
