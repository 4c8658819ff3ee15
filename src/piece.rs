use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn to_full_algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_algebraic_char(notation: char) -> Option<Self> {
        match notation {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

// Upper-case letters are White pieces, lower-case are Black.
pub fn piece_from_ascii(ch: char) -> Option<(PieceKind, Force)> {
    let force = if ch.is_ascii_uppercase() { Force::White } else { Force::Black };
    let kind = PieceKind::from_algebraic_char(ch.to_ascii_uppercase())?;
    Some((kind, force))
}

pub fn piece_to_ascii(kind: PieceKind, force: Force) -> char {
    let ch = kind.to_full_algebraic();
    match force {
        Force::White => ch,
        Force::Black => ch.to_ascii_lowercase(),
    }
}
