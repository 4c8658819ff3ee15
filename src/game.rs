use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::coord::Cell;
use crate::force::Force;
use crate::piece::PieceKind;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PiecePlacement {
    pub cell: Cell,
    pub kind: PieceKind,
    pub force: Force,
}

// Initial piece arrangement delivered with `GameStarted`. Also the format of
// authoritative snapshots used to re-render the board after a desync.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BoardSetup {
    pub placements: Vec<PiecePlacement>,
}

// Fixed for the lifetime of a game session. `your_force` determines board
// orientation and turn ownership; nothing here is ever mutated.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameInfo {
    pub your_force: Force,
    pub player_names: EnumMap<Force, String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameOutcome {
    Victory,
    Defeat,
    // Opponent disconnected mid-game; counts as a win for the local player.
    OpponentForfeited,
}
