use serde::{Deserialize, Serialize};

use crate::coord::Cell;
use crate::game::{BoardSetup, GameInfo, GameOutcome};
use crate::turn::{Affect, Turn};


// Output of the input translator. Carries logical coordinates only; anything
// that didn't land on the board has already been discarded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UiEvent {
    TileClicked(Cell),
}

// What the interaction state machine tells the view. The view synchronizer is
// the only consumer; payload shapes are enforced here rather than by ad-hoc
// string-keyed events.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SyncEvent {
    ShowAvailableMoves { origin: Cell, destinations: Vec<Cell> },
    HideAvailableMoves,
    PieceMoved { from: Cell, to: Cell, affects: Vec<Affect> },
    GameEnded(GameOutcome),
}

// Client -> server.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ClientGameEvent {
    FindGame { player_name: String },
    Turn { turn: Turn },
}

// Server -> client.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ServerGameEvent {
    GameStarted { setup: BoardSetup, game_info: GameInfo },
    WaitingForOpponent,
    OpponentTurn { turn: Turn },
    TurnConfirmed,
    OpponentDisconnected,
    YouWon,
    OpponentWon,
}

// The transport carries JSON strings; both directions use these helpers.
pub fn serialize_client_event(event: &ClientGameEvent) -> String {
    serde_json::to_string(event).unwrap()
}

pub fn parse_server_event(s: &str) -> Result<ServerGameEvent, serde_json::Error> {
    serde_json::from_str(s)
}
