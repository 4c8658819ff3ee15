use std::sync::mpsc;

use chess_king_client::client::ClientState;
use chess_king_client::coord::Cell;
use chess_king_client::event::{ClientGameEvent, ServerGameEvent};
use chess_king_client::force::Force;
use chess_king_client::game::BoardSetup;
use chess_king_client::piece::PieceKind;
use chess_king_client::test_util::{ScriptedEngine, sample_game_info};
use chess_king_client::turn::{Affect, Turn, TurnKind};
use time::OffsetDateTime;
use time::macros::datetime;

// Each test binary compiles this module separately, so not every helper is
// used everywhere.

#[allow(dead_code)]
pub const T0: OffsetDateTime = datetime!(2025-06-01 12:00 UTC);

// A client with one started game on a scripted engine, plus the receiving end
// of its outbound network channel.
#[allow(dead_code)]
pub fn start_game(
    your_force: Force, setup: BoardSetup,
) -> (ClientState<ScriptedEngine>, mpsc::Receiver<ClientGameEvent>) {
    let (tx, rx) = mpsc::channel();
    let mut client = ClientState::new("Alice".to_owned(), tx);
    client
        .process_server_event(ServerGameEvent::GameStarted {
            setup,
            game_info: sample_game_info(your_force),
        })
        .unwrap();
    (client, rx)
}

#[allow(dead_code)]
pub fn turn(
    force: Force, piece_kind: PieceKind, from: Cell, to: Cell, affects: Vec<Affect>,
) -> Turn {
    Turn {
        force,
        kind: TurnKind::Move,
        from,
        to,
        piece_kind,
        timestamp: T0,
        affects,
    }
}
