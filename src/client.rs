use std::sync::mpsc;

use log::{debug, error, info};
use time::OffsetDateTime;

use crate::coord::Cell;
use crate::engine::RulesEngine;
use crate::event::{ClientGameEvent, ServerGameEvent, SyncEvent, UiEvent};
use crate::force::Force;
use crate::game::{GameInfo, GameOutcome};
use crate::turn::Turn;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    CannotApplyEvent(String),
}

#[derive(Clone, Debug)]
pub enum NotableEvent {
    None,
    // A new game began; the view should do a full render from the engine snapshot.
    GameStarted,
    Sync(SyncEvent),
}

// The selection is a variant payload, so it cannot outlive the `PieceSelected`
// state by construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum InteractionState {
    Idle,
    PieceSelected { from: Cell },
}

// The click-interpretation state machine for one game. Owns the rules engine
// and mediates every call to it. Confirmed local moves go out through
// `events_tx`; everything the view needs to know comes back as a `SyncEvent`.
pub struct GameState<E: RulesEngine> {
    engine: E,
    info: GameInfo,
    interaction: InteractionState,
    game_over: bool,
    events_tx: mpsc::Sender<ClientGameEvent>,
}

impl<E: RulesEngine> GameState<E> {
    pub fn new(engine: E, info: GameInfo, events_tx: mpsc::Sender<ClientGameEvent>) -> Self {
        GameState {
            engine,
            info,
            interaction: InteractionState::Idle,
            game_over: false,
            events_tx,
        }
    }

    pub fn engine(&self) -> &E { &self.engine }
    pub fn engine_mut(&mut self) -> &mut E { &mut self.engine }
    pub fn info(&self) -> &GameInfo { &self.info }
    pub fn viewer(&self) -> Force { self.info.your_force }
    pub fn is_over(&self) -> bool { self.game_over }

    pub fn selection(&self) -> Option<Cell> {
        match self.interaction {
            InteractionState::Idle => None,
            InteractionState::PieceSelected { from } => Some(from),
        }
    }

    pub fn tile_clicked(&mut self, cell: Cell) -> Option<SyncEvent> {
        if self.game_over {
            debug!("Ignoring click at {:?}: game is over", cell);
            return None;
        }
        // The single concurrency-correctness mechanism: the engine is the only
        // authority on whose turn it is, and clicks out of turn do nothing in
        // either interaction state.
        if self.engine.current_mover() != self.info.your_force {
            debug!("Ignoring click at {:?}: not your turn", cell);
            return None;
        }
        match self.interaction {
            InteractionState::Idle => self.select_piece(cell),
            InteractionState::PieceSelected { from } => self.try_move(from, cell),
        }
    }

    fn select_piece(&mut self, cell: Cell) -> Option<SyncEvent> {
        let destinations = self.engine.legal_destinations(cell);
        if destinations.is_empty() {
            // Empty square or a piece with nowhere to go.
            return None;
        }
        self.interaction = InteractionState::PieceSelected { from: cell };
        Some(SyncEvent::ShowAvailableMoves { origin: cell, destinations })
    }

    // Any target the engine rejects deselects; that is the cancel gesture.
    // There is no other way to drop a selection.
    fn try_move(&mut self, from: Cell, to: Cell) -> Option<SyncEvent> {
        self.interaction = InteractionState::Idle;
        let Some(outcome) = self.engine.resolve_move(from, to) else {
            return Some(SyncEvent::HideAvailableMoves);
        };
        let Some((piece_kind, _)) = self.engine.piece_at(from) else {
            // The selection went stale (e.g. the piece vanished in a desync);
            // recover through the cancel path rather than panicking.
            error!("Engine resolved a move from {:?}, but no piece is there", from);
            return Some(SyncEvent::HideAvailableMoves);
        };
        let turn = Turn::from_outcome(
            outcome,
            self.info.your_force,
            piece_kind,
            OffsetDateTime::now_utc(),
        );
        if let Err(err) = self.engine.apply_turn(&turn) {
            error!("Resolved move {:?} -> {:?} failed to apply: {}", from, to, err);
            return Some(SyncEvent::HideAvailableMoves);
        }
        // Fire-and-forget: we do not wait for server confirmation before
        // returning to Idle.
        self.events_tx.send(ClientGameEvent::Turn { turn: turn.clone() }).unwrap();
        Some(SyncEvent::PieceMoved { from: turn.from, to: turn.to, affects: turn.affects })
    }

    // Applies a turn received from the network channel. Local selection, if
    // any, is deliberately left untouched: opponent turns only arrive when it
    // is not the local player's turn, and a stale selection resolves through
    // the cancel path on the next click.
    pub fn opponent_turn(&mut self, turn: Turn) -> Result<SyncEvent, EventError> {
        if self.game_over {
            return Err(EventError::CannotApplyEvent(format!(
                "Cannot apply turn {:?} -> {:?}: game over",
                turn.from, turn.to
            )));
        }
        if turn.force == self.info.your_force {
            return Err(EventError::CannotApplyEvent(
                "Received an opponent turn with our own color".to_owned(),
            ));
        }
        if self.engine.current_mover() != turn.force {
            // Applying would corrupt the board; `apply_turn` is not idempotent.
            return Err(EventError::CannotApplyEvent(format!(
                "Turn by {} arrived out of order",
                turn.force
            )));
        }
        self.engine.apply_turn(&turn).map_err(|err| {
            EventError::CannotApplyEvent(format!(
                "Impossible opponent turn {:?} -> {:?}: {}",
                turn.from, turn.to, err
            ))
        })?;
        Ok(SyncEvent::PieceMoved { from: turn.from, to: turn.to, affects: turn.affects })
    }

    fn end_game(&mut self, outcome: GameOutcome) -> SyncEvent {
        self.interaction = InteractionState::Idle;
        self.game_over = true;
        SyncEvent::GameEnded(outcome)
    }
}


pub enum SessionState<E: RulesEngine> {
    Uninitialized,
    Queued,
    Game(GameState<E>),
    Over(GameOutcome),
}

// Session-level wrapper: matchmaking, game lifecycle and the routing of server
// events into the active game. One `ClientState` per connection; dropping it
// drops the outbound channel, so no listeners leak across sessions.
pub struct ClientState<E: RulesEngine> {
    my_name: String,
    events_tx: mpsc::Sender<ClientGameEvent>,
    session: SessionState<E>,
}

impl<E: RulesEngine> ClientState<E> {
    pub fn new(my_name: String, events_tx: mpsc::Sender<ClientGameEvent>) -> Self {
        ClientState {
            my_name,
            events_tx,
            session: SessionState::Uninitialized,
        }
    }

    pub fn my_name(&self) -> &str { &self.my_name }
    pub fn session(&self) -> &SessionState<E> { &self.session }

    pub fn game(&self) -> Option<&GameState<E>> {
        match &self.session {
            SessionState::Game(game) => Some(game),
            _ => None,
        }
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState<E>> {
        match &mut self.session {
            SessionState::Game(game) => Some(game),
            _ => None,
        }
    }

    pub fn find_game(&mut self) {
        self.events_tx
            .send(ClientGameEvent::FindGame { player_name: self.my_name.clone() })
            .unwrap();
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) -> Option<SyncEvent> {
        let Some(game) = self.game_mut() else {
            debug!("Ignoring {:?}: no game in progress", event);
            return None;
        };
        match event {
            UiEvent::TileClicked(cell) => game.tile_clicked(cell),
        }
    }

    pub fn process_server_event(
        &mut self, event: ServerGameEvent,
    ) -> Result<NotableEvent, EventError> {
        match event {
            ServerGameEvent::WaitingForOpponent => {
                info!("Waiting for an opponent");
                self.session = SessionState::Queued;
                Ok(NotableEvent::None)
            }
            ServerGameEvent::GameStarted { setup, game_info } => {
                info!("Game started; playing {}", game_info.your_force);
                let engine = E::from_setup(&setup);
                self.session =
                    SessionState::Game(GameState::new(engine, game_info, self.events_tx.clone()));
                Ok(NotableEvent::GameStarted)
            }
            ServerGameEvent::OpponentTurn { turn } => {
                let game = self.game_mut().ok_or_else(|| {
                    EventError::CannotApplyEvent(
                        "Cannot apply opponent turn: no game in progress".to_owned(),
                    )
                })?;
                game.opponent_turn(turn).map(NotableEvent::Sync)
            }
            ServerGameEvent::TurnConfirmed => {
                debug!("Server confirmed our turn");
                Ok(NotableEvent::None)
            }
            ServerGameEvent::YouWon => self.finish_game(GameOutcome::Victory),
            ServerGameEvent::OpponentWon => self.finish_game(GameOutcome::Defeat),
            ServerGameEvent::OpponentDisconnected => {
                self.finish_game(GameOutcome::OpponentForfeited)
            }
        }
    }

    fn finish_game(&mut self, outcome: GameOutcome) -> Result<NotableEvent, EventError> {
        let Some(game) = self.game_mut() else {
            return Err(EventError::CannotApplyEvent(format!(
                "Cannot record game result {:?}: no game in progress",
                outcome
            )));
        };
        info!("Game over: {:?}", outcome);
        let event = game.end_game(outcome);
        self.session = SessionState::Over(outcome);
        Ok(NotableEvent::Sync(event))
    }
}
