// Scripted doubles for the two external collaborators: the rules engine and
// the rendering sink. Tests state exactly what the engine answers and assert
// on exactly what the sink was told to draw.

use std::collections::HashMap;

use enum_map::enum_map;
use itertools::Itertools;

use crate::coord::{BOARD_SIZE, Cell, File, Rank};
use crate::display::ScreenPos;
use crate::engine::{RulesEngine, TurnError};
use crate::force::Force;
use crate::game::{BoardSetup, GameInfo, PiecePlacement};
use crate::piece::{PieceKind, piece_from_ascii};
use crate::turn::{Affect, MoveOutcome, Turn};


// Parses an ascii board diagram. Rows top to bottom are ranks 8 down to 1,
// pieces are algebraic letters (upper-case White, lower-case Black), '.' is an
// empty square.
pub fn parse_setup(board_str: &str) -> BoardSetup {
    let rows = board_str
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.split_ascii_whitespace().collect_vec())
        .collect_vec();
    assert_eq!(rows.len(), BOARD_SIZE as usize);
    assert!(rows.iter().all(|row| row.len() == BOARD_SIZE as usize));
    let mut placements = Vec::new();
    for (rank_idx, row) in rows.iter().rev().enumerate() {
        for (file_idx, piece_str) in row.iter().enumerate() {
            let ch = piece_str.chars().exactly_one().unwrap();
            if ch == '.' {
                continue;
            }
            let (kind, force) =
                piece_from_ascii(ch).unwrap_or_else(|| panic!("Invalid piece: {}", ch));
            placements.push(PiecePlacement {
                cell: Cell::new(
                    File::from_zero_based(file_idx as u8),
                    Rank::from_zero_based(rank_idx as u8),
                ),
                kind,
                force,
            });
        }
    }
    BoardSetup { placements }
}

pub fn classic_setup() -> BoardSetup {
    parse_setup(
        "
        r n b q k b n r
        p p p p p p p p
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        P P P P P P P P
        R N B Q K B N R
        ",
    )
}

pub fn sample_game_info(your_force: Force) -> GameInfo {
    GameInfo {
        your_force,
        player_names: enum_map! {
            Force::White => "Alice".to_owned(),
            Force::Black => "Bob".to_owned(),
        },
    }
}

pub fn cell(s: &str) -> Cell { Cell::from_algebraic(s).unwrap() }


// A rules engine that answers from explicit tables. Scripted answers are
// dropped whenever a turn is applied, mimicking a real engine whose legal
// moves change after every turn.
pub struct ScriptedEngine {
    pieces: HashMap<Cell, (PieceKind, Force)>,
    destinations: HashMap<Cell, Vec<Cell>>,
    outcomes: HashMap<(Cell, Cell), MoveOutcome>,
    mover: Force,
}

impl ScriptedEngine {
    pub fn script_destinations(&mut self, from: Cell, destinations: Vec<Cell>) {
        self.destinations.insert(from, destinations);
    }

    pub fn script_move(&mut self, from: Cell, to: Cell, affects: Vec<Affect>) {
        self.outcomes.insert((from, to), MoveOutcome { from, to, affects });
    }

    pub fn set_mover(&mut self, mover: Force) { self.mover = mover; }

    // Simulates the legal-move picture changing under a live selection.
    pub fn clear_scripts(&mut self) {
        self.destinations.clear();
        self.outcomes.clear();
    }
}

impl RulesEngine for ScriptedEngine {
    fn from_setup(setup: &BoardSetup) -> Self {
        let pieces = setup
            .placements
            .iter()
            .map(|p| (p.cell, (p.kind, p.force)))
            .collect();
        ScriptedEngine {
            pieces,
            destinations: HashMap::new(),
            outcomes: HashMap::new(),
            mover: Force::White,
        }
    }

    fn legal_destinations(&self, from: Cell) -> Vec<Cell> {
        self.destinations.get(&from).cloned().unwrap_or_default()
    }

    fn resolve_move(&self, from: Cell, to: Cell) -> Option<MoveOutcome> {
        self.outcomes.get(&(from, to)).cloned()
    }

    fn apply_turn(&mut self, turn: &Turn) -> Result<(), TurnError> {
        if turn.force != self.mover {
            return Err(TurnError::IllegalTurn);
        }
        for affect in &turn.affects {
            if let Affect::Kill { at } = affect {
                self.pieces.remove(at).ok_or(TurnError::IllegalTurn)?;
            }
        }
        let piece = self.pieces.remove(&turn.from).ok_or(TurnError::IllegalTurn)?;
        self.pieces.insert(turn.to, piece);
        for affect in &turn.affects {
            if let Affect::Move { from, to } = affect {
                let piece = self.pieces.remove(from).ok_or(TurnError::IllegalTurn)?;
                self.pieces.insert(*to, piece);
            }
        }
        self.destinations.clear();
        self.outcomes.clear();
        self.mover = self.mover.opponent();
        Ok(())
    }

    fn current_mover(&self) -> Force { self.mover }

    fn piece_at(&self, cell: Cell) -> Option<(PieceKind, Force)> {
        self.pieces.get(&cell).copied()
    }
}


#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SinkCall {
    PlacePiece { handle: u32, pos: ScreenPos, kind: PieceKind, force: Force },
    Relocate { handle: u32, pos: ScreenPos },
    Destroy { handle: u32 },
    AddHighlight { handle: u32, pos: ScreenPos },
    RemoveHighlight { handle: u32 },
}

// A rendering sink that hands out sequential handles and records every call.
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
    next_handle: u32,
}

impl RecordingSink {
    pub fn new() -> Self { RecordingSink { calls: Vec::new(), next_handle: 0 } }

    fn fresh_handle(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    // Highlights that were added and never removed, in addition order.
    pub fn active_highlights(&self) -> Vec<ScreenPos> {
        let mut active = Vec::new();
        for call in &self.calls {
            match call {
                SinkCall::AddHighlight { handle, pos } => active.push((*handle, *pos)),
                SinkCall::RemoveHighlight { handle } => active.retain(|(h, _)| h != handle),
                _ => {}
            }
        }
        active.into_iter().map(|(_, pos)| pos).collect()
    }

    // The last position each live piece handle was placed or relocated to.
    pub fn live_piece_positions(&self) -> HashMap<u32, ScreenPos> {
        let mut live = HashMap::new();
        for call in &self.calls {
            match call {
                SinkCall::PlacePiece { handle, pos, .. } => {
                    live.insert(*handle, *pos);
                }
                SinkCall::Relocate { handle, pos } => {
                    live.insert(*handle, *pos);
                }
                SinkCall::Destroy { handle } => {
                    live.remove(handle);
                }
                _ => {}
            }
        }
        live
    }
}

impl crate::view::RenderingSink for RecordingSink {
    type Handle = u32;

    fn place_piece(&mut self, pos: ScreenPos, kind: PieceKind, force: Force) -> u32 {
        let handle = self.fresh_handle();
        self.calls.push(SinkCall::PlacePiece { handle, pos, kind, force });
        handle
    }

    fn relocate(&mut self, handle: &u32, pos: ScreenPos) {
        self.calls.push(SinkCall::Relocate { handle: *handle, pos });
    }

    fn destroy(&mut self, handle: u32) { self.calls.push(SinkCall::Destroy { handle }); }

    fn add_highlight(&mut self, pos: ScreenPos) -> u32 {
        let handle = self.fresh_handle();
        self.calls.push(SinkCall::AddHighlight { handle, pos });
        handle
    }

    fn remove_highlight(&mut self, handle: u32) {
        self.calls.push(SinkCall::RemoveHighlight { handle });
    }
}
