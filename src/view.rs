use std::collections::{HashMap, HashSet};
use std::fmt;

use log::error;

use crate::coord::Cell;
use crate::display::{BoardLayout, ScreenPos, screen_center, to_display_cell};
use crate::event::SyncEvent;
use crate::force::Force;
use crate::game::PiecePlacement;
use crate::piece::PieceKind;
use crate::turn::Affect;


// The drawing layer. It is a pure sink: it receives pixel positions and piece
// identities and hands back opaque handles. All coordinate work happens in the
// synchronizer.
pub trait RenderingSink {
    type Handle;

    fn place_piece(&mut self, pos: ScreenPos, kind: PieceKind, force: Force) -> Self::Handle;
    fn relocate(&mut self, handle: &Self::Handle, pos: ScreenPos);
    fn destroy(&mut self, handle: Self::Handle);
    fn add_highlight(&mut self, pos: ScreenPos) -> Self::Handle;
    fn remove_highlight(&mut self, handle: Self::Handle);
}

// The object table no longer mirrors the engine's board. Unlike an invalid
// click, this is a protocol or ordering bug: report it and re-render from an
// authoritative snapshot (`rebuild`) instead of crashing the session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DesyncError {
    MissingPiece { cell: Cell },
    CellOccupied { cell: Cell },
}

impl fmt::Display for DesyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesyncError::MissingPiece { cell } => {
                write!(f, "no renderable object at {:?}", cell)
            }
            DesyncError::CellOccupied { cell } => {
                write!(f, "renderable object already present at {:?}", cell)
            }
        }
    }
}

// Keeps the drawn board in lockstep with the state machine's output events.
// Exclusively owns the cell -> handle table; after every fully applied event
// its occupancy must equal the engine's.
pub struct ViewSynchronizer<S: RenderingSink> {
    sink: S,
    viewer: Force,
    layout: BoardLayout,
    objects: HashMap<Cell, S::Handle>,
    highlights: Vec<S::Handle>,
}

impl<S: RenderingSink> ViewSynchronizer<S> {
    pub fn new(sink: S, viewer: Force, layout: BoardLayout) -> Self {
        ViewSynchronizer {
            sink,
            viewer,
            layout,
            objects: HashMap::new(),
            highlights: Vec::new(),
        }
    }

    pub fn sink(&self) -> &S { &self.sink }

    pub fn occupied_cells(&self) -> HashSet<Cell> { self.objects.keys().copied().collect() }

    fn screen_pos(&self, cell: Cell) -> ScreenPos {
        screen_center(to_display_cell(cell, self.viewer), &self.layout)
    }

    // Full render from an authoritative snapshot. Used for the initial
    // placement on game start and as the recovery path after a desync.
    pub fn rebuild(&mut self, placements: &[PiecePlacement]) {
        self.clear_highlights();
        for (_, handle) in self.objects.drain() {
            self.sink.destroy(handle);
        }
        for p in placements {
            let pos = screen_center(to_display_cell(p.cell, self.viewer), &self.layout);
            let handle = self.sink.place_piece(pos, p.kind, p.force);
            self.objects.insert(p.cell, handle);
        }
    }

    pub fn apply(&mut self, event: &SyncEvent) -> Result<(), DesyncError> {
        match event {
            SyncEvent::ShowAvailableMoves { origin, destinations } => {
                self.clear_highlights();
                for cell in std::iter::once(*origin).chain(destinations.iter().copied()) {
                    let pos = self.screen_pos(cell);
                    let handle = self.sink.add_highlight(pos);
                    self.highlights.push(handle);
                }
                Ok(())
            }
            SyncEvent::HideAvailableMoves => {
                self.clear_highlights();
                Ok(())
            }
            SyncEvent::PieceMoved { from, to, affects } => {
                self.clear_highlights();
                self.piece_moved(*from, *to, affects)
            }
            // Presentation only; the table stays as the final position.
            SyncEvent::GameEnded(_) => Ok(()),
        }
    }

    // Kill affects first (captured pieces leave the board before anything
    // moves onto their squares), then the primary mover, then Move affects in
    // listed order.
    fn piece_moved(&mut self, from: Cell, to: Cell, affects: &[Affect]) -> Result<(), DesyncError> {
        for affect in affects {
            if let Affect::Kill { at } = affect {
                self.kill(*at)?;
            }
        }
        self.relocate_object(from, to)?;
        for affect in affects {
            if let Affect::Move { from, to } = affect {
                self.relocate_object(*from, *to)?;
            }
        }
        Ok(())
    }

    fn kill(&mut self, at: Cell) -> Result<(), DesyncError> {
        let Some(handle) = self.objects.remove(&at) else {
            let err = DesyncError::MissingPiece { cell: at };
            error!("View desync on kill: {}", err);
            return Err(err);
        };
        self.sink.destroy(handle);
        Ok(())
    }

    fn relocate_object(&mut self, from: Cell, to: Cell) -> Result<(), DesyncError> {
        let Some(handle) = self.objects.remove(&from) else {
            let err = DesyncError::MissingPiece { cell: from };
            error!("View desync on relocation: {}", err);
            return Err(err);
        };
        if self.objects.contains_key(&to) {
            let err = DesyncError::CellOccupied { cell: to };
            error!("View desync on relocation: {}", err);
            // Put the mover back so the handle stays in the table; otherwise
            // the recovery `rebuild` cannot destroy it and a ghost sprite
            // survives the re-render.
            self.objects.insert(from, handle);
            return Err(err);
        }
        let pos = self.screen_pos(to);
        self.sink.relocate(&handle, pos);
        self.objects.insert(to, handle);
        Ok(())
    }

    // Idempotent: clearing zero highlights is a no-op.
    fn clear_highlights(&mut self) {
        for handle in self.highlights.drain(..) {
            self.sink.remove_highlight(handle);
        }
    }
}
