mod common;

use std::collections::HashSet;

use chess_king_client::coord::Cell;
use chess_king_client::display::{BoardLayout, ScreenPos};
use chess_king_client::engine::RulesEngine;
use chess_king_client::event::SyncEvent;
use chess_king_client::force::Force;
use chess_king_client::game::GameOutcome;
use chess_king_client::test_util::{
    RecordingSink, ScriptedEngine, SinkCall, cell, classic_setup, parse_setup,
};
use chess_king_client::turn::Affect;
use chess_king_client::view::{DesyncError, ViewSynchronizer};
use pretty_assertions::assert_eq;


const TILE: f64 = 80.;

fn new_view(viewer: Force) -> ViewSynchronizer<RecordingSink> {
    ViewSynchronizer::new(RecordingSink::new(), viewer, BoardLayout::with_tile_size(TILE))
}

// Pixel center of a display tile.
fn at(x: i32, y: i32) -> ScreenPos {
    ScreenPos { x: (f64::from(x) + 0.5) * TILE, y: (f64::from(y) + 0.5) * TILE }
}

fn occupied(placements: &[chess_king_client::game::PiecePlacement]) -> HashSet<Cell> {
    placements.iter().map(|p| p.cell).collect()
}


#[test]
fn rebuild_renders_the_whole_setup() {
    let setup = classic_setup();
    let mut view = new_view(Force::White);
    view.rebuild(&setup.placements);
    assert_eq!(view.occupied_cells(), occupied(&setup.placements));
    assert_eq!(view.sink().live_piece_positions().len(), 32);
}

#[test]
fn show_moves_highlights_origin_and_destinations_for_black() {
    // Black viewer: logical (4, 1) with destinations (4, 2) and (4, 3), no mirroring.
    let mut view = new_view(Force::Black);
    view.rebuild(&classic_setup().placements);
    view.apply(&SyncEvent::ShowAvailableMoves {
        origin: cell("e2"),
        destinations: vec![cell("e3"), cell("e4")],
    })
    .unwrap();
    assert_eq!(view.sink().active_highlights(), vec![at(4, 1), at(4, 2), at(4, 3)]);
}

#[test]
fn show_moves_highlights_mirrored_for_white() {
    // Same logical squares seen by White land on (3, 6), (3, 5) and (3, 4).
    let mut view = new_view(Force::White);
    view.rebuild(&classic_setup().placements);
    view.apply(&SyncEvent::ShowAvailableMoves {
        origin: cell("e2"),
        destinations: vec![cell("e3"), cell("e4")],
    })
    .unwrap();
    assert_eq!(view.sink().active_highlights(), vec![at(3, 6), at(3, 5), at(3, 4)]);
}

#[test]
fn show_moves_replaces_previous_highlights() {
    let mut view = new_view(Force::White);
    view.rebuild(&classic_setup().placements);
    view.apply(&SyncEvent::ShowAvailableMoves { origin: cell("e2"), destinations: vec![cell("e4")] })
        .unwrap();
    view.apply(&SyncEvent::ShowAvailableMoves { origin: cell("d2"), destinations: vec![cell("d4")] })
        .unwrap();
    assert_eq!(view.sink().active_highlights().len(), 2);
}

#[test]
fn hide_moves_is_idempotent() {
    let mut view = new_view(Force::White);
    view.rebuild(&classic_setup().placements);
    view.apply(&SyncEvent::ShowAvailableMoves {
        origin: cell("e2"),
        destinations: vec![cell("e3"), cell("e4")],
    })
    .unwrap();
    view.apply(&SyncEvent::HideAvailableMoves).unwrap();
    assert_eq!(view.sink().active_highlights(), vec![]);

    let calls_after_first_hide = view.sink().calls.len();
    view.apply(&SyncEvent::HideAvailableMoves).unwrap();
    assert_eq!(view.sink().calls.len(), calls_after_first_hide);
    assert_eq!(view.sink().active_highlights(), vec![]);
}

#[test]
fn piece_moved_clears_stale_highlights() {
    let mut view = new_view(Force::White);
    view.rebuild(&classic_setup().placements);
    view.apply(&SyncEvent::ShowAvailableMoves {
        origin: cell("e2"),
        destinations: vec![cell("e3"), cell("e4")],
    })
    .unwrap();
    view.apply(&SyncEvent::PieceMoved { from: cell("e2"), to: cell("e4"), affects: vec![] })
        .unwrap();
    assert_eq!(view.sink().active_highlights(), vec![]);
}

#[test]
fn plain_move_relocates_the_table_entry() {
    let mut view = new_view(Force::White);
    view.rebuild(&classic_setup().placements);
    view.apply(&SyncEvent::PieceMoved { from: cell("e2"), to: cell("e4"), affects: vec![] })
        .unwrap();
    assert!(view.occupied_cells().contains(&cell("e4")));
    assert!(!view.occupied_cells().contains(&cell("e2")));
    // White viewer: e4 is display tile (3, 4).
    let relocation = view.sink().calls.last().copied();
    assert!(matches!(relocation, Some(SinkCall::Relocate { pos, .. }) if pos == at(3, 4)));
}

#[test]
fn capture_kills_the_occupant_before_relocating() {
    let setup = parse_setup(
        "
        . . . . . . . k
        . . . . . . . .
        . . . . . . . .
        . . . q . . . .
        . . . . P . . .
        . . . . . . . .
        . . . . . . . .
        K . . . . . . .
        ",
    );
    let mut view = new_view(Force::White);
    view.rebuild(&setup.placements);
    // Pawn takes the queen on d5; the capture arrives as a Kill at the destination.
    view.apply(&SyncEvent::PieceMoved {
        from: cell("e4"),
        to: cell("d5"),
        affects: vec![Affect::Kill { at: cell("d5") }],
    })
    .unwrap();
    assert_eq!(
        view.occupied_cells(),
        [cell("a1"), cell("d5"), cell("h8")].into_iter().collect()
    );
    assert_eq!(view.sink().live_piece_positions().len(), 3);
}

#[test]
fn kill_affect_away_from_the_destination() {
    // En-passant shape: White pawn e5 takes on f6 while the killed pawn sits on f5.
    let setup = parse_setup(
        "
        . . . . . . . k
        . . . . . . . .
        . . . . . . . .
        . . . . P p . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        K . . . . . . .
        ",
    );
    let mut view = new_view(Force::White);
    view.rebuild(&setup.placements);
    view.apply(&SyncEvent::PieceMoved {
        from: cell("e5"),
        to: cell("f6"),
        affects: vec![Affect::Kill { at: cell("f5") }],
    })
    .unwrap();
    assert_eq!(
        view.occupied_cells(),
        [cell("a1"), cell("f6"), cell("h8")].into_iter().collect()
    );
}

#[test]
fn move_affect_relocates_the_secondary_piece() {
    // Castling shape: king e1 -> g1, rook h1 -> f1.
    let setup = parse_setup(
        "
        r n b q k b n r
        p p p p p p p p
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        P P P P P P P P
        R N B Q K . . R
        ",
    );
    let mut view = new_view(Force::White);
    view.rebuild(&setup.placements);
    view.apply(&SyncEvent::PieceMoved {
        from: cell("e1"),
        to: cell("g1"),
        affects: vec![Affect::Move { from: cell("h1"), to: cell("f1") }],
    })
    .unwrap();
    let occupied = view.occupied_cells();
    assert!(occupied.contains(&cell("g1")));
    assert!(occupied.contains(&cell("f1")));
    assert!(!occupied.contains(&cell("e1")));
    assert!(!occupied.contains(&cell("h1")));
}

#[test]
fn view_occupancy_tracks_engine_occupancy() {
    // Round-trip consistency: after a turn with affects is applied to both the
    // engine and the view, their occupancy sets are equal.
    let setup = parse_setup(
        "
        . . . . . . . k
        . . . . . . . .
        . . . . . . . .
        . . . . P p . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        K . . . . . . .
        ",
    );
    let mut engine = ScriptedEngine::from_setup(&setup);
    let mut view = new_view(Force::White);
    view.rebuild(&engine.snapshot());

    let affects = vec![Affect::Kill { at: cell("f5") }];
    let turn = common::turn(
        Force::White,
        chess_king_client::piece::PieceKind::Pawn,
        cell("e5"),
        cell("f6"),
        affects.clone(),
    );
    engine.apply_turn(&turn).unwrap();
    view.apply(&SyncEvent::PieceMoved { from: cell("e5"), to: cell("f6"), affects })
        .unwrap();

    assert_eq!(view.occupied_cells(), occupied(&engine.snapshot()));
}

#[test]
fn desync_is_reported_and_rebuild_recovers() {
    let setup = classic_setup();
    let mut view = new_view(Force::Black);
    view.rebuild(&setup.placements);

    // A move from an empty square cannot be rendered.
    let result =
        view.apply(&SyncEvent::PieceMoved { from: cell("e5"), to: cell("e6"), affects: vec![] });
    assert_eq!(result, Err(DesyncError::MissingPiece { cell: cell("e5") }));

    // Recovery policy: full re-render from the authoritative snapshot.
    view.rebuild(&setup.placements);
    assert_eq!(view.occupied_cells(), occupied(&setup.placements));
}

#[test]
fn killing_an_empty_square_is_a_desync() {
    let mut view = new_view(Force::Black);
    view.rebuild(&classic_setup().placements);
    let result = view.apply(&SyncEvent::PieceMoved {
        from: cell("e2"),
        to: cell("e4"),
        affects: vec![Affect::Kill { at: cell("d5") }],
    });
    assert_eq!(result, Err(DesyncError::MissingPiece { cell: cell("d5") }));
}

#[test]
fn failed_relocation_does_not_leak_the_mover() {
    let setup = classic_setup();
    let mut view = new_view(Force::White);
    view.rebuild(&setup.placements);

    // A relocation onto an occupied square with no Kill affect is a desync.
    // The mover must stay in the table so the recovery rebuild destroys it.
    let result =
        view.apply(&SyncEvent::PieceMoved { from: cell("d1"), to: cell("d2"), affects: vec![] });
    assert_eq!(result, Err(DesyncError::CellOccupied { cell: cell("d2") }));
    assert_eq!(view.occupied_cells(), occupied(&setup.placements));

    view.rebuild(&setup.placements);
    assert_eq!(view.occupied_cells(), occupied(&setup.placements));
    assert_eq!(view.sink().live_piece_positions().len(), 32);
}

#[test]
fn game_end_leaves_the_table_untouched() {
    let setup = classic_setup();
    let mut view = new_view(Force::White);
    view.rebuild(&setup.placements);
    view.apply(&SyncEvent::GameEnded(GameOutcome::Victory)).unwrap();
    assert_eq!(view.occupied_cells(), occupied(&setup.placements));
}
