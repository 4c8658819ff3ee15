use log::debug;

use crate::display::{BoardLayout, ScreenPos, from_display_cell, position_to_display_cell};
use crate::event::UiEvent;
use crate::force::Force;


// Turns raw pointer positions into logical tile clicks. A pure coordinate
// adapter: it knows the board layout and the viewer's orientation, but nothing
// about whose turn it is or what occupies the squares.
#[derive(Clone, Copy, Debug)]
pub struct InputTranslator {
    layout: BoardLayout,
    viewer: Force,
}

impl InputTranslator {
    pub fn new(layout: BoardLayout, viewer: Force) -> Self { InputTranslator { layout, viewer } }

    pub fn layout(&self) -> &BoardLayout { &self.layout }

    // At most one `TileClicked` per pointer event. Clicks outside the 8x8
    // board are dropped here and never reach the state machine.
    pub fn pointer_down(&self, pos: ScreenPos) -> Option<UiEvent> {
        let display_cell = position_to_display_cell(pos, &self.layout);
        match from_display_cell(display_cell, self.viewer) {
            Some(cell) => Some(UiEvent::TileClicked(cell)),
            None => {
                debug!("Pointer event at ({}, {}) is outside the board", pos.x, pos.y);
                None
            }
        }
    }
}
