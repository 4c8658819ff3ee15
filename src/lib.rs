#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod client;
pub mod coord;
pub mod display;
pub mod engine;
pub mod event;
pub mod force;
pub mod game;
pub mod input;
pub mod piece;
pub mod test_util;
pub mod turn;
pub mod view;
