//! Rendering widgets for the card gallery

pub mod card_grid;

pub use card_grid::{grid_slots, render_card, CARD_HEIGHT, CARD_WIDTH};
