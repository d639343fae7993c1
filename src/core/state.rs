//! Core domain: top-level flow between loading, playing, and level swaps.

use bevy::prelude::*;

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum GameState {
    /// Content files are being read.
    #[default]
    Boot,
    /// A level is loaded and the player can act.
    Playing,
    /// The current level is being torn down before the next one spawns.
    Transition,
}
