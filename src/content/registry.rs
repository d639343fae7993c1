//! LevelRegistry resource providing lookups for loaded levels.

use bevy::prelude::*;

use super::data::LevelDef;

/// Levels in play order. Door destinations are indices into this list.
#[derive(Resource, Debug, Default)]
pub struct LevelRegistry {
    levels: Vec<LevelDef>,
}

impl LevelRegistry {
    pub fn new(levels: Vec<LevelDef>) -> Self {
        Self { levels }
    }

    pub fn get(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter()
    }

    /// Returns a summary of loaded levels for logging.
    pub fn summary(&self) -> String {
        let names: Vec<&str> = self.levels.iter().map(|l| l.name.as_str()).collect();
        format!(
            "LevelRegistry loaded {} levels: {}",
            self.levels.len(),
            names.join(", ")
        )
    }
}
