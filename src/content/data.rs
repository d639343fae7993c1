//! Data definitions for the RON content files.
//!
//! These structs mirror the structure in assets/data/*.ron and are used
//! for deserialization. The LevelRegistry provides lookup by index and id.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{Impulse, MovementTuning};
use crate::session::SessionTuning;

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Tuning (tuning.ron)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TuningFile {
    pub schema_version: u32,
    #[serde(default)]
    pub movement: MovementTuning,
    #[serde(default)]
    pub session: SessionTuning,
}

// ============================================================================
// Levels (levels.ron)
// ============================================================================

/// Axis-aligned box given by its center and size, in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectDef {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum SolidKind {
    #[default]
    Ground,
    Wall,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolidDef {
    pub rect: RectDef,
    #[serde(default)]
    pub kind: SolidKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ZoneKind {
    /// Kills the player on contact.
    Death,
    Diamond,
    Checkpoint,
    /// Leads to the level at `destination` in levels.ron.
    Door { destination: usize },
    /// Knocks the player away; `power` overrides the tuned knock power.
    Hazard { power: Option<Impulse> },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneDef {
    pub rect: RectDef,
    pub kind: ZoneKind,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LevelDef {
    pub id: String,
    pub name: String,
    pub spawn_point: (f32, f32),
    pub solids: Vec<SolidDef>,
    #[serde(default)]
    pub zones: Vec<ZoneDef>,
}

impl LevelDef {
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn_point.0, self.spawn_point.1)
    }

    pub fn diamond_count(&self) -> u32 {
        self.zones
            .iter()
            .filter(|zone| zone.kind == ZoneKind::Diamond)
            .count() as u32
    }

    /// Small built-in level used when levels.ron is missing or empty.
    pub fn fallback() -> Self {
        let rect = |x, y, w, h| RectDef { x, y, w, h };
        Self {
            id: "fallback".to_string(),
            name: "Fallback".to_string(),
            spawn_point: (-300.0, -100.0),
            solids: vec![
                SolidDef {
                    rect: rect(0.0, -200.0, 1000.0, 40.0),
                    kind: SolidKind::Ground,
                },
                SolidDef {
                    rect: rect(480.0, 0.0, 40.0, 400.0),
                    kind: SolidKind::Wall,
                },
                SolidDef {
                    rect: rect(-480.0, 0.0, 40.0, 400.0),
                    kind: SolidKind::Wall,
                },
            ],
            zones: vec![
                ZoneDef {
                    rect: rect(0.0, -140.0, 20.0, 20.0),
                    kind: ZoneKind::Diamond,
                },
                ZoneDef {
                    rect: rect(0.0, -400.0, 2000.0, 100.0),
                    kind: ZoneKind::Death,
                },
            ],
        }
    }
}
