//! Content domain: tests for RON parsing, fallbacks and level validation.

use std::path::Path;

use super::data::{DataFile, LevelDef, SolidKind, TuningFile, ZoneKind};
use super::loader::{load_all_content, parse_ron};
use super::registry::LevelRegistry;
use super::validation::validate_levels;
use crate::movement::{Impulse, MovementTuning};

// -----------------------------------------------------------------------------
// Tuning
// -----------------------------------------------------------------------------

#[test]
fn test_partial_tuning_fills_defaults() {
    let ron = r#"(
        schema_version: 1,
        movement: (
            speed: 250.0,
            wall_jump_force: (x: 300.0, y: 500.0),
        ),
        session: (
            respawn_delay: 2.0,
            diamond_random_look: true,
            seed: 7,
        ),
    )"#;

    let tuning: TuningFile = parse_ron("tuning.ron", ron).unwrap();
    assert_eq!(tuning.movement.speed, 250.0);
    assert_eq!(tuning.movement.wall_jump_force, Impulse::new(300.0, 500.0));
    assert_eq!(
        tuning.movement.jump_force,
        MovementTuning::default().jump_force
    );
    assert_eq!(tuning.session.respawn_delay, 2.0);
    assert!(tuning.session.diamond_random_look);
    assert_eq!(tuning.session.seed, Some(7));
}

#[test]
fn test_parse_error_names_the_file() {
    let result: Result<TuningFile, _> = parse_ron("tuning.ron", "(schema_version: )");
    let err = result.unwrap_err();
    assert_eq!(err.file, "tuning.ron");
    assert!(err.to_string().starts_with("Failed to load tuning.ron"));
}

// -----------------------------------------------------------------------------
// Levels
// -----------------------------------------------------------------------------

const TWO_LEVELS: &str = r#"(
    schema_version: 1,
    items: [
        (
            id: "intro",
            name: "Intro",
            spawn_point: (0.0, 0.0),
            solids: [
                (rect: (x: 0.0, y: -100.0, w: 800.0, h: 40.0)),
                (rect: (x: 400.0, y: 0.0, w: 40.0, h: 300.0), kind: Wall),
            ],
            zones: [
                (rect: (x: 100.0, y: -60.0, w: 20.0, h: 20.0), kind: Diamond),
                (rect: (x: 200.0, y: -60.0, w: 20.0, h: 20.0), kind: Diamond),
                (rect: (x: 300.0, y: -60.0, w: 30.0, h: 10.0), kind: Hazard(power: (x: 400.0, y: 300.0))),
                (rect: (x: 350.0, y: -50.0, w: 40.0, h: 60.0), kind: Door(destination: 1)),
            ],
        ),
        (
            id: "cave",
            name: "Cave",
            spawn_point: (10.0, 20.0),
            solids: [(rect: (x: 0.0, y: -100.0, w: 800.0, h: 40.0))],
        ),
    ],
)"#;

#[test]
fn test_levels_parse_with_defaults_and_implicit_some() {
    let file: DataFile<LevelDef> = parse_ron("levels.ron", TWO_LEVELS).unwrap();
    assert_eq!(file.items.len(), 2);

    let intro = &file.items[0];
    assert_eq!(intro.solids[0].kind, SolidKind::Ground);
    assert_eq!(intro.solids[1].kind, SolidKind::Wall);
    assert_eq!(intro.diamond_count(), 2);
    assert_eq!(
        intro.zones[2].kind,
        ZoneKind::Hazard {
            power: Some(Impulse::new(400.0, 300.0))
        }
    );

    let cave = &file.items[1];
    assert!(cave.zones.is_empty());
    assert_eq!(cave.spawn_point(), bevy::math::Vec2::new(10.0, 20.0));
}

#[test]
fn test_valid_levels_pass_validation() {
    let file: DataFile<LevelDef> = parse_ron("levels.ron", TWO_LEVELS).unwrap();
    let registry = LevelRegistry::new(file.items);
    assert!(validate_levels(&registry).is_empty());
}

#[test]
fn test_validation_flags_bad_door_and_duplicates() {
    let mut file: DataFile<LevelDef> = parse_ron("levels.ron", TWO_LEVELS).unwrap();
    file.items.truncate(1);
    let mut duplicate = file.items[0].clone();
    duplicate.zones.clear();
    file.items.push(duplicate);
    if let ZoneKind::Door { destination } = &mut file.items[0].zones[3].kind {
        *destination = 5;
    }

    let errors = validate_levels(&LevelRegistry::new(file.items));
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| e.field == "id"));
    assert!(errors.iter().any(|e| e.field == "zones"));
}

// -----------------------------------------------------------------------------
// Fallbacks
// -----------------------------------------------------------------------------

#[test]
fn test_missing_files_fall_back_to_defaults() {
    let (content, errors) = load_all_content(Path::new("does/not/exist"));
    assert_eq!(errors.len(), 2);
    assert_eq!(content.tuning.movement, MovementTuning::default());
    assert_eq!(content.levels.len(), 1);
    assert_eq!(content.levels.get(0).map(|l| l.id.as_str()), Some("fallback"));
}

#[test]
fn test_shipped_content_loads_cleanly() {
    let (content, errors) = load_all_content(Path::new("assets/data"));
    assert!(errors.is_empty(), "content errors: {:?}", errors);
    assert!(validate_levels(&content.levels).is_empty());
    assert!(content.levels.len() >= 2);
}
