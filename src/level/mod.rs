//! Level domain: spawning level geometry and zones, and swapping levels.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::content::{LevelDef, LevelRegistry, SolidKind, ZoneKind};
use crate::core::{ActionOwner, ActionScheduler, GameState};
use crate::movement::{CharacterController, GameLayer, Player};
use crate::session::LevelSession;
use crate::triggers::TriggerZone;

#[cfg(test)]
mod tests;

/// Index into [`LevelRegistry`] of the level to spawn on entering `Playing`.
#[derive(Resource, Debug, Default)]
pub struct ActiveLevel {
    pub index: usize,
}

/// Everything spawned for the current level; despawned on transition.
#[derive(Component, Debug)]
pub struct LevelEntity;

/// Door the player came in through.
#[derive(Component, Debug)]
pub struct EntranceDoor;

const GROUND_COLOR: Color = Color::srgb(0.35, 0.3, 0.25);
const WALL_COLOR: Color = Color::srgb(0.3, 0.3, 0.35);
const DOOR_COLOR: Color = Color::srgb(0.55, 0.35, 0.15);
const DOOR_OPEN_COLOR: Color = Color::srgb(0.95, 0.8, 0.3);
const CHECKPOINT_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);
const HAZARD_COLOR: Color = Color::srgb(0.85, 0.25, 0.2);
const DEATH_COLOR: Color = Color::srgba(0.6, 0.1, 0.1, 0.25);
const DIAMOND_COLORS: [Color; 4] = [
    Color::srgb(0.4, 0.85, 1.0),
    Color::srgb(1.0, 0.4, 0.7),
    Color::srgb(0.6, 1.0, 0.5),
    Color::srgb(1.0, 0.85, 0.3),
];
const CAMERA_FOLLOW_RATE: f32 = 6.0;

/// Map a requested scene onto an existing level, wrapping past the end to the first.
pub fn resolve_destination(scene: usize, level_count: usize) -> usize {
    if scene < level_count { scene } else { 0 }
}

fn zone_color(zone: &ZoneKind, diamond_look: u32) -> Color {
    match zone {
        ZoneKind::Death => DEATH_COLOR,
        ZoneKind::Diamond => DIAMOND_COLORS[diamond_look as usize % DIAMOND_COLORS.len()],
        ZoneKind::Checkpoint => CHECKPOINT_COLOR,
        ZoneKind::Door { .. } => DOOR_COLOR,
        ZoneKind::Hazard { .. } => HAZARD_COLOR,
    }
}

pub(crate) fn spawn_active_level(
    mut commands: Commands,
    active: Res<ActiveLevel>,
    registry: Res<LevelRegistry>,
    mut session: ResMut<LevelSession>,
    mut scheduler: ResMut<ActionScheduler>,
) {
    let fallback;
    let level: &LevelDef = match registry.get(active.index) {
        Some(level) => level,
        None => {
            warn!(
                "[LEVEL] no level at index {}, using built-in fallback",
                active.index
            );
            fallback = LevelDef::fallback();
            &fallback
        }
    };

    info!("[LEVEL] spawning '{}' ({})", level.name, level.id);

    for solid in &level.solids {
        let (layer, color) = match solid.kind {
            SolidKind::Ground => (GameLayer::Ground, GROUND_COLOR),
            SolidKind::Wall => (GameLayer::Wall, WALL_COLOR),
        };
        let size = solid.rect.size();
        commands.spawn((
            LevelEntity,
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(solid.rect.center().extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            CollisionLayers::new(layer, [GameLayer::Player]),
        ));
    }

    for zone in &level.zones {
        let look = if zone.kind == ZoneKind::Diamond {
            session.next_diamond_look()
        } else {
            0
        };
        let size = zone.rect.size();
        commands.spawn((
            LevelEntity,
            TriggerZone::from(&zone.kind),
            Sprite {
                color: zone_color(&zone.kind, look),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(zone.rect.center().extend(0.5)),
            Collider::rectangle(size.x, size.y),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player]),
        ));
    }

    let spawn_point = level.spawn_point();
    commands.spawn((
        LevelEntity,
        EntranceDoor,
        Sprite {
            color: DOOR_COLOR,
            custom_size: Some(Vec2::new(36.0, 56.0)),
            ..default()
        },
        Transform::from_translation(spawn_point.extend(-0.5)),
    ));

    session.begin_level(
        active.index,
        spawn_point,
        level.diamond_count(),
        &mut scheduler,
    );
}

/// Turn queued session scene requests into a level transition.
pub(crate) fn process_scene_requests(
    mut session: ResMut<LevelSession>,
    registry: Res<LevelRegistry>,
    mut active: ResMut<ActiveLevel>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(scene) = session.take_scene_requests().into_iter().next() else {
        return;
    };

    let index = resolve_destination(scene, registry.len());
    if index != scene {
        warn!(
            "[TRANSITION] scene {} does not exist, going to level {}",
            scene, index
        );
    }

    info!("[TRANSITION] leaving for level {}", index);
    active.index = index;
    next_state.set(GameState::Transition);
}

pub(crate) fn cleanup_level(
    mut commands: Commands,
    mut scheduler: ResMut<ActionScheduler>,
    mut next_state: ResMut<NextState<GameState>>,
    level_entities: Query<Entity, With<LevelEntity>>,
    players: Query<(Entity, &CharacterController), With<Player>>,
) {
    for (entity, controller) in &players {
        scheduler.cancel_owner(controller.owner());
        commands.entity(entity).despawn();
    }
    scheduler.cancel_owner(ActionOwner::Session);

    for entity in &level_entities {
        commands.entity(entity).despawn();
    }

    debug!("[TRANSITION] level cleared");
    next_state.set(GameState::Playing);
}

pub(crate) fn update_entrance_door(
    session: Res<LevelSession>,
    mut doors: Query<&mut Sprite, With<EntranceDoor>>,
) {
    if !session.is_changed() {
        return;
    }
    let color = if session.is_entrance_door_open() {
        DOOR_OPEN_COLOR
    } else {
        DOOR_COLOR
    };
    for mut sprite in &mut doors {
        sprite.color = color;
    }
}

pub(crate) fn camera_follow(
    time: Res<Time>,
    players: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Some(player) = players.iter().next() else {
        return;
    };
    let t = (CAMERA_FOLLOW_RATE * time.delta_secs()).min(1.0);
    for mut camera in &mut cameras {
        let target = player.translation.truncate();
        let current = camera.translation.truncate();
        let next = current.lerp(target, t);
        camera.translation.x = next.x;
        camera.translation.y = next.y;
    }
}

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveLevel>()
            .add_systems(OnEnter(GameState::Playing), spawn_active_level)
            .add_systems(OnEnter(GameState::Transition), cleanup_level)
            .add_systems(
                Update,
                (process_scene_requests, update_entrance_door, camera_follow)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
