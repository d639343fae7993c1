//! Debug domain: hotkeys, probe gizmos and the info overlay.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::core::{ActionScheduler, PresentationEvent, PresentationMessage};
use crate::debug::state::DebugState;
use crate::movement::{CharacterController, Player};
use crate::session::{LevelSession, SessionCoordinator};

/// Marker for debug info overlay
#[derive(Component, Debug)]
pub struct DebugInfoOverlay;

pub(crate) const KILL_KEY: KeyCode = KeyCode::KeyX;
pub(crate) const KNOCKBACK_KEY: KeyCode = KeyCode::KeyH;
pub(crate) const CHECKPOINT_KEY: KeyCode = KeyCode::KeyC;
pub(crate) const WARP_KEY: KeyCode = KeyCode::KeyN;

const RAY_HIT_COLOR: Color = Color::srgb(0.2, 1.0, 0.3);
const RAY_MISS_COLOR: Color = Color::srgb(1.0, 0.3, 0.2);

/// F1 toggles probe gizmos, F2 the info overlay
pub(crate) fn toggle_debug_overlays(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
) {
    if keyboard.just_pressed(KeyCode::F1) {
        debug_state.show_rays = !debug_state.show_rays;
    }
    if keyboard.just_pressed(KeyCode::F2) || keyboard.just_pressed(KeyCode::Backquote) {
        debug_state.show_info = !debug_state.show_info;
    }
}

/// Ctrl+X kill, Ctrl+H knock back, Ctrl+C checkpoint here, Ctrl+N next level
pub(crate) fn handle_debug_hotkeys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    mut scheduler: ResMut<ActionScheduler>,
    mut session: ResMut<LevelSession>,
    mut presentation: MessageWriter<PresentationMessage>,
    mut players: Query<(Entity, &mut CharacterController, &Transform), With<Player>>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }

    if keyboard.just_pressed(WARP_KEY) {
        let next = session.current_level().map_or(0, |level| level + 1);
        session.request_scene_transition(next);
        debug_state.set_message(format!("Warp to level {}", next), 2.0);
        info!("[DEBUG] warp to level {}", next);
    }

    let Some((entity, mut controller, transform)) = players.iter_mut().next() else {
        return;
    };
    let position = transform.translation.truncate();
    controller.sync_position(position);
    let mut events: Vec<PresentationEvent> = Vec::new();

    if keyboard.just_pressed(KILL_KEY) {
        controller.die(&mut scheduler, &mut events, &mut *session);
        commands.entity(entity).despawn();
        debug_state.set_message("Player killed", 2.0);
        info!("[DEBUG] player killed");
    } else if keyboard.just_pressed(KNOCKBACK_KEY) {
        let knocked = controller.knockback(position.x - 1.0, &mut scheduler, &mut events);
        debug_state.set_message(
            if knocked { "Knockback" } else { "Knockback ignored" },
            2.0,
        );
    } else if keyboard.just_pressed(CHECKPOINT_KEY) {
        session.activate_checkpoint(position);
        debug_state.set_message("Checkpoint set", 2.0);
    }

    for event in events {
        presentation.write(PresentationMessage {
            body: entity,
            event,
        });
    }
}

pub(crate) fn update_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    if let Some((_, ref mut duration)) = debug_state.status_message {
        *duration -= time.delta_secs();
        if *duration <= 0.0 {
            debug_state.status_message = None;
        }
    }
}

/// Draw each foot ray and the wall ray, green when it is reporting contact.
pub(crate) fn draw_contact_rays(mut gizmos: Gizmos, players: Query<&CharacterController>) {
    for controller in &players {
        let classifier = controller.classifier();
        let body = controller.body();
        let contact = controller.contact();

        let foot_color = if contact.grounded {
            RAY_HIT_COLOR
        } else {
            RAY_MISS_COLOR
        };
        for foot in classifier.foot_anchors(body) {
            gizmos.line_2d(foot, foot - Vec2::new(0.0, classifier.ray_length), foot_color);
        }

        let wall_color = if contact.wall_detected {
            RAY_HIT_COLOR
        } else {
            RAY_MISS_COLOR
        };
        gizmos.line_2d(body.position, classifier.wall_probe_end(body), wall_color);
    }
}

pub(crate) fn update_debug_info_overlay(
    mut commands: Commands,
    debug_state: Res<DebugState>,
    session: Res<LevelSession>,
    players: Query<&CharacterController, With<Player>>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    if !debug_state.show_info {
        // Cleanup overlay if it exists
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
        return;
    }

    if existing_overlay.is_empty() {
        spawn_debug_info_overlay(&mut commands);
        return;
    }

    let Ok(mut text) = overlay_query.single_mut() else {
        return;
    };

    let player_line = match players.iter().next() {
        Some(controller) => {
            let body = controller.body();
            let contact = controller.contact();
            format!(
                "Pos: ({:.0}, {:.0})  Vel: ({:.0}, {:.0})  Facing: {:?}\n\
                 Grounded: {}  Wall: {}  Extra jumps: {}  Armed: {}\n\
                 Locked: {}  Knocked: {}  Wall jump: {}",
                body.position.x,
                body.position.y,
                body.velocity.x,
                body.velocity.y,
                body.facing,
                contact.grounded,
                contact.wall_detected,
                controller.jumps().extra_jumps_remaining,
                controller.jumps().double_jump_armed,
                controller.is_movement_locked(),
                controller.is_knocked_back(),
                controller.is_wall_jumping(),
            )
        }
        None => "No player".to_string(),
    };

    let status = debug_state
        .status_message
        .as_ref()
        .map(|(message, _)| message.as_str())
        .unwrap_or("");

    **text = format!(
        "{}\nDiamonds: {}/{}  Checkpoint: {}  Respawn pending: {}\n{}",
        player_line,
        session.diamonds_collected(),
        session.total_diamonds(),
        session.has_active_checkpoint(),
        session.is_respawn_pending(),
        status,
    );
}

fn spawn_debug_info_overlay(commands: &mut Commands) {
    commands.spawn((
        DebugInfoOverlay,
        Text::new("Loading..."),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.9, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            bottom: Val::Px(20.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ZIndex(500),
    ));
}
