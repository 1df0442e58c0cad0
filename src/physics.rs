/// Collision resolution against the static map.
///
/// Overlaps are resolved one obstacle at a time, in list order, along the
/// axis of least penetration (minimum translation vector). Resolving
/// against one obstacle can change the overlap with the next; there is no
/// global minimum.

use glam::Vec2;

use crate::audio::{Cue, SoundSink};
use crate::entities::{Bullet, Enemy, GameMode, Key, Player};
use crate::geometry::Rect;
use crate::level::MapGeometry;

// ── MTV ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Push {
    Horizontal,
    /// `from_top` is true when the mover landed on the obstacle.
    Vertical { from_top: bool },
}

/// Push `rect` out of `obstacle` along the shorter axis and zero the
/// matching velocity component. Returns `None` if they do not overlap.
pub fn resolve_overlap(rect: &mut Rect, velocity: &mut Vec2, obstacle: &Rect) -> Option<Push> {
    if !rect.intersects(obstacle) {
        return None;
    }

    let overlap_left = rect.right() - obstacle.left;
    let overlap_right = obstacle.right() - rect.left;
    let overlap_top = rect.bottom() - obstacle.top;
    let overlap_bottom = obstacle.bottom() - rect.top;

    let from_left = overlap_left.abs() < overlap_right.abs();
    let from_top = overlap_top.abs() < overlap_bottom.abs();

    let min_x = if from_left { overlap_left } else { overlap_right };
    let min_y = if from_top { overlap_top } else { overlap_bottom };

    if min_x.abs() < min_y.abs() {
        rect.left += if from_left { -overlap_left } else { overlap_right };
        velocity.x = 0.0;
        Some(Push::Horizontal)
    } else {
        rect.top += if from_top { -overlap_top } else { overlap_bottom };
        velocity.y = 0.0;
        Some(Push::Vertical { from_top })
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// What the player's map pass asks of the state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerContact {
    pub landed: bool,
    pub trigger: Option<GameMode>,
}

/// Resolve the player against obstacles, then sample ladders, damage zones
/// and trigger zones. When `door_unlocked`, door obstacles are removed
/// after this call's resolution.
pub fn resolve_player_vs_map(
    player: &mut Player,
    map: &mut MapGeometry,
    door_unlocked: bool,
    sound: &mut dyn SoundSink,
) -> PlayerContact {
    let mut contact = PlayerContact::default();
    player.can_climb = false;

    let actor = &mut player.pawn.actor;
    for obstacle in &map.obstacles {
        if let Some(Push::Vertical { from_top: true }) =
            resolve_overlap(&mut actor.rect, &mut actor.velocity, obstacle)
        {
            player.pawn.can_jump = true;
            contact.landed = true;
        }
    }

    if door_unlocked {
        map.remove_door();
    }

    let rect = player.pawn.actor.rect;

    if rect.intersects(&map.mission_zone) {
        contact.trigger = Some(GameMode::MissionCompleted);
    } else if rect.intersects(&map.escape_zone) {
        contact.trigger = Some(GameMode::EscapeRoute);
    }

    // Hazards only fire their cue on the frame that kills.
    if player.is_alive() {
        if map.lava.iter().any(|z| z.intersects(&rect)) {
            log::info!("player fell into lava");
            sound.play(Cue::Lava);
            player.kill();
        } else if map.spikes.iter().any(|z| z.intersects(&rect)) {
            log::info!("player landed on spikes");
            sound.play(Cue::Peaks);
            player.kill();
        }
    }

    player.can_climb = map.ladders.iter().any(|l| l.intersects(&rect));
    player.pawn.actor.sync_position();
    contact
}

// ── Other movers ──────────────────────────────────────────────────────────────

/// Enemies turn around whenever they are pushed sideways.
pub fn resolve_enemy_vs_map(enemy: &mut Enemy, map: &MapGeometry) {
    for obstacle in &map.obstacles {
        let actor = &mut enemy.pawn.actor;
        if let Some(Push::Horizontal) = resolve_overlap(&mut actor.rect, &mut actor.velocity, obstacle) {
            enemy.change_direction();
        }
    }
}

pub fn resolve_key_vs_map(key: &mut Key, map: &MapGeometry) {
    let actor = &mut key.actor;
    for obstacle in &map.obstacles {
        resolve_overlap(&mut actor.rect, &mut actor.velocity, obstacle);
    }
    if !key.found {
        actor.sync_position();
    }
}

/// A bullet dies when it leaves the camera or touches an obstacle.
pub fn bullet_hits_world(bullet: &Bullet, camera: &Rect, map: &MapGeometry) -> bool {
    let rect = bullet.rect();
    !camera.intersects(&rect) || map.hits_obstacle(&rect)
}
