/// Bullet hits, pickups and the chest/gate progression.
///
/// Every pass walks its collection once and defers removal to the end, so
/// nothing is erased while it is being iterated.

use glam::Vec2;

use crate::audio::Cue;
use crate::compute::Sinks;
use crate::effects::Effect;
use crate::entities::{Affinity, DestroyEffect, Facing};
use crate::physics::bullet_hits_world;
use crate::state::GameState;

const BULLET_PUFF_OFFSET: Vec2 = Vec2::new(-4.0, -4.0);
const ROCKET_BLAST_OFFSET: Vec2 = Vec2::new(-6.0, -7.0);
const ROCKET_BLAST_SCALE: f32 = 0.8;

/// Drop `indices` from `items`. Indices may repeat and come in any order.
pub fn remove_indices<T>(items: &mut Vec<T>, indices: &mut Vec<usize>) {
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    for &i in indices.iter() {
        if i < items.len() {
            items.swap_remove(i);
        }
    }
}

/// One pass over every bullet: world first, then the player, then enemies.
///
/// The first thing a bullet touches consumes it. Enemies brought to zero
/// health are queued and only removed (running their death behaviour)
/// after the whole pass.
pub fn resolve_bullets(state: &mut GameState, sinks: &mut Sinks) {
    let mut spent = Vec::new();
    let mut killed: Vec<usize> = Vec::new();
    let camera = state.camera;
    let now = state.clock;

    for (i, bullet) in state.bullets.iter().enumerate() {
        let at = bullet.actor.position;
        let rect = bullet.rect();

        if bullet_hits_world(bullet, &camera, &state.map) {
            sinks.effects.play_effect_at(Effect::BulletDestroy, at, BULLET_PUFF_OFFSET, 1.0, Facing::Right);
            spent.push(i);
            continue;
        }

        match bullet.affinity {
            Affinity::AtPlayer => {
                let player = &mut state.player;
                if !rect.intersects(&player.rect()) {
                    continue;
                }

                match bullet.effect {
                    DestroyEffect::Rocket => {
                        player.on_rocket_hit(at.x > player.position().x, now);
                        sinks.sound.play(Cue::RocketExplosion);
                        sinks.effects.play_effect_at(
                            Effect::RocketDestroy,
                            at,
                            ROCKET_BLAST_OFFSET,
                            ROCKET_BLAST_SCALE,
                            Facing::Right,
                        );
                    }
                    DestroyEffect::Default => {
                        sinks.effects.play_effect_at(Effect::BulletDestroy, at, BULLET_PUFF_OFFSET, 1.0, Facing::Right);
                    }
                }

                player.pawn.health.take_damage(bullet.damage);
                if !player.pawn.health.is_depleted() {
                    sinks.sound.play(Cue::PlayerDamage);
                }
                spent.push(i);
            }
            Affinity::AtEnemy => {
                let Some(target) = state.enemies.iter().position(|e| rect.intersects(&e.rect())) else {
                    continue;
                };

                sinks.effects.play_effect_at(Effect::BulletDestroy, at, BULLET_PUFF_OFFSET, 1.0, Facing::Right);
                sinks.sound.play(Cue::BulletHit);
                spent.push(i);

                let enemy = &mut state.enemies[target];
                enemy.pawn.health.take_damage(bullet.damage);
                if enemy.pawn.health.is_depleted() && !killed.contains(&target) {
                    killed.push(target);
                }
            }
        }
    }

    remove_indices(&mut state.bullets, &mut spent);

    for &i in &killed {
        let enemy = &state.enemies[i];
        log::info!("{:?} killed at ({:.1}, {:.1})", enemy.kind, enemy.position().x, enemy.position().y);
        enemy.kind.on_death(enemy.position(), &mut state.progress, &mut state.keys, &state.config.key);
        sinks.sound.play(Cue::EnemyDeath);
    }
    remove_indices(&mut state.enemies, &mut killed);
}

/// Move keys the player touches into the found list, one cue per key.
pub fn collect_keys(state: &mut GameState, sinks: &mut Sinks) {
    let player_rect = state.player.rect();
    let mut i = 0;
    while i < state.keys.len() {
        if state.keys[i].rect().intersects(&player_rect) {
            let mut key = state.keys.remove(i);
            key.found = true;
            log::info!("picked up {:?} key", key.color);
            sinks.sound.play(Cue::KeyFound);
            state.found_keys.push(key);
        } else {
            i += 1;
        }
    }
}

/// Open any touched chest with the first found key of its colour.
pub fn unlock_chests(state: &mut GameState, dt: f32, sinks: &mut Sinks) {
    let player_rect = state.player.rect();
    for chest in &mut state.chests {
        if !chest.opened && chest.rect.intersects(&player_rect) {
            if let Some(k) = state.found_keys.iter().position(|key| key.color == chest.color) {
                state.found_keys.remove(k);
                chest.opened = true;
                state.progress.chests_opened += 1;
                log::info!("opened {:?} chest ({} open)", chest.color, state.progress.chests_opened);
                sinks.sound.play(Cue::OpenChest);
            }
        }
        chest.update_animation(dt);
    }
}

/// Eat touched healing items for a full heal. Each item works once.
pub fn apply_healing(state: &mut GameState, sinks: &mut Sinks) {
    if !state.player.is_alive() {
        return;
    }
    let player_rect = state.player.rect();
    for item in &mut state.healing {
        if !item.consumed && item.rect.intersects(&player_rect) {
            item.consumed = true;
            let max = state.player.pawn.health.max;
            state.player.pawn.health.heal(max);
            sinks.sound.play(Cue::EatenHeal);
        }
    }
}

/// Open the final gate the first time enough chests are open.
pub fn check_gate(state: &mut GameState, sinks: &mut Sinks) {
    if state.door_unlocked() && state.gate.open() {
        log::info!("final gate opened");
        sinks.sound.play(Cue::OpenGate);
    }
}
