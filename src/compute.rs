/// Per-frame game logic.
///
/// A frame is `update_input` (held keys, firing) followed by `tick` (the
/// world step and camera). Side effects are limited to the injected sinks:
/// nothing here touches the terminal, the clock or a sound device.

use crate::audio::SoundSink;
use crate::combat;
use crate::effects::EffectSink;
use crate::entities::{GameMode, MissionStage};
use crate::physics::{resolve_key_vs_map, resolve_player_vs_map};
use crate::player::ControlInput;
use crate::state::GameState;

/// Output ports handed to every frame.
pub struct Sinks<'a> {
    pub sound: &'a mut dyn SoundSink,
    pub effects: &'a mut dyn EffectSink,
}

impl<'a> Sinks<'a> {
    pub fn new(sound: &'a mut dyn SoundSink, effects: &'a mut dyn EffectSink) -> Self {
        Self { sound, effects }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Apply held keys and fire delays. Only does anything while the player
/// has control.
pub fn update_input(state: &mut GameState, input: &ControlInput, dt: f32, sinks: &mut Sinks) {
    if !state.mode.accepts_control() {
        return;
    }
    let now = state.clock;

    state.player.handle_move(input, dt);

    if input.fire && state.player.can_fire(now) {
        let bullet = state.player.fire(now, &state.config.bullet, sinks.effects, sinks.sound);
        state.bullets.push(bullet);
    }

    let (speed, size) = (state.config.bullet.speed, state.config.bullet.size);
    for enemy in &mut state.enemies {
        if enemy.ready_to_fire(now) {
            if let Some(bullet) = enemy.shoot(speed, size) {
                state.bullets.push(bullet);
            }
            enemy.pawn.shot_timer.restart(now);
        }
    }
}

// ── World step ────────────────────────────────────────────────────────────────

/// Advance the simulation clock by `dt` and run whatever the current mode
/// simulates, then move the camera. The pause and options screens stop the
/// clock, so every timer freezes with them.
pub fn tick(state: &mut GameState, dt: f32, sinks: &mut Sinks) {
    if matches!(state.mode, GameMode::Pause | GameMode::Options) {
        return;
    }
    state.clock += f64::from(dt);

    match state.mode {
        GameMode::Playing | GameMode::GameOver | GameMode::EscapeRoute => step_world(state, dt, sinks),
        GameMode::IntroDialogue => {
            state.dialogue.update(dt);
            if state.dialogue.is_finished() {
                state.set_mode(GameMode::Playing, sinks.sound);
            }
        }
        _ => {}
    }

    state.update_camera();
}

fn step_world(state: &mut GameState, dt: f32, sinks: &mut Sinks) {
    let now = state.clock;
    let gravity = state.config.gravity;

    if !state.player.is_alive() && state.mode != GameMode::GameOver {
        state.set_mode(GameMode::GameOver, sinks.sound);
    }

    if state.mode == GameMode::EscapeRoute {
        state.escape_fade.update(now, &state.config.timing, sinks.sound);
    }

    state.player.update_move(dt, gravity, now, sinks.sound);

    if state.player.is_alive() {
        let door_unlocked = state.door_unlocked();
        let contact = resolve_player_vs_map(&mut state.player, &mut state.map, door_unlocked, sinks.sound);
        match contact.trigger {
            Some(GameMode::EscapeRoute) if state.mode == GameMode::Playing => {
                state.set_mode(GameMode::EscapeRoute, sinks.sound);
            }
            Some(GameMode::MissionCompleted)
                if matches!(state.mode, GameMode::Playing | GameMode::EscapeRoute) =>
            {
                state.set_mode(GameMode::MissionCompleted, sinks.sound);
            }
            _ => {}
        }
    }

    for enemy in &mut state.enemies {
        enemy.update_move(dt, gravity, &state.player, &state.map);
    }

    for bullet in &mut state.bullets {
        bullet.advance(dt);
    }

    combat::resolve_bullets(state, sinks);
    combat::collect_keys(state, sinks);

    for key in &mut state.keys {
        key.update_move(dt, &state.config.key);
        resolve_key_vs_map(key, &state.map);
    }

    combat::unlock_chests(state, dt, sinks);
    combat::apply_healing(state, sinks);
    combat::check_gate(state, sinks);

    sinks.effects.advance(dt);
    state.mission_stage = MissionStage::from_chests_opened(state.progress.chests_opened);
}
