/// Player controller: held-key movement, gravity, rocket knock-back,
/// death bookkeeping and firing.

use glam::Vec2;

use crate::audio::{Cue, SoundSink};
use crate::config::BulletTuning;
use crate::effects::{Effect, EffectSink};
use crate::entities::{Affinity, Bullet, DestroyEffect, Facing, Player, PlayerPose};

/// Keys held during this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub left: bool,
    pub right: bool,
    pub climb: bool,
    pub jump: bool,
    pub fire: bool,
}

const MUZZLE_OFFSET_Y: f32 = 8.0;
const MUZZLE_SCALE: f32 = 0.7;

impl Player {
    /// Translate held keys into this tick's velocity.
    pub fn handle_move(&mut self, input: &ControlInput, dt: f32) {
        let actor = &mut self.pawn.actor;
        actor.velocity.x = 0.0;

        if self.dead || !self.controller_enabled {
            return;
        }

        let speed = self.pawn.speed;
        if input.left {
            actor.facing = Facing::Left;
            actor.velocity.x = -speed * dt;
        } else if input.right {
            actor.facing = Facing::Right;
            actor.velocity.x = speed * dt;
        } else if input.climb && self.can_climb {
            actor.velocity.y = speed * dt;
        }

        if input.jump && self.pawn.can_jump {
            self.pawn.can_jump = false;
            actor.velocity.y = self.tuning.jump_speed * dt;
        }
    }

    fn apply_push_back(&mut self, from_right: bool, dt: f32) {
        let force = self.tuning.push_back_force * dt;
        let velocity = &mut self.pawn.actor.velocity;
        if from_right {
            velocity.x -= force;
        } else {
            velocity.x += force;
        }
        velocity.y += self.tuning.push_back_lift * dt;
        self.pawn.can_jump = false;
        self.controller_enabled = false;
    }

    /// Gravity, knock-back and integration, then pose and death bookkeeping.
    pub fn update_move(&mut self, dt: f32, gravity: f32, now: f64, sound: &mut dyn SoundSink) {
        self.pawn.actor.velocity.y += gravity * dt;

        if let Some(push) = self.push_back {
            if push.timer.elapsed(now) <= self.tuning.push_back_duration {
                self.apply_push_back(push.from_right, dt);
            } else {
                self.push_back = None;
                self.controller_enabled = true;
            }
        }

        self.pawn.actor.integrate();
        self.pawn.actor.sync_position();

        let velocity = self.pawn.actor.velocity;
        self.pose = if self.pawn.can_jump {
            if velocity.x.abs() > 0.0001 {
                PlayerPose::Walk
            } else {
                PlayerPose::Idle
            }
        } else if velocity.y < 0.0 {
            PlayerPose::JumpDown
        } else {
            PlayerPose::JumpUp
        };

        if self.dead || self.pawn.health.is_depleted() {
            self.dead = true;
            self.controller_enabled = false;
            self.pose = PlayerPose::Dead;
            self.pawn.health.current = 0.0;
            if !self.death_cue_played {
                log::info!("player died at ({:.1}, {:.1})", self.position().x, self.position().y);
                sound.play(Cue::PlayerDeath);
                self.death_cue_played = true;
            }
        }
    }

    /// Whether the fire delay has passed since the last shot.
    pub fn can_fire(&self, now: f64) -> bool {
        self.is_alive() && self.pawn.shot_timer.elapsed(now) > self.tuning.fire_delay
    }

    /// Spawn a player bullet with its muzzle flash and restart the fire delay.
    pub fn fire(
        &mut self,
        now: f64,
        tuning: &BulletTuning,
        effects: &mut dyn EffectSink,
        sound: &mut dyn SoundSink,
    ) -> Bullet {
        let rect = self.rect();
        let facing = self.pawn.actor.facing;
        let offset_x = if facing.is_right() { tuning.player_offset.x } else { 0.0 };

        let bullet = Bullet::new(
            facing,
            tuning.speed + tuning.player_speed_bonus,
            tuning.damage,
            Affinity::AtEnemy,
            DestroyEffect::Default,
            Vec2::new(rect.left + offset_x, rect.top + tuning.player_offset.y),
            tuning.size,
        );

        let flash_x = if facing.is_right() { tuning.player_offset.x - 1.0 } else { 1.0 };
        effects.play_effect_at(
            Effect::MuzzleFlash,
            Vec2::new(rect.left + flash_x, rect.top + MUZZLE_OFFSET_Y),
            Vec2::ZERO,
            MUZZLE_SCALE,
            facing,
        );
        sound.play(Cue::PlayerShot);
        self.pawn.shot_timer.restart(now);
        bullet
    }
}
