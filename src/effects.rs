/// Short-lived visual effects (bullet puffs, rocket blasts, muzzle flash).
///
/// The simulation only calls `EffectSink::play_effect_at`; what happens next
/// is up to the sink. `ParticleSystem` is the real one: it keeps one
/// animation per spawned effect and drops it once it reaches its last frame.

use glam::Vec2;

use crate::animation::AnimationClock;
use crate::entities::Facing;
use crate::error::{GameError, Result};
use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    BulletDestroy,
    RocketDestroy,
    MuzzleFlash,
}

impl Effect {
    pub const ALL: [Effect; 3] = [Effect::BulletDestroy, Effect::RocketDestroy, Effect::MuzzleFlash];

    pub fn name(self) -> &'static str {
        match self {
            Effect::BulletDestroy => "BulletDestroy",
            Effect::RocketDestroy => "RocketDestroy",
            Effect::MuzzleFlash => "MuzzleFlash",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Effect::ALL
            .iter()
            .copied()
            .find(|e| e.name() == name)
            .ok_or_else(|| GameError::UnknownEffect(name.to_string()))
    }

    /// Frame rate and sub-images. The trailing empty frame hides the
    /// effect once it is done instead of freezing on its last image.
    fn template(self) -> AnimationClock {
        let empty = Rect::default();
        match self {
            Effect::BulletDestroy => AnimationClock::once(
                vec![
                    Rect::new(21.0, 54.0, 7.0, 7.0),
                    Rect::new(37.0, 54.0, 7.0, 7.0),
                    Rect::new(53.0, 54.0, 7.0, 7.0),
                    Rect::new(68.0, 54.0, 7.0, 7.0),
                    empty,
                ],
                10.0,
            ),
            Effect::RocketDestroy => AnimationClock::once(
                vec![
                    Rect::new(53.0, 6.0, 7.0, 7.0),
                    Rect::new(67.0, 4.0, 10.0, 10.0),
                    Rect::new(81.0, 3.0, 14.0, 14.0),
                    Rect::new(96.0, 3.0, 15.0, 14.0),
                    Rect::new(114.0, 3.0, 11.0, 13.0),
                    empty,
                ],
                20.0,
            ),
            Effect::MuzzleFlash => AnimationClock::once(vec![Rect::new(51.0, 70.0, 4.0, 8.0), empty], 30.0),
        }
    }
}

pub trait EffectSink {
    fn play_effect_at(&mut self, effect: Effect, position: Vec2, offset: Vec2, scale: f32, facing: Facing);

    /// Advance running effects by `dt` seconds.
    fn advance(&mut self, _dt: f32) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoEffects;

impl EffectSink for NoEffects {
    fn play_effect_at(&mut self, _: Effect, _: Vec2, _: Vec2, _: f32, _: Facing) {}
}

/// What a sink was asked to show, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectRequest {
    pub effect: Effect,
    pub position: Vec2,
    pub offset: Vec2,
    pub scale: f32,
    pub facing: Facing,
}

#[derive(Clone, Debug, Default)]
pub struct RecordingEffects {
    pub requests: Vec<EffectRequest>,
}

impl RecordingEffects {
    pub fn count(&self, effect: Effect) -> usize {
        self.requests.iter().filter(|r| r.effect == effect).count()
    }
}

impl EffectSink for RecordingEffects {
    fn play_effect_at(&mut self, effect: Effect, position: Vec2, offset: Vec2, scale: f32, facing: Facing) {
        self.requests.push(EffectRequest { effect, position, offset, scale, facing });
    }
}

// ── Particle system ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub effect: Effect,
    pub position: Vec2,
    /// Horizontal component is negative when mirrored.
    pub scale: Vec2,
    pub animation: AnimationClock,
}

#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn spawn(&mut self, effect: Effect, position: Vec2, offset: Vec2, scale: f32, facing: Facing) {
        self.particles.push(Particle {
            effect,
            position: position + offset,
            scale: Vec2::new(scale * facing.sign(), scale),
            animation: effect.template(),
        });
    }

    /// Spawn by template name, as level scripts and tools refer to effects.
    pub fn spawn_named(&mut self, name: &str, position: Vec2, offset: Vec2, scale: f32, facing: Facing) -> Result<()> {
        let effect = Effect::from_name(name)?;
        self.spawn(effect, position, offset, scale, facing);
        Ok(())
    }

    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.animation.advance(dt);
        }
        self.particles.retain(|p| !p.animation.is_finished());
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl EffectSink for ParticleSystem {
    fn play_effect_at(&mut self, effect: Effect, position: Vec2, offset: Vec2, scale: f32, facing: Facing) {
        self.spawn(effect, position, offset, scale, facing);
    }

    fn advance(&mut self, dt: f32) {
        self.update(dt);
    }
}
