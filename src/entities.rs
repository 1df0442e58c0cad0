/// Game entity types: mostly data, with the small state changes each
/// entity owns (damage, healing, integration, reset).
///
/// Everything here is owned by a collection inside `GameState`; removing an
/// entity from its collection is what destroys it.

use glam::Vec2;
use rand::Rng;

use crate::animation::AnimationClock;
use crate::config::{EnemyTuning, KeyTuning, PlayerTuning};
use crate::geometry::Rect;
use crate::timer::Timer;

// ── Modes ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    Menu,
    IntroDialogue,
    Playing,
    GameOver,
    EscapeRoute,
    MissionCompleted,
    Pause,
    Options,
    Exit,
}

impl GameMode {
    /// Modes in which the world simulation runs.
    pub fn simulates_world(self) -> bool {
        matches!(self, GameMode::Playing | GameMode::GameOver | GameMode::EscapeRoute)
    }

    /// Modes in which player input drives the pawns.
    pub fn accepts_control(self) -> bool {
        matches!(self, GameMode::Playing | GameMode::EscapeRoute)
    }
}

/// Objective line shown to the player, derived from opened chests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionStage {
    FindFirstKey,
    FindSecondKey,
    FindThirdKey,
    ReachTheGate,
}

impl MissionStage {
    pub fn from_chests_opened(opened: u32) -> Self {
        match opened {
            0 => MissionStage::FindFirstKey,
            1 => MissionStage::FindSecondKey,
            2 => MissionStage::FindThirdKey,
            _ => MissionStage::ReachTheGate,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            MissionStage::FindFirstKey => "Find the keys and open the chests (0/3)",
            MissionStage::FindSecondKey => "One chest open. Keep searching (1/3)",
            MissionStage::FindThirdKey => "Two chests open. One to go (2/3)",
            MissionStage::ReachTheGate => "The gate is open. Get to the helicopter!",
        }
    }
}

// ── Actor / Pawn ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    pub fn is_right(self) -> bool {
        self == Facing::Right
    }
}

/// Anything that moves: a collision rectangle, a velocity and a draw anchor.
///
/// `velocity` holds per-tick displacement (already scaled by `dt` by whoever
/// writes it), positive `y` pointing up.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub rect: Rect,
    /// Draw anchor, the centre of the collision rectangle.
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    /// Sprite scale; does not affect collision.
    pub draw_scale: f32,
}

impl Actor {
    pub fn new(spawn: Vec2, size: Vec2, facing: Facing) -> Self {
        let rect = Rect::new(spawn.x, spawn.y, size.x, size.y);
        Self { rect, position: rect.center(), velocity: Vec2::ZERO, facing, draw_scale: 1.0 }
    }

    /// Move the rectangle by the current velocity (`y` inverted).
    pub fn integrate(&mut self) {
        self.rect.left += self.velocity.x;
        self.rect.top -= self.velocity.y;
    }

    pub fn sync_position(&mut self) {
        self.position = self.rect.center();
    }
}

/// Current / max hit points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Unclamped: a lethal hit may leave `current` below zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount;
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pawn {
    pub actor: Actor,
    pub health: Health,
    pub speed: f32,
    pub can_jump: bool,
    pub shot_timer: Timer,
}

impl Pawn {
    pub fn new(actor: Actor, max_health: f32, speed: f32) -> Self {
        Self { actor, health: Health::full(max_health), speed, can_jump: false, shot_timer: Timer::default() }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerPose {
    Idle,
    Walk,
    JumpUp,
    JumpDown,
    Dead,
}

/// Knock-back applied after a rocket hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PushBack {
    pub from_right: bool,
    pub timer: Timer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pawn: Pawn,
    pub can_climb: bool,
    pub controller_enabled: bool,
    pub dead: bool,
    pub death_cue_played: bool,
    pub push_back: Option<PushBack>,
    pub pose: PlayerPose,
    pub tuning: PlayerTuning,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        let actor = Actor::new(tuning.spawn, tuning.size, Facing::Right);
        let mut pawn = Pawn::new(actor, tuning.max_health, tuning.speed);
        pawn.can_jump = true;
        Self {
            pawn,
            can_climb: false,
            controller_enabled: true,
            dead: false,
            death_cue_played: false,
            push_back: None,
            pose: PlayerPose::Idle,
            tuning: tuning.clone(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.pawn.actor.rect
    }

    pub fn position(&self) -> Vec2 {
        self.pawn.actor.position
    }

    /// False from the moment health runs out, before `update_move` has
    /// turned that into the `dead` flag.
    pub fn is_alive(&self) -> bool {
        !self.dead && !self.pawn.health.is_depleted()
    }

    /// Flag the player as dead. Repeated calls are harmless.
    pub fn kill(&mut self) {
        self.dead = true;
    }

    pub fn on_rocket_hit(&mut self, from_right: bool, now: f64) {
        self.push_back = Some(PushBack { from_right, timer: Timer::started(now) });
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Which side a bullet can hurt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affinity {
    AtPlayer,
    AtEnemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestroyEffect {
    Default,
    Rocket,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub actor: Actor,
    /// Horizontal speed per second, signed by the shooter's facing.
    pub speed: f32,
    pub damage: f32,
    /// Sprite sub-image; the collision rectangle is independent of it.
    pub sprite: Rect,
    pub affinity: Affinity,
    pub effect: DestroyEffect,
}

pub const BULLET_SPRITE: Rect = Rect::new(7.0, 72.0, 3.0, 3.0);
pub const ROCKET_SPRITE: Rect = Rect::new(3.0, 7.0, 11.0, 5.0);

impl Bullet {
    pub fn new(
        facing: Facing,
        speed: f32,
        damage: f32,
        affinity: Affinity,
        effect: DestroyEffect,
        spawn: Vec2,
        size: Vec2,
    ) -> Self {
        let sprite = match effect {
            DestroyEffect::Default => BULLET_SPRITE,
            DestroyEffect::Rocket => ROCKET_SPRITE,
        };
        Self {
            actor: Actor::new(spawn, size, facing),
            speed: speed * facing.sign(),
            damage,
            sprite,
            affinity,
            effect,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.actor.rect.left += self.speed * dt;
        self.actor.rect.top -= self.actor.velocity.y * dt;
        self.actor.sync_position();
    }

    pub fn rect(&self) -> Rect {
        self.actor.rect
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Cosmetic palette of a regular enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GruntVariant {
    Green,
    Red,
    Blue,
}

impl GruntVariant {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => GruntVariant::Green,
            1 => GruntVariant::Red,
            _ => GruntVariant::Blue,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Grunt(GruntVariant),
    Boss,
}

impl EnemyKind {
    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }

    pub fn destroy_effect(self) -> DestroyEffect {
        match self {
            EnemyKind::Grunt(_) => DestroyEffect::Default,
            EnemyKind::Boss => DestroyEffect::Rocket,
        }
    }

    /// Death behaviour. A boss leaves a key behind at `position`.
    pub fn on_death(
        self,
        position: Vec2,
        progress: &mut LevelProgress,
        keys: &mut Vec<Key>,
        tuning: &KeyTuning,
    ) {
        if let EnemyKind::Boss = self {
            let key = Key::spawn(position, progress, tuning);
            log::info!("boss dropped a {:?} key at ({:.1}, {:.1})", key.color, position.x, position.y);
            progress.key_sources_found += 1;
            keys.push(key);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pawn: Pawn,
    pub kind: EnemyKind,
    pub spawn: Vec2,
    pub patrol_min: f32,
    pub patrol_max: f32,
    pub detected: bool,
    /// Seconds since the player was last seen, while still chasing.
    pub lost_sight: f32,
    pub probe: Rect,
    pub walk: AnimationClock,
    pub tuning: EnemyTuning,
}

impl Enemy {
    pub fn new(kind: EnemyKind, spawn: Vec2, tuning: &EnemyTuning) -> Self {
        let mut actor = Actor::new(spawn, tuning.size, Facing::Right);
        actor.draw_scale = tuning.draw_scale;
        actor.sync_position();
        let half_patrol = tuning.patrol_distance / 2.0;
        let walk_row = if kind.is_boss() { 33.0 } else { 1.0 };
        let mut enemy = Self {
            pawn: Pawn::new(actor, tuning.max_health, tuning.speed),
            kind,
            spawn,
            patrol_min: half_patrol,
            patrol_max: half_patrol,
            detected: false,
            lost_sight: 0.0,
            probe: Rect::default(),
            walk: AnimationClock::looping(AnimationClock::strip((32.0, walk_row), (10.0, 15.0), 2), 5.0),
            tuning: tuning.clone(),
        };
        enemy.update_probe_position();
        enemy
    }

    pub fn rect(&self) -> Rect {
        self.pawn.actor.rect
    }

    pub fn position(&self) -> Vec2 {
        self.pawn.actor.position
    }

    pub fn facing(&self) -> Facing {
        self.pawn.actor.facing
    }

    /// Turn around and start walking the other way at patrol speed.
    pub fn change_direction(&mut self) {
        let actor = &mut self.pawn.actor;
        actor.facing = actor.facing.flipped();
        actor.velocity.x = self.pawn.speed * actor.facing.sign();
    }

    /// Bullet aimed along the current facing, only while the player is
    /// detected. The fire delay is checked by the caller.
    pub fn shoot(&self, bullet_speed: f32, bullet_size: Vec2) -> Option<Bullet> {
        if !self.detected {
            return None;
        }
        let rect = self.rect();
        let facing = self.facing();
        let x = rect.left + if facing.is_right() { rect.width } else { 0.0 };
        Some(Bullet::new(
            facing,
            bullet_speed,
            self.tuning.bullet_damage,
            Affinity::AtPlayer,
            self.kind.destroy_effect(),
            Vec2::new(x, rect.top + self.tuning.bullet_offset_y),
            bullet_size,
        ))
    }
}

// ── Collectibles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyColor {
    Red,
    Green,
    Yellow,
    Undetermined,
}

impl KeyColor {
    /// Colour for the `index`-th spawned key or chest (1-based).
    pub fn from_spawn_index(index: u32) -> Self {
        match index {
            1 => KeyColor::Red,
            2 => KeyColor::Green,
            3 => KeyColor::Yellow,
            _ => KeyColor::Undetermined,
        }
    }
}

/// Counters that used to be process-wide: spawn order decides colours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelProgress {
    pub keys_spawned: u32,
    pub key_sources_found: u32,
    pub chests_spawned: u32,
    pub chests_opened: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    pub actor: Actor,
    pub color: KeyColor,
    pub gravity: bool,
    pub jump_pending: bool,
    pub found: bool,
}

impl Key {
    pub fn spawn(position: Vec2, progress: &mut LevelProgress, tuning: &KeyTuning) -> Self {
        progress.keys_spawned += 1;
        Self {
            actor: Actor::new(position, tuning.size, Facing::Right),
            color: KeyColor::from_spawn_index(progress.keys_spawned),
            gravity: true,
            jump_pending: true,
            found: false,
        }
    }

    /// Pop upward once, then fall under key gravity.
    pub fn update_move(&mut self, dt: f32, tuning: &KeyTuning) {
        if self.gravity {
            if self.jump_pending {
                self.actor.velocity.y = tuning.pop_speed * dt;
                self.jump_pending = false;
            }
            self.actor.velocity.y += tuning.gravity * dt;
        }
        self.actor.integrate();
        if !self.found {
            self.actor.sync_position();
        }
    }

    pub fn rect(&self) -> Rect {
        self.actor.rect
    }
}

pub const CHEST_SIZE: Vec2 = Vec2::new(16.0, 13.0);

#[derive(Clone, Debug, PartialEq)]
pub struct Chest {
    pub rect: Rect,
    pub color: KeyColor,
    pub opened: bool,
    pub open_animation: AnimationClock,
}

impl Chest {
    pub fn spawn(position: Vec2, progress: &mut LevelProgress) -> Self {
        progress.chests_spawned += 1;
        let color = KeyColor::from_spawn_index(progress.chests_spawned);
        let (row, speed) = match color {
            KeyColor::Red => (1.0, 5.0),
            KeyColor::Green => (16.0, 5.0),
            KeyColor::Yellow => (31.0, 3.0),
            KeyColor::Undetermined => (1.0, 5.0),
        };
        let frames = [0.0, 16.0, 48.0, 64.0]
            .iter()
            .map(|&x| Rect::new(x, row, CHEST_SIZE.x, CHEST_SIZE.y))
            .collect();
        Self {
            rect: Rect::new(position.x, position.y, CHEST_SIZE.x, CHEST_SIZE.y),
            color,
            opened: false,
            open_animation: AnimationClock::once(frames, speed),
        }
    }

    pub fn update_animation(&mut self, dt: f32) {
        if self.opened {
            self.open_animation.advance(dt);
        }
    }

    pub fn reset(&mut self) {
        self.opened = false;
        self.open_animation.set_frame(0);
    }
}

pub const HEALTH_PICKUP_SIZE: Vec2 = Vec2::new(14.0, 10.0);

#[derive(Clone, Debug, PartialEq)]
pub struct HealthPickup {
    pub rect: Rect,
    pub spawn: Vec2,
    pub consumed: bool,
}

impl HealthPickup {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            rect: Rect::new(spawn.x, spawn.y, HEALTH_PICKUP_SIZE.x, HEALTH_PICKUP_SIZE.y),
            spawn,
            consumed: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.spawn);
    }
}

/// Gate blocking the escape route until every chest is open.
#[derive(Clone, Debug, PartialEq)]
pub struct FinalGate {
    pub closed_rect: Rect,
    pub open_rect: Rect,
    pub opened: bool,
}

impl FinalGate {
    pub fn new(closed_rect: Rect, open_rect: Rect) -> Self {
        Self { closed_rect, open_rect, opened: false }
    }

    pub fn rect(&self) -> Rect {
        if self.opened {
            self.open_rect
        } else {
            self.closed_rect
        }
    }

    /// Open the gate. Returns `true` only on the call that actually opened it.
    pub fn open(&mut self) -> bool {
        if self.opened {
            return false;
        }
        self.opened = true;
        true
    }

    pub fn reset(&mut self) {
        self.opened = false;
    }
}
