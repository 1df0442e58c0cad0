use escape_mission::config::{GameConfig, KeyTuning};
use escape_mission::entities::*;
use escape_mission::geometry::Rect;

use approx::assert_relative_eq;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Health ────────────────────────────────────────────────────────────────────

#[test]
fn health_stays_in_bounds_except_after_lethal_hit() {
    let mut health = Health::full(100.0);

    health.take_damage(30.0);
    health.heal(500.0);
    assert_eq!(health.current, 100.0);

    health.take_damage(40.0);
    health.heal(-500.0);
    assert_eq!(health.current, 0.0);

    health.heal(50.0);
    health.take_damage(80.0);
    assert_eq!(health.current, -30.0); // raw value, used as the death signal
    assert!(health.is_depleted());
    assert_eq!(health.fraction(), 0.0);

    health.heal(10.0);
    assert_eq!(health.current, 0.0);
}

#[test]
fn health_fraction() {
    let mut health = Health::full(80.0);
    health.take_damage(20.0);
    assert_relative_eq!(health.fraction(), 0.75);
}

// ── Actor ─────────────────────────────────────────────────────────────────────

#[test]
fn integrate_uses_inverted_y() {
    let mut actor = Actor::new(Vec2::new(10.0, 10.0), Vec2::new(4.0, 4.0), Facing::Right);
    actor.velocity = Vec2::new(2.0, 3.0);
    actor.integrate();
    actor.sync_position();

    assert_eq!(actor.rect.position(), Vec2::new(12.0, 7.0));
    assert_eq!(actor.position, Vec2::new(14.0, 9.0));
}

#[test]
fn facing_flips_and_signs() {
    assert_eq!(Facing::Left.flipped(), Facing::Right);
    assert_eq!(Facing::Left.sign(), -1.0);
    assert!(Facing::Right.is_right());
}

// ── Bullet ────────────────────────────────────────────────────────────────────

#[test]
fn bullet_speed_follows_facing() {
    let left = Bullet::new(Facing::Left, 120.0, 10.0, Affinity::AtPlayer, DestroyEffect::Default, Vec2::ZERO, Vec2::splat(3.0));
    let right = Bullet::new(Facing::Right, 120.0, 10.0, Affinity::AtEnemy, DestroyEffect::Rocket, Vec2::ZERO, Vec2::splat(3.0));

    assert_eq!(left.speed, -120.0);
    assert_eq!(right.speed, 120.0);
    assert_eq!(left.sprite, BULLET_SPRITE);
    assert_eq!(right.sprite, ROCKET_SPRITE);
}

#[test]
fn bullet_advance_moves_horizontally() {
    let mut bullet = Bullet::new(Facing::Left, 120.0, 10.0, Affinity::AtPlayer, DestroyEffect::Default, Vec2::new(100.0, 50.0), Vec2::splat(3.0));
    bullet.advance(0.5);

    assert_relative_eq!(bullet.rect().left, 40.0);
    assert_relative_eq!(bullet.rect().top, 50.0);
    assert_eq!(bullet.actor.position, bullet.rect().center());
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[test]
fn boss_tuning_differs_from_grunt() {
    let config = GameConfig::default();
    let grunt = Enemy::new(EnemyKind::Grunt(GruntVariant::Green), Vec2::ZERO, &config.grunt);
    let boss = Enemy::new(EnemyKind::Boss, Vec2::ZERO, &config.boss);

    assert!(boss.pawn.health.max > grunt.pawn.health.max);
    assert!(boss.tuning.shoot_delay > grunt.tuning.shoot_delay);
    assert_eq!(boss.kind.destroy_effect(), DestroyEffect::Rocket);
    assert_eq!(grunt.kind.destroy_effect(), DestroyEffect::Default);
    assert_eq!(grunt.patrol_min, 40.0);
    assert_eq!(grunt.patrol_max, 40.0);
}

#[test]
fn undetected_enemy_does_not_shoot() {
    let config = GameConfig::default();
    let mut boss = Enemy::new(EnemyKind::Boss, Vec2::new(50.0, 50.0), &config.boss);
    assert!(boss.shoot(120.0, Vec2::splat(3.0)).is_none());

    boss.detected = true;
    let rocket = boss.shoot(120.0, Vec2::splat(3.0)).expect("detected boss shoots");
    assert_eq!(rocket.effect, DestroyEffect::Rocket);
    assert_eq!(rocket.damage, 25.0);
    assert_eq!(rocket.affinity, Affinity::AtPlayer);
    assert_relative_eq!(rocket.rect().left, boss.rect().right());
    assert_relative_eq!(rocket.rect().top, 50.0 + 15.0);
}

#[test]
fn grunt_death_drops_nothing() {
    let mut progress = LevelProgress::default();
    let mut keys = Vec::new();
    EnemyKind::Grunt(GruntVariant::Red).on_death(Vec2::ZERO, &mut progress, &mut keys, &KeyTuning::default());

    assert!(keys.is_empty());
    assert_eq!(progress, LevelProgress::default());
}

#[test]
fn grunt_variants_come_from_the_rng() {
    let mut rng = StdRng::seed_from_u64(7);
    let variants: Vec<GruntVariant> = (0..60).map(|_| GruntVariant::random(&mut rng)).collect();
    for v in [GruntVariant::Green, GruntVariant::Red, GruntVariant::Blue] {
        assert!(variants.contains(&v));
    }
}

// ── Keys and chests ───────────────────────────────────────────────────────────

#[test]
fn key_colours_follow_spawn_order() {
    let mut progress = LevelProgress::default();
    let tuning = KeyTuning::default();
    let colors: Vec<KeyColor> = (0..4).map(|_| Key::spawn(Vec2::ZERO, &mut progress, &tuning).color).collect();

    assert_eq!(colors, vec![KeyColor::Red, KeyColor::Green, KeyColor::Yellow, KeyColor::Undetermined]);
    assert_eq!(progress.keys_spawned, 4);
}

#[test]
fn key_pops_up_then_falls() {
    let mut progress = LevelProgress::default();
    let tuning = KeyTuning::default();
    let mut key = Key::spawn(Vec2::new(0.0, 100.0), &mut progress, &tuning);
    let dt = 1.0 / 30.0;

    key.update_move(dt, &tuning);
    assert!(key.rect().top < 100.0);
    assert!(!key.jump_pending);

    for _ in 0..400 {
        key.update_move(dt, &tuning);
    }
    assert!(key.rect().top > 100.0);
}

#[test]
fn chest_colours_follow_spawn_order() {
    let mut progress = LevelProgress::default();
    let chests: Vec<Chest> = (0..3).map(|_| Chest::spawn(Vec2::ZERO, &mut progress)).collect();

    assert_eq!(chests[0].color, KeyColor::Red);
    assert_eq!(chests[1].color, KeyColor::Green);
    assert_eq!(chests[2].color, KeyColor::Yellow);
    assert_eq!(progress.keys_spawned, 0);
}

#[test]
fn closed_chest_does_not_animate() {
    let mut progress = LevelProgress::default();
    let mut chest = Chest::spawn(Vec2::ZERO, &mut progress);
    chest.update_animation(10.0);
    assert_eq!(chest.open_animation.index(), 0);

    chest.opened = true;
    chest.update_animation(10.0);
    assert!(chest.open_animation.is_finished());
    assert_eq!(chest.open_animation.index(), 3);

    chest.reset();
    assert!(!chest.opened);
    assert_eq!(chest.open_animation.index(), 0);
}

// ── Healing and gate ──────────────────────────────────────────────────────────

#[test]
fn health_pickup_reset_restores_it() {
    let mut item = HealthPickup::new(Vec2::new(5.0, 6.0));
    item.consumed = true;
    item.rect.left = 99.0;

    item.reset();
    assert!(!item.consumed);
    assert_eq!(item.rect, Rect::new(5.0, 6.0, HEALTH_PICKUP_SIZE.x, HEALTH_PICKUP_SIZE.y));
}

#[test]
fn final_gate_opens_once() {
    let closed = Rect::new(0.0, 0.0, 6.0, 80.0);
    let open = Rect::new(-10.0, 30.0, 30.0, 50.0);
    let mut gate = FinalGate::new(closed, open);

    assert_eq!(gate.rect(), closed);
    assert!(gate.open());
    assert!(!gate.open());
    assert_eq!(gate.rect(), open);

    gate.reset();
    assert_eq!(gate.rect(), closed);
}

// ── Modes ─────────────────────────────────────────────────────────────────────

#[test]
fn world_runs_only_in_play_modes() {
    let running: Vec<GameMode> = [
        GameMode::Menu,
        GameMode::IntroDialogue,
        GameMode::Playing,
        GameMode::GameOver,
        GameMode::EscapeRoute,
        GameMode::MissionCompleted,
        GameMode::Pause,
        GameMode::Options,
        GameMode::Exit,
    ]
    .into_iter()
    .filter(|m| m.simulates_world())
    .collect();
    assert_eq!(running, vec![GameMode::Playing, GameMode::GameOver, GameMode::EscapeRoute]);
    assert!(!GameMode::GameOver.accepts_control());
}

#[test]
fn mission_stage_tracks_open_chests() {
    assert_eq!(MissionStage::from_chests_opened(0), MissionStage::FindFirstKey);
    assert_eq!(MissionStage::from_chests_opened(2), MissionStage::FindThirdKey);
    assert_eq!(MissionStage::from_chests_opened(7), MissionStage::ReachTheGate);
}
