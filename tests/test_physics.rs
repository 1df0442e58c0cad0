use escape_mission::audio::{Cue, RecordingSound};
use escape_mission::config::GameConfig;
use escape_mission::entities::*;
use escape_mission::geometry::Rect;
use escape_mission::level::{LevelLayout, MapGeometry};
use escape_mission::physics::*;

use approx::assert_relative_eq;
use glam::Vec2;

const GROUND: Rect = Rect::new(0.0, 200.0, 1000.0, 20.0);

fn make_map(extra: Vec<Rect>) -> MapGeometry {
    let mut obstacles = vec![GROUND];
    obstacles.extend(extra);
    let layout = LevelLayout {
        obstacles,
        escape_zone: Rect::new(900.0, 150.0, 20.0, 50.0),
        mission_zone: Rect::new(960.0, 150.0, 20.0, 50.0),
        door: Rect::new(698.0, 96.0, 14.0, 104.0),
        ..LevelLayout::default()
    };
    MapGeometry::from_layout(&layout, Vec2::new(1000.0, 300.0))
}

fn make_player(left: f32, top: f32) -> Player {
    let mut tuning = GameConfig::default().player;
    tuning.spawn = Vec2::new(left, top);
    Player::new(&tuning)
}

// ── resolve_overlap ───────────────────────────────────────────────────────────

#[test]
fn overlap_resolves_on_shorter_horizontal_axis() {
    let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    let mut velocity = Vec2::new(3.0, -2.0);
    let obstacle = Rect::new(8.0, -20.0, 20.0, 50.0);

    let push = resolve_overlap(&mut rect, &mut velocity, &obstacle);
    assert_eq!(push, Some(Push::Horizontal));
    assert_relative_eq!(rect.left, -2.0);
    assert_eq!(velocity.x, 0.0);
    assert_eq!(velocity.y, -2.0); // untouched axis keeps its velocity
}

#[test]
fn overlap_from_above_lands() {
    let mut rect = Rect::new(0.0, 5.0, 10.0, 10.0);
    let mut velocity = Vec2::new(1.0, -4.0);
    let obstacle = Rect::new(-50.0, 10.0, 200.0, 20.0);

    let push = resolve_overlap(&mut rect, &mut velocity, &obstacle);
    assert_eq!(push, Some(Push::Vertical { from_top: true }));
    assert_relative_eq!(rect.bottom(), 10.0);
    assert_eq!(velocity.y, 0.0);
    assert_eq!(velocity.x, 1.0);
}

#[test]
fn overlap_from_below_is_not_a_landing() {
    let mut rect = Rect::new(0.0, 25.0, 10.0, 10.0);
    let mut velocity = Vec2::new(0.0, 4.0);
    let obstacle = Rect::new(-50.0, 10.0, 200.0, 20.0);

    let push = resolve_overlap(&mut rect, &mut velocity, &obstacle);
    assert_eq!(push, Some(Push::Vertical { from_top: false }));
    assert_relative_eq!(rect.top, 30.0);
}

#[test]
fn no_overlap_changes_nothing() {
    let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    let mut velocity = Vec2::new(1.0, 1.0);
    // Shares an edge only.
    let obstacle = Rect::new(10.0, 0.0, 10.0, 10.0);

    assert_eq!(resolve_overlap(&mut rect, &mut velocity, &obstacle), None);
    assert_eq!(rect, Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(velocity, Vec2::new(1.0, 1.0));
}

// ── Player vs map ─────────────────────────────────────────────────────────────

#[test]
fn landing_on_ground_restores_jump() {
    let mut map = make_map(vec![]);
    let mut player = make_player(100.0, 187.0); // 3 units into the ground
    player.pawn.can_jump = false;
    let mut sound = RecordingSound::default();

    let contact = resolve_player_vs_map(&mut player, &mut map, false, &mut sound);
    assert!(contact.landed);
    assert!(player.pawn.can_jump);
    assert_relative_eq!(player.rect().bottom(), 200.0);
    assert_eq!(player.position(), player.rect().center());
}

#[test]
fn ladder_overlap_allows_climbing() {
    let mut map = make_map(vec![]);
    map.ladders.push(Rect::new(95.0, 120.0, 10.0, 80.0));
    let mut player = make_player(100.0, 184.0);
    let mut sound = RecordingSound::default();

    resolve_player_vs_map(&mut player, &mut map, false, &mut sound);
    assert!(player.can_climb);

    player.pawn.actor.rect.left = 300.0;
    resolve_player_vs_map(&mut player, &mut map, false, &mut sound);
    assert!(!player.can_climb);
}

#[test]
fn lava_kills_once() {
    let mut map = make_map(vec![]);
    map.lava.push(Rect::new(90.0, 190.0, 40.0, 10.0));
    let mut player = make_player(100.0, 184.0);
    let mut sound = RecordingSound::default();

    resolve_player_vs_map(&mut player, &mut map, false, &mut sound);
    resolve_player_vs_map(&mut player, &mut map, false, &mut sound);

    assert!(player.dead);
    assert_eq!(sound.plays(Cue::Lava), 1);
}

#[test]
fn spikes_kill_with_their_own_cue() {
    let mut map = make_map(vec![]);
    map.spikes.push(Rect::new(90.0, 192.0, 40.0, 8.0));
    let mut player = make_player(100.0, 184.0);
    let mut sound = RecordingSound::default();

    resolve_player_vs_map(&mut player, &mut map, false, &mut sound);
    assert!(player.dead);
    assert_eq!(sound.plays(Cue::Peaks), 1);
    assert_eq!(sound.plays(Cue::Lava), 0);
}

#[test]
fn door_stays_until_unlocked() {
    let door_obstacle = Rect::new(700.0, 100.0, 10.0, 100.0);
    let mut map = make_map(vec![door_obstacle]);
    let mut player = make_player(100.0, 184.0);
    let mut sound = RecordingSound::default();

    resolve_player_vs_map(&mut player, &mut map, false, &mut sound);
    assert!(map.obstacles.contains(&door_obstacle));

    resolve_player_vs_map(&mut player, &mut map, true, &mut sound);
    assert!(!map.obstacles.contains(&door_obstacle));
    assert!(map.obstacles.contains(&GROUND));
}

#[test]
fn escape_zone_requests_escape_route() {
    let mut map = make_map(vec![]);
    let mut player = make_player(902.0, 184.0);
    let mut sound = RecordingSound::default();

    let contact = resolve_player_vs_map(&mut player, &mut map, false, &mut sound);
    assert_eq!(contact.trigger, Some(GameMode::EscapeRoute));
}

#[test]
fn mission_zone_wins_over_escape_zone() {
    let mut map = make_map(vec![]);
    map.mission_zone = map.escape_zone;
    let mut player = make_player(902.0, 184.0);
    let mut sound = RecordingSound::default();

    let contact = resolve_player_vs_map(&mut player, &mut map, false, &mut sound);
    assert_eq!(contact.trigger, Some(GameMode::MissionCompleted));
}

// ── Other movers ──────────────────────────────────────────────────────────────

#[test]
fn enemy_pushed_sideways_turns_around() {
    let map = make_map(vec![Rect::new(50.0, 100.0, 10.0, 100.0)]);
    let tuning = GameConfig::default().grunt;
    let mut enemy = Enemy::new(EnemyKind::Grunt(GruntVariant::Green), Vec2::new(42.0, 185.0), &tuning);
    assert_eq!(enemy.facing(), Facing::Right);

    resolve_enemy_vs_map(&mut enemy, &map);
    assert_relative_eq!(enemy.rect().left, 40.0);
    assert_eq!(enemy.facing(), Facing::Left);
}

#[test]
fn falling_key_rests_on_ground() {
    let map = make_map(vec![]);
    let config = GameConfig::default();
    let mut progress = LevelProgress::default();
    let mut key = Key::spawn(Vec2::new(100.0, 193.0), &mut progress, &config.key);

    resolve_key_vs_map(&mut key, &map);
    assert_relative_eq!(key.rect().bottom(), 200.0);
    assert_eq!(key.actor.position, key.rect().center());
}

#[test]
fn bullet_outside_camera_or_in_wall_hits_world() {
    let map = make_map(vec![Rect::new(300.0, 100.0, 10.0, 100.0)]);
    let camera = Rect::new(0.0, 100.0, 256.0, 144.0);
    let make = |x: f32| {
        Bullet::new(Facing::Right, 120.0, 10.0, Affinity::AtEnemy, DestroyEffect::Default, Vec2::new(x, 150.0), Vec2::new(3.0, 3.0))
    };

    assert!(!bullet_hits_world(&make(100.0), &camera, &map));
    assert!(bullet_hits_world(&make(500.0), &camera, &map));

    let wide_camera = Rect::new(0.0, 100.0, 600.0, 144.0);
    assert!(bullet_hits_world(&make(304.0), &wide_camera, &map));
}
