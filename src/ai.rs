/// Enemy behaviour: sight checks, patrol and chase steering, timed fire.
///
/// An enemy patrols until the player stands inside its forward probe with
/// a clear line between them. It then stops, turns to face the player and
/// keeps that lock until it has gone `detection_timeout` seconds without
/// seeing them again.

use glam::Vec2;

use crate::entities::{Enemy, Facing, Player};
use crate::geometry::Rect;
use crate::level::MapGeometry;
use crate::physics::resolve_enemy_vs_map;

/// Step along the segment `from -> to` and report whether any
/// `step`-sized probe square touches an obstacle.
pub fn line_of_sight(from: Vec2, to: Vec2, step: f32, obstacles: &[Rect]) -> bool {
    let delta = to - from;
    let distance = delta.length();
    if distance <= f32::EPSILON || step <= 0.0 {
        return true;
    }
    let direction = delta / distance;

    let mut travelled = 0.0;
    while travelled < distance {
        let point = from + direction * travelled;
        let probe = Rect::new(point.x, point.y, step, step);
        if obstacles.iter().any(|o| o.intersects(&probe)) {
            return false;
        }
        travelled += step;
    }
    true
}

impl Enemy {
    pub fn detect_player(&mut self, dt: f32, player: &Player, map: &MapGeometry) {
        let visible = self.probe.intersects(&player.rect())
            && line_of_sight(self.position(), player.position(), self.tuning.trace_step, &map.obstacles);

        if visible {
            if !self.detected {
                log::debug!("{:?} at ({:.0}, {:.0}) spotted the player", self.kind, self.position().x, self.position().y);
            }
            self.detected = true;
            self.lost_sight = 0.0;
        } else if self.lost_sight < self.tuning.detection_timeout {
            self.lost_sight += dt;
        } else {
            self.detected = false;
        }
    }

    /// Gravity always; then either hold still facing the player or walk.
    pub fn update_direction_and_velocity(&mut self, dt: f32, gravity: f32, player: &Player) {
        let actor = &mut self.pawn.actor;
        actor.velocity.y += gravity * dt;

        if self.detected {
            actor.velocity.x = 0.0;
            actor.facing = if player.rect().left < actor.rect.left { Facing::Left } else { Facing::Right };
        } else {
            actor.velocity.x = self.pawn.speed * dt * actor.facing.sign();
            self.walk.advance(dt);
        }
    }

    pub fn update_position(&mut self) {
        self.pawn.actor.integrate();
    }

    /// Place the probe directly ahead of the enemy, vertically centred.
    pub fn update_probe_position(&mut self) {
        let center = self.pawn.actor.rect.center();
        let half_width = self.pawn.actor.rect.width / 2.0;
        let size = self.tuning.probe_size;
        let left = match self.facing() {
            Facing::Right => center.x + half_width,
            Facing::Left => center.x - half_width - size.x,
        };
        self.probe = Rect::new(left, center.y - size.y / 2.0, size.x, size.y);
    }

    /// Turn around at either end of the patrol span, unless chasing.
    pub fn update_move_distance(&mut self) {
        let moved = self.pawn.actor.rect.left - self.spawn.x;
        if (moved >= self.patrol_max || moved <= -self.patrol_min) && !self.detected {
            self.change_direction();
        }
    }

    /// One full AI step: detect, steer, move, probe, patrol bound, map.
    pub fn update_move(&mut self, dt: f32, gravity: f32, player: &Player, map: &MapGeometry) {
        self.detect_player(dt, player, map);
        self.update_direction_and_velocity(dt, gravity, player);
        self.update_position();
        self.update_probe_position();
        self.update_move_distance();
        resolve_enemy_vs_map(self, map);
        self.pawn.actor.sync_position();
    }

    /// Whether this enemy's own fire delay has run out.
    pub fn ready_to_fire(&self, now: f64) -> bool {
        self.pawn.shot_timer.elapsed(now) >= self.tuning.shoot_delay
    }
}
