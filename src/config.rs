/// Tuning knobs for the simulation, loadable from a RON file.
///
/// Every field has a default matching the shipped game, and `#[serde(default)]`
/// lets a config file override only the values it names.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{read_ron, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window size in pixels; the camera sees `screen * zoom` map units.
    pub screen: Vec2,
    pub zoom: f32,
    pub map_size: Vec2,
    /// Added to vertical velocity every second (negative pulls down).
    pub gravity: f32,
    pub player: PlayerTuning,
    pub grunt: EnemyTuning,
    pub boss: EnemyTuning,
    pub bullet: BulletTuning,
    pub key: KeyTuning,
    pub timing: TimingTuning,
    /// Opened chests needed before the final gate unlocks.
    pub chests_to_open_gate: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: Vec2,
    pub spawn: Vec2,
    pub max_health: f32,
    pub speed: f32,
    pub jump_speed: f32,
    pub fire_delay: f32,
    pub push_back_force: f32,
    pub push_back_lift: f32,
    pub push_back_duration: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: Vec2,
    pub draw_scale: f32,
    pub max_health: f32,
    pub speed: f32,
    pub shoot_delay: f32,
    /// Full patrol span; the enemy walks half of it each side of its spawn.
    pub patrol_distance: f32,
    pub probe_size: Vec2,
    pub detection_timeout: f32,
    pub trace_step: f32,
    pub bullet_damage: f32,
    pub bullet_offset_y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub size: Vec2,
    pub speed: f32,
    /// Extra speed given to player shots.
    pub player_speed_bonus: f32,
    pub damage: f32,
    /// Spawn offset from the player's collision origin when facing right.
    pub player_offset: Vec2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyTuning {
    pub size: Vec2,
    pub pop_speed: f32,
    pub gravity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub game_over_delay: f32,
    pub credits_delay: f32,
    pub fade_interval: f32,
    pub fade_music_step: f32,
    pub fade_helicopter_step: f32,
    pub fade_helicopter_max: f32,
    pub dialogue_hold: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: Vec2::new(1280.0, 720.0),
            zoom: 0.2,
            map_size: Vec2::new(6680.0, 1760.0),
            gravity: -5.0,
            player: PlayerTuning::default(),
            grunt: EnemyTuning::default(),
            boss: EnemyTuning::boss(),
            bullet: BulletTuning::default(),
            key: KeyTuning::default(),
            timing: TimingTuning::default(),
            chests_to_open_gate: 3,
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(12.0, 16.0),
            spawn: Vec2::new(110.0, 520.0),
            max_health: 100.0,
            speed: 100.0,
            jump_speed: 200.0,
            fire_delay: 0.4,
            push_back_force: 450.0,
            push_back_lift: 10.0,
            push_back_duration: 0.2,
        }
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(10.0, 15.0),
            draw_scale: 1.0,
            max_health: 30.0,
            speed: 50.0,
            shoot_delay: 0.5,
            patrol_distance: 80.0,
            probe_size: Vec2::new(230.0, 10.0),
            detection_timeout: 2.0,
            trace_step: 5.0,
            bullet_damage: 10.0,
            bullet_offset_y: 9.0,
        }
    }
}

impl EnemyTuning {
    pub fn boss() -> Self {
        Self {
            size: Vec2::new(15.0, 22.0),
            draw_scale: 1.5,
            max_health: 100.0,
            shoot_delay: 0.55,
            bullet_damage: 25.0,
            bullet_offset_y: 15.0,
            ..Self::default()
        }
    }
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(3.0, 3.0),
            speed: 120.0,
            player_speed_bonus: 10.0,
            damage: 10.0,
            player_offset: Vec2::new(12.0, 11.0),
        }
    }
}

impl Default for KeyTuning {
    fn default() -> Self {
        Self { size: Vec2::new(14.0, 9.0), pop_speed: 120.0, gravity: -2.0 }
    }
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            game_over_delay: 3.5,
            credits_delay: 15.0,
            fade_interval: 0.4,
            fade_music_step: 0.03,
            fade_helicopter_step: 1.0,
            fade_helicopter_max: 100.0,
            dialogue_hold: 2.0,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = read_ron(path)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Size of the camera view in map units.
    pub fn view_size(&self) -> Vec2 {
        self.screen * self.zoom
    }
}
