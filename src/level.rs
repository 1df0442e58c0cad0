/// Level data: the collision layers, trigger zones and spawn lists of a map.
///
/// `LevelLayout` is what lives on disk (RON). `MapGeometry` is the runtime
/// copy the physics pass reads and, once the door opens, mutates; a reset
/// rebuilds it from the layout.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{read_ron, GameError, Result};
use crate::geometry::Rect;

const DEMO_LEVEL: &str = include_str!("../levels/demo.ron");

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    /// Map extent for camera clamping. Falls back to the config value.
    pub size: Option<Vec2>,
    pub obstacles: Vec<Rect>,
    pub lava: Vec<Rect>,
    pub spikes: Vec<Rect>,
    pub ladders: Vec<Rect>,
    pub escape_zone: Rect,
    pub mission_zone: Rect,
    /// Obstacles overlapping this rectangle vanish once every chest is open.
    pub door: Rect,
    pub gate_closed: Rect,
    pub gate_open: Rect,
    pub player_spawn: Option<Vec2>,
    pub grunt_spawns: Vec<Vec2>,
    pub boss_spawns: Vec<Vec2>,
    pub chest_spawns: Vec<Vec2>,
    pub healing_spawns: Vec<Vec2>,
}

impl LevelLayout {
    pub fn load(path: &Path) -> Result<Self> {
        let layout: Self = read_ron(path)?;
        layout.validate()?;
        log::info!(
            "loaded level {}: {} obstacles, {} enemies, {} chests",
            path.display(),
            layout.obstacles.len(),
            layout.grunt_spawns.len() + layout.boss_spawns.len(),
            layout.chest_spawns.len()
        );
        Ok(layout)
    }

    /// Parse a level held in memory; `origin` names it in error messages.
    pub fn from_ron_str(text: &str, origin: &str) -> Result<Self> {
        let layout: Self = ron::from_str(text).map_err(|source| GameError::Parse {
            path: PathBuf::from(origin),
            source,
        })?;
        layout.validate()?;
        Ok(layout)
    }

    /// The level shipped with the binary.
    pub fn demo() -> Result<Self> {
        Self::from_ron_str(DEMO_LEVEL, "levels/demo.ron")
    }

    pub fn validate(&self) -> Result<()> {
        if self.obstacles.is_empty() {
            return Err(GameError::InvalidLevel("level has no obstacles".into()));
        }

        let layers = [
            ("obstacle", &self.obstacles),
            ("lava", &self.lava),
            ("spikes", &self.spikes),
            ("ladder", &self.ladders),
        ];
        for (name, rects) in layers {
            if let Some((i, r)) = rects.iter().enumerate().find(|(_, r)| r.width < 0.0 || r.height < 0.0) {
                return Err(GameError::InvalidLevel(format!(
                    "{name} #{i} has a negative size ({} x {})",
                    r.width, r.height
                )));
            }
        }

        if let Some(size) = self.size {
            if size.x <= 0.0 || size.y <= 0.0 {
                return Err(GameError::InvalidLevel(format!("map size must be positive, got {size}")));
            }
        }
        Ok(())
    }
}

// ── Runtime geometry ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct MapGeometry {
    pub obstacles: Vec<Rect>,
    pub lava: Vec<Rect>,
    pub spikes: Vec<Rect>,
    pub ladders: Vec<Rect>,
    pub escape_zone: Rect,
    pub mission_zone: Rect,
    pub door: Rect,
    pub size: Vec2,
}

impl MapGeometry {
    pub fn from_layout(layout: &LevelLayout, fallback_size: Vec2) -> Self {
        Self {
            obstacles: layout.obstacles.clone(),
            lava: layout.lava.clone(),
            spikes: layout.spikes.clone(),
            ladders: layout.ladders.clone(),
            escape_zone: layout.escape_zone,
            mission_zone: layout.mission_zone,
            door: layout.door,
            size: layout.size.unwrap_or(fallback_size),
        }
    }

    /// Drop every obstacle touching the door rectangle. Returns how many went.
    pub fn remove_door(&mut self) -> usize {
        let door = self.door;
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.intersects(&door));
        let removed = before - self.obstacles.len();
        if removed > 0 {
            log::info!("door opened, removed {removed} obstacle(s)");
        }
        removed
    }

    pub fn hits_obstacle(&self, rect: &Rect) -> bool {
        self.obstacles.iter().any(|o| o.intersects(rect))
    }
}
