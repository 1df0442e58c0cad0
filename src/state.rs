/// `GameState` owns every entity collection plus the mode machine.
///
/// Mode changes go through `set_mode`, which remembers the previous mode
/// and starts or stops music. Spawning reads the level layout; a reset
/// throws every dynamic collection away and spawns again from scratch.

use glam::Vec2;
use rand::Rng;

use crate::audio::{Cue, EscapeFade, SoundSink, VolumeGroup, VolumeSettings};
use crate::config::{GameConfig, PlayerTuning};
use crate::dialogue::IntroDialogue;
use crate::entities::{
    Bullet, Chest, Enemy, EnemyKind, FinalGate, GameMode, GruntVariant, HealthPickup, Key, LevelProgress,
    MissionStage, Player,
};
use crate::error::{GameError, Result};
use crate::geometry::Rect;
use crate::level::{LevelLayout, MapGeometry};
use crate::timer::Timer;

/// Where the camera looks while the intro dialogue plays.
const DIALOGUE_CAMERA_CENTER: Vec2 = Vec2::new(0.0, -500.0);

// ── Input ─────────────────────────────────────────────────────────────────────

/// Discrete inputs; held keys go through `ControlInput` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Escape,
    LeftClick,
}

/// Buttons of the menu, pause and options screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Options,
    Continue,
    Exit,
    /// Close the options screen.
    Cross,
    /// Abandon the run and go back to the main menu.
    Menu,
}

impl MenuAction {
    pub fn name(self) -> &'static str {
        match self {
            MenuAction::Play => "Play",
            MenuAction::Options => "Options",
            MenuAction::Continue => "Continue",
            MenuAction::Exit => "Exit",
            MenuAction::Cross => "Cross",
            MenuAction::Menu => "Menu",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        [
            MenuAction::Play,
            MenuAction::Options,
            MenuAction::Continue,
            MenuAction::Exit,
            MenuAction::Cross,
            MenuAction::Menu,
        ]
        .into_iter()
        .find(|a| a.name() == name)
        .ok_or_else(|| GameError::UnknownButton(name.to_string()))
    }

    /// Buttons shown in `mode`.
    pub fn visible_in(mode: GameMode) -> &'static [MenuAction] {
        match mode {
            GameMode::Menu => &[MenuAction::Play, MenuAction::Options, MenuAction::Exit],
            GameMode::Pause => &[MenuAction::Continue, MenuAction::Options, MenuAction::Menu],
            GameMode::Options => &[MenuAction::Cross],
            _ => &[],
        }
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub layout: LevelLayout,
    pub map: MapGeometry,

    pub mode: GameMode,
    pub previous_mode: GameMode,
    /// Mode to return to from the pause screen.
    pub paused_from: Option<GameMode>,
    /// Simulation time in seconds.
    pub clock: f64,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub keys: Vec<Key>,
    pub found_keys: Vec<Key>,
    pub chests: Vec<Chest>,
    pub healing: Vec<HealthPickup>,
    pub gate: FinalGate,
    pub progress: LevelProgress,

    pub camera: Rect,
    pub dialogue: IntroDialogue,
    pub game_over_timer: Timer,
    pub credits_timer: Timer,
    pub escape_fade: EscapeFade,
    pub mission_stage: MissionStage,
    /// Options screen sliders. Survive a reset.
    pub volume: VolumeSettings,
}

impl GameState {
    /// Build a populated level sitting in `Menu`. No music is started; call
    /// `set_mode(GameMode::Menu, ..)` once a sound sink is available.
    pub fn new(config: GameConfig, layout: LevelLayout, rng: &mut impl Rng) -> Self {
        let map = MapGeometry::from_layout(&layout, config.map_size);
        let player = Player::new(&player_tuning(&config, &layout));
        let gate = FinalGate::new(layout.gate_closed, layout.gate_open);
        let dialogue = IntroDialogue::new(config.timing.dialogue_hold);

        let mut state = Self {
            config,
            layout,
            map,
            mode: GameMode::Menu,
            previous_mode: GameMode::Menu,
            paused_from: None,
            clock: 0.0,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            keys: Vec::new(),
            found_keys: Vec::new(),
            chests: Vec::new(),
            healing: Vec::new(),
            gate,
            progress: LevelProgress::default(),
            camera: Rect::default(),
            dialogue,
            game_over_timer: Timer::default(),
            credits_timer: Timer::default(),
            escape_fade: EscapeFade::default(),
            mission_stage: MissionStage::FindFirstKey,
            volume: VolumeSettings::default(),
        };
        state.spawn_level(rng);
        state.camera = Rect::centered(state.follow_center(), state.config.view_size());
        state
    }

    /// Populate enemies, chests and healing items from the layout's spawn lists.
    pub fn spawn_level(&mut self, rng: &mut impl Rng) {
        self.spawn_enemies(rng);
        for &spawn in &self.layout.chest_spawns {
            self.chests.push(Chest::spawn(spawn, &mut self.progress));
        }
        for &spawn in &self.layout.healing_spawns {
            self.healing.push(HealthPickup::new(spawn));
        }
        log::info!(
            "spawned {} enemies, {} chests, {} healing items",
            self.enemies.len(),
            self.chests.len(),
            self.healing.len()
        );
    }

    fn spawn_enemies(&mut self, rng: &mut impl Rng) {
        for &spawn in &self.layout.grunt_spawns {
            let kind = EnemyKind::Grunt(GruntVariant::random(rng));
            self.enemies.push(Enemy::new(kind, spawn, &self.config.grunt));
        }
        for &spawn in &self.layout.boss_spawns {
            self.enemies.push(Enemy::new(EnemyKind::Boss, spawn, &self.config.boss));
        }
    }

    /// Start the level over. Enemies, bullets and keys are thrown away and
    /// enemies respawn; chests and healing items are restored where they
    /// stand and keep their colours.
    pub fn reset_game(&mut self, rng: &mut impl Rng) {
        log::info!("resetting game");
        self.enemies.clear();
        self.bullets.clear();
        self.keys.clear();
        self.found_keys.clear();
        self.chests.iter_mut().for_each(Chest::reset);
        self.healing.iter_mut().for_each(HealthPickup::reset);
        self.progress = LevelProgress { chests_spawned: self.progress.chests_spawned, ..LevelProgress::default() };
        self.gate.reset();
        self.map = MapGeometry::from_layout(&self.layout, self.config.map_size);
        self.player = Player::new(&player_tuning(&self.config, &self.layout));
        self.dialogue = IntroDialogue::new(self.config.timing.dialogue_hold);
        self.escape_fade = EscapeFade::default();
        self.mission_stage = MissionStage::FindFirstKey;
        self.paused_from = None;
        self.spawn_enemies(rng);
    }

    // ── Modes ─────────────────────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: GameMode, sound: &mut dyn SoundSink) {
        log::info!("mode {:?} -> {:?}", self.mode, mode);
        self.previous_mode = self.mode;

        match mode {
            GameMode::Playing => {
                sound.stop(Cue::MenuMusic);
                sound.stop(Cue::Helicopter);
                sound.play(Cue::BackgroundMusic);
            }
            GameMode::Menu => {
                sound.stop(Cue::BackgroundMusic);
                sound.stop(Cue::Helicopter);
                sound.play(Cue::MenuMusic);
            }
            GameMode::IntroDialogue => {
                sound.stop(Cue::MenuMusic);
                sound.play(Cue::Helicopter);
            }
            // Resuming from pause must not restart what the mode started on entry.
            _ if self.mode == GameMode::Pause => {}
            GameMode::GameOver => {
                self.game_over_timer.restart(self.clock);
            }
            GameMode::EscapeRoute => {
                let music = self.volume.effective(Cue::BackgroundMusic);
                self.escape_fade = EscapeFade::begin(self.clock, music);
            }
            GameMode::MissionCompleted => {
                self.credits_timer.restart(self.clock);
            }
            GameMode::Pause => {
                // Coming back from the options screen keeps the resume target set on entering pause.
                if self.mode != GameMode::Options {
                    self.paused_from = Some(self.mode);
                }
            }
            GameMode::Options | GameMode::Exit => {}
        }

        self.mode = mode;
    }

    pub fn handle_event(&mut self, event: InputEvent, rng: &mut impl Rng, sound: &mut dyn SoundSink) {
        let now = self.clock;
        match event {
            InputEvent::Escape => {
                if matches!(self.mode, GameMode::Playing | GameMode::IntroDialogue | GameMode::GameOver) {
                    self.set_mode(GameMode::Pause, sound);
                }
            }
            InputEvent::LeftClick => match self.mode {
                GameMode::GameOver => {
                    if self.game_over_timer.elapsed(now) >= self.config.timing.game_over_delay {
                        self.reset_game(rng);
                        self.set_mode(GameMode::Menu, sound);
                    }
                }
                GameMode::MissionCompleted => {
                    if self.credits_timer.elapsed(now) >= self.config.timing.credits_delay {
                        self.reset_game(rng);
                        self.set_mode(GameMode::Menu, sound);
                    }
                }
                GameMode::IntroDialogue => self.dialogue.switch_next_frame(now, sound),
                _ => {}
            },
        }
    }

    /// Press a menu button. Buttons not shown in the current mode do nothing.
    pub fn apply_menu_action(&mut self, action: MenuAction, rng: &mut impl Rng, sound: &mut dyn SoundSink) {
        if !MenuAction::visible_in(self.mode).contains(&action) {
            log::warn!("{} pressed while hidden in {:?}", action.name(), self.mode);
            return;
        }
        sound.play(Cue::ClickButton);

        match action {
            MenuAction::Play => self.set_mode(GameMode::IntroDialogue, sound),
            MenuAction::Options => self.set_mode(GameMode::Options, sound),
            MenuAction::Exit => self.set_mode(GameMode::Exit, sound),
            MenuAction::Continue => {
                let resume = match self.paused_from.take() {
                    Some(mode @ (GameMode::IntroDialogue | GameMode::GameOver)) => mode,
                    _ => GameMode::Playing,
                };
                self.set_mode(resume, sound);
            }
            MenuAction::Cross => match self.previous_mode {
                GameMode::Pause => self.set_mode(GameMode::Pause, sound),
                _ => self.set_mode(GameMode::Menu, sound),
            },
            MenuAction::Menu => {
                self.reset_game(rng);
                self.set_mode(GameMode::Menu, sound);
            }
        }
    }

    // ── Volume ────────────────────────────────────────────────────────────────

    /// Push the current slider positions to `sound`.
    pub fn apply_volume_settings(&self, sound: &mut dyn SoundSink) {
        self.volume.apply(sound);
    }

    /// Set one slider and push the result. Works in any mode.
    pub fn set_volume_level(&mut self, group: VolumeGroup, value: f32, sound: &mut dyn SoundSink) {
        self.volume.set_level(group, value);
        log::debug!("{} volume {}", group.name(), self.volume.level(group));
        self.apply_volume_settings(sound);
    }

    pub fn set_slider_named(&mut self, name: &str, value: f32, sound: &mut dyn SoundSink) -> Result<()> {
        let group = VolumeGroup::from_name(name)?;
        self.set_volume_level(group, value, sound);
        Ok(())
    }

    /// Arrow-key selection on the options screen.
    pub fn select_slider(&mut self, step: isize) {
        if self.mode == GameMode::Options {
            self.volume.select_next(step);
        }
    }

    /// Nudge the selected slider by `delta`. Only the options screen has sliders.
    pub fn adjust_volume(&mut self, delta: f32, sound: &mut dyn SoundSink) {
        if self.mode != GameMode::Options {
            return;
        }
        let group = self.volume.selected;
        self.set_volume_level(group, self.volume.level(group) + delta, sound);
    }

    // ── Camera ────────────────────────────────────────────────────────────────

    /// Player position clamped so the view stays inside the map.
    fn follow_center(&self) -> Vec2 {
        let half = self.config.view_size() / 2.0;
        let size = self.map.size;
        let target = self.player.position();
        let mut center = target;

        if target.x - half.x < 0.0 {
            center.x = half.x;
        } else if target.x + half.x > size.x {
            center.x = size.x - half.x;
        }
        if target.y - half.y < 0.0 {
            center.y = half.y;
        } else if target.y + half.y > size.y {
            center.y = size.y - half.y;
        }
        center
    }

    pub fn update_camera(&mut self) {
        let center = match self.mode {
            GameMode::Menu => self.player.position(),
            GameMode::IntroDialogue => DIALOGUE_CAMERA_CENTER,
            GameMode::Playing | GameMode::EscapeRoute => self.follow_center(),
            _ => return,
        };
        self.camera = Rect::centered(center, self.config.view_size());
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn found_keys_mut(&mut self) -> &mut Vec<Key> {
        &mut self.found_keys
    }

    /// Whether the door blocking the escape route should be gone.
    pub fn door_unlocked(&self) -> bool {
        self.progress.chests_opened >= self.config.chests_to_open_gate
    }
}

fn player_tuning(config: &GameConfig, layout: &LevelLayout) -> PlayerTuning {
    let mut tuning = config.player.clone();
    if let Some(spawn) = layout.player_spawn {
        tuning.spawn = spawn;
    }
    tuning
}
