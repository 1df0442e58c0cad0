/// Sound cues and the sinks that receive them.
///
/// The simulation never owns an audio device. It is handed a `SoundSink`
/// and fires typed cues at it; `SilentSound` drops everything,
/// `RecordingSound` keeps a log for tests, and `SoundBank` tracks channel
/// state by name for the terminal front end.

use std::collections::HashMap;

use crate::config::TimingTuning;
use crate::error::{GameError, Result};
use crate::timer::Timer;

// ── Cues ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    BackgroundMusic,
    MenuMusic,
    PlayerDamage,
    PlayerDeath,
    PlayerShot,
    EnemyDeath,
    KeyFound,
    OpenChest,
    EatenHeal,
    Lava,
    Peaks,
    ClickButton,
    DialogueDevice,
    OffDialogueDevice,
    Helicopter,
    SmsDialogue,
    OpenGate,
    BulletHit,
    RocketExplosion,
}

impl Cue {
    pub const ALL: [Cue; 19] = [
        Cue::BackgroundMusic,
        Cue::MenuMusic,
        Cue::PlayerDamage,
        Cue::PlayerDeath,
        Cue::PlayerShot,
        Cue::EnemyDeath,
        Cue::KeyFound,
        Cue::OpenChest,
        Cue::EatenHeal,
        Cue::Lava,
        Cue::Peaks,
        Cue::ClickButton,
        Cue::DialogueDevice,
        Cue::OffDialogueDevice,
        Cue::Helicopter,
        Cue::SmsDialogue,
        Cue::OpenGate,
        Cue::BulletHit,
        Cue::RocketExplosion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Cue::BackgroundMusic => "BackgroundMusic",
            Cue::MenuMusic => "MenuMusic",
            Cue::PlayerDamage => "PlayerDamage",
            Cue::PlayerDeath => "PlayerDeath",
            Cue::PlayerShot => "PlayerShot",
            Cue::EnemyDeath => "EnemyDeath",
            Cue::KeyFound => "KeyFound",
            Cue::OpenChest => "OpenChest",
            Cue::EatenHeal => "EatenHeal",
            Cue::Lava => "Lava",
            Cue::Peaks => "Peaks",
            Cue::ClickButton => "ClickButton",
            Cue::DialogueDevice => "DialogueDevice",
            Cue::OffDialogueDevice => "OffDialogueDevice",
            Cue::Helicopter => "Helicopter",
            Cue::SmsDialogue => "SMSDialogue",
            Cue::OpenGate => "OpenGate",
            Cue::BulletHit => "BulletHit",
            Cue::RocketExplosion => "RocketExplosion",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Cue::ALL
            .iter()
            .copied()
            .find(|cue| cue.name() == name)
            .ok_or_else(|| GameError::UnknownSound(name.to_string()))
    }

    /// Music tracks loop until stopped; everything else is one-shot.
    pub fn is_looping(self) -> bool {
        matches!(self, Cue::BackgroundMusic | Cue::MenuMusic | Cue::Helicopter)
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Fire-and-forget audio output.
pub trait SoundSink {
    fn play(&mut self, cue: Cue);
    fn stop(&mut self, cue: Cue);
    /// Volume in `0.0..=100.0`.
    fn set_volume(&mut self, cue: Cue, volume: f32);
    /// Scale applied on top of every cue's own volume.
    fn set_master_volume(&mut self, _volume: f32) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSound;

impl SoundSink for SilentSound {
    fn play(&mut self, _cue: Cue) {}
    fn stop(&mut self, _cue: Cue) {}
    fn set_volume(&mut self, _cue: Cue, _volume: f32) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SoundEvent {
    Play(Cue),
    Stop(Cue),
    Volume(Cue, f32),
    Master(f32),
}

/// Keeps every call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSound {
    pub events: Vec<SoundEvent>,
}

impl RecordingSound {
    pub fn plays(&self, cue: Cue) -> usize {
        self.events.iter().filter(|e| **e == SoundEvent::Play(cue)).count()
    }

    pub fn stops(&self, cue: Cue) -> usize {
        self.events.iter().filter(|e| **e == SoundEvent::Stop(cue)).count()
    }

    pub fn last_volume(&self, cue: Cue) -> Option<f32> {
        self.events.iter().rev().find_map(|e| match e {
            SoundEvent::Volume(c, v) if *c == cue => Some(*v),
            _ => None,
        })
    }

    pub fn last_master(&self) -> Option<f32> {
        self.events.iter().rev().find_map(|e| match e {
            SoundEvent::Master(v) => Some(*v),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SoundSink for RecordingSound {
    fn play(&mut self, cue: Cue) {
        self.events.push(SoundEvent::Play(cue));
    }

    fn stop(&mut self, cue: Cue) {
        self.events.push(SoundEvent::Stop(cue));
    }

    fn set_volume(&mut self, cue: Cue, volume: f32) {
        self.events.push(SoundEvent::Volume(cue, volume));
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.events.push(SoundEvent::Master(volume));
    }
}

// ── Sound bank ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Channel {
    pub volume: f32,
    pub playing: bool,
    pub looping: bool,
}

/// Name-keyed channel registry with a master volume.
///
/// String lookups fail with `GameError::UnknownSound`; the typed
/// `SoundSink` side cannot miss because every `Cue` is registered.
#[derive(Clone, Debug)]
pub struct SoundBank {
    channels: HashMap<String, Channel>,
    master_volume: f32,
    /// Most recent one-shot, for the HUD.
    pub last_cue: Option<Cue>,
}

impl Default for SoundBank {
    fn default() -> Self {
        let channels = Cue::ALL
            .iter()
            .map(|cue| {
                let channel = Channel { volume: 100.0, playing: false, looping: cue.is_looping() };
                (cue.name().to_string(), channel)
            })
            .collect();
        Self { channels, master_volume: 100.0, last_cue: None }
    }
}

impl SoundBank {
    fn channel_mut(&mut self, name: &str) -> Result<&mut Channel> {
        self.channels.get_mut(name).ok_or_else(|| GameError::UnknownSound(name.to_string()))
    }

    pub fn channel(&self, name: &str) -> Result<&Channel> {
        self.channels.get(name).ok_or_else(|| GameError::UnknownSound(name.to_string()))
    }

    pub fn play_named(&mut self, name: &str) -> Result<()> {
        let channel = self.channel_mut(name)?;
        channel.playing = true;
        Ok(())
    }

    pub fn stop_named(&mut self, name: &str) -> Result<()> {
        self.channel_mut(name)?.playing = false;
        Ok(())
    }

    pub fn set_volume_named(&mut self, name: &str, volume: f32) -> Result<()> {
        self.channel_mut(name)?.volume = volume.clamp(0.0, 100.0);
        Ok(())
    }

    pub fn is_playing(&self, name: &str) -> Result<bool> {
        Ok(self.channel(name)?.playing)
    }

    /// Channel volume scaled by the master volume.
    pub fn effective_volume(&self, name: &str) -> Result<f32> {
        Ok(self.channel(name)?.volume * self.master_volume / 100.0)
    }

    /// Name of the music track currently playing, if any.
    pub fn current_music(&self) -> Option<&'static str> {
        [Cue::BackgroundMusic, Cue::MenuMusic, Cue::Helicopter]
            .into_iter()
            .find(|cue| self.channels.get(cue.name()).map(|c| c.playing).unwrap_or(false))
            .map(Cue::name)
    }
}

impl SoundSink for SoundBank {
    fn play(&mut self, cue: Cue) {
        if let Err(err) = self.play_named(cue.name()) {
            log::error!("{err}");
            return;
        }
        if !cue.is_looping() {
            // One-shots finish on their own; only remember them for display.
            if let Ok(channel) = self.channel_mut(cue.name()) {
                channel.playing = false;
            }
            self.last_cue = Some(cue);
        }
    }

    fn stop(&mut self, cue: Cue) {
        if let Err(err) = self.stop_named(cue.name()) {
            log::error!("{err}");
        }
    }

    fn set_volume(&mut self, cue: Cue, volume: f32) {
        if let Err(err) = self.set_volume_named(cue.name(), volume) {
            log::error!("{err}");
        }
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 100.0);
    }
}

// ── Volume sliders ────────────────────────────────────────────────────────────

/// Top of every slider's range.
pub const SLIDER_MAX: f32 = 50.0;

/// One slider on the options screen. `Master` scales everything; the
/// others set the volume of their own cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VolumeGroup {
    Master,
    Interface,
    Voices,
    World,
    Music,
}

impl VolumeGroup {
    pub const ALL: [VolumeGroup; 5] =
        [VolumeGroup::Master, VolumeGroup::Interface, VolumeGroup::Voices, VolumeGroup::World, VolumeGroup::Music];

    pub fn name(self) -> &'static str {
        match self {
            VolumeGroup::Master => "Master",
            VolumeGroup::Interface => "Interface",
            VolumeGroup::Voices => "Voices",
            VolumeGroup::World => "World",
            VolumeGroup::Music => "Music",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        VolumeGroup::ALL
            .into_iter()
            .find(|group| group.name() == name)
            .ok_or_else(|| GameError::UnknownSlider(name.to_string()))
    }

    /// Slider that controls `cue`. Never `Master`.
    pub fn of(cue: Cue) -> Self {
        match cue {
            Cue::ClickButton => VolumeGroup::Interface,
            Cue::PlayerDamage | Cue::PlayerDeath | Cue::EnemyDeath | Cue::EatenHeal => VolumeGroup::Voices,
            Cue::BackgroundMusic | Cue::MenuMusic => VolumeGroup::Music,
            _ => VolumeGroup::World,
        }
    }

    pub fn cues(self) -> impl Iterator<Item = Cue> {
        Cue::ALL.into_iter().filter(move |&cue| self != VolumeGroup::Master && VolumeGroup::of(cue) == self)
    }
}

/// Slider positions, each in `0.0..=SLIDER_MAX`.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeSettings {
    levels: [f32; 5],
    /// Slider the arrow keys move.
    pub selected: VolumeGroup,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self { levels: [SLIDER_MAX, 15.0, 15.0, 15.0, 15.0], selected: VolumeGroup::Master }
    }
}

impl VolumeSettings {
    pub fn level(&self, group: VolumeGroup) -> f32 {
        self.levels[group as usize]
    }

    pub fn set_level(&mut self, group: VolumeGroup, value: f32) {
        self.levels[group as usize] = value.clamp(0.0, SLIDER_MAX);
    }

    /// What a cue actually plays at: its slider scaled by the master slider.
    pub fn effective(&self, cue: Cue) -> f32 {
        self.level(VolumeGroup::of(cue)) * self.level(VolumeGroup::Master) / 100.0
    }

    /// Move the selection `step` sliders down, wrapping around.
    pub fn select_next(&mut self, step: isize) {
        let len = VolumeGroup::ALL.len() as isize;
        let at = (self.selected as isize + step).rem_euclid(len);
        self.selected = VolumeGroup::ALL[at as usize];
    }

    /// Push every slider to the sink.
    pub fn apply(&self, sound: &mut dyn SoundSink) {
        sound.set_master_volume(self.level(VolumeGroup::Master));
        for cue in Cue::ALL {
            sound.set_volume(cue, self.level(VolumeGroup::of(cue)));
        }
    }
}

// ── Escape fade ───────────────────────────────────────────────────────────────

/// Background music fades out in fixed steps, then the helicopter fades in.
#[derive(Clone, Debug, PartialEq)]
pub struct EscapeFade {
    timer: Timer,
    pub background_volume: f32,
    pub helicopter_volume: f32,
    pub helicopter_started: bool,
    pub finished: bool,
}

impl Default for EscapeFade {
    fn default() -> Self {
        Self {
            timer: Timer::default(),
            background_volume: 100.0,
            helicopter_volume: 0.0,
            helicopter_started: false,
            finished: false,
        }
    }
}

impl EscapeFade {
    /// Start fading from `music_volume`, the volume the background track
    /// is heard at right now.
    pub fn begin(now: f64, music_volume: f32) -> Self {
        Self { timer: Timer::started(now), background_volume: music_volume, ..Self::default() }
    }

    /// Take one step every `fade_interval` seconds.
    pub fn update(&mut self, now: f64, timing: &TimingTuning, sound: &mut dyn SoundSink) {
        if self.finished || self.timer.elapsed(now) < timing.fade_interval {
            return;
        }
        self.timer.restart(now);
        self.step(timing, sound);
    }

    pub fn step(&mut self, timing: &TimingTuning, sound: &mut dyn SoundSink) {
        if self.helicopter_started {
            if self.helicopter_volume < timing.fade_helicopter_max {
                if self.helicopter_volume == 0.0 {
                    sound.play(Cue::Helicopter);
                }
                self.helicopter_volume += timing.fade_helicopter_step;
                sound.set_volume(Cue::Helicopter, self.helicopter_volume.min(timing.fade_helicopter_max));
            } else {
                self.finished = true;
            }
            return;
        }

        if self.background_volume > 0.0 {
            self.background_volume -= timing.fade_music_step;
            sound.set_volume(Cue::BackgroundMusic, self.background_volume.max(0.0));
            if self.background_volume <= 0.0 {
                sound.stop(Cue::BackgroundMusic);
                self.helicopter_started = true;
            }
        } else {
            self.helicopter_started = true;
        }
    }
}
