/// The radio conversation shown before the first level.
///
/// Six panels advanced by clicking. Once the last panel has been on screen
/// for `hold` seconds, the next click finishes the dialogue.

use crate::animation::AnimationClock;
use crate::audio::{Cue, SoundSink};
use crate::timer::Timer;

pub const DIALOGUE_FRAMES: usize = 6;

/// Panels before this index beep; the last advance switches the device off.
const LAST_SMS_PANEL: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct IntroDialogue {
    panels: AnimationClock,
    switched: Timer,
    hold: f32,
    finished: bool,
}

impl IntroDialogue {
    pub fn new(hold: f32) -> Self {
        Self {
            panels: AnimationClock::once(AnimationClock::strip((0.0, 0.0), (1356.0, 841.0), DIALOGUE_FRAMES), 0.0),
            switched: Timer::default(),
            hold,
            finished: false,
        }
    }

    pub fn panel(&self) -> usize {
        self.panels.index()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance to the next panel, or finish if the last one has been held.
    pub fn switch_next_frame(&mut self, now: f64, sound: &mut dyn SoundSink) {
        let current = self.panels.index();
        if current + 1 < self.panels.len() {
            sound.play(if current < LAST_SMS_PANEL { Cue::SmsDialogue } else { Cue::OffDialogueDevice });
            self.panels.set_frame(current + 1);
            self.switched.restart(now);
        } else if self.switched.elapsed(now) >= self.hold {
            log::debug!("intro dialogue finished");
            self.finished = true;
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.panels.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSound;

    #[test]
    fn clicks_walk_every_panel_then_finish_after_hold() {
        let mut dialogue = IntroDialogue::new(2.0);
        let mut sound = RecordingSound::default();

        for i in 0..DIALOGUE_FRAMES - 1 {
            dialogue.switch_next_frame(i as f64, &mut sound);
        }
        assert_eq!(dialogue.panel(), DIALOGUE_FRAMES - 1);
        assert_eq!(sound.plays(Cue::SmsDialogue), 4);
        assert_eq!(sound.plays(Cue::OffDialogueDevice), 1);

        // Last panel switched at t=4; a click at t=5 is too early.
        dialogue.switch_next_frame(5.0, &mut sound);
        assert!(!dialogue.is_finished());
        dialogue.switch_next_frame(6.0, &mut sound);
        assert!(dialogue.is_finished());
    }
}
