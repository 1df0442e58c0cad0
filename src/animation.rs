/// Frame-index bookkeeping for sprite-sheet animations.
///
/// The clock owns the ordered sub-image rectangles of one animation and a
/// fractional cursor advanced at `speed` frames per second.

use crate::geometry::Rect;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationClock {
    frames: Vec<Rect>,
    speed: f32,
    cursor: f32,
    stop_at_last: bool,
    finished: bool,
}

impl AnimationClock {
    /// A looping animation.
    pub fn looping(frames: Vec<Rect>, speed: f32) -> Self {
        Self { frames, speed, ..Self::default() }
    }

    /// An animation that holds its last frame once reached.
    pub fn once(frames: Vec<Rect>, speed: f32) -> Self {
        Self { frames, speed, stop_at_last: true, ..Self::default() }
    }

    /// `count` frames of `size` laid out left to right starting at `origin`.
    pub fn strip(origin: (f32, f32), size: (f32, f32), count: usize) -> Vec<Rect> {
        (0..count)
            .map(|i| Rect::new(origin.0 + size.0 * i as f32, origin.1, size.0, size.1))
            .collect()
    }

    pub fn advance(&mut self, dt: f32) {
        if self.frames.is_empty() || self.finished {
            return;
        }

        self.cursor += self.speed * dt;

        let len = self.frames.len() as f32;
        if self.cursor >= len {
            if self.stop_at_last {
                self.cursor = len - 1.0;
                self.finished = true;
            } else {
                self.cursor = 0.0;
            }
        }
    }

    /// Jump to frame `index` (clamped to the frame range) and clear `finished`.
    pub fn set_frame(&mut self, index: usize) {
        let last = self.frames.len().saturating_sub(1);
        self.cursor = index.min(last) as f32;
        self.finished = false;
    }

    pub fn current_frame(&self) -> Option<Rect> {
        self.frames.get(self.index()).copied()
    }

    pub fn index(&self) -> usize {
        self.cursor.floor() as usize
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drop frames and speed along with the playback state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
