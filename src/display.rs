/// Rendering layer. All terminal I/O lives here.
///
/// The camera rectangle is squeezed into the terminal's play area: every
/// world rectangle becomes a block of cells. No game logic is performed;
/// this module only translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use escape_mission::audio::{SoundBank, VolumeGroup, SLIDER_MAX};
use escape_mission::dialogue::DIALOGUE_FRAMES;
use escape_mission::effects::{Effect, ParticleSystem};
use escape_mission::entities::{Affinity, EnemyKind, GameMode, GruntVariant, KeyColor};
use escape_mission::geometry::Rect;
use escape_mission::state::{GameState, MenuAction};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_MISSION: Color = Color::Yellow;
const C_HUD_AUDIO: Color = Color::DarkGrey;
const C_OBSTACLE: Color = Color::Grey;
const C_LAVA: Color = Color::DarkRed;
const C_SPIKES: Color = Color::White;
const C_LADDER: Color = Color::DarkYellow;
const C_GATE: Color = Color::DarkCyan;
const C_PLAYER: Color = Color::White;
const C_BOSS: Color = Color::Magenta;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HEALING: Color = Color::Green;
const C_PARTICLE: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// First and last terminal rows reserved for the HUD and the hint line.
const HUD_ROWS: u16 = 2;
const HINT_ROWS: u16 = 2;

// ── Cell grid ─────────────────────────────────────────────────────────────────

/// Play-area cells, filled back to front and printed row by row.
struct Canvas {
    view: Rect,
    cols: usize,
    rows: usize,
    cells: Vec<(char, Color)>,
}

impl Canvas {
    fn new(view: Rect, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2) as usize;
        let rows = height.saturating_sub(HUD_ROWS + HINT_ROWS) as usize;
        Self { view, cols, rows, cells: vec![(' ', Color::Reset); cols * rows] }
    }

    fn cell_of(&self, x: f32, y: f32) -> (isize, isize) {
        let cx = (x - self.view.left) / self.view.width * self.cols as f32;
        let cy = (y - self.view.top) / self.view.height * self.rows as f32;
        (cx.floor() as isize, cy.floor() as isize)
    }

    /// Fill every cell `rect` touches; tiny rects still get one cell.
    fn fill(&mut self, rect: &Rect, glyph: char, color: Color) {
        if self.cols == 0 || self.rows == 0 || !self.view.intersects(rect) {
            return;
        }
        let (c0, r0) = self.cell_of(rect.left, rect.top);
        let (c1, r1) = self.cell_of(rect.right(), rect.bottom());
        for row in r0.max(0)..=r1.max(r0).min(self.rows as isize - 1) {
            for col in c0.max(0)..=c1.max(c0).min(self.cols as isize - 1) {
                self.cells[row as usize * self.cols + col as usize] = (glyph, color);
            }
        }
    }

    fn point(&mut self, x: f32, y: f32, glyph: char, color: Color) {
        let (col, row) = self.cell_of(x, y);
        if (0..self.cols as isize).contains(&col) && (0..self.rows as isize).contains(&row) {
            self.cells[row as usize * self.cols + col as usize] = (glyph, color);
        }
    }

    fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for (r, line) in self.cells.chunks(self.cols.max(1)).enumerate() {
            out.queue(cursor::MoveTo(1, HUD_ROWS + r as u16))?;
            let mut current = None;
            for &(glyph, color) in line {
                if current != Some(color) {
                    out.queue(style::SetForegroundColor(color))?;
                    current = Some(color);
                }
                out.queue(Print(glyph))?;
            }
        }
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    sound: &SoundBank,
    particles: &ParticleSystem,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.mode {
        GameMode::Menu | GameMode::Pause | GameMode::Options => draw_buttons(out, state, width, height)?,
        GameMode::IntroDialogue => draw_dialogue(out, state, width, height)?,
        GameMode::MissionCompleted => draw_credits(out, state, width, height)?,
        GameMode::Exit => {}
        GameMode::Playing | GameMode::EscapeRoute | GameMode::GameOver => {
            draw_border(out, width, height)?;
            draw_world(out, state, particles, width, height)?;
            draw_hud(out, state, sound, width)?;
            if state.mode == GameMode::GameOver {
                draw_game_over(out, state, width, height)?;
            }
        }
    }

    draw_controls_hint(out, state, height)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, HUD_ROWS - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(HINT_ROWS)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in HUD_ROWS..height.saturating_sub(HINT_ROWS) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, sound: &SoundBank, width: u16) -> std::io::Result<()> {
    let health = &state.player.pawn.health;
    let bars = (health.fraction() * 10.0).round() as usize;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("HP [{}{}] {:>3.0}", "♥".repeat(bars), " ".repeat(10 - bars.min(10)), health.current.max(0.0))))?;

    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("  Keys:"))?;
    for key in &state.found_keys {
        out.queue(style::SetForegroundColor(key_color(key.color)))?;
        out.queue(Print("⚷"))?;
    }

    let mission = state.mission_stage.text();
    let mx = (width / 2).saturating_sub(mission.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(mx.max(32), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_MISSION))?;
    out.queue(Print(mission))?;

    let music = sound.current_music().map(|name| {
        let volume = sound.effective_volume(name).unwrap_or(0.0);
        format!("♪ {name} {volume:.1}")
    });
    let audio = match (music, sound.last_cue) {
        (Some(music), Some(cue)) => format!("{} · {}", music, cue.name()),
        (Some(music), None) => music,
        (None, Some(cue)) => format!("· {}", cue.name()),
        (None, None) => String::new(),
    };
    let ax = width.saturating_sub(audio.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(ax, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_AUDIO))?;
    out.queue(Print(&audio))?;
    Ok(())
}

fn key_color(color: KeyColor) -> Color {
    match color {
        KeyColor::Red => Color::Red,
        KeyColor::Green => Color::Green,
        KeyColor::Yellow => Color::Yellow,
        KeyColor::Undetermined => Color::DarkGrey,
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_world<W: Write>(
    out: &mut W,
    state: &GameState,
    particles: &ParticleSystem,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let mut canvas = Canvas::new(state.camera, width, height);
    let map = &state.map;

    for ladder in &map.ladders {
        canvas.fill(ladder, 'H', C_LADDER);
    }
    for obstacle in &map.obstacles {
        canvas.fill(obstacle, '#', C_OBSTACLE);
    }
    for lava in &map.lava {
        canvas.fill(lava, '~', C_LAVA);
    }
    for spikes in &map.spikes {
        canvas.fill(spikes, '^', C_SPIKES);
    }
    canvas.fill(&state.gate.rect(), if state.gate.opened { '.' } else { '|' }, C_GATE);

    for chest in &state.chests {
        canvas.fill(&chest.rect, if chest.opened { 'u' } else { '▣' }, key_color(chest.color));
    }
    for item in state.healing.iter().filter(|h| !h.consumed) {
        canvas.fill(&item.rect, '+', C_HEALING);
    }
    for key in &state.keys {
        canvas.fill(&key.rect(), 'k', key_color(key.color));
    }

    for enemy in &state.enemies {
        let (glyph, color) = match enemy.kind {
            EnemyKind::Boss => ('B', C_BOSS),
            EnemyKind::Grunt(GruntVariant::Green) => ('e', Color::Green),
            EnemyKind::Grunt(GruntVariant::Red) => ('e', Color::Red),
            EnemyKind::Grunt(GruntVariant::Blue) => ('e', Color::Blue),
        };
        canvas.fill(&enemy.rect(), glyph, color);
    }

    let player_glyph = if state.player.dead { 'x' } else { '@' };
    canvas.fill(&state.player.rect(), player_glyph, C_PLAYER);

    for bullet in &state.bullets {
        let (glyph, color) = match bullet.affinity {
            Affinity::AtEnemy => ('-', C_BULLET_PLAYER),
            Affinity::AtPlayer => ('•', C_BULLET_ENEMY),
        };
        canvas.point(bullet.actor.position.x, bullet.actor.position.y, glyph, color);
    }

    for particle in &particles.particles {
        let glyph = match particle.effect {
            Effect::BulletDestroy => '*',
            Effect::RocketDestroy => '✸',
            Effect::MuzzleFlash => '›',
        };
        canvas.point(particle.position.x, particle.position.y, glyph, C_PARTICLE);
    }

    canvas.flush(out)
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn centered<W: Write>(out: &mut W, width: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_buttons<W: Write>(out: &mut W, state: &GameState, width: u16, height: u16) -> std::io::Result<()> {
    let title = match state.mode {
        GameMode::Pause => "‖  PAUSED  ‖",
        GameMode::Options => "⚙  OPTIONS  ⚙",
        _ => "★  ESCAPE  MISSION  ★",
    };
    let cy = height / 2;
    centered(out, width, cy.saturating_sub(4), title, Color::Cyan)?;

    for (i, action) in MenuAction::visible_in(state.mode).iter().enumerate() {
        let label = format!("[{}] {}", i + 1, action.name());
        centered(out, width, cy.saturating_sub(1) + i as u16, &label, Color::White)?;
    }
    if state.mode == GameMode::Options {
        draw_sliders(out, state, width, cy + 1)?;
    }
    Ok(())
}

fn draw_sliders<W: Write>(out: &mut W, state: &GameState, width: u16, top: u16) -> std::io::Result<()> {
    for (i, group) in VolumeGroup::ALL.into_iter().enumerate() {
        let level = state.volume.level(group);
        let filled = (level / SLIDER_MAX * 10.0).round() as usize;
        let selected = state.volume.selected == group;
        let line = format!(
            "{} {:<9} [{}{}] {:>2.0}",
            if selected { '▶' } else { ' ' },
            group.name(),
            "■".repeat(filled),
            "·".repeat(10 - filled.min(10)),
            level
        );
        let color = if selected { Color::Yellow } else { Color::White };
        centered(out, width, top + i as u16, &line, color)?;
    }
    Ok(())
}

fn draw_dialogue<W: Write>(out: &mut W, state: &GameState, width: u16, height: u16) -> std::io::Result<()> {
    const LINES: [&str; DIALOGUE_FRAMES] = [
        "» Incoming message...",
        "» The base has three chests. Each hides part of the gate code.",
        "» The bosses carry the keys. Red, green, yellow, in that order.",
        "» Open all three and the gate on the east side will unlock.",
        "» The helicopter waits beyond the gate. Don't be late.",
        "» Device off.",
    ];
    let panel = state.dialogue.panel().min(DIALOGUE_FRAMES - 1);
    let cy = height / 2;
    centered(out, width, cy.saturating_sub(2), &format!("{} / {}", panel + 1, DIALOGUE_FRAMES), C_HINT)?;
    centered(out, width, cy, LINES[panel], Color::Green)?;
    Ok(())
}

fn draw_credits<W: Write>(out: &mut W, state: &GameState, width: u16, height: u16) -> std::io::Result<()> {
    let cy = height / 2;
    centered(out, width, cy.saturating_sub(3), "╔══════════════════════╗", Color::Green)?;
    centered(out, width, cy.saturating_sub(2), "║  MISSION COMPLETED   ║", Color::Green)?;
    centered(out, width, cy.saturating_sub(1), "╚══════════════════════╝", Color::Green)?;

    let waited = state.credits_timer.elapsed(state.clock);
    let delay = state.config.timing.credits_delay;
    let hint = if waited >= delay {
        "Click to return to the menu".to_string()
    } else {
        format!("Credits... {:>2.0}s", (delay - waited).ceil())
    };
    centered(out, width, cy + 1, &hint, Color::White)
}

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, width: u16, height: u16) -> std::io::Result<()> {
    let cy = height / 2;
    centered(out, width, cy.saturating_sub(2), "╔════════════════════╗", Color::Red)?;
    centered(out, width, cy.saturating_sub(1), "║    GAME  OVER      ║", Color::Red)?;
    centered(out, width, cy, "╚════════════════════╝", Color::Red)?;

    if state.game_over_timer.elapsed(state.clock) >= state.config.timing.game_over_delay {
        centered(out, width, cy + 1, "Click to return to the menu", Color::White)?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState, height: u16) -> std::io::Result<()> {
    let hint = match state.mode {
        GameMode::Options => "↑ ↓ : Slider   ← → : Volume   1 : Close   Q : Quit",
        GameMode::Menu | GameMode::Pause => "1-3 : Choose   Q : Quit",
        GameMode::IntroDialogue => "ENTER : Next   ESC : Pause",
        _ => "← → / A D : Move   W : Climb   SPACE : Jump   J : Shoot   ESC : Pause",
    };
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
