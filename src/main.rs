mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use escape_mission::audio::SoundBank;
use escape_mission::compute::{tick, update_input, Sinks};
use escape_mission::config::GameConfig;
use escape_mission::effects::ParticleSystem;
use escape_mission::entities::GameMode;
use escape_mission::error::Result as GameResult;
use escape_mission::level::LevelLayout;
use escape_mission::player::ControlInput;
use escape_mission::state::{GameState, InputEvent, MenuAction};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// How far one arrow press moves a volume slider.
const SLIDER_STEP: f32 = 5.0;

/// Longest step fed to the simulation, so a stalled terminal does not
/// teleport everything on the next frame.
const MAX_DT: f32 = 0.1;

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Frames a movement key stays held after its last press or repeat event.
/// Terminals without key-release support only send repeats, and those arrive
/// faster than this window (about 133 ms) expires.
const HOLD_WINDOW: u64 = 4;

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

fn held_controls(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> ControlInput {
    ControlInput {
        left: is_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: is_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        climb: is_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
        jump: is_held(key_frame, &[KeyCode::Char(' ')], frame),
        fire: is_held(key_frame, &[KeyCode::Char('j'), KeyCode::Char('J'), KeyCode::Char('f'), KeyCode::Char('F')], frame),
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Logs go to a file; the terminal belongs to the game.
fn init_logging() {
    let path = std::env::var_os("ESCAPE_MISSION_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("escape_mission.log"));
    let Ok(file) = File::create(&path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("logging to {}", path.display());
}

/// `escape_mission [config.ron] [level.ron]`
fn load_inputs() -> GameResult<(GameConfig, LevelLayout)> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(Path::new(&path))?,
        None => GameConfig::default(),
    };
    let layout = match args.next() {
        Some(path) => LevelLayout::load(Path::new(&path))?,
        None => LevelLayout::demo()?,
    };
    Ok((config, layout))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player picks Exit or presses Q / Ctrl-C.
///
/// Held keys (movement, jump, fire) go through the `key_frame` map and are
/// sampled once per frame; one-shot keys (Esc, Enter, digits, and the
/// arrows on the options screen) are handled as they arrive.
fn game_loop<W: Write>(out: &mut W, state: &mut GameState, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut sound = SoundBank::default();
    let mut particles = ParticleSystem::default();

    state.apply_volume_settings(&mut sound);
    state.set_mode(GameMode::Menu, &mut sound);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                            KeyCode::Esc => state.handle_event(InputEvent::Escape, &mut rng, &mut sound),
                            KeyCode::Enter => state.handle_event(InputEvent::LeftClick, &mut rng, &mut sound),
                            KeyCode::Up => state.select_slider(-1),
                            KeyCode::Down => state.select_slider(1),
                            KeyCode::Left => state.adjust_volume(-SLIDER_STEP, &mut sound),
                            KeyCode::Right => state.adjust_volume(SLIDER_STEP, &mut sound),
                            KeyCode::Char(c @ '1'..='9') => {
                                let slot = c as usize - '1' as usize;
                                if let Some(&action) = MenuAction::visible_in(state.mode).get(slot) {
                                    state.apply_menu_action(action, &mut rng, &mut sound);
                                }
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), .. }) => {
                    state.handle_event(InputEvent::LeftClick, &mut rng, &mut sound);
                }
                _ => {}
            }
        }

        if state.mode == GameMode::Exit {
            return Ok(());
        }
        if state.mode == GameMode::Menu {
            particles.clear();
        }

        let dt = last_tick.elapsed().as_secs_f32().min(MAX_DT);
        last_tick = Instant::now();

        let input = held_controls(&key_frame, frame);
        let mut sinks = Sinks::new(&mut sound, &mut particles);
        update_input(state, &input, dt, &mut sinks);
        tick(state, dt, &mut sinks);

        display::render(out, state, &sound, &particles)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();

    let (config, layout) = match load_inputs() {
        Ok(inputs) => inputs,
        Err(err) => {
            log::error!("{err}");
            eprintln!("escape_mission: {err}");
            std::process::exit(1);
        }
    };
    let mut state = GameState::new(config, layout, &mut thread_rng());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    // Blocking reads happen on their own thread; the loop drains the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut state, &rx);
    if let Err(err) = &result {
        log::error!("terminal error: {err}");
    }

    // Restore the terminal whatever the loop returned.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!("bye");
    result
}
