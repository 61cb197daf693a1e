mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use is_shifty::config::Settings;
use is_shifty::entities::ItemKind;
use is_shifty::events::GameEvent;
use is_shifty::input::{Action, ActionSet, InputFrame};
use is_shifty::level::LevelData;
use is_shifty::session::Session;

use display::{Overlay, CELL};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

const LEVELS: [&str; 3] = [
    include_str!("../levels/level1.json"),
    include_str!("../levels/level2.json"),
    include_str!("../levels/level3.json"),
];

// ── Held-key detection ────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Terminals without release events rely on OS key repeat
/// (≥ 15 Hz) to keep refreshing it, so 8 frames (≈130 ms) covers the gap.
const HOLD_WINDOW: u64 = 8;

/// How long a feedback message stays on screen.
const TOAST_FRAMES: u64 = 90;

/// Returns true if `symbol` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<String, u64>, symbol: &str, frame: u64) -> bool {
    key_frame
        .get(symbol)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Binding symbol for a key code, as stored in the settings file.
fn key_symbol(code: &KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(' ') => Some("space".to_string()),
        KeyCode::Char(c) => Some(c.to_ascii_lowercase().to_string()),
        _ => None,
    }
}

fn held_actions(settings: &Settings, key_frame: &HashMap<String, u64>, frame: u64) -> ActionSet {
    let mut held = ActionSet::empty();
    for action in Action::ALL {
        if is_held(key_frame, settings.controls.symbol(action), frame) {
            held.insert(action);
        }
    }
    held
}

// ── Persistence & logging ─────────────────────────────────────────────────────

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

fn settings_path() -> PathBuf {
    home_dir().join(".is_shifty.json")
}

fn save_settings(settings: &Settings) {
    if let Err(e) = settings.save(&settings_path()) {
        warn!(error = %e, "could not save settings");
    }
}

/// Log to a file; the terminal belongs to the game. `RUST_LOG` overrides the
/// default `info` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let path = std::env::temp_dir().join("is_shifty.log");
    if let Ok(file) = File::create(path) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
}

fn load_levels() -> io::Result<Vec<LevelData>> {
    LEVELS
        .iter()
        .map(|text| {
            LevelData::from_json(text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        })
        .collect()
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Controls,
    ToggleHud,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
) -> io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "▲  IS  SHIFTY  ▲";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(7),
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(title))?;

    let scores = settings.high_scores.entries();
    if settings.high_scores.best() > 0 {
        out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(5)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print("High scores:"))?;
        for (i, score) in scores.iter().take(5).filter(|&&s| s > 0).enumerate() {
            out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(4) + i as u16))?;
            out.queue(Print(format!("{:>2}. {:>6}", i + 1, score)))?;
        }
    }

    let options: &[(&str, &str)] = &[
        ("1", "New game"),
        ("2", "Controls"),
        ("3", "Toggle HUD"),
        ("Q", "Quit"),
    ];
    for (i, (key, label)) in options.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 2 + i as u16))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(label))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        if let Ok(Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        })) = rx.recv()
        {
            match code {
                KeyCode::Char('1') | KeyCode::Enter => return Ok(MenuResult::Start),
                KeyCode::Char('2') => return Ok(MenuResult::Controls),
                KeyCode::Char('3') => return Ok(MenuResult::ToggleHud),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

/// Pick an action by number, then press the key to bind it to.
fn controls_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &mut Settings,
) -> io::Result<()> {
    let mut selected: Option<Action> = None;
    let mut message = String::new();

    loop {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        out.queue(cursor::MoveTo(2, 1))?;
        out.queue(style::SetForegroundColor(Color::Green))?;
        out.queue(Print("Controls  (number selects, Esc returns)"))?;

        for (i, action) in Action::ALL.iter().enumerate() {
            let marker = if selected == Some(*action) { ">" } else { " " };
            out.queue(cursor::MoveTo(2, 3 + i as u16))?;
            out.queue(style::SetForegroundColor(Color::White))?;
            out.queue(Print(format!(
                "{} [{}] {:<10} {}",
                marker,
                i + 1,
                format!("{:?}", action),
                settings.controls.symbol(*action)
            )))?;
        }
        out.queue(cursor::MoveTo(2, 4 + Action::ALL.len() as u16))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&message))?;
        out.queue(style::ResetColor)?;
        out.flush()?;

        let Ok(Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        })) = rx.recv()
        else {
            continue;
        };

        match (selected, code) {
            (_, KeyCode::Esc) => {
                save_settings(settings);
                return Ok(());
            }
            (None, KeyCode::Char(c)) => {
                selected = c
                    .to_digit(10)
                    .and_then(|d| Action::ALL.get((d as usize).wrapping_sub(1)))
                    .copied();
                message = match selected {
                    Some(action) => format!("Press a key for {:?}", action),
                    None => String::new(),
                };
            }
            (Some(action), code) => {
                message = match key_symbol(&code) {
                    Some(symbol) => match settings.controls.rebind(action, &symbol) {
                        Ok(()) => {
                            info!(?action, %symbol, "control rebound");
                            format!("{:?} is now '{}'", action, symbol)
                        }
                        Err(e) => e.to_string(),
                    },
                    None => "That key cannot be bound".to_string(),
                };
                selected = None;
            }
            _ => {}
        }
    }
}

fn toggle_hud(settings: &mut Settings) {
    // Cycles through: everything on → FPS off → timer off → all back on.
    if settings.show_fps {
        settings.show_fps = false;
    } else if settings.show_game_timer {
        settings.show_game_timer = false;
    } else {
        settings.show_fps = true;
        settings.show_game_timer = true;
    }
    save_settings(settings);
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Feedback text for events that have no other on-screen cue.
fn toast_for(event: &GameEvent) -> Option<&'static str> {
    match event {
        GameEvent::SwitchFail => Some("You need a key"),
        GameEvent::SwitchSuccess => Some("Door unlocked"),
        GameEvent::Pickup(ItemKind::Key) => Some("Got a key"),
        GameEvent::LevelStart { .. } => Some("Find the exit"),
        _ => None,
    }
}

/// Returns `true` → quit program, `false` → back to menu.
///
/// `key_frame` records the frame each binding symbol
/// was last pressed or repeated, and the set of still-fresh symbols becomes
/// this frame's held actions. Diffing against the previous frame yields the
/// pressed/released edges the player controller needs for jump and jump-cut.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    settings: &mut Settings,
    rx: &mpsc::Receiver<Event>,
) -> io::Result<bool> {
    let mut key_frame: HashMap<String, u64> = HashMap::new();
    let mut previous = ActionSet::empty();
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();
    let mut fps_window = (Instant::now(), 0u32);
    let mut fps = 0u32;
    let mut toast: Option<(&'static str, u64)> = None;
    let mut score_submitted = false;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Esc => return Ok(false),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Tab if !session.is_over() => {
                            session.set_paused(!session.is_paused());
                        }
                        KeyCode::Enter if session.is_over() => {
                            session.restart();
                            score_submitted = false;
                        }
                        _ => {}
                    }
                    if let Some(symbol) = key_symbol(&code) {
                        key_frame.insert(symbol, frame);
                    }
                }
                KeyEventKind::Repeat => {
                    if let Some(symbol) = key_symbol(&code) {
                        key_frame.insert(symbol, frame);
                    }
                }
                KeyEventKind::Release => {
                    if let Some(symbol) = key_symbol(&code) {
                        key_frame.remove(&symbol);
                    }
                }
            }
        }

        let held = held_actions(settings, &key_frame, frame);
        let input = InputFrame::from_held(previous, held);
        previous = held;

        session.frame(last_frame.elapsed(), &input);
        last_frame = Instant::now();

        for event in session.take_events() {
            debug!(?event, "feedback");
            if let Some(text) = toast_for(&event) {
                toast = Some((text, frame));
            }
        }
        if toast.is_some_and(|(_, at)| frame.saturating_sub(at) > TOAST_FRAMES) {
            toast = None;
        }

        if session.is_over() && !score_submitted {
            score_submitted = true;
            if settings.high_scores.submit(session.final_score()) {
                info!(score = session.final_score(), "new high score");
                save_settings(settings);
            }
        }

        fps_window.1 += 1;
        if fps_window.0.elapsed() >= Duration::from_secs(1) {
            fps = fps_window.1;
            fps_window = (Instant::now(), 0);
        }

        let overlay = Overlay {
            hud: settings.hud(),
            fps,
            best_score: settings.high_scores.best(),
            toast: toast.map(|(text, _)| text),
        };
        display::render(out, session, &overlay)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    init_logging();
    let levels = load_levels()?;
    let mut settings = match Settings::load(&settings_path()) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "settings unreadable, using defaults");
            Settings::default()
        }
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key release events where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread; the game loop only polls.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &mut settings, levels);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!(error = %e, "exiting with error");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &mut Settings,
    levels: Vec<LevelData>,
) -> io::Result<()> {
    loop {
        match show_menu(out, rx, settings)? {
            MenuResult::Quit => break,
            MenuResult::Controls => controls_menu(out, rx, settings)?,
            MenuResult::ToggleHud => toggle_hud(settings),
            MenuResult::Start => {
                let (cols, rows) = terminal::size()?;
                let config = settings.sim_config(display::viewport_for(cols, rows));
                let mut session = Session::new(config, levels.clone())
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                info!(cell_w = CELL.x, cell_h = CELL.y, "game started");

                if game_loop(out, &mut session, settings, rx)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
