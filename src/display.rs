//! Rendering layer: all terminal output lives here.
//!
//! Level space is in pixels; each terminal cell covers `CELL` pixels. Row 0
//! is the HUD, the last row the controls hint, everything between is the
//! camera's view. Nothing here changes game state.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;
use is_shifty::camera::Camera;
use is_shifty::config::HudFlags;
use is_shifty::constants::PLAYER_MAX_HEALTH;
use is_shifty::entities::{GameStatus, ItemKind};
use is_shifty::geometry::{ObstacleKind, Rect};
use is_shifty::hazard::HazardKind;
use is_shifty::input::Action;
use is_shifty::player::PlayerState;
use is_shifty::session::Session;

/// Pixels per terminal cell.
pub const CELL: Vec2 = Vec2::new(16.0, 32.0);

const HUD_ROWS: u16 = 1;
const HINT_ROWS: u16 = 1;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GROUND: Color = Color::DarkGrey;
const C_LIMIT: Color = Color::DarkBlue;
const C_DOOR: Color = Color::DarkYellow;
const C_ACID: Color = Color::Green;
const C_SPIKES: Color = Color::Grey;
const C_SAW: Color = Color::Red;
const C_BEAM: Color = Color::Red;
const C_MACHINE: Color = Color::Magenta;
const C_RECEIVER_ON: Color = Color::Green;
const C_RECEIVER_OFF: Color = Color::DarkRed;
const C_LEVER: Color = Color::Yellow;
const C_SWITCH: Color = Color::Cyan;
const C_EXIT: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HURT: Color = Color::Red;
const C_ZOMBIE: Color = Color::DarkGreen;
const C_BULLET: Color = Color::Yellow;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_GUN: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Viewport in level pixels for a terminal of `cols` x `rows`.
pub fn viewport_for(cols: u16, rows: u16) -> Vec2 {
    let play_rows = rows.saturating_sub(HUD_ROWS + HINT_ROWS).max(1);
    Vec2::new(cols.max(1) as f32 * CELL.x, play_rows as f32 * CELL.y)
}

/// What the front-end adds on top of the session when drawing a frame.
pub struct Overlay<'a> {
    pub hud: HudFlags,
    pub fps: u32,
    pub best_score: u32,
    pub toast: Option<&'a str>,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, session: &Session, overlay: &Overlay) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let view = View {
        camera: session.camera(),
        cols,
        rows: rows.saturating_sub(HUD_ROWS + HINT_ROWS),
    };
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_level(out, &view, session)?;
    draw_actors(out, &view, session)?;
    draw_hud(out, cols, session, overlay)?;
    draw_controls_hint(out, rows, session)?;

    if let Some(toast) = overlay.toast {
        draw_centered(out, cols, HUD_ROWS + 1, toast, Color::White)?;
    }
    if session.is_paused() {
        draw_centered(out, cols, rows / 2, "PAUSED  (Tab to resume)", Color::White)?;
    }
    if session.is_over() {
        draw_end_screen(out, cols, rows, session, overlay.best_score)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Level-space drawing ───────────────────────────────────────────────────────

struct View<'a> {
    camera: &'a Camera,
    cols: u16,
    rows: u16,
}

impl View<'_> {
    /// Screen cells covered by `rect`, clipped to the play area.
    fn cells(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let screen = self.camera.apply(rect);
        let x0 = (screen.left() / CELL.x).floor().max(0.0);
        let x1 = (screen.right() / CELL.x).ceil().min(self.cols as f32);
        let y0 = (screen.top() / CELL.y).floor().max(0.0);
        let y1 = (screen.bottom() / CELL.y).ceil().min(self.rows as f32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u16, x1 as u16, y0 as u16 + HUD_ROWS, y1 as u16 + HUD_ROWS))
    }

    fn fill<W: Write>(
        &self,
        out: &mut W,
        rect: &Rect,
        glyph: char,
        color: Color,
    ) -> std::io::Result<()> {
        let Some((x0, x1, y0, y1)) = self.cells(rect) else {
            return Ok(());
        };
        let row: String = std::iter::repeat(glyph).take((x1 - x0) as usize).collect();
        out.queue(style::SetForegroundColor(color))?;
        for y in y0..y1 {
            out.queue(cursor::MoveTo(x0, y))?;
            out.queue(Print(&row))?;
        }
        Ok(())
    }

    /// Single glyph at the top-left cell of `rect`, used for small props.
    fn mark<W: Write>(
        &self,
        out: &mut W,
        rect: &Rect,
        glyph: &str,
        color: Color,
    ) -> std::io::Result<()> {
        if let Some((x0, _, y0, _)) = self.cells(rect) {
            out.queue(cursor::MoveTo(x0, y0))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
        Ok(())
    }
}

fn draw_level<W: Write>(out: &mut W, view: &View, session: &Session) -> std::io::Result<()> {
    let world = session.world();

    for obstacle in world.collision.obstacles() {
        match obstacle.kind {
            ObstacleKind::Ground => view.fill(out, &obstacle.rect, '█', C_GROUND)?,
            ObstacleKind::ScreenLimit => view.fill(out, &obstacle.rect, '░', C_LIMIT)?,
            ObstacleKind::ZombieBoundary => {}
        }
    }
    for door in world.puzzle.doors().iter().filter(|d| !d.open) {
        view.fill(out, &door.rect, '▓', C_DOOR)?;
    }
    for hazard in &world.hazards {
        match hazard.kind {
            HazardKind::Acid => view.fill(out, &hazard.rect, '~', C_ACID)?,
            HazardKind::Spikes => view.fill(out, &hazard.rect, '^', C_SPIKES)?,
            HazardKind::Saw => view.fill(out, &hazard.rect, '✹', C_SAW)?,
        }
    }

    for beam in world.puzzle.active_beams() {
        let glyph = if beam.rect.size.x >= beam.rect.size.y { '═' } else { '║' };
        view.fill(out, &beam.rect, glyph, C_BEAM)?;
    }
    for machine in world.puzzle.machines() {
        let glyph = if machine.on { "◉" } else { "○" };
        view.mark(out, &machine.rect, glyph, C_MACHINE)?;
    }
    for receiver in world.puzzle.receivers() {
        let color = if receiver.satisfied { C_RECEIVER_ON } else { C_RECEIVER_OFF };
        view.mark(out, &receiver.rect, "◎", color)?;
    }
    for lever in world.puzzle.levers() {
        let glyph = if lever.on { "/" } else { "\\" };
        view.mark(out, &lever.rect, glyph, C_LEVER)?;
    }
    for switch in world.puzzle.switches() {
        let glyph = if switch.unlocked { "▣" } else { "□" };
        view.mark(out, &switch.rect, glyph, C_SWITCH)?;
    }

    for item in &world.items {
        let (glyph, color) = match item.kind {
            ItemKind::Health => ("+", Color::Red),
            ItemKind::Coin => ("$", Color::Yellow),
            ItemKind::Key => ("⚷", Color::Cyan),
        };
        view.mark(out, &item.rect(), glyph, color)?;
    }
    for exit in &world.exits {
        view.fill(out, &exit.rect, '⇥', C_EXIT)?;
    }
    Ok(())
}

fn draw_actors<W: Write>(out: &mut W, view: &View, session: &Session) -> std::io::Result<()> {
    let world = session.world();

    for shot in &world.projectiles {
        view.mark(out, &shot.rect(), "-", C_BULLET)?;
    }

    for zombie in &world.zombies {
        let glyph = if zombie.is_alive() { 'Z' } else { 'x' };
        view.fill(out, &zombie.rect(), glyph, C_ZOMBIE)?;
        if zombie.health_bar_visible() {
            let above = zombie.rect().translated(Vec2::new(0.0, -CELL.y));
            view.mark(out, &above, &format!("{:>3}", zombie.health), C_HUD_HEALTH)?;
        }
    }

    let player = session.player();
    let glyph = match player.state {
        PlayerState::Dead => 'X',
        PlayerState::Slide => '_',
        _ if player.is_shooting() => '»',
        _ => '@',
    };
    let color = if player.is_invulnerable() { C_PLAYER_HURT } else { C_PLAYER };
    view.fill(out, &player.rect(), glyph, color)
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    cols: u16,
    session: &Session,
    overlay: &Overlay,
) -> std::io::Result<()> {
    let player = session.player();
    let hud = &overlay.hud;
    out.queue(cursor::MoveTo(1, 0))?;

    if hud.show_health {
        out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
        let health = player.health() as f32 / PLAYER_MAX_HEALTH as f32;
        out.queue(Print(format!("HP {} ", bar(health, 10))))?;
    }
    if hud.show_score {
        out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        out.queue(Print(format!("Score:{:>6}  ", player.score())))?;
    }
    if hud.show_gun_bar {
        out.queue(style::SetForegroundColor(C_HUD_GUN))?;
        out.queue(Print(format!(
            "Gun {} {}  ",
            player.gun_tier(),
            bar(player.gun_progress(), 6)
        )))?;
    }
    if player.has_key {
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print("⚷  "))?;
    }

    let mut right = format!("Level {}/{}", session.level_number(), session.level_count());
    if hud.show_timer {
        right = format!("{}  {}", session.timer().display(), right);
    }
    if hud.show_fps {
        right = format!("{} fps  {}", overlay.fps, right);
    }
    let rx = cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(right))?;
    Ok(())
}

fn bar(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("{}{}", "■".repeat(filled), "·".repeat(width - filled))
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16, session: &Session) -> std::io::Result<()> {
    let player = session.player();
    let hint = format!(
        "{}/{} move  {} jump  {} slide  {} shoot  {} lever  {} door   Tab pause  Esc menu",
        player.control_key(Action::Left),
        player.control_key(Action::Right),
        player.control_key(Action::Jump),
        player.control_key(Action::Slide),
        player.control_key(Action::Shoot),
        player.control_key(Action::Interact),
        player.control_key(Action::Open),
    );
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── End-of-game overlay ───────────────────────────────────────────────────────

fn draw_end_screen<W: Write>(
    out: &mut W,
    cols: u16,
    rows: u16,
    session: &Session,
    best_score: u32,
) -> std::io::Result<()> {
    let (title, subtitle, color) = match session.status() {
        GameStatus::Completed => ("║   YOU  MADE  IT    ║", "All levels cleared", Color::Green),
        GameStatus::GameOver(cause) => ("║    GAME  OVER      ║", cause.message(), Color::Red),
        GameStatus::Playing => return Ok(()),
    };
    let score = session.final_score();
    let best_line = if score >= best_score && score > 0 {
        format!("★ NEW BEST: {:>6} ★", score)
    } else {
        format!("Best Score:  {:>6}", best_score)
    };

    let top = (rows / 2).saturating_sub(4);
    let lines: [(String, Color); 7] = [
        ("╔════════════════════╗".to_string(), color),
        (title.to_string(), color),
        ("╚════════════════════╝".to_string(), color),
        (subtitle.to_string(), Color::White),
        (format!("Final Score: {:>6}", score), Color::Yellow),
        (best_line, Color::Yellow),
        ("Enter - Play Again  Esc - Menu".to_string(), Color::White),
    ];
    for (i, (text, color)) in lines.iter().enumerate() {
        draw_centered(out, cols, top + i as u16, text, *color)?;
    }
    Ok(())
}

fn draw_centered<W: Write>(
    out: &mut W,
    cols: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}
