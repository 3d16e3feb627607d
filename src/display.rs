/// Rendering layer — all terminal output lives here.
///
/// Each function receives a mutable writer and an immutable snapshot of the
/// mission.  No game logic is performed; this module only translates the
/// snapshot into terminal commands, scaling playfield pixels to cells.
///
/// Draw order: background, hazards, targets, rover, HUD, game-over overlay.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rover_mission::assets::{AssetStore, TextImage};
use rover_mission::entities::{Hazard, Rect, Rover, ScienceTarget, Vec2, Visual};
use rover_mission::game_loop::Presenter;
use rover_mission::session::Snapshot;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GROUND: Color = Color::Rgb { r: 200, g: 100, b: 50 };
const C_GROUND_ART: Color = Color::Rgb { r: 120, g: 55, b: 30 };
const C_HAZARD_FILL: Color = Color::Rgb { r: 100, g: 50, b: 50 };
const C_HAZARD_EDGE: Color = Color::Red;
const C_ROVER: Color = Color::White;
const C_ROVER_FRONT: Color = Color::Red;
const C_HUD_TIME: Color = Color::White;
const C_HUD_TIME_LOW: Color = Color::Red;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HAZARD_MSG: Color = Color::Red;
const C_OVERLAY: Color = Color::Black;
const C_HINT: Color = Color::DarkGrey;

/// Indexed by `ScienceTarget::type_index`.
const TARGET_COLORS: [Color; 4] = [
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Rgb { r: 255, g: 165, b: 0 },
];

/// Eight-way front indicator, starting at "up" and turning counter-clockwise.
const HEADING_GLYPHS: [char; 8] = ['↑', '↖', '←', '↙', '↓', '↘', '→', '↗'];

// ── Presenter ─────────────────────────────────────────────────────────────────

pub struct TerminalPresenter<W: Write> {
    out: W,
    assets: AssetStore,
    background: Visual,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, assets: AssetStore, background: Visual) -> Self {
        Self {
            out,
            assets,
            background,
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, frame: &Snapshot<'_>) -> std::io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let view = Viewport::new(cols, rows, frame.playfield_width, frame.playfield_height);
        render(&mut self.out, frame, &view, &self.assets, self.background)
    }
}

// ── Pixel → cell mapping ──────────────────────────────────────────────────────

pub struct Viewport {
    cols: u16,
    rows: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, width_px: f32, height_px: f32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            sx: cols.max(1) as f32 / width_px,
            sy: rows.max(1) as f32 / height_px,
        }
    }

    fn col(&self, x: f32) -> u16 {
        ((x * self.sx).floor().max(0.0) as u16).min(self.cols - 1)
    }

    fn row(&self, y: f32) -> u16 {
        ((y * self.sy).floor().max(0.0) as u16).min(self.rows - 1)
    }

    fn cell(&self, p: Vec2) -> (u16, u16) {
        (self.col(p.x), self.row(p.y))
    }

    /// Inclusive cell span covered by `r`; always at least one cell.
    fn span(&self, r: &Rect) -> (u16, u16, u16, u16) {
        let c0 = self.col(r.left);
        let r0 = self.row(r.top);
        let c1 = self.col((r.right() - 0.001).max(r.left)).max(c0);
        let r1 = self.row((r.bottom() - 0.001).max(r.top)).max(r0);
        (c0, r0, c1, r1)
    }

    /// Playfield pixel at the centre of a cell.
    fn pixel(&self, col: u16, row: u16) -> Vec2 {
        Vec2::new((col as f32 + 0.5) / self.sx, (row as f32 + 0.5) / self.sy)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    frame: &Snapshot<'_>,
    view: &Viewport,
    assets: &AssetStore,
    background: Visual,
) -> std::io::Result<()> {
    out.queue(terminal::BeginSynchronizedUpdate)?;
    out.queue(style::SetBackgroundColor(C_GROUND))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_background(out, view, assets, background)?;

    for hazard in frame.hazards.iter().filter(|h| h.visible) {
        draw_hazard(out, view, hazard)?;
    }
    for target in frame.targets {
        draw_target(out, view, target)?;
    }
    draw_rover(out, view, assets, frame.rover)?;

    draw_hud(out, view, frame)?;
    draw_controls_hint(out, view)?;

    if frame.game_over {
        draw_game_over(out, view, frame)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.queue(terminal::EndSynchronizedUpdate)?;
    out.flush()?;
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_background<W: Write>(
    out: &mut W,
    view: &Viewport,
    assets: &AssetStore,
    background: Visual,
) -> std::io::Result<()> {
    let image = match background {
        Visual::Image(id) => assets.get(id),
        Visual::Fallback(_) => None,
    };
    // Fallback: the ground colour set by the clear is the fill.
    let Some(image) = image else {
        return Ok(());
    };

    out.queue(style::SetForegroundColor(C_GROUND_ART))?;
    for row in 0..view.rows {
        let line: String = (0..view.cols)
            .map(|col| stretch_sample(image, col, row, view.cols, view.rows))
            .collect();
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

/// Nearest-neighbour sample of `image` stretched over `cols × rows` cells.
fn stretch_sample(image: &TextImage, col: u16, row: u16, cols: u16, rows: u16) -> char {
    let ic = col as usize * image.columns() / cols.max(1) as usize;
    let ir = row as usize * image.rows() / rows.max(1) as usize;
    image.char_at(ic, ir)
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_hazard<W: Write>(out: &mut W, view: &Viewport, hazard: &Hazard) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = view.span(&hazard.body.rect());
    for row in r0..=r1 {
        for col in c0..=c1 {
            let edge = row == r0 || row == r1 || col == c0 || col == c1;
            let (color, glyph) = if edge {
                (C_HAZARD_EDGE, edge_glyph(col, row, (c0, r0, c1, r1)))
            } else {
                (C_HAZARD_FILL, '▒')
            };
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

fn edge_glyph(col: u16, row: u16, (c0, r0, c1, r1): (u16, u16, u16, u16)) -> char {
    match (col == c0, col == c1, row == r0, row == r1) {
        (true, _, true, _) => '╭',
        (_, true, true, _) => '╮',
        (true, _, _, true) => '╰',
        (_, true, _, true) => '╯',
        (_, _, true, _) | (_, _, _, true) => '─',
        _ => '│',
    }
}

fn draw_target<W: Write>(
    out: &mut W,
    view: &Viewport,
    target: &ScienceTarget,
) -> std::io::Result<()> {
    let color = TARGET_COLORS[target.type_index % TARGET_COLORS.len()];
    let center = target.body.center();
    let center_cell = view.cell(center);
    let (c0, r0, c1, r1) = view.span(&target.body.rect());

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        for col in c0..=c1 {
            let inside = view.pixel(col, row).distance(center) <= target.radius();
            if inside || (col, row) == center_cell {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print('●'))?;
            }
        }
    }
    Ok(())
}

fn draw_rover<W: Write>(
    out: &mut W,
    view: &Viewport,
    assets: &AssetStore,
    rover: &Rover,
) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = view.span(&rover.body.rect());
    let image = match rover.body.visual {
        Visual::Image(id) => assets.get(id),
        Visual::Fallback(_) => None,
    };

    out.queue(style::SetForegroundColor(C_ROVER))?;
    let (w, h) = (c1 - c0 + 1, r1 - r0 + 1);
    for row in r0..=r1 {
        let line: String = (c0..=c1)
            .map(|col| match image {
                Some(img) => stretch_sample(img, col - c0, row - r0, w, h),
                None => '█',
            })
            .collect();
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(line))?;
    }

    // Front indicator in the middle of the body.
    let (cc, cr) = view.cell(rover.body.position);
    out.queue(cursor::MoveTo(cc, cr))?;
    out.queue(style::SetForegroundColor(C_ROVER_FRONT))?;
    out.queue(Print(heading_glyph(rover.facing_degrees)))?;
    Ok(())
}

fn heading_glyph(facing_degrees: f32) -> char {
    let turned = facing_degrees.rem_euclid(360.0);
    let slot = (turned / 45.0).round() as usize % HEADING_GLYPHS.len();
    HEADING_GLYPHS[slot]
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, frame: &Snapshot<'_>) -> std::io::Result<()> {
    let time_color = if frame.low_time() {
        C_HUD_TIME_LOW
    } else {
        C_HUD_TIME
    };
    out.queue(cursor::MoveTo(2, 1))?;
    out.queue(style::SetForegroundColor(time_color))?;
    out.queue(Print(format!("Time: {}", frame.remaining_seconds as u32)))?;

    out.queue(cursor::MoveTo(2, 2))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", frame.score)))?;

    if let Some(message) = frame.visible_hazard_message() {
        // Same relative height as 100 px on a 600 px field.
        let row = view.row(frame.playfield_height / 6.0);
        print_centered(out, view, row, message, C_HAZARD_MSG)?;
    }
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Arrows / WASD : Drive   R : Restart   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &Viewport,
    frame: &Snapshot<'_>,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", frame.score);
    let lines: [(&str, Color); 5] = [
        ("╔══════════════════════╗", Color::White),
        ("║     MISSION OVER     ║", Color::White),
        ("╚══════════════════════╝", Color::White),
        (&score_line, Color::Yellow),
        ("Press 'R' to Restart", Color::Green),
    ];

    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2 + 1);
    out.queue(style::SetBackgroundColor(C_OVERLAY))?;
    for (i, (text, color)) in lines.iter().enumerate() {
        print_centered(out, view, start_row + i as u16, text, *color)?;
    }
    out.queue(style::SetBackgroundColor(C_GROUND))?;
    Ok(())
}

fn print_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}
