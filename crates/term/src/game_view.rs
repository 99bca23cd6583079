//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Board row `y = 0` is drawn at the bottom of the frame. Every board cell is
//! `cell_w` columns wide with the glyph in the middle column.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Pos, PowerUp, MAX_KINDS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// One color per tile kind
pub const PALETTE: [Rgb; MAX_KINDS as usize] = [
    Rgb::new(230, 70, 70),
    Rgb::new(80, 200, 100),
    Rgb::new(80, 130, 240),
    Rgb::new(240, 210, 70),
    Rgb::new(200, 110, 230),
    Rgb::new(70, 210, 220),
    Rgb::new(255, 150, 40),
    Rgb::new(235, 235, 235),
];

const BOARD_BG: Rgb = Rgb::new(28, 28, 38);
const BOARD_BG_ALT: Rgb = Rgb::new(36, 36, 48);
const CURSOR_BG: Rgb = Rgb::new(90, 90, 120);
const SELECTED_BG: Rgb = Rgb::new(150, 120, 40);
const HINT_BG: Rgb = Rgb::new(40, 90, 60);
const GEM_FG: Rgb = Rgb::new(255, 255, 255);

pub fn tile_glyph(power: Option<PowerUp>) -> char {
    match power {
        None => '●',
        Some(PowerUp::AreaBlast) => '◆',
        Some(PowerUp::Cross) => '✚',
        Some(PowerUp::Gem) => '★',
    }
}

pub fn tile_color(color: u8, power: Option<PowerUp>) -> Rgb {
    if power == Some(PowerUp::Gem) {
        return GEM_FG;
    }
    PALETTE[color as usize % PALETTE.len()]
}

/// Terminal renderer for the match-3 board and its side panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 3x1 keeps cells roughly square and centers the glyph.
        Self {
            cell_w: 3,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    fn frame_size(&self, snap: &GameSnapshot) -> (u16, u16) {
        (snap.width as u16 * self.cell_w + 2, snap.height as u16 + 2)
    }

    /// Top-left corner of the board frame
    pub fn frame_origin(&self, snap: &GameSnapshot, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size(snap);
        let x = viewport.width.saturating_sub(frame_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        (x, y)
    }

    /// Screen column and row of a board cell's glyph
    pub fn glyph_at(&self, snap: &GameSnapshot, viewport: Viewport, pos: Pos) -> (u16, u16) {
        let (ox, oy) = self.frame_origin(snap, viewport);
        let (px, py) = self.cell_origin(ox, oy, snap.height, pos);
        (px + self.cell_w / 2, py)
    }

    fn cell_origin(&self, ox: u16, oy: u16, height: u8, pos: Pos) -> (u16, u16) {
        let px = ox + 1 + pos.x as u16 * self.cell_w;
        let py = oy + 1 + (height as u16 - 1 - pos.y as u16);
        (px, py)
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));
        if snap.width == 0 || snap.height == 0 {
            return;
        }

        let (frame_w, frame_h) = self.frame_size(snap);
        let (ox, oy) = self.frame_origin(snap, viewport);
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        draw_border(fb, ox, oy, frame_w, frame_h, border);

        for y in 0..snap.height as i8 {
            for x in 0..snap.width as i8 {
                self.draw_cell(fb, snap, ox, oy, Pos::new(x, y));
            }
        }

        self.draw_side_panel(fb, snap, viewport, ox + frame_w + 2, oy);

        if snap.paused {
            draw_overlay(fb, ox, oy, frame_w, frame_h, &["PAUSED"]);
        } else if snap.game_over {
            draw_overlay(fb, ox, oy, frame_w, frame_h, &["GAME OVER", "r: restart"]);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, ox: u16, oy: u16, pos: Pos) {
        let in_hint = snap.hint.is_some_and(|(a, b)| a == pos || b == pos);
        let bg = if snap.cursor == pos && snap.input_enabled {
            CURSOR_BG
        } else if snap.selected == Some(pos) {
            SELECTED_BG
        } else if in_hint {
            HINT_BG
        } else if (pos.x + pos.y) % 2 == 0 {
            BOARD_BG
        } else {
            BOARD_BG_ALT
        };

        let (px, py) = self.cell_origin(ox, oy, snap.height, pos);
        fb.fill_rect(px, py, self.cell_w, 1, ' ', CellStyle::new(BOARD_BG, bg));

        let gx = px + self.cell_w / 2;
        match snap.cell(pos) {
            Some(tile) => {
                let mut style = CellStyle::new(tile_color(tile.color, tile.power), bg).bold();
                if !tile.idle {
                    style = style.dim();
                }
                fb.put_char(gx, py, tile_glyph(tile.power), style);
            }
            None => {
                let style = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
                fb.put_char(gx, py, '·', style);
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        panel_x: u16,
        top: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }
        let panel_w = viewport.width - panel_x;

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = top;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u64(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "MULTI", label);
        fb.put_char(panel_x, y + 1, 'x', value);
        fb.put_u64(panel_x + 1, y + 1, snap.multiplier as u64, value);
        y += 2;

        let bar_w = (panel_w - 1).min(12);
        let warm = PALETTE[3].blend(PALETTE[0], (8.0 * (1.0 - snap.combo_fraction())) as u8);
        fb.put_bar(
            panel_x,
            y,
            bar_w,
            snap.combo_fraction(),
            CellStyle::new(warm, Rgb::new(0, 0, 0)),
            value.dim(),
        );
        y += 2;

        fb.put_str(panel_x, y, "TIME", label);
        match snap.time_left_ms {
            Some(ms) => put_clock(fb, panel_x, y + 1, ms, value),
            None => {
                fb.put_str(panel_x, y + 1, "--:--", value.dim());
            }
        }
        y += 3;

        if let Some((a, b)) = snap.hint {
            fb.put_str(panel_x, y, "HINT", label);
            let x = fb.put_str(panel_x, y + 1, &format_pos(a), value);
            fb.put_str(x + 1, y + 1, &format_pos(b), value);
            y += 3;
        }

        if y + 1 < viewport.height {
            let help = value.dim();
            fb.put_str(panel_x, y, "arrows move", help);
            fb.put_str(panel_x, y + 1, "space select", help);
            fb.put_str(panel_x, y + 2, "? hint  p pause", help);
            fb.put_str(panel_x, y + 3, "q quit", help);
        }
    }
}

fn format_pos(pos: Pos) -> String {
    format!("{},{}", pos.x, pos.y)
}

/// `m:ss`, rounding partial seconds up so the clock shows 0:00 only at zero
fn put_clock(fb: &mut FrameBuffer, x: u16, y: u16, ms: u32, style: CellStyle) {
    let secs = ms.div_ceil(1000) as u64;
    let x = fb.put_u64(x, y, secs / 60, style);
    fb.put_char(x, y, ':', style);
    fb.put_char(x + 1, y, char::from(b'0' + (secs % 60 / 10) as u8), style);
    fb.put_char(x + 2, y, char::from(b'0' + (secs % 10) as u8), style);
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '╭', style);
    fb.put_char(x + w - 1, y, '╮', style);
    fb.put_char(x, y + h - 1, '╰', style);
    fb.put_char(x + w - 1, y + h - 1, '╯', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay(fb: &mut FrameBuffer, x: u16, y: u16, frame_w: u16, frame_h: u16, lines: &[&str]) {
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
    let top = y + frame_h.saturating_sub(lines.len() as u16) / 2;
    for (i, text) in lines.iter().enumerate() {
        let text_w = text.chars().count() as u16;
        let tx = x + frame_w.saturating_sub(text_w) / 2;
        fb.put_str(tx, top + i as u16, text, style);
    }
}
