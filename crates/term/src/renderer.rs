//! TerminalRenderer: flushes a framebuffer to a terminal.
//!
//! Frames are diffed per row: a row that changed is rewritten whole, a row
//! that did not is skipped. Board frames change a handful of rows at a time,
//! so this keeps output small without tracking dirty rectangles.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Raw mode, alternate screen, hidden cursor
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (after a resize)
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb` and keep it as the diff base, handing back the old frame
    ///
    /// Returns the number of rows written. The buffer left in `fb` holds the
    /// previous frame; callers clear it before drawing the next one.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<usize> {
        self.buf.clear();
        let (mut prev, rows) = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                let rows = encode_rows_into(&prev, fb, &mut self.buf)?;
                (prev, rows)
            }
            stale => {
                encode_full_into(fb, &mut self.buf)?;
                let mut prev = stale.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
                prev.resize(fb.width(), fb.height());
                (prev, fb.height() as usize)
            }
        };
        if rows > 0 {
            self.flush_buf()?;
        }
        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(rows)
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut style = None;
    for y in 0..fb.height() {
        encode_row(fb, y, &mut style, out)?;
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode every row of `next` that differs from `prev`; returns the row count
///
/// Both frames must have the same size.
pub fn encode_rows_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<usize> {
    let mut style = None;
    let mut rows = 0;
    for y in changed_rows(prev, next) {
        encode_row(next, y, &mut style, out)?;
        rows += 1;
    }
    if rows > 0 {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(rows)
}

fn changed_rows<'a>(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> impl Iterator<Item = u16> + 'a {
    (0..next.height()).filter(move |&y| prev.row(y) != next.row(y))
}

fn encode_row(
    fb: &FrameBuffer,
    y: u16,
    current: &mut Option<CellStyle>,
    out: &mut Vec<u8>,
) -> Result<()> {
    out.queue(cursor::MoveTo(0, y))?;
    for cell in fb.row(y) {
        if *current != Some(cell.style) {
            apply_style_into(out, cell.style)?;
            *current = Some(cell.style);
        }
        out.queue(Print(cell.ch))?;
    }
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(rows: &[&str]) -> FrameBuffer {
        let mut fb = FrameBuffer::new(rows[0].chars().count() as u16, rows.len() as u16);
        for (y, row) in rows.iter().enumerate() {
            fb.put_str(0, y as u16, row, CellStyle::default());
        }
        fb
    }

    #[test]
    fn only_changed_rows_are_listed() {
        let a = frame(&["abc", "def", "ghi"]);
        let b = frame(&["abc", "dXf", "ghi"]);
        assert_eq!(changed_rows(&a, &b).collect::<Vec<_>>(), vec![1]);
        assert_eq!(changed_rows(&a, &a).count(), 0);
    }

    #[test]
    fn style_change_counts_as_a_change() {
        let a = frame(&["ab"]);
        let mut b = a.clone();
        b.put_char(0, 0, 'a', CellStyle::default().bold());
        assert_eq!(changed_rows(&a, &b).count(), 1);
    }

    #[test]
    fn first_draw_is_full_then_diffs() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = frame(&["ab", "cd"]);
        assert_eq!(renderer.draw_swap(&mut fb).unwrap(), 2);

        let mut same = frame(&["ab", "cd"]);
        let written = renderer.writer().len();
        assert_eq!(renderer.draw_swap(&mut same).unwrap(), 0);
        assert_eq!(renderer.writer().len(), written);

        let mut next = frame(&["ab", "cZ"]);
        assert_eq!(renderer.draw_swap(&mut next).unwrap(), 1);
        let tail = String::from_utf8_lossy(&renderer.writer()[written..]).into_owned();
        assert!(tail.contains('Z'));
        assert!(!tail.contains('a'));
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = frame(&["ab"]);
        renderer.draw_swap(&mut fb).unwrap();
        let mut bigger = frame(&["ab", "cd"]);
        assert_eq!(renderer.draw_swap(&mut bigger).unwrap(), 2);
        renderer.invalidate();
        let mut again = frame(&["ab", "cd"]);
        assert_eq!(renderer.draw_swap(&mut again).unwrap(), 2);
    }
}
