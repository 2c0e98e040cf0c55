// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

/// Tracks the colors last sent so runs of equal cells skip escape codes.
#[derive(Default)]
struct Pen {
    fg: Option<Option<Color>>,
    bg: Option<Option<Color>>,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn apply(&mut self, out: &mut Stdout, cell: &Cell) -> Result<()> {
        if self.fg != Some(cell.fg) {
            out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            out.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.bg = Some(cell.bg);
        }
        Ok(())
    }
}

pub struct Terminal {
    stdout: Stdout,
    last_size: Option<(u16, u16)>,
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last_size: None,
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Emits the cells that changed since the last call, or everything after
    /// a resize or when most of the grid is dirty.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let resized = self.last_size != Some(size);
        if resized {
            self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
            self.last_size = Some(size);
        }

        let total = frame.width as usize * frame.height as usize;
        let mostly_dirty = total > 0 && frame.dirty_indices().len() >= total / 3;
        let mut pen = Pen::default();

        if resized || frame.is_dirty_all() || mostly_dirty {
            for y in 0..frame.height {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..frame.width {
                    let idx = y as usize * frame.width as usize + x as usize;
                    let cell = frame.cell_at_index(idx);
                    pen.apply(&mut self.stdout, &cell)?;
                    self.stdout.queue(Print(cell.ch))?;
                }
            }
        } else {
            let mut dirty = frame.dirty_indices().to_vec();
            dirty.sort_unstable();
            let width = frame.width as usize;

            let mut i = 0usize;
            while i < dirty.len() {
                let idx0 = dirty[i];
                let cell0 = frame.cell_at_index(idx0);
                let (x0, y0) = ((idx0 % width) as u16, (idx0 / width) as u16);

                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                let mut last = idx0;
                let mut j = i + 1;
                while j < dirty.len() {
                    let idx1 = dirty[j];
                    // runs stop at row ends and color changes
                    if idx1 != last + 1 || idx1 % width == 0 {
                        break;
                    }
                    let cell1 = frame.cell_at_index(idx1);
                    if cell1.fg != cell0.fg || cell1.bg != cell0.bg {
                        break;
                    }
                    self.run_buf.push(cell1.ch);
                    last = idx1;
                    j += 1;
                }

                if pen.pos != Some((x0, y0)) {
                    self.stdout.queue(cursor::MoveTo(x0, y0))?;
                }
                pen.apply(&mut self.stdout, &cell0)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;

                let run_len = (j - i) as u16;
                let next_x = x0.saturating_add(run_len);
                pen.pos = (next_x < frame.width).then_some((next_x, y0));
                i = j;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}
