use super::{Frontend, InputEvent};
use crate::terminal::{self, TerminalType};
use crate::ui::render::{edit_lines, render_edit_area, EditView};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    text::{Line, Text},
    widgets::{Paragraph, Widget},
};

/// Crossterm input with a ratatui inline viewport holding the edit area.
pub struct TerminalFrontend {
    terminal: TerminalType,
}

impl TerminalFrontend {
    pub fn new(viewport_rows: u16) -> Result<Self> {
        let terminal = terminal::setup(viewport_rows)?;
        Ok(Self { terminal })
    }

    fn insert_lines(&mut self, lines: Vec<Line<'static>>) -> Result<()> {
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        if height == 0 {
            return Ok(());
        }
        self.terminal.insert_before(height, |buf| {
            Paragraph::new(Text::from(lines)).render(buf.area, buf);
        })?;
        // The next draw repaints the whole edit area beneath the new lines.
        self.terminal.clear()?;
        Ok(())
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        let _ = self.terminal.clear();
        let _ = terminal::restore();
    }
}

impl Frontend for TerminalFrontend {
    fn read_event(&mut self) -> Result<InputEvent> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(InputEvent::Key(key));
                }
                Event::Paste(text) => return Ok(InputEvent::Paste(text)),
                Event::Resize(_, _) => {
                    self.terminal.autoresize()?;
                    return Ok(InputEvent::Resize);
                }
                _ => {}
            }
        }
    }

    fn render(&mut self, view: &EditView<'_>) -> Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            render_edit_area(frame, area, view);
        })?;
        Ok(())
    }

    fn print_above(&mut self, text: Text<'static>) -> Result<()> {
        self.insert_lines(text.lines)
    }

    fn commit(&mut self, view: &EditView<'_>) -> Result<()> {
        let lines = edit_lines(view, self.width());
        self.insert_lines(lines)
    }

    fn width(&self) -> usize {
        self.terminal
            .size()
            .map_or(80, |size| usize::from(size.width.max(1)))
    }
}
