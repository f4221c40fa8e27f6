//! Where input events come from and where the edit area is drawn.

mod piped;
mod scripted;
mod terminal;

pub use piped::PipedFrontend;
pub use scripted::ScriptedFrontend;
pub use terminal::TerminalFrontend;

use crate::ui::render::EditView;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::text::Text;

/// One result of the blocking read step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Paste(String),
    Submit,
    Interrupt,
    EndOfInput,
    Resize,
}

pub trait Frontend {
    /// Blocks until the next input event.
    fn read_event(&mut self) -> Result<InputEvent>;

    fn render(&mut self, view: &EditView<'_>) -> Result<()>;

    /// Prints `text` above the edit area. The edit area is drawn again
    /// beneath it by the next `render`.
    fn print_above(&mut self, text: Text<'static>) -> Result<()>;

    /// Moves a finished statement out of the edit area.
    fn commit(&mut self, view: &EditView<'_>) -> Result<()>;

    fn width(&self) -> usize {
        80
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        self.print_above(Text::raw(line.to_string()))
    }
}

/// The unstyled content of each line of `text`.
pub fn plain_lines(text: &Text<'_>) -> Vec<String> {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
        .collect()
}
