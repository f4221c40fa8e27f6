use super::{plain_lines, Frontend, InputEvent};
use crate::ui::render::EditView;
use anyhow::{Context, Result};
use ratatui::text::Text;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Line-oriented input for when stdin is not a terminal. Every line is
/// pasted and submitted; the end of the stream is end of input.
#[derive(Debug)]
pub struct PipedFrontend<R, W> {
    input: R,
    output: W,
    pending: VecDeque<InputEvent>,
    exhausted: bool,
}

impl<R: BufRead, W: Write> PipedFrontend<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Frontend for PipedFrontend<R, W> {
    fn read_event(&mut self) -> Result<InputEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(event);
        }
        if self.exhausted {
            return Ok(InputEvent::EndOfInput);
        }

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read piped input")?;
        if read == 0 {
            self.exhausted = true;
            return Ok(InputEvent::EndOfInput);
        }

        let line = line.trim_end_matches(['\n', '\r']).to_string();
        self.pending.push_back(InputEvent::Submit);
        Ok(InputEvent::Paste(line))
    }

    fn render(&mut self, _view: &EditView<'_>) -> Result<()> {
        Ok(())
    }

    fn print_above(&mut self, text: Text<'static>) -> Result<()> {
        for line in plain_lines(&text) {
            writeln!(self.output, "{line}")?;
        }
        self.output.flush()?;
        Ok(())
    }

    fn commit(&mut self, _view: &EditView<'_>) -> Result<()> {
        Ok(())
    }
}
