use super::{plain_lines, Frontend, InputEvent};
use crate::ui::render::EditView;
use anyhow::{bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Text;
use std::collections::VecDeque;

/// Replays a fixed sequence of events and records what would have been
/// shown. Running out of events reads as end of input.
#[derive(Debug, Default)]
pub struct ScriptedFrontend {
    events: VecDeque<InputEvent>,
    printed: Vec<String>,
    committed: Vec<String>,
    last_view: Option<(String, usize)>,
    renders: usize,
    failing_reads: usize,
}

impl ScriptedFrontend {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Key presses typing `text`; `'\n'` becomes Ctrl-J.
    pub fn keys(text: &str) -> Vec<InputEvent> {
        text.chars()
            .map(|ch| match ch {
                '\n' => KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL),
                '\t' => KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE),
                ch => KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE),
            })
            .map(InputEvent::Key)
            .collect()
    }

    pub fn push(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.events.extend(events);
    }

    /// The next `count` reads fail before the script resumes.
    pub fn fail_next_reads(&mut self, count: usize) {
        self.failing_reads = count;
    }

    pub fn printed(&self) -> &[String] {
        &self.printed
    }

    pub fn committed(&self) -> &[String] {
        &self.committed
    }

    /// Text and cursor of the most recent render.
    pub fn last_view(&self) -> Option<(&str, usize)> {
        self.last_view
            .as_ref()
            .map(|(text, cursor)| (text.as_str(), *cursor))
    }

    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Frontend for ScriptedFrontend {
    fn read_event(&mut self) -> Result<InputEvent> {
        if self.failing_reads > 0 {
            self.failing_reads -= 1;
            bail!("scripted read failure");
        }
        Ok(self.events.pop_front().unwrap_or(InputEvent::EndOfInput))
    }

    fn render(&mut self, view: &EditView<'_>) -> Result<()> {
        self.renders += 1;
        self.last_view = Some((view.text.to_string(), view.cursor));
        Ok(())
    }

    fn print_above(&mut self, text: Text<'static>) -> Result<()> {
        self.printed.extend(plain_lines(&text));
        Ok(())
    }

    fn commit(&mut self, view: &EditView<'_>) -> Result<()> {
        self.committed.push(view.text.to_string());
        Ok(())
    }
}
