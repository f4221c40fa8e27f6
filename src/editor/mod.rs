//! The statement reader: an edit loop that asks the parser, on every
//! submit, whether the buffer is a finished statement.

pub mod buffer;
pub mod keymap;

use crate::complete::{complete, CompletionOracle};
use crate::frontend::{Frontend, InputEvent};
use crate::highlight::ColorScheme;
use crate::history::HistoryStore;
use crate::parser::{parse, ParseOutcome, ResolutionMode};
use crate::ui::render::{candidate_columns, EditView};
use anyhow::Result;
use buffer::EditBuffer;
use keymap::{command_for_key, EditCommand};
use ratatui::text::{Line, Text};
use tracing::{debug, warn};

pub const INTERRUPT_HINT: &str = "press Ctrl-D to exit";

/// Everything one `read_statement` call reads from its caller.
#[derive(Clone, Copy)]
pub struct ReadConfig<'a> {
    pub scheme: &'a ColorScheme,
    pub oracle: &'a dyn CompletionOracle,
    pub history_seed: &'a [String],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    EndOfInput,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Success { text: String, tokens: Vec<String> },
    Skip,
    Exit(ExitReason),
    Failure(String),
}

pub struct LineEditor<F: Frontend> {
    frontend: F,
    history: HistoryStore,
}

impl<F: Frontend> LineEditor<F> {
    pub fn new(frontend: F) -> Self {
        Self {
            frontend,
            history: HistoryStore::new(),
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    pub fn into_frontend(self) -> F {
        self.frontend
    }

    /// Reads one statement. Frontend faults come back as
    /// `ReadOutcome::Failure` and leave the editor usable for the next call.
    pub fn read_statement(&mut self, prompt: &str, config: &ReadConfig<'_>) -> ReadOutcome {
        self.history.seed(config.history_seed);
        let mut buffer = EditBuffer::new();
        match self.edit_loop(prompt, config, &mut buffer) {
            Ok(outcome) => {
                debug!(?outcome, "statement read");
                outcome
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "edit loop failed");
                ReadOutcome::Failure(format!("{err:#}"))
            }
        }
    }

    fn edit_loop(
        &mut self,
        prompt: &str,
        config: &ReadConfig<'_>,
        buffer: &mut EditBuffer,
    ) -> Result<ReadOutcome> {
        loop {
            self.frontend.render(&edit_view(prompt, buffer, config.scheme))?;

            let command = match self.frontend.read_event()? {
                InputEvent::Key(key) => match command_for_key(key, buffer.is_empty()) {
                    Some(command) => command,
                    None => continue,
                },
                InputEvent::Paste(text) => EditCommand::Insert(normalize_newlines(&text)),
                InputEvent::Submit => EditCommand::Submit,
                InputEvent::Interrupt => EditCommand::Interrupt,
                InputEvent::EndOfInput => EditCommand::EndOfInput,
                InputEvent::Resize => continue,
            };

            match command {
                EditCommand::Insert(text) => buffer.insert_str(&text),
                EditCommand::Newline => buffer.insert_str("\n"),
                EditCommand::Backspace => buffer.backspace(),
                EditCommand::Delete => buffer.delete(),
                EditCommand::Left => buffer.move_left(),
                EditCommand::Right => buffer.move_right(),
                EditCommand::Home => buffer.move_home(),
                EditCommand::End => buffer.move_end(),
                EditCommand::KillToLineStart => buffer.kill_to_line_start(),
                EditCommand::HistoryPrevious => buffer.recall_previous(self.history.entries()),
                EditCommand::HistoryNext => buffer.recall_next(self.history.entries()),
                EditCommand::Undo => buffer.undo(),
                EditCommand::Redo => buffer.redo(),
                EditCommand::Complete => self.complete(config, buffer)?,
                EditCommand::Submit => {
                    if let Some(outcome) = self.submit(prompt, config, buffer)? {
                        return Ok(outcome);
                    }
                }
                EditCommand::Interrupt => {
                    let had_input = !buffer.is_empty();
                    self.frontend
                        .commit(&edit_view(prompt, buffer, config.scheme))?;
                    buffer.take();
                    if !had_input {
                        self.frontend.print_line(INTERRUPT_HINT)?;
                    }
                    return Ok(ReadOutcome::Skip);
                }
                EditCommand::EndOfInput => return Ok(ReadOutcome::Exit(ExitReason::EndOfInput)),
            }
        }
    }

    /// `None` keeps the loop going with a line break appended.
    fn submit(
        &mut self,
        prompt: &str,
        config: &ReadConfig<'_>,
        buffer: &mut EditBuffer,
    ) -> Result<Option<ReadOutcome>> {
        if buffer.text().trim().is_empty() {
            return Ok(None);
        }

        match parse(buffer.text(), ResolutionMode::Committing) {
            ParseOutcome::Complete { words, .. } => {
                self.frontend
                    .commit(&edit_view(prompt, buffer, config.scheme))?;
                let text = buffer.take();
                self.history.append(&text, true);
                let tokens = words.into_iter().map(|word| word.text).collect();
                Ok(Some(ReadOutcome::Success { text, tokens }))
            }
            ParseOutcome::Incomplete => {
                buffer.push_line_break();
                Ok(None)
            }
            ParseOutcome::Failure(err) if err.is_missing_delimiter() => {
                debug!(position = err.position(), "continuing unterminated statement");
                buffer.push_line_break();
                Ok(None)
            }
            ParseOutcome::Failure(err) => {
                self.frontend
                    .commit(&edit_view(prompt, buffer, config.scheme))?;
                let text = buffer.take();
                self.history.append(&text, false);
                Ok(Some(ReadOutcome::Failure(err.message())))
            }
        }
    }

    fn complete(&mut self, config: &ReadConfig<'_>, buffer: &mut EditBuffer) -> Result<()> {
        let completions = complete(buffer.cursor(), buffer.text(), config.oracle, config.scheme);

        if !completions.signatures.is_empty() {
            let lines: Vec<Line<'static>> = completions
                .signatures
                .iter()
                .flat_map(|signature| signature.styled.lines.iter().cloned())
                .collect();
            self.frontend.print_above(Text::from(lines))?;
        }

        match completions.candidates.as_slice() {
            [] => {}
            [only] => buffer.replace_before_cursor(completions.anchor, &only.insert_text),
            candidates => {
                let typed = buffer.cursor().saturating_sub(completions.anchor);
                let prefix = completions.common_prefix();
                if prefix.len() > typed {
                    buffer.replace_before_cursor(completions.anchor, prefix);
                } else {
                    let display: Vec<&str> = candidates
                        .iter()
                        .map(|candidate| candidate.display_text.as_str())
                        .collect();
                    let rows: Vec<Line<'static>> =
                        candidate_columns(&display, self.frontend.width())
                            .into_iter()
                            .map(Line::from)
                            .collect();
                    self.frontend.print_above(Text::from(rows))?;
                }
            }
        }
        Ok(())
    }
}

fn edit_view<'a>(prompt: &'a str, buffer: &'a EditBuffer, scheme: &'a ColorScheme) -> EditView<'a> {
    let pending =
        !buffer.is_empty() && parse(buffer.text(), ResolutionMode::Probing).is_incomplete();
    EditView {
        prompt,
        text: buffer.text(),
        cursor: buffer.cursor(),
        pending,
        scheme,
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complete::{NoCompletions, OracleReply};
    use crate::frontend::ScriptedFrontend;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn run(events: Vec<InputEvent>, oracle: &dyn CompletionOracle) -> (ReadOutcome, ScriptedFrontend) {
        let scheme = ColorScheme::plain();
        let config = ReadConfig {
            scheme: &scheme,
            oracle,
            history_seed: &[],
        };
        let mut editor = LineEditor::new(ScriptedFrontend::new(events));
        let outcome = editor.read_statement("@ ", &config);
        (outcome, editor.into_frontend())
    }

    #[test]
    fn test_blank_submit_keeps_editing() {
        let mut events = vec![InputEvent::Submit];
        events.extend(ScriptedFrontend::keys("  "));
        events.push(InputEvent::Submit);
        events.extend(ScriptedFrontend::keys("x"));
        events.push(InputEvent::Submit);

        let (outcome, _) = run(events, &NoCompletions);
        assert_eq!(
            outcome,
            ReadOutcome::Success {
                text: "  x".to_string(),
                tokens: vec!["x".to_string()],
            }
        );
    }

    #[test]
    fn test_pasted_carriage_returns_become_newlines() {
        let events = vec![
            InputEvent::Paste("val x = (\r\n1)".to_string()),
            InputEvent::Submit,
        ];
        let (outcome, frontend) = run(events, &NoCompletions);
        assert_eq!(
            outcome,
            ReadOutcome::Success {
                text: "val x = (\n1)".to_string(),
                tokens: vec!["val x = (\n1)".to_string()],
            }
        );
        assert_eq!(frontend.committed(), ["val x = (\n1)".to_string()]);
    }

    #[test]
    fn test_single_candidate_replaces_partial_word() {
        let oracle = |cursor: usize, _text: &str| OracleReply {
            replacement_start: cursor - 2,
            candidates: vec!["println".to_string()],
            signatures: Vec::new(),
        };
        let mut events = ScriptedFrontend::keys("pr\t");
        events.push(InputEvent::Submit);

        let (outcome, _) = run(events, &oracle);
        assert_eq!(
            outcome,
            ReadOutcome::Success {
                text: "println".to_string(),
                tokens: vec!["println".to_string()],
            }
        );
    }

    #[test]
    fn test_ambiguous_candidates_are_listed_above() {
        let oracle = |cursor: usize, _text: &str| OracleReply {
            replacement_start: cursor - 1,
            candidates: vec!["min".to_string(), "max".to_string()],
            signatures: vec!["def max(a: Int, b: Int): Int".to_string()],
        };
        let mut events = ScriptedFrontend::keys("m\t");
        events.push(InputEvent::Interrupt);

        let (outcome, frontend) = run(events, &oracle);
        assert_eq!(outcome, ReadOutcome::Skip);
        assert_eq!(
            frontend.printed(),
            [
                "def max(a: Int, b: Int): Int".to_string(),
                "max  min".to_string(),
            ]
        );
    }

    #[test]
    fn test_signatures_are_printed_then_edit_line_is_redrawn() {
        let oracle = |cursor: usize, _text: &str| OracleReply {
            replacement_start: cursor,
            candidates: Vec::new(),
            signatures: vec!["def max(a: Int, b: Int): Int".to_string()],
        };
        let mut events = ScriptedFrontend::keys("max(");
        events.push(key(KeyCode::Left));
        let typed_renders = events.len() + 1;
        events.push(key(KeyCode::Tab));

        let (outcome, frontend) = run(events, &oracle);
        assert_eq!(outcome, ReadOutcome::Exit(ExitReason::EndOfInput));
        assert_eq!(
            frontend.printed(),
            ["def max(a: Int, b: Int): Int".to_string()]
        );
        assert_eq!(frontend.renders(), typed_renders + 1);
        assert_eq!(frontend.last_view(), Some(("max(", 3)));
    }

    #[test]
    fn test_up_arrow_recalls_seeded_history() {
        let scheme = ColorScheme::plain();
        let seed = vec!["val a = 1".to_string()];
        let config = ReadConfig {
            scheme: &scheme,
            oracle: &NoCompletions,
            history_seed: &seed,
        };
        let events = vec![key(KeyCode::Up), InputEvent::Submit];
        let mut editor = LineEditor::new(ScriptedFrontend::new(events));

        let outcome = editor.read_statement("@ ", &config);
        assert_eq!(
            outcome,
            ReadOutcome::Success {
                text: "val a = 1".to_string(),
                tokens: vec!["val a = 1".to_string()],
            }
        );
        assert_eq!(editor.history().len(), 2);
        assert_eq!(editor.history().submitted().count(), 1);
    }

    #[test]
    fn test_frontend_fault_is_failure_and_editor_recovers() {
        let scheme = ColorScheme::plain();
        let config = ReadConfig {
            scheme: &scheme,
            oracle: &NoCompletions,
            history_seed: &[],
        };
        let mut frontend = ScriptedFrontend::new(ScriptedFrontend::keys("1"));
        frontend.fail_next_reads(1);
        let mut editor = LineEditor::new(frontend);

        let outcome = editor.read_statement("@ ", &config);
        assert_eq!(
            outcome,
            ReadOutcome::Failure("scripted read failure".to_string())
        );
        assert!(editor.history().is_empty());

        editor.frontend_mut().push([InputEvent::Submit]);
        let outcome = editor.read_statement("@ ", &config);
        assert_eq!(
            outcome,
            ReadOutcome::Success {
                text: "1".to_string(),
                tokens: vec!["1".to_string()],
            }
        );
    }

    #[test]
    fn test_pending_prompt_follows_probing_parse() {
        let scheme = ColorScheme::plain();
        let mut buffer = EditBuffer::new();
        assert!(!edit_view("@ ", &buffer, &scheme).pending);
        buffer.insert_str("foo(");
        assert!(edit_view("@ ", &buffer, &scheme).pending);
        buffer.insert_str(")");
        assert!(!edit_view("@ ", &buffer, &scheme).pending);
    }
}
