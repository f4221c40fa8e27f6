//! Incremental statement parser.
//!
//! Every call re-parses the whole buffer; nothing is remembered between
//! calls. The [`ResolutionMode`] decides how a buffer the grammar cannot
//! match is reported back to the caller.

mod grammar;
pub mod lexer;

use crate::error::SyntaxError;
use grammar::{split_statements, Stop};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionMode {
    /// The user is still typing; nothing is ever reported as an error.
    Probing,
    /// Probing on behalf of tab completion. An unterminated buffer still
    /// yields a `Complete` outcome with no words.
    Completing,
    /// The user asked to submit the buffer.
    Committing,
}

/// One top-level statement of the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub span: Range<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveWord {
    pub word: String,
    pub local_cursor: usize,
    /// Byte offset in the buffer where the word starts.
    pub start: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    Complete {
        words: Vec<Word>,
        active_word: Option<ActiveWord>,
        consumed: usize,
    },
    Incomplete,
    Failure(SyntaxError),
}

impl ParseOutcome {
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ParseOutcome::Incomplete)
    }

    pub fn words(&self) -> &[Word] {
        match self {
            ParseOutcome::Complete { words, .. } => words,
            _ => &[],
        }
    }

    pub fn active_word(&self) -> Option<&ActiveWord> {
        match self {
            ParseOutcome::Complete { active_word, .. } => active_word.as_ref(),
            _ => None,
        }
    }
}

/// Parses `text` with the cursor at the end of the buffer.
pub fn parse(text: &str, mode: ResolutionMode) -> ParseOutcome {
    parse_at(text, text.len(), mode)
}

pub fn parse_at(text: &str, cursor: usize, mode: ResolutionMode) -> ParseOutcome {
    let outcome = match split_statements(text) {
        Ok(spans) => complete(text, cursor, spans, text.len()),
        Err(Stop::Violation {
            expected,
            found,
            position,
        }) => match mode {
            ResolutionMode::Committing => ParseOutcome::Failure(SyntaxError::Syntax {
                message: describe(text, &expected, &found, position),
                position,
            }),
            ResolutionMode::Probing | ResolutionMode::Completing => ParseOutcome::Incomplete,
        },
        Err(Stop::Unterminated { consumed }) => match mode {
            ResolutionMode::Probing => ParseOutcome::Incomplete,
            ResolutionMode::Committing => ParseOutcome::Failure(SyntaxError::MissingDelimiter {
                position: text.len(),
            }),
            ResolutionMode::Completing => ParseOutcome::Complete {
                words: Vec::new(),
                active_word: None,
                consumed,
            },
        },
    };
    tracing::trace!(?mode, len = text.len(), ?outcome, "parsed buffer");
    outcome
}

fn complete(text: &str, cursor: usize, spans: Vec<Range<usize>>, consumed: usize) -> ParseOutcome {
    let words: Vec<Word> = spans
        .into_iter()
        .map(|span| Word {
            text: text[span.clone()].to_string(),
            span,
        })
        .collect();

    let active_word = match words.last() {
        Some(last) if cursor == text.len() && last.span.end == cursor => Some(ActiveWord {
            word: last.text.clone(),
            local_cursor: last.text.len(),
            start: last.span.start,
        }),
        _ => None,
    };

    ParseOutcome::Complete {
        words,
        active_word,
        consumed,
    }
}

fn describe(text: &str, expected: &str, found: &str, position: usize) -> String {
    let before = &text[..position.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    format!("Syntax error at {line}:{column}: expected {expected}, found {found}")
}
