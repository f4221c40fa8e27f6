//! Tab completion on top of an external completion oracle.

pub mod symbols;

use crate::highlight::{highlight, ColorScheme};
use crate::parser::{parse_at, ResolutionMode};
use crate::ui::input_metrics::clamp_to_char_boundary_left;
use ratatui::text::Text;

const MEMBER_SEPARATOR: char = '.';

/// What the external oracle knows about the cursor position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OracleReply {
    pub replacement_start: usize,
    pub candidates: Vec<String>,
    pub signatures: Vec<String>,
}

pub trait CompletionOracle {
    fn complete(&self, cursor: usize, text: &str) -> OracleReply;
}

impl<F> CompletionOracle for F
where
    F: Fn(usize, &str) -> OracleReply,
{
    fn complete(&self, cursor: usize, text: &str) -> OracleReply {
        self(cursor, text)
    }
}

/// An oracle that never suggests anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCompletions;

impl CompletionOracle for NoCompletions {
    fn complete(&self, cursor: usize, _text: &str) -> OracleReply {
        OracleReply {
            replacement_start: cursor,
            ..OracleReply::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub insert_text: String,
    pub display_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureLine {
    pub text: String,
    pub styled: Text<'static>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completions {
    /// Start of the buffer range `[anchor, cursor)` an insert text replaces.
    pub anchor: usize,
    pub candidates: Vec<Candidate>,
    pub signatures: Vec<SignatureLine>,
}

impl Completions {
    pub fn insert_texts(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|c| c.insert_text.as_str())
            .collect()
    }

    /// Longest prefix shared by every insert text.
    pub fn common_prefix(&self) -> &str {
        let Some(first) = self.candidates.first() else {
            return "";
        };
        let mut prefix = first.insert_text.as_str();
        for candidate in &self.candidates[1..] {
            let shared = prefix
                .char_indices()
                .zip(candidate.insert_text.chars())
                .find(|((_, a), b)| a != b)
                .map_or_else(
                    || prefix.len().min(candidate.insert_text.len()),
                    |((idx, _), _)| idx,
                );
            prefix = &prefix[..shared];
        }
        prefix
    }
}

pub fn complete(
    cursor: usize,
    text: &str,
    oracle: &dyn CompletionOracle,
    scheme: &ColorScheme,
) -> Completions {
    let reply = oracle.complete(cursor, text);
    let mut raw = reply.candidates;
    raw.sort();

    let dotted = match parse_at(text, cursor, ResolutionMode::Completing).active_word() {
        Some(active) => member_prefix(&active.word).map(|prefix| (active.start, prefix.to_string())),
        None => None,
    };

    let (anchor, candidates): (usize, Vec<Candidate>) = match dotted {
        Some((start, prefix)) => (
            start,
            raw.into_iter()
                .map(|candidate| Candidate {
                    insert_text: format!("{prefix}{candidate}"),
                    display_text: candidate,
                })
                .collect(),
        ),
        None => (
            clamp_to_char_boundary_left(text, reply.replacement_start.min(cursor)),
            raw.into_iter()
                .map(|candidate| Candidate {
                    insert_text: candidate.clone(),
                    display_text: candidate,
                })
                .collect(),
        ),
    };

    let signatures = reply
        .signatures
        .into_iter()
        .map(|text| SignatureLine {
            styled: highlight(&text, scheme),
            text,
        })
        .collect();

    tracing::debug!(cursor, anchor, count = candidates.len(), "completion candidates");
    Completions {
        anchor,
        candidates,
        signatures,
    }
}

/// The word up to and including its last member separator, when what
/// follows the separator is a partial identifier.
fn member_prefix(word: &str) -> Option<&str> {
    let dot = word.rfind(MEMBER_SEPARATOR)?;
    let tail = &word[dot + 1..];
    if tail
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    {
        Some(&word[..=dot])
    } else {
        None
    }
}
