use super::{CompletionOracle, OracleReply};
use crate::parser::lexer::{lex, LexemeKind, KEYWORDS};
use crate::ui::input_metrics::clamp_to_char_boundary_left;
use std::collections::BTreeMap;

const BUILTIN_MEMBERS: &[(&str, &[(&str, &str)])] = &[
    (
        "math",
        &[
            ("abs", "def abs(x: Int): Int"),
            ("max", "def max(a: Int, b: Int): Int"),
            ("min", "def min(a: Int, b: Int): Int"),
            ("pow", "def pow(x: Double, y: Double): Double"),
            ("sqrt", "def sqrt(x: Double): Double"),
        ],
    ),
    (
        "console",
        &[
            ("print", "def print(x: Any): Unit"),
            ("println", "def println(x: Any): Unit"),
            ("readLine", "def readLine(): String"),
        ],
    ),
];

/// Completes keywords, names defined by earlier statements and members of a
/// few built-in objects.
#[derive(Debug, Default)]
pub struct SymbolOracle {
    /// Defined name to the signatures recorded for it.
    names: BTreeMap<String, Vec<String>>,
}

impl SymbolOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the name a `val`, `var` or `def` statement introduces.
    pub fn learn(&mut self, statement: &str) {
        let lexemes: Vec<_> = lex(statement)
            .into_iter()
            .filter(|l| l.kind != LexemeKind::Comment)
            .collect();
        let [keyword, name, ..] = lexemes.as_slice() else {
            return;
        };
        let keyword_text = &statement[keyword.span.clone()];
        if keyword.kind != LexemeKind::Keyword
            || !matches!(keyword_text, "val" | "var" | "def")
            || name.kind != LexemeKind::Ident
        {
            return;
        }

        let mut depth = 0i32;
        let mut signature_end = statement.len();
        for lexeme in &lexemes[2..] {
            match &statement[lexeme.span.clone()] {
                "(" | "[" => depth += 1,
                ")" | "]" => depth -= 1,
                "=" if depth == 0 => {
                    signature_end = lexeme.span.start;
                    break;
                }
                _ => {}
            }
        }

        let signatures = self
            .names
            .entry(statement[name.span.clone()].to_string())
            .or_default();
        signatures.clear();
        if keyword_text == "def" {
            signatures.push(statement[..signature_end].trim_end().to_string());
        }
    }

    pub fn knows(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    fn members(receiver: &str) -> Option<&'static [(&'static str, &'static str)]> {
        BUILTIN_MEMBERS
            .iter()
            .find(|(object, _)| *object == receiver)
            .map(|(_, members)| *members)
    }
}

impl CompletionOracle for SymbolOracle {
    fn complete(&self, cursor: usize, text: &str) -> OracleReply {
        let cursor = clamp_to_char_boundary_left(text, cursor);
        let before = &text[..cursor];
        let start = identifier_start(before);
        let partial = &before[start..];

        let mut candidates = Vec::new();
        let mut signatures = Vec::new();

        if let Some(receiver_text) = before[..start].strip_suffix('.') {
            let receiver = &receiver_text[identifier_start(receiver_text)..];
            for (member, signature) in Self::members(receiver).unwrap_or_default() {
                if member.starts_with(partial) {
                    candidates.push((*member).to_string());
                }
                if *member == partial {
                    signatures.push((*signature).to_string());
                }
            }
        } else if !partial.is_empty() {
            let builtin_objects = BUILTIN_MEMBERS.iter().map(|(object, _)| *object);
            let defined = self.names.keys().map(String::as_str);
            for name in KEYWORDS.iter().copied().chain(builtin_objects).chain(defined) {
                if name.starts_with(partial) {
                    candidates.push(name.to_string());
                }
            }
            if let Some(recorded) = self.names.get(partial) {
                signatures.extend(recorded.iter().cloned());
            }
        }

        OracleReply {
            replacement_start: start,
            candidates,
            signatures,
        }
    }
}

fn identifier_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == '$')
        .last()
        .map_or(text.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learns_defined_names_and_def_signatures() {
        let mut oracle = SymbolOracle::new();
        oracle.learn("val answer = 42");
        oracle.learn("def twice(x: Int): Int = x * 2");
        oracle.learn("answer + 1");

        assert!(oracle.knows("answer"));
        assert!(oracle.knows("twice"));
        let reply = oracle.complete(5, "twice");
        assert_eq!(reply.candidates, vec!["twice".to_string()]);
        assert_eq!(reply.signatures, vec!["def twice(x: Int): Int".to_string()]);
    }

    #[test]
    fn test_completes_builtin_members_after_dot() {
        let oracle = SymbolOracle::new();
        let reply = oracle.complete(7, "math.mi");
        assert_eq!(reply.replacement_start, 5);
        assert_eq!(reply.candidates, vec!["min".to_string()]);

        let all = oracle.complete(8, "console.");
        assert_eq!(all.candidates.len(), 3);
    }

    #[test]
    fn test_keywords_and_empty_prefix() {
        let oracle = SymbolOracle::new();
        let reply = oracle.complete(2, "wh");
        assert_eq!(reply.candidates, vec!["while".to_string()]);
        assert!(oracle.complete(0, "").candidates.is_empty());
    }

    #[test]
    fn test_identifier_start() {
        assert_eq!(identifier_start("val x = fo"), 8);
        assert_eq!(identifier_start("foo"), 0);
        assert_eq!(identifier_start("foo("), 4);
    }
}
