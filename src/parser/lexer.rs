use std::ops::Range;

pub const KEYWORDS: &[&str] = &[
    "abstract", "case", "catch", "class", "def", "do", "else", "extends", "final", "finally",
    "for", "if", "implicit", "import", "lazy", "match", "new", "object", "override", "package",
    "private", "protected", "return", "sealed", "super", "this", "throw", "trait", "try", "type",
    "val", "var", "while", "with", "yield",
];

pub const CONSTANTS: &[&str] = &["true", "false", "null"];

const OPERATOR_CHARS: &str = "+-*/%<>=!&|^~?:#@\\";
const PUNCT_CHARS: &str = "()[]{},;.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexemeKind {
    Ident,
    Keyword,
    Constant,
    Int,
    Float,
    Str,
    Char,
    Op,
    Punct,
    Comment,
    Unknown,
}

impl LexemeKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            LexemeKind::Constant
                | LexemeKind::Int
                | LexemeKind::Float
                | LexemeKind::Str
                | LexemeKind::Char
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub span: Range<usize>,
    /// Set on a string, char or block comment that runs into end of input.
    pub unterminated: bool,
}

/// Splits `text` into lexemes. Whitespace is dropped; everything else is
/// covered, so the spans plus the gaps between them reproduce the input.
pub fn lex(text: &str) -> Vec<Lexeme> {
    let mut lexer = Lexer { text, pos: 0 };
    let mut out = Vec::new();
    while let Some(lexeme) = lexer.next_lexeme() {
        out.push(lexeme);
    }
    out
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn next_lexeme(&mut self) -> Option<Lexeme> {
        self.bump_while(char::is_whitespace);
        let start = self.pos;
        let ch = self.peek()?;

        let (kind, unterminated) = if self.rest().starts_with("//") {
            self.bump_while(|c| c != '\n');
            (LexemeKind::Comment, false)
        } else if self.rest().starts_with("/*") {
            (LexemeKind::Comment, !self.block_comment())
        } else if ch.is_ascii_digit() {
            (self.number(), false)
        } else if ch == '"' {
            (LexemeKind::Str, !self.string())
        } else if ch == '\'' {
            self.char_literal()
        } else if ch.is_alphabetic() || ch == '_' || ch == '$' {
            self.bump_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
            let word = &self.text[start..self.pos];
            let kind = if KEYWORDS.contains(&word) {
                LexemeKind::Keyword
            } else if CONSTANTS.contains(&word) {
                LexemeKind::Constant
            } else {
                LexemeKind::Ident
            };
            (kind, false)
        } else if PUNCT_CHARS.contains(ch) {
            self.bump();
            (LexemeKind::Punct, false)
        } else if OPERATOR_CHARS.contains(ch) {
            self.operator();
            let op = &self.text[start..self.pos];
            let kind = if matches!(op, "=" | "=>" | ":") {
                LexemeKind::Punct
            } else {
                LexemeKind::Op
            };
            (kind, false)
        } else {
            self.bump();
            (LexemeKind::Unknown, false)
        };

        Some(Lexeme {
            kind,
            span: start..self.pos,
            unterminated,
        })
    }

    fn block_comment(&mut self) -> bool {
        self.pos += 2;
        match self.rest().find("*/") {
            Some(offset) => {
                self.pos += offset + 2;
                true
            }
            None => {
                self.pos = self.text.len();
                false
            }
        }
    }

    fn number(&mut self) -> LexemeKind {
        self.bump_while(|c| c.is_ascii_digit() || c == '_');
        let mut kind = LexemeKind::Int;
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
            kind = LexemeKind::Float;
        }
        match self.peek() {
            Some('L' | 'l') if kind == LexemeKind::Int => {
                self.bump();
            }
            Some('f' | 'F' | 'd' | 'D') => {
                self.bump();
                kind = LexemeKind::Float;
            }
            _ => {}
        }
        kind
    }

    fn string(&mut self) -> bool {
        if self.rest().starts_with("\"\"\"") {
            self.pos += 3;
            return match self.rest().find("\"\"\"") {
                Some(offset) => {
                    self.pos += offset + 3;
                    true
                }
                None => {
                    self.pos = self.text.len();
                    false
                }
            };
        }

        self.bump();
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    self.bump();
                }
                '"' => return true,
                _ => {}
            }
        }
        false
    }

    fn char_literal(&mut self) -> (LexemeKind, bool) {
        let start = self.pos;
        self.bump();
        match self.bump() {
            None => return (LexemeKind::Char, true),
            Some('\\') => {
                if self.bump().is_none() {
                    return (LexemeKind::Char, true);
                }
            }
            Some(_) => {}
        }
        match self.peek() {
            None => (LexemeKind::Char, true),
            Some('\'') => {
                self.bump();
                (LexemeKind::Char, false)
            }
            Some(_) => {
                self.pos = start + 1;
                (LexemeKind::Unknown, false)
            }
        }
    }

    fn operator(&mut self) {
        while let Some(ch) = self.peek() {
            if !OPERATOR_CHARS.contains(ch) {
                break;
            }
            if self.rest().starts_with("//") || self.rest().starts_with("/*") {
                break;
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(LexemeKind, &str)> {
        lex(text)
            .into_iter()
            .map(|l| (l.kind, &text[l.span]))
            .collect()
    }

    #[test]
    fn test_lex_definition() {
        assert_eq!(
            kinds("val x: Int = 1 + 2.5"),
            vec![
                (LexemeKind::Keyword, "val"),
                (LexemeKind::Ident, "x"),
                (LexemeKind::Punct, ":"),
                (LexemeKind::Ident, "Int"),
                (LexemeKind::Punct, "="),
                (LexemeKind::Int, "1"),
                (LexemeKind::Op, "+"),
                (LexemeKind::Float, "2.5"),
            ]
        );
    }

    #[test]
    fn test_member_access_is_not_a_float() {
        assert_eq!(
            kinds("1.toString"),
            vec![
                (LexemeKind::Int, "1"),
                (LexemeKind::Punct, "."),
                (LexemeKind::Ident, "toString"),
            ]
        );
    }

    #[test]
    fn test_operator_stops_before_comment() {
        assert_eq!(
            kinds("a +// note"),
            vec![
                (LexemeKind::Ident, "a"),
                (LexemeKind::Op, "+"),
                (LexemeKind::Comment, "// note"),
            ]
        );
    }

    #[test]
    fn test_unterminated_literals_are_flagged() {
        let string = lex("\"abc");
        assert_eq!(string.len(), 1);
        assert!(string[0].unterminated);

        let comment = lex("1 /* open");
        assert!(comment[1].unterminated);
        assert_eq!(comment[1].kind, LexemeKind::Comment);

        assert!(lex("'a")[0].unterminated);
        assert!(!lex("'a'")[0].unterminated);
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let lexemes = lex(r#""a\"b" c"#);
        assert_eq!(lexemes.len(), 2);
        assert_eq!(lexemes[0].kind, LexemeKind::Str);
        assert!(!lexemes[0].unterminated);
    }

    #[test]
    fn test_stray_quote_is_unknown() {
        assert_eq!(kinds("'ab'")[0], (LexemeKind::Unknown, "'"));
    }
}
