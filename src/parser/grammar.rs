use super::lexer::{lex, LexemeKind};
use std::ops::Range;

/// Why the grammar stopped before matching the whole buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Stop {
    /// Ran out of input with a delimiter, literal or comment still open.
    /// `consumed` is the end of the last statement finished before it.
    Unterminated { consumed: usize },
    /// A definite violation at `position`.
    Violation {
        expected: String,
        found: String,
        position: usize,
    },
}

type PResult<T> = Result<T, Stop>;

/// Deepest expression or type nesting accepted before the parse gives up.
const MAX_NESTING: usize = 256;

#[derive(Clone, Debug)]
struct Tok<'a> {
    kind: LexemeKind,
    text: &'a str,
    span: Range<usize>,
    nl_before: bool,
}

/// Splits `text` into top-level statement spans, or reports where and why it
/// could not.
pub(crate) fn split_statements(text: &str) -> Result<Vec<Range<usize>>, Stop> {
    let mut open_literal = false;
    let mut toks: Vec<Tok<'_>> = Vec::new();
    let mut prev_end = 0usize;
    for lexeme in lex(text) {
        if lexeme.unterminated {
            open_literal = true;
            break;
        }
        if lexeme.kind == LexemeKind::Comment {
            continue;
        }
        let nl_before = text[prev_end..lexeme.span.start].contains('\n');
        prev_end = lexeme.span.end;
        toks.push(Tok {
            kind: lexeme.kind,
            text: &text[lexeme.span.clone()],
            span: lexeme.span,
            nl_before,
        });
    }

    let eof_at = text.len();
    toks.push(Tok {
        kind: LexemeKind::Unknown,
        text: "",
        span: eof_at..eof_at,
        nl_before: text[prev_end..].contains('\n'),
    });

    let mut parser = Parser {
        toks,
        pos: 0,
        depth: usize::from(open_literal),
        newline_sensitive: vec![true],
        nesting: 0,
        consumed: 0,
    };
    let spans = parser.statements()?;
    if open_literal {
        return Err(Stop::Unterminated {
            consumed: parser.consumed,
        });
    }
    Ok(spans)
}

struct Parser<'a> {
    toks: Vec<Tok<'a>>,
    pos: usize,
    /// Open brackets, plus one while a literal or comment is left open.
    depth: usize,
    newline_sensitive: Vec<bool>,
    /// Expressions and types currently being parsed, one inside the other.
    nesting: usize,
    /// End of the last finished top-level statement.
    consumed: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Tok<'a> {
        &self.toks[self.pos.min(self.toks.len() - 1)]
    }

    fn peek_nth(&self, n: usize) -> &Tok<'a> {
        &self.toks[(self.pos + n).min(self.toks.len() - 1)]
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.toks.len() - 1
    }

    fn bump(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1) {
            Some(idx) => self.toks[idx].span.end,
            None => 0,
        }
    }

    fn is_punct(&self, punct: &str) -> bool {
        let tok = self.peek();
        !self.at_eof() && tok.kind == LexemeKind::Punct && tok.text == punct
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        let tok = self.peek();
        tok.kind == LexemeKind::Keyword && tok.text == keyword
    }

    /// True when a newline before the next token ends the current statement.
    fn newline_ends(&self) -> bool {
        self.peek().nl_before && self.newline_sensitive.last().copied().unwrap_or(true)
    }

    fn fail(&self, expected: &str) -> Stop {
        let tok = self.peek();
        if self.at_eof() && self.depth > 0 {
            return Stop::Unterminated {
                consumed: self.consumed,
            };
        }
        let found = if self.at_eof() {
            "end of input".to_string()
        } else {
            format!("'{}'", tok.text)
        };
        Stop::Violation {
            expected: expected.to_string(),
            found,
            position: tok.span.start,
        }
    }

    fn expect_punct(&mut self, punct: &str) -> PResult<()> {
        if self.is_punct(punct) {
            self.bump();
            Ok(())
        } else {
            Err(self.fail(&format!("'{punct}'")))
        }
    }

    fn expect_ident(&mut self) -> PResult<()> {
        if self.peek().kind == LexemeKind::Ident && !self.at_eof() {
            self.bump();
            Ok(())
        } else {
            Err(self.fail("identifier"))
        }
    }

    fn open(&mut self, punct: &str, newline_sensitive: bool) -> PResult<()> {
        self.expect_punct(punct)?;
        self.depth += 1;
        self.newline_sensitive.push(newline_sensitive);
        Ok(())
    }

    fn close(&mut self, punct: &str) -> PResult<()> {
        self.expect_punct(punct)?;
        self.depth = self.depth.saturating_sub(1);
        self.newline_sensitive.pop();
        Ok(())
    }

    fn nested(&mut self, production: fn(&mut Self) -> PResult<()>) -> PResult<()> {
        if self.nesting >= MAX_NESTING {
            return Err(self.fail("shallower nesting"));
        }
        self.nesting += 1;
        let result = production(self);
        self.nesting -= 1;
        result
    }

    fn statements(&mut self) -> PResult<Vec<Range<usize>>> {
        let mut spans = Vec::new();
        loop {
            while self.is_punct(";") {
                self.bump();
            }
            if self.at_eof() {
                return Ok(spans);
            }

            let start = self.peek().span.start;
            self.statement()?;
            let end = self.prev_end();
            spans.push(start..end);
            self.consumed = end;

            if !(self.at_eof() || self.is_punct(";") || self.peek().nl_before) {
                return Err(self.fail("';' or newline"));
            }
        }
    }

    fn block(&mut self) -> PResult<()> {
        self.open("{", true)?;
        loop {
            while self.is_punct(";") {
                self.bump();
            }
            if self.is_punct("}") {
                break;
            }
            self.statement()?;
            if !(self.is_punct(";") || self.is_punct("}") || self.peek().nl_before) {
                return Err(self.fail("';', newline or '}'"));
            }
        }
        self.close("}")
    }

    fn statement(&mut self) -> PResult<()> {
        if self.is_keyword("val") {
            self.bump();
            self.pattern()?;
            self.type_ascription()?;
            self.expect_punct("=")?;
            self.expr()
        } else if self.is_keyword("var") {
            self.bump();
            self.expect_ident()?;
            self.type_ascription()?;
            self.expect_punct("=")?;
            self.expr()
        } else if self.is_keyword("def") {
            self.bump();
            self.expect_ident()?;
            if self.is_punct("(") {
                self.params()?;
            }
            self.type_ascription()?;
            self.expect_punct("=")?;
            self.expr()
        } else if self.is_keyword("import") {
            self.bump();
            self.import_path()
        } else {
            self.expr()
        }
    }

    fn pattern(&mut self) -> PResult<()> {
        if !self.is_punct("(") {
            return self.expect_ident();
        }
        self.open("(", false)?;
        self.expect_ident()?;
        while self.is_punct(",") {
            self.bump();
            self.expect_ident()?;
        }
        self.close(")")
    }

    fn params(&mut self) -> PResult<()> {
        self.open("(", false)?;
        if !self.is_punct(")") {
            loop {
                self.expect_ident()?;
                self.expect_punct(":")?;
                self.type_()?;
                if !self.is_punct(",") {
                    break;
                }
                self.bump();
            }
        }
        self.close(")")
    }

    fn type_ascription(&mut self) -> PResult<()> {
        if self.is_punct(":") {
            self.bump();
            self.type_()?;
        }
        Ok(())
    }

    fn import_path(&mut self) -> PResult<()> {
        self.expect_ident()?;
        while self.is_punct(".") {
            self.bump();
            if self.is_punct("{") {
                self.open("{", false)?;
                self.expect_ident()?;
                while self.is_punct(",") {
                    self.bump();
                    self.expect_ident()?;
                }
                return self.close("}");
            }
            self.expect_ident()?;
        }
        Ok(())
    }

    fn type_(&mut self) -> PResult<()> {
        self.nested(Self::type_body)
    }

    fn type_body(&mut self) -> PResult<()> {
        if self.is_punct("(") {
            self.open("(", false)?;
            if !self.is_punct(")") {
                self.type_()?;
                while self.is_punct(",") {
                    self.bump();
                    self.type_()?;
                }
            }
            self.close(")")?;
            self.expect_punct("=>")?;
            return self.type_();
        }

        if self.peek().kind != LexemeKind::Ident || self.at_eof() {
            return Err(self.fail("type"));
        }
        self.bump();
        while self.is_punct(".") {
            self.bump();
            self.expect_ident()?;
        }
        if self.is_punct("[") {
            self.type_args()?;
        }
        if self.is_punct("=>") {
            self.bump();
            self.type_()?;
        }
        Ok(())
    }

    fn type_args(&mut self) -> PResult<()> {
        self.open("[", false)?;
        self.type_()?;
        while self.is_punct(",") {
            self.bump();
            self.type_()?;
        }
        self.close("]")
    }

    fn expr(&mut self) -> PResult<()> {
        self.nested(Self::expr_body)
    }

    fn expr_body(&mut self) -> PResult<()> {
        if self.is_keyword("if") {
            self.bump();
            self.paren_condition()?;
            self.expr()?;
            if self.is_keyword("else") {
                self.bump();
                self.expr()?;
            }
            return Ok(());
        }
        if self.is_keyword("while") {
            self.bump();
            self.paren_condition()?;
            return self.expr();
        }

        let next = self.peek_nth(1);
        if self.peek().kind == LexemeKind::Ident
            && next.kind == LexemeKind::Punct
            && next.text == "=>"
        {
            self.bump();
            self.bump();
            return self.expr();
        }

        self.infix()?;
        if self.is_punct("=") && !self.newline_ends() {
            self.bump();
            self.expr()?;
        }
        Ok(())
    }

    fn paren_condition(&mut self) -> PResult<()> {
        self.open("(", false)?;
        self.expr()?;
        self.close(")")
    }

    fn infix(&mut self) -> PResult<()> {
        self.prefix()?;
        loop {
            let tok = self.peek();
            let is_operator = !self.at_eof()
                && (tok.kind == LexemeKind::Op || tok.kind == LexemeKind::Ident);
            if !is_operator || self.newline_ends() {
                return Ok(());
            }
            self.bump();
            self.prefix()?;
        }
    }

    fn prefix(&mut self) -> PResult<()> {
        let (kind, text) = (self.peek().kind, self.peek().text);
        if kind == LexemeKind::Op && matches!(text, "-" | "+" | "!" | "~") {
            self.bump();
        }
        self.postfix()
    }

    fn postfix(&mut self) -> PResult<()> {
        self.primary()?;
        loop {
            if self.newline_ends() {
                return Ok(());
            }
            if self.is_punct(".") {
                self.bump();
                self.expect_ident()?;
            } else if self.is_punct("(") {
                self.args()?;
            } else if self.is_punct("[") {
                self.type_args()?;
            } else if self.is_punct("{") {
                self.block()?;
            } else {
                return Ok(());
            }
        }
    }

    fn args(&mut self) -> PResult<()> {
        self.open("(", false)?;
        if !self.is_punct(")") {
            self.expr()?;
            while self.is_punct(",") {
                self.bump();
                self.expr()?;
            }
        }
        self.close(")")
    }

    fn primary(&mut self) -> PResult<()> {
        if self.at_eof() {
            return Err(self.fail("expression"));
        }
        let (kind, text) = (self.peek().kind, self.peek().text);
        match kind {
            kind if kind.is_literal() => {
                self.bump();
                Ok(())
            }
            LexemeKind::Ident => {
                self.bump();
                Ok(())
            }
            LexemeKind::Keyword if matches!(text, "this" | "super") => {
                self.bump();
                Ok(())
            }
            LexemeKind::Keyword if text == "new" => {
                self.bump();
                self.type_()?;
                if self.is_punct("(") && !self.newline_ends() {
                    self.args()?;
                }
                Ok(())
            }
            LexemeKind::Punct if text == "(" => self.args(),
            LexemeKind::Punct if text == "{" => self.block(),
            _ => Err(self.fail("expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        split_statements(text)
            .expect("statements should parse")
            .into_iter()
            .map(|span| &text[span])
            .collect()
    }

    #[test]
    fn test_splits_on_semicolons_and_newlines() {
        assert_eq!(words("val a = 1; a + 1"), vec!["val a = 1", "a + 1"]);
        assert_eq!(words("val a = 1\nval b = a"), vec!["val a = 1", "val b = a"]);
        assert_eq!(words("  1+1  "), vec!["1+1"]);
        assert!(words("").is_empty());
    }

    #[test]
    fn test_trailing_operator_continues_on_next_line() {
        assert_eq!(words("1 +\n2"), vec!["1 +\n2"]);
    }

    #[test]
    fn test_leading_operator_starts_new_statement() {
        assert_eq!(words("1\n-2"), vec!["1", "-2"]);
    }

    #[test]
    fn test_newlines_inside_parens_are_ignored() {
        assert_eq!(words("foo(1,\n2)"), vec!["foo(1,\n2)"]);
        assert!(matches!(
            split_statements("foo(1)\n.bar"),
            Err(Stop::Violation { position: 7, .. })
        ));
    }

    #[test]
    fn test_definitions_and_blocks() {
        assert_eq!(
            words("def f(x: Int, y: List[Int]): Int = {\n  val z = x\n  z + y.size\n}"),
            vec!["def f(x: Int, y: List[Int]): Int = {\n  val z = x\n  z + y.size\n}"]
        );
        assert_eq!(words("import scala.collection.{Map, Set}"), vec!["import scala.collection.{Map, Set}"]);
        assert_eq!(words("if (a) b\nelse c"), vec!["if (a) b\nelse c"]);
        assert_eq!(words("xs.map(x => x * 2)"), vec!["xs.map(x => x * 2)"]);
        assert_eq!(words("val f: Int => Int = x => x"), vec!["val f: Int => Int = x => x"]);
    }

    #[test]
    fn test_open_delimiter_is_unterminated() {
        assert_eq!(
            split_statements("val x = ("),
            Err(Stop::Unterminated { consumed: 0 })
        );
        assert_eq!(
            split_statements("val a = 1\nfoo(a,"),
            Err(Stop::Unterminated { consumed: 9 })
        );
        assert!(matches!(
            split_statements("\"abc"),
            Err(Stop::Unterminated { .. })
        ));
        assert!(matches!(
            split_statements("1 /* still open"),
            Err(Stop::Unterminated { consumed: 1 })
        ));
    }

    #[test]
    fn test_trailing_operator_is_a_violation() {
        assert_eq!(
            split_statements("1+"),
            Err(Stop::Violation {
                expected: "expression".to_string(),
                found: "end of input".to_string(),
                position: 2,
            })
        );
    }

    #[test]
    fn test_stray_closer_is_a_violation() {
        assert_eq!(
            split_statements("1)"),
            Err(Stop::Violation {
                expected: "';' or newline".to_string(),
                found: "')'".to_string(),
                position: 1,
            })
        );
        assert!(matches!(
            split_statements("(1 +)"),
            Err(Stop::Violation { position: 4, .. })
        ));
    }

    #[test]
    fn test_nesting_past_the_limit_stops_the_parse() {
        let deep = "(".repeat(5_000);
        assert!(matches!(
            split_statements(&deep),
            Err(Stop::Violation { ref expected, .. }) if expected == "shallower nesting"
        ));

        let lambdas = format!("{}x", "x => ".repeat(MAX_NESTING + 10));
        assert!(matches!(
            split_statements(&lambdas),
            Err(Stop::Violation { ref expected, .. }) if expected == "shallower nesting"
        ));

        let balanced = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(words(&balanced), vec![balanced.as_str()]);
    }
}
