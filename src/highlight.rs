use crate::parser::lexer::{lex, LexemeKind};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Comment,
    Type,
    Literal,
    Keyword,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub comment: Style,
    pub type_name: Style,
    pub literal: Style,
    pub keyword: Style,
    /// Everything that is not one of the four categories.
    pub reset: Style,
}

impl ColorScheme {
    pub const NAMES: &'static [&'static str] = &["dark", "light", "plain"];

    pub fn dark() -> Self {
        Self {
            comment: Style::default().fg(Color::Blue),
            type_name: Style::default().fg(Color::Green),
            literal: Style::default().fg(Color::LightGreen),
            keyword: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            reset: Style::default(),
        }
    }

    pub fn light() -> Self {
        Self {
            comment: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            type_name: Style::default().fg(Color::Magenta),
            literal: Style::default().fg(Color::Red),
            keyword: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            reset: Style::default(),
        }
    }

    pub fn plain() -> Self {
        Self {
            comment: Style::default(),
            type_name: Style::default(),
            literal: Style::default(),
            keyword: Style::default(),
            reset: Style::default(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "plain" | "none" => Some(Self::plain()),
            _ => None,
        }
    }

    pub fn style_for(&self, category: Option<Category>) -> Style {
        match category {
            Some(Category::Comment) => self.comment,
            Some(Category::Type) => self.type_name,
            Some(Category::Literal) => self.literal,
            Some(Category::Keyword) => self.keyword,
            None => self.reset,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}

pub fn classify(kind: LexemeKind, text: &str) -> Option<Category> {
    match kind {
        LexemeKind::Comment => Some(Category::Comment),
        LexemeKind::Keyword => Some(Category::Keyword),
        kind if kind.is_literal() => Some(Category::Literal),
        LexemeKind::Ident if text.starts_with(|c: char| c.is_uppercase()) => Some(Category::Type),
        _ => None,
    }
}

/// Styles `text` one line per source line. Used for both the live edit
/// buffer and signature help.
pub fn highlight(text: &str, scheme: &ColorScheme) -> Text<'static> {
    let mut out = StyledLines::default();
    let mut pos = 0usize;
    for lexeme in lex(text) {
        out.push(&text[pos..lexeme.span.start], scheme.reset);
        let slice = &text[lexeme.span.clone()];
        out.push(slice, scheme.style_for(classify(lexeme.kind, slice)));
        pos = lexeme.span.end;
    }
    out.push(&text[pos..], scheme.reset);
    out.finish()
}

#[derive(Default)]
struct StyledLines {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

impl StyledLines {
    fn push(&mut self, segment: &str, style: Style) {
        let mut pieces = segment.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            let piece = piece.trim_end_matches('\r');
            if !piece.is_empty() {
                self.current.push(Span::styled(piece.to_string(), style));
            }
            if pieces.peek().is_some() {
                self.lines
                    .push(Line::from(std::mem::take(&mut self.current)));
            }
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.lines.push(Line::from(self.current));
        Text::from(self.lines)
    }
}
