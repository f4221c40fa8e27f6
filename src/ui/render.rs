use crate::highlight::{highlight, ColorScheme};
use crate::ui::input_metrics::{char_display_width, cursor_row_col, display_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

/// Everything needed to draw the statement being edited.
#[derive(Clone, Copy, Debug)]
pub struct EditView<'a> {
    pub prompt: &'a str,
    pub text: &'a str,
    pub cursor: usize,
    /// The buffer does not parse yet; the prompt is dimmed.
    pub pending: bool,
    pub scheme: &'a ColorScheme,
}

impl EditView<'_> {
    pub fn gutter_width(&self) -> usize {
        display_width(self.prompt)
    }

    fn continuation_gutter(&self) -> String {
        let width = self.gutter_width();
        if width >= 2 {
            format!("{:>width$}", "| ")
        } else {
            " ".repeat(width)
        }
    }

    fn prompt_style(&self) -> Style {
        if self.pending {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        }
    }

    pub fn cursor_row_col(&self, width: usize) -> (usize, usize) {
        cursor_row_col(self.text, self.cursor, self.gutter_width(), width)
    }
}

/// The highlighted buffer with a prompt or continuation gutter on each line,
/// wrapped at `width` columns.
pub fn edit_lines(view: &EditView<'_>, width: usize) -> Vec<Line<'static>> {
    let highlighted = highlight(view.text, view.scheme);
    let continuation = view.continuation_gutter();
    let mut rows = Vec::new();
    for (index, line) in highlighted.lines.into_iter().enumerate() {
        let gutter = if index == 0 {
            view.prompt.to_string()
        } else {
            continuation.clone()
        };
        let mut spans = vec![Span::styled(gutter, view.prompt_style())];
        spans.extend(line.spans);
        rows.extend(wrap_spans(spans, width));
    }
    rows
}

fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut col = 0usize;

    for span in spans {
        let mut piece = String::new();
        for ch in span.content.chars() {
            let ch_width = char_display_width(ch);
            if col + ch_width > width && col > 0 {
                if !piece.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut piece), span.style));
                }
                rows.push(Line::from(std::mem::take(&mut current)));
                col = 0;
            }
            piece.push(ch);
            col += ch_width;
        }
        if !piece.is_empty() {
            current.push(Span::styled(piece, span.style));
        }
    }
    rows.push(Line::from(current));
    rows
}

/// Draws the edit area into `area`, scrolled so the cursor row is visible.
pub fn render_edit_area(frame: &mut Frame<'_>, area: Rect, view: &EditView<'_>) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let width = area.width as usize;
    let lines = edit_lines(view, width);
    let (cursor_row, cursor_col) = view.cursor_row_col(width);
    let visible_rows = area.height as usize;
    let window_start = cursor_row.saturating_add(1).saturating_sub(visible_rows);

    let visible: Vec<Line<'static>> = lines
        .into_iter()
        .skip(window_start)
        .take(visible_rows)
        .collect();
    frame.render_widget(Paragraph::new(Text::from(visible)), area);

    let cursor_y = area
        .y
        .saturating_add(cursor_row.saturating_sub(window_start) as u16);
    let cursor_x = area
        .x
        .saturating_add(cursor_col as u16)
        .min(area.x.saturating_add(area.width.saturating_sub(1)));
    frame.set_cursor_position((cursor_x, cursor_y));
}

/// Candidate display texts laid out in columns for `width`.
pub fn candidate_columns(display: &[&str], width: usize) -> Vec<String> {
    let Some(widest) = display.iter().map(|d| display_width(d)).max() else {
        return Vec::new();
    };
    let column = widest + 2;
    let per_row = (width.max(1) / column).max(1);
    display
        .chunks(per_row)
        .map(|row| {
            let mut line = String::new();
            for item in row {
                line.push_str(item);
                let pad = column.saturating_sub(display_width(item));
                line.push_str(&" ".repeat(pad));
            }
            line.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_rows(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_edit_lines_prefix_prompt_and_continuation() {
        let scheme = ColorScheme::plain();
        let view = EditView {
            prompt: "@ ",
            text: "val x = (\n1)",
            cursor: 12,
            pending: false,
            scheme: &scheme,
        };
        assert_eq!(plain_rows(&edit_lines(&view, 80)), vec!["@ val x = (", "| 1)"]);
        assert_eq!(view.cursor_row_col(80), (1, 4));
    }

    #[test]
    fn test_edit_lines_wrap_like_cursor_metrics() {
        let scheme = ColorScheme::plain();
        let view = EditView {
            prompt: "> ",
            text: "abcdefgh",
            cursor: 8,
            pending: true,
            scheme: &scheme,
        };
        let rows = edit_lines(&view, 5);
        assert_eq!(plain_rows(&rows), vec!["> abc", "defgh"]);
        assert_eq!(view.cursor_row_col(5), (2, 0));
    }

    #[test]
    fn test_candidate_columns() {
        let rows = candidate_columns(&["max", "min", "pow", "sqrt"], 13);
        assert_eq!(rows, vec!["max   min", "pow   sqrt"]);
        assert!(candidate_columns(&[], 80).is_empty());
    }
}
