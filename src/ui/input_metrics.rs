use unicode_width::UnicodeWidthChar;

/// Row and column of `cursor_byte` once every buffer line is prefixed with a
/// `gutter`-wide prompt and wrapped at `width` columns.
pub fn cursor_row_col(input: &str, cursor_byte: usize, gutter: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let cursor_byte = clamp_to_char_boundary_left(input, cursor_byte);
    let mut row = 0usize;
    let mut col = gutter;

    for (idx, ch) in input.char_indices() {
        if idx >= cursor_byte {
            break;
        }
        advance(ch, gutter, width, &mut row, &mut col);
    }

    if col >= width {
        row += 1;
        col = 0;
    }

    (row, col)
}

fn advance(ch: char, gutter: usize, width: usize, row: &mut usize, col: &mut usize) {
    match ch {
        '\r' => {}
        '\n' => {
            *row += 1;
            *col = gutter;
        }
        _ => {
            let ch_width = char_display_width(ch);
            if *col + ch_width > width && *col > 0 {
                *row += 1;
                *col = 0;
            }
            *col += ch_width;
        }
    }
}

pub fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

pub fn display_width(text: &str) -> usize {
    text.chars().map(char_display_width).sum()
}

pub fn clamp_to_char_boundary_left(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while cursor > 0 && !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}
