use crate::history::HistoryEntry;
use crate::ui::input_metrics::clamp_to_char_boundary_left;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub cursor: usize,
}

/// The statement being edited: text, cursor byte offset, undo stacks and
/// the position while walking back through history.
#[derive(Debug, Default)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
    recall_index: Option<usize>,
    recall_stash: Option<Snapshot>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn prev_char_boundary(&self, idx: usize) -> usize {
        let i = clamp_to_char_boundary_left(&self.text, idx);
        self.text[..i]
            .char_indices()
            .next_back()
            .map_or(0, |(j, _)| j)
    }

    fn next_char_boundary(&self, idx: usize) -> usize {
        let i = clamp_to_char_boundary_left(&self.text, idx);
        match self.text[i..].chars().next() {
            Some(ch) => i + ch.len_utf8(),
            None => self.text.len(),
        }
    }

    fn line_start(&self) -> usize {
        self.text[..self.cursor].rfind('\n').map_or(0, |idx| idx + 1)
    }

    fn line_end(&self) -> usize {
        self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |idx| self.cursor + idx)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            cursor: self.cursor,
        }
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();
    }

    fn restore(&mut self, snap: Snapshot) {
        self.text = snap.text;
        self.cursor = clamp_to_char_boundary_left(&self.text, snap.cursor);
    }

    fn leave_recall(&mut self) {
        self.recall_index = None;
        self.recall_stash = None;
    }

    pub fn insert_str(&mut self, value: &str) {
        self.leave_recall();
        let cursor = clamp_to_char_boundary_left(&self.text, self.cursor);
        self.push_undo();
        self.text.insert_str(cursor, value);
        self.cursor = cursor + value.len();
    }

    /// Replaces `[start, cursor)` with `value`, leaving the cursor after it.
    pub fn replace_before_cursor(&mut self, start: usize, value: &str) {
        self.leave_recall();
        let end = clamp_to_char_boundary_left(&self.text, self.cursor);
        let start = clamp_to_char_boundary_left(&self.text, start.min(end));
        self.push_undo();
        self.text.replace_range(start..end, value);
        self.cursor = start + value.len();
    }

    /// Continuation after an unfinished submit: newline at the end of the
    /// buffer, cursor after it.
    pub fn push_line_break(&mut self) {
        self.leave_recall();
        self.push_undo();
        self.text.push('\n');
        self.cursor = self.text.len();
    }

    pub fn backspace(&mut self) {
        let end = clamp_to_char_boundary_left(&self.text, self.cursor);
        if end == 0 {
            return;
        }
        self.leave_recall();
        let start = self.prev_char_boundary(end);
        self.push_undo();
        self.text.replace_range(start..end, "");
        self.cursor = start;
    }

    pub fn delete(&mut self) {
        let start = clamp_to_char_boundary_left(&self.text, self.cursor);
        if start >= self.text.len() {
            return;
        }
        self.leave_recall();
        let end = self.next_char_boundary(start);
        self.push_undo();
        self.text.replace_range(start..end, "");
        self.cursor = start;
    }

    pub fn kill_to_line_start(&mut self) {
        let start = self.line_start();
        if start == self.cursor {
            return;
        }
        self.leave_recall();
        self.push_undo();
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_char_boundary(self.cursor);
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_char_boundary(self.cursor);
    }

    pub fn move_home(&mut self) {
        self.cursor = self.line_start();
    }

    pub fn move_end(&mut self) {
        self.cursor = self.line_end();
    }

    pub fn undo(&mut self) {
        if let Some(previous) = self.undo_stack.pop() {
            self.redo_stack.push(self.snapshot());
            self.restore(previous);
        }
    }

    pub fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push(self.snapshot());
            self.restore(next);
        }
    }

    pub fn recall_previous(&mut self, entries: &[HistoryEntry]) {
        if entries.is_empty() {
            return;
        }

        if self.recall_index.is_none() {
            self.recall_stash = Some(self.snapshot());
        }
        let next_index = match self.recall_index {
            Some(idx) => idx.saturating_sub(1),
            None => entries.len() - 1,
        };
        self.recall_index = Some(next_index);
        self.text = entries[next_index].text.clone();
        self.cursor = self.text.len();
    }

    pub fn recall_next(&mut self, entries: &[HistoryEntry]) {
        let Some(idx) = self.recall_index else {
            return;
        };

        if idx + 1 >= entries.len() {
            self.recall_index = None;
            if let Some(stash) = self.recall_stash.take() {
                self.restore(stash);
            } else {
                self.text.clear();
                self.cursor = 0;
            }
        } else {
            let next = idx + 1;
            self.recall_index = Some(next);
            self.text = entries[next].text.clone();
            self.cursor = self.text.len();
        }
    }

    /// Empties the buffer and hands back its text.
    pub fn take(&mut self) -> String {
        self.leave_recall();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}
