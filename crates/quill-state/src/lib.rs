//! Editor state: buffer, cursor, input mode, clipboard pages, search,
//! menu, undo engine, and the task cancellation token.
//!
//! This is the single mutable entity the interpreter's actions operate
//! on. Only actions mutate it, and actions execute strictly sequentially,
//! so no interior locking exists anywhere here.
//!
//! Cursor rules:
//! * Motions rest the cursor on a real rune (normal-mode clamp).
//! * Deletions rest the cursor at the deletion start, which may equal the
//!   line length — the next motion re-normalizes.
//! * Insert-mode edits coalesce into one undo snapshot per run; leaving
//!   insert mode or inserting a newline ends the run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use quill_text::{Buffer, Position, motion};

pub mod clipboard;
pub mod menu;
pub mod search;
pub mod undo;

pub use clipboard::{Clipboard, DEFAULT_PAGE};
pub use menu::{MenuState, MenuStyle};
pub use search::{SearchDirection, SearchState, find_query};
pub use undo::{Snapshot, UNDO_HISTORY_MAX, UndoEngine};

// -------------------------------------------------------------------------------------------------
// Mode and status tags
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Insert,
    VisualChar,
    VisualLine,
    Menu,
    Search,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMsg {
    pub text: String,
    pub style: StatusStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Charwise,
    Linewise,
}

/// Visual-mode selection: the fixed anchor; the moving end is the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub kind: SelectionKind,
}

// -------------------------------------------------------------------------------------------------
// Editor state
// -------------------------------------------------------------------------------------------------
#[derive(Debug)]
pub struct EditorState {
    pub buffer: Buffer,
    pub cursor: Position,
    pub input_mode: InputMode,
    pub status: Option<StatusMsg>,
    /// Preferred column for vertical motion runs.
    pub sticky_col: Option<usize>,
    /// First buffer line visible in the view.
    pub view_top: usize,
    pub selection: Option<Selection>,
    pub clipboard: Clipboard,
    pub search: SearchState,
    pub menu: MenuState,
    undo: UndoEngine,
    cancel_requested: Arc<AtomicBool>,
    /// True while inside a coalesced insert run (snapshot already taken).
    insert_run: bool,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Position::origin(),
            input_mode: InputMode::Normal,
            status: None,
            sticky_col: None,
            view_top: 0,
            selection: None,
            clipboard: Clipboard::default(),
            search: SearchState::default(),
            menu: MenuState::default(),
            undo: UndoEngine::default(),
            cancel_requested: Arc::new(AtomicBool::new(false)),
            insert_run: false,
        }
    }

    pub fn from_str(content: &str) -> Self {
        Self::new(Buffer::from_str(content))
    }

    pub fn cursor_pos(&self) -> Position {
        self.cursor
    }

    // ---------------------------------------------------------------------------------------------
    // Status line
    // ---------------------------------------------------------------------------------------------
    pub fn set_status(&mut self, text: impl Into<String>, style: StatusStyle) {
        let text = text.into();
        if style == StatusStyle::Error {
            tracing::warn!(target: "state.status", %text, "error status");
        }
        self.status = Some(StatusMsg { text, style });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // ---------------------------------------------------------------------------------------------
    // Cursor
    // ---------------------------------------------------------------------------------------------
    /// Place the cursor, clearing any sticky column.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos;
        self.sticky_col = None;
    }

    /// Place the cursor from a vertical motion, keeping the target column.
    pub fn set_cursor_vertical(&mut self, pos: Position, target_col: usize) {
        self.cursor = pos;
        self.sticky_col = Some(target_col);
    }

    /// Clamp the cursor to a resting rune (normal-mode rule).
    pub fn normalize_cursor(&mut self) {
        self.cursor = motion::normalize(&self.buffer, self.cursor);
    }

    // ---------------------------------------------------------------------------------------------
    // Mode transitions
    // ---------------------------------------------------------------------------------------------
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub fn enter_insert(&mut self) {
        self.insert_run = false;
        self.input_mode = InputMode::Insert;
    }

    /// Leave insert mode, retreating one column (vi parity) and ending the
    /// coalesced run.
    pub fn leave_insert(&mut self) {
        self.insert_run = false;
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        }
        self.normalize_cursor();
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_visual(&mut self, kind: SelectionKind) {
        self.selection = Some(Selection {
            anchor: self.cursor,
            kind,
        });
        self.input_mode = match kind {
            SelectionKind::Charwise => InputMode::VisualChar,
            SelectionKind::Linewise => InputMode::VisualLine,
        };
    }

    /// Switch the active selection kind in place (`v` <-> `V`).
    pub fn switch_visual(&mut self, kind: SelectionKind) {
        if let Some(sel) = &mut self.selection {
            sel.kind = kind;
        } else {
            self.selection = Some(Selection {
                anchor: self.cursor,
                kind,
            });
        }
        self.input_mode = match kind {
            SelectionKind::Charwise => InputMode::VisualChar,
            SelectionKind::Linewise => InputMode::VisualLine,
        };
    }

    pub fn leave_visual(&mut self) {
        self.selection = None;
        self.input_mode = InputMode::Normal;
    }

    /// Flat rune span `[start, end)` of the active selection. Charwise
    /// selections include both endpoint runes; linewise selections cover
    /// whole lines including their newlines.
    pub fn selection_span(&self) -> Option<(usize, usize, SelectionKind)> {
        let sel = self.selection?;
        match sel.kind {
            SelectionKind::Charwise => {
                let a = self.buffer.rune_index(sel.anchor);
                let b = self.buffer.rune_index(self.cursor);
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                Some((lo, (hi + 1).min(self.buffer.len_runes()), sel.kind))
            }
            SelectionKind::Linewise => {
                let first = sel.anchor.line.min(self.cursor.line);
                let last = sel.anchor.line.max(self.cursor.line);
                let start = self.buffer.rune_index(Position::new(first, 0));
                let end = if last + 1 < self.buffer.line_count() {
                    self.buffer.rune_index(Position::new(last + 1, 0))
                } else {
                    self.buffer.len_runes()
                };
                Some((start, end, sel.kind))
            }
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Undo plumbing
    // ---------------------------------------------------------------------------------------------
    fn snapshot_for_edit(&mut self, coalesce: bool) {
        if coalesce && self.insert_run {
            return;
        }
        self.undo.push_snapshot(self.buffer.clone(), self.cursor);
        self.insert_run = coalesce;
    }

    pub fn undo(&mut self) {
        let current = Snapshot {
            buffer: self.buffer.clone(),
            cursor: self.cursor,
        };
        match self.undo.undo(current) {
            Some(snap) => {
                self.buffer = snap.buffer;
                self.cursor = snap.cursor;
                self.normalize_cursor();
            }
            None => self.set_status("already at oldest change", StatusStyle::Info),
        }
    }

    pub fn redo(&mut self) {
        let current = Snapshot {
            buffer: self.buffer.clone(),
            cursor: self.cursor,
        };
        match self.undo.redo(current) {
            Some(snap) => {
                self.buffer = snap.buffer;
                self.cursor = snap.cursor;
                self.normalize_cursor();
            }
            None => self.set_status("already at newest change", StatusStyle::Info),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Insert-mode edits (coalesced undo)
    // ---------------------------------------------------------------------------------------------
    pub fn insert_rune(&mut self, r: char) {
        self.snapshot_for_edit(true);
        let idx = self.buffer.rune_index(self.cursor);
        self.buffer.insert(idx, &r.to_string());
        self.cursor.col += 1;
    }

    pub fn insert_tab(&mut self) {
        self.insert_rune('\t');
    }

    /// Insert a line break; a newline ends the coalesced undo run.
    pub fn insert_newline(&mut self) {
        self.snapshot_for_edit(true);
        let idx = self.buffer.rune_index(self.cursor);
        self.buffer.insert(idx, "\n");
        self.cursor = Position::new(self.cursor.line + 1, 0);
        self.insert_run = false;
    }

    /// Backspace: remove the rune before the cursor, joining lines at
    /// column zero.
    pub fn delete_rune_before(&mut self) {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return;
        }
        self.snapshot_for_edit(true);
        if self.cursor.col > 0 {
            let idx = self.buffer.rune_index(self.cursor);
            self.buffer.remove(idx - 1, idx);
            self.cursor.col -= 1;
        } else {
            let prev_len = self.buffer.line_len(self.cursor.line - 1);
            let idx = self.buffer.rune_index(Position::new(self.cursor.line, 0));
            self.buffer.remove(idx - 1, idx);
            self.cursor = Position::new(self.cursor.line - 1, prev_len);
        }
    }

    /// Forward delete (Delete key in insert mode).
    pub fn delete_rune_under(&mut self) {
        let idx = self.buffer.rune_index(self.cursor);
        if idx < self.buffer.len_runes() {
            self.snapshot_for_edit(true);
            self.buffer.remove(idx, idx + 1);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Normal-mode edits (one snapshot each)
    // ---------------------------------------------------------------------------------------------
    /// Delete `[start, end)`, write it to the target clipboard page, rest
    /// the cursor at the span start. Returns the removed text.
    pub fn delete_span(&mut self, start: usize, end: usize, linewise: bool) -> String {
        if start >= end {
            // Consume a pending page override even for an empty span.
            let _ = self.clipboard.take_target();
            return String::new();
        }
        self.snapshot_for_edit(false);
        let removed = self.buffer.remove(start, end);
        let page = self.clipboard.take_target();
        self.clipboard.write(page, removed.clone(), linewise);
        self.cursor = self.buffer.position_of(start.min(self.buffer.len_runes()));
        removed
    }

    /// Delete whole lines starting at the cursor, re-anchoring to the
    /// first non-whitespace column.
    pub fn delete_lines(&mut self, count: u32) {
        let line_count = self.buffer.line_count();
        let first = self.cursor.line;
        if first >= line_count {
            return;
        }
        let last = (first + count.max(1) as usize - 1).min(line_count - 1);
        let mut start = self.buffer.rune_index(Position::new(first, 0));
        let end = if last + 1 < line_count {
            self.buffer.rune_index(Position::new(last + 1, 0))
        } else {
            // Deleting through the final line: absorb the newline that
            // ended the previous line, if any.
            if start > 0 {
                start -= 1;
            }
            self.buffer.len_runes()
        };
        self.snapshot_for_edit(false);
        let mut removed = self.buffer.remove(start, end);
        if !removed.ends_with('\n') {
            removed.push('\n');
        }
        let page = self.clipboard.take_target();
        self.clipboard.write(page, removed, true);
        let line = first.min(self.buffer.line_count().saturating_sub(1));
        self.cursor = quill_text::motion::first_non_ws(&self.buffer, line);
    }

    /// Replace the rune under the cursor. `'\n'` splits the line and
    /// rests the cursor at the start of the new line; other runes keep
    /// the cursor in place.
    pub fn replace_rune(&mut self, replacement: char) {
        let idx = self.buffer.rune_index(self.cursor);
        if self.cursor.col >= self.buffer.line_len(self.cursor.line) {
            return;
        }
        self.snapshot_for_edit(false);
        self.buffer.remove(idx, idx + 1);
        self.buffer.insert(idx, &replacement.to_string());
        if replacement == '\n' {
            self.cursor = Position::new(self.cursor.line + 1, 0);
        }
    }

    /// Join the cursor line with the ones below (`J`): the newline and
    /// the next line's indent collapse into a single space.
    pub fn join_lines(&mut self, count: u32) {
        let joins = count.saturating_sub(1).max(1);
        if self.cursor.line + 1 >= self.buffer.line_count() {
            return;
        }
        self.snapshot_for_edit(false);
        for _ in 0..joins {
            let line = self.cursor.line;
            if line + 1 >= self.buffer.line_count() {
                break;
            }
            let line_len = self.buffer.line_len(line);
            let indent = self.buffer.first_non_ws(line + 1);
            let next_blank = self.buffer.line_len(line + 1) == 0;
            let at = self.buffer.rune_index(Position::new(line, line_len));
            self.buffer.remove(at, at + 1 + indent);
            if !next_blank && line_len > 0 {
                self.buffer.insert(at, " ");
            }
            self.cursor = Position::new(line, line_len);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Clipboard operations
    // ---------------------------------------------------------------------------------------------
    pub fn yank_span(&mut self, start: usize, end: usize, linewise: bool) {
        let end = end.min(self.buffer.len_runes());
        if start >= end {
            let _ = self.clipboard.take_target();
            return;
        }
        let text: String = self
            .buffer
            .to_string()
            .chars()
            .skip(start)
            .take(end - start)
            .collect();
        let page = self.clipboard.take_target();
        self.clipboard.write(page, text, linewise);
    }

    pub fn yank_lines(&mut self, count: u32) {
        let first = self.cursor.line;
        let last = (first + count.max(1) as usize - 1)
            .min(self.buffer.line_count().saturating_sub(1));
        let mut text = String::new();
        for line in first..=last {
            if let Some(l) = self.buffer.line(line) {
                text.push_str(&l);
                text.push('\n');
            }
        }
        let page = self.clipboard.take_target();
        self.clipboard.write(page, text, true);
    }

    pub fn put_after(&mut self) {
        let page = self.clipboard.take_target();
        let Some(entry) = self.clipboard.read(page).cloned() else {
            return;
        };
        self.snapshot_for_edit(false);
        if entry.linewise {
            let line = self.cursor.line;
            let at = self.buffer.rune_index(Position::new(line, self.buffer.line_len(line)));
            let body = entry.text.trim_end_matches('\n');
            self.buffer.insert(at, &format!("\n{body}"));
            self.cursor = quill_text::motion::first_non_ws(&self.buffer, line + 1);
        } else {
            let len = self.buffer.line_len(self.cursor.line);
            let col = if len == 0 { 0 } else { (self.cursor.col + 1).min(len) };
            let at = self.buffer.rune_index(Position::new(self.cursor.line, col));
            let inserted = entry.text.chars().count();
            self.buffer.insert(at, &entry.text);
            self.cursor = self.buffer.position_of(at + inserted.saturating_sub(1));
        }
    }

    pub fn put_before(&mut self) {
        let page = self.clipboard.take_target();
        let Some(entry) = self.clipboard.read(page).cloned() else {
            return;
        };
        self.snapshot_for_edit(false);
        if entry.linewise {
            let line = self.cursor.line;
            let at = self.buffer.rune_index(Position::new(line, 0));
            let body = entry.text.trim_end_matches('\n');
            self.buffer.insert(at, &format!("{body}\n"));
            self.cursor = quill_text::motion::first_non_ws(&self.buffer, line);
        } else {
            let at = self.buffer.rune_index(self.cursor);
            let inserted = entry.text.chars().count();
            self.buffer.insert(at, &entry.text);
            self.cursor = self.buffer.position_of(at + inserted.saturating_sub(1));
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------------------------------
    pub fn start_search(&mut self, direction: SearchDirection) {
        self.search.direction = direction;
        self.search.query.clear();
        self.search.origin = self.buffer.rune_index(self.cursor);
        self.input_mode = InputMode::Search;
    }

    pub fn append_search_rune(&mut self, r: char) {
        self.search.query.push(r);
    }

    /// Drop the last query rune; false when the query was already empty.
    pub fn delete_search_rune(&mut self) -> bool {
        self.search.query.pop().is_some()
    }

    /// Leave search mode. On commit, remember the query and move to its
    /// next occurrence; on abort, the cursor stays where the search began.
    pub fn complete_search(&mut self, commit: bool) {
        self.input_mode = InputMode::Normal;
        let query = std::mem::take(&mut self.search.query);
        if !commit || query.is_empty() {
            return;
        }
        let forward = self.search.direction == SearchDirection::Forward;
        match find_query(&self.buffer, &query, self.search.origin, forward) {
            Some(idx) => {
                self.cursor = self.buffer.position_of(idx);
                self.normalize_cursor();
            }
            None => self.set_status(format!("pattern not found: {query}"), StatusStyle::Info),
        }
        self.search.committed = Some(query);
    }

    /// Repeat the committed search (`n`, or `N` with `reverse`).
    pub fn find_next(&mut self, reverse: bool) {
        let Some(query) = self.search.committed.clone() else {
            self.set_status("no previous search", StatusStyle::Info);
            return;
        };
        let forward = (self.search.direction == SearchDirection::Forward) != reverse;
        let from = self.buffer.rune_index(self.cursor);
        match find_query(&self.buffer, &query, from, forward) {
            Some(idx) => {
                self.cursor = self.buffer.position_of(idx);
                self.normalize_cursor();
            }
            None => self.set_status(format!("pattern not found: {query}"), StatusStyle::Info),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Menu
    // ---------------------------------------------------------------------------------------------
    pub fn show_menu(&mut self, style: MenuStyle) {
        self.menu.open(style);
        self.input_mode = InputMode::Menu;
    }

    pub fn hide_menu(&mut self) {
        self.menu.close();
        self.input_mode = InputMode::Normal;
    }

    // ---------------------------------------------------------------------------------------------
    // View and task control
    // ---------------------------------------------------------------------------------------------
    /// Keep the cursor line inside a view of `height` lines.
    pub fn scroll_to_cursor(&mut self, height: u64) {
        let h = (height.max(1)) as usize;
        if self.cursor.line < self.view_top {
            self.view_top = self.cursor.line;
        } else if self.cursor.line >= self.view_top + h {
            self.view_top = self.cursor.line + 1 - h;
        }
    }

    /// Shared token a long-running task polls for cancellation.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_requested)
    }

    pub fn enter_task_mode(&mut self) {
        self.cancel_requested.store(false, Ordering::SeqCst);
        self.input_mode = InputMode::Task;
    }

    /// Raise the cancellation flag and hand control back to normal mode.
    pub fn request_task_cancel(&mut self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
        self.input_mode = InputMode::Normal;
        self.set_status("task canceled", StatusStyle::Info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_run_coalesces_into_one_snapshot() {
        let mut st = EditorState::from_str("");
        st.enter_insert();
        for r in "abc".chars() {
            st.insert_rune(r);
        }
        st.leave_insert();
        assert_eq!(st.buffer.to_string(), "abc");
        assert_eq!(st.cursor, Position::new(0, 2));
        st.undo();
        assert_eq!(st.buffer.to_string(), "");
    }

    #[test]
    fn leave_insert_retreats_one_column() {
        let mut st = EditorState::from_str("xy");
        st.cursor = Position::new(0, 1);
        st.enter_insert();
        st.leave_insert();
        assert_eq!(st.cursor, Position::new(0, 0));
    }

    #[test]
    fn backspace_joins_lines_at_column_zero() {
        let mut st = EditorState::from_str("ab\ncd");
        st.cursor = Position::new(1, 0);
        st.enter_insert();
        st.delete_rune_before();
        assert_eq!(st.buffer.to_string(), "abcd");
        assert_eq!(st.cursor, Position::new(0, 2));
    }

    #[test]
    fn delete_lines_reanchors_to_first_non_ws() {
        let mut st = EditorState::from_str("one\n   two\nthree");
        st.delete_lines(1);
        assert_eq!(st.buffer.to_string(), "   two\nthree");
        assert_eq!(st.cursor, Position::new(0, 3));
        assert!(st.clipboard.read(DEFAULT_PAGE).unwrap().linewise);
    }

    #[test]
    fn delete_last_line_absorbs_preceding_newline() {
        let mut st = EditorState::from_str("one\ntwo");
        st.cursor = Position::new(1, 0);
        st.delete_lines(1);
        assert_eq!(st.buffer.to_string(), "one");
        assert_eq!(st.cursor, Position::new(0, 0));
    }

    #[test]
    fn replace_rune_with_newline_splits_line() {
        let mut st = EditorState::from_str("Lorem ipsum dolor");
        st.cursor = Position::new(0, 4);
        st.replace_rune('\n');
        assert_eq!(st.buffer.to_string(), "Lore\n ipsum dolor");
        assert_eq!(st.cursor, Position::new(1, 0));
    }

    #[test]
    fn join_lines_collapses_indent_to_space() {
        let mut st = EditorState::from_str("foo\n   bar");
        st.join_lines(1);
        assert_eq!(st.buffer.to_string(), "foo bar");
        assert_eq!(st.cursor, Position::new(0, 3));
    }

    #[test]
    fn put_after_linewise_opens_line_below() {
        let mut st = EditorState::from_str("aa\nbb");
        st.clipboard.write(DEFAULT_PAGE, "yanked\n".into(), true);
        st.put_after();
        assert_eq!(st.buffer.to_string(), "aa\nyanked\nbb");
        assert_eq!(st.cursor, Position::new(1, 0));
    }

    #[test]
    fn put_after_charwise_inserts_past_cursor() {
        let mut st = EditorState::from_str("ad");
        st.clipboard.write(DEFAULT_PAGE, "bc".into(), false);
        st.put_after();
        assert_eq!(st.buffer.to_string(), "abcd");
        assert_eq!(st.cursor, Position::new(0, 2));
    }

    #[test]
    fn pending_page_routes_delete_and_put() {
        let mut st = EditorState::from_str("hello");
        st.clipboard.set_pending_page('a');
        st.delete_span(0, 2, false);
        assert_eq!(st.buffer.to_string(), "llo");
        assert_eq!(st.clipboard.read('a').unwrap().text, "he");
        // Default page untouched.
        assert!(st.clipboard.read(DEFAULT_PAGE).is_none());
        st.clipboard.set_pending_page('a');
        st.put_after();
        assert_eq!(st.buffer.to_string(), "lhelo");
    }

    #[test]
    fn search_commit_moves_cursor_and_remembers_query() {
        let mut st = EditorState::from_str("foo bar baz");
        st.start_search(SearchDirection::Forward);
        assert_eq!(st.input_mode, InputMode::Search);
        st.append_search_rune('b');
        st.append_search_rune('a');
        st.complete_search(true);
        assert_eq!(st.input_mode, InputMode::Normal);
        assert_eq!(st.cursor, Position::new(0, 4));
        st.find_next(false);
        assert_eq!(st.cursor, Position::new(0, 8));
        st.find_next(true);
        assert_eq!(st.cursor, Position::new(0, 4));
    }

    #[test]
    fn search_abort_restores_mode_without_motion() {
        let mut st = EditorState::from_str("foo bar");
        st.cursor = Position::new(0, 2);
        st.start_search(SearchDirection::Forward);
        st.append_search_rune('b');
        st.complete_search(false);
        assert_eq!(st.input_mode, InputMode::Normal);
        assert_eq!(st.cursor, Position::new(0, 2));
        assert!(st.search.committed.is_none());
    }

    #[test]
    fn selection_span_charwise_is_inclusive() {
        let mut st = EditorState::from_str("abcdef");
        st.cursor = Position::new(0, 1);
        st.enter_visual(SelectionKind::Charwise);
        st.cursor = Position::new(0, 3);
        assert_eq!(st.selection_span(), Some((1, 4, SelectionKind::Charwise)));
        // Backwards selection normalizes.
        st.cursor = Position::new(0, 0);
        assert_eq!(st.selection_span(), Some((0, 2, SelectionKind::Charwise)));
    }

    #[test]
    fn selection_span_linewise_covers_whole_lines() {
        let mut st = EditorState::from_str("aa\nbb\ncc");
        st.cursor = Position::new(1, 1);
        st.enter_visual(SelectionKind::Linewise);
        st.cursor = Position::new(2, 0);
        assert_eq!(st.selection_span(), Some((3, 8, SelectionKind::Linewise)));
    }

    #[test]
    fn task_cancel_raises_flag_and_leaves_task_mode() {
        let mut st = EditorState::from_str("");
        st.enter_task_mode();
        let token = st.cancel_token();
        assert!(!token.load(Ordering::SeqCst));
        st.request_task_cancel();
        assert!(token.load(Ordering::SeqCst));
        assert_eq!(st.input_mode, InputMode::Normal);
    }

    #[test]
    fn scroll_keeps_cursor_in_view() {
        let mut st = EditorState::from_str(&"x\n".repeat(50));
        st.cursor = Position::new(40, 0);
        st.scroll_to_cursor(10);
        assert_eq!(st.view_top, 31);
        st.cursor = Position::new(5, 0);
        st.scroll_to_cursor(10);
        assert_eq!(st.view_top, 5);
    }
}
