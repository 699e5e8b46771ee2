//! Applying a single [`Command`] to mutable editor state.
//!
//! Motions resolve their targets through `quill_text::motion` and keep
//! the sticky column across vertical runs. Deletions rest the cursor at
//! the span start without the normal-mode clamp; the next motion
//! re-normalizes. The facade-level commands (`RepeatLast`, `Macro*`) are
//! not handled here — the interpreter intercepts them before dispatch and
//! reaching this function with one is a wiring bug.

use crate::{Command, InsertEntry, Motion};
use quill_state::{EditorState, SelectionKind, StatusStyle};
use quill_text::{Position, motion};

/// Apply one command. Commands execute strictly sequentially; there is no
/// result value — user-visible failures surface as status messages.
pub fn dispatch(cmd: &Command, state: &mut EditorState) {
    tracing::trace!(target: "input.dispatch", command = ?cmd, "dispatch");
    match cmd {
        Command::Move { motion, count } => apply_motion(*motion, *count, state),

        // -----------------------------------------------------------------------------------------
        // Insert mode
        // -----------------------------------------------------------------------------------------
        Command::EnterInsert(entry) => enter_insert(*entry, state),
        Command::LeaveInsert => state.leave_insert(),
        Command::InsertRune(r) => state.insert_rune(*r),
        Command::InsertNewline => state.insert_newline(),
        Command::InsertTab => state.insert_tab(),
        Command::DeleteRuneBefore => state.delete_rune_before(),
        Command::DeleteRuneUnder => state.delete_rune_under(),

        // -----------------------------------------------------------------------------------------
        // Normal-mode edits
        // -----------------------------------------------------------------------------------------
        Command::DeleteToMotion { motion, count } => delete_to_motion(*motion, *count, state),
        Command::DeleteLines { count } => state.delete_lines(*count),
        Command::DeleteRunes { count } => {
            let at = state.buffer.rune_index(state.cursor);
            let line_end = state
                .buffer
                .rune_index(Position::new(state.cursor.line, state.buffer.line_len(state.cursor.line)));
            let end = (at + *count as usize).min(line_end);
            state.delete_span(at, end, false);
        }
        Command::DeleteRunesBack { count } => {
            let at = state.buffer.rune_index(state.cursor);
            let line_start = state.buffer.rune_index(Position::new(state.cursor.line, 0));
            let start = at.saturating_sub(*count as usize).max(line_start);
            state.delete_span(start, at, false);
        }
        Command::DeleteAWord => {
            let (start, end) = motion::a_word_span(&state.buffer, state.cursor);
            state.delete_span(start, end, false);
        }
        Command::DeleteInnerWord => {
            let (start, end) = motion::inner_word_span(&state.buffer, state.cursor);
            state.delete_span(start, end, false);
        }
        Command::ReplaceRune(r) => state.replace_rune(*r),
        Command::JoinLines { count } => state.join_lines(*count),
        Command::Undo => state.undo(),
        Command::Redo => state.redo(),

        // -----------------------------------------------------------------------------------------
        // Clipboard
        // -----------------------------------------------------------------------------------------
        Command::SetClipboardPage(page) => state.clipboard.set_pending_page(*page),
        Command::YankLines { count } => state.yank_lines(*count),
        Command::PutAfter => state.put_after(),
        Command::PutBefore => state.put_before(),

        // -----------------------------------------------------------------------------------------
        // Visual mode
        // -----------------------------------------------------------------------------------------
        Command::EnterVisual(kind) => state.enter_visual(*kind),
        Command::SwitchVisual(kind) => state.switch_visual(*kind),
        Command::LeaveVisual => state.leave_visual(),
        Command::DeleteSelection => {
            if let Some((start, end, kind)) = state.selection_span() {
                state.delete_span(start, end, kind == SelectionKind::Linewise);
                if kind == SelectionKind::Linewise {
                    let line = state.cursor.line.min(state.buffer.line_count().saturating_sub(1));
                    state.cursor = motion::first_non_ws(&state.buffer, line);
                }
            }
            state.leave_visual();
        }
        Command::YankSelection => {
            if let Some((start, end, kind)) = state.selection_span() {
                state.yank_span(start, end, kind == SelectionKind::Linewise);
                state.cursor = state.buffer.position_of(start);
                state.normalize_cursor();
            }
            state.leave_visual();
        }

        // -----------------------------------------------------------------------------------------
        // Search
        // -----------------------------------------------------------------------------------------
        Command::StartSearch(direction) => state.start_search(*direction),
        Command::AppendSearchRune(r) => state.append_search_rune(*r),
        Command::DeleteSearchRune => {
            state.delete_search_rune();
        }
        Command::CompleteSearch { commit } => state.complete_search(*commit),
        Command::FindNext { reverse } => state.find_next(*reverse),

        // -----------------------------------------------------------------------------------------
        // Menu
        // -----------------------------------------------------------------------------------------
        Command::ShowMenu(style) => state.show_menu(*style),
        Command::HideMenu => state.hide_menu(),
        Command::AppendMenuRune(r) => state.menu.append_rune(*r),
        Command::DeleteMenuRune => {
            if !state.menu.delete_rune() {
                state.hide_menu();
            }
        }
        Command::MoveMenuSelection { delta, candidates } => {
            state.menu.move_selection(*delta, *candidates);
        }

        // -----------------------------------------------------------------------------------------
        // View, task, status
        // -----------------------------------------------------------------------------------------
        Command::ScrollToCursor { height } => state.scroll_to_cursor(*height),
        Command::CancelTask => state.request_task_cancel(),
        Command::StatusError(text) => state.set_status(text.clone(), StatusStyle::Error),
        Command::StatusInfo(text) => state.set_status(text.clone(), StatusStyle::Info),

        // Facade-level commands must have been intercepted upstream.
        Command::RepeatLast { .. }
        | Command::MacroStart
        | Command::MacroStop
        | Command::MacroReplay => {
            unreachable!("facade-level command reached dispatch: {cmd:?}")
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Motion application
// -------------------------------------------------------------------------------------------------
fn apply_motion(m: Motion, count: u32, state: &mut EditorState) {
    let buf = &state.buffer;
    let cur = state.cursor;
    match m {
        Motion::Up | Motion::Down | Motion::HalfPageUp { .. }
        | Motion::HalfPageDown { .. }
        | Motion::PageUp { .. }
        | Motion::PageDown { .. } => {
            let target = state.sticky_col.unwrap_or(cur.col);
            let delta: isize = match m {
                Motion::Up => -(count.max(1) as isize),
                Motion::Down => count.max(1) as isize,
                Motion::HalfPageUp { lines } => -(((lines / 2).max(1)) as isize),
                Motion::HalfPageDown { lines } => ((lines / 2).max(1)) as isize,
                Motion::PageUp { lines } => -((lines.max(1)) as isize),
                Motion::PageDown { lines } => (lines.max(1)) as isize,
                _ => unreachable!(),
            };
            let pos = motion::vertical(buf, cur, delta, target);
            state.set_cursor_vertical(pos, target);
        }
        Motion::Left => {
            let col = cur.col.saturating_sub(count.max(1) as usize);
            state.set_cursor(motion::normalize(buf, Position::new(cur.line, col)));
        }
        Motion::Right => {
            let col = cur.col + count.max(1) as usize;
            state.set_cursor(motion::normalize(buf, Position::new(cur.line, col)));
        }
        Motion::LineStart => state.set_cursor(motion::line_start(cur)),
        Motion::FirstNonWs => state.set_cursor(motion::first_non_ws(buf, cur.line)),
        Motion::LineEnd => state.set_cursor(motion::line_end(buf, cur)),
        Motion::WordNext => {
            let mut pos = cur;
            for _ in 0..count.max(1) {
                pos = motion::word_forward(buf, pos);
            }
            state.set_cursor(pos);
        }
        Motion::WordEnd => {
            let mut pos = cur;
            for _ in 0..count.max(1) {
                pos = motion::word_end(buf, pos);
            }
            state.set_cursor(pos);
        }
        Motion::WordPrev => {
            let mut pos = cur;
            for _ in 0..count.max(1) {
                pos = motion::word_backward(buf, pos);
            }
            state.set_cursor(pos);
        }
        Motion::ToLine(n) => state.set_cursor(motion::to_line(buf, n)),
        Motion::LastLine => {
            let line = buf.line_count().saturating_sub(1);
            state.set_cursor(motion::first_non_ws(buf, line));
        }
        Motion::FindForward(r) => {
            if let Some(pos) = motion::find_in_line(buf, cur, r, true, false, count.max(1)) {
                state.set_cursor(pos);
            }
        }
        Motion::FindBackward(r) => {
            if let Some(pos) = motion::find_in_line(buf, cur, r, false, false, count.max(1)) {
                state.set_cursor(pos);
            }
        }
        Motion::TillForward(r) => {
            if let Some(pos) = motion::find_in_line(buf, cur, r, true, true, count.max(1)) {
                state.set_cursor(pos);
            }
        }
        Motion::TillBackward(r) => {
            if let Some(pos) = motion::find_in_line(buf, cur, r, false, true, count.max(1)) {
                state.set_cursor(pos);
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Operator span resolution (delete + motion)
// -------------------------------------------------------------------------------------------------
fn delete_to_motion(m: Motion, count: u32, state: &mut EditorState) {
    let count = count.max(1);
    let buf = &state.buffer;
    let cur = state.cursor;
    let at = buf.rune_index(cur);
    let line_len = buf.line_len(cur.line);
    match m {
        Motion::LineEnd => {
            let end = buf.rune_index(Position::new(cur.line, line_len));
            state.delete_span(at, end, false);
        }
        Motion::LineStart => {
            let start = buf.rune_index(Position::new(cur.line, 0));
            state.delete_span(start, at, false);
        }
        Motion::Left => {
            let start = at.saturating_sub(count as usize).max(buf.rune_index(Position::new(cur.line, 0)));
            state.delete_span(start, at, false);
        }
        Motion::Right => {
            let end = (at + count as usize).min(buf.rune_index(Position::new(cur.line, line_len)));
            state.delete_span(at, end, false);
        }
        Motion::WordNext => {
            let mut end = at;
            for _ in 0..count {
                let (_, next) = motion::to_next_word_span(buf, buf.position_of(end));
                if next == end {
                    break;
                }
                end = next;
            }
            state.delete_span(at, end, false);
        }
        Motion::WordEnd => {
            let mut pos = cur;
            for _ in 0..count {
                pos = motion::word_end(buf, pos);
            }
            let end = (buf.rune_index(pos) + 1).min(buf.len_runes());
            state.delete_span(at, end, false);
        }
        Motion::WordPrev => {
            let mut pos = cur;
            for _ in 0..count {
                pos = motion::word_backward(buf, pos);
            }
            state.delete_span(buf.rune_index(pos), at, false);
        }
        Motion::Down => {
            // Linewise: current line plus `count` below.
            state.delete_lines(count + 1);
        }
        Motion::Up => {
            let first = cur.line.saturating_sub(count as usize);
            let lines = (cur.line - first + 1) as u32;
            state.cursor = Position::new(first, 0);
            state.delete_lines(lines);
        }
        Motion::FindForward(r) => {
            if let Some(hit) = motion::find_in_line(buf, cur, r, true, false, count) {
                let end = buf.rune_index(Position::new(hit.line, hit.col + 1));
                state.delete_span(at, end, false);
            }
        }
        Motion::TillForward(r) => {
            if let Some(hit) = motion::find_in_line(buf, cur, r, true, true, count) {
                let end = buf.rune_index(Position::new(hit.line, hit.col + 1));
                state.delete_span(at, end, false);
            }
        }
        Motion::FindBackward(r) => {
            if let Some(hit) = motion::find_in_line(buf, cur, r, false, false, count) {
                state.delete_span(buf.rune_index(hit), at, false);
            }
        }
        Motion::TillBackward(r) => {
            if let Some(hit) = motion::find_in_line(buf, cur, r, false, true, count) {
                state.delete_span(buf.rune_index(hit), at, false);
            }
        }
        // Remaining motions are not bound as delete targets by any table.
        other => {
            tracing::debug!(target: "input.dispatch", motion = ?other, "unsupported delete target");
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Insert entry placement
// -------------------------------------------------------------------------------------------------
fn enter_insert(entry: InsertEntry, state: &mut EditorState) {
    match entry {
        InsertEntry::Before => state.enter_insert(),
        InsertEntry::LineStart => {
            let pos = motion::first_non_ws(&state.buffer, state.cursor.line);
            state.set_cursor(pos);
            state.enter_insert();
        }
        InsertEntry::After => {
            let len = state.buffer.line_len(state.cursor.line);
            let col = (state.cursor.col + 1).min(len);
            state.set_cursor(Position::new(state.cursor.line, col));
            state.enter_insert();
        }
        InsertEntry::LineEnd => {
            let len = state.buffer.line_len(state.cursor.line);
            state.set_cursor(Position::new(state.cursor.line, len));
            state.enter_insert();
        }
        InsertEntry::LineBelow => {
            let len = state.buffer.line_len(state.cursor.line);
            state.set_cursor(Position::new(state.cursor.line, len));
            state.enter_insert();
            state.insert_newline();
        }
        InsertEntry::LineAbove => {
            state.set_cursor(Position::new(state.cursor.line, 0));
            state.enter_insert();
            state.insert_newline();
            state.set_cursor(Position::new(state.cursor.line.saturating_sub(1), 0));
        }
    }
}
