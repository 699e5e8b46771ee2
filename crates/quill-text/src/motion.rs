//! Motion target resolution: pure functions from a buffer and a position
//! to the position (or rune span) a motion names.
//!
//! Cursor motions return targets already clamped for normal mode (the
//! cursor rests on a real rune). Operator spans are half-open flat rune
//! ranges `[start, end)` and may extend to line length; the caller owns
//! cursor placement after the edit.

use crate::{Buffer, Position, RuneClass, rune_class};

fn last_col(buf: &Buffer, line: usize) -> usize {
    buf.line_len(line).saturating_sub(1)
}

/// Clamp a position to a resting rune for normal mode.
pub fn normalize(buf: &Buffer, pos: Position) -> Position {
    let line = pos.line.min(buf.line_count().saturating_sub(1));
    Position::new(line, pos.col.min(last_col(buf, line)))
}

// -------------------------------------------------------------------------------------------------
// Horizontal / vertical
// -------------------------------------------------------------------------------------------------
pub fn left(_buf: &Buffer, pos: Position) -> Position {
    Position::new(pos.line, pos.col.saturating_sub(1))
}

pub fn right(buf: &Buffer, pos: Position) -> Position {
    Position::new(pos.line, (pos.col + 1).min(last_col(buf, pos.line)))
}

/// Vertical motion with a sticky target column.
pub fn vertical(buf: &Buffer, pos: Position, delta: isize, target_col: usize) -> Position {
    let line_count = buf.line_count();
    let line = if delta < 0 {
        pos.line.saturating_sub(delta.unsigned_abs())
    } else {
        (pos.line + delta as usize).min(line_count.saturating_sub(1))
    };
    Position::new(line, target_col.min(last_col(buf, line)))
}

pub fn line_start(pos: Position) -> Position {
    Position::new(pos.line, 0)
}

pub fn line_end(buf: &Buffer, pos: Position) -> Position {
    Position::new(pos.line, last_col(buf, pos.line))
}

pub fn first_non_ws(buf: &Buffer, line: usize) -> Position {
    Position::new(line, buf.first_non_ws(line))
}

/// 1-indexed absolute line target (`gg`, `G`), resting on first non-blank.
pub fn to_line(buf: &Buffer, line_1indexed: u32) -> Position {
    let line = (line_1indexed.max(1) as usize - 1).min(buf.line_count().saturating_sub(1));
    first_non_ws(buf, line)
}

// -------------------------------------------------------------------------------------------------
// Word motions
// -------------------------------------------------------------------------------------------------
fn class_at(buf: &Buffer, idx: usize) -> Option<RuneClass> {
    buf.rune_at(idx).map(rune_class)
}

/// Flat index of the start of the next word (`w`). Runs to the end of the
/// buffer when no further word exists.
fn next_word_index(buf: &Buffer, from: usize) -> usize {
    let n = buf.len_runes();
    let mut i = from;
    if let Some(cls) = class_at(buf, i)
        && cls != RuneClass::Whitespace
    {
        while class_at(buf, i) == Some(cls) {
            i += 1;
        }
    }
    while class_at(buf, i) == Some(RuneClass::Whitespace) {
        i += 1;
    }
    i.min(n)
}

pub fn word_forward(buf: &Buffer, pos: Position) -> Position {
    let idx = next_word_index(buf, buf.rune_index(pos));
    normalize(buf, buf.position_of(idx))
}

pub fn word_backward(buf: &Buffer, pos: Position) -> Position {
    let mut i = buf.rune_index(pos);
    if i == 0 {
        return Position::origin();
    }
    i -= 1;
    while i > 0 && class_at(buf, i) == Some(RuneClass::Whitespace) {
        i -= 1;
    }
    if let Some(cls) = class_at(buf, i) {
        while i > 0 && class_at(buf, i - 1) == Some(cls) {
            i -= 1;
        }
    }
    buf.position_of(i)
}

pub fn word_end(buf: &Buffer, pos: Position) -> Position {
    let n = buf.len_runes();
    if n == 0 {
        return Position::origin();
    }
    let mut i = buf.rune_index(pos) + 1;
    while class_at(buf, i) == Some(RuneClass::Whitespace) {
        i += 1;
    }
    if i >= n {
        return normalize(buf, buf.position_of(n.saturating_sub(1)));
    }
    let cls = class_at(buf, i).expect("index below len");
    while i + 1 < n && class_at(buf, i + 1) == Some(cls) {
        i += 1;
    }
    buf.position_of(i)
}

// -------------------------------------------------------------------------------------------------
// Find-char motions
// -------------------------------------------------------------------------------------------------
/// `f`/`F`/`t`/`T`: count-th occurrence of `target` in the cursor line.
/// `till` stops one rune short of the hit. Returns `None` (motion fails,
/// command becomes a no-op) when there are not enough occurrences.
pub fn find_in_line(
    buf: &Buffer,
    pos: Position,
    target: char,
    forward: bool,
    till: bool,
    count: u32,
) -> Option<Position> {
    let line = buf.line(pos.line)?;
    let runes: Vec<char> = line.chars().collect();
    let mut hits = 0u32;
    if forward {
        let mut col = pos.col + 1;
        while col < runes.len() {
            if runes[col] == target {
                hits += 1;
                if hits == count {
                    let dest = if till { col - 1 } else { col };
                    return Some(Position::new(pos.line, dest));
                }
            }
            col += 1;
        }
        None
    } else {
        let mut col = pos.col;
        while col > 0 {
            col -= 1;
            if runes[col] == target {
                hits += 1;
                if hits == count {
                    let dest = if till { col + 1 } else { col };
                    return Some(Position::new(pos.line, dest));
                }
            }
        }
        None
    }
}

// -------------------------------------------------------------------------------------------------
// Operator spans
// -------------------------------------------------------------------------------------------------
/// `dw` span: cursor to the start of the next word, clamped to the end of
/// the cursor line so the trailing newline survives.
pub fn to_next_word_span(buf: &Buffer, pos: Position) -> (usize, usize) {
    let start = buf.rune_index(pos);
    let line_end = buf.rune_index(Position::new(pos.line, buf.line_len(pos.line)));
    let end = next_word_index(buf, start).min(line_end);
    (start, end.max(start))
}

/// `daw` span: the word under the cursor plus trailing blanks on the same
/// line. Leading whitespace is never included (documented divergence from
/// vi). On whitespace, the blank run and the following word go instead.
pub fn a_word_span(buf: &Buffer, pos: Position) -> (usize, usize) {
    let n = buf.len_runes();
    let at = buf.rune_index(pos);
    let Some(cls) = class_at(buf, at) else {
        return (at, at);
    };
    let mut start = at;
    while start > 0 && class_at(buf, start - 1) == Some(cls) {
        start -= 1;
    }
    let mut end = at;
    while end < n && class_at(buf, end) == Some(cls) {
        end += 1;
    }
    if cls == RuneClass::Whitespace {
        // Blank run plus the word that follows it.
        if let Some(word_cls) = class_at(buf, end)
            && word_cls != RuneClass::Whitespace
        {
            while end < n && class_at(buf, end) == Some(word_cls) {
                end += 1;
            }
        }
    } else {
        // Trailing blanks, stopping at the newline.
        while buf.rune_at(end).is_some_and(|r| r == ' ' || r == '\t') {
            end += 1;
        }
    }
    (start, end)
}

/// `diw` span: the rune-class run under the cursor only.
pub fn inner_word_span(buf: &Buffer, pos: Position) -> (usize, usize) {
    let n = buf.len_runes();
    let at = buf.rune_index(pos);
    let Some(cls) = class_at(buf, at) else {
        return (at, at);
    };
    let mut start = at;
    while start > 0 && class_at(buf, start - 1) == Some(cls) {
        start -= 1;
    }
    let mut end = at;
    while end < n && class_at(buf, end) == Some(cls) {
        end += 1;
    }
    (start, end)
}
