//! Normal-mode command table.
//!
//! Ordering is priority: when two alternatives accept the same prefix the
//! earlier entry wins. `D` is a distinct top-level alternative from `d$`,
//! so either spelling resolves through the same longest-match rule.

use super::{CommandSpec, ModeTable, counted, operand_rune};
use crate::{Action, Command, InsertEntry, Motion};
use quill_events::KeyKind;
use quill_program::{CaptureId, Expr};
use quill_state::{MenuStyle, SearchDirection, SelectionKind};

fn motion(m: Motion, count: u32) -> Action {
    Action::single(Command::Move { motion: m, count })
}

pub fn normal_table() -> ModeTable {
    use Expr as E;
    let commands = vec![
        // -----------------------------------------------------------------------------------------
        // Cursor motions
        // -----------------------------------------------------------------------------------------
        CommandSpec {
            name: "cursor-left",
            expr: counted(E::alt(vec![
                E::rune('h'),
                E::key(KeyKind::Left),
                E::key(KeyKind::Backspace),
            ])),
            builder: |p, _| motion(Motion::Left, p.count_or(1)),
        },
        CommandSpec {
            name: "cursor-down",
            expr: counted(E::alt(vec![E::rune('j'), E::key(KeyKind::Down)])),
            builder: |p, _| motion(Motion::Down, p.count_or(1)),
        },
        CommandSpec {
            name: "cursor-up",
            expr: counted(E::alt(vec![E::rune('k'), E::key(KeyKind::Up)])),
            builder: |p, _| motion(Motion::Up, p.count_or(1)),
        },
        CommandSpec {
            name: "cursor-right",
            expr: counted(E::alt(vec![E::rune('l'), E::key(KeyKind::Right)])),
            builder: |p, _| motion(Motion::Right, p.count_or(1)),
        },
        CommandSpec {
            name: "cursor-next-line-start",
            expr: counted(E::key(KeyKind::Enter)),
            builder: |p, _| {
                Action::from_commands(vec![
                    Command::Move {
                        motion: Motion::Down,
                        count: p.count_or(1),
                    },
                    Command::Move {
                        motion: Motion::FirstNonWs,
                        count: 1,
                    },
                ])
            },
        },
        CommandSpec {
            name: "line-start",
            expr: E::alt(vec![E::rune('0'), E::key(KeyKind::Home)]),
            builder: |_, _| motion(Motion::LineStart, 1),
        },
        CommandSpec {
            name: "line-first-non-ws",
            expr: E::rune('^'),
            builder: |_, _| motion(Motion::FirstNonWs, 1),
        },
        CommandSpec {
            name: "line-end",
            expr: E::alt(vec![E::rune('$'), E::key(KeyKind::End)]),
            builder: |_, _| motion(Motion::LineEnd, 1),
        },
        CommandSpec {
            name: "word-next",
            expr: counted(E::rune('w')),
            builder: |p, _| motion(Motion::WordNext, p.count_or(1)),
        },
        CommandSpec {
            name: "word-end",
            expr: counted(E::rune('e')),
            builder: |p, _| motion(Motion::WordEnd, p.count_or(1)),
        },
        CommandSpec {
            name: "word-prev",
            expr: counted(E::rune('b')),
            builder: |p, _| motion(Motion::WordPrev, p.count_or(1)),
        },
        CommandSpec {
            name: "goto-line",
            expr: counted(E::runes("gg")),
            builder: |p, _| motion(Motion::ToLine(p.count_or(1)), 1),
        },
        CommandSpec {
            name: "goto-last-line",
            expr: counted(E::rune('G')),
            builder: |p, _| match p.count {
                Some(n) => motion(Motion::ToLine(n), 1),
                None => motion(Motion::LastLine, 1),
            },
        },
        CommandSpec {
            name: "page-down",
            expr: E::alt(vec![E::key(KeyKind::CtrlF), E::key(KeyKind::PageDown)]),
            builder: |_, ctx| {
                motion(
                    Motion::PageDown {
                        lines: ctx.scroll_lines,
                    },
                    1,
                )
            },
        },
        CommandSpec {
            name: "page-up",
            expr: E::alt(vec![E::key(KeyKind::CtrlB), E::key(KeyKind::PageUp)]),
            builder: |_, ctx| {
                motion(
                    Motion::PageUp {
                        lines: ctx.scroll_lines,
                    },
                    1,
                )
            },
        },
        CommandSpec {
            name: "half-page-down",
            expr: E::key(KeyKind::CtrlD),
            builder: |_, ctx| {
                motion(
                    Motion::HalfPageDown {
                        lines: ctx.scroll_lines,
                    },
                    1,
                )
            },
        },
        CommandSpec {
            name: "half-page-up",
            expr: E::key(KeyKind::CtrlU),
            builder: |_, ctx| {
                motion(
                    Motion::HalfPageUp {
                        lines: ctx.scroll_lines,
                    },
                    1,
                )
            },
        },
        CommandSpec {
            name: "find-char-forward",
            expr: counted(E::concat(vec![E::rune('f'), operand_rune()])),
            builder: |p, _| motion(Motion::FindForward(p.required_rune()), p.count_or(1)),
        },
        CommandSpec {
            name: "find-char-backward",
            expr: counted(E::concat(vec![E::rune('F'), operand_rune()])),
            builder: |p, _| motion(Motion::FindBackward(p.required_rune()), p.count_or(1)),
        },
        CommandSpec {
            name: "till-char-forward",
            expr: counted(E::concat(vec![E::rune('t'), operand_rune()])),
            builder: |p, _| motion(Motion::TillForward(p.required_rune()), p.count_or(1)),
        },
        CommandSpec {
            name: "till-char-backward",
            expr: counted(E::concat(vec![E::rune('T'), operand_rune()])),
            builder: |p, _| motion(Motion::TillBackward(p.required_rune()), p.count_or(1)),
        },

        // -----------------------------------------------------------------------------------------
        // Edits
        // -----------------------------------------------------------------------------------------
        CommandSpec {
            name: "replace-char",
            expr: E::concat(vec![
                E::rune('r'),
                E::capture(
                    CaptureId::OperandRune,
                    E::alt(vec![
                        E::any_rune(),
                        E::key(KeyKind::Enter),
                        E::key(KeyKind::Tab),
                    ]),
                ),
            ]),
            builder: |p, _| Action::single(Command::ReplaceRune(p.required_rune())),
        },
        CommandSpec {
            name: "delete-rune",
            expr: counted(E::alt(vec![E::rune('x'), E::key(KeyKind::Delete)])),
            builder: |p, _| {
                Action::single(Command::DeleteRunes {
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-rune-back",
            expr: counted(E::rune('X')),
            builder: |p, _| {
                Action::single(Command::DeleteRunesBack {
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-lines",
            expr: counted(E::runes("dd")),
            builder: |p, _| {
                Action::single(Command::DeleteLines {
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-to-line-end-short",
            expr: counted(E::rune('D')),
            builder: |_, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::LineEnd,
                    count: 1,
                })
            },
        },
        CommandSpec {
            name: "delete-to-line-end",
            expr: counted(E::runes("d$")),
            builder: |_, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::LineEnd,
                    count: 1,
                })
            },
        },
        CommandSpec {
            name: "delete-to-line-start",
            expr: E::runes("d0"),
            builder: |_, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::LineStart,
                    count: 1,
                })
            },
        },
        CommandSpec {
            name: "delete-word",
            expr: counted(E::runes("dw")),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::WordNext,
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-word-end",
            expr: counted(E::runes("de")),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::WordEnd,
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-word-prev",
            expr: counted(E::runes("db")),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::WordPrev,
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-left",
            expr: counted(E::runes("dh")),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::Left,
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-right",
            expr: counted(E::runes("dl")),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::Right,
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-down",
            expr: counted(E::runes("dj")),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::Down,
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-up",
            expr: counted(E::runes("dk")),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::Up,
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-a-word",
            expr: counted(E::runes("daw")),
            builder: |_, _| Action::single(Command::DeleteAWord),
        },
        CommandSpec {
            name: "delete-inner-word",
            expr: E::runes("diw"),
            builder: |_, _| Action::single(Command::DeleteInnerWord),
        },
        CommandSpec {
            name: "delete-find-char",
            expr: counted(E::concat(vec![E::runes("df"), operand_rune()])),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::FindForward(p.required_rune()),
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "delete-till-char",
            expr: counted(E::concat(vec![E::runes("dt"), operand_rune()])),
            builder: |p, _| {
                Action::single(Command::DeleteToMotion {
                    motion: Motion::TillForward(p.required_rune()),
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "join-lines",
            expr: counted(E::rune('J')),
            builder: |p, _| {
                Action::single(Command::JoinLines {
                    count: p.count_or(1),
                })
            },
        },

        // -----------------------------------------------------------------------------------------
        // Clipboard
        // -----------------------------------------------------------------------------------------
        CommandSpec {
            name: "yank-lines",
            expr: counted(E::runes("yy")),
            builder: |p, _| {
                Action::single(Command::YankLines {
                    count: p.count_or(1),
                })
            },
        },
        CommandSpec {
            name: "put-after",
            expr: counted(E::rune('p')),
            builder: |_, _| Action::single(Command::PutAfter),
        },
        CommandSpec {
            name: "put-before",
            expr: counted(E::rune('P')),
            builder: |_, _| Action::single(Command::PutBefore),
        },
        CommandSpec {
            name: "clipboard-page",
            expr: E::concat(vec![
                E::rune('"'),
                E::capture(CaptureId::ClipboardPage, E::any_rune()),
            ]),
            builder: |p, _| {
                Action::single(Command::SetClipboardPage(
                    p.clipboard_page.expect("grammar binds a page rune"),
                ))
            },
        },

        // -----------------------------------------------------------------------------------------
        // History, repeat
        // -----------------------------------------------------------------------------------------
        CommandSpec {
            name: "undo",
            expr: E::rune('u'),
            builder: |_, _| Action::single(Command::Undo),
        },
        CommandSpec {
            name: "redo",
            expr: E::key(KeyKind::CtrlR),
            builder: |_, _| Action::single(Command::Redo),
        },
        CommandSpec {
            name: "repeat-last",
            expr: counted(E::rune('.')),
            builder: |p, _| {
                Action::single(Command::RepeatLast {
                    count: p.count_or(1),
                })
            },
        },

        // -----------------------------------------------------------------------------------------
        // Mode entries
        // -----------------------------------------------------------------------------------------
        CommandSpec {
            name: "enter-insert",
            expr: E::rune('i'),
            builder: |_, _| Action::single(Command::EnterInsert(InsertEntry::Before)),
        },
        CommandSpec {
            name: "enter-insert-line-start",
            expr: E::rune('I'),
            builder: |_, _| Action::single(Command::EnterInsert(InsertEntry::LineStart)),
        },
        CommandSpec {
            name: "enter-insert-after",
            expr: E::rune('a'),
            builder: |_, _| Action::single(Command::EnterInsert(InsertEntry::After)),
        },
        CommandSpec {
            name: "enter-insert-line-end",
            expr: E::rune('A'),
            builder: |_, _| Action::single(Command::EnterInsert(InsertEntry::LineEnd)),
        },
        CommandSpec {
            name: "open-line-below",
            expr: E::rune('o'),
            builder: |_, _| Action::single(Command::EnterInsert(InsertEntry::LineBelow)),
        },
        CommandSpec {
            name: "open-line-above",
            expr: E::rune('O'),
            builder: |_, _| Action::single(Command::EnterInsert(InsertEntry::LineAbove)),
        },
        CommandSpec {
            name: "enter-visual-char",
            expr: E::rune('v'),
            builder: |_, _| Action::single(Command::EnterVisual(SelectionKind::Charwise)),
        },
        CommandSpec {
            name: "enter-visual-line",
            expr: E::rune('V'),
            builder: |_, _| Action::single(Command::EnterVisual(SelectionKind::Linewise)),
        },
        CommandSpec {
            name: "search-forward",
            expr: E::rune('/'),
            builder: |_, _| Action::single(Command::StartSearch(SearchDirection::Forward)),
        },
        CommandSpec {
            name: "search-backward",
            expr: E::rune('?'),
            builder: |_, _| Action::single(Command::StartSearch(SearchDirection::Backward)),
        },
        CommandSpec {
            name: "find-next",
            expr: counted(E::rune('n')),
            builder: |_, _| Action::single(Command::FindNext { reverse: false }),
        },
        CommandSpec {
            name: "find-prev",
            expr: counted(E::rune('N')),
            builder: |_, _| Action::single(Command::FindNext { reverse: true }),
        },
        CommandSpec {
            name: "command-menu",
            expr: E::rune(':'),
            builder: |_, _| Action::single(Command::ShowMenu(MenuStyle::Command)),
        },
    ];
    ModeTable::build(commands)
}
