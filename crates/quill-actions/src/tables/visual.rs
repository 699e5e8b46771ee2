//! Visual-mode command tables (charwise and linewise).
//!
//! Both share the motion vocabulary with normal mode; they differ in how
//! `v`/`V` toggle or switch the selection kind. Operators collapse the
//! selection and return to normal mode.

use super::{CommandSpec, ModeTable, counted, operand_rune};
use crate::{Action, Command, Motion};
use quill_events::KeyKind;
use quill_program::{CaptureId, Expr};
use quill_state::SelectionKind;

fn motion(m: Motion, count: u32) -> Action {
    Action::single(Command::Move { motion: m, count })
}

/// Motion and operator entries common to both visual kinds.
fn shared_commands() -> Vec<CommandSpec> {
    use Expr as E;
    vec![
        CommandSpec {
            name: "leave-visual",
            expr: E::key(KeyKind::Esc),
            builder: |_, _| Action::single(Command::LeaveVisual),
        },
        CommandSpec {
            name: "cursor-left",
            expr: counted(E::alt(vec![E::rune('h'), E::key(KeyKind::Left)])),
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
            name: "line-start",
            expr: E::rune('0'),
            builder: |_, _| motion(Motion::LineStart, 1),
        },
        CommandSpec {
            name: "line-first-non-ws",
            expr: E::rune('^'),
            builder: |_, _| motion(Motion::FirstNonWs, 1),
        },
        CommandSpec {
            name: "line-end",
            expr: E::rune('$'),
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
            name: "till-char-forward",
            expr: counted(E::concat(vec![E::rune('t'), operand_rune()])),
            builder: |p, _| motion(Motion::TillForward(p.required_rune()), p.count_or(1)),
        },
        CommandSpec {
            name: "delete-selection",
            expr: E::alt(vec![E::rune('d'), E::rune('x')]),
            builder: |_, _| Action::single(Command::DeleteSelection),
        },
        CommandSpec {
            name: "yank-selection",
            expr: E::rune('y'),
            builder: |_, _| Action::single(Command::YankSelection),
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
    ]
}

pub fn visual_char_table() -> ModeTable {
    use Expr as E;
    let mut commands = shared_commands();
    commands.push(CommandSpec {
        name: "toggle-off",
        expr: E::rune('v'),
        builder: |_, _| Action::single(Command::LeaveVisual),
    });
    commands.push(CommandSpec {
        name: "switch-linewise",
        expr: E::rune('V'),
        builder: |_, _| Action::single(Command::SwitchVisual(SelectionKind::Linewise)),
    });
    ModeTable::build(commands)
}

pub fn visual_line_table() -> ModeTable {
    use Expr as E;
    let mut commands = shared_commands();
    commands.push(CommandSpec {
        name: "toggle-off",
        expr: E::rune('V'),
        builder: |_, _| Action::single(Command::LeaveVisual),
    });
    commands.push(CommandSpec {
        name: "switch-charwise",
        expr: E::rune('v'),
        builder: |_, _| Action::single(Command::SwitchVisual(SelectionKind::Charwise)),
    });
    ModeTable::build(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_program::verify;

    #[test]
    fn both_tables_compile_and_verify() {
        verify(&visual_char_table().program()).unwrap();
        verify(&visual_line_table().program()).unwrap();
    }
}
