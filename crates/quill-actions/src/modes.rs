//! Per-mode event handling.
//!
//! Normal and the two visual modes buffer events through a pattern-program
//! VM ([`VmMode`]): accept builds an action from the captured operands,
//! reject drains the buffer and yields the empty action, and any events
//! past the accepted prefix are re-fed into the fresh machine. The trivial
//! modes (insert, menu, search, task) react to single events immediately
//! with a direct switch — their grammars never need lookahead.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::interp::Context;
use crate::params::{DecodedCommand, decode_captures};
use crate::tables::ModeTable;
use crate::{Action, Command, Motion};
use quill_events::{Event, KeyKind};
use quill_program::{CaptureSet, Status, Vm};

// -------------------------------------------------------------------------------------------------
// VM-backed modes
// -------------------------------------------------------------------------------------------------
/// One mode's machine instance: shared program, live VM, event buffer.
pub struct VmMode {
    table: Arc<ModeTable>,
    vm: Vm,
    buffer: Vec<Event>,
}

impl VmMode {
    pub fn new(table: Arc<ModeTable>) -> Self {
        let vm = Vm::new(table.program());
        Self {
            table,
            vm,
            buffer: Vec::new(),
        }
    }

    /// Human-readable pending input for the status line.
    pub fn input_buffer_string(&self) -> String {
        self.buffer.iter().map(ToString::to_string).collect()
    }

    /// Drain the buffer and return the machine to its initial threads.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.vm.reset();
    }

    /// True when nothing is buffered and the machine sits at its entry
    /// closure (the required state after every terminal step).
    pub fn is_quiescent(&self) -> bool {
        self.buffer.is_empty() && self.vm.at_initial()
    }

    /// Feed one event; may emit several commands when the accepted prefix
    /// leaves a tail that itself completes a command.
    pub fn process(&mut self, ev: Event, ctx: &Context, count_limit: u32) -> Action {
        let mut queue: VecDeque<Event> = VecDeque::from([ev]);
        let mut out = Action::empty();
        while let Some(event) = queue.pop_front() {
            self.buffer.push(event);
            let outcome = self.vm.step(&event);
            match outcome.status {
                Status::NeedMore => {}
                Status::Rejected => {
                    tracing::trace!(
                        target: "input.vm",
                        buffered = self.buffer.len(),
                        "sequence rejected, buffer drained"
                    );
                    self.buffer.clear();
                }
                Status::Accepted(captures) => {
                    let events = std::mem::take(&mut self.buffer);
                    out.extend(self.build(&captures, &events[..captures.consumed], ctx, count_limit));
                    // The killer event (and anything after it) belongs to
                    // the next command; re-feed ahead of queued events.
                    for leftover in events[captures.consumed..].iter().rev() {
                        queue.push_front(*leftover);
                    }
                }
            }
        }
        out
    }

    fn build(
        &self,
        captures: &CaptureSet,
        events: &[Event],
        ctx: &Context,
        count_limit: u32,
    ) -> Action {
        match decode_captures(captures, events, count_limit) {
            DecodedCommand::CountTooLarge => Action::single(Command::StatusError(format!(
                "count too large (max {count_limit})"
            ))),
            DecodedCommand::Run { index, params } => {
                let spec = self.table.command(index);
                tracing::debug!(target: "input.dispatch", command = spec.name, "command accepted");
                (spec.builder)(&params, ctx)
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Menu items
// -------------------------------------------------------------------------------------------------
/// A command-menu entry: display name plus the action it triggers. Items
/// live in the interpreter; the editor state only renders and navigates.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub name: &'static str,
    pub action: Action,
}

/// Prefix filter over item names; an empty query lists everything.
pub fn menu_candidates<'a>(items: &'a [MenuItem], query: &str) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|item| item.name.starts_with(query))
        .collect()
}

// -------------------------------------------------------------------------------------------------
// Direct-switch modes
// -------------------------------------------------------------------------------------------------
pub fn insert_action(ev: &Event) -> Action {
    match ev.key {
        KeyKind::Esc => Action::single(Command::LeaveInsert),
        KeyKind::Enter => Action::single(Command::InsertNewline),
        KeyKind::Tab => Action::single(Command::InsertTab),
        KeyKind::Backspace => Action::single(Command::DeleteRuneBefore),
        KeyKind::Delete => Action::single(Command::DeleteRuneUnder),
        KeyKind::Left => Action::single(Command::Move {
            motion: Motion::Left,
            count: 1,
        }),
        KeyKind::Right => Action::single(Command::Move {
            motion: Motion::Right,
            count: 1,
        }),
        KeyKind::Up => Action::single(Command::Move {
            motion: Motion::Up,
            count: 1,
        }),
        KeyKind::Down => Action::single(Command::Move {
            motion: Motion::Down,
            count: 1,
        }),
        KeyKind::Rune if !ev.rune.is_control() => Action::single(Command::InsertRune(ev.rune)),
        _ => Action::empty(),
    }
}

pub fn search_action(ev: &Event, ctx: &Context) -> Action {
    match ev.key {
        KeyKind::Esc => Action::single(Command::CompleteSearch { commit: false }),
        KeyKind::Enter => Action::single(Command::CompleteSearch { commit: true }),
        KeyKind::Backspace => match ctx.search_query_len {
            // Emptying the query abandons the search.
            0 => Action::single(Command::CompleteSearch { commit: false }),
            1 => Action::from_commands(vec![
                Command::DeleteSearchRune,
                Command::CompleteSearch { commit: false },
            ]),
            _ => Action::single(Command::DeleteSearchRune),
        },
        KeyKind::Rune if !ev.rune.is_control() => {
            Action::single(Command::AppendSearchRune(ev.rune))
        }
        _ => Action::empty(),
    }
}

pub fn menu_action(ev: &Event, ctx: &Context, items: &[MenuItem]) -> Action {
    match ev.key {
        KeyKind::Esc => Action::single(Command::HideMenu),
        KeyKind::Enter => {
            let candidates = menu_candidates(items, &ctx.menu_query);
            match candidates.get(ctx.menu_selection) {
                Some(item) => {
                    let mut action = Action::single(Command::HideMenu);
                    action.extend(item.action.clone());
                    action
                }
                None => Action::from_commands(vec![
                    Command::HideMenu,
                    Command::StatusError(format!("unknown menu command: {}", ctx.menu_query)),
                ]),
            }
        }
        KeyKind::Backspace => {
            if ctx.menu_query.is_empty() {
                Action::single(Command::HideMenu)
            } else {
                Action::single(Command::DeleteMenuRune)
            }
        }
        KeyKind::Up => Action::single(Command::MoveMenuSelection {
            delta: -1,
            candidates: menu_candidates(items, &ctx.menu_query).len(),
        }),
        KeyKind::Down | KeyKind::Tab => Action::single(Command::MoveMenuSelection {
            delta: 1,
            candidates: menu_candidates(items, &ctx.menu_query).len(),
        }),
        KeyKind::Rune if !ev.rune.is_control() => {
            Action::single(Command::AppendMenuRune(ev.rune))
        }
        _ => Action::empty(),
    }
}

/// Task mode swallows everything except the cancel request.
pub fn task_action(ev: &Event) -> Action {
    match ev.key {
        KeyKind::Esc => Action::single(Command::CancelTask),
        _ => Action::empty(),
    }
}
