//! The modal input interpreter: command tables, operand decoding, mode
//! dispatch, the interpreter facade, and the macro recorder.
//!
//! User intent is represented as an [`Action`] — an ordered list of
//! [`Command`] values. Actions are first-class: the facade returns them to
//! the caller for application, stores them for repeat-last (`.`), and
//! records them into user macros for replay. A single [`dispatch`]
//! function applies one command to the editor state; the facade's
//! [`interp::Interpreter::apply`] runs whole actions and intercepts the
//! macro-control commands against its own recorder.

pub mod dispatch;
pub mod interp;
pub mod macros;
pub mod modes;
pub mod params;
pub mod tables;

pub use dispatch::dispatch;
pub use interp::{Context, Interpreter, InterpreterConfig};
pub use macros::MacroRecorder;
pub use params::{CommandParams, DecodedCommand, decode_captures};
pub use tables::{CommandSpec, ModeTable};

use quill_state::{MenuStyle, SearchDirection, SelectionKind};

// -------------------------------------------------------------------------------------------------
// Motions
// -------------------------------------------------------------------------------------------------
/// Cursor motion targets. Counts repeat relative motions; the absolute
/// line targets ignore repetition. Page motions carry the view height
/// they were built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    FirstNonWs,
    LineEnd,
    WordNext,
    WordEnd,
    WordPrev,
    /// 1-indexed absolute line (`gg` with a count, `G` with a count).
    ToLine(u32),
    LastLine,
    PageDown { lines: u64 },
    PageUp { lines: u64 },
    HalfPageDown { lines: u64 },
    HalfPageUp { lines: u64 },
    FindForward(char),
    FindBackward(char),
    TillForward(char),
    TillBackward(char),
}

/// Cursor placement styles for the insert-entry commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEntry {
    /// `i`: before the cursor rune.
    Before,
    /// `I`: at the first non-whitespace column.
    LineStart,
    /// `a`: after the cursor rune.
    After,
    /// `A`: past the last rune.
    LineEnd,
    /// `o`: open a line below.
    LineBelow,
    /// `O`: open a line above.
    LineAbove,
}

// -------------------------------------------------------------------------------------------------
// Commands
// -------------------------------------------------------------------------------------------------
/// One deferred editor-state operation. The union mirrors the editor-state
/// contract; `dispatch` maps each variant onto state mutators.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move { motion: Motion, count: u32 },

    // Insert mode entry and edits.
    EnterInsert(InsertEntry),
    LeaveInsert,
    InsertRune(char),
    InsertNewline,
    InsertTab,
    DeleteRuneBefore,
    DeleteRuneUnder,

    // Normal-mode edits.
    DeleteToMotion { motion: Motion, count: u32 },
    DeleteLines { count: u32 },
    DeleteRunes { count: u32 },
    DeleteRunesBack { count: u32 },
    DeleteAWord,
    DeleteInnerWord,
    ReplaceRune(char),
    JoinLines { count: u32 },
    Undo,
    Redo,

    // Clipboard.
    SetClipboardPage(char),
    YankLines { count: u32 },
    PutAfter,
    PutBefore,

    // Visual mode.
    EnterVisual(SelectionKind),
    SwitchVisual(SelectionKind),
    LeaveVisual,
    DeleteSelection,
    YankSelection,

    // Search.
    StartSearch(SearchDirection),
    AppendSearchRune(char),
    DeleteSearchRune,
    CompleteSearch { commit: bool },
    FindNext { reverse: bool },

    // Menu.
    ShowMenu(MenuStyle),
    HideMenu,
    AppendMenuRune(char),
    DeleteMenuRune,
    MoveMenuSelection { delta: isize, candidates: usize },

    // Facade-level commands (intercepted by the interpreter, never
    // dispatched to state directly).
    RepeatLast { count: u32 },
    MacroStart,
    MacroStop,
    MacroReplay,

    // Post-hooks and status.
    ScrollToCursor { height: u64 },
    CancelTask,
    StatusError(String),
    StatusInfo(String),
}

impl Command {
    /// Menu and macro-control commands never enter the record buffers;
    /// recording them would capture the bracketing keystrokes themselves.
    pub fn is_recording_exempt(&self) -> bool {
        matches!(
            self,
            Command::ShowMenu(_)
                | Command::HideMenu
                | Command::AppendMenuRune(_)
                | Command::DeleteMenuRune
                | Command::MoveMenuSelection { .. }
                | Command::MacroStart
                | Command::MacroStop
                | Command::MacroReplay
        )
    }

    fn is_status_only(&self) -> bool {
        matches!(self, Command::StatusError(_) | Command::StatusInfo(_))
    }
}

// -------------------------------------------------------------------------------------------------
// Actions
// -------------------------------------------------------------------------------------------------
/// A deferred mutation of editor state: zero or more commands applied in
/// order. Cloneable so the macro facility can store and replay it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub commands: Vec<Command>,
}

impl Action {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(cmd: Command) -> Self {
        Self {
            commands: vec![cmd],
        }
    }

    pub fn from_commands(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, cmd: Command) {
        self.commands.push(cmd);
    }

    pub fn extend(&mut self, other: Action) {
        self.commands.extend(other.commands);
    }

    /// Eligible for the named macro buffer.
    pub fn is_recordable(&self) -> bool {
        !self.is_empty() && !self.commands.iter().any(Command::is_recording_exempt)
    }

    /// Eligible for the repeat-last slot: a recordable action that is not
    /// itself `.` and does more than set a status message.
    pub fn is_repeatable(&self) -> bool {
        self.is_recordable()
            && !self
                .commands
                .iter()
                .any(|c| matches!(c, Command::RepeatLast { .. }))
            && self.commands.iter().any(|c| {
                !c.is_status_only() && !matches!(c, Command::ScrollToCursor { .. })
            })
    }
}

pub use quill_state::{EditorState, InputMode, StatusStyle};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_actions_are_not_recordable() {
        let act = Action::from_commands(vec![
            Command::HideMenu,
            Command::MacroStart,
        ]);
        assert!(!act.is_recordable());
        assert!(!act.is_repeatable());
    }

    #[test]
    fn motion_actions_are_repeatable() {
        let act = Action::from_commands(vec![
            Command::Move {
                motion: Motion::WordNext,
                count: 1,
            },
            Command::ScrollToCursor { height: 40 },
        ]);
        assert!(act.is_recordable());
        assert!(act.is_repeatable());
    }

    #[test]
    fn repeat_and_status_actions_are_not_repeatable() {
        let dot = Action::single(Command::RepeatLast { count: 1 });
        assert!(!dot.is_repeatable());
        let err = Action::from_commands(vec![
            Command::StatusError("count too large".into()),
            Command::ScrollToCursor { height: 40 },
        ]);
        assert!(!err.is_repeatable());
        assert!(!Action::empty().is_repeatable());
    }
}
