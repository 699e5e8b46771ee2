//! Interpreter facade: routes events to the active mode, wraps the
//! resulting action with post-hooks, and owns the macro recorder.
//!
//! Post-hook order on the raw mode action:
//! 1. the mode's own commands,
//! 2. scroll-view-to-cursor for normal/insert/visual modes,
//! 3. append to the user macro while recording (menu-originated actions
//!    are exempt — recording them would capture the `:stop` keystrokes),
//! 4. refresh the repeat-last slot for repeatable normal/visual commands.
//!
//! `process_event` never fails: every call returns an action (possibly
//! empty), and user errors ride inside the action as status commands.

use crate::dispatch::dispatch;
use crate::macros::MacroRecorder;
use crate::modes::{self, MenuItem, VmMode};
use crate::tables::{normal_table, visual_char_table, visual_line_table};
use crate::{Action, Command};
use quill_events::Event;
use quill_state::{EditorState, InputMode, StatusStyle};
use std::sync::Arc;

/// Count prefixes above this bound cancel the command with an error.
pub const COUNT_LIMIT: u32 = 1024;

// -------------------------------------------------------------------------------------------------
// Context
// -------------------------------------------------------------------------------------------------
/// Per-event snapshot of the editor state the interpreter needs: the
/// active mode plus UI hints (view height, menu query/selection, pending
/// search query length).
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub input_mode: InputMode,
    pub scroll_lines: u64,
    pub menu_query: String,
    pub menu_selection: usize,
    pub search_query_len: usize,
}

impl Context {
    pub fn new(input_mode: InputMode, scroll_lines: u64) -> Self {
        Self {
            input_mode,
            scroll_lines,
            ..Self::default()
        }
    }

    /// Snapshot the hints from live editor state.
    pub fn snapshot(state: &EditorState, scroll_lines: u64) -> Self {
        Self {
            input_mode: state.input_mode,
            scroll_lines,
            menu_query: state.menu.query.clone(),
            menu_selection: state.menu.selection,
            search_query_len: state.search.query.chars().count(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Configuration
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy)]
pub struct InterpreterConfig {
    pub count_limit: u32,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            count_limit: COUNT_LIMIT,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Interpreter
// -------------------------------------------------------------------------------------------------
pub struct Interpreter {
    config: InterpreterConfig,
    /// Mode instances, created lazily on first use.
    normal: Option<VmMode>,
    visual_char: Option<VmMode>,
    visual_line: Option<VmMode>,
    menu_items: Vec<MenuItem>,
    macros: MacroRecorder,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            config,
            normal: None,
            visual_char: None,
            visual_line: None,
            menu_items: default_menu_items(),
            macros: MacroRecorder::default(),
        }
    }

    pub fn macros(&self) -> &MacroRecorder {
        &self.macros
    }

    fn runner(&mut self, mode: InputMode) -> &mut VmMode {
        let slot = match mode {
            InputMode::Normal => &mut self.normal,
            InputMode::VisualChar => &mut self.visual_char,
            InputMode::VisualLine => &mut self.visual_line,
            other => panic!("mode {other:?} has no VM runner"),
        };
        slot.get_or_insert_with(|| {
            let table = match mode {
                InputMode::Normal => normal_table(),
                InputMode::VisualChar => visual_char_table(),
                InputMode::VisualLine => visual_line_table(),
                _ => unreachable!(),
            };
            VmMode::new(Arc::new(table))
        })
    }

    /// Pending input display for the status line; empty for the
    /// direct-switch modes, which never buffer.
    pub fn input_buffer_string(&self, mode: InputMode) -> String {
        let runner = match mode {
            InputMode::Normal => self.normal.as_ref(),
            InputMode::VisualChar => self.visual_char.as_ref(),
            InputMode::VisualLine => self.visual_line.as_ref(),
            _ => None,
        };
        runner.map(VmMode::input_buffer_string).unwrap_or_default()
    }

    /// Route one event through the active mode and wrap the post-hooks.
    pub fn process_event(&mut self, ev: Event, ctx: &Context) -> Action {
        let count_limit = self.config.count_limit;
        let mut action = match ctx.input_mode {
            InputMode::Normal | InputMode::VisualChar | InputMode::VisualLine => {
                self.runner(ctx.input_mode).process(ev, ctx, count_limit)
            }
            InputMode::Insert => modes::insert_action(&ev),
            InputMode::Search => modes::search_action(&ev, ctx),
            InputMode::Menu => modes::menu_action(&ev, ctx, &self.menu_items),
            InputMode::Task => modes::task_action(&ev),
        };

        // Hook 2: keep the cursor visible after anything that may move it.
        if !action.is_empty()
            && matches!(
                ctx.input_mode,
                InputMode::Normal
                    | InputMode::Insert
                    | InputMode::VisualChar
                    | InputMode::VisualLine
            )
        {
            action.push(Command::ScrollToCursor {
                height: ctx.scroll_lines,
            });
        }

        // Hook 3: user macro recording (user-originated events only reach
        // this path; replay applies stored actions directly).
        if self.macros.is_recording() && action.is_recordable() {
            self.macros.record(action.clone());
        }

        // Hook 4: repeat-last slot, normal/visual commands only.
        if matches!(
            ctx.input_mode,
            InputMode::Normal | InputMode::VisualChar | InputMode::VisualLine
        ) && action.is_repeatable()
        {
            self.macros.set_last_action(action.clone());
        }

        action
    }

    /// Apply a whole action, intercepting the facade-level commands
    /// (repeat and macro control) against the recorder.
    pub fn apply(&mut self, action: &Action, state: &mut EditorState) {
        for cmd in &action.commands {
            match cmd {
                Command::MacroStart => {
                    self.macros.start();
                    state.set_status("recording macro", StatusStyle::Info);
                }
                Command::MacroStop => {
                    self.macros.stop();
                    state.set_status("macro recorded", StatusStyle::Info);
                }
                Command::MacroReplay => {
                    let recorded: Vec<Action> = self.macros.user_macro().to_vec();
                    if recorded.is_empty() {
                        state.set_status("no macro recorded", StatusStyle::Error);
                        continue;
                    }
                    tracing::debug!(target: "input.macro", actions = recorded.len(), "replaying macro");
                    for stored in &recorded {
                        self.apply(stored, state);
                    }
                }
                Command::RepeatLast { count } => {
                    let Some(last) = self.macros.last_action().cloned() else {
                        continue;
                    };
                    for _ in 0..(*count).max(1) {
                        self.apply(&last, state);
                    }
                }
                other => dispatch(other, state),
            }
        }
    }

    /// Convenience driver for callers and tests: snapshot the context,
    /// interpret, apply, and hand back the action that ran.
    pub fn process_and_apply(
        &mut self,
        ev: Event,
        state: &mut EditorState,
        scroll_lines: u64,
    ) -> Action {
        let ctx = Context::snapshot(state, scroll_lines);
        let action = self.process_event(ev, &ctx);
        self.apply(&action, state);
        action
    }
}

/// Built-in command menu: the macro bracket commands.
fn default_menu_items() -> Vec<MenuItem> {
    vec![
        MenuItem {
            name: "start macro",
            action: Action::single(Command::MacroStart),
        },
        MenuItem {
            name: "stop macro",
            action: Action::single(Command::MacroStop),
        },
        MenuItem {
            name: "replay macro",
            action: Action::single(Command::MacroReplay),
        },
    ]
}
