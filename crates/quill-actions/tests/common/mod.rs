#![allow(dead_code)] // Shared across many integration tests; each binary uses a subset.

use quill_actions::{EditorState, Interpreter};
use quill_events::{Event, KeyKind};
use quill_state::{StatusMsg, StatusStyle};
use quill_text::Position;

/// View height used for every context snapshot in the suites.
pub const VIEW_LINES: u64 = 40;

/// Interpreter plus editor state, driven by key notation strings.
pub struct Harness {
    pub interp: Interpreter,
    pub state: EditorState,
}

impl Harness {
    pub fn new(text: &str) -> Self {
        Self {
            interp: Interpreter::default(),
            state: EditorState::from_str(text),
        }
    }

    /// Feed keys in compact notation: plain runes, with named keys in
    /// angle brackets (`<cr>`, `<esc>`, `<bs>`, `<tab>`, `<del>`,
    /// `<up>`, `<down>`, `<left>`, `<right>`, `<c-b>`, `<c-d>`, `<c-f>`,
    /// `<c-r>`, `<c-u>`).
    pub fn feed(&mut self, keys: &str) {
        for ev in parse_keys(keys) {
            self.interp.process_and_apply(ev, &mut self.state, VIEW_LINES);
        }
    }

    pub fn feed_events(&mut self, events: &[Event]) {
        for ev in events {
            self.interp.process_and_apply(*ev, &mut self.state, VIEW_LINES);
        }
    }

    pub fn text(&self) -> String {
        self.state.buffer.to_string()
    }

    pub fn cursor(&self) -> Position {
        self.state.cursor
    }

    pub fn status(&self) -> Option<StatusMsg> {
        self.state.status.clone()
    }

    pub fn error_status_containing(&self, needle: &str) -> bool {
        matches!(
            &self.state.status,
            Some(StatusMsg { text, style: StatusStyle::Error }) if text.contains(needle)
        )
    }

    pub fn pending_input(&self) -> String {
        self.interp.input_buffer_string(self.state.input_mode)
    }
}

pub fn parse_keys(notation: &str) -> Vec<Event> {
    let mut out = Vec::new();
    let mut chars = notation.chars();
    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(Event::rune(c));
            continue;
        }
        let mut name = String::new();
        for n in chars.by_ref() {
            if n == '>' {
                break;
            }
            name.push(n);
        }
        let kind = match name.as_str() {
            "cr" | "enter" => KeyKind::Enter,
            "esc" => KeyKind::Esc,
            "bs" => KeyKind::Backspace,
            "tab" => KeyKind::Tab,
            "del" => KeyKind::Delete,
            "up" => KeyKind::Up,
            "down" => KeyKind::Down,
            "left" => KeyKind::Left,
            "right" => KeyKind::Right,
            "home" => KeyKind::Home,
            "end" => KeyKind::End,
            "pgup" => KeyKind::PageUp,
            "pgdn" => KeyKind::PageDown,
            "c-b" => KeyKind::CtrlB,
            "c-d" => KeyKind::CtrlD,
            "c-f" => KeyKind::CtrlF,
            "c-r" => KeyKind::CtrlR,
            "c-u" => KeyKind::CtrlU,
            other => panic!("unknown key name <{other}> in test notation"),
        };
        out.push(Event::key(kind));
    }
    out
}
