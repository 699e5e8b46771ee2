//! Canonical input symbol alphabet for the modal interpreter.
//!
//! Every key the terminal reports is normalized into one [`Event`]: a
//! [`KeyKind`] discriminant, a rune payload (meaningful only for
//! `KeyKind::Rune`), and a modifier mask. Control chords the command
//! tables bind (`Ctrl-B`, `Ctrl-D`, ...) are folded into dedicated kinds
//! by the decode table so pattern matching never inspects modifiers
//! directly.
//!
//! Invariant: `rune == '\0'` whenever `key != KeyKind::Rune`; constructors
//! enforce this so event equality stays a plain field comparison.

use std::fmt;

pub mod decode;

// -------------------------------------------------------------------------------------------------
// Key kinds
// -------------------------------------------------------------------------------------------------
/// Closed set of logical keys the interpreter distinguishes.
///
/// `Unmapped` is the sentinel for terminal codes the decode table does not
/// know; it matches no pattern except an explicit any-event wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Rune,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Esc,
    Enter,
    Tab,
    Backspace,
    Delete,
    CtrlB,
    CtrlD,
    CtrlF,
    CtrlR,
    CtrlU,
    Unmapped,
}

bitflags::bitflags! {
    /// Modifier flags carried alongside an event. Pattern matching ignores
    /// these (chords arrive pre-folded into `KeyKind`); they are kept for
    /// display and future bindings.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

// -------------------------------------------------------------------------------------------------
// Event
// -------------------------------------------------------------------------------------------------
/// One canonical input symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub key: KeyKind,
    pub rune: char,
    pub mods: ModifierFlags,
}

impl Event {
    /// A printable rune keypress.
    pub fn rune(r: char) -> Self {
        Self {
            key: KeyKind::Rune,
            rune: r,
            mods: ModifierFlags::empty(),
        }
    }

    /// A non-rune key. Panics if called with `KeyKind::Rune` (use
    /// [`Event::rune`]); that is a table-construction bug, not input.
    pub fn key(kind: KeyKind) -> Self {
        assert!(
            kind != KeyKind::Rune,
            "rune events must carry a payload; use Event::rune"
        );
        Self {
            key: kind,
            rune: '\0',
            mods: ModifierFlags::empty(),
        }
    }

    pub fn with_mods(mut self, mods: ModifierFlags) -> Self {
        self.mods = mods;
        self
    }

    /// True when this event carries a printable rune payload.
    pub fn is_rune(&self) -> bool {
        self.key == KeyKind::Rune
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            KeyKind::Rune => write!(f, "{}", self.rune),
            KeyKind::Esc => write!(f, "<esc>"),
            KeyKind::Enter => write!(f, "<cr>"),
            KeyKind::Tab => write!(f, "<tab>"),
            KeyKind::Backspace => write!(f, "<bs>"),
            KeyKind::Delete => write!(f, "<del>"),
            KeyKind::Up => write!(f, "<up>"),
            KeyKind::Down => write!(f, "<down>"),
            KeyKind::Left => write!(f, "<left>"),
            KeyKind::Right => write!(f, "<right>"),
            KeyKind::Home => write!(f, "<home>"),
            KeyKind::End => write!(f, "<end>"),
            KeyKind::PageUp => write!(f, "<pgup>"),
            KeyKind::PageDown => write!(f, "<pgdn>"),
            KeyKind::CtrlB => write!(f, "<c-b>"),
            KeyKind::CtrlD => write!(f, "<c-d>"),
            KeyKind::CtrlF => write!(f, "<c-f>"),
            KeyKind::CtrlR => write!(f, "<c-r>"),
            KeyKind::CtrlU => write!(f, "<c-u>"),
            KeyKind::Unmapped => write!(f, "<?>"),
        }
    }
}
