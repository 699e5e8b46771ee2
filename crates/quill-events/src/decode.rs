//! Terminal key decode: crossterm events → canonical [`Event`]s.
//!
//! One small table. Ctrl-modified runes the command tables bind are folded
//! into named chord kinds here; everything else keeps its modifier mask
//! for display purposes only. Unknown codes become `KeyKind::Unmapped`.

use crate::{Event, KeyKind, ModifierFlags};
use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CKeyModifiers};

/// Decode a crossterm key event. Returns `None` for key codes that carry
/// no meaning for the interpreter (media keys, lock keys, bare modifiers).
pub fn decode_key_event(event: &CKeyEvent) -> Option<Event> {
    let mods = decode_mods(event.modifiers);
    let ev = match event.code {
        CKeyCode::Char(c) => {
            if mods.contains(ModifierFlags::CTRL) {
                match c.to_ascii_lowercase() {
                    'b' => Event::key(KeyKind::CtrlB),
                    'd' => Event::key(KeyKind::CtrlD),
                    'f' => Event::key(KeyKind::CtrlF),
                    'r' => Event::key(KeyKind::CtrlR),
                    'u' => Event::key(KeyKind::CtrlU),
                    _ => Event::rune(c).with_mods(mods),
                }
            } else {
                Event::rune(c).with_mods(mods)
            }
        }
        CKeyCode::Enter => Event::key(KeyKind::Enter).with_mods(mods),
        CKeyCode::Esc => Event::key(KeyKind::Esc).with_mods(mods),
        CKeyCode::Backspace => Event::key(KeyKind::Backspace).with_mods(mods),
        CKeyCode::Tab | CKeyCode::BackTab => Event::key(KeyKind::Tab).with_mods(mods),
        CKeyCode::Delete => Event::key(KeyKind::Delete).with_mods(mods),
        CKeyCode::Up => Event::key(KeyKind::Up).with_mods(mods),
        CKeyCode::Down => Event::key(KeyKind::Down).with_mods(mods),
        CKeyCode::Left => Event::key(KeyKind::Left).with_mods(mods),
        CKeyCode::Right => Event::key(KeyKind::Right).with_mods(mods),
        CKeyCode::Home => Event::key(KeyKind::Home).with_mods(mods),
        CKeyCode::End => Event::key(KeyKind::End).with_mods(mods),
        CKeyCode::PageUp => Event::key(KeyKind::PageUp).with_mods(mods),
        CKeyCode::PageDown => Event::key(KeyKind::PageDown).with_mods(mods),
        CKeyCode::Insert | CKeyCode::F(_) => Event::key(KeyKind::Unmapped).with_mods(mods),
        CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    tracing::trace!(target: "input.decode", key = ?ev.key, "decoded key event");
    Some(ev)
}

fn decode_mods(mods: CKeyModifiers) -> ModifierFlags {
    let mut out = ModifierFlags::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= ModifierFlags::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= ModifierFlags::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= ModifierFlags::SHIFT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn decodes_plain_rune() {
        let ev = decode_key_event(&key_event(CKeyCode::Char('a'), CKeyModifiers::NONE)).unwrap();
        assert_eq!(ev, Event::rune('a'));
    }

    #[test]
    fn folds_ctrl_chords() {
        let ev = decode_key_event(&key_event(CKeyCode::Char('u'), CKeyModifiers::CONTROL)).unwrap();
        assert_eq!(ev.key, KeyKind::CtrlU);
        assert_eq!(ev.rune, '\0');
    }

    #[test]
    fn ctrl_rune_outside_chord_table_keeps_rune() {
        let ev = decode_key_event(&key_event(CKeyCode::Char('x'), CKeyModifiers::CONTROL)).unwrap();
        assert_eq!(ev.key, KeyKind::Rune);
        assert_eq!(ev.rune, 'x');
        assert!(ev.mods.contains(ModifierFlags::CTRL));
    }

    #[test]
    fn unknown_codes_map_to_unmapped_or_none() {
        let f5 = decode_key_event(&key_event(CKeyCode::F(5), CKeyModifiers::NONE)).unwrap();
        assert_eq!(f5.key, KeyKind::Unmapped);
        assert!(decode_key_event(&key_event(CKeyCode::CapsLock, CKeyModifiers::NONE)).is_none());
    }
}
