//! Compiled instruction listing and the event patterns it matches.

use quill_events::{Event, KeyKind};

// -------------------------------------------------------------------------------------------------
// Capture identifiers
// -------------------------------------------------------------------------------------------------
/// Label attached to a recorded input subspan.
///
/// `Command(i)` marks which top-level table alternative accepted; the other
/// variants carry operands to the action builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureId {
    Command(u16),
    Count,
    ClipboardPage,
    OperandRune,
}

// -------------------------------------------------------------------------------------------------
// Event patterns
// -------------------------------------------------------------------------------------------------
/// Predicate over one canonical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPattern {
    /// Exact non-rune key (Esc, Enter, arrows, named chords).
    Key(KeyKind),
    /// Exact rune keypress.
    Rune(char),
    /// Rune within an inclusive range (digit classes).
    RuneRange(char, char),
    /// Any printable rune (operand capture for `f`, `r`, ...).
    AnyRune,
    /// Any event at all, including the unmapped sentinel.
    AnyEvent,
}

impl EventPattern {
    /// Canonical event comparison: the kind must agree and the rune payload
    /// participates only for rune patterns. Modifiers never participate;
    /// chords arrive pre-folded into their own kinds.
    pub fn matches(&self, ev: &Event) -> bool {
        match self {
            EventPattern::Key(kind) => ev.key == *kind,
            EventPattern::Rune(r) => ev.key == KeyKind::Rune && ev.rune == *r,
            EventPattern::RuneRange(lo, hi) => {
                ev.key == KeyKind::Rune && *lo <= ev.rune && ev.rune <= *hi
            }
            EventPattern::AnyRune => ev.key == KeyKind::Rune && !ev.rune.is_control(),
            EventPattern::AnyEvent => true,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Instructions
// -------------------------------------------------------------------------------------------------
/// One VM instruction. `Split` explores `pc1` with higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    Match(EventPattern),
    Jump(u32),
    Split(u32, u32),
    StartCapture(CaptureId),
    EndCapture(CaptureId),
    Accept,
}

/// An immutable compiled program: a flat instruction array entered at pc 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    insts: Vec<Inst>,
}

impl Program {
    /// Wrap a raw listing. Callers are expected to run [`crate::verify`]
    /// over anything that did not come out of the compiler.
    pub fn from_insts(insts: Vec<Inst>) -> Self {
        Self { insts }
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn inst(&self, pc: u32) -> Inst {
        self.insts[pc as usize]
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }
}
