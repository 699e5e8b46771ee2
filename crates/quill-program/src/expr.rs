//! Expression tree for event-sequence patterns.
//!
//! The constructors below are the vocabulary command tables are written
//! in; they stay close to the handful of primitives the grammars need
//! (exact event, rune range, any-rune wildcard) rather than a general
//! regex surface syntax.

use crate::inst::{CaptureId, EventPattern};
use quill_events::KeyKind;

/// Pattern expression over event sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Event(EventPattern),
    Concat(Vec<Expr>),
    Alt(Vec<Expr>),
    Star(Box<Expr>),
    Opt(Box<Expr>),
    Capture { id: CaptureId, expr: Box<Expr> },
}

impl Expr {
    pub fn event(pattern: EventPattern) -> Self {
        Expr::Event(pattern)
    }

    /// Exact rune literal.
    pub fn rune(r: char) -> Self {
        Expr::Event(EventPattern::Rune(r))
    }

    /// One literal per rune of `s`, concatenated (`"gg"`, `"aw"`, ...).
    pub fn runes(s: &str) -> Self {
        Expr::Concat(s.chars().map(Expr::rune).collect())
    }

    /// Exact non-rune key.
    pub fn key(kind: KeyKind) -> Self {
        Expr::Event(EventPattern::Key(kind))
    }

    pub fn rune_range(lo: char, hi: char) -> Self {
        Expr::Event(EventPattern::RuneRange(lo, hi))
    }

    pub fn any_rune() -> Self {
        Expr::Event(EventPattern::AnyRune)
    }

    pub fn concat(items: Vec<Expr>) -> Self {
        Expr::Concat(items)
    }

    pub fn alt(items: Vec<Expr>) -> Self {
        Expr::Alt(items)
    }

    pub fn star(inner: Expr) -> Self {
        Expr::Star(Box::new(inner))
    }

    pub fn opt(inner: Expr) -> Self {
        Expr::Opt(Box::new(inner))
    }

    pub fn capture(id: CaptureId, inner: Expr) -> Self {
        Expr::Capture {
            id,
            expr: Box::new(inner),
        }
    }

    /// True when the expression can match the empty sequence. The compiler
    /// rejects `Star` over a nullable body; that shape is the only way an
    /// ε-cycle could enter a lowered program.
    pub fn nullable(&self) -> bool {
        match self {
            Expr::Event(_) => false,
            Expr::Concat(items) => items.iter().all(Expr::nullable),
            Expr::Alt(items) => items.iter().any(Expr::nullable),
            Expr::Star(_) | Expr::Opt(_) => true,
            Expr::Capture { expr, .. } => expr.nullable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runes_builds_ordered_concat() {
        let e = Expr::runes("gg");
        assert_eq!(e, Expr::Concat(vec![Expr::rune('g'), Expr::rune('g')]));
    }

    #[test]
    fn nullability() {
        assert!(!Expr::rune('d').nullable());
        assert!(Expr::opt(Expr::rune('d')).nullable());
        assert!(Expr::star(Expr::rune('d')).nullable());
        assert!(Expr::concat(vec![Expr::opt(Expr::rune('1')), Expr::opt(Expr::rune('2'))]).nullable());
        assert!(!Expr::concat(vec![Expr::opt(Expr::rune('1')), Expr::rune('d')]).nullable());
        assert!(
            Expr::capture(CaptureId::Count, Expr::star(Expr::rune_range('0', '9'))).nullable()
        );
    }
}
