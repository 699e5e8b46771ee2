//! Thompson-style lowering from [`Expr`] to a flat [`Program`].
//!
//! Invariants preserved by construction:
//! * `Split(a, b)` always lists the left (higher-priority) branch first,
//!   so `Alt` disambiguation by listing order survives lowering.
//! * Captures lower to a balanced `StartCapture`/`EndCapture` pair around
//!   the child's code on every path through it.
//! * `Star` bodies must consume at least one event; together with the
//!   forward-only jumps emitted everywhere else this keeps lowered
//!   programs free of ε-cycles.

use crate::expr::Expr;
use crate::inst::{Inst, Program};
use thiserror::Error;

/// Maximum instruction count a single program may lower to. Command tables
/// are tiny; hitting this means a malformed table, not real input.
pub const MAX_PROGRAM_LEN: usize = u16::MAX as usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("alternation with no branches")]
    EmptyAlternation,
    #[error("concatenation with no items")]
    EmptyConcat,
    #[error("star over an expression that can match the empty sequence")]
    NullableStar,
    #[error("program exceeds {MAX_PROGRAM_LEN} instructions")]
    TooLarge,
}

/// Lower an expression to a program ending in `Accept`.
pub fn compile(expr: &Expr) -> Result<Program, CompileError> {
    let mut c = Compiler { out: Vec::new() };
    c.emit_expr(expr)?;
    c.push(Inst::Accept)?;
    tracing::debug!(target: "input.compile", insts = c.out.len(), "compiled pattern program");
    Ok(Program::from_insts(c.out))
}

/// Build-time variant for the built-in tables: a malformed expression is a
/// programming error, so this panics with the compile diagnostic.
pub fn must_compile(expr: &Expr) -> Program {
    match compile(expr) {
        Ok(p) => p,
        Err(e) => panic!("built-in pattern failed to compile: {e}"),
    }
}

struct Compiler {
    out: Vec<Inst>,
}

impl Compiler {
    fn push(&mut self, inst: Inst) -> Result<u32, CompileError> {
        if self.out.len() >= MAX_PROGRAM_LEN {
            return Err(CompileError::TooLarge);
        }
        self.out.push(inst);
        Ok((self.out.len() - 1) as u32)
    }

    fn here(&self) -> u32 {
        self.out.len() as u32
    }

    fn patch_jump(&mut self, pc: u32, target: u32) {
        match &mut self.out[pc as usize] {
            Inst::Jump(t) => *t = target,
            other => unreachable!("patch_jump over {other:?}"),
        }
    }

    fn patch_split_right(&mut self, pc: u32, target: u32) {
        match &mut self.out[pc as usize] {
            Inst::Split(_, b) => *b = target,
            other => unreachable!("patch_split_right over {other:?}"),
        }
    }

    fn emit_expr(&mut self, expr: &Expr) -> Result<(), CompileError> {
        match expr {
            Expr::Event(pattern) => {
                self.push(Inst::Match(*pattern))?;
            }
            Expr::Concat(items) => {
                if items.is_empty() {
                    return Err(CompileError::EmptyConcat);
                }
                for item in items {
                    self.emit_expr(item)?;
                }
            }
            Expr::Alt(items) => {
                if items.is_empty() {
                    return Err(CompileError::EmptyAlternation);
                }
                // Chain of splits, each preferring its own branch; all
                // branch tails jump to the common end.
                let mut exits = Vec::with_capacity(items.len().saturating_sub(1));
                let last = items.len() - 1;
                for (i, item) in items.iter().enumerate() {
                    if i < last {
                        let split = self.push(Inst::Split(0, 0))?;
                        let left = self.here();
                        match &mut self.out[split as usize] {
                            Inst::Split(a, _) => *a = left,
                            _ => unreachable!(),
                        }
                        self.emit_expr(item)?;
                        exits.push(self.push(Inst::Jump(0))?);
                        let right = self.here();
                        self.patch_split_right(split, right);
                    } else {
                        self.emit_expr(item)?;
                    }
                }
                let end = self.here();
                for pc in exits {
                    self.patch_jump(pc, end);
                }
            }
            Expr::Star(inner) => {
                if inner.nullable() {
                    return Err(CompileError::NullableStar);
                }
                // Greedy loop: prefer another iteration over leaving.
                let head = self.push(Inst::Split(0, 0))?;
                let body = self.here();
                match &mut self.out[head as usize] {
                    Inst::Split(a, _) => *a = body,
                    _ => unreachable!(),
                }
                self.emit_expr(inner)?;
                self.push(Inst::Jump(head))?;
                let exit = self.here();
                self.patch_split_right(head, exit);
            }
            Expr::Opt(inner) => {
                // Greedy option: prefer taking the body.
                let split = self.push(Inst::Split(0, 0))?;
                let body = self.here();
                match &mut self.out[split as usize] {
                    Inst::Split(a, _) => *a = body,
                    _ => unreachable!(),
                }
                self.emit_expr(inner)?;
                let skip = self.here();
                self.patch_split_right(split, skip);
            }
            Expr::Capture { id, expr } => {
                self.push(Inst::StartCapture(*id))?;
                self.emit_expr(expr)?;
                self.push(Inst::EndCapture(*id))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::{CaptureId, EventPattern};
    use pretty_assertions::assert_eq;

    #[test]
    fn literal_lowering() {
        let p = compile(&Expr::rune('x')).unwrap();
        assert_eq!(
            p.insts(),
            &[Inst::Match(EventPattern::Rune('x')), Inst::Accept]
        );
    }

    #[test]
    fn alt_prefers_left_branch() {
        let p = compile(&Expr::alt(vec![Expr::rune('a'), Expr::rune('b')])).unwrap();
        assert_eq!(
            p.insts(),
            &[
                Inst::Split(1, 3),
                Inst::Match(EventPattern::Rune('a')),
                Inst::Jump(4),
                Inst::Match(EventPattern::Rune('b')),
                Inst::Accept,
            ]
        );
    }

    #[test]
    fn star_is_greedy_forward_loop() {
        let p = compile(&Expr::star(Expr::rune_range('0', '9'))).unwrap();
        assert_eq!(
            p.insts(),
            &[
                Inst::Split(1, 3),
                Inst::Match(EventPattern::RuneRange('0', '9')),
                Inst::Jump(0),
                Inst::Accept,
            ]
        );
    }

    #[test]
    fn capture_brackets_child() {
        let p = compile(&Expr::capture(CaptureId::Count, Expr::rune('1'))).unwrap();
        assert_eq!(
            p.insts(),
            &[
                Inst::StartCapture(CaptureId::Count),
                Inst::Match(EventPattern::Rune('1')),
                Inst::EndCapture(CaptureId::Count),
                Inst::Accept,
            ]
        );
    }

    #[test]
    fn rejects_nullable_star() {
        let e = Expr::star(Expr::opt(Expr::rune('x')));
        assert_eq!(compile(&e), Err(CompileError::NullableStar));
    }

    #[test]
    fn rejects_empty_alt() {
        assert_eq!(compile(&Expr::alt(vec![])), Err(CompileError::EmptyAlternation));
    }

    #[test]
    #[should_panic(expected = "built-in pattern failed to compile")]
    fn must_compile_panics_on_malformed_table() {
        let _ = must_compile(&Expr::concat(vec![]));
    }
}
