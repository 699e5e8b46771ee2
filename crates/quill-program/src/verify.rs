//! Static verification of compiled programs.
//!
//! Runs offline (tests, and the progc tool before writing a file); the
//! runtime assumes loaded programs already passed. Checks:
//! * every branch target and fall-through stays in bounds,
//! * every instruction is reachable from the entry,
//! * some `Accept` is reachable, and none is reachable without consuming
//!   at least one event,
//! * the ε-instruction graph is acyclic (the closure fixpoint terminates),
//! * capture open-stacks are consistent per pc, balanced, and empty at
//!   every `Accept`.

use crate::inst::{CaptureId, Inst, Program};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("pc {pc}: branch target {target} out of bounds")]
    TargetOutOfBounds { pc: u32, target: u32 },
    #[error("pc {pc}: fall-through past end of program")]
    FallsOffEnd { pc: u32 },
    #[error("pc {pc}: instruction unreachable from entry")]
    Unreachable { pc: u32 },
    #[error("no Accept instruction reachable from entry")]
    AcceptUnreachable,
    #[error("Accept reachable without consuming any event")]
    EmptyMatch,
    #[error("pc {pc}: ε-cycle (closure would not terminate)")]
    EpsilonCycle { pc: u32 },
    #[error("pc {pc}: capture {id:?} closed out of order or never opened")]
    UnbalancedCapture { pc: u32, id: CaptureId },
    #[error("pc {pc}: inconsistent captures open across paths")]
    InconsistentCaptures { pc: u32 },
    #[error("pc {pc}: Accept with captures still open")]
    OpenCaptureAtAccept { pc: u32 },
    #[error("empty program")]
    Empty,
}

/// Successor pcs of one instruction, priority order.
fn successors(inst: Inst, pc: u32) -> Vec<u32> {
    match inst {
        Inst::Match(_) | Inst::StartCapture(_) | Inst::EndCapture(_) => vec![pc + 1],
        Inst::Jump(t) => vec![t],
        Inst::Split(a, b) => vec![a, b],
        Inst::Accept => vec![],
    }
}

pub fn verify(program: &Program) -> Result<(), VerifyError> {
    let len = program.len() as u32;
    if len == 0 {
        return Err(VerifyError::Empty);
    }

    // Bounds: explicit targets and fall-throughs.
    for pc in 0..len {
        match program.inst(pc) {
            Inst::Jump(t) => {
                if t >= len {
                    return Err(VerifyError::TargetOutOfBounds { pc, target: t });
                }
            }
            Inst::Split(a, b) => {
                for t in [a, b] {
                    if t >= len {
                        return Err(VerifyError::TargetOutOfBounds { pc, target: t });
                    }
                }
            }
            Inst::Match(_) | Inst::StartCapture(_) | Inst::EndCapture(_) => {
                if pc + 1 >= len {
                    return Err(VerifyError::FallsOffEnd { pc });
                }
            }
            Inst::Accept => {}
        }
    }

    // Reachability from entry.
    let mut reachable = vec![false; program.len()];
    let mut stack = vec![0u32];
    while let Some(pc) = stack.pop() {
        if reachable[pc as usize] {
            continue;
        }
        reachable[pc as usize] = true;
        stack.extend(successors(program.inst(pc), pc));
    }
    if let Some(pc) = reachable.iter().position(|r| !r) {
        return Err(VerifyError::Unreachable { pc: pc as u32 });
    }
    if !(0..len).any(|pc| matches!(program.inst(pc), Inst::Accept)) {
        return Err(VerifyError::AcceptUnreachable);
    }

    // ε-cycle detection over the non-consuming edges (Match stops a path).
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Grey,
        Black,
    }
    fn eps_dfs(program: &Program, pc: u32, colors: &mut [Color]) -> Result<(), VerifyError> {
        if matches!(program.inst(pc), Inst::Match(_) | Inst::Accept) {
            return Ok(());
        }
        match colors[pc as usize] {
            Color::Grey => return Err(VerifyError::EpsilonCycle { pc }),
            Color::Black => return Ok(()),
            Color::White => {}
        }
        colors[pc as usize] = Color::Grey;
        for next in successors(program.inst(pc), pc) {
            eps_dfs(program, next, colors)?;
        }
        colors[pc as usize] = Color::Black;
        Ok(())
    }
    let mut colors = vec![Color::White; program.len()];
    for pc in 0..len {
        eps_dfs(program, pc, &mut colors)?;
    }

    // Empty match: Accept reachable from entry through ε-instructions only.
    {
        let mut seen = vec![false; program.len()];
        let mut stack = vec![0u32];
        while let Some(pc) = stack.pop() {
            if seen[pc as usize] {
                continue;
            }
            seen[pc as usize] = true;
            match program.inst(pc) {
                Inst::Accept => return Err(VerifyError::EmptyMatch),
                Inst::Match(_) => {}
                inst => stack.extend(successors(inst, pc)),
            }
        }
    }

    // Capture balance: propagate the open-capture stack along every edge;
    // each pc must observe a single consistent stack.
    let mut open_at: Vec<Option<Vec<CaptureId>>> = vec![None; program.len()];
    open_at[0] = Some(Vec::new());
    let mut work = vec![0u32];
    while let Some(pc) = work.pop() {
        let open = open_at[pc as usize].clone().expect("worklist pc has state");
        let next_open = match program.inst(pc) {
            Inst::StartCapture(id) => {
                let mut o = open;
                o.push(id);
                o
            }
            Inst::EndCapture(id) => {
                let mut o = open;
                match o.pop() {
                    Some(top) if top == id => o,
                    _ => return Err(VerifyError::UnbalancedCapture { pc, id }),
                }
            }
            Inst::Accept => {
                if !open.is_empty() {
                    return Err(VerifyError::OpenCaptureAtAccept { pc });
                }
                continue;
            }
            _ => open,
        };
        for succ in successors(program.inst(pc), pc) {
            match &open_at[succ as usize] {
                None => {
                    open_at[succ as usize] = Some(next_open.clone());
                    work.push(succ);
                }
                Some(existing) => {
                    if existing != &next_open {
                        return Err(VerifyError::InconsistentCaptures { pc: succ });
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::expr::Expr;
    use crate::inst::EventPattern;

    #[test]
    fn compiled_programs_pass() {
        let expr = Expr::alt(vec![
            Expr::capture(CaptureId::Command(0), Expr::runes("dd")),
            Expr::capture(
                CaptureId::Command(1),
                Expr::concat(vec![
                    Expr::opt(Expr::capture(
                        CaptureId::Count,
                        Expr::concat(vec![
                            Expr::rune_range('1', '9'),
                            Expr::star(Expr::rune_range('0', '9')),
                        ]),
                    )),
                    Expr::rune('x'),
                ]),
            ),
        ]);
        let program = compile(&expr).unwrap();
        verify(&program).unwrap();
    }

    #[test]
    fn rejects_out_of_bounds_target() {
        let p = Program::from_insts(vec![Inst::Jump(9), Inst::Accept]);
        assert_eq!(
            verify(&p),
            Err(VerifyError::TargetOutOfBounds { pc: 0, target: 9 })
        );
    }

    #[test]
    fn rejects_fall_off_end() {
        let p = Program::from_insts(vec![Inst::Match(EventPattern::AnyRune)]);
        assert_eq!(verify(&p), Err(VerifyError::FallsOffEnd { pc: 0 }));
    }

    #[test]
    fn rejects_unreachable_instruction() {
        let p = Program::from_insts(vec![
            Inst::Match(EventPattern::Rune('a')),
            Inst::Accept,
            Inst::Match(EventPattern::Rune('b')),
            Inst::Accept,
        ]);
        assert_eq!(verify(&p), Err(VerifyError::Unreachable { pc: 2 }));
    }

    #[test]
    fn rejects_epsilon_cycle() {
        let p = Program::from_insts(vec![
            Inst::Split(1, 2),
            Inst::Jump(0),
            Inst::Match(EventPattern::AnyRune),
            Inst::Accept,
        ]);
        assert!(matches!(verify(&p), Err(VerifyError::EpsilonCycle { .. })));
    }

    #[test]
    fn rejects_empty_match() {
        let p = Program::from_insts(vec![
            Inst::Split(1, 3),
            Inst::Match(EventPattern::AnyRune),
            Inst::Jump(3),
            Inst::Accept,
        ]);
        assert_eq!(verify(&p), Err(VerifyError::EmptyMatch));
    }

    #[test]
    fn rejects_unbalanced_capture() {
        let p = Program::from_insts(vec![
            Inst::Match(EventPattern::AnyRune),
            Inst::EndCapture(CaptureId::Count),
            Inst::Accept,
        ]);
        assert_eq!(
            verify(&p),
            Err(VerifyError::UnbalancedCapture {
                pc: 1,
                id: CaptureId::Count
            })
        );
    }

    #[test]
    fn rejects_open_capture_at_accept() {
        let p = Program::from_insts(vec![
            Inst::StartCapture(CaptureId::Count),
            Inst::Match(EventPattern::AnyRune),
            Inst::Accept,
        ]);
        assert_eq!(verify(&p), Err(VerifyError::OpenCaptureAtAccept { pc: 2 }));
    }

    #[test]
    fn rejects_empty_program() {
        assert_eq!(verify(&Program::from_insts(vec![])), Err(VerifyError::Empty));
    }
}
