//! Thread-list execution of compiled programs, one symbol at a time.
//!
//! The machine keeps the set of live threads between calls. Feeding an
//! event advances every thread whose `Match` accepts it, then runs the
//! ε-instructions to fixpoint. Threads are deduplicated by pc with the
//! earliest arrival winning, which is what turns `Alt` listing order into
//! command priority. Accepting threads are folded into a "last accept"
//! snapshot instead of staying live, so the machine prefers the longest
//! acceptable prefix: a shorter command only fires once no extension can
//! still match (or the step that killed all threads arrives).
//!
//! The machine never errors. A dead end with no snapshot reports
//! `Rejected`; either terminal outcome resets the thread set to the
//! initial closure before returning.

use crate::inst::{CaptureId, Inst, Program};
use smallvec::SmallVec;
use std::sync::Arc;

// -------------------------------------------------------------------------------------------------
// Captures
// -------------------------------------------------------------------------------------------------
/// A labeled subspan of the input, as `[start, end)` event indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSpan {
    pub id: CaptureId,
    pub start: usize,
    pub end: usize,
}

/// Capture set of an accepted prefix. `consumed` is the prefix length;
/// events past it belong to the next command and must be re-fed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSet {
    pub consumed: usize,
    pub spans: SmallVec<[CaptureSpan; 4]>,
}

impl CaptureSet {
    /// First span recorded under `id`, if any.
    pub fn span(&self, id: CaptureId) -> Option<CaptureSpan> {
        self.spans.iter().copied().find(|s| s.id == id)
    }

    /// Index of the top-level command alternative that accepted.
    pub fn command_index(&self) -> Option<u16> {
        self.spans.iter().find_map(|s| match s.id {
            CaptureId::Command(i) => Some(i),
            _ => None,
        })
    }
}

// -------------------------------------------------------------------------------------------------
// Step results
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Some live thread can still consume input.
    NeedMore,
    /// Longest acceptable prefix emitted; machine has reset.
    Accepted(CaptureSet),
    /// No prefix ever accepted; machine has reset.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: Status,
    /// True when the live thread set is back to the initial closure.
    pub reset: bool,
}

// -------------------------------------------------------------------------------------------------
// Machine
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
struct Thread {
    pc: u32,
    caps: SmallVec<[CaptureSpan; 4]>,
}

/// Executable instance over a shared immutable program.
#[derive(Debug)]
pub struct Vm {
    program: Arc<Program>,
    /// Threads parked at `Match` instructions, in priority order.
    cur: Vec<Thread>,
    /// Events consumed since the last reset.
    pos: usize,
    /// Longest accepted prefix seen since the last reset.
    last_accept: Option<CaptureSet>,
    /// Cached ε-closure of pc 0 (captures positioned at input index 0).
    initial: Vec<Thread>,
}

impl Vm {
    pub fn new(program: Arc<Program>) -> Self {
        let mut initial = Vec::new();
        let mut seen = vec![false; program.len()];
        // Built-in programs never accept the empty sequence (the verifier
        // enforces it), so the entry closure cannot produce a snapshot.
        let mut ignored = None;
        add_thread(
            &program,
            Thread {
                pc: 0,
                caps: SmallVec::new(),
            },
            0,
            &mut initial,
            &mut seen,
            &mut ignored,
        );
        Self {
            program,
            cur: initial.clone(),
            pos: 0,
            last_accept: None,
            initial,
        }
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// Events consumed since the last reset.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// True when the machine sits at its initial thread set with nothing
    /// buffered — the state every terminal step must restore.
    pub fn at_initial(&self) -> bool {
        self.pos == 0
            && self.last_accept.is_none()
            && self.cur.len() == self.initial.len()
            && self.cur.iter().zip(&self.initial).all(|(a, b)| a.pc == b.pc)
    }

    /// Return the machine to the initial closure, dropping buffered state.
    pub fn reset(&mut self) {
        self.cur = self.initial.clone();
        self.pos = 0;
        self.last_accept = None;
    }

    /// Advance by one symbol.
    pub fn step(&mut self, ev: &quill_events::Event) -> StepOutcome {
        let at = self.pos;
        let mut next = Vec::with_capacity(self.cur.len());
        let mut seen = vec![false; self.program.len()];
        let mut step_accept: Option<CaptureSet> = None;

        for thread in std::mem::take(&mut self.cur) {
            if let Inst::Match(pattern) = self.program.inst(thread.pc)
                && pattern.matches(ev)
            {
                add_thread(
                    &self.program,
                    Thread {
                        pc: thread.pc + 1,
                        caps: thread.caps,
                    },
                    at + 1,
                    &mut next,
                    &mut seen,
                    &mut step_accept,
                );
            }
        }

        self.pos = at + 1;
        if let Some(snapshot) = step_accept {
            // A longer accepted prefix always supersedes a shorter one.
            tracing::trace!(
                target: "input.vm",
                consumed = snapshot.consumed,
                command = ?snapshot.command_index(),
                "accept snapshot"
            );
            self.last_accept = Some(snapshot);
        }

        if next.is_empty() {
            let status = match self.last_accept.take() {
                Some(snapshot) => Status::Accepted(snapshot),
                None => Status::Rejected,
            };
            self.reset();
            StepOutcome {
                status,
                reset: true,
            }
        } else {
            self.cur = next;
            StepOutcome {
                status: Status::NeedMore,
                reset: false,
            }
        }
    }
}

/// Run the ε-instructions from `thread` to fixpoint, parking resulting
/// threads at `Match` instructions. `pos` is the input index the next
/// `Match` would consume; capture marks record it. Dedup by pc keeps the
/// first (highest-priority) arrival. The first thread to reach `Accept`
/// in a step claims the snapshot slot.
fn add_thread(
    program: &Program,
    mut thread: Thread,
    pos: usize,
    list: &mut Vec<Thread>,
    seen: &mut [bool],
    accepted: &mut Option<CaptureSet>,
) {
    loop {
        match program.inst(thread.pc) {
            Inst::Jump(target) => thread.pc = target,
            Inst::Split(a, b) => {
                add_thread(
                    program,
                    Thread {
                        pc: a,
                        caps: thread.caps.clone(),
                    },
                    pos,
                    list,
                    seen,
                    accepted,
                );
                thread.pc = b;
            }
            Inst::StartCapture(id) => {
                thread.caps.push(CaptureSpan {
                    id,
                    start: pos,
                    end: pos,
                });
                thread.pc += 1;
            }
            Inst::EndCapture(id) => {
                // Close the most recent span under this id; the compiler
                // guarantees one is open on every reaching path.
                let span = thread
                    .caps
                    .iter_mut()
                    .rev()
                    .find(|s| s.id == id)
                    .expect("EndCapture without matching StartCapture");
                span.end = pos;
                thread.pc += 1;
            }
            Inst::Accept => {
                if accepted.is_none() {
                    *accepted = Some(CaptureSet {
                        consumed: pos,
                        spans: thread.caps,
                    });
                }
                return;
            }
            Inst::Match(_) => {
                if !seen[thread.pc as usize] {
                    seen[thread.pc as usize] = true;
                    list.push(thread);
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::expr::Expr;
    use crate::inst::CaptureId;
    use quill_events::{Event, KeyKind};

    fn vm_for(expr: Expr) -> Vm {
        Vm::new(Arc::new(compile(&expr).unwrap()))
    }

    fn feed(vm: &mut Vm, runes: &str) -> Vec<StepOutcome> {
        runes.chars().map(|c| vm.step(&Event::rune(c))).collect()
    }

    /// Two commands sharing a prefix, as the normal table shapes them.
    fn dd_or_dollar() -> Expr {
        Expr::alt(vec![
            Expr::capture(CaptureId::Command(0), Expr::runes("dd")),
            Expr::capture(
                CaptureId::Command(1),
                Expr::concat(vec![Expr::rune('d'), Expr::rune('$')]),
            ),
            Expr::capture(CaptureId::Command(2), Expr::rune('x')),
        ])
    }

    #[test]
    fn single_event_accept_resets() {
        let mut vm = vm_for(dd_or_dollar());
        let out = vm.step(&Event::rune('x'));
        match out.status {
            Status::Accepted(caps) => {
                assert_eq!(caps.command_index(), Some(2));
                assert_eq!(caps.consumed, 1);
            }
            other => panic!("expected accept, got {other:?}"),
        }
        assert!(out.reset);
        assert!(vm.at_initial());
    }

    #[test]
    fn shared_prefix_needs_more() {
        let mut vm = vm_for(dd_or_dollar());
        let out = vm.step(&Event::rune('d'));
        assert_eq!(out.status, Status::NeedMore);
        assert!(!out.reset);
        let out = vm.step(&Event::rune('$'));
        match out.status {
            Status::Accepted(caps) => assert_eq!(caps.command_index(), Some(1)),
            other => panic!("expected accept, got {other:?}"),
        }
    }

    #[test]
    fn dead_end_without_snapshot_rejects() {
        let mut vm = vm_for(dd_or_dollar());
        assert_eq!(vm.step(&Event::rune('d')).status, Status::NeedMore);
        let out = vm.step(&Event::rune('q'));
        assert_eq!(out.status, Status::Rejected);
        assert!(out.reset);
        assert!(vm.at_initial());
    }

    #[test]
    fn longest_match_snapshot_emitted_on_dead_end() {
        // "a" accepts but "ab" is still reachable; a trailing 'z' must
        // emit the one-event snapshot with the killer event unconsumed.
        let expr = Expr::alt(vec![
            Expr::capture(CaptureId::Command(0), Expr::rune('a')),
            Expr::capture(CaptureId::Command(1), Expr::runes("ab")),
        ]);
        let mut vm = vm_for(expr);
        assert_eq!(vm.step(&Event::rune('a')).status, Status::NeedMore);
        let out = vm.step(&Event::rune('z'));
        match out.status {
            Status::Accepted(caps) => {
                assert_eq!(caps.command_index(), Some(0));
                assert_eq!(caps.consumed, 1);
            }
            other => panic!("expected snapshot accept, got {other:?}"),
        }
        assert!(out.reset);
    }

    #[test]
    fn longer_alternative_wins_when_reached() {
        let expr = Expr::alt(vec![
            Expr::capture(CaptureId::Command(0), Expr::rune('a')),
            Expr::capture(CaptureId::Command(1), Expr::runes("ab")),
        ]);
        let mut vm = vm_for(expr);
        let outs = feed(&mut vm, "ab");
        match &outs[1].status {
            Status::Accepted(caps) => {
                assert_eq!(caps.command_index(), Some(1));
                assert_eq!(caps.consumed, 2);
            }
            other => panic!("expected ab accept, got {other:?}"),
        }
    }

    #[test]
    fn priority_prefers_earlier_alternative() {
        // Both alternatives accept the same single event; listing order wins.
        let expr = Expr::alt(vec![
            Expr::capture(CaptureId::Command(0), Expr::any_rune()),
            Expr::capture(CaptureId::Command(1), Expr::rune('k')),
        ]);
        let mut vm = vm_for(expr);
        match vm.step(&Event::rune('k')).status {
            Status::Accepted(caps) => assert_eq!(caps.command_index(), Some(0)),
            other => panic!("expected accept, got {other:?}"),
        }
    }

    #[test]
    fn count_capture_spans_digits() {
        let expr = Expr::capture(
            CaptureId::Command(0),
            Expr::concat(vec![
                Expr::opt(Expr::capture(
                    CaptureId::Count,
                    Expr::concat(vec![
                        Expr::rune_range('1', '9'),
                        Expr::star(Expr::rune_range('0', '9')),
                    ]),
                )),
                Expr::runes("dd"),
            ]),
        );
        let mut vm = vm_for(expr);
        let outs = feed(&mut vm, "12dd");
        match &outs[3].status {
            Status::Accepted(caps) => {
                let count = caps.span(CaptureId::Count).expect("count span");
                assert_eq!((count.start, count.end), (0, 2));
                assert_eq!(caps.consumed, 4);
            }
            other => panic!("expected accept, got {other:?}"),
        }
    }

    #[test]
    fn operand_rune_capture() {
        let expr = Expr::capture(
            CaptureId::Command(0),
            Expr::concat(vec![
                Expr::rune('f'),
                Expr::capture(CaptureId::OperandRune, Expr::any_rune()),
            ]),
        );
        let mut vm = vm_for(expr);
        vm.step(&Event::rune('f'));
        match vm.step(&Event::rune('λ')).status {
            Status::Accepted(caps) => {
                let span = caps.span(CaptureId::OperandRune).unwrap();
                assert_eq!((span.start, span.end), (1, 2));
            }
            other => panic!("expected accept, got {other:?}"),
        }
    }

    #[test]
    fn esc_kills_composition() {
        let mut vm = vm_for(dd_or_dollar());
        assert_eq!(vm.step(&Event::rune('d')).status, Status::NeedMore);
        let out = vm.step(&Event::key(KeyKind::Esc));
        assert_eq!(out.status, Status::Rejected);
        assert!(vm.at_initial());
    }

    #[test]
    fn machine_reusable_after_terminal_step() {
        let mut vm = vm_for(dd_or_dollar());
        feed(&mut vm, "dd");
        // Fresh command on the same machine instance.
        match vm.step(&Event::rune('x')).status {
            Status::Accepted(caps) => assert_eq!(caps.command_index(), Some(2)),
            other => panic!("expected accept, got {other:?}"),
        }
    }
}
