//! Per-mode command tables: ordered lists of named commands, each a
//! pattern expression plus an action builder.
//!
//! The table compiler wraps entry *i* in `Capture{Command(i)}` and folds
//! the list under `Alt`, so listing order is priority order. Tables exist
//! for the VM-backed modes only; the trivial modes react per-key in
//! `modes` without buffering.

use crate::interp::Context;
use crate::params::CommandParams;
use crate::Action;
use quill_program::{CaptureId, Expr, Program, must_compile};
use std::sync::Arc;

pub mod normal;
pub mod visual;

pub use normal::normal_table;
pub use visual::{visual_char_table, visual_line_table};

/// Builder from decoded operands (and UI context) to the deferred action.
pub type ActionBuilder = fn(&CommandParams, &Context) -> Action;

pub struct CommandSpec {
    pub name: &'static str,
    pub expr: Expr,
    pub builder: ActionBuilder,
}

/// One mode's compiled table: the ordered commands plus the program the
/// VM executes. Programs are built once and shared read-only.
pub struct ModeTable {
    commands: Vec<CommandSpec>,
    program: Arc<Program>,
}

impl ModeTable {
    /// Compile a command list into a mode program. Panics on a malformed
    /// table (build-time programming error).
    pub fn build(commands: Vec<CommandSpec>) -> Self {
        assert!(!commands.is_empty(), "mode table must bind commands");
        assert!(
            commands.len() <= u16::MAX as usize,
            "command selector space exhausted"
        );
        let alternatives: Vec<Expr> = commands
            .iter()
            .enumerate()
            .map(|(i, spec)| Expr::capture(CaptureId::Command(i as u16), spec.expr.clone()))
            .collect();
        let program = Arc::new(must_compile(&Expr::alt(alternatives)));
        tracing::debug!(
            target: "input.tables",
            commands = commands.len(),
            insts = program.len(),
            "mode table compiled"
        );
        Self { commands, program }
    }

    pub fn program(&self) -> Arc<Program> {
        Arc::clone(&self.program)
    }

    pub fn command(&self, index: u16) -> &CommandSpec {
        &self.commands[index as usize]
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// -------------------------------------------------------------------------------------------------
// Shared pattern vocabulary
// -------------------------------------------------------------------------------------------------
/// `[1-9][0-9]*` captured as the count operand.
pub(crate) fn count_capture() -> Expr {
    Expr::capture(
        CaptureId::Count,
        Expr::concat(vec![
            Expr::rune_range('1', '9'),
            Expr::star(Expr::rune_range('0', '9')),
        ]),
    )
}

/// Optional leading count in front of a command body.
pub(crate) fn counted(body: Expr) -> Expr {
    Expr::concat(vec![Expr::opt(count_capture()), body])
}

/// Any printable rune captured as the literal operand.
pub(crate) fn operand_rune() -> Expr {
    Expr::capture(CaptureId::OperandRune, Expr::any_rune())
}

// -------------------------------------------------------------------------------------------------
// Built-in program files
// -------------------------------------------------------------------------------------------------
/// On-disk locations of the compiled built-in programs (one per VM-backed
/// mode), relative to the data directory the deployment chooses.
pub const NORMAL_PROGRAM_PATH: &str = "programs/normal.qvp";
pub const VISUAL_CHAR_PROGRAM_PATH: &str = "programs/visual-char.qvp";
pub const VISUAL_LINE_PROGRAM_PATH: &str = "programs/visual-line.qvp";

/// The built-in programs by file name, for ahead-of-time compilation.
pub fn builtin_programs() -> Vec<(&'static str, Arc<Program>)> {
    vec![
        (NORMAL_PROGRAM_PATH, normal_table().program()),
        (VISUAL_CHAR_PROGRAM_PATH, visual_char_table().program()),
        (VISUAL_LINE_PROGRAM_PATH, visual_line_table().program()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_program::verify;

    #[test]
    fn all_builtin_programs_pass_the_verifier() {
        for (name, program) in builtin_programs() {
            verify(&program).unwrap_or_else(|e| panic!("{name}: {e}"));
        }
    }

    #[test]
    fn builtin_programs_round_trip_through_the_codec() {
        for (name, program) in builtin_programs() {
            let bytes = quill_program::wire::to_bytes(&program);
            let loaded = quill_program::wire::from_bytes(&bytes)
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(*program, loaded, "{name} changed across the codec");
        }
    }
}
